//! Supplier data: remote brand lookups, the embedded POC dataset, and the
//! deterministic indicator generator used until real risk data is wired in.

use log::{info, warn};
use serde::Deserialize;
use thiserror::Error;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

use crate::risk::{Indicators, Supplier};

/// Endpoint serving per-brand facility lists.
pub const API_BASE_URL: &str = "https://ooeayki69b.execute-api.eu-central-1.amazonaws.com/prod";

/// One facility row as returned by the supplier endpoint.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawSupplierData {
	/// Open Supply Hub facility ID.
	pub os_id: Option<String>,
	/// Facility name.
	pub name: String,
	/// Street address as reported.
	pub address: Option<String>,
	/// ISO 3166 alpha-2 country code.
	pub country_code: Option<String>,
	/// Country display name, when the row carries one.
	pub country_name: Option<String>,
	/// Latitude as text.
	pub lat: Option<String>,
	/// Longitude as text.
	pub lng: Option<String>,
	/// Industry sector; product fallback.
	pub sector: Option<String>,
	/// Contributors that listed the facility.
	#[serde(rename = "contributor (list)")]
	pub contributor_list: Option<String>,
	/// Single contributor column, used when the list is absent.
	pub contributor: Option<String>,
	/// Normalized facility type.
	pub facility_type: Option<String>,
	/// Facility type as originally reported.
	pub processing_type_facility_type_raw: Option<String>,
	/// Products made at the facility.
	pub product_type: Option<String>,
}

/// Response body of a successful brand lookup.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ApiSupplierResponse {
	/// Dataset the rows came from.
	#[serde(default)]
	pub filename: String,
	/// Row count reported by the endpoint.
	#[serde(default, rename = "rowCount")]
	pub row_count: usize,
	/// Facility rows.
	#[serde(default)]
	pub data: Vec<RawSupplierData>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiErrorBody {
	error: Option<String>,
	message: Option<String>,
}

/// Errors from a brand lookup.
#[derive(Debug, Error)]
pub enum FetchError {
	/// The endpoint rejected the brand name.
	#[error("{0}")]
	BadRequest(String),

	/// Unknown brand or endpoint failure.
	#[error("brand data not found or server error")]
	Server,

	/// Any other non-success status.
	#[error("failed to fetch data: {0}")]
	Status(u16),

	/// The response body was not the expected JSON.
	#[error("malformed supplier data: {0}")]
	Decode(#[from] serde_json::Error),

	/// A browser API call failed.
	#[error("browser error: {0}")]
	Browser(String),
}

impl From<JsValue> for FetchError {
	fn from(value: JsValue) -> Self {
		FetchError::Browser(value.as_string().unwrap_or_else(|| format!("{value:?}")))
	}
}

/// Base indicator values for a country, before per-supplier jitter.
#[derive(Clone, Copy, Debug, PartialEq)]
struct CountryProfile {
	governance: f64,
	labor: f64,
	environmental: f64,
	sector: f64,
}

impl CountryProfile {
	const fn new(governance: f64, labor: f64, environmental: f64, sector: f64) -> Self {
		Self {
			governance,
			labor,
			environmental,
			sector,
		}
	}

	fn for_code(code: &str) -> Self {
		match code.to_ascii_uppercase().as_str() {
			"CN" => Self::new(45.0, 40.0, 35.0, 65.0),
			"US" => Self::new(75.0, 70.0, 60.0, 80.0),
			"DE" => Self::new(85.0, 85.0, 80.0, 90.0),
			"IN" => Self::new(55.0, 45.0, 40.0, 60.0),
			"VN" => Self::new(50.0, 45.0, 45.0, 55.0),
			"BD" => Self::new(35.0, 30.0, 25.0, 45.0),
			"MX" => Self::new(60.0, 55.0, 50.0, 65.0),
			"BR" => Self::new(55.0, 50.0, 45.0, 60.0),
			_ => Self::new(50.0, 50.0, 50.0, 50.0),
		}
	}
}

/// English name for an ISO 3166 alpha-2 code.
pub fn country_name(code: &str) -> Option<&'static str> {
	let name = match code.trim().to_ascii_uppercase().as_str() {
		"CN" => "China",
		"US" => "United States",
		"DE" => "Germany",
		"JP" => "Japan",
		"KR" => "South Korea",
		"TW" => "Taiwan",
		"IN" => "India",
		"VN" => "Vietnam",
		"TH" => "Thailand",
		"MY" => "Malaysia",
		"SG" => "Singapore",
		"ID" => "Indonesia",
		"PH" => "Philippines",
		"BD" => "Bangladesh",
		"PK" => "Pakistan",
		"MX" => "Mexico",
		"BR" => "Brazil",
		"TR" => "Turkey",
		"PL" => "Poland",
		"CZ" => "Czech Republic",
		"HU" => "Hungary",
		"RO" => "Romania",
		"BG" => "Bulgaria",
		"UA" => "Ukraine",
		"RU" => "Russia",
		"EG" => "Egypt",
		"MA" => "Morocco",
		"TN" => "Tunisia",
		"ZA" => "South Africa",
		"KE" => "Kenya",
		"ET" => "Ethiopia",
		"HK" => "Hong Kong",
		"CA" => "Canada",
		"AU" => "Australia",
		"NZ" => "New Zealand",
		"GB" => "United Kingdom",
		"FR" => "France",
		"IT" => "Italy",
		"ES" => "Spain",
		"PT" => "Portugal",
		"NL" => "Netherlands",
		"BE" => "Belgium",
		"CH" => "Switzerland",
		"AT" => "Austria",
		"SE" => "Sweden",
		"NO" => "Norway",
		"DK" => "Denmark",
		"FI" => "Finland",
		"IE" => "Ireland",
		"GR" => "Greece",
		"IL" => "Israel",
		"AE" => "United Arab Emirates",
		"SA" => "Saudi Arabia",
		"QA" => "Qatar",
		"KW" => "Kuwait",
		"LK" => "Sri Lanka",
		"NP" => "Nepal",
		"MM" => "Myanmar",
		"KH" => "Cambodia",
		"LA" => "Laos",
		"CL" => "Chile",
		"AR" => "Argentina",
		"PE" => "Peru",
		"CO" => "Colombia",
		"VE" => "Venezuela",
		"EC" => "Ecuador",
		"BO" => "Bolivia",
		"PY" => "Paraguay",
		"UY" => "Uruguay",
		_ => return None,
	};
	Some(name)
}

/// Sum of the leading UTF-16 unit of each character in `name`.
fn name_seed(name: &str) -> u64 {
	let mut buf = [0u16; 2];
	name.chars()
		.map(|c| c.encode_utf16(&mut buf)[0] as u64)
		.sum()
}

fn jitter(seed: u64, offset: u64) -> f64 {
	((seed + offset) * 9301 + 49297) as f64 % 233280.0 / 233280.0
}

/// Placeholder indicators derived from the country profile, jittered by up to
/// ten points per indicator. Stable for a given name and country.
pub fn generate_indicators(country_code: &str, name: &str) -> Indicators {
	let base = CountryProfile::for_code(country_code);
	let seed = name_seed(name);
	let value = |base: f64, offset: u64| (base + jitter(seed, offset) * 20.0 - 10.0).round();
	Indicators {
		country_governance: Some(value(base.governance, 1)),
		labor_rights: Some(value(base.labor, 2)),
		environmental: Some(value(base.environmental, 3)),
		sector_compliance: Some(value(base.sector, 4)),
	}
}

fn non_empty(value: &Option<String>) -> Option<&str> {
	value.as_deref().filter(|v| !v.is_empty())
}

fn parse_coordinate(value: &Option<String>) -> Option<f64> {
	non_empty(value)?
		.trim()
		.parse::<f64>()
		.ok()
		.filter(|v| v.is_finite())
}

/// Converts endpoint rows into suppliers with generated indicators.
pub fn transform(raw: &[RawSupplierData]) -> Vec<Supplier> {
	raw.iter()
		.enumerate()
		.map(|(index, row)| {
			let code = row.country_code.as_deref().unwrap_or_default();
			let country = non_empty(&row.country_name)
				.map(str::to_owned)
				.or_else(|| country_name(code).map(str::to_owned))
				.or_else(|| (!code.is_empty()).then(|| code.to_owned()))
				.unwrap_or_else(|| "Unknown".to_owned());

			Supplier {
				id: non_empty(&row.os_id)
					.map(str::to_owned)
					.unwrap_or_else(|| format!("supplier-{index}")),
				name: row.name.clone(),
				os_id: row.os_id.clone(),
				country,
				latitude: parse_coordinate(&row.lat),
				longitude: parse_coordinate(&row.lng),
				contributor: non_empty(&row.contributor_list)
					.or_else(|| non_empty(&row.contributor))
					.map(str::to_owned),
				facility_type: non_empty(&row.facility_type)
					.or_else(|| non_empty(&row.processing_type_facility_type_raw))
					.map(str::to_owned),
				product_category: non_empty(&row.product_type)
					.or_else(|| non_empty(&row.sector))
					.map(str::to_owned),
				indicators: generate_indicators(code, &row.name),
			}
		})
		.collect()
}

/// Parses an endpoint response body into suppliers.
pub fn parse_response(body: &str) -> Result<Vec<Supplier>, FetchError> {
	let response: ApiSupplierResponse = serde_json::from_str(body)?;
	Ok(transform(&response.data))
}

/// URL-safe brand identifier: lowercase ASCII alphanumerics joined by single
/// dashes. Returns `None` when nothing usable remains.
pub fn brand_slug(input: &str) -> Option<String> {
	let mut slug = String::with_capacity(input.len());
	let mut pending_dash = false;
	for c in input.chars().flat_map(char::to_lowercase) {
		if c.is_ascii_lowercase() || c.is_ascii_digit() {
			if pending_dash && !slug.is_empty() {
				slug.push('-');
			}
			pending_dash = false;
			slug.push(c);
		} else {
			pending_dash = true;
		}
	}
	(!slug.is_empty()).then_some(slug)
}

fn mock_supplier(
	id: &str,
	name: &str,
	country: &str,
	coordinates: (f64, f64),
	details: [&str; 4],
	indicators: [f64; 4],
) -> Supplier {
	let [os_id, contributor, facility_type, product_category] = details;
	Supplier {
		id: id.to_owned(),
		name: name.to_owned(),
		os_id: Some(os_id.to_owned()),
		country: country.to_owned(),
		latitude: Some(coordinates.0),
		longitude: Some(coordinates.1),
		contributor: Some(contributor.to_owned()),
		facility_type: Some(facility_type.to_owned()),
		product_category: Some(product_category.to_owned()),
		indicators: Indicators {
			country_governance: Some(indicators[0]),
			labor_rights: Some(indicators[1]),
			environmental: Some(indicators[2]),
			sector_compliance: Some(indicators[3]),
		},
	}
}

/// The proof-of-concept dataset shown before any brand is searched.
pub fn mock_suppliers() -> Vec<Supplier> {
	vec![
		mock_supplier(
			"sup-1",
			"Alpha Textiles Ltd",
			"Bangladesh",
			(23.8103, 90.4125),
			["OS-0001", "Open Supply Hub", "Factory", "Apparel"],
			[45.0, 50.0, 55.0, 60.0],
		),
		mock_supplier(
			"sup-2",
			"Beta Components Co.",
			"Vietnam",
			(21.0278, 105.8342),
			["OS-0002", "OSH Public List", "Assembly", "Electronics"],
			[62.0, 58.0, 64.0, 68.0],
		),
		mock_supplier(
			"sup-3",
			"Gamma Metals",
			"Germany",
			(52.52, 13.405),
			["OS-0003", "Contributor A", "Smelter", "Metals"],
			[88.0, 85.0, 80.0, 90.0],
		),
	]
}

/// Rows shown for `brand` when the endpoint cannot be reached.
pub fn fallback_suppliers(brand: &str) -> Vec<Supplier> {
	let row = |os_id: &str, name: &str, code: &str, country: &str, lat_lng: (&str, &str), kind: (&str, &str)| {
		RawSupplierData {
			os_id: Some(os_id.to_owned()),
			name: name.to_owned(),
			country_code: Some(code.to_owned()),
			country_name: Some(country.to_owned()),
			lat: Some(lat_lng.0.to_owned()),
			lng: Some(lat_lng.1.to_owned()),
			contributor_list: Some(brand.to_owned()),
			facility_type: Some(kind.0.to_owned()),
			product_type: Some(kind.1.to_owned()),
			..RawSupplierData::default()
		}
	};
	transform(&[
		row(
			"MOCK001",
			"Mock Supplier 1 (API Unavailable)",
			"CN",
			"China",
			("39.9042", "116.4074"),
			("Final Assembly", "Electronics"),
		),
		row(
			"MOCK002",
			"Mock Supplier 2 (API Unavailable)",
			"VN",
			"Vietnam",
			("21.0285", "105.8542"),
			("Component Manufacturing", "Components"),
		),
	])
}

fn brand_request(brand: &str) -> Result<Request, FetchError> {
	let encoded: String = js_sys::encode_uri_component(&brand.to_lowercase()).into();
	let init = RequestInit::new();
	init.set_method("GET");
	init.set_mode(RequestMode::Cors);
	let request = Request::new_with_str_and_init(&format!("{API_BASE_URL}/?filename={encoded}"), &init)?;
	request.headers().set("Accept", "application/json")?;
	Ok(request)
}

async fn response_text(response: &Response) -> Result<String, FetchError> {
	let text = JsFuture::from(response.text()?).await?;
	text.as_string()
		.ok_or_else(|| FetchError::Browser("response body is not text".into()))
}

/// Looks up the facilities listed for `brand`.
///
/// When the request cannot be sent at all (offline, CORS) the lookup falls
/// back to [`fallback_suppliers`] instead of failing.
pub async fn fetch_brand_suppliers(brand: &str) -> Result<Vec<Supplier>, FetchError> {
	let window = web_sys::window().ok_or_else(|| FetchError::Browser("no window".into()))?;
	let request = brand_request(brand)?;

	let response: Response = match JsFuture::from(window.fetch_with_request(&request)).await {
		Ok(value) => value.dyn_into()?,
		Err(err) => {
			warn!("suppliers: request for {brand:?} failed ({err:?}), using fallback data");
			return Ok(fallback_suppliers(brand));
		}
	};

	match response.status() {
		200..=299 => {
			let suppliers = parse_response(&response_text(&response).await?)?;
			info!("suppliers: {} facilities for {brand:?}", suppliers.len());
			Ok(suppliers)
		}
		400 => {
			let body: ApiErrorBody = response_text(&response)
				.await
				.ok()
				.and_then(|text| serde_json::from_str(&text).ok())
				.unwrap_or_default();
			Err(FetchError::BadRequest(
				body.error
					.or(body.message)
					.unwrap_or_else(|| "Invalid brand name".into()),
			))
		}
		500 => Err(FetchError::Server),
		status => Err(FetchError::Status(status)),
	}
}
