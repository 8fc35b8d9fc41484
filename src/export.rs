//! CSV export of supplier lists.

use log::info;
use serde::Serialize;
use thiserror::Error;
use wasm_bindgen::prelude::*;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

use crate::risk::Supplier;

/// Errors while building or downloading an export.
#[derive(Debug, Error)]
pub enum ExportError {
	/// The CSV writer rejected a row.
	#[error("CSV error: {0}")]
	Csv(#[from] csv::Error),

	/// Flushing the in-memory writer failed.
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	/// The writer produced bytes that are not UTF-8.
	#[error("CSV output is not valid UTF-8: {0}")]
	Utf8(#[from] std::string::FromUtf8Error),

	/// A browser API call failed.
	#[error("browser error: {0}")]
	Browser(String),
}

impl From<JsValue> for ExportError {
	fn from(value: JsValue) -> Self {
		ExportError::Browser(value.as_string().unwrap_or_else(|| format!("{value:?}")))
	}
}

/// One exported row. Field order is the column order.
#[derive(Serialize)]
struct Row<'a> {
	id: &'a str,
	name: &'a str,
	os_id: Option<&'a str>,
	country: &'a str,
	latitude: Option<f64>,
	longitude: Option<f64>,
	contributor: Option<&'a str>,
	facility_type: Option<&'a str>,
	product_category: Option<&'a str>,
}

impl<'a> From<&'a Supplier> for Row<'a> {
	fn from(s: &'a Supplier) -> Self {
		Row {
			id: &s.id,
			name: &s.name,
			os_id: s.os_id.as_deref(),
			country: &s.country,
			latitude: s.latitude,
			longitude: s.longitude,
			contributor: s.contributor.as_deref(),
			facility_type: s.facility_type.as_deref(),
			product_category: s.product_category.as_deref(),
		}
	}
}

const HEADER: [&str; 9] = [
	"id",
	"name",
	"os_id",
	"country",
	"latitude",
	"longitude",
	"contributor",
	"facility_type",
	"product_category",
];

/// Renders `suppliers` as CSV with a header row. Missing values are empty
/// cells.
pub fn suppliers_csv(suppliers: &[Supplier]) -> Result<String, ExportError> {
	let mut writer = csv::WriterBuilder::new()
		.has_headers(false)
		.from_writer(Vec::new());
	writer.write_record(HEADER)?;
	for supplier in suppliers {
		writer.serialize(Row::from(supplier))?;
	}
	let bytes = writer.into_inner().map_err(|e| e.into_error())?;
	Ok(String::from_utf8(bytes)?)
}

/// `name` with a `.csv` extension.
pub fn export_filename(name: &str) -> String {
	if name.ends_with(".csv") {
		name.to_owned()
	} else {
		format!("{name}.csv")
	}
}

/// Download name for a brand's full supplier list, falling back to a
/// generic name before any brand is looked up.
pub fn brand_export_name(brand: Option<&str>) -> String {
	let brand = brand.map(str::trim).filter(|b| !b.is_empty());
	export_filename(&format!("{}-suppliers", brand.unwrap_or("open-supply")))
}

/// Offers `suppliers` to the user as a CSV download named `filename`.
pub fn download_csv(filename: &str, suppliers: &[Supplier]) -> Result<(), ExportError> {
	let csv = suppliers_csv(suppliers)?;
	let document = web_sys::window()
		.and_then(|w| w.document())
		.ok_or_else(|| ExportError::Browser("no document".into()))?;

	let parts = js_sys::Array::of1(&JsValue::from_str(&csv));
	let options = BlobPropertyBag::new();
	options.set_type("text/csv;charset=utf-8;");
	let blob = Blob::new_with_str_sequence_and_options(&parts, &options)?;
	let url = Url::create_object_url_with_blob(&blob)?;

	let anchor = document
		.create_element("a")?
		.dyn_into::<HtmlAnchorElement>()
		.map_err(JsValue::from)?;
	anchor.set_href(&url);
	anchor.set_download(&export_filename(filename));
	anchor.click();
	Url::revoke_object_url(&url)?;
	info!("export: {} suppliers to {filename}", suppliers.len());
	Ok(())
}
