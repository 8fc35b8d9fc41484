//! Composite supplier risk scoring.
//!
//! Each supplier carries up to four 0-100 indicators. The composite score is
//! their weighted sum; missing indicators count as a neutral 50. Higher scores
//! mean lower risk.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Indicator value assumed when a supplier has no data for it.
pub const NEUTRAL_INDICATOR: f64 = 50.0;

/// Per-supplier risk indicators, each in `0..=100`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Indicators {
	/// Rule of law and governance quality of the facility's country.
	pub country_governance: Option<f64>,
	/// Labor rights record.
	pub labor_rights: Option<f64>,
	/// Environmental performance.
	pub environmental: Option<f64>,
	/// Compliance with sector standards.
	pub sector_compliance: Option<f64>,
}

/// A supplier facility as shown in the explorer.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
	/// Stable row identifier.
	pub id: String,
	/// Facility name.
	pub name: String,
	/// Open Supply Hub facility ID, when known.
	pub os_id: Option<String>,
	/// Country display name.
	pub country: String,
	/// WGS84 latitude.
	pub latitude: Option<f64>,
	/// WGS84 longitude.
	pub longitude: Option<f64>,
	/// Brands or lists that reported the facility.
	pub contributor: Option<String>,
	/// Kind of site, e.g. factory or smelter.
	pub facility_type: Option<String>,
	/// What the site produces.
	pub product_category: Option<String>,
	/// Risk inputs for the composite score.
	#[serde(default)]
	pub indicators: Indicators,
}

/// Weight of each indicator in the composite score.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RiskWeights {
	/// Weight of [`Indicators::country_governance`].
	pub country_governance: f64,
	/// Weight of [`Indicators::labor_rights`].
	pub labor_rights: f64,
	/// Weight of [`Indicators::environmental`].
	pub environmental: f64,
	/// Weight of [`Indicators::sector_compliance`].
	pub sector_compliance: f64,
}

impl Default for RiskWeights {
	fn default() -> Self {
		Self {
			country_governance: 0.30,
			labor_rights: 0.30,
			environmental: 0.25,
			sector_compliance: 0.15,
		}
	}
}

/// Traffic-light band of a score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RiskLevel {
	/// Score of 70 or more.
	Low,
	/// Score from 40 to 69.
	Medium,
	/// Score below 40.
	High,
}

impl RiskLevel {
	/// Band for a composite score.
	pub fn from_score(score: u8) -> Self {
		match score {
			70.. => RiskLevel::Low,
			40..=69 => RiskLevel::Medium,
			_ => RiskLevel::High,
		}
	}

	/// Human-readable band name.
	pub fn label(self) -> &'static str {
		match self {
			RiskLevel::Low => "Low risk",
			RiskLevel::Medium => "Medium risk",
			RiskLevel::High => "High risk",
		}
	}

	/// Traffic-light color name.
	pub fn color(self) -> &'static str {
		match self {
			RiskLevel::Low => "green",
			RiskLevel::Medium => "yellow",
			RiskLevel::High => "red",
		}
	}
}

/// Share of suppliers in one risk band, as a rounded percentage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BandShare {
	/// Band this share describes.
	pub level: RiskLevel,
	/// Rounded share of suppliers, `0..=100`.
	pub percent: u8,
}

fn to_score(value: f64) -> u8 {
	if value.is_nan() {
		return 0;
	}
	value.clamp(0.0, 100.0).round() as u8
}

/// Composite score with explicit weights.
pub fn compute_risk_score_with(supplier: &Supplier, weights: &RiskWeights) -> u8 {
	let i = &supplier.indicators;
	let value = |v: Option<f64>| v.unwrap_or(NEUTRAL_INDICATOR);
	to_score(
		value(i.country_governance) * weights.country_governance
			+ value(i.labor_rights) * weights.labor_rights
			+ value(i.environmental) * weights.environmental
			+ value(i.sector_compliance) * weights.sector_compliance,
	)
}

/// Composite score with the default weights.
pub fn compute_risk_score(supplier: &Supplier) -> u8 {
	compute_risk_score_with(supplier, &RiskWeights::default())
}

fn mean_score(scores: impl IntoIterator<Item = u8>) -> Option<u8> {
	let (sum, count) = scores
		.into_iter()
		.fold((0u32, 0u32), |(s, c), v| (s + v as u32, c + 1));
	(count > 0).then(|| to_score(sum as f64 / count as f64))
}

/// Rounded mean score of all suppliers; 0 when there are none.
pub fn aggregate_score(suppliers: &[Supplier]) -> u8 {
	mean_score(suppliers.iter().map(compute_risk_score)).unwrap_or(0)
}

/// Percentage of suppliers in each band, ordered Low, Medium, High.
pub fn summary_by_band(suppliers: &[Supplier]) -> [BandShare; 3] {
	let total = suppliers.len().max(1) as f64;
	let share = |level: RiskLevel| {
		let n = suppliers
			.iter()
			.filter(|s| RiskLevel::from_score(compute_risk_score(s)) == level)
			.count();
		BandShare {
			level,
			percent: to_score(n as f64 / total * 100.0),
		}
	};
	[
		share(RiskLevel::Low),
		share(RiskLevel::Medium),
		share(RiskLevel::High),
	]
}

/// Rounded mean score per country, keyed by trimmed lowercase country name.
pub fn country_scores(suppliers: &[Supplier]) -> BTreeMap<String, u8> {
	let mut by_country: BTreeMap<String, Vec<u8>> = BTreeMap::new();
	for supplier in suppliers {
		let key = supplier.country.trim().to_lowercase();
		if key.is_empty() {
			continue;
		}
		by_country
			.entry(key)
			.or_default()
			.push(compute_risk_score(supplier));
	}
	by_country
		.into_iter()
		.filter_map(|(country, scores)| mean_score(scores).map(|avg| (country, avg)))
		.collect()
}

/// Map hue for a score: 10 degrees (red) at 0 to 130 degrees (green) at 100.
pub fn score_to_hue(score: f64) -> f64 {
	let clamped = if score.is_nan() { 0.0 } else { score.clamp(0.0, 100.0) };
	10.0 + clamped / 100.0 * 120.0
}

/// One labelled subcategory in a supplier's breakdown.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IndicatorMetric {
	/// Display name of the subcategory.
	pub label: &'static str,
	/// Indicator value in `0..=100`, or `None` when there is no data.
	pub value: Option<f64>,
}

/// Subcategory breakdown shown next to a supplier's score. Import
/// dependency has no source yet and is always `None`.
pub fn indicator_breakdown(indicators: &Indicators) -> [IndicatorMetric; 5] {
	let metric = |label, value: Option<f64>| IndicatorMetric {
		label,
		value: value.filter(|v| !v.is_nan()).map(|v| v.clamp(0.0, 100.0)),
	};
	[
		metric("Democracy index", indicators.country_governance),
		metric("Regime hostility", indicators.sector_compliance),
		metric("Import dependency (strategic goods)", None),
		metric("Human rights/repressions", indicators.labor_rights),
		metric("ESG", indicators.environmental),
	]
}

/// A supplier paired with its composite score.
#[derive(Clone, Debug, PartialEq)]
pub struct RankedSupplier {
	/// The ranked supplier.
	pub supplier: Supplier,
	/// Its composite score.
	pub score: u8,
}

/// Apply the country filter and case-insensitive name query, then sort by
/// score, highest first.
pub fn filter_and_rank(
	suppliers: &[Supplier],
	country: Option<&str>,
	query: &str,
) -> Vec<RankedSupplier> {
	let query = query.trim().to_lowercase();
	let mut ranked: Vec<RankedSupplier> = suppliers
		.iter()
		.filter(|s| country.is_none_or(|c| s.country == c))
		.filter(|s| query.is_empty() || s.name.to_lowercase().contains(&query))
		.map(|s| RankedSupplier {
			supplier: s.clone(),
			score: compute_risk_score(s),
		})
		.collect();
	ranked.sort_by(|a, b| b.score.cmp(&a.score));
	ranked
}

/// Sorted, de-duplicated country names.
pub fn countries(suppliers: &[Supplier]) -> Vec<String> {
	let mut names: Vec<String> = suppliers.iter().map(|s| s.country.clone()).collect();
	names.sort();
	names.dedup();
	names
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;

	use super::*;

	fn supplier(name: &str, country: &str, values: [Option<f64>; 4]) -> Supplier {
		Supplier {
			id: name.to_lowercase(),
			name: name.into(),
			country: country.into(),
			indicators: Indicators {
				country_governance: values[0],
				labor_rights: values[1],
				environmental: values[2],
				sector_compliance: values[3],
			},
			..Supplier::default()
		}
	}

	#[test]
	fn weighted_score_rounds() {
		// 45*.3 + 50*.3 + 55*.25 + 60*.15 = 51.25
		let s = supplier("Alpha", "Bangladesh", [Some(45.0), Some(50.0), Some(55.0), Some(60.0)]);
		assert_eq!(compute_risk_score(&s), 51);
		// 88*.3 + 85*.3 + 80*.25 + 90*.15 = 85.4
		let s = supplier("Gamma", "Germany", [Some(88.0), Some(85.0), Some(80.0), Some(90.0)]);
		assert_eq!(compute_risk_score(&s), 85);
	}

	#[test]
	fn missing_indicators_are_neutral() {
		let s = supplier("Empty", "Nowhere", [None; 4]);
		assert_eq!(compute_risk_score(&s), 50);
	}

	#[test]
	fn out_of_range_indicators_are_clamped() {
		let s = supplier("Hot", "X", [Some(400.0); 4]);
		assert_eq!(compute_risk_score(&s), 100);
		let s = supplier("Cold", "X", [Some(-90.0); 4]);
		assert_eq!(compute_risk_score(&s), 0);
	}

	#[test]
	fn levels_follow_thresholds() {
		assert_eq!(RiskLevel::from_score(70), RiskLevel::Low);
		assert_eq!(RiskLevel::from_score(69), RiskLevel::Medium);
		assert_eq!(RiskLevel::from_score(40), RiskLevel::Medium);
		assert_eq!(RiskLevel::from_score(39), RiskLevel::High);
		assert_eq!(RiskLevel::High.color(), "red");
	}

	#[test]
	fn aggregate_and_bands() {
		let suppliers = vec![
			supplier("A", "Bangladesh", [Some(45.0), Some(50.0), Some(55.0), Some(60.0)]),
			supplier("B", "Vietnam", [Some(62.0), Some(58.0), Some(64.0), Some(68.0)]),
			supplier("C", "Germany", [Some(88.0), Some(85.0), Some(80.0), Some(90.0)]),
		];
		// Scores 51, 62, 85
		assert_eq!(aggregate_score(&suppliers), 66);

		let bands = summary_by_band(&suppliers);
		assert_eq!(bands[0], BandShare { level: RiskLevel::Low, percent: 33 });
		assert_eq!(bands[1], BandShare { level: RiskLevel::Medium, percent: 67 });
		assert_eq!(bands[2], BandShare { level: RiskLevel::High, percent: 0 });
	}

	#[test]
	fn empty_inputs() {
		assert_eq!(aggregate_score(&[]), 0);
		assert!(summary_by_band(&[]).iter().all(|b| b.percent == 0));
		assert!(country_scores(&[]).is_empty());
	}

	#[test]
	fn country_scores_group_case_insensitively() {
		let suppliers = vec![
			supplier("A", "Vietnam", [Some(60.0); 4]),
			supplier("B", " vietnam ", [Some(71.0); 4]),
			supplier("C", "", [Some(10.0); 4]),
		];
		let scores = country_scores(&suppliers);
		assert_eq!(scores.len(), 1);
		assert_eq!(scores["vietnam"], 66);
	}

	#[test]
	fn hue_spans_red_to_green() {
		assert_eq!(score_to_hue(0.0), 10.0);
		assert_eq!(score_to_hue(100.0), 130.0);
		assert_eq!(score_to_hue(250.0), 130.0);
	}

	#[test]
	fn filter_and_rank_sorts_descending() {
		let suppliers = vec![
			supplier("Alpha Textiles", "Bangladesh", [Some(45.0), Some(50.0), Some(55.0), Some(60.0)]),
			supplier("Gamma Metals", "Germany", [Some(88.0), Some(85.0), Some(80.0), Some(90.0)]),
			supplier("Beta Textiles", "Vietnam", [Some(62.0), Some(58.0), Some(64.0), Some(68.0)]),
		];

		let all = filter_and_rank(&suppliers, None, "");
		let names: Vec<&str> = all.iter().map(|r| r.supplier.name.as_str()).collect();
		assert_eq!(names, ["Gamma Metals", "Beta Textiles", "Alpha Textiles"]);

		let textiles = filter_and_rank(&suppliers, None, "TEXTILES");
		assert_eq!(textiles.len(), 2);

		let german = filter_and_rank(&suppliers, Some("Germany"), "");
		assert_eq!(german.len(), 1);
		assert_eq!(german[0].score, 85);

		assert_eq!(countries(&suppliers), ["Bangladesh", "Germany", "Vietnam"]);
	}

	#[test]
	fn breakdown_maps_indicators_to_subcategories() {
		let s = supplier("Alpha", "Bangladesh", [Some(45.0), Some(50.0), Some(55.0), Some(160.0)]);
		let breakdown = indicator_breakdown(&s.indicators);
		let labels: Vec<&str> = breakdown.iter().map(|m| m.label).collect();
		assert_eq!(
			labels,
			[
				"Democracy index",
				"Regime hostility",
				"Import dependency (strategic goods)",
				"Human rights/repressions",
				"ESG",
			]
		);
		assert_eq!(breakdown[0].value, Some(45.0));
		assert_eq!(breakdown[1].value, Some(100.0));
		assert_eq!(breakdown[2].value, None);
		assert_eq!(breakdown[3].value, Some(50.0));
		assert_eq!(breakdown[4].value, Some(55.0));
	}

	#[test]
	fn breakdown_keeps_missing_values_missing() {
		let s = supplier("Empty", "Nowhere", [None, Some(f64::NAN), None, None]);
		assert!(indicator_breakdown(&s.indicators).iter().all(|m| m.value.is_none()));
	}

	proptest! {
		#[test]
		fn score_and_hue_stay_in_range(
			values in proptest::array::uniform4(proptest::option::of(-500.0f64..500.0)),
		) {
			let s = supplier("P", "X", values);
			let score = compute_risk_score(&s);
			prop_assert!(score <= 100);
			let hue = score_to_hue(score as f64);
			prop_assert!((10.0..=130.0).contains(&hue));
		}
	}
}
