//! Hand-maintained directory of vetted suppliers.

use crate::suppliers::brand_slug;

/// How a partner can be reached.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Contact<'a> {
	/// A web page.
	Web(&'a str),
	/// An email address, without the `mailto:` prefix.
	Email(&'a str),
}

/// A vetted supplier listed in the directory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrustedPartner {
	/// Company name.
	pub name: &'static str,
	/// Country display name.
	pub country: &'static str,
	/// What the partner supplies.
	pub product_category: &'static str,
	/// Contact link (`https:` or `mailto:`), when published.
	pub contact_url: Option<&'static str>,
}

impl TrustedPartner {
	/// URL-safe identifier derived from the name.
	pub fn slug(&self) -> String {
		brand_slug(self.name).unwrap_or_default()
	}

	/// The contact link, split by kind.
	pub fn contact(&self) -> Option<Contact<'static>> {
		let url = self.contact_url?;
		Some(match url.strip_prefix("mailto:") {
			Some(address) => Contact::Email(address),
			None => Contact::Web(url),
		})
	}
}

/// The directory, in display order.
pub const TRUSTED_PARTNERS: &[TrustedPartner] = &[
	TrustedPartner {
		name: "EverGreen Fabrics",
		country: "Portugal",
		product_category: "Textiles",
		contact_url: Some("https://example.com/evergreen"),
	},
	TrustedPartner {
		name: "SolarPrint",
		country: "Poland",
		product_category: "Packaging",
		contact_url: None,
	},
	TrustedPartner {
		name: "Nordic Metals",
		country: "Sweden",
		product_category: "Metals",
		contact_url: Some("mailto:contact@nordic-metals.com"),
	},
];

/// Partners supplying `category`, case-insensitively. An empty category
/// matches every partner.
pub fn partners_in_category(category: &str) -> Vec<&'static TrustedPartner> {
	let category = category.trim();
	TRUSTED_PARTNERS
		.iter()
		.filter(|p| category.is_empty() || p.product_category.eq_ignore_ascii_case(category))
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn directory_lists_three_partners() {
		let names: Vec<&str> = TRUSTED_PARTNERS.iter().map(|p| p.name).collect();
		assert_eq!(names, ["EverGreen Fabrics", "SolarPrint", "Nordic Metals"]);
		assert_eq!(TRUSTED_PARTNERS[2].country, "Sweden");
	}

	#[test]
	fn contacts_are_split_by_kind() {
		assert_eq!(
			TRUSTED_PARTNERS[0].contact(),
			Some(Contact::Web("https://example.com/evergreen"))
		);
		assert_eq!(TRUSTED_PARTNERS[1].contact(), None);
		assert_eq!(
			TRUSTED_PARTNERS[2].contact(),
			Some(Contact::Email("contact@nordic-metals.com"))
		);
	}

	#[test]
	fn slugs_follow_brand_rules() {
		assert_eq!(TRUSTED_PARTNERS[0].slug(), "evergreen-fabrics");
		assert_eq!(TRUSTED_PARTNERS[2].slug(), "nordic-metals");
	}

	#[test]
	fn category_filter_ignores_case() {
		let metals = partners_in_category("METALS");
		assert_eq!(metals.len(), 1);
		assert_eq!(metals[0].name, "Nordic Metals");
		assert_eq!(partners_in_category(" ").len(), 3);
		assert!(partners_in_category("Toys").is_empty());
	}
}
