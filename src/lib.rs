//! supply-risk-explorer: supplier risk overview for brands, built around an
//! animated node-link hero.
//!
//! The crate renders a client-side app: a decorative [`HeroGraph`] that fades
//! out as the page scrolls, a brand search backed by the open supplier
//! endpoint, a ranked supplier table with traffic-light risk scores and a
//! per-supplier indicator breakdown, CSV export, and a directory of vetted
//! partners.

use leptos::ev::{self, SubmitEvent};
use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;
pub mod export;
pub mod partners;
pub mod risk;
pub mod suppliers;

pub use components::hero_graph::{GraphConfig, HeroGraph, PointerSample};
pub use risk::{RiskLevel, Supplier};

use components::RadialScore;
use components::hero_graph::theme::clamp_unit;
use partners::{Contact, TRUSTED_PARTNERS};
use risk::{
	aggregate_score, countries, filter_and_rank, indicator_breakdown, score_to_hue, summary_by_band,
};
use suppliers::{brand_slug, fetch_brand_suppliers, mock_suppliers};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("supply-risk-explorer: logging initialized");
}

/// Load suppliers from a script element with id="supplier-data".
/// Expected format: the supplier endpoint's JSON response.
fn load_supplier_data() -> Option<Vec<Supplier>> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("supplier-data")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match suppliers::parse_response(&json_text) {
		Ok(data) => {
			info!("supply-risk-explorer: loaded {} embedded suppliers", data.len());
			Some(data)
		}
		Err(e) => {
			warn!("supply-risk-explorer: failed to parse supplier data: {}", e);
			None
		}
	}
}

/// Hero opacity for a scroll offset: opaque at the top, transparent once a
/// full viewport has scrolled past.
fn fade_for_scroll(scroll_y: f64, viewport_height: f64) -> f64 {
	if viewport_height.is_nan() || viewport_height <= 0.0 {
		return 1.0;
	}
	1.0 - clamp_unit(scroll_y / viewport_height)
}

fn current_hero_fade() -> f64 {
	let Some(window) = web_sys::window() else {
		return 1.0;
	};
	let scroll_y = window.scroll_y().unwrap_or(0.0);
	let height = window
		.inner_height()
		.ok()
		.and_then(|h| h.as_f64())
		.unwrap_or(0.0);
	fade_for_scroll(scroll_y, height)
}

/// Main application component.
/// Shows the hero, the brand search, and the ranked supplier table.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let suppliers = RwSignal::new(load_supplier_data().unwrap_or_else(mock_suppliers));
	let brand = RwSignal::new(None::<String>);
	let search = RwSignal::new(String::new());
	let loading = RwSignal::new(false);
	let error = RwSignal::new(None::<String>);
	let country = RwSignal::new(None::<String>);
	let query = RwSignal::new(String::new());

	let fade = RwSignal::new(current_hero_fade());
	let scroll = window_event_listener(ev::scroll, move |_| fade.set(current_hero_fade()));
	on_cleanup(move || scroll.remove());

	let ranked = Memo::new(move |_| {
		filter_and_rank(&suppliers.read(), country.read().as_deref(), &query.read())
	});
	let aggregate = Memo::new(move |_| aggregate_score(&suppliers.read()));
	let bands = Memo::new(move |_| summary_by_band(&suppliers.read()));

	let on_search = move |ev: SubmitEvent| {
		ev.prevent_default();
		let Some(slug) = brand_slug(&search.get_untracked()) else {
			error.set(Some("Enter a brand name".into()));
			return;
		};
		info!("supply-risk-explorer: looking up {slug:?}");
		brand.set(Some(slug.clone()));
		error.set(None);
		loading.set(true);
		wasm_bindgen_futures::spawn_local(async move {
			match fetch_brand_suppliers(&slug).await {
				Ok(list) => {
					country.set(None);
					suppliers.set(list);
				}
				Err(e) => {
					warn!("supply-risk-explorer: lookup for {slug:?} failed: {e}");
					error.set(Some(e.to_string()));
				}
			}
			loading.set(false);
		});
	};

	// Exports the brand's full list; table filters do not apply.
	let on_export = move |_| {
		let name = export::brand_export_name(brand.get_untracked().as_deref());
		if let Err(e) = export::download_csv(&name, &suppliers.read_untracked()) {
			warn!("supply-risk-explorer: export failed: {e}");
			error.set(Some(e.to_string()));
		}
	};

	view! {
		<Html attr:lang="en" attr:dir="ltr" />
		<Title text="Open Supply Risk Explorer" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />
		<Meta name="description" content="Supplier risk overview built on open supply chain data." />

		<section class="hero">
			<HeroGraph class="hero-graph" fade_opacity=fade />
			<div class="hero-content">
				<h1>"Open Supply Risk Explorer"</h1>
				<p class="subtitle">"See where a brand's products are made and how risky those facilities are."</p>
				<form class="brand-search" on:submit=on_search>
					<input
						type="text"
						placeholder="Search a brand"
						prop:value=move || search.get()
						on:input=move |ev| search.set(event_target_value(&ev))
					/>
					<button type="submit" disabled=move || loading.get()>
						{move || if loading.get() { "Searching..." } else { "Search" }}
					</button>
				</form>
				{move || error.get().map(|e| view! { <p class="error">{e}</p> })}
			</div>
		</section>

		<section class="suppliers">
			<header class="summary">
				<h2>
					{move || brand.get().unwrap_or_else(|| "Sample portfolio".into())}
				</h2>
				<p class="aggregate" style=move || format!("color: hsl({:.0}, 70%, 40%)", score_to_hue(aggregate.get() as f64))>
					{move || aggregate.get()}
					" / 100"
				</p>
				<ul class="bands">
					{move || {
						bands
							.get()
							.into_iter()
							.map(|b| view! { <li class=b.level.color()>{b.level.label()}": "{b.percent}"%"</li> })
							.collect_view()
					}}
				</ul>
			</header>

			<div class="filters">
				<select
					prop:value=move || country.get().unwrap_or_default()
					on:change=move |ev| {
						let value = event_target_value(&ev);
						country.set((!value.is_empty()).then_some(value));
					}
				>
					<option value="">"All countries"</option>
					<For
						each=move || countries(&suppliers.read())
						key=|name| name.clone()
						children=move |name: String| {
							let label = name.clone();
							view! { <option value=name>{label}</option> }
						}
					/>
				</select>
				<input
					type="search"
					placeholder="Filter by name"
					prop:value=move || query.get()
					on:input=move |ev| query.set(event_target_value(&ev))
				/>
				<button on:click=on_export>"Export CSV"</button>
			</div>

			<table class="supplier-table">
				<thead>
					<tr>
						<th>"Supplier"</th>
						<th>"OS ID"</th>
						<th>"Country"</th>
						<th>"Source (contributor)"</th>
						<th>"Facility"</th>
						<th>"Products"</th>
						<th>"Score"</th>
						<th>"Risk"</th>
					</tr>
				</thead>
				<tbody>
					<For
						each=move || ranked.get()
						key=|r| (r.supplier.id.clone(), r.score)
						children=move |r| {
							let level = RiskLevel::from_score(r.score);
							let breakdown = indicator_breakdown(&r.supplier.indicators);
							let s = r.supplier;
							view! {
								<tr>
									<td>{s.name}</td>
									<td class="os-id">{s.os_id.unwrap_or_else(|| "n/a".into())}</td>
									<td>{s.country}</td>
									<td>{s.contributor.unwrap_or_else(|| "n/a".into())}</td>
									<td>{s.facility_type.unwrap_or_default()}</td>
									<td>{s.product_category.unwrap_or_default()}</td>
									<td class="score">
										<RadialScore value=Some(r.score as f64) />
									</td>
									<td class=format!("risk risk-{}", level.color())>
										{level.label()}
										<details class="breakdown">
											<summary>"Subcategory breakdown"</summary>
											<div class="metrics">
												{breakdown
													.into_iter()
													.map(|m| view! { <RadialScore value=m.value size=32.0 stroke=4.0 label=m.label /> })
													.collect_view()}
											</div>
										</details>
									</td>
								</tr>
							}
						}
					/>
				</tbody>
			</table>
			<Show when=move || ranked.with(Vec::is_empty)>
				<p class="empty">"No suppliers match the current filters."</p>
			</Show>
		</section>

		<section class="partners">
			<h2>"Trusted Partners"</h2>
			<p class="subtitle">"Pre-vetted, safe suppliers. Maintained manually."</p>
			<table class="partner-table">
				<thead>
					<tr>
						<th>"Supplier"</th>
						<th>"Country"</th>
						<th>"Category"</th>
						<th>"Contact"</th>
					</tr>
				</thead>
				<tbody>
					{TRUSTED_PARTNERS
						.iter()
						.map(|p| {
							let contact = match p.contact() {
								Some(Contact::Web(url)) => {
									view! { <a href=url target="_blank" rel="noopener noreferrer">"Contact"</a> }.into_any()
								}
								Some(Contact::Email(address)) => {
									view! { <a href=format!("mailto:{address}")>"Contact"</a> }.into_any()
								}
								None => view! { <span class="muted">"n/a"</span> }.into_any(),
							};
							view! {
								<tr id=p.slug()>
									<td>{p.name}</td>
									<td>{p.country}</td>
									<td>{p.product_category}</td>
									<td>{contact}</td>
								</tr>
							}
						})
						.collect_view()}
				</tbody>
			</table>
		</section>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn hero_fades_over_one_viewport() {
		assert_eq!(fade_for_scroll(0.0, 800.0), 1.0);
		assert_eq!(fade_for_scroll(400.0, 800.0), 0.5);
		assert_eq!(fade_for_scroll(1600.0, 800.0), 0.0);
		assert_eq!(fade_for_scroll(-50.0, 800.0), 1.0);
	}

	#[test]
	fn hero_stays_opaque_without_viewport() {
		assert_eq!(fade_for_scroll(300.0, 0.0), 1.0);
		assert_eq!(fade_for_scroll(300.0, f64::NAN), 1.0);
	}
}
