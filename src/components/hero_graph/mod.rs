//! Animated node-link hero visualization.
//!
//! Renders a decorative particle field on an HTML canvas with:
//! - A fixed set of wandering nodes with soft repulsion and anchor springs
//! - Proximity edges whose opacity falls off with distance
//! - Pointer attraction and highlight around the cursor
//! - Device-pixel-ratio aware sizing that follows the container
//! - A caller-controlled fade for scroll-driven cross-fades
//!
//! # Example
//!
//! ```ignore
//! use supply_risk_explorer::components::hero_graph::{GraphConfig, HeroGraph};
//!
//! let fade = RwSignal::new(1.0);
//! view! {
//!     <HeroGraph class="absolute inset-0 text-primary/30" fade_opacity=fade />
//!     <HeroGraph config=GraphConfig::dense() color="#94a3b8" />
//! }
//! ```

mod component;
pub mod config;
pub mod driver;
pub mod pointer;
pub mod render;
pub mod simulation;
pub mod surface;
pub mod theme;

pub use component::HeroGraph;
pub use config::{BoundaryPolicy, GraphConfig};
pub use pointer::PointerSample;
pub use render::{DrawTarget, RenderStyle};
pub use simulation::{Node, Simulation};
pub use surface::SurfaceMetrics;
pub use theme::Color;
