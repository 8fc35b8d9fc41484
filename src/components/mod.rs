//! UI components.

pub mod hero_graph;
pub mod radial_score;

pub use radial_score::RadialScore;
