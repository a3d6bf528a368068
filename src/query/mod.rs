//! Query-side pipeline: normalization, classification, weighting
//!
//! Turns a raw user query into the typed terms the staged orchestrator
//! feeds to the index engine.

pub mod classify;
pub mod normalize;
pub mod term;
pub mod weight;

pub use classify::select_anchor;
pub use normalize::normalize;
pub use term::{QueryTerm, TermSet};
pub use weight::{Stage, WeightState};
