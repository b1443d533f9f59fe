//! Domain records shared by the analyzer, optimizer, and session workflow.

mod analysis;
mod clarification;
mod optimized;
mod options;

pub use analysis::Analysis;
pub use clarification::Clarification;
pub use optimized::{MANUAL_REFINEMENT_NOTE, OptimizedResult};
pub use options::{CustomOptions, OptionSet};
