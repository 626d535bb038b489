pub mod config;
pub mod error;
pub mod publish;
pub mod render;
pub mod safety;
pub mod structure;
pub mod types;

pub use config::{Config, ModelChoice, SearchProvider};
pub use error::DraftsmithError;
pub use render::{expand_markers, render};
pub use safety::{classify, safe_pool, SafePool};
pub use structure::score_structure;
pub use types::*;
