//! Run configuration: file model, loading and validation

mod loader;
mod selector;

pub use loader::{CompressionLevel, Config, MinifyConfig, ModifyConfig};
pub use selector::{matches_any, validate_selector};
