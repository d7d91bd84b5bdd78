//! Reference implementations of the collaborator seams.
//!
//! Real deployments wire their own settings source, CommerceML parser, and
//! catalog backend; these in-process implementations keep the binary and
//! the integration tests self-contained.

mod env_settings;
mod json_parser;
mod memory_catalog;

pub use env_settings::{EnvSettingsProvider, StaticSettingsProvider};
pub use json_parser::JsonCatalogParser;
pub use memory_catalog::{MemoryCatalogStore, StoredProduct};
