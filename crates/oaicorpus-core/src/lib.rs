//! Oaicorpus core: record model, type table, configuration.

pub mod config;
pub mod error;
pub mod models;
pub mod type_table;

pub use config::{CorpusConfig, DetectorConfig, RepositoryConfig};
pub use error::{CoreError, Result};
pub use models::*;
pub use type_table::{TypeTable, normalize_label};
