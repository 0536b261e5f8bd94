//! Oaicorpus harvest: OAI-PMH harvesting, dialect readers, and the
//! metadata normalization pipeline.

pub mod classify;
pub mod client;
pub mod ddc;
pub mod dialects;
pub mod dumps;
pub mod error;
pub mod extract;
pub mod http;
pub mod improve;
pub mod language;
pub mod merge;
pub mod pipeline;
pub mod select;

pub use error::{HarvestError, Result};
pub use extract::{Extraction, Extractor};
pub use pipeline::Corpus;
