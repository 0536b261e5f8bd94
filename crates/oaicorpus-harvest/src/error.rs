use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarvestError {
    /// A record without the metadata container the dialect guarantees.
    /// Fatal for the whole file: schema drift should surface, not be
    /// skipped over.
    #[error("malformed record in {file}: {detail}")]
    MalformedRecord { file: String, detail: String },

    /// New type vocabulary that is not in the table. The table needs an
    /// update; silently bucketing the label would misclassify.
    #[error("unknown type label: {0:?} (add it to the type table)")]
    UnknownTypeLabel(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error from {0}: {1}")]
    Api(String, String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Core(#[from] oaicorpus_core::CoreError),
}

pub type Result<T> = std::result::Result<T, HarvestError>;
