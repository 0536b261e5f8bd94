pub mod raw;
pub mod record;

pub use raw::{FieldMap, PublicationHeader, RawField, UNKNOWN};
pub use record::{
    Cluster, Contributor, Dialect, DocType, NormalizedRecord, Publisher, Role, Subject,
};
