mod metadata;
#[allow(clippy::module_inception)]
mod record;
mod status;

pub use metadata::{MetadataPatch, RecordMetadata, Supersession};
pub use record::Record;
pub use status::RecordStatus;
