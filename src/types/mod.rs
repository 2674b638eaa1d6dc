mod dataset;
mod record;
mod source_error;

pub use dataset::{Dataset, Origin};
pub use record::Record;
pub use source_error::SourceError;
