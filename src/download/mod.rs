pub mod batch;
pub mod materialize;

pub use batch::{BatchDownloader, BatchSummary, ItemFailure};
pub use materialize::{destination, reconcile_extension, relative_path, safe_name};
