pub mod config;
pub mod credentials;
pub mod debrid;
pub mod download;
pub mod pipeline;
pub mod report;

// Re-export commonly used types for easier access in tests
pub use config::{Config, ConfigManager};
pub use credentials::KeyStore;
pub use debrid::{
    DebridClient, DebridError, JobService, JobSnapshot, JobState, MemberFile, PollOptions,
    ResolvedLink,
};
pub use download::{BatchDownloader, BatchSummary, ItemFailure};
pub use pipeline::{PipelineOptions, run_job};
pub use report::{ConsoleSink, NullSink, ProgressSink};
