pub mod client;
pub mod error;
pub mod poll;
pub mod status;

pub use client::DebridClient;
pub use error::DebridError;
pub use poll::{PollOptions, wait_for_ready};
pub use status::JobState;

use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;

use crate::report::ProgressSink;

/// Current state of a remote job as reported by the debrid service.
///
/// Snapshots are never mutated locally; callers re-fetch to observe progress.
#[derive(Debug, Clone, Deserialize)]
pub struct JobSnapshot {
    #[serde(default)]
    pub status: String,
    /// Declared container/root name proposed by the remote service.
    #[serde(default)]
    pub filename: String,
    /// Placeholder links, one per payload file, to be resolved before fetch.
    #[serde(default)]
    pub links: Vec<String>,
    #[serde(default)]
    pub files: Vec<MemberFile>,
}

impl JobSnapshot {
    /// Member files the remote service actually included in the payload.
    /// Index positions correspond to `links` when both lists line up.
    pub fn selected_files(&self) -> Vec<&MemberFile> {
        self.files.iter().filter(|file| file.selected == 1).collect()
    }
}

/// One file of the job as declared by remote metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct MemberFile {
    #[serde(default)]
    pub path: String,
    /// 1 when the file was selected for materialization.
    #[serde(default)]
    pub selected: u8,
}

/// A placeholder link exchanged for a directly fetchable URL.
#[derive(Debug, Clone, Deserialize)]
pub struct ResolvedLink {
    #[serde(rename = "download", default)]
    pub download_url: String,
    /// File name the server will actually serve, authoritative for the
    /// content type even when metadata disagrees.
    #[serde(default)]
    pub filename: String,
}

/// The remote operations the acquisition pipeline is built on.
///
/// `DebridClient` is the production implementation; tests substitute
/// scripted fakes.
#[async_trait]
pub trait JobService: Send + Sync {
    /// Submit a magnet link, returning the job id assigned by the service.
    async fn submit_magnet(&self, magnet: &str) -> Result<String, DebridError>;

    /// Instruct the service to include every member file of the job.
    async fn select_all(&self, job_id: &str) -> Result<(), DebridError>;

    /// Fetch the current job state.
    async fn job_info(&self, job_id: &str) -> Result<JobSnapshot, DebridError>;

    /// Exchange a placeholder link for a directly fetchable URL.
    async fn unrestrict(&self, link: &str) -> Result<ResolvedLink, DebridError>;

    /// Stream the body of `url` to `dest`, returning the bytes written.
    async fn fetch_file(
        &self,
        url: &str,
        dest: &Path,
        sink: &dyn ProgressSink,
    ) -> Result<u64, DebridError>;
}
