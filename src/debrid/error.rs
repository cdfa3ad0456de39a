use std::time::Duration;

use thiserror::Error;

/// Failures surfaced by the remote debrid service or the transport under it.
///
/// Item-level variants (`MissingDownloadUrl`, transport faults during a file
/// fetch) are converted into batch outcomes by the download loop; everything
/// else propagates to the caller and ends the job.
#[derive(Debug, Error)]
pub enum DebridError {
    /// The remote API answered with a non-success status. Status code and
    /// body are kept verbatim for diagnostics.
    #[error("remote call '{operation}' failed with HTTP {status}: {body}")]
    RemoteCall {
        operation: &'static str,
        status: u16,
        body: String,
    },

    /// The remote API answered with a success status but the payload could
    /// not be decoded into the expected shape.
    #[error("remote call '{operation}' returned an empty or undecodable response")]
    MalformedResponse { operation: &'static str },

    /// Link resolution succeeded at the HTTP level but carried no usable
    /// download URL.
    #[error("the debrid service did not return a download URL")]
    MissingDownloadUrl,

    /// The polled job reached a recognized terminal failure status.
    #[error("remote job failed with status '{status}'")]
    JobFailed { status: String },

    /// The job did not reach the ready status before the deadline.
    #[error("timed out after {elapsed:?} waiting for job {job_id}")]
    PollTimeout { job_id: String, elapsed: Duration },

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
