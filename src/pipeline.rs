use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::debrid::{JobService, PollOptions, poll};
use crate::download::{BatchDownloader, BatchSummary, materialize};
use crate::report::ProgressSink;

/// Everything one job run needs besides the magnet itself.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Root under which the job's safe-named folder is created.
    pub output_dir: PathBuf,
    pub poll: PollOptions,
}

/// Run one magnet through the full acquisition sequence: submit, select all
/// payload files, poll to ready, then download every link into a folder named
/// after the job.
///
/// Item-level download failures end up in the returned summary; job-level
/// failures (submission, selection, polling) are returned as errors.
pub async fn run_job<S: JobService + ?Sized>(
    service: &S,
    sink: &dyn ProgressSink,
    options: &PipelineOptions,
    magnet: &str,
) -> Result<BatchSummary> {
    sink.note("Adding magnet to the debrid service...");
    let job_id = service
        .submit_magnet(magnet)
        .await
        .context("Failed to submit magnet")?;
    sink.note(&format!("Magnet added. Job id: {job_id}"));

    sink.note("Selecting all files in the job...");
    service
        .select_all(&job_id)
        .await
        .context("Failed to select the job's files")?;

    sink.note("Waiting for the debrid service to finish the job...");
    let snapshot = poll::wait_for_ready(service, &job_id, &options.poll)
        .await
        .context("Job did not become ready")?;
    sink.note("Job is ready. Downloading files...");

    let root = options.output_dir.join(materialize::safe_name(&snapshot.filename));
    std::fs::create_dir_all(&root)
        .with_context(|| format!("Failed to create download directory {}", root.display()))?;

    let downloader = BatchDownloader::new(service, sink);
    Ok(downloader.download_all(&snapshot, &root).await)
}
