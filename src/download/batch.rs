use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use super::materialize;
use crate::debrid::{JobService, JobSnapshot, MemberFile};
use crate::report::ProgressSink;

/// Aggregate result of one job's download loop.
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub attempted: usize,
    pub failed: usize,
    pub failures: Vec<ItemFailure>,
}

impl BatchSummary {
    pub fn completed_clean(&self) -> bool {
        self.failed == 0
    }
}

/// One failed item, kept for the end-of-job report.
#[derive(Debug)]
pub struct ItemFailure {
    /// 1-based position in the job's link list.
    pub position: usize,
    /// The placeholder link that was being processed.
    pub source: String,
    pub detail: String,
}

/// Drives a job's entire link list to completion, one link at a time.
///
/// Every failure is contained to its item: recorded, counted, and the loop
/// moves on. The batch itself never aborts.
pub struct BatchDownloader<'a, S: JobService + ?Sized> {
    service: &'a S,
    sink: &'a dyn ProgressSink,
}

impl<'a, S: JobService + ?Sized> BatchDownloader<'a, S> {
    pub fn new(service: &'a S, sink: &'a dyn ProgressSink) -> Self {
        Self { service, sink }
    }

    pub async fn download_all(&self, snapshot: &JobSnapshot, root: &Path) -> BatchSummary {
        let selected = snapshot.selected_files();
        let total = snapshot.links.len();

        // The declared-file and link lists pair up positionally. Flag a
        // length mismatch up front instead of silently mis-pairing.
        if !selected.is_empty() && selected.len() != total {
            let message = format!(
                "Remote metadata declares {} selected files for {} links; using served names where the lists diverge",
                selected.len(),
                total
            );
            debug!("{message}");
            self.sink.warn(&message);
        }

        let mut summary = BatchSummary::default();
        for (index, source) in snapshot.links.iter().enumerate() {
            summary.attempted += 1;
            if let Err(err) = self.download_one(index, source, &selected, root).await {
                let detail = format!("{err:#}");
                debug!(
                    "file {}/{} failed (source {}): {}",
                    index + 1,
                    total,
                    source,
                    detail
                );
                self.sink.warn(&format!(
                    "Error processing file {}/{}. Source: {}: {}",
                    index + 1,
                    total,
                    source,
                    detail
                ));
                summary.failed += 1;
                summary.failures.push(ItemFailure {
                    position: index + 1,
                    source: source.clone(),
                    detail,
                });
            }
        }
        summary
    }

    async fn download_one(
        &self,
        index: usize,
        source: &str,
        selected: &[&MemberFile],
        root: &Path,
    ) -> Result<()> {
        let resolved = self
            .service
            .unrestrict(source)
            .await
            .context("resolution failed")?;

        let dest = materialize::destination(root, index, selected, &resolved.filename);
        let shown = dest.strip_prefix(root).unwrap_or(&dest);

        if dest.exists() {
            self.sink
                .note(&format!("Already present, skipping: {}", shown.display()));
            return Ok(());
        }

        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("could not create {}", parent.display()))?;
        }

        self.sink.note(&format!("Downloading: {}", shown.display()));
        self.service
            .fetch_file(&resolved.download_url, &dest, self.sink)
            .await
            .context("transfer failed")?;
        Ok(())
    }
}
