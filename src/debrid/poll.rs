use std::time::Duration;

use tokio::time::{Instant, sleep};
use tracing::debug;

use super::{DebridError, JobService, JobSnapshot, JobState};

/// How often to ask the service for job status, and for how long.
#[derive(Debug, Clone)]
pub struct PollOptions {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            timeout: Duration::from_secs(1800),
        }
    }
}

/// Poll the job until it reaches the ready status.
///
/// A recognized failure status fails immediately without waiting for the
/// deadline. The deadline is checked before every sleep and the sleep never
/// extends past it, so a timeout shorter than the poll interval is still
/// reported on time rather than one interval late.
pub async fn wait_for_ready<S: JobService + ?Sized>(
    service: &S,
    job_id: &str,
    options: &PollOptions,
) -> Result<JobSnapshot, DebridError> {
    let started = Instant::now();
    let deadline = started + options.timeout;

    loop {
        let snapshot = service.job_info(job_id).await?;
        match JobState::parse(&snapshot.status) {
            JobState::Ready => return Ok(snapshot),
            JobState::Failed(status) => return Err(DebridError::JobFailed { status }),
            JobState::Pending(status) => {
                debug!("job {} not ready yet (status '{}')", job_id, status);
                let remaining = deadline.saturating_duration_since(Instant::now());
                if remaining.is_zero() {
                    return Err(DebridError::PollTimeout {
                        job_id: job_id.to_string(),
                        elapsed: started.elapsed(),
                    });
                }
                sleep(remaining.min(options.interval)).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::debrid::ResolvedLink;
    use crate::report::ProgressSink;

    /// Serves a scripted sequence of statuses; the last one repeats.
    struct ScriptedService {
        statuses: Mutex<Vec<&'static str>>,
        queries: AtomicUsize,
    }

    impl ScriptedService {
        fn new(statuses: &[&'static str]) -> Self {
            let mut reversed: Vec<&'static str> = statuses.to_vec();
            reversed.reverse();
            Self {
                statuses: Mutex::new(reversed),
                queries: AtomicUsize::new(0),
            }
        }

        fn query_count(&self) -> usize {
            self.queries.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl JobService for ScriptedService {
        async fn submit_magnet(&self, _magnet: &str) -> Result<String, DebridError> {
            unreachable!("not exercised by poll tests")
        }

        async fn select_all(&self, _job_id: &str) -> Result<(), DebridError> {
            unreachable!("not exercised by poll tests")
        }

        async fn job_info(&self, _job_id: &str) -> Result<JobSnapshot, DebridError> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            let mut statuses = self.statuses.lock().unwrap();
            let status = if statuses.len() > 1 {
                statuses.pop().unwrap()
            } else {
                statuses[0]
            };
            Ok(JobSnapshot {
                status: status.to_string(),
                filename: "job".to_string(),
                links: Vec::new(),
                files: Vec::new(),
            })
        }

        async fn unrestrict(&self, _link: &str) -> Result<ResolvedLink, DebridError> {
            unreachable!("not exercised by poll tests")
        }

        async fn fetch_file(
            &self,
            _url: &str,
            _dest: &Path,
            _sink: &dyn ProgressSink,
        ) -> Result<u64, DebridError> {
            unreachable!("not exercised by poll tests")
        }
    }

    #[tokio::test(start_paused = true)]
    async fn returns_snapshot_once_ready() {
        let service = ScriptedService::new(&["queued", "downloading", "downloaded"]);
        let options = PollOptions {
            interval: Duration::from_secs(5),
            timeout: Duration::from_secs(60),
        };

        let snapshot = wait_for_ready(&service, "job-1", &options).await.unwrap();
        assert_eq!(snapshot.status, "downloaded");
        assert_eq!(service.query_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn failure_status_fails_without_waiting_for_deadline() {
        let service = ScriptedService::new(&["MAGNET_ERROR"]);
        let options = PollOptions {
            interval: Duration::from_secs(5),
            timeout: Duration::from_secs(3600),
        };

        let started = Instant::now();
        let err = wait_for_ready(&service, "job-1", &options).await.unwrap_err();
        assert!(matches!(err, DebridError::JobFailed { ref status } if status == "magnet_error"));
        assert_eq!(service.query_count(), 1);
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_shorter_than_interval_is_reported_on_time() {
        let service = ScriptedService::new(&["queued"]);
        let options = PollOptions {
            interval: Duration::from_secs(30),
            timeout: Duration::from_secs(2),
        };

        let started = Instant::now();
        let err = wait_for_ready(&service, "job-1", &options).await.unwrap_err();
        match err {
            DebridError::PollTimeout { job_id, elapsed } => {
                assert_eq!(job_id, "job-1");
                assert!(elapsed >= Duration::from_secs(2));
            }
            other => panic!("expected PollTimeout, got {other:?}"),
        }
        // One query at the start, one at the capped deadline. A full-interval
        // sleep would have pushed the second query out to 30s.
        assert_eq!(service.query_count(), 2);
        assert!(started.elapsed() < Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn keeps_polling_until_deadline() {
        let service = ScriptedService::new(&["downloading"]);
        let options = PollOptions {
            interval: Duration::from_secs(5),
            timeout: Duration::from_secs(12),
        };

        let err = wait_for_ready(&service, "job-9", &options).await.unwrap_err();
        assert!(matches!(err, DebridError::PollTimeout { .. }));
        // Queries at 0s, 5s, 10s and the final one at the 12s deadline.
        assert_eq!(service.query_count(), 4);
    }
}
