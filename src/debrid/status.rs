/// Status token the service reports once the content is fully materialized.
const READY_STATUS: &str = "downloaded";

/// Terminal failure tokens. Anything else that is not ready counts as
/// still pending.
const FAILURE_STATUSES: [&str; 4] = ["error", "magnet_error", "virus", "dead"];

/// Coarse classification of a raw job status string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobState {
    /// The job finished and its links can be resolved.
    Ready,
    /// The job reached a terminal failure status (normalized token inside).
    Failed(String),
    /// Not terminal yet; keep polling.
    Pending(String),
}

impl JobState {
    /// Classify a raw status string, case-insensitively.
    pub fn parse(raw: &str) -> Self {
        let token = raw.trim().to_ascii_lowercase();
        if token == READY_STATUS {
            JobState::Ready
        } else if FAILURE_STATUSES.contains(&token.as_str()) {
            JobState::Failed(token)
        } else {
            JobState::Pending(token)
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobState::Pending(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ready_matches_case_insensitively() {
        assert_eq!(JobState::parse("downloaded"), JobState::Ready);
        assert_eq!(JobState::parse("Downloaded"), JobState::Ready);
        assert_eq!(JobState::parse("DOWNLOADED"), JobState::Ready);
        assert_eq!(JobState::parse("  downloaded "), JobState::Ready);
    }

    #[test]
    fn every_failure_token_is_terminal() {
        for token in ["error", "magnet_error", "virus", "dead"] {
            let state = JobState::parse(token);
            assert_eq!(state, JobState::Failed(token.to_string()));
            assert!(state.is_terminal());

            let upper = JobState::parse(&token.to_uppercase());
            assert_eq!(upper, JobState::Failed(token.to_string()));
        }
    }

    #[test]
    fn unknown_statuses_are_pending() {
        for token in ["queued", "magnet_conversion", "downloading", "uploading", ""] {
            let state = JobState::parse(token);
            assert_eq!(state, JobState::Pending(token.to_string()));
            assert!(!state.is_terminal());
        }
    }
}
