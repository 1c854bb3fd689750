//! Lifecycle states of a queued job. Distinct from `TaskStatus` in
//! `requirement_store`: a job can be `Delayed` awaiting a retry backoff
//! while the task it belongs to is still sitting at `InProgress`.
//!
//! Revision History
//! - 2026-02-02T00:00:00Z @AI: Initial JobState definition.

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Waiting,
    Active,
    Completed,
    Failed,
    Delayed,
}

impl JobState {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobState::Waiting => "waiting",
            JobState::Active => "active",
            JobState::Completed => "completed",
            JobState::Failed => "failed",
            JobState::Delayed => "delayed",
        }
    }

    pub fn parse(raw: &str) -> std::option::Option<Self> {
        match raw {
            "waiting" => std::option::Option::Some(JobState::Waiting),
            "active" => std::option::Option::Some(JobState::Active),
            "completed" => std::option::Option::Some(JobState::Completed),
            "failed" => std::option::Option::Some(JobState::Failed),
            "delayed" => std::option::Option::Some(JobState::Delayed),
            _ => std::option::Option::None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Completed | JobState::Failed)
    }
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trips_through_as_str_and_parse() {
        for state in [JobState::Waiting, JobState::Active, JobState::Completed, JobState::Failed, JobState::Delayed] {
            assert_eq!(JobState::parse(state.as_str()), std::option::Option::Some(state));
        }
    }

    #[test]
    fn test_only_completed_and_failed_are_terminal() {
        assert!(JobState::Completed.is_terminal());
        assert!(JobState::Failed.is_terminal());
        assert!(!JobState::Waiting.is_terminal());
        assert!(!JobState::Active.is_terminal());
        assert!(!JobState::Delayed.is_terminal());
    }
}
