//! Defines the Priority enum for requirement task scheduling.
//!
//! Priority controls both the displayed urgency of a task and the numeric
//! weight the job queue uses to order dequeue. Lower numeric weight is
//! dequeued sooner.
//!
//! Revision History
//! - 2026-02-02T00:00:00Z @AI: Initial Priority enum with queue weight mapping.

/// Requirement task priority.
///
/// # Examples
///
/// ```
/// # use requirement_store::domain::priority::Priority;
/// assert_eq!(Priority::Critical.queue_weight(), 1);
/// assert_eq!(Priority::Low.queue_weight(), 4);
/// assert_eq!(Priority::default(), Priority::Medium);
/// ```
#[derive(Debug, Clone, Copy, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    /// Numeric queue weight; smaller values are dequeued sooner.
    pub fn queue_weight(&self) -> i64 {
        match self {
            Priority::Critical => 1,
            Priority::High => 2,
            Priority::Medium => 3,
            Priority::Low => 4,
        }
    }
}

impl std::default::Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Critical => "critical",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_weight_ordering() {
        assert!(Priority::Critical.queue_weight() < Priority::High.queue_weight());
        assert!(Priority::High.queue_weight() < Priority::Medium.queue_weight());
        assert!(Priority::Medium.queue_weight() < Priority::Low.queue_weight());
    }

    #[test]
    fn test_default_is_medium() {
        assert_eq!(Priority::default(), Priority::Medium);
    }

    #[test]
    fn test_display() {
        assert_eq!(Priority::Critical.to_string(), "critical");
        assert_eq!(Priority::Low.to_string(), "low");
    }
}
