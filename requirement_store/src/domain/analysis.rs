//! Defines the Analysis value object produced by the Analyzer.
//!
//! Analysis is transient: it is produced by the Analyzer, threaded through
//! the Generator and Quality Checker, and persisted only as the JSON payload
//! inside `TaskDetails::analysis`. It is not a HEXSER
//! entity because it has no independent identity or repository.
//!
//! Revision History
//! - 2026-02-02T00:00:00Z @AI: Initial Analysis struct mirroring the Analyzer contract.

/// Constraint classification used by `Analysis::dependencies` entries that
/// the Analyzer tags during normalization.
#[derive(Debug, Clone, Copy, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstraintType {
    Technical,
    Business,
    Security,
}

impl ConstraintType {
    /// Normalizes a free-form constraint label to one of the three known
    /// types. `security` is preserved as distinct from `business`: both
    /// substring-match independently rather than one mapping onto the other.
    pub fn normalize(raw: &str) -> Self {
        let lower = raw.to_lowercase();
        if lower.contains("security") || lower.contains("安全") {
            ConstraintType::Security
        } else if lower.contains("business") || lower.contains("业务") {
            ConstraintType::Business
        } else if lower.contains("technical") || lower.contains("技术") {
            ConstraintType::Technical
        } else {
            ConstraintType::Technical
        }
    }
}

impl std::default::Default for ConstraintType {
    fn default() -> Self {
        ConstraintType::Technical
    }
}

/// Structured decomposition of a requirement, produced by the Analyzer.
#[derive(Debug, Clone, Default, serde::Deserialize, serde::Serialize)]
pub struct Analysis {
    pub title: String,
    pub functionality: String,
    pub components: std::vec::Vec<String>,
    pub inputs_outputs: String,
    pub dependencies: String,
    pub file_structure: std::vec::Vec<String>,
    pub implementation_strategy: std::option::Option<String>,
}

impl Analysis {
    /// The most common first path segment across `file_structure`, used by
    /// the Generator to derive the default output path.
    /// Returns `None` if `file_structure` is empty.
    pub fn mode_first_segment(&self) -> std::option::Option<String> {
        if self.file_structure.is_empty() {
            return std::option::Option::None;
        }
        let mut counts: std::collections::HashMap<String, usize> = std::collections::HashMap::new();
        for path in self.file_structure.iter() {
            let normalized = path.replace('\\', "/");
            if let std::option::Option::Some(first) = normalized.split('/').next() {
                if !first.is_empty() {
                    *counts.entry(first.to_string()).or_insert(0) += 1;
                }
            }
        }
        counts
            .into_iter()
            .max_by_key(|(_, count)| *count)
            .map(|(segment, _)| segment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_type_security_preserved_distinct_from_business() {
        assert_eq!(ConstraintType::normalize("must satisfy security review"), ConstraintType::Security);
        assert_eq!(ConstraintType::normalize("business rule: max 3 retries"), ConstraintType::Business);
        assert_ne!(ConstraintType::normalize("security"), ConstraintType::normalize("business"));
    }

    #[test]
    fn test_constraint_type_unknown_defaults_technical() {
        assert_eq!(ConstraintType::normalize("gibberish"), ConstraintType::Technical);
    }

    #[test]
    fn test_mode_first_segment_empty_file_structure() {
        let analysis = Analysis::default();
        assert!(analysis.mode_first_segment().is_none());
    }

    #[test]
    fn test_mode_first_segment_picks_most_common() {
        let analysis = Analysis {
            file_structure: vec![
                "src/a.ts".to_string(),
                "src/b.ts".to_string(),
                "test/c.ts".to_string(),
            ],
            ..Analysis::default()
        };
        assert_eq!(analysis.mode_first_segment(), Some("src".to_string()));
    }
}
