//! Defines the QualityMetric domain entity.
//!
//! One row per (task, check attempt), written append-only by the Quality
//! Checker. The aggregate score is always derived, never
//! stored, so that the weighting formula has exactly one implementation.
//!
//! Revision History
//! - 2026-02-02T00:00:00Z @AI: Initial QualityMetric struct with derived aggregate().

/// One Quality Checker attempt's scores and feedback for a task.
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize, hexser::HexEntity)]
pub struct QualityMetric {
    /// Unique identifier for this metric row (UUID v4).
    pub id: String,

    /// Task this metric row belongs to.
    pub task_id: String,

    /// Holistic code-quality sub-score in [0, 100].
    pub code_quality_score: f64,

    /// Requirement-coverage sub-score in [0, 100].
    pub requirement_coverage_score: f64,

    /// Syntax-validity sub-score in [0, 100].
    pub syntax_validity_score: f64,

    /// Structured static-analysis payload, e.g. the evaluator's per-category scores.
    pub static_analysis: serde_json::Value,

    /// Free-text feedback from the evaluator prompt.
    pub feedback: String,

    /// UTC timestamp when this row was written.
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Weight applied to the code-quality sub-score in the aggregate formula.
pub const CODE_QUALITY_WEIGHT: f64 = 0.5;
/// Weight applied to the requirement-coverage sub-score in the aggregate formula.
pub const REQUIREMENT_COVERAGE_WEIGHT: f64 = 0.3;
/// Weight applied to the syntax-validity sub-score in the aggregate formula.
pub const SYNTAX_VALIDITY_WEIGHT: f64 = 0.2;
/// Minimum aggregate score required to pass the quality gate.
pub const QUALITY_GATE_THRESHOLD: f64 = 85.0;

impl QualityMetric {
    /// Builds a new metric row with a generated id and current timestamp.
    pub fn new(
        task_id: String,
        code_quality_score: f64,
        requirement_coverage_score: f64,
        syntax_validity_score: f64,
        static_analysis: serde_json::Value,
        feedback: String,
    ) -> Self {
        QualityMetric {
            id: uuid::Uuid::new_v4().to_string(),
            task_id,
            code_quality_score,
            requirement_coverage_score,
            syntax_validity_score,
            static_analysis,
            feedback,
            created_at: chrono::Utc::now(),
        }
    }

    /// The derived aggregate score: `0.5·cq + 0.3·rc + 0.2·sv`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use requirement_store::domain::quality_metric::QualityMetric;
    /// let metric = QualityMetric::new(
    ///     "t1".to_string(), 90.0, 80.0, 100.0, serde_json::json!({}), "good".to_string(),
    /// );
    /// assert_eq!(metric.aggregate(), 0.5 * 90.0 + 0.3 * 80.0 + 0.2 * 100.0);
    /// ```
    pub fn aggregate(&self) -> f64 {
        CODE_QUALITY_WEIGHT * self.code_quality_score
            + REQUIREMENT_COVERAGE_WEIGHT * self.requirement_coverage_score
            + SYNTAX_VALIDITY_WEIGHT * self.syntax_validity_score
    }

    /// True iff the aggregate score meets the gate threshold. An aggregate
    /// score of exactly 85 passes.
    pub fn passed(&self) -> bool {
        self.aggregate() >= QUALITY_GATE_THRESHOLD
    }
}
