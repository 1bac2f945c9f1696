use serde::{Deserialize, Serialize};

use super::domain::WARD_COUNT;

/// Thresholds and weights shared across the scoring pipeline.
///
/// The defaults mirror the tuning of the production dashboards; deployments
/// override individual fields rather than re-deriving the weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Upper bound of the valid ward domain [1, ward_count].
    pub ward_count: i32,
    /// Partial accuracy penalty for a record whose result is Unknown.
    pub unknown_result_penalty: f64,
    /// Dates further back than this many years count as accuracy violations.
    pub history_window_years: i32,
    /// Dates further ahead than this many years count as accuracy violations.
    pub future_window_years: i32,
    /// An Unknown-result record costing more than this is flagged as likely
    /// miscategorized by the consistency rules.
    pub suspicious_unknown_cost: f64,
    /// Days after which the recency sub-score decays to zero.
    pub recency_horizon_days: f64,
    /// Days of coverage gap that cost one timeliness point.
    pub coverage_gap_days_per_point: f64,
    pub recency_weight: f64,
    pub coverage_weight: f64,
    /// Coverage sub-score assumed when fewer than two dated records exist.
    pub default_coverage_score: f64,
    /// Minimum note length considered meaningful by the metadata rules.
    pub meaningful_note_len: usize,
    pub any_note_weight: f64,
    pub meaningful_note_weight: f64,
    /// Division-label cardinality that earns full value-diversity credit.
    pub division_cardinality_ceiling: f64,
    /// Dimension score below which readiness raises a critical issue.
    pub poor_threshold: f64,
    /// Dimension score above which readiness records a strength.
    pub good_threshold: f64,
    /// Days without a new end date before the data set counts as stale.
    pub stale_after_days: i64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            ward_count: WARD_COUNT,
            unknown_result_penalty: 0.5,
            history_window_years: 10,
            future_window_years: 1,
            suspicious_unknown_cost: 50_000.0,
            recency_horizon_days: 365.0,
            coverage_gap_days_per_point: 30.0,
            recency_weight: 0.6,
            coverage_weight: 0.4,
            default_coverage_score: 50.0,
            meaningful_note_len: 20,
            any_note_weight: 0.3,
            meaningful_note_weight: 0.7,
            division_cardinality_ceiling: 10.0,
            poor_threshold: 60.0,
            good_threshold: 80.0,
            stale_after_days: 180,
        }
    }
}
