mod accuracy;
mod completeness;
mod consistency;
mod metadata;
mod timeliness;

pub use accuracy::assess as assess_accuracy;
pub use completeness::assess as assess_completeness;
pub use consistency::assess as assess_consistency;
pub use metadata::assess as assess_metadata;
pub use timeliness::assess as assess_timeliness;

use super::config::ScoringConfig;
use super::domain::ServiceRecord;
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityDimension {
    Completeness,
    Accuracy,
    Consistency,
    Timeliness,
    Metadata,
}

impl QualityDimension {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Completeness,
            Self::Accuracy,
            Self::Consistency,
            Self::Timeliness,
            Self::Metadata,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Completeness => "Completeness",
            Self::Accuracy => "Accuracy",
            Self::Consistency => "Consistency",
            Self::Timeliness => "Timeliness",
            Self::Metadata => "Metadata",
        }
    }
}

/// Outcome of one dimension calculator: a 0-100 score, a one-line summary,
/// issues raised only when the score falls under the dimension's threshold,
/// and recommendations that are never empty.
#[derive(Debug, Clone, Serialize)]
pub struct DimensionScore {
    pub score: f64,
    pub details: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<String>,
    pub recommendations: Vec<String>,
}

/// The five dimension scores for one record set.
#[derive(Debug, Clone, Serialize)]
pub struct QualityScorecard {
    pub completeness: DimensionScore,
    pub accuracy: DimensionScore,
    pub consistency: DimensionScore,
    pub timeliness: DimensionScore,
    pub metadata: DimensionScore,
}

impl QualityScorecard {
    /// Run the five calculators. Each is independent of the others; `as_of`
    /// anchors the date-window and recency rules so the whole scorecard is a
    /// pure function of its inputs.
    pub fn assess(records: &[ServiceRecord], as_of: NaiveDate, config: &ScoringConfig) -> Self {
        Self {
            completeness: completeness::assess(records),
            accuracy: accuracy::assess(records, as_of, config),
            consistency: consistency::assess(records, config),
            timeliness: timeliness::assess(records, as_of, config),
            metadata: metadata::assess(records, config),
        }
    }

    pub fn get(&self, dimension: QualityDimension) -> &DimensionScore {
        match dimension {
            QualityDimension::Completeness => &self.completeness,
            QualityDimension::Accuracy => &self.accuracy,
            QualityDimension::Consistency => &self.consistency,
            QualityDimension::Timeliness => &self.timeliness,
            QualityDimension::Metadata => &self.metadata,
        }
    }

    pub fn scores(&self) -> [(QualityDimension, f64); 5] {
        QualityDimension::ordered().map(|dimension| (dimension, self.get(dimension).score))
    }

    /// Arithmetic mean of the five dimension scores.
    pub fn mean_score(&self) -> f64 {
        let total: f64 = self.scores().iter().map(|(_, score)| score).sum();
        total / QualityDimension::ordered().len() as f64
    }
}

/// 100 x passing / total, clamped to [0, 100]. An empty set scores 100: with
/// nothing to check, nothing failed the check.
pub(crate) fn score_ratio(passing: f64, total: usize) -> f64 {
    if total == 0 {
        return 100.0;
    }
    (passing / total as f64 * 100.0).clamp(0.0, 100.0)
}
