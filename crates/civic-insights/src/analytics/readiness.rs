use super::config::ScoringConfig;
use super::domain::{ServiceRecord, WardStatus};
use super::quality::{QualityDimension, QualityScorecard};
use chrono::NaiveDate;
use serde::Serialize;

/// Shortfall below the poor threshold that escalates a recommendation from
/// medium to high priority.
const HIGH_PRIORITY_SHORTFALL: f64 = 20.0;

/// Share of out-of-domain ward records that makes the anomaly rule
/// high priority.
const ANOMALY_HIGH_PRIORITY_SHARE: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationCategory {
    Data,
    Operational,
    Quality,
}

impl RecommendationCategory {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Data => "Data",
            Self::Operational => "Operational",
            Self::Quality => "Quality",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationPriority {
    High,
    Medium,
    Low,
}

impl RecommendationPriority {
    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

/// One structured follow-up produced by a triggered readiness rule.
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub category: RecommendationCategory,
    pub priority: RecommendationPriority,
    pub issue: String,
    pub recommendation: String,
    pub estimated_impact: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessLevel {
    PublicationReady,
    NeedsCuration,
    NotReady,
}

impl ReadinessLevel {
    pub const fn label(self) -> &'static str {
        match self {
            Self::PublicationReady => "Publication Ready",
            Self::NeedsCuration => "Needs Curation",
            Self::NotReady => "Not Ready",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReadinessMetrics {
    pub overall_score: f64,
    pub level: ReadinessLevel,
    pub critical_issues: Vec<String>,
    pub strengths: Vec<String>,
    pub recommendations: Vec<Recommendation>,
}

/// Combine the five dimension scores into the composite readiness view.
/// Rules run in a fixed order: the empty-set marker first, then one
/// threshold rule per dimension, then the record-level fact rules.
pub fn readiness_metrics(
    records: &[ServiceRecord],
    scorecard: &QualityScorecard,
    as_of: NaiveDate,
    config: &ScoringConfig,
) -> ReadinessMetrics {
    let overall_score = scorecard.mean_score();
    let level = if overall_score >= config.good_threshold {
        ReadinessLevel::PublicationReady
    } else if overall_score >= config.poor_threshold {
        ReadinessLevel::NeedsCuration
    } else {
        ReadinessLevel::NotReady
    };

    let mut critical_issues = Vec::new();
    let mut strengths = Vec::new();
    let mut recommendations = Vec::new();

    if records.is_empty() {
        critical_issues.push("No data available for the selected scope".to_string());
    }

    for (dimension, score) in scorecard.scores() {
        if score < config.poor_threshold {
            critical_issues.push(format!(
                "{} score {:.0} is below the publication floor of {:.0}",
                dimension.label(),
                score,
                config.poor_threshold
            ));
            recommendations.push(dimension_recommendation(dimension, score, config));
        } else if score > config.good_threshold {
            strengths.push(format!(
                "{} score {:.0} exceeds the open-data target of {:.0}",
                dimension.label(),
                score,
                config.good_threshold
            ));
        }
    }

    let stray_wards = records
        .iter()
        .filter(|record| matches!(record.ward_status(config.ward_count), WardStatus::OutOfDomain(_)))
        .count();
    if stray_wards > 0 {
        let share = stray_wards as f64 / records.len() as f64;
        let priority = if share > ANOMALY_HIGH_PRIORITY_SHARE {
            RecommendationPriority::High
        } else {
            RecommendationPriority::Medium
        };
        recommendations.push(Recommendation {
            category: RecommendationCategory::Data,
            priority,
            issue: format!(
                "{stray_wards} records carry ward codes outside the 1-{} domain",
                config.ward_count
            ),
            recommendation: "Map sentinel ward codes to real wards or a documented category"
                .to_string(),
            estimated_impact: "Restores geographic breakdowns for the affected records".to_string(),
        });
    }

    if let Some(latest_end) = records.iter().filter_map(|record| record.end_date).max() {
        let stale_days = (as_of - latest_end).num_days();
        if stale_days > config.stale_after_days {
            let priority = if stale_days > config.stale_after_days * 2 {
                RecommendationPriority::High
            } else {
                RecommendationPriority::Medium
            };
            recommendations.push(Recommendation {
                category: RecommendationCategory::Operational,
                priority,
                issue: format!("Latest completion is {stale_days} days old"),
                recommendation: "Re-establish the refresh pipeline from the source system"
                    .to_string(),
                estimated_impact: "Keeps the published set current within one refresh cycle"
                    .to_string(),
            });
        }
    }

    ReadinessMetrics {
        overall_score,
        level,
        critical_issues,
        strengths,
        recommendations,
    }
}

fn dimension_recommendation(
    dimension: QualityDimension,
    score: f64,
    config: &ScoringConfig,
) -> Recommendation {
    let priority = if score < config.poor_threshold - HIGH_PRIORITY_SHORTFALL {
        RecommendationPriority::High
    } else {
        RecommendationPriority::Medium
    };

    let (category, recommendation, estimated_impact) = match dimension {
        QualityDimension::Completeness => (
            RecommendationCategory::Data,
            "Enforce the required-field set at intake",
            "Raises the share of fully usable records",
        ),
        QualityDimension::Accuracy => (
            RecommendationCategory::Quality,
            "Add domain validation for wards, dates, and costs",
            "Removes out-of-domain values from downstream analysis",
        ),
        QualityDimension::Consistency => (
            RecommendationCategory::Quality,
            "Reconcile outcome, spend, and ownership fields before export",
            "Eliminates contradictory records from the published set",
        ),
        QualityDimension::Timeliness => (
            RecommendationCategory::Operational,
            "Increase the publication frequency for closed requests",
            "Keeps consumers within one refresh cycle of operations",
        ),
        QualityDimension::Metadata => (
            RecommendationCategory::Data,
            "Enrich notes and descriptive fields on closed requests",
            "Improves discoverability and reuse of the data set",
        ),
    };

    Recommendation {
        category,
        priority,
        issue: format!(
            "{} score {:.0} is below the publication floor",
            dimension.label(),
            score
        ),
        recommendation: recommendation.to_string(),
        estimated_impact: estimated_impact.to_string(),
    }
}
