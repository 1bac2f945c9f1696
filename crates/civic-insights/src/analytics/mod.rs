pub mod config;
pub mod domain;
pub mod groups;
pub mod histogram;
pub mod quality;
pub mod readiness;
pub mod timeseries;

pub use config::ScoringConfig;
pub use domain::{ServiceRecord, ServiceResult, WardStatus, WARD_COUNT};
pub use groups::{GroupAggregate, WardAnalysis};
pub use histogram::{BinStrategy, CostBin, CostDistribution};
pub use quality::{DimensionScore, QualityDimension, QualityScorecard};
pub use readiness::{ReadinessLevel, ReadinessMetrics, Recommendation};
pub use timeseries::MonthlyRollup;

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashSet;

/// Headline figures for the whole record set.
#[derive(Debug, Clone, Serialize)]
pub struct KpiSummary {
    pub total_services: usize,
    pub total_cost: f64,
    pub avg_cost: f64,
    pub pass_rate: f64,
    pub fail_rate: f64,
    pub unknown_rate: f64,
    pub divisions_represented: usize,
    pub wards_covered: usize,
}

/// The full analytics result for one record set. Everything here is a pure
/// function of the inputs and is recomputed from scratch on every call.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceAnalytics {
    pub as_of: NaiveDate,
    pub kpi: KpiSummary,
    pub quality: QualityScorecard,
    pub cost_distribution: CostDistribution,
    pub ward_analysis: WardAnalysis,
    pub division_breakdown: Vec<GroupAggregate>,
    pub division_ranking: Vec<groups::EfficiencyRank>,
    pub time_series: Vec<MonthlyRollup>,
    pub readiness: ReadinessMetrics,
}

/// Run the whole pipeline over a caller-filtered record set. `as_of` anchors
/// every date-relative rule so results are reproducible.
pub fn analyze(
    records: &[ServiceRecord],
    as_of: NaiveDate,
    config: &ScoringConfig,
) -> ServiceAnalytics {
    let quality = QualityScorecard::assess(records, as_of, config);
    let readiness = readiness::readiness_metrics(records, &quality, as_of, config);
    let division_breakdown = groups::division_breakdown(records);
    let division_ranking = groups::efficiency_ranking(&division_breakdown);

    ServiceAnalytics {
        as_of,
        kpi: kpi_summary(records, config),
        quality,
        cost_distribution: histogram::cost_distribution(records),
        ward_analysis: groups::ward_analysis(records, config),
        division_breakdown,
        division_ranking,
        time_series: timeseries::monthly_rollups(records),
        readiness,
    }
}

fn kpi_summary(records: &[ServiceRecord], config: &ScoringConfig) -> KpiSummary {
    let mut totals = groups::GroupTotals::default();
    let mut divisions: HashSet<String> = HashSet::new();
    let mut wards: HashSet<i32> = HashSet::new();

    for record in records {
        totals.observe(record);
        if let Some(division) = record.division() {
            divisions.insert(division.to_ascii_lowercase());
        }
        if let WardStatus::InDomain(ward) = record.ward_status(config.ward_count) {
            wards.insert(ward);
        }
    }

    KpiSummary {
        total_services: totals.count,
        total_cost: totals.cost_sum,
        avg_cost: totals.avg_cost(),
        pass_rate: totals.rate(totals.passed),
        fail_rate: totals.rate(totals.failed),
        unknown_rate: totals.rate(totals.unknown),
        divisions_represented: divisions.len(),
        wards_covered: wards.len(),
    }
}
