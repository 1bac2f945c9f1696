use super::config::ScoringConfig;
use super::domain::{ServiceRecord, ServiceResult, WardStatus};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Running totals for one group, filled by a single pass over the record
/// set. Missing costs count as zero spend.
#[derive(Debug, Default, Clone)]
pub(crate) struct GroupTotals {
    pub(crate) count: usize,
    pub(crate) cost_sum: f64,
    pub(crate) passed: usize,
    pub(crate) failed: usize,
    pub(crate) unknown: usize,
}

impl GroupTotals {
    pub(crate) fn observe(&mut self, record: &ServiceRecord) {
        self.count += 1;
        self.cost_sum += record.estimated_cost.unwrap_or(0.0).max(0.0);
        match record.result {
            ServiceResult::Pass => self.passed += 1,
            ServiceResult::Fail => self.failed += 1,
            _ => self.unknown += 1,
        }
    }

    pub(crate) fn rate(&self, part: usize) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            part as f64 / self.count as f64 * 100.0
        }
    }

    pub(crate) fn avg_cost(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.cost_sum / self.count as f64
        }
    }

    fn into_aggregate(self, key: String) -> GroupAggregate {
        let avg_cost = self.avg_cost();
        let pass_rate = self.rate(self.passed);
        GroupAggregate {
            key,
            total_count: self.count,
            total_cost: self.cost_sum,
            avg_cost,
            pass_rate,
            fail_rate: self.rate(self.failed),
            unknown_rate: self.rate(self.unknown),
            cost_efficiency: cost_efficiency(pass_rate, avg_cost),
        }
    }
}

/// Aggregate statistics for one categorical group (a ward or a division).
#[derive(Debug, Clone, Serialize)]
pub struct GroupAggregate {
    pub key: String,
    pub total_count: usize,
    pub total_cost: f64,
    pub avg_cost: f64,
    pub pass_rate: f64,
    pub fail_rate: f64,
    pub unknown_rate: f64,
    pub cost_efficiency: f64,
}

/// Success per thousand currency units spent.
pub fn cost_efficiency(pass_rate: f64, avg_cost: f64) -> f64 {
    if avg_cost > 0.0 {
        (pass_rate / 100.0) / (avg_cost / 1000.0)
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EfficiencyRank {
    pub rank: usize,
    pub key: String,
    pub cost_efficiency: f64,
}

/// Rank groups by descending efficiency. The sort is stable, so ties keep
/// their original key order; ranks are 1-based sequence positions.
pub fn efficiency_ranking(groups: &[GroupAggregate]) -> Vec<EfficiencyRank> {
    let mut ordered: Vec<&GroupAggregate> = groups.iter().collect();
    ordered.sort_by(|a, b| b.cost_efficiency.total_cmp(&a.cost_efficiency));
    ordered
        .into_iter()
        .enumerate()
        .map(|(index, group)| EfficiencyRank {
            rank: index + 1,
            key: group.key.clone(),
            cost_efficiency: group.cost_efficiency,
        })
        .collect()
}

/// How the anomaly group compares with the mean of the valid wards. Plain
/// differences, not significance tests.
#[derive(Debug, Clone, Serialize)]
pub struct AnomalyImpact {
    pub avg_cost_delta: f64,
    pub pass_rate_delta: f64,
}

/// Records whose ward code falls outside the valid domain, reported as one
/// block so they stay visible in the totals.
#[derive(Debug, Clone, Serialize)]
pub struct WardAnomaly {
    pub codes: Vec<i32>,
    pub count: usize,
    pub total_cost: f64,
    pub avg_cost: f64,
    pub pass_rate: f64,
    pub percentage_of_total_services: f64,
    pub impact: AnomalyImpact,
}

#[derive(Debug, Clone, Serialize)]
pub struct WardAnalysis {
    pub valid_wards: Vec<GroupAggregate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anomaly: Option<WardAnomaly>,
    pub efficiency_ranking: Vec<EfficiencyRank>,
}

pub fn ward_analysis(records: &[ServiceRecord], config: &ScoringConfig) -> WardAnalysis {
    let mut in_domain: HashMap<i32, GroupTotals> = HashMap::new();
    let mut stray = GroupTotals::default();
    let mut stray_codes: BTreeSet<i32> = BTreeSet::new();

    for record in records {
        match record.ward_status(config.ward_count) {
            WardStatus::InDomain(ward) => in_domain.entry(ward).or_default().observe(record),
            WardStatus::OutOfDomain(code) => {
                stray.observe(record);
                stray_codes.insert(code);
            }
            WardStatus::Missing => {}
        }
    }

    // Walk the fixed domain in order; wards with no records are dropped.
    let valid_wards: Vec<GroupAggregate> = (1..=config.ward_count)
        .filter_map(|ward| {
            in_domain
                .remove(&ward)
                .map(|totals| totals.into_aggregate(ward.to_string()))
        })
        .collect();

    let anomaly = (stray.count > 0).then(|| {
        let valid_count = valid_wards.len() as f64;
        let (mean_avg_cost, mean_pass_rate) = if valid_wards.is_empty() {
            (0.0, 0.0)
        } else {
            (
                valid_wards.iter().map(|w| w.avg_cost).sum::<f64>() / valid_count,
                valid_wards.iter().map(|w| w.pass_rate).sum::<f64>() / valid_count,
            )
        };

        let avg_cost = stray.avg_cost();
        let pass_rate = stray.rate(stray.passed);
        WardAnomaly {
            codes: stray_codes.into_iter().collect(),
            count: stray.count,
            total_cost: stray.cost_sum,
            avg_cost,
            pass_rate,
            percentage_of_total_services: if records.is_empty() {
                0.0
            } else {
                stray.count as f64 / records.len() as f64 * 100.0
            },
            impact: AnomalyImpact {
                avg_cost_delta: avg_cost - mean_avg_cost,
                pass_rate_delta: pass_rate - mean_pass_rate,
            },
        }
    });

    let efficiency_ranking = efficiency_ranking(&valid_wards);

    WardAnalysis {
        valid_wards,
        anomaly,
        efficiency_ranking,
    }
}

/// Division label used for records without an owner, so their totals stay
/// visible alongside the attributed groups.
pub const UNASSIGNED_DIVISION: &str = "Unassigned";

pub fn division_breakdown(records: &[ServiceRecord]) -> Vec<GroupAggregate> {
    let mut groups: BTreeMap<String, GroupTotals> = BTreeMap::new();
    for record in records {
        let key = record
            .division()
            .unwrap_or(UNASSIGNED_DIVISION)
            .to_string();
        groups.entry(key).or_default().observe(record);
    }
    groups
        .into_iter()
        .map(|(key, totals)| totals.into_aggregate(key))
        .collect()
}
