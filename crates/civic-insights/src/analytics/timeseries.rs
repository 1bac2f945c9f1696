use super::domain::ServiceRecord;
use super::groups::{cost_efficiency, GroupTotals};
use chrono::Datelike;
use serde::Serialize;
use std::collections::BTreeMap;

/// Percentage change against the previous rollup with data; 0 when there is
/// no prior month or the prior value is 0.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct MomChange {
    pub services: f64,
    pub total_cost: f64,
    pub avg_cost: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthlyRollup {
    /// Calendar month in "YYYY-MM" form.
    pub month: String,
    pub services: usize,
    pub passed: usize,
    pub failed: usize,
    pub unknown: usize,
    pub pass_rate: f64,
    pub fail_rate: f64,
    pub unknown_rate: f64,
    pub total_cost: f64,
    pub avg_cost: f64,
    pub cost_efficiency: f64,
    pub mom_change: MomChange,
}

/// Group records by the calendar month of their start date. Records without
/// a start date are not datable and stay out of the series.
pub fn monthly_rollups(records: &[ServiceRecord]) -> Vec<MonthlyRollup> {
    let mut months: BTreeMap<(i32, u32), GroupTotals> = BTreeMap::new();
    for record in records {
        if let Some(start) = record.start_date {
            months
                .entry((start.year(), start.month()))
                .or_default()
                .observe(record);
        }
    }

    let mut rollups = Vec::with_capacity(months.len());
    let mut previous: Option<(usize, f64, f64)> = None;
    for ((year, month), totals) in months {
        let avg_cost = totals.avg_cost();
        let pass_rate = totals.rate(totals.passed);
        let mom_change = match previous {
            Some((prev_services, prev_total, prev_avg)) => MomChange {
                services: percent_change(prev_services as f64, totals.count as f64),
                total_cost: percent_change(prev_total, totals.cost_sum),
                avg_cost: percent_change(prev_avg, avg_cost),
            },
            None => MomChange::default(),
        };
        previous = Some((totals.count, totals.cost_sum, avg_cost));

        rollups.push(MonthlyRollup {
            month: format!("{year:04}-{month:02}"),
            services: totals.count,
            passed: totals.passed,
            failed: totals.failed,
            unknown: totals.unknown,
            pass_rate,
            fail_rate: totals.rate(totals.failed),
            unknown_rate: totals.rate(totals.unknown),
            total_cost: totals.cost_sum,
            avg_cost,
            cost_efficiency: cost_efficiency(pass_rate, avg_cost),
            mom_change,
        });
    }
    rollups
}

fn percent_change(previous: f64, current: f64) -> f64 {
    if previous == 0.0 {
        0.0
    } else {
        (current - previous) / previous * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::domain::ServiceResult;
    use chrono::NaiveDate;

    fn record_in(year: i32, month: u32, result: ServiceResult, cost: f64) -> ServiceRecord {
        ServiceRecord {
            id: 1,
            start_date: NaiveDate::from_ymd_opt(year, month, 10),
            end_date: NaiveDate::from_ymd_opt(year, month, 20),
            estimated_cost: Some(cost),
            result,
            ..Default::default()
        }
    }

    #[test]
    fn first_month_has_zero_deltas() {
        let rollups = monthly_rollups(&[record_in(2025, 1, ServiceResult::Pass, 100.0)]);
        assert_eq!(rollups.len(), 1);
        assert_eq!(rollups[0].mom_change.services, 0.0);
    }

    #[test]
    fn undated_records_stay_out_of_the_series() {
        let rollups = monthly_rollups(&[ServiceRecord::default()]);
        assert!(rollups.is_empty());
    }

    #[test]
    fn months_come_out_chronologically() {
        let records = vec![
            record_in(2025, 3, ServiceResult::Pass, 100.0),
            record_in(2024, 12, ServiceResult::Fail, 50.0),
            record_in(2025, 1, ServiceResult::Pass, 80.0),
        ];
        let rollups = monthly_rollups(&records);
        let months: Vec<&str> = rollups.iter().map(|r| r.month.as_str()).collect();
        assert_eq!(months, vec!["2024-12", "2025-01", "2025-03"]);
    }
}
