use super::{score_ratio, DimensionScore};
use crate::analytics::config::ScoringConfig;
use crate::analytics::domain::{ServiceRecord, ServiceResult, WardStatus};
use chrono::{Months, NaiveDate};

const ISSUE_THRESHOLD: f64 = 85.0;

#[derive(Default)]
struct ViolationTally {
    out_of_domain_wards: usize,
    date_violations: usize,
    negative_costs: usize,
    unrecognized_results: usize,
    unknown_results: usize,
}

pub fn assess(records: &[ServiceRecord], as_of: NaiveDate, config: &ScoringConfig) -> DimensionScore {
    let total = records.len();
    let earliest = shift_years_back(as_of, config.history_window_years);
    let latest = shift_years_forward(as_of, config.future_window_years);

    let mut violations = 0.0;
    let mut tally = ViolationTally::default();

    for record in records {
        if let WardStatus::OutOfDomain(_) = record.ward_status(config.ward_count) {
            violations += 1.0;
            tally.out_of_domain_wards += 1;
        }

        let out_of_window = [record.start_date, record.end_date]
            .into_iter()
            .flatten()
            .any(|date| date < earliest || date > latest);
        if out_of_window || record.date_order_violation() {
            violations += 1.0;
            tally.date_violations += 1;
        }

        if record.has_negative_cost() {
            violations += 1.0;
            tally.negative_costs += 1;
        }

        match &record.result {
            ServiceResult::Unrecognized(_) => {
                violations += 1.0;
                tally.unrecognized_results += 1;
            }
            ServiceResult::Unknown => {
                violations += config.unknown_result_penalty;
                tally.unknown_results += 1;
            }
            ServiceResult::Pass | ServiceResult::Fail => {}
        }
    }

    let score = score_ratio(total as f64 - violations, total);
    let details = if total == 0 {
        "no records to validate".to_string()
    } else {
        format!("{violations:.1} violation points across {total} records")
    };

    let mut issues = Vec::new();
    if score < ISSUE_THRESHOLD {
        if tally.out_of_domain_wards > 0 {
            issues.push(format!(
                "{} records carry ward codes outside 1-{}",
                tally.out_of_domain_wards, config.ward_count
            ));
        }
        if tally.date_violations > 0 {
            issues.push(format!(
                "{} records have implausible or inverted date ranges",
                tally.date_violations
            ));
        }
        if tally.negative_costs > 0 {
            issues.push(format!(
                "{} records report a negative estimated cost",
                tally.negative_costs
            ));
        }
        if tally.unrecognized_results > 0 {
            issues.push(format!(
                "{} records use result labels outside the pass/fail vocabulary",
                tally.unrecognized_results
            ));
        }
        if tally.unknown_results > 0 {
            issues.push(format!(
                "{} records are missing an outcome",
                tally.unknown_results
            ));
        }
    }

    let recommendations = if score >= ISSUE_THRESHOLD {
        vec!["Field values sit within expected domains; no corrective action needed".to_string()]
    } else {
        vec![
            "Validate ward codes and date ranges against the boundary calendar at intake".to_string(),
            "Restrict the result field to the pass/fail vocabulary".to_string(),
        ]
    };

    DimensionScore {
        score,
        details,
        issues,
        recommendations,
    }
}

fn shift_years_back(date: NaiveDate, years: i32) -> NaiveDate {
    date.checked_sub_months(Months::new(years as u32 * 12))
        .unwrap_or(NaiveDate::MIN)
}

fn shift_years_forward(date: NaiveDate, years: i32) -> NaiveDate {
    date.checked_add_months(Months::new(years as u32 * 12))
        .unwrap_or(NaiveDate::MAX)
}
