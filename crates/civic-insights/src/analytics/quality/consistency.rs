use super::{score_ratio, DimensionScore};
use crate::analytics::config::ScoringConfig;
use crate::analytics::domain::{ServiceRecord, ServiceResult};

const ISSUE_THRESHOLD: f64 = 85.0;

#[derive(Default)]
struct InconsistencyTally {
    orphan_results: usize,
    unattributed_spend: usize,
    costly_unknowns: usize,
    label_casing: usize,
}

pub fn assess(records: &[ServiceRecord], config: &ScoringConfig) -> DimensionScore {
    let total = records.len();
    let mut inconsistent = 0usize;
    let mut tally = InconsistencyTally::default();

    for record in records {
        let has_division = record.division().is_some();
        let mut flagged = false;

        if record.result.is_known() && !has_division {
            tally.orphan_results += 1;
            flagged = true;
        }

        if record.positive_cost().is_some()
            && (!has_division || record.start_date.is_none() || record.end_date.is_none())
        {
            tally.unattributed_spend += 1;
            flagged = true;
        }

        if record.result == ServiceResult::Unknown
            && record
                .positive_cost()
                .is_some_and(|cost| cost > config.suspicious_unknown_cost)
        {
            tally.costly_unknowns += 1;
            flagged = true;
        }

        if record.division().is_some_and(has_uniform_casing) {
            tally.label_casing += 1;
            flagged = true;
        }

        if flagged {
            inconsistent += 1;
        }
    }

    let score = score_ratio((total - inconsistent) as f64, total);
    let details = if total == 0 {
        "no records to cross-check".to_string()
    } else {
        format!("{inconsistent} of {total} records have internally conflicting fields")
    };

    let mut issues = Vec::new();
    if score < ISSUE_THRESHOLD {
        if tally.orphan_results > 0 {
            issues.push(format!(
                "{} records report an outcome without a responsible division",
                tally.orphan_results
            ));
        }
        if tally.unattributed_spend > 0 {
            issues.push(format!(
                "{} records carry spend without a division or a delivery window",
                tally.unattributed_spend
            ));
        }
        if tally.costly_unknowns > 0 {
            issues.push(format!(
                "{} high-cost records have no outcome and look miscategorized",
                tally.costly_unknowns
            ));
        }
        if tally.label_casing > 0 {
            issues.push(format!(
                "{} division labels use all-upper or all-lower casing",
                tally.label_casing
            ));
        }
    }

    let recommendations = if score >= ISSUE_THRESHOLD {
        vec!["Cross-field relationships hold together; keep the current review cadence".to_string()]
    } else {
        vec![
            "Reconcile outcomes and spend with their owning division before publication".to_string(),
            "Normalize division labels to title case in the source system".to_string(),
        ]
    };

    DimensionScore {
        score,
        details,
        issues,
        recommendations,
    }
}

/// A label written entirely in one case ("TRANSPORTATION" or
/// "transportation") signals sloppy entry; mixed-case labels pass.
fn has_uniform_casing(label: &str) -> bool {
    let mut has_upper = false;
    let mut has_lower = false;
    for ch in label.chars().filter(|ch| ch.is_alphabetic()) {
        if ch.is_uppercase() {
            has_upper = true;
        } else if ch.is_lowercase() {
            has_lower = true;
        }
        if has_upper && has_lower {
            return false;
        }
    }
    has_upper != has_lower
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_casing_is_detected() {
        assert!(has_uniform_casing("TRANSPORTATION SERVICES"));
        assert!(has_uniform_casing("parks and recreation"));
        assert!(!has_uniform_casing("Solid Waste Management"));
        assert!(!has_uniform_casing("311"));
    }

    #[test]
    fn costly_unknown_is_inconsistent() {
        let record = ServiceRecord {
            id: 1,
            division_owner: Some("Water Services".to_string()),
            start_date: chrono::NaiveDate::from_ymd_opt(2025, 1, 1),
            end_date: chrono::NaiveDate::from_ymd_opt(2025, 2, 1),
            estimated_cost: Some(75_000.0),
            result: ServiceResult::Unknown,
            ..Default::default()
        };
        let scored = assess(&[record], &ScoringConfig::default());
        assert_eq!(scored.score, 0.0);
    }

    #[test]
    fn clean_record_is_consistent() {
        let record = ServiceRecord {
            id: 1,
            division_owner: Some("Water Services".to_string()),
            start_date: chrono::NaiveDate::from_ymd_opt(2025, 1, 1),
            end_date: chrono::NaiveDate::from_ymd_opt(2025, 2, 1),
            estimated_cost: Some(5_000.0),
            result: ServiceResult::Pass,
            ..Default::default()
        };
        let scored = assess(&[record], &ScoringConfig::default());
        assert_eq!(scored.score, 100.0);
        assert!(scored.issues.is_empty());
    }
}
