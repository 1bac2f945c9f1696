use super::{score_ratio, DimensionScore};
use crate::analytics::domain::ServiceRecord;

/// Scores under this raise per-field issues.
const ISSUE_THRESHOLD: f64 = 80.0;

/// Required-field set. A record is fully populated only when every one of
/// these is present (an Unknown result counts as a missing outcome).
const REQUIRED_FIELDS: [&str; 6] = [
    "division owner",
    "start date",
    "end date",
    "estimated cost",
    "ward",
    "result",
];

pub fn assess(records: &[ServiceRecord]) -> DimensionScore {
    let total = records.len();
    let mut missing_counts = [0usize; REQUIRED_FIELDS.len()];
    let mut fully_populated = 0usize;

    for record in records {
        let gaps = [
            record.division().is_none(),
            record.start_date.is_none(),
            record.end_date.is_none(),
            record.estimated_cost.is_none(),
            record.ward.is_none(),
            !record.result.is_known(),
        ];

        let mut complete = true;
        for (slot, missing) in missing_counts.iter_mut().zip(gaps) {
            if missing {
                *slot += 1;
                complete = false;
            }
        }
        if complete {
            fully_populated += 1;
        }
    }

    let score = score_ratio(fully_populated as f64, total);
    let details = if total == 0 {
        "no records to assess".to_string()
    } else {
        format!("{fully_populated} of {total} records carry every required field")
    };

    let mut issues = Vec::new();
    if score < ISSUE_THRESHOLD {
        let mut gaps: Vec<(&str, usize)> = REQUIRED_FIELDS
            .into_iter()
            .zip(missing_counts)
            .filter(|(_, count)| *count > 0)
            .collect();
        gaps.sort_by(|a, b| b.1.cmp(&a.1));
        for (field, count) in gaps.into_iter().take(3) {
            issues.push(format!("{field} is missing from {count} of {total} records"));
        }
    }

    let recommendations = if score >= ISSUE_THRESHOLD {
        vec!["Required-field coverage is strong; keep the current intake validation".to_string()]
    } else {
        vec![
            "Make division, dates, cost, and ward mandatory at intake".to_string(),
            "Backfill missing outcomes for closed service requests".to_string(),
        ]
    };

    DimensionScore {
        score,
        details,
        issues,
        recommendations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn full_record(id: u64) -> ServiceRecord {
        ServiceRecord {
            id,
            start_date: NaiveDate::from_ymd_opt(2025, 1, 6),
            end_date: NaiveDate::from_ymd_opt(2025, 1, 20),
            division_owner: Some("Transportation Services".to_string()),
            ward: Some(4),
            estimated_cost: Some(1_200.0),
            result: crate::analytics::domain::ServiceResult::Pass,
            notes: None,
        }
    }

    #[test]
    fn empty_set_scores_one_hundred() {
        let scored = assess(&[]);
        assert_eq!(scored.score, 100.0);
        assert!(scored.issues.is_empty());
        assert!(!scored.recommendations.is_empty());
    }

    #[test]
    fn half_populated_set_scores_fifty_and_names_gaps() {
        let mut records = vec![full_record(1), full_record(2)];
        records.push(ServiceRecord {
            id: 3,
            ..Default::default()
        });
        records.push(ServiceRecord {
            id: 4,
            ..Default::default()
        });

        let scored = assess(&records);
        assert_eq!(scored.score, 50.0);
        assert!(!scored.issues.is_empty());
        assert!(scored.issues.iter().all(|issue| issue.contains("of 4")));
    }

    #[test]
    fn unknown_result_counts_as_a_gap() {
        let mut record = full_record(1);
        record.result = crate::analytics::domain::ServiceResult::Unknown;
        let scored = assess(&[record]);
        assert_eq!(scored.score, 0.0);
    }
}
