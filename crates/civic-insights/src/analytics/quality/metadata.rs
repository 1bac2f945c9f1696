use super::DimensionScore;
use crate::analytics::config::ScoringConfig;
use crate::analytics::domain::{ServiceRecord, WardStatus};
use chrono::NaiveDate;
use std::collections::HashSet;

const ISSUE_THRESHOLD: f64 = 70.0;

/// Each sub-score contributes a quarter of the dimension score.
const SUBSCORE_WEIGHT: f64 = 0.25;

/// Fields the diversity sub-score looks for across the whole set.
const PROFILED_FIELDS: usize = 5;

pub fn assess(records: &[ServiceRecord], config: &ScoringConfig) -> DimensionScore {
    let total = records.len();
    if total == 0 {
        return DimensionScore {
            score: 0.0,
            details: "no records to profile".to_string(),
            issues: vec!["Cannot profile metadata richness: the record set is empty".to_string()],
            recommendations: vec!["Publish at least one record set slice for profiling".to_string()],
        };
    }

    let mut divisions: HashSet<String> = HashSet::new();
    let mut wards: HashSet<i32> = HashSet::new();
    let mut duplicate_keys: HashSet<(
        Option<NaiveDate>,
        Option<NaiveDate>,
        Option<String>,
        Option<i32>,
    )> = HashSet::new();
    let mut any_result = false;
    let mut any_cost = false;
    let mut noted = 0usize;
    let mut meaningful_notes = 0usize;

    for record in records {
        if let Some(division) = record.division() {
            divisions.insert(division.to_ascii_lowercase());
        }
        if let WardStatus::InDomain(ward) = record.ward_status(config.ward_count) {
            wards.insert(ward);
        }
        any_result |= record.result.is_known();
        any_cost |= record.estimated_cost.is_some();
        if let Some(note) = record.note() {
            noted += 1;
            if note.len() >= config.meaningful_note_len {
                meaningful_notes += 1;
            }
        }
        duplicate_keys.insert((
            record.start_date,
            record.end_date,
            record.division().map(str::to_ascii_lowercase),
            record.ward,
        ));
    }

    let populated_fields = [
        !divisions.is_empty(),
        any_result,
        !wards.is_empty(),
        any_cost,
        noted > 0,
    ]
    .into_iter()
    .filter(|present| *present)
    .count();
    let field_diversity = populated_fields as f64 / PROFILED_FIELDS as f64 * 100.0;

    let division_spread =
        (divisions.len() as f64 / config.division_cardinality_ceiling * 100.0).min(100.0);
    let ward_spread = (wards.len() as f64 / config.ward_count as f64 * 100.0).min(100.0);
    let value_diversity = (division_spread + ward_spread) / 2.0;

    let notes_quality = 100.0
        * (config.any_note_weight * (noted as f64 / total as f64)
            + config.meaningful_note_weight * (meaningful_notes as f64 / total as f64));

    let duplicates = total - duplicate_keys.len();
    let uniqueness = (total - duplicates) as f64 / total as f64 * 100.0;

    let score = SUBSCORE_WEIGHT * (field_diversity + value_diversity + notes_quality + uniqueness);
    let details = format!(
        "field diversity {field_diversity:.0}, value diversity {value_diversity:.0}, notes {notes_quality:.0}, uniqueness {uniqueness:.0}"
    );

    let mut issues = Vec::new();
    if score < ISSUE_THRESHOLD {
        if field_diversity < 100.0 {
            issues.push("One or more descriptive fields are never populated".to_string());
        }
        if notes_quality < 40.0 {
            issues.push("Free-text notes are sparse or too short to be useful".to_string());
        }
        if duplicates > 0 {
            issues.push(format!(
                "{duplicates} records duplicate another record's window, division, and ward"
            ));
        }
    }

    let recommendations = if score >= ISSUE_THRESHOLD {
        vec!["Descriptive coverage is healthy; document the field dictionary as is".to_string()]
    } else {
        vec![
            "Encourage meaningful notes on closed requests".to_string(),
            "Deduplicate records sharing the same window, division, and ward".to_string(),
        ]
    };

    DimensionScore {
        score,
        details,
        issues,
        recommendations,
    }
}
