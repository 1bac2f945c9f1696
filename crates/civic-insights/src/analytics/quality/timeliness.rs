use super::DimensionScore;
use crate::analytics::config::ScoringConfig;
use crate::analytics::domain::ServiceRecord;
use chrono::NaiveDate;

const ISSUE_THRESHOLD: f64 = 70.0;

pub fn assess(records: &[ServiceRecord], as_of: NaiveDate, config: &ScoringConfig) -> DimensionScore {
    let Some(latest_end) = records.iter().filter_map(|record| record.end_date).max() else {
        return DimensionScore {
            score: 0.0,
            details: "no record carries an end date".to_string(),
            issues: vec!["Cannot judge freshness: no record has an end date".to_string()],
            recommendations: vec![
                "Record completion dates so freshness can be tracked".to_string()
            ],
        };
    };

    let days_since_update = (as_of - latest_end).num_days().max(0) as f64;
    let recency =
        (100.0 * (1.0 - days_since_update / config.recency_horizon_days)).clamp(0.0, 100.0);

    let mut spans: Vec<(NaiveDate, NaiveDate)> =
        records.iter().filter_map(ServiceRecord::date_span).collect();
    spans.sort_by_key(|(_, end)| *end);

    let coverage = if spans.len() < 2 {
        config.default_coverage_score
    } else {
        let mut gap_days = 0i64;
        for pair in spans.windows(2) {
            let gap = (pair[1].0 - pair[0].1).num_days();
            if gap > 0 {
                gap_days += gap;
            }
        }
        (100.0 - gap_days as f64 / config.coverage_gap_days_per_point).max(0.0)
    };

    let score = config.recency_weight * recency + config.coverage_weight * coverage;
    let details = format!(
        "last update {days_since_update:.0} day(s) before the reference date; recency {recency:.0}, coverage {coverage:.0}"
    );

    let mut issues = Vec::new();
    if score < ISSUE_THRESHOLD {
        if recency < 50.0 {
            issues.push(format!(
                "Most recent completion is {days_since_update:.0} days old"
            ));
        }
        if coverage < 50.0 {
            issues.push("Large gaps separate consecutive delivery windows".to_string());
        }
    }

    let recommendations = if score >= ISSUE_THRESHOLD {
        vec!["Updates are landing regularly; maintain the current publishing cadence".to_string()]
    } else {
        vec![
            "Shorten the refresh interval for closed service records".to_string(),
            "Investigate reporting gaps between delivery windows".to_string(),
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

    fn dated(id: u64, start: (i32, u32, u32), end: (i32, u32, u32)) -> ServiceRecord {
        ServiceRecord {
            id,
            start_date: NaiveDate::from_ymd_opt(start.0, start.1, start.2),
            end_date: NaiveDate::from_ymd_opt(end.0, end.1, end.2),
            ..Default::default()
        }
    }

    #[test]
    fn undated_set_scores_zero() {
        let as_of = NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date");
        let scored = assess(
            &[ServiceRecord::default()],
            as_of,
            &ScoringConfig::default(),
        );
        assert_eq!(scored.score, 0.0);
        assert!(!scored.issues.is_empty());
    }

    #[test]
    fn single_dated_record_uses_default_coverage() {
        let as_of = NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date");
        let scored = assess(
            &[dated(1, (2025, 5, 1), (2025, 6, 1))],
            as_of,
            &ScoringConfig::default(),
        );
        // Fresh data: recency 100, coverage defaults to 50.
        assert!((scored.score - (0.6 * 100.0 + 0.4 * 50.0)).abs() < 1e-9);
    }

    #[test]
    fn gaps_between_windows_erode_coverage() {
        let as_of = NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date");
        let records = vec![
            dated(1, (2024, 6, 1), (2024, 7, 1)),
            // 300-day gap => 10 coverage points lost.
            dated(2, (2025, 4, 27), (2025, 6, 1)),
        ];
        let scored = assess(&records, as_of, &ScoringConfig::default());
        assert!((scored.score - (0.6 * 100.0 + 0.4 * 90.0)).abs() < 1e-9);
    }
}
