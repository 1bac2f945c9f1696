use chrono::NaiveDate;
use civic_insights::analytics::{
    quality::{
        assess_accuracy, assess_completeness, assess_consistency, assess_metadata,
        assess_timeliness, QualityScorecard,
    },
    ScoringConfig, ServiceRecord, ServiceResult,
};

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid reference date")
}

fn clean_record(id: u64, ward: i32) -> ServiceRecord {
    ServiceRecord {
        id,
        start_date: NaiveDate::from_ymd_opt(2025, 3, 1),
        end_date: NaiveDate::from_ymd_opt(2025, 3, 20),
        division_owner: Some("Transportation Services".to_string()),
        ward: Some(ward),
        estimated_cost: Some(1_500.0),
        result: ServiceResult::Pass,
        notes: Some("Pothole repairs along the arterial resurfacing route".to_string()),
    }
}

#[test]
fn every_dimension_stays_within_bounds() {
    let mut records: Vec<ServiceRecord> = (1..=20).map(|id| clean_record(id, (id % 25) as i32 + 1)).collect();
    records.push(ServiceRecord {
        id: 21,
        ward: Some(66),
        estimated_cost: Some(-50.0),
        result: ServiceResult::Unrecognized("pending".to_string()),
        ..Default::default()
    });

    let scorecard = QualityScorecard::assess(&records, as_of(), &ScoringConfig::default());
    for (_, score) in scorecard.scores() {
        assert!((0.0..=100.0).contains(&score), "score {score} out of bounds");
    }
}

#[test]
fn empty_set_yields_defined_scores_without_panicking() {
    let config = ScoringConfig::default();
    let scorecard = QualityScorecard::assess(&[], as_of(), &config);

    assert_eq!(scorecard.completeness.score, 100.0);
    assert_eq!(scorecard.consistency.score, 100.0);
    assert_eq!(scorecard.accuracy.score, 100.0);
    assert_eq!(scorecard.timeliness.score, 0.0);
    assert_eq!(scorecard.metadata.score, 0.0);
    for (_, score) in scorecard.scores() {
        assert!((0.0..=100.0).contains(&score));
    }
}

#[test]
fn recommendations_are_never_empty() {
    let config = ScoringConfig::default();
    let rich = QualityScorecard::assess(
        &(1..=10).map(|id| clean_record(id, id as i32)).collect::<Vec<_>>(),
        as_of(),
        &config,
    );
    let empty = QualityScorecard::assess(&[], as_of(), &config);

    for scorecard in [&rich, &empty] {
        assert!(!scorecard.completeness.recommendations.is_empty());
        assert!(!scorecard.accuracy.recommendations.is_empty());
        assert!(!scorecard.consistency.recommendations.is_empty());
        assert!(!scorecard.timeliness.recommendations.is_empty());
        assert!(!scorecard.metadata.recommendations.is_empty());
    }
}

#[test]
fn completeness_counts_only_fully_populated_records() {
    let mut gappy = clean_record(2, 4);
    gappy.ward = None;

    let scored = assess_completeness(&[clean_record(1, 3), gappy]);
    assert_eq!(scored.score, 50.0);
}

#[test]
fn accuracy_applies_partial_penalty_for_unknown_results() {
    let config = ScoringConfig::default();
    let mut unknown = clean_record(2, 4);
    unknown.result = ServiceResult::Unknown;

    let scored = assess_accuracy(&[clean_record(1, 3), unknown], as_of(), &config);
    // One half-point violation over two records: 100 * (2 - 0.5) / 2.
    assert!((scored.score - 75.0).abs() < 1e-9);
}

#[test]
fn accuracy_flags_inverted_date_ranges() {
    let config = ScoringConfig::default();
    let mut inverted = clean_record(1, 3);
    inverted.start_date = NaiveDate::from_ymd_opt(2025, 3, 20);
    inverted.end_date = NaiveDate::from_ymd_opt(2025, 3, 1);

    let scored = assess_accuracy(&[inverted], as_of(), &config);
    assert_eq!(scored.score, 0.0);
}

#[test]
fn consistency_flags_uniform_case_division_labels() {
    let config = ScoringConfig::default();
    let mut shouty = clean_record(1, 3);
    shouty.division_owner = Some("TRANSPORTATION SERVICES".to_string());

    let scored = assess_consistency(&[shouty, clean_record(2, 4)], &config);
    assert_eq!(scored.score, 50.0);
}

#[test]
fn consistency_flags_spend_without_attribution() {
    let config = ScoringConfig::default();
    let orphan = ServiceRecord {
        id: 1,
        estimated_cost: Some(2_000.0),
        ..Default::default()
    };

    let scored = assess_consistency(&[orphan], &config);
    assert_eq!(scored.score, 0.0);
}

#[test]
fn timeliness_blends_recency_and_coverage() {
    let config = ScoringConfig::default();
    let records = vec![clean_record(1, 3)];

    let scored = assess_timeliness(&records, as_of(), &config);
    // 73 days since the only end date; single dated record takes the default
    // coverage of 50.
    let expected_recency = 100.0 * (1.0 - 73.0 / 365.0);
    let expected = 0.6 * expected_recency + 0.4 * 50.0;
    assert!((scored.score - expected).abs() < 1e-6);
}

#[test]
fn stale_data_drives_timeliness_toward_coverage_only() {
    let config = ScoringConfig::default();
    let mut old = clean_record(1, 3);
    old.start_date = NaiveDate::from_ymd_opt(2020, 1, 1);
    old.end_date = NaiveDate::from_ymd_opt(2020, 2, 1);

    let scored = assess_timeliness(&[old], as_of(), &config);
    assert!((scored.score - 0.4 * 50.0).abs() < 1e-9);
    assert!(!scored.issues.is_empty());
}

#[test]
fn metadata_rewards_distinct_divisions_and_wards() {
    let config = ScoringConfig::default();
    let narrow: Vec<ServiceRecord> = (1..=10).map(|id| clean_record(id, 1)).collect();
    let wide: Vec<ServiceRecord> = (1..=10)
        .map(|id| {
            let mut record = clean_record(id, id as i32);
            record.division_owner = Some(format!("Division {id}"));
            record
        })
        .collect();

    let narrow_scored = assess_metadata(&narrow, &config);
    let wide_scored = assess_metadata(&wide, &config);
    assert!(wide_scored.score > narrow_scored.score);
}
