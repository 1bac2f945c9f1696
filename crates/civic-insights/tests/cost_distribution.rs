use civic_insights::analytics::histogram::{
    cost_distribution, distribution_of, select_strategy, BinStrategy, MAX_BINS, MIN_BINS,
    SKEW_RATIO_THRESHOLD,
};
use civic_insights::analytics::ServiceRecord;

fn costed(id: u64, cost: f64) -> ServiceRecord {
    ServiceRecord {
        id,
        estimated_cost: Some(cost),
        ..Default::default()
    }
}

/// An arithmetic ramp with a handful of seven-figure outliers: the shape the
/// hybrid strategy exists for.
fn skewed_costs() -> Vec<f64> {
    let mut costs: Vec<f64> = (1..=60).map(|i| i as f64 * 10.0).collect();
    costs.extend([100_000.0, 1_000_000.0, 10_000_000.0]);
    costs
}

#[test]
fn non_positive_costs_never_enter_the_histogram() {
    let records = vec![
        costed(1, 120.0),
        costed(2, 0.0),
        costed(3, -45.0),
        ServiceRecord {
            id: 4,
            ..Default::default()
        },
        costed(5, 480.0),
    ];

    let distribution = cost_distribution(&records);
    let total: usize = distribution.bins.iter().map(|bin| bin.count).sum();
    assert_eq!(total, 2);
}

#[test]
fn counts_and_percentages_cover_the_population() {
    let costs = skewed_costs();
    let distribution = distribution_of(&costs);

    let total: usize = distribution.bins.iter().map(|bin| bin.count).sum();
    assert_eq!(total, costs.len());

    let percent_sum: f64 = distribution.bins.iter().map(|bin| bin.percentage).sum();
    assert!((percent_sum - 100.0).abs() < 1e-6);
}

#[test]
fn skewed_population_selects_the_hybrid_strategy() {
    let costs = skewed_costs();
    let median = costs[costs.len() / 2];
    let range = costs[costs.len() - 1] - costs[0];
    assert!(range > SKEW_RATIO_THRESHOLD * median, "scenario is skewed");

    let distribution = distribution_of(&costs);
    assert_eq!(distribution.strategy, BinStrategy::HybridLogTail);
}

#[test]
fn hybrid_bins_increase_and_tail_widths_never_shrink() {
    let distribution = distribution_of(&skewed_costs());
    assert_eq!(distribution.strategy, BinStrategy::HybridLogTail);

    // Bin maxima strictly increase across the whole histogram.
    assert!(distribution
        .bins
        .windows(2)
        .all(|pair| pair[1].max > pair[0].max));

    // Raw-value widths never shrink: the linear segment holds steady and the
    // log tail grows geometrically.
    assert!(distribution
        .bins
        .windows(2)
        .all(|pair| (pair[1].max - pair[1].min) >= (pair[0].max - pair[0].min) - 1e-6));
    let first = &distribution.bins[0];
    let last = &distribution.bins[distribution.bins.len() - 1];
    assert!(last.max - last.min > first.max - first.min);
}

#[test]
fn bins_partition_without_overlap_or_gap() {
    let distribution = distribution_of(&skewed_costs());
    assert!(distribution
        .bins
        .windows(2)
        .all(|pair| pair[1].min >= pair[0].max - 1e-9));
}

#[test]
fn modest_spread_uses_equal_width_bins() {
    let costs: Vec<f64> = (1..=80).map(|i| 200.0 + i as f64).collect();
    assert_eq!(select_strategy(&costs), BinStrategy::EqualWidth);

    let distribution = distribution_of(&costs);
    assert_eq!(distribution.strategy, BinStrategy::EqualWidth);
    assert!((MIN_BINS..=MAX_BINS).contains(&distribution.bins.len()));
}

#[test]
fn empty_population_produces_no_bins() {
    let distribution = cost_distribution(&[]);
    assert!(distribution.bins.is_empty());
}
