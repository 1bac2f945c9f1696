use super::domain::ServiceRecord;
use serde::Serialize;

/// Range-to-median ratio beyond which the distribution counts as heavily
/// right-skewed and the log-tail strategy takes over.
pub const SKEW_RATIO_THRESHOLD: f64 = 100.0;

pub const MIN_BINS: usize = 6;
pub const MAX_BINS: usize = 12;

/// Target bin count scales with sqrt(n), damped.
const BIN_COUNT_FACTOR: f64 = 0.8;

/// Share of the target bin count given to the linear segment in hybrid mode.
const LINEAR_SEGMENT_SHARE: f64 = 0.7;

/// The linear segment covers data up to this percentile; the log tail takes
/// the rest.
const LOWER_SEGMENT_PERCENTILE: f64 = 0.75;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BinStrategy {
    EqualWidth,
    HybridLogTail,
}

/// One histogram bucket over the positive-cost population. Bins partition
/// the observed range; empty bins are omitted from output.
#[derive(Debug, Clone, Serialize)]
pub struct CostBin {
    pub min: f64,
    pub max: f64,
    pub count: usize,
    pub percentage: f64,
    pub label: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CostDistribution {
    pub strategy: BinStrategy,
    pub bins: Vec<CostBin>,
}

pub fn cost_distribution(records: &[ServiceRecord]) -> CostDistribution {
    let mut costs: Vec<f64> = records
        .iter()
        .filter_map(ServiceRecord::positive_cost)
        .filter(|cost| cost.is_finite())
        .collect();
    costs.sort_by(f64::total_cmp);
    distribution_of(&costs)
}

/// Build the histogram from an ascending positive-cost column.
pub fn distribution_of(sorted_costs: &[f64]) -> CostDistribution {
    let strategy = select_strategy(sorted_costs);
    if sorted_costs.is_empty() {
        return CostDistribution {
            strategy,
            bins: Vec::new(),
        };
    }

    let lo = sorted_costs[0];
    let hi = sorted_costs[sorted_costs.len() - 1];
    if lo == hi {
        return CostDistribution {
            strategy,
            bins: collect_bins(vec![(lo, hi, sorted_costs.len())], sorted_costs.len()),
        };
    }

    let target = target_bin_count(sorted_costs.len());
    let edges = match strategy {
        BinStrategy::EqualWidth => linear_edges(lo, hi, target),
        BinStrategy::HybridLogTail => {
            let split = percentile(sorted_costs, LOWER_SEGMENT_PERCENTILE);
            if split <= lo || split >= hi {
                // Degenerate quartile split; fall back to one linear sweep.
                linear_edges(lo, hi, target)
            } else {
                let linear_bins =
                    (((target as f64) * LINEAR_SEGMENT_SHARE).round() as usize).max(1);
                let log_bins = target.saturating_sub(linear_bins).max(1);
                let mut edges = linear_edges(lo, split, linear_bins);
                edges.pop();
                edges.extend(log_edges(split, hi, log_bins));
                edges
            }
        }
    };

    let counted = count_into(sorted_costs, &edges);
    CostDistribution {
        strategy,
        bins: collect_bins(counted, sorted_costs.len()),
    }
}

/// The explicit strategy branch: plain equal-width bins unless the observed
/// range dwarfs the median.
pub fn select_strategy(sorted_costs: &[f64]) -> BinStrategy {
    if sorted_costs.len() < 2 {
        return BinStrategy::EqualWidth;
    }
    let median = percentile(sorted_costs, 0.5);
    let range = sorted_costs[sorted_costs.len() - 1] - sorted_costs[0];
    if median > 0.0 && range > SKEW_RATIO_THRESHOLD * median {
        BinStrategy::HybridLogTail
    } else {
        BinStrategy::EqualWidth
    }
}

fn target_bin_count(n: usize) -> usize {
    (((n as f64).sqrt() * BIN_COUNT_FACTOR).ceil() as usize).clamp(MIN_BINS, MAX_BINS)
}

/// Interpolated percentile over an ascending slice.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let rank = p * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        return sorted[lower];
    }
    let weight = rank - lower as f64;
    sorted[lower] * (1.0 - weight) + sorted[upper] * weight
}

fn linear_edges(lo: f64, hi: f64, bins: usize) -> Vec<f64> {
    let width = (hi - lo) / bins as f64;
    let mut edges: Vec<f64> = (0..bins).map(|i| lo + width * i as f64).collect();
    edges.push(hi);
    edges
}

/// Edges equally spaced in log10 space over (lo, hi]; the first edge is `lo`
/// itself so the segments abut without overlap.
fn log_edges(lo: f64, hi: f64, bins: usize) -> Vec<f64> {
    let log_lo = lo.log10();
    let log_hi = hi.log10();
    let step = (log_hi - log_lo) / bins as f64;
    let mut edges: Vec<f64> = (0..bins)
        .map(|i| 10f64.powf(log_lo + step * i as f64))
        .collect();
    edges[0] = lo;
    edges.push(hi);
    edges
}

/// Count each cost into the half-open span [edge_i, edge_i+1), with the last
/// span closed so the maximum lands in the final bin.
fn count_into(sorted_costs: &[f64], edges: &[f64]) -> Vec<(f64, f64, usize)> {
    let bins = edges.len() - 1;
    let mut counts = vec![0usize; bins];
    let mut bin = 0usize;
    for &cost in sorted_costs {
        while bin + 1 < bins && cost >= edges[bin + 1] {
            bin += 1;
        }
        counts[bin] += 1;
    }
    (0..bins)
        .map(|i| (edges[i], edges[i + 1], counts[i]))
        .collect()
}

fn collect_bins(spans: Vec<(f64, f64, usize)>, total: usize) -> Vec<CostBin> {
    spans
        .into_iter()
        .filter(|(_, _, count)| *count > 0)
        .map(|(min, max, count)| CostBin {
            min,
            max,
            count,
            percentage: count as f64 / total as f64 * 100.0,
            label: format!("{} - {}", format_amount(min), format_amount(max)),
        })
        .collect()
}

fn format_amount(value: f64) -> String {
    if value >= 1_000_000.0 {
        format!("${:.1}M", value / 1_000_000.0)
    } else if value >= 1_000.0 {
        format!("${:.1}K", value / 1_000.0)
    } else {
        format!("${value:.0}")
    }
}
