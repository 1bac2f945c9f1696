use crate::infra::parse_date;
use chrono::{Local, NaiveDate};
use civic_insights::analytics::{
    analyze, ScoringConfig, ServiceAnalytics, ServiceRecord, ServiceResult,
};
use civic_insights::config::AppConfig;
use civic_insights::error::AppError;
use civic_insights::ingest::ServiceRecordImporter;
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// Service-record CSV export to analyze
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Reference date for recency rules (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
    /// Emit the full report as JSON instead of the console summary
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Reference date for recency rules (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
    /// Emit the full report as JSON instead of the console summary
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let ReportArgs { csv, as_of, json } = args;

    let scoring = AppConfig::load()?.scoring;
    let records = ServiceRecordImporter::from_path(csv)?;
    let as_of = as_of.unwrap_or_else(|| Local::now().date_naive());
    let analytics = analyze(&records, as_of, &scoring);

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&analytics).map_err(std::io::Error::other)?
        );
    } else {
        render_report(&analytics, records.len());
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { as_of, json } = args;

    let records = synthetic_records();
    let as_of = as_of.unwrap_or_else(|| Local::now().date_naive());
    let analytics = analyze(&records, as_of, &ScoringConfig::default());

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&analytics).map_err(std::io::Error::other)?
        );
    } else {
        println!("Civic insights demo (synthetic records)\n");
        render_report(&analytics, records.len());
    }

    Ok(())
}

/// A small record set with the blemishes the scoring rules look for: a
/// sentinel ward, missing outcomes, and one expensive unclassified request.
fn synthetic_records() -> Vec<ServiceRecord> {
    let divisions = [
        "Transportation Services",
        "Parks & Forestry",
        "Water Services",
    ];
    let mut records: Vec<ServiceRecord> = (1..=24u64)
        .map(|id| {
            let month = (id % 3) as u32 + 1;
            let result = if id % 5 == 0 {
                ServiceResult::Fail
            } else {
                ServiceResult::Pass
            };
            ServiceRecord {
                id,
                start_date: NaiveDate::from_ymd_opt(2025, month, (id % 27) as u32 + 1),
                end_date: NaiveDate::from_ymd_opt(2025, month + 1, (id % 27) as u32 + 1),
                division_owner: Some(divisions[(id % 3) as usize].to_string()),
                ward: Some((id % 25) as i32 + 1),
                estimated_cost: Some(400.0 + 150.0 * (id % 7) as f64),
                result,
                notes: (id % 4 == 0)
                    .then(|| "Completed under the seasonal maintenance program".to_string()),
            }
        })
        .collect();

    records.push(ServiceRecord {
        id: 25,
        start_date: NaiveDate::from_ymd_opt(2025, 2, 12),
        end_date: NaiveDate::from_ymd_opt(2025, 3, 2),
        division_owner: Some("Transportation Services".to_string()),
        ward: Some(66),
        estimated_cost: Some(2_400.0),
        result: ServiceResult::Fail,
        notes: None,
    });
    records.push(ServiceRecord {
        id: 26,
        division_owner: Some("Water Services".to_string()),
        estimated_cost: Some(88_000.0),
        ..Default::default()
    });

    records
}

fn render_report(analytics: &ServiceAnalytics, record_count: usize) {
    println!(
        "Analyzed {} records as of {}",
        record_count, analytics.as_of
    );

    println!("\nHeadline figures");
    println!(
        "- {} services, total spend {:.0}, average {:.0}",
        analytics.kpi.total_services, analytics.kpi.total_cost, analytics.kpi.avg_cost
    );
    println!(
        "- pass {:.1}% / fail {:.1}% / unknown {:.1}%",
        analytics.kpi.pass_rate, analytics.kpi.fail_rate, analytics.kpi.unknown_rate
    );

    println!("\nQuality dimensions");
    for (dimension, score) in analytics.quality.scores() {
        println!("- {}: {:.1}", dimension.label(), score);
    }

    println!(
        "\nReadiness: {:.1} ({})",
        analytics.readiness.overall_score,
        analytics.readiness.level.label()
    );
    for issue in &analytics.readiness.critical_issues {
        println!("- [critical] {issue}");
    }
    for strength in &analytics.readiness.strengths {
        println!("- [strength] {strength}");
    }
    for recommendation in &analytics.readiness.recommendations {
        println!(
            "- [{} / {}] {}",
            recommendation.category.label(),
            recommendation.priority.label(),
            recommendation.recommendation
        );
    }

    if let Some(anomaly) = &analytics.ward_analysis.anomaly {
        println!(
            "\nWard anomalies: {} records under codes {:?} ({:.1}% of all services)",
            anomaly.count, anomaly.codes, anomaly.percentage_of_total_services
        );
    }

    if !analytics.ward_analysis.efficiency_ranking.is_empty() {
        println!("\nWard efficiency ranking");
        for entry in analytics.ward_analysis.efficiency_ranking.iter().take(5) {
            println!(
                "- #{} ward {} ({:.2} successes per $1K)",
                entry.rank, entry.key, entry.cost_efficiency
            );
        }
    }

    if !analytics.time_series.is_empty() {
        println!("\nMonthly trend");
        for month in &analytics.time_series {
            println!(
                "- {}: {} services ({:+.1}% MoM), avg cost {:.0}",
                month.month, month.services, month.mom_change.services, month.avg_cost
            );
        }
    }

    if !analytics.cost_distribution.bins.is_empty() {
        println!("\nCost distribution");
        for bin in &analytics.cost_distribution.bins {
            println!(
                "- {}: {} records ({:.1}%)",
                bin.label, bin.count, bin.percentage
            );
        }
    }
}
