use crate::analytics::{ServiceRecord, ServiceResult};
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer};
use std::io::Read;
use tracing::debug;

pub(crate) fn parse_records<R: Read>(reader: R) -> Result<Vec<ServiceRecord>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();
    let mut skipped = 0usize;

    for row in csv_reader.deserialize::<ServiceRow>() {
        let row = row?;
        match row.into_record() {
            Some(record) => records.push(record),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        debug!(skipped, "dropped rows without a parseable service id");
    }

    Ok(records)
}

/// Direct mapping of the export's header row. Everything is an optional
/// string first; typing happens in `into_record` so a bad cell never sinks
/// the row.
#[derive(Debug, Deserialize)]
struct ServiceRow {
    #[serde(rename = "Service ID", default, deserialize_with = "empty_string_as_none")]
    service_id: Option<String>,
    #[serde(rename = "Start Date", default, deserialize_with = "empty_string_as_none")]
    start_date: Option<String>,
    #[serde(rename = "End Date", default, deserialize_with = "empty_string_as_none")]
    end_date: Option<String>,
    #[serde(rename = "Division", default, deserialize_with = "empty_string_as_none")]
    division: Option<String>,
    #[serde(rename = "Ward", default, deserialize_with = "empty_string_as_none")]
    ward: Option<String>,
    #[serde(rename = "Estimated Cost", default, deserialize_with = "empty_string_as_none")]
    estimated_cost: Option<String>,
    #[serde(rename = "Result", default, deserialize_with = "empty_string_as_none")]
    result: Option<String>,
    #[serde(rename = "Notes", default, deserialize_with = "empty_string_as_none")]
    notes: Option<String>,
}

impl ServiceRow {
    /// The id is the one required field; rows without one are not
    /// well-shaped records and are skipped.
    fn into_record(self) -> Option<ServiceRecord> {
        let id = self.service_id.as_deref().and_then(parse_id)?;
        Some(ServiceRecord {
            id,
            start_date: self.start_date.as_deref().and_then(parse_date),
            end_date: self.end_date.as_deref().and_then(parse_date),
            division_owner: self.division,
            ward: self.ward.as_deref().and_then(|raw| raw.parse::<i32>().ok()),
            estimated_cost: self.estimated_cost.as_deref().and_then(parse_amount),
            result: ServiceResult::from(self.result),
            notes: self.notes,
        })
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn parse_id(raw: &str) -> Option<u64> {
    raw.trim().parse::<u64>().ok()
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc().date());
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }

    NaiveDate::parse_from_str(trimmed, "%m/%d/%Y").ok()
}

/// Monetary cells arrive as "$1,234.50" as often as "1234.5".
fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|ch| !matches!(ch, '$' | ',' | ' '))
        .collect();
    cleaned.parse::<f64>().ok().filter(|value| value.is_finite())
}
