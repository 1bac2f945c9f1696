use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Number of wards in the municipal boundary system. Ward codes outside
/// [1, WARD_COUNT] show up in production exports (66 is the usual offender)
/// and are reported as an anomaly group, never dropped.
pub const WARD_COUNT: i32 = 25;

/// Outcome attached to a completed service request. Absent or empty values
/// normalize to `Unknown`; labels outside the closed pass/fail vocabulary
/// are preserved so the accuracy dimension can count them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum ServiceResult {
    Pass,
    Fail,
    Unknown,
    Unrecognized(String),
}

impl ServiceResult {
    pub fn label(&self) -> &str {
        match self {
            Self::Pass => "Pass",
            Self::Fail => "Fail",
            Self::Unknown => "Unknown",
            Self::Unrecognized(raw) => raw,
        }
    }

    /// True for the closed vocabulary; `Unknown` and unrecognized labels are
    /// treated as a missing outcome by the completeness rules.
    pub fn is_known(&self) -> bool {
        matches!(self, Self::Pass | Self::Fail)
    }
}

impl Default for ServiceResult {
    fn default() -> Self {
        Self::Unknown
    }
}

impl From<Option<String>> for ServiceResult {
    fn from(raw: Option<String>) -> Self {
        let Some(raw) = raw else {
            return Self::Unknown;
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::Unknown;
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "pass" | "passed" => Self::Pass,
            "fail" | "failed" => Self::Fail,
            _ => Self::Unrecognized(trimmed.to_string()),
        }
    }
}

impl From<ServiceResult> for Option<String> {
    fn from(value: ServiceResult) -> Self {
        match value {
            ServiceResult::Pass => Some("pass".to_string()),
            ServiceResult::Fail => Some("fail".to_string()),
            ServiceResult::Unknown => None,
            ServiceResult::Unrecognized(raw) => Some(raw),
        }
    }
}

/// Where a record's ward code sits relative to the valid domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WardStatus {
    InDomain(i32),
    OutOfDomain(i32),
    Missing,
}

/// One municipal service-delivery record as supplied by the caller.
/// Everything beyond the id is optional; the calculators score imperfect
/// data instead of rejecting it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceRecord {
    pub id: u64,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub division_owner: Option<String>,
    #[serde(default)]
    pub ward: Option<i32>,
    #[serde(default)]
    pub estimated_cost: Option<f64>,
    #[serde(default)]
    pub result: ServiceResult,
    #[serde(default)]
    pub notes: Option<String>,
}

impl ServiceRecord {
    /// Classify the ward code against the valid domain [1, ward_count].
    pub fn ward_status(&self, ward_count: i32) -> WardStatus {
        match self.ward {
            Some(ward) if (1..=ward_count).contains(&ward) => WardStatus::InDomain(ward),
            Some(ward) => WardStatus::OutOfDomain(ward),
            None => WardStatus::Missing,
        }
    }

    /// Trimmed division label, with empty strings treated as absent.
    pub fn division(&self) -> Option<&str> {
        self.division_owner
            .as_deref()
            .map(str::trim)
            .filter(|label| !label.is_empty())
    }

    /// Trimmed note text, with empty strings treated as absent.
    pub fn note(&self) -> Option<&str> {
        self.notes
            .as_deref()
            .map(str::trim)
            .filter(|note| !note.is_empty())
    }

    pub fn positive_cost(&self) -> Option<f64> {
        self.estimated_cost.filter(|cost| *cost > 0.0)
    }

    pub fn has_negative_cost(&self) -> bool {
        self.estimated_cost.is_some_and(|cost| cost < 0.0)
    }

    /// Both dates present, regardless of ordering.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        }
    }

    pub fn date_order_violation(&self) -> bool {
        self.date_span().is_some_and(|(start, end)| end < start)
    }
}
