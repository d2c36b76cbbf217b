// src/core/models.rs

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use strum::Display;

// --- Decoding Helpers ---

/// Deserializes `null` as the type's zero value.
///
/// The service sends `"result": null` (and occasionally `null` versions) for
/// engines that found nothing, so every scalar field goes through this.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// --- Scan Verdict ---

/// One antivirus engine's verdict for the queried file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scan {
    #[serde(deserialize_with = "null_as_default")]
    pub detected: bool,
    /// Engine version string.
    #[serde(deserialize_with = "null_as_default")]
    pub version: String,
    /// Verdict label, e.g. the signature name. Empty when nothing was detected.
    #[serde(deserialize_with = "null_as_default")]
    pub result: String,
    /// Signature update date as sent by the service (`YYYYMMDD`).
    #[serde(deserialize_with = "null_as_default")]
    pub update: String,
}

impl Scan {
    /// Parses `update` into a calendar date, if it is well formed.
    pub fn updated_on(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.update, "%Y%m%d").ok()
    }
}

// --- Report ---

/// Interpretation of a report's `response_code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ReportStatus {
    /// The resource is known and the report is populated.
    #[strum(to_string = "found")]
    Found,
    /// The resource is not in the service's dataset.
    #[strum(to_string = "not found")]
    NotFound,
    /// The resource is queued for analysis.
    #[strum(to_string = "queued")]
    Queued,
    /// Any other code; the raw value stays in `Report::response_code`.
    #[strum(to_string = "unknown")]
    Unknown,
}

impl From<i32> for ReportStatus {
    fn from(code: i32) -> Self {
        match code {
            1 => ReportStatus::Found,
            0 => ReportStatus::NotFound,
            -2 => ReportStatus::Queued,
            _ => ReportStatus::Unknown,
        }
    }
}

/// The full file report returned by the `file/report` endpoint.
///
/// Every field is optional on the wire: missing keys and `null` values decode
/// to the zero value, unknown keys are ignored. `Report::default()` is the
/// zero-valued report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Report {
    #[serde(deserialize_with = "null_as_default")]
    pub response_code: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub verbose_msg: String,
    /// The hash that was queried.
    #[serde(deserialize_with = "null_as_default")]
    pub resource: String,
    #[serde(deserialize_with = "null_as_default")]
    pub scan_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub md5: String,
    #[serde(deserialize_with = "null_as_default")]
    pub sha1: String,
    #[serde(deserialize_with = "null_as_default")]
    pub sha256: String,
    #[serde(deserialize_with = "null_as_default")]
    pub scan_date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub positives: u16,
    #[serde(deserialize_with = "null_as_default")]
    pub total: u16,
    /// Engine name to verdict.
    #[serde(deserialize_with = "null_as_default")]
    pub scans: HashMap<String, Scan>,
    #[serde(deserialize_with = "null_as_default")]
    pub permalink: String,
}

impl Report {
    pub fn status(&self) -> ReportStatus {
        ReportStatus::from(self.response_code)
    }

    pub fn is_found(&self) -> bool {
        self.status() == ReportStatus::Found
    }

    /// Returns the engines that flagged the file, sorted by engine name.
    pub fn detections(&self) -> Vec<(&str, &Scan)> {
        let mut hits: Vec<(&str, &Scan)> = self
            .scans
            .iter()
            .filter(|(_, scan)| scan.detected)
            .map(|(engine, scan)| (engine.as_str(), scan))
            .collect();
        hits.sort_by(|a, b| a.0.cmp(b.0));
        hits
    }

    /// Formats the detection ratio the way the service's web UI does, e.g. `5/60`.
    pub fn detection_ratio(&self) -> String {
        format!("{}/{}", self.positives, self.total)
    }

    /// Parses `scan_date` (`YYYY-MM-DD HH:MM:SS`, UTC), if present and well formed.
    pub fn scanned_at(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.scan_date, "%Y-%m-%d %H:%M:%S").ok()
    }
}
