//! Parsing of the Icinga performance data string.
//!
//! Performance data arrives as whitespace-separated tokens of the form
//! `label=value;warning;critical;min;max` with trailing fields optional.
//! Tokens without a `=` carry no metric and are skipped.

use serde::Serialize;

/// One parsed performance data token. Absent fields stay empty strings so
/// the HTML table renders empty cells rather than placeholder text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PerfDataPoint {
    pub label: String,
    pub value: String,
    pub warning: String,
    pub critical: String,
    pub min: String,
    pub max: String,
}

impl PerfDataPoint {
    /// Parse a single token; `None` when it carries no `=`.
    pub fn parse_token(token: &str) -> Option<Self> {
        let (label, data) = token.split_once('=')?;
        let mut parts = data.split(';');
        Some(Self {
            label: label.to_string(),
            value: parts.next().unwrap_or_default().to_string(),
            warning: parts.next().unwrap_or_default().to_string(),
            critical: parts.next().unwrap_or_default().to_string(),
            min: parts.next().unwrap_or_default().to_string(),
            max: parts.next().unwrap_or_default().to_string(),
        })
    }
}

/// Split a raw performance data string into parsed points, preserving
/// token order.
pub fn parse_perfdata(raw: &str) -> Vec<PerfDataPoint> {
    raw.split_whitespace()
        .filter_map(PerfDataPoint::parse_token)
        .collect()
}
