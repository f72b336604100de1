//! Graphite chart fetcher.
//!
//! Builds one render URL per chart target and performs a plain GET against
//! the Graphite render endpoint. Fetches are sequential and independent: a
//! failed chart never aborts the notification, it only changes how the
//! affected row renders.
//!
//! The [`ChartSource`] trait abstracts the HTTP round trip so tests can
//! inject a canned source instead of a live Graphite instance.

use async_trait::async_trait;
use thiserror::Error;

/// Fixed render parameters; Graphite receives them as query strings.
const CHART_WIDTH: &str = "586";
const CHART_HEIGHT: &str = "308";
const CHART_WINDOW: &str = "-6hours";

/// One chart to render: a dot-delimited metric path plus a display title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartRequest {
    pub target: String,
    pub title: String,
}

impl ChartRequest {
    /// The host-alive round trip time chart used by the host variant.
    pub fn host_alive(host_name: &str) -> Self {
        Self {
            target: format!("icinga2.{host_name}.host.hostalive.perfdata.rta.value"),
            title: format!("HOST {host_name}"),
        }
    }

    /// A per-metric chart for the service variant. Graphite stores service
    /// metrics under the service display name twice (instance and check).
    pub fn service_metric(host_name: &str, service_display_name: &str, label: &str) -> Self {
        Self {
            target: format!(
                "icinga2.{host_name}.services.{service_display_name}.{service_display_name}.perfdata.{label}.value"
            ),
            title: format!("Metric {label}"),
        }
    }
}

/// Why a chart could not be fetched. The `Display` text appears verbatim in
/// the failure row of the HTML body.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChartError {
    #[error("status code: {0}")]
    Status(u16),
    #[error("request failed: {0}")]
    Request(String),
}

/// Raw image bytes or the reason they are unavailable.
pub type ChartResult = Result<Vec<u8>, ChartError>;

/// Source of rendered chart images.
#[async_trait]
pub trait ChartSource: Send + Sync {
    async fn fetch(&self, request: &ChartRequest) -> ChartResult;
}

/// Production chart source backed by the Graphite render endpoint.
pub struct GraphiteClient {
    http: reqwest::Client,
    base_url: String,
}

impl GraphiteClient {
    pub fn new(http: reqwest::Client, base_url: String) -> Self {
        Self { http, base_url }
    }
}

#[async_trait]
impl ChartSource for GraphiteClient {
    async fn fetch(&self, request: &ChartRequest) -> ChartResult {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("width", CHART_WIDTH),
                ("height", CHART_HEIGHT),
                ("from", CHART_WINDOW),
                ("lineMode", "connected"),
                ("target", request.target.as_str()),
                ("fgcolor", "000000"),
                ("bgcolor", "FFFFFF"),
                ("hideNullFromLegend", "false"),
                ("yUnitSystem", "si"),
                ("connectedLimit", ""),
                ("majorGridLineColor", "000000"),
                ("minorGridLineColor", "969696"),
                ("title", request.title.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ChartError::Request(e.to_string()))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            tracing::warn!(target = %request.target, status = %status, "Graphite returned non-200");
            return Err(ChartError::Status(status.as_u16()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ChartError::Request(e.to_string()))?;
        tracing::debug!(target = %request.target, bytes = bytes.len(), "Fetched Graphite chart");
        Ok(bytes.to_vec())
    }
}
