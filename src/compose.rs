//! Notification composition: plain-text body, chart fetching, and the
//! HTML context that feeds the template renderer.
//!
//! Chart fetches run sequentially in performance-data token order. Row
//! order in the rendered table is the fetch order, never completion order,
//! and a failed fetch only affects its own row.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use crate::context::{NotificationContext, NotificationScope};
use crate::error::NotificationError;
use crate::graphite::{ChartRequest, ChartSource};
use crate::perfdata::{parse_perfdata, PerfDataPoint};
use crate::template::{ChartRow, HtmlContext, MessageRenderer};

/// The two rendered bodies plus the subject line.
#[derive(Debug, Clone)]
pub struct ComposedMessage {
    pub subject: String,
    pub text: String,
    pub html: String,
}

/// Build the fixed-order plain text body.
///
/// The service variant separates every line with a blank line; the host
/// variant groups host/address/state together. Comment author and text
/// render as empty strings when absent.
pub fn render_text(context: &NotificationContext) -> String {
    let author = context.author.as_deref().unwrap_or_default();
    let comment = context.comment.as_deref().unwrap_or_default();

    let mut text = String::from("***** Icinga  *****");
    text.push_str(&format!(
        "\n\nNotification Type: {}",
        context.notification_type
    ));
    match context.scope {
        NotificationScope::Service => {
            text.push_str(&format!(
                "\n\nService: {}",
                context.service_display_name.as_deref().unwrap_or_default()
            ));
            text.push_str(&format!("\n\nHost: {}", context.host_name));
            text.push_str(&format!("\n\nAddress: {}", context.host_address));
            text.push_str(&format!("\n\nState: {}", context.state));
        }
        NotificationScope::Host => {
            text.push_str(&format!("\n\nHost: {}", context.host_name));
            text.push_str(&format!("\nAddress: {}", context.host_address));
            text.push_str(&format!("\nState: {}", context.state));
        }
    }
    text.push_str(&format!("\n\nDate/Time: {}", context.long_date_time));
    text.push_str(&format!("\n\nAdditional Info: {}", context.output));
    text.push_str(&format!("\n\nComment: [{author}] {comment}"));
    text
}

/// Fetch the chart images for this notification and turn each result into
/// a table row. The service variant fetches one chart per point, in the
/// order the caller parsed them.
///
/// Host variant: one host-alive chart; a fetch failure drops the row
/// entirely. Service variant: one chart per perfdata label; a failure
/// renders an annotated row in place of the image.
pub async fn fetch_charts(
    context: &NotificationContext,
    points: &[PerfDataPoint],
    charts: &dyn ChartSource,
) -> Vec<ChartRow> {
    match context.scope {
        NotificationScope::Host => {
            let request = ChartRequest::host_alive(&context.host_name);
            match charts.fetch(&request).await {
                Ok(bytes) => vec![ChartRow::image(None, BASE64.encode(bytes))],
                Err(e) => {
                    tracing::warn!(target = %request.target, error = %e, "Omitting host chart row");
                    Vec::new()
                }
            }
        }
        NotificationScope::Service => {
            let Some(display_name) = context.service_display_name.as_deref() else {
                return Vec::new();
            };

            let mut rows = Vec::with_capacity(points.len());
            for point in points {
                let request =
                    ChartRequest::service_metric(&context.host_name, display_name, &point.label);
                let row = match charts.fetch(&request).await {
                    Ok(bytes) => {
                        ChartRow::image(Some(point.label.clone()), BASE64.encode(bytes))
                    }
                    Err(e) => ChartRow::failure(point.label.clone(), e.to_string()),
                };
                rows.push(row);
            }
            rows
        }
    }
}

/// Compose both bodies for one notification.
///
/// Performance data is parsed exactly once here; the same points feed both
/// the rendered table and the chart fetches, so they can never disagree.
pub async fn compose(
    context: &NotificationContext,
    icingaweb2_url: &str,
    charts: &dyn ChartSource,
    logo_present: bool,
) -> Result<ComposedMessage, NotificationError> {
    let points = context
        .perfdata
        .as_deref()
        .map(parse_perfdata)
        .unwrap_or_default();
    let chart_rows = fetch_charts(context, &points, charts).await;

    let html_context = HtmlContext::new(context, icingaweb2_url, points, chart_rows, logo_present);
    let renderer = MessageRenderer::new()?;
    let html = renderer.render(&html_context)?;

    Ok(ComposedMessage {
        subject: context.subject(),
        text: render_text(context),
        html,
    })
}
