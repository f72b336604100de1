//! HTML body rendering for notification mails.
//!
//! The document is a single minijinja template covering both the host and
//! service variants; the composer fills a serializable context and the
//! renderer produces the final string. Keeping the markup in one template
//! separates structure from data and lets tests assert on rendered rows
//! without diffing hand-concatenated strings.

use crate::context::{NotificationContext, NotificationScope};
use crate::error::TemplateError;
use crate::perfdata::PerfDataPoint;
use minijinja::{Environment, UndefinedBehavior};
use serde::Serialize;

/// Outer table width in pixels.
pub const TABLE_WIDTH: u32 = 640;
/// Width of the label column; the value column gets the remainder.
pub const LABEL_COLUMN_WIDTH: u32 = 144;

/// Content-ID of the inline logo attachment referenced from the HTML.
pub const LOGO_CONTENT_ID: &str = "icinga2_logo";

const HTML_TEMPLATE: &str = r#"<html><head><style type="text/css">
body {text-align: left; font-family: Calibri, sans-serif, Verdana; font-size: 10pt; color: #7f7f7f;}
table {margin-left: auto; margin-right: auto;}
a:link {color: #0095bf; text-decoration: none;}
a:visited {color: #0095bf; text-decoration: none;}
a:hover {color: #0095bf; text-decoration: underline;}
a:active {color: #0095bf; text-decoration: underline;}
th {font-family: Calibri, sans-serif, Verdana; font-size: 10pt; text-align: left; white-space: nowrap; color: #535353;}
th.icinga {background-color: #0095bf; color: #ffffff; margin: 5px 7px;}
th.perfdata {background-color: #0095bf; color: #ffffff; margin: 5px 7px; text-align: center;}
td {font-family: Calibri, sans-serif, Verdana; font-size: 10pt; text-align: left; color: #7f7f7f;}
td.center {text-align: center; white-space: nowrap;}
td.OK {background-color: #44bb77; color: #ffffff; margin-left: 2px;}
td.WARNING {background-color: #ffaa44; color: #ffffff; margin-left: 2px;}
td.CRITICAL {background-color: #ff5566; color: #ffffff; margin-left: 2px;}
td.UNKNOWN {background-color: #aa44ff; color: #ffffff; margin-left: 2px;}
td.RECOVERY {background-color: #44bb77; color: #ffffff; margin-left: 2px;}
</style></head><body>
<table width="{{ width }}">
{%- if logo %}
<tr><th colspan="2" class="icinga" width="{{ width }}"><img src="cid:{{ logo_cid }}"></th></tr>
{%- endif %}
<tr><th width="{{ column }}">Notification Type:</th><td class="{{ type_css_class }}">{{ notification_type }}</td></tr>
{%- if service %}
<tr><th>Service Name:</th><td>{{ service_display_name }}</td></tr>
<tr><th>Service Status:</th><td>{{ state }}</td></tr>
<tr><th>Service Data:</th><td><a style="color: #0095bf; text-decoration: none;" href="{{ service_url }}">{{ output_html }}</a></td></tr>
{%- else %}
<tr><th>Host Name:</th><td>{{ host_name }}</td></tr>
<tr><th>Service Name:</th><td>{{ service_name }}</td></tr>
<tr><th>Host Status:</th><td>{{ state }}</td></tr>
<tr><th>Host Data:</th><td><a style="color: #0095bf; text-decoration: none;" href="{{ host_url }}">{{ output_html }}</a></td></tr>
{%- endif %}
<tr><th>Hostalias:</th><td><a style="color: #0095bf; text-decoration: none;" href="{{ host_url }}">{{ host_name }}</a></td></tr>
<tr><th>IP Address:</th><td>{{ host_address }}</td></tr>
<tr><th>Event Time:</th><td>{{ long_date_time }}</td></tr>
{%- if comment %}
<tr><th>Comment:</th><td>{{ comment.text }} ({{ comment.author }})</td></tr>
{%- endif %}
</table><br>
<table width="{{ width }}">
<tr><th colspan="6" class="perfdata">Performance Data</th></tr>
{%- if perfdata %}
<tr><th>Label</th><th>Last Value</th><th>Warning</th><th>Critical</th><th>Min</th><th>Max</th></tr>
{%- for point in perfdata %}
<tr><td>{{ point.label }}</td><td>{{ point.value }}</td><td>{{ point.warning }}</td><td>{{ point.critical }}</td><td>{{ point.min }}</td><td>{{ point.max }}</td></tr>
{%- endfor %}
{%- elif service %}
<tr><th width="{{ column }}" colspan="1">Last Value:</th><td width="{{ difference }}" colspan="5">none</td></tr>
{%- endif %}
{%- for chart in charts %}
{%- if chart.image %}
{%- if chart.label %}
<tr><td colspan="6"><strong>{{ chart.label }}</strong><br><img src="data:image/png;base64,{{ chart.image }}"></td></tr>
{%- else %}
<tr><td colspan="6"><img src="data:image/png;base64,{{ chart.image }}"></td></tr>
{%- endif %}
{%- else %}
<tr><td colspan="6">Cannot fetch Graphite image for {{ chart.label }}, {{ chart.error }}</td></tr>
{%- endif %}
{%- endfor %}
</table><br>
<table width="{{ width }}">
<tr><td class="center">Generated by Icinga 2 and Graphite</td></tr>
</table><br>
</body></html>
"#;

/// One chart row of the performance data table: either an embedded image
/// (with an optional metric label above it) or a failure annotation.
#[derive(Debug, Clone, Serialize)]
pub struct ChartRow {
    pub label: Option<String>,
    /// Base64-encoded PNG bytes when the fetch succeeded.
    pub image: Option<String>,
    /// Failure text when it did not.
    pub error: Option<String>,
}

impl ChartRow {
    pub fn image(label: Option<String>, base64_png: String) -> Self {
        Self {
            label,
            image: Some(base64_png),
            error: None,
        }
    }

    pub fn failure(label: String, error: String) -> Self {
        Self {
            label: Some(label),
            image: None,
            error: Some(error),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct CommentRow {
    author: String,
    text: String,
}

/// Everything the HTML template needs, flattened from the notification
/// context, configuration, and fetch results.
#[derive(Debug, Serialize)]
pub struct HtmlContext {
    width: u32,
    column: u32,
    difference: u32,
    logo: bool,
    logo_cid: &'static str,
    service: bool,
    type_css_class: String,
    notification_type: String,
    host_name: String,
    service_name: String,
    service_display_name: String,
    state: String,
    output_html: String,
    host_url: String,
    service_url: String,
    host_address: String,
    long_date_time: String,
    comment: Option<CommentRow>,
    perfdata: Vec<PerfDataPoint>,
    charts: Vec<ChartRow>,
}

impl HtmlContext {
    pub fn new(
        context: &NotificationContext,
        icingaweb2_url: &str,
        perfdata: Vec<PerfDataPoint>,
        charts: Vec<ChartRow>,
        logo: bool,
    ) -> Self {
        let service = context.scope == NotificationScope::Service;
        let service_display_name = context
            .service_display_name
            .clone()
            .unwrap_or_default();

        // The host variant colors the type cell by notification type, the
        // service variant by state.
        let type_css_class = if service {
            context.state.clone()
        } else {
            context.notification_type.clone()
        };

        let host_url = format!(
            "{}/monitoring/host/show?host={}",
            icingaweb2_url, context.host_name
        );
        let service_url = format!(
            "{}/monitoring/service/show?host={}&service={}",
            icingaweb2_url, context.host_name, service_display_name
        );

        Self {
            width: TABLE_WIDTH,
            column: LABEL_COLUMN_WIDTH,
            difference: TABLE_WIDTH - LABEL_COLUMN_WIDTH,
            logo,
            logo_cid: LOGO_CONTENT_ID,
            service,
            type_css_class,
            notification_type: context.notification_type.clone(),
            host_name: context.host_name.clone(),
            service_name: context.service_name.clone().unwrap_or_default(),
            service_display_name,
            state: context.state.clone(),
            output_html: context.output.replace('\n', "<br>"),
            host_url,
            service_url,
            host_address: context.host_address.clone(),
            long_date_time: context.long_date_time.clone(),
            comment: context.comment_pair().map(|(author, text)| CommentRow {
                author: author.to_string(),
                text: text.to_string(),
            }),
            perfdata,
            charts,
        }
    }
}

/// Renderer around a single pre-loaded minijinja environment.
pub struct MessageRenderer {
    env: Environment<'static>,
}

impl MessageRenderer {
    /// Create the renderer and load the notification template.
    ///
    /// # Errors
    /// Returns [`TemplateError::RenderFailed`] if the template source does
    /// not parse; the source is a compile-time constant, so this only fires
    /// on a broken build.
    pub fn new() -> Result<Self, TemplateError> {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Lenient);
        env.add_template("notification", HTML_TEMPLATE)
            .map_err(|e| TemplateError::RenderFailed(e.to_string()))?;
        Ok(Self { env })
    }

    /// Render the HTML document for one notification.
    pub fn render(&self, context: &HtmlContext) -> Result<String, TemplateError> {
        let template = self
            .env
            .get_template("notification")
            .map_err(|e| TemplateError::RenderFailed(e.to_string()))?;
        template
            .render(context)
            .map_err(|e| TemplateError::RenderFailed(e.to_string()))
    }
}
