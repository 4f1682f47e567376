//! HTML page served on `/`

use crate::metrics::MetricsSample;

/// Values rendered into the index page.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexView<'a> {
    pub cpu_metric: f64,
    pub mem_metric: f64,
    pub message: Option<&'a str>,
}

impl From<&MetricsSample> for IndexView<'static> {
    fn from(sample: &MetricsSample) -> Self {
        Self {
            cpu_metric: sample.cpu_percent,
            mem_metric: sample.mem_percent,
            message: sample.warning(),
        }
    }
}

pub fn render_index(view: &IndexView<'_>) -> String {
    let message = view
        .message
        .map(|m| format!("    <p class=\"warning\">{}</p>\n", escape(m)))
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>System Monitoring</title>
    <style>
        body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; background: #1a1a2e; color: #eee; padding: 24px; }}
        .metric {{ font-size: 20px; margin: 8px 0; }}
        .metric span {{ font-weight: 600; color: #4ecca3; }}
        .warning {{ color: #e94560; font-weight: 600; }}
    </style>
</head>
<body>
    <h1>System Monitoring</h1>
    <p class="metric">CPU Utilization: <span id="cpu">{cpu:.1}</span>%</p>
    <p class="metric">Memory Utilization: <span id="mem">{mem:.1}</span>%</p>
{message}</body>
</html>
"#,
        cpu = view.cpu_metric,
        mem = view.mem_metric,
        message = message,
    )
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}
