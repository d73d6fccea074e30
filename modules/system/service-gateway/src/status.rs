//! Public status page.

use std::fmt::Write as _;
use std::sync::Arc;

use axum::extract::State;
use axum::response::Html;

pub const NO_INFORMATION: &str = "No information available";

/// Build information shown on the status page.
#[derive(Debug, Clone, Default)]
pub struct StatusInfo {
    pub name: Option<String>,
    pub version: Option<String>,
    pub build_time: Option<String>,
}

impl StatusInfo {
    #[must_use]
    pub fn new(name: Option<&str>, version: Option<&str>, build_time: Option<&str>) -> Self {
        Self {
            name: name.map(str::to_owned),
            version: version.map(str::to_owned),
            build_time: build_time.map(str::to_owned),
        }
    }

    /// Render the page body. Missing or empty values read `No information available`.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::from("<html><head><title>Status</title></head><body>\n");
        for (label, value) in [
            ("Name", &self.name),
            ("Version", &self.version),
            ("Build Time", &self.build_time),
        ] {
            let value = value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map_or_else(|| NO_INFORMATION.to_owned(), escape_html);
            let _ = writeln!(out, "{label}: {value}<br />");
        }
        out.push_str("</body></html>\n");
        out
    }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            other => out.push(other),
        }
    }
    out
}

pub async fn status_page(State(info): State<Arc<StatusInfo>>) -> Html<String> {
    Html(info.render())
}
