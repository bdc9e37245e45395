//! Renders a `StatusView` for stdout.

use crate::presentation::StatusView;
use anyhow::{Context, Result};
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Label, tooltip, then `warn: <bool>`
    Text,
    /// One JSON object per view
    Json,
}

impl OutputFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub fn render(view: &StatusView, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(view)),
        OutputFormat::Json => {
            serde_json::to_string(view).context("Failed to serialize status view")
        }
    }
}

fn render_text(view: &StatusView) -> String {
    let mut out = String::new();
    out.push_str(&view.label);
    out.push('\n');
    if !view.tooltip.is_empty() {
        out.push_str(&view.tooltip);
        out.push('\n');
    }
    out.push_str(&format!("warn: {}", view.warn));
    out
}

/// Writes one rendered view to stdout and flushes it.
pub fn print_view(view: &StatusView, format: OutputFormat) -> Result<()> {
    let rendered = render(view, format)?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", rendered).context("Failed to write to stdout")?;
    stdout.flush().context("Failed to flush stdout")?;
    Ok(())
}

#[cfg(test)]
#[path = "tests/output_tests.rs"]
mod tests;
