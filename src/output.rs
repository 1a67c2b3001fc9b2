//! Helpers for rendering a generation run for the terminal or as JSON

use crate::error::Result;
use crate::generator::{GeneratedCode, RunReport};
use serde_json::Value;

/// Combined structured and human-readable representation of a run
#[derive(Debug, Clone)]
pub struct RenderedReport {
    /// Structured JSON representation suitable for scripts
    pub json: Value,
    /// Human-readable lines for terminal presentation
    pub human: Vec<String>,
}

/// The line printed as each file is written.
pub fn confirmation_line(code: &GeneratedCode) -> String {
    let file = code
        .path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| format!("{}.png", code.label));
    format!("Generated QR code: {file} -> {}", code.payload)
}

/// Render a finished run into both JSON and human-readable forms.
pub fn render_report(report: &RunReport) -> Result<RenderedReport> {
    let mut human: Vec<String> = report.codes.iter().map(confirmation_line).collect();
    human.push(format!(
        "{} QR code(s) written to {}",
        report.codes.len(),
        report.output_folder.display()
    ));

    Ok(RenderedReport {
        json: report_value(report)?,
        human,
    })
}

/// Produce a structured JSON representation of the run, with a `count` field
/// added next to the serialized report.
pub fn report_value(report: &RunReport) -> Result<Value> {
    let mut value = serde_json::to_value(report)?;
    if let Some(obj) = value.as_object_mut() {
        obj.insert("count".to_string(), Value::from(report.codes.len()));
    }
    Ok(value)
}
