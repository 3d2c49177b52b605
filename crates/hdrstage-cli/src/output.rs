//! Output renderers for staging reports.

use anyhow::anyhow;
use hdrstage_fsops::StageReport;

use crate::cli::{CliError, CliResult, OutputFormat};

pub(crate) fn render_report(report: &StageReport, format: OutputFormat) -> CliResult<()> {
    let text = format_report(report, format)?;
    if !text.is_empty() {
        println!("{text}");
    }
    Ok(())
}

pub(crate) fn format_report(report: &StageReport, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(report)
            .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}"))),
        OutputFormat::Text => Ok(report
            .records
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")),
    }
}
