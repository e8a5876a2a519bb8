//! Output formatting utilities.

use keycommit_canonical::HygieneReport;
use keycommit_summary::Summary;

/// Formats a hygiene report as single-line JSON.
pub fn format_report(report: &HygieneReport) -> String {
    serde_json::to_string(report).unwrap_or_else(|_| "{}".to_string())
}

/// Formats a summary as pretty JSON.
pub fn format_summary(summary: &Summary) -> String {
    serde_json::to_string_pretty(summary).unwrap_or_else(|_| "{}".to_string())
}
