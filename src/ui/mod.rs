//! CLI output for annotation reports.
//!
//! Reports can be printed as a table, as plain lines, or as JSON. A short
//! colored summary line is written to the terminal after a run.

use comfy_table::{presets, Cell, Color, Table};
use owo_colors::OwoColorize;
use std::io::IsTerminal;

use crate::models::{AnnotationReport, BlockReport, BlockStatus, ResolutionOutcome};
use crate::render::UNRESOLVED_NOTICE;

/// Check if stdout is a terminal.
pub fn is_terminal() -> bool {
    std::io::stdout().is_terminal()
}

/// Check if stderr is a terminal.
pub fn stderr_is_terminal() -> bool {
    std::io::stderr().is_terminal()
}

/// Status icons for block results.
pub fn status_icon(status: &BlockStatus) -> &'static str {
    match status {
        BlockStatus::Rendered {
            outcome: ResolutionOutcome::Resolved { .. },
        } => "✓",
        BlockStatus::Rendered {
            outcome: ResolutionOutcome::Unresolved,
        } => "○",
        BlockStatus::Failed { .. } => "✗",
    }
}

/// Result column text for a block
fn result_text(block: &BlockReport) -> String {
    match &block.status {
        BlockStatus::Rendered {
            outcome: ResolutionOutcome::Resolved { pmid },
        } => format!("PMID: {}", pmid),
        BlockStatus::Rendered {
            outcome: ResolutionOutcome::Unresolved,
        } => UNRESOLVED_NOTICE.to_string(),
        BlockStatus::Failed { error } => format!("Error: {}", error),
    }
}

/// Truncate text to `max` characters, appending an ellipsis when cut.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept.trim_end())
}

/// Render a report as a table.
pub fn format_report_table(report: &AnnotationReport) -> String {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL);
    table.set_header(vec!["#", "", "Key", "Result", "Title"]);

    for block in &report.blocks {
        let color = match &block.status {
            BlockStatus::Rendered {
                outcome: ResolutionOutcome::Resolved { .. },
            } => Color::Green,
            BlockStatus::Rendered { .. } => Color::Yellow,
            BlockStatus::Failed { .. } => Color::Red,
        };

        table.add_row(vec![
            Cell::new(block.index + 1),
            Cell::new(status_icon(&block.status)).fg(color),
            Cell::new(truncate(&block.key.to_string(), 40)),
            Cell::new(truncate(&result_text(block), 40)).fg(color),
            Cell::new(truncate(&block.title, 50)),
        ]);
    }

    table.to_string()
}

/// Render a report as one line per block.
pub fn format_report_plain(report: &AnnotationReport) -> String {
    report
        .blocks
        .iter()
        .map(|block| {
            format!(
                "{}\t{}\t{}\t{}",
                block.index + 1,
                block.key,
                result_text(block),
                block.title
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render a report as pretty JSON.
pub fn format_report_json(report: &AnnotationReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

/// One-line run summary, colored for terminals.
pub fn summary_line(report: &AnnotationReport, color: bool) -> String {
    let unresolved = report.len() - report.resolved() - report.failed();
    let resolved = format!("{} resolved", report.resolved());
    let unresolved = format!("{} unresolved", unresolved);
    let failed = format!("{} failed", report.failed());

    if color {
        format!(
            "{} blocks: {}, {}, {}",
            report.len(),
            resolved.green(),
            unresolved.yellow(),
            failed.red()
        )
    } else {
        format!(
            "{} blocks: {}, {}, {}",
            report.len(),
            resolved,
            unresolved,
            failed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LookupKey;

    fn report() -> AnnotationReport {
        AnnotationReport {
            blocks: vec![
                BlockReport {
                    index: 0,
                    title: "First".to_string(),
                    key: LookupKey::PmcId("PMC1".to_string()),
                    status: BlockStatus::Rendered {
                        outcome: ResolutionOutcome::Resolved {
                            pmid: "12345678".to_string(),
                        },
                    },
                },
                BlockReport {
                    index: 1,
                    title: "Second".to_string(),
                    key: LookupKey::Title("Second".to_string()),
                    status: BlockStatus::Rendered {
                        outcome: ResolutionOutcome::Unresolved,
                    },
                },
                BlockReport {
                    index: 2,
                    title: "Third".to_string(),
                    key: LookupKey::Doi("10.1/x".to_string()),
                    status: BlockStatus::Failed {
                        error: "Network error: refused".to_string(),
                    },
                },
            ],
        }
    }

    #[test]
    fn test_plain_report() {
        let plain = format_report_plain(&report());
        let lines: Vec<_> = plain.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "1\tpmcid: PMC1\tPMID: 12345678\tFirst");
        assert_eq!(lines[1], "2\ttitle: Second\tNo or multiple matched records\tSecond");
        assert_eq!(lines[2], "3\tdoi: 10.1/x\tError: Network error: refused\tThird");
    }

    #[test]
    fn test_json_report() {
        let json: serde_json::Value =
            serde_json::from_str(&format_report_json(&report()).unwrap()).unwrap();
        let blocks = json["blocks"].as_array().unwrap();
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0]["key"]["type"], "pmc_id");
        assert_eq!(blocks[0]["status"]["state"], "rendered");
        assert_eq!(blocks[0]["status"]["outcome"]["pmid"], "12345678");
        assert_eq!(blocks[1]["status"]["outcome"]["status"], "unresolved");
        assert_eq!(blocks[2]["status"]["state"], "failed");
    }

    #[test]
    fn test_table_report_mentions_every_block() {
        let table = format_report_table(&report());
        assert!(table.contains("PMID: 12345678"));
        assert!(table.contains("Second"));
        assert!(table.contains("✗"));
    }

    #[test]
    fn test_summary_line() {
        assert_eq!(
            summary_line(&report(), false),
            "3 blocks: 1 resolved, 1 unresolved, 1 failed"
        );
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a longer title here", 10), "a longe...");
        assert_eq!(truncate("ααααααααααααα", 5), "αα...");
    }
}
