//! Shared output formatting for analysis reports.

use anyhow::{Context, Result};
use pyscan::{AnalysisReport, IssueDiagnostic};
use std::path::Path;

use crate::OutputFormat;

/// Print an analysis report in the specified format.
pub fn print(report: &AnalysisReport, format: OutputFormat, path: &Path) -> Result<()> {
    match format {
        OutputFormat::Text => print!("{}", report.format_text()),
        OutputFormat::Compact => print!("{}", format_compact(report, path)),
        OutputFormat::Json => return print_json(report),
        OutputFormat::Pretty => return print_pretty(report, path),
    }
    Ok(())
}

fn print_json(report: &AnalysisReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    println!("{json}");
    Ok(())
}

fn format_compact(report: &AnalysisReport, path: &Path) -> String {
    report
        .issues
        .iter()
        .map(|issue| {
            format!(
                "{}:{}:{}: [{}] {}\n",
                path.display(),
                issue.line,
                issue.column,
                issue.rule,
                issue.message,
            )
        })
        .collect()
}

fn print_pretty(report: &AnalysisReport, path: &Path) -> Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to re-read {}", path.display()))?;
    let name = path.display().to_string();

    for issue in &report.issues {
        let diagnostic = IssueDiagnostic::new(issue, &name, &content);
        println!("{:?}", miette::Report::new(diagnostic));
    }

    println!("Found {} issues in {}", report.issues.len(), name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyscan::Issue;

    #[test]
    fn compact_lists_one_line_per_issue() {
        let mut report = AnalysisReport::new();
        report
            .issues
            .push(Issue::new("deep-nesting", 4, 13, "Deep nesting detected (depth > 3)"));

        assert_eq!(
            format_compact(&report, Path::new("src/app.py")),
            "src/app.py:4:13: [deep-nesting] Deep nesting detected (depth > 3)\n"
        );
    }

    #[test]
    fn compact_is_empty_without_issues() {
        assert!(format_compact(&AnalysisReport::new(), Path::new("a.py")).is_empty());
    }

    #[test]
    fn json_output_is_parseable() {
        let mut report = AnalysisReport::new();
        report
            .issues
            .push(Issue::new("too-many-parameters", 1, 12, "Function 'f' has too many parameters (6)"));

        let json = serde_json::to_string_pretty(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["issues"][0]["location"], "line 1");
        assert_eq!(value["issues"][0]["rule"], "too-many-parameters");
    }
}
