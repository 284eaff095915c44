//! Aggregate counts for the `summary` command.

use std::io::Write;

use codenarc_report::{Analysis, MessageKey, Messages, PriorityCounts};
use colored::Colorize;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct PackageTotals {
    pub package: String,
    pub source_root: usize,
    pub files: usize,
    pub files_with_violations: usize,
    pub violations: PriorityCounts,
}

/// Serializable digest of an [`Analysis`].
#[derive(Debug, Serialize)]
pub struct ReportSummary {
    pub tool_version: Option<String>,
    pub timestamp: Option<String>,
    pub project: Option<String>,
    pub total_files: usize,
    pub files_with_violations: usize,
    pub total_violations: usize,
    pub violations: PriorityCounts,
    pub packages: Vec<PackageTotals>,
}

impl ReportSummary {
    pub fn new(analysis: &Analysis, messages: Messages) -> Self {
        let packages = analysis
            .packages
            .iter()
            .filter(|p| !p.files.is_empty())
            .map(|p| PackageTotals {
                package: p
                    .name()
                    .unwrap_or_else(|| messages.get(MessageKey::DefaultPackage).to_owned()),
                source_root: p.source_root,
                files: p.files.len(),
                files_with_violations: p.files_with_violations(),
                violations: p.counts(),
            })
            .collect();

        Self {
            tool_version: analysis.tool_version.clone(),
            timestamp: analysis.timestamp.clone(),
            project: analysis.project_title.clone(),
            total_files: analysis.total_files(),
            files_with_violations: analysis.files_with_violations(),
            total_violations: analysis.total_violations(),
            violations: analysis.counts(),
            packages,
        }
    }
}

/// Write the summary as pretty JSON.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_json(summary: &ReportSummary, writer: &mut dyn Write) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(summary)?;
    writeln!(writer, "{json}")?;
    Ok(())
}

/// Write the summary as aligned, colored text.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_human(
    summary: &ReportSummary,
    messages: Messages,
    writer: &mut dyn Write,
) -> anyhow::Result<()> {
    let label = |key| messages.get(key);
    let counts = &summary.violations;

    writeln!(writer, "{}", label(MessageKey::ReportTitle).bold())?;
    if let Some(project) = &summary.project {
        writeln!(writer, "  {}: {project}", label(MessageKey::ProjectCaption))?;
    }
    if let Some(version) = &summary.tool_version {
        writeln!(writer, "  {}: {version}", label(MessageKey::VersionCaption))?;
    }
    if let Some(timestamp) = &summary.timestamp {
        writeln!(writer, "  {}: {timestamp}", label(MessageKey::GenerationTimeCaption))?;
    }
    writeln!(writer)?;

    let rows = [
        (label(MessageKey::TotalFiles), summary.total_files.to_string().normal()),
        (
            label(MessageKey::FilesWithViolations),
            summary.files_with_violations.to_string().normal(),
        ),
        (
            label(MessageKey::TotalViolations),
            summary.total_violations.to_string().bold(),
        ),
        (
            label(MessageKey::PriorityOneViolations),
            counts.priority1.to_string().red(),
        ),
        (
            label(MessageKey::PriorityTwoViolations),
            counts.priority2.to_string().yellow(),
        ),
        (
            label(MessageKey::PriorityThreeViolations),
            counts.priority3.to_string().cyan(),
        ),
    ];
    let width = rows.iter().map(|(name, _)| name.chars().count()).max().unwrap_or(0);
    for (name, value) in rows {
        writeln!(writer, "  {name:<width$}  {value}")?;
    }

    if !summary.packages.is_empty() {
        writeln!(writer)?;
        writeln!(writer, "{}", label(MessageKey::PackageSummaryTitle).bold())?;
        for package in &summary.packages {
            let v = &package.violations;
            writeln!(
                writer,
                "  [{}] {}: {} ({}/{}/{})",
                package.source_root,
                package.package,
                v.total(),
                v.priority1,
                v.priority2,
                v.priority3
            )?;
        }
    }

    writeln!(writer)?;
    if summary.total_violations == 0 {
        writeln!(
            writer,
            "{}",
            format!("\u{2713} {}", label(MessageKey::NoViolations)).green()
        )?;
    } else {
        writeln!(
            writer,
            "{}",
            format!(
                "\u{2717} {} {}",
                summary.total_violations,
                label(MessageKey::TotalViolations).to_lowercase()
            )
            .red()
        )?;
    }
    Ok(())
}
