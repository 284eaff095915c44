use std::fs::File;
use std::io::{self, BufWriter, IsTerminal, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Args, Parser, Subcommand};
use codenarc_report::{Analysis, Messages, OutputFormat, Priority, parse_report_file, render_report_file};

use crate::logging;
use crate::summary::{self, ReportSummary};

#[derive(Parser)]
#[command(name = "codenarc-report")]
#[command(about = "Render CodeNarc XML violation reports", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Render a report as an HTML, text or Markdown document
    Render(RenderArgs),
    /// Print aggregate violation counts
    Summary(SummaryArgs),
}

#[derive(Args)]
pub struct RenderArgs {
    /// Path to the CodeNarc XML report
    pub report: PathBuf,

    /// Output format (html, text, markdown)
    #[arg(short, long, default_value_t = OutputFormat::Html)]
    pub format: OutputFormat,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Locale identifier for labels, e.g. "en", "de-DE", "pl"
    #[arg(short, long, default_value = "en")]
    pub locale: String,

    #[command(flatten)]
    pub gate: Gate,
}

#[derive(Args)]
pub struct SummaryArgs {
    /// Path to the CodeNarc XML report
    pub report: PathBuf,

    /// Emit JSON instead of human-readable text
    #[arg(long)]
    pub json: bool,

    /// Locale identifier for labels
    #[arg(short, long, default_value = "en")]
    pub locale: String,

    #[command(flatten)]
    pub gate: Gate,
}

#[derive(Args)]
pub struct Gate {
    /// Exit with an error when violations at this priority (1-3) or more severe exist
    #[arg(long, value_name = "LEVEL", value_parser = clap::value_parser!(u8).range(1..=3))]
    pub fail_on_priority: Option<u8>,
}

impl Gate {
    /// Fail when the analysis has violations at or above the configured priority.
    fn check(&self, analysis: &Analysis) -> Result<()> {
        let Some(level) = self.fail_on_priority else {
            return Ok(());
        };
        let Some(threshold) = Priority::from_level(level) else {
            bail!("Invalid priority level {level}");
        };
        let count = analysis.counts().at_or_above(threshold);
        if count > 0 {
            bail!("{count} violation(s) with priority {level} or higher");
        }
        Ok(())
    }
}

/// Parse arguments and dispatch the selected command.
///
/// # Errors
///
/// Returns an error if the command fails or a priority gate is tripped.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    if !io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    match cli.command {
        Command::Render(args) => render(&args),
        Command::Summary(args) => summarize(&args),
    }
}

fn render(args: &RenderArgs) -> Result<()> {
    let messages = Messages::for_identifier(&args.locale);
    tracing::info!(
        report = %args.report.display(),
        format = %args.format,
        locale = messages.locale().code(),
        "Rendering report"
    );

    let analysis = if let Some(path) = &args.output {
        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        let analysis = render_report_file(&args.report, &mut writer, args.format, messages)
            .with_context(|| format!("Failed to render {}", args.report.display()))?;
        writer
            .flush()
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!(output = %path.display(), "Report written");
        analysis
    } else {
        let stdout = io::stdout();
        let mut writer = stdout.lock();
        let analysis = render_report_file(&args.report, &mut writer, args.format, messages)
            .with_context(|| format!("Failed to render {}", args.report.display()))?;
        writer.flush()?;
        analysis
    };

    args.gate.check(&analysis)
}

fn summarize(args: &SummaryArgs) -> Result<()> {
    let messages = Messages::for_identifier(&args.locale);
    let analysis = parse_report_file(&args.report)
        .with_context(|| format!("Failed to read {}", args.report.display()))?;
    let report = ReportSummary::new(&analysis, messages);

    let stdout = io::stdout();
    let mut writer = stdout.lock();
    if args.json {
        summary::write_json(&report, &mut writer)?;
    } else {
        summary::write_human(&report, messages, &mut writer)?;
    }
    writer.flush()?;

    args.gate.check(&analysis)
}
