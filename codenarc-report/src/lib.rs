//! # codenarc-report
//!
//! Parser and renderer for `CodeNarc` XML violation reports.
//!
//! The pipeline has two halves joined by the [`Analysis`] model:
//! - [`parse_report`] / [`parse_report_file`] stream the XML into an
//!   [`Analysis`] (packages, files, violations; aggregates on demand).
//! - [`ReportGenerator`] projects an [`Analysis`] onto any [`DocumentSink`],
//!   using localized labels from [`Messages`]. HTML, plain-text and Markdown
//!   sinks are provided; [`OutputFormat`] picks one.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use codenarc_report::{parse_report_file, HtmlSink, Messages, ReportGenerator};
//!
//! let analysis = parse_report_file("target/CodeNarcXmlReport.xml").unwrap();
//! println!("Violations: {}", analysis.total_violations());
//!
//! let mut sink = HtmlSink::new(std::io::stdout());
//! ReportGenerator::new(Messages::for_identifier("de-DE"))
//!     .generate(&analysis, &mut sink)
//!     .unwrap();
//! ```

mod error;
mod generator;
pub mod i18n;
mod model;
mod parser;
pub mod scope;
pub mod sink;
pub mod table;

use std::io::Write;
use std::path::Path;

pub use error::{ReportError, ReportParseError, ReportRenderError, ScopeError};
pub use generator::{ReportGenerator, generate_report};
pub use i18n::{Locale, MessageKey, Messages};
pub use model::{Analysis, FileResult, Package, Priority, PriorityCounts, Violation};
pub use parser::{parse_report, parse_report_file};
pub use scope::AnalysisScope;
pub use sink::{
    DocumentSink, HtmlSink, MarkdownSink, OutputFormat, RecordingSink, SectionLevel, TextSink,
};
pub use table::{Column, Table};

/// Parse the report at `path` and render it into `writer`.
///
/// Returns the parsed [`Analysis`] so callers can act on its counts.
///
/// # Errors
///
/// Returns [`ReportError::Parse`] when the report cannot be read or parsed
/// and [`ReportError::Render`] when writing the document fails.
pub fn render_report_file(
    path: impl AsRef<Path>,
    writer: &mut dyn Write,
    format: OutputFormat,
    messages: Messages,
) -> Result<Analysis, ReportError> {
    let analysis = parse_report_file(path)?;
    let mut sink = format.sink(writer);
    ReportGenerator::new(messages).generate(&analysis, sink.as_mut())?;
    Ok(analysis)
}
