//! Projects an [`Analysis`] onto a [`DocumentSink`].
//!
//! One forward pass emits, in order: the overview, the summary, the package
//! summary per source root, and the violation details per file. Nothing is
//! buffered here; a sink failure aborts the pass and whatever the sink
//! already wrote stays written.

use std::io;

use crate::error::ReportRenderError;
use crate::i18n::{MessageKey, Messages};
use crate::model::{Analysis, FileResult, Package};
use crate::sink::{DocumentSink, SectionLevel};
use crate::table::{file_anchor, package_anchor, package_summary_table, summary_table, violation_table};

const KEY_VALUE_SEPARATOR: &str = ": ";

/// Renders reports with one set of localized labels.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportGenerator {
    messages: Messages,
}

impl ReportGenerator {
    #[must_use]
    pub fn new(messages: Messages) -> Self {
        Self { messages }
    }

    #[must_use]
    pub fn messages(self) -> Messages {
        self.messages
    }

    /// Emit the complete report for `analysis` into `sink`.
    ///
    /// # Errors
    ///
    /// Returns [`ReportRenderError`] naming the section being written when
    /// the sink fails.
    pub fn generate(
        self,
        analysis: &Analysis,
        sink: &mut dyn DocumentSink,
    ) -> Result<(), ReportRenderError> {
        tracing::debug!(
            locale = %self.messages.locale(),
            packages = analysis.packages.len(),
            "generating report"
        );
        sink.start_document(self.messages.get(MessageKey::ReportTitle))
            .map_err(ReportRenderError::in_section("document"))?;
        self.overview(analysis, sink)
            .map_err(ReportRenderError::in_section("overview"))?;
        self.summary(analysis, sink)
            .map_err(ReportRenderError::in_section("summary"))?;
        self.package_summary(analysis, sink)
            .map_err(ReportRenderError::in_section("package summary"))?;
        if analysis.has_violations() {
            self.files(analysis, sink)
                .map_err(ReportRenderError::in_section("files"))?;
        }
        sink.end_document()
            .map_err(ReportRenderError::in_section("document"))
    }

    fn overview(self, analysis: &Analysis, sink: &mut dyn DocumentSink) -> io::Result<()> {
        sink.start_section(SectionLevel::One)?;
        heading(sink, SectionLevel::One, self.messages.get(MessageKey::ReportTitle))?;
        paragraph(sink, self.messages.get(MessageKey::ContentDescription))?;

        let details = [
            (MessageKey::VersionCaption, &analysis.tool_version),
            (MessageKey::GenerationTimeCaption, &analysis.timestamp),
            (MessageKey::ProjectCaption, &analysis.project_title),
        ];
        for (key, value) in details {
            if let Some(value) = value {
                key_value(sink, self.messages.get(key), value)?;
            }
        }
        sink.end_section(SectionLevel::One)
    }

    fn summary(self, analysis: &Analysis, sink: &mut dyn DocumentSink) -> io::Result<()> {
        tracing::debug!(violations = analysis.total_violations(), "summary section");
        sink.start_section(SectionLevel::One)?;
        heading(sink, SectionLevel::One, self.messages.get(MessageKey::SummaryTitle))?;
        summary_table(self.messages).render_rows(sink, [analysis])?;
        if !analysis.has_violations() {
            paragraph(sink, self.messages.get(MessageKey::NoViolations))?;
        }
        sink.end_section(SectionLevel::One)
    }

    fn package_summary(self, analysis: &Analysis, sink: &mut dyn DocumentSink) -> io::Result<()> {
        sink.start_section(SectionLevel::One)?;
        heading(
            sink,
            SectionLevel::One,
            self.messages.get(MessageKey::PackageSummaryTitle),
        )?;

        let table = package_summary_table(self.messages);
        let roots = analysis.source_roots();
        if roots.is_empty() {
            table.render_rows(sink, std::iter::empty())?;
        }
        for (root, packages) in roots {
            tracing::debug!(root, packages = packages.len(), "package summary");
            if let Some(directory) = analysis.source_directory(root) {
                self.source_directory_heading(sink, directory)?;
            }
            let listed = packages.into_iter().filter(|p| !p.files.is_empty());
            table.render_rows(sink, listed)?;
        }
        sink.end_section(SectionLevel::One)
    }

    fn files(self, analysis: &Analysis, sink: &mut dyn DocumentSink) -> io::Result<()> {
        sink.start_section(SectionLevel::One)?;
        heading(sink, SectionLevel::One, self.messages.get(MessageKey::FilesTitle))?;

        for (root, packages) in analysis.source_roots() {
            if !packages.iter().any(|p| p.files_with_violations() > 0) {
                continue;
            }
            if let Some(directory) = analysis.source_directory(root) {
                self.source_directory_heading(sink, directory)?;
            }
            for package in packages {
                let mut first = true;
                for file in package.files.iter().filter(|f| f.has_violations()) {
                    self.file(sink, package, file, first)?;
                    first = false;
                }
            }
        }
        sink.end_section(SectionLevel::One)
    }

    /// One file's violations. The first file of a package also carries the
    /// package anchor the package summary links to.
    fn file(
        self,
        sink: &mut dyn DocumentSink,
        package: &Package,
        file: &FileResult,
        package_start: bool,
    ) -> io::Result<()> {
        let path = package.file_path(file);
        tracing::trace!(file = %path, violations = file.violations.len(), "file section");

        sink.start_section(SectionLevel::Three)?;
        sink.start_heading(SectionLevel::Three)?;
        if package_start {
            sink.anchor(&package_anchor(package))?;
        }
        sink.anchor(&file_anchor(package, file))?;
        sink.text(&path)?;
        sink.end_heading(SectionLevel::Three)?;
        violation_table(self.messages).render_rows(sink, &file.violations)?;
        sink.end_section(SectionLevel::Three)
    }

    fn source_directory_heading(self, sink: &mut dyn DocumentSink, directory: &str) -> io::Result<()> {
        sink.start_heading(SectionLevel::Two)?;
        sink.text(self.messages.get(MessageKey::SourceDirectoryCaption))?;
        sink.text(KEY_VALUE_SEPARATOR)?;
        sink.emphasis(directory)?;
        sink.end_heading(SectionLevel::Two)
    }
}

/// Render `analysis` with labels for `locale_identifier` (e.g. `de-DE`).
/// Unsupported locales fall back to English.
///
/// # Errors
///
/// Returns [`ReportRenderError`] when the sink fails.
pub fn generate_report(
    analysis: &Analysis,
    sink: &mut dyn DocumentSink,
    locale_identifier: &str,
) -> Result<(), ReportRenderError> {
    ReportGenerator::new(Messages::for_identifier(locale_identifier)).generate(analysis, sink)
}

fn heading(sink: &mut dyn DocumentSink, level: SectionLevel, text: &str) -> io::Result<()> {
    sink.start_heading(level)?;
    sink.text(text)?;
    sink.end_heading(level)
}

fn paragraph(sink: &mut dyn DocumentSink, text: &str) -> io::Result<()> {
    sink.start_paragraph()?;
    sink.text(text)?;
    sink.end_paragraph()
}

fn key_value(sink: &mut dyn DocumentSink, key: &str, value: &str) -> io::Result<()> {
    sink.start_paragraph()?;
    sink.text(key)?;
    sink.text(KEY_VALUE_SEPARATOR)?;
    sink.emphasis(value)?;
    sink.end_paragraph()
}
