//! Streaming reader for `CodeNarc` XML reports.
//!
//! The document is pulled event by event; only the element stack and the
//! violation being read are held besides the growing [`Analysis`].

use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::ReportParseError;
use crate::model::{Analysis, FileResult, Package, Priority, Violation};

/// Elements the reader knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Element {
    CodeNarc,
    Report,
    Project,
    SourceDirectory,
    PackageSummary,
    Package,
    File,
    Violation,
    SourceLine,
    Message,
    /// Anything inside `<Rules>`, including the element itself.
    Skipped,
}

impl Element {
    fn name(self) -> &'static str {
        match self {
            Self::CodeNarc => "CodeNarc",
            Self::Report => "Report",
            Self::Project => "Project",
            Self::SourceDirectory => "SourceDirectory",
            Self::PackageSummary => "PackageSummary",
            Self::Package => "Package",
            Self::File => "File",
            Self::Violation => "Violation",
            Self::SourceLine => "SourceLine",
            Self::Message => "Message",
            Self::Skipped => "Rules",
        }
    }

    fn collects_text(self) -> bool {
        matches!(self, Self::SourceDirectory | Self::SourceLine | Self::Message)
    }
}

/// Parse a report from a buffered reader.
///
/// # Errors
///
/// Returns [`ReportParseError`] when the input cannot be read, is not
/// well-formed XML, or violates the report structure.
pub fn parse_report<R: BufRead>(input: R) -> Result<Analysis, ReportParseError> {
    ReportReader::new(input).read()
}

/// Open and parse the report at `path`.
///
/// # Errors
///
/// Returns [`ReportParseError::Io`] when the file cannot be opened, otherwise
/// any error of [`parse_report`].
pub fn parse_report_file(path: impl AsRef<Path>) -> Result<Analysis, ReportParseError> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), "reading report");
    let file = File::open(path)?;
    parse_report(BufReader::new(file))
}

struct ReportReader<R> {
    reader: Reader<R>,
    stack: Vec<Element>,
    analysis: Analysis,
    root_seen: bool,
    /// Text of the open `SourceDirectory`, `SourceLine` or `Message`.
    text: String,
    violation: Option<Violation>,
    source_roots_opened: usize,
    packages_seen: HashSet<(usize, String)>,
}

impl<R: BufRead> ReportReader<R> {
    fn new(input: R) -> Self {
        let mut reader = Reader::from_reader(input);
        reader.config_mut().expand_empty_elements = true;
        Self {
            reader,
            stack: Vec::new(),
            analysis: Analysis::default(),
            root_seen: false,
            text: String::new(),
            violation: None,
            source_roots_opened: 0,
            packages_seen: HashSet::new(),
        }
    }

    fn read(mut self) -> Result<Analysis, ReportParseError> {
        let mut buf = Vec::new();
        loop {
            match self.reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => self.open(&e)?,
                Ok(Event::End(_)) => self.close(),
                Ok(Event::Text(e)) => {
                    let text = e.unescape().map_err(|err| self.xml_error(err))?;
                    self.append_text(&text);
                }
                Ok(Event::CData(e)) => {
                    let text = std::str::from_utf8(&e).map_err(|err| self.xml_error(err.into()))?;
                    self.append_text(text);
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(err) => return Err(self.xml_error(err)),
            }
            buf.clear();
        }
        self.finish()
    }

    fn open(&mut self, e: &BytesStart<'_>) -> Result<(), ReportParseError> {
        let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
        let parent = self.stack.last().copied();

        let element = match (parent, name.as_str()) {
            (Some(Element::Skipped), _) | (Some(Element::CodeNarc), "Rules") => Element::Skipped,
            (None, "CodeNarc") if !self.root_seen => {
                self.root_seen = true;
                self.analysis.tool_version = self.optional(e, "version")?;
                Element::CodeNarc
            }
            (None, _) if !self.root_seen => {
                return Err(ReportParseError::MissingRoot { found: Some(name) });
            }
            (Some(Element::CodeNarc), "Report") => {
                self.analysis.timestamp = self.optional(e, "timestamp")?;
                Element::Report
            }
            (Some(Element::CodeNarc), "Project") => {
                self.analysis.project_title = self.optional(e, "title")?;
                Element::Project
            }
            (Some(Element::CodeNarc), "PackageSummary") => {
                self.analysis.declared_total_files = self
                    .optional(e, "totalFiles")?
                    .and_then(|value| parse_or_warn::<usize>("totalFiles", &value));
                Element::PackageSummary
            }
            (Some(Element::CodeNarc), "Package") => {
                self.open_package(e)?;
                Element::Package
            }
            (Some(Element::Project), "SourceDirectory") => Element::SourceDirectory,
            (Some(Element::Package), "File") => {
                self.open_file(e)?;
                Element::File
            }
            (Some(Element::File), "Violation") => {
                self.violation = Some(self.read_violation(e)?);
                Element::Violation
            }
            (Some(Element::Violation), "SourceLine") => Element::SourceLine,
            (Some(Element::Violation), "Message") => Element::Message,
            (parent, _) => {
                return Err(ReportParseError::UnexpectedElement {
                    element: name,
                    parent: parent.map_or("#document", Element::name).to_owned(),
                });
            }
        };

        if element.collects_text() {
            self.text.clear();
        }
        self.stack.push(element);
        Ok(())
    }

    fn close(&mut self) {
        match self.stack.pop() {
            Some(Element::SourceDirectory) => {
                if let Some(directory) = normalize(&self.text) {
                    self.analysis.source_directories.push(directory);
                }
            }
            Some(Element::SourceLine) => {
                if let Some(violation) = self.violation.as_mut() {
                    violation.source_line = normalize(&self.text);
                }
            }
            Some(Element::Message) => {
                if let Some(violation) = self.violation.as_mut() {
                    violation.message = normalize(&self.text);
                }
            }
            Some(Element::Violation) => {
                let file = self
                    .analysis
                    .packages
                    .last_mut()
                    .and_then(|package| package.files.last_mut());
                if let (Some(file), Some(violation)) = (file, self.violation.take()) {
                    tracing::trace!(
                        file = %file.name,
                        rule = %violation.rule_name,
                        priority = violation.priority.level(),
                        "violation"
                    );
                    file.violations.push(violation);
                }
            }
            _ => {}
        }
    }

    fn append_text(&mut self, text: &str) {
        if self.stack.last().is_some_and(|e| e.collects_text()) {
            self.text.push_str(text);
        }
    }

    fn open_package(&mut self, e: &BytesStart<'_>) -> Result<(), ReportParseError> {
        let path = self
            .attribute(e, "path")?
            .ok_or(ReportParseError::MissingAttribute {
                element: "Package",
                attribute: "path",
            })?
            .trim()
            .to_owned();

        if path.is_empty() {
            self.source_roots_opened += 1;
        }
        let source_root = self.source_roots_opened.saturating_sub(1);

        if !self.packages_seen.insert((source_root, path.clone())) {
            return Err(ReportParseError::DuplicatePackage { path, source_root });
        }
        tracing::debug!(path = %path, source_root, "package");
        self.analysis.packages.push(Package::new(path, source_root));
        Ok(())
    }

    fn open_file(&mut self, e: &BytesStart<'_>) -> Result<(), ReportParseError> {
        let name = self
            .optional(e, "name")?
            .ok_or(ReportParseError::MissingAttribute {
                element: "File",
                attribute: "name",
            })?;
        if let Some(package) = self.analysis.packages.last_mut() {
            package.files.push(FileResult::new(name));
        }
        Ok(())
    }

    fn read_violation(&self, e: &BytesStart<'_>) -> Result<Violation, ReportParseError> {
        let rule_name = self
            .optional(e, "ruleName")?
            .ok_or(ReportParseError::MissingAttribute {
                element: "Violation",
                attribute: "ruleName",
            })?;

        let raw_priority = self
            .attribute(e, "priority")?
            .ok_or(ReportParseError::MissingAttribute {
                element: "Violation",
                attribute: "priority",
            })?;
        let priority = match raw_priority.trim() {
            "1" => Some(Priority::High),
            "2" => Some(Priority::Medium),
            "3" => Some(Priority::Low),
            _ => None,
        };
        let Some(priority) = priority else {
            return Err(ReportParseError::InvalidPriority {
                rule: rule_name,
                value: raw_priority,
            });
        };

        let line_number = self
            .optional(e, "lineNumber")?
            .and_then(|value| parse_or_warn::<u32>("lineNumber", &value))
            .filter(|line| {
                if *line == 0 {
                    tracing::warn!(rule = %rule_name, "ignoring line number 0");
                }
                *line > 0
            });

        Ok(Violation {
            rule_name,
            priority,
            line_number,
            source_line: None,
            message: None,
        })
    }

    /// Raw (unescaped, untrimmed) value of attribute `name`.
    fn attribute(&self, e: &BytesStart<'_>, name: &str) -> Result<Option<String>, ReportParseError> {
        for attr in e.attributes() {
            let attr = attr.map_err(|err| self.xml_error(err.into()))?;
            if attr.key.local_name().as_ref() == name.as_bytes() {
                let value = attr.unescape_value().map_err(|err| self.xml_error(err))?;
                return Ok(Some(value.into_owned()));
            }
        }
        Ok(None)
    }

    /// Trimmed value of attribute `name`; blank counts as absent.
    fn optional(&self, e: &BytesStart<'_>, name: &str) -> Result<Option<String>, ReportParseError> {
        Ok(self.attribute(e, name)?.as_deref().and_then(normalize))
    }

    fn xml_error(&self, err: quick_xml::Error) -> ReportParseError {
        match err {
            quick_xml::Error::Io(shared) => ReportParseError::Io {
                source: Arc::try_unwrap(shared)
                    .unwrap_or_else(|shared| io::Error::new(shared.kind(), shared.to_string())),
            },
            source => ReportParseError::Xml {
                position: u64::try_from(self.reader.buffer_position()).unwrap_or(u64::MAX),
                source,
            },
        }
    }

    fn finish(self) -> Result<Analysis, ReportParseError> {
        if let Some(open) = self.stack.last() {
            return Err(ReportParseError::Truncated {
                open: open.name().to_owned(),
            });
        }
        if !self.root_seen {
            return Err(ReportParseError::MissingRoot { found: None });
        }
        tracing::debug!(
            packages = self.analysis.packages.len(),
            violations = self.analysis.total_violations(),
            "report parsed"
        );
        Ok(self.analysis)
    }
}

fn normalize(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

fn parse_or_warn<T: std::str::FromStr>(attribute: &str, value: &str) -> Option<T> {
    let parsed = value.parse().ok();
    if parsed.is_none() {
        tracing::warn!(attribute, value, "ignoring malformed attribute");
    }
    parsed
}
