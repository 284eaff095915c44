//! Error types for report parsing and rendering.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure to turn a report document into an [`Analysis`](crate::Analysis).
///
/// One error type covers every cause so callers can branch on "parsing
/// failed" without depending on transport or XML reader specifics; the
/// underlying error stays reachable through [`std::error::Error::source`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReportParseError {
    /// The report could not be opened or read.
    #[error("Failed to read report: {source}")]
    Io {
        #[source]
        source: io::Error,
    },

    /// The document is not well-formed XML.
    #[error("Malformed report XML at byte {position}: {source}")]
    Xml {
        /// Byte offset reported by the reader.
        position: u64,
        #[source]
        source: quick_xml::Error,
    },

    /// No `CodeNarc` root element, or a different root element.
    #[error("Missing CodeNarc root element{}", found_suffix(.found.as_deref()))]
    MissingRoot {
        /// Name of the root element actually found, if any.
        found: Option<String>,
    },

    /// An element that is unknown or not allowed at its position.
    #[error("Unexpected element <{element}> inside <{parent}>")]
    UnexpectedElement { element: String, parent: String },

    /// A required attribute is absent or blank.
    #[error("Element <{element}> is missing required attribute '{attribute}'")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    /// A violation priority outside the recognized levels.
    #[error("Unrecognized priority '{value}' for rule {rule}; expected 1, 2 or 3")]
    InvalidPriority { rule: String, value: String },

    /// The same package appears twice within one source root.
    #[error("Duplicate package '{path}' in source root #{source_root}")]
    DuplicatePackage { path: String, source_root: usize },

    /// The document ended while elements were still open.
    #[error("Report ended unexpectedly; <{open}> was never closed")]
    Truncated { open: String },
}

fn found_suffix(found: Option<&str>) -> String {
    found.map_or_else(String::new, |name| format!(" (found <{name}>)"))
}

impl From<io::Error> for ReportParseError {
    fn from(source: io::Error) -> Self {
        Self::Io { source }
    }
}

/// Failure while emitting a report into a document sink.
///
/// Output already written is left as is; reconciling it is up to the sink's
/// owner.
#[derive(Debug, Error)]
#[error("Failed to render {section} section: {source}")]
pub struct ReportRenderError {
    /// Report section being emitted when the sink failed.
    pub section: &'static str,
    #[source]
    pub source: io::Error,
}

impl ReportRenderError {
    /// Adapter for `map_err` that tags a sink error with `section`.
    #[must_use]
    pub fn in_section(section: &'static str) -> impl FnOnce(io::Error) -> Self {
        move |source| Self { section, source }
    }
}

/// Failure to resolve the files an [`AnalysisScope`](crate::AnalysisScope) covers.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ScopeError {
    /// An include or exclude pattern is not a valid glob.
    #[error("Invalid glob pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    /// A source directory could not be traversed.
    #[error("Failed to traverse {}: {source}", .root.display())]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// Either stage of the parse-then-render pipeline failed.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Parse(#[from] ReportParseError),
    #[error(transparent)]
    Render(#[from] ReportRenderError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_missing_root_message() {
        let err = ReportParseError::MissingRoot { found: None };
        assert_eq!(err.to_string(), "Missing CodeNarc root element");

        let err = ReportParseError::MissingRoot {
            found: Some("Checkstyle".to_owned()),
        };
        assert!(err.to_string().contains("(found <Checkstyle>)"));
    }

    #[test]
    fn test_invalid_priority_message() {
        let err = ReportParseError::InvalidPriority {
            rule: "EmptyCatchBlock".to_owned(),
            value: "99".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("'99'"));
        assert!(msg.contains("EmptyCatchBlock"));
    }

    #[test]
    fn test_io_error_is_wrapped() {
        let err = ReportParseError::from(io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert!(matches!(err, ReportParseError::Io { .. }));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_render_error_keeps_cause() {
        let err = ReportRenderError::in_section("summary")(io::Error::other("disk full"));
        assert!(err.to_string().contains("summary"));
        assert_eq!(err.source().map(ToString::to_string).as_deref(), Some("disk full"));

        let wrapped = ReportError::from(err);
        assert!(matches!(wrapped, ReportError::Render(_)));
    }

    #[test]
    fn test_invalid_pattern_message() {
        let source = glob::Pattern::new("src/a**").unwrap_err();
        let err = ScopeError::InvalidPattern {
            pattern: "src/a**".to_owned(),
            source,
        };
        assert!(err.to_string().starts_with("Invalid glob pattern 'src/a**'"));
    }
}
