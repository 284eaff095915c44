//! Document sinks: the output boundary of the renderer.
//!
//! The generator and tables only ever talk to [`DocumentSink`]. Each output
//! technology is an adapter implementing it:
//! - `html` — standalone HTML page
//! - `text` — plain text with aligned tables
//! - `markdown` — GitHub-flavoured Markdown
//! - `recording` — in-memory event log, for inspection

pub mod html;
pub mod markdown;
pub mod recording;
pub mod text;

use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

pub use html::HtmlSink;
pub use markdown::MarkdownSink;
pub use recording::{RecordedTable, RecordingSink, SinkEvent};
pub use text::TextSink;

/// Nesting depth of a section or heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SectionLevel {
    One,
    Two,
    Three,
}

impl SectionLevel {
    /// 1-based depth.
    #[must_use]
    pub fn depth(self) -> usize {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
        }
    }
}

/// Minimal structured-document writer.
///
/// Calls arrive as a well-nested stream: sections contain headings,
/// paragraphs and tables; tables contain rows; rows contain cells; inline
/// primitives (`text`, `emphasis`, `link`, `anchor`) appear inside headings,
/// paragraphs and cells. Every primitive may fail with the writer's error.
pub trait DocumentSink {
    fn start_document(&mut self, title: &str) -> io::Result<()>;
    fn end_document(&mut self) -> io::Result<()>;

    fn start_section(&mut self, level: SectionLevel) -> io::Result<()>;
    fn end_section(&mut self, level: SectionLevel) -> io::Result<()>;

    fn start_heading(&mut self, level: SectionLevel) -> io::Result<()>;
    fn end_heading(&mut self, level: SectionLevel) -> io::Result<()>;

    fn start_paragraph(&mut self) -> io::Result<()>;
    fn end_paragraph(&mut self) -> io::Result<()>;

    fn text(&mut self, text: &str) -> io::Result<()>;
    fn emphasis(&mut self, text: &str) -> io::Result<()>;
    /// Reference to an [`anchor`](Self::anchor) emitted elsewhere in the document.
    fn link(&mut self, target: &str, text: &str) -> io::Result<()>;
    /// Named position that links can point at.
    fn anchor(&mut self, name: &str) -> io::Result<()>;

    fn start_table(&mut self) -> io::Result<()>;
    fn end_table(&mut self) -> io::Result<()>;
    fn start_row(&mut self) -> io::Result<()>;
    fn end_row(&mut self) -> io::Result<()>;
    fn start_header_cell(&mut self) -> io::Result<()>;
    fn end_header_cell(&mut self) -> io::Result<()>;
    fn start_cell(&mut self) -> io::Result<()>;
    fn end_cell(&mut self) -> io::Result<()>;
}

/// Supported output backends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Html,
    Text,
    Markdown,
}

impl OutputFormat {
    /// Conventional file extension, without the dot.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Text => "txt",
            Self::Markdown => "md",
        }
    }

    /// Sink writing this format into `writer`.
    #[must_use]
    pub fn sink<'w>(self, writer: &'w mut dyn Write) -> Box<dyn DocumentSink + 'w> {
        match self {
            Self::Html => Box::new(HtmlSink::new(writer)),
            Self::Text => Box::new(TextSink::new(writer)),
            Self::Markdown => Box::new(MarkdownSink::new(writer)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Html => "html",
            Self::Text => "text",
            Self::Markdown => "markdown",
        })
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "html" | "htm" => Ok(Self::Html),
            "text" | "txt" | "plain" => Ok(Self::Text),
            "markdown" | "md" => Ok(Self::Markdown),
            other => Err(format!(
                "Unknown output format '{other}' (expected html, text or markdown)"
            )),
        }
    }
}
