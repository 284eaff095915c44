//! Standalone HTML backend.

use std::io::{self, Write};

use quick_xml::escape::escape;

use super::{DocumentSink, SectionLevel};

const STYLE: &str = "body{font-family:sans-serif;margin:2em}\
table{border-collapse:collapse;margin-bottom:1.5em}\
th,td{border:1px solid #ccc;padding:4px 8px;text-align:left;vertical-align:top}\
th{background:#eee}td p{margin:0}";

/// Writes an HTML5 document. All text and attribute values are escaped.
pub struct HtmlSink<W: Write> {
    writer: W,
}

impl<W: Write> HtmlSink<W> {
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Recover the underlying writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> DocumentSink for HtmlSink<W> {
    fn start_document(&mut self, title: &str) -> io::Result<()> {
        writeln!(self.writer, "<!DOCTYPE html>")?;
        writeln!(self.writer, "<html>")?;
        writeln!(self.writer, "<head>")?;
        writeln!(self.writer, "<meta charset=\"utf-8\">")?;
        writeln!(self.writer, "<title>{}</title>", escape(title))?;
        writeln!(self.writer, "<style>{STYLE}</style>")?;
        writeln!(self.writer, "</head>")?;
        writeln!(self.writer, "<body>")
    }

    fn end_document(&mut self) -> io::Result<()> {
        writeln!(self.writer, "</body>")?;
        writeln!(self.writer, "</html>")?;
        self.writer.flush()
    }

    fn start_section(&mut self, level: SectionLevel) -> io::Result<()> {
        writeln!(self.writer, "<section class=\"level{}\">", level.depth())
    }

    fn end_section(&mut self, _level: SectionLevel) -> io::Result<()> {
        writeln!(self.writer, "</section>")
    }

    fn start_heading(&mut self, level: SectionLevel) -> io::Result<()> {
        write!(self.writer, "<h{}>", level.depth() + 1)
    }

    fn end_heading(&mut self, level: SectionLevel) -> io::Result<()> {
        writeln!(self.writer, "</h{}>", level.depth() + 1)
    }

    fn start_paragraph(&mut self) -> io::Result<()> {
        write!(self.writer, "<p>")
    }

    fn end_paragraph(&mut self) -> io::Result<()> {
        writeln!(self.writer, "</p>")
    }

    fn text(&mut self, text: &str) -> io::Result<()> {
        write!(self.writer, "{}", escape(text))
    }

    fn emphasis(&mut self, text: &str) -> io::Result<()> {
        write!(self.writer, "<em>{}</em>", escape(text))
    }

    fn link(&mut self, target: &str, text: &str) -> io::Result<()> {
        write!(
            self.writer,
            "<a href=\"#{}\">{}</a>",
            escape(target),
            escape(text)
        )
    }

    fn anchor(&mut self, name: &str) -> io::Result<()> {
        write!(self.writer, "<a id=\"{}\"></a>", escape(name))
    }

    fn start_table(&mut self) -> io::Result<()> {
        writeln!(self.writer, "<table>")
    }

    fn end_table(&mut self) -> io::Result<()> {
        writeln!(self.writer, "</table>")
    }

    fn start_row(&mut self) -> io::Result<()> {
        write!(self.writer, "<tr>")
    }

    fn end_row(&mut self) -> io::Result<()> {
        writeln!(self.writer, "</tr>")
    }

    fn start_header_cell(&mut self) -> io::Result<()> {
        write!(self.writer, "<th>")
    }

    fn end_header_cell(&mut self) -> io::Result<()> {
        write!(self.writer, "</th>")
    }

    fn start_cell(&mut self) -> io::Result<()> {
        write!(self.writer, "<td>")
    }

    fn end_cell(&mut self) -> io::Result<()> {
        write!(self.writer, "</td>")
    }
}
