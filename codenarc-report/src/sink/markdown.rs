//! GitHub-flavoured Markdown backend.

use std::io::{self, Write};

use super::{DocumentSink, SectionLevel};

/// Writes Markdown; tables use pipe syntax with the first row as header.
pub struct MarkdownSink<W: Write> {
    writer: W,
    in_cell: bool,
    cell_has_paragraph: bool,
    /// Cells emitted in the first row of the open table.
    first_row_cells: Option<usize>,
    rows_in_table: usize,
}

impl<W: Write> MarkdownSink<W> {
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            in_cell: false,
            cell_has_paragraph: false,
            first_row_cells: None,
            rows_in_table: 0,
        }
    }

    /// Recover the underlying writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn escape(&self, text: &str) -> String {
        let mut escaped = String::with_capacity(text.len());
        for c in text.chars() {
            match c {
                '\\' | '`' | '*' | '_' | '[' | ']' | '<' | '>' | '#' => {
                    escaped.push('\\');
                    escaped.push(c);
                }
                '|' if self.in_cell => escaped.push_str("\\|"),
                '\n' | '\r' if self.in_cell => escaped.push(' '),
                _ => escaped.push(c),
            }
        }
        escaped
    }
}

impl<W: Write> DocumentSink for MarkdownSink<W> {
    fn start_document(&mut self, _title: &str) -> io::Result<()> {
        Ok(())
    }

    fn end_document(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    fn start_section(&mut self, _level: SectionLevel) -> io::Result<()> {
        Ok(())
    }

    fn end_section(&mut self, _level: SectionLevel) -> io::Result<()> {
        Ok(())
    }

    fn start_heading(&mut self, level: SectionLevel) -> io::Result<()> {
        write!(self.writer, "{} ", "#".repeat(level.depth()))
    }

    fn end_heading(&mut self, _level: SectionLevel) -> io::Result<()> {
        writeln!(self.writer)?;
        writeln!(self.writer)
    }

    fn start_paragraph(&mut self) -> io::Result<()> {
        if self.in_cell && self.cell_has_paragraph {
            write!(self.writer, "<br>")?;
        }
        Ok(())
    }

    fn end_paragraph(&mut self) -> io::Result<()> {
        if self.in_cell {
            self.cell_has_paragraph = true;
            return Ok(());
        }
        writeln!(self.writer)?;
        writeln!(self.writer)
    }

    fn text(&mut self, text: &str) -> io::Result<()> {
        let escaped = self.escape(text);
        write!(self.writer, "{escaped}")
    }

    fn emphasis(&mut self, text: &str) -> io::Result<()> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(());
        }
        let escaped = self.escape(trimmed);
        write!(self.writer, "*{escaped}*")
    }

    fn link(&mut self, target: &str, text: &str) -> io::Result<()> {
        let escaped = self.escape(text);
        write!(self.writer, "[{escaped}](#{target})")
    }

    fn anchor(&mut self, name: &str) -> io::Result<()> {
        write!(self.writer, "<a id=\"{name}\"></a>")
    }

    fn start_table(&mut self) -> io::Result<()> {
        self.first_row_cells = None;
        self.rows_in_table = 0;
        Ok(())
    }

    fn end_table(&mut self) -> io::Result<()> {
        writeln!(self.writer)
    }

    fn start_row(&mut self) -> io::Result<()> {
        write!(self.writer, "|")
    }

    fn end_row(&mut self) -> io::Result<()> {
        writeln!(self.writer)?;
        self.rows_in_table += 1;
        if self.rows_in_table == 1 {
            let columns = self.first_row_cells.unwrap_or(0);
            writeln!(self.writer, "|{}", " --- |".repeat(columns))?;
        }
        Ok(())
    }

    fn start_header_cell(&mut self) -> io::Result<()> {
        self.start_cell()
    }

    fn end_header_cell(&mut self) -> io::Result<()> {
        self.end_cell()
    }

    fn start_cell(&mut self) -> io::Result<()> {
        self.in_cell = true;
        self.cell_has_paragraph = false;
        write!(self.writer, " ")
    }

    fn end_cell(&mut self) -> io::Result<()> {
        self.in_cell = false;
        if self.rows_in_table == 0 {
            *self.first_row_cells.get_or_insert(0) += 1;
        }
        write!(self.writer, " |")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markdown_table_has_separator_after_header() {
        let mut sink = MarkdownSink::new(Vec::new());
        sink.start_table().unwrap();
        sink.start_row().unwrap();
        for header in ["Rule Name", "Line"] {
            sink.start_header_cell().unwrap();
            sink.text(header).unwrap();
            sink.end_header_cell().unwrap();
        }
        sink.end_row().unwrap();
        sink.start_row().unwrap();
        for value in ["a|b", "3"] {
            sink.start_cell().unwrap();
            sink.text(value).unwrap();
            sink.end_cell().unwrap();
        }
        sink.end_row().unwrap();
        sink.end_table().unwrap();

        let out = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "| Rule Name | Line |");
        assert_eq!(lines[1], "| --- | --- |");
        assert_eq!(lines[2], "| a\\|b | 3 |");
    }

    #[test]
    fn test_markdown_heading_and_emphasis() {
        let mut sink = MarkdownSink::new(Vec::new());
        sink.start_heading(SectionLevel::Two).unwrap();
        sink.text("Source Directory: ").unwrap();
        sink.emphasis("src/main/groovy").unwrap();
        sink.end_heading(SectionLevel::Two).unwrap();

        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(out, "## Source Directory: *src/main/groovy*\n\n");
    }

    #[test]
    fn test_markdown_escapes_inline_markup() {
        let mut sink = MarkdownSink::new(Vec::new());
        sink.text("a *b* <c>").unwrap();
        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(out, "a \\*b\\* \\<c\\>");
    }
}
