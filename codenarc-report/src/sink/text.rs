//! Plain-text backend.
//!
//! Headings are underlined, paragraphs separated by blank lines. Tables are
//! buffered until they close so every column can be padded to its widest
//! cell.

use std::io::{self, Write};

use super::{DocumentSink, SectionLevel};

const COLUMN_SEPARATOR: &str = " | ";
/// Joins paragraphs that share one table cell.
const CELL_PARAGRAPH_SEPARATOR: &str = " / ";

#[derive(Debug, Default)]
struct TableBuffer {
    rows: Vec<Vec<String>>,
    /// Number of leading rows made of header cells.
    header_rows: usize,
    cell: Option<String>,
}

/// Writes human-readable plain text.
pub struct TextSink<W: Write> {
    writer: W,
    inline: String,
    table: Option<TableBuffer>,
}

impl<W: Write> TextSink<W> {
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            inline: String::new(),
            table: None,
        }
    }

    /// Recover the underlying writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Destination of inline text: the open cell if any, else the block buffer.
    fn target(&mut self) -> &mut String {
        match self.table.as_mut().and_then(|t| t.cell.as_mut()) {
            Some(cell) => cell,
            None => &mut self.inline,
        }
    }

    fn write_table(&mut self, table: &TableBuffer) -> io::Result<()> {
        let columns = table.rows.iter().map(Vec::len).max().unwrap_or(0);
        let mut widths = vec![0_usize; columns];
        for row in &table.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        for (index, row) in table.rows.iter().enumerate() {
            let cells: Vec<String> = widths
                .iter()
                .enumerate()
                .map(|(column, &width)| {
                    let cell = row.get(column).map_or("", String::as_str);
                    format!("{cell:<width$}")
                })
                .collect();
            writeln!(self.writer, "{}", cells.join(COLUMN_SEPARATOR).trim_end())?;

            if index + 1 == table.header_rows {
                let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
                writeln!(self.writer, "{}", rule.join("-+-"))?;
            }
        }
        writeln!(self.writer)
    }
}

/// Collapse every whitespace run into one space. Cells and headings are
/// single-line; edges are kept so adjacent fragments stay separated.
fn flatten(text: &str) -> String {
    let mut flattened = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_space {
                flattened.push(' ');
            }
            in_space = true;
        } else {
            flattened.push(c);
            in_space = false;
        }
    }
    flattened
}

fn underline(level: SectionLevel) -> char {
    match level {
        SectionLevel::One => '=',
        SectionLevel::Two => '-',
        SectionLevel::Three => '~',
    }
}

impl<W: Write> DocumentSink for TextSink<W> {
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

    fn start_heading(&mut self, _level: SectionLevel) -> io::Result<()> {
        self.inline.clear();
        Ok(())
    }

    fn end_heading(&mut self, level: SectionLevel) -> io::Result<()> {
        let title = std::mem::take(&mut self.inline);
        let rule: String = std::iter::repeat_n(underline(level), title.chars().count()).collect();
        writeln!(self.writer, "{title}")?;
        writeln!(self.writer, "{rule}")?;
        writeln!(self.writer)
    }

    fn start_paragraph(&mut self) -> io::Result<()> {
        if let Some(cell) = self.table.as_mut().and_then(|t| t.cell.as_mut())
            && !cell.is_empty()
        {
            cell.push_str(CELL_PARAGRAPH_SEPARATOR);
        }
        Ok(())
    }

    fn end_paragraph(&mut self) -> io::Result<()> {
        if self.table.as_ref().is_some_and(|t| t.cell.is_some()) {
            return Ok(());
        }
        let paragraph = std::mem::take(&mut self.inline);
        writeln!(self.writer, "{paragraph}")?;
        writeln!(self.writer)
    }

    fn text(&mut self, text: &str) -> io::Result<()> {
        let flattened = flatten(text);
        self.target().push_str(&flattened);
        Ok(())
    }

    fn emphasis(&mut self, text: &str) -> io::Result<()> {
        self.text(text)
    }

    fn link(&mut self, _target: &str, text: &str) -> io::Result<()> {
        self.text(text)
    }

    fn anchor(&mut self, _name: &str) -> io::Result<()> {
        Ok(())
    }

    fn start_table(&mut self) -> io::Result<()> {
        self.table = Some(TableBuffer::default());
        Ok(())
    }

    fn end_table(&mut self) -> io::Result<()> {
        match self.table.take() {
            Some(table) => self.write_table(&table),
            None => Ok(()),
        }
    }

    fn start_row(&mut self) -> io::Result<()> {
        if let Some(table) = self.table.as_mut() {
            table.rows.push(Vec::new());
        }
        Ok(())
    }

    fn end_row(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn start_header_cell(&mut self) -> io::Result<()> {
        if let Some(table) = self.table.as_mut() {
            // Only rows that start before any data row count as header rows.
            if table.rows.len() == table.header_rows + 1
                && table.rows.last().is_some_and(Vec::is_empty)
            {
                table.header_rows += 1;
            }
            table.cell = Some(String::new());
        }
        Ok(())
    }

    fn end_header_cell(&mut self) -> io::Result<()> {
        self.end_cell()
    }

    fn start_cell(&mut self) -> io::Result<()> {
        if let Some(table) = self.table.as_mut() {
            table.cell = Some(String::new());
        }
        Ok(())
    }

    fn end_cell(&mut self) -> io::Result<()> {
        if let Some(table) = self.table.as_mut()
            && let Some(cell) = table.cell.take()
        {
            match table.rows.last_mut() {
                Some(row) => row.push(cell),
                None => table.rows.push(vec![cell]),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(sink: &mut TextSink<Vec<u8>>, header: bool, values: &[&str]) {
        sink.start_row().unwrap();
        for value in values {
            if header {
                sink.start_header_cell().unwrap();
            } else {
                sink.start_cell().unwrap();
            }
            sink.text(value).unwrap();
            if header {
                sink.end_header_cell().unwrap();
            } else {
                sink.end_cell().unwrap();
            }
        }
        sink.end_row().unwrap();
    }

    #[test]
    fn test_heading_is_underlined() {
        let mut sink = TextSink::new(Vec::new());
        sink.start_heading(SectionLevel::One).unwrap();
        sink.text("Summary").unwrap();
        sink.end_heading(SectionLevel::One).unwrap();

        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(out, "Summary\n=======\n\n");
    }

    #[test]
    fn test_table_columns_are_aligned() {
        let mut sink = TextSink::new(Vec::new());
        sink.start_table().unwrap();
        cells(&mut sink, true, &["Rule Name", "Line"]);
        cells(&mut sink, false, &["EmptyCatchBlock", "22"]);
        cells(&mut sink, false, &["X", "1"]);
        sink.end_table().unwrap();

        let out = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Rule Name       | Line");
        assert_eq!(lines[1], "----------------+-----");
        assert_eq!(lines[2], "EmptyCatchBlock | 22");
        assert_eq!(lines[3], "X               | 1");
    }

    #[test]
    fn test_paragraphs_inside_cell_are_joined() {
        let mut sink = TextSink::new(Vec::new());
        sink.start_table().unwrap();
        sink.start_row().unwrap();
        sink.start_cell().unwrap();
        sink.start_paragraph().unwrap();
        sink.emphasis("def x = 1").unwrap();
        sink.end_paragraph().unwrap();
        sink.start_paragraph().unwrap();
        sink.text("Variable x\nis unused").unwrap();
        sink.end_paragraph().unwrap();
        sink.end_cell().unwrap();
        sink.end_row().unwrap();
        sink.end_table().unwrap();

        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(out.lines().next(), Some("def x = 1 / Variable x is unused"));
    }

    #[test]
    fn test_inline_fragments_keep_separating_spaces() {
        let mut sink = TextSink::new(Vec::new());
        sink.start_paragraph().unwrap();
        sink.text("Report time").unwrap();
        sink.text(":  ").unwrap();
        sink.emphasis("Mar 1,\n2024").unwrap();
        sink.end_paragraph().unwrap();

        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(out, "Report time: Mar 1, 2024\n\n");
    }

    #[test]
    fn test_header_only_table() {
        let mut sink = TextSink::new(Vec::new());
        sink.start_table().unwrap();
        cells(&mut sink, true, &["Package", "Total"]);
        sink.end_table().unwrap();

        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(out, "Package | Total\n--------+------\n\n");
    }
}
