//! In-memory sink that records every primitive it receives.

use std::io;

use super::{DocumentSink, SectionLevel};

/// One recorded sink call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    StartDocument(String),
    EndDocument,
    StartSection(SectionLevel),
    EndSection(SectionLevel),
    StartHeading(SectionLevel),
    EndHeading(SectionLevel),
    StartParagraph,
    EndParagraph,
    Text(String),
    Emphasis(String),
    Link { target: String, text: String },
    Anchor(String),
    StartTable,
    EndTable,
    StartRow,
    EndRow,
    StartHeaderCell,
    EndHeaderCell,
    StartCell,
    EndCell,
}

/// A table reassembled from recorded events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordedTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Records sink calls; optionally starts failing after a number of calls.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Vec<SinkEvent>,
    fail_after: Option<usize>,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose writes fail once `accepted` events have been recorded.
    #[must_use]
    pub fn failing_after(accepted: usize) -> Self {
        Self {
            events: Vec::new(),
            fail_after: Some(accepted),
        }
    }

    #[must_use]
    pub fn events(&self) -> &[SinkEvent] {
        &self.events
    }

    #[must_use]
    pub fn into_events(self) -> Vec<SinkEvent> {
        self.events
    }

    /// Headings in emission order with their inline text.
    #[must_use]
    pub fn headings(&self) -> Vec<(SectionLevel, String)> {
        let mut headings = Vec::new();
        let mut current: Option<(SectionLevel, String)> = None;
        for event in &self.events {
            match event {
                SinkEvent::StartHeading(level) => current = Some((*level, String::new())),
                SinkEvent::EndHeading(_) => headings.extend(current.take()),
                _ => {
                    if let Some((_, text)) = current.as_mut()
                        && let Some(inline) = inline_text(event)
                    {
                        text.push_str(inline);
                    }
                }
            }
        }
        headings
    }

    /// Tables in emission order. Paragraphs inside one cell are joined by `\n`.
    #[must_use]
    pub fn tables(&self) -> Vec<RecordedTable> {
        let mut tables = Vec::new();
        let mut table: Option<RecordedTable> = None;
        let mut row: Vec<String> = Vec::new();
        let mut header_row = false;
        let mut cell: Option<String> = None;

        for event in &self.events {
            match event {
                SinkEvent::StartTable => table = Some(RecordedTable::default()),
                SinkEvent::EndTable => tables.extend(table.take()),
                SinkEvent::StartRow => {
                    row.clear();
                    header_row = false;
                }
                SinkEvent::EndRow => {
                    if let Some(t) = table.as_mut() {
                        let cells = std::mem::take(&mut row);
                        if header_row {
                            t.headers = cells;
                        } else {
                            t.rows.push(cells);
                        }
                    }
                }
                SinkEvent::StartHeaderCell => {
                    header_row = true;
                    cell = Some(String::new());
                }
                SinkEvent::StartCell => cell = Some(String::new()),
                SinkEvent::EndHeaderCell | SinkEvent::EndCell => row.extend(cell.take()),
                SinkEvent::StartParagraph => {
                    if let Some(c) = cell.as_mut()
                        && !c.is_empty()
                    {
                        c.push('\n');
                    }
                }
                _ => {
                    if let Some(c) = cell.as_mut()
                        && let Some(inline) = inline_text(event)
                    {
                        c.push_str(inline);
                    }
                }
            }
        }
        tables
    }

    /// Concatenated inline text of the whole document.
    #[must_use]
    pub fn plain_text(&self) -> String {
        self.events.iter().filter_map(inline_text).collect()
    }

    fn record(&mut self, event: SinkEvent) -> io::Result<()> {
        if self.fail_after.is_some_and(|limit| self.events.len() >= limit) {
            return Err(io::Error::other("recording sink rejected write"));
        }
        self.events.push(event);
        Ok(())
    }
}

fn inline_text(event: &SinkEvent) -> Option<&str> {
    match event {
        SinkEvent::Text(text) | SinkEvent::Emphasis(text) | SinkEvent::Link { text, .. } => {
            Some(text.as_str())
        }
        _ => None,
    }
}

impl DocumentSink for RecordingSink {
    fn start_document(&mut self, title: &str) -> io::Result<()> {
        self.record(SinkEvent::StartDocument(title.to_owned()))
    }

    fn end_document(&mut self) -> io::Result<()> {
        self.record(SinkEvent::EndDocument)
    }

    fn start_section(&mut self, level: SectionLevel) -> io::Result<()> {
        self.record(SinkEvent::StartSection(level))
    }

    fn end_section(&mut self, level: SectionLevel) -> io::Result<()> {
        self.record(SinkEvent::EndSection(level))
    }

    fn start_heading(&mut self, level: SectionLevel) -> io::Result<()> {
        self.record(SinkEvent::StartHeading(level))
    }

    fn end_heading(&mut self, level: SectionLevel) -> io::Result<()> {
        self.record(SinkEvent::EndHeading(level))
    }

    fn start_paragraph(&mut self) -> io::Result<()> {
        self.record(SinkEvent::StartParagraph)
    }

    fn end_paragraph(&mut self) -> io::Result<()> {
        self.record(SinkEvent::EndParagraph)
    }

    fn text(&mut self, text: &str) -> io::Result<()> {
        self.record(SinkEvent::Text(text.to_owned()))
    }

    fn emphasis(&mut self, text: &str) -> io::Result<()> {
        self.record(SinkEvent::Emphasis(text.to_owned()))
    }

    fn link(&mut self, target: &str, text: &str) -> io::Result<()> {
        self.record(SinkEvent::Link {
            target: target.to_owned(),
            text: text.to_owned(),
        })
    }

    fn anchor(&mut self, name: &str) -> io::Result<()> {
        self.record(SinkEvent::Anchor(name.to_owned()))
    }

    fn start_table(&mut self) -> io::Result<()> {
        self.record(SinkEvent::StartTable)
    }

    fn end_table(&mut self) -> io::Result<()> {
        self.record(SinkEvent::EndTable)
    }

    fn start_row(&mut self) -> io::Result<()> {
        self.record(SinkEvent::StartRow)
    }

    fn end_row(&mut self) -> io::Result<()> {
        self.record(SinkEvent::EndRow)
    }

    fn start_header_cell(&mut self) -> io::Result<()> {
        self.record(SinkEvent::StartHeaderCell)
    }

    fn end_header_cell(&mut self) -> io::Result<()> {
        self.record(SinkEvent::EndHeaderCell)
    }

    fn start_cell(&mut self) -> io::Result<()> {
        self.record(SinkEvent::StartCell)
    }

    fn end_cell(&mut self) -> io::Result<()> {
        self.record(SinkEvent::EndCell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_are_reassembled() {
        let mut sink = RecordingSink::new();
        sink.start_table().unwrap();
        sink.start_row().unwrap();
        sink.start_header_cell().unwrap();
        sink.text("Rule").unwrap();
        sink.end_header_cell().unwrap();
        sink.end_row().unwrap();
        sink.start_row().unwrap();
        sink.start_cell().unwrap();
        sink.start_paragraph().unwrap();
        sink.emphasis("x = 1").unwrap();
        sink.end_paragraph().unwrap();
        sink.start_paragraph().unwrap();
        sink.text("unused").unwrap();
        sink.end_paragraph().unwrap();
        sink.end_cell().unwrap();
        sink.end_row().unwrap();
        sink.end_table().unwrap();

        let tables = sink.tables();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].headers, vec!["Rule".to_owned()]);
        assert_eq!(tables[0].rows, vec![vec!["x = 1\nunused".to_owned()]]);
    }

    #[test]
    fn test_failing_sink_rejects_after_limit() {
        let mut sink = RecordingSink::failing_after(1);
        assert!(sink.start_document("t").is_ok());
        assert!(sink.text("x").is_err());
        assert_eq!(sink.events().len(), 1);
    }

    #[test]
    fn test_headings_collect_inline_text() {
        let mut sink = RecordingSink::new();
        sink.start_heading(SectionLevel::Two).unwrap();
        sink.text("Source Directory: ").unwrap();
        sink.emphasis("src").unwrap();
        sink.end_heading(SectionLevel::Two).unwrap();

        assert_eq!(
            sink.headings(),
            vec![(SectionLevel::Two, "Source Directory: src".to_owned())]
        );
    }
}
