//! Format-agnostic table rendering.
//!
//! A [`Table`] is a value: an ordered list of [`Column`]s, each pairing a
//! localized header with a function that renders one cell for a row. The
//! concrete report tables live in [`report`].

pub mod report;

use std::io;

use crate::sink::DocumentSink;

pub use report::{file_anchor, package_anchor, package_summary_table, summary_table, violation_table};

type CellFn<'a, T> = Box<dyn Fn(&mut dyn DocumentSink, &T) -> io::Result<()> + 'a>;

/// One table column.
pub struct Column<'a, T> {
    header: String,
    cell: CellFn<'a, T>,
}

impl<'a, T> Column<'a, T> {
    /// Column whose cells are rendered by `cell`.
    #[must_use]
    pub fn new(
        header: impl Into<String>,
        cell: impl Fn(&mut dyn DocumentSink, &T) -> io::Result<()> + 'a,
    ) -> Self {
        Self {
            header: header.into(),
            cell: Box::new(cell),
        }
    }

    /// Column whose cells hold plain text computed from the row.
    #[must_use]
    pub fn text<S>(header: impl Into<String>, value: impl Fn(&T) -> S + 'a) -> Self
    where
        S: AsRef<str> + 'a,
        T: 'a,
    {
        Self::new(header, move |sink, row| sink.text(value(row).as_ref()))
    }

    #[must_use]
    pub fn header(&self) -> &str {
        &self.header
    }
}

/// Ordered columns rendering rows of type `T`.
pub struct Table<'a, T> {
    columns: Vec<Column<'a, T>>,
}

impl<'a, T> Table<'a, T> {
    #[must_use]
    pub fn new(columns: Vec<Column<'a, T>>) -> Self {
        Self { columns }
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Headers in column order.
    #[must_use]
    pub fn headers(&self) -> Vec<&str> {
        self.columns.iter().map(Column::header).collect()
    }

    /// Emit the header row.
    ///
    /// # Errors
    ///
    /// Returns the first error reported by `sink`.
    pub fn render_header(&self, sink: &mut dyn DocumentSink) -> io::Result<()> {
        sink.start_row()?;
        for column in &self.columns {
            sink.start_header_cell()?;
            sink.text(&column.header)?;
            sink.end_header_cell()?;
        }
        sink.end_row()
    }

    /// Emit the content of cell `index` for `row`, without the cell delimiters.
    ///
    /// # Errors
    ///
    /// Returns an [`io::ErrorKind::InvalidInput`] error when `index` is not
    /// below [`column_count`](Self::column_count), otherwise the first error
    /// reported by `sink`.
    pub fn render_cell(&self, sink: &mut dyn DocumentSink, row: &T, index: usize) -> io::Result<()> {
        let column = self.columns.get(index).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "column index {index} out of range for table with {} columns",
                    self.columns.len()
                ),
            )
        })?;
        (column.cell)(sink, row)
    }

    /// Emit one data row, cells in ascending column order.
    ///
    /// # Errors
    ///
    /// Returns the first error reported by `sink`.
    pub fn render_row(&self, sink: &mut dyn DocumentSink, row: &T) -> io::Result<()> {
        sink.start_row()?;
        for index in 0..self.columns.len() {
            sink.start_cell()?;
            self.render_cell(sink, row, index)?;
            sink.end_cell()?;
        }
        sink.end_row()
    }

    /// Emit a complete table: header row followed by one row per element.
    ///
    /// # Errors
    ///
    /// Returns the first error reported by `sink`.
    pub fn render_rows<'r, I>(&self, sink: &mut dyn DocumentSink, rows: I) -> io::Result<()>
    where
        I: IntoIterator<Item = &'r T>,
        T: 'r,
    {
        self.render_with(sink, |emit| rows.into_iter().try_for_each(emit))
    }

    /// Emit a complete table whose rows are pushed by `producer`.
    ///
    /// The producer receives a row callback and calls it once per row, in
    /// emission order. It should stop and return the first error the
    /// callback reports.
    ///
    /// # Errors
    ///
    /// Returns the first error reported by `sink` or `producer`.
    pub fn render_with<P>(&self, sink: &mut dyn DocumentSink, producer: P) -> io::Result<()>
    where
        P: FnOnce(&mut dyn FnMut(&T) -> io::Result<()>) -> io::Result<()>,
    {
        sink.start_table()?;
        self.render_header(sink)?;
        producer(&mut |row: &T| self.render_row(&mut *sink, row))?;
        sink.end_table()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{RecordingSink, SinkEvent};

    fn indexed_table() -> Table<'static, u32> {
        Table::new(vec![
            Column::text("A", |row: &u32| format!("a{row}")),
            Column::text("B", |row: &u32| format!("b{row}")),
            Column::text("C", |row: &u32| format!("c{row}")),
        ])
    }

    #[test]
    fn test_column_count_matches_headers() {
        let table = indexed_table();
        assert_eq!(table.column_count(), 3);
        assert_eq!(table.headers(), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_render_row_emits_cells_in_order() {
        let table = indexed_table();
        let mut sink = RecordingSink::new();
        table.render_row(&mut sink, &7).unwrap();

        let texts: Vec<&SinkEvent> = sink
            .events()
            .iter()
            .filter(|e| matches!(e, SinkEvent::Text(_)))
            .collect();
        assert_eq!(
            texts,
            vec![
                &SinkEvent::Text("a7".to_owned()),
                &SinkEvent::Text("b7".to_owned()),
                &SinkEvent::Text("c7".to_owned()),
            ]
        );
        assert_eq!(sink.events().first(), Some(&SinkEvent::StartRow));
        assert_eq!(sink.events().last(), Some(&SinkEvent::EndRow));
        let cells = sink
            .events()
            .iter()
            .filter(|e| matches!(e, SinkEvent::StartCell))
            .count();
        assert_eq!(cells, 3);
    }

    #[test]
    fn test_render_cell_out_of_range() {
        let table = indexed_table();
        let mut sink = RecordingSink::new();
        let err = table.render_cell(&mut sink, &1, 3).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_render_rows_builds_full_table() {
        let table = indexed_table();
        let mut sink = RecordingSink::new();
        table.render_rows(&mut sink, &[1, 2]).unwrap();

        let tables = sink.tables();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].headers, vec!["A", "B", "C"]);
        assert_eq!(
            tables[0].rows,
            vec![vec!["a1", "b1", "c1"], vec!["a2", "b2", "c2"]]
        );
    }

    #[test]
    fn test_render_rows_empty_emits_header_only() {
        let table = indexed_table();
        let mut sink = RecordingSink::new();
        table.render_rows(&mut sink, &[]).unwrap();

        let tables = sink.tables();
        assert_eq!(tables[0].headers.len(), 3);
        assert!(tables[0].rows.is_empty());
    }

    #[test]
    fn test_render_with_pushes_rows_in_emission_order() {
        let table = indexed_table();
        let mut sink = RecordingSink::new();
        table
            .render_with(&mut sink, |emit| {
                for row in (1..=3).rev() {
                    emit(&row)?;
                }
                Ok(())
            })
            .unwrap();

        let rows: Vec<String> = sink.tables()[0].rows.iter().map(|r| r[0].clone()).collect();
        assert_eq!(rows, vec!["a3", "a2", "a1"]);
    }

    #[test]
    fn test_render_with_stops_on_sink_error() {
        let table = indexed_table();
        // start_table plus the header row; the first data row is rejected
        let mut sink = RecordingSink::failing_after(12);
        let mut produced = 0;
        let result = table.render_with(&mut sink, |emit| {
            for row in 0..5 {
                produced += 1;
                emit(&row)?;
            }
            Ok(())
        });
        assert!(result.is_err());
        assert_eq!(produced, 1);
    }
}
