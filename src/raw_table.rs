//! Untyped ingestion: every cell kept verbatim as text.
//!
//! [`RawTable`] is a rectangular grid whose shape is fixed by the scan pass.
//! Writes outside the grid are ignored rather than growing it.

use std::io::Write;

use log::debug;

use crate::{
    cursor::ByteCursor,
    dialect::{DEFAULT_FIELD_DELIMITER, DEFAULT_RECORD_DELIMITER, Dialect},
    error::{IngestError, IngestReport},
    scan::scan,
    tokenize::{Token, TokenSink, tokenize},
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_size(rows: usize, columns: usize) -> Self {
        let mut table = Self::new();
        table.set_size(rows, columns);
        table
    }

    /// Best-effort ingestion; never fails.
    pub fn from_csv(cursor: &mut ByteCursor<'_>, dialect: &Dialect) -> Self {
        let (table, report) = ingest(cursor, dialect);
        report.log_degradations();
        table
    }

    /// Ingestion that rejects rows wider than the first row and unterminated
    /// quoted spans.
    pub fn from_csv_strict(
        cursor: &mut ByteCursor<'_>,
        dialect: &Dialect,
    ) -> Result<Self, IngestError> {
        let (table, report) = ingest(cursor, dialect);
        report.into_result()?;
        Ok(table)
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_columns(&self) -> usize {
        self.rows.first().map(Vec::len).unwrap_or(0)
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .map(String::as_str)
    }

    pub fn row(&self, row: usize) -> Option<&[String]> {
        self.rows.get(row).map(Vec::as_slice)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[String]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Reshapes the grid, keeping existing cells that still fit.
    pub fn set_size(&mut self, rows: usize, columns: usize) {
        self.rows.resize_with(rows, Vec::new);
        for cells in &mut self.rows {
            cells.resize_with(columns, String::new);
        }
    }

    /// Replaces a row. A shorter `values` overwrites only the leading cells;
    /// a longer one, or an out-of-range row, is ignored.
    pub fn set_row<S: AsRef<str>>(&mut self, row: usize, values: &[S]) {
        let Some(cells) = self.rows.get_mut(row) else {
            return;
        };
        if values.len() > cells.len() {
            return;
        }
        for (cell, value) in cells.iter_mut().zip(values) {
            value.as_ref().clone_into(cell);
        }
    }

    pub fn set_cell(&mut self, row: usize, column: usize, value: impl Into<String>) {
        if let Some(cell) = self.rows.get_mut(row).and_then(|cells| cells.get_mut(column)) {
            *cell = value.into();
        }
    }

    /// Byte length of [`RawTable::to_csv_string`]: every cell's UTF-8 bytes,
    /// one delimiter between adjacent cells and one terminator per row.
    pub fn size_in_bytes_as_csv(&self) -> usize {
        let cell_bytes: usize = self.rows.iter().flatten().map(String::len).sum();
        let delimiters = self.num_columns().saturating_sub(1);
        cell_bytes + self.num_rows() * delimiters + self.num_rows()
    }

    /// Joins cells with `field` and terminates every row with `record`.
    /// Cells are written verbatim; no quoting is added.
    pub fn to_delimited_string(&self, field: char, record: char) -> String {
        let mut output = String::with_capacity(self.size_in_bytes_as_csv());
        for cells in &self.rows {
            for (idx, cell) in cells.iter().enumerate() {
                if idx > 0 {
                    output.push(field);
                }
                output.push_str(cell);
            }
            output.push(record);
        }
        output
    }

    pub fn to_csv_string(&self) -> String {
        self.to_delimited_string(
            DEFAULT_FIELD_DELIMITER as char,
            DEFAULT_RECORD_DELIMITER as char,
        )
    }

    /// Writes every row through a `csv` writer, which applies its own quoting.
    pub fn write_records<W: Write>(&self, writer: &mut csv::Writer<W>) -> csv::Result<()> {
        for cells in &self.rows {
            writer.write_record(cells)?;
        }
        writer.flush()?;
        Ok(())
    }
}

struct GridSink<'t> {
    table: &'t mut RawTable,
    columns: usize,
    report: IngestReport,
}

impl TokenSink for GridSink<'_> {
    fn accept(&mut self, token: Token<'_>) {
        if token.column < self.columns {
            self.table.set_cell(token.row, token.column, token.text);
        } else {
            self.report.dropped_cells += 1;
        }
    }

    fn end_row(&mut self, row: usize, fields: usize) {
        self.report.note_row_width(row, fields);
    }
}

fn ingest(cursor: &mut ByteCursor<'_>, dialect: &Dialect) -> (RawTable, IngestReport) {
    let dims = scan(cursor, dialect);
    let mut table = RawTable::with_size(dims.rows, dims.columns);

    let mut sink = GridSink {
        table: &mut table,
        columns: dims.columns,
        report: IngestReport::new(dims.columns),
    };
    let summary = tokenize(cursor, &dims, dialect, &mut sink);
    let mut report = sink.report;
    report.unterminated_quote = summary.unterminated_quote;

    debug!(
        "Loaded raw table with {} row(s) x {} column(s) from {} token(s)",
        table.num_rows(),
        table.num_columns(),
        summary.tokens
    );
    (table, report)
}
