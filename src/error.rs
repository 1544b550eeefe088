use log::warn;
use thiserror::Error;

/// Failures reported by strict ingestion. Best-effort ingestion never
/// produces these.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IngestError {
    #[error("row {row} has {columns} field(s) but the first row established {expected}")]
    RowTooWide {
        row: usize,
        columns: usize,
        expected: usize,
    },
    #[error("input ended inside a quoted span that opened in row {row}")]
    UnterminatedQuote { row: usize },
    #[error("header row {header_row} is beyond the {rows} row(s) in the input")]
    HeaderRowOutOfRange { header_row: usize, rows: usize },
}

/// Degradations observed while ingesting. Strict ingestion turns the first
/// one into an [`IngestError`]; best-effort ingestion only logs them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct IngestReport {
    pub expected_columns: usize,
    pub dropped_cells: usize,
    pub too_wide: Option<IngestError>,
    pub unterminated_quote: Option<usize>,
    pub header_out_of_range: Option<IngestError>,
}

impl IngestReport {
    pub fn new(expected_columns: usize) -> Self {
        Self {
            expected_columns,
            ..Self::default()
        }
    }

    pub fn note_row_width(&mut self, row: usize, fields: usize) {
        if fields > self.expected_columns && self.too_wide.is_none() {
            self.too_wide = Some(IngestError::RowTooWide {
                row,
                columns: fields,
                expected: self.expected_columns,
            });
        }
    }

    pub fn into_result(self) -> Result<(), IngestError> {
        if let Some(err) = self.header_out_of_range {
            return Err(err);
        }
        if let Some(err) = self.too_wide {
            return Err(err);
        }
        if let Some(row) = self.unterminated_quote {
            return Err(IngestError::UnterminatedQuote { row });
        }
        Ok(())
    }

    pub fn log_degradations(&self) {
        if let Some(err) = &self.header_out_of_range {
            warn!("{err}; column labels left empty");
        }
        if self.dropped_cells > 0 {
            warn!(
                "Dropped {} cell(s) beyond the {} column(s) of the first row",
                self.dropped_cells, self.expected_columns
            );
        }
        if let Some(row) = self.unterminated_quote {
            warn!("Input ended inside a quoted span opened in row {row}");
        }
    }
}
