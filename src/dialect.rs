//! Delimiter/quoting dialect and ingestion options.

pub const DEFAULT_FIELD_DELIMITER: u8 = b',';
pub const DEFAULT_RECORD_DELIMITER: u8 = b'\n';
pub const DEFAULT_QUOTE: u8 = b'"';

/// What happens to the quote characters that open and close a quoted span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuoteHandling {
    /// Quote characters stay part of the token text.
    #[default]
    Retain,
    /// Quote characters are dropped from the token text.
    Strip,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialect {
    pub field_delimiter: u8,
    pub record_delimiter: u8,
    pub quote: u8,
    pub quote_handling: QuoteHandling,
    /// Drop a `\r` that directly precedes the record delimiter outside quotes.
    pub trim_carriage_return: bool,
}

impl Default for Dialect {
    fn default() -> Self {
        Self {
            field_delimiter: DEFAULT_FIELD_DELIMITER,
            record_delimiter: DEFAULT_RECORD_DELIMITER,
            quote: DEFAULT_QUOTE,
            quote_handling: QuoteHandling::Retain,
            trim_carriage_return: true,
        }
    }
}

impl Dialect {
    pub fn with_field_delimiter(mut self, delimiter: u8) -> Self {
        self.field_delimiter = delimiter;
        self
    }

    pub fn with_quote_handling(mut self, handling: QuoteHandling) -> Self {
        self.quote_handling = handling;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strictness {
    /// Malformed input degrades silently: dropped cells, default values.
    #[default]
    BestEffort,
    /// Malformed input is reported as an [`crate::error::IngestError`].
    Strict,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestOptions {
    pub dialect: Dialect,
    /// Row holding column labels; ignored unless it precedes `data_row`.
    pub header_row: Option<usize>,
    /// First row stored as data.
    pub data_row: usize,
    pub strictness: Strictness,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            dialect: Dialect::default(),
            header_row: Some(0),
            data_row: 1,
            strictness: Strictness::BestEffort,
        }
    }
}

impl IngestOptions {
    /// Every row is data and no labels are read.
    pub fn headerless() -> Self {
        Self {
            header_row: None,
            data_row: 0,
            ..Self::default()
        }
    }

    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn strict(mut self) -> Self {
        self.strictness = Strictness::Strict;
        self
    }

    pub fn is_strict(&self) -> bool {
        self.strictness == Strictness::Strict
    }

    pub(crate) fn captures_header(&self, row: usize) -> bool {
        self.header_row == Some(row) && row < self.data_row
    }
}
