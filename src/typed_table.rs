//! Typed ingestion: per-column integer, real and text storage.
//!
//! Ingestion runs in two phases. [`scan`] sizes the input, then
//! [`TypedTableBuilder::populate`] tokenizes it a second time, classifies
//! each cell and lazily allocates only the arrays a column needs. Every array
//! is allocated once at the exact row count; nothing grows while populating.
//!
//! After population each column is finalized: a column that saw both integer
//! and real cells is unified into a single real array, and its type tag is
//! derived from which arrays existed before unification.
//!
//! ```
//! use csv_ingest::{ByteCursor, IngestOptions, TypedTable, ColumnType};
//!
//! let mut cursor = ByteCursor::new(b"id,score\n1,2.5\n2,3\n");
//! let table = TypedTable::from_csv(&mut cursor, &IngestOptions::default(), None).unwrap();
//! assert_eq!(table.num_rows(), 2);
//! assert_eq!(table.column_type(0), ColumnType::Integer);
//! assert_eq!(table.column_type(1), ColumnType::Mixed);
//! assert_eq!(table.reals(1), Some(&[2.5, 3.0][..]));
//! ```

use std::fmt;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::{
    classify::{CellKind, classify},
    cursor::ByteCursor,
    dialect::IngestOptions,
    error::{IngestError, IngestReport},
    scan::{Dimensions, scan},
    tokenize::{Token, TokenSink, tokenize},
};

/// Bit set over the kinds of value a column held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct TypeMask(u8);

impl TypeMask {
    pub const NONE: TypeMask = TypeMask(0);
    pub const INTEGER: TypeMask = TypeMask(1);
    pub const REAL: TypeMask = TypeMask(2);
    pub const TEXT: TypeMask = TypeMask(4);

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn insert(&mut self, other: TypeMask) {
        self.0 |= other.0;
    }
}

impl std::ops::BitOr for TypeMask {
    type Output = TypeMask;

    fn bitor(self, rhs: TypeMask) -> TypeMask {
        TypeMask(self.0 | rhs.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    /// No non-empty cell was seen.
    #[serde(rename = "NULL")]
    None,
    #[serde(rename = "INTEGER")]
    Integer,
    #[serde(rename = "REAL")]
    Real,
    #[serde(rename = "TEXT")]
    Text,
    /// Integer and real cells in the same column; stored as real.
    #[serde(rename = "Mixed")]
    Mixed,
}

impl ColumnType {
    pub fn from_mask(mask: TypeMask) -> Self {
        match mask {
            TypeMask::NONE => ColumnType::None,
            TypeMask::INTEGER => ColumnType::Integer,
            TypeMask::REAL => ColumnType::Real,
            TypeMask::TEXT => ColumnType::Text,
            _ => ColumnType::Mixed,
        }
    }

    pub fn mask(self) -> TypeMask {
        match self {
            ColumnType::None => TypeMask::NONE,
            ColumnType::Integer => TypeMask::INTEGER,
            ColumnType::Real => TypeMask::REAL,
            ColumnType::Text => TypeMask::TEXT,
            ColumnType::Mixed => TypeMask::INTEGER | TypeMask::REAL,
        }
    }

    /// Column type name used when declaring the column in SQL.
    pub fn sql_name(self) -> &'static str {
        match self {
            ColumnType::None => "NULL",
            ColumnType::Integer => "INTEGER",
            ColumnType::Real => "REAL",
            ColumnType::Text => "TEXT",
            ColumnType::Mixed => "Mixed",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sql_name())
    }
}

/// Numeric storage of a finalized column. A column holds at most one of the
/// two variants.
#[derive(Debug, Clone, PartialEq)]
pub enum NumericValues {
    Integer(Vec<i32>),
    Real(Vec<f32>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypedColumn {
    header: String,
    column_type: ColumnType,
    numeric: Option<NumericValues>,
    text: Option<Vec<String>>,
    non_empty: usize,
    text_only: usize,
}

impl TypedColumn {
    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }

    pub fn numeric(&self) -> Option<&NumericValues> {
        self.numeric.as_ref()
    }

    pub fn integers(&self) -> Option<&[i32]> {
        match &self.numeric {
            Some(NumericValues::Integer(values)) => Some(values),
            _ => None,
        }
    }

    pub fn reals(&self) -> Option<&[f32]> {
        match &self.numeric {
            Some(NumericValues::Real(values)) => Some(values),
            _ => None,
        }
    }

    pub fn texts(&self) -> Option<&[String]> {
        self.text.as_deref()
    }

    /// Cells with any source text.
    pub fn non_empty_cells(&self) -> usize {
        self.non_empty
    }

    /// Cells whose text matched neither numeric probe.
    pub fn text_only_cells(&self) -> usize {
        self.text_only
    }
}

/// One cell read back with the representation its column settled on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellValue<'a> {
    Null,
    Integer(i32),
    Real(f32),
    Text(&'a str),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub index: usize,
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    pub non_empty: usize,
    pub text_only: usize,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TypedTable {
    num_rows: usize,
    columns: Vec<TypedColumn>,
}

impl TypedTable {
    /// Scans and populates in one call. Best-effort options never return an
    /// error; strict options report the first malformation found.
    pub fn from_csv(
        cursor: &mut ByteCursor<'_>,
        options: &IngestOptions,
        progress: Option<&mut dyn FnMut(f32)>,
    ) -> Result<Self, IngestError> {
        let dims = scan(cursor, &options.dialect);
        TypedTableBuilder::new(dims, options).populate(cursor, progress)
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[TypedColumn] {
        &self.columns
    }

    pub fn column(&self, index: usize) -> Option<&TypedColumn> {
        self.columns.get(index)
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(TypedColumn::header)
    }

    pub fn header(&self, index: usize) -> Option<&str> {
        self.column(index).map(TypedColumn::header)
    }

    /// Out-of-range columns report [`ColumnType::None`].
    pub fn column_type(&self, index: usize) -> ColumnType {
        self.column(index)
            .map(TypedColumn::column_type)
            .unwrap_or(ColumnType::None)
    }

    pub fn integers(&self, index: usize) -> Option<&[i32]> {
        self.column(index).and_then(TypedColumn::integers)
    }

    pub fn reals(&self, index: usize) -> Option<&[f32]> {
        self.column(index).and_then(TypedColumn::reals)
    }

    pub fn texts(&self, index: usize) -> Option<&[String]> {
        self.column(index).and_then(TypedColumn::texts)
    }

    /// Source text of a cell, whatever its column type. Columns without any
    /// text have no cells to return.
    pub fn cell_as_str(&self, row: usize, column: usize) -> Option<&str> {
        self.texts(column)
            .and_then(|values| values.get(row))
            .map(String::as_str)
    }

    pub fn cell_value(&self, row: usize, column: usize) -> CellValue<'_> {
        let Some(col) = self.column(column) else {
            return CellValue::Null;
        };
        let Some(text) = col.texts().and_then(|values| values.get(row)) else {
            return CellValue::Null;
        };
        if text.is_empty() {
            return CellValue::Null;
        }
        match (classify(text), &col.numeric) {
            (CellKind::Text, _) | (_, None) => CellValue::Text(text),
            (_, Some(NumericValues::Integer(values))) => CellValue::Integer(values[row]),
            (_, Some(NumericValues::Real(values))) => CellValue::Real(values[row]),
        }
    }

    pub fn row_values(&self, row: usize) -> Option<Vec<CellValue<'_>>> {
        (row < self.num_rows).then(|| {
            (0..self.columns.len())
                .map(|column| self.cell_value(row, column))
                .collect()
        })
    }

    pub fn summaries(&self) -> Vec<ColumnSummary> {
        self.columns
            .iter()
            .enumerate()
            .map(|(index, column)| ColumnSummary {
                index,
                name: column.header.clone(),
                column_type: column.column_type,
                non_empty: column.non_empty,
                text_only: column.text_only,
            })
            .collect()
    }
}

#[derive(Debug, Default)]
struct ColumnBuilder {
    header: String,
    integers: Option<Vec<i32>>,
    reals: Option<Vec<f32>>,
    text: Option<Vec<String>>,
    non_empty: usize,
    text_only: usize,
}

fn allocate<T: Clone + Default>(slot: &mut Option<Vec<T>>, rows: usize) -> &mut Vec<T> {
    slot.get_or_insert_with(|| vec![T::default(); rows])
}

impl ColumnBuilder {
    fn store(&mut self, row: usize, token: &str, rows: usize) {
        if token.is_empty() || row >= rows {
            return;
        }
        self.non_empty += 1;
        match classify(token) {
            CellKind::Integer(value) => allocate(&mut self.integers, rows)[row] = value,
            CellKind::Real(value) => allocate(&mut self.reals, rows)[row] = value,
            CellKind::Text => self.text_only += 1,
        }
        allocate(&mut self.text, rows)[row] = token.to_string();
    }

    fn finish(self) -> TypedColumn {
        let mut mask = TypeMask::NONE;
        if self.reals.is_some() {
            mask.insert(TypeMask::REAL);
        }
        if self.integers.is_some() {
            mask.insert(TypeMask::INTEGER);
        }
        if self.text.is_some() && mask.is_empty() {
            mask.insert(TypeMask::TEXT);
        }

        let numeric = match (self.integers, self.reals) {
            (Some(integers), Some(mut reals)) => {
                for (real, integer) in reals.iter_mut().zip(&integers) {
                    if *real == 0.0 {
                        *real = *integer as f32;
                    }
                }
                Some(NumericValues::Real(reals))
            }
            (Some(integers), None) => Some(NumericValues::Integer(integers)),
            (None, Some(reals)) => Some(NumericValues::Real(reals)),
            (None, None) => None,
        };

        TypedColumn {
            header: self.header,
            column_type: ColumnType::from_mask(mask),
            numeric,
            text: self.text,
            non_empty: self.non_empty,
            text_only: self.text_only,
        }
    }
}

/// Table frame sized from a completed scan, waiting to be populated.
#[derive(Debug)]
pub struct TypedTableBuilder<'o> {
    dims: Dimensions,
    options: &'o IngestOptions,
    num_rows: usize,
    columns: Vec<ColumnBuilder>,
}

impl<'o> TypedTableBuilder<'o> {
    pub fn new(dims: Dimensions, options: &'o IngestOptions) -> Self {
        let mut columns = Vec::with_capacity(dims.columns);
        columns.resize_with(dims.columns, ColumnBuilder::default);
        Self {
            dims,
            options,
            num_rows: dims.rows.saturating_sub(options.data_row),
            columns,
        }
    }

    pub fn dimensions(&self) -> &Dimensions {
        &self.dims
    }

    /// Number of data rows the finished table will have.
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn populate(
        mut self,
        cursor: &mut ByteCursor<'_>,
        progress: Option<&mut dyn FnMut(f32)>,
    ) -> Result<TypedTable, IngestError> {
        let mut report = IngestReport::new(self.dims.columns);
        if let Some(header_row) = self.options.header_row {
            if header_row >= self.dims.rows {
                report.header_out_of_range = Some(IngestError::HeaderRowOutOfRange {
                    header_row,
                    rows: self.dims.rows,
                });
            }
        }

        let mut sink = PopulateSink {
            columns: &mut self.columns,
            options: self.options,
            num_rows: self.num_rows,
            source_rows: self.dims.rows,
            report: &mut report,
            progress,
        };
        let summary = tokenize(cursor, &self.dims, &self.options.dialect, &mut sink);
        report.unterminated_quote = summary.unterminated_quote;

        if self.options.is_strict() {
            report.into_result()?;
        } else {
            report.log_degradations();
        }

        Ok(self.finish())
    }

    fn finish(self) -> TypedTable {
        let columns: Vec<TypedColumn> = self
            .columns
            .into_iter()
            .map(ColumnBuilder::finish)
            .collect();
        debug!(
            "Finalized typed table with {} row(s): {}",
            self.num_rows,
            columns
                .iter()
                .map(|c| c.column_type.sql_name())
                .collect::<Vec<_>>()
                .join(", ")
        );
        TypedTable {
            num_rows: self.num_rows,
            columns,
        }
    }
}

struct PopulateSink<'b, 'p> {
    columns: &'b mut [ColumnBuilder],
    options: &'b IngestOptions,
    num_rows: usize,
    source_rows: usize,
    report: &'b mut IngestReport,
    progress: Option<&'p mut dyn FnMut(f32)>,
}

impl TokenSink for PopulateSink<'_, '_> {
    fn accept(&mut self, token: Token<'_>) {
        let Some(column) = self.columns.get_mut(token.column) else {
            self.report.dropped_cells += 1;
            return;
        };
        if token.row >= self.options.data_row {
            column.store(token.row - self.options.data_row, token.text, self.num_rows);
        } else if self.options.captures_header(token.row) {
            column.header = token.text.to_string();
        }
    }

    fn end_row(&mut self, row: usize, fields: usize) {
        self.report.note_row_width(row, fields);
        if let Some(report_progress) = self.progress.as_deref_mut() {
            let fraction = ((row + 1) as f64 / self.source_rows.max(1) as f64) as f32;
            trace!("Ingestion progress {:.1}%", fraction * 100.0);
            report_progress(fraction.min(1.0));
        }
    }
}
