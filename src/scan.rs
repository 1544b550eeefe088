//! First pass: measure the shape of the input before anything is allocated.
//!
//! The scanner walks every byte once with the same quote toggle the
//! tokenizer uses, so the row and column counts it reports are exactly the
//! frame the second pass fills. Column count comes from the first row only.

use log::debug;

use crate::{cursor::ByteCursor, dialect::Dialect};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Dimensions {
    /// Cursor position the second pass rewinds to.
    pub start: usize,
    pub rows: usize,
    pub columns: usize,
    /// Longest run of bytes between two structural delimiters. Only a
    /// capacity hint for the token buffer.
    pub max_token_len: usize,
}

impl Dimensions {
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn cell_count(&self) -> usize {
        self.rows * self.columns
    }
}

pub fn scan(cursor: &mut ByteCursor<'_>, dialect: &Dialect) -> Dimensions {
    let start = cursor.position();
    let mut dims = Dimensions {
        start,
        ..Dimensions::default()
    };

    let mut in_quotes = false;
    let mut first_row = true;
    let mut first_row_fields = 1usize;
    let mut run = 0usize;
    let mut row_open = false;

    while !cursor.is_exhausted() {
        let byte = cursor.read_u8();
        row_open = true;
        if byte == dialect.quote {
            in_quotes = !in_quotes;
            run += 1;
        } else if !in_quotes && byte == dialect.field_delimiter {
            dims.max_token_len = dims.max_token_len.max(run);
            run = 0;
            if first_row {
                first_row_fields += 1;
            }
        } else if !in_quotes && byte == dialect.record_delimiter {
            dims.max_token_len = dims.max_token_len.max(run);
            run = 0;
            dims.rows += 1;
            row_open = false;
            if first_row {
                dims.columns = first_row_fields;
                first_row = false;
            }
        } else {
            run += 1;
        }
    }

    if row_open {
        dims.max_token_len = dims.max_token_len.max(run);
        dims.rows += 1;
        if first_row {
            dims.columns = first_row_fields;
        }
    }

    debug!(
        "Scanned {} byte(s): {} row(s) x {} column(s), longest token {} byte(s)",
        cursor.position() - start,
        dims.rows,
        dims.columns,
        dims.max_token_len
    );
    dims
}
