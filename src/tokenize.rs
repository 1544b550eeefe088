//! Second pass: split the buffer into `(row, column, text)` tokens.
//!
//! A quote character toggles a quoted span inside which both delimiters are
//! ordinary text. There is no escape for an embedded quote: `""` simply
//! toggles twice. Tokens are handed to a [`TokenSink`] as soon as they close
//! and are never retained by the tokenizer.

use std::borrow::Cow;

use log::trace;

use crate::{
    cursor::ByteCursor,
    dialect::{Dialect, QuoteHandling},
    scan::Dimensions,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'t> {
    pub row: usize,
    pub column: usize,
    pub text: &'t str,
}

pub trait TokenSink {
    fn accept(&mut self, token: Token<'_>);

    /// Called once per source row after its last token, with the number of
    /// fields the row contained.
    fn end_row(&mut self, _row: usize, _fields: usize) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TokenizeSummary {
    pub rows: usize,
    pub tokens: usize,
    /// Row in which a quoted span opened and was never closed.
    pub unterminated_quote: Option<usize>,
}

pub fn tokenize<S>(
    cursor: &mut ByteCursor<'_>,
    dims: &Dimensions,
    dialect: &Dialect,
    sink: &mut S,
) -> TokenizeSummary
where
    S: TokenSink + ?Sized,
{
    cursor.seek(dims.start);

    let mut summary = TokenizeSummary::default();
    let mut scratch: Vec<u8> = Vec::with_capacity(dims.max_token_len);
    let mut in_quotes = false;
    let mut quote_row = 0usize;
    let mut trailing_cr = false;
    let mut row = 0usize;
    let mut column = 0usize;
    let mut row_open = false;

    while !cursor.is_exhausted() {
        let byte = cursor.read_u8();
        row_open = true;

        if byte == dialect.quote {
            in_quotes = !in_quotes;
            if in_quotes {
                quote_row = row;
            }
            if dialect.quote_handling == QuoteHandling::Retain {
                scratch.push(byte);
            }
            trailing_cr = false;
            continue;
        }

        if !in_quotes && byte == dialect.field_delimiter {
            emit(&mut scratch, row, column, sink, &mut summary);
            column += 1;
            trailing_cr = false;
            continue;
        }

        if !in_quotes && byte == dialect.record_delimiter {
            if trailing_cr && dialect.trim_carriage_return {
                scratch.pop();
            }
            emit(&mut scratch, row, column, sink, &mut summary);
            sink.end_row(row, column + 1);
            trace!("Closed row {} with {} field(s)", row, column + 1);
            row += 1;
            column = 0;
            row_open = false;
            trailing_cr = false;
            continue;
        }

        trailing_cr = byte == b'\r' && !in_quotes;
        scratch.push(byte);
    }

    if row_open {
        if trailing_cr && dialect.trim_carriage_return {
            scratch.pop();
        }
        emit(&mut scratch, row, column, sink, &mut summary);
        sink.end_row(row, column + 1);
        row += 1;
    }

    summary.rows = row;
    summary.unterminated_quote = in_quotes.then_some(quote_row);
    summary
}

fn emit<S>(
    scratch: &mut Vec<u8>,
    row: usize,
    column: usize,
    sink: &mut S,
    summary: &mut TokenizeSummary,
) where
    S: TokenSink + ?Sized,
{
    {
        let text: Cow<'_, str> = String::from_utf8_lossy(&scratch[..]);
        sink.accept(Token {
            row,
            column,
            text: text.as_ref(),
        });
    }
    summary.tokens += 1;
    scratch.clear();
}
