//! Rendering of SQL load scripts for a [`TypedTable`].
//!
//! Nothing here talks to a database; the output is plain text that declares
//! a table from the inferred column types and inserts every row with typed
//! literals inside a single transaction.

use std::{
    collections::HashSet,
    io::{self, Write},
};

use crate::typed_table::{CellValue, TypedTable};

/// Turns a header label into a bare SQL identifier. Characters outside
/// `[A-Za-z0-9_]` become `_`, a leading digit gets a `_` prefix and an empty
/// label falls back to `column_<n>` (1-based).
pub fn sanitize_identifier(label: &str, index: usize) -> String {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        return format!("column_{}", index + 1);
    }
    let mut ident: String = trimmed
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '_' => c,
            _ => '_',
        })
        .collect();
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    ident
}

/// Identifiers for every column, unique within the table. Later duplicates
/// get a numeric suffix.
pub fn column_identifiers(table: &TypedTable) -> Vec<String> {
    let mut seen = HashSet::new();
    table
        .headers()
        .enumerate()
        .map(|(idx, header)| {
            let base = sanitize_identifier(header, idx);
            let mut candidate = base.clone();
            let mut suffix = 2;
            while !seen.insert(candidate.to_ascii_lowercase()) {
                candidate = format!("{base}_{suffix}");
                suffix += 1;
            }
            candidate
        })
        .collect()
}

pub fn create_table_statement(table: &TypedTable, name: &str) -> String {
    let columns = column_identifiers(table)
        .iter()
        .enumerate()
        .map(|(idx, ident)| format!("{ident} {}", table.column_type(idx).sql_name()))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "CREATE TABLE {} ({columns});",
        sanitize_identifier(name, 0)
    )
}

/// Parameterised insert with one `@column` placeholder per column.
pub fn insert_template(table: &TypedTable, name: &str) -> String {
    let placeholders = column_identifiers(table)
        .iter()
        .map(|ident| format!("@{ident}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "INSERT INTO {} VALUES ({placeholders});",
        sanitize_identifier(name, 0)
    )
}

pub fn literal(value: CellValue<'_>) -> String {
    match value {
        CellValue::Null => "NULL".to_string(),
        CellValue::Integer(v) => v.to_string(),
        CellValue::Real(v) if v.fract() == 0.0 => format!("{v:.1}"),
        CellValue::Real(v) => v.to_string(),
        CellValue::Text(text) => format!("'{}'", text.replace('\'', "''")),
    }
}

pub fn insert_statement(table: &TypedTable, name: &str, row: usize) -> Option<String> {
    let values = table.row_values(row)?;
    let mut statement = format!("INSERT INTO {} VALUES (", sanitize_identifier(name, 0));
    for (idx, value) in values.into_iter().enumerate() {
        if idx > 0 {
            statement.push_str(", ");
        }
        statement.push_str(&literal(value));
    }
    statement.push_str(");");
    Some(statement)
}

/// Writes the table declaration followed by every row's insert, wrapped in
/// a transaction. Returns the number of rows written.
pub fn write_load_script<W: Write>(
    table: &TypedTable,
    name: &str,
    writer: &mut W,
) -> io::Result<usize> {
    writeln!(writer, "{}", create_table_statement(table, name))?;
    writeln!(writer, "BEGIN TRANSACTION;")?;
    let mut written = 0usize;
    for row in 0..table.num_rows() {
        if let Some(statement) = insert_statement(table, name, row) {
            writeln!(writer, "{statement}")?;
            written += 1;
        }
    }
    writeln!(writer, "END TRANSACTION;")?;
    writer.flush()?;
    Ok(written)
}
