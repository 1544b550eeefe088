pub mod classify;
pub mod cli;
pub mod cursor;
pub mod dialect;
pub mod error;
mod export;
pub mod io_utils;
mod preview;
mod probe;
pub mod raw_table;
pub mod scan;
pub mod sql;
mod sql_cmd;
pub mod table;
pub mod tokenize;
pub mod typed_table;

use std::{env, path::Path, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, debug, info};

use crate::cli::{Cli, Commands, InputArgs, LayoutArgs};

pub use crate::{
    cursor::ByteCursor,
    dialect::{Dialect, IngestOptions, QuoteHandling, Strictness},
    error::IngestError,
    raw_table::RawTable,
    scan::{Dimensions, scan},
    tokenize::{Token, TokenSink, tokenize},
    typed_table::{
        CellValue, ColumnSummary, ColumnType, NumericValues, TypeMask, TypedColumn, TypedTable,
        TypedTableBuilder,
    },
};
pub use csv;

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("csv_ingest", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Probe(args) => probe::execute(&args),
        Commands::Preview(args) => preview::execute(&args),
        Commands::Sql(args) => sql_cmd::execute(&args),
        Commands::Export(args) => export::execute(&args),
    }
}

pub(crate) fn quote_handling(strip: bool) -> QuoteHandling {
    if strip {
        QuoteHandling::Strip
    } else {
        QuoteHandling::Retain
    }
}

pub(crate) fn dialect_from_args(args: &InputArgs, handling: QuoteHandling) -> Dialect {
    Dialect {
        quote: args.quote,
        trim_carriage_return: !args.keep_cr,
        ..Dialect::default()
    }
    .with_field_delimiter(io_utils::resolve_input_delimiter(&args.input, args.delimiter))
    .with_quote_handling(handling)
}

pub(crate) fn options_from_args(
    input: &InputArgs,
    layout: &LayoutArgs,
    handling: QuoteHandling,
) -> IngestOptions {
    let header_row = (!layout.no_header).then_some(layout.header_row);
    let data_row = layout
        .data_row
        .unwrap_or_else(|| header_row.map_or(0, |row| row + 1));
    IngestOptions {
        dialect: dialect_from_args(input, handling),
        header_row,
        data_row,
        strictness: if input.strict {
            Strictness::Strict
        } else {
            Strictness::BestEffort
        },
    }
}

/// Reads `input`, then runs typed ingestion. With `progress` set, completion
/// is logged at every tenth of the source rows.
pub(crate) fn load_typed_table(
    input: &InputArgs,
    options: &IngestOptions,
    progress: bool,
) -> Result<TypedTable> {
    info!(
        "Ingesting '{}' with delimiter '{}'",
        input.input.display(),
        printable_delimiter(options.dialect.field_delimiter)
    );
    let bytes = io_utils::load_input(&input.input, input.input_encoding.as_deref())?;
    debug!("Loaded {} byte(s) from {:?}", bytes.len(), input.input);

    let mut cursor = ByteCursor::new(&bytes);
    let mut last_decile = 0u32;
    let mut log_progress = |fraction: f32| {
        let decile = (fraction * 10.0).floor() as u32;
        if decile > last_decile {
            last_decile = decile;
            info!("Ingested {}% of {}", decile * 10, display_path(&input.input));
        }
    };
    let callback: Option<&mut dyn FnMut(f32)> = if progress {
        Some(&mut log_progress)
    } else {
        None
    };
    TypedTable::from_csv(&mut cursor, options, callback)
        .with_context(|| format!("Ingesting {:?}", input.input))
}

pub(crate) fn display_path(path: &Path) -> String {
    if io_utils::is_dash(path) {
        "stdin".to_string()
    } else {
        path.display().to_string()
    }
}

pub(crate) fn printable_delimiter(delimiter: u8) -> String {
    match delimiter {
        b',' => ",".to_string(),
        b'\t' => "\\t".to_string(),
        b'\n' => "\\n".to_string(),
        other => (other as char).to_string(),
    }
}
