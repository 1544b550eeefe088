use anyhow::{Context, Result};
use log::info;

use crate::{
    ByteCursor, QuoteHandling, RawTable, cli::ExportArgs, dialect_from_args, display_path,
    io_utils,
};

/// Quote characters are always stripped on the way in; the writer adds its
/// own quoting where a field needs it.
pub fn execute(args: &ExportArgs) -> Result<()> {
    let dialect = dialect_from_args(&args.input, QuoteHandling::Strip);
    let bytes = io_utils::load_input(&args.input.input, args.input.input_encoding.as_deref())?;
    let mut cursor = ByteCursor::new(&bytes);
    let raw = if args.input.strict {
        RawTable::from_csv_strict(&mut cursor, &dialect)?
    } else {
        RawTable::from_csv(&mut cursor, &dialect)
    };

    let output_delimiter = io_utils::resolve_output_delimiter(
        args.output.as_deref(),
        args.output_delimiter,
        dialect.field_delimiter,
    );
    let encoding = io_utils::resolve_encoding(args.output_encoding.as_deref())?;
    let mut writer = io_utils::open_csv_writer(args.output.as_deref(), output_delimiter, encoding)?;
    raw.write_records(&mut writer)
        .with_context(|| format!("Writing {} row(s)", raw.num_rows()))?;
    info!(
        "Exported {} row(s) from {} to {}",
        raw.num_rows(),
        display_path(&args.input.input),
        args.output
            .as_deref()
            .map_or_else(|| "stdout".to_string(), display_path)
    );
    Ok(())
}
