use anyhow::Result;
use log::info;

use crate::{
    ByteCursor, RawTable, cli::PreviewArgs, dialect_from_args, display_path, io_utils,
    quote_handling, table,
};

pub fn execute(args: &PreviewArgs) -> Result<()> {
    let dialect = dialect_from_args(&args.input, quote_handling(args.strip_quotes));
    let bytes = io_utils::load_input(&args.input.input, args.input.input_encoding.as_deref())?;
    let mut cursor = ByteCursor::new(&bytes);
    let raw = if args.input.strict {
        RawTable::from_csv_strict(&mut cursor, &dialect)?
    } else {
        RawTable::from_csv(&mut cursor, &dialect)
    };

    let mut records = raw.rows();
    let headers: Vec<String> = if args.no_header {
        (1..=raw.num_columns()).map(|n| format!("column_{n}")).collect()
    } else {
        records.next().map(<[String]>::to_vec).unwrap_or_default()
    };
    let rows: Vec<Vec<String>> = records.take(args.rows).map(<[String]>::to_vec).collect();

    table::print_table(&headers, &rows, &[]);
    info!(
        "Displayed {} row(s) from {}",
        rows.len(),
        display_path(&args.input.input)
    );
    Ok(())
}
