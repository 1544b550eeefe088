use anyhow::{Context, Result};
use encoding_rs::UTF_8;
use log::info;

use crate::{
    cli::SqlArgs, display_path, io_utils, load_typed_table, options_from_args, quote_handling,
    sql,
};

pub fn execute(args: &SqlArgs) -> Result<()> {
    // Quote characters would otherwise end up inside SQL literals and names.
    let options = options_from_args(
        &args.input,
        &args.layout,
        quote_handling(!args.keep_quotes),
    );
    let table = load_typed_table(&args.input, &options, args.progress)?;

    let mut writer = io_utils::open_output(args.output.as_deref(), UTF_8)?;
    let written = sql::write_load_script(&table, &args.table, &mut writer)
        .with_context(|| format!("Writing load script for table '{}'", args.table))?;
    info!(
        "Load script for {} row(s) from {} written to {}",
        written,
        display_path(&args.input.input),
        args.output
            .as_deref()
            .map_or_else(|| "stdout".to_string(), display_path)
    );
    Ok(())
}
