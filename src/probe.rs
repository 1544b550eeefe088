use std::{fs::File, io::BufWriter};

use anyhow::{Context, Result};
use log::info;

use crate::{
    cli::ProbeArgs,
    display_path, load_typed_table, options_from_args, quote_handling,
    table::{self, Align},
    typed_table::ColumnSummary,
};

pub fn execute(args: &ProbeArgs) -> Result<()> {
    let options = options_from_args(&args.input, &args.layout, quote_handling(args.strip_quotes));
    let typed = load_typed_table(&args.input, &options, args.progress)?;
    let summaries = typed.summaries();

    let headers = ["#", "name", "type", "non-empty", "text-only"]
        .iter()
        .map(|h| h.to_string())
        .collect::<Vec<_>>();
    let rows = summaries.iter().map(summary_row).collect::<Vec<_>>();
    table::print_table(
        &headers,
        &rows,
        &[Align::Right, Align::Left, Align::Left, Align::Right, Align::Right],
    );
    info!(
        "Probed {} row(s) across {} column(s) in {}",
        typed.num_rows(),
        typed.num_columns(),
        display_path(&args.input.input)
    );

    if let Some(path) = &args.meta {
        let file = File::create(path).with_context(|| format!("Creating {path:?}"))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &summaries)
            .with_context(|| format!("Writing column summaries to {path:?}"))?;
        info!("Column summaries written to {path:?}");
    }
    Ok(())
}

fn summary_row(summary: &ColumnSummary) -> Vec<String> {
    vec![
        (summary.index + 1).to_string(),
        summary.name.clone(),
        summary.column_type.sql_name().to_string(),
        summary.non_empty.to_string(),
        summary.text_only.to_string(),
    ]
}
