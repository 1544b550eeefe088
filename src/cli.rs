use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Load CSV files into typed, column-oriented tables",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Infer column types and report them as a table (optionally as JSON)
    Probe(ProbeArgs),
    /// Show the first rows of a CSV file exactly as tokenized
    Preview(PreviewArgs),
    /// Render a SQL script that creates and fills a table from a CSV file
    Sql(SqlArgs),
    /// Re-serialize a CSV file with a different delimiter or encoding
    Export(ExportArgs),
}

#[derive(Debug, Args)]
pub struct InputArgs {
    /// Input CSV file (`-` reads from stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Field delimiter (supports ',', 'tab', ';', '|'); defaults from the file extension
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Quote character that toggles quoted spans
    #[arg(long, value_parser = parse_quote, default_value = "\"")]
    pub quote: u8,
    /// Keep a carriage return that precedes the line feed as cell text
    #[arg(long = "keep-cr")]
    pub keep_cr: bool,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Fail on rows wider than the first row or unterminated quotes
    #[arg(long)]
    pub strict: bool,
}

#[derive(Debug, Args)]
pub struct LayoutArgs {
    /// 0-based row holding the column labels
    #[arg(long = "header-row", default_value_t = 0, conflicts_with = "no_header")]
    pub header_row: usize,
    /// Treat every row as data and synthesize column labels
    #[arg(long = "no-header")]
    pub no_header: bool,
    /// 0-based row where data starts (defaults to the row after the header)
    #[arg(long = "data-row")]
    pub data_row: Option<usize>,
}

#[derive(Debug, Args)]
pub struct ProbeArgs {
    #[command(flatten)]
    pub input: InputArgs,
    #[command(flatten)]
    pub layout: LayoutArgs,
    /// Drop quote characters from cell text instead of keeping them
    #[arg(long = "strip-quotes")]
    pub strip_quotes: bool,
    /// Write the column summaries as JSON to this path
    #[arg(short, long)]
    pub meta: Option<PathBuf>,
    /// Log ingestion progress
    #[arg(long)]
    pub progress: bool,
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// Number of data rows to display
    #[arg(long, default_value_t = 10)]
    pub rows: usize,
    /// Display the first row as data instead of as column labels
    #[arg(long = "no-header")]
    pub no_header: bool,
    /// Drop quote characters from cell text instead of keeping them
    #[arg(long = "strip-quotes")]
    pub strip_quotes: bool,
}

#[derive(Debug, Args)]
pub struct SqlArgs {
    #[command(flatten)]
    pub input: InputArgs,
    #[command(flatten)]
    pub layout: LayoutArgs,
    /// Name of the table to create
    #[arg(short, long)]
    pub table: String,
    /// Keep quote characters in cell text and column names
    #[arg(long = "keep-quotes")]
    pub keep_quotes: bool,
    /// Output script path (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Log ingestion progress
    #[arg(long)]
    pub progress: bool,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// Output CSV file (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Delimiter to use for output (defaults from the output extension, then the input delimiter)
    #[arg(long = "output-delimiter", value_parser = parse_delimiter)]
    pub output_delimiter: Option<u8>,
    /// Character encoding for the output file/stdout (defaults to utf-8)
    #[arg(long = "output-encoding")]
    pub output_encoding: Option<String>,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => parse_single_ascii(other, "Delimiter"),
    }
}

pub fn parse_quote(value: &str) -> Result<u8, String> {
    match value {
        "double" => Ok(b'"'),
        "single" => Ok(b'\''),
        other => parse_single_ascii(other, "Quote"),
    }
}

fn parse_single_ascii(value: &str, what: &str) -> Result<u8, String> {
    let mut chars = value.chars();
    let first = chars
        .next()
        .ok_or_else(|| format!("{what} cannot be empty"))?;
    if chars.next().is_some() {
        return Err(format!("{what} must be a single character"));
    }
    if !first.is_ascii() {
        return Err(format!("{what} must be ASCII"));
    }
    Ok(first as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_delimiter_accepts_names_and_symbols() {
        assert_eq!(parse_delimiter("tab"), Ok(b'\t'));
        assert_eq!(parse_delimiter("pipe"), Ok(b'|'));
        assert_eq!(parse_delimiter(":"), Ok(b':'));
        assert!(parse_delimiter("ab").is_err());
        assert!(parse_delimiter("é").is_err());
    }

    #[test]
    fn parse_quote_accepts_aliases() {
        assert_eq!(parse_quote("single"), Ok(b'\''));
        assert_eq!(parse_quote("\""), Ok(b'"'));
        assert!(parse_quote("").is_err());
    }

    #[test]
    fn quote_flags_belong_to_the_commands_that_use_them() {
        let parsed = Cli::try_parse_from(["csv-ingest", "sql", "-i", "a.csv", "-t", "t"])
            .expect("sql arguments");
        match parsed.command {
            Commands::Sql(args) => assert!(!args.keep_quotes),
            other => panic!("unexpected command {other:?}"),
        }
        assert!(Cli::try_parse_from(["csv-ingest", "probe", "-i", "a.csv", "--strip-quotes"]).is_ok());
        assert!(
            Cli::try_parse_from(["csv-ingest", "export", "-i", "a.csv", "--strip-quotes"]).is_err()
        );
    }
}
