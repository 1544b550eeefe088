//! File loading, delimiter resolution and output encoding.
//!
//! The ingestion engine only ever sees an in-memory byte buffer. This module
//! is the collaborator that produces that buffer: it reads a whole file (or
//! stdin for `-`), decodes it from the requested encoding into UTF-8, and on
//! the way out transcodes UTF-8 text into the requested output encoding.

use std::{
    fs::File,
    io::{self, BufWriter, Read, Write},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use encoding_rs::{Encoder, EncoderResult, Encoding, UTF_8};

use crate::dialect::DEFAULT_FIELD_DELIMITER;

pub const DEFAULT_TSV_DELIMITER: u8 = b'\t';

pub fn is_dash(path: &Path) -> bool {
    path == Path::new("-")
}

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    match label {
        Some(value) => Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| anyhow!("Unknown encoding '{value}'")),
        None => Ok(UTF_8),
    }
}

fn has_extension(path: &Path, wanted: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(wanted))
}

pub fn resolve_input_delimiter(path: &Path, provided: Option<u8>) -> u8 {
    provided.unwrap_or(if has_extension(path, "tsv") {
        DEFAULT_TSV_DELIMITER
    } else {
        DEFAULT_FIELD_DELIMITER
    })
}

pub fn resolve_output_delimiter(path: Option<&Path>, provided: Option<u8>, fallback: u8) -> u8 {
    match (provided, path) {
        (Some(delimiter), _) => delimiter,
        (None, Some(path)) if has_extension(path, "tsv") => DEFAULT_TSV_DELIMITER,
        (None, Some(path)) if has_extension(path, "csv") => DEFAULT_FIELD_DELIMITER,
        _ => fallback,
    }
}

pub fn read_input(path: &Path) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    if is_dash(path) {
        io::stdin()
            .lock()
            .read_to_end(&mut bytes)
            .context("Reading input from stdin")?;
    } else {
        File::open(path)
            .with_context(|| format!("Opening input file {path:?}"))?
            .read_to_end(&mut bytes)
            .with_context(|| format!("Reading input file {path:?}"))?;
    }
    Ok(bytes)
}

/// Converts raw input into UTF-8. A byte-order mark, when present, wins over
/// `encoding` and is removed.
pub fn decode_input(bytes: Vec<u8>, encoding: &'static Encoding) -> Result<Vec<u8>> {
    if let Some((sniffed, bom_len)) = Encoding::for_bom(&bytes) {
        if sniffed == UTF_8 {
            let mut bytes = bytes;
            bytes.drain(..bom_len);
            return Ok(bytes);
        }
        return decode_with(&bytes, sniffed);
    }
    if encoding == UTF_8 {
        return Ok(bytes);
    }
    decode_with(&bytes, encoding)
}

fn decode_with(bytes: &[u8], encoding: &'static Encoding) -> Result<Vec<u8>> {
    let (text, had_errors) = encoding.decode_with_bom_removal(bytes);
    if had_errors {
        return Err(anyhow!(
            "Failed to decode input with encoding {}",
            encoding.name()
        ));
    }
    Ok(text.into_owned().into_bytes())
}

pub fn load_input(path: &Path, encoding_label: Option<&str>) -> Result<Vec<u8>> {
    let encoding = resolve_encoding(encoding_label)?;
    let bytes = read_input(path)?;
    decode_input(bytes, encoding).with_context(|| format!("Decoding {path:?}"))
}

pub fn open_output(path: Option<&Path>, encoding: &'static Encoding) -> Result<Box<dyn Write>> {
    let base: Box<dyn Write> = match path {
        Some(p) if !is_dash(p) => Box::new(BufWriter::new(
            File::create(p).with_context(|| format!("Creating output file {p:?}"))?,
        )),
        _ => Box::new(io::stdout()),
    };
    if encoding == UTF_8 {
        Ok(base)
    } else {
        Ok(Box::new(TranscodingWriter::new(base, encoding)))
    }
}

pub fn open_csv_writer(
    path: Option<&Path>,
    delimiter: u8,
    encoding: &'static Encoding,
) -> Result<csv::Writer<Box<dyn Write>>> {
    let writer = open_output(path, encoding)?;
    Ok(csv::WriterBuilder::new()
        .delimiter(delimiter)
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(writer))
}

/// Accepts UTF-8 and writes it re-encoded. Incomplete trailing sequences are
/// held back until the next write. Invalid input and characters the target
/// encoding cannot represent are errors, as is a sequence still incomplete
/// at flush.
struct TranscodingWriter<W: Write> {
    inner: W,
    encoder: Encoder,
    pending: Vec<u8>,
    encoded: Vec<u8>,
}

impl<W: Write> TranscodingWriter<W> {
    fn new(inner: W, encoding: &'static Encoding) -> Self {
        Self {
            inner,
            encoder: encoding.new_encoder(),
            pending: Vec::new(),
            encoded: Vec::new(),
        }
    }

    /// Encodes the longest valid UTF-8 prefix of `pending`.
    fn drain_pending(&mut self) -> io::Result<()> {
        let valid_up_to = match std::str::from_utf8(&self.pending) {
            Ok(_) => self.pending.len(),
            Err(err) if err.error_len().is_some() => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    "Invalid UTF-8 sequence in output stream",
                ));
            }
            Err(err) => err.valid_up_to(),
        };
        if valid_up_to == 0 {
            return Ok(());
        }

        let text = std::str::from_utf8(&self.pending[..valid_up_to])
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
        let mut remaining = text;
        while !remaining.is_empty() {
            let needed = self
                .encoder
                .max_buffer_length_from_utf8_without_replacement(remaining.len())
                .unwrap_or(remaining.len() * 4 + 16);
            self.encoded.clear();
            self.encoded.reserve(needed);
            let (result, read) = self.encoder.encode_from_utf8_to_vec_without_replacement(
                remaining,
                &mut self.encoded,
                false,
            );
            self.inner.write_all(&self.encoded)?;
            remaining = &remaining[read..];
            if let EncoderResult::Unmappable(ch) = result {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!(
                        "Character '{ch}' cannot be encoded as {}",
                        self.encoder.encoding().name()
                    ),
                ));
            }
        }
        self.pending.drain(..valid_up_to);
        Ok(())
    }
}

impl<W: Write> Write for TranscodingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        self.drain_pending()?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.drain_pending()?;
        if !self.pending.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "Incomplete UTF-8 sequence at end of output stream",
            ));
        }
        self.inner.flush()
    }
}
