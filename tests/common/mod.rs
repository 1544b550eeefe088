#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use csv_ingest::{ByteCursor, Dialect, IngestOptions, RawTable, TypedTable};
use tempfile::{TempDir, tempdir};

/// Returns the absolute path to a fixture under `tests/data`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

pub fn fixture_bytes(name: &str) -> Vec<u8> {
    fs::read(fixture_path(name)).expect("read fixture")
}

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: impl AsRef<[u8]>) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        fs::write(&path, contents).expect("write temp file");
        path
    }
}

pub fn typed(input: &str) -> TypedTable {
    typed_with(input, &IngestOptions::default())
}

pub fn typed_with(input: &str, options: &IngestOptions) -> TypedTable {
    let mut cursor = ByteCursor::new(input.as_bytes());
    TypedTable::from_csv(&mut cursor, options, None).expect("typed ingestion")
}

pub fn raw(input: &str) -> RawTable {
    raw_with(input, &Dialect::default())
}

pub fn raw_with(input: &str, dialect: &Dialect) -> RawTable {
    let mut cursor = ByteCursor::new(input.as_bytes());
    RawTable::from_csv(&mut cursor, dialect)
}
