//! Row-atomic persistence of completion records.

use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::core::RowResult;
use crate::error::Result;

/// Persists one JSON document per completed row.
///
/// Commits write to a temporary sibling and rename into place, so a partially
/// written row result is never observable. Row-index ownership (the partition
/// invariant) guarantees no two jobs ever target the same path, so no locking
/// is needed.
#[derive(Debug, Clone)]
pub struct ResultStore {
    dir: PathBuf,
    prefix: String,
}

impl ResultStore {
    /// Store rooted at `dir`; files are named `<prefix><row>.json`.
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
        }
    }

    /// Conventional prefix mirroring the historical per-row output naming.
    pub fn with_default_prefix(dir: impl Into<PathBuf>) -> Self {
        Self::new(dir, "record_r")
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Final path of a row's result document.
    pub fn path_for(&self, row: usize) -> PathBuf {
        self.dir.join(format!("{}{}.json", self.prefix, row))
    }

    fn tmp_path_for(&self, row: usize) -> PathBuf {
        self.dir.join(format!("{}{}.json.tmp", self.prefix, row))
    }

    /// Verify the output directory exists (creating it if needed) and is
    /// writable. Called during `--check` and before the first commit.
    pub fn prepare(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        Ok(())
    }

    /// Atomically persist one row result: temporary write, then rename.
    pub fn commit(&self, result: &RowResult) -> Result<()> {
        self.prepare()?;
        let tmp = self.tmp_path_for(result.row);
        {
            let file = fs::File::create(&tmp)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer(&mut writer, result)?;
            writer.flush()?;
        }
        fs::rename(&tmp, self.path_for(result.row))?;
        Ok(())
    }

    /// Load a previously committed row result.
    pub fn load(&self, row: usize) -> Result<RowResult> {
        let file = fs::File::open(self.path_for(row))?;
        let result: RowResult = serde_json::from_reader(BufReader::new(file))?;
        Ok(result)
    }

    /// True when a structurally valid result for `row` already exists.
    /// Truncated or foreign documents do not count as complete.
    pub fn is_complete(&self, row: usize) -> bool {
        match self.load(row) {
            Ok(result) => result.is_well_formed(row),
            Err(_) => false,
        }
    }
}
