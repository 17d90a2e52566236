use std::path::{Path, PathBuf};

use serde_json::Value;
use tempfile::TempDir;

use crate::error::TestError;

/// Test context owning a temporary data directory.
///
/// The directory and everything in it is removed when the context is dropped, so keep
/// the context alive for as long as the store under test is in use.
pub struct TestContext {
    dir: TempDir,
}

impl TestContext {
    /// Creates a context with a fresh, empty data directory.
    ///
    /// # Returns
    /// - `Ok(TestContext)` - New context
    /// - `Err(TestError::Io)` - The temporary directory could not be created
    pub fn new() -> Result<Self, TestError> {
        Ok(Self {
            dir: TempDir::new()?,
        })
    }

    /// Directory to hand to the store under test.
    pub fn data_dir(&self) -> &Path {
        self.dir.path()
    }

    /// Path of a file inside the data directory.
    pub fn path(&self, file_name: &str) -> PathBuf {
        self.dir.path().join(file_name)
    }

    /// Reads a store file back as untyped JSON.
    ///
    /// Lets tests assert on the exact on-disk format, e.g. that ids are written as strings.
    ///
    /// # Returns
    /// - `Ok(Value)` - Parsed file contents
    /// - `Err(TestError)` - The file is missing or is not valid JSON
    pub fn read_json(&self, file_name: &str) -> Result<Value, TestError> {
        let text = std::fs::read_to_string(self.path(file_name))?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Writes `value` as pretty JSON to a file inside the data directory.
    pub fn write_json(&self, file_name: &str, value: &Value) -> Result<(), TestError> {
        let text = serde_json::to_string_pretty(value)?;
        self.write_raw(file_name, &text)
    }

    /// Writes raw text to a file inside the data directory.
    pub fn write_raw(&self, file_name: &str, contents: &str) -> Result<(), TestError> {
        std::fs::write(self.path(file_name), contents)?;
        Ok(())
    }
}
