//! Shared test utilities for creating test environments.
//!
//! This module is only compiled when running tests (`#[cfg(test)]`).

use crate::model::PriorityTable;
use crate::Config;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

/// Test environment that sets up an initialized posr home directory.
/// Holds TempDir to keep the directory alive for the duration of the test.
pub struct TestEnv {
    temp_dir: TempDir,
    config: Config,
    table: Arc<PriorityTable>,
}

impl TestEnv {
    /// Creates a test environment with the default Config.
    pub async fn new() -> Self {
        Self::create(None).await
    }

    /// Creates a test environment whose Config has the given `message_limit`.
    pub async fn with_message_limit(message_limit: usize) -> Self {
        Self::create(Some(message_limit)).await
    }

    async fn create(message_limit: Option<usize>) -> Self {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("posr");
        let config = Config::create(&root, message_limit).await.unwrap();
        Self {
            temp_dir,
            config,
            table: Arc::new(PriorityTable::default()),
        }
    }

    /// Returns a clone of the Config.
    pub fn config(&self) -> Config {
        self.config.clone()
    }

    /// Returns the shared default priority table.
    pub fn table(&self) -> Arc<PriorityTable> {
        Arc::clone(&self.table)
    }

    /// Writes `contents` to a file called `name` outside of the home directory and returns its
    /// path.
    pub fn write_file(&self, name: &str, contents: impl AsRef<[u8]>) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }
}
