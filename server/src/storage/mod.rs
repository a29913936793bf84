//! Persistence of the ledger between runs.

mod file;

pub use file::*;

use crate::config::Config;
use larder_engine::{Ledger, SnapshotMetadata};
use std::path::PathBuf;

/// Errors raised while loading or flushing the ledger.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("snapshot error: {0}")]
    Snapshot(#[from] larder_engine::Error),
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Where the ledger is kept between mutations.
#[derive(Debug, Clone)]
pub enum Persistence {
    /// Flush to a JSON file after every change
    File(JsonFileStore),
    /// Keep state in memory only; nothing survives a restart
    Memory,
}

impl Persistence {
    /// Pick the persistence mode described by the configuration.
    pub fn from_config(config: &Config) -> Self {
        match &config.data_file {
            Some(path) => Persistence::File(JsonFileStore::new(path)),
            None => Persistence::Memory,
        }
    }

    /// Load the stored ledger, or an empty one when nothing is stored yet.
    pub async fn load(&self) -> Result<Ledger> {
        let snapshot = match self {
            Persistence::File(store) => store.load().await?,
            Persistence::Memory => None,
        };

        match snapshot {
            Some(snapshot) => {
                let metadata = SnapshotMetadata::from(&snapshot);
                tracing::info!(
                    items = metadata.item_count,
                    deliveries = metadata.delivery_count,
                    consumption = metadata.consumption_count,
                    "Loaded ledger from {}",
                    self.describe()
                );
                if !metadata.unreconciled.is_empty() {
                    tracing::warn!(
                        items = ?metadata.unreconciled,
                        "Stored balances differ from their history"
                    );
                }
                Ok(Ledger::from_snapshot(snapshot)?)
            }
            None => {
                tracing::info!("No stored ledger at {}, starting empty", self.describe());
                Ok(Ledger::new())
            }
        }
    }

    /// Make the given ledger durable.
    pub async fn save(&self, ledger: &Ledger) -> Result<()> {
        match self {
            Persistence::File(store) => store.save(&ledger.export_state()).await,
            Persistence::Memory => Ok(()),
        }
    }

    /// Human-readable location, for logs.
    pub fn describe(&self) -> String {
        match self {
            Persistence::File(store) => store.path().display().to_string(),
            Persistence::Memory => "memory".to_string(),
        }
    }
}
