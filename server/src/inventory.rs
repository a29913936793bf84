//! The server's single owner of ledger state.
//!
//! Every request goes through one [`Inventory`] behind a mutex. A mutation is
//! applied to a copy of the ledger, the copy is flushed, and only then does it
//! replace the live ledger, so a rejected mutation or a failed flush leaves
//! nothing behind.

use std::sync::Arc;

use larder_engine::{Applied, Ledger, Mutation};
use tokio::sync::Mutex;

use crate::error::Result;
use crate::storage::{self, Persistence};

/// Inventory shared across handlers.
pub type SharedInventory = Arc<Mutex<Inventory>>;

/// Ledger plus the place it is persisted to.
#[derive(Debug)]
pub struct Inventory {
    ledger: Ledger,
    persistence: Persistence,
}

impl Inventory {
    /// Create an inventory around an already loaded ledger.
    pub fn new(ledger: Ledger, persistence: Persistence) -> Self {
        Self {
            ledger,
            persistence,
        }
    }

    /// Load the ledger from `persistence`; a missing store starts empty.
    pub async fn open(persistence: Persistence) -> storage::Result<Self> {
        let ledger = persistence.load().await?;
        Ok(Self::new(ledger, persistence))
    }

    /// Wrap in `Arc<Mutex<_>>` for sharing.
    pub fn into_shared(self) -> SharedInventory {
        Arc::new(Mutex::new(self))
    }

    /// The live ledger.
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Apply a mutation and make it durable.
    ///
    /// No-op deletions succeed without touching storage.
    pub async fn apply(&mut self, mutation: Mutation) -> Result<Applied> {
        let kind = mutation.kind();
        let target = mutation.item().cloned().unwrap_or_default();
        let mut staged = self.ledger.clone();
        let applied = staged.apply(mutation)?;

        if applied.changed {
            self.persistence.save(&staged).await?;
            self.ledger = staged;
        }

        if applied.clamped {
            tracing::warn!(
                item = %target,
                "Deleted delivery exceeded the remaining balance; balance clamped to zero"
            );
        }

        tracing::debug!(
            mutation = kind,
            item = %target,
            balance = applied.balance,
            changed = applied.changed,
            "Applied mutation"
        );

        Ok(applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::storage::JsonFileStore;
    use larder_engine::{AddDelivery, DeleteConsumption, RecordConsumption};
    use tempfile::TempDir;

    #[tokio::test]
    async fn apply_persists_changes() {
        let temp = TempDir::new().expect("temp dir");
        let path = temp.path().join("inventory.json");
        let mut inventory = Inventory::open(Persistence::File(JsonFileStore::new(&path)))
            .await
            .expect("open");

        inventory
            .apply(AddDelivery::new("tofu", "2024-01-01", 23).into())
            .await
            .expect("apply");

        let reopened = Inventory::open(Persistence::File(JsonFileStore::new(&path)))
            .await
            .expect("reopen");
        assert_eq!(reopened.ledger(), inventory.ledger());
    }

    #[tokio::test]
    async fn noop_does_not_write() {
        let temp = TempDir::new().expect("temp dir");
        let path = temp.path().join("inventory.json");
        let mut inventory = Inventory::new(
            Ledger::new(),
            Persistence::File(JsonFileStore::new(&path)),
        );

        let applied = inventory
            .apply(DeleteConsumption::new("tofu", "2024-01-01").into())
            .await
            .expect("apply");

        assert!(!applied.changed);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn rejected_mutation_changes_nothing() {
        let mut inventory = Inventory::new(Ledger::new(), Persistence::Memory);
        inventory
            .apply(AddDelivery::new("tofu", "2024-01-01", 23).into())
            .await
            .unwrap();
        let before = inventory.ledger().clone();

        let result = inventory
            .apply(RecordConsumption::new("tofu", "2024-01-02", 24).into())
            .await;

        assert!(matches!(result, Err(AppError::Ledger(_))));
        assert_eq!(inventory.ledger(), &before);
    }

    #[tokio::test]
    async fn failed_flush_keeps_previous_state() {
        let temp = TempDir::new().expect("temp dir");
        let path = temp.path().join("inventory.json");
        std::fs::create_dir(&path).unwrap();

        let mut inventory = Inventory::new(
            Ledger::new(),
            Persistence::File(JsonFileStore::new(&path)),
        );

        let result = inventory
            .apply(AddDelivery::new("tofu", "2024-01-01", 23).into())
            .await;

        assert!(matches!(result, Err(AppError::Storage(_))));
        assert!(inventory.ledger().is_empty());
    }
}
