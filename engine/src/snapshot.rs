//! Snapshot types for persisting and restoring ledger state.
//!
//! Snapshots are the bridge between the in-memory Ledger and persistent
//! storage. Items serialize as a JSON object keyed by item name, in ledger
//! order, and every quantity is a plain integer count of minor units.

use crate::{error::Result, Error, ItemEntry, ItemName};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Version of the snapshot format for future compatibility.
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// A point-in-time snapshot of the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSnapshot {
    /// Snapshot format version
    pub format_version: u32,
    /// Item entries keyed by name, in first-seen order
    #[serde(with = "ordered_items", default)]
    pub items: Vec<(ItemName, ItemEntry)>,
}

impl Default for LedgerSnapshot {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerSnapshot {
    /// Create a new empty snapshot.
    pub fn new() -> Self {
        Self {
            format_version: SNAPSHOT_FORMAT_VERSION,
            items: Vec::new(),
        }
    }

    /// Append an item to the snapshot.
    pub fn add_item(&mut self, name: impl Into<ItemName>, entry: ItemEntry) {
        self.items.push((name.into(), entry));
    }

    /// Number of items.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Check the records a ledger relies on.
    ///
    /// Item names must be unique and every stored amount positive. Balances
    /// are not re-derived: a clamped delivery deletion legitimately leaves a
    /// balance that differs from the history.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::with_capacity(self.items.len());
        for (name, entry) in &self.items {
            if !seen.insert(name.as_str()) {
                return Err(Error::InvalidSnapshot(format!("duplicate item '{}'", name)));
            }

            if let Some(record) = entry.deliveries().iter().find(|d| d.amount == 0) {
                return Err(Error::InvalidSnapshot(format!(
                    "item '{}' has a zero delivery on {}",
                    name, record.date
                )));
            }

            if let Some((date, _)) = entry.consumption().iter().find(|(_, &a)| a == 0) {
                return Err(Error::InvalidSnapshot(format!(
                    "item '{}' has a zero consumption entry on {}",
                    name, date
                )));
            }
        }

        Ok(())
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::InvalidSnapshot(e.to_string()))
    }

    /// Serialize to pretty JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::InvalidSnapshot(e.to_string()))
    }

    /// Deserialize from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: Self =
            serde_json::from_str(json).map_err(|e| Error::InvalidSnapshot(e.to_string()))?;

        // Validate format version
        if snapshot.format_version > SNAPSHOT_FORMAT_VERSION {
            return Err(Error::InvalidSnapshot(format!(
                "unsupported snapshot format version: {} (max supported: {})",
                snapshot.format_version, SNAPSHOT_FORMAT_VERSION
            )));
        }

        Ok(snapshot)
    }
}

/// Summary of a snapshot (without the full data).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotMetadata {
    /// Snapshot format version
    pub format_version: u32,
    /// Total item count
    pub item_count: usize,
    /// Delivery records across all items
    pub delivery_count: usize,
    /// Consumption entries across all items
    pub consumption_count: usize,
    /// Items whose balance disagrees with their history
    pub unreconciled: Vec<ItemName>,
}

impl From<&LedgerSnapshot> for SnapshotMetadata {
    fn from(snapshot: &LedgerSnapshot) -> Self {
        Self {
            format_version: snapshot.format_version,
            item_count: snapshot.item_count(),
            delivery_count: snapshot
                .items
                .iter()
                .map(|(_, e)| e.deliveries().len())
                .sum(),
            consumption_count: snapshot
                .items
                .iter()
                .map(|(_, e)| e.consumption().len())
                .sum(),
            unreconciled: snapshot
                .items
                .iter()
                .filter(|(_, e)| !e.is_reconciled())
                .map(|(name, _)| name.clone())
                .collect(),
        }
    }
}

/// Serde adapter storing `(name, entry)` pairs as a JSON object while keeping
/// the pair order on both sides.
mod ordered_items {
    use crate::{ItemEntry, ItemName};
    use serde::de::{MapAccess, Visitor};
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S>(items: &[(ItemName, ItemEntry)], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(items.iter().map(|(name, entry)| (name, entry)))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<(ItemName, ItemEntry)>, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(ItemsVisitor)
    }

    struct ItemsVisitor;

    impl<'de> Visitor<'de> for ItemsVisitor {
        type Value = Vec<(ItemName, ItemEntry)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of item names to item entries")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut items = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((name, entry)) = map.next_entry::<ItemName, ItemEntry>()? {
                items.push((name, entry));
            }
            Ok(items)
        }
    }
}
