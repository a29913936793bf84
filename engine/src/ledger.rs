//! Ledger - the in-memory stock state.
//!
//! The Ledger holds one [`ItemEntry`] per item name and performs every
//! mutation on them. It keeps, for each item, the balance equal to delivered
//! minus consumed stock and never lets a consumption drive it below zero.

use crate::{
    error::Result, Amount, DateKey, DeliveryRecord, Error, ItemEntry, ItemName, Mutation,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Result of applying a mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Applied {
    /// The item affected, `None` for a clear-all
    pub item: Option<ItemName>,
    /// Balance of the item after the mutation, if it still exists
    pub balance: Option<Amount>,
    /// Whether the ledger changed; `false` for a no-op deletion
    pub changed: bool,
    /// Whether a delivery deletion had to clamp the balance to zero
    pub clamped: bool,
}

/// The ledger of all items.
///
/// Items iterate in the order their names were first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    /// Entries in first-seen order
    items: Vec<(ItemName, ItemEntry)>,
    /// Position of each name in `items`
    index: HashMap<ItemName, usize>,
}

impl Ledger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the ledger holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether an entry exists for `item`.
    pub fn contains(&self, item: &str) -> bool {
        self.index.contains_key(item)
    }

    /// Get the entry for an item.
    pub fn get(&self, item: &str) -> Option<&ItemEntry> {
        self.index.get(item).map(|&i| &self.items[i].1)
    }

    fn get_mut(&mut self, item: &str) -> Option<&mut ItemEntry> {
        let i = *self.index.get(item)?;
        Some(&mut self.items[i].1)
    }

    fn entry(&mut self, item: ItemName) -> &mut ItemEntry {
        let i = match self.index.get(&item) {
            Some(&i) => i,
            None => {
                let i = self.items.len();
                self.index.insert(item.clone(), i);
                self.items.push((item, ItemEntry::new()));
                i
            }
        };
        &mut self.items[i].1
    }

    /// All items with their entries, in first-seen order.
    pub fn list_items(&self) -> impl ExactSizeIterator<Item = (&ItemName, &ItemEntry)> {
        self.items.iter().map(|(name, entry)| (name, entry))
    }

    /// Record a delivery, creating the item on first use.
    ///
    /// Returns the new balance. Fails without touching the ledger if the
    /// balance would overflow.
    pub fn add_delivery(
        &mut self,
        item: impl Into<ItemName>,
        date: impl Into<DateKey>,
        amount: Amount,
    ) -> Result<Amount> {
        if amount == 0 {
            return Err(Error::InvalidQuantity(
                "delivery amount must be positive".to_string(),
            ));
        }

        let item = item.into();
        let record = DeliveryRecord::new(date, amount);
        match self.get_mut(&item) {
            Some(entry) => entry.push_delivery(record).ok_or_else(|| overflow(&item)),
            None => {
                // A fresh entry starts at zero, so its first delivery always fits.
                self.entry(item).push_delivery(record);
                Ok(amount)
            }
        }
    }

    /// Record consumption of an existing item.
    ///
    /// Same-day consumption accumulates into a single entry. Fails without
    /// touching the ledger if the item is unknown, the balance is too low, or
    /// the day's total would overflow. Returns the new balance.
    pub fn record_consumption(
        &mut self,
        item: &str,
        date: impl Into<DateKey>,
        amount: Amount,
    ) -> Result<Amount> {
        if amount == 0 {
            return Err(Error::InvalidQuantity(
                "consumption amount must be positive".to_string(),
            ));
        }

        let entry = self
            .get_mut(item)
            .ok_or_else(|| Error::ItemNotFound(item.to_string()))?;

        if amount > entry.balance() {
            return Err(Error::InsufficientStock {
                item: item.to_string(),
                requested: amount,
                available: entry.balance(),
            });
        }

        entry
            .consume(date.into(), amount)
            .ok_or_else(|| overflow(item))
    }

    /// Remove the delivery at `index`.
    ///
    /// A missing item or an out-of-range index is a no-op and returns `None`.
    /// Later deliveries shift down by one. The balance is reduced by the
    /// removed amount but never below zero, even if that stock was already
    /// consumed; see [`ItemEntry::is_reconciled`].
    pub fn delete_delivery(&mut self, item: &str, index: usize) -> Option<DeliveryRecord> {
        self.remove_delivery(item, index).map(|(record, _)| record)
    }

    fn remove_delivery(&mut self, item: &str, index: usize) -> Option<(DeliveryRecord, bool)> {
        self.get_mut(item)?.remove_delivery(index)
    }

    /// Remove the consumption entry for `date`, returning its amount to stock.
    ///
    /// A missing item or date is a no-op and returns `Ok(None)`. Fails without
    /// touching the ledger if the restored balance would overflow.
    pub fn delete_consumption(&mut self, item: &str, date: &str) -> Result<Option<Amount>> {
        let Some(entry) = self.get_mut(item) else {
            return Ok(None);
        };
        if entry.restore_overflows(date) {
            return Err(overflow(item));
        }
        Ok(entry.remove_consumption(date))
    }

    /// Remove every item. Returns how many items were dropped.
    pub fn clear_all(&mut self) -> usize {
        let removed = self.items.len();
        self.items.clear();
        self.index.clear();
        removed
    }

    /// Consumption of an item as `(date, amount)` pairs, ascending by date.
    ///
    /// Unknown items are an error; a known item without consumption yields an
    /// empty series.
    pub fn consumption_series(&self, item: &str) -> Result<Vec<(DateKey, Amount)>> {
        let entry = self
            .get(item)
            .ok_or_else(|| Error::ItemNotFound(item.to_string()))?;

        Ok(entry
            .consumption()
            .iter()
            .map(|(date, &amount)| (date.clone(), amount))
            .collect())
    }

    /// Apply a mutation to the ledger.
    ///
    /// Either the whole mutation takes effect or, on error, nothing does.
    pub fn apply(&mut self, mutation: Mutation) -> Result<Applied> {
        let applied = match mutation {
            Mutation::AddDelivery(m) => {
                let balance = self.add_delivery(m.item.clone(), m.date, m.amount)?;
                Applied::changed(m.item, balance)
            }
            Mutation::RecordConsumption(m) => {
                let balance = self.record_consumption(&m.item, m.date, m.amount)?;
                Applied::changed(m.item, balance)
            }
            Mutation::DeleteDelivery(m) => match self.remove_delivery(&m.item, m.index) {
                Some((_, clamped)) => {
                    let balance = self.balance_of(&m.item);
                    Applied {
                        clamped,
                        ..Applied::changed(m.item, balance)
                    }
                }
                None => self.unchanged(m.item),
            },
            Mutation::DeleteConsumption(m) => match self.delete_consumption(&m.item, &m.date)? {
                Some(_) => {
                    let balance = self.balance_of(&m.item);
                    Applied::changed(m.item, balance)
                }
                None => self.unchanged(m.item),
            },
            Mutation::ClearAll => {
                let removed = self.clear_all();
                Applied {
                    item: None,
                    balance: None,
                    changed: removed > 0,
                    clamped: false,
                }
            }
        };

        Ok(applied)
    }

    fn balance_of(&self, item: &str) -> Amount {
        self.get(item).map(ItemEntry::balance).unwrap_or(0)
    }

    fn unchanged(&self, item: ItemName) -> Applied {
        Applied {
            balance: self.get(&item).map(ItemEntry::balance),
            item: Some(item),
            changed: false,
            clamped: false,
        }
    }

    /// Export the current ledger as a snapshot.
    pub fn export_state(&self) -> crate::snapshot::LedgerSnapshot {
        let mut snapshot = crate::snapshot::LedgerSnapshot::new();
        for (name, entry) in &self.items {
            snapshot.add_item(name.clone(), entry.clone());
        }
        snapshot
    }

    /// Replace the ledger contents with a snapshot's.
    ///
    /// The snapshot is validated first; on error the ledger is left as it was.
    pub fn import_state(&mut self, snapshot: crate::snapshot::LedgerSnapshot) -> Result<()> {
        snapshot.validate()?;

        self.clear_all();
        for (name, entry) in snapshot.items {
            self.index.insert(name.clone(), self.items.len());
            self.items.push((name, entry));
        }

        Ok(())
    }

    /// Build a ledger from a snapshot.
    pub fn from_snapshot(snapshot: crate::snapshot::LedgerSnapshot) -> Result<Self> {
        let mut ledger = Self::new();
        ledger.import_state(snapshot)?;
        Ok(ledger)
    }
}

fn overflow(item: &str) -> Error {
    Error::InvalidQuantity(format!(
        "stock of '{}' would exceed {} minor units",
        item,
        Amount::MAX
    ))
}

impl Applied {
    fn changed(item: ItemName, balance: Amount) -> Self {
        Self {
            item: Some(item),
            balance: Some(balance),
            changed: true,
            clamped: false,
        }
    }
}
