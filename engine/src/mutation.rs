//! Mutation types for expressing ledger changes.
//!
//! Every change to a [`Ledger`](crate::Ledger) can be described as a
//! [`Mutation`] and applied through [`Ledger::apply`](crate::Ledger::apply).
//! The boundary builds mutations from requests; the ledger decides whether
//! they hold.

use crate::{Amount, DateKey, ItemName};
use serde::{Deserialize, Serialize};

/// Record a delivery of stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddDelivery {
    /// Item receiving stock
    pub item: ItemName,
    /// Delivery date
    pub date: DateKey,
    /// Delivered amount in minor units
    pub amount: Amount,
}

/// Record stock consumed on a given date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordConsumption {
    /// Item being consumed
    pub item: ItemName,
    /// Consumption date
    pub date: DateKey,
    /// Consumed amount in minor units
    pub amount: Amount,
}

/// Remove a delivery by its position in the item's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteDelivery {
    /// Item owning the delivery
    pub item: ItemName,
    /// Position in the delivery history at the time of the call
    pub index: usize,
}

/// Remove the consumption entry for a date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteConsumption {
    /// Item owning the entry
    pub item: ItemName,
    /// Date of the entry to remove
    pub date: DateKey,
}

/// A change that can be applied to the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Mutation {
    AddDelivery(AddDelivery),
    RecordConsumption(RecordConsumption),
    DeleteDelivery(DeleteDelivery),
    DeleteConsumption(DeleteConsumption),
    ClearAll,
}

impl Mutation {
    /// Get the item this mutation targets, if any.
    pub fn item(&self) -> Option<&ItemName> {
        match self {
            Mutation::AddDelivery(m) => Some(&m.item),
            Mutation::RecordConsumption(m) => Some(&m.item),
            Mutation::DeleteDelivery(m) => Some(&m.item),
            Mutation::DeleteConsumption(m) => Some(&m.item),
            Mutation::ClearAll => None,
        }
    }

    /// Short name of the mutation kind, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Mutation::AddDelivery(_) => "add_delivery",
            Mutation::RecordConsumption(_) => "record_consumption",
            Mutation::DeleteDelivery(_) => "delete_delivery",
            Mutation::DeleteConsumption(_) => "delete_consumption",
            Mutation::ClearAll => "clear_all",
        }
    }
}

impl AddDelivery {
    /// Create a new delivery mutation.
    pub fn new(item: impl Into<ItemName>, date: impl Into<DateKey>, amount: Amount) -> Self {
        Self {
            item: item.into(),
            date: date.into(),
            amount,
        }
    }
}

impl RecordConsumption {
    /// Create a new consumption mutation.
    pub fn new(item: impl Into<ItemName>, date: impl Into<DateKey>, amount: Amount) -> Self {
        Self {
            item: item.into(),
            date: date.into(),
            amount,
        }
    }
}

impl DeleteDelivery {
    pub fn new(item: impl Into<ItemName>, index: usize) -> Self {
        Self {
            item: item.into(),
            index,
        }
    }
}

impl DeleteConsumption {
    pub fn new(item: impl Into<ItemName>, date: impl Into<DateKey>) -> Self {
        Self {
            item: item.into(),
            date: date.into(),
        }
    }
}

impl From<AddDelivery> for Mutation {
    fn from(m: AddDelivery) -> Self {
        Mutation::AddDelivery(m)
    }
}

impl From<RecordConsumption> for Mutation {
    fn from(m: RecordConsumption) -> Self {
        Mutation::RecordConsumption(m)
    }
}

impl From<DeleteDelivery> for Mutation {
    fn from(m: DeleteDelivery) -> Self {
        Mutation::DeleteDelivery(m)
    }
}

impl From<DeleteConsumption> for Mutation {
    fn from(m: DeleteConsumption) -> Self {
        Mutation::DeleteConsumption(m)
    }
}
