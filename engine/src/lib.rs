//! # Larder Engine
//!
//! A stock ledger for perishable kitchen inventory.
//!
//! This crate provides the core logic for tracking deliveries, consumption,
//! and the running balance of every item. It has no knowledge of files,
//! network, or presentation; callers drive it with plain operations and
//! persist the [`LedgerSnapshot`] it exports.
//!
//! ## Core Concepts
//!
//! ### Quantities
//!
//! Stock is displayed as a major unit plus a minor sub-unit (ten minor units
//! per major unit). The ledger stores a single integer count of minor units;
//! see [`quantity::encode`] and [`quantity::decode`].
//!
//! ### Items
//!
//! Each item name owns an [`ItemEntry`]:
//! - a balance that never goes below zero
//! - deliveries ([`DeliveryRecord`]) in the order they were recorded
//! - consumption aggregated per date
//!
//! The balance always equals delivered minus consumed stock, with one
//! exception: deleting a delivery whose stock was already consumed clamps the
//! balance to zero instead of refusing the deletion.
//!
//! ### Mutations
//!
//! Changes go through the [`Ledger`] methods or, equivalently, through
//! [`Ledger::apply`] with a [`Mutation`]:
//! - [`AddDelivery`] - add stock, creating the item on first use
//! - [`RecordConsumption`] - remove stock, rejected if it would go negative
//! - [`DeleteDelivery`] - remove a delivery by position
//! - [`DeleteConsumption`] - remove a day's consumption
//! - [`Mutation::ClearAll`] - empty the ledger
//!
//! ## Quick Start
//!
//! ```rust
//! use larder_engine::{quantity, Error, Ledger};
//!
//! let mut ledger = Ledger::new();
//!
//! // 2 major + 3 minor units of tofu
//! ledger
//!     .add_delivery("tofu", "2024-01-01", quantity::encode(2, 3))
//!     .unwrap();
//!
//! let balance = ledger.record_consumption("tofu", "2024-01-02", 10).unwrap();
//! assert_eq!(quantity::decode(balance), (1, 3));
//!
//! let err = ledger.record_consumption("tofu", "2024-01-02", 20).unwrap_err();
//! assert!(matches!(err, Error::InsufficientStock { .. }));
//! ```
//!
//! ## Persistence
//!
//! Use [`Ledger::export_state`] and [`Ledger::import_state`] with
//! [`LedgerSnapshot`]. Snapshots serialize to JSON keyed by item name and
//! keep item order.

pub mod error;
pub mod ledger;
pub mod mutation;
pub mod quantity;
pub mod record;
pub mod report;
pub mod snapshot;

// Re-export main types at crate root
pub use error::Error;
pub use ledger::{Applied, Ledger};
pub use mutation::{AddDelivery, DeleteConsumption, DeleteDelivery, Mutation, RecordConsumption};
pub use quantity::Quantity;
pub use record::{DeliveryRecord, ItemEntry};
pub use report::{ExportRow, ExportTable, SeriesPoint, Trend};
pub use snapshot::{LedgerSnapshot, SnapshotMetadata, SNAPSHOT_FORMAT_VERSION};

/// Type aliases for clarity
pub type ItemName = String;
pub type DateKey = String;
pub type Amount = u64;
