//! Read-only projections of the ledger for charting and export.

use crate::quantity::{decode, to_major_decimal};
use crate::{Amount, DateKey, ItemName, Ledger};
use serde::{Deserialize, Serialize};

/// One point of a consumption trend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPoint {
    pub date: DateKey,
    /// Consumed amount in major units
    pub major: f64,
}

/// Scale `(date, amount)` pairs to chart points in major units.
pub fn series_points(series: Vec<(DateKey, Amount)>) -> Vec<SeriesPoint> {
    series
        .into_iter()
        .map(|(date, amount)| SeriesPoint {
            date,
            major: to_major_decimal(amount),
        })
        .collect()
}

/// Consumption trend of a single item.
#[derive(Debug, Clone, PartialEq)]
pub enum Trend {
    /// No such item in the ledger
    NotFound,
    /// The item exists but nothing was consumed yet
    NoData,
    /// Points sorted ascending by date
    Series(Vec<SeriesPoint>),
}

impl Trend {
    /// Compute the trend of `item` from [`Ledger::consumption_series`].
    pub fn for_item(ledger: &Ledger, item: &str) -> Self {
        match ledger.consumption_series(item) {
            Err(_) => Trend::NotFound,
            Ok(series) if series.is_empty() => Trend::NoData,
            Ok(series) => Trend::Series(series_points(series)),
        }
    }
}

/// A row of the export table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRow {
    pub item: ItemName,
    pub date: DateKey,
    pub major: Amount,
    pub minor: u8,
}

impl ExportRow {
    fn new(item: &str, date: &str, amount: Amount) -> Self {
        let (major, minor) = decode(amount);
        Self {
            item: item.to_string(),
            date: date.to_string(),
            major,
            minor,
        }
    }
}

/// All deliveries and consumption flattened into two tabular sections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportTable {
    pub deliveries: Vec<ExportRow>,
    pub consumption: Vec<ExportRow>,
}

impl ExportTable {
    /// Flatten the ledger.
    ///
    /// Rows follow ledger item order; within an item, deliveries keep their
    /// recorded order and consumption is ascending by date.
    pub fn from_ledger(ledger: &Ledger) -> Self {
        let mut table = Self::default();
        for (name, entry) in ledger.list_items() {
            table.deliveries.extend(
                entry
                    .deliveries()
                    .iter()
                    .map(|d| ExportRow::new(name, &d.date, d.amount)),
            );
            table.consumption.extend(
                entry
                    .consumption()
                    .iter()
                    .map(|(date, &amount)| ExportRow::new(name, date, amount)),
            );
        }
        table
    }
}
