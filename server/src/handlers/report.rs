//! Read-only handlers - balances, trends and exports.

use larder_engine::{ExportTable, ItemEntry, Ledger, Quantity, SeriesPoint, Trend};
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::export;
use crate::handlers::parse_item;

/// A delivery as shown to clients, with the index used to delete it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryView {
    pub index: usize,
    pub date: String,
    pub quantity: Quantity,
}

/// One day's consumption as shown to clients.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumptionView {
    pub date: String,
    pub quantity: Quantity,
}

/// An item with its balance and histories.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemView {
    pub name: String,
    pub balance: Quantity,
    pub deliveries: Vec<DeliveryView>,
    pub consumption: Vec<ConsumptionView>,
    /// `false` once a deleted delivery forced the balance to zero
    pub reconciled: bool,
}

impl ItemView {
    fn new(name: &str, entry: &ItemEntry) -> Self {
        Self {
            name: name.to_string(),
            balance: Quantity::from_total(entry.balance()),
            deliveries: entry
                .deliveries()
                .iter()
                .enumerate()
                .map(|(index, d)| DeliveryView {
                    index,
                    date: d.date.clone(),
                    quantity: Quantity::from_total(d.amount),
                })
                .collect(),
            consumption: entry
                .consumption()
                .iter()
                .map(|(date, &amount)| ConsumptionView {
                    date: date.clone(),
                    quantity: Quantity::from_total(amount),
                })
                .collect(),
            reconciled: entry.is_reconciled(),
        }
    }
}

/// Response for the balances listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemsResponse {
    pub items: Vec<ItemView>,
}

/// Response for an item's consumption trend.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendResponse {
    pub item: String,
    /// `false` when the item exists but nothing was consumed yet
    pub has_data: bool,
    /// Consumption in major units, ascending by date
    pub points: Vec<SeriesPoint>,
}

/// List every item in ledger order.
pub fn handle_list_items(ledger: &Ledger) -> ItemsResponse {
    ItemsResponse {
        items: ledger
            .list_items()
            .map(|(name, entry)| ItemView::new(name, entry))
            .collect(),
    }
}

/// Consumption trend of one item.
pub fn handle_trend(ledger: &Ledger, item: &str) -> Result<TrendResponse> {
    let item = parse_item(item)?;
    let points = match Trend::for_item(ledger, &item) {
        Trend::NotFound => return Err(AppError::NotFound(format!("item '{}' not found", item))),
        Trend::NoData => Vec::new(),
        Trend::Series(points) => points,
    };

    Ok(TrendResponse {
        item,
        has_data: !points.is_empty(),
        points,
    })
}

/// Render the two-section CSV report.
pub fn handle_export(ledger: &Ledger) -> Result<Vec<u8>> {
    let table = ExportTable::from_ledger(ledger);
    tracing::info!(
        deliveries = table.deliveries.len(),
        consumption = table.consumption.len(),
        "Exporting inventory report"
    );
    Ok(export::render_csv(&table)?)
}
