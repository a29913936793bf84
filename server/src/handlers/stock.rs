//! Stock handlers - turn requests into ledger mutations.

use chrono::{Local, NaiveDate};
use larder_engine::{
    quantity::MAX_MINOR, AddDelivery, Amount, Applied, DeleteConsumption, DeleteDelivery, Ledger,
    Mutation, Quantity, RecordConsumption,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::inventory::Inventory;

/// Largest major quantity accepted in one request.
pub const MAX_MAJOR: Amount = 100_000;

/// Date format used for every stored date.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Request body for recording a delivery.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryRequest {
    pub item: String,
    /// Delivery date; defaults to today
    pub date: Option<String>,
    pub major: i64,
    pub minor: i64,
}

/// Request body for recording consumption.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumptionRequest {
    pub item: String,
    pub date: String,
    pub major: i64,
    pub minor: i64,
}

/// Response for every mutating endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationResponse {
    /// Item affected, absent for a clear-all
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,
    /// Balance after the mutation, if the item exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<Quantity>,
    /// Whether anything changed; `false` for a deletion that found nothing
    pub changed: bool,
}

impl MutationResponse {
    /// Response for a request that left `item` as it was.
    pub fn unchanged(ledger: &Ledger, item: &str) -> Self {
        Self {
            item: Some(item.to_string()),
            balance: ledger
                .get(item)
                .map(|entry| Quantity::from_total(entry.balance())),
            changed: false,
        }
    }
}

impl From<Applied> for MutationResponse {
    fn from(applied: Applied) -> Self {
        Self {
            item: applied.item,
            balance: applied.balance.map(Quantity::from_total),
            changed: applied.changed,
        }
    }
}

/// Record a delivery.
pub async fn handle_add_delivery(
    inventory: &mut Inventory,
    request: DeliveryRequest,
) -> Result<MutationResponse> {
    let item = parse_item(&request.item)?;
    let date = match request.date.as_deref() {
        Some(date) => parse_date(date)?,
        None => today(),
    };
    let amount = parse_amount(request.major, request.minor)?;

    apply(inventory, AddDelivery::new(item, date, amount).into()).await
}

/// Record consumption.
pub async fn handle_consume(
    inventory: &mut Inventory,
    request: ConsumptionRequest,
) -> Result<MutationResponse> {
    let item = parse_item(&request.item)?;
    let date = parse_date(&request.date)?;
    let amount = parse_amount(request.major, request.minor)?;

    apply(inventory, RecordConsumption::new(item, date, amount).into()).await
}

/// Delete a delivery by position. A negative index matches nothing.
pub async fn handle_delete_delivery(
    inventory: &mut Inventory,
    item: &str,
    index: i64,
) -> Result<MutationResponse> {
    let item = parse_item(item)?;
    match usize::try_from(index) {
        Ok(index) => apply(inventory, DeleteDelivery::new(item, index).into()).await,
        Err(_) => Ok(MutationResponse::unchanged(inventory.ledger(), &item)),
    }
}

/// Delete one day's consumption.
pub async fn handle_delete_consumption(
    inventory: &mut Inventory,
    item: &str,
    date: &str,
) -> Result<MutationResponse> {
    let item = parse_item(item)?;
    let date = parse_date(date)?;
    apply(inventory, DeleteConsumption::new(item, date).into()).await
}

/// Empty the whole ledger.
pub async fn handle_clear_all(inventory: &mut Inventory) -> Result<MutationResponse> {
    let removed = inventory.ledger().len();
    let response = apply(inventory, Mutation::ClearAll).await?;
    tracing::info!(items = removed, "Cleared inventory");
    Ok(response)
}

async fn apply(inventory: &mut Inventory, mutation: Mutation) -> Result<MutationResponse> {
    Ok(inventory.apply(mutation).await?.into())
}

/// Validate an item name. Surrounding whitespace is dropped.
pub fn parse_item(raw: &str) -> Result<String> {
    let item = raw.trim();
    if item.is_empty() {
        return Err(AppError::BadRequest("item name is required".to_string()));
    }
    Ok(item.to_string())
}

/// Validate a calendar date and return it in canonical `YYYY-MM-DD` form.
pub fn parse_date(raw: &str) -> Result<String> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map(|date| date.format(DATE_FORMAT).to_string())
        .map_err(|_| AppError::BadRequest(format!("invalid date '{}', expected YYYY-MM-DD", raw)))
}

/// Validate a two-part quantity and encode it as minor units.
pub fn parse_amount(major: i64, minor: i64) -> Result<Amount> {
    let major_units = Amount::try_from(major)
        .ok()
        .filter(|&m| m <= MAX_MAJOR)
        .ok_or_else(|| {
            AppError::BadRequest(format!(
                "major must be between 0 and {}, got {}",
                MAX_MAJOR, major
            ))
        })?;
    let minor_units = u8::try_from(minor)
        .ok()
        .filter(|&m| m <= MAX_MINOR)
        .ok_or_else(|| {
            AppError::BadRequest(format!(
                "minor must be between 0 and {}, got {}",
                MAX_MINOR, minor
            ))
        })?;
    Ok(Quantity::new(major_units, minor_units)?.total())
}

fn today() -> String {
    Local::now().date_naive().format(DATE_FORMAT).to_string()
}
