//! Per-item stock records.

use crate::{Amount, DateKey};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One incoming-stock event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryRecord {
    /// Calendar date of the delivery
    pub date: DateKey,
    /// Delivered amount in minor units, always positive
    pub amount: Amount,
}

impl DeliveryRecord {
    /// Create a new delivery record.
    pub fn new(date: impl Into<DateKey>, amount: Amount) -> Self {
        Self {
            date: date.into(),
            amount,
        }
    }
}

/// Ledger entry for a single item.
///
/// `consumption` holds at most one entry per date; same-day consumption is
/// accumulated into that entry. A `BTreeMap` keeps it ordered by date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemEntry {
    balance: Amount,
    #[serde(default)]
    deliveries: Vec<DeliveryRecord>,
    #[serde(default)]
    consumption: BTreeMap<DateKey, Amount>,
}

impl ItemEntry {
    /// Create an empty entry with a zero balance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current balance in minor units.
    pub fn balance(&self) -> Amount {
        self.balance
    }

    /// Deliveries in the order they were recorded.
    pub fn deliveries(&self) -> &[DeliveryRecord] {
        &self.deliveries
    }

    /// Consumption per date, ascending by date.
    pub fn consumption(&self) -> &BTreeMap<DateKey, Amount> {
        &self.consumption
    }

    /// Sum of all delivered amounts.
    ///
    /// Widened to `u128` since the history may hold more than one `Amount`
    /// worth of stock over time.
    pub fn delivered_total(&self) -> u128 {
        self.deliveries.iter().map(|d| u128::from(d.amount)).sum()
    }

    /// Sum of all consumed amounts.
    pub fn consumed_total(&self) -> u128 {
        self.consumption.values().map(|&a| u128::from(a)).sum()
    }

    /// Balance implied by the history: deliveries minus consumption.
    ///
    /// Negative when a delivery was deleted after its stock had been consumed.
    pub fn expected_balance(&self) -> i128 {
        to_i128(self.delivered_total()) - to_i128(self.consumed_total())
    }

    /// Whether the stored balance agrees with the history.
    ///
    /// Only a clamped delivery deletion can make this false.
    pub fn is_reconciled(&self) -> bool {
        i128::from(self.balance) == self.expected_balance()
    }

    /// Whether the entry has neither deliveries nor consumption.
    pub fn is_blank(&self) -> bool {
        self.deliveries.is_empty() && self.consumption.is_empty()
    }

    /// Returns the new balance, or `None` without touching the entry if the
    /// balance would overflow.
    pub(crate) fn push_delivery(&mut self, record: DeliveryRecord) -> Option<Amount> {
        self.balance = self.balance.checked_add(record.amount)?;
        self.deliveries.push(record);
        Some(self.balance)
    }

    /// Caller guarantees `amount <= balance`. Returns the new balance, or
    /// `None` without touching the entry if the day's total would overflow.
    pub(crate) fn consume(&mut self, date: DateKey, amount: Amount) -> Option<Amount> {
        let day_total = self
            .consumption
            .get(&date)
            .copied()
            .unwrap_or(0)
            .checked_add(amount)?;
        self.balance -= amount;
        self.consumption.insert(date, day_total);
        Some(self.balance)
    }

    /// Returns the removed record and whether the balance had to be clamped.
    pub(crate) fn remove_delivery(&mut self, index: usize) -> Option<(DeliveryRecord, bool)> {
        if index >= self.deliveries.len() {
            return None;
        }
        let record = self.deliveries.remove(index);
        let clamped = record.amount > self.balance;
        self.balance = self.balance.saturating_sub(record.amount);
        Some((record, clamped))
    }

    /// Whether returning the consumption of `date` to stock would overflow
    /// the balance.
    pub(crate) fn restore_overflows(&self, date: &str) -> bool {
        self.consumption
            .get(date)
            .is_some_and(|&amount| self.balance.checked_add(amount).is_none())
    }

    /// `None` if there is no entry for `date` or the balance would overflow.
    pub(crate) fn remove_consumption(&mut self, date: &str) -> Option<Amount> {
        let amount = *self.consumption.get(date)?;
        self.balance = self.balance.checked_add(amount)?;
        self.consumption.remove(date);
        Some(amount)
    }
}

fn to_i128(total: u128) -> i128 {
    i128::try_from(total).unwrap_or(i128::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_delivery_increases_balance() {
        let mut entry = ItemEntry::new();
        entry.push_delivery(DeliveryRecord::new("2024-01-01", 23));
        entry.push_delivery(DeliveryRecord::new("2024-01-03", 7));

        assert_eq!(entry.balance(), 30);
        assert_eq!(entry.deliveries().len(), 2);
        assert_eq!(entry.deliveries()[1].date, "2024-01-03");
        assert!(entry.is_reconciled());
    }

    #[test]
    fn consume_accumulates_same_day() {
        let mut entry = ItemEntry::new();
        entry.push_delivery(DeliveryRecord::new("2024-01-01", 23));
        entry.consume("2024-01-02".into(), 10);
        entry.consume("2024-01-02".into(), 5);

        assert_eq!(entry.balance(), 8);
        assert_eq!(entry.consumption().len(), 1);
        assert_eq!(entry.consumption()["2024-01-02"], 15);
    }

    #[test]
    fn remove_delivery_clamps_at_zero() {
        let mut entry = ItemEntry::new();
        entry.push_delivery(DeliveryRecord::new("2024-01-01", 20));
        entry.consume("2024-01-02".into(), 15);

        let (removed, clamped) = entry.remove_delivery(0).unwrap();
        assert_eq!(removed.amount, 20);
        assert!(clamped);
        assert_eq!(entry.balance(), 0);
        assert_eq!(entry.expected_balance(), -15);
        assert!(!entry.is_reconciled());
    }

    #[test]
    fn remove_delivery_out_of_range() {
        let mut entry = ItemEntry::new();
        entry.push_delivery(DeliveryRecord::new("2024-01-01", 20));
        assert!(entry.remove_delivery(1).is_none());
        assert_eq!(entry.balance(), 20);
    }

    #[test]
    fn remove_consumption_restores_balance() {
        let mut entry = ItemEntry::new();
        entry.push_delivery(DeliveryRecord::new("2024-01-01", 20));
        entry.consume("2024-01-02".into(), 15);

        assert_eq!(entry.remove_consumption("2024-01-02"), Some(15));
        assert_eq!(entry.balance(), 20);
        assert!(entry.consumption().is_empty());
        assert_eq!(entry.remove_consumption("2024-01-02"), None);
    }

    #[test]
    fn push_delivery_refuses_overflow() {
        let mut entry = ItemEntry::new();
        assert_eq!(
            entry.push_delivery(DeliveryRecord::new("2024-01-01", Amount::MAX)),
            Some(Amount::MAX)
        );

        assert_eq!(entry.push_delivery(DeliveryRecord::new("2024-01-02", 1)), None);
        assert_eq!(entry.balance(), Amount::MAX);
        assert_eq!(entry.deliveries().len(), 1);
    }

    #[test]
    fn consume_refuses_day_total_overflow() {
        let mut entry = ItemEntry::new();
        entry.push_delivery(DeliveryRecord::new("2024-01-01", Amount::MAX));
        entry.consume("2024-01-02".into(), Amount::MAX);
        entry.push_delivery(DeliveryRecord::new("2024-01-03", 5));

        assert_eq!(entry.consume("2024-01-02".into(), 5), None);
        assert_eq!(entry.balance(), 5);
        assert_eq!(entry.consumption()["2024-01-02"], Amount::MAX);
    }

    #[test]
    fn totals_exceed_a_single_amount() {
        let mut entry = ItemEntry::new();
        entry.push_delivery(DeliveryRecord::new("2024-01-01", Amount::MAX));
        entry.consume("2024-01-02".into(), Amount::MAX);
        entry.push_delivery(DeliveryRecord::new("2024-01-03", Amount::MAX));

        assert_eq!(entry.delivered_total(), 2 * u128::from(Amount::MAX));
        assert_eq!(entry.expected_balance(), i128::from(Amount::MAX));
        assert!(entry.is_reconciled());

        assert!(entry.restore_overflows("2024-01-02"));
        assert_eq!(entry.remove_consumption("2024-01-02"), None);
        assert_eq!(entry.consumption()["2024-01-02"], Amount::MAX);
    }

    #[test]
    fn missing_histories_default_on_deserialize() {
        let entry: ItemEntry = serde_json::from_str(r#"{"balance": 0}"#).unwrap();
        assert!(entry.is_blank());
        assert_eq!(entry.balance(), 0);
    }
}
