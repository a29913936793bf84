//! Scenario and edge case tests for larder-engine
//!
//! These tests drive the public API the way the server does and cover
//! boundary conditions and unusual inputs.

use larder_engine::{
    quantity::{decode, encode},
    AddDelivery, DeleteConsumption, DeleteDelivery, Error, ExportTable, Ledger, LedgerSnapshot,
    Mutation, RecordConsumption, SnapshotMetadata, Trend,
};

// ============================================================================
// Kitchen scenarios
// ============================================================================

#[test]
fn tofu_day() {
    let mut ledger = Ledger::new();

    let balance = ledger
        .add_delivery("tofu", "2024-01-01", encode(2, 3))
        .unwrap();
    assert_eq!(balance, 23);

    let balance = ledger
        .record_consumption("tofu", "2024-01-02", encode(1, 0))
        .unwrap();
    assert_eq!(balance, 13);
    assert_eq!(
        ledger.get("tofu").unwrap().consumption().get("2024-01-02"),
        Some(&10)
    );

    let balance = ledger.record_consumption("tofu", "2024-01-02", 5).unwrap();
    assert_eq!(balance, 8);
    assert_eq!(
        ledger.get("tofu").unwrap().consumption().get("2024-01-02"),
        Some(&15)
    );

    let err = ledger
        .record_consumption("tofu", "2024-01-02", 20)
        .unwrap_err();
    assert!(matches!(err, Error::InsufficientStock { .. }));
    assert_eq!(ledger.get("tofu").unwrap().balance(), 8);

    assert_eq!(
        ledger.delete_consumption("tofu", "2024-01-02").unwrap(),
        Some(15)
    );
    let tofu = ledger.get("tofu").unwrap();
    assert_eq!(tofu.balance(), 23);
    assert!(tofu.consumption().is_empty());
}

#[test]
fn ghost_item() {
    let mut ledger = Ledger::new();
    let err = ledger
        .record_consumption("ghost", "2024-01-02", 5)
        .unwrap_err();
    assert_eq!(err, Error::ItemNotFound("ghost".to_string()));
    assert!(ledger.is_empty());
}

#[test]
fn clear_then_list() {
    let mut ledger = Ledger::new();
    ledger.add_delivery("tofu", "2024-01-01", 23).unwrap();
    ledger.add_delivery("scallion", "2024-01-01", 4).unwrap();

    ledger.apply(Mutation::ClearAll).unwrap();
    assert_eq!(ledger.list_items().count(), 0);
}

#[test]
fn week_of_mutations_survives_json() {
    let mut ledger = Ledger::new();
    let mutations: Vec<Mutation> = vec![
        AddDelivery::new("pork belly", "2024-03-01", encode(5, 0)).into(),
        AddDelivery::new("bok choy", "2024-03-01", encode(3, 4)).into(),
        RecordConsumption::new("pork belly", "2024-03-02", encode(1, 2)).into(),
        RecordConsumption::new("bok choy", "2024-03-02", encode(0, 8)).into(),
        AddDelivery::new("pork belly", "2024-03-04", encode(2, 0)).into(),
        RecordConsumption::new("pork belly", "2024-03-04", encode(2, 5)).into(),
        DeleteConsumption::new("bok choy", "2024-03-02").into(),
        DeleteDelivery::new("bok choy", 7).into(),
    ];
    for mutation in mutations {
        ledger.apply(mutation).unwrap();
    }

    assert_eq!(decode(ledger.get("pork belly").unwrap().balance()), (3, 3));
    assert_eq!(decode(ledger.get("bok choy").unwrap().balance()), (3, 4));

    let json = ledger.export_state().to_json_pretty().unwrap();
    let restored = Ledger::from_snapshot(LedgerSnapshot::from_json(&json).unwrap()).unwrap();
    assert_eq!(restored, ledger);
    assert_eq!(
        ExportTable::from_ledger(&restored),
        ExportTable::from_ledger(&ledger)
    );
}

// ============================================================================
// String Edge Cases
// ============================================================================

#[test]
fn unicode_item_names() {
    let mut ledger = Ledger::new();
    let names = ["豆腐", "青菜", "Crème fraîche", "🍄 mix", "Hello\tTab"];

    for (i, name) in names.iter().enumerate() {
        ledger
            .add_delivery(*name, "2024-01-01", (i as u64 + 1) * 10)
            .unwrap();
    }

    let json = ledger.export_state().to_json().unwrap();
    let restored = Ledger::from_snapshot(LedgerSnapshot::from_json(&json).unwrap()).unwrap();

    let listed: Vec<_> = restored.list_items().map(|(n, _)| n.as_str()).collect();
    assert_eq!(listed, names);
    assert_eq!(restored.get("豆腐").unwrap().balance(), 10);
}

#[test]
fn empty_item_name_is_a_key_like_any_other() {
    let mut ledger = Ledger::new();
    ledger.add_delivery("", "2024-01-01", 1).unwrap();

    assert!(ledger.contains(""));
    assert_eq!(ledger.record_consumption("", "2024-01-01", 1).unwrap(), 0);
}

#[test]
fn date_keys_are_opaque_strings() {
    let mut ledger = Ledger::new();
    ledger.add_delivery("tofu", "2024-01-01", 30).unwrap();
    ledger.record_consumption("tofu", "2024-1-2", 5).unwrap();
    ledger.record_consumption("tofu", "2024-01-02", 5).unwrap();

    // Different spellings of a day are different keys.
    assert_eq!(ledger.get("tofu").unwrap().consumption().len(), 2);
}

// ============================================================================
// Numeric Edge Cases
// ============================================================================

#[test]
fn large_amounts() {
    let mut ledger = Ledger::new();
    let big = encode(1_000_000_000, 9);

    ledger.add_delivery("flour", "2024-01-01", big).unwrap();
    ledger.record_consumption("flour", "2024-01-02", big - 1).unwrap();

    assert_eq!(ledger.get("flour").unwrap().balance(), 1);
}

#[test]
fn amounts_near_the_limit_never_wrap() {
    let mut ledger = Ledger::new();
    ledger.add_delivery("flour", "2024-01-01", u64::MAX).unwrap();

    assert!(matches!(
        ledger.add_delivery("flour", "2024-01-02", 1),
        Err(Error::InvalidQuantity(_))
    ));
    assert_eq!(ledger.get("flour").unwrap().balance(), u64::MAX);
    assert_eq!(ledger.get("flour").unwrap().deliveries().len(), 1);

    // Plenty of room once stock has been used.
    ledger
        .record_consumption("flour", "2024-01-02", u64::MAX)
        .unwrap();
    assert_eq!(ledger.add_delivery("flour", "2024-01-03", 1).unwrap(), 1);
}

#[test]
fn snapshot_with_huge_history_loads() {
    let json = format!(
        r#"{{"formatVersion":1,"items":{{"flour":{{"balance":0,
            "deliveries":[{{"date":"2024-01-01","amount":{max}}},{{"date":"2024-01-02","amount":{max}}}],
            "consumption":{{}}}}}}}}"#,
        max = u64::MAX
    );
    let snapshot = LedgerSnapshot::from_json(&json).unwrap();

    let metadata = SnapshotMetadata::from(&snapshot);
    assert_eq!(metadata.delivery_count, 2);
    assert_eq!(metadata.unreconciled, vec!["flour".to_string()]);

    let ledger = Ledger::from_snapshot(snapshot).unwrap();
    let flour = ledger.get("flour").unwrap();
    assert_eq!(flour.delivered_total(), 2 * u128::from(u64::MAX));
    assert!(!flour.is_reconciled());
}

#[test]
fn consume_exact_balance_then_nothing_more() {
    let mut ledger = Ledger::new();
    ledger.add_delivery("tofu", "2024-01-01", 1).unwrap();
    ledger.record_consumption("tofu", "2024-01-01", 1).unwrap();

    assert!(matches!(
        ledger.record_consumption("tofu", "2024-01-01", 1),
        Err(Error::InsufficientStock { available: 0, .. })
    ));
}

// ============================================================================
// Deletion Edge Cases
// ============================================================================

#[test]
fn stale_index_deletes_the_shifted_record() {
    let mut ledger = Ledger::new();
    ledger.add_delivery("tofu", "2024-01-01", 10).unwrap();
    ledger.add_delivery("tofu", "2024-01-02", 20).unwrap();
    ledger.add_delivery("tofu", "2024-01-03", 30).unwrap();

    // Two clients both rendered index 1.
    ledger.delete_delivery("tofu", 1).unwrap();
    let second = ledger.delete_delivery("tofu", 1).unwrap();

    assert_eq!(second.date, "2024-01-03");
    assert_eq!(ledger.get("tofu").unwrap().balance(), 10);
    assert!(ledger.delete_delivery("tofu", 1).is_none());
}

#[test]
fn clamped_deletion_is_visible() {
    let mut ledger = Ledger::new();
    ledger.add_delivery("tofu", "2024-01-01", 20).unwrap();
    ledger.record_consumption("tofu", "2024-01-02", 15).unwrap();

    let applied = ledger.apply(DeleteDelivery::new("tofu", 0).into()).unwrap();
    assert!(applied.clamped);

    let tofu = ledger.get("tofu").unwrap();
    assert_eq!(tofu.balance(), 0);
    assert!(!tofu.is_reconciled());

    // Restoring the consumption afterwards only adds back.
    ledger
        .delete_consumption("tofu", "2024-01-02")
        .unwrap()
        .unwrap();
    assert_eq!(ledger.get("tofu").unwrap().balance(), 15);
}

#[test]
fn trend_distinguishes_missing_and_empty() {
    let mut ledger = Ledger::new();
    ledger.add_delivery("tofu", "2024-01-01", 20).unwrap();

    assert_eq!(Trend::for_item(&ledger, "ghost"), Trend::NotFound);
    assert_eq!(Trend::for_item(&ledger, "tofu"), Trend::NoData);
    assert!(matches!(
        ledger.consumption_series("ghost"),
        Err(Error::ItemNotFound(_))
    ));
    assert!(ledger.consumption_series("tofu").unwrap().is_empty());
}
