//! Integration tests for the redb backend.

use chrono::Duration;
use keystone_core::types::{Date, Properties};
use keystone_store::{Namespace, ObjectStore, ObjectStoreExt, PropertyFilter, RedbStore, StoreKey};
use rust_decimal_macros::dec;
use tempfile::TempDir;

fn open_store(dir: &TempDir) -> RedbStore {
    RedbStore::open(dir.path().join("keystone.redb")).unwrap()
}

#[test]
fn test_roundtrip_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let key = StoreKey::new("Orion", "BusinessCenterCalendar.AUSY");
    let holidays = vec![
        Date::from_ymd(2025, 1, 1).unwrap(),
        Date::from_ymd(2025, 1, 27).unwrap(),
    ];

    {
        let store = open_store(&dir);
        assert!(store.is_healthy());
        store
            .save_object(
                key.clone(),
                &holidays,
                Properties::new().with("BusinessCenter", "AUSY").with("Count", dec!(2)),
                None,
            )
            .unwrap();
    }

    let store = open_store(&dir);
    let (loaded, props): (Vec<Date>, _) = store.load_object(&key).unwrap().unwrap();
    assert_eq!(loaded, holidays);
    assert_eq!(props.get_str("BusinessCenter"), Some("AUSY"));
    assert_eq!(props.get_decimal("Count"), Some(dec!(2)));
}

#[test]
fn test_namespaces_do_not_collide() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);

    store
        .save_object(StoreKey::new("A", "X.Y"), &"first", Properties::new(), None)
        .unwrap();
    store
        .save_object(StoreKey::new("A.X", "Y"), &"second", Properties::new(), None)
        .unwrap();

    let (a, _): (String, _) = store.load_object(&StoreKey::new("A", "X.Y")).unwrap().unwrap();
    let (b, _): (String, _) = store.load_object(&StoreKey::new("A.X", "Y")).unwrap().unwrap();
    assert_eq!(a, "first");
    assert_eq!(b, "second");

    let in_a = store.query(&Namespace::new("A"), &PropertyFilter::all()).unwrap();
    assert_eq!(in_a.len(), 1);
}

#[test]
fn test_query_delete_and_expiry() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    let ns = Namespace::new("Orion");

    let curve = Properties::new().with("PricingStructureType", "RateCurve");
    store
        .save_object(ns.key("Curve.1"), &1u8, curve.clone(), None)
        .unwrap();
    store
        .save_object(ns.key("Curve.2"), &2u8, curve, Some(Duration::seconds(-5)))
        .unwrap();

    let filter = PropertyFilter::all().eq("PricingStructureType", "ratecurve");
    let live = store.query(&ns, &filter).unwrap();
    assert_eq!(live.len(), 1);
    assert_eq!(live[0].key.id, "Curve.1");

    assert!(store.load_item(&ns.key("Curve.2")).unwrap().is_none());
    assert_eq!(store.purge_expired().unwrap(), 1);

    assert!(store.delete_item(&ns.key("Curve.1")).unwrap());
    assert!(store.query(&ns, &filter).unwrap().is_empty());
}
