//! Persistency tests
//!
//! A value written before a flush must come back identical — same tag,
//! same structure — after reopening the instance from disk.

use stash_storage::{InstanceId, KvStoreBuilder, LoadMode, Value, ValueMap};
use std::path::Path;
use tempfile::tempdir;

fn open(dir: &Path) -> stash_storage::KvStore {
    KvStoreBuilder::new(InstanceId(0)).dir(dir).open().unwrap()
}

#[test]
fn simple_round_trip() {
    let dir = tempdir().unwrap();

    let mut store = open(dir.path());
    store.set_value("u", "alice");
    store.flush().unwrap();
    drop(store);

    let store = open(dir.path());
    assert_eq!(store.get_value("u").unwrap(), Value::String("alice".into()));
    assert_eq!(store.get_all_keys(), vec!["u".to_string()]);
}

#[test]
fn every_tag_survives_reopen() {
    let dir = tempdir().unwrap();

    let nested_object = ValueMap::from([
        ("inner".to_string(), Value::from("text")),
        ("count".to_string(), Value::U32(7)),
    ]);
    let values: Vec<(&str, Value)> = vec![
        ("null", Value::Null),
        ("bool", Value::Bool(true)),
        ("i32", Value::I32(i32::MIN)),
        ("u32", Value::U32(u32::MAX)),
        ("i64", Value::I64(i64::MIN)),
        ("u64", Value::U64(u64::MAX)),
        ("f64", Value::F64(-123.456)),
        ("string", Value::from("hello world")),
        (
            "array",
            Value::Array(vec![
                Value::I32(1),
                Value::from("two"),
                Value::Null,
                Value::Array(vec![Value::Bool(false)]),
            ]),
        ),
        ("object", Value::Object(nested_object)),
    ];

    let mut store = open(dir.path());
    for (key, value) in &values {
        store.set_value(*key, value.clone());
    }
    store.flush().unwrap();
    drop(store);

    let store = open(dir.path());
    for (key, value) in &values {
        let loaded = store.get_value(key).unwrap();
        assert_eq!(&loaded, value, "tag not preserved for key {key}");
        assert_eq!(loaded.tag(), value.tag());
    }
}

#[test]
fn unicode_keys_survive_reopen() {
    let dir = tempdir().unwrap();

    let mut store = open(dir.path());
    store.set_value("emoji ✅", Value::Null);
    store.set_value("greek η", Value::Null);
    store.flush().unwrap();
    drop(store);

    let store = open(dir.path());
    let mut keys = store.get_all_keys();
    keys.sort();
    assert_eq!(keys, vec!["emoji ✅".to_string(), "greek η".to_string()]);
    assert!(store.key_exists("emoji ✅"));
    assert!(store.key_exists("greek η"));
}

#[test]
fn removed_key_stays_removed_after_reopen() {
    let dir = tempdir().unwrap();

    let mut store = open(dir.path());
    store.set_value("keep", Value::I32(1));
    store.set_value("drop", Value::I32(2));
    store.flush().unwrap();
    store.remove_key("drop");
    store.flush().unwrap();
    drop(store);

    let store = open(dir.path());
    assert!(store.key_exists("keep"));
    assert!(!store.key_exists("drop"));
}

#[test]
fn empty_map_round_trips() {
    let dir = tempdir().unwrap();

    let mut store = open(dir.path());
    store.flush().unwrap();
    drop(store);

    let store = KvStoreBuilder::new(InstanceId(0))
        .dir(dir.path())
        .kvs_load(LoadMode::Required)
        .open()
        .unwrap();
    assert!(store.get_all_keys().is_empty());
}

#[test]
fn unflushed_changes_are_not_persisted() {
    let dir = tempdir().unwrap();

    let mut store = open(dir.path());
    store.set_value("persisted", Value::Bool(true));
    store.flush().unwrap();
    store.set_value("volatile", Value::Bool(true));
    assert!(store.is_dirty());
    // Close without flushing: no implicit flush on drop.
    drop(store);

    let store = open(dir.path());
    assert!(store.key_exists("persisted"));
    assert!(!store.key_exists("volatile"));
}

#[test]
fn instances_in_one_directory_are_independent() {
    let dir = tempdir().unwrap();

    let mut first = KvStoreBuilder::new(InstanceId(1)).dir(dir.path()).open().unwrap();
    let mut second = KvStoreBuilder::new(InstanceId(2)).dir(dir.path()).open().unwrap();

    first.set_value("who", "first");
    second.set_value("who", "second");
    first.flush().unwrap();
    second.flush().unwrap();
    drop(first);
    drop(second);

    let first = KvStoreBuilder::new(InstanceId(1)).dir(dir.path()).open().unwrap();
    let second = KvStoreBuilder::new(InstanceId(2)).dir(dir.path()).open().unwrap();
    assert_eq!(first.get_value("who").unwrap(), Value::from("first"));
    assert_eq!(second.get_value("who").unwrap(), Value::from("second"));
}
