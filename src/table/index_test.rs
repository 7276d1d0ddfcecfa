use rand::{prelude::random, rngs::SmallRng, Rng, SeedableRng};

use super::*;

use crate::Error;

use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq)]
struct Item {
    a: i64,
    b: i64,
}

#[test]
fn test_index_unique() {
    let mut table: Table<Item> = Table::new("test_index_unique");
    table.create_index("a", |item: &Item| item.a).unwrap();

    let oid = {
        let mut rows = table.insert_row(Item { a: 1, b: 2 }).unwrap();
        rows.next().unwrap().to_oid()
    };
    assert_eq!(table.count(), 1);

    {
        let idx = table.index::<i64>("a").unwrap();
        assert_eq!(idx.to_name(), "a".to_string());
        assert_eq!(idx.count(), 1);
        let found = idx.find(&1).unwrap();
        assert_eq!(found, oid);
        assert_eq!(table.get(found).unwrap().as_value(), &Item { a: 1, b: 2 });
        assert_eq!(idx.find(&2), None);
    }

    table.delete_row(oid).unwrap();
    assert_eq!(table.count(), 0);
    assert_eq!(table.index::<i64>("a").unwrap().count(), 0);
    table.validate().unwrap();
}

#[test]
fn test_index_multi() {
    let mut table: Table<Item> = Table::new("test_index_multi");
    table.create_multi_index("a", |item: &Item| item.a).unwrap();

    let first = {
        let mut rows = table.insert_row(Item { a: 1, b: 2 }).unwrap();
        rows.next().unwrap().to_oid()
    };
    table.insert_row(Item { a: 1, b: 4 }).unwrap();

    {
        let idx = table.multi_index::<i64>("a").unwrap();
        assert_eq!(idx.to_name(), "a".to_string());
        assert_eq!(idx.count(), 2);
        let found = idx.find(&1).unwrap();
        assert_eq!(table.get(found).unwrap().as_value().a, 1);
    }

    table.delete_row(first).unwrap();
    {
        let idx = table.multi_index::<i64>("a").unwrap();
        assert_eq!(idx.count(), 1);
        let found = idx.find(&1).unwrap();
        assert_eq!(table.get(found).unwrap().as_value(), &Item { a: 1, b: 4 });
        assert_eq!(idx.find(&7), None);
    }
    table.validate().unwrap();
}

#[test]
fn test_index_backfill() {
    let mut table: Table<Item> = Table::new("test_index_backfill");
    for a in 0..10 {
        table.insert_row(Item { a, b: a * 2 }).unwrap();
    }
    let dead = {
        let mut rows = table.insert_row(Item { a: 99, b: 0 }).unwrap();
        rows.next().unwrap().to_oid()
    };
    table.delete_row(dead).unwrap();

    table.create_index("a", |item: &Item| item.a).unwrap();
    table.create_multi_index("b", |item: &Item| item.b).unwrap();

    let idx = table.index::<i64>("a").unwrap();
    assert_eq!(idx.count(), 10);
    // deleted rows are not back-filled
    assert_eq!(idx.find(&99), None);
    assert_eq!(table.multi_index::<i64>("b").unwrap().count(), 10);
    table.validate().unwrap();
}

#[test]
fn test_index_lookup_errors() {
    let mut table: Table<Item> = Table::new("test_index_lookup_errors");
    table.create_index("a", |item: &Item| item.a).unwrap();
    table.create_multi_index("b", |item: &Item| item.b).unwrap();

    match table.create_index("a", |item: &Item| item.a) {
        Err(Error::Invalid(_, _)) => (),
        _ => panic!("duplicate index name must fail"),
    }
    match table.index::<i64>("missing") {
        Err(Error::IndexNotFound(_, _)) => (),
        _ => panic!("expected IndexNotFound"),
    }
    match table.index::<i64>("b") {
        Err(Error::KindMismatch(_, _)) => (),
        _ => panic!("expected KindMismatch for multi index"),
    }
    match table.multi_index::<i64>("a") {
        Err(Error::KindMismatch(_, _)) => (),
        _ => panic!("expected KindMismatch for unique index"),
    }
    match table.index::<u32>("a") {
        Err(Error::KindMismatch(_, _)) => (),
        _ => panic!("expected KindMismatch for key type"),
    }
}

#[test]
fn test_index_collision() {
    let mut table: Table<Item> = Table::new("test_index_collision");
    table.create_index("a", |item: &Item| item.a).unwrap();

    let first = {
        let mut rows = table.insert_row(Item { a: 1, b: 2 }).unwrap();
        rows.next().unwrap().to_oid()
    };
    let second = {
        let mut rows = table.insert_row(Item { a: 1, b: 4 }).unwrap();
        rows.next().unwrap().to_oid()
    };

    // first-wins: the collider is not indexed
    assert_eq!(table.index::<i64>("a").unwrap().find(&1), Some(first));
    table.validate().unwrap();

    // deleting the unindexed collider leaves the survivor alone
    table.delete_row(second).unwrap();
    assert_eq!(table.index::<i64>("a").unwrap().find(&1), Some(first));
    table.validate().unwrap();

    // deleting the indexed row erases the key; first-wins, not re-index
    table.delete_row(first).unwrap();
    assert_eq!(table.index::<i64>("a").unwrap().find(&1), None);
    table.validate().unwrap();
}

#[test]
fn test_index_coherence() {
    let seed: u64 = random();
    println!("test_index_coherence seed {}", seed);
    let mut rng = SmallRng::seed_from_u64(seed);

    let mut table: Table<Item> = Table::with_bucket_size("test_index_coherence", 7).unwrap();
    table.create_index("a", |item: &Item| item.a).unwrap();
    table.create_multi_index("b", |item: &Item| item.b).unwrap();

    let mut live: BTreeMap<u64, Item> = BTreeMap::new();
    let mut next_a = 0_i64;

    for _i in 0..1_000 {
        if live.is_empty() || rng.gen::<u8>() % 3 != 0 {
            let item = Item {
                a: next_a,
                b: (rng.gen::<u8>() % 8) as i64,
            };
            next_a += 1;
            let oid = {
                let mut rows = table.insert_row(item.clone()).unwrap();
                rows.next().unwrap().to_oid()
            };
            live.insert(oid, item);
        } else {
            let pick = rng.gen::<usize>() % live.len();
            let oid = *live.keys().nth(pick).unwrap();
            table.delete_row(oid).unwrap();
            live.remove(&oid);
        }
    }

    assert_eq!(table.count(), live.len());
    table.validate().unwrap();

    // unique: projections are unique by construction, every live row
    // is findable and dead projections are gone
    {
        let idx = table.index::<i64>("a").unwrap();
        assert_eq!(idx.count(), live.len());
        for (oid, item) in live.iter() {
            assert_eq!(idx.find(&item.a), Some(*oid));
        }
    }

    // multi: total count equals live rows, per-key hits resolve to a
    // live row with that projection
    {
        let idx = table.multi_index::<i64>("b").unwrap();
        assert_eq!(idx.count(), live.len());
        for b in 0..8 {
            let expect = live.values().filter(|item| item.b == b).count();
            match idx.find(&b) {
                Some(oid) => {
                    assert_eq!(expect > 0, true);
                    assert_eq!(live.get(&oid).unwrap().b, b);
                }
                None => assert_eq!(expect, 0),
            }
        }
    }
}
