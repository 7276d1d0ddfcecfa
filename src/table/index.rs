// Secondary indexes for [Table]. Each index owns a projection from the
// row value to its key type and an internal map from projected key to
// OID. The table drives them through the type-erased [RowIndex] trait,
// concrete access comes back via `Any` downcast in [Table::index] and
// [Table::multi_index].

use std::{any::Any, cmp::Ordering, collections::BTreeMap};

use crate::table::Table;
use crate::{err_at, Result};

// Maintenance callbacks dispatched by the table on every row
// insert/delete. The delete protocol calls `remove` while the row is
// still readable, so every index observes each add and its matching
// remove exactly once.
pub(crate) trait RowIndex<V> {
    fn add(&mut self, oid: u64, value: &V);
    fn remove(&mut self, oid: u64, value: &V);
    fn validate(&self, table: &Table<V>) -> Result<()>;
    fn as_any(&self) -> &dyn Any;
}

// Registry slot, the table maps index names to these.
pub(crate) struct IndexSlot<V> {
    pub(crate) is_multi: bool,
    pub(crate) index: Box<dyn RowIndex<V>>,
}

/// Secondary index mapping each projected key to at most one row.
///
/// Key collisions are first-wins-silently: a newer row whose projection
/// collides with an already indexed row is not indexed. On row deletion
/// the key is erased only when it maps to the deleted row's OID, so
/// deleting a never-indexed collider leaves the survivor alone.
pub struct UniqueIndex<I, V> {
    name: String,
    map: BTreeMap<I, u64>,
    project: Box<dyn Fn(&V) -> I>,
}

impl<I, V> UniqueIndex<I, V>
where
    I: Ord,
{
    pub(crate) fn new(name: &str, project: Box<dyn Fn(&V) -> I>) -> UniqueIndex<I, V> {
        UniqueIndex {
            name: name.to_string(),
            map: BTreeMap::new(),
            project,
        }
    }

    /// Identify this index instance.
    #[inline]
    pub fn to_name(&self) -> String {
        self.name.clone()
    }

    /// Return the OID indexed under `key`, if any. Resolve it through
    /// [Table::get].
    pub fn find(&self, key: &I) -> Option<u64> {
        self.map.get(key).copied()
    }

    /// Return number of indexed keys.
    pub fn count(&self) -> usize {
        self.map.len()
    }
}

impl<I, V> RowIndex<V> for UniqueIndex<I, V>
where
    I: Ord + 'static,
    V: 'static,
{
    fn add(&mut self, oid: u64, value: &V) {
        let key = (self.project)(value);
        self.map.entry(key).or_insert(oid);
    }

    fn remove(&mut self, oid: u64, value: &V) {
        let key = (self.project)(value);
        if self.map.get(&key) == Some(&oid) {
            self.map.remove(&key);
        }
    }

    fn validate(&self, table: &Table<V>) -> Result<()> {
        for (key, oid) in self.map.iter() {
            let row = match table.get(*oid) {
                Some(row) => row,
                None => return err_at!(Fatal, msg: "index {} oid {} not live", self.name, oid),
            };
            if (self.project)(row.as_value()).cmp(key) != Ordering::Equal {
                return err_at!(Fatal, msg: "index {} oid {} projection drift", self.name, oid);
            }
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Secondary index mapping each projected key to every row carrying it.
pub struct MultiIndex<I, V> {
    name: String,
    map: BTreeMap<I, Vec<u64>>,
    project: Box<dyn Fn(&V) -> I>,
}

impl<I, V> MultiIndex<I, V>
where
    I: Ord,
{
    pub(crate) fn new(name: &str, project: Box<dyn Fn(&V) -> I>) -> MultiIndex<I, V> {
        MultiIndex {
            name: name.to_string(),
            map: BTreeMap::new(),
            project,
        }
    }

    /// Identify this index instance.
    #[inline]
    pub fn to_name(&self) -> String {
        self.name.clone()
    }

    /// Return some OID indexed under `key`, the oldest surviving one.
    pub fn find(&self, key: &I) -> Option<u64> {
        self.map.get(key).and_then(|oids| oids.first().copied())
    }

    /// Return number of indexed (key, OID) pairs.
    pub fn count(&self) -> usize {
        self.map.values().map(Vec::len).sum()
    }
}

impl<I, V> RowIndex<V> for MultiIndex<I, V>
where
    I: Ord + 'static,
    V: 'static,
{
    fn add(&mut self, oid: u64, value: &V) {
        let key = (self.project)(value);
        self.map.entry(key).or_insert_with(Vec::new).push(oid);
    }

    // Erase the specific (key, OID) pair, not an arbitrary entry under
    // that key.
    fn remove(&mut self, oid: u64, value: &V) {
        let key = (self.project)(value);
        let empty = match self.map.get_mut(&key) {
            Some(oids) => {
                if let Some(pos) = oids.iter().position(|x| *x == oid) {
                    oids.remove(pos);
                }
                oids.is_empty()
            }
            None => false,
        };
        if empty {
            self.map.remove(&key);
        }
    }

    fn validate(&self, table: &Table<V>) -> Result<()> {
        for (key, oids) in self.map.iter() {
            if oids.is_empty() {
                return err_at!(Fatal, msg: "index {} empty range", self.name);
            }
            for oid in oids.iter() {
                let row = match table.get(*oid) {
                    Some(row) => row,
                    None => {
                        return err_at!(Fatal, msg: "index {} oid {} not live", self.name, oid)
                    }
                };
                if (self.project)(row.as_value()).cmp(key) != Ordering::Equal {
                    return err_at!(
                        Fatal, msg: "index {} oid {} projection drift", self.name, oid
                    );
                }
            }
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
#[path = "index_test.rs"]
mod index_test;
