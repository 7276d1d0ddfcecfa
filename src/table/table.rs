// Module ``table`` implement a bucketed row store with tombstone
// deletes and pluggable secondary indexes.
//
// Rows append into the tail bucket, a fresh bucket is chained in
// whenever the tail is full. One monotonic counter hands out OIDs to
// buckets and rows alike, so row OIDs are not dense, only unique. A
// primary directory maps each live OID to its (bucket, slot) location.
// Registered indexes observe every insert, and every delete while the
// row is still readable.

use std::collections::BTreeMap;

use crate::{
    err_at,
    table::index::{IndexSlot, MultiIndex, RowIndex, UniqueIndex},
    table::row::{Bucket, Row},
    Result,
};

/// Default number of row slots in a bucket, for [Table::new].
pub const DEFAULT_ROWS_PER_BUCKET: usize = 100;

/// Table type storing rows of `V` in insertion order, with OID-based
/// deletes and named secondary indexes.
///
/// A table owns its buckets, rows and indexes, and is move-only; there
/// is no copy semantics. Mutation from multiple threads is prevented by
/// `&mut self`, there is no locking.
pub struct Table<V> {
    name: String,
    rows_per_bucket: usize,

    last_oid: u64,
    buckets: Vec<Bucket<V>>,
    head: Option<usize>,
    tail: Option<usize>,
    directory: BTreeMap<u64, (usize, usize)>,
    indexes: BTreeMap<String, IndexSlot<V>>,
}

impl<V> Table<V> {
    /// Create an empty table with [DEFAULT_ROWS_PER_BUCKET].
    pub fn new(name: &str) -> Table<V> {
        Table {
            name: name.to_string(),
            rows_per_bucket: DEFAULT_ROWS_PER_BUCKET,
            last_oid: 0,
            buckets: Vec::default(),
            head: None,
            tail: None,
            directory: BTreeMap::new(),
            indexes: BTreeMap::new(),
        }
    }

    /// Create an empty table with the supplied bucket capacity, at
    /// least one row per bucket.
    pub fn with_bucket_size(name: &str, rows_per_bucket: usize) -> Result<Table<V>> {
        if rows_per_bucket == 0 {
            return err_at!(Invalid, msg: "rows_per_bucket must be non-zero");
        }
        let mut table = Table::new(name);
        table.rows_per_bucket = rows_per_bucket;
        Ok(table)
    }

    /// Identify this table instance.
    #[inline]
    pub fn to_name(&self) -> String {
        self.name.clone()
    }

    /// Return the bucket capacity this table was built with.
    #[inline]
    pub fn to_bucket_size(&self) -> usize {
        self.rows_per_bucket
    }

    /// Return number of live rows, by walking the buckets.
    pub fn count(&self) -> usize {
        let mut count = 0;
        let mut cursor = self.head;
        while let Some(id) = cursor {
            let bucket = &self.buckets[id];
            count += bucket.rows.iter().filter(|row| !row.deleted).count();
            cursor = bucket.next;
        }
        count
    }

    /// Same as [Table::count].
    #[inline]
    pub fn len(&self) -> usize {
        self.count()
    }

    /// Return whether the table holds no live row.
    pub fn is_empty(&self) -> bool {
        let mut iter = self.iter();
        iter.next().is_none()
    }

    /// Look up a live row by OID through the primary directory.
    pub fn get(&self, oid: u64) -> Option<&Row<V>> {
        let (bucket, slot) = *self.directory.get(&oid)?;
        Some(&self.buckets[bucket].rows[slot])
    }

    /// Iterate live rows in bucket-insertion order.
    pub fn iter(&self) -> Rows<'_, V> {
        Rows {
            buckets: &self.buckets,
            bucket: self.head,
            slot: 0,
        }
    }

    /// Iterate live rows whose value satisfies `predicate`, in
    /// bucket-insertion order.
    pub fn select<P>(&self, predicate: P) -> Select<'_, V, P>
    where
        P: Fn(&V) -> bool,
    {
        Select {
            rows: self.iter(),
            predicate,
        }
    }

    fn next_oid(&mut self) -> u64 {
        self.last_oid += 1;
        self.last_oid
    }

    // Chain a fresh bucket behind the tail and return its arena index.
    fn add_bucket(&mut self) -> usize {
        let oid = self.next_oid();
        let id = self.buckets.len();
        self.buckets.push(Bucket::new(oid, self.rows_per_bucket));
        match self.tail {
            Some(tail) => {
                self.buckets[tail].next = Some(id);
                self.buckets[id].previous = Some(tail);
            }
            None => self.head = Some(id),
        }
        self.tail = Some(id);
        id
    }

    /// Append `value` as a fresh row and return an iterator positioned
    /// at it. The row's OID comes off the yielded [Row].
    ///
    /// Every registered index observes the new row before this method
    /// returns.
    pub fn insert_row(&mut self, value: V) -> Result<Rows<'_, V>> {
        let bucket = match self.tail {
            Some(id) if self.buckets[id].rows.len() < self.rows_per_bucket => id,
            _ => self.add_bucket(),
        };
        let oid = self.next_oid();
        let slot = self.buckets[bucket].rows.len();
        self.buckets[bucket].rows.push(Row {
            oid,
            value,
            deleted: false,
        });
        self.directory.insert(oid, (bucket, slot));

        let value = &self.buckets[bucket].rows[slot].value;
        for entry in self.indexes.values_mut() {
            entry.index.add(oid, value);
        }

        Ok(Rows {
            buckets: &self.buckets,
            bucket: Some(bucket),
            slot,
        })
    }

    /// Tombstone the row carrying `oid` and drop it from the primary
    /// directory. Unknown OIDs are a no-op.
    ///
    /// Every registered index observes the removal first, while the row
    /// is still readable.
    pub fn delete_row(&mut self, oid: u64) -> Result<()> {
        let (bucket, slot) = match self.directory.get(&oid) {
            Some(&location) => location,
            None => return Ok(()),
        };

        let value = &self.buckets[bucket].rows[slot].value;
        for entry in self.indexes.values_mut() {
            entry.index.remove(oid, value);
        }

        self.buckets[bucket].rows[slot].deleted = true;
        self.directory.remove(&oid);
        Ok(())
    }
}

impl<V> Table<V>
where
    V: 'static,
{
    /// Register a unique index over the projection `project`, back-
    /// filling it from the live rows. Index names are unique within a
    /// table.
    pub fn create_index<I, P>(&mut self, name: &str, project: P) -> Result<()>
    where
        I: Ord + 'static,
        P: Fn(&V) -> I + 'static,
    {
        if self.indexes.contains_key(name) {
            return err_at!(Invalid, msg: "index {} already exists", name);
        }
        let mut index = UniqueIndex::new(name, Box::new(project));
        for row in self.iter() {
            index.add(row.oid, &row.value);
        }
        let slot = IndexSlot { is_multi: false, index: Box::new(index) };
        self.indexes.insert(name.to_string(), slot);
        Ok(())
    }

    /// Register a multi index over the projection `project`, back-
    /// filling it from the live rows. Index names are unique within a
    /// table.
    pub fn create_multi_index<I, P>(&mut self, name: &str, project: P) -> Result<()>
    where
        I: Ord + 'static,
        P: Fn(&V) -> I + 'static,
    {
        if self.indexes.contains_key(name) {
            return err_at!(Invalid, msg: "index {} already exists", name);
        }
        let mut index = MultiIndex::new(name, Box::new(project));
        for row in self.iter() {
            index.add(row.oid, &row.value);
        }
        let slot = IndexSlot { is_multi: true, index: Box::new(index) };
        self.indexes.insert(name.to_string(), slot);
        Ok(())
    }

    /// Fetch the unique index registered as `name`.
    pub fn index<I>(&self, name: &str) -> Result<&UniqueIndex<I, V>>
    where
        I: Ord + 'static,
    {
        let slot = match self.indexes.get(name) {
            Some(slot) => slot,
            None => return err_at!(IndexNotFound, msg: "no index {}", name),
        };
        if slot.is_multi {
            return err_at!(KindMismatch, msg: "{} is a multi index", name);
        }
        match slot.index.as_any().downcast_ref::<UniqueIndex<I, V>>() {
            Some(index) => Ok(index),
            None => err_at!(KindMismatch, msg: "{} projected-key type mismatch", name),
        }
    }

    /// Fetch the multi index registered as `name`.
    pub fn multi_index<I>(&self, name: &str) -> Result<&MultiIndex<I, V>>
    where
        I: Ord + 'static,
    {
        let slot = match self.indexes.get(name) {
            Some(slot) => slot,
            None => return err_at!(IndexNotFound, msg: "no index {}", name),
        };
        if !slot.is_multi {
            return err_at!(KindMismatch, msg: "{} is a unique index", name);
        }
        match slot.index.as_any().downcast_ref::<MultiIndex<I, V>>() {
            Some(index) => Ok(index),
            None => err_at!(KindMismatch, msg: "{} projected-key type mismatch", name),
        }
    }
}

impl<V> Table<V> {
    /// Validate this table with following rules:
    ///
    /// * The bucket chain is doubly linked, in arena order, and no
    ///   bucket is over capacity.
    /// * Every live row has a matching primary-directory entry and
    ///   every directory entry points at a live row with the same OID.
    /// * Every (key, OID) held by an index resolves to a live row whose
    ///   projection equals the key.
    pub fn validate(&self) -> Result<()> {
        let mut n_live = 0;
        let mut cursor = self.head;
        let mut previous = None;
        while let Some(id) = cursor {
            let bucket = &self.buckets[id];
            if bucket.previous != previous {
                err_at!(Fatal, msg: "bucket {} broken back link", bucket.oid)?
            }
            if bucket.rows.len() > self.rows_per_bucket {
                err_at!(Fatal, msg: "bucket {} over capacity", bucket.oid)?
            }
            if bucket.oid > self.last_oid {
                err_at!(Fatal, msg: "bucket {} beyond the oid counter", bucket.oid)?
            }
            for (slot, row) in bucket.rows.iter().enumerate() {
                if row.oid > self.last_oid {
                    err_at!(Fatal, msg: "row {} beyond the oid counter", row.oid)?
                }
                match (row.deleted, self.directory.get(&row.oid)) {
                    (false, Some(&(b, s))) if b == id && s == slot => n_live += 1,
                    (false, _) => {
                        err_at!(Fatal, msg: "live row {} missing from directory", row.oid)?
                    }
                    (true, None) => (),
                    (true, Some(_)) => {
                        err_at!(Fatal, msg: "deleted row {} in directory", row.oid)?
                    }
                }
            }
            previous = cursor;
            cursor = bucket.next;
        }
        if n_live != self.directory.len() {
            let n = self.directory.len();
            err_at!(Fatal, msg: "directory count {} != live rows {}", n, n_live)?
        }

        for slot in self.indexes.values() {
            slot.index.validate(self)?;
        }
        Ok(())
    }
}

/// Iterator type, for live rows in bucket-insertion order.
pub struct Rows<'a, V> {
    buckets: &'a [Bucket<V>],
    bucket: Option<usize>,
    slot: usize,
}

impl<'a, V> Iterator for Rows<'a, V> {
    type Item = &'a Row<V>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.bucket {
            let bucket = &self.buckets[id];
            if self.slot >= bucket.rows.len() {
                self.bucket = bucket.next;
                self.slot = 0;
            } else {
                let row = &bucket.rows[self.slot];
                self.slot += 1;
                if !row.deleted {
                    return Some(row);
                }
            }
        }
        None
    }
}

/// Iterator type, for live rows passing a value predicate.
pub struct Select<'a, V, P>
where
    P: Fn(&V) -> bool,
{
    rows: Rows<'a, V>,
    predicate: P,
}

impl<'a, V, P> Iterator for Select<'a, V, P>
where
    P: Fn(&V) -> bool,
{
    type Item = &'a Row<V>;

    fn next(&mut self) -> Option<Self::Item> {
        let predicate = &self.predicate;
        self.rows.find(|row| predicate(&row.value))
    }
}

#[cfg(test)]
#[path = "table_test.rs"]
mod table_test;
