/// Row corresponds to a single value stored in a [crate::table::Table],
/// along with its OID and tombstone flag.
pub struct Row<V> {
    pub(crate) oid: u64,
    pub(crate) value: V,
    pub(crate) deleted: bool,
}

impl<V> Row<V> {
    /// Return the object-identifier assigned to this row. OIDs are
    /// unique for the lifetime of the table and never reassigned.
    #[inline]
    pub fn to_oid(&self) -> u64 {
        self.oid
    }

    #[inline]
    pub fn as_value(&self) -> &V {
        &self.value
    }

    #[inline]
    pub fn is_deleted(&self) -> bool {
        self.deleted
    }
}

// Bucket is one fixed-capacity block of rows. Buckets chain into a
// doubly-linked list in insertion order; `previous` is a back reference.
// Rows occupy slots [0..rows.len()) densely, a slot once written is
// never reused.
pub(crate) struct Bucket<V> {
    pub(crate) oid: u64,
    pub(crate) next: Option<usize>,
    pub(crate) previous: Option<usize>,
    pub(crate) rows: Vec<Row<V>>,
}

impl<V> Bucket<V> {
    pub(crate) fn new(oid: u64, capacity: usize) -> Bucket<V> {
        Bucket {
            oid,
            next: None,
            previous: None,
            rows: Vec::with_capacity(capacity),
        }
    }
}
