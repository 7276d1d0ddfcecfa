// Entry corresponds to a single key/value pair inserted into the index.
//
// Entries for every key ever inserted, tombstoned ones included, form a
// single doubly-linked list whose traversal order matches ascending key
// order. `prev` is a back reference, it never implies ownership; the
// entry arena in [crate::bpt::Index] owns all of them.
pub struct Entry<K, V> {
    pub key: K,
    pub value: V,
    pub deleted: bool,
    pub prev: Option<usize>,
    pub next: Option<usize>,
}

impl<K, V> Entry<K, V> {
    pub fn new(key: K, value: V) -> Entry<K, V> {
        Entry {
            key,
            value,
            deleted: false,
            prev: None,
            next: None,
        }
    }
}
