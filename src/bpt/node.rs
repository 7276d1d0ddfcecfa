use std::cmp::Ordering;

use crate::{err_at, Result};

// Tag distinguishing the two node layouts. Internal child slots refer to
// other nodes, leaf child slots refer to entries in the entry arena.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NodeType {
    Internal,
    Leaf,
}

// Node corresponds to a single page in the tree arena.
//
// `keys` hold `num_keys` keys in strictly ascending order. `child_ptrs`
// hold arena indices, `num_keys + 1` node-ids for an internal node,
// `num_keys` entry-ids for a leaf. `deleted` is the leaf tombstone
// bitset, parallel to `child_ptrs`, always empty on internal nodes.
// `parent` is a back reference, None only at the root.
pub struct Node<K> {
    pub ntype: NodeType,
    pub keys: Vec<K>,
    pub child_ptrs: Vec<usize>,
    pub deleted: Vec<bool>,
    pub parent: Option<usize>,
}

impl<K> Node<K> {
    pub fn new(ntype: NodeType, key_limit: usize) -> Node<K> {
        Node {
            ntype,
            keys: Vec::with_capacity(key_limit),
            child_ptrs: Vec::with_capacity(key_limit + 1),
            deleted: Vec::with_capacity(key_limit),
            parent: None,
        }
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.ntype == NodeType::Leaf
    }

    #[inline]
    pub fn is_internal(&self) -> bool {
        self.ntype == NodeType::Internal
    }

    #[inline]
    pub fn num_keys(&self) -> usize {
        self.keys.len()
    }

    // Entry-id stored at leaf slot `index`.
    pub fn entry_at(&self, index: usize) -> Result<usize> {
        if self.is_internal() {
            err_at!(InvalidAccess, msg: "value access on internal node")
        } else if index >= self.num_keys() {
            err_at!(InvalidAccess, msg: "slot {}/{} out of range", index, self.num_keys())
        } else {
            Ok(self.child_ptrs[index])
        }
    }
}

impl<K> Node<K>
where
    K: Ord,
{
    // Slot holding a key equivalent to `key`, tombstoned or not.
    pub fn leaf_search(&self, key: &K) -> Option<usize> {
        match self.keys.binary_search_by(|k| k.cmp(key)) {
            Ok(index) => Some(index),
            Err(_) => None,
        }
    }

    // Child slot to descend into for `key`. Equivalent keys route right.
    pub fn child_of(&self, key: &K) -> usize {
        match self.keys.binary_search_by(|k| k.cmp(key)) {
            Ok(index) => index + 1,
            Err(index) => index,
        }
    }

    // Verify the intra-node sort order.
    pub fn validate(&self) -> Result<()> {
        for pair in self.keys.windows(2) {
            if pair[0].cmp(&pair[1]) != Ordering::Less {
                err_at!(Fatal, msg: "node keys out of order")?
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "node_test.rs"]
mod node_test;
