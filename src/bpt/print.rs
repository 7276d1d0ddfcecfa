// BFS dump of the tree and its entry list, for debugging. Arena indices
// are renumbered in first-seen order so two dumps of equal trees compare
// textually.

use std::{collections::VecDeque, fmt};

use crate::bpt::Index;

struct Alias {
    seen: Vec<usize>,
}

impl Alias {
    fn new() -> Alias {
        Alias { seen: vec![] }
    }

    fn get(&mut self, id: usize) -> usize {
        match self.seen.iter().position(|seen| *seen == id) {
            Some(pos) => pos + 1,
            None => {
                self.seen.push(id);
                self.seen.len()
            }
        }
    }
}

impl<K, V> Index<K, V>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    /// Render the tree level by level, then the entry list, tombstones
    /// flagged with `D`.
    pub fn to_pretty_string(&self) -> String {
        let mut nalias = Alias::new();
        let mut ealias = Alias::new();
        let mut s = String::from("TREE --\n");

        let mut queue = VecDeque::new();
        queue.push_back((0, self.root));
        let mut current_level = None;

        while let Some((level, id)) = queue.pop_front() {
            if current_level != Some(level) {
                if current_level.is_some() {
                    s.push('\n');
                }
                s.push_str(&format!("{}: ", level));
                current_level = Some(level);
            } else {
                s.push(' ');
            }

            let node = &self.nodes[id];
            let alias = nalias.get(id);
            let parent = match node.parent {
                Some(p) => nalias.get(p),
                None => 0,
            };
            let tag = if node.is_internal() { 'I' } else { 'L' };
            s.push_str(&format!("<{}>[{}:{}:{}", alias, parent, node.num_keys(), tag));

            if node.is_internal() {
                for (i, key) in node.keys.iter().enumerate() {
                    s.push_str(&format!(" ({}) {:?}", nalias.get(node.child_ptrs[i]), key));
                }
                match node.child_ptrs.last() {
                    Some(&child) => s.push_str(&format!(" ({})", nalias.get(child))),
                    None => (),
                }
                for &child in node.child_ptrs.iter() {
                    queue.push_back((level + 1, child));
                }
            } else {
                for (i, key) in node.keys.iter().enumerate() {
                    let d = if node.deleted[i] { "D" } else { "" };
                    s.push_str(&format!(" {:?}{}/{}", key, d, ealias.get(node.child_ptrs[i])));
                }
            }
            s.push_str(" ]");
        }
        s.push('\n');

        s.push_str("VALUES --\n");
        let mut cursor = self.head;
        while let Some(eid) = cursor {
            let entry = &self.entries[eid];
            let d = if entry.deleted { 'D' } else { ' ' };
            s.push_str(&format!(
                "({}) {}{:?}, {:?}\n",
                ealias.get(eid),
                d,
                entry.key,
                entry.value
            ));
            cursor = entry.next;
        }

        s
    }
}
