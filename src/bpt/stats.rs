use std::{fmt, result};

#[allow(unused_imports)]
use crate::bpt::Index;
use crate::bpt::Depth;

/// Statistic type, for [Index] type.
///
/// Counts come from walking the entry list, nothing is cached on the
/// tree. `depths` is available only from a [Index::validate] call.
pub struct Stats {
    pub name: String,
    pub fanout: usize,
    pub node_size: usize,
    pub entry_size: usize,
    pub n_count: usize,
    pub n_deleted: usize,
    pub n_nodes: usize,
    pub depths: Option<Depth>,
}

impl Stats {
    pub(crate) fn new(name: &str, fanout: usize) -> Stats {
        Stats {
            name: name.to_string(),
            fanout,
            node_size: Default::default(),
            entry_size: Default::default(),
            n_count: Default::default(),
            n_deleted: Default::default(),
            n_nodes: Default::default(),
            depths: None,
        }
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter) -> result::Result<(), fmt::Error> {
        let none = "none".to_string();
        let d = self.depths.as_ref().map_or(none, |x| x.to_string());
        writeln!(f, "bpt.name = {}", self.name)?;
        writeln!(
            f,
            "bpt = {{ fanout={}, n_count={}, n_deleted={}, n_nodes={} }}",
            self.fanout, self.n_count, self.n_deleted, self.n_nodes,
        )?;
        writeln!(
            f,
            "bpt = {{ node_size={}, entry_size={} }}",
            self.node_size, self.entry_size,
        )?;
        writeln!(f, "bpt.depths = {}", d)
    }
}
