//! Memorandum provide a pair of in-memory containers for applications
//! that want ordered key/value access and table-with-indexes semantics
//! without pulling in a database server.
//!
//! [bpt::Index] is an ordered map backed by a B+tree. All values ever
//! inserted, tombstones included, are threaded onto a doubly-linked list
//! in ascending key order, so full in-order iteration is O(n) in the
//! number of live entries regardless of tree shape. Deletes are
//! tombstones, the tree never shrinks, and re-inserting a removed key
//! revives its old slot and list position.
//!
//! [table::Table] is a row store. Values are appended into fixed-capacity
//! buckets, every row gets a monotonically increasing object-identifier
//! (OID), and user-declared secondary indexes, unique or multi, are kept
//! coherent with the primary storage across inserts and deletes.
//!
//! Both containers are single-threaded. No locking, no atomics, no
//! suspension; `&mut self` on every mutating operation is the whole
//! concurrency story. Containers own every node, entry and bucket they
//! allocate and release them on drop; the public API returns no owning
//! handles.

use std::{error, fmt, result};

/// Short form to compose Error values.
///
/// Macro expanded to,
///
/// ```ignore
/// Err(Error::<variant>(String::default(), format!(...)))
/// ```
///
/// where the first string carries the `file!():line!()` location of the
/// error site.
#[macro_export]
macro_rules! err_at {
    ($v:ident, msg: $($arg:expr),+) => {{
        let prefix = format!("{}:{}", file!(), line!());
        Err($crate::Error::$v(prefix, format!($($arg),+)))
    }};
}

/// Error variants that can be returned by this package's API.
///
/// Every variant carries a prefix, mostly the `file:line` of the error
/// site, and a message.
#[derive(Debug)]
pub enum Error {
    /// Internal invariant violated, memory gone bad, call the programmer.
    Fatal(String, String),
    /// Invalid argument to an API, like a fan-out below the minimum.
    Invalid(String, String),
    /// Key is missing from the index, or present only as a tombstone.
    KeyNotFound(String, String),
    /// No secondary index registered under the requested name.
    IndexNotFound(String, String),
    /// Unique access to a multi index, or vice-versa, or a mismatched
    /// projected-key type.
    KindMismatch(String, String),
    /// Value access on an internal node or out-of-range slot.
    InvalidAccess(String, String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> result::Result<(), fmt::Error> {
        use Error::*;

        match self {
            Fatal(p, m) => write!(f, "{} Fatal: {}", p, m),
            Invalid(p, m) => write!(f, "{} Invalid: {}", p, m),
            KeyNotFound(p, m) => write!(f, "{} KeyNotFound: {}", p, m),
            IndexNotFound(p, m) => write!(f, "{} IndexNotFound: {}", p, m),
            KindMismatch(p, m) => write!(f, "{} KindMismatch: {}", p, m),
            InvalidAccess(p, m) => write!(f, "{} InvalidAccess: {}", p, m),
        }
    }
}

impl error::Error for Error {}

/// Type alias for Result returned by functions of this package.
pub type Result<T> = result::Result<T, Error>;

pub mod bpt;
pub mod table;
