use std::{error, fmt};

/// Error enumerates over all possible errors that this package
/// shall return.
#[derive(Clone, Debug, PartialEq)]
pub enum Error<K> {
    /// Returned by non-inserting lookups, like `at()`, when key is
    /// not present in the map.
    KeyNotFound,
    /// Cursor is unbound, belongs to another map, or points to a
    /// position that can't serve the requested operation.
    InvalidIterator,
    /// Returned by load_from() API when the same key shows up twice.
    DuplicateKey(K),
    /// Fatal case, root of the tree is red.
    RedRoot,
    /// Fatal case, a red node has a red child.
    ConsecutiveReds,
    /// Fatal case, paths below a node differ in black count. The String
    /// component of this variant can be used for debugging.
    UnbalancedBlacks(String),
    /// Fatal case, index entries are not in sort-order.
    SortError(K, K),
    /// Fatal case, a child's parent link does not point back.
    BrokenLink(String),
    /// Fatal case, (counted, recorded) number of entries differ.
    CountMismatch(usize, usize),
}

impl<K> fmt::Display for Error<K>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::KeyNotFound => write!(f, "key not found"),
            Error::InvalidIterator => write!(f, "invalid iterator"),
            Error::DuplicateKey(key) => write!(f, "duplicate key {:?}", key),
            Error::RedRoot => write!(f, "root is red"),
            Error::ConsecutiveReds => write!(f, "consecutive reds"),
            Error::UnbalancedBlacks(msg) => write!(f, "unbalanced blacks, {}", msg),
            Error::SortError(a, b) => write!(f, "sort error {:?} vs {:?}", a, b),
            Error::BrokenLink(msg) => write!(f, "broken link, {}", msg),
            Error::CountMismatch(counted, recorded) => {
                write!(f, "count mismatch {} != {}", counted, recorded)
            }
        }
    }
}

impl<K> error::Error for Error<K> where K: fmt::Debug {}
