//! Ordered map with unique keys, on a red-black tree.
//!
//! Nodes are kept in a per-map arena, every leaf link and the
//! past-the-end position point to one sentinel node. Besides the usual
//! map API, [`RbMap`] hands out [`Cursor`] and [`ConstCursor`] positions
//! that move both ways through the map and can be handed back to
//! [`RbMap::erase`].
//!
//! ```
//! use rbtree_map::{Error, RbMap};
//!
//! let mut map: RbMap<i32, &str> = RbMap::new("example");
//! for (key, value) in vec![(5, "five"), (3, "three"), (8, "eight")] {
//!     map.insert(key, value);
//! }
//! let keys: Vec<i32> = map.iter().map(|(k, _)| *k).collect();
//! assert_eq!(keys, vec![3, 5, 8]);
//!
//! let mut cur = map.find(&5);
//! cur.move_next(&map).unwrap();
//! assert_eq!(cur.get(&map).unwrap(), (&8, &"eight"));
//!
//! assert_eq!(map.erase(map.end()), Err(Error::InvalidIterator));
//! assert_eq!(map.at(&42), Err(Error::KeyNotFound));
//! ```

mod compare;
mod cursor;
mod depth;
mod error;
mod map;
mod node;
mod rbtree;

pub use crate::compare::{Compare, Descending, Natural};
pub use crate::cursor::{ConstCursor, Cursor};
pub use crate::depth::Depth;
pub use crate::error::Error;
pub use crate::map::{Iter, RbMap, Stats};

#[cfg(test)]
mod map_test;
