use std::{
    fmt, mem,
    ops::Index,
    sync::atomic::{AtomicU64, Ordering},
};

use log::{debug, trace};
use rand::Rng;

use crate::compare::{Compare, Natural};
use crate::cursor::{ConstCursor, Cursor, Handle};
use crate::depth::Depth;
use crate::error::Error;
use crate::node::{Node, NIL};
use crate::rbtree::Tree;

// zero is reserved for unbound cursors.
static NEXT_ID: AtomicU64 = AtomicU64::new(1);

fn next_id() -> u64 {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// RbMap manage a single instance of ordered, unique-key map, using
/// [red-black][rbt] tree. Keys are ordered by the comparator `C`,
/// [`Natural`] order by default.
///
/// [rbt]: https://en.wikipedia.org/wiki/Red%E2%80%93black_tree
pub struct RbMap<K, V, C = Natural> {
    name: String,
    id: u64, // identity, cursors carry this.
    tree: Tree<K, V, C>,
    n_count: usize, // number of entries in the tree.
}

/// Different ways to construct a new RbMap instance.
impl<K, V> RbMap<K, V, Natural>
where
    K: Ord,
{
    /// Create an empty instance of RbMap, identified by `name`.
    /// Applications can choose unique names.
    pub fn new<S>(name: S) -> RbMap<K, V>
    where
        S: AsRef<str>,
    {
        RbMap::with_comparator(name, Natural)
    }

    /// Create a new instance of RbMap and load it with entries
    /// from `iter`. Note that iterator should return (key, value) tuples,
    /// where key must be ``unique``.
    pub fn load_from<S, I>(name: S, iter: I) -> Result<RbMap<K, V>, Error<K>>
    where
        S: AsRef<str>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut map: RbMap<K, V> = RbMap::new(name);
        for (key, value) in iter {
            if map.contains_key(&key) {
                return Err(Error::DuplicateKey(key));
            }
            map.insert(key, value);
        }
        debug!("{}: loaded {} entries", map.name, map.n_count);
        Ok(map)
    }
}

impl<K, V, C> RbMap<K, V, C>
where
    C: Compare<K>,
{
    /// Create an empty instance of RbMap, ordering its keys using `cmp`.
    pub fn with_comparator<S>(name: S, cmp: C) -> RbMap<K, V, C>
    where
        S: AsRef<str>,
    {
        RbMap {
            name: name.as_ref().to_string(),
            id: next_id(),
            tree: Tree::new(cmp),
            n_count: Default::default(),
        }
    }
}

impl<K, V> Default for RbMap<K, V, Natural>
where
    K: Ord,
{
    fn default() -> Self {
        RbMap::new("")
    }
}

/// Maintenance API.
impl<K, V, C> RbMap<K, V, C> {
    /// Identify this instance. Applications can choose unique names while
    /// creating RbMap instances.
    #[inline]
    pub fn id(&self) -> String {
        self.name.clone()
    }

    /// Return number of entries in this instance.
    #[inline]
    pub fn len(&self) -> usize {
        self.n_count
    }

    /// Check whether this index is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n_count == 0
    }

    /// Remove all entries. Cursors obtained before are left dangling.
    pub fn clear(&mut self) {
        debug!("{}: clear {} entries", self.name, self.n_count);
        self.tree.clear();
        self.n_count = 0;
    }

    /// Return quickly with basic statisics, only entries() method is valid
    /// with this statisics.
    pub fn stats(&self) -> Stats {
        Stats::new(self.n_count, mem::size_of::<Node<K, V>>())
    }
}

/// Cursor API.
impl<K, V, C> RbMap<K, V, C> {
    /// Cursor to the first entry, same as `end()` for an empty map.
    pub fn begin(&self) -> Cursor {
        Cursor::new(self.id, self.tree.minimum(self.tree.root()))
    }

    /// Cursor to the past-the-end position.
    pub fn end(&self) -> Cursor {
        Cursor::new(self.id, NIL)
    }

    pub fn cbegin(&self) -> ConstCursor {
        ConstCursor::new(self.id, self.tree.minimum(self.tree.root()))
    }

    pub fn cend(&self) -> ConstCursor {
        ConstCursor::new(self.id, NIL)
    }

    // resolve handle to a node of this map, sentinel included.
    fn bound(&self, handle: &Handle) -> Result<usize, Error<K>> {
        if handle.owner == self.id && self.tree.is_live(handle.node) {
            Ok(handle.node)
        } else {
            Err(Error::InvalidIterator)
        }
    }

    pub(crate) fn handle_entry(&self, handle: &Handle) -> Result<(&K, &V), Error<K>> {
        let node = self.bound(handle)?;
        self.tree.entry(node).ok_or(Error::InvalidIterator)
    }

    pub(crate) fn handle_entry_mut(&mut self, handle: &Handle) -> Result<(&K, &mut V), Error<K>> {
        let node = self.bound(handle)?;
        self.tree.entry_mut(node).ok_or(Error::InvalidIterator)
    }

    pub(crate) fn handle_next(&self, handle: &Handle) -> Result<Handle, Error<K>> {
        match self.bound(handle)? {
            NIL => Err(Error::InvalidIterator),
            node => Ok(Handle {
                owner: self.id,
                node: self.tree.successor(node),
            }),
        }
    }

    pub(crate) fn handle_prev(&self, handle: &Handle) -> Result<Handle, Error<K>> {
        let node = self.bound(handle)?;
        match self.tree.predecessor(node) {
            NIL => Err(Error::InvalidIterator),
            node => Ok(Handle {
                owner: self.id,
                node,
            }),
        }
    }

    fn remove_node(&mut self, node: usize) -> (K, V) {
        match self.tree.delete(node) {
            Some(entry) => {
                self.n_count -= 1;
                entry
            }
            None => panic!("remove_node(): keyless node {}, call the programmer", node),
        }
    }

    /// Erase the entry under `pos` and return it. Fails if `pos` is
    /// unbound, belongs to another map, or is at end; the map is left
    /// untouched in that case.
    pub fn erase(&mut self, pos: Cursor) -> Result<(K, V), Error<K>> {
        match self.bound(&pos.0) {
            Ok(NIL) | Err(_) => {
                trace!("{}: erase rejected {:?}", self.name, pos);
                Err(Error::InvalidIterator)
            }
            Ok(node) => Ok(self.remove_node(node)),
        }
    }
}

type Insert = (Cursor, bool);

/// Write operations on RbMap instance.
impl<K, V, C> RbMap<K, V, C>
where
    C: Compare<K>,
{
    /// Insert a new {key, value} entry. If an equivalent key is already
    /// present, the map is not touched and the cursor points to the
    /// existing entry. The boolean tells whether insert happened.
    pub fn insert(&mut self, key: K, value: V) -> Insert {
        let (node, inserted) = self.tree.insert_with(key, || value);
        if inserted {
            self.n_count += 1;
        }
        (Cursor::new(self.id, node), inserted)
    }

    /// Return a mutable reference to value for key, inserting a default
    /// value first if key is missing.
    pub fn index_or_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        let (node, inserted) = self.tree.insert_with(key, V::default);
        if inserted {
            self.n_count += 1;
        }
        match self.tree.entry_mut(node) {
            Some((_, value)) => value,
            None => panic!("index_or_default(): keyless node, call the programmer"),
        }
    }

    /// Delete key from this instance and return its value. If key is
    /// not present, then remove is effectively a no-op.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        match self.tree.search(key) {
            NIL => None,
            node => Some(self.remove_node(node).1),
        }
    }

    /// Validate the tree with following rules:
    ///
    /// * Root is black and no red node has a red child.
    /// * Number of blacks should be same under left child and right child.
    /// * Make sure keys are in sorted order.
    /// * Parent links are consistent and entry count matches.
    ///
    /// Additionally return full statistics on the tree. Refer to [`Stats`]
    /// for more information.
    pub fn validate(&self) -> Result<Stats, Error<K>>
    where
        K: Clone,
    {
        let mut stats = self.stats();
        let mut depths = Depth::new();
        let (blacks, count) = self.tree.validate(&mut depths)?;
        if count != self.n_count {
            return Err(Error::CountMismatch(count, self.n_count));
        }
        stats.set_blacks(blacks);
        stats.set_depths(depths);
        Ok(stats)
    }
}

/// Read operations on RbMap instance.
impl<K, V, C> RbMap<K, V, C>
where
    C: Compare<K>,
{
    /// Return value for key, fail with [`Error::KeyNotFound`] if missing.
    pub fn at(&self, key: &K) -> Result<&V, Error<K>> {
        self.get(key).ok_or(Error::KeyNotFound)
    }

    /// Mutable flavour of [`at`](RbMap::at).
    pub fn at_mut(&mut self, key: &K) -> Result<&mut V, Error<K>> {
        self.get_mut(key).ok_or(Error::KeyNotFound)
    }

    /// Get the value for key.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.tree
            .entry(self.tree.search(key))
            .map(|(_, value)| value)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let node = self.tree.search(key);
        self.tree.entry_mut(node).map(|(_, value)| value)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.tree.search(key) != NIL
    }

    /// Return number of entries matching key, either 0 or 1.
    pub fn count(&self, key: &K) -> usize {
        if self.contains_key(key) {
            1
        } else {
            0
        }
    }

    /// Cursor to the entry for key, `end()` if missing.
    pub fn find(&self, key: &K) -> Cursor {
        Cursor::new(self.id, self.tree.search(key))
    }

    /// Read-only flavour of [`find`](RbMap::find), `cend()` if missing.
    pub fn cfind(&self, key: &K) -> ConstCursor {
        ConstCursor::new(self.id, self.tree.search(key))
    }
}

impl<K, V, C> RbMap<K, V, C> {
    /// Return the entry with smallest key.
    pub fn first(&self) -> Option<(&K, &V)> {
        self.tree.entry(self.tree.minimum(self.tree.root()))
    }

    /// Return the entry with largest key.
    pub fn last(&self) -> Option<(&K, &V)> {
        self.tree.entry(self.tree.maximum(self.tree.root()))
    }

    /// Return a random entry from this index.
    pub fn random<R: Rng>(&self, rng: &mut R) -> Option<(&K, &V)> {
        let mut node = self.tree.root();
        if node == NIL {
            return None;
        }

        let mut at_depth = rng.gen::<u8>() % 40;
        loop {
            let next = match rng.gen::<u8>() % 2 {
                0 => self.tree.left(node),
                1 => self.tree.right(node),
                _ => unreachable!(),
            };
            if at_depth == 0 || next == NIL {
                break self.tree.entry(node);
            }
            at_depth -= 1;
            node = next;
        }
    }

    /// Return an iterator over all entries in this instance, in sort
    /// order.
    pub fn iter(&self) -> Iter<K, V, C> {
        let root = self.tree.root();
        Iter {
            tree: &self.tree,
            front: self.tree.minimum(root),
            back: self.tree.maximum(root),
            remaining: self.n_count,
        }
    }
}

impl<K, V, C> Clone for RbMap<K, V, C>
where
    K: Clone,
    V: Clone,
    C: Clone,
{
    /// Deep copy with a new identity, cursors of `self` are not valid
    /// on the copy.
    fn clone(&self) -> Self {
        RbMap {
            name: self.name.clone(),
            id: next_id(),
            tree: self.tree.clone(),
            n_count: self.n_count,
        }
    }

    /// Replace content with a deep copy of `source`, keeps the name and
    /// identity of `self`.
    fn clone_from(&mut self, source: &Self) {
        self.clear();
        self.tree = source.tree.clone();
        self.n_count = source.n_count;
        debug!("{}: copied {} entries from {}", self.name, self.n_count, source.name);
    }
}

impl<K, V, C> fmt::Debug for RbMap<K, V, C>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Same lookup as [`RbMap::at`], panics if key is missing.
impl<'a, K, V, C> Index<&'a K> for RbMap<K, V, C>
where
    C: Compare<K>,
{
    type Output = V;

    fn index(&self, key: &K) -> &V {
        match self.get(key) {
            Some(value) => value,
            None => panic!("index(): key not found in {:?}", self.name),
        }
    }
}

impl<'a, K, V, C> IntoIterator for &'a RbMap<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, C>;

    fn into_iter(self) -> Iter<'a, K, V, C> {
        self.iter()
    }
}

/// Iterate over entries in sort order, from both ends, by walking
/// successor and predecessor links.
pub struct Iter<'a, K, V, C> {
    tree: &'a Tree<K, V, C>,
    front: usize,
    back: usize,
    remaining: usize,
}

impl<'a, K, V, C> Iterator for Iter<'a, K, V, C> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.front;
        self.front = self.tree.successor(node);
        self.remaining -= 1;
        self.tree.entry(node)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K, V, C> DoubleEndedIterator for Iter<'a, K, V, C> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.back;
        self.back = self.tree.predecessor(node);
        self.remaining -= 1;
        self.tree.entry(node)
    }
}

impl<'a, K, V, C> ExactSizeIterator for Iter<'a, K, V, C> {}

/// Statistics on [`RbMap`] tree. Serves two purpose:
///
/// * To get partial but quick statistics via [`RbMap::stats`] method.
/// * To get full statisics via [`RbMap::validate`] method.
#[derive(Default, Debug)]
pub struct Stats {
    entries: usize, // number of entries in the tree.
    node_size: usize,
    blacks: Option<usize>,
    depths: Option<Depth>,
}

impl Stats {
    fn new(entries: usize, node_size: usize) -> Stats {
        Stats {
            entries,
            node_size,
            blacks: Default::default(),
            depths: Default::default(),
        }
    }

    #[inline]
    fn set_blacks(&mut self, blacks: usize) {
        self.blacks = Some(blacks)
    }

    #[inline]
    fn set_depths(&mut self, depths: Depth) {
        self.depths = Some(depths)
    }

    /// Return number entries in [`RbMap`] instance.
    #[inline]
    pub fn entries(&self) -> usize {
        self.entries
    }

    /// Return node-size, including over-head for `RbMap<K, V>`. Although
    /// the node overhead is constant, the node size varies based on
    /// key and value types. EG:
    ///
    /// ```
    /// use rbtree_map::RbMap;
    /// let map: RbMap<u64, i128> = RbMap::new("myinstance");
    ///
    /// // size of key: 8 bytes
    /// // size of value: 16 bytes
    /// // overhead is three links and a color
    /// assert!(map.stats().node_size() >= 24 + 3 * 8 + 1);
    /// ```
    #[inline]
    pub fn node_size(&self) -> usize {
        self.node_size
    }

    /// Return number of black nodes from root to leaf, sentinel excluded.
    /// Available only from [`RbMap::validate`].
    #[inline]
    pub fn blacks(&self) -> Option<usize> {
        self.blacks
    }

    /// Return [`Depth`] statistics, available only from
    /// [`RbMap::validate`].
    pub fn depths(&self) -> Option<Depth> {
        self.depths.clone()
    }
}
