use crate::error::Error;
use crate::map::RbMap;

// (owning map, node) pair shared by both cursor flavours. Owner 0 is
// never handed out to a map, that is the unbound state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub(crate) struct Handle {
    pub(crate) owner: u64,
    pub(crate) node: usize,
}

/// Cursor is a position inside an [`RbMap`], pointing either to an entry
/// or to the past-the-end position. It does not borrow the map, every
/// operation takes the map it was created from and fails with
/// [`Error::InvalidIterator`] when handed any other map.
///
/// Cursors pointing to untouched entries stay valid across insert and
/// erase of other keys. Using a cursor whose entry was erased is not
/// defined, it may fail or observe an entry inserted later.
///
/// `Cursor::default()` is unbound and fails every operation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Cursor(pub(crate) Handle);

/// Read-only flavour of [`Cursor`]. A [`Cursor`] converts into a
/// `ConstCursor`, and the two compare equal when they denote the same
/// position in the same map.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ConstCursor(pub(crate) Handle);

impl Cursor {
    pub(crate) fn new(owner: u64, node: usize) -> Cursor {
        Cursor(Handle { owner, node })
    }

    /// Return whether this cursor was ever obtained from a map.
    pub fn is_bound(&self) -> bool {
        self.0.owner != 0
    }

    /// Return the entry under cursor.
    pub fn get<'a, K, V, C>(&self, map: &'a RbMap<K, V, C>) -> Result<(&'a K, &'a V), Error<K>> {
        map.handle_entry(&self.0)
    }

    /// Return the entry under cursor, with mutable access to its value.
    pub fn get_mut<'a, K, V, C>(
        &self,
        map: &'a mut RbMap<K, V, C>,
    ) -> Result<(&'a K, &'a mut V), Error<K>> {
        map.handle_entry_mut(&self.0)
    }

    /// Move to the next entry in sort order, or to end. Fails at end.
    pub fn move_next<K, V, C>(&mut self, map: &RbMap<K, V, C>) -> Result<(), Error<K>> {
        self.0 = map.handle_next(&self.0)?;
        Ok(())
    }

    /// Move to the previous entry in sort order. From end this lands on
    /// the last entry. Fails at the first entry.
    pub fn move_prev<K, V, C>(&mut self, map: &RbMap<K, V, C>) -> Result<(), Error<K>> {
        self.0 = map.handle_prev(&self.0)?;
        Ok(())
    }

    /// Same as `move_next`, but return the position before the move.
    pub fn post_next<K, V, C>(&mut self, map: &RbMap<K, V, C>) -> Result<Cursor, Error<K>> {
        let old = *self;
        self.move_next(map)?;
        Ok(old)
    }

    /// Same as `move_prev`, but return the position before the move.
    pub fn post_prev<K, V, C>(&mut self, map: &RbMap<K, V, C>) -> Result<Cursor, Error<K>> {
        let old = *self;
        self.move_prev(map)?;
        Ok(old)
    }
}

impl ConstCursor {
    pub(crate) fn new(owner: u64, node: usize) -> ConstCursor {
        ConstCursor(Handle { owner, node })
    }

    pub fn is_bound(&self) -> bool {
        self.0.owner != 0
    }

    pub fn get<'a, K, V, C>(&self, map: &'a RbMap<K, V, C>) -> Result<(&'a K, &'a V), Error<K>> {
        map.handle_entry(&self.0)
    }

    pub fn move_next<K, V, C>(&mut self, map: &RbMap<K, V, C>) -> Result<(), Error<K>> {
        self.0 = map.handle_next(&self.0)?;
        Ok(())
    }

    pub fn move_prev<K, V, C>(&mut self, map: &RbMap<K, V, C>) -> Result<(), Error<K>> {
        self.0 = map.handle_prev(&self.0)?;
        Ok(())
    }

    pub fn post_next<K, V, C>(&mut self, map: &RbMap<K, V, C>) -> Result<ConstCursor, Error<K>> {
        let old = *self;
        self.move_next(map)?;
        Ok(old)
    }

    pub fn post_prev<K, V, C>(&mut self, map: &RbMap<K, V, C>) -> Result<ConstCursor, Error<K>> {
        let old = *self;
        self.move_prev(map)?;
        Ok(old)
    }
}

impl From<Cursor> for ConstCursor {
    fn from(cursor: Cursor) -> ConstCursor {
        ConstCursor(cursor.0)
    }
}

impl PartialEq<ConstCursor> for Cursor {
    fn eq(&self, other: &ConstCursor) -> bool {
        self.0 == other.0
    }
}

impl PartialEq<Cursor> for ConstCursor {
    fn eq(&self, other: &Cursor) -> bool {
        self.0 == other.0
    }
}
