//! Key ordering used by [`RbMap`](crate::RbMap).

/// Strict weak ordering over keys. Two keys are equivalent when neither
/// compares less than the other.
pub trait Compare<K: ?Sized> {
    /// Return true if `a` is ordered before `b`.
    fn less(&self, a: &K, b: &K) -> bool;

    fn equivalent(&self, a: &K, b: &K) -> bool {
        !self.less(a, b) && !self.less(b, a)
    }
}

/// Ascending order of keys, as defined by their [`Ord`] implementation.
/// This is the default comparator.
#[derive(Clone, Copy, Debug, Default)]
pub struct Natural;

impl<K> Compare<K> for Natural
where
    K: Ord + ?Sized,
{
    #[inline]
    fn less(&self, a: &K, b: &K) -> bool {
        a < b
    }
}

/// Descending order of keys, reverse of their [`Ord`] implementation.
#[derive(Clone, Copy, Debug, Default)]
pub struct Descending;

impl<K> Compare<K> for Descending
where
    K: Ord + ?Sized,
{
    #[inline]
    fn less(&self, a: &K, b: &K) -> bool {
        b < a
    }
}
