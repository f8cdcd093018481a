use crate::error::{Error, Result};
use arrayvec::ArrayVec;
use std::{mem, ops::Range, vec};

/// The resource policy of a map: where its entries live and how that
/// space grows.
///
/// A storage is a plain contiguous sequence of `(K, V)`. It knows
/// nothing about ordering, the map keeps the entries sorted and only
/// asks the storage to make room, splice and cut. Every structural
/// change is preceded by a successful `try_reserve`, so an exhausted
/// storage leaves the map exactly as it was.
pub trait Storage<K, V>: Default {
    type IntoIter: DoubleEndedIterator<Item = (K, V)> + ExactSizeIterator;

    fn as_slice(&self) -> &[(K, V)];

    fn as_mut_slice(&mut self) -> &mut [(K, V)];

    /// make sure `additional` more entries fit without failing. This
    /// is the only fallible operation, and the only place storage may
    /// move.
    fn try_reserve(&mut self, additional: usize) -> Result<()>;

    /// insert at `index`, shifting everything after it up by one. The
    /// caller has reserved room.
    fn insert(&mut self, index: usize, entry: (K, V));

    fn remove(&mut self, index: usize) -> (K, V);

    fn remove_range(&mut self, range: Range<usize>);

    fn truncate(&mut self, len: usize);

    fn clear(&mut self) {
        self.truncate(0)
    }

    fn retain<F: FnMut(&mut (K, V)) -> bool>(&mut self, f: F);

    fn capacity(&self) -> usize;

    /// the largest number of entries this kind of storage could ever
    /// hold
    fn max_len(&self) -> usize;

    fn into_entries(self) -> Self::IntoIter;

    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn push(&mut self, entry: (K, V)) {
        let len = self.len();
        self.insert(len, entry)
    }
}

/// heap storage, the default.
impl<K, V> Storage<K, V> for Vec<(K, V)> {
    type IntoIter = vec::IntoIter<(K, V)>;

    fn as_slice(&self) -> &[(K, V)] {
        self
    }

    fn as_mut_slice(&mut self) -> &mut [(K, V)] {
        self
    }

    fn try_reserve(&mut self, additional: usize) -> Result<()> {
        Vec::try_reserve(self, additional).map_err(|_| Error::exhausted(additional, 0))
    }

    fn insert(&mut self, index: usize, entry: (K, V)) {
        Vec::insert(self, index, entry)
    }

    fn remove(&mut self, index: usize) -> (K, V) {
        Vec::remove(self, index)
    }

    fn remove_range(&mut self, range: Range<usize>) {
        self.drain(range);
    }

    fn truncate(&mut self, len: usize) {
        Vec::truncate(self, len)
    }

    fn retain<F: FnMut(&mut (K, V)) -> bool>(&mut self, f: F) {
        self.retain_mut(f)
    }

    fn capacity(&self) -> usize {
        Vec::capacity(self)
    }

    fn max_len(&self) -> usize {
        match mem::size_of::<(K, V)>() {
            0 => usize::MAX,
            n => isize::MAX as usize / n,
        }
    }

    fn into_entries(self) -> Self::IntoIter {
        self.into_iter()
    }
}

/// inline storage with a hard capacity of `SIZE` entries. Nothing is
/// ever allocated, and growing past `SIZE` is reported as
/// [`Error::ResourceExhaustion`].
impl<K, V, const SIZE: usize> Storage<K, V> for ArrayVec<(K, V), SIZE> {
    type IntoIter = arrayvec::IntoIter<(K, V), SIZE>;

    fn as_slice(&self) -> &[(K, V)] {
        ArrayVec::as_slice(self)
    }

    fn as_mut_slice(&mut self) -> &mut [(K, V)] {
        ArrayVec::as_mut_slice(self)
    }

    fn try_reserve(&mut self, additional: usize) -> Result<()> {
        let available = self.remaining_capacity();
        if additional <= available {
            Ok(())
        } else {
            Err(Error::exhausted(additional, available))
        }
    }

    fn insert(&mut self, index: usize, entry: (K, V)) {
        ArrayVec::insert(self, index, entry)
    }

    fn remove(&mut self, index: usize) -> (K, V) {
        ArrayVec::remove(self, index)
    }

    fn remove_range(&mut self, range: Range<usize>) {
        self.drain(range);
    }

    fn truncate(&mut self, len: usize) {
        ArrayVec::truncate(self, len)
    }

    fn retain<F: FnMut(&mut (K, V)) -> bool>(&mut self, f: F) {
        ArrayVec::retain(self, f)
    }

    fn capacity(&self) -> usize {
        SIZE
    }

    fn max_len(&self) -> usize {
        SIZE
    }

    fn into_entries(self) -> Self::IntoIter {
        self.into_iter()
    }
}
