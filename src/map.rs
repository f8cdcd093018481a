use crate::{
    compare::{Compare, Natural},
    error::{Error, Result},
    iter::{IntoIter, Iter, IterMut, Keys, Values, ValuesMut},
    search::{self, Loc},
    storage::Storage,
};
use arrayvec::ArrayVec;
use std::{
    cmp::{Eq, Ord, Ordering, PartialEq, PartialOrd},
    default::Default,
    fmt::{self, Debug, Formatter},
    hash::{Hash, Hasher},
    iter::FromIterator,
    marker::PhantomData,
    mem,
    ops::{Bound, Index, Range, RangeBounds},
};

/// An ordered map kept as one sorted, contiguous array of `(K, V)`
/// entries.
///
/// Lookups are binary searches, O(log(N)). Inserting and removing
/// shift the entries after the change point, O(N), which for small
/// and medium sized maps, and for maps that are built once and read
/// many times, beats a node based tree by a wide margin because every
/// search touches one compact block of memory.
///
/// The entries are always strictly increasing under the comparator
/// `C`: no two entries have equal keys. Every constructor sorts its
/// input and collapses duplicate keys, keeping the first occurrence.
///
/// Positions returned by the lookup methods (`find`, `lower_bound`,
/// ...) are indexes into the sorted sequence, `len()` being the end
/// position. Any operation that adds or removes entries shifts the
/// entries after it, so positions taken before such a call must be
/// looked up again afterwards. After a [`swap`](FlatMap::swap) a
/// position refers to whatever the map now holds, which is the other
/// map's old contents.
///
/// `S` is the resource policy, where the entries live. It defaults to
/// a `Vec`; [`InlineMap`] keeps them in a fixed size `ArrayVec` and
/// never allocates.
///
/// # Examples
/// ```
/// use sorted_flat_map::map::FlatMap;
///
/// let mut m = FlatMap::new();
/// assert_eq!(m.insert((3, "c")), Ok((0, true)));
/// assert_eq!(m.insert((1, "a")), Ok((0, true)));
/// assert_eq!(m.insert((2, "b")), Ok((1, true)));
/// assert_eq!(m.insert((2, "x")), Ok((1, false)));
///
/// assert_eq!(m.get(&2), Some(&"b"));
/// assert_eq!(m.find(&4), None);
///
/// let keys: Vec<i32> = m.keys().copied().collect();
/// assert_eq!(keys, vec![1, 2, 3]);
///
/// for (k, v) in m.iter().rev() {
///   println!("key {}, val: {}", k, v)
/// }
/// ```
pub struct FlatMap<K, V, C = Natural, S = Vec<(K, V)>> {
    elts: S,
    cmp: C,
    phantom: PhantomData<(K, V)>,
}

/// map stored inline, holding at most `SIZE` entries
pub type InlineMap<K, V, const SIZE: usize> = FlatMap<K, V, Natural, ArrayVec<(K, V), SIZE>>;

impl<K, V, C, S> Clone for FlatMap<K, V, C, S>
where
    C: Clone,
    S: Clone,
{
    fn clone(&self) -> Self {
        FlatMap {
            elts: self.elts.clone(),
            cmp: self.cmp.clone(),
            phantom: PhantomData,
        }
    }
}

impl<K, V, C, S> Default for FlatMap<K, V, C, S>
where
    C: Default,
    S: Storage<K, V>,
{
    fn default() -> Self {
        FlatMap::with_comparator(C::default())
    }
}

impl<K, V, C, S> PartialEq for FlatMap<K, V, C, S>
where
    K: PartialEq,
    V: PartialEq,
    S: Storage<K, V>,
{
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<K, V, C, S> Eq for FlatMap<K, V, C, S>
where
    K: Eq,
    V: Eq,
    S: Storage<K, V>,
{
}

impl<K, V, C, S> PartialOrd for FlatMap<K, V, C, S>
where
    K: PartialOrd,
    V: PartialOrd,
    S: Storage<K, V>,
{
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.as_slice().partial_cmp(other.as_slice())
    }
}

impl<K, V, C, S> Ord for FlatMap<K, V, C, S>
where
    K: Ord,
    V: Ord,
    S: Storage<K, V>,
{
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_slice().cmp(other.as_slice())
    }
}

impl<K, V, C, S> Hash for FlatMap<K, V, C, S>
where
    K: Hash,
    V: Hash,
    S: Storage<K, V>,
{
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state)
    }
}

impl<K, V, C, S> Debug for FlatMap<K, V, C, S>
where
    K: Debug,
    V: Debug,
    S: Storage<K, V>,
{
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, K, V, C, S, Q> Index<&'a Q> for FlatMap<K, V, C, S>
where
    Q: ?Sized,
    C: Compare<K, Q>,
    S: Storage<K, V>,
{
    type Output = V;
    fn index(&self, k: &Q) -> &V {
        self.get(k).expect("element not found for key")
    }
}

impl<K, V, C> FromIterator<(K, V)> for FlatMap<K, V, C>
where
    C: Compare<K> + Default,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        FlatMap::from_iter_with(iter, C::default())
    }
}

impl<K, V, C, const N: usize> From<[(K, V); N]> for FlatMap<K, V, C>
where
    C: Compare<K> + Default,
{
    fn from(elts: [(K, V); N]) -> Self {
        FlatMap::from_iter_with(elts, C::default())
    }
}

/// Keeps the value already in the map for duplicate keys, and for
/// duplicates within `iter` the first one.
impl<K, V, C> Extend<(K, V)> for FlatMap<K, V, C>
where
    C: Compare<K>,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        self.elts.extend(iter);
        self.compact();
    }
}

impl<K, V, C, S> IntoIterator for FlatMap<K, V, C, S>
where
    S: Storage<K, V>,
{
    type Item = (K, V);
    type IntoIter = IntoIter<S::IntoIter>;
    fn into_iter(self) -> Self::IntoIter {
        IntoIter(self.elts.into_entries())
    }
}

impl<'a, K, V, C, S> IntoIterator for &'a FlatMap<K, V, C, S>
where
    S: Storage<K, V>,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, C, S> IntoIterator for &'a mut FlatMap<K, V, C, S>
where
    S: Storage<K, V>,
{
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<K, V> FlatMap<K, V>
where
    K: Ord,
{
    /// Create a new empty map ordered by `K`'s `Ord`
    pub fn new() -> Self {
        FlatMap::with_comparator(Natural)
    }

    /// Create a new empty map with room for `n` entries before it
    /// needs to reallocate
    pub fn with_capacity(n: usize) -> Self {
        FlatMap::with_comparator_in(Natural, Vec::with_capacity(n))
    }

    /// Build a map from an unsorted vec, reusing its allocation.
    /// Duplicate keys are collapsed, the first one wins.
    ///
    /// # Examples
    /// ```
    /// use sorted_flat_map::map::FlatMap;
    ///
    /// let m = FlatMap::from_vec(vec![(3, 'a'), (1, 'b'), (3, 'c')]);
    /// assert_eq!(m.as_slice(), &[(1, 'b'), (3, 'a')]);
    /// ```
    pub fn from_vec(elts: Vec<(K, V)>) -> Self {
        FlatMap::from_vec_with(elts, Natural)
    }
}

impl<K, V, C> FlatMap<K, V, C>
where
    C: Compare<K>,
{
    /// Build a map ordered by `cmp` from any sequence of entries.
    /// Duplicate keys are collapsed, the first one wins.
    pub fn from_iter_with<I>(iter: I, cmp: C) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        FlatMap::from_vec_with(iter.into_iter().collect(), cmp)
    }

    pub fn from_vec_with(elts: Vec<(K, V)>, cmp: C) -> Self {
        let mut t = FlatMap::from_sorted(elts, cmp);
        t.compact();
        t
    }

    // no sorting happens here, elts must be sorted and unique under
    // cmp by the time anyone looks at the map
    pub(crate) fn from_sorted(elts: Vec<(K, V)>, cmp: C) -> Self {
        FlatMap {
            elts,
            cmp,
            phantom: PhantomData,
        }
    }

    pub fn shrink_to_fit(&mut self) {
        self.elts.shrink_to_fit()
    }
}

impl<K, V, C, S> FlatMap<K, V, C, S>
where
    S: Storage<K, V>,
{
    /// Create a new empty map ordered by `cmp`
    ///
    /// # Examples
    /// ```
    /// use sorted_flat_map::map::FlatMap;
    ///
    /// let mut m: FlatMap<i32, (), _> =
    ///     FlatMap::with_comparator(|a: &i32, b: &i32| b.cmp(a));
    /// for k in 0..4 {
    ///     m.insert((k, ())).unwrap();
    /// }
    /// assert_eq!(m.keys().copied().collect::<Vec<_>>(), vec![3, 2, 1, 0]);
    /// ```
    pub fn with_comparator(cmp: C) -> Self {
        FlatMap::with_comparator_in(cmp, S::default())
    }

    /// Create a new empty map ordered by `cmp` that keeps its
    /// entries in `storage`. Anything already in `storage` is
    /// dropped, its capacity is kept.
    pub fn with_comparator_in(cmp: C, mut storage: S) -> Self {
        storage.clear();
        FlatMap {
            elts: storage,
            cmp,
            phantom: PhantomData,
        }
    }

    /// get the number of entries in the map, O(1)
    pub fn len(&self) -> usize {
        self.elts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// how many entries fit before the storage must grow
    pub fn capacity(&self) -> usize {
        self.elts.capacity()
    }

    /// the most entries this map's storage could ever hold
    pub fn max_size(&self) -> usize {
        self.elts.max_len()
    }

    /// the ordering this map was built with
    pub fn comparator(&self) -> &C {
        &self.cmp
    }

    /// the entries in ascending key order
    pub fn as_slice(&self) -> &[(K, V)] {
        self.elts.as_slice()
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter(self.elts.as_slice().iter())
    }

    /// iterate in key order with mutable access to the values
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut(self.elts.as_mut_slice().iter_mut())
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys(self.elts.as_slice().iter())
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values(self.elts.as_slice().iter())
    }

    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut(self.elts.as_mut_slice().iter_mut())
    }

    /// the entry at position `pos`, `None` at or past the end
    pub fn entry_at(&self, pos: usize) -> Option<(&K, &V)> {
        self.elts.as_slice().get(pos).map(|(k, v)| (k, v))
    }

    pub fn entry_at_mut(&mut self, pos: usize) -> Option<(&K, &mut V)> {
        self.elts.as_mut_slice().get_mut(pos).map(|(k, v)| (&*k, v))
    }

    /// the entry with the smallest key
    pub fn first(&self) -> Option<(&K, &V)> {
        self.entry_at(0)
    }

    /// the entry with the largest key
    pub fn last(&self) -> Option<(&K, &V)> {
        self.len().checked_sub(1).and_then(|i| self.entry_at(i))
    }

    /// Position of the first entry whose key is not less than `k`,
    /// or `len()` if there is none. O(log(N)).
    pub fn lower_bound<Q>(&self, k: &Q) -> usize
    where
        Q: ?Sized,
        C: Compare<K, Q>,
    {
        search::lower_bound(self.elts.as_slice(), &self.cmp, k)
    }

    /// Position of the first entry whose key is greater than `k`, or
    /// `len()` if there is none. O(log(N)).
    pub fn upper_bound<Q>(&self, k: &Q) -> usize
    where
        Q: ?Sized,
        C: Compare<K, Q>,
    {
        search::upper_bound(self.elts.as_slice(), &self.cmp, k)
    }

    /// `lower_bound(k)..upper_bound(k)`. Keys are unique, so the range
    /// holds one position when `k` is present and none otherwise.
    ///
    /// # Examples
    /// ```
    /// use sorted_flat_map::map::FlatMap;
    ///
    /// let m: FlatMap<_, _> = [(1, 'a'), (3, 'b')].into();
    /// assert_eq!(m.equal_range(&3), 1..2);
    /// assert_eq!(m.equal_range(&2), 1..1);
    /// ```
    pub fn equal_range<Q>(&self, k: &Q) -> Range<usize>
    where
        Q: ?Sized,
        C: Compare<K, Q>,
    {
        let lb = self.lower_bound(k);
        let len = match self.elts.as_slice().get(lb) {
            Some((ek, _)) if self.cmp.compare(ek, k) == Ordering::Equal => 1,
            Some(_) | None => 0,
        };
        lb..lb + len
    }

    /// The position of the entry for `k`, `None` if it isn't present.
    /// O(log(N)).
    pub fn find<Q>(&self, k: &Q) -> Option<usize>
    where
        Q: ?Sized,
        C: Compare<K, Q>,
    {
        match search::locate(self.elts.as_slice(), &self.cmp, k) {
            Loc::Here(i) => Some(i),
            Loc::NotPresent(_) => None,
        }
    }

    /// 1 if `k` is present, 0 otherwise
    pub fn count<Q>(&self, k: &Q) -> usize
    where
        Q: ?Sized,
        C: Compare<K, Q>,
    {
        self.find(k).map_or(0, |_| 1)
    }

    pub fn contains_key<Q>(&self, k: &Q) -> bool
    where
        Q: ?Sized,
        C: Compare<K, Q>,
    {
        self.find(k).is_some()
    }

    /// lookup the mapping for k. If it doesn't exist return None.
    /// Runs in log(N) time and constant space.
    pub fn get<Q>(&self, k: &Q) -> Option<&V>
    where
        Q: ?Sized,
        C: Compare<K, Q>,
    {
        self.find(k).map(|i| &self.elts.as_slice()[i].1)
    }

    pub fn get_mut<Q>(&mut self, k: &Q) -> Option<&mut V>
    where
        Q: ?Sized,
        C: Compare<K, Q>,
    {
        match self.find(k) {
            None => None,
            Some(i) => Some(&mut self.elts.as_mut_slice()[i].1),
        }
    }

    /// lookup the mapping for k, returning both the stored key and
    /// the value
    pub fn get_key_value<Q>(&self, k: &Q) -> Option<(&K, &V)>
    where
        Q: ?Sized,
        C: Compare<K, Q>,
    {
        self.find(k).and_then(|i| self.entry_at(i))
    }

    /// Checked access, fails with [`Error::KeyNotFound`] when `k`
    /// isn't in the map.
    ///
    /// # Examples
    /// ```
    /// use sorted_flat_map::{error::Error, map::FlatMap};
    ///
    /// let m: FlatMap<_, _> = [("one", 1)].into();
    /// assert_eq!(m.at("one"), Ok(&1));
    /// assert_eq!(m.at("two"), Err(Error::KeyNotFound));
    /// ```
    pub fn at<Q>(&self, k: &Q) -> Result<&V>
    where
        Q: ?Sized,
        C: Compare<K, Q>,
    {
        self.get(k).ok_or(Error::KeyNotFound)
    }

    pub fn at_mut<Q>(&mut self, k: &Q) -> Result<&mut V>
    where
        Q: ?Sized,
        C: Compare<K, Q>,
    {
        self.get_mut(k).ok_or(Error::KeyNotFound)
    }

    /// return an iterator over the entries whose keys fall within
    /// `range`, in key order. Runs in O(log(N)) time to find the ends.
    ///
    /// if the lower end is above the upper end the iterator is empty
    ///
    /// # Examples
    /// ```
    /// use std::ops::Bound;
    /// use sorted_flat_map::map::FlatMap;
    ///
    /// let m: FlatMap<_, _> = (0..10).map(|k| (k, k * 10)).collect();
    /// let v: Vec<_> = m.range(3..6).map(|(k, _)| *k).collect();
    /// assert_eq!(v, vec![3, 4, 5]);
    ///
    /// let v: Vec<_> = m
    ///     .range((Bound::Excluded(7), Bound::Unbounded))
    ///     .map(|(_, v)| *v)
    ///     .collect();
    /// assert_eq!(v, vec![80, 90]);
    /// ```
    pub fn range<Q, R>(&self, range: R) -> Iter<'_, K, V>
    where
        Q: ?Sized,
        R: RangeBounds<Q>,
        C: Compare<K, Q>,
    {
        let start = match range.start_bound() {
            Bound::Included(q) => self.lower_bound(q),
            Bound::Excluded(q) => self.upper_bound(q),
            Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            Bound::Included(q) => self.upper_bound(q),
            Bound::Excluded(q) => self.lower_bound(q),
            Bound::Unbounded => self.len(),
        };
        let elts = self.elts.as_slice();
        if start >= end {
            Iter(elts[0..0].iter())
        } else {
            Iter(elts[start..end].iter())
        }
    }

    /// Remove the entry at position `pos`, returning the position of
    /// the entry that followed it, which is `pos` again since
    /// everything after it shifted down.
    ///
    /// # Panics
    /// if `pos >= len()`
    pub fn erase_at(&mut self, pos: usize) -> usize {
        self.elts.remove(pos);
        pos
    }

    /// Remove the entry at position `pos` and return it.
    ///
    /// # Panics
    /// if `pos >= len()`
    pub fn remove_at(&mut self, pos: usize) -> (K, V) {
        self.elts.remove(pos)
    }

    /// Remove the entries at positions `range`, returning the position
    /// of the entry that followed them (`range.start`).
    ///
    /// # Panics
    /// if the range is decreasing or ends past `len()`
    pub fn erase_range(&mut self, range: Range<usize>) -> usize {
        let start = range.start;
        self.elts.remove_range(range);
        start
    }

    /// Remove the entry for `k`, returning how many entries were
    /// removed (0 or 1).
    pub fn erase<Q>(&mut self, k: &Q) -> usize
    where
        Q: ?Sized,
        C: Compare<K, Q>,
    {
        self.remove_entry(k).map_or(0, |_| 1)
    }

    /// Remove the entry for `k`, returning its value if it was
    /// present.
    pub fn remove<Q>(&mut self, k: &Q) -> Option<V>
    where
        Q: ?Sized,
        C: Compare<K, Q>,
    {
        self.remove_entry(k).map(|(_, v)| v)
    }

    pub fn remove_entry<Q>(&mut self, k: &Q) -> Option<(K, V)>
    where
        Q: ?Sized,
        C: Compare<K, Q>,
    {
        self.find(k).map(|i| self.elts.remove(i))
    }

    pub fn pop_first(&mut self) -> Option<(K, V)> {
        if self.is_empty() {
            None
        } else {
            Some(self.elts.remove(0))
        }
    }

    pub fn pop_last(&mut self) -> Option<(K, V)> {
        let len = self.len();
        if len == 0 {
            None
        } else {
            Some(self.elts.remove(len - 1))
        }
    }

    /// keep only the entries for which `f` returns true, visiting them
    /// in key order
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        self.elts.retain(|e| f(&e.0, &mut e.1))
    }

    /// remove every entry, keeping the storage's capacity
    pub fn clear(&mut self) {
        self.elts.clear()
    }

    /// Exchange the contents and comparators of two maps in O(1),
    /// nothing is copied. Positions taken from either map before the
    /// swap describe the other map afterwards.
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other)
    }

    /// Move the contents out, leaving this map empty with the same
    /// ordering.
    pub fn take(&mut self) -> Self
    where
        C: Clone,
    {
        let empty = FlatMap::with_comparator(self.cmp.clone());
        mem::replace(self, empty)
    }

    /// make sure `additional` more entries fit without the storage
    /// having to grow
    pub fn reserve(&mut self, additional: usize) -> Result<()> {
        self.elts.try_reserve(additional)
    }
}

impl<K, V, C, S> FlatMap<K, V, C, S>
where
    C: Compare<K>,
    S: Storage<K, V>,
{
    /// Build a map ordered by `cmp` in any storage. Duplicate keys
    /// are collapsed, the first one wins. Fails with
    /// [`Error::ResourceExhaustion`] if the distinct entries don't
    /// fit.
    ///
    /// # Examples
    /// ```
    /// use sorted_flat_map::{compare::Natural, map::InlineMap};
    ///
    /// let m = InlineMap::<_, _, 4>::try_from_iter_with(
    ///     vec![(2, 'a'), (1, 'b'), (2, 'c'), (0, 'd'), (1, 'e')],
    ///     Natural,
    /// ).unwrap();
    /// assert_eq!(m.as_slice(), &[(0, 'd'), (1, 'b'), (2, 'a')]);
    ///
    /// assert!(InlineMap::<_, _, 2>::try_from_iter_with((0..3).map(|k| (k, k)), Natural).is_err());
    /// ```
    pub fn try_from_iter_with<I>(iter: I, cmp: C) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut t = Self::with_comparator(cmp);
        for e in iter {
            if t.elts.try_reserve(1).is_err() {
                // the duplicates may be what is in the way
                t.compact();
                if let Err(err) = t.elts.try_reserve(1) {
                    match search::locate(t.elts.as_slice(), &t.cmp, &e.0) {
                        Loc::Here(_) => continue,
                        Loc::NotPresent(_) => return Err(err),
                    }
                }
            }
            t.elts.push(e);
        }
        t.compact();
        Ok(t)
    }

    /// Insert `entry` at its sorted position. Returns its position and
    /// true, or, if an entry with an equal key is already present, the
    /// position of that entry and false, in which case the map is left
    /// unchanged and `entry` is dropped.
    ///
    /// Locating the position is O(log(N)), making room shifts the
    /// entries after it, O(N).
    pub fn insert(&mut self, entry: (K, V)) -> Result<(usize, bool)> {
        let loc = search::locate(self.elts.as_slice(), &self.cmp, &entry.0);
        self.place(loc, entry)
    }

    /// Build the entry from its parts, then insert it as `insert`
    /// does.
    pub fn emplace(&mut self, k: K, v: V) -> Result<(usize, bool)> {
        self.insert((k, v))
    }

    /// Like `emplace`, but first tries `hint` as the position. If
    /// `hint` is exactly where the key belongs, or the key is already
    /// stored right at or just before `hint`, no search is done.
    /// Otherwise the hint is ignored and the position is found by
    /// binary search, so a wrong hint costs time, never correctness.
    /// Returns the position of the new or existing entry.
    ///
    /// # Examples
    /// ```
    /// use sorted_flat_map::map::FlatMap;
    ///
    /// let mut m = FlatMap::new();
    /// let mut pos = 0;
    /// for k in 0..5 {
    ///     pos = m.emplace_hint(pos + 1, k, ()).unwrap();
    /// }
    /// // a useless hint still lands in the right place
    /// assert_eq!(m.emplace_hint(0, 10, ()), Ok(5));
    /// assert_eq!(m.keys().copied().collect::<Vec<_>>(), vec![0, 1, 2, 3, 4, 10]);
    /// ```
    pub fn emplace_hint(&mut self, hint: usize, k: K, v: V) -> Result<usize> {
        let elts = self.elts.as_slice();
        let loc = match search::check_hint(elts, &self.cmp, hint, &k) {
            Some(loc) => loc,
            None => search::locate(elts, &self.cmp, &k),
        };
        self.place(loc, (k, v)).map(|(i, _)| i)
    }

    /// Insert `(k, v)`, or if `k` is present replace its value (the
    /// stored key is kept). Returns the position and the old value.
    pub fn insert_or_assign(&mut self, k: K, v: V) -> Result<(usize, Option<V>)> {
        match search::locate(self.elts.as_slice(), &self.cmp, &k) {
            Loc::Here(i) => {
                let prev = mem::replace(&mut self.elts.as_mut_slice()[i].1, v);
                Ok((i, Some(prev)))
            }
            loc @ Loc::NotPresent(_) => self.place(loc, (k, v)).map(|(i, _)| (i, None)),
        }
    }

    /// Operator style access: the value for `k`, inserting
    /// `V::default()` first if `k` is absent. With heap storage this
    /// only fails if the allocator does.
    ///
    /// # Examples
    /// ```
    /// use sorted_flat_map::map::FlatMap;
    ///
    /// let mut m: FlatMap<&str, u32> = FlatMap::new();
    /// for w in "a b a c a".split(' ') {
    ///     *m.get_or_insert_default(w).unwrap() += 1;
    /// }
    /// assert_eq!(m.as_slice(), &[("a", 3), ("b", 1), ("c", 1)]);
    /// ```
    pub fn get_or_insert_default(&mut self, k: K) -> Result<&mut V>
    where
        V: Default,
    {
        self.get_or_insert_with(k, V::default)
    }

    /// the value for `k`, inserting `f()` first if `k` is absent. `f`
    /// is only called when needed.
    pub fn get_or_insert_with<F>(&mut self, k: K, f: F) -> Result<&mut V>
    where
        F: FnOnce() -> V,
    {
        let i = match search::locate(self.elts.as_slice(), &self.cmp, &k) {
            Loc::Here(i) => i,
            loc @ Loc::NotPresent(_) => self.place(loc, (k, f()))?.0,
        };
        Ok(&mut self.elts.as_mut_slice()[i].1)
    }

    /// Insert every entry of `iter`, keeping existing values for keys
    /// already present and the first of any duplicates within `iter`.
    /// Returns how many entries were added.
    ///
    /// The new entries are appended and the whole sequence is merged
    /// in one pass, which is much cheaper than inserting one by one.
    /// Only keys not already present need room. If they don't fit the
    /// map is left as it was.
    pub fn try_extend<I>(&mut self, iter: I) -> Result<usize>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let len = self.len();
        for e in iter {
            if self.elts.try_reserve(1).is_err() {
                // drop the new entries that repeat a key, the old
                // entries are left where they are
                let (old, new) = self.elts.as_mut_slice().split_at_mut(len);
                let n = search::dedup_against(old, new, &self.cmp);
                self.elts.truncate(len + n);
                if let Err(err) = self.elts.try_reserve(1) {
                    let (old, new) = self.elts.as_slice().split_at(len);
                    let present = |elts: &[(K, V)]| match search::locate(elts, &self.cmp, &e.0) {
                        Loc::Here(_) => true,
                        Loc::NotPresent(_) => false,
                    };
                    if present(old) || present(new) {
                        continue;
                    }
                    self.elts.truncate(len);
                    return Err(err);
                }
            }
            self.elts.push(e);
        }
        self.compact();
        Ok(self.len() - len)
    }

    fn place(&mut self, loc: Loc, entry: (K, V)) -> Result<(usize, bool)> {
        match loc {
            Loc::Here(i) => Ok((i, false)),
            Loc::NotPresent(i) => {
                self.elts.try_reserve(1)?;
                self.elts.insert(i, entry);
                Ok((i, true))
            }
        }
    }

    // restore sorted and unique after entries were appended
    fn compact(&mut self) {
        let n = search::sort_dedup(self.elts.as_mut_slice(), &self.cmp);
        self.elts.truncate(n)
    }
}

impl<K, V, C, S> FlatMap<K, V, C, S>
where
    K: Debug,
    C: Compare<K>,
    S: Storage<K, V>,
{
    #[allow(dead_code)]
    pub(crate) fn invariant(&self) {
        let elts = self.elts.as_slice();
        for (i, w) in elts.windows(2).enumerate() {
            match self.cmp.compare(&w[0].0, &w[1].0) {
                Ordering::Less => (),
                Ordering::Equal => panic!("duplicate key {:?} at {}", w[1].0, i + 1),
                Ordering::Greater => panic!(
                    "keys out of order at {}: {:?} > {:?}",
                    i, w[0].0, w[1].0
                ),
            }
        }
        if elts.len() > self.elts.max_len() {
            panic!("len is wrong {} > {}", elts.len(), self.elts.max_len())
        }
    }
}
