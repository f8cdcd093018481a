//! Parallel traversal and construction, behind the `rayon` feature.
//!
//! A map is read-only while any of these run, the borrow checker
//! sees to that, so no locking is involved.
use crate::{compare::Compare, map::FlatMap, search, storage::Storage};
use ::rayon::{prelude::*, slice};

impl<K, V, C, S> FlatMap<K, V, C, S>
where
    K: Sync,
    V: Sync,
    S: Storage<K, V>,
{
    /// iterate over the entries in parallel. The iterator is indexed,
    /// so `collect` into a `Vec` keeps key order.
    ///
    /// # Examples
    /// ```
    /// use rayon::prelude::*;
    /// use sorted_flat_map::map::FlatMap;
    ///
    /// let m: FlatMap<_, _> = (0..1000u64).map(|k| (k, k * 2)).collect();
    /// let total: u64 = m.par_iter().map(|(_, v)| *v).sum();
    /// assert_eq!(total, 999 * 1000);
    /// ```
    pub fn par_iter(&self) -> ::rayon::iter::Map<slice::Iter<'_, (K, V)>, fn(&(K, V)) -> (&K, &V)> {
        fn split<K, V>(e: &(K, V)) -> (&K, &V) {
            (&e.0, &e.1)
        }
        self.as_slice().par_iter().map(split as fn(&(K, V)) -> (&K, &V))
    }
}

impl<K, V, C> FlatMap<K, V, C>
where
    K: Send,
    V: Send,
    C: Compare<K> + Sync,
{
    /// Build a map from an unsorted vec using a parallel stable sort.
    /// Duplicate keys are collapsed, the first one wins, exactly as
    /// [`FlatMap::from_vec_with`] does.
    pub fn par_from_vec(mut elts: Vec<(K, V)>, cmp: C) -> Self {
        elts.par_sort_by(|(k0, _), (k1, _)| cmp.compare(k0, k1));
        let n = search::dedup_sorted(&mut elts, &cmp);
        elts.truncate(n);
        FlatMap::from_sorted(elts, cmp)
    }
}
