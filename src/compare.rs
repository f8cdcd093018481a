//! Orderings over keys.
//!
//! A [`FlatMap`](crate::map::FlatMap) makes every ordering decision
//! through a value implementing [`Compare`]. The comparator is stored
//! in the map and fixed for its lifetime, so it may carry state.
//!
//! # Examples
//! ```
//! use std::cmp::Ordering;
//! use sorted_flat_map::compare::{Compare, Descending, Natural};
//!
//! assert_eq!(Natural.compare(&1, &2), Ordering::Less);
//! assert_eq!(Descending.compare(&1, &2), Ordering::Greater);
//!
//! let by_len = |a: &&str, b: &&str| a.len().cmp(&b.len());
//! assert_eq!(by_len.compare(&"aaa", &"b"), Ordering::Greater);
//! ```
use std::{borrow::Borrow, cmp::Ordering};

/// A total order between a stored key `L` and a probe `R`.
///
/// `R` defaults to `L`, which is the form used when entries are
/// placed. Lookups may use any `R` the comparator understands, for
/// example `str` for `String` keys under [`Natural`].
///
/// Implementations must be consistent: `compare(a, b)` is `Equal` iff
/// the keys are the same key as far as the map is concerned, and the
/// relation must be transitive. A comparator that breaks this gives
/// unspecified (but memory safe) results.
pub trait Compare<L: ?Sized, R: ?Sized = L> {
    fn compare(&self, l: &L, r: &R) -> Ordering;
}

/// The key type's own `Ord` ordering, ascending.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Natural;

impl<L, R> Compare<L, R> for Natural
where
    L: ?Sized + Borrow<R>,
    R: ?Sized + Ord,
{
    fn compare(&self, l: &L, r: &R) -> Ordering {
        l.borrow().cmp(r)
    }
}

/// The key type's `Ord` ordering, reversed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Descending;

impl<L, R> Compare<L, R> for Descending
where
    L: ?Sized + Borrow<R>,
    R: ?Sized + Ord,
{
    fn compare(&self, l: &L, r: &R) -> Ordering {
        r.cmp(l.borrow())
    }
}

impl<F, L, R> Compare<L, R> for F
where
    F: Fn(&L, &R) -> Ordering,
    L: ?Sized,
    R: ?Sized,
{
    fn compare(&self, l: &L, r: &R) -> Ordering {
        self(l, r)
    }
}
