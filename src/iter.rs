use std::{iter::FusedIterator, slice};

macro_rules! double_ended {
    ($name:ident, $item:ty, $map:expr) => {
        impl<'a, K, V> Iterator for $name<'a, K, V> {
            type Item = $item;
            fn next(&mut self) -> Option<Self::Item> {
                self.0.next().map($map)
            }

            fn size_hint(&self) -> (usize, Option<usize>) {
                self.0.size_hint()
            }

            fn nth(&mut self, n: usize) -> Option<Self::Item> {
                self.0.nth(n).map($map)
            }
        }

        impl<'a, K, V> DoubleEndedIterator for $name<'a, K, V> {
            fn next_back(&mut self) -> Option<Self::Item> {
                self.0.next_back().map($map)
            }
        }

        impl<'a, K, V> ExactSizeIterator for $name<'a, K, V> {}
        impl<'a, K, V> FusedIterator for $name<'a, K, V> {}
    };
}

/// Entries in ascending key order, `.rev()` for descending.
#[derive(Debug)]
pub struct Iter<'a, K, V>(pub(crate) slice::Iter<'a, (K, V)>);

impl<'a, K, V> Clone for Iter<'a, K, V> {
    fn clone(&self) -> Self {
        Iter(self.0.clone())
    }
}

impl<'a, K, V> Iter<'a, K, V> {
    /// the entries not yet visited, in order
    pub fn as_slice(&self) -> &'a [(K, V)] {
        self.0.as_slice()
    }
}

double_ended!(Iter, (&'a K, &'a V), |(k, v)| (k, v));

/// Entries in key order with mutable values. Keys are never handed
/// out mutably, changing one could break the ordering.
#[derive(Debug)]
pub struct IterMut<'a, K, V>(pub(crate) slice::IterMut<'a, (K, V)>);

double_ended!(IterMut, (&'a K, &'a mut V), |(k, v)| (&*k, v));

#[derive(Debug)]
pub struct Keys<'a, K, V>(pub(crate) slice::Iter<'a, (K, V)>);

impl<'a, K, V> Clone for Keys<'a, K, V> {
    fn clone(&self) -> Self {
        Keys(self.0.clone())
    }
}

double_ended!(Keys, &'a K, |(k, _)| k);

#[derive(Debug)]
pub struct Values<'a, K, V>(pub(crate) slice::Iter<'a, (K, V)>);

impl<'a, K, V> Clone for Values<'a, K, V> {
    fn clone(&self) -> Self {
        Values(self.0.clone())
    }
}

double_ended!(Values, &'a V, |(_, v)| v);

#[derive(Debug)]
pub struct ValuesMut<'a, K, V>(pub(crate) slice::IterMut<'a, (K, V)>);

double_ended!(ValuesMut, &'a mut V, |(_, v)| v);

/// Owning iterator over the entries of a map, in key order.
pub struct IntoIter<I>(pub(crate) I);

impl<I, K, V> Iterator for IntoIter<I>
where
    I: Iterator<Item = (K, V)>,
{
    type Item = (K, V);
    fn next(&mut self) -> Option<Self::Item> {
        self.0.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<I, K, V> DoubleEndedIterator for IntoIter<I>
where
    I: DoubleEndedIterator<Item = (K, V)>,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back()
    }
}

impl<I, K, V> ExactSizeIterator for IntoIter<I> where I: ExactSizeIterator<Item = (K, V)> {}
