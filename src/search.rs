use crate::compare::Compare;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Loc {
    Here(usize),
    NotPresent(usize),
}

/*
elts is sorted and unique under cmp. Keys are very often added in
ascending order, so both ends are checked before falling back to a
binary search, which makes appending and prepending O(1) to locate.
 */
pub(crate) fn locate<K, V, Q, C>(elts: &[(K, V)], cmp: &C, k: &Q) -> Loc
where
    Q: ?Sized,
    C: Compare<K, Q>,
{
    let len = elts.len();
    if len == 0 {
        return Loc::NotPresent(0);
    }
    let first = cmp.compare(&elts[0].0, k);
    let last = cmp.compare(&elts[len - 1].0, k);
    match (first, last) {
        (Ordering::Equal, _) => Loc::Here(0),
        (_, Ordering::Equal) => Loc::Here(len - 1),
        (Ordering::Greater, _) => Loc::NotPresent(0),
        (_, Ordering::Less) => Loc::NotPresent(len),
        (Ordering::Less, Ordering::Greater) => {
            match elts.binary_search_by(|(ek, _)| cmp.compare(ek, k)) {
                Ok(i) => Loc::Here(i),
                Err(i) => Loc::NotPresent(i),
            }
        }
    }
}

pub(crate) fn lower_bound<K, V, Q, C>(elts: &[(K, V)], cmp: &C, k: &Q) -> usize
where
    Q: ?Sized,
    C: Compare<K, Q>,
{
    elts.partition_point(|(ek, _)| cmp.compare(ek, k) == Ordering::Less)
}

pub(crate) fn upper_bound<K, V, Q, C>(elts: &[(K, V)], cmp: &C, k: &Q) -> usize
where
    Q: ?Sized,
    C: Compare<K, Q>,
{
    elts.partition_point(|(ek, _)| cmp.compare(ek, k) != Ordering::Greater)
}

/// check a caller supplied position for `k`. `Some(loc)` if the hint
/// is right, either because `k` belongs exactly there or because the
/// key is already stored at or just before it. `None` if the hint
/// can't be trusted and a full search is needed.
pub(crate) fn check_hint<K, V, C>(elts: &[(K, V)], cmp: &C, hint: usize, k: &K) -> Option<Loc>
where
    C: Compare<K>,
{
    if hint > elts.len() {
        return None;
    }
    if hint > 0 {
        match cmp.compare(&elts[hint - 1].0, k) {
            Ordering::Less => (),
            Ordering::Equal => return Some(Loc::Here(hint - 1)),
            Ordering::Greater => return None,
        }
    }
    if hint < elts.len() {
        match cmp.compare(k, &elts[hint].0) {
            Ordering::Less => (),
            Ordering::Equal => return Some(Loc::Here(hint)),
            Ordering::Greater => return None,
        }
    }
    Some(Loc::NotPresent(hint))
}

/// stable sort by key then collapse runs of equal keys, keeping the
/// first of each run. Returns the number of surviving entries, which
/// are moved to the front; everything after that is garbage to be
/// truncated.
pub(crate) fn sort_dedup<K, V, C>(elts: &mut [(K, V)], cmp: &C) -> usize
where
    C: Compare<K>,
{
    elts.sort_by(|(k0, _), (k1, _)| cmp.compare(k0, k1));
    dedup_sorted(elts, cmp)
}

pub(crate) fn dedup_sorted<K, V, C>(elts: &mut [(K, V)], cmp: &C) -> usize
where
    C: Compare<K>,
{
    if elts.is_empty() {
        return 0;
    }
    let mut w = 1;
    for r in 1..elts.len() {
        if cmp.compare(&elts[w - 1].0, &elts[r].0) != Ordering::Equal {
            elts.swap(w, r);
            w += 1;
        }
    }
    w
}

/// sort and dedup `new`, then also drop every entry whose key is
/// already in `old`, which must be sorted and unique. Returns the
/// number of surviving entries of `new`, moved to its front. `old` is
/// not touched.
pub(crate) fn dedup_against<K, V, C>(old: &[(K, V)], new: &mut [(K, V)], cmp: &C) -> usize
where
    C: Compare<K>,
{
    let n = sort_dedup(new, cmp);
    let mut w = 0;
    for r in 0..n {
        if let Loc::NotPresent(_) = locate(old, cmp, &new[r].0) {
            new.swap(w, r);
            w += 1;
        }
    }
    w
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::Natural;

    fn elts(keys: &[i32]) -> Vec<(i32, ())> {
        keys.iter().map(|k| (*k, ())).collect()
    }

    #[test]
    fn locate_checks_the_ends_first() {
        let e = elts(&[1, 3, 5, 7]);
        assert_eq!(locate(&e, &Natural, &0), Loc::NotPresent(0));
        assert_eq!(locate(&e, &Natural, &1), Loc::Here(0));
        assert_eq!(locate(&e, &Natural, &4), Loc::NotPresent(2));
        assert_eq!(locate(&e, &Natural, &5), Loc::Here(2));
        assert_eq!(locate(&e, &Natural, &7), Loc::Here(3));
        assert_eq!(locate(&e, &Natural, &8), Loc::NotPresent(4));
        assert_eq!(locate(&elts(&[]), &Natural, &8), Loc::NotPresent(0));
    }

    #[test]
    fn bounds_partition() {
        let e = elts(&[1, 3, 5]);
        assert_eq!(lower_bound(&e, &Natural, &3), 1);
        assert_eq!(upper_bound(&e, &Natural, &3), 2);
        assert_eq!(lower_bound(&e, &Natural, &4), 2);
        assert_eq!(upper_bound(&e, &Natural, &4), 2);
        assert_eq!(lower_bound(&e, &Natural, &9), 3);
        assert_eq!(upper_bound(&e, &Natural, &0), 0);
    }

    #[test]
    fn hints() {
        let e = elts(&[10, 20, 30]);
        assert_eq!(check_hint(&e, &Natural, 1, &15), Some(Loc::NotPresent(1)));
        assert_eq!(check_hint(&e, &Natural, 3, &35), Some(Loc::NotPresent(3)));
        assert_eq!(check_hint(&e, &Natural, 0, &5), Some(Loc::NotPresent(0)));
        assert_eq!(check_hint(&e, &Natural, 2, &20), Some(Loc::Here(1)));
        assert_eq!(check_hint(&e, &Natural, 1, &20), Some(Loc::Here(1)));
        assert_eq!(check_hint(&e, &Natural, 0, &25), None);
        assert_eq!(check_hint(&e, &Natural, 3, &5), None);
        assert_eq!(check_hint(&e, &Natural, 9, &5), None);
    }

    #[test]
    fn dedup_keeps_first() {
        let mut e = vec![(3, 'a'), (1, 'b'), (3, 'c'), (2, 'd'), (1, 'e')];
        let n = sort_dedup(&mut e, &Natural);
        e.truncate(n);
        assert_eq!(e, vec![(1, 'b'), (2, 'd'), (3, 'a')]);
    }

    #[test]
    fn dedup_against_existing() {
        let old = vec![(1, 'x'), (4, 'y')];
        let mut new = vec![(4, 'a'), (2, 'b'), (1, 'c'), (2, 'd'), (3, 'e')];
        let n = dedup_against(&old, &mut new, &Natural);
        new.truncate(n);
        assert_eq!(new, vec![(2, 'b'), (3, 'e')]);
    }
}
