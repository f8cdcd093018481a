use crate::{
    compare::Natural,
    map::{FlatMap, InlineMap},
};
use proptest::prelude::*;
use std::collections::BTreeMap;

#[derive(Clone, Debug)]
enum Op {
    Insert(u16, u64),
    Assign(u16, u64),
    Bump(u16),
    Hint(usize, u16, u64),
    Remove(u16),
    EraseRange(u16, u16),
    Get(u16),
    Clear,
}

// a narrow key space so that inserts collide and removes hit
fn key_strategy() -> impl Strategy<Value = u16> + Clone {
    0u16..512
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    let key = key_strategy();
    let op = prop_oneof![
        30 => (key.clone(), any::<u64>()).prop_map(|(k, v)| Op::Insert(k, v)),
        10 => (key.clone(), any::<u64>()).prop_map(|(k, v)| Op::Assign(k, v)),
        10 => key.clone().prop_map(Op::Bump),
        15 => (0usize..600, key.clone(), any::<u64>()).prop_map(|(h, k, v)| Op::Hint(h, k, v)),
        20 => key.clone().prop_map(Op::Remove),
        3 => (key.clone(), key.clone()).prop_map(|(a, b)| Op::EraseRange(a, b)),
        11 => key.clone().prop_map(Op::Get),
        1 => Just(Op::Clear),
    ];
    prop::collection::vec(op, 0..=1000)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence(ops in ops_strategy()) {
        let mut t: FlatMap<u16, u64> = FlatMap::new();
        let mut m: BTreeMap<u16, u64> = BTreeMap::new();

        for op in ops {
            match op {
                Op::Insert(k, v) => {
                    let (pos, inserted) = t.insert((k, v)).unwrap();
                    prop_assert_eq!(inserted, !m.contains_key(&k));
                    m.entry(k).or_insert(v);
                    prop_assert_eq!(t.entry_at(pos), Some((&k, &m[&k])));
                }
                Op::Assign(k, v) => {
                    let (_, prev) = t.insert_or_assign(k, v).unwrap();
                    prop_assert_eq!(prev, m.insert(k, v));
                }
                Op::Bump(k) => {
                    let v = t.get_or_insert_default(k).unwrap();
                    *v = v.wrapping_add(1);
                    let e = m.entry(k).or_default();
                    *e = e.wrapping_add(1);
                }
                Op::Hint(hint, k, v) => {
                    let pos = t.emplace_hint(hint, k, v).unwrap();
                    m.entry(k).or_insert(v);
                    prop_assert_eq!(t.entry_at(pos).map(|(k, _)| *k), Some(k));
                }
                Op::Remove(k) => {
                    prop_assert_eq!(t.remove(&k), m.remove(&k));
                }
                Op::EraseRange(a, b) => {
                    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
                    let r = t.lower_bound(&lo)..t.lower_bound(&hi);
                    prop_assert_eq!(t.erase_range(r.clone()), r.start);
                    m.retain(|k, _| *k < lo || *k >= hi);
                }
                Op::Get(k) => {
                    prop_assert_eq!(t.get(&k), m.get(&k));
                    prop_assert_eq!(t.count(&k), m.contains_key(&k) as usize);
                    prop_assert!(t.equal_range(&k).len() <= 1);
                }
                Op::Clear => {
                    t.clear();
                    m.clear();
                }
            }

            prop_assert_eq!(t.len(), m.len());
        }

        t.invariant();
        let got: Vec<(u16, u64)> = t.iter().map(|(k, v)| (*k, *v)).collect();
        let expected: Vec<(u16, u64)> = m.iter().map(|(k, v)| (*k, *v)).collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn prop_construction_keeps_first(elts in prop::collection::vec((key_strategy(), any::<u64>()), 0..=300)) {
        let mut m: BTreeMap<u16, u64> = BTreeMap::new();
        for (k, v) in &elts {
            m.entry(*k).or_insert(*v);
        }
        let t = FlatMap::from_vec(elts.clone());
        t.invariant();
        prop_assert!(t.iter().eq(m.iter()));

        let mut extended = FlatMap::new();
        extended.try_extend(elts.clone()).unwrap();
        prop_assert_eq!(&extended, &t);

        match InlineMap::<u16, u64, 64>::try_from_iter_with(elts, Natural) {
            Ok(inline) => {
                inline.invariant();
                prop_assert!(inline.iter().eq(m.iter()));
            }
            Err(_) => prop_assert!(m.len() > 64),
        }
    }

    #[test]
    fn prop_range(
        elts in prop::collection::vec((key_strategy(), any::<u64>()), 0..=300),
        a in key_strategy(),
        b in key_strategy(),
    ) {
        let t: FlatMap<u16, u64> = elts.iter().copied().collect();
        let mut m: BTreeMap<u16, u64> = BTreeMap::new();
        for (k, v) in elts {
            m.entry(k).or_insert(v);
        }
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(t.range(lo..hi).eq(m.range(lo..hi)));
        prop_assert!(t.range(lo..=hi).rev().eq(m.range(lo..=hi).rev()));
        prop_assert!(t.range(lo..).eq(m.range(lo..)));
    }
}

fn for_each_permutation<T: Clone>(items: &[T], mut f: impl FnMut(Vec<T>)) {
    fn rec<T: Clone>(items: &[T], used: &mut [bool], out: &mut Vec<T>, f: &mut impl FnMut(Vec<T>)) {
        if out.len() == items.len() {
            f(out.clone());
            return;
        }
        for i in 0..items.len() {
            if used[i] {
                continue;
            }
            used[i] = true;
            out.push(items[i].clone());
            rec(items, used, out, f);
            out.pop();
            used[i] = false;
        }
    }

    let mut used = vec![false; items.len()];
    let mut out = Vec::with_capacity(items.len());
    rec(items, &mut used, &mut out, &mut f);
}

#[test]
fn exhaustive_insert_order_small_set() {
    let elts: Vec<(&str, u64)> = vec![("a", 0), ("b", 1), ("c", 2), ("aa", 3), ("ab", 4), ("ba", 5)];
    let expected: FlatMap<&str, u64> = elts.iter().copied().collect();

    for_each_permutation(&elts, |perm| {
        let mut t = FlatMap::new();
        for e in perm {
            assert!(t.insert(e).unwrap().1);
        }
        t.invariant();
        assert_eq!(t, expected);
    });
}

#[test]
fn exhaustive_remove_order_small_set() {
    let keys = vec!["a", "b", "c", "aa", "ab", "ba"];
    let base: FlatMap<&str, usize> = keys.iter().map(|k| (*k, k.len())).collect();

    for_each_permutation(&keys, |perm| {
        let mut t = base.clone();
        let mut m: BTreeMap<&str, usize> = base.iter().map(|(k, v)| (*k, *v)).collect();
        for k in perm {
            assert_eq!(t.remove(k), m.remove(k));
            assert_eq!(t.len(), m.len());
            t.invariant();
        }
        assert!(t.is_empty());
    });
}
