use crate::{compare::Compare, map::FlatMap, storage::Storage};
use serde::{
    de::{self, Deserialize, Deserializer, MapAccess, Visitor},
    ser::{Serialize, Serializer},
};
use std::{fmt, marker::PhantomData};

impl<K, V, C, S> Serialize for FlatMap<K, V, C, S>
where
    K: Serialize,
    V: Serialize,
    S: Storage<K, V>,
{
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        serializer.collect_map(self.iter())
    }
}

struct FlatMapVisitor<K, V, C, S>(PhantomData<fn() -> (K, V, C, S)>);

impl<'de, K, V, C, S> Visitor<'de> for FlatMapVisitor<K, V, C, S>
where
    K: Deserialize<'de>,
    V: Deserialize<'de>,
    C: Compare<K> + Default,
    S: Storage<K, V>,
{
    type Value = FlatMap<K, V, C, S>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "a map")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        // the input may be in any order, and may repeat keys
        let mut elts = Vec::with_capacity(access.size_hint().unwrap_or(0).min(4096));
        while let Some(e) = access.next_entry()? {
            elts.push(e)
        }
        FlatMap::try_from_iter_with(elts, C::default()).map_err(de::Error::custom)
    }
}

impl<'de, K, V, C, S> Deserialize<'de> for FlatMap<K, V, C, S>
where
    K: Deserialize<'de>,
    V: Deserialize<'de>,
    C: Compare<K> + Default,
    S: Storage<K, V>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(FlatMapVisitor(PhantomData))
    }
}
