use std::{
    error,
    fmt::{self, Display, Formatter},
};

/// Failures reported by [`FlatMap`](crate::map::FlatMap).
///
/// Lookups that can simply miss (`find`, `get`, `count`, the bounds)
/// never produce an error, they return a sentinel instead. Only the
/// checked accessors and operations that need to grow the storage do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// `at` or `at_mut` was called with a key that is not in the map.
    KeyNotFound,
    /// the storage could not make room for `requested` more entries.
    /// `available` is how many more it could still take, which is 0
    /// for a full fixed capacity storage, and unknown (also 0) when
    /// the allocator refused.
    ResourceExhaustion { requested: usize, available: usize },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Display for Error {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Error::KeyNotFound => write!(f, "key not found"),
            Error::ResourceExhaustion {
                requested,
                available,
            } => write!(
                f,
                "storage exhausted, requested room for {} entries, {} available",
                requested, available
            ),
        }
    }
}

impl error::Error for Error {}

impl Error {
    pub(crate) fn exhausted(requested: usize, available: usize) -> Self {
        Error::ResourceExhaustion {
            requested,
            available,
        }
    }
}
