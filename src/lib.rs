#![forbid(unsafe_code)]
//! An ordered map stored as one sorted array. See the map module for details.

pub(crate) mod search;
pub mod compare;
pub mod error;
pub mod iter;
pub mod map;
pub mod storage;

#[cfg(feature = "rayon")]
pub mod rayon;
#[cfg(feature = "serde")]
mod serde_impl;

pub use crate::{
    compare::{Compare, Descending, Natural},
    error::{Error, Result},
    map::{FlatMap, InlineMap},
    storage::Storage,
};

#[cfg(test)]
mod proptests;
