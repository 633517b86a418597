// (c) Copyright 2025 Helsing GmbH. All rights reserved.
//! Business keys.
//!
//! A business key is whatever identifies "the same logical record" across the
//! submitted and the stored representation of that record. It is usually a
//! composite of a few fields, and is best modelled as a small value type:
//!
//! ```rust
//! #[derive(Debug, Clone, PartialEq, Eq, Hash)]
//! struct UserRoleKey {
//!     user_id: u64,
//!     role_code: String,
//! }
//! ```
//!
//! Any `Eq + Hash` type works, including plain tuples. The two extraction
//! functions handed to [`Diff::compute`](crate::Diff::compute) must agree on
//! what the composite means; nothing checks that they do.
use std::fmt;

/// A record that knows its own business key.
///
/// Implementing this for both the source and the target type lets
/// [`Diff::compute_keyed`](crate::Diff::compute_keyed) do without explicit
/// extraction functions.
pub trait Keyed {
    /// The business key type. Must agree with the key of the other side.
    type Key;

    /// Extracts the business key of `self`.
    fn key(&self) -> Self::Key;
}

impl<T: Keyed> Keyed for &T {
    type Key = T::Key;

    fn key(&self) -> Self::Key {
        (**self).key()
    }
}

/// Which of the two input collections a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(::serde::Deserialize, ::serde::Serialize))]
pub enum Side {
    /// The freshly submitted collection.
    Source,
    /// The previously stored collection.
    Target,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Source => f.write_str("source"),
            Side::Target => f.write_str("target"),
        }
    }
}

/// What a repeated key inside a single collection means.
///
/// Keys are expected to be unique within each collection. When they are not:
///
/// - in the target collection, the later record overwrites the earlier one in
///   the index, and the earlier one ends up in no partition at all.
/// - in the source collection, the first record consumes the matching target
///   (if any) and every later record with the same key becomes an insert.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(::serde::Deserialize, ::serde::Serialize))]
pub enum KeyPolicy {
    /// Tolerate repeated keys with the behaviour described above.
    #[default]
    LastWins,
    /// Reject the input on the first repeated key.
    ///
    /// See [`SyncError::DuplicateKey`](crate::SyncError::DuplicateKey).
    Unique,
}
