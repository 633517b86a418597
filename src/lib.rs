// (c) Copyright 2025 Helsing GmbH. All rights reserved.
//! # keysync: keyed three-way diff of two collections
//!
//! This crate reconciles a freshly **submitted** collection of records with the
//! **stored** collection they are meant to replace. Records on both sides are
//! matched by a caller-defined *business key*, and the result is split into
//! three partitions:
//!
//! - **inserts**: submitted records with no stored counterpart,
//! - **updates**: submitted records paired with the stored record sharing their key,
//! - **deletes**: stored records with no submitted counterpart.
//!
//! The typical use is replacing a one-to-many or many-to-many association
//! (user roles, user tags, form rows) from a single full submission, without
//! resorting to "delete everything, insert everything".
//!
//! ## Sources, targets and keys
//!
//! The two sides may, and usually do, have different types: a request DTO on
//! one side and a database row with a surrogate id on the other. The crate
//! never looks inside either; it only sees them through two key extraction
//! functions, `&S -> K` and `&T -> K`, which must agree on what the key means.
//! `K` is any `Eq + Hash` type, most often a small derived struct or a tuple.
//! See the [`key`] module.
//!
//! Keys are expected to be unique within each collection. Repeated keys are
//! tolerated by default and rejected under [`KeyPolicy::Unique`]; the exact
//! behaviour is documented on [`KeyPolicy`].
//!
//! ## Getting Started
//!
//! ```rust
//! use keysync::sync;
//!
//! #[derive(Debug, PartialEq)]
//! struct UserRoleDto { user_id: u64, role_code: &'static str }
//!
//! #[derive(Debug, PartialEq)]
//! struct UserRole { id: u64, user_id: u64, role_code: &'static str }
//!
//! let submitted = vec![
//!     UserRoleDto { user_id: 1, role_code: "ADMIN" },
//!     UserRoleDto { user_id: 2, role_code: "USER" },
//! ];
//! let stored = vec![
//!     UserRole { id: 10, user_id: 1, role_code: "ADMIN" },
//!     UserRole { id: 11, user_id: 1, role_code: "USER" },
//! ];
//!
//! let mut inserted = Vec::new();
//! let mut updated = Vec::new();
//! let mut deleted = Vec::new();
//!
//! sync(
//!     || submitted,
//!     || stored,
//!     |dto: &UserRoleDto| (dto.user_id, dto.role_code),
//!     |row: &UserRole| (row.user_id, row.role_code),
//!     |inserts| inserted = inserts,
//!     |updates| updated = updates,
//!     |deletes| deleted = deletes,
//! );
//!
//! assert_eq!(inserted, vec![UserRoleDto { user_id: 2, role_code: "USER" }]);
//! assert_eq!(updated.len(), 1);
//! assert_eq!(deleted, vec![UserRole { id: 11, user_id: 1, role_code: "USER" }]);
//! ```
//!
//! ## Handlers
//!
//! The partitions are delivered to a [`Handler`]: `insert`, then `update`, then
//! `delete`, each only if its partition is non-empty. What a handler does with
//! them (writing to a database, queueing messages) is entirely up to it. This
//! crate performs no I/O, holds no state between calls, and does not catch or
//! retry anything: an error from a key extractor or a handler is returned to the
//! caller as soon as it happens. Transactions and rollback belong to the caller.
//!
//! There are three ways in, from shortest to most flexible:
//!
//! - [`sync`] and [`try_sync`]: one call, seven closures.
//! - [`Differ`]: a builder with optional providers and a [`KeyPolicy`].
//! - [`Diff::compute`] and [`Diff::apply`]: compute a plain value first,
//!   inspect or ship it, then apply it.
//!
//! ## Features
//!
//! - `serde`: Provides `serde` support for [`Diff`], [`Side`] and [`KeyPolicy`].
#[cfg(test)]
#[macro_use(quickcheck)]
extern crate quickcheck_macros;

use ahash::RandomState;
use std::{
    collections::{HashMap, HashSet},
    hash::Hash,
};

pub mod diff;
pub use diff::Diff;
pub mod differ;
pub use differ::Differ;
mod error;
pub use error::SyncError;
pub mod handler;
pub use handler::{Callbacks, Handler, NoopHandler};
pub mod key;
pub use key::{KeyPolicy, Keyed, Side};
#[cfg(test)]
mod test_util;

fn create_map_with_capacity<K, V>(capacity: usize) -> HashMap<K, V, RandomState> {
    HashMap::with_capacity_and_hasher(capacity, RandomState::new())
}

fn create_set_with_capacity<K>(capacity: usize) -> HashSet<K, RandomState> {
    HashSet::with_capacity_and_hasher(capacity, RandomState::new())
}

/// Diffs the submitted and the stored collection and hands the result to the
/// three closures.
///
/// - `sources` and `targets` produce the submitted and the stored records. A
///   side with nothing to offer returns an empty collection, for example
///   `std::iter::empty`.
/// - `source_key` and `target_key` extract the business key of a record.
/// - `on_insert`, `on_update` and `on_delete` are called in that order, each
///   at most once and never with an empty collection.
///
/// Repeated keys are handled as described for [`KeyPolicy::LastWins`].
pub fn sync<S, T, K, IS, IT>(
    sources: impl FnOnce() -> IS,
    targets: impl FnOnce() -> IT,
    source_key: impl FnMut(&S) -> K,
    target_key: impl FnMut(&T) -> K,
    on_insert: impl FnOnce(Vec<S>),
    on_update: impl FnOnce(Vec<(S, T)>),
    on_delete: impl FnOnce(Vec<T>),
) where
    IS: IntoIterator<Item = S>,
    IT: IntoIterator<Item = T>,
    K: Eq + Hash,
{
    let diff = Diff::compute(sources(), targets(), source_key, target_key);
    let Ok(()) = diff.apply(Callbacks::infallible(on_insert, on_update, on_delete));
}

/// Like [`sync`], but every closure may fail.
///
/// The first error, whether from a provider, a key extractor or a handler, is
/// returned immediately. Handlers that already ran are not undone, and the
/// remaining ones are not called.
pub fn try_sync<S, T, K, E, IS, IT>(
    sources: impl FnOnce() -> Result<IS, E>,
    targets: impl FnOnce() -> Result<IT, E>,
    source_key: impl FnMut(&S) -> Result<K, E>,
    target_key: impl FnMut(&T) -> Result<K, E>,
    on_insert: impl FnOnce(Vec<S>) -> Result<(), E>,
    on_update: impl FnOnce(Vec<(S, T)>) -> Result<(), E>,
    on_delete: impl FnOnce(Vec<T>) -> Result<(), E>,
) -> Result<(), E>
where
    IS: IntoIterator<Item = S>,
    IT: IntoIterator<Item = T>,
    K: Eq + Hash,
{
    let diff = Diff::try_compute(sources()?, targets()?, source_key, target_key)?;
    diff.apply(Callbacks::new(on_insert, on_update, on_delete))
}
