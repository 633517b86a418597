// (c) Copyright 2025 Helsing GmbH. All rights reserved.
//! The three-way diff.
//!
//! [`Diff::compute`] walks the stored (target) collection once to index it by
//! business key, then walks the submitted (source) collection once, taking
//! each record's counterpart out of the index:
//!
//! - a source record whose key is in the index is paired with the removed
//!   target record, and becomes an **update**,
//! - a source record whose key is not in the index becomes an **insert**,
//! - whatever is left in the index once all sources have been seen becomes a
//!   **delete**.
//!
//! This is `O(n + m)` in time and `O(m)` in extra space, assuming keys hash in
//! constant time.
//!
//! Inserts and updates come out in source order, deletes in target order.
//!
//! ```rust
//! use keysync::Diff;
//!
//! // (user_id, role_id)
//! let submitted = vec![(1, 100), (2, 200)];
//! // (row_id, user_id, role_id)
//! let stored = vec![(10, 1, 100), (11, 1, 200)];
//!
//! let diff = Diff::compute(
//!     submitted,
//!     stored,
//!     |&(user, role): &(u32, u32)| (user, role),
//!     |&(_row, user, role): &(u32, u32, u32)| (user, role),
//! );
//!
//! assert_eq!(diff.inserts, vec![(2, 200)]);
//! assert_eq!(diff.updates, vec![((1, 100), (10, 1, 100))]);
//! assert_eq!(diff.deletes, vec![(11, 1, 200)]);
//! ```
use crate::{
    create_map_with_capacity, create_set_with_capacity,
    error::SyncError,
    handler::Handler,
    key::{KeyPolicy, Keyed, Side},
};
use std::{convert::Infallible, hash::Hash};
use tracing::{debug, trace, warn};

/// The insert, update and delete partitions of two keyed collections.
///
/// A `Diff` is a plain value: computing it has no side effects, and it can be
/// inspected, transformed or sent elsewhere before it is handed to a
/// [`Handler`] with [`Diff::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(::serde::Deserialize, ::serde::Serialize))]
#[must_use = "a diff does nothing unless it is applied"]
pub struct Diff<S, T> {
    /// Source records with no stored counterpart, in source order.
    pub inserts: Vec<S>,
    /// Source records and the stored record sharing their key, in source order.
    pub updates: Vec<(S, T)>,
    /// Stored records with no submitted counterpart, in target order.
    pub deletes: Vec<T>,
}

impl<S, T> Default for Diff<S, T> {
    fn default() -> Self {
        Self {
            inserts: Vec::new(),
            updates: Vec::new(),
            deletes: Vec::new(),
        }
    }
}

impl<S, T> Diff<S, T> {
    /// Computes the diff between `sources` and `targets`.
    ///
    /// Repeated keys are tolerated as described for [`KeyPolicy::LastWins`].
    pub fn compute<K, IS, IT>(
        sources: IS,
        targets: IT,
        mut source_key: impl FnMut(&S) -> K,
        mut target_key: impl FnMut(&T) -> K,
    ) -> Self
    where
        IS: IntoIterator<Item = S>,
        IT: IntoIterator<Item = T>,
        K: Eq + Hash,
    {
        let Ok(diff) = Self::partition(
            sources,
            targets,
            |s| Ok::<_, Infallible>(source_key(s)),
            |t| Ok(target_key(t)),
            None::<fn(Side, usize) -> Infallible>,
        );
        diff
    }

    /// Computes the diff between two collections of [`Keyed`] records.
    pub fn compute_keyed<K, IS, IT>(sources: IS, targets: IT) -> Self
    where
        IS: IntoIterator<Item = S>,
        IT: IntoIterator<Item = T>,
        S: Keyed<Key = K>,
        T: Keyed<Key = K>,
        K: Eq + Hash,
    {
        Self::compute(sources, targets, S::key, T::key)
    }

    /// Computes the diff with fallible key extraction.
    ///
    /// The first extraction error aborts the computation and is returned as is.
    pub fn try_compute<K, E, IS, IT>(
        sources: IS,
        targets: IT,
        source_key: impl FnMut(&S) -> Result<K, E>,
        target_key: impl FnMut(&T) -> Result<K, E>,
    ) -> Result<Self, E>
    where
        IS: IntoIterator<Item = S>,
        IT: IntoIterator<Item = T>,
        K: Eq + Hash,
    {
        Self::partition(
            sources,
            targets,
            source_key,
            target_key,
            None::<fn(Side, usize) -> E>,
        )
    }

    /// Computes the diff with fallible key extraction under the given [`KeyPolicy`].
    pub fn compute_with<K, E, IS, IT>(
        sources: IS,
        targets: IT,
        mut source_key: impl FnMut(&S) -> Result<K, E>,
        mut target_key: impl FnMut(&T) -> Result<K, E>,
        policy: KeyPolicy,
    ) -> Result<Self, SyncError<E>>
    where
        IS: IntoIterator<Item = S>,
        IT: IntoIterator<Item = T>,
        K: Eq + Hash,
    {
        let on_duplicate = match policy {
            KeyPolicy::LastWins => None,
            KeyPolicy::Unique => Some(|side: Side, index: usize| {
                SyncError::DuplicateKey { side, index }
            }),
        };
        Self::partition(
            sources,
            targets,
            |s| source_key(s).map_err(SyncError::Caller),
            |t| target_key(t).map_err(SyncError::Caller),
            on_duplicate,
        )
    }

    /// The single pass behind every `compute` flavour.
    ///
    /// `on_duplicate` is `None` for last-write-wins, in which case source keys
    /// are not tracked at all. Otherwise it builds the error to return for the
    /// first repeated key.
    fn partition<K, E, IS, IT, D>(
        sources: IS,
        targets: IT,
        mut source_key: impl FnMut(&S) -> Result<K, E>,
        mut target_key: impl FnMut(&T) -> Result<K, E>,
        on_duplicate: Option<D>,
    ) -> Result<Self, E>
    where
        IS: IntoIterator<Item = S>,
        IT: IntoIterator<Item = T>,
        K: Eq + Hash,
        D: Fn(Side, usize) -> E,
    {
        let targets = targets.into_iter();
        // slots keep target order for the deletes; the index points into them.
        let mut slots: Vec<Option<T>> = Vec::with_capacity(targets.size_hint().0);
        let mut index = create_map_with_capacity::<K, usize>(slots.capacity());
        for (position, target) in targets.enumerate() {
            let key = target_key(&target)?;
            if let Some(earlier) = index.insert(key, position) {
                if let Some(on_duplicate) = &on_duplicate {
                    return Err(on_duplicate(Side::Target, position));
                }
                warn!(
                    earlier,
                    position, "repeated key in target collection, dropping earlier record"
                );
                slots[earlier] = None;
            }
            slots.push(Some(target));
        }

        let sources = sources.into_iter();
        let mut seen = on_duplicate
            .as_ref()
            .map(|_| create_set_with_capacity::<K>(sources.size_hint().0));
        let mut inserts = Vec::new();
        let mut updates = Vec::new();
        for (position, source) in sources.enumerate() {
            let key = source_key(&source)?;
            match index.remove(&key).and_then(|slot| slots[slot].take()) {
                Some(target) => updates.push((source, target)),
                None => inserts.push(source),
            }
            if let (Some(seen), Some(on_duplicate)) = (&mut seen, &on_duplicate) {
                if !seen.insert(key) {
                    return Err(on_duplicate(Side::Source, position));
                }
            }
        }

        let deletes: Vec<T> = slots.into_iter().flatten().collect();
        debug!(
            inserts = inserts.len(),
            updates = updates.len(),
            deletes = deletes.len(),
            "computed diff"
        );
        Ok(Self {
            inserts,
            updates,
            deletes,
        })
    }

    /// Hands the partitions to `handler`.
    ///
    /// `insert`, `update` and `delete` are called in that order, each only if
    /// its partition is non-empty. The first error stops the remaining calls.
    pub fn apply<H>(self, mut handler: H) -> Result<(), H::Error>
    where
        H: Handler<S, T>,
    {
        let Self {
            inserts,
            updates,
            deletes,
        } = self;
        if !inserts.is_empty() {
            trace!(count = inserts.len(), "applying inserts");
            handler.insert(inserts)?;
        }
        if !updates.is_empty() {
            trace!(count = updates.len(), "applying updates");
            handler.update(updates)?;
        }
        if !deletes.is_empty() {
            trace!(count = deletes.len(), "applying deletes");
            handler.delete(deletes)?;
        }
        Ok(())
    }

    /// True if applying this diff would not call the handler at all.
    pub fn is_empty(&self) -> bool {
        self.inserts.is_empty() && self.updates.is_empty() && self.deletes.is_empty()
    }

    /// Total number of inserts, updates and deletes.
    pub fn len(&self) -> usize {
        self.inserts.len() + self.updates.len() + self.deletes.len()
    }

    /// Maps every source record, in both the inserts and the updates.
    pub fn map_sources<S2>(self, mut f: impl FnMut(S) -> S2) -> Diff<S2, T> {
        Diff {
            inserts: self.inserts.into_iter().map(&mut f).collect(),
            updates: self
                .updates
                .into_iter()
                .map(|(s, t)| (f(s), t))
                .collect(),
            deletes: self.deletes,
        }
    }

    /// Maps every target record, in both the updates and the deletes.
    pub fn map_targets<T2>(self, mut f: impl FnMut(T) -> T2) -> Diff<S, T2> {
        Diff {
            inserts: self.inserts,
            updates: self
                .updates
                .into_iter()
                .map(|(s, t)| (s, f(t)))
                .collect(),
            deletes: self.deletes.into_iter().map(&mut f).collect(),
        }
    }
}
