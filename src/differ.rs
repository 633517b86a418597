// (c) Copyright 2025 Helsing GmbH. All rights reserved.
//! A builder for a single sync.
//!
//! [`Differ`] is the long-hand version of [`sync`](crate::sync): collections
//! are supplied lazily through providers, either of which may be left out, and
//! the [`KeyPolicy`] can be chosen.
//!
//! ```rust
//! use keysync::{Differ, KeyPolicy, handler::recording::RecordingHandler};
//!
//! // (user_id, role_id) pairs
//! let stored = vec![(1, 7)];
//! let mut recorder = RecordingHandler::new();
//!
//! // nothing was submitted, so the stored association goes away
//! Differ::new(|s: &(u32, u32)| *s, |t: &(u32, u32)| *t)
//!     .target(|| stored)
//!     .policy(KeyPolicy::Unique)
//!     .run(&mut recorder)
//!     .unwrap();
//!
//! assert_eq!(recorder.calls, vec!["delete [(1, 7)]"]);
//! ```
use crate::{diff::Diff, error::SyncError, handler::Handler, key::KeyPolicy};
use std::{convert::Infallible, hash::Hash, iter};

type Provider<'a, X> = Box<dyn FnOnce() -> Box<dyn Iterator<Item = X> + 'a> + 'a>;

/// Computes and applies one diff. See the [module docs](self).
#[must_use = "a differ does nothing until `diff` or `run` is called"]
pub struct Differ<'a, S, T, FS, FT> {
    sources: Option<Provider<'a, S>>,
    targets: Option<Provider<'a, T>>,
    source_key: FS,
    target_key: FT,
    policy: KeyPolicy,
}

impl<'a, S, T, K, FS, FT> Differ<'a, S, T, FS, FT>
where
    FS: FnMut(&S) -> K,
    FT: FnMut(&T) -> K,
    K: Eq + Hash,
{
    /// Starts a sync with no providers, keyed by the given extractors.
    pub fn new(source_key: FS, target_key: FT) -> Self {
        Self {
            sources: None,
            targets: None,
            source_key,
            target_key,
            policy: KeyPolicy::default(),
        }
    }

    /// Sets the provider of submitted records.
    ///
    /// Without one, the submitted collection is empty.
    pub fn source<I>(mut self, provider: impl FnOnce() -> I + 'a) -> Self
    where
        I: IntoIterator<Item = S>,
        I::IntoIter: 'a,
    {
        self.sources = Some(Box::new(move || {
            Box::new(provider().into_iter()) as Box<dyn Iterator<Item = S> + 'a>
        }));
        self
    }

    /// Sets the provider of stored records.
    ///
    /// Without one, the stored collection is empty.
    pub fn target<I>(mut self, provider: impl FnOnce() -> I + 'a) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'a,
    {
        self.targets = Some(Box::new(move || {
            Box::new(provider().into_iter()) as Box<dyn Iterator<Item = T> + 'a>
        }));
        self
    }

    /// Sets what a repeated key within one collection means.
    pub fn policy(mut self, policy: KeyPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Runs the providers and computes the diff, without applying it.
    pub fn diff(self) -> Result<Diff<S, T>, SyncError<Infallible>>
    where
        S: 'a,
        T: 'a,
    {
        let Self {
            sources,
            targets,
            mut source_key,
            mut target_key,
            policy,
        } = self;
        Diff::compute_with(
            materialize(sources),
            materialize(targets),
            |s| Ok(source_key(s)),
            |t| Ok(target_key(t)),
            policy,
        )
    }

    /// Computes the diff and hands it to `handler`.
    pub fn run<H>(self, handler: H) -> Result<(), SyncError<H::Error>>
    where
        S: 'a,
        T: 'a,
        H: Handler<S, T>,
    {
        let diff = self.diff().map_err(SyncError::widen)?;
        diff.apply(handler).map_err(SyncError::Caller)
    }
}

fn materialize<'a, X: 'a>(
    provider: Option<Provider<'a, X>>,
) -> Box<dyn Iterator<Item = X> + 'a> {
    match provider {
        Some(provider) => provider(),
        None => Box::new(iter::empty()),
    }
}
