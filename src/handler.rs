// (c) Copyright 2025 Helsing GmbH. All rights reserved.
//! Receive the partitions of a diff.
//!
//! A [`Handler`] is where the actual side effects of a sync live: inserting
//! new rows, writing fields from a submitted record onto its stored
//! counterpart, deleting rows that are gone. This crate never looks at what a
//! handler does, it only promises how it is called:
//!
//! - each method is called at most once per applied diff,
//! - never with an empty collection,
//! - always in the order `insert`, `update`, `delete`,
//! - and the next method is only called once the previous one returned `Ok`.
//!
//! If `Error = Infallible`, a handler cannot stop a sync half way. Otherwise the
//! first error is handed back to the caller, and the remaining methods are not
//! called. Rolling back whatever the earlier methods did is up to the caller.
//!
//! For a testing-oriented handler, see the [`recording`] module.
use std::convert::Infallible;

pub mod recording;

/// Receives the insert, update and delete partitions of a [`Diff`](crate::Diff).
#[expect(unused_variables)]
pub trait Handler<S, T> {
    type Error;

    /// Source records that have no stored counterpart.
    fn insert(&mut self, inserts: Vec<S>) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Source records paired with the stored record that has the same key.
    fn update(&mut self, updates: Vec<(S, T)>) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Stored records that have no submitted counterpart.
    fn delete(&mut self, deletes: Vec<T>) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl<S, T, H> Handler<S, T> for &mut H
where
    H: Handler<S, T> + ?Sized,
{
    type Error = H::Error;

    fn insert(&mut self, inserts: Vec<S>) -> Result<(), Self::Error> {
        (**self).insert(inserts)
    }

    fn update(&mut self, updates: Vec<(S, T)>) -> Result<(), Self::Error> {
        (**self).update(updates)
    }

    fn delete(&mut self, deletes: Vec<T>) -> Result<(), Self::Error> {
        (**self).delete(deletes)
    }
}

/// A handler that ignores every partition.
///
/// Useful when only the [`Diff`](crate::Diff) itself is of interest.
pub struct NoopHandler;

impl<S, T> Handler<S, T> for NoopHandler {
    type Error = Infallible;
}

/// A handler made of three closures, one per partition.
///
/// Each closure returns `Result<(), E>`. Closures that cannot fail can be
/// wrapped with [`Callbacks::infallible`].
pub struct Callbacks<I, U, D> {
    on_insert: Option<I>,
    on_update: Option<U>,
    on_delete: Option<D>,
}

impl<I, U, D> Callbacks<I, U, D> {
    pub fn new(on_insert: I, on_update: U, on_delete: D) -> Self {
        Self {
            on_insert: Some(on_insert),
            on_update: Some(on_update),
            on_delete: Some(on_delete),
        }
    }
}

impl<I, U, D> Callbacks<Infallibly<I>, Infallibly<U>, Infallibly<D>> {
    /// Wraps closures that return `()`.
    pub fn infallible(on_insert: I, on_update: U, on_delete: D) -> Self {
        Self::new(
            Infallibly(on_insert),
            Infallibly(on_update),
            Infallibly(on_delete),
        )
    }
}

/// Adapts a closure returning `()` into one returning `Result<(), Infallible>`.
///
/// Only reachable through [`Callbacks::infallible`].
pub struct Infallibly<F>(F);

/// A closure that receives one partition. Implemented for
/// `FnOnce(P) -> Result<(), E>` and for [`Infallibly`] wrapped `FnOnce(P)`.
pub trait Callback<P> {
    type Error;

    fn call(self, partition: P) -> Result<(), Self::Error>;
}

impl<P, E, F> Callback<P> for F
where
    F: FnOnce(P) -> Result<(), E>,
{
    type Error = E;

    fn call(self, partition: P) -> Result<(), E> {
        self(partition)
    }
}

impl<P, F> Callback<P> for Infallibly<F>
where
    F: FnOnce(P),
{
    type Error = Infallible;

    fn call(self, partition: P) -> Result<(), Infallible> {
        (self.0)(partition);
        Ok(())
    }
}

impl<S, T, E, I, U, D> Handler<S, T> for Callbacks<I, U, D>
where
    I: Callback<Vec<S>, Error = E>,
    U: Callback<Vec<(S, T)>, Error = E>,
    D: Callback<Vec<T>, Error = E>,
{
    type Error = E;

    fn insert(&mut self, inserts: Vec<S>) -> Result<(), E> {
        match self.on_insert.take() {
            Some(f) => f.call(inserts),
            None => Ok(()),
        }
    }

    fn update(&mut self, updates: Vec<(S, T)>) -> Result<(), E> {
        match self.on_update.take() {
            Some(f) => f.call(updates),
            None => Ok(()),
        }
    }

    fn delete(&mut self, deletes: Vec<T>) -> Result<(), E> {
        match self.on_delete.take() {
            Some(f) => f.call(deletes),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callbacks_run_at_most_once() {
        let mut seen = Vec::new();
        let mut handler = Callbacks::new(
            |xs: Vec<u8>| -> Result<(), ()> {
                seen.extend(xs);
                Ok(())
            },
            |_: Vec<(u8, u8)>| Ok(()),
            |_: Vec<u8>| Ok(()),
        );
        Handler::<u8, u8>::insert(&mut handler, vec![1]).unwrap();
        Handler::<u8, u8>::insert(&mut handler, vec![2]).unwrap();
        drop(handler);
        assert_eq!(seen, vec![1]);
    }

    #[test]
    fn callbacks_propagate_errors() {
        let mut handler = Callbacks::new(
            |_: Vec<u8>| Ok(()),
            |_: Vec<(u8, u8)>| Err("update failed"),
            |_: Vec<u8>| Ok(()),
        );
        assert_eq!(Handler::<u8, u8>::insert(&mut handler, vec![1]), Ok(()));
        assert_eq!(
            Handler::<u8, u8>::update(&mut handler, vec![(1, 1)]),
            Err("update failed")
        );
    }

    #[test]
    fn infallible_callbacks() {
        let mut deleted = Vec::new();
        let mut handler = Callbacks::infallible(
            |_: Vec<u8>| {},
            |_: Vec<(u8, u16)>| {},
            |xs: Vec<u16>| deleted.extend(xs),
        );
        let Ok(()) = Handler::<u8, u16>::delete(&mut handler, vec![300, 301]);
        drop(handler);
        assert_eq!(deleted, vec![300, 301]);
    }

    #[test]
    fn noop_handler_accepts_everything() {
        let mut handler = NoopHandler;
        let Ok(()) = Handler::<u8, u8>::insert(&mut handler, vec![1]);
        let Ok(()) = Handler::<u8, u8>::update(&mut handler, vec![(1, 1)]);
        let Ok(()) = Handler::<u8, u8>::delete(&mut handler, vec![1]);
    }
}
