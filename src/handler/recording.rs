// (c) Copyright 2025 Helsing GmbH. All rights reserved.
//! This module contains an implementation of Handler that simply records
//! all calls in a human readable form. This is mostly useful for tests.

use super::Handler;
use std::{convert::Infallible, fmt::Debug};

/// A handler that records all calls.
#[derive(Debug, Default)]
pub struct RecordingHandler {
    /// A string-representation of each call that the handler has received, in
    /// the order they were received.
    pub calls: Vec<String>,
}

impl RecordingHandler {
    /// Create a new RecordingHandler
    pub fn new() -> RecordingHandler {
        RecordingHandler { calls: vec![] }
    }
}

impl<S: Debug, T: Debug> Handler<S, T> for RecordingHandler {
    type Error = Infallible;

    fn insert(&mut self, inserts: Vec<S>) -> Result<(), Self::Error> {
        self.calls.push(format!("insert {inserts:?}"));
        Ok(())
    }

    fn update(&mut self, updates: Vec<(S, T)>) -> Result<(), Self::Error> {
        self.calls.push(format!("update {updates:?}"));
        Ok(())
    }

    fn delete(&mut self, deletes: Vec<T>) -> Result<(), Self::Error> {
        self.calls.push(format!("delete {deletes:?}"));
        Ok(())
    }
}
