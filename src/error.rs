// (c) Copyright 2025 Helsing GmbH. All rights reserved.
use crate::key::Side;
use std::{convert::Infallible, error, fmt};

/// Error returned by the fallible diff and sync entry points.
///
/// `E` is the caller's own error type, as produced by a key extractor or a
/// [`Handler`](crate::Handler). It is passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncError<E> {
    /// Two records in the same collection produced the same key while
    /// [`KeyPolicy::Unique`](crate::KeyPolicy::Unique) was in effect.
    DuplicateKey {
        /// The collection holding the repeated key.
        side: Side,
        /// Zero-based position of the second occurrence.
        index: usize,
    },

    /// A key extractor or a handler failed.
    Caller(E),
}

impl<E> SyncError<E> {
    /// Maps the caller error to a different type.
    pub fn map_caller<Other>(self, f: impl FnOnce(E) -> Other) -> SyncError<Other> {
        match self {
            SyncError::DuplicateKey { side, index } => SyncError::DuplicateKey { side, index },
            SyncError::Caller(e) => SyncError::Caller(f(e)),
        }
    }

    /// Returns the caller error, if that is what this is.
    pub fn into_caller(self) -> Option<E> {
        match self {
            SyncError::DuplicateKey { .. } => None,
            SyncError::Caller(e) => Some(e),
        }
    }
}

impl SyncError<Infallible> {
    /// Widens an error that cannot hold a caller error into one that can.
    pub fn widen<E>(self) -> SyncError<E> {
        self.map_caller(|never| match never {})
    }
}

impl<E: fmt::Display> fmt::Display for SyncError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncError::DuplicateKey { side, index } => {
                write!(f, "duplicate key in {side} collection at position {index}")
            }
            SyncError::Caller(e) => write!(f, "{e}"),
        }
    }
}

impl<E> error::Error for SyncError<E>
where
    E: error::Error + 'static,
{
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            SyncError::DuplicateKey { .. } => None,
            SyncError::Caller(e) => Some(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[derive(Debug, PartialEq)]
    struct Boom;

    impl fmt::Display for Boom {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("boom")
        }
    }

    impl error::Error for Boom {}

    #[test]
    fn display() {
        let dup = SyncError::<Boom>::DuplicateKey {
            side: Side::Target,
            index: 3,
        };
        assert_eq!(
            dup.to_string(),
            "duplicate key in target collection at position 3"
        );
        assert_eq!(SyncError::Caller(Boom).to_string(), "boom");
    }

    #[test]
    fn source_is_the_caller_error() {
        assert!(SyncError::Caller(Boom).source().is_some());
        let dup = SyncError::<Boom>::DuplicateKey {
            side: Side::Source,
            index: 1,
        };
        assert!(dup.source().is_none());
    }

    #[test]
    fn widen_keeps_duplicates() {
        let dup = SyncError::<Infallible>::DuplicateKey {
            side: Side::Source,
            index: 1,
        };
        assert_eq!(
            dup.widen::<Boom>(),
            SyncError::DuplicateKey {
                side: Side::Source,
                index: 1
            }
        );
    }

    #[test]
    fn into_caller() {
        assert_eq!(SyncError::Caller(Boom).into_caller(), Some(Boom));
        let dup = SyncError::<Boom>::DuplicateKey {
            side: Side::Source,
            index: 1,
        };
        assert_eq!(dup.into_caller(), None);
    }
}
