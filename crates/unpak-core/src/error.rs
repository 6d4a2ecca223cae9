//! Error types for the unpak-core library.
//!
//! Every failure in this crate is fatal to the operation that produced it:
//! decoding stops, no partial value is returned and nothing is retried.
//! Lookups that simply find nothing (unknown class, enum, property) are not
//! errors and are reported through `Option` or a sentinel instead.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for unpak operations
pub type Result<T> = std::result::Result<T, Error>;

/// Broad failure category of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The underlying file or buffer did not move the requested bytes
    Transport,
    /// A stopper or seek target was violated
    Bounds,
    /// An encode was attempted through a load-only codec
    LoadOnly,
    /// Reflection metadata is inconsistent with itself or with a value
    Metadata,
    /// The byte stream contains an impossible encoding
    Format,
}

/// Comprehensive error type for all unpak operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Failed to open an input file
    #[error("unable to open file '{path}': {source}")]
    FileOpen {
        /// Path to the file that failed to open
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The transport moved fewer bytes than requested
    #[error("unable to serialize {requested} bytes at offset {offset}: {source}")]
    Transport {
        /// Archive position where the transfer started
        offset: u64,
        /// Number of bytes requested
        requested: usize,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Generic I/O failure outside of a transfer (seek, length query)
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The text sink of a dump refused output
    #[error("unable to write dump output: {0}")]
    Fmt(#[from] std::fmt::Error),

    /// A transfer would move the position past the configured stopper
    #[error("serializing behind stopper: {position} + {requested} bytes exceeds {stopper}")]
    StopperOverrun {
        /// Position before the transfer
        position: u64,
        /// Number of bytes requested
        requested: usize,
        /// Configured stopper position
        stopper: u64,
    },

    /// A seek did not land on the requested offset
    #[error("seek to {requested} landed at {actual}")]
    SeekMismatch {
        /// Requested position
        requested: u64,
        /// Position reported by the transport
        actual: u64,
    },

    /// A load-only codec was driven by a storing archive
    #[error("{codec} can only be loaded; storing is not supported")]
    LoadOnly {
        /// Name of the codec that was misused
        codec: &'static str,
    },

    /// A compact index magnitude does not fit in 32 bits
    #[error("compact index at offset {offset} overflows a 32-bit integer")]
    CompactIndexOverflow {
        /// Offset of the first byte of the index
        offset: u64,
    },

    /// A compact index ran past the end of its input
    #[error("compact index truncated at offset {offset}")]
    CompactIndexTruncated {
        /// Offset where more input was needed
        offset: u64,
    },

    /// A decoded element count is negative
    #[error("invalid element count {count} at offset {offset}")]
    InvalidCount {
        /// The decoded count
        count: i32,
        /// Offset of the count field
        offset: u64,
    },

    /// A type tag names neither a primitive nor a registered structure
    #[error("unknown structure type '{type_name}' for property '{property}'")]
    UnknownType {
        /// The unresolved type tag
        type_name: String,
        /// Property that carries the tag
        property: String,
    },

    /// A registered class has no descriptor factory
    #[error("no type descriptor factory registered for class '{name}'")]
    MissingFactory {
        /// Registered class name
        name: String,
    },

    /// A value does not match the descriptor used to interpret it
    #[error("property '{property}' expected {expected}, found {found}")]
    ValueMismatch {
        /// Property being interpreted
        property: String,
        /// What the descriptor requires
        expected: String,
        /// What the value actually holds
        found: String,
    },
}

impl Error {
    /// Creates a new file open error
    pub fn file_open(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileOpen {
            path: path.into(),
            source,
        }
    }

    /// Creates a new transport error
    pub fn transport(offset: u64, requested: usize, source: std::io::Error) -> Self {
        Self::Transport {
            offset,
            requested,
            source,
        }
    }

    /// Creates a new unknown type error
    pub fn unknown_type(type_name: impl Into<String>, property: impl Into<String>) -> Self {
        Self::UnknownType {
            type_name: type_name.into(),
            property: property.into(),
        }
    }

    /// Creates a new missing factory error
    pub fn missing_factory(name: impl Into<String>) -> Self {
        Self::MissingFactory { name: name.into() }
    }

    /// Creates a new value mismatch error
    pub fn value_mismatch(
        property: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::ValueMismatch {
            property: property.into(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Returns the failure category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::FileOpen { .. } | Self::Transport { .. } | Self::Io(_) | Self::Fmt(_) => {
                ErrorKind::Transport
            }
            Self::StopperOverrun { .. } | Self::SeekMismatch { .. } => ErrorKind::Bounds,
            Self::LoadOnly { .. } => ErrorKind::LoadOnly,
            Self::UnknownType { .. } | Self::MissingFactory { .. } | Self::ValueMismatch { .. } => {
                ErrorKind::Metadata
            }
            Self::CompactIndexOverflow { .. }
            | Self::CompactIndexTruncated { .. }
            | Self::InvalidCount { .. } => ErrorKind::Format,
        }
    }

    /// Returns true if this error points at corrupt input rather than a
    /// programming or environment problem
    pub fn is_corruption(&self) -> bool {
        matches!(self.kind(), ErrorKind::Bounds | ErrorKind::Format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::StopperOverrun {
            position: 8,
            requested: 4,
            stopper: 10,
        };
        assert!(err.to_string().contains("behind stopper"));
        assert!(err.to_string().contains("10"));

        let err = Error::unknown_type("FMissing", "Bounds");
        assert!(err.to_string().contains("FMissing"));
        assert!(err.to_string().contains("Bounds"));
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(Error::missing_factory("UFoo").kind(), ErrorKind::Metadata);
        assert_eq!(Error::LoadOnly { codec: "TArray" }.kind(), ErrorKind::LoadOnly);
        assert_eq!(
            Error::SeekMismatch {
                requested: 4,
                actual: 2
            }
            .kind(),
            ErrorKind::Bounds
        );
    }

    #[test]
    fn test_is_corruption() {
        assert!(Error::CompactIndexOverflow { offset: 0 }.is_corruption());
        assert!(Error::InvalidCount { count: -1, offset: 0 }.is_corruption());
        assert!(!Error::missing_factory("UFoo").is_corruption());
    }
}
