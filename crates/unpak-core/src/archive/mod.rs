//! Position-tracked, bounded byte stream.
//!
//! An [`Archive`] owns exactly one [`Transport`] and is the single place where
//! byte order and bounds policy live. Every codec in the crate is expressed in
//! terms of [`Archive::transfer`], which reads or writes depending on the
//! archive mode.
//!
//! ## Versions
//!
//! Two integers gate format differences: the package format version and the
//! licensee version. An archive created without explicit versions uses
//! [`DEFAULT_FORMAT_VERSION`], large enough that every version gate is open.
//!
//! ## Stopper
//!
//! A nonzero stopper is a hard limit on the position. A transfer that would
//! cross it is rejected before any byte moves.

pub mod compact;
mod transport;

use crate::error::{Error, Result};
use bytes::BytesMut;
use std::fmt;
use std::fs::File;
use std::path::Path;
use tracing::{debug, trace};

pub use transport::{MemoryTransport, Transport};

/// Format version assumed when none is configured
pub const DEFAULT_FORMAT_VERSION: i32 = 99_999;

/// Configuration for an archive
#[derive(Debug, Clone)]
pub struct ArchiveConfig {
    /// Package format version
    pub format_version: i32,
    /// Licensee (per-game) version
    pub licensee_version: i32,
    /// Stopper position (0 = disabled)
    pub stopper: u64,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            format_version: DEFAULT_FORMAT_VERSION,
            licensee_version: 0,
            stopper: 0,
        }
    }
}

impl ArchiveConfig {
    /// Creates a new archive config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the package format version
    pub fn format_version(mut self, version: i32) -> Self {
        self.format_version = version;
        self
    }

    /// Sets the licensee version
    pub fn licensee_version(mut self, version: i32) -> Self {
        self.licensee_version = version;
        self
    }

    /// Sets the stopper position (0 disables it)
    pub fn stopper(mut self, stopper: u64) -> Self {
        self.stopper = stopper;
        self
    }
}

/// A loading or storing byte stream bound to a transport
pub struct Archive {
    transport: Box<dyn Transport>,
    loading: bool,
    format_version: i32,
    licensee_version: i32,
    position: u64,
    stopper: u64,
}

impl fmt::Debug for Archive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Archive")
            .field("loading", &self.loading)
            .field("format_version", &self.format_version)
            .field("licensee_version", &self.licensee_version)
            .field("position", &self.position)
            .field("stopper", &self.stopper)
            .finish_non_exhaustive()
    }
}

impl Archive {
    fn with_transport(transport: Box<dyn Transport>, loading: bool, config: ArchiveConfig) -> Self {
        Self {
            transport,
            loading,
            format_version: config.format_version,
            licensee_version: config.licensee_version,
            position: 0,
            stopper: config.stopper,
        }
    }

    /// Creates a loading archive over `transport`
    pub fn reader(transport: impl Transport + 'static, config: ArchiveConfig) -> Self {
        Self::with_transport(Box::new(transport), true, config)
    }

    /// Creates a storing archive over `transport`
    pub fn writer(transport: impl Transport + 'static, config: ArchiveConfig) -> Self {
        Self::with_transport(Box::new(transport), false, config)
    }

    /// Creates a loading archive over a copy of `data`
    pub fn from_bytes(data: impl AsRef<[u8]>, config: ArchiveConfig) -> Self {
        Self::reader(MemoryTransport::new(data), config)
    }

    /// Opens a file for loading
    pub fn open(path: impl AsRef<Path>, config: ArchiveConfig) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::file_open(path, e))?;
        debug!(
            "Opened {} (version {}/{})",
            path.display(),
            config.format_version,
            config.licensee_version
        );
        Ok(Self::reader(file, config))
    }

    /// Returns true if this archive reads from its transport
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Package format version
    pub fn format_version(&self) -> i32 {
        self.format_version
    }

    /// Licensee version
    pub fn licensee_version(&self) -> i32 {
        self.licensee_version
    }

    /// Changes both versions, typically after a package header was read
    pub fn set_versions(&mut self, format_version: i32, licensee_version: i32) {
        self.format_version = format_version;
        self.licensee_version = licensee_version;
    }

    /// Current byte offset
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Configured stopper (0 = disabled)
    pub fn stopper(&self) -> u64 {
        self.stopper
    }

    /// Sets the stopper; 0 disables it
    pub fn set_stopper(&mut self, stopper: u64) {
        self.stopper = stopper;
    }

    /// Returns true if the position is exactly at the stopper
    pub fn is_stopper(&self) -> bool {
        self.stopper == self.position
    }

    /// Repositions the stream; the transport must land exactly on `pos`
    pub fn seek(&mut self, pos: u64) -> Result<()> {
        let actual = self.transport.seek_to(pos)?;
        self.position = actual;
        if actual != pos {
            return Err(Error::SeekMismatch {
                requested: pos,
                actual,
            });
        }
        Ok(())
    }

    /// Returns true if the position equals the transport length
    pub fn is_at_end(&mut self) -> Result<bool> {
        Ok(self.position == self.transport.total_len()?)
    }

    /// Moves `buf.len()` bytes between `buf` and the transport.
    ///
    /// Loading fills `buf`, storing writes it. Fails without touching either
    /// side if the transfer would cross a nonzero stopper.
    pub fn transfer(&mut self, buf: &mut [u8]) -> Result<()> {
        let end = self.position + buf.len() as u64;
        if self.stopper > 0 && end > self.stopper {
            return Err(Error::StopperOverrun {
                position: self.position,
                requested: buf.len(),
                stopper: self.stopper,
            });
        }

        let result = if self.loading {
            self.transport.read_exact(buf)
        } else {
            self.transport.write_all(buf)
        };
        result.map_err(|e| Error::transport(self.position, buf.len(), e))?;

        self.position = end;
        Ok(())
    }

    /// Reads or writes a compact index in place
    pub fn compact(&mut self, value: &mut i32) -> Result<()> {
        let offset = self.position;
        if self.loading {
            *value = compact::decode_with(offset, || {
                let mut byte = [0u8; 1];
                self.transfer(&mut byte)?;
                Ok(byte[0])
            })?;
            trace!("Compact index {} at {}", value, offset);
        } else {
            let mut buf = BytesMut::with_capacity(compact::MAX_COMPACT_LEN);
            compact::encode(*value, &mut buf);
            self.transfer(&mut buf)?;
        }
        Ok(())
    }

    /// Reads a compact index
    pub fn read_compact(&mut self) -> Result<i32> {
        let mut value = 0;
        self.compact(&mut value)?;
        Ok(value)
    }

    /// Consumes the archive, returning the transport
    pub fn into_transport(self) -> Box<dyn Transport> {
        self.transport
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archive_config_builder() {
        let config = ArchiveConfig::new()
            .format_version(61)
            .licensee_version(3)
            .stopper(128);

        assert_eq!(config.format_version, 61);
        assert_eq!(config.licensee_version, 3);
        assert_eq!(config.stopper, 128);
        assert_eq!(ArchiveConfig::default().format_version, DEFAULT_FORMAT_VERSION);
    }

    #[test]
    fn test_transfer_advances_position() {
        let mut ar = Archive::from_bytes([1u8, 2, 3, 4, 5], ArchiveConfig::new());
        let mut buf = [0u8; 2];
        ar.transfer(&mut buf).unwrap();
        assert_eq!(buf, [1, 2]);
        assert_eq!(ar.position(), 2);
        assert!(!ar.is_at_end().unwrap());

        let mut rest = [0u8; 3];
        ar.transfer(&mut rest).unwrap();
        assert_eq!(rest, [3, 4, 5]);
        assert!(ar.is_at_end().unwrap());
    }

    #[test]
    fn test_short_read_is_transport_error() {
        let mut ar = Archive::from_bytes([1u8, 2], ArchiveConfig::new());
        let mut buf = [0u8; 4];
        let err = ar.transfer(&mut buf).unwrap_err();
        assert!(matches!(err, Error::Transport { requested: 4, .. }));
    }

    #[test]
    fn test_stopper_rejects_before_mutation() {
        let mut ar = Archive::from_bytes([1u8, 2, 3, 4, 5, 6], ArchiveConfig::new().stopper(4));
        let mut buf = [0u8; 3];
        ar.transfer(&mut buf).unwrap();
        assert_eq!(ar.position(), 3);

        let mut guarded = [0xAAu8; 2];
        let err = ar.transfer(&mut guarded).unwrap_err();
        assert!(matches!(
            err,
            Error::StopperOverrun {
                position: 3,
                requested: 2,
                stopper: 4
            }
        ));
        assert_eq!(guarded, [0xAA, 0xAA]);
        assert_eq!(ar.position(), 3);

        let mut last = [0u8; 1];
        ar.transfer(&mut last).unwrap();
        assert_eq!(last, [4]);
        assert!(ar.is_stopper());
    }

    #[test]
    fn test_stopper_disabled_when_zero() {
        let mut ar = Archive::from_bytes([0u8; 8], ArchiveConfig::new());
        ar.set_stopper(0);
        let mut buf = [0u8; 8];
        ar.transfer(&mut buf).unwrap();
        assert_eq!(ar.position(), 8);
    }

    #[test]
    fn test_seek() {
        let mut ar = Archive::from_bytes([10u8, 20, 30, 40], ArchiveConfig::new());
        ar.seek(2).unwrap();
        let mut buf = [0u8; 1];
        ar.transfer(&mut buf).unwrap();
        assert_eq!(buf, [30]);
        assert_eq!(ar.position(), 3);

        let err = ar.seek(9).unwrap_err();
        assert!(matches!(
            err,
            Error::SeekMismatch {
                requested: 9,
                actual: 4
            }
        ));
    }

    #[test]
    fn test_compact_round_trip_through_archive() {
        let mut ar = Archive::writer(MemoryTransport::empty(), ArchiveConfig::new());
        for mut v in [0, -1, 64, -8192, i32::MAX, i32::MIN] {
            ar.compact(&mut v).unwrap();
        }
        let written = ar.position();
        assert_eq!(written, 1 + 1 + 2 + 3 + 5 + 5);

        let mut transport = ar.into_transport();
        let mut bytes = vec![0u8; written as usize];
        transport.seek_to(0).unwrap();
        transport.read_exact(&mut bytes).unwrap();

        let mut ar = Archive::from_bytes(bytes, ArchiveConfig::new());
        for expected in [0, -1, 64, -8192, i32::MAX, i32::MIN] {
            assert_eq!(ar.read_compact().unwrap(), expected);
        }
        assert!(ar.is_at_end().unwrap());
    }

    #[test]
    fn test_compact_respects_stopper() {
        let mut ar = Archive::from_bytes([0x40, 0x80, 0x01], ArchiveConfig::new().stopper(2));
        let err = ar.read_compact().unwrap_err();
        assert!(matches!(err, Error::StopperOverrun { .. }));
    }

    #[test]
    fn test_open_missing_file() {
        let err = Archive::open("/nonexistent/unpak/file.u", ArchiveConfig::new()).unwrap_err();
        assert!(matches!(err, Error::FileOpen { .. }));
    }
}
