//! Byte transports an [`Archive`](super::Archive) can be bound to.

use bytes::{Bytes, BytesMut};
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom, Write};

/// A seekable byte channel.
///
/// Transports are deliberately minimal: position and bounds bookkeeping live
/// in the archive, the transport only moves bytes.
pub trait Transport: Send {
    /// Fill `buf` completely from the current position
    fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<()>;

    /// Write all of `buf` at the current position
    fn write_all(&mut self, buf: &[u8]) -> io::Result<()>;

    /// Move to an absolute position, returning the position actually reached
    fn seek_to(&mut self, pos: u64) -> io::Result<u64>;

    /// Total length of the underlying data
    fn total_len(&mut self) -> io::Result<u64>;
}

impl Transport for File {
    fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<()> {
        Read::read_exact(self, buf)
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        Write::write_all(self, buf)
    }

    fn seek_to(&mut self, pos: u64) -> io::Result<u64> {
        self.seek(SeekFrom::Start(pos))
    }

    fn total_len(&mut self) -> io::Result<u64> {
        Ok(self.metadata()?.len())
    }
}

/// In-memory transport over a growable byte buffer.
///
/// Seeking past the end clamps to the end, which the archive then reports as
/// a seek mismatch.
#[derive(Debug, Clone, Default)]
pub struct MemoryTransport {
    data: BytesMut,
    pos: usize,
}

impl MemoryTransport {
    /// Creates a transport holding a copy of `data`, positioned at the start
    pub fn new(data: impl AsRef<[u8]>) -> Self {
        Self {
            data: BytesMut::from(data.as_ref()),
            pos: 0,
        }
    }

    /// Creates an empty transport, typically used for storing
    pub fn empty() -> Self {
        Self::default()
    }

    /// Current position
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns the buffered bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the transport, returning its contents
    pub fn into_bytes(self) -> Bytes {
        self.data.freeze()
    }
}

impl Transport for MemoryTransport {
    fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<()> {
        let end = self.pos + buf.len();
        if end > self.data.len() {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "need {} bytes at {}, have {}",
                    buf.len(),
                    self.pos,
                    self.data.len() - self.pos
                ),
            ));
        }
        buf.copy_from_slice(&self.data[self.pos..end]);
        self.pos = end;
        Ok(())
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        let end = self.pos + buf.len();
        if end > self.data.len() {
            self.data.resize(end, 0);
        }
        self.data[self.pos..end].copy_from_slice(buf);
        self.pos = end;
        Ok(())
    }

    fn seek_to(&mut self, pos: u64) -> io::Result<u64> {
        let len = self.data.len();
        self.pos = usize::try_from(pos).map_or(len, |p| p.min(len));
        Ok(self.pos as u64)
    }

    fn total_len(&mut self) -> io::Result<u64> {
        Ok(self.data.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_read() {
        let mut transport = MemoryTransport::new([1u8, 2, 3, 4]);
        let mut buf = [0u8; 3];
        transport.read_exact(&mut buf).unwrap();
        assert_eq!(buf, [1, 2, 3]);
        assert_eq!(transport.position(), 3);

        let err = transport.read_exact(&mut buf).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
        assert_eq!(transport.position(), 3);
    }

    #[test]
    fn test_memory_write_extends_and_overwrites() {
        let mut transport = MemoryTransport::empty();
        transport.write_all(&[1, 2, 3]).unwrap();
        transport.seek_to(1).unwrap();
        transport.write_all(&[9, 9, 9]).unwrap();
        assert_eq!(transport.as_bytes(), &[1, 9, 9, 9]);
        assert_eq!(&transport.into_bytes()[..], &[1, 9, 9, 9]);
    }

    #[test]
    fn test_memory_seek_clamps() {
        let mut transport = MemoryTransport::new([0u8; 4]);
        assert_eq!(transport.seek_to(2).unwrap(), 2);
        assert_eq!(transport.seek_to(10).unwrap(), 4);
        assert_eq!(transport.total_len().unwrap(), 4);
    }

    #[test]
    fn test_file_transport() {
        let mut file = tempfile::tempfile().unwrap();
        Transport::write_all(&mut file, &[5, 6, 7]).unwrap();
        assert_eq!(file.total_len().unwrap(), 3);
        assert_eq!(file.seek_to(1).unwrap(), 1);
        let mut buf = [0u8; 2];
        Transport::read_exact(&mut file, &mut buf).unwrap();
        assert_eq!(buf, [6, 7]);
    }
}
