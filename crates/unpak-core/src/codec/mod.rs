//! Value codecs layered on [`Archive::transfer`].
//!
//! A [`Codec`] serializes a value in place: a loading archive overwrites it,
//! a storing archive writes it out. Compound values are the ordered
//! concatenation of their members' codecs, with no padding and no length
//! prefix; version gates are explicit `if` checks on the archive version.
//!
//! Containers ([`TArray`], [`TLazyArray`], [`FString`]) are load-only and
//! fail with [`Error::LoadOnly`] on a storing archive.

mod array;
pub mod math;
mod reference;
mod string;

use crate::archive::Archive;
use crate::error::{Error, Result};

pub use array::{TArray, TLazyArray, LAZY_ARRAY_SKIP_VERSION};
pub use reference::{CompactIndex, NameRef, ObjectRef, ResolvedObject};
pub use string::{serialize_chars, FString};

/// A value with a fixed wire representation
pub trait Codec {
    /// Reads into or writes from `self`, depending on the archive mode
    fn serialize(&mut self, ar: &mut Archive) -> Result<()>;
}

impl Archive {
    /// Decodes a fresh value of type `T`
    pub fn load<T: Codec + Default>(&mut self) -> Result<T> {
        if !self.is_loading() {
            return Err(Error::LoadOnly {
                codec: std::any::type_name::<T>(),
            });
        }
        let mut value = T::default();
        value.serialize(self)?;
        Ok(value)
    }

    /// Serializes `value` in place and returns the archive for chaining
    pub fn stream<T: Codec>(&mut self, value: &mut T) -> Result<&mut Self> {
        value.serialize(self)?;
        Ok(self)
    }
}

macro_rules! impl_scalar_codec {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Codec for $ty {
                fn serialize(&mut self, ar: &mut Archive) -> Result<()> {
                    let mut bytes = self.to_le_bytes();
                    ar.transfer(&mut bytes)?;
                    if ar.is_loading() {
                        *self = <$ty>::from_le_bytes(bytes);
                    }
                    Ok(())
                }
            }
        )*
    };
}

impl_scalar_codec!(u8, i8, u16, i16, u32, i32, f32);


#[cfg(test)]
mod tests {
    use super::test_util::StreamWriter;
    use super::*;
    use crate::archive::{ArchiveConfig, MemoryTransport};

    #[test]
    fn test_scalars_little_endian() {
        let data = StreamWriter::new()
            .u8(0xFE)
            .bytes(&[0x34, 0x12])
            .i32(-2)
            .f32(1.5)
            .finish();
        let mut ar = Archive::from_bytes(data, ArchiveConfig::new());

        assert_eq!(ar.load::<u8>().unwrap(), 0xFE);
        assert_eq!(ar.load::<u16>().unwrap(), 0x1234);
        assert_eq!(ar.load::<i32>().unwrap(), -2);
        assert_eq!(ar.load::<f32>().unwrap(), 1.5);
        assert!(ar.is_at_end().unwrap());
    }

    #[test]
    fn test_store_then_load() {
        let mut ar = Archive::writer(MemoryTransport::empty(), ArchiveConfig::new());
        let (mut a, mut b, mut c) = (7u8, -300i16, 0xDEAD_BEEFu32);
        ar.stream(&mut a).unwrap().stream(&mut b).unwrap().stream(&mut c).unwrap();
        assert_eq!(ar.position(), 7);

        let mut transport = ar.into_transport();
        transport.seek_to(0).unwrap();
        let mut bytes = [0u8; 7];
        transport.read_exact(&mut bytes).unwrap();

        let mut ar = Archive::from_bytes(bytes, ArchiveConfig::new());
        assert_eq!(ar.load::<u8>().unwrap(), 7);
        assert_eq!(ar.load::<i16>().unwrap(), -300);
        assert_eq!(ar.load::<u32>().unwrap(), 0xDEAD_BEEF);
    }

    #[test]
    fn test_load_requires_loading_archive() {
        let mut ar = Archive::writer(MemoryTransport::empty(), ArchiveConfig::new());
        assert!(matches!(ar.load::<u8>(), Err(Error::LoadOnly { .. })));
    }
}
