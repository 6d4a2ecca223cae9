//! Growable arrays with self-describing element serialization.
//!
//! On the wire an array is a compact element count followed by that many
//! elements, each encoded by the element type's own [`Codec`]. A lazy array
//! is the same payload preceded (for format versions above
//! [`LAZY_ARRAY_SKIP_VERSION`]) by a 4-byte offset marking where a reader
//! could resume if it skipped the payload. The offset is read and discarded:
//! lazy arrays are always loaded eagerly.

use super::Codec;
use crate::archive::Archive;
use crate::error::{Error, Result};
use std::ops::{Deref, DerefMut, Index, IndexMut};
use tracing::trace;

/// Lazy arrays carry a skip offset when the format version exceeds this
pub const LAZY_ARRAY_SKIP_VERSION: i32 = 61;

/// Most elements reserved before any of them is decoded
const MAX_PREALLOC: usize = 4096;

/// Contiguous, exclusively owned buffer of `T`
#[derive(Debug, Clone, PartialEq)]
pub struct TArray<T> {
    items: Vec<T>,
}

impl<T> Default for TArray<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> TArray<T> {
    /// Creates an empty array without allocating
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live elements
    pub fn num(&self) -> usize {
        self.items.len()
    }

    /// Number of elements the buffer can hold without reallocating
    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    /// Appends `item`, returning its index
    pub fn add_item(&mut self, item: T) -> usize {
        self.items.push(item);
        self.items.len() - 1
    }

    /// Drops `count` elements starting at `index`, each exactly once
    ///
    /// # Panics
    ///
    /// Panics if the range is out of bounds.
    pub fn remove(&mut self, index: usize, count: usize) {
        assert!(
            index + count <= self.items.len(),
            "remove {}..{} out of bounds (len {})",
            index,
            index + count,
            self.items.len()
        );
        self.items.drain(index..index + count);
    }

    /// Drops every element and resizes the buffer to hold `capacity` elements
    pub fn empty(&mut self, capacity: usize) {
        self.items = Vec::with_capacity(capacity);
    }

    /// Returns the elements as a slice
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Consumes the array, returning its elements
    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<T: Default> TArray<T> {
    /// Appends `count` default elements, returning the index of the first
    pub fn add(&mut self, count: usize) -> usize {
        let index = self.items.len();
        self.insert(index, count);
        index
    }

    /// Inserts `count` default elements before `index`
    ///
    /// # Panics
    ///
    /// Panics if `index` is past the end.
    pub fn insert(&mut self, index: usize, count: usize) {
        assert!(
            index <= self.items.len(),
            "insert at {} out of bounds (len {})",
            index,
            self.items.len()
        );
        let tail = self.items.split_off(index);
        self.items.reserve(count + tail.len());
        self.items.extend(std::iter::repeat_with(T::default).take(count));
        self.items.extend(tail);
    }
}

impl<T: Codec + Default> TArray<T> {
    /// Decodes an array from a loading archive
    pub fn decode(ar: &mut Archive) -> Result<Self> {
        let mut array = Self::new();
        array.serialize(ar)?;
        Ok(array)
    }
}

impl<T: Codec + Default> Codec for TArray<T> {
    fn serialize(&mut self, ar: &mut Archive) -> Result<()> {
        if !ar.is_loading() {
            return Err(Error::LoadOnly { codec: "TArray" });
        }

        let offset = ar.position();
        let count = ar.read_compact()?;
        let count = usize::try_from(count).map_err(|_| Error::InvalidCount { count, offset })?;
        trace!("Array of {} elements at {}", count, offset);

        // The count comes off the wire; let a short stream fail before it can
        // drive a huge allocation.
        let mut items = Vec::with_capacity(count.min(MAX_PREALLOC));
        for _ in 0..count {
            let mut item = T::default();
            item.serialize(ar)?;
            items.push(item);
        }
        items.shrink_to_fit();
        self.items = items;
        Ok(())
    }
}

impl<T> Deref for TArray<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.items
    }
}

impl<T> DerefMut for TArray<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        &mut self.items
    }
}

impl<T> Index<usize> for TArray<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.items[index]
    }
}

impl<T> IndexMut<usize> for TArray<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.items[index]
    }
}

impl<T> From<Vec<T>> for TArray<T> {
    fn from(items: Vec<T>) -> Self {
        Self { items }
    }
}

impl<T> FromIterator<T> for TArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<'a, T> IntoIterator for &'a TArray<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Array whose payload may be preceded by a skip offset
#[derive(Debug, Clone, PartialEq)]
pub struct TLazyArray<T>(pub TArray<T>);

impl<T> Default for TLazyArray<T> {
    fn default() -> Self {
        Self(TArray::default())
    }
}

impl<T: Codec + Default> TLazyArray<T> {
    /// Decodes a lazy array from a loading archive
    pub fn decode(ar: &mut Archive) -> Result<Self> {
        let mut array = Self::default();
        array.serialize(ar)?;
        Ok(array)
    }
}

impl<T: Codec + Default> Codec for TLazyArray<T> {
    fn serialize(&mut self, ar: &mut Archive) -> Result<()> {
        if !ar.is_loading() {
            return Err(Error::LoadOnly { codec: "TLazyArray" });
        }
        if ar.format_version() > LAZY_ARRAY_SKIP_VERSION {
            let mut skip_pos = 0i32;
            skip_pos.serialize(ar)?;
            trace!("Ignoring lazy array skip offset {}", skip_pos);
        }
        self.0.serialize(ar)
    }
}

impl<T> Deref for TLazyArray<T> {
    type Target = TArray<T>;

    fn deref(&self) -> &TArray<T> {
        &self.0
    }
}

impl<T> DerefMut for TLazyArray<T> {
    fn deref_mut(&mut self) -> &mut TArray<T> {
        &mut self.0
    }
}
