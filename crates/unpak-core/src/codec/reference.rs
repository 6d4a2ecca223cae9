//! Index-only references: compact integers, names and objects.
//!
//! Names and objects are persisted as a single compact index. Turning that
//! index into a string or a live object is the job of the package loader,
//! which calls [`NameRef::resolve`] / [`ObjectRef::resolve`] after decode.

use super::Codec;
use crate::archive::Archive;
use crate::error::Result;
use std::fmt;

/// A standalone compact index value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CompactIndex(pub i32);

impl Codec for CompactIndex {
    fn serialize(&mut self, ar: &mut Archive) -> Result<()> {
        ar.compact(&mut self.0)
    }
}

/// Reference into the package name table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameRef {
    /// Name table index
    pub index: i32,
    /// Resolved string, filled in by the name table owner
    pub name: Option<String>,
}

impl NameRef {
    /// Creates an unresolved name reference
    pub fn new(index: i32) -> Self {
        Self { index, name: None }
    }

    /// Attaches the resolved string
    pub fn resolve(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    /// Returns the resolved string, if any
    pub fn as_str(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl Codec for NameRef {
    fn serialize(&mut self, ar: &mut Archive) -> Result<()> {
        ar.compact(&mut self.index)?;
        if ar.is_loading() {
            self.name = None;
        }
        Ok(())
    }
}

impl fmt::Display for NameRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => f.write_str(name),
            None => write!(f, "#{}", self.index),
        }
    }
}

/// Class and path of an object a reference was resolved to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedObject {
    /// Class name without its category prefix
    pub class_name: String,
    /// Fully qualified object name
    pub full_name: String,
}

/// Reference to another object in the package (index 0 is null)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectRef {
    /// Object table index
    pub index: i32,
    /// Resolved target, filled in by the package loader
    pub target: Option<ResolvedObject>,
}

impl ObjectRef {
    /// Creates an unresolved object reference
    pub fn new(index: i32) -> Self {
        Self {
            index,
            target: None,
        }
    }

    /// The null reference
    pub fn null() -> Self {
        Self::default()
    }

    /// Returns true if this reference points at nothing
    pub fn is_null(&self) -> bool {
        self.index == 0
    }

    /// Attaches the resolved class and full name
    pub fn resolve(&mut self, class_name: impl Into<String>, full_name: impl Into<String>) {
        self.target = Some(ResolvedObject {
            class_name: class_name.into(),
            full_name: full_name.into(),
        });
    }
}

impl Codec for ObjectRef {
    fn serialize(&mut self, ar: &mut Archive) -> Result<()> {
        ar.compact(&mut self.index)?;
        if ar.is_loading() {
            self.target = None;
        }
        Ok(())
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.target {
            Some(target) => write!(f, "{}'{}'", target.class_name, target.full_name),
            None if self.is_null() => f.write_str("None"),
            None => write!(f, "#{}", self.index),
        }
    }
}
