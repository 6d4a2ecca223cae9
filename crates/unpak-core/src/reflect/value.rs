//! Tagged-variant values walked by the dump engine.

use crate::codec::{NameRef, ObjectRef};

/// A decoded property value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Unsigned byte; also the storage of enum properties
    Byte(u8),
    /// 32-bit signed integer
    Int(i32),
    /// Boolean
    Bool(bool),
    /// 32-bit float
    Float(f32),
    /// Name table reference
    Name(NameRef),
    /// Object reference
    Object(ObjectRef),
    /// Nested structure
    Struct(StructValue),
    /// Fixed or dynamic array
    Array(Vec<Value>),
}

impl Value {
    /// Short variant name used in diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Byte(_) => "byte",
            Self::Int(_) => "int",
            Self::Bool(_) => "bool",
            Self::Float(_) => "float",
            Self::Name(_) => "name",
            Self::Object(_) => "object",
            Self::Struct(_) => "struct",
            Self::Array(_) => "array",
        }
    }
}

impl From<u8> for Value {
    fn from(v: u8) -> Self {
        Self::Byte(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

impl From<NameRef> for Value {
    fn from(v: NameRef) -> Self {
        Self::Name(v)
    }
}

impl From<ObjectRef> for Value {
    fn from(v: ObjectRef) -> Self {
        Self::Object(v)
    }
}

impl From<StructValue> for Value {
    fn from(v: StructValue) -> Self {
        Self::Struct(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::Array(items.into_iter().map(Into::into).collect())
    }
}

/// Field values of one structure instance, including inherited fields
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructValue {
    /// Name of the most-derived type
    pub type_name: String,
    fields: Vec<(String, Value)>,
}

impl StructValue {
    /// Creates an empty value of type `type_name`
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: Vec::new(),
        }
    }

    /// Adds a field, builder style
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// Sets a field, replacing an existing one with the same name
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| n.eq_ignore_ascii_case(&name)) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Looks up a field case-insensitively
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    }

    /// Mutable field lookup, used to resolve references after decode
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.fields
            .iter_mut()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    }

    /// Fields in insertion order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if no field is set
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
