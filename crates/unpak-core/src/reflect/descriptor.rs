//! Type and property descriptors.

use super::Value;
use crate::archive::Archive;
use crate::error::Result;
use std::fmt;
use std::sync::Arc;

/// Prefix marking an enum type tag: `#EBlendMode`
pub const ENUM_MARKER: char = '#';

/// Count of a property stored as a dynamic array
pub const DYNAMIC_ARRAY: i32 = -1;

/// Decoder producing a [`Value::Struct`] with a type's native codec
pub type NativeDecode = fn(&mut Archive) -> Result<Value>;

/// Interpretation of a property type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeTag<'a> {
    /// `byte`
    Byte,
    /// `int`
    Int,
    /// `bool`
    Bool,
    /// `float`
    Float,
    /// `UObject*`
    Object,
    /// `FName`
    Name,
    /// `#EnumName`, holding the enum name without the marker
    Enum(&'a str),
    /// Anything else; expected to name a registered structure
    Struct(&'a str),
}

impl<'a> TypeTag<'a> {
    /// Classifies a type tag
    pub fn parse(tag: &'a str) -> Self {
        match tag {
            "byte" => Self::Byte,
            "int" => Self::Int,
            "bool" => Self::Bool,
            "float" => Self::Float,
            "UObject*" => Self::Object,
            "FName" => Self::Name,
            _ => match tag.strip_prefix(ENUM_MARKER) {
                Some(name) => Self::Enum(name),
                None => Self::Struct(tag),
            },
        }
    }
}

/// Reflection metadata for one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDescriptor {
    /// Field name
    pub name: String,
    /// Type tag; `None` marks a layout placeholder that is never dumped
    pub type_name: Option<String>,
    /// Byte offset within the owning structure
    pub offset: usize,
    /// 1 = scalar, >1 = fixed inline array, -1 = dynamic array
    pub count: i32,
}

impl PropertyDescriptor {
    /// Creates a scalar property
    pub fn new(name: impl Into<String>, type_name: impl Into<String>, offset: usize) -> Self {
        Self {
            name: name.into(),
            type_name: Some(type_name.into()),
            offset,
            count: 1,
        }
    }

    /// Creates a placeholder property that only reserves layout
    pub fn placeholder(name: impl Into<String>, offset: usize) -> Self {
        Self {
            name: name.into(),
            type_name: None,
            offset,
            count: 1,
        }
    }

    /// Turns this property into a fixed inline array of `count` elements
    pub fn fixed_array(mut self, count: i32) -> Self {
        self.count = count;
        self
    }

    /// Turns this property into a dynamic array
    pub fn dynamic_array(mut self) -> Self {
        self.count = DYNAMIC_ARRAY;
        self
    }

    /// Returns true for fixed and dynamic arrays
    pub fn is_array(&self) -> bool {
        self.count > 1 || self.count == DYNAMIC_ARRAY
    }

    /// Returns true for dynamic arrays
    pub fn is_dynamic_array(&self) -> bool {
        self.count == DYNAMIC_ARRAY
    }

    /// Parsed type tag, or `None` for placeholders
    pub fn tag(&self) -> Option<TypeTag<'_>> {
        self.type_name.as_deref().map(TypeTag::parse)
    }
}

/// Reflection metadata for a structure or class
#[derive(Clone)]
pub struct TypeDescriptor {
    /// Registered name, including the one-character category prefix
    pub name: String,
    /// Base type, if any
    pub parent: Option<Arc<TypeDescriptor>>,
    /// In-memory size of one instance
    pub size_of: usize,
    /// True for heap-allocated reference types, false for embedded structures
    pub is_class: bool,
    /// Properties declared by this type only, in declaration order
    pub properties: Vec<PropertyDescriptor>,
    /// Handwritten codec used instead of property-by-property decoding
    pub native: Option<NativeDecode>,
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name)
            .field("parent", &self.parent.as_ref().map(|p| p.name.as_str()))
            .field("size_of", &self.size_of)
            .field("is_class", &self.is_class)
            .field("properties", &self.properties)
            .field("native", &self.native.is_some())
            .finish()
    }
}

impl TypeDescriptor {
    /// Starts building a descriptor named `name`
    pub fn builder(name: impl Into<String>) -> TypeDescriptorBuilder {
        TypeDescriptorBuilder {
            descriptor: TypeDescriptor {
                name: name.into(),
                parent: None,
                size_of: 0,
                is_class: false,
                properties: Vec::new(),
                native: None,
            },
        }
    }

    /// Name without the category prefix
    pub fn bare_name(&self) -> &str {
        strip_category(&self.name)
    }

    /// Iterates this type and its ancestors, most-derived first
    pub fn ancestors(&self) -> impl Iterator<Item = &TypeDescriptor> {
        std::iter::successors(Some(self), |t| t.parent.as_deref())
    }

    /// Returns true if this type or any ancestor has bare name `type_name`
    pub fn is_a(&self, type_name: &str) -> bool {
        self.ancestors().any(|t| t.bare_name() == type_name)
    }

    /// Finds a property on this type or its ancestors, case-insensitively.
    ///
    /// No remap patches are applied; see
    /// [`TypeRegistry::find_property`](super::TypeRegistry::find_property).
    pub fn find_declared_property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.ancestors()
            .flat_map(|t| t.properties.iter())
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }
}

/// Builder for [`TypeDescriptor`]
#[derive(Debug)]
pub struct TypeDescriptorBuilder {
    descriptor: TypeDescriptor,
}

impl TypeDescriptorBuilder {
    /// Sets the base type
    pub fn parent(mut self, parent: Arc<TypeDescriptor>) -> Self {
        self.descriptor.parent = Some(parent);
        self
    }

    /// Sets the in-memory size
    pub fn size_of(mut self, size: usize) -> Self {
        self.descriptor.size_of = size;
        self
    }

    /// Marks the descriptor as a class
    pub fn class(mut self) -> Self {
        self.descriptor.is_class = true;
        self
    }

    /// Appends a property
    pub fn property(mut self, property: PropertyDescriptor) -> Self {
        self.descriptor.properties.push(property);
        self
    }

    /// Sets the native decoder
    pub fn native(mut self, decode: NativeDecode) -> Self {
        self.descriptor.native = Some(decode);
        self
    }

    /// Finishes the descriptor
    pub fn build(self) -> Arc<TypeDescriptor> {
        Arc::new(self.descriptor)
    }
}

/// Drops the one-character category prefix of a registered name
pub(crate) fn strip_category(name: &str) -> &str {
    let mut chars = name.chars();
    chars.next();
    chars.as_str()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> (Arc<TypeDescriptor>, Arc<TypeDescriptor>, Arc<TypeDescriptor>) {
        let a = TypeDescriptor::builder("UA")
            .class()
            .property(PropertyDescriptor::new("Health", "int", 0))
            .build();
        let b = TypeDescriptor::builder("UB")
            .class()
            .parent(Arc::clone(&a))
            .property(PropertyDescriptor::placeholder("Pad", 4))
            .build();
        let c = TypeDescriptor::builder("UC")
            .class()
            .parent(Arc::clone(&b))
            .property(PropertyDescriptor::new("Scale", "float", 8))
            .build();
        (a, b, c)
    }

    #[test]
    fn test_type_tag_parse() {
        assert_eq!(TypeTag::parse("byte"), TypeTag::Byte);
        assert_eq!(TypeTag::parse("UObject*"), TypeTag::Object);
        assert_eq!(TypeTag::parse("#ELightType"), TypeTag::Enum("ELightType"));
        assert_eq!(TypeTag::parse("FVector"), TypeTag::Struct("FVector"));
    }

    #[test]
    fn test_is_a_is_transitive() {
        let (a, _, c) = chain();
        assert!(c.is_a("A"));
        assert!(c.is_a("B"));
        assert!(c.is_a("C"));
        assert!(!a.is_a("C"));
        assert!(!c.is_a("UC"));
    }

    #[test]
    fn test_find_declared_property_walks_chain() {
        let (_, _, c) = chain();
        assert_eq!(c.find_declared_property("health").unwrap().offset, 0);
        assert_eq!(c.find_declared_property("SCALE").unwrap().offset, 8);
        assert!(c.find_declared_property("Missing").is_none());
    }

    #[test]
    fn test_property_arity() {
        let scalar = PropertyDescriptor::new("X", "float", 0);
        assert!(!scalar.is_array());
        let fixed = PropertyDescriptor::new("Slots", "int", 0).fixed_array(4);
        assert!(fixed.is_array() && !fixed.is_dynamic_array());
        let dynamic = PropertyDescriptor::new("Items", "int", 0).dynamic_array();
        assert!(dynamic.is_dynamic_array());
        assert_eq!(PropertyDescriptor::placeholder("Pad", 0).tag(), None);
    }

    #[test]
    fn test_bare_name() {
        let (a, _, _) = chain();
        assert_eq!(a.bare_name(), "A");
        assert_eq!(strip_category(""), "");
    }
}
