//! Runtime type reflection.
//!
//! Structures and classes are described by [`TypeDescriptor`]s: a name, an
//! optional parent forming a single-inheritance chain, and an ordered list
//! of [`PropertyDescriptor`]s. Descriptors are collected in a
//! [`TypeRegistry`] together with enum label tables and property remaps
//! that translate legacy field names.
//!
//! Decoded data is held as [`Value`]s rather than raw memory, so the dump
//! engine walks tagged variants instead of casting byte offsets.
//!
//! ## Naming
//!
//! Registered names carry a one-character category prefix (`UActor`,
//! `FVector`). Classes are looked up by bare name (`Actor`), structures by
//! full name (`FVector`).
//!
//! ## Example
//!
//! ```
//! use unpak_core::reflect::{ClassEntry, PropertyDescriptor, TypeDescriptor, TypeRegistry};
//! use std::sync::Arc;
//!
//! fn actor() -> Arc<TypeDescriptor> {
//!     TypeDescriptor::builder("UActor")
//!         .class()
//!         .property(PropertyDescriptor::new("Location", "FVector", 0))
//!         .build()
//! }
//!
//! let mut registry = TypeRegistry::with_core_types();
//! registry.register_classes([ClassEntry::new("UActor", actor)]);
//!
//! let ty = registry.find_class_type("actor", true).unwrap().unwrap();
//! assert!(registry.find_property(&ty, "location").is_some());
//! ```

mod builtin;
mod decode;
mod descriptor;
pub mod registry;
mod value;

pub use builtin::{native_decoder, register_core_types, Reflect};
pub use decode::decode_value;
pub use descriptor::{
    NativeDecode, PropertyDescriptor, TypeDescriptor, TypeDescriptorBuilder, TypeTag,
    DYNAMIC_ARRAY, ENUM_MARKER,
};
pub use registry::{ClassEntry, EnumEntry, TypeFactory, TypeRegistry, ENUM_UNKNOWN};
pub use value::{StructValue, Value};
