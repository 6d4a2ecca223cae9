//! Human-readable property dumps.
//!
//! Dumping happens in two passes. [`collect_properties`] walks a decoded
//! [`StructValue`] against its [`TypeDescriptor`] and builds a [`DumpNode`]
//! tree of formatted names and values; [`render`] lays that tree out as
//! indented text, keeping small leaf-only aggregates on a single line.
//!
//! ## Example
//!
//! ```
//! use unpak_core::codec::math::FVector;
//! use unpak_core::dump::PropertyDumper;
//! use unpak_core::reflect::{Reflect, TypeRegistry};
//!
//! let registry = TypeRegistry::with_core_types();
//! let value = FVector::new(1.0, 2.5, -3.0).to_value();
//!
//! let text = PropertyDumper::new(&registry)
//!     .dump(&FVector::type_descriptor(), &value)
//!     .unwrap();
//! assert_eq!(text, " { X=1, Y=2.5, Z=-3 }\n");
//! ```

mod format;
mod node;

use crate::error::Result;
use crate::reflect::{registry, StructValue, TypeDescriptor, TypeRegistry};
use std::fmt::Write;
use tracing::trace;

pub use format::{format_float, render};
pub use node::{collect_properties, DumpNode};

/// Configuration for property dumps
#[derive(Debug, Clone)]
pub struct DumpConfig {
    /// Indentation string for one level (default: 4 spaces)
    pub indent_str: String,
    /// Items of one aggregate must stay below this many columns to be inlined
    pub line_width: usize,
    /// Prefix each property with its declaration index
    pub show_prop_index: bool,
    /// Prefix each property with its type tag
    pub show_prop_type: bool,
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self {
            indent_str: "    ".to_string(),
            line_width: 80,
            show_prop_index: false,
            show_prop_type: false,
        }
    }
}

impl DumpConfig {
    /// Creates a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the indentation string
    pub fn indent_str(mut self, s: impl Into<String>) -> Self {
        self.indent_str = s.into();
        self
    }

    /// Sets the single-line width limit
    pub fn line_width(mut self, width: usize) -> Self {
        self.line_width = width;
        self
    }

    /// Sets whether to show property indices
    pub fn show_prop_index(mut self, show: bool) -> Self {
        self.show_prop_index = show;
        self
    }

    /// Sets whether to show property types
    pub fn show_prop_type(mut self, show: bool) -> Self {
        self.show_prop_type = show;
        self
    }
}

/// Dumps decoded values against a registry
#[derive(Debug)]
pub struct PropertyDumper<'r> {
    registry: &'r TypeRegistry,
    config: DumpConfig,
}

impl<'r> PropertyDumper<'r> {
    /// Creates a dumper with the default config
    pub fn new(registry: &'r TypeRegistry) -> Self {
        Self {
            registry,
            config: DumpConfig::default(),
        }
    }

    /// Replaces the config
    pub fn with_config(mut self, config: DumpConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the current config
    pub fn config(&self) -> &DumpConfig {
        &self.config
    }

    /// Builds the dump tree without rendering it
    pub fn collect(&self, ty: &TypeDescriptor, value: &StructValue) -> Result<DumpNode> {
        collect_properties(self.registry, ty, value, &self.config)
    }

    /// Renders `value` into `out`
    pub fn write_to(
        &self,
        ty: &TypeDescriptor,
        value: &StructValue,
        out: &mut impl Write,
    ) -> Result<()> {
        let root = self.collect(ty, value)?;
        trace!("Dumping {} ({} properties)", ty.name, root.children.len());
        render(&root, out, 0, &self.config)?;
        Ok(())
    }

    /// Renders `value` to a string
    pub fn dump(&self, ty: &TypeDescriptor, value: &StructValue) -> Result<String> {
        let mut out = String::new();
        self.write_to(ty, value, &mut out)?;
        Ok(out)
    }
}

/// Renders `value` against the process-wide registry
pub fn dump_properties(ty: &TypeDescriptor, value: &StructValue) -> Result<String> {
    let registry = registry::read();
    PropertyDumper::new(&registry).dump(ty, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::math::{FBox, FSphere, FVector};
    use crate::codec::NameRef;
    use crate::reflect::{ClassEntry, PropertyDescriptor, Reflect};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn label() -> Arc<TypeDescriptor> {
        TypeDescriptor::builder("ULabel")
            .class()
            .property(PropertyDescriptor::new("N", "FName", 0))
            .build()
    }

    fn label_dump(len: usize) -> String {
        let registry = TypeRegistry::new();
        let mut name = NameRef::new(1);
        name.resolve("a".repeat(len));
        let value = StructValue::new("ULabel").with("N", name);
        PropertyDumper::new(&registry).dump(&label(), &value).unwrap()
    }

    #[test]
    fn test_dump_79_columns_stays_inline() {
        assert_eq!(label_dump(76), format!(" {{ N={} }}\n", "a".repeat(76)));
    }

    #[test]
    fn test_dump_80_columns_expands() {
        assert_eq!(label_dump(77), format!("\n    N = {}\n", "a".repeat(77)));
    }

    #[test]
    fn test_dump_box() {
        let registry = TypeRegistry::with_core_types();
        let bounds = FBox {
            min: FVector::new(-1.0, -1.0, -1.0),
            max: FVector::new(1.0, 1.0, 1.0),
            is_valid: 1,
        };
        let text = PropertyDumper::new(&registry)
            .dump(&FBox::type_descriptor(), &bounds.to_value())
            .unwrap();
        assert_eq!(
            text,
            "\n    Min = { X=-1, Y=-1, Z=-1 }\n    Max = { X=1, Y=1, Z=1 }\n    IsValid = 1\n"
        );
    }

    #[test]
    fn test_dump_nested_block_with_enum() {
        fn emitter() -> Arc<TypeDescriptor> {
            TypeDescriptor::builder("UEmitter")
                .class()
                .property(PropertyDescriptor::new("Mode", "#EEmitMode", 0))
                .property(PropertyDescriptor::new("Bounds", "FBox", 4))
                .build()
        }

        let mut registry = TypeRegistry::with_core_types();
        registry.register_classes([ClassEntry::new("UEmitter", emitter)]);
        registry.register_enum("EEmitMode", [(0, "EM_Burst"), (1, "EM_Stream")]);

        let ty = registry.find_class_type("Emitter", true).unwrap().unwrap();
        let value = StructValue::new("UEmitter")
            .with("Mode", 4u8)
            .with("Bounds", FBox::default().to_value());

        let text = PropertyDumper::new(&registry).dump(&ty, &value).unwrap();
        let expected = "
    Mode = <unknown> (4)
    Bounds =
    {
        Min = { X=0, Y=0, Z=0 }
        Max = { X=0, Y=0, Z=0 }
        IsValid = 0
    }
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_dump_sphere_lists_radius_first() {
        let sphere = FSphere {
            center: FVector::new(1.0, 2.0, 3.0),
            r: 4.0,
        };
        let text = dump_properties(&FSphere::type_descriptor(), &sphere.to_value()).unwrap();
        assert_eq!(text, " { R=4, X=1, Y=2, Z=3 }\n");
    }

    #[test]
    fn test_write_to_with_config() {
        let registry = TypeRegistry::new();
        let config = DumpConfig::new().show_prop_type(true);
        let value = FVector::new(0.0, 0.0, 1.0).to_value();
        let mut out = String::new();
        PropertyDumper::new(&registry)
            .with_config(config)
            .write_to(&FVector::type_descriptor(), &value, &mut out)
            .unwrap();
        assert_eq!(out, " { float X=0, float Y=0, float Z=1 }\n");
    }
}
