//! Building the name/value tree of a decoded structure.

use super::format::format_float;
use super::DumpConfig;
use crate::error::{Error, Result};
use crate::reflect::{
    PropertyDescriptor, StructValue, TypeDescriptor, TypeRegistry, TypeTag, Value, ENUM_MARKER,
};

/// One line (or inline item) of a dump
///
/// A node holds either a formatted value or children, never both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DumpNode {
    /// Display name; empty only for the root
    pub name: String,
    /// Formatted leaf value
    pub value: String,
    /// Nested properties or array elements
    pub children: Vec<DumpNode>,
    /// Array elements print only their value when inlined
    pub is_array_item: bool,
}

impl DumpNode {
    fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Returns true if this node has no children
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Builds the dump tree of `value` interpreted as `ty`.
///
/// Properties of the most-derived type come first, then each ancestor's, in
/// declared order. Placeholders are skipped.
pub fn collect_properties(
    registry: &TypeRegistry,
    ty: &TypeDescriptor,
    value: &StructValue,
    config: &DumpConfig,
) -> Result<DumpNode> {
    let mut root = DumpNode::default();
    Collector { registry, config }.collect_into(ty, value, &mut root)?;
    Ok(root)
}

struct Collector<'a> {
    registry: &'a TypeRegistry,
    config: &'a DumpConfig,
}

impl Collector<'_> {
    fn collect_into(
        &self,
        ty: &TypeDescriptor,
        value: &StructValue,
        parent: &mut DumpNode,
    ) -> Result<()> {
        for owner in ty.ancestors() {
            for (index, prop) in owner.properties.iter().enumerate() {
                let (Some(type_name), Some(tag)) = (prop.type_name.as_deref(), prop.tag()) else {
                    continue;
                };
                let field = value.get(&prop.name).ok_or_else(|| {
                    Error::value_mismatch(&prop.name, expected_kind(tag), "nothing")
                })?;

                let mut node = DumpNode::named(self.display_name(index, type_name, prop));
                if prop.is_array() {
                    self.collect_array(prop, tag, field, &mut node)?;
                } else {
                    self.fill(prop, tag, field, &mut node)?;
                }
                parent.children.push(node);
            }
        }
        Ok(())
    }

    fn display_name(&self, index: usize, type_name: &str, prop: &PropertyDescriptor) -> String {
        let mut name = String::new();
        if self.config.show_prop_index {
            name.push_str(&format!("({index})"));
        }
        if self.config.show_prop_type {
            name.push_str(type_name.strip_prefix(ENUM_MARKER).unwrap_or(type_name));
            name.push(' ');
        }
        name.push_str(&prop.name);
        name
    }

    fn collect_array(
        &self,
        prop: &PropertyDescriptor,
        tag: TypeTag<'_>,
        field: &Value,
        node: &mut DumpNode,
    ) -> Result<()> {
        let Value::Array(items) = field else {
            return Err(Error::value_mismatch(&prop.name, "array", field.kind_name()));
        };
        if !prop.is_dynamic_array() && items.len() != prop.count as usize {
            return Err(Error::value_mismatch(
                &prop.name,
                format!("{} elements", prop.count),
                format!("{} elements", items.len()),
            ));
        }

        node.name = format!("{}[{}]", node.name, items.len());
        if items.is_empty() {
            node.value = "{}".to_string();
            return Ok(());
        }
        for (i, item) in items.iter().enumerate() {
            let mut child = DumpNode::named(format!("{}[{}]", prop.name, i));
            child.is_array_item = true;
            self.fill(prop, tag, item, &mut child)?;
            node.children.push(child);
        }
        Ok(())
    }

    fn fill(
        &self,
        prop: &PropertyDescriptor,
        tag: TypeTag<'_>,
        value: &Value,
        node: &mut DumpNode,
    ) -> Result<()> {
        node.value = match (tag, value) {
            (TypeTag::Struct(type_name), value) => {
                let nested_ty = self
                    .registry
                    .find_struct_type(type_name)?
                    .ok_or_else(|| Error::unknown_type(type_name, &prop.name))?;
                let Value::Struct(nested) = value else {
                    return Err(Error::value_mismatch(&prop.name, "struct", value.kind_name()));
                };
                return self.collect_into(&nested_ty, nested, node);
            }
            (TypeTag::Byte, Value::Byte(v)) => v.to_string(),
            (TypeTag::Int, Value::Int(v)) => v.to_string(),
            (TypeTag::Bool, Value::Bool(v)) => v.to_string(),
            (TypeTag::Float, Value::Float(v)) => format_float(*v),
            (TypeTag::Object, Value::Object(v)) => v.to_string(),
            (TypeTag::Name, Value::Name(v)) => v.to_string(),
            (TypeTag::Enum(enum_name), Value::Byte(v)) => {
                let label = self
                    .registry
                    .enum_label_for(enum_name, i32::from(*v))
                    .unwrap_or("<unknown>");
                format!("{label} ({v})")
            }
            (tag, value) => {
                let expected = expected_kind(tag);
                return Err(Error::value_mismatch(&prop.name, expected, value.kind_name()));
            }
        };
        Ok(())
    }
}

fn expected_kind(tag: TypeTag<'_>) -> &'static str {
    match tag {
        TypeTag::Byte | TypeTag::Enum(_) => "byte",
        TypeTag::Int => "int",
        TypeTag::Bool => "bool",
        TypeTag::Float => "float",
        TypeTag::Object => "object",
        TypeTag::Name => "name",
        TypeTag::Struct(_) => "struct",
    }
}
