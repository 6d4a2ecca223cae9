//! Descriptor-driven decoding of registered structures.

use super::descriptor::{PropertyDescriptor, TypeDescriptor, TypeTag};
use super::registry::TypeRegistry;
use super::value::{StructValue, Value};
use crate::archive::Archive;
use crate::error::{Error, Result};
use tracing::trace;

/// Decodes one instance of `ty` from `ar`.
///
/// A type with a native decoder is read through it. Otherwise properties are
/// read base type first, each in declared order; placeholders consume nothing.
pub fn decode_value(
    ar: &mut Archive,
    registry: &TypeRegistry,
    ty: &TypeDescriptor,
) -> Result<StructValue> {
    if let Some(native) = ty.native {
        return match native(ar)? {
            Value::Struct(value) => Ok(value),
            other => Err(Error::value_mismatch(&ty.name, "struct", other.kind_name())),
        };
    }

    let chain: Vec<&TypeDescriptor> = ty.ancestors().collect();
    let mut value = StructValue::new(&ty.name);
    for owner in chain.into_iter().rev() {
        for prop in &owner.properties {
            let Some(tag) = prop.tag() else { continue };
            trace!("{}.{} at {}", owner.name, prop.name, ar.position());
            let field = decode_property(ar, registry, prop, tag)?;
            value.set(&prop.name, field);
        }
    }
    Ok(value)
}

fn decode_property(
    ar: &mut Archive,
    registry: &TypeRegistry,
    prop: &PropertyDescriptor,
    tag: TypeTag<'_>,
) -> Result<Value> {
    let count = if prop.is_dynamic_array() {
        if !ar.is_loading() {
            return Err(Error::LoadOnly {
                codec: "dynamic array property",
            });
        }
        let offset = ar.position();
        let count = ar.read_compact()?;
        if count < 0 {
            return Err(Error::InvalidCount { count, offset });
        }
        count
    } else if prop.count > 1 {
        prop.count
    } else {
        return decode_element(ar, registry, prop, tag);
    };

    (0..count)
        .map(|_| decode_element(ar, registry, prop, tag))
        .collect::<Result<Vec<_>>>()
        .map(Value::Array)
}

fn decode_element(
    ar: &mut Archive,
    registry: &TypeRegistry,
    prop: &PropertyDescriptor,
    tag: TypeTag<'_>,
) -> Result<Value> {
    Ok(match tag {
        TypeTag::Byte | TypeTag::Enum(_) => Value::Byte(ar.load()?),
        TypeTag::Int => Value::Int(ar.load()?),
        TypeTag::Bool => Value::Bool(ar.load::<u32>()? != 0),
        TypeTag::Float => Value::Float(ar.load()?),
        TypeTag::Name => Value::Name(ar.load()?),
        TypeTag::Object => Value::Object(ar.load()?),
        TypeTag::Struct(name) => {
            let nested = registry
                .find_struct_type(name)?
                .ok_or_else(|| Error::unknown_type(name, &prop.name))?;
            Value::Struct(decode_value(ar, registry, &nested)?)
        }
    })
}
