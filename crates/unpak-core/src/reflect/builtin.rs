//! Reflection for the math value types in [`crate::codec::math`].

use super::descriptor::{PropertyDescriptor, TypeDescriptor};
use super::registry::{ClassEntry, TypeRegistry};
use super::value::{StructValue, Value};
use crate::archive::Archive;
use crate::codec::math::{FBox, FColor, FCoords, FQuat, FRotator, FSphere, FVector};
use crate::codec::Codec;
use crate::error::Result;
use std::mem::{offset_of, size_of};
use std::sync::{Arc, OnceLock};

/// A value type with a registered descriptor
pub trait Reflect: Codec + Default {
    /// Descriptor of this type; the same `Arc` on every call
    fn type_descriptor() -> Arc<TypeDescriptor>;

    /// Field values keyed by property name, inherited fields included
    fn to_value(&self) -> StructValue;
}

/// Decodes a `T` through its codec and converts it to a [`Value`]
pub fn native_decoder<T: Reflect>(ar: &mut Archive) -> Result<Value> {
    let value: T = ar.load()?;
    Ok(Value::Struct(value.to_value()))
}

/// Registers descriptors for every built-in math structure
pub fn register_core_types(registry: &mut TypeRegistry) {
    registry.register_classes([
        ClassEntry::new("FVector", FVector::type_descriptor),
        ClassEntry::new("FRotator", FRotator::type_descriptor),
        ClassEntry::new("FQuat", FQuat::type_descriptor),
        ClassEntry::new("FCoords", FCoords::type_descriptor),
        ClassEntry::new("FBox", FBox::type_descriptor),
        ClassEntry::new("FSphere", FSphere::type_descriptor),
        ClassEntry::new("FColor", FColor::type_descriptor),
    ]);
}

fn cached(
    cell: &'static OnceLock<Arc<TypeDescriptor>>,
    build: impl FnOnce() -> Arc<TypeDescriptor>,
) -> Arc<TypeDescriptor> {
    Arc::clone(cell.get_or_init(build))
}

impl Reflect for FVector {
    fn type_descriptor() -> Arc<TypeDescriptor> {
        static CELL: OnceLock<Arc<TypeDescriptor>> = OnceLock::new();
        cached(&CELL, || {
            TypeDescriptor::builder("FVector")
                .size_of(size_of::<Self>())
                .property(PropertyDescriptor::new("X", "float", offset_of!(Self, x)))
                .property(PropertyDescriptor::new("Y", "float", offset_of!(Self, y)))
                .property(PropertyDescriptor::new("Z", "float", offset_of!(Self, z)))
                .native(native_decoder::<Self>)
                .build()
        })
    }

    fn to_value(&self) -> StructValue {
        StructValue::new("FVector")
            .with("X", self.x)
            .with("Y", self.y)
            .with("Z", self.z)
    }
}

impl Reflect for FRotator {
    fn type_descriptor() -> Arc<TypeDescriptor> {
        static CELL: OnceLock<Arc<TypeDescriptor>> = OnceLock::new();
        cached(&CELL, || {
            TypeDescriptor::builder("FRotator")
                .size_of(size_of::<Self>())
                .property(PropertyDescriptor::new("Pitch", "int", offset_of!(Self, pitch)))
                .property(PropertyDescriptor::new("Yaw", "int", offset_of!(Self, yaw)))
                .property(PropertyDescriptor::new("Roll", "int", offset_of!(Self, roll)))
                .native(native_decoder::<Self>)
                .build()
        })
    }

    fn to_value(&self) -> StructValue {
        StructValue::new("FRotator")
            .with("Pitch", self.pitch)
            .with("Yaw", self.yaw)
            .with("Roll", self.roll)
    }
}

impl Reflect for FQuat {
    fn type_descriptor() -> Arc<TypeDescriptor> {
        static CELL: OnceLock<Arc<TypeDescriptor>> = OnceLock::new();
        cached(&CELL, || {
            TypeDescriptor::builder("FQuat")
                .size_of(size_of::<Self>())
                .property(PropertyDescriptor::new("X", "float", offset_of!(Self, x)))
                .property(PropertyDescriptor::new("Y", "float", offset_of!(Self, y)))
                .property(PropertyDescriptor::new("Z", "float", offset_of!(Self, z)))
                .property(PropertyDescriptor::new("W", "float", offset_of!(Self, w)))
                .native(native_decoder::<Self>)
                .build()
        })
    }

    fn to_value(&self) -> StructValue {
        StructValue::new("FQuat")
            .with("X", self.x)
            .with("Y", self.y)
            .with("Z", self.z)
            .with("W", self.w)
    }
}

impl Reflect for FCoords {
    fn type_descriptor() -> Arc<TypeDescriptor> {
        static CELL: OnceLock<Arc<TypeDescriptor>> = OnceLock::new();
        cached(&CELL, || {
            TypeDescriptor::builder("FCoords")
                .size_of(size_of::<Self>())
                .property(PropertyDescriptor::new("Origin", "FVector", offset_of!(Self, origin)))
                .property(PropertyDescriptor::new("XAxis", "FVector", offset_of!(Self, x_axis)))
                .property(PropertyDescriptor::new("YAxis", "FVector", offset_of!(Self, y_axis)))
                .property(PropertyDescriptor::new("ZAxis", "FVector", offset_of!(Self, z_axis)))
                .native(native_decoder::<Self>)
                .build()
        })
    }

    fn to_value(&self) -> StructValue {
        StructValue::new("FCoords")
            .with("Origin", self.origin.to_value())
            .with("XAxis", self.x_axis.to_value())
            .with("YAxis", self.y_axis.to_value())
            .with("ZAxis", self.z_axis.to_value())
    }
}

impl Reflect for FBox {
    fn type_descriptor() -> Arc<TypeDescriptor> {
        static CELL: OnceLock<Arc<TypeDescriptor>> = OnceLock::new();
        cached(&CELL, || {
            TypeDescriptor::builder("FBox")
                .size_of(size_of::<Self>())
                .property(PropertyDescriptor::new("Min", "FVector", offset_of!(Self, min)))
                .property(PropertyDescriptor::new("Max", "FVector", offset_of!(Self, max)))
                .property(PropertyDescriptor::new("IsValid", "byte", offset_of!(Self, is_valid)))
                .native(native_decoder::<Self>)
                .build()
        })
    }

    fn to_value(&self) -> StructValue {
        StructValue::new("FBox")
            .with("Min", self.min.to_value())
            .with("Max", self.max.to_value())
            .with("IsValid", self.is_valid)
    }
}

impl Reflect for FSphere {
    // The center is inherited from FVector, so only the radius is declared.
    fn type_descriptor() -> Arc<TypeDescriptor> {
        static CELL: OnceLock<Arc<TypeDescriptor>> = OnceLock::new();
        cached(&CELL, || {
            TypeDescriptor::builder("FSphere")
                .parent(FVector::type_descriptor())
                .size_of(size_of::<Self>())
                .property(PropertyDescriptor::new("R", "float", offset_of!(Self, r)))
                .native(native_decoder::<Self>)
                .build()
        })
    }

    fn to_value(&self) -> StructValue {
        StructValue::new("FSphere")
            .with("X", self.center.x)
            .with("Y", self.center.y)
            .with("Z", self.center.z)
            .with("R", self.r)
    }
}

impl Reflect for FColor {
    fn type_descriptor() -> Arc<TypeDescriptor> {
        static CELL: OnceLock<Arc<TypeDescriptor>> = OnceLock::new();
        cached(&CELL, || {
            TypeDescriptor::builder("FColor")
                .size_of(size_of::<Self>())
                .property(PropertyDescriptor::new("R", "byte", offset_of!(Self, r)))
                .property(PropertyDescriptor::new("G", "byte", offset_of!(Self, g)))
                .property(PropertyDescriptor::new("B", "byte", offset_of!(Self, b)))
                .property(PropertyDescriptor::new("A", "byte", offset_of!(Self, a)))
                .native(native_decoder::<Self>)
                .build()
        })
    }

    fn to_value(&self) -> StructValue {
        StructValue::new("FColor")
            .with("R", self.r)
            .with("G", self.g)
            .with("B", self.b)
            .with("A", self.a)
    }
}
