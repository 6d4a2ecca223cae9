//! Math value types.
//!
//! Each type serializes as its fields in declaration order. `#[repr(C)]`
//! keeps the in-memory layout equal to the engine's, which the reflected
//! descriptors in [`crate::reflect::builtin`] record as offsets.

use super::Codec;
use crate::archive::Archive;
use crate::error::Result;

/// Format version that introduced the sphere radius
pub const SPHERE_RADIUS_VERSION: i32 = 61;

/// 3D vector
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[repr(C)]
pub struct FVector {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
    /// Z component
    pub z: f32,
}

impl FVector {
    /// Creates a vector
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Sets all three components
    pub fn set(&mut self, x: f32, y: f32, z: f32) {
        *self = Self::new(x, y, z);
    }
}

impl Codec for FVector {
    fn serialize(&mut self, ar: &mut Archive) -> Result<()> {
        ar.stream(&mut self.x)?.stream(&mut self.y)?.stream(&mut self.z)?;
        Ok(())
    }
}

/// Rotation in fixed-point engine units
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[repr(C)]
pub struct FRotator {
    /// Pitch
    pub pitch: i32,
    /// Yaw
    pub yaw: i32,
    /// Roll
    pub roll: i32,
}

impl Codec for FRotator {
    fn serialize(&mut self, ar: &mut Archive) -> Result<()> {
        ar.stream(&mut self.pitch)?
            .stream(&mut self.yaw)?
            .stream(&mut self.roll)?;
        Ok(())
    }
}

/// Quaternion
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[repr(C)]
pub struct FQuat {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
    /// Z component
    pub z: f32,
    /// W component
    pub w: f32,
}

impl Codec for FQuat {
    fn serialize(&mut self, ar: &mut Archive) -> Result<()> {
        ar.stream(&mut self.x)?
            .stream(&mut self.y)?
            .stream(&mut self.z)?
            .stream(&mut self.w)?;
        Ok(())
    }
}

/// Coordinate frame: origin plus three axes
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[repr(C)]
pub struct FCoords {
    /// Frame origin
    pub origin: FVector,
    /// X axis
    pub x_axis: FVector,
    /// Y axis
    pub y_axis: FVector,
    /// Z axis
    pub z_axis: FVector,
}

impl Codec for FCoords {
    fn serialize(&mut self, ar: &mut Archive) -> Result<()> {
        ar.stream(&mut self.origin)?
            .stream(&mut self.x_axis)?
            .stream(&mut self.y_axis)?
            .stream(&mut self.z_axis)?;
        Ok(())
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[repr(C)]
pub struct FBox {
    /// Minimum corner
    pub min: FVector,
    /// Maximum corner
    pub max: FVector,
    /// Nonzero when the box holds anything
    pub is_valid: u8,
}

impl Codec for FBox {
    fn serialize(&mut self, ar: &mut Archive) -> Result<()> {
        ar.stream(&mut self.min)?
            .stream(&mut self.max)?
            .stream(&mut self.is_valid)?;
        Ok(())
    }
}

/// Bounding sphere
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[repr(C)]
pub struct FSphere {
    /// Sphere center
    pub center: FVector,
    /// Radius; absent before [`SPHERE_RADIUS_VERSION`] and left at 0
    pub r: f32,
}

impl Codec for FSphere {
    fn serialize(&mut self, ar: &mut Archive) -> Result<()> {
        self.center.serialize(ar)?;
        if ar.format_version() >= SPHERE_RADIUS_VERSION {
            self.r.serialize(ar)?;
        }
        Ok(())
    }
}

/// 8-bit RGBA color
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[repr(C)]
pub struct FColor {
    /// Red
    pub r: u8,
    /// Green
    pub g: u8,
    /// Blue
    pub b: u8,
    /// Alpha
    pub a: u8,
}

impl FColor {
    /// Creates an opaque color
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Creates a color with explicit alpha
    pub fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl Codec for FColor {
    fn serialize(&mut self, ar: &mut Archive) -> Result<()> {
        ar.stream(&mut self.r)?
            .stream(&mut self.g)?
            .stream(&mut self.b)?
            .stream(&mut self.a)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::ArchiveConfig;
    use crate::codec::test_util::StreamWriter;

    fn sphere_stream() -> Vec<u8> {
        StreamWriter::new()
            .f32(1.0)
            .f32(2.0)
            .f32(3.0)
            .f32(9.5)
            .finish()
    }

    #[test]
    fn test_sphere_radius_present_from_61() {
        let mut ar = Archive::from_bytes(sphere_stream(), ArchiveConfig::new().format_version(61));
        let sphere: FSphere = ar.load().unwrap();
        assert_eq!(sphere.center, FVector::new(1.0, 2.0, 3.0));
        assert_eq!(sphere.r, 9.5);
        assert_eq!(ar.position(), 16);
    }

    #[test]
    fn test_sphere_radius_absent_before_61() {
        let mut ar = Archive::from_bytes(sphere_stream(), ArchiveConfig::new().format_version(60));
        let sphere: FSphere = ar.load().unwrap();
        assert_eq!(sphere.center, FVector::new(1.0, 2.0, 3.0));
        assert_eq!(sphere.r, 0.0);
        assert_eq!(ar.position(), 12);
    }

    #[test]
    fn test_box_has_no_padding() {
        let data = StreamWriter::new()
            .f32(-1.0)
            .f32(-1.0)
            .f32(-1.0)
            .f32(1.0)
            .f32(1.0)
            .f32(1.0)
            .u8(1)
            .finish();
        let mut ar = Archive::from_bytes(data, ArchiveConfig::new());
        let bounds: FBox = ar.load().unwrap();
        assert_eq!(bounds.max, FVector::new(1.0, 1.0, 1.0));
        assert_eq!(bounds.is_valid, 1);
        assert_eq!(ar.position(), 25);
        assert!(ar.is_at_end().unwrap());
    }

    #[test]
    fn test_coords_and_rotator() {
        let mut writer = StreamWriter::new();
        for v in 0..12 {
            writer = writer.f32(v as f32);
        }
        let data = writer.i32(16384).i32(-1).i32(0).finish();
        let mut ar = Archive::from_bytes(data, ArchiveConfig::new());

        let coords: FCoords = ar.load().unwrap();
        assert_eq!(coords.origin, FVector::new(0.0, 1.0, 2.0));
        assert_eq!(coords.z_axis, FVector::new(9.0, 10.0, 11.0));

        let rotator: FRotator = ar.load().unwrap();
        assert_eq!(
            rotator,
            FRotator {
                pitch: 16384,
                yaw: -1,
                roll: 0
            }
        );
    }

    #[test]
    fn test_quat_and_color() {
        let data = StreamWriter::new()
            .f32(0.0)
            .f32(0.0)
            .f32(0.0)
            .f32(1.0)
            .bytes(&[10, 20, 30, 40])
            .finish();
        let mut ar = Archive::from_bytes(data, ArchiveConfig::new());
        let quat: FQuat = ar.load().unwrap();
        assert_eq!(quat.w, 1.0);
        let color: FColor = ar.load().unwrap();
        assert_eq!(color, FColor::rgba(10, 20, 30, 40));
        assert_eq!(FColor::rgb(1, 2, 3).a, 255);
    }
}
