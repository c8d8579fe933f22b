use bytemuck::{Pod, Zeroable};

use crate::error::UnknownTypeError;

use super::{PackedFormat, ScalarType};

/// Shape of one vertex attribute: component count, scalar type and whether
/// integer data is normalized to `[0, 1]` / `[-1, 1]` when fetched.
///
/// Two kinds exist. Per-component attributes ([`new`](Self::new)) occupy
/// `component_count × size_of(scalar_type)` bytes. Packed attributes
/// ([`packed`](Self::packed)) occupy one word whatever their component count.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct AttributeDescriptor {
    component_count: u8,
    scalar_type: ScalarType,
    normalized: bool,
    packed: Option<PackedFormat>,
}

impl AttributeDescriptor {
    /// A per-component attribute.
    ///
    /// Panics if `component_count` is outside `1..=4`. In a `const` item the
    /// check happens at compile time. A packed tag passed here has no
    /// per-component size, so laying it out fails with `UnknownType`; use
    /// [`packed`](Self::packed) for those.
    pub const fn new(component_count: u8, scalar_type: ScalarType, normalized: bool) -> Self {
        assert!(
            component_count >= 1 && component_count <= 4,
            "vertex attributes have 1 to 4 components"
        );
        Self {
            component_count,
            scalar_type,
            normalized,
            packed: None,
        }
    }

    /// A packed attribute. The component count is fixed by the format.
    pub const fn packed(format: PackedFormat, normalized: bool) -> Self {
        Self {
            component_count: format.component_count(),
            scalar_type: format.scalar_type(),
            normalized,
            packed: Some(format),
        }
    }

    #[inline]
    pub const fn component_count(&self) -> u8 {
        self.component_count
    }

    #[inline]
    pub const fn scalar_type(&self) -> ScalarType {
        self.scalar_type
    }

    #[inline]
    pub const fn normalized(&self) -> bool {
        self.normalized
    }

    #[inline]
    pub const fn packed_format(&self) -> Option<PackedFormat> {
        self.packed
    }

    /// Bytes this attribute occupies inside a record.
    pub fn byte_size(&self) -> Result<usize, UnknownTypeError> {
        match self.packed {
            Some(format) => Ok(format.byte_size()),
            None => Ok(self.scalar_type.size_of()? * self.component_count as usize),
        }
    }
}

/// A vertex attribute payload with a fixed shape.
///
/// The payload's size must equal `DESCRIPTOR.byte_size()`. `Layout::of`
/// compares every field of a record against its descriptor, by offset and by
/// size, so a payload that disagrees is rejected even when the record's total
/// size happens to match the stride.
pub trait Attribute: Pod {
    const DESCRIPTOR: AttributeDescriptor;
}

/// Object-space position.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position {
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl Attribute for Position {
    const DESCRIPTOR: AttributeDescriptor = AttributeDescriptor::new(3, ScalarType::FLOAT, false);
}

/// Opaque RGB color, straight floats.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

impl Attribute for Color {
    const DESCRIPTOR: AttributeDescriptor = AttributeDescriptor::new(3, ScalarType::FLOAT, false);
}

/// RGBA color, straight floats.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

impl Attribute for Rgba {
    const DESCRIPTOR: AttributeDescriptor = AttributeDescriptor::new(4, ScalarType::FLOAT, false);
}

/// RGBA color as bytes, normalized to `[0, 1]` in the shader.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl Attribute for Rgba8 {
    const DESCRIPTOR: AttributeDescriptor =
        AttributeDescriptor::new(4, ScalarType::UNSIGNED_BYTE, true);
}

/// Texture coordinate.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct TexCoord {
    pub u: f32,
    pub v: f32,
}

impl TexCoord {
    #[inline]
    pub const fn new(u: f32, v: f32) -> Self {
        Self { u, v }
    }
}

impl Attribute for TexCoord {
    const DESCRIPTOR: AttributeDescriptor = AttributeDescriptor::new(2, ScalarType::FLOAT, false);
}
