use std::fmt;

use crate::error::UnknownTypeError;

/// Scalar component type of a vertex attribute.
///
/// Wraps the driver's raw type enum rather than a closed Rust enum so that
/// tags coming from outside the crate can be represented and rejected by the
/// size table instead of being silently mapped.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ScalarType(pub u32);

impl ScalarType {
    pub const BYTE: Self = Self(glow::BYTE);
    pub const UNSIGNED_BYTE: Self = Self(glow::UNSIGNED_BYTE);
    pub const SHORT: Self = Self(glow::SHORT);
    pub const UNSIGNED_SHORT: Self = Self(glow::UNSIGNED_SHORT);
    pub const INT: Self = Self(glow::INT);
    pub const UNSIGNED_INT: Self = Self(glow::UNSIGNED_INT);
    pub const HALF_FLOAT: Self = Self(glow::HALF_FLOAT);
    pub const FLOAT: Self = Self(glow::FLOAT);
    pub const DOUBLE: Self = Self(glow::DOUBLE);
    pub const FIXED: Self = Self(glow::FIXED);
    pub const INT_2_10_10_10_REV: Self = Self(glow::INT_2_10_10_10_REV);
    pub const UNSIGNED_INT_2_10_10_10_REV: Self = Self(glow::UNSIGNED_INT_2_10_10_10_REV);
    pub const UNSIGNED_INT_10F_11F_11F_REV: Self = Self(glow::UNSIGNED_INT_10F_11F_11F_REV);

    /// Byte size of one component, from the process-wide size table.
    ///
    /// Packed tags are not per-component types and are not in the table; they
    /// are described by [`PackedFormat`] instead.
    pub fn size_of(self) -> Result<usize, UnknownTypeError> {
        lookup(self)
            .map(|entry| entry.size)
            .ok_or(UnknownTypeError(self))
    }

    pub fn name(self) -> Option<&'static str> {
        lookup(self)
            .map(|entry| entry.name)
            .or_else(|| PackedFormat::from_scalar_type(self).map(PackedFormat::name))
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "0x{:04X}", self.0),
        }
    }
}

/// A packed attribute format: every component of the attribute shares one
/// 32-bit word, so its size is not `component_count × size_of(type)`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PackedFormat {
    /// Signed 2/10/10/10 bits, four components.
    Int2_10_10_10Rev,
    /// Unsigned 2/10/10/10 bits, four components.
    UnsignedInt2_10_10_10Rev,
    /// Unsigned 10/11/11-bit floats, three components.
    UnsignedInt10F11F11FRev,
}

impl PackedFormat {
    pub const ALL: [Self; 3] = [
        Self::Int2_10_10_10Rev,
        Self::UnsignedInt2_10_10_10Rev,
        Self::UnsignedInt10F11F11FRev,
    ];

    /// Raw type tag passed to the driver.
    pub const fn scalar_type(self) -> ScalarType {
        match self {
            Self::Int2_10_10_10Rev => ScalarType::INT_2_10_10_10_REV,
            Self::UnsignedInt2_10_10_10Rev => ScalarType::UNSIGNED_INT_2_10_10_10_REV,
            Self::UnsignedInt10F11F11FRev => ScalarType::UNSIGNED_INT_10F_11F_11F_REV,
        }
    }

    /// The only component count the driver accepts for this format.
    pub const fn component_count(self) -> u8 {
        match self {
            Self::Int2_10_10_10Rev | Self::UnsignedInt2_10_10_10Rev => 4,
            Self::UnsignedInt10F11F11FRev => 3,
        }
    }

    /// Bytes per attribute, independent of the component count.
    pub const fn byte_size(self) -> usize {
        4
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Int2_10_10_10Rev => "INT_2_10_10_10_REV",
            Self::UnsignedInt2_10_10_10Rev => "UNSIGNED_INT_2_10_10_10_REV",
            Self::UnsignedInt10F11F11FRev => "UNSIGNED_INT_10F_11F_11F_REV",
        }
    }

    pub fn from_scalar_type(tag: ScalarType) -> Option<Self> {
        Self::ALL.into_iter().find(|format| format.scalar_type() == tag)
    }
}

struct SizeEntry {
    tag: ScalarType,
    size: usize,
    name: &'static str,
}

const fn entry(tag: ScalarType, size: usize, name: &'static str) -> SizeEntry {
    SizeEntry { tag, size, name }
}

// Read-only for the life of the process. Sizes are those of the matching
// GL client types (GLbyte .. GLdouble, GLfixed is 32-bit).
static SIZE_TABLE: [SizeEntry; 10] = [
    entry(ScalarType::BYTE, 1, "BYTE"),
    entry(ScalarType::UNSIGNED_BYTE, 1, "UNSIGNED_BYTE"),
    entry(ScalarType::SHORT, 2, "SHORT"),
    entry(ScalarType::UNSIGNED_SHORT, 2, "UNSIGNED_SHORT"),
    entry(ScalarType::INT, 4, "INT"),
    entry(ScalarType::UNSIGNED_INT, 4, "UNSIGNED_INT"),
    entry(ScalarType::HALF_FLOAT, 2, "HALF_FLOAT"),
    entry(ScalarType::FLOAT, 4, "FLOAT"),
    entry(ScalarType::DOUBLE, 8, "DOUBLE"),
    entry(ScalarType::FIXED, 4, "FIXED"),
];

fn lookup(tag: ScalarType) -> Option<&'static SizeEntry> {
    SIZE_TABLE.iter().find(|e| e.tag == tag)
}
