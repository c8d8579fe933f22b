use crate::error::{Error, UnknownTypeError};

use super::{AttributeDescriptor, VertexRecord};

/// One attribute placed inside a record.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AttributeBinding {
    /// Attribute slot; equals the attribute's position in the record.
    pub index: u32,
    pub descriptor: AttributeDescriptor,
    /// Byte offset from the start of the record.
    pub offset: usize,
}

/// Byte layout of a vertex record.
///
/// Derived from an attribute sequence and never cached by the engine;
/// recomputing is cheap and has no side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    stride: usize,
    attributes: Vec<AttributeBinding>,
}

impl Layout {
    /// Lays out `descriptors` back to back in the given order.
    ///
    /// Fails on the first unregistered scalar type; no partial layout is
    /// produced.
    pub fn compute(descriptors: &[AttributeDescriptor]) -> Result<Self, UnknownTypeError> {
        let mut offset = 0usize;
        let mut attributes = Vec::with_capacity(descriptors.len());

        for (index, descriptor) in descriptors.iter().enumerate() {
            let size = descriptor.byte_size()?;
            attributes.push(AttributeBinding {
                index: index as u32,
                descriptor: *descriptor,
                offset,
            });
            offset += size;
        }

        Ok(Self {
            stride: offset,
            attributes,
        })
    }

    /// Layout of a record type, checked field by field against the type's
    /// actual memory layout and then against its total size.
    pub fn of<V: VertexRecord>() -> Result<Self, Error> {
        let layout = Self::compute(V::ATTRIBUTES)?;
        let record_size = std::mem::size_of::<V>();

        for (binding, field) in layout.attributes.iter().zip(V::FIELDS) {
            let size = binding.descriptor.byte_size()?;
            if field.offset != binding.offset || field.size != size {
                return Err(Error::AttributeMismatch {
                    index: binding.index,
                    field_offset: field.offset,
                    field_size: field.size,
                    offset: binding.offset,
                    size,
                });
            }
        }

        if V::FIELDS.len() != layout.len() || record_size != layout.stride {
            return Err(Error::LayoutMismatch {
                record_size,
                stride: layout.stride,
            });
        }
        Ok(layout)
    }

    /// Bytes between consecutive records.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    #[inline]
    pub fn attributes(&self) -> &[AttributeBinding] {
        &self.attributes
    }

    pub fn offsets(&self) -> impl Iterator<Item = usize> + '_ {
        self.attributes.iter().map(|a| a.offset)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

/// Free-function form of [`Layout::compute`].
pub fn compute_layout(descriptors: &[AttributeDescriptor]) -> Result<Layout, UnknownTypeError> {
    Layout::compute(descriptors)
}
