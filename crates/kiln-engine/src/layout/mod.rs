//! Vertex layout description.
//!
//! A vertex record is an ordered, tightly packed composition of attribute
//! payloads. From the attribute descriptors alone this module derives the
//! per-vertex stride and the byte offset of each attribute, so callers never
//! compute memory layout by hand.
//!
//! Binding index equals position in the descriptor sequence: the first
//! attribute is bound to slot 0, the second to slot 1, and so on.

mod attribute;
mod compute;
mod record;
mod scalar;

pub use attribute::{Attribute, AttributeDescriptor, Color, Position, Rgba, Rgba8, TexCoord};
pub use compute::{compute_layout, AttributeBinding, Layout};
pub use record::{FieldSpan, VertexRecord};
pub use scalar::{PackedFormat, ScalarType};
