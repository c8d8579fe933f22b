//! GPU-side vertex data.
//!
//! Uploads CPU vertex sets into driver buffers and wires their attributes to
//! a vertex array using a [`Layout`](crate::layout::Layout). Every driver
//! object is held by a guard that deletes it exactly once when dropped.

mod buffer;
mod mesh;
mod vertex_array;

pub use buffer::{upload_indices, upload_vertices, IndexBuffer, UsageHint, VertexBuffer, VertexSet};
pub use mesh::Mesh;
pub use vertex_array::{bind_attributes, VertexArray};
