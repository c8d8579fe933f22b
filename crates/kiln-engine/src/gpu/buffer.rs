use bytemuck::Pod;

use crate::device::{BufferTarget, GlApi};
use crate::error::{Error, Result};
use crate::layout::{Layout, VertexRecord};

/// Expected update frequency of a buffer's contents. A driver hint only.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum UsageHint {
    /// Written once, drawn many times.
    #[default]
    Static,
    /// Rewritten occasionally.
    Dynamic,
    /// Rewritten every frame.
    Stream,
}

/// CPU-side vertex data awaiting upload.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexSet<V: VertexRecord> {
    records: Vec<V>,
    indices: Option<Vec<u32>>,
    usage: UsageHint,
}

impl<V: VertexRecord> VertexSet<V> {
    pub fn new(records: Vec<V>) -> Self {
        Self {
            records,
            indices: None,
            usage: UsageHint::default(),
        }
    }

    /// Draw through an element buffer with these indices.
    pub fn with_indices(mut self, indices: Vec<u32>) -> Self {
        self.indices = Some(indices);
        self
    }

    pub fn with_usage(mut self, usage: UsageHint) -> Self {
        self.usage = usage;
        self
    }

    #[inline]
    pub fn records(&self) -> &[V] {
        &self.records
    }

    #[inline]
    pub fn indices(&self) -> Option<&[u32]> {
        self.indices.as_deref()
    }

    #[inline]
    pub fn usage(&self) -> UsageHint {
        self.usage
    }
}

/// A vertex buffer holding `len` records.
pub struct VertexBuffer<'gl, G: GlApi> {
    gl: &'gl G,
    handle: G::Buffer,
    len: usize,
}

impl<G: GlApi> VertexBuffer<'_, G> {
    #[inline]
    pub fn handle(&self) -> G::Buffer {
        self.handle
    }

    /// Number of records uploaded.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<G: GlApi> Drop for VertexBuffer<'_, G> {
    fn drop(&mut self) {
        self.gl.delete_buffer(self.handle);
        log::trace!("deleted vertex buffer {:?}", self.handle);
    }
}

/// An element buffer of `u32` indices.
pub struct IndexBuffer<'gl, G: GlApi> {
    gl: &'gl G,
    handle: G::Buffer,
    count: usize,
}

impl<G: GlApi> IndexBuffer<'_, G> {
    #[inline]
    pub fn handle(&self) -> G::Buffer {
        self.handle
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }
}

impl<G: GlApi> Drop for IndexBuffer<'_, G> {
    fn drop(&mut self) {
        self.gl.delete_buffer(self.handle);
        log::trace!("deleted index buffer {:?}", self.handle);
    }
}

/// Copies the byte image of `records` into a new vertex buffer.
///
/// `layout` must describe `V`, which is usually a [`VertexRecord`]; a stride that disagrees with the record size is
/// a [`Error::LayoutMismatch`]. Leaves the new buffer bound to the vertex
/// target.
pub fn upload_vertices<'gl, G: GlApi, V: Pod>(
    gl: &'gl G,
    records: &[V],
    layout: &Layout,
    usage: UsageHint,
) -> Result<VertexBuffer<'gl, G>> {
    let record_size = std::mem::size_of::<V>();
    if record_size != layout.stride() {
        return Err(Error::LayoutMismatch {
            record_size,
            stride: layout.stride(),
        });
    }

    let handle = gl
        .create_buffer()
        .map_err(|message| Error::driver("vertex buffer", message))?;
    let buffer = VertexBuffer {
        gl,
        handle,
        len: records.len(),
    };

    let bytes: &[u8] = bytemuck::cast_slice(records);
    gl.bind_buffer(BufferTarget::Vertex, Some(handle));
    gl.buffer_data(BufferTarget::Vertex, bytes, usage);

    log::debug!(
        "uploaded {} vertices ({} bytes, {:?}) to buffer {:?}",
        records.len(),
        bytes.len(),
        usage,
        handle
    );
    Ok(buffer)
}

/// Copies `indices` into a new element buffer.
///
/// The buffer stays bound to the index target. When a vertex array is bound at
/// the time of the call, that vertex array now references the buffer.
pub fn upload_indices<'gl, G: GlApi>(
    gl: &'gl G,
    indices: &[u32],
    usage: UsageHint,
) -> Result<IndexBuffer<'gl, G>> {
    let handle = gl
        .create_buffer()
        .map_err(|message| Error::driver("index buffer", message))?;
    let buffer = IndexBuffer {
        gl,
        handle,
        count: indices.len(),
    };

    gl.bind_buffer(BufferTarget::Index, Some(handle));
    gl.buffer_data(BufferTarget::Index, bytemuck::cast_slice(indices), usage);

    log::debug!("uploaded {} indices to buffer {:?}", indices.len(), handle);
    Ok(buffer)
}
