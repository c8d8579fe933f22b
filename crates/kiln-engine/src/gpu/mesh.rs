use crate::device::GlApi;
use crate::error::{Error, Result};
use crate::layout::{Layout, VertexRecord};

use super::{bind_attributes, upload_indices, upload_vertices, IndexBuffer, VertexArray, VertexBuffer, VertexSet};

/// Uploaded vertex data ready to draw.
///
/// Owns the vertex array and the buffers it references. Fields drop in
/// declaration order: vertex array, then index buffer, then vertex buffer.
pub struct Mesh<'gl, G: GlApi> {
    gl: &'gl G,
    vertex_array: VertexArray<'gl, G>,
    indices: Option<IndexBuffer<'gl, G>>,
    vertices: VertexBuffer<'gl, G>,
    layout: Layout,
    draw_count: i32,
}

impl<'gl, G: GlApi> Mesh<'gl, G> {
    /// Uploads `set` into a fresh vertex array.
    ///
    /// Indices are checked against the record count before any driver object
    /// is created. On any later failure the objects created so far are
    /// released before returning.
    pub fn upload<V: VertexRecord>(gl: &'gl G, set: &VertexSet<V>) -> Result<Self> {
        let layout = Layout::of::<V>()?;
        let records = set.records();

        if let Some(indices) = set.indices() {
            if let Some(&index) = indices.iter().find(|&&i| i as usize >= records.len()) {
                return Err(Error::IndexOutOfRange {
                    index,
                    vertex_count: records.len(),
                });
            }
        }

        let count = set.indices().map_or(records.len(), <[u32]>::len);
        let draw_count = i32::try_from(count)
            .map_err(|_| Error::driver("mesh", format!("{count} elements exceed the draw limit")))?;

        let vertex_array = VertexArray::new(gl)?;
        vertex_array.bind();

        let vertices = upload_vertices(gl, records, &layout, set.usage())?;
        // Bound while the vertex array is bound, so the vertex array keeps it.
        let indices = match set.indices() {
            Some(indices) => Some(upload_indices(gl, indices, set.usage())?),
            None => None,
        };

        bind_attributes(gl, &layout, &vertex_array, &vertices)?;
        gl.bind_vertex_array(None);

        log::debug!(
            "mesh ready: {} vertices, {} indices, stride {}",
            records.len(),
            indices.as_ref().map_or(0, IndexBuffer::count),
            layout.stride()
        );

        Ok(Self {
            gl,
            vertex_array,
            indices,
            vertices,
            layout,
            draw_count,
        })
    }

    /// Issues a triangle-list draw. The caller activates a program first.
    pub fn draw(&self) {
        self.vertex_array.bind();
        match self.indices {
            Some(_) => self.gl.draw_elements(self.draw_count),
            None => self.gl.draw_arrays(0, self.draw_count),
        }
    }

    #[inline]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn index_count(&self) -> Option<usize> {
        self.indices.as_ref().map(IndexBuffer::count)
    }

    #[inline]
    pub fn vertex_array(&self) -> G::VertexArray {
        self.vertex_array.handle()
    }

    #[inline]
    pub fn vertex_buffer(&self) -> G::Buffer {
        self.vertices.handle()
    }

    #[inline]
    pub fn index_buffer(&self) -> Option<G::Buffer> {
        self.indices.as_ref().map(IndexBuffer::handle)
    }
}

impl<G: GlApi> std::fmt::Debug for Mesh<'_, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mesh")
            .field("vertex_array", &self.vertex_array.handle())
            .field("vertex_buffer", &self.vertices.handle())
            .field("index_buffer", &self.index_buffer())
            .field("layout", &self.layout)
            .finish()
    }
}
