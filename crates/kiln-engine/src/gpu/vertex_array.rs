use crate::device::{BufferTarget, GlApi};
use crate::error::{Error, Result};
use crate::layout::Layout;

use super::VertexBuffer;

/// A vertex array object. Remembers attribute bindings and the element
/// buffer bound while it was bound.
pub struct VertexArray<'gl, G: GlApi> {
    gl: &'gl G,
    handle: G::VertexArray,
}

impl<'gl, G: GlApi> VertexArray<'gl, G> {
    pub fn new(gl: &'gl G) -> Result<Self> {
        let handle = gl
            .create_vertex_array()
            .map_err(|message| Error::driver("vertex array", message))?;
        log::trace!("created vertex array {handle:?}");
        Ok(Self { gl, handle })
    }

    #[inline]
    pub fn handle(&self) -> G::VertexArray {
        self.handle
    }

    #[inline]
    pub fn bind(&self) {
        self.gl.bind_vertex_array(Some(self.handle));
    }
}

impl<G: GlApi> Drop for VertexArray<'_, G> {
    fn drop(&mut self) {
        self.gl.delete_vertex_array(self.handle);
        log::trace!("deleted vertex array {:?}", self.handle);
    }
}

// GL keeps at most one flag per error kind, of which there are eight.
const MAX_PENDING_ERRORS: usize = 8;

/// Points every attribute of `layout` at `vertices` inside `vertex_array`, at
/// the binding index, stride and offset the layout computed, and enables it.
///
/// Errors already queued by the driver are logged and discarded first. After
/// each attribute the error queue is read again; a rejection (an older
/// context that lacks `FIXED` or `UNSIGNED_INT_10F_11F_11F_REV`, for one)
/// fails with [`Error::UnsupportedAttribute`] naming that attribute. On
/// success `vertex_array` and `vertices` are left bound.
pub fn bind_attributes<G: GlApi>(
    gl: &G,
    layout: &Layout,
    vertex_array: &VertexArray<'_, G>,
    vertices: &VertexBuffer<'_, G>,
) -> Result<()> {
    let stride = i32::try_from(layout.stride())
        .map_err(|_| Error::driver("vertex attribute", format!("stride {} too large", layout.stride())))?;

    let stale = std::iter::from_fn(|| gl.take_error())
        .take(MAX_PENDING_ERRORS)
        .count();
    if stale > 0 {
        log::warn!("discarded {stale} driver error(s) raised before attribute setup");
    }

    vertex_array.bind();
    gl.bind_buffer(BufferTarget::Vertex, Some(vertices.handle()));

    for binding in layout.attributes() {
        let d = binding.descriptor;
        // offset < stride, which fits.
        gl.vertex_attrib_pointer(
            binding.index,
            i32::from(d.component_count()),
            d.scalar_type(),
            d.normalized(),
            stride,
            binding.offset as i32,
        );
        if let Some(code) = gl.take_error() {
            log::error!(
                "driver rejected attribute {}: {}x{} (GL error 0x{code:04X})",
                binding.index,
                d.component_count(),
                d.scalar_type()
            );
            return Err(Error::UnsupportedAttribute {
                index: binding.index,
                scalar_type: d.scalar_type(),
                component_count: d.component_count(),
            });
        }
        gl.enable_vertex_attrib_array(binding.index);
        log::trace!(
            "attribute {}: {}x{} at offset {} (stride {})",
            binding.index,
            d.component_count(),
            d.scalar_type(),
            binding.offset,
            stride
        );
    }
    Ok(())
}
