use std::ffi::{c_void, CStr};

use glow::HasContext;

use crate::gpu::UsageHint;
use crate::layout::ScalarType;
use crate::shader::ShaderStage;

use super::{BufferTarget, GlApi};

/// [`GlApi`] backed by `glow`.
///
/// Every raw GL call in the crate lives in this file. The `unsafe` blocks rely
/// on one invariant, established by [`GlowDriver::from_loader`]: the context
/// the function pointers were loaded from is current on this thread for as
/// long as the driver is used. The type is `!Send` through `glow::Context`,
/// which keeps it on that thread.
pub struct GlowDriver {
    gl: glow::Context,
}

impl GlowDriver {
    /// Loads GL function pointers through `loader`.
    ///
    /// # Safety
    /// The context `loader` resolves against must be current on the calling
    /// thread, and must stay current on it for the lifetime of the driver.
    pub unsafe fn from_loader<F>(loader: F) -> Self
    where
        F: FnMut(&CStr) -> *const c_void,
    {
        let gl = unsafe { glow::Context::from_loader_function_cstr(loader) };
        let version = gl.version();
        log::info!(
            "OpenGL {}.{} ({})",
            version.major,
            version.minor,
            version.vendor_info
        );
        Self { gl }
    }

    /// Driver-reported version of the current context.
    pub fn version(&self) -> &glow::Version {
        self.gl.version()
    }
}

impl std::fmt::Debug for GlowDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let v = self.gl.version();
        f.debug_struct("GlowDriver")
            .field("version", &(v.major, v.minor))
            .finish()
    }
}

fn usage_raw(usage: UsageHint) -> u32 {
    match usage {
        UsageHint::Static => glow::STATIC_DRAW,
        UsageHint::Dynamic => glow::DYNAMIC_DRAW,
        UsageHint::Stream => glow::STREAM_DRAW,
    }
}

impl GlApi for GlowDriver {
    type Shader = glow::NativeShader;
    type Program = glow::NativeProgram;
    type Buffer = glow::NativeBuffer;
    type VertexArray = glow::NativeVertexArray;
    type UniformLocation = glow::NativeUniformLocation;

    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, String> {
        unsafe { self.gl.create_shader(stage.raw()) }
    }

    fn shader_source(&self, shader: Self::Shader, source: &str) {
        unsafe { self.gl.shader_source(shader, source) }
    }

    fn compile_shader(&self, shader: Self::Shader) {
        unsafe { self.gl.compile_shader(shader) }
    }

    fn shader_compile_status(&self, shader: Self::Shader) -> bool {
        unsafe { self.gl.get_shader_compile_status(shader) }
    }

    fn shader_info_log(&self, shader: Self::Shader) -> String {
        unsafe { self.gl.get_shader_info_log(shader) }
    }

    fn delete_shader(&self, shader: Self::Shader) {
        unsafe { self.gl.delete_shader(shader) }
    }

    fn create_program(&self) -> Result<Self::Program, String> {
        unsafe { self.gl.create_program() }
    }

    fn attach_shader(&self, program: Self::Program, shader: Self::Shader) {
        unsafe { self.gl.attach_shader(program, shader) }
    }

    fn detach_shader(&self, program: Self::Program, shader: Self::Shader) {
        unsafe { self.gl.detach_shader(program, shader) }
    }

    fn link_program(&self, program: Self::Program) {
        unsafe { self.gl.link_program(program) }
    }

    fn program_link_status(&self, program: Self::Program) -> bool {
        unsafe { self.gl.get_program_link_status(program) }
    }

    fn program_info_log(&self, program: Self::Program) -> String {
        unsafe { self.gl.get_program_info_log(program) }
    }

    fn use_program(&self, program: Option<Self::Program>) {
        unsafe { self.gl.use_program(program) }
    }

    fn delete_program(&self, program: Self::Program) {
        unsafe { self.gl.delete_program(program) }
    }

    fn uniform_location(&self, program: Self::Program, name: &str) -> Option<Self::UniformLocation> {
        unsafe { self.gl.get_uniform_location(program, name) }
    }

    fn uniform_1_i32(&self, location: Option<&Self::UniformLocation>, value: i32) {
        unsafe { self.gl.uniform_1_i32(location, value) }
    }

    fn uniform_1_f32(&self, location: Option<&Self::UniformLocation>, value: f32) {
        unsafe { self.gl.uniform_1_f32(location, value) }
    }

    fn create_buffer(&self) -> Result<Self::Buffer, String> {
        unsafe { self.gl.create_buffer() }
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: Option<Self::Buffer>) {
        unsafe { self.gl.bind_buffer(target.raw(), buffer) }
    }

    fn buffer_data(&self, target: BufferTarget, data: &[u8], usage: UsageHint) {
        unsafe { self.gl.buffer_data_u8_slice(target.raw(), data, usage_raw(usage)) }
    }

    fn delete_buffer(&self, buffer: Self::Buffer) {
        unsafe { self.gl.delete_buffer(buffer) }
    }

    fn create_vertex_array(&self) -> Result<Self::VertexArray, String> {
        unsafe { self.gl.create_vertex_array() }
    }

    fn bind_vertex_array(&self, vertex_array: Option<Self::VertexArray>) {
        unsafe { self.gl.bind_vertex_array(vertex_array) }
    }

    fn delete_vertex_array(&self, vertex_array: Self::VertexArray) {
        unsafe { self.gl.delete_vertex_array(vertex_array) }
    }

    fn vertex_attrib_pointer(
        &self,
        index: u32,
        component_count: i32,
        scalar_type: ScalarType,
        normalized: bool,
        stride: i32,
        offset: i32,
    ) {
        unsafe {
            self.gl.vertex_attrib_pointer_f32(
                index,
                component_count,
                scalar_type.0,
                normalized,
                stride,
                offset,
            )
        }
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        unsafe { self.gl.enable_vertex_attrib_array(index) }
    }

    fn take_error(&self) -> Option<u32> {
        let code = unsafe { self.gl.get_error() };
        (code != glow::NO_ERROR).then_some(code)
    }

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        unsafe { self.gl.clear_color(r, g, b, a) }
    }

    fn clear_color_buffer(&self) {
        unsafe { self.gl.clear(glow::COLOR_BUFFER_BIT) }
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { self.gl.viewport(x, y, width, height) }
    }

    fn draw_arrays(&self, first: i32, count: i32) {
        unsafe { self.gl.draw_arrays(glow::TRIANGLES, first, count) }
    }

    fn draw_elements(&self, count: i32) {
        unsafe { self.gl.draw_elements(glow::TRIANGLES, count, glow::UNSIGNED_INT, 0) }
    }
}
