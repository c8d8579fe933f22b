use crate::gpu::UsageHint;
use crate::layout::ScalarType;
use crate::shader::ShaderStage;

/// Buffer binding point.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BufferTarget {
    /// Vertex attribute data (`ARRAY_BUFFER`).
    Vertex,
    /// Element indices (`ELEMENT_ARRAY_BUFFER`).
    Index,
}

impl BufferTarget {
    #[inline]
    pub const fn raw(self) -> u32 {
        match self {
            Self::Vertex => glow::ARRAY_BUFFER,
            Self::Index => glow::ELEMENT_ARRAY_BUFFER,
        }
    }
}

/// The driver entry points used by the engine.
///
/// Calls follow OpenGL semantics: binds mutate process-wide driver state, and
/// every call must happen on the thread where the context is current.
/// Implementors uphold that; callers only keep bind-before-use ordering.
///
/// Object creation is the only fallible step the driver reports directly.
/// Compile and link outcomes are queried with the status and log calls.
pub trait GlApi {
    type Shader: Copy + Eq + std::fmt::Debug;
    type Program: Copy + Eq + std::fmt::Debug;
    type Buffer: Copy + Eq + std::fmt::Debug;
    type VertexArray: Copy + Eq + std::fmt::Debug;
    type UniformLocation;

    // ── shaders ───────────────────────────────────────────────────────────

    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, String>;
    fn shader_source(&self, shader: Self::Shader, source: &str);
    fn compile_shader(&self, shader: Self::Shader);
    fn shader_compile_status(&self, shader: Self::Shader) -> bool;
    fn shader_info_log(&self, shader: Self::Shader) -> String;
    fn delete_shader(&self, shader: Self::Shader);

    // ── programs ──────────────────────────────────────────────────────────

    fn create_program(&self) -> Result<Self::Program, String>;
    fn attach_shader(&self, program: Self::Program, shader: Self::Shader);
    fn detach_shader(&self, program: Self::Program, shader: Self::Shader);
    fn link_program(&self, program: Self::Program);
    fn program_link_status(&self, program: Self::Program) -> bool;
    fn program_info_log(&self, program: Self::Program) -> String;
    fn use_program(&self, program: Option<Self::Program>);
    fn delete_program(&self, program: Self::Program);

    /// `None` when the program has no active uniform called `name`.
    fn uniform_location(&self, program: Self::Program, name: &str) -> Option<Self::UniformLocation>;
    /// Writes to the currently used program. A `None` location is ignored.
    fn uniform_1_i32(&self, location: Option<&Self::UniformLocation>, value: i32);
    /// Writes to the currently used program. A `None` location is ignored.
    fn uniform_1_f32(&self, location: Option<&Self::UniformLocation>, value: f32);

    // ── buffers ───────────────────────────────────────────────────────────

    fn create_buffer(&self) -> Result<Self::Buffer, String>;
    fn bind_buffer(&self, target: BufferTarget, buffer: Option<Self::Buffer>);
    /// Replaces the store of the buffer bound to `target` with `data`.
    fn buffer_data(&self, target: BufferTarget, data: &[u8], usage: UsageHint);
    fn delete_buffer(&self, buffer: Self::Buffer);

    // ── vertex arrays ─────────────────────────────────────────────────────

    fn create_vertex_array(&self) -> Result<Self::VertexArray, String>;
    fn bind_vertex_array(&self, vertex_array: Option<Self::VertexArray>);
    fn delete_vertex_array(&self, vertex_array: Self::VertexArray);

    /// Points attribute `index` of the bound vertex array at the bound vertex
    /// buffer.
    fn vertex_attrib_pointer(
        &self,
        index: u32,
        component_count: i32,
        scalar_type: ScalarType,
        normalized: bool,
        stride: i32,
        offset: i32,
    );
    fn enable_vertex_attrib_array(&self, index: u32);

    // ── errors ────────────────────────────────────────────────────────────

    /// Pops one recorded error code, `None` once the queue is empty.
    fn take_error(&self) -> Option<u32>;

    // ── framebuffer + draw ────────────────────────────────────────────────

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32);
    fn clear_color_buffer(&self);
    fn viewport(&self, x: i32, y: i32, width: i32, height: i32);

    /// Non-indexed triangle list from the bound vertex array.
    fn draw_arrays(&self, first: i32, count: i32);
    /// Indexed triangle list using `u32` indices from the bound vertex array.
    fn draw_elements(&self, count: i32);
}
