use crate::device::GlApi;
use crate::error::{Error, ProgramLinkError, ShaderCompileError};

use super::ShaderStage;

/// A successfully compiled stage, alive only until it is linked.
///
/// Deletes its driver object on drop.
pub struct CompiledShader<'gl, G: GlApi> {
    gl: &'gl G,
    handle: G::Shader,
    stage: ShaderStage,
}

impl<'gl, G: GlApi> CompiledShader<'gl, G> {
    #[inline]
    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    #[inline]
    pub fn handle(&self) -> G::Shader {
        self.handle
    }
}

impl<G: GlApi> Drop for CompiledShader<'_, G> {
    fn drop(&mut self) {
        self.gl.delete_shader(self.handle);
        log::trace!("deleted {} shader {:?}", self.stage, self.handle);
    }
}

impl<G: GlApi> std::fmt::Debug for CompiledShader<'_, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledShader")
            .field("stage", &self.stage)
            .field("handle", &self.handle)
            .finish()
    }
}

/// Compiles `source` for `stage`.
///
/// On failure the error carries the stage and the driver's diagnostic log, and
/// the shader object has already been deleted.
pub fn compile<'gl, G: GlApi>(
    gl: &'gl G,
    stage: ShaderStage,
    source: &str,
) -> Result<CompiledShader<'gl, G>, ShaderCompileError> {
    let handle = gl
        .create_shader(stage)
        .map_err(|message| ShaderCompileError { stage, log: message })?;
    let shader = CompiledShader { gl, handle, stage };

    gl.shader_source(handle, source);
    gl.compile_shader(handle);

    if !gl.shader_compile_status(handle) {
        let log = diagnostic(gl.shader_info_log(handle));
        return Err(ShaderCompileError { stage, log });
    }

    log::debug!("compiled {stage} shader {handle:?}");
    Ok(shader)
}

/// Links `shaders` into a new program.
///
/// Consumes the stage objects: they are detached and deleted before this
/// returns, on success and on failure alike.
pub fn link<'gl, G, I>(gl: &'gl G, shaders: I) -> Result<ShaderProgram<'gl, G>, ProgramLinkError>
where
    G: GlApi,
    I: IntoIterator<Item = CompiledShader<'gl, G>>,
{
    let shaders: Vec<CompiledShader<'gl, G>> = shaders.into_iter().collect();

    let handle = gl
        .create_program()
        .map_err(|message| ProgramLinkError { log: message })?;
    // Owns the handle from here; an early return deletes it.
    let program = ShaderProgram {
        gl,
        handle: Some(handle),
    };

    for shader in &shaders {
        gl.attach_shader(handle, shader.handle);
    }
    gl.link_program(handle);
    for shader in &shaders {
        gl.detach_shader(handle, shader.handle);
    }
    drop(shaders);

    if !gl.program_link_status(handle) {
        let log = diagnostic(gl.program_info_log(handle));
        return Err(ProgramLinkError { log });
    }

    log::debug!("linked shader program {handle:?}");
    Ok(program)
}

// Some drivers report failure with an empty log.
fn diagnostic(log: String) -> String {
    let trimmed = log.trim_end();
    if trimmed.is_empty() {
        "driver reported no diagnostics".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Observable lifecycle state of a [`ShaderProgram`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ProgramState {
    Linked,
    Destroyed,
}

/// A linked shader program.
///
/// Owns its driver handle and releases it exactly once, either through
/// [`destroy`](Self::destroy) or on drop.
///
/// The `set_uniform_*` methods make this program the current one and leave it
/// current afterwards. Code that draws with another program must call that
/// program's [`use_program`](Self::use_program) again after writing uniforms
/// here.
pub struct ShaderProgram<'gl, G: GlApi> {
    gl: &'gl G,
    handle: Option<G::Program>,
}

impl<'gl, G: GlApi> ShaderProgram<'gl, G> {
    /// Compiles a vertex and a fragment stage and links them.
    ///
    /// Returns the first failure. Nothing created along the way outlives the
    /// call when it fails.
    pub fn from_sources(gl: &'gl G, vertex_source: &str, fragment_source: &str) -> Result<Self, Error> {
        let vertex = compile(gl, ShaderStage::Vertex, vertex_source)?;
        let fragment = compile(gl, ShaderStage::Fragment, fragment_source)?;
        Ok(link(gl, [vertex, fragment])?)
    }

    pub fn state(&self) -> ProgramState {
        match self.handle {
            Some(_) => ProgramState::Linked,
            None => ProgramState::Destroyed,
        }
    }

    #[inline]
    pub fn handle(&self) -> Option<G::Program> {
        self.handle
    }

    /// Makes this the program used by subsequent draw calls.
    pub fn use_program(&self) {
        let Some(handle) = self.live("use_program") else { return };
        self.gl.use_program(Some(handle));
    }

    /// Writes an `int` uniform.
    ///
    /// Makes this program current and leaves it current; uniform writes
    /// target the program in use. A name with no active uniform is silently
    /// ignored.
    pub fn set_uniform_i32(&self, name: &str, value: i32) {
        let Some(handle) = self.live("set_uniform_i32") else { return };
        self.gl.use_program(Some(handle));
        let location = self.gl.uniform_location(handle, name);
        self.gl.uniform_1_i32(location.as_ref(), value);
    }

    /// Writes a `float` uniform. Same activation and missing-name rules as
    /// [`set_uniform_i32`](Self::set_uniform_i32).
    pub fn set_uniform_f32(&self, name: &str, value: f32) {
        let Some(handle) = self.live("set_uniform_f32") else { return };
        self.gl.use_program(Some(handle));
        let location = self.gl.uniform_location(handle, name);
        self.gl.uniform_1_f32(location.as_ref(), value);
    }

    /// Writes a `bool` uniform as `0` / `1`. Leaves this program current.
    pub fn set_uniform_bool(&self, name: &str, value: bool) {
        self.set_uniform_i32(name, i32::from(value));
    }

    /// Releases the program. Later calls, including a second `destroy`, do
    /// nothing.
    pub fn destroy(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.gl.delete_program(handle);
            log::debug!("deleted shader program {handle:?}");
        }
    }

    fn live(&self, op: &str) -> Option<G::Program> {
        if self.handle.is_none() {
            log::warn!("{op} called on a destroyed shader program; ignored");
        }
        self.handle
    }
}

impl<G: GlApi> Drop for ShaderProgram<'_, G> {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl<G: GlApi> std::fmt::Debug for ShaderProgram<'_, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShaderProgram")
            .field("handle", &self.handle)
            .finish()
    }
}
