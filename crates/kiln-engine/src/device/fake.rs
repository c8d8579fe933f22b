//! Recording in-memory driver for tests.
//!
//! Models just enough OpenGL behavior to exercise the engine without a
//! context: compile and link outcomes, active uniforms, buffer stores, vertex
//! array attribute state, binding points and object lifetimes. Misuse that a
//! real driver would tolerate silently (double deletes, touching deleted
//! objects) is collected in `faults` so tests can assert it never happens.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::rc::Rc;

use crate::gpu::UsageHint;
use crate::layout::ScalarType;
use crate::shader::ShaderStage;

use super::{BufferTarget, GlApi};

pub(crate) const VERTEX_SRC: &str = "\
#version 330 core
layout (location = 0) in vec3 aPos;
layout (location = 1) in vec3 aColor;
uniform float uTime;
out vec3 vColor;
void main() {
    gl_Position = vec4(aPos, 1.0);
    vColor = aColor;
}
";

pub(crate) const FRAGMENT_SRC: &str = "\
#version 330 core
in vec3 vColor;
uniform int uMode;
uniform bool uEnabled;
out vec4 FragColor;
void main() {
    FragColor = vec4(vColor, 1.0);
}
";

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    UseProgram(Option<u32>),
    BindVertexArray(Option<u32>),
    BindBuffer(BufferTarget, Option<u32>),
    BufferData(BufferTarget, usize, UsageHint),
    AttribPointer(u32),
    EnableAttrib(u32),
    DeleteShader(u32),
    DeleteProgram(u32),
    DeleteBuffer(u32),
    DeleteVertexArray(u32),
    ClearColor,
    Clear,
    Viewport(i32, i32, i32, i32),
    DrawArrays(i32, i32),
    DrawElements(i32),
    /// Marker pushed by test doubles outside the driver (e.g. a fake window).
    Note(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum UniformValue {
    I32(i32),
    F32(f32),
}

/// Attribute slot state as a driver would report it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct AttribState {
    pub component_count: i32,
    pub scalar_type: ScalarType,
    pub normalized: bool,
    pub stride: i32,
    pub offset: i32,
    pub buffer: Option<u32>,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FakeLocation {
    program: u32,
    name: String,
}

struct FakeShader {
    stage: ShaderStage,
    source: String,
    compiled: bool,
    log: String,
}

#[derive(Default)]
struct FakeProgram {
    attached: Vec<u32>,
    linked: bool,
    log: String,
    active_uniforms: Vec<String>,
}

#[derive(Default)]
struct FakeVertexArray {
    attribs: BTreeMap<u32, AttribState>,
    element_buffer: Option<u32>,
}

#[derive(Default)]
struct State {
    next_id: u32,
    calls: Vec<Call>,
    faults: Vec<String>,
    fail_next: Option<&'static str>,

    shaders: HashMap<u32, FakeShader>,
    programs: HashMap<u32, FakeProgram>,
    buffers: HashMap<u32, Vec<u8>>,
    vertex_arrays: HashMap<u32, FakeVertexArray>,

    created: HashMap<&'static str, usize>,
    deleted: HashMap<&'static str, usize>,

    current_program: Option<u32>,
    bound_vertex_array: Option<u32>,
    bound_buffers: HashMap<BufferTarget, u32>,
    uniforms: HashMap<(u32, String), UniformValue>,

    /// Context version; `None` is the default 3.3 core context.
    version: Option<(u32, u32)>,
    errors: VecDeque<u32>,
}

impl State {
    fn create(&mut self, kind: &'static str) -> Result<u32, String> {
        if self.fail_next == Some(kind) {
            self.fail_next = None;
            return Err(format!("out of {kind} objects"));
        }
        self.next_id += 1;
        *self.created.entry(kind).or_default() += 1;
        Ok(self.next_id)
    }

    fn record_delete(&mut self, kind: &'static str) {
        *self.deleted.entry(kind).or_default() += 1;
    }

    fn fault(&mut self, message: String) {
        self.faults.push(message);
    }

    fn version(&self) -> (u32, u32) {
        self.version.unwrap_or((3, 3))
    }

    // Mirrors the glVertexAttribPointer error table: type enums newer than
    // the context are INVALID_ENUM, packed types with the wrong size are
    // INVALID_OPERATION.
    fn attrib_pointer_error(&self, component_count: i32, scalar_type: ScalarType) -> Option<u32> {
        if !(1..=4).contains(&component_count) {
            return Some(glow::INVALID_VALUE);
        }
        let (since, arity) = match scalar_type {
            ScalarType::FIXED => ((4, 1), None),
            ScalarType::INT_2_10_10_10_REV | ScalarType::UNSIGNED_INT_2_10_10_10_REV => ((3, 3), Some(4)),
            ScalarType::UNSIGNED_INT_10F_11F_11F_REV => ((4, 4), Some(3)),
            other if other.size_of().is_ok() => ((2, 0), None),
            _ => return Some(glow::INVALID_ENUM),
        };
        if self.version() < since {
            return Some(glow::INVALID_ENUM);
        }
        match arity {
            Some(n) if component_count != n => Some(glow::INVALID_OPERATION),
            _ => None,
        }
    }
}

/// Cloning shares state, so a test can keep a handle for inspection after
/// giving the driver away.
#[derive(Clone, Default)]
pub(crate) struct FakeGl {
    state: Rc<RefCell<State>>,
}

impl FakeGl {
    pub fn new() -> Self {
        Self::default()
    }

    /// A driver for a context of the given version instead of 3.3.
    pub fn with_version(major: u32, minor: u32) -> Self {
        let gl = Self::default();
        gl.state.borrow_mut().version = Some((major, minor));
        gl
    }

    /// Queues an error code as if an earlier call had raised it.
    pub fn raise(&self, code: u32) {
        self.state.borrow_mut().errors.push_back(code);
    }

    pub fn pending_errors(&self) -> usize {
        self.state.borrow().errors.len()
    }

    /// Makes the next `create_*` of `kind` ("shader", "program", "buffer",
    /// "vertex array") fail.
    pub fn fail_next_create(&self, kind: &'static str) {
        self.state.borrow_mut().fail_next = Some(kind);
    }

    pub fn note(&self, marker: &'static str) {
        self.state.borrow_mut().calls.push(Call::Note(marker));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    pub fn faults(&self) -> Vec<String> {
        self.state.borrow().faults.clone()
    }

    pub fn created(&self, kind: &'static str) -> usize {
        self.state.borrow().created.get(kind).copied().unwrap_or(0)
    }

    pub fn deleted(&self, kind: &'static str) -> usize {
        self.state.borrow().deleted.get(kind).copied().unwrap_or(0)
    }

    pub fn shaders_created(&self) -> usize {
        self.created("shader")
    }

    pub fn shaders_deleted(&self) -> usize {
        self.deleted("shader")
    }

    pub fn programs_created(&self) -> usize {
        self.created("program")
    }

    pub fn programs_deleted(&self) -> usize {
        self.deleted("program")
    }

    pub fn live_shaders(&self) -> usize {
        self.state.borrow().shaders.len()
    }

    /// Shader, program, buffer and vertex array objects not yet deleted.
    pub fn live_objects(&self) -> usize {
        let s = self.state.borrow();
        s.shaders.len() + s.programs.len() + s.buffers.len() + s.vertex_arrays.len()
    }

    pub fn current_program(&self) -> Option<u32> {
        self.state.borrow().current_program
    }

    pub fn uniform(&self, program: u32, name: &str) -> Option<UniformValue> {
        self.state
            .borrow()
            .uniforms
            .get(&(program, name.to_string()))
            .copied()
    }

    pub fn attrib(&self, vertex_array: u32, index: u32) -> Option<AttribState> {
        self.state
            .borrow()
            .vertex_arrays
            .get(&vertex_array)
            .and_then(|vao| vao.attribs.get(&index).copied())
    }

    pub fn element_buffer(&self, vertex_array: u32) -> Option<u32> {
        self.state
            .borrow()
            .vertex_arrays
            .get(&vertex_array)
            .and_then(|vao| vao.element_buffer)
    }

    pub fn buffer_contents(&self, buffer: u32) -> Option<Vec<u8>> {
        self.state.borrow().buffers.get(&buffer).cloned()
    }
}

// A source "compiles" when it has a version line, a main function and
// balanced braces. Good enough to tell intact sources from broken ones.
fn check_source(source: &str) -> Result<(), String> {
    if !source.trim_start().starts_with("#version") {
        return Err("0:1(1): error: #version directive required".to_string());
    }
    if !source.contains("void main") {
        return Err("0:0(0): error: main function not defined".to_string());
    }
    let opens = source.matches('{').count();
    let closes = source.matches('}').count();
    if opens != closes {
        let line = source.lines().count();
        return Err(format!("0:{line}(1): error: syntax error, unexpected end of file"));
    }
    Ok(())
}

fn declared_uniforms(source: &str) -> impl Iterator<Item = String> + '_ {
    source.lines().filter_map(|line| {
        let mut words = line.trim().trim_end_matches(';').split_whitespace();
        match (words.next(), words.next(), words.next()) {
            (Some("uniform"), Some(_ty), Some(name)) => Some(name.to_string()),
            _ => None,
        }
    })
}

impl GlApi for FakeGl {
    type Shader = u32;
    type Program = u32;
    type Buffer = u32;
    type VertexArray = u32;
    type UniformLocation = FakeLocation;

    fn create_shader(&self, stage: ShaderStage) -> Result<u32, String> {
        let mut s = self.state.borrow_mut();
        let id = s.create("shader")?;
        s.shaders.insert(
            id,
            FakeShader {
                stage,
                source: String::new(),
                compiled: false,
                log: String::new(),
            },
        );
        Ok(id)
    }

    fn shader_source(&self, shader: u32, source: &str) {
        let mut s = self.state.borrow_mut();
        match s.shaders.get_mut(&shader) {
            Some(sh) => sh.source = source.to_string(),
            None => s.fault(format!("shader_source on unknown shader {shader}")),
        }
    }

    fn compile_shader(&self, shader: u32) {
        let mut s = self.state.borrow_mut();
        match s.shaders.get_mut(&shader) {
            Some(sh) => match check_source(&sh.source) {
                Ok(()) => {
                    sh.compiled = true;
                    sh.log.clear();
                }
                Err(log) => {
                    sh.compiled = false;
                    sh.log = log;
                }
            },
            None => s.fault(format!("compile_shader on unknown shader {shader}")),
        }
    }

    fn shader_compile_status(&self, shader: u32) -> bool {
        self.state
            .borrow()
            .shaders
            .get(&shader)
            .is_some_and(|sh| sh.compiled)
    }

    fn shader_info_log(&self, shader: u32) -> String {
        self.state
            .borrow()
            .shaders
            .get(&shader)
            .map(|sh| sh.log.clone())
            .unwrap_or_default()
    }

    fn delete_shader(&self, shader: u32) {
        let mut s = self.state.borrow_mut();
        s.calls.push(Call::DeleteShader(shader));
        if s.shaders.remove(&shader).is_none() {
            s.fault(format!("delete of unknown shader {shader}"));
            return;
        }
        s.record_delete("shader");
    }

    fn create_program(&self) -> Result<u32, String> {
        let mut s = self.state.borrow_mut();
        let id = s.create("program")?;
        s.programs.insert(id, FakeProgram::default());
        Ok(id)
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        let mut s = self.state.borrow_mut();
        if !s.shaders.contains_key(&shader) {
            s.fault(format!("attach of unknown shader {shader}"));
            return;
        }
        match s.programs.get_mut(&program) {
            Some(p) => p.attached.push(shader),
            None => s.fault(format!("attach to unknown program {program}")),
        }
    }

    fn detach_shader(&self, program: u32, shader: u32) {
        let mut s = self.state.borrow_mut();
        match s.programs.get_mut(&program) {
            Some(p) => p.attached.retain(|&a| a != shader),
            None => s.fault(format!("detach from unknown program {program}")),
        }
    }

    fn link_program(&self, program: u32) {
        let mut guard = self.state.borrow_mut();
        let s = &mut *guard;
        let Some(p) = s.programs.get_mut(&program) else {
            s.fault(format!("link of unknown program {program}"));
            return;
        };

        let stages: Vec<&FakeShader> = p.attached.iter().filter_map(|id| s.shaders.get(id)).collect();
        let count = |stage| stages.iter().filter(|sh| sh.stage == stage).count();

        let outcome = if stages.iter().any(|sh| !sh.compiled) {
            Err("error: linking with uncompiled shader".to_string())
        } else if count(ShaderStage::Vertex) != 1 {
            Err(format!(
                "error: program requires exactly one vertex shader, found {}",
                count(ShaderStage::Vertex)
            ))
        } else if count(ShaderStage::Fragment) != 1 {
            Err(format!(
                "error: program requires exactly one fragment shader, found {}",
                count(ShaderStage::Fragment)
            ))
        } else {
            Ok(stages
                .iter()
                .flat_map(|sh| declared_uniforms(&sh.source))
                .collect::<Vec<_>>())
        };

        match outcome {
            Ok(uniforms) => {
                p.linked = true;
                p.log.clear();
                p.active_uniforms = uniforms;
            }
            Err(log) => {
                p.linked = false;
                p.log = log;
                p.active_uniforms.clear();
            }
        }
    }

    fn program_link_status(&self, program: u32) -> bool {
        self.state
            .borrow()
            .programs
            .get(&program)
            .is_some_and(|p| p.linked)
    }

    fn program_info_log(&self, program: u32) -> String {
        self.state
            .borrow()
            .programs
            .get(&program)
            .map(|p| p.log.clone())
            .unwrap_or_default()
    }

    fn use_program(&self, program: Option<u32>) {
        let mut s = self.state.borrow_mut();
        s.calls.push(Call::UseProgram(program));
        if let Some(id) = program {
            if !s.programs.get(&id).is_some_and(|p| p.linked) {
                s.fault(format!("use of unlinked or deleted program {id}"));
                return;
            }
        }
        s.current_program = program;
    }

    fn delete_program(&self, program: u32) {
        let mut s = self.state.borrow_mut();
        s.calls.push(Call::DeleteProgram(program));
        if s.programs.remove(&program).is_none() {
            s.fault(format!("delete of unknown program {program}"));
            return;
        }
        s.record_delete("program");
        if s.current_program == Some(program) {
            s.current_program = None;
        }
    }

    fn uniform_location(&self, program: u32, name: &str) -> Option<FakeLocation> {
        let s = self.state.borrow();
        let p = s.programs.get(&program)?;
        p.active_uniforms
            .iter()
            .any(|u| u == name)
            .then(|| FakeLocation {
                program,
                name: name.to_string(),
            })
    }

    fn uniform_1_i32(&self, location: Option<&FakeLocation>, value: i32) {
        self.write_uniform(location, UniformValue::I32(value));
    }

    fn uniform_1_f32(&self, location: Option<&FakeLocation>, value: f32) {
        self.write_uniform(location, UniformValue::F32(value));
    }

    fn create_buffer(&self) -> Result<u32, String> {
        let mut s = self.state.borrow_mut();
        let id = s.create("buffer")?;
        s.buffers.insert(id, Vec::new());
        Ok(id)
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: Option<u32>) {
        let mut guard = self.state.borrow_mut();
        let s = &mut *guard;
        s.calls.push(Call::BindBuffer(target, buffer));
        if let Some(id) = buffer {
            if !s.buffers.contains_key(&id) {
                s.fault(format!("bind of unknown buffer {id}"));
                return;
            }
        }
        match buffer {
            Some(id) => s.bound_buffers.insert(target, id),
            None => s.bound_buffers.remove(&target),
        };
        // The element binding is vertex array state.
        if target == BufferTarget::Index {
            if let Some(vao) = s.bound_vertex_array.and_then(|id| s.vertex_arrays.get_mut(&id)) {
                vao.element_buffer = buffer;
            }
        }
    }

    fn buffer_data(&self, target: BufferTarget, data: &[u8], usage: UsageHint) {
        let mut s = self.state.borrow_mut();
        s.calls.push(Call::BufferData(target, data.len(), usage));
        let Some(id) = s.bound_buffers.get(&target).copied() else {
            s.fault(format!("buffer_data with nothing bound to {target:?}"));
            return;
        };
        if let Some(store) = s.buffers.get_mut(&id) {
            *store = data.to_vec();
        }
    }

    fn delete_buffer(&self, buffer: u32) {
        let mut s = self.state.borrow_mut();
        s.calls.push(Call::DeleteBuffer(buffer));
        if s.buffers.remove(&buffer).is_none() {
            s.fault(format!("delete of unknown buffer {buffer}"));
            return;
        }
        s.record_delete("buffer");
        s.bound_buffers.retain(|_, bound| *bound != buffer);
    }

    fn create_vertex_array(&self) -> Result<u32, String> {
        let mut s = self.state.borrow_mut();
        let id = s.create("vertex array")?;
        s.vertex_arrays.insert(id, FakeVertexArray::default());
        Ok(id)
    }

    fn bind_vertex_array(&self, vertex_array: Option<u32>) {
        let mut s = self.state.borrow_mut();
        s.calls.push(Call::BindVertexArray(vertex_array));
        if let Some(id) = vertex_array {
            if !s.vertex_arrays.contains_key(&id) {
                s.fault(format!("bind of unknown vertex array {id}"));
                return;
            }
        }
        s.bound_vertex_array = vertex_array;
    }

    fn delete_vertex_array(&self, vertex_array: u32) {
        let mut s = self.state.borrow_mut();
        s.calls.push(Call::DeleteVertexArray(vertex_array));
        if s.vertex_arrays.remove(&vertex_array).is_none() {
            s.fault(format!("delete of unknown vertex array {vertex_array}"));
            return;
        }
        s.record_delete("vertex array");
        if s.bound_vertex_array == Some(vertex_array) {
            s.bound_vertex_array = None;
        }
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
        let mut guard = self.state.borrow_mut();
        let s = &mut *guard;
        s.calls.push(Call::AttribPointer(index));
        if let Some(code) = s.attrib_pointer_error(component_count, scalar_type) {
            s.errors.push_back(code);
            return;
        }
        let buffer = s.bound_buffers.get(&BufferTarget::Vertex).copied();
        let Some(vao) = s.bound_vertex_array.and_then(|id| s.vertex_arrays.get_mut(&id)) else {
            s.faults.push(format!("attribute {index} set with no vertex array bound"));
            return;
        };
        let enabled = vao.attribs.get(&index).is_some_and(|a| a.enabled);
        vao.attribs.insert(
            index,
            AttribState {
                component_count,
                scalar_type,
                normalized,
                stride,
                offset,
                buffer,
                enabled,
            },
        );
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        let mut guard = self.state.borrow_mut();
        let s = &mut *guard;
        s.calls.push(Call::EnableAttrib(index));
        let Some(vao) = s.bound_vertex_array.and_then(|id| s.vertex_arrays.get_mut(&id)) else {
            s.faults.push(format!("attribute {index} enabled with no vertex array bound"));
            return;
        };
        match vao.attribs.get_mut(&index) {
            Some(a) => a.enabled = true,
            None => s.faults.push(format!("attribute {index} enabled before it was set")),
        }
    }

    fn take_error(&self) -> Option<u32> {
        self.state.borrow_mut().errors.pop_front()
    }

    fn clear_color(&self, _r: f32, _g: f32, _b: f32, _a: f32) {
        self.state.borrow_mut().calls.push(Call::ClearColor);
    }

    fn clear_color_buffer(&self) {
        self.state.borrow_mut().calls.push(Call::Clear);
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        self.state
            .borrow_mut()
            .calls
            .push(Call::Viewport(x, y, width, height));
    }

    fn draw_arrays(&self, first: i32, count: i32) {
        let mut s = self.state.borrow_mut();
        s.calls.push(Call::DrawArrays(first, count));
        if s.current_program.is_none() || s.bound_vertex_array.is_none() {
            s.fault("draw_arrays without program and vertex array".to_string());
        }
    }

    fn draw_elements(&self, count: i32) {
        let mut s = self.state.borrow_mut();
        s.calls.push(Call::DrawElements(count));
        let has_elements = s
            .bound_vertex_array
            .and_then(|id| s.vertex_arrays.get(&id))
            .is_some_and(|vao| vao.element_buffer.is_some());
        if s.current_program.is_none() || !has_elements {
            s.fault("draw_elements without program and element buffer".to_string());
        }
    }
}

impl FakeGl {
    fn write_uniform(&self, location: Option<&FakeLocation>, value: UniformValue) {
        let Some(location) = location else { return };
        let mut s = self.state.borrow_mut();
        if s.current_program != Some(location.program) {
            s.fault(format!(
                "uniform {} written while program {} is not in use",
                location.name, location.program
            ));
            return;
        }
        s.uniforms
            .insert((location.program, location.name.clone()), value);
    }
}
