//! Top-level orchestrator.
//!
//! [`run`] drives one scene through the provider call order: create window,
//! make current, load the driver, build program and mesh, loop until the
//! window asks to close, then tear down. Setup errors abort the run; whatever
//! was acquired is released by scope in reverse order (mesh, program, driver,
//! window).

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::device::{ContextConfig, GlApi};
use crate::error::Result;
use crate::gpu::{Mesh, VertexSet};
use crate::layout::VertexRecord;
use crate::shader::ShaderProgram;
use crate::window::{ContextProvider, WindowConfig};

/// Harness configuration.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    pub window: WindowConfig,
    pub context: ContextConfig,
    /// RGBA clear color, each channel in `[0, 1]`.
    pub clear_color: [f32; 4],
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            context: ContextConfig::default(),
            clear_color: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

/// What to draw: one program and one mesh.
#[derive(Debug, Clone)]
pub struct Scene<'a, V: VertexRecord> {
    pub vertex_shader: &'a str,
    pub fragment_shader: &'a str,
    pub vertices: VertexSet<V>,
}

/// Per-frame timing handed to the frame callback.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameInfo {
    /// Zero-based frame number.
    pub index: u64,
    /// Time since the loop started.
    pub elapsed: Duration,
}

// Destroys the window when setup fails or the loop ends.
struct WindowGuard<'p, P: ContextProvider> {
    provider: &'p mut P,
    window: P::Window,
}

impl<P: ContextProvider> Drop for WindowGuard<'_, P> {
    fn drop(&mut self) {
        self.provider.destroy_window(self.window);
    }
}

/// Runs `scene` until the window is closed. Returns the number of frames drawn.
///
/// `on_frame` is called once per frame after the program is activated and
/// before the draw, so it can write per-frame uniforms.
pub fn run<P, V, F>(provider: &mut P, config: &HarnessConfig, scene: &Scene<'_, V>, mut on_frame: F) -> Result<u64>
where
    P: ContextProvider,
    V: VertexRecord,
    F: FnMut(&ShaderProgram<'_, P::Gl>, FrameInfo),
{
    let window = provider.create_window(&config.window, &config.context)?;
    let mut guard = WindowGuard { provider, window };

    guard.provider.make_context_current(window)?;
    let gl = guard.provider.load_gl(window)?;

    let pending_resize: Rc<Cell<Option<(u32, u32)>>> = Rc::default();
    {
        let pending = Rc::clone(&pending_resize);
        guard
            .provider
            .set_resize_callback(window, Box::new(move |w, h| pending.set(Some((w, h)))));
    }

    let program = ShaderProgram::from_sources(&gl, scene.vertex_shader, scene.fragment_shader)?;
    let mesh = Mesh::upload(&gl, &scene.vertices)?;

    let (width, height) = guard.provider.framebuffer_size(window);
    set_viewport(&gl, width, height);
    let [r, g, b, a] = config.clear_color;
    gl.clear_color(r, g, b, a);

    log::info!("entering draw loop");
    let started = Instant::now();
    let mut frames = 0u64;

    while !guard.provider.should_close(window) {
        gl.clear_color_buffer();
        program.use_program();
        on_frame(
            &program,
            FrameInfo {
                index: frames,
                elapsed: started.elapsed(),
            },
        );
        mesh.draw();
        guard.provider.swap_buffers(window);
        guard.provider.poll_events();

        if let Some((w, h)) = pending_resize.take() {
            log::debug!("framebuffer resized to {w}x{h}");
            set_viewport(&gl, w, h);
        }
        frames += 1;
    }

    log::info!("draw loop finished after {frames} frames");
    Ok(frames)
}

fn set_viewport<G: GlApi>(gl: &G, width: u32, height: u32) {
    let clamp = |v: u32| i32::try_from(v).unwrap_or(i32::MAX);
    gl.viewport(0, 0, clamp(width), clamp(height));
}
