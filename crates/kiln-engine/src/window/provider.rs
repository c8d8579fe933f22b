use crate::device::{ContextConfig, GlApi};
use crate::error::Result;

/// Receives the new framebuffer size in physical pixels.
pub type ResizeCallback = Box<dyn FnMut(u32, u32)>;

/// Window creation parameters.
#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub title: String,
    /// Initial inner width in logical pixels.
    pub width: u32,
    /// Initial inner height in logical pixels.
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "kiln".to_string(),
            width: 640,
            height: 480,
        }
    }
}

/// Platform window and graphics context source.
///
/// Expected call order: `create_window`, `make_context_current`, `load_gl`,
/// then per frame `should_close`, `swap_buffers`, `poll_events`, and finally
/// `destroy_window`. Everything runs on the thread that created the provider.
///
/// A provider owns at most one window over its whole lifetime; a second
/// `create_window` fails with [`Error::WindowAlreadyCreated`](crate::Error::WindowAlreadyCreated),
/// even after the first window was destroyed.
pub trait ContextProvider {
    type Window: Copy + Eq + std::fmt::Debug;
    type Gl: GlApi;

    fn create_window(&mut self, window: &WindowConfig, context: &ContextConfig) -> Result<Self::Window>;

    fn make_context_current(&mut self, window: Self::Window) -> Result<()>;

    /// Builds a driver for the window's context. The context must be current.
    fn load_gl(&mut self, window: Self::Window) -> Result<Self::Gl>;

    /// Drawable size in physical pixels.
    fn framebuffer_size(&self, window: Self::Window) -> (u32, u32);

    fn should_close(&self, window: Self::Window) -> bool;

    fn swap_buffers(&mut self, window: Self::Window);

    /// Processes pending platform events without blocking.
    fn poll_events(&mut self);

    /// Replaces any earlier callback. Invoked from `poll_events`.
    fn set_resize_callback(&mut self, window: Self::Window, callback: ResizeCallback);

    fn destroy_window(&mut self, window: Self::Window);
}
