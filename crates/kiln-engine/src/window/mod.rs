//! Window + graphics context.
//!
//! The harness reaches the platform only through [`ContextProvider`].
//! [`GlutinProvider`] is the desktop implementation (`winit` window, `glutin`
//! OpenGL context).

mod desktop;
mod provider;

pub use desktop::{GlutinProvider, WindowHandle};
pub use provider::{ContextProvider, ResizeCallback, WindowConfig};
