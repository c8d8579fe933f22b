//! Graphics driver access.
//!
//! The engine talks to the driver only through [`GlApi`], a narrow trait over
//! the handful of OpenGL entry points the core needs. [`GlowDriver`] is the
//! production implementation; tests substitute a recording fake.

mod api;
mod glow_driver;
mod init;

#[cfg(test)]
pub(crate) mod fake;

pub use api::{BufferTarget, GlApi};
pub use glow_driver::GlowDriver;
pub use init::ContextConfig;
