//! Kiln engine crate.
//!
//! Owns the GPU resource lifecycle of a minimal OpenGL rendering harness:
//! shader programs, vertex layouts, buffer upload and the window/context
//! plumbing that drives a synchronous draw loop.

pub mod device;
pub mod error;
pub mod gpu;
pub mod harness;
pub mod layout;
pub mod logging;
pub mod shader;
pub mod window;

pub use error::{Error, ProgramLinkError, Result, ShaderCompileError, UnknownTypeError};
