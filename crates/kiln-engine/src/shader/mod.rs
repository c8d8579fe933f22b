//! Shader programs.
//!
//! Lifecycle: stage sources are compiled into transient [`CompiledShader`]s,
//! linked into a [`ShaderProgram`], used for drawing, then destroyed. Stage
//! objects are deleted as soon as linking finishes, whatever its outcome.

mod program;
mod stage;

pub use program::{compile, link, CompiledShader, ProgramState, ShaderProgram};
pub use stage::ShaderStage;
