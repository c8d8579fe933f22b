//! Error taxonomy for harness setup.
//!
//! Every variant is fatal to startup: the orchestrator releases whatever was
//! already acquired and returns the error. Nothing here is retried.

use crate::layout::ScalarType;
use crate::shader::ShaderStage;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A scalar type tag with no entry in the size table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("no byte size registered for scalar type {0}")]
pub struct UnknownTypeError(pub ScalarType);

/// A shader stage that the driver refused to compile.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to compile {stage} shader: {log}")]
pub struct ShaderCompileError {
    pub stage: ShaderStage,
    /// Driver diagnostic text.
    pub log: String,
}

/// A program that the driver refused to link.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to link shader program: {log}")]
pub struct ProgramLinkError {
    /// Driver diagnostic text.
    pub log: String,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    UnknownType(#[from] UnknownTypeError),

    #[error(transparent)]
    ShaderCompile(#[from] ShaderCompileError),

    #[error(transparent)]
    ProgramLink(#[from] ProgramLinkError),

    /// The record type's in-memory size disagrees with its declared attributes.
    #[error("vertex record is {record_size} bytes but its attributes pack to {stride}")]
    LayoutMismatch { record_size: usize, stride: usize },

    /// One field of the record sits at a different offset, or has a different
    /// size, than its attribute descriptor implies.
    #[error(
        "attribute {index}: field is {field_size} bytes at offset {field_offset}, \
         descriptor expects {size} bytes at offset {offset}"
    )]
    AttributeMismatch {
        index: u32,
        field_offset: usize,
        field_size: usize,
        offset: usize,
        size: usize,
    },

    /// The driver does not accept this attribute shape.
    #[error(
        "attribute {index}: {component_count} component(s) of {scalar_type} is not a valid vertex attribute"
    )]
    UnsupportedAttribute {
        index: u32,
        scalar_type: ScalarType,
        component_count: u8,
    },

    #[error("index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },

    /// The driver could not allocate an object.
    #[error("failed to create {what}: {message}")]
    Driver { what: &'static str, message: String },

    #[error("failed to create window: {0}")]
    WindowCreation(String),

    #[error("failed to initialize graphics context: {0}")]
    ContextInit(String),

    #[error("a window has already been created by this provider")]
    WindowAlreadyCreated,
}

impl Error {
    pub(crate) fn driver(what: &'static str, message: impl Into<String>) -> Self {
        Self::Driver {
            what,
            message: message.into(),
        }
    }
}
