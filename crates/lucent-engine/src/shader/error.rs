use thiserror::Error;

use super::value::UniformType;

/// Uniform assignment and upload failures.
///
/// None of these are fatal: the failing call is logged and has no effect.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UniformError {
    #[error("uniform `{name}`: expected {expected}, got {got}")]
    TypeMismatch {
        name: String,
        expected: UniformType,
        got: UniformType,
    },

    #[error("uniform `{name}`: cannot assign an absent value")]
    NullValue { name: String },

    #[error("uniform `{name}` has no value")]
    NotSet { name: String },

    #[error("uniform `{name}` not found in shader `{shader}`")]
    UniformNotFound { name: String, shader: String },
}

/// Shader registration failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ShaderError {
    #[error("shader `{0}` is already registered")]
    DuplicateName(String),

    #[error("shader `{shader}` declares uniform `{name}` twice")]
    DuplicateUniform { shader: String, name: String },

    #[error("shader `{shader}` uniform block needs {size} bytes (max {max})")]
    BlockTooLarge { shader: String, size: u32, max: u32 },
}
