use crate::args::ValueKind;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("no {file} found in '{dir}' or any parent directory")]
    WorkspaceNotFound { dir: PathBuf, file: &'static str },

    #[error("failed to read package '{path}'")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed package")]
    Malformed(#[from] serde_json::Error),

    #[error("unknown argument '{0}'")]
    UnknownArgument(String),

    #[error("argument '{name}' expects a {expected} value, got a {found}")]
    ArgumentKind {
        name: String,
        expected: ValueKind,
        found: ValueKind,
    },

    #[error("parameter '{name}' is declared as {expected} but its default is a {found}")]
    DefaultKind {
        name: String,
        expected: ValueKind,
        found: ValueKind,
    },

    #[error("missing required argument '{0}'")]
    MissingArgument(String),

    #[error("resource '{0}' is declared more than once")]
    DuplicateResource(String),

    #[error("resource '{resource}' depends on undeclared resource '{dependency}'")]
    UnknownDependency { resource: String, dependency: String },

    #[error("resource '{resource}' is conditional on '{parameter}', which is not a bool parameter")]
    InvalidCondition { resource: String, parameter: String },
}
