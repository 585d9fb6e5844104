//! The core library for glshim.
//! Contains the signature parser, the primitive type table and the artifact
//! generators.
use std::path::PathBuf;
use thiserror::Error;

/// The generated header and source files
pub mod artifact;
pub mod config;
pub mod error;
/// Static extension list handling
pub mod extension;
mod generate;
/// Parsing signature files into a format the `artifact` modules can understand
pub mod parser;
pub mod spec_string;
/// The closed table of driver primitive types.
pub mod types;

pub use error::{GenerationError, ParseError};
pub use generate::{generate, validate, Artifacts};

#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum ProcessInputError {
    #[error("a parsing error occurred in {path}: {source}")]
    ParseError { path: PathBuf, source: ParseError },
    #[error("a generation error occurred: {0}")]
    GenerationError(#[from] GenerationError),
    #[error("failed to access {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },
}
