//! Error types for parsing and generation.
use thiserror::Error;

/// Errors that can occur while reading a signature file.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The line does not have the `type: name(formals)` shape.
    #[error("malformed signature on line {line} ({reason}): {text:?}")]
    MalformedSignature {
        /// 1-based line number.
        line: usize,
        /// The raw text of the offending line.
        text: String,
        reason: &'static str,
    },
}

/// Errors during artifact generation.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// A formal or return type is not one of the known primitive types.
    #[error("unknown type {ty:?} in function {function}")]
    UnknownType { ty: String, function: String },
    /// The signature input contained no functions.
    #[error("no functions were parsed from the signature input")]
    EmptyFunctionSet,
    /// The extension table is enabled but the extension input was empty.
    #[error("the extension table is enabled but no extensions were parsed")]
    EmptyExtensionSet,
    #[error("failed to render artifact: {0}")]
    Io(#[from] std::io::Error),
}
