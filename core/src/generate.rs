//! The generation pipeline: validate the parsed inputs, then render both
//! artifacts into memory.
use crate::{
    artifact::{Artifact, Declarations, Definitions},
    config::Config,
    error::GenerationError,
    parser::{FunctionDescriptor, ParsedData},
    spec_string,
    types::DeclaredType,
};
use log::{info, warn};

/// Functions the generated `init` calls unconditionally.
const INIT_FUNCTIONS: [&str; 2] = ["GetIntegerv", "GetStringi"];
/// Function the generated debug check calls.
const CHECK_FUNCTION: &str = "GetError";

/// Both rendered artifacts of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    pub declarations: Vec<u8>,
    pub definitions: Vec<u8>,
}

/// Validate `data` and render both artifacts.
///
/// Nothing is rendered unless validation passes, and either both artifacts
/// are returned or neither is.
pub fn generate(config: &Config, data: &ParsedData) -> Result<Artifacts, GenerationError> {
    validate(config, data)?;

    info!(
        "Generating bindings for {} functions and {} extensions",
        data.functions.len(),
        data.extensions.len()
    );

    let mut declarations = Vec::new();
    Declarations::new(config).generate(&mut declarations, data)?;

    let mut definitions = Vec::new();
    Definitions::new(config).generate(&mut definitions, data)?;

    Ok(Artifacts {
        declarations,
        definitions,
    })
}

/// Check everything the emitters rely on.
pub fn validate(config: &Config, data: &ParsedData) -> Result<(), GenerationError> {
    if data.functions.is_empty() {
        return Err(GenerationError::EmptyFunctionSet);
    }
    if config.features.extension_table && data.extensions.is_empty() {
        return Err(GenerationError::EmptyExtensionSet);
    }

    for function in &data.functions {
        validate_types(function)?;
    }

    for name in INIT_FUNCTIONS {
        warn_if_missing(data, name, "init");
    }
    if config.features.instrumentation {
        warn_if_missing(data, CHECK_FUNCTION, "the debug check");
    }

    Ok(())
}

/// Formals first, then the return type.
fn validate_types(function: &FunctionDescriptor) -> Result<(), GenerationError> {
    spec_string::encode(function)?;

    match DeclaredType::new(&function.return_type).resolve() {
        Some(_) => Ok(()),
        None => Err(GenerationError::UnknownType {
            ty: function.return_type.clone(),
            function: function.name.clone(),
        }),
    }
}

/// The generated code still refers to `name`, so the host build has to
/// provide its pointer some other way.
fn warn_if_missing(data: &ParsedData, name: &str, needed_by: &str) {
    if data.function(name).is_none() {
        warn!("{name} is not declared in the signature input but is called by {needed_by}");
    }
}
