use crate::{
    config::{Config, Features, OutputParams},
    error::GenerationError,
    parser::{FunctionDescriptor, ParsedData},
};
use itertools::Itertools;
use std::io::Write;

mod declarations;
mod definitions;

pub use declarations::Declarations;
pub use definitions::Definitions;

/// Expands to the call-site parameters of an instrumented function.
pub(crate) const INFO_MACRO: &str = "GL_INFO";
/// Same as [`INFO_MACRO`], prefixed with a comma for functions that have formals.
pub(crate) const INFO_MACRO_P: &str = "GL_INFOP";
/// The per-wrapper driver error check.
pub(crate) const CHECK_MACRO: &str = "GL_CHECK";

/// One generated output file.
///
/// `generate` drives the hooks in a fixed order: `begin_file` once,
/// `write_function` once per function in input order, then `end_file`. Both
/// artifacts must see the same function order so that their contents line up.
pub trait Artifact {
    /// Render `data` into `writable`.
    fn generate(
        &mut self,
        writable: &mut dyn Write,
        data: &ParsedData,
    ) -> Result<(), GenerationError> {
        self.begin_file(writable, data)?;

        for function in &data.functions {
            self.write_function(writable, function)?;
        }

        self.end_file(writable, data)?;

        Ok(())
    }

    /// Everything that precedes the per-function section.
    fn begin_file(&mut self, _w: &mut dyn Write, _data: &ParsedData) -> Result<(), GenerationError> {
        Ok(())
    }

    fn write_function(
        &mut self,
        w: &mut dyn Write,
        function: &FunctionDescriptor,
    ) -> Result<(), GenerationError>;

    /// Everything that follows the per-function section.
    fn end_file(&mut self, _w: &mut dyn Write, _data: &ParsedData) -> Result<(), GenerationError> {
        Ok(())
    }
}

/// Settings shared by both artifacts.
#[derive(Debug, Clone)]
pub(crate) struct Common {
    pub features: Features,
    pub params: OutputParams,
}

impl Common {
    pub fn new(config: &Config) -> Self {
        Self {
            features: config.features,
            params: config.output.clone(),
        }
    }

    /// Name of the resolved function pointer for `function`.
    pub fn pointer_name(&self, function: &FunctionDescriptor) -> String {
        format!("{}{}_", self.params.symbol_prefix, function.name)
    }

    /// The driver's exported symbol for `function`.
    pub fn symbol_name(&self, function: &FunctionDescriptor) -> String {
        format!("{}{}", self.params.symbol_prefix, function.name)
    }

    /// Formal list of a prototype or wrapper definition, including the
    /// call-site parameters when instrumenting.
    pub fn parameter_list(&self, function: &FunctionDescriptor) -> String {
        let formals = formal_list(function, FormalStyle::Typed);
        match (self.features.instrumentation, function.formals.is_empty()) {
            (false, _) => formals,
            (true, true) => INFO_MACRO.to_string(),
            (true, false) => format!("{formals} {INFO_MACRO_P}"),
        }
    }

    pub fn write_version_header(&self, w: &mut dyn Write) -> std::io::Result<()> {
        if !self.params.no_version_header {
            writeln!(
                w,
                "// file automatically generated by glshim {}",
                env!("CARGO_PKG_VERSION")
            )?;
        }
        Ok(())
    }
}

/// Which parts of each formal to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FormalStyle {
    /// `GLint x, GLfloat y`
    Typed,
    /// `GLint, GLfloat`
    Types,
    /// `x, y`
    Names,
}

/// Render the formals of `function`, comma separated, in call order.
pub(crate) fn formal_list(function: &FunctionDescriptor, style: FormalStyle) -> String {
    function
        .formals
        .iter()
        .map(|formal| match style {
            FormalStyle::Typed => format!("{} {}", formal.declared_type, formal.name),
            FormalStyle::Types => formal.declared_type.clone(),
            FormalStyle::Names => formal.name.clone(),
        })
        .join(", ")
}

/// Length of the longest value of `width` over `functions`, for column alignment.
pub(crate) fn max_width<F>(functions: &[FunctionDescriptor], width: F) -> usize
where
    F: Fn(&FunctionDescriptor) -> usize,
{
    functions.iter().map(width).max().unwrap_or_default()
}
