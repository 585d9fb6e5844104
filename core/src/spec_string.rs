//! Spec strings describe how the generated debug check pulls each argument
//! back out of its variadic argument list.
//!
//! One spec character is emitted per formal. A pointer formal is emitted as
//! the [`POINTER_MARKER`] followed by the spec character of its pointee, so
//! the decoder consumes those two characters together.
use crate::error::GenerationError;
use crate::parser::FunctionDescriptor;
use crate::types::{DeclaredType, PrimitiveType, POINTER_MARKER};
use log::debug;
use std::fmt::{self, Display};

/// The encoded argument layout of a single function.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SpecString(String);

impl SpecString {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// An empty spec string describes a function without formals.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn push(&mut self, ty: PrimitiveType) {
        self.0.push(ty.spec());
    }

    fn push_pointer(&mut self, pointee: PrimitiveType) {
        self.0.push(POINTER_MARKER);
        self.0.push(pointee.spec());
    }
}

impl Display for SpecString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Encode the formals of `function`.
pub fn encode(function: &FunctionDescriptor) -> Result<SpecString, GenerationError> {
    let mut spec = SpecString::default();

    for formal in &function.formals {
        let declared = DeclaredType::new(&formal.declared_type);
        let ty = declared
            .resolve()
            .ok_or_else(|| GenerationError::UnknownType {
                ty: formal.declared_type.clone(),
                function: function.name.clone(),
            })?;

        match declared.pointers {
            0 => spec.push(ty),
            _ => spec.push_pointer(ty),
        }
    }

    debug!("Spec string for {}: {:?}", function.name, spec.as_str());
    Ok(spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_line;

    fn encode_line(line: &str) -> Result<SpecString, GenerationError> {
        encode(&parse_line(1, line).unwrap())
    }

    fn spec_of(ty: PrimitiveType) -> String {
        ty.spec().to_string()
    }

    #[test]
    fn plain_formal_is_its_spec_character() {
        let spec = encode_line("GLvoid: Foo(GLint: x)").unwrap();
        assert_eq!(spec.as_str(), spec_of(PrimitiveType::Int));
    }

    #[test]
    fn single_pointer_is_marker_and_pointee() {
        let spec = encode_line("GLvoid: Foo(GLint *: x)").unwrap();
        assert_eq!(spec.as_str(), format!("*{}", spec_of(PrimitiveType::Int)));

        let spec = encode_line("GLvoid: Foo(const GLchar*: x)").unwrap();
        assert_eq!(spec.as_str(), "*1");
    }

    #[test]
    fn double_pointer_widens_to_void() {
        let spec = encode_line("GLvoid: Foo(GLint **: x)").unwrap();
        assert_eq!(spec.as_str(), format!("*{}", spec_of(PrimitiveType::Void)));

        let spec = encode_line("GLvoid: Foo(const GLchar *const *: x)").unwrap();
        assert_eq!(spec.as_str(), "*0");
    }

    #[test]
    fn formals_are_concatenated_in_order() {
        let spec = encode_line(
            "GLvoid: BufferData(GLenum: target, GLsizeiptr: size, const GLvoid *: data, GLenum: usage)",
        )
        .unwrap();
        assert_eq!(spec.as_str(), "2f*02");
    }

    #[test]
    fn no_formals_is_empty() {
        let spec = encode_line("GLenum: GetError()").unwrap();
        assert!(spec.is_empty());
    }

    #[test]
    fn unknown_type_names_function() {
        let err = encode_line("int: f(unknowntype: x)").unwrap_err();
        match err {
            GenerationError::UnknownType { ty, function } => {
                assert_eq!(ty, "unknowntype");
                assert_eq!(function, "f");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn unknown_pointee_is_rejected() {
        assert!(matches!(
            encode_line("GLvoid: Foo(size_t *: x)"),
            Err(GenerationError::UnknownType { .. })
        ));
    }
}
