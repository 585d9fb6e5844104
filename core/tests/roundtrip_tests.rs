//! Property tests for the signature parser.

use glshim_core::{parser, spec_string, types::PrimitiveType};
use proptest::prelude::*;

const TYPE_NAMES: &[&str] = &[
    "GLvoid",
    "GLenum",
    "GLbitfield",
    "GLint",
    "GLuint",
    "GLfloat",
    "GLsizei",
    "const GLchar *",
    "const GLint *",
    "GLvoid *",
    "const GLchar **",
];

fn type_name() -> impl Strategy<Value = String> {
    prop::sample::select(TYPE_NAMES).prop_map(str::to_string)
}

fn identifier() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9_]{0,15}"
}

fn signature() -> impl Strategy<Value = String> {
    (
        type_name(),
        identifier(),
        prop::collection::vec((type_name(), identifier()), 0..6),
    )
        .prop_map(|(return_type, name, formals)| {
            let formals = formals
                .iter()
                .map(|(ty, name)| format!("{ty}: {name}"))
                .collect::<Vec<_>>()
                .join(", ");
            format!("{return_type}: {name}({formals});")
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn display_reproduces_the_line(line in signature()) {
        let function = parser::parse_line(1, &line).unwrap();
        prop_assert_eq!(function.to_string(), line);
    }

    #[test]
    fn one_function_per_non_blank_line(lines in prop::collection::vec(signature(), 1..8)) {
        let input = lines.join("\n\n");
        let functions = parser::parse(&input).unwrap();
        prop_assert_eq!(functions.len(), lines.len());
    }

    #[test]
    fn spec_string_has_one_entry_per_formal(line in signature()) {
        let function = parser::parse_line(1, &line).unwrap();
        let spec = spec_string::encode(&function).unwrap();

        // Pointer formals take two characters, the rest one.
        let expected: usize = function
            .formals
            .iter()
            .map(|formal| if formal.declared_type.contains('*') { 2 } else { 1 })
            .sum();
        prop_assert_eq!(spec.as_str().len(), expected);
        prop_assert!(spec.as_str().chars().all(|c| c == '*'
            || PrimitiveType::all().any(|ty| ty.spec() == c)));
    }
}
