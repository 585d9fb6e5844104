use super::{max_width, Artifact, Common, INFO_MACRO, INFO_MACRO_P};
use crate::{
    config::Config,
    error::GenerationError,
    extension::ExtensionTable,
    parser::{FunctionDescriptor, ParsedData},
};
use std::io::Write;

/// The header: prototypes, extension index macros and the call-site wrapper
/// macros.
#[derive(Debug, Clone)]
pub struct Declarations {
    common: Common,
}

impl Declarations {
    pub fn new(config: &Config) -> Self {
        Self {
            common: Common::new(config),
        }
    }

    fn write_info_macros(&self, w: &mut dyn Write) -> std::io::Result<()> {
        writeln!(w, "#ifdef {}", self.common.params.debug_define)?;
        writeln!(w, "#   define {INFO_MACRO} const char *file, size_t line")?;
        writeln!(w, "#   define {INFO_MACRO_P} , {INFO_MACRO}")?;
        writeln!(w, "#else")?;
        writeln!(w, "#   define {INFO_MACRO}")?;
        writeln!(w, "#   define {INFO_MACRO_P}")?;
        writeln!(w, "#endif")?;
        writeln!(w)
    }

    fn write_extension_macros(
        &self,
        w: &mut dyn Write,
        extensions: &ExtensionTable,
    ) -> std::io::Result<()> {
        let width = extensions.max_width();
        for entry in extensions.entries() {
            writeln!(w, "#define {:<width$} {}", entry.raw_name, entry.index)?;
        }
        writeln!(w)
    }

    /// One macro per function appending `__FILE__` and `__LINE__` to the call.
    fn write_wrapper_macros(
        &self,
        w: &mut dyn Write,
        functions: &[FunctionDescriptor],
    ) -> std::io::Result<()> {
        let params = &self.common.params;
        // Room for the "(...)" after the longest name.
        let width = max_width(functions, |f| f.name.len()) + 5;

        writeln!(
            w,
            "#if defined({}) && !defined({})",
            params.debug_define, params.no_defines
        )?;
        for function in functions {
            let arguments = if function.formals.is_empty() {
                "/* no arg */"
            } else {
                "__VA_ARGS__,"
            };
            writeln!(
                w,
                "#   define {:<width$} {}({arguments} __FILE__, __LINE__)",
                format!("{}(...)", function.name),
                function.name,
            )?;
        }
        writeln!(w, "#endif")
    }
}

impl Artifact for Declarations {
    fn begin_file(&mut self, w: &mut dyn Write, data: &ParsedData) -> Result<(), GenerationError> {
        let common = &self.common;
        let params = &common.params;

        common.write_version_header(w)?;
        writeln!(w, "#ifndef {}", params.header_guard)?;
        writeln!(w, "#define {}", params.header_guard)?;
        for include in &params.header_includes {
            writeln!(w, "#include <{include}>")?;
        }
        writeln!(w)?;

        if common.features.instrumentation {
            self.write_info_macros(w)?;
        }
        if common.features.extension_table {
            self.write_extension_macros(w, &data.extensions)?;
        }

        writeln!(w, "namespace {} {{", params.namespace)?;
        writeln!(w)?;
        writeln!(w, "void init();")?;
        if common.features.extension_table {
            writeln!(w, "bool has(size_t ext);")?;
        } else {
            writeln!(w, "bool has(const char *ext);")?;
        }

        Ok(())
    }

    fn write_function(
        &mut self,
        w: &mut dyn Write,
        function: &FunctionDescriptor,
    ) -> Result<(), GenerationError> {
        writeln!(
            w,
            "{} {}({});",
            function.return_type,
            function.name,
            self.common.parameter_list(function)
        )?;
        Ok(())
    }

    fn end_file(&mut self, w: &mut dyn Write, data: &ParsedData) -> Result<(), GenerationError> {
        writeln!(w)?;
        writeln!(w, "}}")?;
        if self.common.features.instrumentation {
            self.write_wrapper_macros(w, &data.functions)?;
        }
        writeln!(w, "#endif")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn render(config: &Config, signatures: &str, extensions: &[&str]) -> String {
        let data = ParsedData::new(
            parse(signatures).unwrap(),
            ExtensionTable::from_names(extensions.iter().copied()),
        );
        let mut out = Vec::new();
        Declarations::new(config).generate(&mut out, &data).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn extension_macros_are_aligned() {
        let out = render(
            &Config::default(),
            "GLvoid: Flush();",
            &["ARB_debug_output", "EXT_a"],
        );
        assert!(out.contains("#define ARB_debug_output 0\n#define EXT_a            1\n"));
        assert!(out.contains("bool has(size_t ext);"));
    }

    #[test]
    fn wrapper_macros_are_aligned() {
        let out = render(
            &Config::default(),
            "GLvoid: Clear(GLbitfield: mask);\nGLenum: GetError();",
            &["A"],
        );
        assert!(out.contains("#   define Clear(...)    Clear(__VA_ARGS__, __FILE__, __LINE__)\n"));
        assert!(out.contains("#   define GetError(...) GetError(/* no arg */ __FILE__, __LINE__)\n"));
    }

    #[test]
    fn prototypes_carry_info_parameters() {
        let out = render(
            &Config::default(),
            "GLvoid: Clear(GLbitfield: mask);\nGLenum: GetError();",
            &["A"],
        );
        assert!(out.contains("GLvoid Clear(GLbitfield mask GL_INFOP);\nGLenum GetError(GL_INFO);\n"));
    }

    #[test]
    fn plain_header_without_features() {
        let mut config = Config::default();
        config.features.instrumentation = false;
        config.features.extension_table = false;
        config.output.no_version_header = true;

        let out = render(&config, "GLvoid: Clear(GLbitfield: mask);", &[]);
        assert_eq!(
            out,
            "#ifndef R_COMMON_HDR\n\
             #define R_COMMON_HDR\n\
             #include <SDL2/SDL_opengl.h>\n\
             #include <stdint.h>\n\
             \n\
             namespace gl {\n\
             \n\
             void init();\n\
             bool has(const char *ext);\n\
             GLvoid Clear(GLbitfield mask);\n\
             \n\
             }\n\
             #endif\n"
        );
    }
}
