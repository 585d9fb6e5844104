use super::{formal_list, max_width, Artifact, Common, FormalStyle, CHECK_MACRO};
use crate::{
    config::Config,
    error::GenerationError,
    parser::{FunctionDescriptor, ParsedData},
    spec_string,
    types::{DeclaredType, PrimitiveType, POINTER_MARKER},
};
use std::io::Write;
use strum::{EnumIter, IntoEnumIterator, IntoStaticStr};

const APIENTRY_BOILERPLATE: &str = "\
#ifndef APIENTRY
#   define APIENTRY
#endif
#ifndef APIENTRYP
#   define APIENTRYP APIENTRY *
#endif
";

/// Driver error codes the generated decoder can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, IntoStaticStr)]
enum DriverError {
    #[strum(serialize = "GL_INVALID_ENUM")]
    InvalidEnum,
    #[strum(serialize = "GL_INVALID_VALUE")]
    InvalidValue,
    #[strum(serialize = "GL_INVALID_OPERATION")]
    InvalidOperation,
    #[strum(serialize = "GL_INVALID_FRAMEBUFFER_OPERATION")]
    InvalidFramebufferOperation,
}

impl DriverError {
    /// Only decoded with the strict error taxonomy.
    fn is_strict(self) -> bool {
        self == Self::InvalidOperation
    }
}

/// The source file: function pointers, the debug check, `init`, `has` and one
/// wrapper per function.
#[derive(Debug, Clone)]
pub struct Definitions {
    common: Common,
}

impl Definitions {
    pub fn new(config: &Config) -> Self {
        Self {
            common: Common::new(config),
        }
    }

    fn typedef_name(&self, function: &FunctionDescriptor) -> String {
        format!(
            "MYPFN{}{}PROC",
            self.common.params.symbol_prefix.to_uppercase(),
            function.name.to_uppercase()
        )
    }

    fn write_includes(&self, w: &mut dyn Write) -> std::io::Result<()> {
        let params = &self.common.params;
        for include in &params.source_includes {
            writeln!(w, "#include <{include}>")?;
        }
        writeln!(w, "#define {}", params.no_defines)?;
        writeln!(w, "#include \"{}\"", params.header_name)?;
        writeln!(w)?;
        if !params.local_includes.is_empty() {
            for include in &params.local_includes {
                writeln!(w, "#include \"{include}\"")?;
            }
            writeln!(w)?;
        }
        Ok(())
    }

    fn write_check_macro(&self, w: &mut dyn Write) -> std::io::Result<()> {
        writeln!(w, "#ifdef {}", self.common.params.debug_define)?;
        writeln!(
            w,
            "#   define {CHECK_MACRO}(SPEC, ...) debugCheck((SPEC), __func__, file, line, __VA_ARGS__)"
        )?;
        writeln!(w, "#else")?;
        writeln!(w, "#   define {CHECK_MACRO}(...)")?;
        writeln!(w, "#endif")?;
        writeln!(w)
    }

    /// Function pointer typedefs followed by the unresolved pointers.
    fn write_pointers(
        &self,
        w: &mut dyn Write,
        functions: &[FunctionDescriptor],
    ) -> std::io::Result<()> {
        for function in functions {
            writeln!(
                w,
                "typedef {} (APIENTRYP {})({});",
                function.return_type,
                self.typedef_name(function),
                formal_list(function, FormalStyle::Types)
            )?;
        }
        writeln!(w)?;

        let typedef_width = max_width(functions, |f| self.typedef_name(f).len());
        let pointer_width = max_width(functions, |f| self.common.pointer_name(f).len());
        for function in functions {
            writeln!(
                w,
                "static {:<typedef_width$} {:<pointer_width$} = nullptr;",
                self.typedef_name(function),
                self.common.pointer_name(function)
            )?;
        }
        Ok(())
    }

    /// Per-type stringizers, the error decoder and the variadic debug check.
    fn write_debug_support(&self, w: &mut dyn Write) -> std::io::Result<()> {
        let params = &self.common.params;
        let string = &params.string_type;
        let format = &params.format_fn;

        writeln!(w)?;
        writeln!(w, "#ifdef {}", params.debug_define)?;
        writeln!(w, "template <char C, typename T>")?;
        writeln!(w, "{string} stringize(T, char base='?');")?;
        writeln!(w)?;

        for ty in PrimitiveType::valued() {
            let d = ty.descriptor();
            writeln!(w, "template <>")?;
            writeln!(
                w,
                "{string} stringize<'{}', {}>({} value, char) {{",
                d.spec, d.name, d.name
            )?;
            writeln!(w, "    return {format}(\"{}={}\", value);", d.name, d.print_format)?;
            writeln!(w, "}}")?;
        }

        writeln!(w, "template <>")?;
        writeln!(
            w,
            "{string} stringize<'{POINTER_MARKER}', void *>(void *value, char base) {{"
        )?;
        writeln!(w, "    switch (base) {{")?;
        // Pointees may be unfilled output buffers; print addresses only.
        for ty in PrimitiveType::all() {
            let d = ty.descriptor();
            writeln!(
                w,
                "        case '{}': return {format}(\"{}*=%p\", value);",
                d.spec, d.name
            )?;
        }
        writeln!(w, "    }}")?;
        writeln!(w)?;
        writeln!(w, "    return \"unknown\";")?;
        writeln!(w, "}}")?;
        writeln!(w)?;

        self.write_error_decoder(w)?;
        writeln!(w)?;
        self.write_debug_check(w)?;
        writeln!(w, "#endif")
    }

    fn write_error_decoder(&self, w: &mut dyn Write) -> std::io::Result<()> {
        let strict = self.common.features.strict_error_taxonomy;

        writeln!(w, "static const char *debugErrorString(GLenum error) {{")?;
        writeln!(w, "    switch (error) {{")?;
        for error in DriverError::iter().filter(|e| strict || !e.is_strict()) {
            let name: &'static str = error.into();
            writeln!(w, "        case {name}:")?;
            writeln!(w, "            return \"{name}\";")?;
        }
        writeln!(w, "    }}")?;
        writeln!(w, "    return \"unknown\";")?;
        writeln!(w, "}}")
    }

    /// Walks a spec string, pulling one argument per spec character out of
    /// the variadic list. A pointer marker consumes the following character
    /// as the pointee type.
    fn write_debug_check(&self, w: &mut dyn Write) -> std::io::Result<()> {
        let params = &self.common.params;

        writeln!(
            w,
            "static void debugCheck(const char *spec, const char *function, const char *file, size_t line, ...) {{"
        )?;
        writeln!(w, "    GLenum error = {}GetError_();", params.symbol_prefix)?;
        writeln!(w, "    if (error == GL_NO_ERROR)")?;
        writeln!(w, "        return;")?;
        writeln!(w)?;
        writeln!(w, "    va_list va;")?;
        writeln!(w, "    va_start(va, line);")?;
        writeln!(w, "    {} contents;", params.string_type)?;
        writeln!(w)?;
        writeln!(w, "    for (const char *s = spec; *s; s++) {{")?;
        writeln!(w, "        switch (*s) {{")?;
        for ty in PrimitiveType::valued() {
            let d = ty.descriptor();
            writeln!(w, "            case '{}':", d.spec)?;
            writeln!(
                w,
                "                contents += stringize<'{}'>(({})va_arg(va, {}));",
                d.spec, d.name, d.promoted_type
            )?;
            writeln!(w, "                break;")?;
        }
        writeln!(w, "            case '{POINTER_MARKER}':")?;
        writeln!(
            w,
            "                contents += stringize<'{POINTER_MARKER}'>(va_arg(va, void *), s[1]);"
        )?;
        writeln!(w, "                s++; // skip basetype spec")?;
        writeln!(w, "                break;")?;
        writeln!(w, "        }}")?;
        writeln!(w, "        if (s[1])")?;
        writeln!(w, "            contents += \", \";")?;
        writeln!(w, "    }}")?;
        writeln!(w, "    va_end(va);")?;
        writeln!(
            w,
            "    fprintf(stderr, \"error %s(%s) (%s:%zu) %s\\n\", function, contents.c_str(),"
        )?;
        writeln!(w, "        file, line, debugErrorString(error));")?;
        writeln!(w, "}}")
    }

    /// Presence storage plus, with the extension table, the static name list.
    fn write_extension_storage(&self, w: &mut dyn Write, data: &ParsedData) -> std::io::Result<()> {
        let params = &self.common.params;

        if !self.common.features.extension_table {
            return writeln!(
                w,
                "static {}<{}> extensionSet;",
                params.set_type, params.string_type
            );
        }

        writeln!(w, "static {}<size_t> extensionSet;", params.set_type)?;
        writeln!(w, "static const char *extensionList[] = {{")?;
        let count = data.extensions.len();
        for entry in data.extensions.entries() {
            writeln!(
                w,
                "    \"{}{}\"{}",
                params.extension_prefix,
                entry.raw_name,
                if entry.index + 1 == count { "" } else { "," }
            )?;
        }
        writeln!(w, "}};")
    }

    fn write_init(&self, w: &mut dyn Write, functions: &[FunctionDescriptor]) -> std::io::Result<()> {
        let params = &self.common.params;
        let prefix = &params.symbol_prefix;
        let pointer_width = max_width(functions, |f| self.common.pointer_name(f).len());

        writeln!(w, "void init() {{")?;
        for function in functions {
            writeln!(
                w,
                "    {:<pointer_width$} = ({}){}(\"{}\");",
                self.common.pointer_name(function),
                self.typedef_name(function),
                params.loader,
                self.common.symbol_name(function)
            )?;
        }
        writeln!(w)?;
        writeln!(w, "    if (!{prefix}GetIntegerv_ || !{prefix}GetStringi_)")?;
        writeln!(w, "        {}(\"Failed to initialize driver\\n\");", params.fatal)?;
        writeln!(w)?;
        writeln!(w, "    GLint count = 0;")?;
        writeln!(w, "    {prefix}GetIntegerv_(GL_NUM_EXTENSIONS, &count);")?;
        if self.common.features.extension_table {
            writeln!(w, "    for (GLint i = 0; i < count; i++) {{")?;
            writeln!(
                w,
                "        const char *name = (const char *){prefix}GetStringi_(GL_EXTENSIONS, i);"
            )?;
            writeln!(
                w,
                "        for (size_t j = 0; j < sizeof(extensionList)/sizeof(*extensionList); j++)"
            )?;
            writeln!(w, "            if (!strcmp(extensionList[j], name))")?;
            writeln!(w, "                extensionSet.insert(j);")?;
            writeln!(w, "    }}")?;
        } else {
            writeln!(w, "    for (GLint i = 0; i < count; i++)")?;
            writeln!(
                w,
                "        extensionSet.emplace((const char *){prefix}GetStringi_(GL_EXTENSIONS, i));"
            )?;
        }
        writeln!(w, "}}")?;
        writeln!(w)?;

        if self.common.features.extension_table {
            writeln!(w, "bool has(size_t ext) {{")?;
        } else {
            writeln!(w, "bool has(const char *ext) {{")?;
        }
        writeln!(w, "    return extensionSet.find(ext) != extensionSet.end();")?;
        writeln!(w, "}}")
    }

    /// The check call of one wrapper. Functions without formals pass an empty
    /// spec and a dummy `0` so the variadic macro always has an argument.
    fn check_call(&self, function: &FunctionDescriptor) -> Result<String, GenerationError> {
        let spec = spec_string::encode(function)?;
        Ok(if function.formals.is_empty() {
            format!("{CHECK_MACRO}(\"\", 0);")
        } else {
            format!(
                "{CHECK_MACRO}(\"{spec}\", {});",
                formal_list(function, FormalStyle::Names)
            )
        })
    }
}

impl Artifact for Definitions {
    fn begin_file(&mut self, w: &mut dyn Write, data: &ParsedData) -> Result<(), GenerationError> {
        let instrumentation = self.common.features.instrumentation;

        self.common.write_version_header(w)?;
        self.write_includes(w)?;
        w.write_all(APIENTRY_BOILERPLATE.as_bytes())?;
        writeln!(w)?;
        if instrumentation {
            self.write_check_macro(w)?;
        }
        self.write_pointers(w, &data.functions)?;
        if instrumentation {
            self.write_debug_support(w)?;
        }

        writeln!(w)?;
        writeln!(w, "namespace {} {{", self.common.params.namespace)?;
        writeln!(w)?;
        self.write_extension_storage(w, data)?;
        writeln!(w)?;
        self.write_init(w, &data.functions)?;
        Ok(())
    }

    fn write_function(
        &mut self,
        w: &mut dyn Write,
        function: &FunctionDescriptor,
    ) -> Result<(), GenerationError> {
        let call = format!(
            "{}({})",
            self.common.pointer_name(function),
            formal_list(function, FormalStyle::Names)
        );
        let check = if self.common.features.instrumentation {
            Some(self.check_call(function)?)
        } else {
            None
        };
        let returns = !DeclaredType::new(&function.return_type).is_void();

        writeln!(w)?;
        writeln!(
            w,
            "{} {}({}) {{",
            function.return_type,
            function.name,
            self.common.parameter_list(function)
        )?;
        match (returns, check) {
            (true, Some(check)) => {
                writeln!(w, "    {} result = {call};", function.return_type)?;
                writeln!(w, "    {check}")?;
                writeln!(w, "    return result;")?;
            }
            (true, None) => writeln!(w, "    return {call};")?,
            (false, check) => {
                writeln!(w, "    {call};")?;
                if let Some(check) = check {
                    writeln!(w, "    {check}")?;
                }
            }
        }
        writeln!(w, "}}")?;
        Ok(())
    }

    fn end_file(&mut self, w: &mut dyn Write, _data: &ParsedData) -> Result<(), GenerationError> {
        writeln!(w)?;
        writeln!(w, "}}")?;
        Ok(())
    }
}
