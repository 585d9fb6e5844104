//! The closed set of driver primitive types glshim knows how to print.
//!
//! Every type that may appear in a signature file (after `const` and pointer
//! markers are stripped) is one of the variants of [`PrimitiveType`]. The set
//! is fixed at compile time; there is no way to register a new type.
use std::str::FromStr;
use strum::{EnumIter, EnumString, IntoEnumIterator};

/// Marks a pointer argument inside a spec string. The spec character that
/// follows it names the pointee type.
pub const POINTER_MARKER: char = '*';

/// Everything the generated code needs to know about a primitive type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeDescriptor {
    /// Name of the type as written in signatures and generated code.
    pub name: &'static str,
    /// `printf` style format used when stringizing a value of this type.
    pub print_format: &'static str,
    /// The type a value of this type is promoted to when passed through `...`.
    pub promoted_type: &'static str,
    /// Unique single character identifying the type inside a spec string.
    pub spec: char,
}

/// The driver's primitive types, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString)]
pub enum PrimitiveType {
    /// Structural marker only. Has no format and no promotion.
    #[strum(serialize = "GLvoid", serialize = "void")]
    Void,
    #[strum(serialize = "GLchar")]
    Char,
    #[strum(serialize = "GLenum")]
    Enum,
    #[strum(serialize = "GLboolean")]
    Boolean,
    #[strum(serialize = "GLbitfield")]
    Bitfield,
    #[strum(serialize = "GLbyte")]
    Byte,
    #[strum(serialize = "GLshort")]
    Short,
    #[strum(serialize = "GLint")]
    Int,
    #[strum(serialize = "GLsizei")]
    Sizei,
    #[strum(serialize = "GLubyte")]
    Ubyte,
    #[strum(serialize = "GLushort")]
    Ushort,
    #[strum(serialize = "GLuint")]
    Uint,
    #[strum(serialize = "GLfloat")]
    Float,
    #[strum(serialize = "GLclampf")]
    Clampf,
    #[strum(serialize = "GLintptr")]
    Intptr,
    #[strum(serialize = "GLsizeiptr")]
    Sizeiptr,
}

impl PrimitiveType {
    /// The descriptor for this type.
    pub const fn descriptor(self) -> TypeDescriptor {
        const fn d(
            name: &'static str,
            print_format: &'static str,
            promoted_type: &'static str,
            spec: char,
        ) -> TypeDescriptor {
            TypeDescriptor {
                name,
                print_format,
                promoted_type,
                spec,
            }
        }

        match self {
            Self::Void => d("GLvoid", "", "", '0'),
            Self::Char => d("GLchar", "%c", "int", '1'),
            Self::Enum => d("GLenum", "0x%X", "unsigned int", '2'),
            Self::Boolean => d("GLboolean", "%c", "int", '3'),
            Self::Bitfield => d("GLbitfield", "%u", "unsigned int", '4'),
            Self::Byte => d("GLbyte", "%x", "int", '5'),
            Self::Short => d("GLshort", "%d", "int", '6'),
            Self::Int => d("GLint", "%d", "int", '7'),
            Self::Sizei => d("GLsizei", "%d", "int", '8'),
            Self::Ubyte => d("GLubyte", "%X", "unsigned int", '9'),
            Self::Ushort => d("GLushort", "%u", "unsigned int", 'a'),
            Self::Uint => d("GLuint", "%u", "unsigned int", 'b'),
            Self::Float => d("GLfloat", "%.2f", "double", 'c'),
            Self::Clampf => d("GLclampf", "%f", "double", 'd'),
            Self::Intptr => d("GLintptr", "%p", "intptr_t", 'e'),
            Self::Sizeiptr => d("GLsizeiptr", "%p", "intptr_t", 'f'),
        }
    }

    pub const fn name(self) -> &'static str {
        self.descriptor().name
    }

    pub const fn spec(self) -> char {
        self.descriptor().spec
    }

    /// Whether this is the structural void-equivalent.
    pub fn is_void(self) -> bool {
        self == Self::Void
    }

    /// Look a type up by name.
    pub fn lookup(name: &str) -> Option<Self> {
        Self::from_str(name).ok()
    }

    /// All types in declaration order.
    pub fn all() -> impl Iterator<Item = Self> {
        Self::iter()
    }

    /// All types that carry a value, i.e. everything except the void marker.
    pub fn valued() -> impl Iterator<Item = Self> {
        Self::iter().filter(|ty| !ty.is_void())
    }
}

/// A declared type split into its base name and pointer depth.
///
/// `const` qualifiers are dropped; they never affect how an argument is
/// printed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredType<'a> {
    pub raw: &'a str,
    pub base: String,
    pub pointers: usize,
}

impl<'a> DeclaredType<'a> {
    pub fn new(raw: &'a str) -> Self {
        let pointers = raw.matches(POINTER_MARKER).count();
        let base = raw
            .replace(POINTER_MARKER, " ")
            .split_whitespace()
            .filter(|token| *token != "const")
            .collect::<String>();

        Self {
            raw,
            base,
            pointers,
        }
    }

    /// Resolve the type for printing purposes.
    ///
    /// Two or more levels of indirection always resolve to the void marker:
    /// such arguments are reported as opaque addresses and their base type is
    /// never looked at.
    pub fn resolve(&self) -> Option<PrimitiveType> {
        if self.pointers >= 2 {
            Some(PrimitiveType::Void)
        } else {
            PrimitiveType::lookup(&self.base)
        }
    }

    /// Whether this names the void-equivalent itself, not a pointer to it.
    pub fn is_void(&self) -> bool {
        self.pointers == 0 && self.resolve() == Some(PrimitiveType::Void)
    }
}
