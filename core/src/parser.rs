//! Parsing signature files into function descriptors.
//!
//! Each non-blank line of a signature file describes one driver function:
//!
//! ```text
//! <line>   ::= <type> ":" <name> "(" <formals> ")" [";"]
//! <formal> ::= <type> ":" <name>
//! ```
//!
//! for example `GLvoid: Viewport(GLint: x, GLint: y, GLsizei: w, GLsizei: h);`.
use crate::error::ParseError;
use crate::extension::ExtensionTable;
use joinery::JoinableIterator;
use log::{debug, warn};
use std::fmt::{self, Display};

/// One formal parameter of a function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormalParameter {
    /// The type as written, including any `const` and pointer markers.
    pub declared_type: String,
    pub name: String,
}

/// A single driver function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDescriptor {
    pub return_type: String,
    /// Name without the driver's symbol prefix.
    pub name: String,
    /// Formals in call order.
    pub formals: Vec<FormalParameter>,
}

impl Display for FormalParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.declared_type, self.name)
    }
}

/// Formats the descriptor back into a signature line.
impl Display for FunctionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}({});",
            self.return_type,
            self.name,
            self.formals.iter().join_with(", ")
        )
    }
}

/// The inputs of one generation run.
#[derive(Debug, Default, Clone)]
pub struct ParsedData {
    /// Functions in signature file order.
    pub functions: Vec<FunctionDescriptor>,
    /// Extension names, empty when the extension table is not in use.
    pub extensions: ExtensionTable,
}

impl ParsedData {
    pub fn new(functions: Vec<FunctionDescriptor>, extensions: ExtensionTable) -> Self {
        Self {
            functions,
            extensions,
        }
    }

    /// Find a function by its unprefixed name.
    pub fn function(&self, name: &str) -> Option<&FunctionDescriptor> {
        self.functions.iter().find(|f| f.name == name)
    }
}

/// Parse a whole signature file.
pub fn parse(input: &str) -> Result<Vec<FunctionDescriptor>, ParseError> {
    let mut functions = Vec::new();

    for (index, line) in input.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let function = parse_line(index + 1, line)?;
        debug!("Parsed function: {function}");
        functions.push(function);
    }

    Ok(functions)
}

/// Parse a single non-blank line. `line_number` is only used for errors.
pub fn parse_line(line_number: usize, line: &str) -> Result<FunctionDescriptor, ParseError> {
    let malformed = |reason| ParseError::MalformedSignature {
        line: line_number,
        text: line.to_string(),
        reason,
    };

    let (return_type, rest) = line
        .split_once(':')
        .ok_or_else(|| malformed("missing ':' after the return type"))?;
    let rest = rest.trim_matches(|c| matches!(c, '\r' | '\n' | ';'));

    let open = rest
        .find('(')
        .ok_or_else(|| malformed("missing '(' after the function name"))?;
    let close = rest
        .find(')')
        .ok_or_else(|| malformed("missing ')' after the formal list"))?;
    if close < open {
        return Err(malformed("')' appears before '('"));
    }

    let name = rest[..open].trim();
    if name.is_empty() {
        return Err(malformed("missing function name"));
    }

    let formals = rest[open + 1..close]
        .split(',')
        .filter_map(|piece| parse_formal(name, piece))
        .collect();

    Ok(FunctionDescriptor {
        return_type: return_type.trim().to_string(),
        name: name.to_string(),
        formals,
    })
}

/// A piece that is not exactly `type: name` is dropped.
fn parse_formal(function: &str, piece: &str) -> Option<FormalParameter> {
    let mut parts = piece.split(':');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(declared_type), Some(name), None) => Some(FormalParameter {
            declared_type: declared_type.trim().to_string(),
            name: name.trim().to_string(),
        }),
        _ => {
            if !piece.trim().is_empty() {
                warn!("Skipping malformed formal {piece:?} of function {function}");
            }
            None
        }
    }
}
