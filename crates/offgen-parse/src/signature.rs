//! Signature decomposition for tagged declarations.

use crate::declarator::Declarator;
use crate::extract::{Extractor, RawMatch};
use crate::Result;

/// Argument list text meaning "no parameters".
pub const VOID_ARGS: &str = "void";

/// C return type meaning "no return value".
pub const VOID_TYPE: &str = "void";

/// A positional parameter of a tagged function.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Parameter {
    /// C type, e.g. `char *`.
    pub ty: String,
    /// Declared name. Not required to be unique.
    pub name: String,
    /// Position in the argument list, starting at 0.
    pub index: usize,
}

/// Decomposed tagged declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedSignature {
    /// Return type text preceding the symbol name (may be `void`).
    pub return_type: String,
    /// Function name.
    pub symbol_name: String,
    /// Parameters in declaration order.
    pub parameters: Vec<Parameter>,
    /// Argument list exactly as written in the source.
    pub arg_list: String,
}

impl ParsedSignature {
    /// Whether the function returns a value.
    #[must_use]
    pub fn returns_value(&self) -> bool {
        self.return_type != VOID_TYPE
    }

    /// Number of parameters.
    #[must_use]
    pub const fn arity(&self) -> usize {
        self.parameters.len()
    }
}

/// Decompose a raw match into a validated signature.
///
/// # Errors
///
/// Returns a [`ParseError`](crate::ParseError) if any parameter or the function head uses array
/// or function pointer syntax, or has no trailing identifier. Parameters are
/// checked first, left to right.
pub fn decompose(raw: &RawMatch) -> Result<ParsedSignature> {
    let declaration = raw.full_declaration.as_str();

    let parameters = if raw.arg_list.trim() == VOID_ARGS {
        Vec::new()
    } else {
        raw.arg_list
            .split(',')
            .enumerate()
            .map(|(index, fragment)| {
                Declarator::split(fragment, declaration).map(|d| Parameter {
                    ty: d.ty,
                    name: d.name,
                    index,
                })
            })
            .collect::<Result<Vec<_>>>()?
    };

    let head = Declarator::split(raw.head(), declaration)?;

    Ok(ParsedSignature {
        return_type: head.ty,
        symbol_name: head.name,
        parameters,
        arg_list: raw.arg_list.clone(),
    })
}

/// Extract and decompose every tagged declaration in `text`.
///
/// # Errors
///
/// Stops at the first declaration that fails to decompose.
pub fn parse_unit(extractor: &Extractor, text: &str) -> Result<Vec<ParsedSignature>> {
    extractor.extract(text).iter().map(decompose).collect()
}
