//! Type + trailing identifier splitting.

use crate::{ParseError, Result};

/// Check whether a character can appear in a C identifier.
#[inline]
#[must_use]
pub const fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// A single `type name` fragment, e.g. `const char *path`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Declarator {
    /// Everything before the trailing identifier, whitespace-normalized.
    /// Pointer stars and qualifiers stay here: `char *`.
    pub ty: String,
    /// Trailing identifier.
    pub name: String,
}

impl Declarator {
    /// Split `fragment` into type and trailing identifier.
    ///
    /// `declaration` is the full declaration the fragment belongs to; it is
    /// only used for error context.
    ///
    /// # Errors
    ///
    /// Array syntax and parenthesized (function pointer) syntax are rejected
    /// before the split. A fragment without a trailing identifier, or with
    /// nothing left for the type, is malformed.
    pub fn split(fragment: &str, declaration: &str) -> Result<Self> {
        let fragment = fragment.trim();

        if fragment.contains('[') {
            return Err(ParseError::ArrayArgument {
                fragment: fragment.to_string(),
                declaration: declaration.to_string(),
            });
        }
        if fragment.contains('(') {
            return Err(ParseError::FunctionPointerArgument {
                fragment: fragment.to_string(),
                declaration: declaration.to_string(),
            });
        }

        let head = fragment.trim_end_matches(is_ident_char);
        let name = &fragment[head.len()..];
        let ty = normalize_type(head);

        let starts_with_digit = name.starts_with(|c: char| c.is_ascii_digit());
        if name.is_empty() || starts_with_digit || ty.is_empty() {
            return Err(ParseError::MalformedDeclaration {
                fragment: fragment.to_string(),
                declaration: declaration.to_string(),
            });
        }

        Ok(Self {
            ty,
            name: name.to_string(),
        })
    }
}

/// Collapse whitespace runs (including newlines) to single spaces.
fn normalize_type(ty: &str) -> String {
    ty.split_whitespace().collect::<Vec<_>>().join(" ")
}
