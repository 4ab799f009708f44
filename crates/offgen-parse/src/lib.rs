//! Scanner and decomposer for tagged C function declarations.
//!
//! Finds prototypes marked with a tag token (e.g. `__zhci_syscall`) in raw
//! source text and splits each one into a return type, a symbol name and an
//! ordered list of typed parameters.

mod declarator;
mod extract;
mod signature;

pub use declarator::*;
pub use extract::*;
pub use signature::*;

use thiserror::Error;

/// Default tag marking a declaration for offload code generation.
pub const DEFAULT_TAG: &str = "__zhci_syscall";

/// Signature decomposition errors.
///
/// Every variant carries the full text of the declaration being processed so
/// callers can attach file and line context.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("please pass arrays as pointers, unable to process '{fragment}' (in declaration of {declaration})")]
    ArrayArgument {
        fragment: String,
        declaration: String,
    },
    #[error("please use typedefs for function pointers, unable to process '{fragment}' (in declaration of {declaration})")]
    FunctionPointerArgument {
        fragment: String,
        declaration: String,
    },
    #[error("malformed declaration '{fragment}' (in declaration of {declaration})")]
    MalformedDeclaration {
        fragment: String,
        declaration: String,
    },
}

impl ParseError {
    /// Full text of the declaration that failed to decompose.
    #[must_use]
    pub fn declaration(&self) -> &str {
        match self {
            Self::ArrayArgument { declaration, .. }
            | Self::FunctionPointerArgument { declaration, .. }
            | Self::MalformedDeclaration { declaration, .. } => declaration,
        }
    }

    /// Offending declarator fragment.
    #[must_use]
    pub fn fragment(&self) -> &str {
        match self {
            Self::ArrayArgument { fragment, .. }
            | Self::FunctionPointerArgument { fragment, .. }
            | Self::MalformedDeclaration { fragment, .. } => fragment,
        }
    }
}

pub type Result<T> = std::result::Result<T, ParseError>;
