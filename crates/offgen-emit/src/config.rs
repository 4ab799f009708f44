//! Emission configuration.
//!
//! Names used in generated code: the tag, the generated symbol prefix, the
//! implementation suffix, the offload hook and the two included headers.

use offgen_parse::{DEFAULT_TAG, is_identifier};

use crate::ConfigError;

/// Default prefix for generated argument structs and trampolines.
pub const DEFAULT_PREFIX: &str = "zhci";
/// Default suffix for implementation entry points.
pub const DEFAULT_IMPL_SUFFIX: &str = "_impl";
/// Default offload hook: runs `routine(parameter)` to completion elsewhere.
pub const DEFAULT_OFFLOAD_FN: &str = "posix_irq_offload_hw";
/// Default runtime support header declaring the offload hook.
pub const DEFAULT_RUNTIME_HEADER: &str = "app_offload.h";

/// Code emission configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmitConfig {
    /// Marker token preceding tagged declarations.
    pub tag: String,
    /// Prefix for generated struct and trampoline names.
    pub prefix: String,
    /// Appended to the symbol name for the implementation entry point.
    pub impl_suffix: String,
    /// Offload hook called by public entry points.
    pub offload_fn: String,
    /// Runtime header included by the generated source.
    pub runtime_header: String,
    /// Generated header name; derived from the prefix when unset.
    generated_header: Option<String>,
    /// Include guard macro; derived from the prefix when unset.
    include_guard: Option<String>,
}

impl Default for EmitConfig {
    fn default() -> Self {
        Self {
            tag: DEFAULT_TAG.to_string(),
            prefix: DEFAULT_PREFIX.to_string(),
            impl_suffix: DEFAULT_IMPL_SUFFIX.to_string(),
            offload_fn: DEFAULT_OFFLOAD_FN.to_string(),
            runtime_header: DEFAULT_RUNTIME_HEADER.to_string(),
            generated_header: None,
            include_guard: None,
        }
    }
}

impl EmitConfig {
    /// Create config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tag token.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    /// Set the generated symbol prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Set the implementation suffix.
    #[must_use]
    pub fn with_impl_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.impl_suffix = suffix.into();
        self
    }

    /// Set the offload hook.
    #[must_use]
    pub fn with_offload_fn(mut self, name: impl Into<String>) -> Self {
        self.offload_fn = name.into();
        self
    }

    /// Set the runtime support header.
    #[must_use]
    pub fn with_runtime_header(mut self, header: impl Into<String>) -> Self {
        self.runtime_header = header.into();
        self
    }

    /// Override the generated header name included by the source.
    #[must_use]
    pub fn with_generated_header(mut self, header: impl Into<String>) -> Self {
        self.generated_header = Some(header.into());
        self
    }

    /// Override the include guard macro.
    #[must_use]
    pub fn with_include_guard(mut self, guard: impl Into<String>) -> Self {
        self.include_guard = Some(guard.into());
        self
    }

    /// Generated header name, e.g. `zhci_syscalls.h`.
    #[must_use]
    pub fn generated_header(&self) -> String {
        self.generated_header
            .clone()
            .unwrap_or_else(|| format!("{}_syscalls.h", self.prefix))
    }

    /// Include guard macro, e.g. `GENERATED_ZHCI_SYSCALLS_H`.
    #[must_use]
    pub fn include_guard(&self) -> String {
        self.include_guard
            .clone()
            .unwrap_or_else(|| format!("GENERATED_{}_SYSCALLS_H", self.prefix.to_uppercase()))
    }

    /// Argument struct name for `symbol`.
    #[must_use]
    pub fn args_struct(&self, symbol: &str) -> String {
        format!("{}_args_{}", self.prefix, symbol)
    }

    /// Trampoline name for `symbol`.
    #[must_use]
    pub fn trampoline(&self, symbol: &str) -> String {
        format!("{}_wrapper_{}", self.prefix, symbol)
    }

    /// Implementation entry point name for `symbol`.
    #[must_use]
    pub fn impl_name(&self, symbol: &str) -> String {
        format!("{}{}", symbol, self.impl_suffix)
    }

    /// Check that every configured name yields valid C.
    ///
    /// # Errors
    ///
    /// Returns the first name that is not a usable identifier or header name.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let identifiers = [
            ("tag", self.tag.clone()),
            ("prefix", self.prefix.clone()),
            ("offload function", self.offload_fn.clone()),
            ("include guard", self.include_guard()),
            // The suffix only has to extend an identifier.
            ("implementation suffix", format!("x{}", self.impl_suffix)),
        ];
        for (what, name) in identifiers {
            if !is_identifier(&name) {
                return Err(ConfigError::InvalidIdentifier { what, name });
            }
        }

        for header in [self.generated_header(), self.runtime_header.clone()] {
            let bad = |c: char| c.is_whitespace() || matches!(c, '<' | '>' | '"');
            if header.is_empty() || header.contains(bad) {
                return Err(ConfigError::InvalidHeader(header));
            }
        }

        Ok(())
    }
}
