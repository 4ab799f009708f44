//! C marshalling code emission for offloaded calls.
//!
//! For each tagged function `RET name(ARGS)` emits:
//! - header: `RET name_impl(ARGS);`
//! - source: `struct zhci_args_name`, trampoline `zhci_wrapper_name`, and a
//!   public `name` that packs its arguments and hands the trampoline to the
//!   offload hook.

mod config;
mod header;
mod source;

pub use config::*;
pub use header::*;
pub use source::*;

use offgen_parse::ParsedSignature;
use thiserror::Error;

/// Configuration errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {what} '{name}': must be a C identifier")]
    InvalidIdentifier { what: &'static str, name: String },
    #[error("invalid header name '{0}'")]
    InvalidHeader(String),
}

/// Header and source text for one tagged function.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EmittedFunction {
    pub header: String,
    pub source: String,
}

/// Concatenated fragments for one compilation unit, in encounter order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EmittedUnit {
    pub header: String,
    pub source: String,
    /// Number of functions emitted.
    pub functions: usize,
}

impl EmittedUnit {
    /// Append one function's fragments.
    pub fn push(&mut self, function: &EmittedFunction) {
        self.header.push_str(&function.header);
        self.source.push_str(&function.source);
        self.functions += 1;
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.functions == 0
    }
}

/// Final header and source artifacts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifacts {
    pub header: String,
    pub source: String,
}

/// C code emitter.
#[derive(Clone, Debug, Default)]
pub struct CEmitter {
    config: EmitConfig,
}

impl CEmitter {
    #[must_use]
    pub const fn new(config: EmitConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &EmitConfig {
        &self.config
    }

    /// Emit fragments for one function.
    #[must_use]
    pub fn emit(&self, sig: &ParsedSignature) -> EmittedFunction {
        let cfg = &self.config;
        let mut source = gen_args_struct(cfg, sig);
        source.push_str(&gen_trampoline(cfg, sig));
        source.push_str(&gen_entry(cfg, sig));

        EmittedFunction {
            header: gen_impl_prototype(cfg, sig),
            source,
        }
    }

    /// Emit fragments for every function of one compilation unit.
    #[must_use]
    pub fn emit_unit(&self, sigs: &[ParsedSignature]) -> EmittedUnit {
        let mut unit = EmittedUnit::default();
        for sig in sigs {
            unit.push(&self.emit(sig));
        }
        unit
    }

    /// Wrap unit fragments, in the given order, in the fixed boilerplate.
    #[must_use]
    pub fn assemble<'a>(&self, units: impl IntoIterator<Item = &'a EmittedUnit>) -> Artifacts {
        let mut header = gen_header_prologue(&self.config);
        let mut source = gen_source_prologue(&self.config);
        for unit in units {
            header.push_str(&unit.header);
            source.push_str(&unit.source);
        }
        header.push_str(&gen_header_epilogue(&self.config));

        Artifacts { header, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use offgen_parse::{DEFAULT_TAG, Extractor, parse_unit};

    fn emit_text(text: &str) -> Artifacts {
        let extractor = Extractor::new(DEFAULT_TAG).unwrap();
        let sigs = parse_unit(&extractor, text).unwrap();
        let emitter = CEmitter::default();
        let unit = emitter.emit_unit(&sigs);
        emitter.assemble([&unit])
    }

    #[test]
    fn test_no_declarations_yields_boilerplate_only() {
        let artifacts = emit_text("int untagged(int a);\n");
        assert_eq!(
            artifacts.header,
            "#ifndef GENERATED_ZHCI_SYSCALLS_H\n#define GENERATED_ZHCI_SYSCALLS_H\n\n\
             #define __zhci_syscall\n\n\n#endif /* GENERATED_ZHCI_SYSCALLS_H */\n"
        );
        assert_eq!(
            artifacts.source,
            "#include <zhci_syscalls.h>\n\n#include <app_offload.h>\n\n"
        );
    }

    #[test]
    fn test_full_unit() {
        let artifacts = emit_text("__zhci_syscall int zhci_sc_test(int a, int b);\n");

        assert_eq!(
            artifacts.header,
            "#ifndef GENERATED_ZHCI_SYSCALLS_H\n\
             #define GENERATED_ZHCI_SYSCALLS_H\n\
             \n\
             #define __zhci_syscall\n\
             \n\
             int zhci_sc_test_impl(int a, int b);\n\
             \n\
             #endif /* GENERATED_ZHCI_SYSCALLS_H */\n"
        );
        assert_eq!(
            artifacts.source,
            "#include <zhci_syscalls.h>\n\
             \n\
             #include <app_offload.h>\n\
             \n\
             struct zhci_args_zhci_sc_test {\n    \
                 int r;\n    \
                 int a0;\n    \
                 int a1;\n\
             };\n\
             \n\
             static void zhci_wrapper_zhci_sc_test(void *args_) {\n    \
                 struct zhci_args_zhci_sc_test *args = args_;\n    \
                 args->r = zhci_sc_test_impl(args->a0, args->a1);\n\
             }\n\
             \n\
             int zhci_sc_test(int a, int b) {\n    \
                 struct zhci_args_zhci_sc_test args = {\n        \
                     .a0 = a,\n        \
                     .a1 = b,\n    \
                 };\n    \
                 posix_irq_offload_hw(zhci_wrapper_zhci_sc_test, &args);\n    \
                 return args.r;\n\
             }\n\
             \n\
             \n"
        );
    }

    #[test]
    fn test_fragments_follow_encounter_order() {
        let artifacts = emit_text(
            "__zhci_syscall void first(void);\n__zhci_syscall int second(int x);\n",
        );
        let first = artifacts.source.find("struct zhci_args_first {").unwrap();
        let second = artifacts.source.find("struct zhci_args_second {").unwrap();
        assert!(first < second);

        let first = artifacts.header.find("first_impl").unwrap();
        let second = artifacts.header.find("second_impl").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_field_count_matches_arity() {
        let text = "__zhci_syscall long f(int a, int b, int c);\n\
                    __zhci_syscall void g(int a, int b, int c);\n";
        let extractor = Extractor::new(DEFAULT_TAG).unwrap();
        let emitter = CEmitter::default();
        for sig in parse_unit(&extractor, text).unwrap() {
            let s = gen_args_struct(emitter.config(), &sig);
            let fields = s.lines().filter(|l| l.starts_with("    ")).count();
            let expected = sig.arity() + usize::from(sig.returns_value());
            assert_eq!(fields, expected, "{}", sig.symbol_name);
        }
    }

    #[test]
    fn test_emission_is_deterministic() {
        let text = "__zhci_syscall int add(int a, int b);\n\
                    __zhci_syscall void foo(int x, char *y);\n";
        assert_eq!(emit_text(text), emit_text(text));
    }

    #[test]
    fn test_emitted_unit_counts_functions() {
        let extractor = Extractor::new(DEFAULT_TAG).unwrap();
        let sigs = parse_unit(&extractor, "__zhci_syscall void a(void);").unwrap();
        let unit = CEmitter::default().emit_unit(&sigs);
        assert_eq!(unit.functions, 1);
        assert!(!unit.is_empty());
        assert!(EmittedUnit::default().is_empty());
    }
}
