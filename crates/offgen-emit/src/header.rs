//! Generated header: include guard, tag definition and implementation
//! prototypes.

use offgen_parse::ParsedSignature;

use crate::EmitConfig;

/// Prototype of the implementation entry point.
///
/// Example: `int add_impl(int a, int b);`
#[must_use]
pub fn gen_impl_prototype(cfg: &EmitConfig, sig: &ParsedSignature) -> String {
    format!(
        "{} {}({});\n",
        sig.return_type,
        cfg.impl_name(&sig.symbol_name),
        sig.arg_list
    )
}

/// Opening boilerplate. Defines the tag away so headers that still carry it
/// compile after this one is included.
#[must_use]
pub fn gen_header_prologue(cfg: &EmitConfig) -> String {
    let guard = cfg.include_guard();
    let tag = &cfg.tag;
    format!("#ifndef {guard}\n#define {guard}\n\n#define {tag}\n\n")
}

/// Closing boilerplate.
#[must_use]
pub fn gen_header_epilogue(cfg: &EmitConfig) -> String {
    format!("\n#endif /* {} */\n", cfg.include_guard())
}
