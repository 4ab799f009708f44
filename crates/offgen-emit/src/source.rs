//! Generated source: argument structs, trampolines and public entry points.
//!
//! Struct fields are positional (`r` for the return value, `a0`, `a1`, ...
//! for parameters). Field order is the packing contract; parameter names are
//! only used on the packing side, as initializer values.

use offgen_parse::ParsedSignature;

use crate::EmitConfig;

/// Return value field name.
pub const RETURN_FIELD: &str = "r";

/// Field name for parameter `index`.
#[must_use]
pub fn arg_field(index: usize) -> String {
    format!("a{index}")
}

/// Include directives opening the generated source.
#[must_use]
pub fn gen_source_prologue(cfg: &EmitConfig) -> String {
    format!(
        "#include <{}>\n\n#include <{}>\n\n",
        cfg.generated_header(),
        cfg.runtime_header
    )
}

/// Argument struct carrying parameters and the return value.
#[must_use]
pub fn gen_args_struct(cfg: &EmitConfig, sig: &ParsedSignature) -> String {
    let mut s = format!("struct {} {{\n", cfg.args_struct(&sig.symbol_name));
    if sig.returns_value() {
        s.push_str(&format!("    {} {};\n", sig.return_type, RETURN_FIELD));
    }
    for param in &sig.parameters {
        s.push_str(&format!("    {} {};\n", param.ty, arg_field(param.index)));
    }
    s.push_str("};\n\n");
    s
}

/// Trampoline unpacking the struct and calling the implementation.
#[must_use]
pub fn gen_trampoline(cfg: &EmitConfig, sig: &ParsedSignature) -> String {
    let args = (0..sig.arity())
        .map(|i| format!("args->{}", arg_field(i)))
        .collect::<Vec<_>>()
        .join(", ");
    let assign = if sig.returns_value() {
        format!("args->{RETURN_FIELD} = ")
    } else {
        String::new()
    };

    format!(
        "static void {trampoline}(void *args_) {{\n    \
         struct {st} *args = args_;\n    \
         {assign}{impl_name}({args});\n\
         }}\n\n",
        trampoline = cfg.trampoline(&sig.symbol_name),
        st = cfg.args_struct(&sig.symbol_name),
        impl_name = cfg.impl_name(&sig.symbol_name),
    )
}

/// Public entry point: packs arguments, offloads, returns the result.
///
/// The struct lives on the caller's stack for exactly one offload call.
#[must_use]
pub fn gen_entry(cfg: &EmitConfig, sig: &ParsedSignature) -> String {
    let name = &sig.symbol_name;
    let mut s = format!("{} {}({}) {{\n", sig.return_type, name, sig.arg_list);
    s.push_str(&format!("    struct {} args = {{\n", cfg.args_struct(name)));
    for param in &sig.parameters {
        s.push_str(&format!(
            "        .{} = {},\n",
            arg_field(param.index),
            param.name
        ));
    }
    s.push_str("    };\n");
    s.push_str(&format!(
        "    {}({}, &args);\n",
        cfg.offload_fn,
        cfg.trampoline(name)
    ));
    if sig.returns_value() {
        s.push_str(&format!("    return args.{RETURN_FIELD};\n"));
    }
    s.push_str("}\n\n\n");
    s
}
