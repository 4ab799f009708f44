//! CLI definitions and argument types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use offgen::EmitConfig;
use offgen_emit::{DEFAULT_IMPL_SUFFIX, DEFAULT_OFFLOAD_FN, DEFAULT_PREFIX, DEFAULT_RUNTIME_HEADER};
use offgen_parse::DEFAULT_TAG;

/// Exit code for success.
pub const EXIT_SUCCESS: i32 = 0;
/// Exit code for failure.
pub const EXIT_FAILURE: i32 = 1;

#[derive(Parser)]
#[command(name = "offgen")]
#[command(about = "Offload marshalling code generator for tagged C declarations")]
#[command(version)]
pub struct Cli {
    /// Enable verbose output (sets RUST_LOG=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress output (only show errors)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub silent: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate the implementation header and marshalling source
    Generate {
        /// Header or source file to scan; directories are scanned recursively
        #[arg(short, long = "include", value_name = "PATH", required = true)]
        include: Vec<PathBuf>,

        /// Output header with `*_impl` prototypes
        #[arg(long, value_name = "FILE")]
        header_file: PathBuf,

        /// Output source with argument structs, trampolines and entry points
        #[arg(long, value_name = "FILE")]
        source_file: PathBuf,

        /// Don't write anything; fail if either output would change
        #[arg(long)]
        check: bool,

        /// Number of parallel workers (0 = auto)
        #[arg(short = 'j', long, default_value = "0")]
        jobs: usize,

        #[command(flatten)]
        names: NameArgs,
    },
    /// Load a shared library, boot it, then call an entry point repeatedly
    Call {
        /// Shared library to load
        #[arg(value_name = "LIB")]
        library: PathBuf,

        /// Start entry point taking (argc, argv)
        #[arg(long, default_value = "zhci_start")]
        start: String,

        /// Skip the start entry point
        #[arg(long, conflicts_with = "start")]
        no_start: bool,

        /// argv[0] passed to the start entry point
        #[arg(long, default_value = "zhci")]
        program: String,

        /// Entry point to call
        #[arg(long, default_value = "zhci_sc_test")]
        entry: String,

        /// Integer argument for the entry point (repeatable, max 4)
        #[arg(long = "arg", value_name = "N", allow_negative_numbers = true)]
        args: Vec<i32>,

        /// Number of calls
        #[arg(long, default_value = "3")]
        count: usize,

        /// Keep the process alive this many seconds after the last call
        #[arg(long, value_name = "SECS")]
        hold: Option<u64>,

        /// Extra argv entries for the start entry point
        #[arg(last = true, value_name = "ARGV")]
        start_args: Vec<String>,
    },
}

/// Names used in generated code.
#[derive(Args, Clone, Debug)]
pub struct NameArgs {
    /// Tag marking declarations to wrap
    #[arg(long, default_value = DEFAULT_TAG)]
    pub tag: String,

    /// Prefix for generated structs and trampolines
    #[arg(long, default_value = DEFAULT_PREFIX)]
    pub prefix: String,

    /// Suffix for implementation entry points
    #[arg(long, default_value = DEFAULT_IMPL_SUFFIX)]
    pub impl_suffix: String,

    /// Offload hook called by public entry points
    #[arg(long, default_value = DEFAULT_OFFLOAD_FN)]
    pub offload_fn: String,

    /// Runtime header declaring the offload hook
    #[arg(long, default_value = DEFAULT_RUNTIME_HEADER)]
    pub runtime_header: String,

    /// Generated header name included by the source [default: derived from the prefix]
    #[arg(long, value_name = "NAME")]
    pub generated_header: Option<String>,

    /// Include guard macro [default: derived from the prefix]
    #[arg(long, value_name = "MACRO")]
    pub include_guard: Option<String>,
}

/// Build emit config from CLI arguments.
pub fn build_emit_config(names: &NameArgs) -> EmitConfig {
    let mut config = EmitConfig::new()
        .with_tag(&names.tag)
        .with_prefix(&names.prefix)
        .with_impl_suffix(&names.impl_suffix)
        .with_offload_fn(&names.offload_fn)
        .with_runtime_header(&names.runtime_header);
    if let Some(header) = &names.generated_header {
        config = config.with_generated_header(header);
    }
    if let Some(guard) = &names.include_guard {
        config = config.with_include_guard(guard);
    }
    config
}
