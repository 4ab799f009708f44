//! offgen - offload marshalling code generator.
//!
//! Scans C sources for declarations tagged with a marker token and generates
//! a header of `*_impl` prototypes plus a source file with argument structs,
//! trampolines and public entry points that route each call through an
//! offload hook.
//!
//! # Example
//!
//! ```ignore
//! use offgen::{EmitConfig, Generator, SourceUnit};
//!
//! let generator = Generator::new(EmitConfig::default())?;
//! let unit = SourceUnit::new("api.h", "__zhci_syscall int add(int a, int b);");
//! let artifacts = generator.generate(&[unit])?;
//! println!("{}", artifacts.source);
//! ```

// Re-export from sub-crates
pub use offgen_emit::{Artifacts, CEmitter, ConfigError, EmitConfig, EmittedUnit};
pub use offgen_parse::{
    DEFAULT_TAG, Extractor, InvalidTag, ParseError, ParsedSignature, Parameter, RawMatch,
    decompose,
};

mod artifact;
mod pipeline;
pub mod runner;
mod unit;

pub use artifact::*;
pub use pipeline::*;
pub use unit::*;

use std::path::PathBuf;

use thiserror::Error;

/// Generator errors.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{}:{line}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        #[source]
        source: ParseError,
    },
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("invalid configuration: {0}")]
    Tag(#[from] InvalidTag),
    #[error("no input files found")]
    NoInputs,
    #[error("failed to build worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
