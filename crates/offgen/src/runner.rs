//! Shared library call harness.
//!
//! Loads a library built from generated code, boots it through a start
//! entry point taking `(argc, argv)`, then calls an integer entry point a
//! number of times. Each call goes through the generated public symbol, so
//! it exercises the offload path end to end.

use std::ffi::{CString, c_char, c_int};
use std::path::{Path, PathBuf};

use libloading::os::unix::{Library, RTLD_NOW, Symbol};
use thiserror::Error;
use tracing::{debug, error, info};

/// Most integer arguments an entry point can take through [`OffloadLibrary::call`].
pub const MAX_INT_ARGS: usize = 4;

/// `int start(int argc, char **argv)`
pub type StartFn = unsafe extern "C" fn(c_int, *const *const c_char) -> c_int;

type Call0 = unsafe extern "C" fn() -> c_int;
type Call1 = unsafe extern "C" fn(c_int) -> c_int;
type Call2 = unsafe extern "C" fn(c_int, c_int) -> c_int;
type Call3 = unsafe extern "C" fn(c_int, c_int, c_int) -> c_int;
type Call4 = unsafe extern "C" fn(c_int, c_int, c_int, c_int) -> c_int;

/// Runner error type.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("failed to load library: {0}")]
    LoadError(#[from] libloading::Error),

    #[error("shared library not found: {0}")]
    LibraryNotFound(String),

    #[error("failed to find symbol '{0}': {1}")]
    SymbolNotFound(String, libloading::Error),

    #[error("argument contains NUL byte: {0:?}")]
    InvalidArgument(String),

    #[error("too many integer arguments: {0} (max 4)")]
    TooManyArguments(usize),
}

/// Build a C `argv` vector: `program` followed by `args`.
///
/// # Errors
///
/// Returns [`RunError::InvalidArgument`] for a string with an interior NUL.
pub fn build_argv(program: &str, args: &[String]) -> Result<Vec<CString>, RunError> {
    std::iter::once(program)
        .chain(args.iter().map(String::as_str))
        .map(|arg| CString::new(arg).map_err(|_| RunError::InvalidArgument(arg.to_string())))
        .collect()
}

/// Pointer array for `argv`, terminated by a null entry.
///
/// The pointers borrow from `strings`, which must outlive their use.
fn argv_pointers(strings: &[CString]) -> Vec<*const c_char> {
    strings
        .iter()
        .map(|s| s.as_ptr())
        .chain(std::iter::once(std::ptr::null()))
        .collect()
}

/// A loaded shared library.
pub struct OffloadLibrary {
    lib: Library,
    path: PathBuf,
}

impl OffloadLibrary {
    /// Load a library, resolving all symbols immediately.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::LibraryNotFound`] for a missing file and
    /// [`RunError::LoadError`] if the dynamic loader rejects it.
    pub fn open(path: &Path) -> Result<Self, RunError> {
        if !path.exists() {
            return Err(RunError::LibraryNotFound(path.display().to_string()));
        }
        // SAFETY: loading runs the library's initializers; the caller vouches
        // for the library.
        let lib = unsafe { Library::open(Some(path), RTLD_NOW)? };
        debug!(path = %path.display(), "loaded library");
        Ok(Self {
            lib,
            path: path.to_path_buf(),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    unsafe fn symbol<T: Copy>(&self, name: &str) -> Result<T, RunError> {
        unsafe {
            let sym: Symbol<T> = self.lib.get(name.as_bytes()).map_err(|e| {
                error!(symbol = name, "symbol not found in library");
                RunError::SymbolNotFound(name.to_string(), e)
            })?;
            Ok(*sym)
        }
    }

    /// Call `symbol(argc, argv)` with `argv = [program, args...]`.
    ///
    /// The argument strings are kept alive for the duration of the call only;
    /// the callee must copy anything it retains. `argv[argc]` is null.
    ///
    /// # Errors
    ///
    /// Fails if an argument contains a NUL byte or `symbol` is missing.
    pub fn start(&self, symbol: &str, program: &str, args: &[String]) -> Result<i32, RunError> {
        let strings = build_argv(program, args)?;
        let argc = c_int::try_from(strings.len())
            .map_err(|_| RunError::TooManyArguments(strings.len()))?;
        let pointers = argv_pointers(&strings);

        // SAFETY: the symbol is declared by the caller as `int (int, char **)`.
        let ret = unsafe {
            let start: StartFn = self.symbol(symbol)?;
            start(argc, pointers.as_ptr())
        };
        info!(symbol, argc, ret, "start entry returned");
        Ok(ret)
    }

    /// Call an `int symbol(int, ...)` entry point with up to [`MAX_INT_ARGS`] arguments.
    ///
    /// # Errors
    ///
    /// Fails for more than [`MAX_INT_ARGS`] arguments or a missing `symbol`.
    pub fn call(&self, symbol: &str, args: &[i32]) -> Result<i32, RunError> {
        // SAFETY: the symbol is declared by the caller as taking `args.len()`
        // ints and returning int.
        let ret = unsafe {
            match *args {
                [] => self.symbol::<Call0>(symbol)?(),
                [a] => self.symbol::<Call1>(symbol)?(a),
                [a, b] => self.symbol::<Call2>(symbol)?(a, b),
                [a, b, c] => self.symbol::<Call3>(symbol)?(a, b, c),
                [a, b, c, d] => self.symbol::<Call4>(symbol)?(a, b, c, d),
                _ => return Err(RunError::TooManyArguments(args.len())),
            }
        };
        debug!(symbol, ?args, ret, "entry returned");
        Ok(ret)
    }
}

/// A start-then-call sequence against one library.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallPlan {
    /// Start entry point; skipped when `None`.
    pub start_symbol: Option<String>,
    /// `argv[0]` passed to the start entry point.
    pub program: String,
    /// `argv[1..]` passed to the start entry point.
    pub start_args: Vec<String>,
    /// Entry point called repeatedly.
    pub entry_symbol: String,
    /// Integer arguments for each call.
    pub entry_args: Vec<i32>,
    /// Number of calls.
    pub count: usize,
}

impl CallPlan {
    /// Run the plan, returning every entry call's result in order.
    ///
    /// # Errors
    ///
    /// Stops at the first failing start or entry call.
    pub fn run(&self, lib: &OffloadLibrary) -> Result<Vec<i32>, RunError> {
        if self.entry_args.len() > MAX_INT_ARGS {
            return Err(RunError::TooManyArguments(self.entry_args.len()));
        }
        if let Some(start) = &self.start_symbol {
            lib.start(start, &self.program, &self.start_args)?;
        }
        (0..self.count)
            .map(|_| lib.call(&self.entry_symbol, &self.entry_args))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_argv() {
        let argv = build_argv("zhci", &["--bt-dev=hci1".to_string()]).unwrap();
        let strs: Vec<_> = argv.iter().map(|a| a.to_str().unwrap()).collect();
        assert_eq!(strs, ["zhci", "--bt-dev=hci1"]);
    }

    #[test]
    fn test_argv_pointers_are_null_terminated() {
        let strings = build_argv("zhci", &["--bt-dev=hci1".to_string()]).unwrap();
        let pointers = argv_pointers(&strings);

        assert_eq!(pointers.len(), strings.len() + 1);
        assert_eq!(pointers[0], strings[0].as_ptr());
        assert_eq!(pointers[1], strings[1].as_ptr());
        assert!(pointers[2].is_null());
    }

    #[test]
    fn test_build_argv_rejects_nul() {
        let err = build_argv("zhci", &["a\0b".to_string()]).unwrap_err();
        assert!(matches!(err, RunError::InvalidArgument(_)));
    }

    #[test]
    fn test_open_missing_library() {
        let err = OffloadLibrary::open(Path::new("/nonexistent/libzhci.so"))
            .err()
            .unwrap();
        assert!(matches!(err, RunError::LibraryNotFound(_)));
    }

    #[test]
    fn test_open_invalid_library() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("libbogus.so");
        std::fs::write(&path, b"not an elf").unwrap();

        let err = OffloadLibrary::open(&path).err().unwrap();
        assert!(matches!(err, RunError::LoadError(_)));
    }
}
