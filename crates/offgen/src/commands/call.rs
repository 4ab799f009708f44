//! Call command: drive a library built from generated code.

use std::path::Path;
use std::time::Duration;

use offgen::runner::{CallPlan, OffloadLibrary};
use tracing::{error, info};

use crate::cli::{EXIT_FAILURE, EXIT_SUCCESS};
use crate::terminal;

/// Handle the `call` command.
pub fn cmd_call(library: &Path, plan: &CallPlan, hold: Option<u64>) -> i32 {
    info!(library = %library.display(), entry = %plan.entry_symbol, count = plan.count, "calling");

    let lib = match OffloadLibrary::open(library) {
        Ok(lib) => lib,
        Err(e) => {
            error!(error = %e, "failed to load library");
            terminal::error(&e.to_string());
            return EXIT_FAILURE;
        }
    };

    terminal::info(&format!(
        "calling {}({:?}) {} time(s) in {}",
        plan.entry_symbol,
        plan.entry_args,
        plan.count,
        lib.path().display()
    ));

    match plan.run(&lib) {
        Ok(results) => {
            for (i, ret) in results.iter().enumerate() {
                info!(call = i, ret, "entry returned");
            }
            terminal::success(&format!("{} call(s) completed", results.len()));
        }
        Err(e) => {
            error!(error = %e, "call failed");
            terminal::error(&e.to_string());
            return EXIT_FAILURE;
        }
    }

    if let Some(secs) = hold {
        info!(secs, "holding process");
        std::thread::sleep(Duration::from_secs(secs));
    }

    EXIT_SUCCESS
}
