//! Command implementations.

mod call;
mod generate;

use crate::cli::{Cli, Commands};

/// Dispatch CLI command to the appropriate handler.
pub fn run_command(cli: &Cli) -> i32 {
    match &cli.command {
        Commands::Generate {
            include,
            header_file,
            source_file,
            check,
            jobs,
            names,
        } => generate::cmd_generate(
            include,
            header_file,
            source_file,
            *check,
            *jobs,
            names,
            cli.silent,
        ),
        Commands::Call {
            library,
            start,
            no_start,
            program,
            entry,
            args,
            count,
            hold,
            start_args,
        } => {
            let plan = offgen::runner::CallPlan {
                start_symbol: (!*no_start).then(|| start.clone()),
                program: program.clone(),
                start_args: start_args.clone(),
                entry_symbol: entry.clone(),
                entry_args: args.clone(),
                count: *count,
            };
            call::cmd_call(library, &plan, *hold)
        }
    }
}
