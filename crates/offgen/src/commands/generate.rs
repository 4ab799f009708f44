//! Generate command.

use std::path::{Path, PathBuf};

use offgen::{ArtifactPaths, Generator, WriteStatus, load_units, stale_artifacts, write_artifacts};
use tracing::{error, info};

use crate::cli::{EXIT_FAILURE, EXIT_SUCCESS, NameArgs, build_emit_config};
use crate::terminal;

/// Handle the `generate` command.
pub fn cmd_generate(
    include: &[PathBuf],
    header_file: &Path,
    source_file: &Path,
    check: bool,
    jobs: usize,
    names: &NameArgs,
    silent: bool,
) -> i32 {
    info!(
        inputs = include.len(),
        header = %header_file.display(),
        source = %source_file.display(),
        "generating"
    );

    let generator = match Generator::new(build_emit_config(names)) {
        Ok(generator) => generator.with_jobs(jobs),
        Err(e) => return fail("invalid configuration", &e),
    };
    info!(
        tag = %generator.config().tag,
        jobs = generator.effective_jobs(),
        "scanning for tagged declarations"
    );
    let units = match load_units(include) {
        Ok(units) => units,
        Err(e) => return fail("failed to read inputs", &e),
    };
    let artifacts = match generator.generate(&units) {
        Ok(artifacts) => artifacts,
        Err(e) => return fail("generation failed", &e),
    };

    let paths = ArtifactPaths::new(header_file, source_file);

    if check {
        return match stale_artifacts(&paths, &artifacts) {
            Ok(stale) if stale.is_empty() => {
                if !silent {
                    terminal::success("generated files are up to date");
                }
                EXIT_SUCCESS
            }
            Ok(stale) => {
                for path in &stale {
                    terminal::warning(&format!("{} is out of date", path.display()));
                }
                EXIT_FAILURE
            }
            Err(e) => fail("check failed", &e),
        };
    }

    match write_artifacts(&paths, &artifacts) {
        Ok((header, source)) => {
            if !silent {
                let unchanged = [header, source]
                    .iter()
                    .filter(|&&s| s == WriteStatus::Unchanged)
                    .count();
                terminal::success(&format!(
                    "generated offload wrappers for {} unit(s) ({unchanged} unchanged)",
                    units.len()
                ));
                terminal::path_output(header_file);
                terminal::path_output(source_file);
            }
            EXIT_SUCCESS
        }
        Err(e) => fail("failed to write artifacts", &e),
    }
}

fn fail(what: &str, err: &offgen::Error) -> i32 {
    error!(error = %err, "{what}");
    terminal::error(&format!("{what}: {err}"));
    EXIT_FAILURE
}
