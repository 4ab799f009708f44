//! Extract -> decompose -> emit pipeline over compilation units.
//!
//! Units are processed independently (in parallel when `jobs != 1`), each
//! into its own buffers, then concatenated in input order.

use rayon::prelude::*;
use tracing::{debug, info, info_span};

use offgen_emit::{Artifacts, CEmitter, EmitConfig, EmittedUnit};
use offgen_parse::{Extractor, decompose};

use crate::{Error, Result, SourceUnit};

/// Offload code generator.
#[derive(Clone, Debug)]
pub struct Generator {
    extractor: Extractor,
    emitter: CEmitter,
    jobs: usize,
}

impl Generator {
    /// Create a generator, validating the configured names.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] or [`Error::Tag`] for names that would not
    /// produce valid C.
    pub fn new(config: EmitConfig) -> Result<Self> {
        config.validate()?;
        let extractor = Extractor::new(&config.tag)?;
        Ok(Self {
            extractor,
            emitter: CEmitter::new(config),
            jobs: 0,
        })
    }

    /// Set number of worker threads (0 = auto).
    #[must_use]
    pub const fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs;
        self
    }

    #[must_use]
    pub const fn config(&self) -> &EmitConfig {
        self.emitter.config()
    }

    /// Worker thread count actually used.
    #[must_use]
    pub fn effective_jobs(&self) -> usize {
        if self.jobs == 0 {
            num_cpus::get().max(1)
        } else {
            self.jobs
        }
    }

    /// Run one compilation unit through the pipeline.
    ///
    /// # Errors
    ///
    /// The first declaration that fails to decompose aborts the unit with
    /// [`Error::Parse`], carrying the unit path and the tag's line.
    pub fn process_unit(&self, unit: &SourceUnit) -> Result<EmittedUnit> {
        let mut sigs = Vec::new();
        for raw in self.extractor.extract(&unit.text) {
            let sig = decompose(&raw).map_err(|source| Error::Parse {
                path: unit.path.clone(),
                line: raw.line(&unit.text),
                source,
            })?;
            sigs.push(sig);
        }

        let emitted = self.emitter.emit_unit(&sigs);
        debug!(
            unit = %unit.path.display(),
            tag = self.extractor.tag(),
            functions = emitted.functions,
            "processed unit"
        );
        Ok(emitted)
    }

    /// Generate both artifacts for `units`, in order.
    ///
    /// # Errors
    ///
    /// With several failing units, the error of the earliest one is returned
    /// regardless of which worker finished first. [`Error::WorkerPool`] if
    /// the thread pool cannot be built.
    pub fn generate(&self, units: &[SourceUnit]) -> Result<Artifacts> {
        let _span = info_span!("generate", units = units.len()).entered();

        let results: Vec<Result<EmittedUnit>> = if self.effective_jobs() == 1 {
            units.iter().map(|unit| self.process_unit(unit)).collect()
        } else {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.effective_jobs())
                .build()?;
            pool.install(|| {
                units
                    .par_iter()
                    .map(|unit| self.process_unit(unit))
                    .collect()
            })
        };
        let emitted = results.into_iter().collect::<Result<Vec<_>>>()?;

        let functions: usize = emitted.iter().map(|u| u.functions).sum();
        let untagged = emitted.iter().filter(|u| u.is_empty()).count();
        info!(
            units = units.len(),
            untagged,
            functions,
            "generated offload wrappers"
        );

        Ok(self.emitter.assemble(&emitted))
    }
}
