//! Repeated, seeded draws of a model.

use rand::SeedableRng;
use thicket_core::{ModelError, ValueId};
use tracing::{debug, info};

use crate::config::{ConfigError, SamplerConfig};
use crate::generator::ModelRng;
use crate::model::Model;

/// Draws a model `replicates` times from a single seeded random source.
///
/// The random source is created once, so replicate `i` of a run depends on
/// every draw before it; two samplers with the same seed replay the same
/// sequence.
#[derive(Debug)]
pub struct Sampler {
    config: SamplerConfig,
    rng: ModelRng,
}

impl Sampler {
    /// Validate `config` and seed the random source.
    pub fn new(config: SamplerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = ModelRng::seed_from_u64(config.seed);
        Ok(Self { config, rng })
    }

    /// The configuration this sampler was built from.
    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// The random source, for sampling outside [`run`](Self::run).
    pub fn rng(&mut self) -> &mut ModelRng {
        &mut self.rng
    }

    /// Draw every replicate.
    ///
    /// Before each replicate all generated payloads are forgotten; then
    /// `roots` are sampled in order and `on_replicate` is called with the
    /// replicate index and the model.
    pub fn run<F>(
        &mut self,
        model: &mut Model,
        roots: &[ValueId],
        mut on_replicate: F,
    ) -> Result<(), ModelError>
    where
        F: FnMut(usize, &Model),
    {
        info!(
            seed = self.config.seed,
            replicates = self.config.replicates,
            roots = roots.len(),
            "sampling model"
        );
        for replicate in 0..self.config.replicates {
            model.reset();
            for &root in roots {
                model.sample(root, &mut self.rng)?;
            }
            debug!(replicate, "replicate drawn");
            on_replicate(replicate, model);
        }
        Ok(())
    }
}
