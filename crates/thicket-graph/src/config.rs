//! Sampler configuration and validation.

use std::error::Error;
use std::fmt;

/// Configuration for a [`Sampler`](crate::Sampler) run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SamplerConfig {
    /// Seed for the model-wide ChaCha8 random source. Default: 0.
    pub seed: u64,
    /// Number of independent draws of the model. Default: 1.
    pub replicates: usize,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            replicates: 1,
        }
    }
}

impl SamplerConfig {
    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.replicates == 0 {
            return Err(ConfigError::NoReplicates);
        }
        Ok(())
    }
}

/// Errors detected during [`SamplerConfig::validate()`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// `replicates` is zero.
    NoReplicates,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoReplicates => write!(f, "replicates must be at least 1"),
        }
    }
}

impl Error for ConfigError {}
