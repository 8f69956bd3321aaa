//! Test utilities and mock types for Thicket development.
//!
//! Provides mock generators ([`fixtures`]), hand-built trees ([`trees`]),
//! a [`CountingListener`], a [`RecordingVisitor`], and a seeded
//! [`ModelRng`] constructor.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;
pub mod trees;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rand::SeedableRng;
use thicket_core::{Datum, GeneratorId, ModelError, ValueId};
use thicket_graph::{Model, ModelRng, ValueListener, Visitor};

/// A deterministic random source.
pub fn seeded_rng(seed: u64) -> ModelRng {
    ModelRng::seed_from_u64(seed)
}

/// Counts payload notifications.
///
/// The counter is shared, so it can be read after the listener has been
/// boxed into a model.
pub struct CountingListener {
    count: Arc<AtomicUsize>,
}

impl CountingListener {
    pub fn new() -> Self {
        Self {
            count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Handle to the shared counter.
    pub fn counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.count)
    }
}

impl Default for CountingListener {
    fn default() -> Self {
        Self::new()
    }
}

impl ValueListener for CountingListener {
    fn value_set(&mut self, _id: ValueId, _datum: &Datum) {
        self.count.fetch_add(1, Ordering::Relaxed);
    }
}

/// Records visit order as `v{n}` / `g{n}` labels.
#[derive(Default)]
pub struct RecordingVisitor {
    pub visits: Vec<String>,
}

impl RecordingVisitor {
    /// How often a label was visited.
    pub fn count(&self, label: &str) -> usize {
        self.visits.iter().filter(|v| *v == label).count()
    }
}

impl Visitor for RecordingVisitor {
    fn visit_value(&mut self, _model: &Model, id: ValueId) -> Result<(), ModelError> {
        self.visits.push(id.to_string());
        Ok(())
    }

    fn visit_generator(&mut self, _model: &Model, id: GeneratorId) -> Result<(), ModelError> {
        self.visits.push(id.to_string());
        Ok(())
    }
}
