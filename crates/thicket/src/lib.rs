//! Thicket: probabilistic model graphs with phylogenetic tree priors.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! Thicket sub-crates. For most users, adding `thicket` as a single dependency
//! is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use thicket::prelude::*;
//!
//! // theta ~ LogNormal(meanlog=3.0, sdlog=0.5); psi ~ Coalescent(theta=theta, n=10)
//! let mut model = Model::new();
//! let meanlog = model.constant("meanlog", 3.0);
//! let sdlog = model.constant("sdlog", 0.5);
//! let prior = model
//!     .generator(LogNormal, &[("meanlog", meanlog), ("sdlog", sdlog)])
//!     .unwrap();
//! let theta = model.random_variable(prior, Some("theta")).unwrap();
//!
//! let n = model.constant("n", 10i64);
//! let coalescent = model
//!     .generator(Coalescent, &[("theta", theta.id()), ("n", n)])
//!     .unwrap();
//! let psi = model.random_variable(coalescent, Some("psi")).unwrap();
//!
//! let mut rng = <ModelRng as rand::SeedableRng>::seed_from_u64(42);
//! let tree = model.sample(psi, &mut rng).unwrap().as_tree().unwrap();
//! assert_eq!(tree.n_taxa(), 10);
//! assert!(model.log_density(psi).unwrap().is_finite());
//!
//! println!("{}", model.program(psi.id()).unwrap());
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`tree`] | `thicket-tree` | `TimeTree`, Newick output, oldest-first reconstruction |
//! | [`types`] | `thicket-core` | IDs, `Datum`, descriptors, data objects, errors |
//! | [`graph`] | `thicket-graph` | `Model`, `Generator`, traversal, codegen, registry, sampler |
//! | [`generators`] | `thicket-generators` | Tree priors, distributions, functions |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Time trees (`thicket-tree`).
///
/// Most users only need [`tree::TimeTree`], which is also in the
/// [`prelude`].
pub use thicket_tree as tree;

/// Core types, descriptors, and errors (`thicket-core`).
pub use thicket_core as types;

/// The model graph (`thicket-graph`).
///
/// The [`graph::Generator`] trait is the main extension point for
/// user-defined distributions and functions.
pub use thicket_graph as graph;

/// The standard generator catalog (`thicket-generators`).
pub use thicket_generators as generators;

/// Common imports for typical Thicket usage.
///
/// ```rust
/// use thicket::prelude::*;
/// ```
pub mod prelude {
    // Trees
    pub use thicket_tree::{NodeIndex, TimeTree};

    // Core types
    pub use thicket_core::{Alignment, Datum, DatumKind, GeneratorId, TaxaAges, ValueId};

    // Errors
    pub use thicket_core::{GenerateError, ModelError};

    // Graph
    pub use thicket_graph::{
        Args, Generator, Model, ModelRng, RandomVariable, Registry, Sampler, SamplerConfig,
    };

    // Generators
    pub use thicket_generators::{
        BirthDeathSerialSampling, Coalescent, Exp, LogNormal, Normal, StandardLibrary, Uniform,
    };
}
