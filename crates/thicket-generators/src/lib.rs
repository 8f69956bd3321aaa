//! Tree priors, distributions, and deterministic functions for Thicket
//! models.
//!
//! # Tree priors
//!
//! | Generator | Returns | Density |
//! |-----------|---------|---------|
//! | [`Coalescent`] | `TimeTree` over contemporary leaves | closed form |
//! | [`BirthDeathSerialSampling`] | `TimeTree` conditioned on the root age | unsupported |
//!
//! Both produce binary trees whose leaves occupy node indices `0..n` and
//! whose root is an internal node (or the single leaf, for a one-taxon
//! coalescent).
//!
//! # Everything else
//!
//! Distributions [`Exp`], [`Normal`], [`LogNormal`], [`Uniform`],
//! [`Sample`] and [`FilterMissingSites`]; functions [`ExpFn`], [`Sort`],
//! [`RepArray`], [`TreeLength`], [`NodeCount`] and [`Taxa`].
//! [`StandardLibrary`] registers all of them.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod birth_death;
pub mod coalescent;
pub mod continuous;
pub mod filter;
pub mod functions;
mod leaves;
pub mod library;
pub mod sample;

pub use birth_death::{BirthDeathRates, BirthDeathSerialSampling};
pub use coalescent::Coalescent;
pub use continuous::{Exp, LogNormal, Normal, Uniform};
pub use filter::FilterMissingSites;
pub use functions::{ExpFn, NodeCount, RepArray, Sort, Taxa, TreeLength};
pub use library::StandardLibrary;
pub use sample::Sample;
