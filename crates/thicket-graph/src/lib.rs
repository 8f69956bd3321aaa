//! The Thicket model engine.
//!
//! A [`Model`] is a directed acyclic graph of values and the generators
//! that produce them. Generators are either deterministic functions or
//! random distributions; both implement the stateless [`Generator`] trait
//! and describe themselves with a static
//! [`GeneratorInfo`](thicket_core::GeneratorInfo).
//!
//! Sampling is lazy: asking for a value forces the generators upstream of
//! it in post-order, each exactly once, and memoizes the results until the
//! model is [`reset`](Model::reset). Randomness comes from a single
//! [`ModelRng`] passed down by the caller, so a seed fixes the draw.
//!
//! Generators are looked up by name through a [`Registry`] assembled from
//! [`Extension`]s. A [`Sampler`] draws a model repeatedly from a validated
//! [`SamplerConfig`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod codegen;
pub mod config;
pub mod generator;
pub mod listener;
pub mod model;
pub mod registry;
pub mod sampler;
pub mod traverse;

pub use config::{ConfigError, SamplerConfig};
pub use generator::{Args, Generator, ModelRng};
pub use listener::ValueListener;
pub use model::{LoggableValue, Model, RandomVariable};
pub use registry::{Extension, GeneratorEntry, Registry, RegistryError};
pub use sampler::Sampler;
pub use traverse::{walk, Order, Visitor};
