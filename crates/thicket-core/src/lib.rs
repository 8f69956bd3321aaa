//! Core value types, descriptors, and errors for Thicket models.
//!
//! Defines the payload carried by every value in a model ([`Datum`]),
//! the typed identifiers of the model arena ([`ValueId`], [`GeneratorId`]),
//! the static parameter schema attached to each generator type
//! ([`GeneratorInfo`], [`ParamInfo`]), the phylogenetic data types that
//! are not trees ([`TaxaAges`], [`Alignment`]), and the error enums shared
//! by the graph engine and the generator library.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod alignment;
pub mod datum;
pub mod error;
pub mod id;
pub mod schema;
pub mod taxa;

pub use alignment::Alignment;
pub use datum::{Datum, DatumKind, ValueShape};
pub use error::{DataError, GenerateError, ModelError};
pub use id::{GeneratorId, ValueId};
pub use schema::{GeneratorInfo, GeneratorKind, ParamInfo, ParamKind, ReturnKind};
pub use taxa::TaxaAges;
pub use thicket_tree::{NodeIndex, TimeTree, TimeTreeNode, TreeError};
