//! Error types for Thicket models.
//!
//! Organised by layer: [`DataError`] for malformed data objects,
//! [`GenerateError`] for a single generator's validation and sampling,
//! and [`ModelError`] for the DAG engine that wires generators together.

use std::error::Error;
use std::fmt;

use thicket_tree::TreeError;

use crate::datum::DatumKind;
use crate::id::{GeneratorId, ValueId};

// ── DataError ──────────────────────────────────────────────────────

/// Errors constructing or indexing taxa and alignment objects.
#[derive(Clone, Debug, PartialEq)]
pub enum DataError {
    /// Two parallel collections disagree in length.
    LengthMismatch {
        /// What was being matched (e.g. `"ages"`).
        what: &'static str,
        /// The required length.
        expected: usize,
        /// The supplied length.
        actual: usize,
    },
    /// An age is negative or non-finite.
    InvalidAge {
        /// Position of the offending age.
        index: usize,
        /// The age.
        age: f64,
    },
    /// An index is outside the valid range.
    IndexOutOfRange {
        /// What was being indexed (e.g. `"site"`).
        what: &'static str,
        /// The index.
        index: usize,
        /// The collection length.
        len: usize,
    },
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LengthMismatch {
                what,
                expected,
                actual,
            } => write!(f, "{what} has length {actual}, expected {expected}"),
            Self::InvalidAge { index, age } => {
                write!(f, "age {age} at position {index} must be finite and >= 0")
            }
            Self::IndexOutOfRange { what, index, len } => {
                write!(f, "{what} index {index} out of range for length {len}")
            }
        }
    }
}

impl Error for DataError {}

// ── GenerateError ──────────────────────────────────────────────────

/// Errors reported by an individual generator.
///
/// Returned by `Generator::validate()`, `generate()`, and `log_density()`
/// and wrapped in [`ModelError::Generator`] by the model.
#[derive(Clone, Debug, PartialEq)]
pub enum GenerateError {
    /// A parameter value is outside its valid range.
    InvalidParameter {
        /// The parameter name.
        name: String,
        /// Why the value was rejected.
        reason: String,
    },
    /// Mutually exclusive parameters were both supplied, or none of a
    /// required group was.
    ConflictingParameters {
        /// Description of the conflict.
        reason: String,
    },
    /// A required parameter is not bound.
    MissingParameter {
        /// The parameter name.
        name: String,
    },
    /// A bound parameter holds a value of the wrong kind.
    ParameterType {
        /// The parameter name.
        name: String,
        /// The kind the generator needed.
        expected: String,
        /// The kind it got.
        actual: DatumKind,
    },
    /// A parameter is bound but its value has not been generated yet.
    NotMaterialized {
        /// The parameter name.
        name: String,
    },
    /// The operation has no implementation for this generator.
    Unsupported {
        /// The operation, e.g. `"log_density"`.
        operation: &'static str,
    },
    /// A tree operation failed.
    Tree(TreeError),
    /// A data object could not be built.
    Data(DataError),
    /// Generation failed for another reason.
    ExecutionFailed {
        /// Description of the failure.
        reason: String,
    },
}

impl GenerateError {
    /// Shorthand for [`GenerateError::InvalidParameter`].
    pub fn invalid(name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameter { name, reason } => {
                write!(f, "invalid parameter '{name}': {reason}")
            }
            Self::ConflictingParameters { reason } => {
                write!(f, "conflicting parameters: {reason}")
            }
            Self::MissingParameter { name } => write!(f, "missing parameter '{name}'"),
            Self::ParameterType {
                name,
                expected,
                actual,
            } => write!(f, "parameter '{name}' expects {expected}, got {actual}"),
            Self::NotMaterialized { name } => {
                write!(f, "parameter '{name}' has not been generated yet")
            }
            Self::Unsupported { operation } => write!(f, "{operation} is not implemented"),
            Self::Tree(e) => write!(f, "tree: {e}"),
            Self::Data(e) => write!(f, "data: {e}"),
            Self::ExecutionFailed { reason } => write!(f, "execution failed: {reason}"),
        }
    }
}

impl Error for GenerateError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Tree(e) => Some(e),
            Self::Data(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TreeError> for GenerateError {
    fn from(e: TreeError) -> Self {
        Self::Tree(e)
    }
}

impl From<DataError> for GenerateError {
    fn from(e: DataError) -> Self {
        Self::Data(e)
    }
}

// ── ModelError ─────────────────────────────────────────────────────

/// Errors from building, traversing, or sampling a model.
#[derive(Clone, Debug, PartialEq)]
pub enum ModelError {
    /// A value id that does not belong to this model.
    UnknownValue {
        /// The unrecognised id.
        id: ValueId,
    },
    /// A generator id that does not belong to this model.
    UnknownGenerator {
        /// The unrecognised id.
        id: GeneratorId,
    },
    /// A parameter name the generator does not declare.
    UnknownParameter {
        /// The generator's canonical name.
        generator: String,
        /// The rejected parameter name.
        name: String,
    },
    /// A required parameter is not bound.
    MissingParameter {
        /// The generator's canonical name.
        generator: String,
        /// The missing parameter name.
        name: String,
    },
    /// A parameter was bound to a value of a kind it does not accept.
    ParameterKind {
        /// The generator's canonical name.
        generator: String,
        /// The parameter name.
        name: String,
        /// What the parameter accepts.
        expected: String,
        /// The kind of the offered value.
        actual: DatumKind,
    },
    /// The parameter graph contains (or would contain) a cycle through
    /// this value.
    Cycle {
        /// A value on the cycle.
        value: ValueId,
    },
    /// A payload of the wrong kind was offered to a value.
    TypeMismatch {
        /// The value.
        value: ValueId,
        /// The value's fixed kind.
        expected: DatumKind,
        /// The offered kind.
        actual: DatumKind,
    },
    /// A random variable was requested from a deterministic function.
    NotADistribution {
        /// The generator's canonical name.
        generator: String,
    },
    /// The generator already has an output value.
    AlreadyDerived {
        /// The generator's canonical name.
        generator: String,
        /// Its existing output.
        value: ValueId,
    },
    /// The value has no payload yet.
    NotMaterialized {
        /// The value.
        value: ValueId,
    },
    /// The value was not produced by a generator.
    NoProvenance {
        /// The value.
        value: ValueId,
    },
    /// The value cannot be written as an inline literal.
    Unrepresentable {
        /// The value.
        value: ValueId,
        /// Its kind.
        kind: DatumKind,
    },
    /// A generator failed.
    Generator {
        /// The generator's canonical name.
        name: String,
        /// The underlying error.
        reason: GenerateError,
    },
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownValue { id } => write!(f, "unknown value {id}"),
            Self::UnknownGenerator { id } => write!(f, "unknown generator {id}"),
            Self::UnknownParameter { generator, name } => {
                write!(f, "{generator} has no parameter '{name}'")
            }
            Self::MissingParameter { generator, name } => {
                write!(f, "{generator} requires parameter '{name}'")
            }
            Self::ParameterKind {
                generator,
                name,
                expected,
                actual,
            } => write!(
                f,
                "{generator} parameter '{name}' accepts {expected}, got {actual}"
            ),
            Self::Cycle { value } => write!(f, "parameter cycle through {value}"),
            Self::TypeMismatch {
                value,
                expected,
                actual,
            } => write!(f, "value {value} holds {expected}, cannot store {actual}"),
            Self::NotADistribution { generator } => {
                write!(f, "{generator} is a function, not a distribution")
            }
            Self::AlreadyDerived { generator, value } => {
                write!(f, "{generator} already produces value {value}")
            }
            Self::NotMaterialized { value } => write!(f, "value {value} has not been generated"),
            Self::NoProvenance { value } => write!(f, "value {value} has no generator"),
            Self::Unrepresentable { value, kind } => {
                write!(f, "value {value} of kind {kind} has no literal form")
            }
            Self::Generator { name, reason } => write!(f, "{name}: {reason}"),
        }
    }
}

impl Error for ModelError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Generator { reason, .. } => Some(reason),
            _ => None,
        }
    }
}
