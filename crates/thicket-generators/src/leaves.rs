//! Leaf-set parameters shared by the tree generators.

use thicket_core::{Datum, DatumKind, GenerateError};
use thicket_graph::Args;

/// Which of several mutually exclusive parameters is bound.
pub(crate) fn exactly_one<'s>(args: &Args<'_>, names: &[&'s str]) -> Result<&'s str, GenerateError> {
    let bound: Vec<&str> = names.iter().copied().filter(|n| args.is_bound(n)).collect();
    match bound.as_slice() {
        [one] => Ok(*one),
        [] => Err(GenerateError::ConflictingParameters {
            reason: format!("one of {} is required", names.join(", ")),
        }),
        _ => Err(GenerateError::ConflictingParameters {
            reason: format!("only one of {} may be given", bound.join(", ")),
        }),
    }
}

/// A non-negative integer parameter as a count.
pub(crate) fn count(args: &Args<'_>, name: &str) -> Result<usize, GenerateError> {
    let n = args.integer(name)?;
    usize::try_from(n).map_err(|_| GenerateError::invalid(name, format!("{n} is negative")))
}

/// Leaf names `"0"`, `"1"`, ...
pub(crate) fn numbered(n: usize) -> Vec<String> {
    (0..n).map(|i| i.to_string()).collect()
}

/// Taxon names from a string array or a taxa object.
pub(crate) fn names(args: &Args<'_>, name: &str) -> Result<Vec<String>, GenerateError> {
    match args.require(name)? {
        Datum::TextArray(names) => Ok(names.clone()),
        Datum::Taxa(taxa) => Ok(taxa.names().to_vec()),
        other => Err(GenerateError::ParameterType {
            name: name.to_string(),
            expected: format!("{} | {}", DatumKind::TextArray, DatumKind::Taxa),
            actual: other.kind(),
        }),
    }
}
