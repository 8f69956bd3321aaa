//! The payload carried by model values.

use std::fmt;

use thicket_tree::TimeTree;

use crate::alignment::Alignment;
use crate::taxa::TaxaAges;

/// The kind of a [`Datum`]. Fixed for a value once it is created.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DatumKind {
    /// A real number.
    Real,
    /// An integer.
    Integer,
    /// A boolean.
    Boolean,
    /// A string.
    Text,
    /// A vector of reals.
    RealArray,
    /// A vector of integers.
    IntegerArray,
    /// A vector of booleans.
    BooleanArray,
    /// A vector of strings.
    TextArray,
    /// A time tree.
    Tree,
    /// Taxa with sampling ages.
    Taxa,
    /// A character alignment.
    Alignment,
}

impl DatumKind {
    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Real => "Real",
            Self::Integer => "Integer",
            Self::Boolean => "Boolean",
            Self::Text => "String",
            Self::RealArray => "Real[]",
            Self::IntegerArray => "Integer[]",
            Self::BooleanArray => "Boolean[]",
            Self::TextArray => "String[]",
            Self::Tree => "TimeTree",
            Self::Taxa => "TaxaAges",
            Self::Alignment => "Alignment",
        }
    }

    /// Whether this kind is one of the vector kinds.
    pub fn is_array(self) -> bool {
        matches!(
            self,
            Self::RealArray | Self::IntegerArray | Self::BooleanArray | Self::TextArray
        )
    }

    /// Whether this kind is a scalar number.
    pub fn is_number(self) -> bool {
        matches!(self, Self::Real | Self::Integer)
    }
}

impl fmt::Display for DatumKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a value should be laid out by a tabular formatter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueShape {
    /// One numeric column.
    Number,
    /// One boolean column.
    Boolean,
    /// One text column.
    Text,
    /// `len` columns, one per element.
    Vector {
        /// Number of elements.
        len: usize,
    },
    /// A tree, logged separately rather than as columns.
    Tree {
        /// Number of leaves.
        n_taxa: usize,
    },
    /// A taxa object.
    Taxa {
        /// Number of taxa.
        n_taxa: usize,
    },
    /// An alignment, logged separately rather than as columns.
    Alignment {
        /// Number of taxa.
        n_taxa: usize,
        /// Number of sites.
        n_sites: usize,
    },
}

/// A concrete value held by a model node.
#[derive(Clone, Debug, PartialEq)]
pub enum Datum {
    /// A real number.
    Real(f64),
    /// An integer.
    Integer(i64),
    /// A boolean.
    Boolean(bool),
    /// A string.
    Text(String),
    /// A vector of reals.
    RealArray(Vec<f64>),
    /// A vector of integers.
    IntegerArray(Vec<i64>),
    /// A vector of booleans.
    BooleanArray(Vec<bool>),
    /// A vector of strings.
    TextArray(Vec<String>),
    /// A time tree.
    Tree(TimeTree),
    /// Taxa with sampling ages.
    Taxa(TaxaAges),
    /// A character alignment.
    Alignment(Alignment),
}

/// Apply `$body` to the vector inside any array variant, rewrapping the
/// result in the same variant.
macro_rules! map_array {
    ($datum:expr, |$v:ident| $body:expr) => {
        match $datum {
            Datum::RealArray($v) => $body.map(Datum::RealArray),
            Datum::IntegerArray($v) => $body.map(Datum::IntegerArray),
            Datum::BooleanArray($v) => $body.map(Datum::BooleanArray),
            Datum::TextArray($v) => $body.map(Datum::TextArray),
            _ => None,
        }
    };
}

impl Datum {
    /// The kind of this payload.
    pub fn kind(&self) -> DatumKind {
        match self {
            Self::Real(_) => DatumKind::Real,
            Self::Integer(_) => DatumKind::Integer,
            Self::Boolean(_) => DatumKind::Boolean,
            Self::Text(_) => DatumKind::Text,
            Self::RealArray(_) => DatumKind::RealArray,
            Self::IntegerArray(_) => DatumKind::IntegerArray,
            Self::BooleanArray(_) => DatumKind::BooleanArray,
            Self::TextArray(_) => DatumKind::TextArray,
            Self::Tree(_) => DatumKind::Tree,
            Self::Taxa(_) => DatumKind::Taxa,
            Self::Alignment(_) => DatumKind::Alignment,
        }
    }

    /// Layout hint for external formatters.
    pub fn shape(&self) -> ValueShape {
        match self {
            Self::Real(_) | Self::Integer(_) => ValueShape::Number,
            Self::Boolean(_) => ValueShape::Boolean,
            Self::Text(_) => ValueShape::Text,
            Self::Tree(t) => ValueShape::Tree { n_taxa: t.n_taxa() },
            Self::Taxa(t) => ValueShape::Taxa { n_taxa: t.len() },
            Self::Alignment(a) => ValueShape::Alignment {
                n_taxa: a.n_taxa(),
                n_sites: a.n_sites(),
            },
            _ => ValueShape::Vector {
                len: self.len().unwrap_or(0),
            },
        }
    }

    /// The value as a real, widening integers.
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Self::Real(v) => Some(*v),
            Self::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// The value as an integer.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// The value as a boolean.
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Self::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    /// The value as a string.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }

    /// A numeric vector as reals, widening integers.
    pub fn to_real_vec(&self) -> Option<Vec<f64>> {
        match self {
            Self::RealArray(v) => Some(v.clone()),
            Self::IntegerArray(v) => Some(v.iter().map(|&x| x as f64).collect()),
            _ => None,
        }
    }

    /// The value as a string vector.
    pub fn as_text_array(&self) -> Option<&[String]> {
        match self {
            Self::TextArray(v) => Some(v),
            _ => None,
        }
    }

    /// The value as a tree.
    pub fn as_tree(&self) -> Option<&TimeTree> {
        match self {
            Self::Tree(t) => Some(t),
            _ => None,
        }
    }

    /// The value as taxa.
    pub fn as_taxa(&self) -> Option<&TaxaAges> {
        match self {
            Self::Taxa(t) => Some(t),
            _ => None,
        }
    }

    /// The value as an alignment.
    pub fn as_alignment(&self) -> Option<&Alignment> {
        match self {
            Self::Alignment(a) => Some(a),
            _ => None,
        }
    }

    /// Element count of an array value.
    pub fn len(&self) -> Option<usize> {
        match self {
            Self::RealArray(v) => Some(v.len()),
            Self::IntegerArray(v) => Some(v.len()),
            Self::BooleanArray(v) => Some(v.len()),
            Self::TextArray(v) => Some(v.len()),
            _ => None,
        }
    }

    /// Whether this is an empty array. Non-arrays are never empty.
    pub fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }

    /// A new array of the same kind holding the elements at `indices`.
    ///
    /// `None` for non-arrays or when an index is out of range.
    pub fn select(&self, indices: &[usize]) -> Option<Datum> {
        map_array!(self, |v| indices
            .iter()
            .map(|&i| v.get(i).cloned())
            .collect::<Option<Vec<_>>>())
    }

    /// A new array of the same kind with the elements repeated `times` over.
    pub fn repeat(&self, times: usize) -> Option<Datum> {
        map_array!(self, |v| Some(
            v.iter()
                .cycle()
                .take(v.len() * times)
                .cloned()
                .collect::<Vec<_>>()
        ))
    }

    /// Source-text literal for this payload.
    ///
    /// Taxa render as a `taxa(...)` call and trees as a `newick(...)` call.
    /// Alignments have no literal form.
    pub fn literal(&self) -> Option<String> {
        Some(match self {
            Self::Real(v) => real_literal(*v),
            Self::Integer(v) => v.to_string(),
            Self::Boolean(v) => v.to_string(),
            Self::Text(v) => format!("{v:?}"),
            Self::RealArray(v) => list(v.iter().map(|x| real_literal(*x))),
            Self::IntegerArray(v) => list(v.iter().map(i64::to_string)),
            Self::BooleanArray(v) => list(v.iter().map(bool::to_string)),
            Self::TextArray(v) => list(v.iter().map(|s| format!("{s:?}"))),
            Self::Tree(t) => format!("newick({:?})", t.to_newick()),
            Self::Taxa(t) => format!(
                "taxa(names={}, ages={})",
                list(t.names().iter().map(|s| format!("{s:?}"))),
                list(t.ages().iter().map(|x| real_literal(*x)))
            ),
            Self::Alignment(_) => return None,
        })
    }
}

fn real_literal(v: f64) -> String {
    format!("{v:?}")
}

fn list(items: impl Iterator<Item = String>) -> String {
    let items: Vec<String> = items.collect();
    format!("[{}]", items.join(", "))
}

impl From<f64> for Datum {
    fn from(v: f64) -> Self {
        Self::Real(v)
    }
}

impl From<i64> for Datum {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<bool> for Datum {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<&str> for Datum {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Datum {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<Vec<f64>> for Datum {
    fn from(v: Vec<f64>) -> Self {
        Self::RealArray(v)
    }
}

impl From<Vec<i64>> for Datum {
    fn from(v: Vec<i64>) -> Self {
        Self::IntegerArray(v)
    }
}

impl From<Vec<bool>> for Datum {
    fn from(v: Vec<bool>) -> Self {
        Self::BooleanArray(v)
    }
}

impl From<Vec<String>> for Datum {
    fn from(v: Vec<String>) -> Self {
        Self::TextArray(v)
    }
}

impl From<TimeTree> for Datum {
    fn from(v: TimeTree) -> Self {
        Self::Tree(v)
    }
}

impl From<TaxaAges> for Datum {
    fn from(v: TaxaAges) -> Self {
        Self::Taxa(v)
    }
}

impl From<Alignment> for Datum {
    fn from(v: Alignment) -> Self {
        Self::Alignment(v)
    }
}
