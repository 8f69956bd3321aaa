//! Strongly-typed identifiers for the model arena.

use std::fmt;

/// Identifies a value within a model.
///
/// `ValueId(n)` is the n-th value created in the model. Ids are never
/// reused; they stay valid for the lifetime of the model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ValueId(pub u32);

impl ValueId {
    /// The id as a `usize` for slice access.
    pub fn get(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ValueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

impl From<u32> for ValueId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies a generator (function or distribution) within a model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeneratorId(pub u32);

impl GeneratorId {
    /// The id as a `usize` for slice access.
    pub fn get(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for GeneratorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{}", self.0)
    }
}

impl From<u32> for GeneratorId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}
