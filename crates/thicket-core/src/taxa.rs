//! Taxon names paired with sampling ages.

use crate::error::DataError;

/// A set of taxa, each with the age (time before present) at which it
/// was sampled. Contemporary taxa have age 0.
#[derive(Clone, Debug, PartialEq)]
pub struct TaxaAges {
    names: Vec<String>,
    ages: Vec<f64>,
}

impl TaxaAges {
    /// Pair names with ages.
    ///
    /// # Errors
    ///
    /// [`DataError::LengthMismatch`] if the lengths differ and
    /// [`DataError::InvalidAge`] for a negative or non-finite age.
    pub fn new(names: Vec<String>, ages: Vec<f64>) -> Result<Self, DataError> {
        if names.len() != ages.len() {
            return Err(DataError::LengthMismatch {
                what: "ages",
                expected: names.len(),
                actual: ages.len(),
            });
        }
        if let Some((index, &age)) = ages
            .iter()
            .enumerate()
            .find(|(_, a)| !a.is_finite() || **a < 0.0)
        {
            return Err(DataError::InvalidAge { index, age });
        }
        Ok(Self { names, ages })
    }

    /// Taxa all sampled at the present.
    pub fn contemporary(names: Vec<String>) -> Self {
        let ages = vec![0.0; names.len()];
        Self { names, ages }
    }

    /// Number of taxa.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether there are no taxa.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Taxon names.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Sampling ages, parallel to [`names`](Self::names).
    pub fn ages(&self) -> &[f64] {
        &self.ages
    }

    /// `(name, age)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.ages.iter().copied())
    }
}
