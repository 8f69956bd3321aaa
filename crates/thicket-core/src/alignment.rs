//! Discrete-character sequence alignments.

use crate::error::DataError;

/// A taxa × sites matrix of discrete character states.
///
/// States are small integer codes; one code is designated as the
/// unknown (missing data) state. Storage is row-major by taxon.
#[derive(Clone, Debug, PartialEq)]
pub struct Alignment {
    taxa: Vec<String>,
    n_sites: usize,
    states: Vec<u8>,
    unknown_state: u8,
}

impl Alignment {
    /// An alignment with every cell set to `unknown_state`.
    pub fn new(taxa: Vec<String>, n_sites: usize, unknown_state: u8) -> Self {
        let states = vec![unknown_state; taxa.len() * n_sites];
        Self {
            taxa,
            n_sites,
            states,
            unknown_state,
        }
    }

    /// Build from one row of states per taxon.
    ///
    /// # Errors
    ///
    /// [`DataError::LengthMismatch`] if the row count differs from the
    /// taxon count or rows differ in length.
    pub fn from_rows(
        taxa: Vec<String>,
        rows: Vec<Vec<u8>>,
        unknown_state: u8,
    ) -> Result<Self, DataError> {
        if rows.len() != taxa.len() {
            return Err(DataError::LengthMismatch {
                what: "rows",
                expected: taxa.len(),
                actual: rows.len(),
            });
        }
        let n_sites = rows.first().map_or(0, Vec::len);
        let mut states = Vec::with_capacity(taxa.len() * n_sites);
        for row in rows {
            if row.len() != n_sites {
                return Err(DataError::LengthMismatch {
                    what: "row",
                    expected: n_sites,
                    actual: row.len(),
                });
            }
            states.extend_from_slice(&row);
        }
        Ok(Self {
            taxa,
            n_sites,
            states,
            unknown_state,
        })
    }

    /// Number of taxa (rows).
    pub fn n_taxa(&self) -> usize {
        self.taxa.len()
    }

    /// Number of sites (columns).
    pub fn n_sites(&self) -> usize {
        self.n_sites
    }

    /// Taxon names in row order.
    pub fn taxa(&self) -> &[String] {
        &self.taxa
    }

    /// The state code that marks missing data.
    pub fn unknown_state(&self) -> u8 {
        self.unknown_state
    }

    /// State of `taxon` at `site`.
    pub fn state(&self, taxon: usize, site: usize) -> Option<u8> {
        if taxon >= self.taxa.len() || site >= self.n_sites {
            return None;
        }
        Some(self.states[taxon * self.n_sites + site])
    }

    /// Overwrite the state of `taxon` at `site`.
    pub fn set_state(&mut self, taxon: usize, site: usize, state: u8) -> Result<(), DataError> {
        if taxon >= self.taxa.len() {
            return Err(DataError::IndexOutOfRange {
                what: "taxon",
                index: taxon,
                len: self.taxa.len(),
            });
        }
        if site >= self.n_sites {
            return Err(DataError::IndexOutOfRange {
                what: "site",
                index: site,
                len: self.n_sites,
            });
        }
        self.states[taxon * self.n_sites + site] = state;
        Ok(())
    }

    /// Proportion of taxa with the unknown state at `site`.
    ///
    /// Zero for an alignment without taxa.
    pub fn missing_fraction(&self, site: usize) -> f64 {
        if self.taxa.is_empty() || site >= self.n_sites {
            return 0.0;
        }
        let missing = (0..self.taxa.len())
            .filter(|&t| self.states[t * self.n_sites + site] == self.unknown_state)
            .count();
        missing as f64 / self.taxa.len() as f64
    }

    /// A new alignment keeping only the given sites, in the given order.
    pub fn select_sites(&self, sites: &[usize]) -> Result<Self, DataError> {
        if let Some(&bad) = sites.iter().find(|&&s| s >= self.n_sites) {
            return Err(DataError::IndexOutOfRange {
                what: "site",
                index: bad,
                len: self.n_sites,
            });
        }
        let mut states = Vec::with_capacity(self.taxa.len() * sites.len());
        for t in 0..self.taxa.len() {
            let row = &self.states[t * self.n_sites..(t + 1) * self.n_sites];
            states.extend(sites.iter().map(|&s| row[s]));
        }
        Ok(Self {
            taxa: self.taxa.clone(),
            n_sites: sites.len(),
            states,
            unknown_state: self.unknown_state,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const N: u8 = 15;

    fn sample() -> Alignment {
        Alignment::from_rows(
            vec!["a".into(), "b".into(), "c".into(), "d".into()],
            vec![
                vec![0, N, 2, N],
                vec![1, N, 2, 3],
                vec![0, N, N, 3],
                vec![2, 1, 2, 3],
            ],
            N,
        )
        .unwrap()
    }

    #[test]
    fn dimensions_and_lookup() {
        let aln = sample();
        assert_eq!(aln.n_taxa(), 4);
        assert_eq!(aln.n_sites(), 4);
        assert_eq!(aln.state(3, 1), Some(1));
        assert_eq!(aln.state(4, 0), None);
    }

    #[test]
    fn missing_fractions() {
        let aln = sample();
        assert_eq!(aln.missing_fraction(0), 0.0);
        assert_eq!(aln.missing_fraction(1), 0.75);
        assert_eq!(aln.missing_fraction(2), 0.25);
    }

    #[test]
    fn select_sites_keeps_rows() {
        let aln = sample().select_sites(&[0, 3]).unwrap();
        assert_eq!(aln.n_sites(), 2);
        assert_eq!(aln.state(0, 1), Some(N));
        assert_eq!(aln.state(3, 0), Some(2));
        assert!(sample().select_sites(&[4]).is_err());
    }

    #[test]
    fn ragged_rows_rejected() {
        let err = Alignment::from_rows(vec!["a".into(), "b".into()], vec![vec![0, 1], vec![0]], N)
            .unwrap_err();
        assert!(matches!(err, DataError::LengthMismatch { what: "row", .. }));
    }

    #[test]
    fn set_state_bounds_checked() {
        let mut aln = Alignment::new(vec!["a".into()], 2, N);
        aln.set_state(0, 1, 3).unwrap();
        assert_eq!(aln.state(0, 1), Some(3));
        assert!(aln.set_state(0, 2, 3).is_err());
    }
}
