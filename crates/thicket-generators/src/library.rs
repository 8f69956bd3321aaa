//! The standard generator catalog.

use thicket_graph::{Extension, GeneratorEntry};

use crate::{
    BirthDeathSerialSampling, Coalescent, Exp, ExpFn, FilterMissingSites, LogNormal, NodeCount,
    Normal, RepArray, Sample, Sort, Taxa, TreeLength, Uniform,
};

/// Every generator in this crate, as an [`Extension`].
///
/// ```
/// use thicket_generators::StandardLibrary;
/// use thicket_graph::Registry;
///
/// let registry = Registry::from_extensions(&[&StandardLibrary]).unwrap();
/// assert!(registry.distribution("Coalescent").is_some());
/// assert!(registry.function("treeLength").is_some());
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardLibrary;

impl Extension for StandardLibrary {
    fn name(&self) -> &str {
        "standard"
    }

    fn distributions(&self) -> Vec<GeneratorEntry> {
        vec![
            GeneratorEntry::new::<Coalescent>(),
            GeneratorEntry::new::<BirthDeathSerialSampling>(),
            GeneratorEntry::new::<Exp>(),
            GeneratorEntry::new::<Normal>(),
            GeneratorEntry::new::<LogNormal>(),
            GeneratorEntry::new::<Uniform>(),
            GeneratorEntry::new::<Sample>(),
            GeneratorEntry::new::<FilterMissingSites>(),
        ]
    }

    fn functions(&self) -> Vec<GeneratorEntry> {
        vec![
            GeneratorEntry::new::<ExpFn>(),
            GeneratorEntry::new::<Sort>(),
            GeneratorEntry::new::<RepArray>(),
            GeneratorEntry::new::<TreeLength>(),
            GeneratorEntry::new::<NodeCount>(),
            GeneratorEntry::new::<Taxa>(),
        ]
    }
}
