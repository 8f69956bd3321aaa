//! Generator catalogs.
//!
//! An [`Extension`] contributes ordered lists of distributions and
//! functions. A [`Registry`] is assembled once from a set of extensions and
//! then passed by reference to whatever needs to look generators up by
//! name.

use std::error::Error;
use std::fmt;

use indexmap::IndexMap;
use thicket_core::{GeneratorInfo, GeneratorKind};
use tracing::info;

use crate::generator::Generator;

/// A constructible generator type together with its descriptor.
#[derive(Clone, Copy)]
pub struct GeneratorEntry {
    info: &'static GeneratorInfo,
    create: fn() -> Box<dyn Generator>,
}

fn boxed<G: Generator + Default>() -> Box<dyn Generator> {
    Box::new(G::default())
}

impl GeneratorEntry {
    /// Entry for a default-constructible generator type.
    pub fn new<G: Generator + Default>() -> Self {
        Self {
            info: G::default().info(),
            create: boxed::<G>,
        }
    }

    /// The generator's descriptor.
    pub fn info(&self) -> &'static GeneratorInfo {
        self.info
    }

    /// A fresh instance.
    pub fn create(&self) -> Box<dyn Generator> {
        (self.create)()
    }
}

impl fmt::Debug for GeneratorEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorEntry")
            .field("name", &self.info.name)
            .field("kind", &self.info.kind)
            .finish()
    }
}

/// A named bundle of generators.
pub trait Extension {
    /// Name used in diagnostics.
    fn name(&self) -> &str;

    /// Distributions, in registration order.
    fn distributions(&self) -> Vec<GeneratorEntry>;

    /// Functions, in registration order.
    fn functions(&self) -> Vec<GeneratorEntry>;
}

// ── RegistryError ──────────────────────────────────────────────────

/// Errors assembling or querying a [`Registry`].
#[derive(Clone, Debug, PartialEq)]
pub enum RegistryError {
    /// The extensions provided no generators of one kind.
    EmptyCatalog {
        /// The kind that is missing.
        kind: GeneratorKind,
    },
    /// An entry was listed under the wrong kind.
    KindMismatch {
        /// The extension that listed it.
        extension: String,
        /// The generator's name.
        name: &'static str,
        /// The list it appeared in.
        listed_as: GeneratorKind,
    },
    /// No generator has this name.
    UnknownGenerator {
        /// The requested name.
        name: String,
    },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyCatalog { kind } => write!(f, "no {kind} registered"),
            Self::KindMismatch {
                extension,
                name,
                listed_as,
            } => write!(f, "extension '{extension}' lists {name} as a {listed_as}"),
            Self::UnknownGenerator { name } => write!(f, "no generator named '{name}'"),
        }
    }
}

impl Error for RegistryError {}

// ── Registry ───────────────────────────────────────────────────────

/// Name → generator lookup built from a set of extensions.
///
/// Several entries may share a name; lookups return them in registration
/// order and [`create`](Self::create) uses the first.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    distributions: IndexMap<&'static str, Vec<GeneratorEntry>>,
    functions: IndexMap<&'static str, Vec<GeneratorEntry>>,
}

impl Registry {
    /// Assemble a registry.
    ///
    /// # Errors
    ///
    /// [`RegistryError::KindMismatch`] for an entry listed under the wrong
    /// kind and [`RegistryError::EmptyCatalog`] if the extensions provide
    /// no distributions or no functions at all.
    pub fn from_extensions(extensions: &[&dyn Extension]) -> Result<Self, RegistryError> {
        let mut registry = Self::default();
        for ext in extensions {
            let lists = [
                (GeneratorKind::Distribution, ext.distributions()),
                (GeneratorKind::Function, ext.functions()),
            ];
            for (listed_as, entries) in lists {
                for entry in entries {
                    if entry.info.kind != listed_as {
                        return Err(RegistryError::KindMismatch {
                            extension: ext.name().to_string(),
                            name: entry.info.name,
                            listed_as,
                        });
                    }
                    let map = match listed_as {
                        GeneratorKind::Distribution => &mut registry.distributions,
                        GeneratorKind::Function => &mut registry.functions,
                    };
                    map.entry(entry.info.name).or_default().push(entry);
                }
            }
        }
        if registry.distributions.is_empty() {
            return Err(RegistryError::EmptyCatalog {
                kind: GeneratorKind::Distribution,
            });
        }
        if registry.functions.is_empty() {
            return Err(RegistryError::EmptyCatalog {
                kind: GeneratorKind::Function,
            });
        }
        info!(
            extensions = ?extensions.iter().map(|e| e.name()).collect::<Vec<_>>(),
            distributions = registry.distributions.len(),
            functions = registry.functions.len(),
            "generator registry assembled"
        );
        Ok(registry)
    }

    /// Entries for a distribution name.
    pub fn distribution(&self, name: &str) -> Option<&[GeneratorEntry]> {
        self.distributions.get(name).map(Vec::as_slice)
    }

    /// Entries for a function name.
    pub fn function(&self, name: &str) -> Option<&[GeneratorEntry]> {
        self.functions.get(name).map(Vec::as_slice)
    }

    /// Instantiate the first generator registered under `name`,
    /// distributions first.
    pub fn create(&self, name: &str) -> Result<Box<dyn Generator>, RegistryError> {
        self.distribution(name)
            .or_else(|| self.function(name))
            .and_then(<[GeneratorEntry]>::first)
            .map(GeneratorEntry::create)
            .ok_or_else(|| RegistryError::UnknownGenerator {
                name: name.to_string(),
            })
    }

    /// Registered distribution names in registration order.
    pub fn distribution_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.distributions.keys().copied()
    }

    /// Registered function names in registration order.
    pub fn function_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.functions.keys().copied()
    }
}
