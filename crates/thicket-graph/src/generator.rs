//! The [`Generator`] trait and the [`Args`] view it reads parameters from.
//!
//! Generators are stateless: everything a generator needs arrives through
//! [`Args`], a name-keyed view of the payloads currently bound to its
//! parameters. The model owns the values; a generator only borrows them
//! for the duration of one call.

use indexmap::IndexMap;
use rand_chacha::ChaCha8Rng;
use thicket_core::{
    Alignment, Datum, DatumKind, GenerateError, GeneratorInfo, TaxaAges, TimeTree,
};

/// The random source threaded through every sampling call.
pub type ModelRng = ChaCha8Rng;

/// A function or distribution that produces one value from its parameters.
///
/// # Contract
///
/// - `&self`: generators hold no per-model state; parameters come from
///   [`Args`].
/// - `generate()` for a [`Function`](thicket_core::GeneratorKind::Function)
///   must be a pure function of its arguments and must not touch `rng`.
/// - `generate()` for a [`Distribution`](thicket_core::GeneratorKind::Distribution)
///   must draw from `rng` in a fixed order so that a seed reproduces a
///   sample.
/// - The returned [`Datum`] must have the kind promised by
///   [`GeneratorInfo::returns`].
///
/// # Object safety
///
/// This trait is object-safe; the model stores generators as
/// `Box<dyn Generator>`.
///
/// # Examples
///
/// ```
/// use thicket_core::{Datum, DatumKind, GenerateError, GeneratorInfo,
///     GeneratorKind, ParamInfo, ParamKind, ReturnKind};
/// use thicket_graph::{Args, Generator, ModelRng};
///
/// struct Square;
///
/// static SQUARE: GeneratorInfo = GeneratorInfo {
///     name: "square",
///     kind: GeneratorKind::Function,
///     description: "x squared",
///     params: &[ParamInfo::required("x", ParamKind::Number, "input")],
///     returns: ReturnKind::Fixed(DatumKind::Real),
/// };
///
/// impl Generator for Square {
///     fn info(&self) -> &'static GeneratorInfo { &SQUARE }
///
///     fn generate(&self, args: &Args<'_>, _rng: &mut ModelRng) -> Result<Datum, GenerateError> {
///         let x = args.real("x")?;
///         Ok(Datum::Real(x * x))
///     }
/// }
///
/// let x = Datum::Real(3.0);
/// let mut args = Args::new("square");
/// args.bind("x", Some(&x));
/// let mut rng = <ModelRng as rand::SeedableRng>::seed_from_u64(0);
/// assert_eq!(Square.generate(&args, &mut rng), Ok(Datum::Real(9.0)));
/// ```
pub trait Generator: Send + 'static {
    /// Static descriptor: name, kind, parameter schema, return kind.
    fn info(&self) -> &'static GeneratorInfo;

    /// Check parameter values that are already available.
    ///
    /// Called when the generator is wired into a model (where some
    /// parameters may not be materialized yet) and again before every
    /// `generate()`. Implementations should check only what
    /// [`Args::peek`] can see.
    fn validate(&self, args: &Args<'_>) -> Result<(), GenerateError> {
        let _ = args;
        Ok(())
    }

    /// Produce a value from fully materialized arguments.
    fn generate(&self, args: &Args<'_>, rng: &mut ModelRng) -> Result<Datum, GenerateError>;

    /// Log probability density of `value` under the current arguments.
    ///
    /// Default: [`GenerateError::Unsupported`].
    fn log_density(&self, args: &Args<'_>, value: &Datum) -> Result<f64, GenerateError> {
        let _ = (args, value);
        Err(GenerateError::Unsupported {
            operation: "log_density",
        })
    }
}

// ── Args ───────────────────────────────────────────────────────────

/// Parameter payloads as seen by one generator call.
///
/// A name that is present is bound to a value; `Some` means that value
/// has a payload, `None` that it has not been generated yet.
#[derive(Clone, Debug)]
pub struct Args<'a> {
    generator: &'static str,
    bound: IndexMap<&'static str, Option<&'a Datum>>,
}

impl<'a> Args<'a> {
    /// Empty argument set for the named generator.
    pub fn new(generator: &'static str) -> Self {
        Self {
            generator,
            bound: IndexMap::new(),
        }
    }

    /// Bind a parameter.
    pub fn bind(&mut self, name: &'static str, datum: Option<&'a Datum>) {
        self.bound.insert(name, datum);
    }

    /// Name of the generator these arguments are for.
    pub fn generator(&self) -> &'static str {
        self.generator
    }

    /// Whether the parameter is bound (materialized or not).
    pub fn is_bound(&self, name: &str) -> bool {
        self.bound.contains_key(name)
    }

    /// The payload of a parameter if it is bound and materialized.
    pub fn peek(&self, name: &str) -> Option<&'a Datum> {
        self.bound.get(name).copied().flatten()
    }

    /// Bound parameter names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.bound.keys().copied()
    }

    /// The payload of a required parameter.
    ///
    /// # Errors
    ///
    /// [`GenerateError::MissingParameter`] if unbound and
    /// [`GenerateError::NotMaterialized`] if bound but not yet generated.
    pub fn require(&self, name: &str) -> Result<&'a Datum, GenerateError> {
        match self.bound.get(name) {
            None => Err(GenerateError::MissingParameter {
                name: name.to_string(),
            }),
            Some(None) => Err(GenerateError::NotMaterialized {
                name: name.to_string(),
            }),
            Some(Some(d)) => Ok(d),
        }
    }

    fn typed<T>(
        &self,
        name: &str,
        expected: &str,
        f: impl FnOnce(&'a Datum) -> Option<T>,
    ) -> Result<T, GenerateError> {
        let datum = self.require(name)?;
        f(datum).ok_or_else(|| GenerateError::ParameterType {
            name: name.to_string(),
            expected: expected.to_string(),
            actual: datum.kind(),
        })
    }

    fn optional<T>(
        &self,
        name: &str,
        get: impl FnOnce(&Self, &str) -> Result<T, GenerateError>,
    ) -> Result<Option<T>, GenerateError> {
        if self.is_bound(name) {
            get(self, name).map(Some)
        } else {
            Ok(None)
        }
    }

    /// A real (integers widen).
    pub fn real(&self, name: &str) -> Result<f64, GenerateError> {
        self.typed(name, "Number", Datum::as_real)
    }

    /// A real, or `None` if unbound.
    pub fn opt_real(&self, name: &str) -> Result<Option<f64>, GenerateError> {
        self.optional(name, Self::real)
    }

    /// An integer.
    pub fn integer(&self, name: &str) -> Result<i64, GenerateError> {
        self.typed(name, DatumKind::Integer.name(), Datum::as_integer)
    }

    /// An integer, or `None` if unbound.
    pub fn opt_integer(&self, name: &str) -> Result<Option<i64>, GenerateError> {
        self.optional(name, Self::integer)
    }

    /// A boolean.
    pub fn boolean(&self, name: &str) -> Result<bool, GenerateError> {
        self.typed(name, DatumKind::Boolean.name(), Datum::as_boolean)
    }

    /// A boolean, or `None` if unbound.
    pub fn opt_boolean(&self, name: &str) -> Result<Option<bool>, GenerateError> {
        self.optional(name, Self::boolean)
    }

    /// A numeric vector as reals.
    pub fn real_array(&self, name: &str) -> Result<Vec<f64>, GenerateError> {
        self.typed(name, "Number[]", Datum::to_real_vec)
    }

    /// A string vector.
    pub fn text_array(&self, name: &str) -> Result<&'a [String], GenerateError> {
        self.typed(name, DatumKind::TextArray.name(), Datum::as_text_array)
    }

    /// A tree.
    pub fn tree(&self, name: &str) -> Result<&'a TimeTree, GenerateError> {
        self.typed(name, DatumKind::Tree.name(), Datum::as_tree)
    }

    /// Taxa with ages.
    pub fn taxa(&self, name: &str) -> Result<&'a TaxaAges, GenerateError> {
        self.typed(name, DatumKind::Taxa.name(), Datum::as_taxa)
    }

    /// An alignment.
    pub fn alignment(&self, name: &str) -> Result<&'a Alignment, GenerateError> {
        self.typed(name, DatumKind::Alignment.name(), Datum::as_alignment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbound_and_unmaterialized_are_distinct() {
        let x = Datum::Real(1.0);
        let mut args = Args::new("test");
        args.bind("x", Some(&x));
        args.bind("y", None);
        assert_eq!(args.real("x"), Ok(1.0));
        assert_eq!(
            args.real("y"),
            Err(GenerateError::NotMaterialized { name: "y".into() })
        );
        assert_eq!(
            args.real("z"),
            Err(GenerateError::MissingParameter { name: "z".into() })
        );
        assert_eq!(args.opt_real("z"), Ok(None));
        assert!(args.peek("y").is_none());
        assert!(args.is_bound("y"));
    }

    #[test]
    fn wrong_kind_reports_actual() {
        let t = Datum::from("hello");
        let mut args = Args::new("test");
        args.bind("x", Some(&t));
        assert_eq!(
            args.integer("x"),
            Err(GenerateError::ParameterType {
                name: "x".into(),
                expected: "Integer".into(),
                actual: DatumKind::Text,
            })
        );
    }

    #[test]
    fn integer_array_widens() {
        let d = Datum::IntegerArray(vec![1, 2]);
        let mut args = Args::new("test");
        args.bind("a", Some(&d));
        assert_eq!(args.real_array("a"), Ok(vec![1.0, 2.0]));
        assert_eq!(args.names().collect::<Vec<_>>(), vec!["a"]);
    }
}
