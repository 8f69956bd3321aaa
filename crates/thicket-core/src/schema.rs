//! Static descriptors for generators and their parameters.
//!
//! Every generator exposes a `&'static GeneratorInfo` naming it, listing
//! its parameters in declaration order, and saying what it returns. The
//! model uses the descriptor to check bindings; code generation uses it
//! to order arguments.

use std::fmt;

use crate::datum::DatumKind;

/// Whether a generator is a random distribution or a deterministic
/// function.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GeneratorKind {
    /// Samples a random value.
    Distribution,
    /// Computes a value deterministically from its inputs.
    Function,
}

impl GeneratorKind {
    /// The assignment operator used in generated code.
    pub fn code_char(self) -> char {
        match self {
            Self::Distribution => '~',
            Self::Function => '=',
        }
    }
}

impl fmt::Display for GeneratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Distribution => f.write_str("distribution"),
            Self::Function => f.write_str("function"),
        }
    }
}

/// The kinds of value a parameter accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamKind {
    /// Exactly this kind.
    Is(DatumKind),
    /// Any scalar number (real or integer).
    Number,
    /// Any vector kind.
    Array,
    /// Any of the listed kinds.
    OneOf(&'static [DatumKind]),
}

impl ParamKind {
    /// Whether a value of `kind` may be bound to this parameter.
    pub fn accepts(self, kind: DatumKind) -> bool {
        match self {
            // Integers widen to reals wherever a real is expected.
            Self::Is(DatumKind::Real) => kind.is_number(),
            Self::Is(k) => k == kind,
            Self::Number => kind.is_number(),
            Self::Array => kind.is_array(),
            Self::OneOf(ks) => ks.contains(&kind),
        }
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Is(k) => write!(f, "{k}"),
            Self::Number => f.write_str("Number"),
            Self::Array => f.write_str("Array"),
            Self::OneOf(ks) => {
                for (i, k) in ks.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    write!(f, "{k}")?;
                }
                Ok(())
            }
        }
    }
}

/// One declared parameter of a generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParamInfo {
    /// Name used for binding and in generated code.
    pub name: &'static str,
    /// Accepted kinds.
    pub kind: ParamKind,
    /// Whether the parameter may be left unbound.
    pub optional: bool,
    /// One-line description.
    pub description: &'static str,
}

impl ParamInfo {
    /// A parameter that must be bound.
    pub const fn required(name: &'static str, kind: ParamKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            optional: false,
            description,
        }
    }

    /// A parameter that may be left unbound.
    pub const fn optional(name: &'static str, kind: ParamKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            optional: true,
            description,
        }
    }
}

/// The kind of value a generator produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReturnKind {
    /// Always this kind.
    Fixed(DatumKind),
    /// The same kind as the named parameter's value.
    SameAs(&'static str),
}

/// Static description of a generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GeneratorInfo {
    /// Canonical name, as used in generated code and the registry.
    pub name: &'static str,
    /// Distribution or function.
    pub kind: GeneratorKind,
    /// One-line description.
    pub description: &'static str,
    /// Parameters in declaration order.
    pub params: &'static [ParamInfo],
    /// What the generator returns.
    pub returns: ReturnKind,
}

impl GeneratorInfo {
    /// Look up a parameter by name.
    pub fn param(&self, name: &str) -> Option<&ParamInfo> {
        self.params.iter().find(|p| p.name == name)
    }

    /// Declaration position of a parameter.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.params.iter().position(|p| p.name == name)
    }

    /// Parameters that must be bound.
    pub fn required(&self) -> impl Iterator<Item = &ParamInfo> {
        self.params.iter().filter(|p| !p.optional)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static PARAMS: [ParamInfo; 2] = [
        ParamInfo::required("rate", ParamKind::Is(DatumKind::Real), "rate"),
        ParamInfo::optional(
            "taxa",
            ParamKind::OneOf(&[DatumKind::TextArray, DatumKind::Taxa]),
            "taxa",
        ),
    ];

    static INFO: GeneratorInfo = GeneratorInfo {
        name: "Test",
        kind: GeneratorKind::Distribution,
        description: "test",
        params: &PARAMS,
        returns: ReturnKind::Fixed(DatumKind::Real),
    };

    #[test]
    fn real_accepts_integer() {
        let k = ParamKind::Is(DatumKind::Real);
        assert!(k.accepts(DatumKind::Integer));
        assert!(!k.accepts(DatumKind::RealArray));
        assert!(!ParamKind::Is(DatumKind::Integer).accepts(DatumKind::Real));
    }

    #[test]
    fn one_of_and_array() {
        let k = ParamKind::OneOf(&[DatumKind::TextArray, DatumKind::Taxa]);
        assert!(k.accepts(DatumKind::Taxa));
        assert!(!k.accepts(DatumKind::Tree));
        assert!(ParamKind::Array.accepts(DatumKind::BooleanArray));
        assert_eq!(k.to_string(), "String[] | TaxaAges");
    }

    #[test]
    fn lookup_by_name() {
        assert_eq!(INFO.position("taxa"), Some(1));
        assert!(INFO.param("missing").is_none());
        let required: Vec<_> = INFO.required().map(|p| p.name).collect();
        assert_eq!(required, vec!["rate"]);
        assert_eq!(INFO.kind.code_char(), '~');
    }
}
