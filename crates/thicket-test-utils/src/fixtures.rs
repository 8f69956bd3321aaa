//! Reusable generator test fixtures.
//!
//! - [`ScaledUniform`]: distribution, `scale * U(0,1)`, with a density.
//! - [`Offset`]: function, `x + by`.
//! - [`Echo`]: function returning its array argument unchanged.
//! - [`FailingGenerator`]: distribution whose `generate()` always fails.
//! - [`MockExtension`]: an [`Extension`] bundling all of the above.

use rand::Rng;
use thicket_core::{
    Datum, DatumKind, GenerateError, GeneratorInfo, GeneratorKind, ParamInfo, ParamKind,
    ReturnKind,
};
use thicket_graph::{Args, Extension, Generator, GeneratorEntry, ModelRng};

/// `scale * U(0,1)`; `scale` defaults to 1.
#[derive(Default)]
pub struct ScaledUniform;

static SCALED_UNIFORM: GeneratorInfo = GeneratorInfo {
    name: "ScaledUniform",
    kind: GeneratorKind::Distribution,
    description: "uniform on [0, scale)",
    params: &[ParamInfo::optional("scale", ParamKind::Number, "upper bound")],
    returns: ReturnKind::Fixed(DatumKind::Real),
};

impl Generator for ScaledUniform {
    fn info(&self) -> &'static GeneratorInfo {
        &SCALED_UNIFORM
    }

    fn validate(&self, args: &Args<'_>) -> Result<(), GenerateError> {
        match args.peek("scale").and_then(Datum::as_real) {
            Some(s) if s <= 0.0 => Err(GenerateError::invalid("scale", "must be > 0")),
            _ => Ok(()),
        }
    }

    fn generate(&self, args: &Args<'_>, rng: &mut ModelRng) -> Result<Datum, GenerateError> {
        let scale = args.opt_real("scale")?.unwrap_or(1.0);
        Ok(Datum::Real(scale * rng.random::<f64>()))
    }

    fn log_density(&self, args: &Args<'_>, value: &Datum) -> Result<f64, GenerateError> {
        let scale = args.opt_real("scale")?.unwrap_or(1.0);
        let x = value.as_real().unwrap_or(f64::NAN);
        if (0.0..scale).contains(&x) {
            Ok(-scale.ln())
        } else {
            Ok(f64::NEG_INFINITY)
        }
    }
}

/// `x + by`.
#[derive(Default)]
pub struct Offset;

static OFFSET: GeneratorInfo = GeneratorInfo {
    name: "offset",
    kind: GeneratorKind::Function,
    description: "x + by",
    params: &[
        ParamInfo::required("x", ParamKind::Number, "input"),
        ParamInfo::required("by", ParamKind::Number, "shift"),
    ],
    returns: ReturnKind::Fixed(DatumKind::Real),
};

impl Generator for Offset {
    fn info(&self) -> &'static GeneratorInfo {
        &OFFSET
    }

    fn generate(&self, args: &Args<'_>, _rng: &mut ModelRng) -> Result<Datum, GenerateError> {
        Ok(Datum::Real(args.real("x")? + args.real("by")?))
    }
}

/// Returns `arr` unchanged.
#[derive(Default)]
pub struct Echo;

static ECHO: GeneratorInfo = GeneratorInfo {
    name: "echo",
    kind: GeneratorKind::Function,
    description: "identity on arrays",
    params: &[ParamInfo::required("arr", ParamKind::Array, "array")],
    returns: ReturnKind::SameAs("arr"),
};

impl Generator for Echo {
    fn info(&self) -> &'static GeneratorInfo {
        &ECHO
    }

    fn generate(&self, args: &Args<'_>, _rng: &mut ModelRng) -> Result<Datum, GenerateError> {
        Ok(args.require("arr")?.clone())
    }
}

/// Always fails with [`GenerateError::ExecutionFailed`].
#[derive(Default)]
pub struct FailingGenerator;

static FAILING: GeneratorInfo = GeneratorInfo {
    name: "Failing",
    kind: GeneratorKind::Distribution,
    description: "always fails",
    params: &[],
    returns: ReturnKind::Fixed(DatumKind::Real),
};

impl Generator for FailingGenerator {
    fn info(&self) -> &'static GeneratorInfo {
        &FAILING
    }

    fn generate(&self, _args: &Args<'_>, _rng: &mut ModelRng) -> Result<Datum, GenerateError> {
        Err(GenerateError::ExecutionFailed {
            reason: "deliberate failure".into(),
        })
    }
}

/// Extension bundling every fixture generator.
pub struct MockExtension;

impl Extension for MockExtension {
    fn name(&self) -> &str {
        "mock"
    }

    fn distributions(&self) -> Vec<GeneratorEntry> {
        vec![
            GeneratorEntry::new::<ScaledUniform>(),
            GeneratorEntry::new::<FailingGenerator>(),
        ]
    }

    fn functions(&self) -> Vec<GeneratorEntry> {
        vec![GeneratorEntry::new::<Offset>(), GeneratorEntry::new::<Echo>()]
    }
}
