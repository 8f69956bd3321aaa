//! Univariate continuous distributions with closed-form densities.

use std::f64::consts::PI;

use rand::Rng;
use thicket_core::{
    Datum, DatumKind, GenerateError, GeneratorInfo, GeneratorKind, ParamInfo, ParamKind,
    ReturnKind,
};
use thicket_graph::{Args, Generator, ModelRng};

/// `ln(sqrt(2π))`.
const LN_SQRT_2PI: f64 = 0.918_938_533_204_672_8;

fn real_value(value: &Datum) -> Result<f64, GenerateError> {
    value.as_real().ok_or_else(|| GenerateError::ParameterType {
        name: "value".to_string(),
        expected: "Number".to_string(),
        actual: value.kind(),
    })
}

fn positive(args: &Args<'_>, name: &str) -> Result<(), GenerateError> {
    match args.peek(name).and_then(Datum::as_real) {
        Some(v) if !(v.is_finite() && v > 0.0) => {
            Err(GenerateError::invalid(name, format!("{v} must be > 0")))
        }
        _ => Ok(()),
    }
}

/// One standard normal deviate by Box-Muller. Consumes two uniforms.
fn standard_normal(rng: &mut ModelRng) -> f64 {
    let u1: f64 = rng.random();
    let u2: f64 = rng.random();
    (-2.0 * u1.max(1e-300).ln()).sqrt() * (2.0 * PI * u2).cos()
}

fn normal_log_density(x: f64, mean: f64, sd: f64) -> f64 {
    let z = (x - mean) / sd;
    -0.5 * z * z - sd.ln() - LN_SQRT_2PI
}

// ── Exp ────────────────────────────────────────────────────────────

/// Exponential distribution with the given rate.
#[derive(Clone, Copy, Debug, Default)]
pub struct Exp;

static EXP: GeneratorInfo = GeneratorInfo {
    name: "Exp",
    kind: GeneratorKind::Distribution,
    description: "The exponential distribution.",
    params: &[ParamInfo::required("rate", ParamKind::Number, "rate, > 0")],
    returns: ReturnKind::Fixed(DatumKind::Real),
};

impl Generator for Exp {
    fn info(&self) -> &'static GeneratorInfo {
        &EXP
    }

    fn validate(&self, args: &Args<'_>) -> Result<(), GenerateError> {
        positive(args, "rate")
    }

    fn generate(&self, args: &Args<'_>, rng: &mut ModelRng) -> Result<Datum, GenerateError> {
        let rate = args.real("rate")?;
        let u: f64 = rng.random();
        Ok(Datum::Real(-(1.0 - u).ln() / rate))
    }

    fn log_density(&self, args: &Args<'_>, value: &Datum) -> Result<f64, GenerateError> {
        let rate = args.real("rate")?;
        let x = real_value(value)?;
        Ok(if x < 0.0 {
            f64::NEG_INFINITY
        } else {
            rate.ln() - rate * x
        })
    }
}

// ── Normal ─────────────────────────────────────────────────────────

/// Normal distribution.
#[derive(Clone, Copy, Debug, Default)]
pub struct Normal;

static NORMAL: GeneratorInfo = GeneratorInfo {
    name: "Normal",
    kind: GeneratorKind::Distribution,
    description: "The normal distribution.",
    params: &[
        ParamInfo::required("mean", ParamKind::Number, "the mean"),
        ParamInfo::required("sd", ParamKind::Number, "the standard deviation, > 0"),
    ],
    returns: ReturnKind::Fixed(DatumKind::Real),
};

impl Generator for Normal {
    fn info(&self) -> &'static GeneratorInfo {
        &NORMAL
    }

    fn validate(&self, args: &Args<'_>) -> Result<(), GenerateError> {
        positive(args, "sd")
    }

    fn generate(&self, args: &Args<'_>, rng: &mut ModelRng) -> Result<Datum, GenerateError> {
        let mean = args.real("mean")?;
        let sd = args.real("sd")?;
        Ok(Datum::Real(mean + sd * standard_normal(rng)))
    }

    fn log_density(&self, args: &Args<'_>, value: &Datum) -> Result<f64, GenerateError> {
        let x = real_value(value)?;
        Ok(normal_log_density(x, args.real("mean")?, args.real("sd")?))
    }
}

// ── LogNormal ──────────────────────────────────────────────────────

/// Log-normal distribution, parameterised on the log scale.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNormal;

static LOG_NORMAL: GeneratorInfo = GeneratorInfo {
    name: "LogNormal",
    kind: GeneratorKind::Distribution,
    description: "The log-normal distribution.",
    params: &[
        ParamInfo::required("meanlog", ParamKind::Number, "mean of the logarithm"),
        ParamInfo::required(
            "sdlog",
            ParamKind::Number,
            "standard deviation of the logarithm, > 0",
        ),
    ],
    returns: ReturnKind::Fixed(DatumKind::Real),
};

impl Generator for LogNormal {
    fn info(&self) -> &'static GeneratorInfo {
        &LOG_NORMAL
    }

    fn validate(&self, args: &Args<'_>) -> Result<(), GenerateError> {
        positive(args, "sdlog")
    }

    fn generate(&self, args: &Args<'_>, rng: &mut ModelRng) -> Result<Datum, GenerateError> {
        let meanlog = args.real("meanlog")?;
        let sdlog = args.real("sdlog")?;
        Ok(Datum::Real((meanlog + sdlog * standard_normal(rng)).exp()))
    }

    fn log_density(&self, args: &Args<'_>, value: &Datum) -> Result<f64, GenerateError> {
        let x = real_value(value)?;
        if x <= 0.0 {
            return Ok(f64::NEG_INFINITY);
        }
        let ln_x = x.ln();
        Ok(normal_log_density(ln_x, args.real("meanlog")?, args.real("sdlog")?) - ln_x)
    }
}

// ── Uniform ────────────────────────────────────────────────────────

/// Continuous uniform distribution on `[lower, upper)`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Uniform;

static UNIFORM: GeneratorInfo = GeneratorInfo {
    name: "Uniform",
    kind: GeneratorKind::Distribution,
    description: "The continuous uniform distribution.",
    params: &[
        ParamInfo::required("lower", ParamKind::Number, "lower bound"),
        ParamInfo::required("upper", ParamKind::Number, "upper bound, > lower"),
    ],
    returns: ReturnKind::Fixed(DatumKind::Real),
};

impl Generator for Uniform {
    fn info(&self) -> &'static GeneratorInfo {
        &UNIFORM
    }

    fn validate(&self, args: &Args<'_>) -> Result<(), GenerateError> {
        let lower = args.peek("lower").and_then(Datum::as_real);
        let upper = args.peek("upper").and_then(Datum::as_real);
        if let (Some(lower), Some(upper)) = (lower, upper) {
            if !(lower.is_finite() && upper.is_finite() && lower < upper) {
                return Err(GenerateError::invalid(
                    "upper",
                    format!("need lower < upper, got [{lower}, {upper})"),
                ));
            }
        }
        Ok(())
    }

    fn generate(&self, args: &Args<'_>, rng: &mut ModelRng) -> Result<Datum, GenerateError> {
        let lower = args.real("lower")?;
        let upper = args.real("upper")?;
        let u: f64 = rng.random();
        Ok(Datum::Real(lower + (upper - lower) * u))
    }

    fn log_density(&self, args: &Args<'_>, value: &Datum) -> Result<f64, GenerateError> {
        let lower = args.real("lower")?;
        let upper = args.real("upper")?;
        let x = real_value(value)?;
        Ok(if (lower..upper).contains(&x) {
            -(upper - lower).ln()
        } else {
            f64::NEG_INFINITY
        })
    }
}
