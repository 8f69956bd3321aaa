//! Random sub-sampling of an array.

use rand::seq::SliceRandom;
use rand::Rng;
use thicket_core::{
    Datum, DatumKind, GenerateError, GeneratorInfo, GeneratorKind, ParamInfo, ParamKind,
    ReturnKind,
};
use thicket_graph::{Args, Generator, ModelRng};

/// `size` elements of `arr`, drawn uniformly.
///
/// Without replacement (the default) the indices are shuffled and the
/// first `size` kept, so the draw consumes one full shuffle. With
/// `replace=true` each element is an independent uniform index.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sample;

static INFO: GeneratorInfo = GeneratorInfo {
    name: "sample",
    kind: GeneratorKind::Distribution,
    description: "Randomly select elements of an array.",
    params: &[
        ParamInfo::required("arr", ParamKind::Array, "the array to draw from"),
        ParamInfo::required(
            "size",
            ParamKind::Is(DatumKind::Integer),
            "the number of elements to draw",
        ),
        ParamInfo::optional(
            "replace",
            ParamKind::Is(DatumKind::Boolean),
            "draw with replacement; false by default",
        ),
    ],
    returns: ReturnKind::SameAs("arr"),
};

fn check_size(size: i64, len: usize) -> Result<usize, GenerateError> {
    if len == 0 {
        return Err(GenerateError::invalid("arr", "cannot sample an empty array"));
    }
    match usize::try_from(size) {
        Ok(size) if (1..=len).contains(&size) => Ok(size),
        _ => Err(GenerateError::invalid(
            "size",
            format!("{size} must be in [1, {len}]"),
        )),
    }
}

impl Generator for Sample {
    fn info(&self) -> &'static GeneratorInfo {
        &INFO
    }

    fn validate(&self, args: &Args<'_>) -> Result<(), GenerateError> {
        let len = args.peek("arr").and_then(Datum::len);
        let size = args.peek("size").and_then(Datum::as_integer);
        if let (Some(len), Some(size)) = (len, size) {
            check_size(size, len)?;
        }
        Ok(())
    }

    fn generate(&self, args: &Args<'_>, rng: &mut ModelRng) -> Result<Datum, GenerateError> {
        let arr = args.require("arr")?;
        let len = arr.len().ok_or_else(|| GenerateError::ParameterType {
            name: "arr".to_string(),
            expected: ParamKind::Array.to_string(),
            actual: arr.kind(),
        })?;
        let size = check_size(args.integer("size")?, len)?;

        let indices: Vec<usize> = if args.opt_boolean("replace")?.unwrap_or(false) {
            (0..size).map(|_| rng.random_range(0..len)).collect()
        } else {
            let mut all: Vec<usize> = (0..len).collect();
            all.shuffle(rng);
            all.truncate(size);
            all
        };
        arr.select(&indices)
            .ok_or_else(|| GenerateError::ExecutionFailed {
                reason: "sampled index out of range".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn draw(arr: &Datum, size: i64, replace: Option<bool>) -> Result<Datum, GenerateError> {
        let size = Datum::Integer(size);
        let replace = replace.map(Datum::Boolean);
        let mut args = Args::new("sample");
        args.bind("arr", Some(arr));
        args.bind("size", Some(&size));
        if let Some(r) = &replace {
            args.bind("replace", Some(r));
        }
        Sample.validate(&args)?;
        Sample.generate(&args, &mut ModelRng::seed_from_u64(8))
    }

    #[test]
    fn without_replacement_is_a_permutation_prefix() {
        let arr = Datum::IntegerArray((0..10).collect());
        let out = draw(&arr, 10, None).unwrap();
        let Datum::IntegerArray(mut v) = out else {
            panic!("kind changed");
        };
        v.sort_unstable();
        assert_eq!(v, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn with_replacement_keeps_kind() {
        let arr = Datum::TextArray(vec!["a".into()]);
        let out = draw(&arr, 1, Some(true)).unwrap();
        assert_eq!(out, Datum::TextArray(vec!["a".into()]));
    }

    #[test]
    fn size_bounds() {
        let arr = Datum::RealArray(vec![1.0, 2.0]);
        assert!(draw(&arr, 0, None).is_err());
        assert!(draw(&arr, 3, None).is_err());
        assert!(draw(&Datum::RealArray(vec![]), 1, None).is_err());
        assert!(draw(&arr, 2, Some(false)).is_ok());
    }
}
