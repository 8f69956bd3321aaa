//! Deterministic functions.

use std::cmp::Ordering;

use thicket_core::{
    Datum, DatumKind, GenerateError, GeneratorInfo, GeneratorKind, ParamInfo, ParamKind,
    ReturnKind, TaxaAges,
};
use thicket_graph::{Args, Generator, ModelRng};

fn not_an_array(name: &str, datum: &Datum) -> GenerateError {
    GenerateError::ParameterType {
        name: name.to_string(),
        expected: ParamKind::Array.to_string(),
        actual: datum.kind(),
    }
}

// ── exp ────────────────────────────────────────────────────────────

/// `e^x`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExpFn;

static EXP_FN: GeneratorInfo = GeneratorInfo {
    name: "exp",
    kind: GeneratorKind::Function,
    description: "The exponential function.",
    params: &[ParamInfo::required("x", ParamKind::Number, "the exponent")],
    returns: ReturnKind::Fixed(DatumKind::Real),
};

impl Generator for ExpFn {
    fn info(&self) -> &'static GeneratorInfo {
        &EXP_FN
    }

    fn generate(&self, args: &Args<'_>, _rng: &mut ModelRng) -> Result<Datum, GenerateError> {
        Ok(Datum::Real(args.real("x")?.exp()))
    }
}

// ── sort ───────────────────────────────────────────────────────────

/// Sorts an array, ascending unless `decreasing=true`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sort;

static SORT: GeneratorInfo = GeneratorInfo {
    name: "sort",
    kind: GeneratorKind::Function,
    description: "Sort the elements of an array.",
    params: &[
        ParamInfo::required("arr", ParamKind::Array, "the array to sort"),
        ParamInfo::optional(
            "decreasing",
            ParamKind::Is(DatumKind::Boolean),
            "sort in decreasing order; false by default",
        ),
    ],
    returns: ReturnKind::SameAs("arr"),
};

fn sorted<T: Clone>(v: &[T], decreasing: bool, cmp: impl Fn(&T, &T) -> Ordering) -> Vec<T> {
    let mut out = v.to_vec();
    if decreasing {
        out.sort_by(|a, b| cmp(b, a));
    } else {
        out.sort_by(cmp);
    }
    out
}

impl Generator for Sort {
    fn info(&self) -> &'static GeneratorInfo {
        &SORT
    }

    fn generate(&self, args: &Args<'_>, _rng: &mut ModelRng) -> Result<Datum, GenerateError> {
        let decreasing = args.opt_boolean("decreasing")?.unwrap_or(false);
        Ok(match args.require("arr")? {
            Datum::RealArray(v) => Datum::RealArray(sorted(v, decreasing, f64::total_cmp)),
            Datum::IntegerArray(v) => Datum::IntegerArray(sorted(v, decreasing, i64::cmp)),
            Datum::BooleanArray(v) => Datum::BooleanArray(sorted(v, decreasing, bool::cmp)),
            Datum::TextArray(v) => Datum::TextArray(sorted(v, decreasing, String::cmp)),
            other => return Err(not_an_array("arr", other)),
        })
    }
}

// ── repArray ───────────────────────────────────────────────────────

/// Concatenates `n` copies of an array.
#[derive(Clone, Copy, Debug, Default)]
pub struct RepArray;

static REP_ARRAY: GeneratorInfo = GeneratorInfo {
    name: "repArray",
    kind: GeneratorKind::Function,
    description: "Replicate an array n times.",
    params: &[
        ParamInfo::required("arr", ParamKind::Array, "the array to replicate"),
        ParamInfo::required(
            "n",
            ParamKind::Is(DatumKind::Integer),
            "the number of copies, >= 0",
        ),
    ],
    returns: ReturnKind::SameAs("arr"),
};

impl Generator for RepArray {
    fn info(&self) -> &'static GeneratorInfo {
        &REP_ARRAY
    }

    fn validate(&self, args: &Args<'_>) -> Result<(), GenerateError> {
        match args.peek("n").and_then(Datum::as_integer) {
            Some(n) if n < 0 => Err(GenerateError::invalid("n", format!("{n} is negative"))),
            _ => Ok(()),
        }
    }

    fn generate(&self, args: &Args<'_>, _rng: &mut ModelRng) -> Result<Datum, GenerateError> {
        let arr = args.require("arr")?;
        let n = args.integer("n")?;
        let times = usize::try_from(n)
            .map_err(|_| GenerateError::invalid("n", format!("{n} is negative")))?;
        arr.repeat(times).ok_or_else(|| not_an_array("arr", arr))
    }
}

// ── treeLength / nodeCount ─────────────────────────────────────────

/// Sum of branch lengths of a tree.
#[derive(Clone, Copy, Debug, Default)]
pub struct TreeLength;

static TREE_LENGTH: GeneratorInfo = GeneratorInfo {
    name: "treeLength",
    kind: GeneratorKind::Function,
    description: "The total branch length of a time tree.",
    params: &[ParamInfo::required("tree", ParamKind::Is(DatumKind::Tree), "the tree")],
    returns: ReturnKind::Fixed(DatumKind::Real),
};

impl Generator for TreeLength {
    fn info(&self) -> &'static GeneratorInfo {
        &TREE_LENGTH
    }

    fn generate(&self, args: &Args<'_>, _rng: &mut ModelRng) -> Result<Datum, GenerateError> {
        Ok(Datum::Real(args.tree("tree")?.tree_length()))
    }
}

/// Number of nodes in a tree, leaves included.
#[derive(Clone, Copy, Debug, Default)]
pub struct NodeCount;

static NODE_COUNT: GeneratorInfo = GeneratorInfo {
    name: "nodeCount",
    kind: GeneratorKind::Function,
    description: "The number of nodes in a time tree, including leaves.",
    params: &[ParamInfo::required("tree", ParamKind::Is(DatumKind::Tree), "the tree")],
    returns: ReturnKind::Fixed(DatumKind::Integer),
};

impl Generator for NodeCount {
    fn info(&self) -> &'static GeneratorInfo {
        &NODE_COUNT
    }

    fn generate(&self, args: &Args<'_>, _rng: &mut ModelRng) -> Result<Datum, GenerateError> {
        let count = args.tree("tree")?.node_count();
        i64::try_from(count)
            .map(Datum::Integer)
            .map_err(|_| GenerateError::ExecutionFailed {
                reason: format!("node count {count} overflows"),
            })
    }
}

// ── taxa ───────────────────────────────────────────────────────────

/// Builds a taxa object from names and optional ages.
#[derive(Clone, Copy, Debug, Default)]
pub struct Taxa;

static TAXA: GeneratorInfo = GeneratorInfo {
    name: "taxa",
    kind: GeneratorKind::Function,
    description: "Taxa with sampling ages; contemporary when ages are omitted.",
    params: &[
        ParamInfo::required("names", ParamKind::Is(DatumKind::TextArray), "taxon names"),
        ParamInfo::optional(
            "ages",
            ParamKind::OneOf(&[DatumKind::RealArray, DatumKind::IntegerArray]),
            "sampling ages, one per name",
        ),
    ],
    returns: ReturnKind::Fixed(DatumKind::Taxa),
};

impl Generator for Taxa {
    fn info(&self) -> &'static GeneratorInfo {
        &TAXA
    }

    fn validate(&self, args: &Args<'_>) -> Result<(), GenerateError> {
        let names = args.peek("names").and_then(Datum::len);
        let ages = args.peek("ages").and_then(Datum::len);
        match (names, ages) {
            (Some(names), Some(ages)) if names != ages => Err(GenerateError::invalid(
                "ages",
                format!("{ages} ages for {names} names"),
            )),
            _ => Ok(()),
        }
    }

    fn generate(&self, args: &Args<'_>, _rng: &mut ModelRng) -> Result<Datum, GenerateError> {
        let names = args.text_array("names")?.to_vec();
        let taxa = if args.is_bound("ages") {
            TaxaAges::new(names, args.real_array("ages")?)?
        } else {
            TaxaAges::contemporary(names)
        };
        Ok(Datum::Taxa(taxa))
    }
}
