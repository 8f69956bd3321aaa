//! Kingman's coalescent.
//!
//! Lineages merge backwards in time. With `k` lineages the waiting time to
//! the next merger is exponential with rate `k(k-1)/(2θ)`, and the merging
//! pair is uniform over all pairs. All leaves are sampled at the present.
//!
//! # Draw order
//!
//! Per merger: the index of the first lineage, the index of the second,
//! then one uniform for the waiting time.

use rand::Rng;
use thicket_core::{
    Datum, DatumKind, GenerateError, GeneratorInfo, GeneratorKind, NodeIndex, ParamInfo,
    ParamKind, ReturnKind, TimeTree,
};
use thicket_graph::{Args, Generator, ModelRng};
use tracing::trace;

use crate::leaves;

/// Kingman coalescent prior over tip-labelled time trees.
#[derive(Clone, Copy, Debug, Default)]
pub struct Coalescent;

static INFO: GeneratorInfo = GeneratorInfo {
    name: "Coalescent",
    kind: GeneratorKind::Distribution,
    description: "The Kingman coalescent distribution over tip-labelled time trees.",
    params: &[
        ParamInfo::required(
            "theta",
            ParamKind::Is(DatumKind::Real),
            "effective population size, possibly scaled to mutations or calendar units",
        ),
        ParamInfo::optional(
            "n",
            ParamKind::Is(DatumKind::Integer),
            "the number of taxa; provide this or taxa",
        ),
        ParamInfo::optional(
            "taxa",
            ParamKind::OneOf(&[DatumKind::TextArray, DatumKind::Taxa]),
            "taxon names or a taxa object; provide this or n",
        ),
    ],
    returns: ReturnKind::Fixed(DatumKind::Tree),
};

const LEAF_SOURCES: [&str; 2] = ["n", "taxa"];

impl Coalescent {
    /// Simulate a tree over contemporary leaves with the given names.
    pub fn simulate(
        names: Vec<String>,
        theta: f64,
        rng: &mut ModelRng,
    ) -> Result<TimeTree, GenerateError> {
        let mut tree = TimeTree::from_leaves(names.into_iter().map(|name| (name, 0.0)))?;
        let mut active: Vec<NodeIndex> = (0..tree.n_taxa() as u32).map(NodeIndex).collect();
        let mut time = 0.0;

        while active.len() > 1 {
            let k = active.len() as f64;
            let a = active.remove(rng.random_range(0..active.len()));
            let b = active.remove(rng.random_range(0..active.len()));
            let rate = k * (k - 1.0) / (2.0 * theta);
            let u: f64 = rng.random();
            time += -(1.0 - u).ln() / rate;
            trace!(lineages = active.len() + 2, time, "coalescence");
            active.push(tree.add_internal(time, a, b)?);
        }

        let root = active.first().copied().ok_or_else(|| GenerateError::ExecutionFailed {
            reason: "coalescent over zero taxa".to_string(),
        })?;
        tree.set_root(root)?;
        Ok(tree)
    }

    /// Log density of `tree` under a coalescent with parameter `theta`.
    ///
    /// # Errors
    ///
    /// [`GenerateError::Tree`] if the tree does not have exactly
    /// `n_taxa - 1` internal nodes.
    pub fn tree_log_density(tree: &TimeTree, theta: f64) -> Result<f64, GenerateError> {
        let n = tree.n_taxa();
        let mut ages = vec![0.0; n.saturating_sub(1)];
        tree.internal_node_ages(&mut ages)?;
        ages.sort_by(f64::total_cmp);

        let mut log_density = 0.0;
        let mut previous = 0.0;
        let mut k = n as f64;
        for age in ages {
            log_density -= k * (k - 1.0) * (age - previous) / (2.0 * theta);
            previous = age;
            k -= 1.0;
        }
        Ok(log_density - (n as f64 - 1.0) * theta.ln())
    }
}

impl Generator for Coalescent {
    fn info(&self) -> &'static GeneratorInfo {
        &INFO
    }

    fn validate(&self, args: &Args<'_>) -> Result<(), GenerateError> {
        leaves::exactly_one(args, &LEAF_SOURCES)?;
        if let Some(theta) = args.peek("theta").and_then(Datum::as_real) {
            if !(theta.is_finite() && theta > 0.0) {
                return Err(GenerateError::invalid("theta", format!("{theta} must be > 0")));
            }
        }
        if args.peek("n").is_some() && leaves::count(args, "n")? == 0 {
            return Err(GenerateError::invalid("n", "need at least one taxon"));
        }
        if args.peek("taxa").is_some() && leaves::names(args, "taxa")?.is_empty() {
            return Err(GenerateError::invalid("taxa", "need at least one taxon"));
        }
        Ok(())
    }

    fn generate(&self, args: &Args<'_>, rng: &mut ModelRng) -> Result<Datum, GenerateError> {
        let theta = args.real("theta")?;
        let names = match leaves::exactly_one(args, &LEAF_SOURCES)? {
            "n" => leaves::numbered(leaves::count(args, "n")?),
            _ => leaves::names(args, "taxa")?,
        };
        Self::simulate(names, theta, rng).map(Datum::Tree)
    }

    fn log_density(&self, args: &Args<'_>, value: &Datum) -> Result<f64, GenerateError> {
        let theta = args.real("theta")?;
        let tree = value.as_tree().ok_or_else(|| GenerateError::ParameterType {
            name: "value".to_string(),
            expected: DatumKind::Tree.name().to_string(),
            actual: value.kind(),
        })?;
        Self::tree_log_density(tree, theta)
    }
}
