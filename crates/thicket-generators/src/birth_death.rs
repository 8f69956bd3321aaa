//! Serially sampled birth-death trees conditioned on the root age.
//!
//! Follows Stadler and Yang (2013). Sampling runs in three phases:
//!
//! 1. **Random topology.** Active lineages start at their leaf ages and
//!    are paired uniformly at random; a parent's provisional age is the
//!    older of its children's.
//! 2. **Divergence times.** Every internal node except the root gets an
//!    independent age from the transformed coalescent density, truncated
//!    below by the older of its two in-order neighbouring tips and above by
//!    the root age. The truncated CDF is inverted in closed form.
//! 3. **Reconstruction.** The drawn ages generally contradict the
//!    provisional topology, so the topology is rebuilt oldest-first with
//!    [`reconstruct_oldest_first`].
//!
//! # Draw order
//!
//! Phase 1 draws two lineage indices per merger. Phase 2 draws one uniform
//! per non-root internal node in in-order.

use rand::Rng;
use thicket_core::{
    Datum, DatumKind, GenerateError, GeneratorInfo, GeneratorKind, NodeIndex, ParamInfo,
    ParamKind, ReturnKind, TimeTree, TimeTreeNode, TreeError,
};
use thicket_graph::{Args, Generator, ModelRng};
use thicket_tree::reconstruct_oldest_first;
use tracing::trace;

use crate::leaves;

/// Serially sampled birth-death prior over time trees with a fixed root age.
#[derive(Clone, Copy, Debug, Default)]
pub struct BirthDeathSerialSampling;

static INFO: GeneratorInfo = GeneratorInfo {
    name: "BirthDeathSerialSampling",
    kind: GeneratorKind::Distribution,
    description: "A tree of extinct and extant taxa sampled through time under a \
                  birth-death-sampling process, conditioned on the root age.",
    params: &[
        ParamInfo::required("lambda", ParamKind::Is(DatumKind::Real), "per-lineage birth rate"),
        ParamInfo::required("mu", ParamKind::Is(DatumKind::Real), "per-lineage death rate"),
        ParamInfo::required(
            "rho",
            ParamKind::Is(DatumKind::Real),
            "proportion of extant taxa sampled at the present",
        ),
        ParamInfo::required(
            "psi",
            ParamKind::Is(DatumKind::Real),
            "per-lineage sampling-through-time rate",
        ),
        ParamInfo::optional(
            "n",
            ParamKind::Is(DatumKind::Integer),
            "the number of contemporary taxa; provide one of n, taxaAges or ages",
        ),
        ParamInfo::optional(
            "taxaAges",
            ParamKind::Is(DatumKind::Taxa),
            "taxa with their sampling ages; provide one of n, taxaAges or ages",
        ),
        ParamInfo::optional(
            "ages",
            ParamKind::Is(DatumKind::RealArray),
            "leaf sampling ages; provide one of n, taxaAges or ages",
        ),
        ParamInfo::required(
            "rootAge",
            ParamKind::Is(DatumKind::Real),
            "the age of the root, older than every leaf",
        ),
    ],
    returns: ReturnKind::Fixed(DatumKind::Tree),
};

const LEAF_SOURCES: [&str; 3] = ["n", "taxaAges", "ages"];

/// Process rates, checked.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BirthDeathRates {
    /// Birth rate λ.
    pub lambda: f64,
    /// Death rate μ.
    pub mu: f64,
    /// Extant sampling proportion ρ.
    pub rho: f64,
    /// Serial sampling rate ψ.
    pub psi: f64,
}

impl BirthDeathRates {
    /// Check the rate ranges.
    pub fn new(lambda: f64, mu: f64, rho: f64, psi: f64) -> Result<Self, GenerateError> {
        if !(lambda.is_finite() && lambda > 0.0) {
            return Err(GenerateError::invalid("lambda", format!("{lambda} must be > 0")));
        }
        if !(mu.is_finite() && mu >= 0.0) {
            return Err(GenerateError::invalid("mu", format!("{mu} must be >= 0")));
        }
        if !(rho > 0.0 && rho <= 1.0) {
            return Err(GenerateError::invalid("rho", format!("{rho} must be in (0, 1]")));
        }
        if !(psi.is_finite() && psi >= 0.0) {
            return Err(GenerateError::invalid("psi", format!("{psi} must be >= 0")));
        }
        Ok(Self {
            lambda,
            mu,
            rho,
            psi,
        })
    }

    /// The constants `(c1, c2)` of the transformed density.
    pub fn constants(&self) -> (f64, f64) {
        let Self {
            lambda,
            mu,
            rho,
            psi,
        } = *self;
        let c1 = ((lambda - mu - psi).powi(2) + 4.0 * lambda * psi).sqrt();
        let c2 = -(lambda - mu - 2.0 * lambda * rho - psi) / c1;
        (c1, c2)
    }
}

/// Inverse-CDF sampler for one divergence time.
///
/// With `A = 1 - c2`, `B = 1 + c2` and `e(t) = exp(-c1 t)`, the CDF of an
/// age truncated to `[z*, T]` is
///
/// ```text
/// F(x) = [(e(z*) - e(x)) / (A e(x) + B)] / [(e(z*) - e(T)) / (A e(T) + B)]
/// ```
///
/// which inverts to `e(x) = (e(z*) - k B) / (1 + k A)` with
/// `k = y (e(z*) - e(T)) / (A e(T) + B)`. At `c2 = 1` this is the
/// exponential with rate `c1` truncated to the same interval.
///
/// Both sides are divided by `e(z*)` before solving, so the draw is taken
/// as an offset above `z*`:
///
/// ```text
/// e(x - z*) = (1 - y (1 - r) B / (A e(T) + B)) / (1 + k A),  r = e(T - z*)
/// ```
///
/// `e(z*)` and `e(T)` underflow for old leaves; `r` and the numerator
/// do not.
#[derive(Clone, Copy, Debug)]
struct DivergenceTimes {
    c1: f64,
    c2: f64,
    root_age: f64,
}

impl DivergenceTimes {
    fn new(rates: &BirthDeathRates, root_age: f64) -> Result<Self, GenerateError> {
        let (c1, c2) = rates.constants();
        if !(c1.is_finite() && c1 > 0.0 && c2.is_finite() && c2 > -1.0) {
            return Err(GenerateError::invalid(
                "lambda",
                format!("degenerate rate constants c1={c1}, c2={c2}"),
            ));
        }
        Ok(Self { c1, c2, root_age })
    }

    /// Age with CDF position `y` in `[0, 1)`, truncated to
    /// `[z_star, root_age]`.
    fn invert(&self, z_star: f64, y: f64) -> f64 {
        let Self { c1, c2, root_age } = *self;
        let (a, b) = (1.0 - c2, 1.0 + c2);
        let e_z = (-c1 * z_star).exp();
        let e_root = (-c1 * root_age).exp();
        let r = (-c1 * (root_age - z_star)).exp();
        let scale = a * e_root + b;
        let k = y * e_z * (1.0 - r) / scale;
        let ratio = (1.0 - y * (1.0 - r) * b / scale) / (1.0 + k * a);
        // ratio >= r in exact arithmetic.
        let ratio = ratio.clamp(r.max(f64::MIN_POSITIVE), 1.0);
        (z_star - ratio.ln() / c1).clamp(z_star, root_age)
    }
}

/// Age of the tip reached from `start` by repeatedly taking the child
/// chosen by `step`.
fn tip_age(
    tree: &TimeTree,
    start: NodeIndex,
    step: fn(&TimeTreeNode) -> Option<NodeIndex>,
) -> Result<f64, TreeError> {
    let mut k = start;
    while !tree.is_tip_index(k) {
        let node = tree.node(k).ok_or(TreeError::UnknownNode { index: k })?;
        k = step(node).ok_or(TreeError::NotBinary {
            index: k,
            children: node.children().len(),
        })?;
    }
    tree.age(k)
}

impl BirthDeathSerialSampling {
    /// Simulate a tree over the given `(name, age)` leaves.
    ///
    /// # Errors
    ///
    /// [`GenerateError::InvalidParameter`] for fewer than two leaves, a
    /// leaf age outside `[0, root_age)`, or degenerate rates; tree errors
    /// if the reconstruction fails.
    pub fn simulate(
        leaves: Vec<(String, f64)>,
        rates: &BirthDeathRates,
        root_age: f64,
        rng: &mut ModelRng,
    ) -> Result<TimeTree, GenerateError> {
        check_leaves(leaves.iter().map(|(_, age)| *age), leaves.len(), root_age)?;
        let times = DivergenceTimes::new(rates, root_age)?;

        // Phase 1: random topology with provisional ages.
        let mut tree = TimeTree::from_leaves(leaves)?;
        let mut active: Vec<NodeIndex> = (0..tree.n_taxa() as u32).map(NodeIndex).collect();
        while active.len() > 1 {
            let a = active.remove(rng.random_range(0..active.len()));
            let b = active.remove(rng.random_range(0..active.len()));
            let age = tree.age(a)?.max(tree.age(b)?);
            active.push(tree.add_internal(age, a, b)?);
        }
        let root = active.first().copied().ok_or_else(|| GenerateError::ExecutionFailed {
            reason: "no lineages".to_string(),
        })?;
        tree.set_root(root)?;
        tree.set_age(root, root_age)?;

        // Phase 2: divergence times, in in-order.
        let internal: Vec<NodeIndex> = tree
            .in_order()?
            .into_iter()
            .filter(|&i| !tree.is_tip_index(i) && i != root)
            .collect();
        for j in internal {
            let node = tree.node(j).ok_or(TreeError::UnknownNode { index: j })?;
            let (Some(left), Some(right)) = (node.left(), node.right()) else {
                return Err(TreeError::NotBinary {
                    index: j,
                    children: node.children().len(),
                }
                .into());
            };
            let z0 = tip_age(&tree, right, TimeTreeNode::left)?;
            let z1 = tip_age(&tree, left, TimeTreeNode::right)?;
            let y: f64 = rng.random();
            let age = times.invert(z0.max(z1), y);
            trace!(node = %j, z_star = z0.max(z1), age, "divergence time");
            tree.set_age(j, age)?;
        }

        // Phase 3: oldest-first reconstruction.
        reconstruct_oldest_first(&mut tree)?;
        Ok(tree)
    }
}

fn check_leaves(
    ages: impl Iterator<Item = f64>,
    count: usize,
    root_age: f64,
) -> Result<(), GenerateError> {
    if count < 2 {
        return Err(GenerateError::invalid(
            "n",
            format!("need at least two leaves, got {count}"),
        ));
    }
    for (i, age) in ages.enumerate() {
        if !(age >= 0.0 && age < root_age) {
            return Err(GenerateError::invalid(
                "ages",
                format!("leaf {i} age {age} must be in [0, rootAge={root_age})"),
            ));
        }
    }
    Ok(())
}

/// `(name, age)` pairs from whichever leaf source is bound.
fn leaf_set(args: &Args<'_>) -> Result<Vec<(String, f64)>, GenerateError> {
    Ok(match leaves::exactly_one(args, &LEAF_SOURCES)? {
        "n" => leaves::numbered(leaves::count(args, "n")?)
            .into_iter()
            .map(|name| (name, 0.0))
            .collect(),
        "taxaAges" => args
            .taxa("taxaAges")?
            .iter()
            .map(|(name, age)| (name.to_string(), age))
            .collect(),
        _ => {
            let ages = args.real_array("ages")?;
            leaves::numbered(ages.len()).into_iter().zip(ages).collect()
        }
    })
}

fn rates(args: &Args<'_>) -> Result<BirthDeathRates, GenerateError> {
    BirthDeathRates::new(
        args.real("lambda")?,
        args.real("mu")?,
        args.real("rho")?,
        args.real("psi")?,
    )
}

impl Generator for BirthDeathSerialSampling {
    fn info(&self) -> &'static GeneratorInfo {
        &INFO
    }

    fn validate(&self, args: &Args<'_>) -> Result<(), GenerateError> {
        leaves::exactly_one(args, &LEAF_SOURCES)?;
        let available = ["lambda", "mu", "rho", "psi"]
            .iter()
            .all(|name| args.peek(name).is_some());
        if available {
            let rates = rates(args)?;
            if let Some(root_age) = args.peek("rootAge").and_then(Datum::as_real) {
                DivergenceTimes::new(&rates, root_age)?;
            }
        }
        if let Some(root_age) = args.peek("rootAge").and_then(Datum::as_real) {
            if !(root_age.is_finite() && root_age > 0.0) {
                return Err(GenerateError::invalid(
                    "rootAge",
                    format!("{root_age} must be > 0"),
                ));
            }
            let sources_ready = LEAF_SOURCES
                .iter()
                .any(|name| args.peek(name).is_some());
            if sources_ready {
                let leaves = leaf_set(args)?;
                check_leaves(leaves.iter().map(|(_, a)| *a), leaves.len(), root_age)?;
            }
        }
        Ok(())
    }

    fn generate(&self, args: &Args<'_>, rng: &mut ModelRng) -> Result<Datum, GenerateError> {
        let rates = rates(args)?;
        let root_age = args.real("rootAge")?;
        Self::simulate(leaf_set(args)?, &rates, root_age, rng).map(Datum::Tree)
    }
}
