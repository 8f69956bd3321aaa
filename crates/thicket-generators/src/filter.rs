//! Alignment column filtering.

use thicket_core::{
    Datum, DatumKind, GenerateError, GeneratorInfo, GeneratorKind, ParamInfo, ParamKind,
    ReturnKind,
};
use thicket_graph::{Args, Generator, ModelRng};
use tracing::debug;

/// Drops every site whose fraction of unknown states exceeds `threshold`.
#[derive(Clone, Copy, Debug, Default)]
pub struct FilterMissingSites;

static INFO: GeneratorInfo = GeneratorInfo {
    name: "FilterMissingSites",
    kind: GeneratorKind::Distribution,
    description: "Remove the sites of an alignment whose proportion of missing states \
                  is above a threshold.",
    params: &[
        ParamInfo::required(
            "threshold",
            ParamKind::Is(DatumKind::Real),
            "largest tolerated proportion of missing states, in [0, 1)",
        ),
        ParamInfo::required(
            "alignment",
            ParamKind::Is(DatumKind::Alignment),
            "the alignment to filter",
        ),
    ],
    returns: ReturnKind::Fixed(DatumKind::Alignment),
};

fn check_threshold(threshold: f64) -> Result<(), GenerateError> {
    if (0.0..1.0).contains(&threshold) {
        Ok(())
    } else {
        Err(GenerateError::invalid(
            "threshold",
            format!("{threshold} must be in [0, 1)"),
        ))
    }
}

impl Generator for FilterMissingSites {
    fn info(&self) -> &'static GeneratorInfo {
        &INFO
    }

    fn validate(&self, args: &Args<'_>) -> Result<(), GenerateError> {
        match args.peek("threshold").and_then(Datum::as_real) {
            Some(threshold) => check_threshold(threshold),
            None => Ok(()),
        }
    }

    fn generate(&self, args: &Args<'_>, _rng: &mut ModelRng) -> Result<Datum, GenerateError> {
        let threshold = args.real("threshold")?;
        check_threshold(threshold)?;
        let alignment = args.alignment("alignment")?;
        let kept: Vec<usize> = (0..alignment.n_sites())
            .filter(|&site| alignment.missing_fraction(site) <= threshold)
            .collect();
        debug!(
            kept = kept.len(),
            total = alignment.n_sites(),
            "filtered alignment sites"
        );
        Ok(Datum::Alignment(alignment.select_sites(&kept)?))
    }
}
