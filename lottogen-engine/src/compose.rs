use crate::bias::ProbabilityVector;
use crate::error::EngineResult;
use crate::hot::HotSet;

/// Multiplie chaque probabilité de base par `boost` (numéro chaud) ou
/// `base_factor` (autre numéro), puis renormalise.
///
/// Les numéros chauds hors plage n'ont aucun effet ; aucun numéro ne tombe à zéro.
pub fn compose(
    base: &ProbabilityVector,
    hot: &HotSet,
    boost: f64,
    base_factor: f64,
) -> EngineResult<ProbabilityVector> {
    let weights = base
        .iter_numbered()
        .map(|(n, p)| {
            let multiplier = if hot.contains(n) { boost } else { base_factor };
            multiplier * p
        })
        .collect();
    ProbabilityVector::from_weights(weights)
}
