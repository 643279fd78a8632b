use rand::distr::weighted::WeightedIndex;
use rand::prelude::Distribution;
use rand::seq::index;
use rand::Rng;
use tracing::debug;

use crate::bias::ProbabilityVector;
use crate::error::{EngineError, EngineResult};
use crate::hot::HotSet;

/// Résultat d'un tirage principal : pondéré accepté, ou repli uniforme après
/// épuisement du budget d'essais. Les numéros sont triés.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawOutcome {
    Accepted(Vec<u8>),
    FallbackUsed(Vec<u8>),
}

impl DrawOutcome {
    pub fn numbers(&self) -> &[u8] {
        match self {
            DrawOutcome::Accepted(n) | DrawOutcome::FallbackUsed(n) => n,
        }
    }

    pub fn into_numbers(self) -> Vec<u8> {
        match self {
            DrawOutcome::Accepted(n) | DrawOutcome::FallbackUsed(n) => n,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, DrawOutcome::FallbackUsed(_))
    }
}

/// Contrainte de recouvrement : au moins `min_hot` numéros chauds, en
/// `max_retries` essais au plus.
#[derive(Debug, Clone, Copy)]
pub struct HotConstraint<'a> {
    pub hot: &'a HotSet,
    pub min_hot: usize,
    pub max_retries: usize,
}

pub fn draw_main<R: Rng + ?Sized>(
    probs: &ProbabilityVector,
    count: usize,
    constraint: &HotConstraint<'_>,
    rng: &mut R,
) -> EngineResult<DrawOutcome> {
    if count > probs.len() {
        return Err(EngineError::InvalidConfig(format!(
            "{} numéros demandés pour une plage de {}",
            count,
            probs.len()
        )));
    }

    for attempt in 0..constraint.max_retries {
        let mut numbers = sample_without_replacement(probs.as_slice(), count, rng)?;
        if constraint.hot.overlap(&numbers) >= constraint.min_hot {
            numbers.sort_unstable();
            debug!(attempt, "tirage pondéré accepté");
            return Ok(DrawOutcome::Accepted(numbers));
        }
    }

    debug!(max_retries = constraint.max_retries, "budget épuisé, repli uniforme");
    let mut numbers = sample_uniform(probs.len(), count, rng);
    numbers.sort_unstable();
    Ok(DrawOutcome::FallbackUsed(numbers))
}

pub fn draw_bonus<R: Rng + ?Sized>(probs: &ProbabilityVector, rng: &mut R) -> EngineResult<u8> {
    let dist = WeightedIndex::new(probs.as_slice())?;
    Ok((dist.sample(rng) + 1) as u8)
}

/// Tirage séquentiel : chaque numéro tiré quitte le pool, les poids restants
/// sont renormalisés implicitement par `WeightedIndex`.
fn sample_without_replacement<R: Rng + ?Sized>(
    probs: &[f64],
    count: usize,
    rng: &mut R,
) -> EngineResult<Vec<u8>> {
    let mut available: Vec<(u8, f64)> = probs
        .iter()
        .enumerate()
        .map(|(i, &p)| ((i + 1) as u8, p))
        .collect();
    let mut selected = Vec::with_capacity(count);

    for _ in 0..count {
        let weights: Vec<f64> = available.iter().map(|(_, w)| *w).collect();
        let dist = WeightedIndex::new(&weights)?;
        let idx = dist.sample(rng);

        let (number, _) = available.remove(idx);
        selected.push(number);
    }

    Ok(selected)
}

fn sample_uniform<R: Rng + ?Sized>(size: usize, count: usize, rng: &mut R) -> Vec<u8> {
    index::sample(rng, size, count)
        .into_iter()
        .map(|i| (i + 1) as u8)
        .collect()
}
