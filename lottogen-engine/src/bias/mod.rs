pub mod fibonacci;
pub mod physics;
pub mod uniform;

use crate::config::{BiasKind, PhysicsParams};
use crate::error::{EngineError, EngineResult};

/// Distribution normalisée sur [1, N] : l'indice i correspond au numéro i+1.
/// Toutes les entrées sont strictement positives et la somme vaut 1.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilityVector(Vec<f64>);

impl ProbabilityVector {
    /// Normalise des poids bruts. Refuse un vecteur vide, non fini ou
    /// contenant un poids nul ou négatif.
    pub fn from_weights(weights: Vec<f64>) -> EngineResult<Self> {
        if weights.is_empty() {
            return Err(EngineError::InvalidDistribution("vecteur vide".into()));
        }
        if let Some((i, w)) = weights
            .iter()
            .enumerate()
            .find(|(_, w)| !w.is_finite() || **w <= 0.0)
        {
            return Err(EngineError::InvalidDistribution(format!(
                "poids {} invalide pour le numéro {}",
                w,
                i + 1
            )));
        }
        let total: f64 = weights.iter().sum();
        if !total.is_finite() {
            return Err(EngineError::InvalidDistribution("somme non finie".into()));
        }
        Ok(Self(weights.into_iter().map(|w| w / total).collect()))
    }

    pub fn uniform(size: usize) -> EngineResult<Self> {
        Self::from_weights(vec![1.0; size])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Probabilité du numéro `number` (0 hors de la plage).
    pub fn probability(&self, number: u8) -> f64 {
        match (number as usize).checked_sub(1) {
            Some(idx) => self.0.get(idx).copied().unwrap_or(0.0),
            None => 0.0,
        }
    }

    /// Paires (numéro, probabilité) dans l'ordre croissant des numéros.
    pub fn iter_numbered(&self) -> impl Iterator<Item = (u8, f64)> + '_ {
        self.0.iter().enumerate().map(|(i, &p)| ((i + 1) as u8, p))
    }
}

/// Source de biais : fournit le vecteur de probabilités de base d'une plage.
pub trait BiasSource {
    fn name(&self) -> &str;
    fn distribution(&self, size: usize) -> EngineResult<ProbabilityVector>;
}

pub fn source_for(kind: BiasKind, physics: &PhysicsParams) -> Box<dyn BiasSource> {
    match kind {
        BiasKind::Uniform => Box::new(uniform::UniformBias),
        BiasKind::Fibonacci => Box::new(fibonacci::FibonacciBias::default()),
        BiasKind::Physics => Box::new(physics::PhysicsBias::new(*physics)),
    }
}

pub fn validate_distribution(dist: &[f64], size: usize) -> bool {
    if dist.len() != size {
        return false;
    }
    if dist.iter().any(|&p| p <= 0.0 || !p.is_finite()) {
        return false;
    }
    let sum: f64 = dist.iter().sum();
    (sum - 1.0).abs() < 1e-9
}
