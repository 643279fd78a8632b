use super::{BiasSource, ProbabilityVector};
use crate::error::EngineResult;

/// Aucun biais : 1/N pour chaque numéro.
pub struct UniformBias;

impl BiasSource for UniformBias {
    fn name(&self) -> &str {
        "Uniform"
    }

    fn distribution(&self, size: usize) -> EngineResult<ProbabilityVector> {
        ProbabilityVector::uniform(size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_values() {
        let dist = UniformBias.distribution(40).unwrap();
        for &p in dist.as_slice() {
            assert!((p - 1.0 / 40.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_uniform_empty_range() {
        assert!(UniformBias.distribution(0).is_err());
    }
}
