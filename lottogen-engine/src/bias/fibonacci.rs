use std::collections::HashSet;

use super::{BiasSource, ProbabilityVector};
use crate::error::EngineResult;

/// Premiers termes de la suite de Fibonacci : 0, 1, 1, 2, 3, 5, ...
pub fn fibonacci(n: usize) -> Vec<u64> {
    let mut terms = Vec::with_capacity(n);
    let (mut a, mut b) = (0u64, 1u64);
    for _ in 0..n {
        terms.push(a);
        let next = a.saturating_add(b);
        a = b;
        b = next;
    }
    terms
}

/// Favorise les numéros qui appartiennent aux `terms` premiers termes de Fibonacci.
pub struct FibonacciBias {
    terms: usize,
    boost: f64,
}

impl Default for FibonacciBias {
    fn default() -> Self {
        Self {
            terms: 10,
            boost: 1.5,
        }
    }
}

impl BiasSource for FibonacciBias {
    fn name(&self) -> &str {
        "Fibonacci"
    }

    fn distribution(&self, size: usize) -> EngineResult<ProbabilityVector> {
        let favoured: HashSet<u64> = fibonacci(self.terms).into_iter().collect();
        let weights = (1..=size as u64)
            .map(|n| if favoured.contains(&n) { self.boost } else { 1.0 })
            .collect();
        ProbabilityVector::from_weights(weights)
    }
}
