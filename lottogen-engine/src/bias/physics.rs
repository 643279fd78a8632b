use std::f64::consts::PI;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::{BiasSource, ProbabilityVector};
use crate::config::PhysicsParams;
use crate::error::EngineResult;

/// Seed fixe des perturbations : le modèle est une fonction pure des constantes physiques.
pub const BIAS_SEED: u64 = 42;

/// Nombre de volumes de boule que la chambre est censée contenir.
const CHAMBER_CAPACITY: f64 = 4.0;

/// Variation de masse simulée par boule (±1 %).
const MASS_VARIATION: f64 = 0.01;

/// Biais positionnel (±2 %).
const POSITIONAL_BIAS: f64 = 0.02;

/// Physics — biais synthétique d'une machine de tirage.
///
/// Heuristique déterministe, sans valeur prédictive :
/// 1. Probabilité géométrique : inverse du rapport volume chambre / volume boules
/// 2. Densité de vitesse issue du flux d'air (facteur d'échelle commun)
/// 3. Perturbations par boule : masse (±1 %) et position (±2 %, somme nulle)
/// 4. Normalisation
pub struct PhysicsBias {
    params: PhysicsParams,
}

impl PhysicsBias {
    pub fn new(params: PhysicsParams) -> Self {
        Self { params }
    }
}

fn sphere_volume(diameter: f64) -> f64 {
    let r = diameter / 2.0;
    4.0 / 3.0 * PI * r * r * r
}

fn geometric_probability(params: &PhysicsParams) -> f64 {
    let ball = sphere_volume(params.ball_diameter);
    let chamber = sphere_volume(params.chamber_diameter);
    1.0 / (chamber / (CHAMBER_CAPACITY * ball))
}

fn uniform_density(x: f64, low: f64, high: f64) -> f64 {
    if x >= low && x <= high {
        1.0 / (high - low)
    } else {
        0.0
    }
}

/// force = pression × section, a = F / m, v = a × durée ; densité uniforme
/// sur [0, v] évaluée au milieu.
fn airflow_density(params: &PhysicsParams) -> f64 {
    let r = params.ball_diameter / 2.0;
    let area = PI * r * r;
    let force = params.air_pressure * area;
    let acceleration = force / params.ball_mass;
    let max_velocity = acceleration * params.mixing_duration;
    uniform_density(max_velocity / 2.0, 0.0, max_velocity)
}

/// Facteur par boule : une boule plus légère est soulevée plus facilement.
fn mass_factors<R: Rng + ?Sized>(size: usize, mass: f64, rng: &mut R) -> Vec<f64> {
    (0..size)
        .map(|_| {
            let ball_mass = mass * (1.0 + rng.random_range(-MASS_VARIATION..=MASS_VARIATION));
            mass / ball_mass
        })
        .collect()
}

/// Moitié à +2 %, moitié à -2 % (0 pour le numéro restant si N est impair), permutées.
fn positional_offsets<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Vec<f64> {
    let half = size / 2;
    let mut offsets = vec![0.0; size];
    for i in 0..half {
        offsets[i] = POSITIONAL_BIAS;
        offsets[half + i] = -POSITIONAL_BIAS;
    }
    offsets.shuffle(rng);
    offsets
}

impl BiasSource for PhysicsBias {
    fn name(&self) -> &str {
        "Physics"
    }

    fn distribution(&self, size: usize) -> EngineResult<ProbabilityVector> {
        self.params.validate()?;

        let scale = geometric_probability(&self.params) * airflow_density(&self.params);

        let mut rng = StdRng::seed_from_u64(BIAS_SEED);
        let masses = mass_factors(size, self.params.ball_mass, &mut rng);
        let offsets = positional_offsets(size, &mut rng);

        let weights = masses
            .iter()
            .zip(offsets.iter())
            .map(|(&m, &o)| scale * m * (1.0 + o))
            .collect();

        ProbabilityVector::from_weights(weights)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bias::validate_distribution;

    #[test]
    fn test_physics_main_sums_to_one() {
        let dist = PhysicsBias::new(PhysicsParams::default()).distribution(40).unwrap();
        assert!(
            validate_distribution(dist.as_slice(), 40),
            "Sum = {}",
            dist.as_slice().iter().sum::<f64>()
        );
    }

    #[test]
    fn test_physics_bonus_sums_to_one() {
        let dist = PhysicsBias::new(PhysicsParams::default()).distribution(25).unwrap();
        assert!(validate_distribution(dist.as_slice(), 25));
    }

    #[test]
    fn test_physics_bit_identical() {
        let model = PhysicsBias::new(PhysicsParams::default());
        let a = model.distribution(70).unwrap();
        let b = model.distribution(70).unwrap();
        assert_eq!(a, b);

        let other = PhysicsBias::new(PhysicsParams::default()).distribution(70).unwrap();
        assert_eq!(a, other);
    }

    #[test]
    fn test_physics_perturbation_bounded() {
        let size = 40;
        let dist = PhysicsBias::new(PhysicsParams::default()).distribution(size).unwrap();
        for (n, p) in dist.iter_numbered() {
            let relative = p * size as f64;
            assert!(
                (0.95..=1.05).contains(&relative),
                "numéro {n} : {relative} trop loin de l'uniforme"
            );
        }
    }

    #[test]
    fn test_physics_scale_does_not_differentiate() {
        // Les facteurs géométrique et aérodynamique sont communs à tous les numéros
        let base = PhysicsBias::new(PhysicsParams::default()).distribution(40).unwrap();
        let params = PhysicsParams {
            chamber_diameter: 1.2,
            air_pressure: 50_000.0,
            ..PhysicsParams::default()
        };
        let scaled = PhysicsBias::new(params).distribution(40).unwrap();
        for (a, b) in base.as_slice().iter().zip(scaled.as_slice()) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn test_physics_rejects_degenerate_params() {
        let params = PhysicsParams {
            ball_mass: 0.0,
            ..PhysicsParams::default()
        };
        assert!(PhysicsBias::new(params).distribution(40).is_err());
    }

    #[test]
    fn test_positional_offsets_balanced() {
        let mut rng = StdRng::seed_from_u64(BIAS_SEED);
        let even = positional_offsets(40, &mut rng);
        assert_eq!(even.iter().filter(|&&o| o > 0.0).count(), 20);
        assert_eq!(even.iter().filter(|&&o| o < 0.0).count(), 20);
        assert!(even.iter().sum::<f64>().abs() < 1e-12);

        let odd = positional_offsets(25, &mut rng);
        assert_eq!(odd.iter().filter(|&&o| o == 0.0).count(), 1);
        assert!(odd.iter().sum::<f64>().abs() < 1e-12);
    }

    #[test]
    fn test_airflow_density_is_inverse_velocity() {
        let params = PhysicsParams::default();
        let r = params.ball_diameter / 2.0;
        let v = params.air_pressure * PI * r * r / params.ball_mass * params.mixing_duration;
        assert!((airflow_density(&params) - 1.0 / v).abs() < 1e-15);
    }

    #[test]
    fn test_geometric_probability_ratio() {
        let params = PhysicsParams {
            ball_diameter: 1.0,
            chamber_diameter: 2.0,
            ..PhysicsParams::default()
        };
        // volume x8, capacité 4 boules : 4 / 8
        assert!((geometric_probability(&params) - 0.5).abs() < 1e-12);
    }
}
