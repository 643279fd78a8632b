use std::path::Path;

use serde::{Deserialize, Serialize};

use lottogen_db::models::{Game, Pool};

use crate::duplicate::BonusPolicy;
use crate::error::{EngineError, EngineResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BiasKind {
    Uniform,
    Fibonacci,
    #[default]
    Physics,
}

/// Constantes physiques de la machine (unités SI).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicsParams {
    pub ball_diameter: f64,
    pub ball_mass: f64,
    pub chamber_diameter: f64,
    pub air_pressure: f64,
    pub mixing_duration: f64,
}

impl Default for PhysicsParams {
    fn default() -> Self {
        Self {
            ball_diameter: 0.04,
            ball_mass: 0.0027,
            chamber_diameter: 0.6,
            air_pressure: 101_325.0,
            mixing_duration: 10.0,
        }
    }
}

impl PhysicsParams {
    pub fn validate(&self) -> EngineResult<()> {
        let fields = [
            ("ball_diameter", self.ball_diameter),
            ("ball_mass", self.ball_mass),
            ("chamber_diameter", self.chamber_diameter),
            ("air_pressure", self.air_pressure),
            ("mixing_duration", self.mixing_duration),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(EngineError::InvalidConfig(format!(
                    "{} doit être strictement positif (reçu {})",
                    name, value
                )));
            }
        }
        if self.chamber_diameter <= self.ball_diameter {
            return Err(EngineError::InvalidConfig(format!(
                "chambre ({} m) plus petite que la boule ({} m)",
                self.chamber_diameter, self.ball_diameter
            )));
        }
        Ok(())
    }
}

/// Paramètres complets d'une génération pour un jeu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub game: Game,
    pub bias: BiasKind,
    pub physics: PhysicsParams,
    pub hot_main: Vec<u8>,
    pub hot_bonus: Vec<u8>,
    pub boost_factor: f64,
    pub base_factor: f64,
    pub min_hot: usize,
    pub max_retries: usize,
    pub bonus_policy: BonusPolicy,
}

pub const DEFAULT_MAX_RETRIES: usize = 1000;

impl GameConfig {
    pub fn for_game(game: Game) -> Self {
        match game {
            Game::NzLotto => Self {
                game,
                bias: BiasKind::Physics,
                physics: PhysicsParams::default(),
                hot_main: vec![23, 32, 36, 17, 40, 13, 5],
                hot_bonus: vec![1, 5, 6, 9],
                boost_factor: 3.0,
                base_factor: 1.0,
                min_hot: 2,
                max_retries: DEFAULT_MAX_RETRIES,
                bonus_policy: BonusPolicy::for_game(game),
            },
            Game::MegaMillions => Self {
                game,
                bias: BiasKind::Physics,
                physics: PhysicsParams::default(),
                hot_main: vec![10, 17, 31, 46, 64, 3, 14],
                hot_bonus: vec![22, 24, 9, 13],
                boost_factor: 1.5,
                base_factor: 1.0,
                min_hot: 1,
                max_retries: DEFAULT_MAX_RETRIES,
                bonus_policy: BonusPolicy::for_game(game),
            },
        }
    }

    pub fn validate(&self) -> EngineResult<()> {
        for (name, value) in [("boost_factor", self.boost_factor), ("base_factor", self.base_factor)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(EngineError::InvalidConfig(format!(
                    "{} doit être strictement positif (reçu {})",
                    name, value
                )));
            }
        }

        let pick = self.game.pick_count(Pool::Main);
        let size = self.game.pool_size(Pool::Main);
        if pick > size {
            return Err(EngineError::InvalidConfig(format!(
                "{} numéros demandés pour une plage de {}",
                pick, size
            )));
        }
        if self.min_hot > pick {
            return Err(EngineError::InvalidConfig(format!(
                "min_hot ({}) supérieur au nombre de numéros tirés ({})",
                self.min_hot, pick
            )));
        }
        if self.max_retries == 0 {
            return Err(EngineError::InvalidConfig("max_retries doit être ≥ 1".into()));
        }
        if self.bias == BiasKind::Physics {
            self.physics.validate()?;
        }
        Ok(())
    }

    pub fn load(path: &Path) -> EngineResult<Self> {
        let json = std::fs::read_to_string(path)?;
        let config: GameConfig = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> EngineResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configs_are_valid() {
        for game in [Game::NzLotto, Game::MegaMillions] {
            GameConfig::for_game(game).validate().unwrap();
        }
    }

    #[test]
    fn test_default_policies() {
        assert_eq!(GameConfig::for_game(Game::NzLotto).bonus_policy, BonusPolicy::Lenient);
        assert_eq!(GameConfig::for_game(Game::MegaMillions).bonus_policy, BonusPolicy::Strict);
    }

    #[test]
    fn test_rejects_non_positive_factors() {
        let mut config = GameConfig::for_game(Game::NzLotto);
        config.boost_factor = 0.0;
        assert!(matches!(config.validate(), Err(EngineError::InvalidConfig(_))));

        let mut config = GameConfig::for_game(Game::NzLotto);
        config.base_factor = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_min_hot_above_draw_size() {
        let mut config = GameConfig::for_game(Game::MegaMillions);
        config.min_hot = 6;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_retries() {
        let mut config = GameConfig::for_game(Game::NzLotto);
        config.max_retries = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_physics_checked_only_when_selected() {
        let mut config = GameConfig::for_game(Game::NzLotto);
        config.physics.air_pressure = 0.0;
        assert!(config.validate().is_err());
        config.bias = BiasKind::Uniform;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_physics_rejects_small_chamber() {
        let params = PhysicsParams {
            chamber_diameter: 0.01,
            ..PhysicsParams::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = GameConfig::for_game(Game::MegaMillions);
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"mega-millions\""));
        assert!(json.contains("\"strict\""));
        let restored: GameConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, config);
    }

    #[test]
    fn test_config_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nz.json");
        let config = GameConfig::for_game(Game::NzLotto);
        config.save(&path).unwrap();
        assert_eq!(GameConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_load_rejects_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        let mut config = GameConfig::for_game(Game::NzLotto);
        config.max_retries = 0;
        config.save(&path).unwrap();
        assert!(GameConfig::load(&path).is_err());
    }
}
