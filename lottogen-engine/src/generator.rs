use rand::Rng;
use tracing::{info, warn};

use lottogen_db::models::{Draw, Pool, Ticket};

use crate::bias::{source_for, ProbabilityVector};
use crate::compose::compose;
use crate::config::GameConfig;
use crate::duplicate::is_previous_draw;
use crate::error::EngineResult;
use crate::hot::HotSet;
use crate::sampler::{draw_bonus, draw_main, HotConstraint};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    pub ticket: Ticket,
    pub previously_drawn: bool,
    pub fallback_used: bool,
}

/// Pipeline complet : source de biais → composition avec les numéros chauds →
/// tirage contraint → vérification de l'historique.
pub struct Generator {
    config: GameConfig,
    hot_main: HotSet,
    hot_bonus: HotSet,
    main_probs: ProbabilityVector,
    bonus_probs: ProbabilityVector,
}

impl Generator {
    pub fn new(config: GameConfig) -> EngineResult<Self> {
        config.validate()?;

        let game = config.game;
        let main_size = game.pool_size(Pool::Main);
        let bonus_size = game.pool_size(Pool::Bonus);

        let hot_main = HotSet::new(config.hot_main.iter().copied());
        let hot_bonus = HotSet::new(config.hot_bonus.iter().copied());

        let source = source_for(config.bias, &config.physics);
        let main_base = source.distribution(main_size)?;
        let bonus_base = source.distribution(bonus_size)?;

        let main_probs = compose(&main_base, &hot_main, config.boost_factor, config.base_factor)?;
        let bonus_probs = compose(&bonus_base, &hot_bonus, config.boost_factor, config.base_factor)?;

        info!(
            game = game.key(),
            bias = source.name(),
            hot_main = hot_main.len(),
            hot_bonus = hot_bonus.len(),
            "distributions prêtes"
        );

        let generator = Self {
            config,
            hot_main,
            hot_bonus,
            main_probs,
            bonus_probs,
        };
        if generator.always_falls_back() {
            warn!(
                game = game.key(),
                min_hot = generator.config.min_hot,
                hot_in_range = generator.hot_main.within(main_size).len(),
                "pas assez de numéros chauds dans la plage 1-{main_size} : chaque grille sera tirée uniformément"
            );
        }
        Ok(generator)
    }

    /// Vrai quand la contrainte de numéros chauds ne peut jamais être satisfaite.
    pub fn always_falls_back(&self) -> bool {
        let size = self.config.game.pool_size(Pool::Main);
        self.hot_main.within(size).len() < self.config.min_hot
    }

    pub fn hot_main(&self) -> &HotSet {
        &self.hot_main
    }

    pub fn hot_bonus(&self) -> &HotSet {
        &self.hot_bonus
    }

    pub fn main_probabilities(&self) -> &ProbabilityVector {
        &self.main_probs
    }

    pub fn bonus_probabilities(&self) -> &ProbabilityVector {
        &self.bonus_probs
    }

    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R, history: &[Draw]) -> EngineResult<GenerationResult> {
        let constraint = HotConstraint {
            hot: &self.hot_main,
            min_hot: self.config.min_hot,
            max_retries: self.config.max_retries,
        };
        let count = self.config.game.pick_count(Pool::Main);

        let outcome = draw_main(&self.main_probs, count, &constraint, rng)?;
        let fallback_used = outcome.is_fallback();
        let bonus = draw_bonus(&self.bonus_probs, rng)?;

        let ticket = Ticket {
            numbers: outcome.into_numbers(),
            bonus,
        };
        let previously_drawn = is_previous_draw(&ticket, history, self.config.bonus_policy);

        Ok(GenerationResult {
            ticket,
            previously_drawn,
            fallback_used,
        })
    }

    pub fn generate_many<R: Rng + ?Sized>(
        &self,
        count: usize,
        rng: &mut R,
        history: &[Draw],
    ) -> EngineResult<Vec<GenerationResult>> {
        (0..count).map(|_| self.generate(&mut *rng, history)).collect()
    }
}
