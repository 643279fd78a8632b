use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Game {
    NzLotto,
    MegaMillions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pool {
    Main,
    Bonus,
}

impl Game {
    /// Clé stable utilisée dans la base et les fichiers de configuration.
    pub fn key(&self) -> &'static str {
        match self {
            Game::NzLotto => "nz-lotto",
            Game::MegaMillions => "mega-millions",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Game::NzLotto => "NZ Lotto",
            Game::MegaMillions => "Mega Millions",
        }
    }

    pub fn bonus_name(&self) -> &'static str {
        match self {
            Game::NzLotto => "Powerball",
            Game::MegaMillions => "Mega Ball",
        }
    }

    pub fn pool_size(&self, pool: Pool) -> usize {
        match (self, pool) {
            (Game::NzLotto, Pool::Main) => 40,
            (Game::NzLotto, Pool::Bonus) => 10,
            (Game::MegaMillions, Pool::Main) => 70,
            (Game::MegaMillions, Pool::Bonus) => 25,
        }
    }

    pub fn pick_count(&self, pool: Pool) -> usize {
        match (self, pool) {
            (Game::NzLotto, Pool::Main) => 6,
            (Game::MegaMillions, Pool::Main) => 5,
            (_, Pool::Bonus) => 1,
        }
    }
}

impl std::fmt::Display for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Tirage historique. `numbers` est dans l'ordre de la source, `bonus` peut
/// manquer quand la page de résultats ne l'associe pas au tirage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draw {
    pub draw_id: String,
    pub date: String,
    pub numbers: Vec<u8>,
    pub bonus: Option<u8>,
}

/// Grille générée : numéros principaux triés + numéro bonus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub numbers: Vec<u8>,
    pub bonus: u8,
}

pub fn validate_draw(game: Game, numbers: &[u8], bonus: Option<u8>) -> Result<()> {
    let expected = game.pick_count(Pool::Main);
    if numbers.len() != expected {
        bail!(
            "{} : {} numéros attendus, {} reçus",
            game,
            expected,
            numbers.len()
        );
    }
    let main_size = game.pool_size(Pool::Main);
    for &n in numbers {
        if n < 1 || n as usize > main_size {
            bail!("Numéro {} hors limites (1-{})", n, main_size);
        }
    }
    for i in 0..numbers.len() {
        for j in (i + 1)..numbers.len() {
            if numbers[i] == numbers[j] {
                bail!("Numéro en double : {}", numbers[i]);
            }
        }
    }
    if let Some(b) = bonus {
        let bonus_size = game.pool_size(Pool::Bonus);
        if b < 1 || b as usize > bonus_size {
            bail!("{} {} hors limites (1-{})", game.bonus_name(), b, bonus_size);
        }
    }
    Ok(())
}
