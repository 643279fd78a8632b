mod display;
mod fetch;
mod hot;
mod import;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::display::{display_draws, display_import_summary, display_probabilities, display_results};
use crate::fetch::{fetch_or_empty, WebHistory};
use crate::hot::{default_hot_file, resolve_hot_numbers};
use lottogen_db::db::{count_draws, db_path, fetch_last_draws, migrate, open_db};
use lottogen_db::models::{Draw, Game};
use lottogen_engine::bias::source_for;
use lottogen_engine::config::{BiasKind, GameConfig};
use lottogen_engine::duplicate::BonusPolicy;
use lottogen_engine::generator::Generator;

#[derive(Parser)]
#[command(name = "lottogen", about = "Générateur de grilles NZ Lotto / Mega Millions")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct GameOptions {
    /// Jeu (défaut : nz-lotto, ou celui du fichier de configuration)
    #[arg(short, long, value_enum)]
    game: Option<Game>,

    /// Source de biais
    #[arg(short, long, value_enum)]
    bias: Option<BiasKind>,

    /// Fichier de configuration JSON (voir `lottogen config`)
    #[arg(long)]
    config: Option<PathBuf>,

    /// CSV des numéros chauds (colonne `Number`)
    #[arg(long)]
    hot_file: Option<PathBuf>,

    /// CSV des numéros bonus chauds (colonne `Number`)
    #[arg(long)]
    hot_bonus_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Générer des grilles et les comparer aux tirages passés
    Generate {
        #[command(flatten)]
        options: GameOptions,

        /// Nombre de grilles
        #[arg(short, long, default_value = "10")]
        count: usize,

        /// Seed pour la reproductibilité
        #[arg(long)]
        seed: Option<u64>,

        /// Ne pas récupérer les résultats en ligne
        #[arg(long)]
        offline: bool,

        /// Page de résultats à utiliser à la place de celle par défaut
        #[arg(long)]
        url: Option<String>,

        /// Le bonus doit-il aussi correspondre pour « déjà tiré »
        #[arg(long, value_enum)]
        policy: Option<BonusPolicy>,
    },

    /// Afficher les distributions composées
    Probabilities {
        #[command(flatten)]
        options: GameOptions,
    },

    /// Importer des tirages depuis un fichier CSV
    Import {
        #[arg(short, long, value_enum, default_value = "nz-lotto")]
        game: Game,

        /// Chemin vers le fichier CSV (draw_id,date,numéros...,bonus)
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Lister les derniers tirages enregistrés
    List {
        #[arg(short, long, value_enum, default_value = "nz-lotto")]
        game: Game,

        /// Nombre de tirages à afficher
        #[arg(short, long, default_value = "10")]
        last: u32,
    },

    /// Afficher le chemin de la base de données
    DbPath,

    /// Afficher la configuration par défaut d'un jeu (JSON)
    Config {
        #[arg(short, long, value_enum, default_value = "nz-lotto")]
        game: Game,

        /// Écrire la configuration dans ce fichier au lieu de l'afficher
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Generate {
            options,
            count,
            seed,
            offline,
            url,
            policy,
        } => cmd_generate(&options, count, seed, offline, url, policy),
        Command::Probabilities { options } => cmd_probabilities(&options),
        Command::Import { game, file } => cmd_import(game, &file),
        Command::List { game, last } => cmd_list(game, last),
        Command::DbPath => {
            println!("{}", db_path().display());
            Ok(())
        }
        Command::Config { game, output } => cmd_config(game, output.as_deref()),
    }
}

fn build_config(options: &GameOptions) -> Result<GameConfig> {
    let mut config = match &options.config {
        Some(path) => {
            let config = GameConfig::load(path)
                .with_context(|| format!("Impossible de charger la configuration {:?}", path))?;
            if let Some(game) = options.game.filter(|g| *g != config.game) {
                bail!(
                    "--game {} ne correspond pas au jeu de {:?} ({})",
                    game.key(),
                    path,
                    config.game.key()
                );
            }
            config
        }
        None => GameConfig::for_game(options.game.unwrap_or(Game::NzLotto)),
    };

    if let Some(bias) = options.bias {
        config.bias = bias;
    }

    if let Some(hot_file) = hot_file_for(options, config.game) {
        config.hot_main = resolve_hot_numbers(&hot_file, &config.hot_main, "principaux");
    }

    if let Some(path) = &options.hot_bonus_file {
        config.hot_bonus = resolve_hot_numbers(path, &config.hot_bonus, "bonus");
    }

    Ok(config)
}

/// Fichier de numéros chauds à lire : `--hot-file`, sinon le fichier par défaut
/// du jeu, sauf si une configuration explicite fournit déjà ses numéros.
fn hot_file_for(options: &GameOptions, game: Game) -> Option<PathBuf> {
    match (&options.hot_file, &options.config) {
        (Some(path), _) => Some(path.clone()),
        (None, Some(_)) => None,
        (None, None) => Some(default_hot_file(game)),
    }
}

/// Tirages enregistrés localement. Une base absente ou illisible ne bloque pas la génération.
fn stored_history(game: Game) -> Vec<Draw> {
    let path = db_path();
    if !path.exists() {
        return Vec::new();
    }
    let load = || -> Result<Vec<Draw>> {
        let conn = open_db(&path)?;
        migrate(&conn)?;
        let n = count_draws(&conn, game)?;
        fetch_last_draws(&conn, game, n)
    };
    match load() {
        Ok(draws) => draws,
        Err(e) => {
            warn!("historique local ignoré : {e:#}");
            Vec::new()
        }
    }
}

fn cmd_generate(
    options: &GameOptions,
    count: usize,
    seed: Option<u64>,
    offline: bool,
    url: Option<String>,
    policy: Option<BonusPolicy>,
) -> Result<()> {
    let mut config = build_config(options)?;
    if let Some(policy) = policy {
        config.bonus_policy = policy;
    }
    let game = config.game;
    let generator = Generator::new(config)?;

    let mut history = stored_history(game);
    if !offline {
        history.extend(fetch_or_empty(&WebHistory::new(game, url)));
    }
    info!(game = game.key(), draws = history.len(), "historique chargé");

    let mut rng: StdRng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_rng(&mut rand::rng()),
    };

    let results = generator.generate_many(count, &mut rng, &history)?;
    display_results(game, &results);
    Ok(())
}

fn cmd_probabilities(options: &GameOptions) -> Result<()> {
    let config = build_config(options)?;
    let game = config.game;
    let source_name = source_for(config.bias, &config.physics).name().to_string();
    let generator = Generator::new(config)?;

    display_probabilities(
        game,
        generator.main_probabilities(),
        generator.hot_main(),
        generator.bonus_probabilities(),
        generator.hot_bonus(),
        &source_name,
    );
    Ok(())
}

fn cmd_config(game: Game, output: Option<&Path>) -> Result<()> {
    let config = GameConfig::for_game(game);
    match output {
        Some(path) => {
            config
                .save(path)
                .with_context(|| format!("Impossible d'écrire {:?}", path))?;
            println!("Configuration {} écrite dans {}", game, path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(&config)?),
    }
    Ok(())
}

fn cmd_import(game: Game, file: &Path) -> Result<()> {
    let conn = open_db(&db_path())?;
    migrate(&conn)?;
    let result = import::import_csv(&conn, game, file)?;
    display_import_summary(&result);
    Ok(())
}

fn cmd_list(game: Game, last: u32) -> Result<()> {
    let conn = open_db(&db_path())?;
    migrate(&conn)?;
    let n = count_draws(&conn, game)?;
    if n == 0 {
        println!("Aucun tirage {} enregistré. Lancez d'abord : lottogen import --game {}", game, game.key());
        return Ok(());
    }
    let draws = fetch_last_draws(&conn, game, last)?;
    display_draws(game, &draws);
    Ok(())
}
