use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use lottogen_db::models::Game;

const NUMBER_COLUMN: &str = "Number";

pub fn default_hot_file(game: Game) -> PathBuf {
    match game {
        Game::NzLotto => PathBuf::from("hotnumbers.csv"),
        Game::MegaMillions => PathBuf::from("mmhotnumbers.csv"),
    }
}

/// Lit la colonne `Number` d'un CSV. Les cellules vides et les valeurs hors de
/// `1..=255` sont ignorées ; une cellule non numérique est une erreur.
pub fn load_hot_numbers(path: &Path) -> Result<Vec<u8>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Impossible d'ouvrir {:?}", path))?;

    let column = reader
        .headers()
        .context("En-tête illisible")?
        .iter()
        .position(|h| h == NUMBER_COLUMN)
        .with_context(|| format!("Colonne '{}' absente de {:?}", NUMBER_COLUMN, path))?;

    let mut numbers = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Ligne {} illisible", line + 2))?;
        let Some(raw) = record.get(column).filter(|s| !s.is_empty()) else {
            continue;
        };
        let value = raw
            .parse::<i64>()
            .with_context(|| format!("Numéro invalide ligne {} : '{}'", line + 2, raw))?;
        match u8::try_from(value).ok().filter(|&n| n >= 1) {
            Some(n) => numbers.push(n),
            None => debug!(line = line + 2, value, "numéro chaud hors plage ignoré"),
        }
    }
    Ok(numbers)
}

/// Numéros chauds du fichier, ou `fallback` si le fichier est absent, illisible ou vide.
pub fn resolve_hot_numbers(path: &Path, fallback: &[u8], label: &str) -> Vec<u8> {
    if !path.exists() {
        info!(file = ?path, "pas de fichier de numéros chauds ({label}), valeurs par défaut");
        return fallback.to_vec();
    }
    match load_hot_numbers(path) {
        Ok(numbers) if !numbers.is_empty() => {
            info!(file = ?path, count = numbers.len(), "numéros chauds ({label}) chargés");
            numbers
        }
        Ok(_) => {
            warn!(file = ?path, "fichier de numéros chauds vide ({label}), valeurs par défaut");
            fallback.to_vec()
        }
        Err(e) => {
            warn!(file = ?path, "numéros chauds ({label}) ignorés : {e:#}");
            fallback.to_vec()
        }
    }
}
