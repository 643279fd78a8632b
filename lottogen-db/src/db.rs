use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use std::path::Path;

use crate::models::{Draw, Game};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS draws (
    game     TEXT NOT NULL,
    draw_id  TEXT NOT NULL,
    date     TEXT NOT NULL,
    numbers  TEXT NOT NULL,
    bonus    INTEGER,
    PRIMARY KEY (game, draw_id)
);
";

pub fn db_path() -> std::path::PathBuf {
    let mut path = std::env::current_dir().unwrap_or_default();
    path.push("data");
    path.push("lottogen.db");
    path
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Impossible de créer le répertoire {:?}", parent))?;
    }
    let conn = Connection::open(path)
        .with_context(|| format!("Impossible d'ouvrir la base {:?}", path))?;
    Ok(conn)
}

pub fn migrate(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA).context("Échec de la migration")?;
    Ok(())
}

fn encode_numbers(numbers: &[u8]) -> String {
    numbers
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

fn decode_numbers(raw: &str) -> Result<Vec<u8>> {
    raw.split(',')
        .map(|s| {
            s.trim()
                .parse::<u8>()
                .with_context(|| format!("Numéro invalide en base : '{}'", s))
        })
        .collect()
}

pub fn insert_draw(conn: &Connection, game: Game, draw: &Draw) -> Result<bool> {
    let changed = conn
        .execute(
            "INSERT OR IGNORE INTO draws (game, draw_id, date, numbers, bonus)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                game.key(),
                draw.draw_id,
                draw.date,
                encode_numbers(&draw.numbers),
                draw.bonus,
            ],
        )
        .context("Échec de l'insertion")?;
    Ok(changed > 0)
}

/// Derniers tirages d'un jeu, du plus récent au plus ancien.
pub fn fetch_last_draws(conn: &Connection, game: Game, limit: u32) -> Result<Vec<Draw>> {
    let mut stmt = conn.prepare(
        "SELECT draw_id, date, numbers, bonus
         FROM draws WHERE game = ?1 ORDER BY date DESC, draw_id DESC LIMIT ?2",
    )?;
    let rows = stmt
        .query_map(params![game.key(), limit], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, Option<u8>>(3)?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter()
        .map(|(draw_id, date, numbers, bonus)| {
            Ok(Draw {
                draw_id,
                date,
                numbers: decode_numbers(&numbers)?,
                bonus,
            })
        })
        .collect()
}

pub fn count_draws(conn: &Connection, game: Game) -> Result<u32> {
    let count: u32 = conn.query_row(
        "SELECT COUNT(*) FROM draws WHERE game = ?1",
        [game.key()],
        |row| row.get(0),
    )?;
    Ok(count)
}
