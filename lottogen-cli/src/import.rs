use anyhow::{bail, Context, Result};
use lottogen_db::rusqlite::Connection;
use std::path::Path;
use tracing::warn;

use lottogen_db::db::insert_draw;
use lottogen_db::models::{validate_draw, Draw, Game, Pool};

/// Ligne attendue : `draw_id,date,n1,...,nk,bonus` (bonus facultatif).
fn parse_record(game: Game, record: &csv::StringRecord) -> Result<Draw> {
    let get = |idx: usize| -> Result<String> {
        record
            .get(idx)
            .map(|s| s.trim().to_string())
            .with_context(|| format!("Champ manquant à l'index {}", idx))
    };

    let get_u8 = |idx: usize| -> Result<u8> {
        let s = get(idx)?;
        s.parse::<u8>()
            .with_context(|| format!("Impossible de parser '{}' (index {})", s, idx))
    };

    let draw_id = get(0)?;
    let date = parse_date(&get(1)?)?;

    let count = game.pick_count(Pool::Main);
    let numbers = (2..2 + count).map(get_u8).collect::<Result<Vec<_>>>()?;

    let bonus = match get(2 + count).unwrap_or_default() {
        s if s.is_empty() => None,
        s => Some(
            s.parse::<u8>()
                .with_context(|| format!("{} invalide : '{}'", game.bonus_name(), s))?,
        ),
    };

    validate_draw(game, &numbers, bonus)?;

    Ok(Draw {
        draw_id,
        date,
        numbers,
        bonus,
    })
}

/// `JJ/MM/AAAA` → `AAAA-MM-JJ` ; une date déjà ISO est conservée.
fn parse_date(raw: &str) -> Result<String> {
    if raw.len() == 10 && raw.as_bytes()[4] == b'-' && raw.as_bytes()[7] == b'-' {
        return Ok(raw.to_string());
    }
    let parts: Vec<&str> = raw.split('/').collect();
    if parts.len() != 3 {
        bail!("Format de date invalide: '{}'", raw);
    }
    Ok(format!("{}-{}-{}", parts[2], parts[1], parts[0]))
}

pub struct ImportResult {
    pub total_records: u32,
    pub inserted: u32,
    pub skipped: u32,
    pub errors: u32,
}

pub fn import_csv(conn: &Connection, game: Game, path: &Path) -> Result<ImportResult> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Impossible d'ouvrir {:?}", path))?;

    let tx = conn
        .unchecked_transaction()
        .context("Impossible de démarrer la transaction")?;

    let mut result = ImportResult {
        total_records: 0,
        inserted: 0,
        skipped: 0,
        errors: 0,
    };

    for record_result in reader.records() {
        result.total_records += 1;
        match record_result {
            Ok(record) => match parse_record(game, &record) {
                Ok(draw) => match insert_draw(&tx, game, &draw) {
                    Ok(true) => result.inserted += 1,
                    Ok(false) => result.skipped += 1,
                    Err(e) => {
                        warn!("Erreur insertion tirage {}: {:#}", result.total_records, e);
                        result.errors += 1;
                    }
                },
                Err(e) => {
                    warn!("Erreur parsing ligne {}: {:#}", result.total_records, e);
                    result.errors += 1;
                }
            },
            Err(e) => {
                warn!("Erreur lecture ligne {}: {}", result.total_records, e);
                result.errors += 1;
            }
        }
    }

    tx.commit().context("Échec du commit")?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lottogen_db::db::{count_draws, fetch_last_draws, migrate};
    use std::io::Write;

    fn record(fields: &[&str]) -> csv::StringRecord {
        csv::StringRecord::from(fields.to_vec())
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("17/02/2026").unwrap(), "2026-02-17");
        assert_eq!(parse_date("2020-01-01").unwrap(), "2020-01-01");
        assert!(parse_date("2020.01.01").is_err());
    }

    #[test]
    fn test_parse_record_nz() {
        let r = record(&["2301", "04/03/2024", "3", "11", "17", "23", "32", "40", "5"]);
        let draw = parse_record(Game::NzLotto, &r).unwrap();
        assert_eq!(draw.date, "2024-03-04");
        assert_eq!(draw.numbers, vec![3, 11, 17, 23, 32, 40]);
        assert_eq!(draw.bonus, Some(5));
    }

    #[test]
    fn test_parse_record_without_bonus() {
        let r = record(&["1", "2024-01-02", "1", "2", "3", "4", "5"]);
        let draw = parse_record(Game::MegaMillions, &r).unwrap();
        assert_eq!(draw.bonus, None);
    }

    #[test]
    fn test_parse_record_invalid() {
        let r = record(&["1", "2024-01-02", "1", "2", "3", "4", "71", "3"]);
        assert!(parse_record(Game::MegaMillions, &r).is_err());
        let r = record(&["1", "2024-01-02", "1", "2", "3", "4", "5", "26"]);
        assert!(parse_record(Game::MegaMillions, &r).is_err());
        let r = record(&["1", "2024-01-02", "1", "2"]);
        assert!(parse_record(Game::MegaMillions, &r).is_err());
    }

    #[test]
    fn test_import_csv_counts() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "draw_id,date,n1,n2,n3,n4,n5,n6,bonus").unwrap();
        writeln!(file, "1,01/01/2024,1,2,3,4,5,6,7").unwrap();
        writeln!(file, "2,04/01/2024,7,8,9,10,11,12,1").unwrap();
        writeln!(file, "2,04/01/2024,7,8,9,10,11,12,1").unwrap();
        writeln!(file, "3,06/01/2024,1,1,3,4,5,6,7").unwrap();

        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        let result = import_csv(&conn, Game::NzLotto, file.path()).unwrap();

        assert_eq!(result.total_records, 4);
        assert_eq!(result.inserted, 2);
        assert_eq!(result.skipped, 1);
        assert_eq!(result.errors, 1);
        assert_eq!(count_draws(&conn, Game::NzLotto).unwrap(), 2);

        let draws = fetch_last_draws(&conn, Game::NzLotto, 10).unwrap();
        assert_eq!(draws[0].draw_id, "2");
    }
}
