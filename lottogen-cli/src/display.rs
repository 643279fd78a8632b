use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

use crate::import::ImportResult;
use lottogen_db::models::{Draw, Game};
use lottogen_engine::bias::ProbabilityVector;
use lottogen_engine::generator::GenerationResult;
use lottogen_engine::hot::HotSet;

pub const NEW_LABEL: &str = "New Numbers";
pub const PREVIOUS_LABEL: &str = "PREVIOUSLY DRAWN";

fn join_numbers(numbers: &[u8]) -> String {
    numbers
        .iter()
        .map(|n| format!("{:2}", n))
        .collect::<Vec<_>>()
        .join(" - ")
}

pub fn status_label(result: &GenerationResult) -> &'static str {
    if result.previously_drawn {
        PREVIOUS_LABEL
    } else {
        NEW_LABEL
    }
}

pub fn display_results(game: Game, results: &[GenerationResult]) {
    println!("\n🎲 Grilles {}\n", game);

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["#", "Statut", "Numéros", game.bonus_name(), "Tirage"]);

    for (i, result) in results.iter().enumerate() {
        let color = if result.previously_drawn {
            Color::Red
        } else {
            Color::Green
        };
        let mode = if result.fallback_used {
            "uniforme (repli)"
        } else {
            "pondéré"
        };
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(status_label(result)).fg(color),
            Cell::new(join_numbers(&result.ticket.numbers)),
            Cell::new(format!("{:2}", result.ticket.bonus)),
            Cell::new(mode),
        ]);
    }
    println!("{table}");

    let previous = results.iter().filter(|r| r.previously_drawn).count();
    let fallbacks = results.iter().filter(|r| r.fallback_used).count();
    if previous > 0 {
        println!("{} grille(s) déjà tirée(s).", previous);
    }
    if fallbacks > 0 {
        println!("{} grille(s) tirée(s) sans contrainte de numéros chauds.", fallbacks);
    }
}

pub fn display_draws(game: Game, draws: &[Draw]) {
    if draws.is_empty() {
        println!("Aucun tirage à afficher.");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Tirage", "Date", "Numéros", game.bonus_name()]);

    for draw in draws {
        let mut sorted = draw.numbers.clone();
        sorted.sort();

        let bonus = draw
            .bonus
            .map(|b| format!("{:2}", b))
            .unwrap_or_else(|| "—".to_string());

        table.add_row(vec![
            &draw.draw_id,
            &draw.date,
            &join_numbers(&sorted),
            &bonus,
        ]);
    }

    println!("{table}");
}

pub fn display_import_summary(result: &ImportResult) {
    println!("Import terminé :");
    println!("  Total lignes lues : {}", result.total_records);
    println!("  Insérés           : {}", result.inserted);
    println!("  Doublons ignorés  : {}", result.skipped);
    if result.errors > 0 {
        println!("  Erreurs           : {}", result.errors);
    }
}

pub fn display_probabilities(
    game: Game,
    main: &ProbabilityVector,
    hot_main: &HotSet,
    bonus: &ProbabilityVector,
    hot_bonus: &HotSet,
    source_name: &str,
) {
    println!("\n🎯 Probabilités {} ({source_name})\n", game);

    println!("── Numéros principaux ──");
    display_prob_table(main, hot_main);

    println!("\n── {} ──", game.bonus_name());
    display_prob_table(bonus, hot_bonus);
}

fn display_prob_table(probs: &ProbabilityVector, hot: &HotSet) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Numéro", "Probabilité", "Tag"]);

    let mut sorted: Vec<(u8, f64)> = probs.iter_numbered().collect();
    sorted.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    for (number, probability) in sorted {
        let (tag, color) = if hot.contains(number) {
            ("HOT", Color::Green)
        } else {
            ("-", Color::White)
        };
        table.add_row(vec![
            Cell::new(format!("{:2}", number)),
            Cell::new(format!("{:.4}", probability)),
            Cell::new(tag).fg(color),
        ]);
    }
    println!("{table}");
}
