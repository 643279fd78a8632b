use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use lottogen_db::models::{Draw, Game, Ticket};

/// Le numéro bonus doit-il aussi correspondre pour qu'une grille soit « déjà tirée » ?
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BonusPolicy {
    /// Numéros principaux et bonus identiques
    Strict,
    /// Numéros principaux seulement
    Lenient,
}

impl BonusPolicy {
    pub fn for_game(game: Game) -> Self {
        match game {
            Game::NzLotto => BonusPolicy::Lenient,
            Game::MegaMillions => BonusPolicy::Strict,
        }
    }
}

fn same_numbers(a: &[u8], b: &[u8]) -> bool {
    let a: BTreeSet<u8> = a.iter().copied().collect();
    let b: BTreeSet<u8> = b.iter().copied().collect();
    a == b
}

/// Vrai si un tirage de l'historique a les mêmes numéros principaux (ordre
/// indifférent) et, en mode strict, le même bonus. Un tirage sans bonus connu
/// ne correspond jamais en mode strict.
pub fn is_previous_draw(ticket: &Ticket, history: &[Draw], policy: BonusPolicy) -> bool {
    history.iter().any(|draw| {
        same_numbers(&draw.numbers, &ticket.numbers)
            && match policy {
                BonusPolicy::Lenient => true,
                BonusPolicy::Strict => draw.bonus == Some(ticket.bonus),
            }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draw(numbers: &[u8], bonus: Option<u8>) -> Draw {
        Draw {
            draw_id: "1".to_string(),
            date: "2024-01-01".to_string(),
            numbers: numbers.to_vec(),
            bonus,
        }
    }

    fn ticket(numbers: &[u8], bonus: u8) -> Ticket {
        Ticket {
            numbers: numbers.to_vec(),
            bonus,
        }
    }

    #[test]
    fn test_strict_exact_match() {
        let history = vec![draw(&[1, 2, 3, 4, 5, 6], Some(7))];
        assert!(is_previous_draw(&ticket(&[1, 2, 3, 4, 5, 6], 7), &history, BonusPolicy::Strict));
    }

    #[test]
    fn test_bonus_mismatch_depends_on_policy() {
        let history = vec![draw(&[1, 2, 3, 4, 5, 6], Some(7))];
        let t = ticket(&[1, 2, 3, 4, 5, 6], 8);
        assert!(is_previous_draw(&t, &history, BonusPolicy::Lenient));
        assert!(!is_previous_draw(&t, &history, BonusPolicy::Strict));
    }

    #[test]
    fn test_order_is_irrelevant() {
        let history = vec![draw(&[1, 2, 3], Some(4))];
        assert!(is_previous_draw(&ticket(&[3, 1, 2], 4), &history, BonusPolicy::Strict));
        assert!(is_previous_draw(&ticket(&[2, 3, 1], 9), &history, BonusPolicy::Lenient));
    }

    #[test]
    fn test_empty_history() {
        let t = ticket(&[1, 2, 3, 4, 5, 6], 7);
        assert!(!is_previous_draw(&t, &[], BonusPolicy::Strict));
        assert!(!is_previous_draw(&t, &[], BonusPolicy::Lenient));
    }

    #[test]
    fn test_missing_bonus_never_strict_match() {
        let history = vec![draw(&[1, 2, 3, 4, 5], None)];
        let t = ticket(&[1, 2, 3, 4, 5], 3);
        assert!(!is_previous_draw(&t, &history, BonusPolicy::Strict));
        assert!(is_previous_draw(&t, &history, BonusPolicy::Lenient));
    }

    #[test]
    fn test_partial_overlap_is_not_a_match() {
        let history = vec![draw(&[1, 2, 3, 4, 5, 6], Some(7)), draw(&[10, 11, 12, 13, 14, 15], Some(1))];
        let t = ticket(&[1, 2, 3, 4, 5, 7], 7);
        assert!(!is_previous_draw(&t, &history, BonusPolicy::Lenient));
    }

    #[test]
    fn test_policy_per_game() {
        assert_eq!(BonusPolicy::for_game(Game::NzLotto), BonusPolicy::Lenient);
        assert_eq!(BonusPolicy::for_game(Game::MegaMillions), BonusPolicy::Strict);
    }
}
