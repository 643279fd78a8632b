use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, warn};

use lottogen_db::models::{validate_draw, Draw, Game};

pub const NZ_LOTTO_URL: &str = "http://www.lottoshop.co.nz/my-lotto-results-nz";
pub const MEGA_MILLIONS_URL: &str = "https://www.megamillions.com/Winning-Numbers/Previous-Drawings.aspx";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Source des tirages passés, interrogée une fois par exécution.
pub trait HistoryProvider {
    fn name(&self) -> &str;
    fn fetch(&self) -> Result<Vec<Draw>>;
}

/// Page de résultats publique d'un jeu.
pub struct WebHistory {
    game: Game,
    url: String,
}

impl WebHistory {
    pub fn new(game: Game, url: Option<String>) -> Self {
        let url = url.unwrap_or_else(|| default_url(game).to_string());
        Self { game, url }
    }
}

pub fn default_url(game: Game) -> &'static str {
    match game {
        Game::NzLotto => NZ_LOTTO_URL,
        Game::MegaMillions => MEGA_MILLIONS_URL,
    }
}

impl HistoryProvider for WebHistory {
    fn name(&self) -> &str {
        &self.url
    }

    fn fetch(&self) -> Result<Vec<Draw>> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Impossible de créer le client HTTP")?;
        let response = client
            .get(&self.url)
            .send()
            .with_context(|| format!("Requête vers {} échouée", self.url))?;

        let status = response.status();
        if !status.is_success() {
            bail!("{} a répondu {}", self.url, status);
        }

        let body = response.text().context("Réponse illisible")?;
        parse_results(self.game, &body)
    }
}

/// Un échec de récupération n'empêche jamais la génération : historique vide.
pub fn fetch_or_empty(provider: &dyn HistoryProvider) -> Vec<Draw> {
    match provider.fetch() {
        Ok(draws) => {
            info!(source = provider.name(), draws = draws.len(), "historique récupéré");
            draws
        }
        Err(e) => {
            warn!(source = provider.name(), "historique indisponible : {e:#}");
            Vec::new()
        }
    }
}

pub fn parse_results(game: Game, html: &str) -> Result<Vec<Draw>> {
    match game {
        Game::NzLotto => parse_nz_lotto(html),
        Game::MegaMillions => parse_mega_millions(html),
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("Sélecteur CSS invalide '{}' : {:?}", css, e))
}

/// Texte complet d'un élément, balises imbriquées comprises.
fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .replace('\u{a0}', " ")
        .trim()
        .to_string()
}

fn parse_numbers(text: &str) -> Vec<u8> {
    text.split(',')
        .filter_map(|s| s.trim().parse::<u8>().ok())
        .collect()
}

/// Chaque `<span>` « Lotto: a, b, ... » ouvre un tirage ; le « Powerball: n »
/// suivant complète le dernier tirage sans bonus. « Bonus: » est ignoré.
fn parse_nz_lotto(html: &str) -> Result<Vec<Draw>> {
    let game = Game::NzLotto;
    let document = Html::parse_document(html);
    let spans = selector("span")?;

    let mut draws: Vec<Draw> = Vec::new();

    for span in document.select(&spans) {
        let text = element_text(span);

        if let Some(pos) = text.find("Lotto:") {
            let numbers = parse_numbers(&text[pos + "Lotto:".len()..]);
            if numbers.is_empty() {
                continue;
            }
            if let Err(e) = validate_draw(game, &numbers, None) {
                debug!("tirage ignoré ({e}) : {numbers:?}");
                continue;
            }
            draws.push(Draw {
                draw_id: format!("web-{}", draws.len() + 1),
                date: String::new(),
                numbers,
                bonus: None,
            });
        } else if text.contains("Bonus:") {
            continue;
        } else if let Some(pos) = text.find("Powerball:") {
            let Ok(bonus) = text[pos + "Powerball:".len()..].trim().parse::<u8>() else {
                continue;
            };
            if let Some(last) = draws.last_mut().filter(|d| d.bonus.is_none()) {
                if validate_draw(game, &last.numbers, Some(bonus)).is_ok() {
                    last.bonus = Some(bonus);
                }
            }
        }
    }

    Ok(draws)
}

/// Lignes de la première `<table class="table">` (en-tête ignoré) :
/// date, `<span class="balls">` puis `<span class="megaball">`.
fn parse_mega_millions(html: &str) -> Result<Vec<Draw>> {
    let game = Game::MegaMillions;
    let document = Html::parse_document(html);
    let tables = selector("table.table")?;
    let rows = selector("tr")?;
    let cells = selector("td")?;
    let balls = selector("span.balls")?;
    let megaball = selector("span.megaball")?;

    let Some(table) = document.select(&tables).next() else {
        debug!("aucune table de résultats");
        return Ok(Vec::new());
    };

    let spans_in = |cell: ElementRef<'_>, spans: &Selector| -> Vec<u8> {
        cell.select(spans)
            .filter_map(|span| element_text(span).parse::<u8>().ok())
            .collect()
    };

    let mut draws = Vec::new();
    for (i, row) in table.select(&rows).skip(1).enumerate() {
        let row_cells: Vec<ElementRef<'_>> = row.select(&cells).collect();
        if row_cells.len() < 3 {
            continue;
        }

        let numbers = spans_in(row_cells[1], &balls);
        let bonus = spans_in(row_cells[2], &megaball).first().copied();
        if numbers.is_empty() {
            continue;
        }
        if let Err(e) = validate_draw(game, &numbers, bonus) {
            debug!("ligne {} ignorée : {e}", i + 1);
            continue;
        }

        draws.push(Draw {
            draw_id: format!("web-{}", i + 1),
            date: element_text(row_cells[0]),
            numbers,
            bonus,
        });
    }

    Ok(draws)
}
