use megasena_db::models::{Draw, Game};

use crate::error::{AnalysisError, AnalysisResult};
use crate::history::History;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    Sena,
    Quina,
    Quadra,
    NoPrize,
}

impl Tier {
    pub fn from_hits(hits: usize) -> Self {
        match hits {
            6 => Tier::Sena,
            5 => Tier::Quina,
            4 => Tier::Quadra,
            _ => Tier::NoPrize,
        }
    }

    pub fn is_prize(&self) -> bool {
        *self != Tier::NoPrize
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tier::Sena => write!(f, "SENA"),
            Tier::Quina => write!(f, "QUINA"),
            Tier::Quadra => write!(f, "QUADRA"),
            Tier::NoPrize => write!(f, "-"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckResult {
    pub game_index: usize,
    pub game_id: String,
    pub hits: usize,
    pub matched: Vec<u8>,
    pub tier: Tier,
}

pub fn check_game(game_index: usize, game: &Game, draw: &Draw) -> CheckResult {
    let matched: Vec<u8> = game
        .numbers
        .iter()
        .copied()
        .filter(|&n| draw.contains(n))
        .collect();
    let hits = matched.len();
    CheckResult {
        game_index,
        game_id: game.id.clone(),
        hits,
        matched,
        tier: Tier::from_hits(hits),
    }
}

pub fn check_against_draw(games: &[Game], draw: &Draw) -> Vec<CheckResult> {
    games
        .iter()
        .enumerate()
        .map(|(i, game)| check_game(i, game, draw))
        .collect()
}

pub fn check_games(games: &[Game], latest: Option<&Draw>) -> AnalysisResult<Vec<CheckResult>> {
    let latest = latest.ok_or(AnalysisError::NoDataAvailable)?;
    Ok(check_against_draw(games, latest))
}

/// Confere os jogos contra o concurso mais recente do histórico.
pub fn check_against_history(games: &[Game], history: Option<&History>) -> AnalysisResult<Vec<CheckResult>> {
    check_games(games, history.map(History::latest))
}
