pub mod checker;
pub mod config;
pub mod error;
pub mod generator;
pub mod history;
pub mod pairs;
pub mod snapshot;
pub mod stats;
pub mod weights;

use chrono::NaiveDate;
use megasena_db::models::Draw;

pub use checker::{check_against_draw, check_against_history, check_games, CheckResult, Tier};
pub use config::AnalysisConfig;
pub use error::{AnalysisError, AnalysisResult};
pub use generator::{generate_game, generate_games};
pub use history::History;
pub use snapshot::{Analysis, AnalysisSession, Coverage};
pub use stats::{compute_statistics, NumberStats, Statistics};
pub use weights::YearWeights;

/// Concursos sintéticos: 100 por ano a partir de `first_year`, contest 1..=n.
pub fn make_test_draws(n: usize, first_year: i32) -> Vec<Draw> {
    (0..n)
        .map(|i| {
            let base = ((i * 7) % 55) as u8;
            let year = first_year + (i / 100) as i32;
            let month = ((i % 100) / 9 + 1) as u32;
            let day = (i % 28 + 1) as u32;
            Draw {
                contest: i as u32 + 1,
                date: NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default(),
                numbers: [base + 1, base + 2, base + 3, base + 4, base + 5, base + 6],
            }
        })
        .collect()
}
