use std::sync::Arc;

use rand::Rng;

use megasena_db::models::{Draw, Game};

use crate::checker::{check_against_draw, CheckResult};
use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, AnalysisResult};
use crate::generator::generate_games;
use crate::history::History;
use crate::stats::{compute_statistics, Statistics};
use crate::weights::YearWeights;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coverage {
    Full,
    /// Nenhum concurso no ano corrente: só os `window` últimos foram agregados.
    Degraded { window: usize },
}

/// Histórico → pesos → estatísticas, construídos juntos e nunca alterados.
#[derive(Debug, Clone)]
pub struct Analysis {
    history: History,
    weights: YearWeights,
    stats: Statistics,
    coverage: Coverage,
}

impl Analysis {
    pub fn build(history: History, current_year: i32, config: &AnalysisConfig) -> AnalysisResult<Self> {
        config.validate()?;
        let weights = YearWeights::for_history(&history, current_year, config)?;

        let has_current_year = history.draws().iter().any(|d| d.year() == current_year);
        let (stats, coverage) = if has_current_year {
            (compute_statistics(&history, &weights), Coverage::Full)
        } else {
            let window = config.degraded_window.min(history.len());
            log::warn!(
                "Nenhum concurso em {}: análise restrita aos {} últimos concursos",
                current_year,
                window
            );
            let recent = history.tail(window);
            (compute_statistics(&recent, &weights), Coverage::Degraded { window })
        };

        log::info!(
            "Análise pronta: {} concursos (último: {}), ano de referência {}",
            history.len(),
            history.latest().contest,
            current_year
        );

        Ok(Self {
            history,
            weights,
            stats,
            coverage,
        })
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn weights(&self) -> &YearWeights {
        &self.weights
    }

    pub fn stats(&self) -> &Statistics {
        &self.stats
    }

    pub fn coverage(&self) -> Coverage {
        self.coverage
    }

    pub fn latest_draw(&self) -> &Draw {
        self.history.latest()
    }
}

/// Sessão da aplicação: guarda o snapshot corrente.
///
/// `reload` constrói o novo snapshot por inteiro antes de trocá-lo; uma
/// carga que falha mantém o anterior.
pub struct AnalysisSession {
    config: AnalysisConfig,
    current: Option<Arc<Analysis>>,
}

impl AnalysisSession {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config, current: None }
    }

    pub fn reload(&mut self, draws: Vec<Draw>, current_year: i32) -> AnalysisResult<Arc<Analysis>> {
        let history = History::new(draws)?;
        let analysis = Arc::new(Analysis::build(history, current_year, &self.config)?);
        self.current = Some(Arc::clone(&analysis));
        Ok(analysis)
    }

    pub fn current(&self) -> AnalysisResult<Arc<Analysis>> {
        self.current.clone().ok_or(AnalysisError::NoDataAvailable)
    }

    pub fn generate<R: Rng + ?Sized>(&self, count: usize, size: usize, rng: &mut R) -> AnalysisResult<Vec<Game>> {
        let analysis = self.current()?;
        generate_games(analysis.stats(), count, size, &self.config, rng)
    }

    pub fn check(&self, games: &[Game]) -> AnalysisResult<Vec<CheckResult>> {
        let analysis = self.current()?;
        Ok(check_against_draw(games, analysis.latest_draw()))
    }
}
