use serde::{Deserialize, Serialize};

use megasena_db::models::{GAME_SIZE_MAX, GAME_SIZE_MIN};

use crate::error::{AnalysisError, AnalysisResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Constante k de `exp(-k × offset)`.
    pub decay: f64,
    /// Peso usado para um ano ausente da tabela.
    pub floor_weight: f64,
    pub hot_pool_size: usize,
    pub cold_pool_size: usize,
    /// Concursos analisados quando o ano corrente não tem nenhum sorteio.
    pub degraded_window: usize,
    pub min_game_size: usize,
    pub max_game_size: usize,
    pub max_games: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            decay: 0.15,
            floor_weight: 0.1,
            hot_pool_size: 20,
            cold_pool_size: 20,
            degraded_window: 50,
            min_game_size: GAME_SIZE_MIN,
            max_game_size: GAME_SIZE_MAX,
            max_games: 20,
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> AnalysisResult<()> {
        if !self.decay.is_finite() || self.decay < 0.0 {
            return Err(AnalysisError::InvalidInput(format!(
                "decay deve ser >= 0 (recebido: {})",
                self.decay
            )));
        }
        if !(self.floor_weight > 0.0 && self.floor_weight <= 1.0) {
            return Err(AnalysisError::InvalidInput(format!(
                "floor_weight deve estar em (0, 1] (recebido: {})",
                self.floor_weight
            )));
        }
        if self.min_game_size < GAME_SIZE_MIN
            || self.max_game_size > GAME_SIZE_MAX
            || self.min_game_size > self.max_game_size
        {
            return Err(AnalysisError::InvalidInput(format!(
                "tamanho de jogo deve ficar em [{}, {}]",
                GAME_SIZE_MIN, GAME_SIZE_MAX
            )));
        }
        if self.max_games == 0 || self.degraded_window == 0 {
            return Err(AnalysisError::InvalidInput(
                "max_games e degraded_window devem ser positivos".to_string(),
            ));
        }
        Ok(())
    }
}
