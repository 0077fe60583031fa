use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, AnalysisResult};
use crate::history::History;

/// Tabela offset de ano → peso `exp(-k × offset)`, offset 0 = ano corrente.
#[derive(Debug, Clone, PartialEq)]
pub struct YearWeights {
    current_year: i32,
    weights: Vec<f64>,
    floor: f64,
}

impl YearWeights {
    pub fn compute<I>(years: I, current_year: i32, config: &AnalysisConfig) -> AnalysisResult<Self>
    where
        I: IntoIterator<Item = i32>,
    {
        let oldest = years.into_iter().min().ok_or_else(|| {
            AnalysisError::InvalidInput("nenhum ano para calcular os pesos".to_string())
        })?;

        // Histórico inteiramente no futuro: só o offset 0.
        let max_offset = (current_year - oldest).max(0) as usize;

        let weights = (0..=max_offset)
            .map(|offset| (-config.decay * offset as f64).exp())
            .collect();

        Ok(Self {
            current_year,
            weights,
            floor: config.floor_weight,
        })
    }

    pub fn for_history(history: &History, current_year: i32, config: &AnalysisConfig) -> AnalysisResult<Self> {
        Self::compute(history.years(), current_year, config)
    }

    pub fn current_year(&self) -> i32 {
        self.current_year
    }

    pub fn max_offset(&self) -> usize {
        self.weights.len() - 1
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Offsets fora da tabela (negativos ou além do ano mais antigo) caem no piso.
    pub fn weight(&self, offset: i64) -> f64 {
        usize::try_from(offset)
            .ok()
            .and_then(|o| self.weights.get(o).copied())
            .unwrap_or(self.floor)
    }

    pub fn weight_for_year(&self, year: i32) -> f64 {
        self.weight(i64::from(self.current_year) - i64::from(year))
    }
}
