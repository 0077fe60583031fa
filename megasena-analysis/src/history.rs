use std::collections::BTreeSet;

use megasena_db::models::Draw;

use crate::error::{AnalysisError, AnalysisResult};

/// Histórico imutável, ordenado por número de concurso crescente.
#[derive(Debug, Clone, PartialEq)]
pub struct History {
    draws: Vec<Draw>,
}

impl History {
    /// Ordena por concurso; rejeita histórico vazio e concursos repetidos.
    pub fn new(mut draws: Vec<Draw>) -> AnalysisResult<Self> {
        if draws.is_empty() {
            return Err(AnalysisError::InvalidInput("histórico vazio".to_string()));
        }
        draws.sort_by_key(|d| d.contest);
        if let Some(pair) = draws.windows(2).find(|w| w[0].contest == w[1].contest) {
            return Err(AnalysisError::InvalidInput(format!(
                "concurso {} repetido no histórico",
                pair[0].contest
            )));
        }
        Ok(Self { draws })
    }

    pub fn draws(&self) -> &[Draw] {
        &self.draws
    }

    pub fn len(&self) -> usize {
        self.draws.len()
    }

    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }

    pub fn latest(&self) -> &Draw {
        // nunca vazio, garantido por `new`
        &self.draws[self.draws.len() - 1]
    }

    pub fn years(&self) -> BTreeSet<i32> {
        self.draws.iter().map(|d| d.year()).collect()
    }

    /// Os `n` últimos concursos (todos se `n` >= len).
    pub fn tail(&self, n: usize) -> History {
        let start = self.draws.len().saturating_sub(n.max(1));
        History {
            draws: self.draws[start..].to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::make_test_draws;

    #[test]
    fn test_history_sorted_by_contest() {
        let mut draws = make_test_draws(5, 2024);
        draws.reverse();
        let history = History::new(draws).unwrap();
        let contests: Vec<u32> = history.draws().iter().map(|d| d.contest).collect();
        assert_eq!(contests, vec![1, 2, 3, 4, 5]);
        assert_eq!(history.latest().contest, 5);
    }

    #[test]
    fn test_history_empty_rejected() {
        assert!(matches!(History::new(vec![]), Err(AnalysisError::InvalidInput(_))));
    }

    #[test]
    fn test_history_duplicate_rejected() {
        let mut draws = make_test_draws(3, 2024);
        draws.push(draws[1].clone());
        assert!(matches!(History::new(draws), Err(AnalysisError::InvalidInput(_))));
    }

    #[test]
    fn test_history_tail_and_years() {
        let history = History::new(make_test_draws(250, 2022)).unwrap();
        assert_eq!(history.years().into_iter().collect::<Vec<_>>(), vec![2022, 2023, 2024]);

        let tail = history.tail(50);
        assert_eq!(tail.len(), 50);
        assert_eq!(tail.draws()[0].contest, 201);
        assert_eq!(tail.latest().contest, 250);

        assert_eq!(history.tail(1000).len(), 250);
    }
}
