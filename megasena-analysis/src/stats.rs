use std::cmp::Ordering;

use megasena_db::models::POOL_SIZE;

use crate::history::History;
use crate::weights::YearWeights;

#[derive(Debug, Clone, PartialEq)]
pub struct NumberStats {
    pub number: u8,
    pub count: u32,
    pub weighted_count: f64,
    pub last_drawn_contest: Option<u32>,
    /// Concursos desde a última aparição (tamanho do histórico se nunca saiu).
    pub gap_since_last_drawn: u32,
    /// Indexado por `m - 1`.
    pub co_occurrence: Vec<u32>,
    pub weighted_co_occurrence: Vec<f64>,
}

impl NumberStats {
    fn empty(number: u8, history_len: u32) -> Self {
        Self {
            number,
            count: 0,
            weighted_count: 0.0,
            last_drawn_contest: None,
            gap_since_last_drawn: history_len,
            co_occurrence: vec![0; POOL_SIZE],
            weighted_co_occurrence: vec![0.0; POOL_SIZE],
        }
    }

    pub fn co_occurrence_with(&self, other: u8) -> u32 {
        index_of(other).map_or(0, |i| self.co_occurrence[i])
    }

    pub fn weighted_co_occurrence_with(&self, other: u8) -> f64 {
        index_of(other).map_or(0.0, |i| self.weighted_co_occurrence[i])
    }
}

fn index_of(number: u8) -> Option<usize> {
    let idx = (number as usize).checked_sub(1)?;
    (idx < POOL_SIZE).then_some(idx)
}

/// Estatísticas das 60 dezenas sobre um histórico.
#[derive(Debug, Clone, PartialEq)]
pub struct Statistics {
    numbers: Vec<NumberStats>,
    draw_count: usize,
}

/// Uma única passada pelo histórico, do concurso mais antigo ao mais recente.
///
/// O retardo é reescrito a cada aparição: no fim ele mede a distância entre
/// a última aparição da dezena e o fim do histórico.
pub fn compute_statistics(history: &History, weights: &YearWeights) -> Statistics {
    let len = history.len();
    let mut numbers: Vec<NumberStats> = (1..=POOL_SIZE as u8)
        .map(|n| NumberStats::empty(n, len as u32))
        .collect();

    for (position, draw) in history.draws().iter().enumerate() {
        let weight = weights.weight_for_year(draw.year());
        for &n in &draw.numbers {
            let Some(idx) = index_of(n) else { continue };
            let stat = &mut numbers[idx];
            stat.count += 1;
            stat.weighted_count += weight;
            stat.last_drawn_contest = Some(draw.contest);
            stat.gap_since_last_drawn = (len - position - 1) as u32;

            for &m in &draw.numbers {
                if m == n {
                    continue;
                }
                if let Some(other) = index_of(m) {
                    stat.co_occurrence[other] += 1;
                    stat.weighted_co_occurrence[other] += weight;
                }
            }
        }
    }

    log::debug!("Estatísticas calculadas sobre {} concursos", len);

    Statistics {
        numbers,
        draw_count: len,
    }
}

impl Statistics {
    pub fn get(&self, number: u8) -> Option<&NumberStats> {
        index_of(number).map(|i| &self.numbers[i])
    }

    pub fn numbers(&self) -> &[NumberStats] {
        &self.numbers
    }

    pub fn draw_count(&self) -> usize {
        self.draw_count
    }

    pub fn total_count(&self) -> u32 {
        self.numbers.iter().map(|s| s.count).sum()
    }

    /// Dezenas por frequência ponderada decrescente (empate: menor dezena primeiro).
    pub fn hot_numbers(&self, limit: usize) -> Vec<u8> {
        let mut sorted: Vec<&NumberStats> = self.numbers.iter().collect();
        sorted.sort_by(|a, b| {
            b.weighted_count
                .partial_cmp(&a.weighted_count)
                .unwrap_or(Ordering::Equal)
                .then(a.number.cmp(&b.number))
        });
        sorted.iter().take(limit).map(|s| s.number).collect()
    }

    /// Dezenas por retardo decrescente (empate: menor dezena primeiro).
    pub fn cold_numbers(&self, limit: usize) -> Vec<u8> {
        self.most_delayed(limit).into_iter().map(|(n, _)| n).collect()
    }

    pub fn most_delayed(&self, limit: usize) -> Vec<(u8, u32)> {
        let mut delays: Vec<(u8, u32)> = self
            .numbers
            .iter()
            .map(|s| (s.number, s.gap_since_last_drawn))
            .collect();
        delays.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        delays.truncate(limit);
        delays
    }
}
