use std::cmp::Ordering;

use megasena_db::models::POOL_SIZE;

use crate::stats::Statistics;

#[derive(Debug, Clone, PartialEq)]
pub struct PairFrequency {
    pub pair: (u8, u8),
    pub count: u32,
    pub weighted: f64,
}

/// Os 1770 pares não ordenados (a < b).
pub fn all_pairs(stats: &Statistics) -> Vec<PairFrequency> {
    let mut pairs = Vec::with_capacity(POOL_SIZE * (POOL_SIZE - 1) / 2);
    for stat in stats.numbers() {
        for other in (stat.number + 1)..=POOL_SIZE as u8 {
            pairs.push(PairFrequency {
                pair: (stat.number, other),
                count: stat.co_occurrence_with(other),
                weighted: stat.weighted_co_occurrence_with(other),
            });
        }
    }
    pairs
}

pub fn top_pairs(stats: &Statistics, limit: usize) -> Vec<PairFrequency> {
    let mut pairs = all_pairs(stats);
    pairs.sort_by(|a, b| b.count.cmp(&a.count).then(a.pair.cmp(&b.pair)));
    pairs.truncate(limit);
    pairs
}

pub fn bottom_pairs(stats: &Statistics, limit: usize) -> Vec<PairFrequency> {
    let mut pairs = all_pairs(stats);
    pairs.sort_by(|a, b| a.count.cmp(&b.count).then(a.pair.cmp(&b.pair)));
    pairs.truncate(limit);
    pairs
}

pub fn top_weighted_pairs(stats: &Statistics, limit: usize) -> Vec<PairFrequency> {
    let mut pairs = all_pairs(stats);
    pairs.sort_by(|a, b| {
        b.weighted
            .partial_cmp(&a.weighted)
            .unwrap_or(Ordering::Equal)
            .then(a.pair.cmp(&b.pair))
    });
    pairs.truncate(limit);
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use megasena_db::models::Draw;

    use crate::config::AnalysisConfig;
    use crate::history::History;
    use crate::stats::compute_statistics;
    use crate::weights::YearWeights;

    fn stats_for(rows: &[(u32, i32, [u8; 6])]) -> Statistics {
        let draws = rows
            .iter()
            .map(|&(contest, year, numbers)| Draw {
                contest,
                date: NaiveDate::from_ymd_opt(year, 3, 10).unwrap(),
                numbers,
            })
            .collect();
        let history = History::new(draws).unwrap();
        let weights = YearWeights::for_history(&history, 2024, &AnalysisConfig::default()).unwrap();
        compute_statistics(&history, &weights)
    }

    #[test]
    fn test_all_pairs_count() {
        let stats = stats_for(&[(1, 2024, [1, 2, 3, 4, 5, 6])]);
        let pairs = all_pairs(&stats);
        assert_eq!(pairs.len(), 1770);
        // 15 pares por concurso
        assert_eq!(pairs.iter().map(|p| p.count).sum::<u32>(), 15);
    }

    #[test]
    fn test_top_pairs() {
        let stats = stats_for(&[
            (1, 2024, [1, 2, 3, 4, 5, 6]),
            (2, 2024, [1, 2, 13, 14, 15, 16]),
            (3, 2024, [1, 2, 23, 24, 25, 26]),
            (4, 2024, [3, 4, 33, 34, 35, 36]),
        ]);
        let top = top_pairs(&stats, 2);
        assert_eq!(top[0].pair, (1, 2));
        assert_eq!(top[0].count, 3);
        assert_eq!(top[1].pair, (3, 4));
        assert_eq!(top[1].count, 2);
    }

    #[test]
    fn test_bottom_pairs_zero_first() {
        let stats = stats_for(&[(1, 2024, [1, 2, 3, 4, 5, 6])]);
        let bottom = bottom_pairs(&stats, 3);
        assert_eq!(bottom[0].pair, (1, 7));
        assert!(bottom.iter().all(|p| p.count == 0));
    }

    #[test]
    fn test_top_weighted_pairs_prefer_recent() {
        let stats = stats_for(&[
            (1, 2010, [1, 2, 3, 4, 5, 6]),
            (2, 2010, [1, 2, 13, 14, 15, 16]),
            (3, 2024, [50, 51, 52, 53, 54, 55]),
        ]);
        let top = top_weighted_pairs(&stats, 1);
        assert_eq!(top[0].pair, (50, 51));
        assert!((top[0].weighted - 1.0).abs() < 1e-10);
    }
}
