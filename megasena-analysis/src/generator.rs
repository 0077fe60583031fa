use chrono::Utc;
use rand::Rng;

use megasena_db::models::{Game, GameOrigin, POOL_SIZE};

use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, AnalysisResult};
use crate::stats::Statistics;

/// Pool quente (frequência ponderada) ∪ pool frio (retardo), sem repetição.
/// A ordem é a da primeira aparição: quentes primeiro, depois frios.
pub fn candidate_pool(stats: &Statistics, config: &AnalysisConfig) -> Vec<u8> {
    let mut pool = stats.hot_numbers(config.hot_pool_size);
    for n in stats.cold_numbers(config.cold_pool_size) {
        if !pool.contains(&n) {
            pool.push(n);
        }
    }
    pool
}

fn check_size(size: usize, config: &AnalysisConfig) -> AnalysisResult<()> {
    config.validate()?;
    if size < config.min_game_size || size > config.max_game_size {
        return Err(AnalysisError::InvalidInput(format!(
            "tamanho do jogo {} fora de [{}, {}]",
            size, config.min_game_size, config.max_game_size
        )));
    }
    Ok(())
}

fn check_count(count: usize, config: &AnalysisConfig) -> AnalysisResult<()> {
    if count < 1 || count > config.max_games {
        return Err(AnalysisError::InvalidInput(format!(
            "quantidade de jogos {} fora de [1, {}]",
            count, config.max_games
        )));
    }
    Ok(())
}

/// Sorteia `size` dezenas do pool quente/frio, completa com dezenas
/// uniformes de 1 a 60 se o pool se esgotar, e devolve em ordem crescente.
pub fn generate_game<R: Rng + ?Sized>(
    stats: &Statistics,
    size: usize,
    config: &AnalysisConfig,
    rng: &mut R,
) -> AnalysisResult<Vec<u8>> {
    check_size(size, config)?;

    let mut pool = candidate_pool(stats, config);
    let mut selected = Vec::with_capacity(size);

    while selected.len() < size && !pool.is_empty() {
        let idx = rng.random_range(0..pool.len());
        selected.push(pool.swap_remove(idx));
    }

    if selected.len() < size {
        log::debug!("Pool esgotado com {} dezenas, completando ao acaso", selected.len());
    }
    while selected.len() < size {
        let n = rng.random_range(1..=POOL_SIZE as u8);
        if !selected.contains(&n) {
            selected.push(n);
        }
    }

    selected.sort();
    Ok(selected)
}

/// Cada jogo é sorteado de forma independente: dois jogos do mesmo lote
/// podem coincidir.
pub fn generate_games<R: Rng + ?Sized>(
    stats: &Statistics,
    count: usize,
    size: usize,
    config: &AnalysisConfig,
    rng: &mut R,
) -> AnalysisResult<Vec<Game>> {
    check_count(count, config)?;
    check_size(size, config)?;

    let created_at = Utc::now();
    let mut games = Vec::with_capacity(count);
    for seq in 0..count {
        let numbers = generate_game(stats, size, config, rng)?;
        let game = Game::new(&numbers, GameOrigin::Generated, created_at, seq)
            .map_err(|e| AnalysisError::InvalidInput(e.to_string()))?;
        games.push(game);
    }

    log::info!("{} jogo(s) de {} dezenas gerado(s)", count, size);
    Ok(games)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::history::History;
    use crate::make_test_draws;
    use crate::stats::compute_statistics;
    use crate::weights::YearWeights;

    fn test_stats() -> Statistics {
        let history = History::new(make_test_draws(300, 2022)).unwrap();
        let weights = YearWeights::for_history(&history, 2024, &AnalysisConfig::default()).unwrap();
        compute_statistics(&history, &weights)
    }

    fn assert_valid_game(numbers: &[u8], size: usize) {
        assert_eq!(numbers.len(), size);
        for pair in numbers.windows(2) {
            assert!(pair[0] < pair[1], "não crescente ou repetido: {:?}", numbers);
        }
        assert!(numbers.iter().all(|&n| (1..=60).contains(&n)), "{:?}", numbers);
    }

    #[test]
    fn test_candidate_pool_bounds() {
        let stats = test_stats();
        let config = AnalysisConfig::default();
        let pool = candidate_pool(&stats, &config);
        assert!(pool.len() >= 20 && pool.len() <= 40, "len = {}", pool.len());

        let mut dedup = pool.clone();
        dedup.sort();
        dedup.dedup();
        assert_eq!(dedup.len(), pool.len());

        for n in stats.hot_numbers(20).into_iter().chain(stats.cold_numbers(20)) {
            assert!(pool.contains(&n));
        }
    }

    #[test]
    fn test_generated_numbers_come_from_pool() {
        let stats = test_stats();
        let config = AnalysisConfig::default();
        let pool = candidate_pool(&stats, &config);
        let mut rng = StdRng::seed_from_u64(42);
        for size in 6..=15 {
            let game = generate_game(&stats, size, &config, &mut rng).unwrap();
            assert_valid_game(&game, size);
            assert!(game.iter().all(|n| pool.contains(n)), "{:?}", game);
        }
    }

    #[test]
    fn test_same_seed_same_game() {
        let stats = test_stats();
        let config = AnalysisConfig::default();
        let a = generate_game(&stats, 10, &config, &mut StdRng::seed_from_u64(7)).unwrap();
        let b = generate_game(&stats, 10, &config, &mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_exhausted_pool_is_topped_up() {
        let stats = test_stats();
        let config = AnalysisConfig {
            hot_pool_size: 2,
            cold_pool_size: 1,
            ..Default::default()
        };
        let pool = candidate_pool(&stats, &config);
        assert!(pool.len() <= 3);

        let mut rng = StdRng::seed_from_u64(1);
        let game = generate_game(&stats, 15, &config, &mut rng).unwrap();
        assert_valid_game(&game, 15);
        for n in &pool {
            assert!(game.contains(n));
        }
    }

    #[test]
    fn test_size_below_minimum_rejected() {
        let stats = test_stats();
        let mut rng = StdRng::seed_from_u64(0);
        let result = generate_game(&stats, 5, &AnalysisConfig::default(), &mut rng);
        assert!(matches!(result, Err(AnalysisError::InvalidInput(_))));

        let result = generate_game(&stats, 16, &AnalysisConfig::default(), &mut rng);
        assert!(matches!(result, Err(AnalysisError::InvalidInput(_))));
    }

    #[test]
    fn test_size_above_pool_rejected() {
        let stats = test_stats();
        let config = AnalysisConfig {
            max_game_size: 61,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(1);
        let result = generate_game(&stats, 61, &config, &mut rng);
        assert!(matches!(result, Err(AnalysisError::InvalidInput(_))));
    }

    #[test]
    fn test_generate_games_count() {
        let stats = test_stats();
        let config = AnalysisConfig::default();
        let mut rng = StdRng::seed_from_u64(2024);
        for count in [1, 7, 20] {
            let games = generate_games(&stats, count, 8, &config, &mut rng).unwrap();
            assert_eq!(games.len(), count);
            for game in &games {
                assert_eq!(game.origin, GameOrigin::Generated);
                assert_valid_game(&game.numbers, 8);
            }
            let mut ids: Vec<&str> = games.iter().map(|g| g.id.as_str()).collect();
            ids.sort();
            ids.dedup();
            assert_eq!(ids.len(), count);
        }
    }

    #[test]
    fn test_generate_games_count_bounds() {
        let stats = test_stats();
        let config = AnalysisConfig::default();
        let mut rng = StdRng::seed_from_u64(3);
        assert!(matches!(
            generate_games(&stats, 0, 6, &config, &mut rng),
            Err(AnalysisError::InvalidInput(_))
        ));
        assert!(matches!(
            generate_games(&stats, 21, 6, &config, &mut rng),
            Err(AnalysisError::InvalidInput(_))
        ));
        assert!(matches!(
            generate_games(&stats, 3, 5, &config, &mut rng),
            Err(AnalysisError::InvalidInput(_))
        ));
    }
}
