mod display;
mod import;
mod provider;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{Datelike, Utc};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;

use megasena_analysis::pairs::{bottom_pairs, top_pairs, top_weighted_pairs};
use megasena_analysis::{
    check_against_history, Analysis, AnalysisConfig, AnalysisError, AnalysisSession, CheckResult,
    History,
};
use megasena_db::db::{count_draws, db_path, fetch_last_draws, migrate, open_db};
use megasena_db::models::{Draw, Game, GameOrigin};
use megasena_db::rusqlite::Connection;
use megasena_db::store::{SavedGameStore, SqliteGameStore};

use crate::display::{
    display_check_results, display_delayed, display_draws, display_games, display_import_summary,
    display_overview, display_pairs, display_stats, display_weights,
};
use crate::provider::{CsvProvider, ProviderChain, SqliteProvider};

#[derive(Parser)]
#[command(name = "megasena", about = "Analisador estatístico da Mega-Sena")]
struct Cli {
    /// Arquivo JSON com os parâmetros da análise
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// CSV usado como fonte alternativa se a base local estiver vazia
    #[arg(long, global = true)]
    csv: Option<PathBuf>,

    /// Ano de referência dos pesos (padrão: ano corrente)
    #[arg(long, global = true)]
    year: Option<i32>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Importar concursos de um arquivo CSV
    Import {
        /// Caminho do arquivo CSV (concurso;data;d1..d6)
        #[arg(short, long, default_value = "assets/mega_sena.csv")]
        file: PathBuf,
    },

    /// Mostrar o caminho da base de dados
    DbPath,

    /// Listar os últimos concursos
    List {
        #[arg(short, long, default_value = "10")]
        last: u32,
    },

    /// Estatísticas: frequência ponderada, atrasos e pesos por ano
    Stats {
        /// Quantidade de dezenas exibidas
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Pares mais e menos frequentes
    Pairs {
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Gerar jogos sugeridos (pool quente + frio)
    Generate {
        /// Quantidade de jogos (1-20)
        #[arg(short, long, default_value = "4")]
        count: usize,

        /// Dezenas por jogo (6-15)
        #[arg(short, long, default_value = "6")]
        size: usize,

        /// Seed para reprodutibilidade
        #[arg(long)]
        seed: Option<u64>,

        /// Salvar os jogos gerados
        #[arg(long)]
        save: bool,
    },

    /// Salvar um jogo manual
    AddGame {
        /// 6 a 15 dezenas
        numbers: Vec<u8>,
    },

    /// Listar os jogos salvos
    Games,

    /// Remover um jogo salvo
    RemoveGame {
        id: String,
    },

    /// Conferir os jogos salvos com o último concurso
    Check,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let path = db_path();
    let conn = open_db(&path)?;
    migrate(&conn)?;

    let config = load_config(cli.config.as_deref())?;
    let year = cli.year.unwrap_or_else(|| chrono::Local::now().year());
    let csv = cli.csv.as_deref();

    match cli.command {
        Command::Import { file } => cmd_import(&conn, &file),
        Command::DbPath => {
            println!("{}", path.display());
            Ok(())
        }
        Command::List { last } => cmd_list(&conn, last),
        Command::Stats { limit } => cmd_stats(&conn, csv, config, year, limit),
        Command::Pairs { limit } => cmd_pairs(&conn, csv, config, year, limit),
        Command::Generate { count, size, seed, save } => {
            cmd_generate(&conn, csv, config, year, count, size, seed, save)
        }
        Command::AddGame { numbers } => cmd_add_game(&conn, &numbers),
        Command::Games => cmd_games(&conn),
        Command::RemoveGame { id } => cmd_remove_game(&conn, &id),
        Command::Check => cmd_check(&conn, csv),
    }
}

fn load_config(path: Option<&Path>) -> Result<AnalysisConfig> {
    let Some(path) = path else {
        return Ok(AnalysisConfig::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Não foi possível ler {:?}", path))?;
    let config: AnalysisConfig = serde_json::from_str(&json)
        .with_context(|| format!("Configuração inválida em {:?}", path))?;
    config.validate()?;
    log::info!("Configuração carregada de {:?}", path);
    Ok(config)
}

fn provider_chain<'a>(conn: &'a Connection, csv: Option<&Path>) -> ProviderChain<'a> {
    let chain = ProviderChain::new().with(SqliteProvider::new(conn));
    match csv {
        Some(path) => chain.with(CsvProvider::new(path.to_path_buf())),
        None => chain,
    }
}

fn load_session(
    conn: &Connection,
    csv: Option<&Path>,
    config: AnalysisConfig,
    year: i32,
) -> Result<(String, AnalysisSession, Arc<Analysis>)> {
    let (source, draws) = provider_chain(conn, csv).load()?;
    let mut session = AnalysisSession::new(config);
    let analysis = session.reload(draws, year)?;
    Ok((source, session, analysis))
}

fn cmd_import(conn: &Connection, file: &Path) -> Result<()> {
    let result = import::import_csv(conn, file)?;
    display_import_summary(&result);
    Ok(())
}

fn cmd_list(conn: &Connection, last: u32) -> Result<()> {
    let n = count_draws(conn)?;
    if n == 0 {
        println!("Base vazia. Rode primeiro: megasena import");
        return Ok(());
    }
    let draws = fetch_last_draws(conn, last)?;
    display_draws(&draws);
    Ok(())
}

fn cmd_stats(conn: &Connection, csv: Option<&Path>, config: AnalysisConfig, year: i32, limit: usize) -> Result<()> {
    let (source, _, analysis) = load_session(conn, csv, config, year)?;
    display_overview(&analysis, &source);
    display_stats(&analysis, limit);
    display_delayed(&analysis.stats().most_delayed(10));
    display_weights(analysis.weights());
    Ok(())
}

fn cmd_pairs(conn: &Connection, csv: Option<&Path>, config: AnalysisConfig, year: i32, limit: usize) -> Result<()> {
    let (source, _, analysis) = load_session(conn, csv, config, year)?;
    display_overview(&analysis, &source);
    display_pairs("Pares mais frequentes", &top_pairs(analysis.stats(), limit));
    display_pairs("Pares menos frequentes", &bottom_pairs(analysis.stats(), limit));
    display_pairs("Pares mais frequentes (ponderado)", &top_weighted_pairs(analysis.stats(), limit));
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_generate(
    conn: &Connection,
    csv: Option<&Path>,
    config: AnalysisConfig,
    year: i32,
    count: usize,
    size: usize,
    seed: Option<u64>,
    save: bool,
) -> Result<()> {
    let (source, session, analysis) = load_session(conn, csv, config, year)?;
    display_overview(&analysis, &source);

    let mut rng: StdRng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_rng(&mut rand::rng()),
    };
    let games = session.generate(count, size, &mut rng)?;

    println!("\n🎲 Jogos sugeridos\n");
    display_games(&games);

    if save {
        let all = SqliteGameStore::new(conn).append(&games)?;
        println!("{} jogo(s) salvo(s), {} no total.", games.len(), all.len());
    }
    Ok(())
}

fn cmd_add_game(conn: &Connection, numbers: &[u8]) -> Result<()> {
    let game = Game::new(numbers, GameOrigin::Manual, Utc::now(), 0)?;
    let all = SqliteGameStore::new(conn).append(std::slice::from_ref(&game))?;
    println!("Jogo {} salvo ({} no total).", game.id, all.len());
    Ok(())
}

fn cmd_games(conn: &Connection) -> Result<()> {
    let games = SqliteGameStore::new(conn).load()?;
    display_games(&games);
    Ok(())
}

fn cmd_remove_game(conn: &Connection, id: &str) -> Result<()> {
    if SqliteGameStore::new(conn).remove(id)? {
        println!("Jogo {} removido.", id);
    } else {
        println!("Nenhum jogo com id {}.", id);
    }
    Ok(())
}

fn cmd_check(conn: &Connection, csv: Option<&Path>) -> Result<()> {
    let games = SqliteGameStore::new(conn).load()?;
    if games.is_empty() {
        println!("Nenhum jogo salvo para conferir.");
        return Ok(());
    }

    let (latest, results) = check_loaded(&games, provider_chain(conn, csv).load())?;
    display_check_results(&latest, &games, &results);
    Ok(())
}

/// Sem histórico, o erro da conferência carrega o motivo de cada fonte.
fn check_loaded(games: &[Game], loaded: Result<(String, Vec<Draw>)>) -> Result<(Draw, Vec<CheckResult>)> {
    let history = match loaded {
        Ok((_, draws)) => History::new(draws)?,
        Err(cause) => return Err(cause.context(AnalysisError::NoDataAvailable)),
    };
    let results = check_against_history(games, Some(&history))?;
    Ok((history.latest().clone(), results))
}
