use std::path::PathBuf;

use anyhow::{bail, Result};
use megasena_db::db::fetch_all_draws;
use megasena_db::models::Draw;
use megasena_db::rusqlite::Connection;

use crate::import::read_draws_csv;

/// Uma fonte de histórico de concursos.
pub trait HistoryProvider {
    fn name(&self) -> &str;
    fn fetch(&self) -> Result<Vec<Draw>>;
}

pub struct SqliteProvider<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteProvider<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl HistoryProvider for SqliteProvider<'_> {
    fn name(&self) -> &str {
        "base local"
    }

    fn fetch(&self) -> Result<Vec<Draw>> {
        let draws = fetch_all_draws(self.conn)?;
        if draws.is_empty() {
            bail!("Base vazia. Rode primeiro: megasena import");
        }
        Ok(draws)
    }
}

pub struct CsvProvider {
    path: PathBuf,
    label: String,
}

impl CsvProvider {
    pub fn new(path: PathBuf) -> Self {
        let label = format!("CSV {}", path.display());
        Self { path, label }
    }
}

impl HistoryProvider for CsvProvider {
    fn name(&self) -> &str {
        &self.label
    }

    fn fetch(&self) -> Result<Vec<Draw>> {
        let result = read_draws_csv(&self.path)?;
        if result.draws.is_empty() {
            bail!("Nenhum concurso válido em {:?}", self.path);
        }
        if result.errors > 0 {
            log::warn!("{}: {} linha(s) descartada(s)", self.name(), result.errors);
        }
        Ok(result.draws)
    }
}

/// Fontes avaliadas em ordem de prioridade: a primeira que responde vence.
#[derive(Default)]
pub struct ProviderChain<'a> {
    providers: Vec<Box<dyn HistoryProvider + 'a>>,
}

impl<'a> ProviderChain<'a> {
    pub fn new() -> Self {
        Self { providers: Vec::new() }
    }

    pub fn with(mut self, provider: impl HistoryProvider + 'a) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    /// Retorna o nome da fonte usada e os concursos.
    pub fn load(&self) -> Result<(String, Vec<Draw>)> {
        let mut failures = Vec::with_capacity(self.providers.len());
        for provider in &self.providers {
            match provider.fetch() {
                Ok(draws) => {
                    log::info!("{} concursos carregados de {}", draws.len(), provider.name());
                    return Ok((provider.name().to_string(), draws));
                }
                Err(e) => {
                    log::warn!("Fonte {} indisponível: {:#}", provider.name(), e);
                    failures.push(format!("  - {}: {:#}", provider.name(), e));
                }
            }
        }
        if failures.is_empty() {
            bail!("Nenhuma fonte de dados configurada");
        }
        bail!("Nenhuma fonte de dados disponível:\n{}", failures.join("\n"))
    }
}
