use anyhow::{bail, Context, Result};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Quantidade de dezenas no volante (1-60).
pub const POOL_SIZE: usize = 60;
/// Dezenas sorteadas por concurso.
pub const PICK_COUNT: usize = 6;
/// Menor e maior aposta aceitas pela Mega-Sena.
pub const GAME_SIZE_MIN: usize = 6;
pub const GAME_SIZE_MAX: usize = 15;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draw {
    pub contest: u32,
    pub date: NaiveDate,
    pub numbers: [u8; PICK_COUNT],
}

impl Draw {
    pub fn new(contest: u32, date: NaiveDate, mut numbers: [u8; PICK_COUNT]) -> Result<Self> {
        if contest == 0 {
            bail!("Número de concurso inválido: 0");
        }
        validate_draw(&numbers)?;
        numbers.sort();
        Ok(Self { contest, date, numbers })
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    pub fn contains(&self, number: u8) -> bool {
        self.numbers.contains(&number)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameOrigin {
    Manual,
    Generated,
}

impl std::fmt::Display for GameOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameOrigin::Manual => write!(f, "manual"),
            GameOrigin::Generated => write!(f, "gerado"),
        }
    }
}

/// Jogo salvo. Serializado no formato `{id, numbers, type, date}`.
/// Toda leitura passa por `GameRecord`, então as dezenas são sempre válidas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GameRecord")]
pub struct Game {
    pub id: String,
    pub numbers: Vec<u8>,
    #[serde(rename = "type")]
    pub origin: GameOrigin,
    #[serde(rename = "date")]
    pub created_at: DateTime<Utc>,
}

impl Game {
    /// `seq` distingue jogos criados no mesmo milissegundo (lote gerado).
    pub fn new(numbers: &[u8], origin: GameOrigin, created_at: DateTime<Utc>, seq: usize) -> Result<Self> {
        validate_game_numbers(numbers)?;
        let mut numbers = numbers.to_vec();
        numbers.sort();
        Ok(Self {
            id: format!("{}-{:02}", created_at.timestamp_millis(), seq),
            numbers,
            origin,
            created_at,
        })
    }

    pub fn size(&self) -> usize {
        self.numbers.len()
    }
}

/// Jogo como está gravado, antes da validação.
#[derive(Deserialize)]
pub struct GameRecord {
    id: String,
    numbers: Vec<u8>,
    #[serde(rename = "type")]
    origin: GameOrigin,
    #[serde(rename = "date")]
    created_at: DateTime<Utc>,
}

impl TryFrom<GameRecord> for Game {
    type Error = anyhow::Error;

    fn try_from(record: GameRecord) -> Result<Self> {
        validate_game_numbers(&record.numbers)
            .with_context(|| format!("Jogo {} inválido", record.id))?;
        let mut numbers = record.numbers;
        numbers.sort();
        Ok(Self {
            id: record.id,
            numbers,
            origin: record.origin,
            created_at: record.created_at,
        })
    }
}

fn check_range_and_duplicates(numbers: &[u8]) -> Result<()> {
    for &n in numbers {
        if n < 1 || n as usize > POOL_SIZE {
            bail!("Dezena {} fora dos limites (1-60)", n);
        }
    }
    for i in 0..numbers.len() {
        for j in (i + 1)..numbers.len() {
            if numbers[i] == numbers[j] {
                bail!("Dezena repetida: {}", numbers[i]);
            }
        }
    }
    Ok(())
}

pub fn validate_draw(numbers: &[u8; PICK_COUNT]) -> Result<()> {
    check_range_and_duplicates(numbers)
}

pub fn validate_game_numbers(numbers: &[u8]) -> Result<()> {
    if numbers.len() < GAME_SIZE_MIN || numbers.len() > GAME_SIZE_MAX {
        bail!(
            "Um jogo deve ter entre {} e {} dezenas (recebido: {})",
            GAME_SIZE_MIN,
            GAME_SIZE_MAX,
            numbers.len()
        );
    }
    check_range_and_duplicates(numbers)
}

/// Aceita `DD/MM/AAAA` (formato da CAIXA) ou ISO `AAAA-MM-DD`.
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%d/%m/%Y") {
        return Ok(date);
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    bail!("Formato de data inválido: '{}'", raw)
}
