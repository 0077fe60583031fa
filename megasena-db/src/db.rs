use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension};
use std::path::{Path, PathBuf};

use crate::models::Draw;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS draws (
    contest  INTEGER PRIMARY KEY,
    date     TEXT NOT NULL,
    n1       INTEGER NOT NULL,
    n2       INTEGER NOT NULL,
    n3       INTEGER NOT NULL,
    n4       INTEGER NOT NULL,
    n5       INTEGER NOT NULL,
    n6       INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS kv (
    key    TEXT PRIMARY KEY,
    value  TEXT NOT NULL
);
";

const DRAW_COLUMNS: &str = "contest, date, n1, n2, n3, n4, n5, n6";

pub fn db_path() -> PathBuf {
    if let Ok(custom) = std::env::var("MEGASENA_DB") {
        return PathBuf::from(custom);
    }
    let mut path = std::env::current_dir().unwrap_or_default();
    path.push("data");
    path.push("megasena.db");
    path
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Não foi possível criar o diretório {:?}", parent))?;
    }
    let conn = Connection::open(path)
        .with_context(|| format!("Não foi possível abrir a base {:?}", path))?;
    Ok(conn)
}

pub fn migrate(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)
        .context("Falha na migração")?;
    Ok(())
}

pub fn insert_draw(conn: &Connection, draw: &Draw) -> Result<bool> {
    let changed = conn.execute(
        "INSERT OR IGNORE INTO draws (contest, date, n1, n2, n3, n4, n5, n6)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        rusqlite::params![
            draw.contest,
            draw.date,
            draw.numbers[0],
            draw.numbers[1],
            draw.numbers[2],
            draw.numbers[3],
            draw.numbers[4],
            draw.numbers[5],
        ],
    ).context("Falha na inserção")?;
    Ok(changed > 0)
}

fn row_to_draw(row: &rusqlite::Row<'_>) -> rusqlite::Result<Draw> {
    Ok(Draw {
        contest: row.get(0)?,
        date: row.get(1)?,
        numbers: [
            row.get::<_, u8>(2)?,
            row.get::<_, u8>(3)?,
            row.get::<_, u8>(4)?,
            row.get::<_, u8>(5)?,
            row.get::<_, u8>(6)?,
            row.get::<_, u8>(7)?,
        ],
    })
}

/// Todos os concursos, do mais antigo ao mais recente.
pub fn fetch_all_draws(conn: &Connection) -> Result<Vec<Draw>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {DRAW_COLUMNS} FROM draws ORDER BY contest ASC"
    ))?;
    let draws = stmt
        .query_map([], row_to_draw)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(draws)
}

/// Os `limit` últimos concursos, do mais recente ao mais antigo.
pub fn fetch_last_draws(conn: &Connection, limit: u32) -> Result<Vec<Draw>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {DRAW_COLUMNS} FROM draws ORDER BY contest DESC LIMIT ?1"
    ))?;
    let draws = stmt
        .query_map([limit], row_to_draw)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(draws)
}

pub fn count_draws(conn: &Connection) -> Result<u32> {
    let count: u32 = conn.query_row("SELECT COUNT(*) FROM draws", [], |row| row.get(0))?;
    Ok(count)
}

pub fn kv_get(conn: &Connection, key: &str) -> Result<Option<String>> {
    let value = conn
        .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| row.get(0))
        .optional()
        .with_context(|| format!("Falha ao ler a chave '{}'", key))?;
    Ok(value)
}

pub fn kv_set(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO kv (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        [key, value],
    ).with_context(|| format!("Falha ao gravar a chave '{}'", key))?;
    Ok(())
}

pub fn kv_delete(conn: &Connection, key: &str) -> Result<()> {
    conn.execute("DELETE FROM kv WHERE key = ?1", [key])
        .with_context(|| format!("Falha ao apagar a chave '{}'", key))?;
    Ok(())
}
