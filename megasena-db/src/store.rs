use std::cell::RefCell;

use anyhow::{Context, Result};
use rusqlite::Connection;

use crate::db::{kv_delete, kv_get, kv_set};
use crate::models::Game;

pub const SAVED_GAMES_KEY: &str = "megasena_saved_games";

/// Armazenamento dos jogos salvos pelo usuário.
///
/// A lista é sempre lida e regravada por inteiro: cada chamada a `append`
/// ou `remove` é uma operação completa, nunca intercalada com uma leitura.
pub trait SavedGameStore {
    fn load(&self) -> Result<Vec<Game>>;
    fn save_all(&self, games: &[Game]) -> Result<()>;

    fn append(&self, new_games: &[Game]) -> Result<Vec<Game>> {
        let mut games = self.load()?;
        games.extend_from_slice(new_games);
        self.save_all(&games)?;
        log::debug!("{} jogo(s) adicionado(s), total {}", new_games.len(), games.len());
        Ok(games)
    }

    /// Retorna `true` se um jogo com esse id existia.
    fn remove(&self, id: &str) -> Result<bool> {
        let mut games = self.load()?;
        let before = games.len();
        games.retain(|g| g.id != id);
        let removed = games.len() != before;
        if removed {
            self.save_all(&games)?;
        }
        Ok(removed)
    }

    fn clear(&self) -> Result<()> {
        self.save_all(&[])
    }
}

/// Jogos serializados em JSON na tabela `kv`.
pub struct SqliteGameStore<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteGameStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl SavedGameStore for SqliteGameStore<'_> {
    fn load(&self) -> Result<Vec<Game>> {
        match kv_get(self.conn, SAVED_GAMES_KEY)? {
            Some(json) => serde_json::from_str(&json)
                .context("Jogos salvos corrompidos"),
            None => Ok(Vec::new()),
        }
    }

    fn save_all(&self, games: &[Game]) -> Result<()> {
        let json = serde_json::to_string(games)?;
        kv_set(self.conn, SAVED_GAMES_KEY, &json)
    }

    fn clear(&self) -> Result<()> {
        kv_delete(self.conn, SAVED_GAMES_KEY)
    }
}

#[derive(Default)]
pub struct MemoryGameStore {
    games: RefCell<Vec<Game>>,
}

impl SavedGameStore for MemoryGameStore {
    fn load(&self) -> Result<Vec<Game>> {
        Ok(self.games.borrow().clone())
    }

    fn save_all(&self, games: &[Game]) -> Result<()> {
        *self.games.borrow_mut() = games.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrate;
    use crate::models::GameOrigin;
    use chrono::{TimeZone, Utc};

    fn game(numbers: &[u8], seq: usize) -> Game {
        let at = Utc.with_ymd_and_hms(2024, 6, 1, 20, 0, 0).unwrap();
        Game::new(numbers, GameOrigin::Manual, at, seq).unwrap()
    }

    #[test]
    fn test_sqlite_store_empty() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        let store = SqliteGameStore::new(&conn);
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_sqlite_store_append_persists() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        let store = SqliteGameStore::new(&conn);

        store.append(&[game(&[1, 2, 3, 4, 5, 6], 0)]).unwrap();
        let all = store.append(&[game(&[7, 8, 9, 10, 11, 12], 1)]).unwrap();
        assert_eq!(all.len(), 2);

        let reloaded = SqliteGameStore::new(&conn).load().unwrap();
        assert_eq!(reloaded, all);
        assert_eq!(reloaded[1].numbers, vec![7, 8, 9, 10, 11, 12]);
    }

    #[test]
    fn test_sqlite_store_corrupted_json() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        kv_set(&conn, SAVED_GAMES_KEY, "{not json").unwrap();
        assert!(SqliteGameStore::new(&conn).load().is_err());
    }

    #[test]
    fn test_sqlite_store_rejects_invalid_game() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        kv_set(
            &conn,
            SAVED_GAMES_KEY,
            r#"[{"id":"x","numbers":[1,1,1,1,1,1],"type":"manual","date":"2024-06-01T20:00:00Z"}]"#,
        )
        .unwrap();
        let err = SqliteGameStore::new(&conn).load().unwrap_err();
        assert!(format!("{:#}", err).contains("Jogo x inválido"), "{:#}", err);
    }

    #[test]
    fn test_sqlite_store_clear_removes_key() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        let store = SqliteGameStore::new(&conn);
        store.append(&[game(&[1, 2, 3, 4, 5, 6], 0)]).unwrap();

        store.clear().unwrap();
        assert_eq!(kv_get(&conn, SAVED_GAMES_KEY).unwrap(), None);
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_remove_and_clear() {
        let store = MemoryGameStore::default();
        let a = game(&[1, 2, 3, 4, 5, 6], 0);
        let b = game(&[10, 20, 30, 40, 50, 60], 1);
        store.append(&[a.clone(), b.clone()]).unwrap();

        assert!(store.remove(&a.id).unwrap());
        assert!(!store.remove(&a.id).unwrap());
        assert_eq!(store.load().unwrap(), vec![b]);

        store.clear().unwrap();
        assert!(store.load().unwrap().is_empty());
    }
}
