use anyhow::{Context, Result};
use megasena_db::rusqlite::Connection;
use std::path::Path;

use megasena_db::db::insert_draw;
use megasena_db::models::{parse_date, Draw, PICK_COUNT};

/// Colunas esperadas: `concurso;data;d1;d2;d3;d4;d5;d6` (vírgula também aceita).
fn parse_record(record: &csv::StringRecord) -> Result<Draw> {
    let get = |idx: usize| -> Result<String> {
        record
            .get(idx)
            .map(|s| s.trim().to_string())
            .with_context(|| format!("Campo ausente no índice {}", idx))
    };

    let contest_str = get(0)?;
    let contest: u32 = contest_str
        .parse()
        .with_context(|| format!("Concurso inválido: '{}'", contest_str))?;
    let date = parse_date(&get(1)?)?;

    let mut numbers = [0u8; PICK_COUNT];
    for (i, slot) in numbers.iter_mut().enumerate() {
        let s = get(2 + i)?;
        *slot = s
            .parse::<u8>()
            .with_context(|| format!("Não foi possível ler '{}' (índice {})", s, 2 + i))?;
    }

    Draw::new(contest, date, numbers)
}

fn detect_delimiter(content: &str) -> u8 {
    let first_line = content.lines().next().unwrap_or_default();
    if first_line.contains(';') {
        b';'
    } else {
        b','
    }
}

pub struct CsvReadResult {
    pub draws: Vec<Draw>,
    pub total_records: u32,
    pub errors: u32,
}

/// Lê e valida os concursos; linhas inválidas são contadas e descartadas.
pub fn read_draws_csv(path: &Path) -> Result<CsvReadResult> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Não foi possível abrir {:?}", path))?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(detect_delimiter(&content))
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut result = CsvReadResult {
        draws: Vec::new(),
        total_records: 0,
        errors: 0,
    };

    for record_result in reader.records() {
        result.total_records += 1;
        match record_result {
            Ok(record) => match parse_record(&record) {
                Ok(draw) => result.draws.push(draw),
                Err(e) => {
                    log::warn!("Linha {} ignorada: {:#}", result.total_records, e);
                    result.errors += 1;
                }
            },
            Err(e) => {
                log::warn!("Erro de leitura na linha {}: {}", result.total_records, e);
                result.errors += 1;
            }
        }
    }

    Ok(result)
}

pub struct ImportResult {
    pub total_records: u32,
    pub inserted: u32,
    pub skipped: u32,
    pub errors: u32,
}

pub fn import_csv(conn: &Connection, path: &Path) -> Result<ImportResult> {
    let read = read_draws_csv(path)?;

    let tx = conn.unchecked_transaction()
        .context("Não foi possível iniciar a transação")?;

    let mut result = ImportResult {
        total_records: read.total_records,
        inserted: 0,
        skipped: 0,
        errors: read.errors,
    };

    for draw in &read.draws {
        match insert_draw(&tx, draw) {
            Ok(true) => result.inserted += 1,
            Ok(false) => result.skipped += 1,
            Err(e) => {
                log::warn!("Erro ao inserir o concurso {}: {:#}", draw.contest, e);
                result.errors += 1;
            }
        }
    }

    tx.commit().context("Falha no commit")?;
    log::info!("Importação de {:?}: {} novos concursos", path, result.inserted);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use megasena_db::db::{count_draws, migrate};
    use std::io::Write;

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("concurso;data;d1"), b';');
        assert_eq!(detect_delimiter("concurso,data,d1"), b',');
        assert_eq!(detect_delimiter(""), b',');
    }

    #[test]
    fn test_read_skips_invalid_rows() {
        let file = write_csv(
            "concurso;data;d1;d2;d3;d4;d5;d6\n\
             1;11/03/1996;4;5;30;33;41;52\n\
             2;18/03/1996;9;37;39;41;43;49\n\
             3;25/03/1996;10;11;29;30;36;61\n\
             4;01/04/1996;1;1;2;3;4;5\n\
             x;08/04/1996;1;2;3;4;5;6\n",
        );
        let result = read_draws_csv(file.path()).unwrap();
        assert_eq!(result.total_records, 5);
        assert_eq!(result.draws.len(), 2);
        assert_eq!(result.errors, 3);
        assert_eq!(result.draws[0].numbers, [4, 5, 30, 33, 41, 52]);
    }

    #[test]
    fn test_read_comma_and_iso_dates() {
        let file = write_csv(
            "concurso,data,d1,d2,d3,d4,d5,d6\n\
             2800,2024-11-05,60,1,13,22,35,47\n",
        );
        let result = read_draws_csv(file.path()).unwrap();
        assert_eq!(result.draws.len(), 1);
        assert_eq!(result.draws[0].contest, 2800);
        assert_eq!(result.draws[0].numbers, [1, 13, 22, 35, 47, 60]);
    }

    #[test]
    fn test_import_ignores_duplicates() {
        let file = write_csv(
            "concurso;data;d1;d2;d3;d4;d5;d6\n\
             1;11/03/1996;4;5;30;33;41;52\n\
             2;18/03/1996;9;37;39;41;43;49\n",
        );
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();

        let first = import_csv(&conn, file.path()).unwrap();
        assert_eq!(first.inserted, 2);
        let second = import_csv(&conn, file.path()).unwrap();
        assert_eq!(second.inserted, 0);
        assert_eq!(second.skipped, 2);
        assert_eq!(count_draws(&conn).unwrap(), 2);
    }

    #[test]
    fn test_missing_file() {
        assert!(read_draws_csv(Path::new("/nao/existe.csv")).is_err());
    }
}
