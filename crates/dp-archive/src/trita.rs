//! TRITA sequence numbers backed by a per-school-per-year database table.
//!
//! A TRITA identifier is `<series-prefix>-<year>:<serial>`, where the serial
//! is the autoincrement id of a freshly inserted row. The database column is
//! the only uniqueness guarantee; a committed counter row whose cover or
//! merge step later fails is an accepted orphan.

use std::path::Path;
use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use tracing::info;

use crate::{ArchiveError, ArchiveResult};

/// TRITA series prefix per school acronym.
fn series_prefix(school: &str) -> Option<&'static str> {
    match school {
        "ABE" => Some("TRITA-ABE-MBT"),
        "CBH" => Some("TRITA-CBH-GRU"),
        "EECS" => Some("TRITA-EECS-EX"),
        "ITM" => Some("TRITA-ITM-EX"),
        "SCI" => Some("TRITA-SCI-GRU"),
        _ => None,
    }
}

/// Database connection wrapper minting TRITA identifiers.
#[derive(Debug, Clone)]
pub struct TritaRegistry {
    connection: Arc<Mutex<Connection>>,
}

impl TritaRegistry {
    /// Open the registry database at the specified path, creating it if
    /// absent.
    pub fn open<P: AsRef<Path>>(path: P) -> ArchiveResult<Self> {
        let conn = Connection::open(path)?;
        Ok(Self {
            connection: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory registry for testing.
    pub fn open_in_memory() -> ArchiveResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            connection: Arc::new(Mutex::new(conn)),
        })
    }

    /// Mint the next TRITA identifier for a school and year, recording the
    /// thesis metadata alongside the counter row.
    pub fn assign(
        &self,
        school: &str,
        year: i32,
        authors: &[String],
        title: &str,
        examiner: &str,
    ) -> ArchiveResult<String> {
        let prefix =
            series_prefix(school).ok_or_else(|| ArchiveError::UnknownSchool(school.to_string()))?;

        // Table names cannot be bound as parameters; the school is validated
        // against the fixed series table above, the year is numeric.
        let table = format!("{}_trita_for_thesis_{}", school, year);

        let conn = self.connection.lock().expect("trita connection lock poisoned");
        conn.execute(
            &format!(
                "CREATE TABLE IF NOT EXISTS {} (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    authors TEXT NOT NULL,
                    title TEXT NOT NULL,
                    examiner TEXT NOT NULL
                )",
                table
            ),
            [],
        )?;
        conn.execute(
            &format!("INSERT INTO {} (authors, title, examiner) VALUES (?1, ?2, ?3)", table),
            rusqlite::params![authors.join(" and "), title, examiner],
        )?;
        let id = conn.last_insert_rowid();

        let trita = format!("{}-{}:{}", prefix, year, id);
        info!(%trita, school, year, "assigned TRITA number");
        Ok(trita)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authors() -> Vec<String> {
        vec!["Jane Doe".to_string(), "John Smith".to_string()]
    }

    #[test]
    fn numbers_increase_monotonically_within_a_series() {
        let registry = TritaRegistry::open_in_memory().unwrap();
        let first =
            registry.assign("EECS", 2026, &authors(), "A Study", "Prof. Examiner").unwrap();
        let second =
            registry.assign("EECS", 2026, &authors(), "Another Study", "Prof. Examiner").unwrap();
        assert_eq!(first, "TRITA-EECS-EX-2026:1");
        assert_eq!(second, "TRITA-EECS-EX-2026:2");
    }

    #[test]
    fn each_school_year_pair_counts_independently() {
        let registry = TritaRegistry::open_in_memory().unwrap();
        registry.assign("EECS", 2026, &authors(), "A", "E").unwrap();
        let itm = registry.assign("ITM", 2026, &authors(), "B", "E").unwrap();
        let eecs_next_year = registry.assign("EECS", 2027, &authors(), "C", "E").unwrap();
        assert_eq!(itm, "TRITA-ITM-EX-2026:1");
        assert_eq!(eecs_next_year, "TRITA-EECS-EX-2027:1");
    }

    #[test]
    fn unknown_school_is_rejected_before_touching_the_database() {
        let registry = TritaRegistry::open_in_memory().unwrap();
        assert!(matches!(
            registry.assign("XYZ", 2026, &authors(), "A", "E"),
            Err(ArchiveError::UnknownSchool(_))
        ));
    }

    #[test]
    fn registry_persists_across_reopens() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("trita.db");
        {
            let registry = TritaRegistry::open(&path).unwrap();
            registry.assign("EECS", 2026, &authors(), "A", "E").unwrap();
        }
        let registry = TritaRegistry::open(&path).unwrap();
        let next = registry.assign("EECS", 2026, &authors(), "B", "E").unwrap();
        assert_eq!(next, "TRITA-EECS-EX-2026:2");
    }
}
