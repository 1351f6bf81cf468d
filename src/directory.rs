// 📇 Guest Directory - identifier → GuestRecord
//
// Built once per load from accepted rows. Enumeration follows first-insertion
// order so name-based resolution downstream is reproducible.

use crate::parser::RawRow;
use serde::Serialize;
use std::collections::HashMap;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

// ============================================================================
// GUEST RECORD
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuestRecord {
    /// Tag serial or any manually assigned key
    pub identifier: String,
    pub name: String,

    /// Free-form seating label ("5", "Head Table", ...)
    pub table: String,
}

impl GuestRecord {
    pub fn new(identifier: String, name: String, table: String) -> Self {
        GuestRecord {
            identifier,
            name,
            table,
        }
    }

    /// Last whitespace-separated word of the name
    pub fn surname(&self) -> &str {
        self.name.split_whitespace().last().unwrap_or("")
    }
}

impl From<&RawRow> for GuestRecord {
    fn from(row: &RawRow) -> Self {
        GuestRecord::new(row.identifier.clone(), row.name.clone(), row.table.clone())
    }
}

// ============================================================================
// DIRECTORY
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct Directory {
    /// Records in first-insertion order
    records: Vec<GuestRecord>,

    /// identifier → position in `records`
    index: HashMap<String, usize>,
}

impl Directory {
    pub fn new() -> Self {
        Directory::default()
    }

    /// Build a directory from accepted rows
    ///
    /// A repeated identifier replaces the earlier record's name and table
    /// but keeps its earlier position.
    pub fn build(rows: &[RawRow]) -> Self {
        let mut directory = Directory::new();
        for row in rows {
            directory.insert(GuestRecord::from(row));
        }
        directory
    }

    fn insert(&mut self, record: GuestRecord) {
        match self.index.get(&record.identifier) {
            Some(&pos) => self.records[pos] = record,
            None => {
                self.index.insert(record.identifier.clone(), self.records.len());
                self.records.push(record);
            }
        }
    }

    pub fn lookup(&self, identifier: &str) -> Option<&GuestRecord> {
        self.index.get(identifier).map(|&pos| &self.records[pos])
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.index.contains_key(identifier)
    }

    /// All records in insertion order
    pub fn all(&self) -> &[GuestRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All guests sorted by surname, then full name
    ///
    /// Case and accents are ignored, so "Ávila" sorts with the A's.
    pub fn roster(&self) -> Vec<&GuestRecord> {
        let mut guests: Vec<&GuestRecord> = self.records.iter().collect();
        guests.sort_by_cached_key(|g| (sort_key(g.surname()), sort_key(&g.name)));
        guests
    }

    /// Roster entries whose name contains `query`, ignoring case
    ///
    /// A blank query returns the whole roster.
    pub fn search(&self, query: &str) -> Vec<&GuestRecord> {
        let needle = query.trim().to_lowercase();
        let roster = self.roster();
        if needle.is_empty() {
            return roster;
        }
        roster
            .into_iter()
            .filter(|g| g.name.to_lowercase().contains(&needle))
            .collect()
    }
}

/// Base-letter form for sorting: decomposed, combining marks dropped, lowercased
fn sort_key(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, name: &str, table: &str) -> RawRow {
        RawRow::new(id.to_string(), name.to_string(), table.to_string(), 0)
    }

    #[test]
    fn test_build_and_lookup() {
        let directory = Directory::build(&[row("A1", "Jane Doe", "5"), row("B1", "John Smith", "5")]);

        assert_eq!(directory.len(), 2);
        let jane = directory.lookup("A1").unwrap();
        assert_eq!(jane.name, "Jane Doe");
        assert_eq!(jane.table, "5");
        assert!(directory.lookup("Z9").is_none());
        assert!(directory.lookup("a1").is_none());
    }

    #[test]
    fn test_last_write_wins_keeps_position() {
        let directory = Directory::build(&[
            row("A1", "Jane Doe", "5"),
            row("B1", "John Smith", "6"),
            row("A1", "Janet Doe", "7"),
        ]);

        assert_eq!(directory.len(), 2);
        let a1 = directory.lookup("A1").unwrap();
        assert_eq!(a1.name, "Janet Doe");
        assert_eq!(a1.table, "7");
        assert_eq!(directory.all()[0].identifier, "A1");
        assert_eq!(directory.all()[1].identifier, "B1");
    }

    #[test]
    fn test_empty_directory() {
        let directory = Directory::build(&[]);
        assert!(directory.is_empty());
        assert!(directory.roster().is_empty());
        assert!(directory.search("anyone").is_empty());
    }

    #[test]
    fn test_surname() {
        let guest = GuestRecord::new("1".into(), "Mary Ann  Evans ".into(), "2".into());
        assert_eq!(guest.surname(), "Evans");
        let guest = GuestRecord::new("1".into(), "Cher".into(), "2".into());
        assert_eq!(guest.surname(), "Cher");
    }

    #[test]
    fn test_roster_sorted_by_surname_then_name() {
        let directory = Directory::build(&[
            row("1", "Zoe Adams", "1"),
            row("2", "bob smith", "2"),
            row("3", "Alice Smith", "3"),
            row("4", "Carl adams", "4"),
        ]);

        let names: Vec<&str> = directory.roster().iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Carl adams", "Zoe Adams", "Alice Smith", "bob smith"]);
    }

    #[test]
    fn test_roster_ignores_accents() {
        let directory = Directory::build(&[
            row("1", "Zoe Zhang", "1"),
            row("2", "Ana Ávila", "2"),
            row("3", "Bo Baker", "3"),
            row("4", "Émile Örtel", "4"),
        ]);

        let names: Vec<&str> = directory.roster().iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Ana Ávila", "Bo Baker", "Émile Örtel", "Zoe Zhang"]);
    }

    #[test]
    fn test_sort_key_folds_case_and_accents() {
        assert_eq!(sort_key("ÁVILA"), "avila");
        assert_eq!(sort_key("Müller"), "muller");
        assert_eq!(sort_key("Smith"), "smith");
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let directory = Directory::build(&[
            row("1", "Jane Doe", "1"),
            row("2", "John Smith", "2"),
            row("3", "Janice Dorn", "3"),
        ]);

        let hits: Vec<&str> = directory.search("  JAN ").iter().map(|g| g.identifier.as_str()).collect();
        assert_eq!(hits, vec!["1", "3"]);

        assert_eq!(directory.search("").len(), 3);
        assert!(directory.search("xyz").is_empty());
    }
}
