// Session - one loaded guest list: directory + pairing relation
//
// Reloading builds a new Session; nothing is patched in place.

use crate::directory::{Directory, GuestRecord};
use crate::error::{LookupError, Result};
use crate::lookup::{find_guest, find_partner, GuestCard};
use crate::parser::parse;
use crate::relation::{resolve, PairingRelation, RawPairings};
use std::fs;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct Session {
    directory: Directory,
    relation: PairingRelation,
    skipped_rows: usize,
}

impl Session {
    /// Parse guest list text and resolve pairings
    ///
    /// The meet feature only exists when the sheet has a "person to meet"
    /// column and at least one value in it resolved; otherwise the relation
    /// stays empty.
    pub fn from_text(text: &str) -> Result<Self> {
        let sheet = parse(text)?;
        let directory = Directory::build(&sheet.rows);

        let raw = RawPairings::from_rows(&sheet.rows);
        let relation = if sheet.has_pairing_column() && !raw.is_empty() {
            resolve(&directory, &raw)
        } else {
            PairingRelation::empty()
        };

        info!(
            guests = directory.len(),
            skipped = sheet.skipped,
            pairings = relation.len(),
            "guest list loaded"
        );

        Ok(Session {
            directory,
            relation,
            skipped_rows: sheet.skipped,
        })
    }

    /// Read a guest list file and load it
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| LookupError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "reading guest list");
        Session::from_text(&text)
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    pub fn relation(&self) -> &PairingRelation {
        &self.relation
    }

    /// True when at least one meet suggestion exists
    pub fn meet_enabled(&self) -> bool {
        !self.relation.is_empty()
    }

    pub fn skipped_rows(&self) -> usize {
        self.skipped_rows
    }

    pub fn guest(&self, identifier: &str) -> Option<&GuestRecord> {
        find_guest(&self.directory, identifier)
    }

    pub fn partner(&self, identifier: &str) -> Option<&GuestRecord> {
        find_partner(&self.directory, &self.relation, identifier)
    }

    pub fn card(&self, identifier: &str) -> Option<GuestCard<'_>> {
        GuestCard::lookup(&self.directory, &self.relation, identifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WEDDING: &str = "ID,Name,Table,Person to Meet\nA1,Jane Doe,5,B1\nB1,John Smith,5,\n";

    #[test]
    fn test_two_guests_paired_both_ways() {
        let session = Session::from_text(WEDDING).unwrap();

        assert_eq!(session.directory().len(), 2);
        let a1 = session.guest("A1").unwrap();
        assert_eq!((a1.name.as_str(), a1.table.as_str()), ("Jane Doe", "5"));
        let b1 = session.guest("B1").unwrap();
        assert_eq!((b1.name.as_str(), b1.table.as_str()), ("John Smith", "5"));

        assert_eq!(session.relation().partner_of("A1"), Some("B1"));
        assert_eq!(session.relation().partner_of("B1"), Some("A1"));
        assert_eq!(session.relation().len(), 2);

        assert_eq!(session.partner("A1").unwrap().name, "John Smith");
        assert!(session.meet_enabled());
    }

    #[test]
    fn test_no_pairing_column_disables_meet() {
        let session = Session::from_text("ID,Name,Table\nA1,Jane,1\nB1,John,2\n").unwrap();
        assert!(!session.meet_enabled());
        assert!(session.partner("A1").is_none());
        assert!(session.card("A1").unwrap().meet.is_none());
    }

    #[test]
    fn test_unresolved_pairings_disable_meet() {
        let text = "ID,Name,Table,Person to Meet\nA1,Jane,1,someone\nB1,John,2,A9\n";
        let session = Session::from_text(text).unwrap();
        assert!(!session.meet_enabled());
    }

    #[test]
    fn test_round_trip_every_accepted_row() {
        let text = "NFC,Guest Name,Table\nn1,Ada,1\nn2,Grace,2\nbad,,3\nn3,Linus,Head\n";
        let session = Session::from_text(text).unwrap();

        for (id, name, table) in [("n1", "Ada", "1"), ("n2", "Grace", "2"), ("n3", "Linus", "Head")] {
            let guest = session.guest(id).unwrap();
            assert_eq!(guest.name, name);
            assert_eq!(guest.table, table);
        }
        assert!(session.guest("bad").is_none());
        assert_eq!(session.skipped_rows(), 1);
    }

    #[test]
    fn test_last_write_wins() {
        let session = Session::from_text("ID,Name,Table\nA1,Jane,5\nA1,Janet,6\n").unwrap();
        let guest = session.guest("A1").unwrap();
        assert_eq!(guest.name, "Janet");
        assert_eq!(guest.table, "6");
    }

    #[test]
    fn test_schema_failure_produces_no_session() {
        let err = Session::from_text("ID,Seat\nA1,5\n").unwrap_err();
        assert!(err.is_schema());
    }

    #[test]
    fn test_empty_text_is_empty_session() {
        let session = Session::from_text("").unwrap();
        assert!(session.directory().is_empty());
        assert!(!session.meet_enabled());
    }

    #[test]
    fn test_load_missing_file() {
        let err = Session::load(Path::new("/definitely/not/here/guests.csv")).unwrap_err();
        assert!(matches!(err, LookupError::Io { .. }));
    }
}
