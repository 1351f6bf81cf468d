// 🤝 Relation Resolver - "person to meet" values → symmetric pairing relation
//
// Raw values come straight from a hand-edited spreadsheet: an identifier, a
// guest name, or noise. Anything that does not resolve is dropped.

use crate::directory::Directory;
use crate::parser::RawRow;
use std::collections::HashMap;
use tracing::debug;

// ============================================================================
// RAW PAIRINGS
// ============================================================================

/// RawPairings - identifier → unresolved "person to meet" value
///
/// Keeps first-insertion order; a later value for the same identifier
/// replaces the earlier one in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawPairings {
    entries: Vec<(String, String)>,

    /// identifier → position in `entries`
    index: HashMap<String, usize>,
}

impl RawPairings {
    pub fn new() -> Self {
        RawPairings::default()
    }

    /// Collect the non-empty pairing values of accepted rows, in row order
    pub fn from_rows(rows: &[RawRow]) -> Self {
        let mut pairings = RawPairings::new();
        for row in rows {
            if let Some(value) = &row.pairing {
                pairings.insert(row.identifier.clone(), value.clone());
            }
        }
        pairings
    }

    pub fn insert(&mut self, identifier: String, value: String) {
        match self.index.get(&identifier) {
            Some(&pos) => self.entries[pos].1 = value,
            None => {
                self.index.insert(identifier.clone(), self.entries.len());
                self.entries.push((identifier, value));
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(id, v)| (id.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// PAIRING RELATION
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PairingRelation {
    pairs: HashMap<String, String>,
}

impl PairingRelation {
    pub fn empty() -> Self {
        PairingRelation::default()
    }

    pub fn partner_of(&self, identifier: &str) -> Option<&str> {
        self.pairs.get(identifier).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(a, b)| (a.as_str(), b.as_str()))
    }
}

// ============================================================================
// RESOLVER
// ============================================================================

/// Resolve raw pairing values into a relation
///
/// # Strategy
/// 1. Each value is tried as a literal identifier, then as a guest name
///    (trimmed, case-folded). Duplicate names map to the last guest holding
///    that name in directory order.
/// 2. Self-pairings and pairings with an endpoint outside the directory are
///    dropped.
/// 3. Survivors become `source ↦ target`. Then every target without an
///    outgoing entry of its own gets `target ↦ source`, in input order.
///
/// Explicit entries are never overwritten by the reverse fill, so conflicting
/// explicit data leaves the relation asymmetric for those guests.
pub fn resolve(directory: &Directory, raw: &RawPairings) -> PairingRelation {
    let names = name_index(directory);

    let mut explicit: Vec<(&str, &str)> = Vec::new();
    for (source, value) in raw.iter() {
        let target = match resolve_target(directory, &names, value) {
            Some(target) => target,
            None => {
                debug!(source, value, "dropping unresolvable pairing");
                continue;
            }
        };

        if target == source {
            debug!(source, "dropping self-pairing");
            continue;
        }

        if !directory.contains(source) {
            debug!(source, "dropping pairing from unknown guest");
            continue;
        }

        explicit.push((source, target));
    }

    let mut relation = PairingRelation::empty();
    for &(source, target) in &explicit {
        relation.pairs.insert(source.to_string(), target.to_string());
    }
    for &(source, target) in &explicit {
        if !relation.pairs.contains_key(target) {
            relation.pairs.insert(target.to_string(), source.to_string());
        }
    }

    relation
}

/// Folded guest name → identifier, last record wins
fn name_index(directory: &Directory) -> HashMap<String, &str> {
    directory
        .all()
        .iter()
        .map(|g| (fold(&g.name), g.identifier.as_str()))
        .collect()
}

fn resolve_target<'a>(
    directory: &'a Directory,
    names: &HashMap<String, &'a str>,
    value: &str,
) -> Option<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Some(guest) = directory.lookup(value) {
        return Some(guest.identifier.as_str());
    }

    names.get(&fold(value)).copied()
}

fn fold(s: &str) -> String {
    s.trim().to_lowercase()
}
