// 🔎 Lookup Service - identifier → guest, identifier → suggested partner
//
// Absent results are `None`, never errors: an unknown tag is an everyday event.

use crate::directory::{Directory, GuestRecord};
use crate::relation::PairingRelation;
use serde::Serialize;

/// Query parameters that carry an identifier, in priority order
const ID_PARAMS: [&str; 2] = ["nfc", "test"];

pub fn find_guest<'a>(directory: &'a Directory, identifier: &str) -> Option<&'a GuestRecord> {
    directory.lookup(identifier)
}

/// The guest `identifier` is paired with, if the pairing still points at a
/// known guest
pub fn find_partner<'a>(
    directory: &'a Directory,
    relation: &PairingRelation,
    identifier: &str,
) -> Option<&'a GuestRecord> {
    let partner_id = relation.partner_of(identifier)?;
    directory.lookup(partner_id)
}

// ============================================================================
// GUEST CARD
// ============================================================================

/// Everything shown for one scanned guest: seating plus meet suggestion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuestCard<'a> {
    pub guest: &'a GuestRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meet: Option<&'a GuestRecord>,
}

impl<'a> GuestCard<'a> {
    pub fn lookup(
        directory: &'a Directory,
        relation: &PairingRelation,
        identifier: &str,
    ) -> Option<Self> {
        let guest = find_guest(directory, identifier)?;
        let meet = find_partner(directory, relation, identifier);
        Some(GuestCard { guest, meet })
    }
}

// ============================================================================
// IDENTIFIER DISPATCH
// ============================================================================

/// Extract a guest identifier from a page URL or query string
///
/// Accepts `https://host/index.html?nfc=abc`, `?nfc=abc` or `nfc=abc&x=1`.
/// `nfc` wins over `test`; empty values count as missing.
pub fn identifier_from_query(input: &str) -> Option<String> {
    let query = match input.split_once('?') {
        Some((_, rest)) => rest,
        None => input,
    };
    let query = query.split('#').next().unwrap_or("");

    let params: Vec<(String, String)> = query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode(key), decode(value))
        })
        .collect();

    ID_PARAMS.iter().find_map(|wanted| {
        params
            .iter()
            .find(|(key, _)| key == wanted)
            .map(|(_, value)| value.trim().to_string())
            .filter(|value| !value.is_empty())
    })
}

fn decode(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|s| s.into_owned())
        .unwrap_or(spaced)
}
