// Guest Lookup - Core Library
// Guest list parsing, seating lookup and "meet someone" pairing for the CLI and tests

pub mod config;
pub mod directory;
pub mod error;
pub mod lookup;
pub mod parser;
pub mod relation;
pub mod session;

// Re-export commonly used types
pub use config::Config;
pub use directory::{Directory, GuestRecord};
pub use error::{LookupError, Result};
pub use lookup::{find_guest, find_partner, identifier_from_query, GuestCard};
pub use parser::{parse, ColumnLayout, GuestSheet, RawRow};
pub use relation::{resolve, PairingRelation, RawPairings};
pub use session::Session;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

