use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "guest-lookup")]
#[command(about = "Find a guest's table (and who they should meet) from a guest list CSV", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Guest list CSV (default: $GUESTS_CSV or ./guests.csv)
    #[arg(long, global = true)]
    pub csv: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Look up a guest by identifier
    Find {
        /// Tag serial or assigned identifier
        #[arg(required = true)]
        id: String,
    },

    /// Look up the guest named by a page URL (?nfc=... or ?test=...)
    Open {
        #[arg(required = true)]
        url: String,
    },

    /// Print the guest directory sorted by surname
    List {
        /// Only guests whose name contains this text
        query: Option<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Load the guest list and report what was found
    Check,

    /// Interactive guest directory
    #[cfg(feature = "tui")]
    Browse,
}
