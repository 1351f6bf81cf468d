mod cli;
mod logging;

// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{bail, Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use guest_lookup::{identifier_from_query, Config, GuestRecord, Session, VERSION};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let logging = logging::init();

    let config = Config::load()?.with_guests_csv(cli.csv.clone());
    logging.apply(&config.log_filter)?;

    let session = Session::load(&config.guests_csv)
        .with_context(|| format!("Failed to load guest list {}", config.guests_csv.display()))?;

    match cli.command {
        Commands::Find { id } => run_find(&session, &id),
        Commands::Open { url } => {
            let Some(id) = identifier_from_query(&url) else {
                bail!("No nfc or test parameter in {url}");
            };
            run_find(&session, &id)
        }
        Commands::List { query, json } => run_list(&session, query.as_deref().unwrap_or(""), json),
        Commands::Check => run_check(&session, &config),
        #[cfg(feature = "tui")]
        Commands::Browse => run_browse(session),
    }
}

fn run_find(session: &Session, id: &str) -> Result<()> {
    let Some(card) = session.card(id) else {
        bail!("No guest found for ID: {id}");
    };

    println!("👋 {}", card.guest.name);
    println!("🪑 Table {}", card.guest.table);

    if let Some(meet) = card.meet {
        println!("\n🤝 Someone to meet: {} (table {})", meet.name, meet.table);
    }

    Ok(())
}

fn run_list(session: &Session, query: &str, json: bool) -> Result<()> {
    let guests = session.directory().search(query);

    if json {
        println!("{}", serde_json::to_string_pretty(&guests)?);
        return Ok(());
    }

    if guests.is_empty() {
        println!("No guests found.");
        return Ok(());
    }

    print_table(&guests);
    Ok(())
}

fn print_table(guests: &[&GuestRecord]) {
    let name_width = guests.iter().map(|g| g.name.chars().count()).max().unwrap_or(0).max(4);
    let table_width = guests.iter().map(|g| g.table.chars().count()).max().unwrap_or(0).max(5);

    println!("{:<name_width$}  {:<table_width$}  ID", "Name", "Table");
    println!("{}", "─".repeat(name_width + table_width + 6));
    for g in guests {
        println!("{:<name_width$}  {:<table_width$}  {}", g.name, g.table, g.identifier);
    }
}

fn run_check(session: &Session, config: &Config) -> Result<()> {
    println!("🗂️  guest-lookup v{VERSION}");
    println!("📂 {}", config.guests_csv.display());
    println!("✓ Guests: {}", session.directory().len());
    println!("✓ Skipped rows: {}", session.skipped_rows());

    if session.meet_enabled() {
        println!("✓ Meet suggestions: {} pairings", session.relation().len());
    } else {
        println!("– Meet suggestions: disabled");
    }

    Ok(())
}

#[cfg(feature = "tui")]
fn run_browse(session: Session) -> Result<()> {
    let mut app = ui::App::new(session);
    ui::run_ui(&mut app)
}
