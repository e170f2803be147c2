mod catalog;
mod config;
mod filters;
mod forms;
mod models;
mod session;
mod tui;
mod views;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use config::Config;
use filters::SearchFilters;
use session::{Session, DEFAULT_NOTIFY_MS};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "cit")]
#[command(about = "Internship board - browse, save, and apply to internships")]
struct Cli {
    /// JSON catalog file to load instead of the built-in postings
    #[arg(long, global = true, env = "CIT_CATALOG")]
    catalog: Option<PathBuf>,

    /// How long notifications stay visible, in milliseconds
    #[arg(long, global = true, env = "CIT_NOTIFY_MS", default_value_t = DEFAULT_NOTIFY_MS)]
    notify_ms: i64,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive board (default)
    Browse,

    /// List internships
    List {
        /// Match title, company, or skills (case-insensitive)
        #[arg(short, long)]
        query: Option<String>,

        /// Filter by location (remote, new-york, san-francisco)
        #[arg(short, long)]
        location: Option<String>,

        /// Filter by type (full-time, part-time)
        #[arg(short = 't', long = "type")]
        kind: Option<String>,
    },

    /// Show internship details
    Show {
        /// Internship ID
        id: u32,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::resolve(cli.catalog, cli.notify_ms)?;
    config::init_logging(&config.log_path)?;
    let catalog = config.load_catalog()?;

    match cli.command.unwrap_or(Commands::Browse) {
        Commands::Browse => {
            info!(postings = catalog.len(), "starting board");
            let session = Session::new(catalog).with_notify_ttl(config.notify_ttl);
            tui::run(session)?;
        }

        Commands::List {
            query,
            location,
            kind,
        } => {
            let filters = SearchFilters {
                query: query.unwrap_or_default(),
                location: location.map(|l| filters::slugify(&l)).unwrap_or_default(),
                kind: kind.map(|k| filters::slugify(&k)).unwrap_or_default(),
            };
            let postings = filters.apply(catalog.postings());
            if postings.is_empty() {
                println!("No internships found.");
            } else {
                println!(
                    "{:<4} {:<28} {:<22} {:<20} {:<10} {:>13}",
                    "ID", "TITLE", "COMPANY", "LOCATION", "TYPE", "STIPEND"
                );
                println!("{}", "-".repeat(102));
                for posting in postings {
                    println!(
                        "{:<4} {:<28} {:<22} {:<20} {:<10} {:>13}",
                        posting.id,
                        truncate(&posting.title, 26),
                        truncate(&posting.company, 20),
                        truncate(&posting.location, 18),
                        posting.kind,
                        posting.stipend
                    );
                }
            }
        }

        Commands::Show { id } => {
            let posting = catalog
                .get(id)
                .ok_or_else(|| anyhow!("Internship #{} not found", id))?;
            println!("Internship #{}", posting.id);
            println!("Title: {}", posting.title);
            println!("Company: {}", posting.company);
            println!("Location: {}", posting.location);
            println!("Type: {}", posting.kind);
            println!("Duration: {}", posting.duration);
            println!("Stipend: {}", posting.stipend);
            println!("Posted: {}", posting.posted_date);
            if !posting.skills.is_empty() {
                println!("Skills: {}", posting.skills.join(", "));
            }
            println!("\n--- Description ---\n{}", textwrap::fill(&posting.description, 80));
            if !posting.requirements.is_empty() {
                println!("\n--- Requirements ---\n{}", textwrap::fill(&posting.requirements, 80));
            }
        }
    }

    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
