//! toolshed CLI - main entry point.
//!
//! Every invocation opens a session over the configured data directory,
//! performs one action and exits. Mutations are saved before returning.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use toolshed::events::FormFields;
use toolshed::inventory::Availability;
use toolshed::search::SearchOutcome;
use toolshed::types::{Config, LocationName, ToolNumber};
use toolshed::{Error, Session};

#[derive(Debug, Parser)]
#[command(name = "toolshed", version, about = "Workshop tool inventory")]
struct Cli {
    /// JSON configuration file.
    #[arg(long, env = "TOOLSHED_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding the inventory and location files.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List tools in store order.
    List {
        /// Only tools currently lent out.
        #[arg(long)]
        borrowed: bool,
    },
    /// Add a tool with the next free number.
    Add { name: String, location: String },
    /// Change a tool's name and/or location.
    Edit {
        number: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        location: Option<String>,
    },
    /// Delete a tool; its number becomes free.
    Delete { number: String },
    /// Lend a tool to someone.
    Lend { number: String, borrower: String },
    /// Mark a tool as returned.
    Return { number: String },
    /// Find a tool by number or name.
    Find {
        query: String,
        /// Choose this tool number among ambiguous results.
        #[arg(long)]
        pick: Option<String>,
    },
    /// Tool markers on a workshop page.
    Markers {
        #[arg(long, default_value_t = 0)]
        page: u32,
    },
    /// Manage named locations.
    #[command(subcommand)]
    Location(LocationCommand),
    /// List candidate location images.
    Images,
}

#[derive(Debug, Subcommand)]
enum LocationCommand {
    /// Register a location.
    Add { name: String },
    /// List locations in display order.
    List,
    /// Bind an image to a location.
    Link { name: String, image: String },
    /// Show the image bound to a location.
    Show { name: String },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(dir) = cli.data_dir {
        config.storage.data_dir = dir;
    }

    toolshed::observability::init_tracing(&config.observability);

    match run(config, cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_user_facing() => {
            eprintln!("{}", e);
            ExitCode::from(2)
        }
        Err(e) => {
            tracing::error!("command_failed: {}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn parse_number(text: &str) -> toolshed::Result<ToolNumber> {
    ToolNumber::parse(text).map_err(Error::validation)
}

fn run(config: Config, command: Command) -> toolshed::Result<()> {
    let mut session = Session::open(config)?;
    for skipped in session.skipped_on_load() {
        eprintln!("warning: skipped line {}: {}", skipped.line, skipped.reason);
    }

    match command {
        Command::List { borrowed } => {
            let records: Vec<_> = if borrowed {
                session.inventory().borrowed()
            } else {
                session.inventory().iter().collect()
            };
            for record in records {
                match &record.borrowed_by {
                    Some(who) => println!("{}  @ {}  (lent to {})", record, record.location, who),
                    None => println!("{}  @ {}", record, record.location),
                }
            }
        }
        Command::Add { name, location } => {
            let number = session.add_tool(&name, &location)?;
            println!("added tool {}", number);
        }
        Command::Edit {
            number,
            name,
            location,
        } => {
            session.select(parse_number(&number)?)?;
            let current = session.selection().form().clone();
            let form = FormFields {
                name: name.unwrap_or(current.name.clone()),
                location: location.unwrap_or(current.location.clone()),
                ..current
            };
            let number = session.save_form(&form)?;
            println!("updated tool {}", number);
        }
        Command::Delete { number } => {
            session.select(parse_number(&number)?)?;
            let removed = session.delete_selected()?;
            println!("deleted {}", removed);
        }
        Command::Lend { number, borrower } => {
            session.select(parse_number(&number)?)?;
            session.lend(&borrower)?;
            println!("lent tool {} to {}", number.trim(), borrower.trim());
        }
        Command::Return { number } => {
            session.select(parse_number(&number)?)?;
            session.return_selected()?;
            println!("tool {} returned", number.trim());
        }
        Command::Find { query, pick } => match session.find(&query)? {
            SearchOutcome::Skipped => println!("no search performed"),
            SearchOutcome::Unique { .. } => print_selected(&session),
            SearchOutcome::Ambiguous { candidates } => match pick {
                Some(n) => {
                    session.pick(parse_number(&n)?)?;
                    print_selected(&session);
                }
                None => {
                    println!("several tools match; rerun with --pick <number>:");
                    for c in candidates {
                        println!("  {}: {}  ({:?}, {:.2})", c.number, c.name, c.kind, c.score);
                    }
                }
            },
            SearchOutcome::NotFound => {}
        },
        Command::Markers { page } => {
            for marker in session.inventory().markers_on_page(page) {
                let status = match marker.availability {
                    Availability::Available => "available",
                    Availability::Borrowed => "borrowed",
                };
                println!("{} at ({}, {}) {}", marker.number, marker.x, marker.y, status);
            }
        }
        Command::Location(cmd) => match cmd {
            LocationCommand::Add { name } => {
                if session.add_location(&name)? {
                    println!("location '{}' added", name.trim());
                } else {
                    println!("location '{}' already exists", name.trim());
                }
            }
            LocationCommand::List => {
                for name in session.locations().sorted_names() {
                    let image = session.image_for(name).unwrap_or("-");
                    println!("{}  {}", name, image);
                }
            }
            LocationCommand::Link { name, image } => {
                session.link_image(&name, &image)?;
                println!("linked '{}' to {}", name.trim(), image);
            }
            LocationCommand::Show { name } => {
                let name = LocationName::new(name).map_err(Error::validation)?;
                match session.image_for(&name) {
                    Some(image) => println!("{}", image),
                    None => println!("no image available"),
                }
            }
        },
        Command::Images => {
            for image in session.candidate_images()? {
                println!("{}", image);
            }
        }
    }
    Ok(())
}

fn print_selected(session: &Session) {
    if let Some(record) = session.selected() {
        let image = session
            .image_for_selected()
            .ok()
            .flatten()
            .unwrap_or_else(|| "no image available".to_string());
        println!("{}  @ {}  [{}]", record, record.location, image);
    }
}
