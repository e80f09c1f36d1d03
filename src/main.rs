//! # Qara
//!
//! A personal task manager with a gamified profile. Every task has a title,
//! description, due date, location and status (In Progress, Completed or
//! Cancelled). Completed and in-progress tasks earn XP that drives a level,
//! and the calendar view shows what falls on each day.
//!
//! ## Usage
//!
//! ```bash
//! # Add a task (due date defaults to now)
//! qara add "Buy groceries" -d "Milk and bread" -l "Main St 4" --at "2025-12-01 18:00"
//!
//! # Location from coordinates
//! qara add "Run" -d "5k loop" --lat 43.238 --lng 76.945
//!
//! # List, sorted and filtered
//! qara list --sort status --filter completed
//!
//! # Change status, edit, delete
//! qara status <ID> completed
//! qara edit <ID> --title "Buy more groceries"
//! qara remove <ID>
//!
//! # Profile statistics and calendar
//! qara stats
//! qara calendar 2025-12-01
//! ```
//!
//! ## Data Storage
//!
//! Data is saved in your local data directory, one JSON file per key
//! (`tasks.json`, `profile.json`, `avatarUri.json`, `darkMode.json`):
//! *   Linux: `~/.local/share/qara/`
//! *   macOS: `~/Library/Application Support/qara/`
//! *   Windows: `%APPDATA%\qara\`
//!
//! You can override this with `--data-dir` or the `QARA_DATA_DIR`
//! environment variable. Set `RUST_LOG` (or pass `-v`) for diagnostics.

use std::io;
use std::path::PathBuf;

use clap::builder::BoolishValueParser;
use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use log::debug;

use qara::commands::*;
use qara::geocode::NoGeocoder;
use qara::models::{parse_date_input, SortKey, StatusFilter, TaskId, TaskPatch, TaskStatus};
use qara::storage::{data_dir, FileStore, TaskStore};

#[derive(Parser)]
#[command(name = "qara")]
#[command(about = "Personal task manager with XP and levels", long_about = None)]
struct Cli {
    /// Directory holding the data files
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new task
    Add {
        /// Task title (quoted if it has spaces)
        title: String,
        /// Task description
        #[arg(short, long)]
        description: String,
        /// Due date in "yyyy-MM-dd HH:mm" (defaults to now)
        #[arg(short, long)]
        at: Option<String>,
        /// Address text
        #[arg(short, long, conflicts_with_all = ["lat", "lng"])]
        location: Option<String>,
        /// Latitude of the picked location
        #[arg(long, requires = "lng", allow_negative_numbers = true)]
        lat: Option<f64>,
        /// Longitude of the picked location
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lng: Option<f64>,
    },
    /// List tasks
    List {
        /// Sort field
        #[arg(short, long, value_enum, default_value_t = SortKey::Date)]
        sort: SortKey,
        /// All, or a status (in-progress, completed, cancelled)
        #[arg(short, long, default_value = "All")]
        filter: StatusFilter,
    },
    /// Show a single task
    Show {
        id: String,
    },
    /// Change the status of a task
    Status {
        id: String,
        /// in-progress, completed or cancelled
        status: TaskStatus,
    },
    /// Edit a task
    Edit {
        id: String,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        /// New due date in "yyyy-MM-dd HH:mm"
        #[arg(short, long)]
        at: Option<String>,
        #[arg(short, long)]
        location: Option<String>,
        #[arg(short, long)]
        status: Option<TaskStatus>,
    },
    /// Remove a task
    Remove {
        id: String,
    },
    /// Show level, XP and weekly activity
    Stats,
    /// Show tasks per day, or the tasks of one day (yyyy-MM-dd)
    Calendar {
        date: Option<String>,
    },
    /// Show or edit the profile
    Profile {
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        email: Option<String>,
    },
    /// Set the avatar image reference
    Avatar {
        uri: String,
    },
    /// Turn dark mode on or off
    DarkMode {
        #[arg(action = ArgAction::Set, value_parser = BoolishValueParser::new())]
        enabled: bool,
    },
    /// Delete all tasks
    Clear {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        shell: String,
    },
}

fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    if let Commands::Completions { shell } = &cli.command {
        let shell_enum = match shell.as_str() {
            "bash" => Shell::Bash,
            "zsh" => Shell::Zsh,
            "fish" => Shell::Fish,
            "powershell" => Shell::PowerShell,
            "elvish" => Shell::Elvish,
            _ => {
                eprintln!("Unsupported shell: {}", shell);
                return;
            }
        };
        let mut cmd = Cli::command();
        generate(shell_enum, &mut cmd, "qara", &mut io::stdout());
        return;
    }

    let dir = cli.data_dir.unwrap_or_else(data_dir);
    debug!("main: data_dir={}", dir.display());
    let mut store = match FileStore::open(&dir) {
        Ok(s) => TaskStore::new(s),
        Err(e) => {
            eprintln!("Cannot open data directory {}: {}", dir.display(), e);
            std::process::exit(1);
        }
    };

    match cli.command {
        Commands::Add { title, description, at, location, lat, lng } => {
            let coords = lat.zip(lng);
            cmd_add(&mut store, title, description, at, location, coords, &NoGeocoder, false);
        }
        Commands::List { sort, filter } => cmd_list(&store, sort, filter),
        Commands::Show { id } => cmd_show(&store, &TaskId::from(id)),
        Commands::Status { id, status } => cmd_status(&mut store, &TaskId::from(id), status, false),
        Commands::Edit { id, title, description, at, location, status } => {
            let date = match at.as_deref().map(parse_date_input).transpose() {
                Ok(d) => d,
                Err(e) => {
                    eprintln!("{}", e);
                    return;
                }
            };
            let patch = TaskPatch { title, description, date, location, status };
            cmd_edit(&mut store, &TaskId::from(id), patch, false);
        }
        Commands::Remove { id } => cmd_remove(&mut store, &TaskId::from(id), false),
        Commands::Stats => cmd_stats(&store),
        Commands::Calendar { date } => cmd_calendar(&store, date),
        Commands::Profile { name, email } => cmd_profile(&mut store, name, email, false),
        Commands::Avatar { uri } => cmd_avatar(&mut store, uri, false),
        Commands::DarkMode { enabled } => cmd_dark_mode(&mut store, enabled, false),
        Commands::Clear { force } => cmd_clear(&mut store, force),
        Commands::Completions { .. } => {}
    }
}
