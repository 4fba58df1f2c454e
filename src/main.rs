//! # homestead
//!
//! A farm task agenda for the terminal. Keep track of recurring chores,
//! date-specific jobs and a short daily diary, with a calendar and a
//! dashboard on top.
//!
//! ## Storage
//!
//! When `HOMESTEAD_REMOTE_URL` and `HOMESTEAD_REMOTE_KEY` hold a usable
//! endpoint and key, tasks are read from and written to the remote store.
//! Otherwise everything stays in your local data directory:
//! *   Linux: `~/.local/share/homestead/tasks.json`
//! *   macOS: `~/Library/Application Support/homestead/tasks.json`
//! *   Windows: `%LOCALAPPDATA%\homestead\tasks.json`
//!
//! You can override the directory with `HOMESTEAD_DATA_DIR`. The choice is
//! made once at startup. If the remote store cannot be read, the local copy
//! is shown instead; if a remote write fails, nothing is written locally.
//!
//! ## Usage
//!
//! ```bash
//! # Dated task
//! homestead add "Vaccinate calves" --category animals --urgency high --date 2025-03-10
//!
//! # Yearly task tied to a month
//! homestead add "Prune orchard" --category maintenance --recur yearly --month 7
//!
//! # Views
//! homestead dashboard
//! homestead list --urgency high --category animals
//! homestead calendar --offset 1
//!
//! # Diary
//! homestead log add "20mm of rain overnight"
//! ```
//!
//! Set `RUST_LOG=debug` to see each remote round trip.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use homestead::calendar::MonthRef;
use homestead::commands::*;
use homestead::config::StoreConfig;
use homestead::filters::{CategoryFilter, TaskFilter, UrgencyFilter};
use homestead::models::{Category, Recurrence, Urgency};
use homestead::repository::TaskRepository;

#[derive(Parser)]
#[command(name = "homestead")]
#[command(about = "Farm task agenda", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new task
    Add {
        /// Task title (quoted if it has spaces)
        title: String,
        /// Longer description
        #[arg(short = 'D', long)]
        description: Option<String>,
        /// planting, maintenance, animals or general
        #[arg(short, long, default_value = "general")]
        category: Category,
        /// low, medium or high
        #[arg(short, long, default_value = "medium")]
        urgency: Urgency,
        /// none, monthly or yearly
        #[arg(short, long, default_value = "none")]
        recur: Recurrence,
        /// Exact day in YYYY-MM-DD
        #[arg(short, long)]
        date: Option<String>,
        /// Month (1-12) for month-only tasks
        #[arg(short, long)]
        month: Option<u8>,
    },
    /// List tasks, newest first
    List {
        /// Urgency to show, or "all"
        #[arg(short, long, default_value = "all")]
        urgency: UrgencyFilter,
        /// Category to show, or "all"
        #[arg(short, long, default_value = "all")]
        category: CategoryFilter,
        /// Hide completed tasks
        #[arg(short, long)]
        pending: bool,
    },
    /// Tasks scheduled for today
    Today,
    /// High-urgency tasks still open
    Urgent,
    /// Mark a task as complete
    Done { id: String },
    /// Mark a task as pending again
    Undo { id: String },
    /// Flip a task between complete and pending
    Toggle { id: String },
    /// Remove a task
    Remove { id: String },
    /// Show a month grid
    Calendar {
        /// Month (1-12), defaults to the current one
        #[arg(short, long)]
        month: Option<u32>,
        /// Year, defaults to the current one
        #[arg(short, long)]
        year: Option<i32>,
        /// Months to move from the chosen month, e.g. -1 or 1
        #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
        offset: i32,
    },
    /// Overview of today's work
    Dashboard,
    /// Farm diary
    Log {
        #[command(subcommand)]
        command: LogCommands,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        shell: String,
    },
}

#[derive(Subcommand)]
enum LogCommands {
    /// Add a diary entry for today
    Add {
        /// Entry text
        text: String,
    },
    /// Show the latest entries
    List,
}

fn init_tracing() {
    let filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|raw| {
            let raw = raw.trim();
            if raw.is_empty() {
                return None;
            }
            EnvFilter::try_new(raw).ok()
        })
        .unwrap_or_else(|| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Some(Commands::Completions { shell }) = &cli.command {
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
        generate(shell_enum, &mut cmd, "homestead", &mut io::stdout());
        return;
    }

    let config = StoreConfig::from_env();
    let repo = TaskRepository::new(&config);

    match cli.command {
        Some(Commands::Add { title, description, category, urgency, recur, date, month }) => {
            let args = AddArgs { title, description, category, urgency, recurrence: recur, date, month };
            cmd_add(&repo, args, false).await;
        }
        Some(Commands::List { urgency, category, pending }) => {
            cmd_list(&repo, TaskFilter { urgency, category }, pending).await
        }
        Some(Commands::Today) => cmd_today(&repo).await,
        Some(Commands::Urgent) => cmd_urgent(&repo).await,
        Some(Commands::Done { id }) => cmd_set_done(&repo, &id, true, false).await,
        Some(Commands::Undo { id }) => cmd_set_done(&repo, &id, false, false).await,
        Some(Commands::Toggle { id }) => cmd_toggle(&repo, &id, false).await,
        Some(Commands::Remove { id }) => cmd_remove(&repo, &id, false).await,
        Some(Commands::Calendar { month, year, offset }) => {
            let current = MonthRef::current();
            let Some(base) = MonthRef::new(year.unwrap_or(current.year), month.unwrap_or(current.month)) else {
                eprintln!("Invalid month or year: months are 1-12.");
                return;
            };
            let Some(target) = base.shift(offset) else {
                eprintln!("Offset {offset} moves past the supported calendar range.");
                return;
            };
            cmd_calendar(&repo, target).await
        }
        Some(Commands::Log { command }) => match command {
            LogCommands::Add { text } => cmd_log_add(&repo, &text, false).await,
            LogCommands::List => cmd_log_list(&repo).await,
        },
        Some(Commands::Dashboard) | None => cmd_dashboard(&repo).await,
        Some(Commands::Completions { .. }) => {}
    }
}
