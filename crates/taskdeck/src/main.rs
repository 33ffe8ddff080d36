//! CLI entry point for taskdeck.

use std::ffi::OsString;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use taskdeck_app::{AppConfig, Notifier, Store, TokioScheduler, TracingNotifier};
use taskdeck_store_fs::JsonFileStore;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

mod commands;

/// Environment variable overriding the data directory.
const DATA_DIR_ENV: &str = "TASKDECK_DATA_DIR";

/// Local to-do lists with groups, sub-tasks and tags.
#[derive(Parser, Debug)]
#[command(
    name = "taskdeck",
    version,
    about = "taskdeck: to-do lists stored as a JSON document on local disk"
)]
struct Cli {
    /// Directory holding the board and config.toml.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

/// Tasks, groups and sub-tasks are addressed by id or by 1-based position.
#[derive(Subcommand, Debug)]
enum Command {
    /// Show the board.
    Ls {
        /// Print the raw board as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Add a standalone task.
    Add {
        title: String,
        /// Predefined tag (easy, medium, hard) or a custom label.
        #[arg(long)]
        tag: Option<String>,
        #[arg(long)]
        progress: Option<u8>,
        /// Create the task already completed.
        #[arg(long)]
        done: bool,
    },

    /// Flip a task between open and completed.
    Toggle { task: String },

    /// Delete a task and its sub-tasks.
    Rm { task: String },

    /// Retitle a task.
    Edit { task: String, title: String },

    /// Set progress (rounded to steps of 5) or clear it when omitted.
    Progress { task: String, value: Option<u8> },

    /// Tag a task.
    Tag { task: String, tag: String },

    /// Remove a task's tag.
    Untag { task: String },

    /// Move a task from one position to another.
    Mv { from: usize, to: usize },

    /// Move a task into a group; progress, tag and sub-tasks are dropped.
    ToGroup { task: String, group: String },

    /// Sub-task commands.
    #[command(subcommand)]
    Sub(SubCommand),

    /// Group commands.
    #[command(subcommand)]
    Group(GroupCommand),

    /// Completion counters.
    Stats,

    /// Write a backup document.
    Export {
        /// Destination (defaults to taskdeck-backup-<date>.json in the current directory).
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Replace the board with a backup document.
    Import { path: PathBuf },

    /// Delete everything.
    Clear {
        /// Confirm the wipe.
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
enum SubCommand {
    /// Add a sub-task.
    Add { task: String, title: String },
    /// Flip a sub-task.
    Toggle { task: String, sub: String },
    /// Retitle a sub-task.
    Rename {
        task: String,
        sub: String,
        title: String,
    },
    /// Delete a sub-task.
    Rm { task: String, sub: String },
    /// Move a sub-task from one position to another.
    Mv { task: String, from: usize, to: usize },
    /// Show or hide a task's sub-tasks in `ls`.
    Show { task: String },
}

#[derive(Subcommand, Debug)]
enum GroupCommand {
    /// Create a group.
    Add { title: String },
    /// Delete a group with its tasks.
    Rm { group: String },
    /// Retitle a group.
    Rename { group: String, title: String },
    /// Collapse or expand a group.
    Collapse { group: String },
    /// Flip a task inside a group.
    Toggle { group: String, task: String },
    /// Add a task directly to a group.
    AddTask { group: String, title: String },
    /// Remove a task from a group.
    RmTask { group: String, task: String },
    /// Move a group from one position to another.
    Mv { from: usize, to: usize },
    /// Move a task inside a group.
    MvTask { group: String, from: usize, to: usize },
}

fn main() -> Result<()> {
    let Cli { data_dir, cmd } = Cli::parse();
    install_tracing();

    let data_dir = resolve_data_dir(data_dir, std::env::var_os(DATA_DIR_ENV), dirs::data_dir())?;
    execute_command(&data_dir, cmd)
}

fn execute_command(data_dir: &std::path::Path, command: Command) -> Result<()> {
    let config = AppConfig::load(data_dir)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("failed to start notification runtime")?;

    let notifier: Arc<dyn Notifier> = Arc::new(TracingNotifier);
    let scheduler = Arc::new(TokioScheduler::new(
        runtime.handle().clone(),
        Arc::clone(&notifier),
    ));
    let mut store = Store::open(
        JsonFileStore::at(config.state_path(data_dir)),
        notifier,
        Arc::clone(&scheduler),
        config.notification_settings(),
    )?;

    let outcome = commands::run(command, &mut store, &mut io::stdout().lock());
    runtime.block_on(scheduler.settle());
    outcome
}

fn resolve_data_dir(
    flag: Option<PathBuf>,
    env: Option<OsString>,
    platform: Option<PathBuf>,
) -> Result<PathBuf> {
    flag.or_else(|| env.filter(|value| !value.is_empty()).map(PathBuf::from))
        .or_else(|| platform.map(|dir| dir.join("taskdeck")))
        .ok_or_else(|| anyhow!("cannot determine a data directory; pass --data-dir or set {DATA_DIR_ENV}"))
}

fn install_tracing() {
    // RUST_LOG is honoured; INFO is always enabled so notices reach the terminal.
    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_span_events(FmtSpan::NONE)
        .compact()
        .try_init();
}
