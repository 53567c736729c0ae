//! Command-line interface for todo
//!
//! This module defines the CLI structure using clap derive macros.
//! Item commands live in `item`, reporting commands in `report`.

use std::path::PathBuf;

use chrono::Local;
use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::error::Result;
use crate::output::OutputOptions;
use crate::store::FileStore;
use crate::tracker::Tracker;

mod item;
mod report;

/// todo - a single-user to-do tracker
///
/// Track items with a status, a priority and an optional due date, list
/// them with search, filters and sorting, and review completion statistics.
#[derive(Parser, Debug)]
#[command(name = "todo")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Item snapshot file (defaults to `store` in config, then the data dir)
    #[arg(long, global = true, env = "TODO_STORE")]
    pub store: Option<PathBuf>,

    /// Config file (defaults to ./.todo.toml)
    #[arg(long, global = true, env = "TODO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an item
    Add {
        /// Item title
        title: String,

        /// Longer description
        #[arg(short, long)]
        description: Option<String>,

        /// Initial status: not_started, in_progress, completed
        #[arg(long)]
        status: Option<String>,

        /// Priority: low, medium, high
        #[arg(long)]
        priority: Option<String>,

        /// Due date (RFC 3339); defaults to one day from now
        #[arg(long, conflicts_with = "no_due")]
        due: Option<String>,

        /// Create the item without a due date
        #[arg(long)]
        no_due: bool,
    },

    /// List items
    List {
        /// Case-insensitive text matched against title and description
        #[arg(short, long)]
        search: Option<String>,

        /// Only items with this status
        #[arg(long)]
        status: Option<String>,

        /// Only items with this priority
        #[arg(long)]
        priority: Option<String>,

        /// Sort key: due_date, priority, title, status
        #[arg(long)]
        sort: Option<String>,

        /// Show at most this many items
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show one item
    Show {
        /// Item id or unique prefix
        id: String,
    },

    /// Edit an item
    Edit {
        /// Item id or unique prefix
        id: String,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New description
        #[arg(short, long)]
        description: Option<String>,

        /// New status
        #[arg(long)]
        status: Option<String>,

        /// New priority
        #[arg(long)]
        priority: Option<String>,

        /// New due date (RFC 3339)
        #[arg(long, conflicts_with = "no_due")]
        due: Option<String>,

        /// Clear the due date
        #[arg(long)]
        no_due: bool,
    },

    /// Set an item's status
    Status {
        /// Item id or unique prefix
        id: String,

        /// not_started, in_progress or completed
        status: String,
    },

    /// Mark an item completed
    Complete {
        /// Item id or unique prefix
        id: String,
    },

    /// Start a not-started item
    Start {
        /// Item id or unique prefix
        id: String,
    },

    /// Delete an item
    Rm {
        /// Item id or unique prefix
        id: String,
    },

    /// Completion statistics
    Stats {
        /// Days in the completion trend (defaults to config)
        #[arg(long)]
        days: Option<u32>,
    },

    /// Load sample items into an empty store
    Seed {
        /// Load them even when the store has items
        #[arg(long)]
        force: bool,
    },
}

/// Loaded config, opened tracker and output mode shared by every command.
pub(crate) struct Context {
    pub config: Config,
    pub tracker: Tracker<FileStore>,
    pub output: OutputOptions,
}

impl Cli {
    fn load_context(&self, allow_seed: bool) -> Result<Context> {
        let config = Config::load_or_default(self.config.as_deref())?;
        let store_path = config.store_path(self.store.as_deref())?;
        let mut tracker = Tracker::open(FileStore::new(store_path))?;
        if allow_seed && config.seed.on_empty {
            tracker.seed_if_empty(&Local::now())?;
        }
        Ok(Context {
            config,
            tracker,
            output: OutputOptions {
                json: self.json,
                quiet: self.quiet,
            },
        })
    }

    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let allow_seed = !matches!(self.command, Commands::Seed { .. });
        let ctx = self.load_context(allow_seed)?;
        match self.command {
            Commands::Add {
                title,
                description,
                status,
                priority,
                due,
                no_due,
            } => item::run_add(
                ctx,
                item::AddOptions {
                    title,
                    description,
                    status,
                    priority,
                    due,
                    no_due,
                },
            ),
            Commands::List {
                search,
                status,
                priority,
                sort,
                limit,
            } => item::run_list(
                ctx,
                item::ListOptions {
                    search,
                    status,
                    priority,
                    sort,
                    limit,
                },
            ),
            Commands::Show { id } => item::run_show(ctx, &id),
            Commands::Edit {
                id,
                title,
                description,
                status,
                priority,
                due,
                no_due,
            } => item::run_edit(
                ctx,
                item::EditOptions {
                    id,
                    title,
                    description,
                    status,
                    priority,
                    due,
                    no_due,
                },
            ),
            Commands::Status { id, status } => item::run_status(ctx, &id, &status),
            Commands::Complete { id } => item::run_complete(ctx, &id),
            Commands::Start { id } => item::run_start(ctx, &id),
            Commands::Rm { id } => item::run_rm(ctx, &id),
            Commands::Stats { days } => report::run_stats(ctx, days),
            Commands::Seed { force } => report::run_seed(ctx, force),
        }
    }
}
