//! Command-line interface for taskpad
//!
//! This module defines the CLI structure using clap derive macros.
//! Command implementations live in [`task`].

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{self, Config};
use crate::error::Result;
use crate::output::OutputOptions;

mod task;

/// taskpad - a local to-do list
///
/// Tasks and the active filter are kept in a data directory and survive
/// between runs.
#[derive(Parser, Debug)]
#[command(name = "taskpad")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Data directory holding tasks.json and taskFilter.json
    #[arg(long, global = true, env = "TASKPAD_DIR")]
    pub dir: Option<PathBuf>,

    /// Path to config.toml (defaults to the platform config directory)
    #[arg(long, global = true, env = "TASKPAD_CONFIG")]
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
    /// Add a new task
    Add {
        /// Task title (words are joined with spaces)
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,

        /// Priority: low, medium, high
        #[arg(short, long)]
        priority: Option<String>,
    },

    /// List tasks matching the active filter
    #[command(alias = "ls")]
    List {
        /// Show this filter once without changing the saved one
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// Show a single task
    Show {
        /// Task id or unique prefix
        id: String,
    },

    /// Mark a task completed, or pending again
    Toggle {
        /// Task id or unique prefix
        id: String,
    },

    /// Change a task's title
    Edit {
        /// Task id or unique prefix
        id: String,

        /// New title (words are joined with spaces)
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,
    },

    /// Change a task's priority
    Priority {
        /// Task id or unique prefix
        id: String,

        /// Priority: low, medium, high
        priority: String,
    },

    /// Delete a task
    #[command(alias = "delete")]
    Rm {
        /// Task id or unique prefix
        id: String,
    },

    /// Show or set the saved filter
    Filter {
        /// Filter: all, completed, pending
        status: Option<String>,
    },

    /// Count tasks matching the active filter
    Count {
        /// Count with this filter instead of the saved one
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// Show totals and completion progress
    Stats,
}

impl Commands {
    /// Command name as reported in JSON envelopes
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Add { .. } => "add",
            Commands::List { .. } => "list",
            Commands::Show { .. } => "show",
            Commands::Toggle { .. } => "toggle",
            Commands::Edit { .. } => "edit",
            Commands::Priority { .. } => "priority",
            Commands::Rm { .. } => "rm",
            Commands::Filter { .. } => "filter",
            Commands::Count { .. } => "count",
            Commands::Stats => "stats",
        }
    }
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let config_path = self.config.clone().or_else(config::default_config_path);
        let config = Config::load_or_default(config_path.as_deref());
        let env = task::Env {
            data_dir: config.data_dir(self.dir.as_deref()),
            lock_timeout_ms: config.storage.lock_timeout_ms,
            default_priority: config.tasks.default_priority,
            output: OutputOptions {
                json: self.json,
                quiet: self.quiet,
            },
        };
        tracing::debug!(data_dir = %env.data_dir.display(), command = self.command.name(), "running");

        match self.command {
            Commands::Add { title, priority } => task::run_add(
                &env,
                task::AddOptions {
                    title: title.join(" "),
                    priority,
                },
            ),
            Commands::List { filter } => task::run_list(&env, task::ListOptions { filter }),
            Commands::Show { id } => task::run_show(&env, &id),
            Commands::Toggle { id } => task::run_toggle(&env, &id),
            Commands::Edit { id, title } => task::run_edit(
                &env,
                task::EditOptions {
                    id,
                    title: title.join(" "),
                },
            ),
            Commands::Priority { id, priority } => {
                task::run_priority(&env, task::PriorityOptions { id, priority })
            }
            Commands::Rm { id } => task::run_rm(&env, &id),
            Commands::Filter { status } => task::run_filter(&env, status.as_deref()),
            Commands::Count { filter } => task::run_count(&env, filter.as_deref()),
            Commands::Stats => task::run_stats(&env),
        }
    }
}
