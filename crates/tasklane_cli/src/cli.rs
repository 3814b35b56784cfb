//! CLI argument definitions using clap derive macros.

use clap::{Parser, Subcommand, ValueEnum};

/// Terminal client for a remote todo service
#[derive(Parser)]
#[command(name = "tasklane", about, version, propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Base URL of the todo service. Uses TASKLANE_BASE_URL env if not set.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Output format: text (human-readable) or json (machine-readable)
    #[arg(short, long, global = true, default_value = "text")]
    pub output: OutputFormat,
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum OutputFormat {
    /// Colored terminal output for humans
    #[default]
    Text,
    /// Structured JSON for machine consumption
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the interactive TUI
    Tui,

    /// Manage todo lists
    Lists {
        #[command(subcommand)]
        action: ListsAction,
    },

    /// Manage the items of one list
    Items {
        #[command(subcommand)]
        action: ItemsAction,
    },

    /// Complete all pending items of a list (server-side bulk job)
    CompleteAll {
        /// List id
        list_id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Watch a previously started bulk job for a list
    Watch {
        /// List id
        list_id: String,
    },
}

#[derive(Subcommand)]
pub enum ListsAction {
    /// Show all todo lists
    List,
    /// Create a list
    Create {
        /// List name (1-100 characters)
        name: String,
    },
    /// Rename a list
    Rename {
        list_id: String,
        /// New name (1-100 characters)
        name: String,
    },
    /// Delete a list (the service deletes its items too)
    Delete { list_id: String },
}

#[derive(Subcommand)]
pub enum ItemsAction {
    /// Show the items of a list
    List { list_id: String },
    /// Add an item (starts Pending)
    Add {
        list_id: String,
        /// Item title (1-200 characters)
        title: String,
        /// Optional description (up to 500 characters)
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Edit an item's title or description
    Edit {
        list_id: String,
        item_id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Mark an item Completed, or Pending again with --undo
    Done {
        list_id: String,
        item_id: String,
        #[arg(long)]
        undo: bool,
    },
    /// Delete an item
    Delete { list_id: String, item_id: String },
}
