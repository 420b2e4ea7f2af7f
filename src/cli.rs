//! CLI argument parsing for todograph.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "td",
    about = "Todo lists with blocking, parent/child and related tasks",
    version,
    after_help = "Logs are written to: ~/.local/share/todograph/logs/todograph.log"
)]
pub struct Cli {
    /// Path to the store directory (default: current directory)
    #[arg(short = 'd', long, global = true)]
    pub dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Initialize a new store in the current directory
    Init,

    /// Create a new task list
    NewList {
        /// List name
        name: String,
    },

    /// Show all task lists
    Lists,

    /// Add a task to a list
    Add {
        /// List name or ID
        list: String,

        /// Task title
        title: String,

        /// Description
        #[arg(short = 'D', long)]
        description: Option<String>,
    },

    /// Show the tasks of a list
    Show {
        /// List name or ID
        list: String,
    },

    /// Show a task and its relationships
    Get {
        /// List name or ID
        list: String,

        /// Task ID
        id: String,
    },

    /// Add a blocking dependency
    Block {
        /// List name or ID
        list: String,

        /// Task that is blocked
        blocked_id: String,

        /// Task that is blocking (must be completed first)
        blocker_id: String,
    },

    /// Remove a blocking dependency
    Unblock {
        /// List name or ID
        list: String,

        /// Task that is blocked
        blocked_id: String,

        /// Task that is blocking
        blocker_id: String,
    },

    /// Make a task the child of another
    Child {
        /// List name or ID
        list: String,

        /// Parent task
        parent_id: String,

        /// Child task
        child_id: String,
    },

    /// Detach a child from its parent
    Unchild {
        /// List name or ID
        list: String,

        /// Parent task
        parent_id: String,

        /// Child task
        child_id: String,
    },

    /// Relate two tasks
    Relate {
        /// List name or ID
        list: String,

        first_id: String,

        second_id: String,
    },

    /// Remove a relation between two tasks
    Unrelate {
        /// List name or ID
        list: String,

        first_id: String,

        second_id: String,
    },

    /// Remove a task, detaching it from its partners
    Rm {
        /// List name or ID
        list: String,

        /// Task ID
        id: String,
    },

    /// Drop superseded snapshots from the store file
    Compact,
}
