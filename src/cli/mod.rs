//! Command-line interface for quadro
//!
//! This module defines the CLI structure using clap derive macros. The
//! CLI is the thin collaborator around the core: every subcommand maps
//! onto one board or gesture operation, and mutating commands subscribe
//! the column renderer so the board re-renders after each change.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::board::Board;
use crate::config::Config;
use crate::error::Result;
use crate::output::OutputOptions;
use crate::storage::FileStore;

mod board;
mod transfer;
mod view;

pub use view::ColumnRenderer;

/// quadro - a task board in your terminal
///
/// Tasks move between the todo, progress, and done columns; the board
/// persists to a local snapshot after every change.
#[derive(Parser, Debug)]
#[command(name = "quadro")]
#[command(author, version, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a quadro.toml config file (defaults to ./quadro.toml)
    #[arg(long, global = true, env = "QUADRO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory for the board snapshot (overrides config)
    #[arg(long, global = true, env = "QUADRO_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

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
    /// Add a task to the todo column
    Add {
        /// Task description
        description: String,

        /// Urgency level: baixa, normal, urgente
        #[arg(long)]
        urgency: Option<String>,

        /// Priority: baixa, normal, urgente
        #[arg(long)]
        priority: Option<String>,

        /// Free-text details
        #[arg(long)]
        details: Option<String>,
    },

    /// List tasks
    Ls {
        /// Only one column: todo, progress, done
        #[arg(long)]
        status: Option<String>,

        /// Case-insensitive substring filter on descriptions
        #[arg(long)]
        search: Option<String>,
    },

    /// Render the three columns
    Board,

    /// Show one task in full
    Show {
        /// Task id
        id: i64,
    },

    /// Edit a task's description
    Edit {
        /// Task id
        id: i64,

        /// New description
        description: String,
    },

    /// Move a task to another column
    Status {
        /// Task id
        id: i64,

        /// Target column: todo, progress, done
        status: String,
    },

    /// Set a task's urgency level
    Urgency {
        /// Task id
        id: i64,

        /// Level: baixa, normal, urgente
        level: String,
    },

    /// Set a task's priority
    Priority {
        /// Task id
        id: i64,

        /// Level: baixa, normal, urgente
        level: String,
    },

    /// Replace a task's free-text details
    Details {
        /// Task id
        id: i64,

        /// Detail text (empty clears)
        text: String,
    },

    /// Delete a task
    Rm {
        /// Task id
        id: i64,
    },

    /// Reorder a task within the board
    Move {
        /// Task id
        id: i64,

        /// New zero-based position
        index: usize,
    },

    /// Drag a task onto a column (full begin -> drop gesture)
    Drag {
        /// Task id
        id: i64,

        /// Drop column: todo, progress, done
        column: String,
    },

    /// Remove every task from the board
    Clear,

    /// Per-column counts
    Stats,

    /// Export the board as a JSON array
    Export {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Replace the board from an exported JSON array
    Import {
        /// File holding the exported array
        file: PathBuf,
    },
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let options = OutputOptions {
            json: self.json,
            quiet: self.quiet,
        };
        let board = open_board(self.config.as_deref(), self.data_dir.clone())?;

        match self.command {
            Commands::Add {
                description,
                urgency,
                priority,
                details,
            } => board::run_add(board::AddOptions {
                description,
                urgency,
                priority,
                details,
                board,
                options,
            }),
            Commands::Ls { status, search } => view::run_ls(view::LsOptions {
                status,
                search,
                board,
                options,
            }),
            Commands::Board => view::run_board(&board, options),
            Commands::Show { id } => view::run_show(&board, id, options),
            Commands::Edit { id, description } => board::run_edit(board::EditOptions {
                id,
                description,
                board,
                options,
            }),
            Commands::Status { id, status } => board::run_status(board::StatusOptions {
                id,
                status,
                board,
                options,
            }),
            Commands::Urgency { id, level } => {
                board::run_level(board::LevelOptions {
                    id,
                    level,
                    axis: board::LevelAxis::Urgency,
                    board,
                    options,
                })
            }
            Commands::Priority { id, level } => {
                board::run_level(board::LevelOptions {
                    id,
                    level,
                    axis: board::LevelAxis::Priority,
                    board,
                    options,
                })
            }
            Commands::Details { id, text } => board::run_details(board::DetailsOptions {
                id,
                text,
                board,
                options,
            }),
            Commands::Rm { id } => board::run_rm(board, id, options),
            Commands::Move { id, index } => board::run_move(board, id, index, options),
            Commands::Drag { id, column } => board::run_drag(board::DragOptions {
                id,
                column,
                board,
                options,
            }),
            Commands::Clear => board::run_clear(board, options),
            Commands::Stats => view::run_stats(&board, options),
            Commands::Export { output } => transfer::run_export(&board, output, options),
            Commands::Import { file } => transfer::run_import(board, &file, options),
        }
    }
}

/// Load configuration and open the board on its snapshot store.
fn open_board(config_path: Option<&std::path::Path>, data_dir: Option<PathBuf>) -> Result<Board> {
    let config = match config_path {
        Some(path) => Config::load(path)?,
        None => Config::load_from_dir(&std::env::current_dir()?),
    };

    let dir = data_dir.or_else(|| config.storage.dir.clone());
    let store = match dir {
        Some(dir) => FileStore::new(dir, &config.storage.key),
        None => FileStore::in_default_dir(&config.storage.key)?,
    };

    Ok(Board::load(Box::new(store), config.board))
}
