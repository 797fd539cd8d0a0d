//! Command-line definition for `tasklane`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Tasklane - kanban boards in a JSON snapshot
///
/// Every mutating command loads the snapshot, applies one change and writes
/// it back.
#[derive(Parser, Debug)]
#[command(name = "tasklane")]
#[command(version)]
#[command(about = "Kanban boards kept in a local JSON snapshot")]
pub struct Cli {
    /// Snapshot file to read and write (overrides the config file)
    #[arg(long, global = true, value_name = "PATH")]
    pub snapshot: Option<PathBuf>,

    /// Enable debug logging to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a snapshot holding the demo workspace
    Init {
        /// Overwrite an existing snapshot
        #[arg(long)]
        force: bool,
    },
    /// Print a board with its lists and cards
    Show {
        /// Board to print; defaults to the active board
        board_id: Option<String>,
    },
    /// List every board, marking the active one
    Boards,
    /// Make a board the active board
    Use { board_id: String },
    /// Append a list to a board (activates the board)
    AddList { board_id: String, title: String },
    /// Append a card to a list
    AddCard {
        list_id: String,
        title: String,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Move a card to a position in a list of the same board
    MoveCard {
        card_id: String,
        list_id: String,
        position: usize,
    },
    /// Move a list to a position on its board
    MoveList { list_id: String, position: usize },
    /// Delete a card
    DeleteCard { card_id: String },
    /// Delete a list and its cards
    DeleteList { list_id: String },
    /// Apply a drag result given as JSON
    Drag {
        board_id: String,
        /// e.g. {"type":"card","source":{"containerId":"list-1","index":0},"destination":{...}}
        json: String,
    },
    /// Search cards across all boards
    Search {
        query: String,
        /// Print hits as JSON
        #[arg(long)]
        json: bool,
    },
}
