use clap::{Parser, Subcommand};
use jiff::Timestamp;
use std::path::PathBuf;

pub const STATE_FILE_ENV: &str = "LINKMINT_STATE_FILE";
pub const FALLBACK_BASE_ENV: &str = "LINKMINT_FALLBACK_BASE";

pub const DEFAULT_STATE_FILE: &str = "linkmint-history.json";

#[derive(Debug, Parser)]
#[command(name = "linkmint")]
pub struct CLI {
    /// Where the shortening history is persisted.
    #[arg(long, env = STATE_FILE_ENV, default_value = DEFAULT_STATE_FILE, global = true)]
    pub state_file: PathBuf,

    /// Base domain of locally synthesized fallback short links.
    #[arg(long, env = FALLBACK_BASE_ENV, global = true)]
    pub fallback_base: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shorten a URL, fetch its page metadata, and record it in the history.
    Shorten {
        url: String,

        /// Race all providers instead of trying them in priority order.
        #[arg(long)]
        race: bool,

        /// Print the full history entry as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Inspect or edit the shortening history.
    History {
        #[command(subcommand)]
        command: HistoryCommand,
    },

    /// Follow a short link's redirects to the destination URL.
    Expand { short_url: String },

    /// Print a QR code image URL for a link.
    Qr {
        url: String,

        /// Image edge length in pixels.
        #[arg(long, default_value_t = 200)]
        size: u32,
    },
}

#[derive(Debug, Subcommand)]
pub enum HistoryCommand {
    /// List entries, most recent first.
    List {
        #[arg(long)]
        json: bool,
    },

    /// Remove the entry matching a short URL and its timestamp.
    Delete {
        short_url: String,
        timestamp: Timestamp,
    },

    /// Remove every entry and reset all click counters.
    Clear,
}
