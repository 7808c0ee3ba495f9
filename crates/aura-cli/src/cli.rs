//! Command-line argument definitions.

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use aura_core::VERSION;

/// High Aura - a private, offline personal log with strict-mode
/// access control and encrypted backups
#[derive(Parser)]
#[command(name = "aura")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the database file
    #[arg(short, long, global = true, env = "AURA_DB")]
    pub db: Option<String>,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and default settings
    Init,

    /// Show honor, mode, anchors, and contract state
    Status,

    /// Append or list domain events
    #[command(subcommand)]
    Event(EventCommands),

    /// Log a mood check-in
    Mood {
        /// Energy, 1-5
        #[arg(long, default_value_t = 3)]
        energy: u8,
        /// Stress, 1-5 (4+ also starts a PUR-90 cycle)
        #[arg(long, default_value_t = 3)]
        stress: u8,
        /// Focus, 1-5
        #[arg(long, default_value_t = 3)]
        focus: u8,
        /// Libido, 1-5
        #[arg(long, default_value_t = 3)]
        libido: u8,
    },

    /// Strict mode controls
    #[command(subcommand)]
    Strict(StrictCommands),

    /// Record a critical violation (forces strict mode, costs honor)
    Violation {
        /// Violation kind, e.g. "pornografia" or "aposta"
        #[arg(value_name = "KIND")]
        kind: String,
    },

    /// Contract controls
    #[command(subcommand)]
    Contract(ContractCommands),

    /// Background audio asset
    #[command(subcommand)]
    Audio(AudioCommands),

    /// Progress photos
    #[command(subcommand)]
    Photo(PhotoCommands),

    /// Show or change settings
    #[command(subcommand)]
    Settings(SettingsCommands),

    /// Export an encrypted backup of the whole log
    Export {
        /// Output file (default: high-aura-backup-<date>.bin)
        #[arg(long, value_name = "FILE")]
        out: Option<String>,
    },

    /// Import an encrypted backup (appends all events, replaces settings)
    Import {
        /// Backup file to import
        #[arg(value_name = "FILE")]
        file: String,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_name = "SHELL")]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum EventCommands {
    /// Append an event
    Add {
        /// Event type tag (e.g. block_completed, sleep_logged)
        #[arg(value_name = "TYPE")]
        event_type: String,

        /// JSON payload
        #[arg(long, value_name = "JSON")]
        data: Option<String>,
    },

    /// List events
    List {
        /// Only events at or after this ISO-8601 date/time
        #[arg(long)]
        since: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum StrictCommands {
    /// Enter strict mode
    On,

    /// Leave strict mode (asks for the PIN)
    Exit {
        /// PIN (prompted if omitted)
        #[arg(long)]
        pin: Option<String>,
    },

    /// Set the strict-mode PIN (4-8 digits; admin only)
    SetPin {
        /// New PIN (prompted if omitted)
        #[arg(long)]
        pin: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ContractCommands {
    /// Sign the contract
    Sign,

    /// Renew the contract
    Renew,

    /// Show contract validity
    Status,
}

#[derive(Subcommand)]
pub enum AudioCommands {
    /// Upload (replace) the audio file
    Upload {
        /// Audio file
        #[arg(value_name = "FILE")]
        file: String,

        /// MIME type (guessed from the extension if omitted)
        #[arg(long)]
        mime: Option<String>,
    },

    /// Arm audio for autoplay on next open
    Arm,

    /// Toggle audio on/off
    Toggle,
}

#[derive(Subcommand)]
pub enum PhotoCommands {
    /// Add a progress photo
    Add {
        /// Angle: front, side, or back
        #[arg(value_name = "KIND")]
        kind: String,

        /// Image file
        #[arg(value_name = "FILE")]
        file: String,
    },

    /// Show the photo timeline for an angle
    Timeline {
        /// Angle: front, side, or back
        #[arg(value_name = "KIND")]
        kind: String,

        /// Maximum photos to list
        #[arg(long, default_value_t = 12)]
        limit: usize,
    },
}

#[derive(Subcommand)]
pub enum SettingsCommands {
    /// Print the current settings
    Show,

    /// Change one settings field (admin only)
    Set {
        /// Field: wake, lunch, sleep, kcal, protein, fat, carbs
        #[arg(value_name = "FIELD")]
        field: String,

        /// New value (HH:MM for anchors, numbers otherwise)
        #[arg(value_name = "VALUE")]
        value: String,
    },
}
