use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Keep a log of your dates and matches, and mirror dates into Google Calendar
#[derive(Parser, Debug)]
#[command(name = "datetrack", version, about, long_about = None)]
pub struct Cli {
    /// Use this config file instead of the default one
    #[arg(global = true, long = "config")]
    pub config: Option<PathBuf>,

    /// Override the database path from the config
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log a date
    Add {
        /// Where the date took place
        location: String,

        /// Date (YYYY-MM-DD), not in the future
        #[arg(long)]
        date: String,

        /// Start time (HH:MM)
        #[arg(long)]
        time: String,

        /// Coffee, Dinner, Walk, Drinks, Activity or any other label
        #[arg(long = "type", default_value = "Coffee")]
        date_type: String,

        /// Great, Good, Okay, "No spark" or any other label
        #[arg(long, default_value = "Okay")]
        outcome: String,

        /// Rating from 0 to 5
        #[arg(long, default_value_t = 3)]
        rating: u8,

        #[arg(long)]
        notes: Option<String>,
    },

    /// List logged dates, newest first
    List {
        #[arg(long = "type")]
        date_type: Option<String>,

        #[arg(long)]
        outcome: Option<String>,

        /// Text to look for in location and notes
        #[arg(long)]
        search: Option<String>,

        #[arg(long)]
        min_rating: Option<u8>,
    },

    /// Show date and match statistics
    Stats,

    /// Delete a logged date and its calendar event
    Delete {
        id: String,

        /// Only delete locally, leave the calendar event in place
        #[arg(long)]
        local_only: bool,
    },

    /// Track opening messages on dating apps
    Match {
        #[command(subcommand)]
        action: MatchCommand,
    },

    /// Write all dates as JSON
    Export {
        /// Output file (stdout when omitted)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Read dates from a JSON export
    Import { file: PathBuf },

    /// Store a Google access token for calendar sync
    Login {
        /// OAuth access token with calendar scope
        #[arg(long)]
        token: String,

        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        avatar: Option<String>,

        /// Token lifetime in seconds
        #[arg(long)]
        expires_in: Option<i64>,

        /// Granted scope (repeatable)
        #[arg(long = "scope")]
        scopes: Vec<String>,
    },

    /// Forget the stored session
    Logout,

    /// Push all logged dates to Google Calendar
    Sync,

    /// List events this app put on the calendar
    Events {
        /// Only show events within this many days
        #[arg(long)]
        days: Option<i64>,
    },

    /// Show session, sync and config state
    Status,
}

#[derive(Subcommand, Debug)]
pub enum MatchCommand {
    /// Log an opening message
    Add {
        /// Dating app name
        app: String,

        #[arg(long)]
        message: String,

        /// Flirty, Funny, Compliment or Question
        #[arg(long, default_value = "Question")]
        style: String,

        #[arg(long)]
        replied: bool,

        /// How long the reply took, free text
        #[arg(long)]
        reply_time: Option<String>,

        /// Ghosted, "Number Exchanged", Unmatched or Date
        #[arg(long, default_value = "Ghosted")]
        outcome: String,
    },

    /// List logged messages
    List,
}
