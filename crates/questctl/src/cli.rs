//! CLI - command-line argument parsing
//!
//! Defines the clap structure only; execution lives in `commands`.

use clap::{Parser, Subcommand};

/// Questlog CLI
#[derive(Parser)]
#[command(name = "questctl")]
#[command(about = "Questlog - habit tracking with XP, streaks and rewards", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Data directory (overrides $QUESTLOG_DIR and defaults)
    #[arg(long, global = true)]
    pub data_dir: Option<String>,

    /// Profile to operate on
    #[arg(long, global = true, default_value = "local")]
    pub user: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show level, XP totals and streaks
    Status {
        /// Output JSON only
        #[arg(long)]
        json: bool,
    },

    /// Manage XP-earning activities
    Activity {
        #[command(subcommand)]
        action: ActivityCommands,
    },

    /// Manage todos
    Todo {
        #[command(subcommand)]
        action: TodoCommands,
    },

    /// Manage journal entries and prompts
    Journal {
        #[command(subcommand)]
        action: JournalCommands,
    },

    /// Manage rewards
    Reward {
        #[command(subcommand)]
        action: RewardCommands,
    },

    /// Create the starter activity catalogue for this profile
    Seed,
}

#[derive(Subcommand)]
pub enum ActivityCommands {
    /// Create an activity
    Add {
        name: String,
        /// XP per completion (fixed at creation)
        #[arg(long)]
        xp: u64,
        /// "core" or "bonus"
        #[arg(long, default_value = "core")]
        kind: String,
        #[arg(long, default_value = "general")]
        category: String,
        /// Max completions per day (core activities)
        #[arg(long)]
        cap: Option<u32>,
    },
    /// List activities with streaks
    List,
    /// Record a completion
    Done {
        id: String,
        /// Completion day, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Delete an activity and its completion history
    Rm { id: String },
}

#[derive(Subcommand)]
pub enum TodoCommands {
    /// Create a todo
    Add {
        title: String,
        /// "morning", "general" or "evening"
        #[arg(long, default_value = "general")]
        category: String,
        /// "none", "daily", "weekly" or "monthly"
        #[arg(long, default_value = "none")]
        recur: String,
    },
    /// List todos, newest first
    List,
    /// Flip a todo's completion
    Toggle { id: String },
    /// Delete a todo
    Rm { id: String },
}

#[derive(Subcommand)]
pub enum JournalCommands {
    /// Write an entry for a day
    Write {
        title: String,
        content: String,
        /// Entry day, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<String>,
        /// Mood on a 1-5 scale
        #[arg(long)]
        mood: Option<u8>,
        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,
    },
    /// List entries, most recent day first
    List,
    /// Add a reusable writing prompt
    Prompt {
        text: String,
        #[arg(long, default_value = "reflection")]
        category: String,
    },
    /// List writing prompts
    Prompts,
}

#[derive(Subcommand)]
pub enum RewardCommands {
    /// Create a reward gate
    Add {
        name: String,
        /// Level this reward represents
        #[arg(long)]
        level: u32,
        /// Lifetime-XP threshold
        #[arg(long)]
        xp: u64,
        #[arg(long, default_value = "")]
        desc: String,
    },
    /// List rewards by level
    List,
    /// Claim a reward (one-way)
    Claim { id: String },
    /// Show the next milestone still out of reach
    Next,
}
