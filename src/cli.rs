//! CLI argument parsing for Curio.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::core::discovery::catalog::GLOBAL;
use crate::core::persona::StudentLevel;

#[derive(Debug, Parser)]
#[command(
    name = "curio",
    about = "Learn any topic over a coffee chat with a famous expert",
    version,
    after_help = "Logs are written to the `logs` folder of the data directory."
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, env = "CURIO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create or look up a learner and print their id
    Login {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long, default_value = GLOBAL)]
        region: String,
    },

    /// Suggest expert personas for a topic
    Experts {
        #[arg(short, long)]
        topic: String,

        /// Region or country to draw experts from
        #[arg(short, long, default_value = GLOBAL)]
        region: String,

        /// Let the model research candidates with tools before answering
        #[arg(short, long)]
        agentic: bool,
    },

    /// Chat with a persona tutor
    Chat {
        /// Learner id printed by `curio login`
        #[arg(short, long)]
        user: String,

        #[arg(short, long, required_unless_present = "resume")]
        topic: Option<String>,

        #[arg(short, long, required_unless_present = "resume")]
        persona: Option<String>,

        #[arg(short, long, default_value = GLOBAL)]
        region: String,

        #[arg(short, long, default_value = "beginner", value_parser = parse_level)]
        level: StudentLevel,

        /// The persona was typed in rather than picked from suggestions
        #[arg(long)]
        custom: bool,

        /// Continue a stored session instead of starting a new one
        #[arg(long, value_name = "SESSION_ID", conflicts_with_all = ["topic", "persona"])]
        resume: Option<i64>,
    },

    /// Print a lesser-known fact about a persona
    Fact {
        #[arg(short, long)]
        persona: String,
    },

    /// Print a portrait URL for a persona
    Image {
        #[arg(short, long)]
        persona: String,
    },

    /// Classify what a learner is trying to achieve
    Intent {
        #[arg(short, long)]
        query: String,
    },

    /// Learning statistics for a learner
    Stats {
        #[arg(short, long)]
        user: String,
    },

    /// Most popular topics and personas across all learners
    Popular {
        #[arg(short, long, default_value_t = crate::database::DEFAULT_POPULAR_LIMIT)]
        limit: i64,
    },

    /// Show a stored session and its transcript
    History {
        #[arg(short, long)]
        session: i64,

        /// Delete the session instead of showing it
        #[arg(long)]
        delete: bool,
    },

    /// Inspect or clear semantic learning memory
    #[command(subcommand)]
    Memory(MemoryCommand),

    /// List Gemini models that support chat
    Models,
}

#[derive(Debug, Subcommand)]
pub enum MemoryCommand {
    /// Past conversations closest to a topic
    Search {
        #[arg(short, long)]
        user: String,

        #[arg(short, long)]
        topic: String,

        #[arg(short, long, default_value_t = 5)]
        limit: usize,
    },

    /// Stored learning insights
    Profile {
        #[arg(short, long)]
        user: String,
    },

    /// Record a learning insight
    Note {
        #[arg(short, long)]
        user: String,

        /// Insight category, e.g. "strength" or "struggle"
        #[arg(short = 'k', long, default_value = "observation")]
        kind: String,

        text: String,
    },

    /// Delete every memory of a learner
    Clear {
        #[arg(short, long)]
        user: String,
    },
}

fn parse_level(input: &str) -> Result<StudentLevel, String> {
    Ok(StudentLevel::parse_lenient(input))
}
