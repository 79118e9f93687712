//! CLI module for Stride.

pub mod commands;
mod input;
mod output;

pub use input::{read_lines, read_text};
pub use output::Output;

use clap::{Parser, Subcommand};

/// Stride - health and fitness blog content pipeline
///
/// Plans, drafts and refines blog posts with a language model, falling back
/// to deterministic output whenever the model is unavailable.
#[derive(Parser, Debug)]
#[command(name = "stride")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Plan a post: outline plus a markdown writing plan
    Plan {
        /// Topic of the post
        topic: String,

        /// Print the bare outline and which tier produced it
        #[arg(long)]
        outline_only: bool,

        /// Print the JSON envelope
        #[arg(long)]
        json: bool,
    },

    /// Write a full draft for a topic
    Write {
        /// Topic of the post
        topic: String,

        /// Write the draft to a file instead of stdout
        #[arg(short, long)]
        output: Option<String>,

        /// Print the JSON envelope
        #[arg(long)]
        json: bool,
    },

    /// Rewrite content for readability
    Readability {
        /// Text, a file path, or - for stdin
        input: String,

        /// Post title
        #[arg(short, long)]
        title: Option<String>,

        /// Print the JSON envelope
        #[arg(long)]
        json: bool,
    },

    /// Rewrite content in a different tone
    Tone {
        /// Text, a file path, or - for stdin
        input: String,

        /// Target tone (professional, casual, friendly, motivational, educational, authoritative)
        #[arg(long, default_value = "professional")]
        tone: String,

        /// Post title
        #[arg(short, long)]
        title: Option<String>,

        /// Print the JSON envelope
        #[arg(long)]
        json: bool,
    },

    /// Suggest new post topics
    Topics {
        /// Category (nutrition, fitness, wellness, ...)
        #[arg(long)]
        category: Option<String>,

        /// Number of topics
        #[arg(short = 'n', long)]
        count: Option<usize>,

        /// Print the JSON envelope
        #[arg(long)]
        json: bool,
    },

    /// Analyse how a post is likely to engage readers
    Engagement {
        /// Text, a file path, or - for stdin
        input: String,

        /// Post tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,

        /// Blog id to fetch analytics for
        #[arg(long)]
        blog_id: Option<String>,

        /// Reader comment (repeatable)
        #[arg(long = "comment")]
        comments: Vec<String>,

        /// Print the JSON envelope
        #[arg(long)]
        json: bool,
    },

    /// Aggregate engagement, topic and section suggestions
    Suggest {
        /// Post content: text, a file path, or - for stdin
        #[arg(long)]
        content: Option<String>,

        /// Post tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,

        /// Topic category
        #[arg(long)]
        category: Option<String>,

        /// Number of topics
        #[arg(short = 'n', long)]
        count: Option<usize>,

        /// User the suggestions are for
        #[arg(long)]
        user_id: Option<String>,

        /// Print the JSON envelope
        #[arg(long)]
        json: bool,
    },

    /// Summarize a post
    Summarize {
        /// Text, a file path, or - for stdin
        input: String,

        /// Post title
        #[arg(short, long, default_value = "")]
        title: String,

        /// Print the JSON envelope
        #[arg(long)]
        json: bool,
    },

    /// Classify reader comments
    Sentiment {
        /// Comments
        comments: Vec<String>,

        /// Read comments from a file (one per line), or - for stdin
        #[arg(short, long)]
        file: Option<String>,

        /// Print the JSON envelope
        #[arg(long)]
        json: bool,
    },

    /// Start HTTP API server for integration with other systems
    Serve {
        /// Host to bind to (defaults to server.host)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (defaults to server.port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Check configuration and provider connectivity
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}
