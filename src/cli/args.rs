// src/cli/args.rs
use crate::domain::Language;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)] // Read from `Cargo.toml`
#[command(arg_required_else_help = true, disable_help_subcommand = true)]
pub struct Args {
    /// Path to config file (default: <config dir>/quick-answers/config.toml)
    #[arg(short, long, value_name = "CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Backend project URL, overrides the config file
    #[arg(long, value_name = "URL", env = "QA_BACKEND_URL", global = true)]
    pub url: Option<String>,

    /// Backend anon key, overrides the config file
    #[arg(
        long,
        value_name = "KEY",
        env = "QA_ANON_KEY",
        hide_env_values = true,
        global = true
    )]
    pub anon_key: Option<String>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v = debug, -vv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Write the config file from --url and --anon-key
    Init {
        /// Replace an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Register a new account
    Signup(Credentials),

    /// Sign in and remember the session
    Login(Credentials),

    /// Forget the stored session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Manage categories
    Categories {
        #[command(subcommand)]
        action: CategoryCommand,
    },

    /// Manage quick-answer responses
    Responses {
        #[command(subcommand)]
        action: ResponseCommand,
    },

    /// Manage tagged notes
    Notes {
        #[command(subcommand)]
        action: NoteCommand,
    },
}

#[derive(clap::Args, Debug, Clone)]
pub struct Credentials {
    #[arg(long, value_name = "EMAIL")]
    pub email: String,

    /// Prompted without echo when omitted
    #[arg(long, value_name = "PASSWORD")]
    pub password: Option<String>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CategoryCommand {
    /// List categories with their response counts
    List,

    /// Create a category
    Add {
        #[arg(long)]
        title: String,

        #[arg(long)]
        description: Option<String>,
    },

    /// Change a category's title or description
    Edit {
        #[arg(value_name = "CATEGORY_ID")]
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,
    },

    /// Delete a category and all of its responses
    Delete {
        #[arg(value_name = "CATEGORY_ID")]
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ResponseCommand {
    /// List responses of a category (default: the most recent category)
    List {
        #[arg(long, value_name = "CATEGORY_ID")]
        category: Option<String>,
    },

    /// Print one response in full
    Show {
        #[arg(value_name = "RESPONSE_ID")]
        id: String,

        /// Print only the response text, for piping into a clipboard tool
        #[arg(long)]
        raw: bool,
    },

    /// Add a response to a category (default: the most recent category)
    Add {
        #[arg(long, value_name = "CATEGORY_ID")]
        category: Option<String>,

        #[arg(long)]
        text: String,

        /// Spanish, English or Portuguese (default from config)
        #[arg(long)]
        language: Option<Language>,
    },

    /// Change a response's text or language
    Edit {
        #[arg(value_name = "RESPONSE_ID")]
        id: String,

        #[arg(long)]
        text: Option<String>,

        #[arg(long)]
        language: Option<Language>,
    },

    /// Delete a response
    Delete {
        #[arg(value_name = "RESPONSE_ID")]
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum NoteCommand {
    /// List notes, optionally filtered by tags (any of) and a search text
    List {
        #[arg(long = "tag", value_name = "TAG")]
        tags: Vec<String>,

        #[arg(long, value_name = "QUERY")]
        search: Option<String>,
    },

    /// Print one note in full
    Show {
        #[arg(value_name = "NOTE_ID")]
        id: String,
    },

    /// Create a note
    Add {
        #[arg(long)]
        text: String,

        #[arg(long = "tag", value_name = "TAG")]
        tags: Vec<String>,
    },

    /// Change a note's text or tags
    Edit {
        #[arg(value_name = "NOTE_ID")]
        id: String,

        #[arg(long)]
        text: Option<String>,

        /// Tag to add
        #[arg(long = "tag", value_name = "TAG")]
        tags: Vec<String>,

        /// Tag to remove
        #[arg(long, value_name = "TAG")]
        untag: Vec<String>,
    },

    /// Delete a note
    Delete {
        #[arg(value_name = "NOTE_ID")]
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}
