//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use crate::application::LanguageKind;
use crate::infrastructure::StorageFormat;

/// Guess the animal: a yes/no knowledge tree that learns from its mistakes
#[derive(Parser, Debug)]
#[command(name = "animals")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub debug: u8,

    /// Knowledge base format
    #[arg(short = 't', long = "type", global = true, value_enum)]
    pub format: Option<StorageFormat>,

    /// Directory holding the knowledge base
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub data_dir: Option<PathBuf>,

    /// Phrasing rules
    #[arg(long, global = true, value_enum)]
    pub language: Option<LanguageKind>,

    /// Without a command an interactive menu is shown
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Play guessing rounds
    Play,

    /// List all known animals
    List,

    /// Show what is known about an animal
    Search {
        /// Animal name
        animal: String,
    },

    /// Show knowledge tree statistics
    Stats,

    /// Print the knowledge tree
    Print,

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
    },

    /// Show config paths
    Path,
}
