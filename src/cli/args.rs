//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Browse lazily-loaded navigation trees served from a directory of JSON payloads
#[derive(Parser, Debug)]
#[command(name = "navtree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Payload directory (default: from config)
    #[arg(long, global = true, value_hint = ValueHint::DirPath)]
    pub data_dir: Option<PathBuf>,

    /// Directory searched for a local .navtree.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub config_dir: Option<PathBuf>,

    /// Tree section (default: from config)
    #[arg(short, long, global = true)]
    pub section: Option<String>,

    /// Caller-supplied cache key combined with the section
    #[arg(long, global = true, default_value = "")]
    pub cache_key: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the section tree, expanding nodes lazily
    Tree {
        /// Deepest level to expand
        #[arg(long, default_value_t = 1)]
        depth: u32,
    },

    /// Load and list the children of a node
    Children {
        /// Node id
        id: String,
        /// Deepest level searched for the node
        #[arg(long, default_value_t = 3)]
        depth: u32,
    },

    /// Show route, ancestry and tree root of a node
    Find {
        /// Node id
        id: String,
        /// Deepest level searched for the node
        #[arg(long, default_value_t = 3)]
        depth: u32,
    },

    /// Show the context menu of a node
    Menu {
        /// Node id
        id: String,
        /// Only show the item with this alias
        #[arg(long)]
        alias: Option<String>,
        /// Deepest level searched for the node
        #[arg(long, default_value_t = 3)]
        depth: u32,
    },

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
    /// Show effective settings
    Show,
    /// Show config file locations
    Path,
}
