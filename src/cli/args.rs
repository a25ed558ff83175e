//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use crate::domain::NodeId;

/// Edit hierarchical trees stored as nested JSON arrays
#[derive(Parser, Debug)]
#[command(name = "tree-builder")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output: -d info, -dd debug, -ddd trace
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file layered over the global config
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the tree
    Show {
        /// Tree file (default: settings.default_file)
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
    },

    /// Print the nested-array JSON of the tree
    Export {
        /// Tree file (default: settings.default_file)
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
    },

    /// Add a child node
    Add {
        /// Tree file (default: settings.default_file); created if missing
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,

        /// Id of the parent node, `null` for the root
        #[arg(long, default_value = "null")]
        parent: NodeId,

        /// Id of the new node
        #[arg(long)]
        id: NodeId,

        /// Payload field, repeatable
        #[arg(long = "field", value_name = "KEY=VALUE")]
        fields: Vec<String>,

        /// Write the result back instead of printing it
        #[arg(long)]
        write: bool,
    },

    /// Drop a JSON payload onto a node
    Drop {
        /// Tree file (default: settings.default_file); created if missing
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,

        /// Id of the drop target, `null` for the root
        #[arg(long, default_value = "null")]
        target: NodeId,

        /// Payload, e.g. '{"id": 3, "name": "toys"}'
        #[arg(long)]
        payload: String,

        /// Write the result back instead of printing it
        #[arg(long)]
        write: bool,
    },

    /// Interactive editing session on stdin
    Session {
        /// Tree file (default: settings.default_file); created on save
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
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
    /// Print a config template
    Template,
}
