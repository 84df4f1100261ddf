//! CLI module - Command line interface definitions and handlers

pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// typesniff - File type detection from leading bytes
///
/// Detects extension and MIME type by content, never by file name, and can
/// store files in a local object store under content-derived keys.
#[derive(Parser, Debug)]
#[command(name = "typesniff")]
#[command(author = "Ryan Cashmoney <tunclon@proton.me>")]
#[command(version)]
#[command(about = "Detect file types from their leading bytes", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbose output (debug logging)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Config file (default: platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Detect the type of one or more files
    Detect(DetectArgs),

    /// Store a file in the object store under a sniffed or given key
    Put(PutArgs),

    /// List signature rules in evaluation order
    Rules(RulesArgs),

    /// Show or initialise the configuration file
    Config(ConfigArgs),
}

#[derive(Debug, Clone, Parser)]
pub struct DetectArgs {
    /// Files to inspect
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Emit JSON instead of human readable lines
    #[arg(long)]
    pub json: bool,

    /// Bytes read from the start of each file (default from config: 8192)
    #[arg(long, short, value_parser = parse_prefix_len)]
    pub prefix: Option<usize>,

    /// Skip the weak signature tier
    #[arg(long)]
    pub strict: bool,

    /// Show which rule decided each result
    #[arg(long, short)]
    pub explain: bool,
}

fn parse_prefix_len(raw: &str) -> Result<usize, String> {
    let len: usize = raw.parse().map_err(|e| format!("{e}"))?;
    crate::config::check_prefix_len(len).map_err(|e| e.to_string())?;
    Ok(len)
}

#[derive(Debug, Clone, Parser)]
pub struct PutArgs {
    /// File to upload
    #[arg(required = true)]
    pub file: PathBuf,

    /// Object key (default: random name plus detected extension)
    #[arg(long, short)]
    pub key: Option<String>,

    /// Content type (default: detected MIME type)
    #[arg(long)]
    pub content_type: Option<String>,

    /// Bearer token, checked against upload.auth_secrets
    #[arg(long, short)]
    pub token: Option<String>,

    /// Object store directory (default from config)
    #[arg(long, short)]
    pub store: Option<PathBuf>,
}

#[derive(Debug, Clone, Parser)]
pub struct RulesArgs {
    /// Emit JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Parser)]
pub struct ConfigArgs {
    /// Write a commented sample config if none exists
    #[arg(long)]
    pub init: bool,
}
