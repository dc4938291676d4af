//! # firefetch
//!
//! Fetch a subtree or key listing from a Firebase Realtime Database and
//! print it as JSON.
//!
//! The database URL and service-account key file are taken from the
//! `FIRE_URL` and `FIRE_ACCOUNT` environment variables.

use clap::Parser;

pub mod client;
pub mod commands;
pub mod config;
pub mod database;
pub mod error;
pub mod fetch;
pub mod render;

/// Command-line arguments
///
/// `path` is optional here so that a missing path is reported with the
/// tool's own usage text and exit code instead of clap's.
#[derive(Parser, Debug)]
#[command(
    name = "firefetch",
    version,
    about = "Fetch firebase object",
    long_about = "Fetch a subtree or key listing from a Firebase Realtime Database and print it as JSON.\n\nRequires FIRE_URL (database URL) and FIRE_ACCOUNT (service account key file) in the environment."
)]
pub struct Cli {
    /// Print top level keys, one per line
    #[arg(short, long)]
    pub keys: bool,

    /// Prepend path to keys [-k]
    #[arg(short, long)]
    pub absolute: bool,

    /// Shallow fetch
    #[arg(short, long)]
    pub shallow: bool,

    /// Pretty print JSON
    #[arg(short, long)]
    pub pretty: bool,

    /// Increase log verbosity (-v, -vv, -vvv); logs go to stderr
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Print a shell completion script and exit
    #[arg(long, value_name = "SHELL")]
    pub completions: Option<clap_complete::Shell>,

    /// Database path to fetch, e.g. /users/alice
    pub path: Option<String>,

    /// Anything after the path is ignored
    #[arg(hide = true)]
    pub rest: Vec<String>,
}

/// One-line usage summary printed when no path is given
pub fn usage(program: &str) -> String {
    format!("Fetch firebase object\nUsage: {program} [-k [-a]] [-s] [-p] object")
}
