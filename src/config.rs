//! Invocation and environment resolution
//!
//! The command line is reduced to an immutable [`Invocation`] and the
//! process environment to [`Credentials`]. Both are resolved before any
//! network call; a missing database path or a missing variable is reported
//! as an error to the caller rather than terminating the process here.

use crate::error::{FetchError, FetchResult};
use std::env;

/// Database base URL, e.g. `https://my-project.firebaseio.com`
pub const FIRE_URL: &str = "FIRE_URL";

/// Path to the service-account key file
pub const FIRE_ACCOUNT: &str = "FIRE_ACCOUNT";

/// Optional `host:port` of a local database emulator
pub const EMULATOR_HOST: &str = "FIREBASE_DATABASE_EMULATOR_HOST";

/// Which read to perform against the requested path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Print the immediate child key names, one per line
    Keys,
    /// One level of the tree, nested objects collapsed to `true`
    Shallow,
    /// The fully materialized subtree
    Deep,
}

impl Mode {
    /// `-k` wins over `-s`; with neither, the read is deep.
    pub fn from_flags(keys: bool, shallow: bool) -> Self {
        if keys {
            Mode::Keys
        } else if shallow {
            Mode::Shallow
        } else {
            Mode::Deep
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub path: String,
    pub mode: Mode,
    pub pretty: bool,
    /// Prefix listed keys with the queried path (`-a`, keys mode only)
    pub prepend_path: bool,
}

impl Invocation {
    pub fn from_cli(cli: &crate::Cli) -> FetchResult<Self> {
        let path = cli.path.clone().ok_or(FetchError::Usage)?;
        let mode = Mode::from_flags(cli.keys, cli.shallow);
        if !cli.rest.is_empty() {
            tracing::debug!(ignored = ?cli.rest, "extra arguments after the path are ignored");
        }
        if cli.absolute && mode != Mode::Keys {
            tracing::debug!("-a has no effect outside of key listing");
        }
        Ok(Invocation {
            path,
            mode,
            pretty: cli.pretty,
            prepend_path: cli.absolute,
        })
    }
}

/// Connection settings read once from the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub database_url: String,
    pub account_file: String,
    pub emulator_host: Option<String>,
}

impl Credentials {
    pub fn from_env() -> FetchResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Resolve credentials through an arbitrary variable lookup
    ///
    /// Variables are checked in a fixed order (`FIRE_URL` first) so the
    /// reported name is deterministic when both are missing. An empty value
    /// counts as missing.
    pub fn from_lookup<F>(lookup: F) -> FetchResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.is_empty())
                .ok_or(FetchError::MissingEnv { name })
        };

        let database_url = required(FIRE_URL)?;
        let account_file = required(FIRE_ACCOUNT)?;
        let emulator_host = lookup(EMULATOR_HOST).filter(|v| !v.is_empty());

        Ok(Credentials {
            database_url,
            account_file,
            emulator_host,
        })
    }
}
