//! Database capability and path references
//!
//! Fetch dispatch only needs two reads from the remote tree, so the remote
//! store is modelled as the [`Database`] trait. The REST client in
//! [`crate::client`] implements it for real; tests supply an in-memory tree.

use anyhow::{bail, Result};
use serde_json::Value;
use std::fmt;
use std::future::Future;

/// Characters the realtime database does not allow in a path.
const INVALID_PATH_CHARS: &[char] = &['.', '$', '#', '[', ']'];

/// A validated, normalized location in the database tree
///
/// Empty segments are dropped, so `"/users//alice/"` and `"users/alice"`
/// refer to the same node. The root is represented by no segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbPath {
    segments: Vec<String>,
}

impl DbPath {
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.contains(INVALID_PATH_CHARS) {
            bail!("invalid path with illegal characters: {raw:?}");
        }
        let segments = raw
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        Ok(DbPath { segments })
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl fmt::Display for DbPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.segments.join("/"))
    }
}

/// Read access to a remote tree-structured database
pub trait Database {
    /// Read one level below `path`; nested objects come back as `true`.
    fn get_shallow(&self, path: &DbPath) -> impl Future<Output = Result<Value>>;

    /// Read the full subtree rooted at `path`.
    fn get(&self, path: &DbPath) -> impl Future<Output = Result<Value>>;
}
