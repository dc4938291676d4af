//! Fetch dispatch: one read per invocation, chosen by [`Mode`]

use crate::config::{Invocation, Mode};
use crate::database::{Database, DbPath};
use crate::error::{FetchError, FetchResult};
use crate::render::render_json;
use anyhow::anyhow;
use serde_json::Value;

/// Perform the read selected by `inv` and return the text to print
pub async fn fetch<D: Database>(db: &D, inv: &Invocation) -> FetchResult<String> {
    let path = DbPath::parse(&inv.path).map_err(FetchError::read)?;
    match inv.mode {
        Mode::Keys => key_fetch(db, &path, inv).await,
        Mode::Shallow => {
            let data = db.get_shallow(&path).await.map_err(FetchError::read)?;
            render_json(&data, inv.pretty)
        }
        Mode::Deep => {
            let data = db.get(&path).await.map_err(FetchError::read)?;
            render_json(&data, inv.pretty)
        }
    }
}

async fn key_fetch<D: Database>(db: &D, path: &DbPath, inv: &Invocation) -> FetchResult<String> {
    let data = db.get_shallow(path).await.map_err(FetchError::read)?;
    let keys = child_keys(&data, path)?;
    let lines: Vec<String> = keys
        .into_iter()
        .map(|k| {
            if inv.prepend_path {
                join_key(&inv.path, path, k)
            } else {
                k.to_string()
            }
        })
        .collect();
    Ok(lines.join("\n"))
}

/// Immediate child names of a shallow value, sorted
fn child_keys<'a>(data: &'a Value, path: &DbPath) -> FetchResult<Vec<&'a str>> {
    match data {
        Value::Null => Ok(Vec::new()),
        Value::Object(map) => {
            let mut keys: Vec<&str> = map.keys().map(String::as_str).collect();
            keys.sort_unstable();
            Ok(keys)
        }
        _ => Err(FetchError::read(anyhow!("value at {path} is not an object"))),
    }
}

/// Prefix `key` with the normalized parent path, keeping a leading `/` if
/// the user wrote one.
fn join_key(raw: &str, parent: &DbPath, key: &str) -> String {
    let lead = if raw.starts_with('/') { "/" } else { "" };
    let mut parts: Vec<&str> = parent.segments().iter().map(String::as_str).collect();
    parts.push(key);
    format!("{lead}{}", parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// In-memory tree standing in for the remote database
    struct FakeDb {
        root: Value,
        fail: bool,
    }

    impl FakeDb {
        fn new(root: Value) -> Self {
            FakeDb { root, fail: false }
        }

        fn failing() -> Self {
            FakeDb {
                root: Value::Null,
                fail: true,
            }
        }

        fn lookup(&self, path: &DbPath) -> anyhow::Result<Value> {
            if self.fail {
                anyhow::bail!("connection refused");
            }
            let mut node = &self.root;
            for seg in path.segments() {
                node = match node.get(seg) {
                    Some(child) => child,
                    None => return Ok(Value::Null),
                };
            }
            Ok(node.clone())
        }
    }

    impl Database for FakeDb {
        async fn get_shallow(&self, path: &DbPath) -> anyhow::Result<Value> {
            Ok(match self.lookup(path)? {
                Value::Object(map) => Value::Object(
                    map.into_iter()
                        .map(|(k, v)| match v {
                            Value::Object(_) | Value::Array(_) => (k, Value::Bool(true)),
                            other => (k, other),
                        })
                        .collect(),
                ),
                other => other,
            })
        }

        async fn get(&self, path: &DbPath) -> anyhow::Result<Value> {
            self.lookup(path)
        }
    }

    fn sample() -> FakeDb {
        FakeDb::new(json!({"a": 1, "b": {"c": 2}}))
    }

    fn inv(path: &str, mode: Mode) -> Invocation {
        Invocation {
            path: path.to_string(),
            mode,
            pretty: false,
            prepend_path: false,
        }
    }

    #[tokio::test]
    async fn test_key_listing() {
        let out = fetch(&sample(), &inv("/", Mode::Keys)).await.unwrap();
        assert_eq!(out, "a\nb");
    }

    #[tokio::test]
    async fn test_key_listing_with_prefix() {
        let db = FakeDb::new(json!({"users": {"bob": {"age": 3}, "alice": true}}));
        let mut i = inv("users/", Mode::Keys);
        i.prepend_path = true;
        assert_eq!(fetch(&db, &i).await.unwrap(), "users/alice\nusers/bob");

        let mut i = inv("/users", Mode::Keys);
        i.prepend_path = true;
        assert_eq!(fetch(&db, &i).await.unwrap(), "/users/alice\n/users/bob");
    }

    #[tokio::test]
    async fn test_key_listing_of_missing_node_is_empty() {
        let out = fetch(&sample(), &inv("/nope", Mode::Keys)).await.unwrap();
        assert_eq!(out, "");
    }

    #[tokio::test]
    async fn test_key_listing_of_primitive_fails() {
        let err = fetch(&sample(), &inv("/a", Mode::Keys)).await.unwrap_err();
        assert!(matches!(err, FetchError::Read(_)));
        assert!(err.to_string().contains("not an object"));
    }

    #[tokio::test]
    async fn test_shallow_collapses_nested_objects() {
        let out = fetch(&sample(), &inv("/", Mode::Shallow)).await.unwrap();
        let value: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value, json!({"a": 1, "b": true}));
    }

    #[tokio::test]
    async fn test_deep_materializes_subtree() {
        let out = fetch(&sample(), &inv("/", Mode::Deep)).await.unwrap();
        let value: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value, json!({"a": 1, "b": {"c": 2}}));

        let out = fetch(&sample(), &inv("b", Mode::Deep)).await.unwrap();
        assert_eq!(out, r#"{"c":2}"#);
    }

    #[tokio::test]
    async fn test_pretty_is_whitespace_only() {
        let plain = fetch(&sample(), &inv("/", Mode::Deep)).await.unwrap();
        let mut i = inv("/", Mode::Deep);
        i.pretty = true;
        let pretty = fetch(&sample(), &i).await.unwrap();
        assert_ne!(plain, pretty);
        assert!(pretty.contains("\n   \"a\": 1"));
        let a: Value = serde_json::from_str(&plain).unwrap();
        let b: Value = serde_json::from_str(&pretty).unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_transport_failure_is_read_error() {
        for mode in [Mode::Keys, Mode::Shallow, Mode::Deep] {
            let err = fetch(&FakeDb::failing(), &inv("/x", mode))
                .await
                .unwrap_err();
            assert!(matches!(err, FetchError::Read(_)));
            assert_eq!(err.exit_code(), 2);
            assert!(err.to_string().contains("connection refused"));
        }
    }

    #[tokio::test]
    async fn test_illegal_path_rejected_before_read() {
        let err = fetch(&FakeDb::failing(), &inv("a.b", Mode::Deep))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Read(_)));
        assert_eq!(err.exit_code(), 2);
        assert!(err
            .to_string()
            .starts_with("Error reading from database: invalid path"));
    }

    fn joined(raw: &str, key: &str) -> String {
        join_key(raw, &DbPath::parse(raw).unwrap(), key)
    }

    #[test]
    fn test_join_key() {
        assert_eq!(joined("users", "a"), "users/a");
        assert_eq!(joined("users//", "a"), "users/a");
        assert_eq!(joined("/", "a"), "/a");
        assert_eq!(joined("", "a"), "a");
        assert_eq!(joined("//users", "a"), "/users/a");
        assert_eq!(joined("users//x", "a"), "users/x/a");
        assert_eq!(joined("/users/", "a"), "/users/a");
    }

    #[tokio::test]
    async fn test_key_prefix_matches_the_node_read() {
        let db = FakeDb::new(json!({"users": {"x": {"a": 1}}}));
        let mut i = inv("//users//x/", Mode::Keys);
        i.prepend_path = true;
        assert_eq!(fetch(&db, &i).await.unwrap(), "/users/x/a");
    }
}
