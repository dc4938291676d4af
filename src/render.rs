//! JSON rendering of fetched values

use crate::error::FetchResult;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

/// Indentation used for `-p` output
pub const INDENT: &[u8] = b"   ";

/// Serialize `value` compactly, or with a 3-space indent when `pretty`.
///
/// If the indented form cannot be produced the compact form is returned
/// instead; only a failure of the compact encoding is an error.
pub fn render_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> FetchResult<String> {
    let compact = serde_json::to_string(value)?;
    if !pretty {
        return Ok(compact);
    }
    match to_indented(value) {
        Ok(text) => Ok(text),
        Err(e) => {
            tracing::warn!(error = %e, "pretty printing failed, emitting compact JSON");
            Ok(compact)
        }
    }
}

fn to_indented<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<String> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    value.serialize(&mut ser)?;
    Ok(String::from_utf8(buf)?)
}
