//! Pull the data stores out of a Yahoo quote page.
//!
//! The page embeds its state as a script assignment:
//!
//! ```text
//! root.App.main = {"context":{"dispatcher":{"stores":{...}}}};
//! }(this));
//! ```
//!
//! The payload is cut out with three fixed markers, parsed, reduced to
//! `context.dispatcher.stores`, and then rewritten textually: empty objects become `null`
//! and `{"raw": X, "fmt": ...}` wrappers collapse to `X`.

use crate::core::YfError;
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

/// Parsed data stores, keyed by store name (e.g. `QuoteSummaryStore`).
pub type DataStores = Map<String, Value>;

pub(crate) const MAIN_MARKER: &str = "root.App.main =";
const THIS_MARKER: &str = "(this)";
const END_MARKER: &str = ";\n}";

/// Matches one `{"raw": X, ...}` wrapper, lazily up to the first closing brace.
static RAW_WRAPPER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\{['|"]raw['|"]:(.*?),(.*?)\}"#).expect("raw wrapper regex")
});

/// Cut the `root.App.main` JSON text out of `html`.
///
/// Returns `None` only when the assignment marker is absent. The two trailing markers
/// are optional: if either is missing the remainder is kept, and any garbage left over
/// shows up later as a JSON parse failure.
#[must_use]
pub fn extract_json_str(html: &str) -> Option<&str> {
    let (_, after_main) = html.split_once(MAIN_MARKER)?;
    let before_this = after_main.split(THIS_MARKER).next().unwrap_or(after_main);
    let payload = before_this.split(END_MARKER).next().unwrap_or(before_this);
    Some(payload.trim())
}

/// Apply the textual rewrites to serialized stores: `{}` → `null`, then raw/fmt
/// wrappers → their raw value.
///
/// This is a single regex pass, not a structural transform. A wrapper whose raw value is
/// itself a wrapper is only partly collapsed, and a raw string containing a comma breaks
/// the JSON. Both are left as-is.
#[must_use]
pub fn unwrap_raw_values(json: &str) -> String {
    let nulled = json.replace("{}", "null");
    RAW_WRAPPER.replace_all(&nulled, "${1}").into_owned()
}

/// Full extraction: markers, parse, `context.dispatcher.stores`, rewrite, re-parse.
///
/// `url` is only used for error reporting.
///
/// # Errors
///
/// Returns [`YfError::Unparsable`] when the marker is missing, either parse fails,
/// the stores path is absent, or the final value is not a JSON object.
pub fn extract_data_stores(html: &str, url: &str) -> Result<DataStores, YfError> {
    let json_str = extract_json_str(html)
        .ok_or_else(|| YfError::unparsable(url, format!("marker `{MAIN_MARKER}` not found")))?;

    let mut root: Value = serde_json::from_str(json_str)
        .map_err(|e| YfError::unparsable(url, format!("bootstrap json parse: {e}")))?;

    let stores = root
        .pointer_mut("/context/dispatcher/stores")
        .map(Value::take)
        .ok_or_else(|| YfError::unparsable(url, "context.dispatcher.stores missing"))?;

    let serialized = serde_json::to_string(&stores)
        .map_err(|e| YfError::unparsable(url, format!("stores serialize: {e}")))?;
    let rewritten = unwrap_raw_values(&serialized);

    match serde_json::from_str::<Value>(&rewritten) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(YfError::unparsable(
            url,
            format!("stores is not an object: {}", type_name(&other)),
        )),
        Err(e) => Err(YfError::unparsable(url, format!("rewritten json parse: {e}"))),
    }
}

fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
