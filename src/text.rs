use std::sync::LazyLock;

use chrono::{Datelike, Local, NaiveDateTime};
use regex::Regex;
use serde_json::{Value, json};

use crate::DateParts;

#[allow(clippy::expect_used)]
static WORD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z0-9_]+").expect("word pattern is a valid regex"));

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Formats a revision or creation timestamp for tables.
///
/// `yyyy-MM-dd`, or `yyyy-MM-dd HH:mm:ss` with `include_time`.
pub fn format_timestamp(date: Option<NaiveDateTime>, include_time: bool) -> Option<String> {
    let date = date?;
    let format = if include_time {
        DATE_TIME_FORMAT
    } else {
        DATE_FORMAT
    };
    Some(date.format(format).to_string())
}

/// Today's local date with unpadded components, for checking whether an
/// entered date lies in the future.
pub fn today() -> DateParts {
    let now = Local::now().date_naive();
    DateParts::new(
        now.year().to_string(),
        now.month().to_string(),
        now.day().to_string(),
    )
}

/// Number of runs of word characters in `text`
pub fn count_words(text: &str) -> usize {
    WORD_PATTERN.find_iter(text).count()
}

/// Adds `defaultAlias: {name}` to an entity object that has a name, so
/// that views can treat unsaved entities like saved ones.
///
/// Values without a non-empty `name` are returned unchanged.
pub fn inject_default_alias_name(instance: Value) -> Value {
    match instance {
        Value::Object(mut map) => {
            if let Some(name) = map.get("name").filter(|name| is_truthy(name)).cloned() {
                map.insert("defaultAlias".to_owned(), json!({ "name": name }));
            }
            Value::Object(map)
        }
        other => other,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
