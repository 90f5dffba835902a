//! Field deserializers that absorb malformed values instead of failing the whole record.
//!
//! A scraped profile with one wrongly-shaped key still yields every other field; the bad
//! field falls back to its default (zero signal for that sub-score only).

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub(crate) fn field<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

/// Keeps the well-formed elements of a list; anything that is not a list becomes empty.
pub(crate) fn seq<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| T::deserialize(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

/// Strings pass through, numbers are rendered as text (`500` and `"500+"` both work).
pub(crate) fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Default, Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "field")]
        count: Option<f64>,
        #[serde(default, deserialize_with = "seq")]
        tags: Vec<String>,
        #[serde(default, deserialize_with = "text")]
        label: Option<String>,
    }

    #[test]
    fn wrong_shapes_fall_back_per_field() {
        let probe: Probe =
            serde_json::from_str(r#"{"count":"many","tags":"rust","label":42}"#).expect("probe");
        assert_eq!(probe.count, None);
        assert!(probe.tags.is_empty());
        assert_eq!(probe.label.as_deref(), Some("42"));
    }

    #[test]
    fn bad_list_elements_are_dropped_individually() {
        let probe: Probe = serde_json::from_str(r#"{"count":3,"tags":["a",1,"b",null]}"#).expect("probe");
        assert_eq!(probe.count, Some(3.0));
        assert_eq!(probe.tags, vec!["a".to_string(), "b".to_string()]);
    }
}
