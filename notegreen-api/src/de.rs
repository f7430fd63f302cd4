/// Serde helpers for request bodies

use serde::{Deserialize, Deserializer};

/// Deserializes a string with surrounding whitespace removed
pub fn trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    Ok(value.trim().to_string())
}

/// Like [`trimmed`], for optional fields; use with `#[serde(default)]`
pub fn trimmed_option<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.map(|v| v.trim().to_string()))
}

/// Tells an explicit `null` apart from a missing field
///
/// Use with `#[serde(default)]`: a missing field stays `None`, `null` becomes
/// `Some(None)` and a value becomes `Some(Some(value))`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Body {
        #[serde(deserialize_with = "trimmed")]
        name: String,

        #[serde(default, deserialize_with = "trimmed_option")]
        label: Option<String>,

        #[serde(default, deserialize_with = "double_option")]
        parent: Option<Option<u32>>,
    }

    #[test]
    fn test_trimmed_fields() {
        let body: Body = serde_json::from_str(r#"{"name": "  Work  ", "label": " x "}"#).unwrap();
        assert_eq!(body.name, "Work");
        assert_eq!(body.label.as_deref(), Some("x"));
    }

    #[test]
    fn test_double_option_distinguishes_null_from_missing() {
        let missing: Body = serde_json::from_str(r#"{"name": "a"}"#).unwrap();
        assert_eq!(missing.parent, None);
        assert_eq!(missing.label, None);

        let null: Body = serde_json::from_str(r#"{"name": "a", "parent": null}"#).unwrap();
        assert_eq!(null.parent, Some(None));

        let set: Body = serde_json::from_str(r#"{"name": "a", "parent": 7}"#).unwrap();
        assert_eq!(set.parent, Some(Some(7)));
    }
}
