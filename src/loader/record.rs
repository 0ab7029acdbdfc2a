//! Crime article record
//!
//! Every field is optional and loosely typed. Strings bind as-is, numbers and
//! booleans bind as their text form, lists bind as PostgreSQL array literals
//! (`{"a","b"}`) and objects bind as compact JSON.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Column list of the `crime_articles` table, in bind order
pub const ARTICLE_COLUMNS: [&str; 7] = [
    "title",
    "involved_parties",
    "date_of_incident",
    "location_of_incident",
    "severity_of_crime",
    "image_url",
    "additional_links",
];

/// One crime-news item as supplied by the orchestrator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    #[serde(default, deserialize_with = "loose_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub involved_parties: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub date_of_incident: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub location_of_incident: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub severity_of_crime: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub additional_links: Option<String>,
}

impl ArticleRecord {
    /// Record with only a title, the shape most tests use
    pub fn titled<S: Into<String>>(title: S) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    /// Values in `ARTICLE_COLUMNS` order
    pub fn column_values(&self) -> [Option<&str>; 7] {
        [
            self.title.as_deref(),
            self.involved_parties.as_deref(),
            self.date_of_incident.as_deref(),
            self.location_of_incident.as_deref(),
            self.severity_of_crime.as_deref(),
            self.image_url.as_deref(),
            self.additional_links.as_deref(),
        ]
    }
}

/// Coerce any JSON value to its bound text form (pure function)
pub fn value_to_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => Some(array_literal(items)),
        object @ Value::Object(_) => Some(object.to_string()),
    }
}

/// Render a JSON list in PostgreSQL array input syntax
fn array_literal(items: Vec<Value>) -> String {
    let elements: Vec<String> = items
        .into_iter()
        .map(|item| match item {
            Value::Null => "NULL".to_string(),
            Value::Array(nested) => array_literal(nested),
            other => quote_array_element(&value_to_text(other).unwrap_or_default()),
        })
        .collect();
    format!("{{{}}}", elements.join(","))
}

fn quote_array_element(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for c in text.chars() {
        if c == '"' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

fn loose_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(value_to_text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_missing_fields_are_none() {
        let record: ArticleRecord = serde_json::from_value(json!({"title": "A"})).unwrap();
        assert_eq!(record, ArticleRecord::titled("A"));
        assert_eq!(
            record.column_values(),
            [Some("A"), None, None, None, None, None, None]
        );
    }

    #[test]
    fn test_explicit_null_is_none() {
        let record: ArticleRecord =
            serde_json::from_value(json!({"title": null, "image_url": null})).unwrap();
        assert_eq!(record, ArticleRecord::default());
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let record: ArticleRecord =
            serde_json::from_value(json!({"title": "A", "source": "feed"})).unwrap();
        assert_eq!(record.title.as_deref(), Some("A"));
    }

    #[test]
    fn test_link_list_binds_as_array_literal() {
        let record: ArticleRecord = serde_json::from_value(json!({
            "additional_links": ["http://a.test/1", "http://a.test/2"]
        }))
        .unwrap();
        assert_eq!(
            record.additional_links.as_deref(),
            Some(r#"{"http://a.test/1","http://a.test/2"}"#)
        );
    }

    #[test]
    fn test_array_literal_escapes_and_nulls() {
        let text = value_to_text(json!([r#"say "hi""#, r"C:\dir", null, 7, []]));
        assert_eq!(
            text.as_deref(),
            Some(r#"{"say \"hi\"","C:\\dir",NULL,"7",{}}"#)
        );
    }

    #[test]
    fn test_empty_list_is_empty_array() {
        assert_eq!(value_to_text(json!([])).as_deref(), Some("{}"));
    }

    #[test]
    fn test_object_binds_as_json_text() {
        assert_eq!(
            value_to_text(json!({"source": "feed"})).as_deref(),
            Some(r#"{"source":"feed"}"#)
        );
    }

    #[test]
    fn test_scalar_coercion() {
        let record: ArticleRecord = serde_json::from_value(json!({
            "severity_of_crime": 3,
            "involved_parties": true,
            "date_of_incident": "2024-03-01"
        }))
        .unwrap();
        assert_eq!(record.severity_of_crime.as_deref(), Some("3"));
        assert_eq!(record.involved_parties.as_deref(), Some("true"));
        assert_eq!(record.date_of_incident.as_deref(), Some("2024-03-01"));
    }

    #[test]
    fn test_columns_match_values_len() {
        assert_eq!(
            ARTICLE_COLUMNS.len(),
            ArticleRecord::default().column_values().len()
        );
    }

    proptest! {
        #[test]
        fn prop_strings_bind_unchanged(s in ".*") {
            prop_assert_eq!(value_to_text(Value::String(s.clone())), Some(s));
        }

        #[test]
        fn prop_integers_bind_as_decimal(n in any::<i64>()) {
            prop_assert_eq!(value_to_text(json!(n)), Some(n.to_string()));
        }
    }
}
