// Remote collection data types.
// Open-shaped rows, option lists for foreign-key fields, and the page envelope.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Suffix marking a foreign-key field in the remote payload.
const FK_SUFFIX: &str = "FK";
/// Suffix the update endpoint expects for foreign-key fields.
const ID_SUFFIX: &str = "ID";

/// One record of the remote collection.
///
/// The remote schema is not known ahead of time, so a row is a plain mapping
/// from field name to JSON value. Field order follows the payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(Map<String, Value>);

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Numeric `id` field, if present.
    pub fn id(&self) -> Option<i64> {
        let id = self.0.get("id")?;
        id.as_i64()
            .or_else(|| id.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Set a field, keeping its position if it already exists.
    pub fn set(&mut self, field: impl Into<String>, value: Value) {
        self.0.insert(field.into(), value);
    }

    /// Builder-style variant of [`Row::set`].
    pub fn with(mut self, field: impl Into<String>, value: Value) -> Self {
        self.set(field, value);
        self
    }

    pub fn field_names(&self) -> Vec<String> {
        self.0.keys().cloned().collect()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when every field is null or an empty list.
    ///
    /// The backend pads pages with placeholder records shaped like this.
    pub fn is_vacuous(&self) -> bool {
        self.0.values().all(|value| match value {
            Value::Null => true,
            Value::Array(items) => items.is_empty(),
            _ => false,
        })
    }

    /// Display text for a single cell.
    pub fn display(&self, field: &str) -> String {
        self.0.get(field).map(render_value).unwrap_or_default()
    }

    /// Form fields for the update endpoint.
    ///
    /// A trailing `FK` in a field name becomes `ID`; every other name passes
    /// through unchanged.
    pub fn form_pairs(&self) -> Vec<(String, String)> {
        self.0
            .iter()
            .map(|(key, value)| (form_key(key), render_value(value)))
            .collect()
    }
}

impl From<Map<String, Value>> for Row {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

fn form_key(key: &str) -> String {
    match key.strip_suffix(FK_SUFFIX) {
        Some(stem) => format!("{}{}", stem, ID_SUFFIX),
        None => key.to_string(),
    }
}

/// Render a JSON value the way it is sent in a form body.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items.iter().map(render_value).collect::<Vec<_>>().join(","),
        Value::Object(_) => value.to_string(),
    }
}

/// A selectable label for a foreign-key field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionItem {
    pub id: i64,
    pub name: String,
}

/// Option lists keyed by field name, delivered alongside each page.
pub type SupplementaryData = BTreeMap<String, Vec<OptionItem>>;

/// Envelope returned by the list endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse {
    pub data: Vec<Row>,
    #[serde(default)]
    pub additional: Option<SupplementaryData>,
    pub total_pages: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> Row {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_row_id() {
        assert_eq!(row(json!({"id": 7, "name": "x"})).id(), Some(7));
        assert_eq!(row(json!({"id": 7.0})).id(), Some(7));
        assert_eq!(row(json!({"name": "x"})).id(), None);
        assert_eq!(row(json!({"id": "7"})).id(), None);
    }

    #[test]
    fn test_vacuous_rows() {
        assert!(row(json!({"id": null, "tags": [], "name": null})).is_vacuous());
        assert!(Row::new().is_vacuous());
        assert!(!row(json!({"id": null, "tags": ["a"]})).is_vacuous());
        assert!(!row(json!({"id": null, "name": ""})).is_vacuous());
        assert!(!row(json!({"id": 0})).is_vacuous());
    }

    #[test]
    fn test_field_order_follows_payload() {
        let r = row(json!({"zeta": 1, "alpha": 2, "id": 3}));
        assert_eq!(r.field_names(), vec!["zeta", "alpha", "id"]);
    }

    #[test]
    fn test_form_pairs_rename_fk_suffix() {
        let r = row(json!({"id": 1, "ownerFK": 7, "startDate": "2024-01-02", "FKind": "a"}));
        let pairs = r.form_pairs();

        assert!(pairs.contains(&("ownerID".to_string(), "7".to_string())));
        assert!(pairs.iter().all(|(k, _)| k != "ownerFK"));
        assert!(pairs.contains(&("startDate".to_string(), "2024-01-02".to_string())));
        // Only a trailing suffix is renamed.
        assert!(pairs.contains(&("FKind".to_string(), "a".to_string())));
    }

    #[test]
    fn test_render_value() {
        assert_eq!(render_value(&json!(null)), "");
        assert_eq!(render_value(&json!("text")), "text");
        assert_eq!(render_value(&json!(true)), "true");
        assert_eq!(render_value(&json!(2.5)), "2.5");
        assert_eq!(render_value(&json!([1, "b"])), "1,b");
        assert_eq!(render_value(&json!({"a": 1})), r#"{"a":1}"#);
    }

    #[test]
    fn test_page_response_parse() {
        let page: PageResponse = serde_json::from_value(json!({
            "data": [{"id": 1, "ownerFK": 2}],
            "additional": {"ownerFK": [{"id": 2, "name": "Alice"}]},
            "totalPages": 3
        }))
        .unwrap();

        assert_eq!(page.data.len(), 1);
        assert_eq!(page.total_pages, 3);
        let additional = page.additional.unwrap();
        assert_eq!(additional["ownerFK"][0].name, "Alice");
    }

    #[test]
    fn test_page_response_without_additional() {
        let page: PageResponse =
            serde_json::from_value(json!({"data": [], "totalPages": 1})).unwrap();
        assert!(page.additional.is_none());
    }
}
