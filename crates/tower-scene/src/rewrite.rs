//! Guid reference rewriting for duplicated objects

use crate::document::Document;
use crate::object::TowerObject;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tower_core::Result;

/// How guid references inside a document are found
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RewriteMode {
    /// Walk the document and replace string values that are exactly an old guid
    #[default]
    Structural,
    /// Serialize, substitute every old guid as a substring, and reparse
    Textual,
}

/// Old guid -> new guid, built for one duplication
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplacementTable {
    entries: HashMap<String, String>,
}

impl ReplacementTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, old: impl Into<String>, new: impl Into<String>) {
        self.entries.insert(old.into(), new.into());
    }

    pub fn get(&self, old: &str) -> Option<&str> {
        self.entries.get(old).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Rewrite every guid reference in `doc` according to `table`
pub fn rewrite_document(
    doc: &mut Document,
    table: &ReplacementTable,
    mode: RewriteMode,
) -> Result<()> {
    if table.is_empty() {
        return Ok(());
    }

    match mode {
        RewriteMode::Structural => {
            for value in doc.values_mut() {
                rewrite_value(value, table);
            }
        }
        RewriteMode::Textual => {
            *doc = rewrite_text(doc, table)?;
        }
    }
    Ok(())
}

/// Rewrite both documents of an object
pub fn rewrite_references(
    object: &mut TowerObject,
    table: &ReplacementTable,
    mode: RewriteMode,
) -> Result<()> {
    let (item, properties) = object.documents_mut();
    if let Some(item) = item {
        rewrite_document(item, table, mode)?;
    }
    if let Some(properties) = properties {
        rewrite_document(properties, table, mode)?;
    }
    Ok(())
}

/// Recursively replace string values that match a table key
fn rewrite_value(value: &mut Value, table: &ReplacementTable) {
    match value {
        Value::String(s) => {
            if let Some(new) = table.get(s.as_str()) {
                debug!("Rewrote guid reference {} -> {}", s, new);
                *s = new.to_string();
            }
        }
        Value::Object(map) => {
            for (_k, v) in map.iter_mut() {
                rewrite_value(v, table);
            }
        }
        Value::Array(arr) => {
            for v in arr.iter_mut() {
                rewrite_value(v, table);
            }
        }
        _ => {} // numbers, booleans, null
    }
}

fn rewrite_text(doc: &Document, table: &ReplacementTable) -> Result<Document> {
    let mut encoded = serde_json::to_string(doc)?;
    for (old, new) in table.iter() {
        encoded = encoded.replace(old, new);
    }
    Ok(serde_json::from_str(&encoded)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const OLD_A: &str = "6F9619FF-8B86-D011-B42D-00C04FC964FF";
    const NEW_A: &str = "0F8FAD5B-D9CB-469F-A165-70867728950E";
    const OLD_B: &str = "1B4E28BA-2FA1-11D2-883F-0016D3CCA427";
    const NEW_B: &str = "7C9E6679-7425-40DE-944B-E07FC1F90AE7";

    fn table() -> ReplacementTable {
        let mut table = ReplacementTable::new();
        table.insert(OLD_A, NEW_A);
        table.insert(OLD_B, NEW_B);
        table
    }

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    fn sample() -> Document {
        doc(json!({
            "guid": NEW_A,
            "name": "Button",
            "properties": {"GroupID": {"IntProperty": 3}},
            "ItemConnections": {"ArrayProperty": {"StructProperty": {"values": [
                {"Item": {"Guid": OLD_B}, "Event": {"NameProperty": "OnPressed"}},
                {"Item": {"Guid": "2C7E6B7A-0E7B-4D43-9A1D-5A8C1D7E2F10"}}
            ]}}}
        }))
    }

    #[test]
    fn test_structural_rewrites_nested_references() {
        let mut d = sample();
        rewrite_document(&mut d, &table(), RewriteMode::Structural).unwrap();

        let values = &d["ItemConnections"]["ArrayProperty"]["StructProperty"]["values"];
        assert_eq!(values[0]["Item"]["Guid"], json!(NEW_B));
        assert_eq!(
            values[1]["Item"]["Guid"],
            json!("2C7E6B7A-0E7B-4D43-9A1D-5A8C1D7E2F10")
        );
        assert_eq!(d["guid"], json!(NEW_A));
    }

    #[test]
    fn test_structural_and_textual_agree_on_guids() {
        let mut structural = sample();
        let mut textual = sample();
        rewrite_document(&mut structural, &table(), RewriteMode::Structural).unwrap();
        rewrite_document(&mut textual, &table(), RewriteMode::Textual).unwrap();

        assert_eq!(
            serde_json::to_string(&structural).unwrap(),
            serde_json::to_string(&textual).unwrap()
        );
    }

    #[test]
    fn test_structural_ignores_partial_matches() {
        let mut short = ReplacementTable::new();
        short.insert("Door", "Window");

        let mut d = doc(json!({"name": "FrontDoor", "target": "Door"}));
        rewrite_document(&mut d, &short, RewriteMode::Structural).unwrap();
        assert_eq!(d["name"], json!("FrontDoor"));
        assert_eq!(d["target"], json!("Window"));

        let mut d = doc(json!({"name": "FrontDoor"}));
        rewrite_document(&mut d, &short, RewriteMode::Textual).unwrap();
        assert_eq!(d["name"], json!("FrontWindow"));
    }

    #[test]
    fn test_keys_and_numbers_untouched() {
        let mut d = doc(json!({(OLD_A): 1, "n": 2.5, "b": true, "z": null}));
        let before = d.clone();
        rewrite_document(&mut d, &table(), RewriteMode::Structural).unwrap();
        assert_eq!(d, before);
    }

    #[test]
    fn test_empty_table_is_a_no_op() {
        let mut d = sample();
        rewrite_document(&mut d, &ReplacementTable::new(), RewriteMode::Textual).unwrap();
        assert_eq!(d, sample());
    }

    #[test]
    fn test_mode_names() {
        assert_eq!(serde_json::to_string(&RewriteMode::Textual).unwrap(), "\"textual\"");
        assert_eq!(RewriteMode::default(), RewriteMode::Structural);
    }

    #[test]
    fn test_textual_keeps_every_float() {
        let mut state: u64 = 0x2545_F491_4F6C_DD1D;
        let mut checked = 0;
        while checked < 20_000 {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            let f = f64::from_bits(state);
            if !f.is_finite() {
                continue;
            }
            checked += 1;

            let mut d = doc(json!({"guid": OLD_A, "position": {"x": f}}));
            rewrite_document(&mut d, &table(), RewriteMode::Textual).unwrap();
            assert_eq!(d["guid"], json!(NEW_A));
            assert_eq!(
                d["position"]["x"].as_f64().map(f64::to_bits),
                Some(f.to_bits()),
                "{} changed",
                f
            );
        }
    }

    #[test]
    fn test_textual_keeps_number_formatting() {
        let text = r#"{"guid":"6F9619FF-8B86-D011-B42D-00C04FC964FF","Intensity":{"FloatProperty":2},"x":104.80229987651853}"#;
        let mut d: Document = serde_json::from_str(text).unwrap();
        rewrite_document(&mut d, &table(), RewriteMode::Textual).unwrap();
        assert_eq!(serde_json::to_string(&d).unwrap(), text.replace(OLD_A, NEW_A));
    }
}
