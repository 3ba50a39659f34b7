//! Save document field names and lookup helpers
//!
//! Documents are kept as untyped JSON maps so fields this crate does not know
//! about survive a load/edit/save cycle untouched. Lookups report the dotted
//! path of the field that was missing or had the wrong shape.

use serde_json::{Map, Value};
use tower_core::{Result, TowerError};

/// One item or properties document
pub type Document = Map<String, Value>;

pub(crate) const GUID_KEY: &str = "guid";
pub(crate) const NAME_KEY: &str = "name";
pub(crate) const PROPERTIES_KEY: &str = "properties";
pub(crate) const GROUP_KEY: &str = "GroupID";
pub(crate) const CUSTOM_NAME_KEY: &str = "ItemCustomName";
pub(crate) const SURFACE_MATERIAL_KEY: &str = "SurfaceMaterial";
pub(crate) const URL_KEY: &str = "URL";

pub(crate) const INT_PROPERTY: &str = "IntProperty";
pub(crate) const NAME_PROPERTY: &str = "NameProperty";

fn join(path: &str, key: &str) -> String {
    format!("{}.{}", path, key)
}

pub(crate) fn get<'a>(doc: &'a Document, key: &str, path: &str) -> Result<&'a Value> {
    doc.get(key)
        .ok_or_else(|| TowerError::MissingField(join(path, key)))
}

pub(crate) fn get_str<'a>(doc: &'a Document, key: &str, path: &str) -> Result<&'a str> {
    let value = get(doc, key, path)?;
    value
        .as_str()
        .ok_or_else(|| TowerError::wrong_type(join(path, key), "string", value))
}

pub(crate) fn get_i64(doc: &Document, key: &str, path: &str) -> Result<i64> {
    let value = get(doc, key, path)?;
    value
        .as_i64()
        .ok_or_else(|| TowerError::wrong_type(join(path, key), "integer", value))
}

pub(crate) fn get_object<'a>(doc: &'a Document, key: &str, path: &str) -> Result<&'a Document> {
    let value = get(doc, key, path)?;
    value
        .as_object()
        .ok_or_else(|| TowerError::wrong_type(join(path, key), "object", value))
}

pub(crate) fn get_object_mut<'a>(
    doc: &'a mut Document,
    key: &str,
    path: &str,
) -> Result<&'a mut Document> {
    match doc.get_mut(key) {
        Some(Value::Object(map)) => Ok(map),
        Some(other) => Err(TowerError::wrong_type(join(path, key), "object", other)),
        None => Err(TowerError::MissingField(join(path, key))),
    }
}

/// Wrap an integer the way the save format tags property values
pub(crate) fn int_property(value: i64) -> Value {
    let mut wrapper = Map::new();
    wrapper.insert(INT_PROPERTY.to_string(), Value::from(value));
    Value::Object(wrapper)
}
