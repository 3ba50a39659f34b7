//! Connection records wiring one object's events to another object's inputs

use crate::document::{get_object, get_object_mut, Document};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Number, Value};
use tower_core::{Result, TowerError};

/// Key of the connection list in both item and properties documents
pub const CONNECTIONS_KEY: &str = "ItemConnections";

/// The empty connection-list wrapper the save format expects on every item
pub fn empty_connections() -> Value {
    json!({
        "ArrayProperty": {
            "StructProperty": {
                "field_name": "ItemConnections",
                "value_type": "StructProperty",
                "struct_type": "ItemConnectionData",
                "values": []
            }
        }
    })
}

const ITEM_KEY: &str = "Item";
const EVENT_KEY: &str = "Event";
const LISTENER_KEY: &str = "Listener";
const DELAY_KEY: &str = "Delay";

/// Reference to another object by its guid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuidRef {
    #[serde(rename = "Guid")]
    pub guid: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A name-typed property value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NameProperty {
    #[serde(rename = "NameProperty")]
    pub name: String,
}

/// A float-typed property value, kept as written (`1` stays `1`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloatProperty {
    #[serde(rename = "FloatProperty")]
    pub value: Number,
}

/// Shape every record must have; anything else in it is left alone
#[derive(Deserialize)]
#[allow(dead_code)]
struct RecordShape {
    #[serde(rename = "Item")]
    item: GuidRef,
    #[serde(rename = "Event")]
    event: NameProperty,
    #[serde(rename = "Listener")]
    listener: NameProperty,
    #[serde(rename = "Delay", default)]
    delay: Option<FloatProperty>,
}

/// A single wire from this object's event to a listener on the target object.
///
/// The record is held exactly as read: key order, number formatting and
/// fields this type does not model are written back unchanged. The
/// accessors are typed views over it.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemConnection {
    record: Map<String, Value>,
}

impl ItemConnection {
    pub fn new(
        target: impl Into<String>,
        event: impl Into<String>,
        listener: impl Into<String>,
    ) -> Self {
        let mut record = Map::new();
        record.insert(ITEM_KEY.to_string(), json!({ "Guid": target.into() }));
        record.insert(EVENT_KEY.to_string(), json!({ "NameProperty": event.into() }));
        record.insert(
            LISTENER_KEY.to_string(),
            json!({ "NameProperty": listener.into() }),
        );
        Self { record }
    }

    pub fn with_delay(mut self, seconds: f64) -> Self {
        self.record
            .insert(DELAY_KEY.to_string(), json!({ "FloatProperty": seconds }));
        self
    }

    /// Guid of the object this connection points at
    pub fn target(&self) -> &str {
        self.field_str(ITEM_KEY, "Guid")
    }

    pub fn set_target(&mut self, guid: impl Into<String>) {
        if let Some(Value::Object(item)) = self.record.get_mut(ITEM_KEY) {
            item.insert("Guid".to_string(), Value::from(guid.into()));
        }
    }

    pub fn event(&self) -> &str {
        self.field_str(EVENT_KEY, "NameProperty")
    }

    pub fn listener(&self) -> &str {
        self.field_str(LISTENER_KEY, "NameProperty")
    }

    /// Delay in seconds, if the record has one
    pub fn delay(&self) -> Option<f64> {
        self.record
            .get(DELAY_KEY)
            .and_then(|d| d.get("FloatProperty"))
            .and_then(Value::as_f64)
    }

    /// The raw record, including fields without a typed accessor
    pub fn record(&self) -> &Map<String, Value> {
        &self.record
    }

    pub fn from_value(value: &Value) -> Result<Self> {
        let Value::Object(record) = value else {
            return Err(TowerError::wrong_type("connection", "object", value));
        };
        serde_json::from_value::<RecordShape>(value.clone())?;
        Ok(Self {
            record: record.clone(),
        })
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.record.clone())
    }

    // Present and a string once `from_value` or `new` has built the record
    fn field_str(&self, key: &str, field: &str) -> &str {
        self.record
            .get(key)
            .and_then(|v| v.get(field))
            .and_then(Value::as_str)
            .unwrap_or("")
    }
}

/// Borrow the raw record list out of a document's connection wrapper
pub(crate) fn connection_values<'a>(doc: &'a Document, path: &str) -> Result<&'a Vec<Value>> {
    let wrapper = get_object(doc, CONNECTIONS_KEY, path)?;
    let wrapper_path = format!("{}.{}", path, CONNECTIONS_KEY);
    let array = get_object(wrapper, "ArrayProperty", &wrapper_path)?;
    let array_path = format!("{}.ArrayProperty", wrapper_path);
    let inner = get_object(array, "StructProperty", &array_path)?;
    let values_path = format!("{}.StructProperty.values", array_path);
    let values = inner
        .get("values")
        .ok_or_else(|| TowerError::MissingField(values_path.clone()))?;
    values
        .as_array()
        .ok_or_else(|| TowerError::wrong_type(values_path, "array", values))
}

pub(crate) fn connection_values_mut<'a>(
    doc: &'a mut Document,
    path: &str,
) -> Result<&'a mut Vec<Value>> {
    let wrapper = get_object_mut(doc, CONNECTIONS_KEY, path)?;
    let wrapper_path = format!("{}.{}", path, CONNECTIONS_KEY);
    let array = get_object_mut(wrapper, "ArrayProperty", &wrapper_path)?;
    let array_path = format!("{}.ArrayProperty", wrapper_path);
    let inner = get_object_mut(array, "StructProperty", &array_path)?;
    let values_path = format!("{}.StructProperty.values", array_path);
    match inner.get_mut("values") {
        Some(Value::Array(values)) => Ok(values),
        Some(other) => Err(TowerError::wrong_type(values_path, "array", other)),
        None => Err(TowerError::MissingField(values_path)),
    }
}
