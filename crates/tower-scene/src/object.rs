//! The dual-view scene object
//!
//! Every object in a save is described by an item document (the full record:
//! guid, name, property map, transform, connections) and/or a properties
//! document (a projection of the same object used where the item record is
//! not available). An object always has at least one of the two.
//!
//! # Invariants
//! - `item` and `properties` are never both `None`.
//! - Group and connection writes go to both documents or to neither.

use crate::connection::{
    connection_values, connection_values_mut, empty_connections, ItemConnection, CONNECTIONS_KEY,
};
use crate::document::{
    get, get_i64, get_object, get_object_mut, get_str, int_property, Document, CUSTOM_NAME_KEY,
    GROUP_KEY, GUID_KEY, INT_PROPERTY, NAME_KEY, NAME_PROPERTY, PROPERTIES_KEY,
    SURFACE_MATERIAL_KEY, URL_KEY,
};
use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::cmp::Ordering;
use tower_core::{DocumentKind, GroupId, Guid, Quat, Result, TowerError, Vec3, NO_GROUP};

const WEATHER_PREFIX: &str = "CondoWeather";
const SETTINGS_PREFIX: &str = "CondoSettingsManager";
const SKY_PREFIX: &str = "Ultra_Dynamic_Sky";

const CANVAS_PREFIX: &str = "Canvas";

const POSITION_KEY: &str = "position";
const ROTATION_KEY: &str = "rotation";
const SCALE_KEY: &str = "scale";

/// One object in a save
#[derive(Debug, Clone, PartialEq)]
pub struct TowerObject {
    item: Option<Document>,
    properties: Option<Document>,
}

impl TowerObject {
    /// Build an object from its documents.
    ///
    /// Items without a connection list get the empty one the save format
    /// expects. Fails with `EmptyObject` when both documents are absent.
    pub fn new(item: Option<Document>, properties: Option<Document>) -> Result<Self> {
        if item.is_none() && properties.is_none() {
            return Err(TowerError::EmptyObject);
        }

        let mut item = item;
        if let Some(item) = item.as_mut() {
            if !item.contains_key(CONNECTIONS_KEY) {
                item.insert(CONNECTIONS_KEY.to_string(), empty_connections());
            }
        }

        Ok(Self { item, properties })
    }

    /// Build an object from JSON values; each present value must be an object
    pub fn from_values(item: Option<Value>, properties: Option<Value>) -> Result<Self> {
        let item = item.map(|v| into_document(v, "item")).transpose()?;
        let properties = properties
            .map(|v| into_document(v, "properties"))
            .transpose()?;
        Self::new(item, properties)
    }

    /// Parse an object from JSON text
    pub fn from_json(item: Option<&str>, properties: Option<&str>) -> Result<Self> {
        let item = item
            .map(|text| serde_json::from_str::<Value>(text))
            .transpose()?;
        let properties = properties
            .map(|text| serde_json::from_str::<Value>(text))
            .transpose()?;
        Self::from_values(item, properties)
    }

    pub fn item(&self) -> Option<&Document> {
        self.item.as_ref()
    }

    pub fn properties(&self) -> Option<&Document> {
        self.properties.as_ref()
    }

    /// Hand both documents back, e.g. to write them into a save container
    pub fn into_documents(self) -> (Option<Document>, Option<Document>) {
        (self.item, self.properties)
    }

    pub(crate) fn documents_mut(&mut self) -> (Option<&mut Document>, Option<&mut Document>) {
        (self.item.as_mut(), self.properties.as_mut())
    }

    pub fn is_item(&self) -> bool {
        self.item.is_some()
    }

    pub fn is_properties_only(&self) -> bool {
        self.item.is_none()
    }

    /// The object's guid as written in the item document
    pub fn guid(&self) -> Result<Option<&str>> {
        match &self.item {
            Some(item) => Ok(Some(get_str(item, GUID_KEY, "item")?)),
            None => Ok(None),
        }
    }

    pub fn name(&self) -> Result<&str> {
        match (&self.item, &self.properties) {
            (Some(item), _) => get_str(item, NAME_KEY, "item"),
            (None, Some(props)) => get_str(props, NAME_KEY, "properties"),
            (None, None) => Err(TowerError::EmptyObject),
        }
    }

    /// The user-assigned display name; empty when the object has none
    pub fn custom_name(&self) -> Result<&str> {
        let Some(item) = &self.item else {
            return Ok("");
        };
        let props = get_object(item, PROPERTIES_KEY, "item")?;
        if !props.contains_key(CUSTOM_NAME_KEY) {
            return Ok("");
        }
        let custom = get_object(props, CUSTOM_NAME_KEY, "item.properties")?;
        get_str(custom, NAME_PROPERTY, "item.properties.ItemCustomName")
    }

    /// Case-insensitive match against the object name or its custom name
    pub fn matches_name(&self, name: &str) -> Result<bool> {
        let name = name.to_lowercase();
        Ok(self.name()?.to_lowercase() == name || self.custom_name()?.to_lowercase() == name)
    }

    /// Whether this item displays a user image or material
    pub fn is_canvas(&self) -> Result<bool> {
        let Some(item) = &self.item else {
            return Ok(false);
        };
        let props = get_object(item, PROPERTIES_KEY, "item")?;
        Ok(self.name()?.starts_with(CANVAS_PREFIX)
            || props.contains_key(SURFACE_MATERIAL_KEY)
            || props.contains_key(URL_KEY))
    }

    /// The object's group tag, `None` when ungrouped or properties-only
    pub fn group_id(&self) -> Result<Option<GroupId>> {
        match &self.item {
            Some(item) => read_group(item, "item"),
            None => Ok(None),
        }
    }

    /// The group tag in the save's integer form, `NO_GROUP` when ungrouped
    pub fn raw_group_id(&self) -> Result<GroupId> {
        Ok(self.group_id()?.unwrap_or(NO_GROUP))
    }

    /// The group tag as recorded in the properties document
    pub fn properties_group_id(&self) -> Result<Option<GroupId>> {
        match &self.properties {
            Some(props) => read_group(props, "properties"),
            None => Ok(None),
        }
    }

    /// Tag the object with `group_id` in both documents
    pub fn set_group_id(&mut self, group_id: GroupId) -> Result<()> {
        let (item, props) = self.both_documents_mut()?;
        let item_props = get_object_mut(item, PROPERTIES_KEY, "item")?;
        // Both maps are resolved before the first write so a malformed
        // properties document cannot leave the item updated on its own.
        let props_props = get_object_mut(props, PROPERTIES_KEY, "properties")?;

        item_props.insert(GROUP_KEY.to_string(), int_property(group_id));
        props_props.insert(GROUP_KEY.to_string(), int_property(group_id));
        Ok(())
    }

    /// Remove the group tag from both documents
    pub fn ungroup(&mut self) -> Result<()> {
        let (item, props) = self.both_documents_mut()?;
        let item_props = get_object_mut(item, PROPERTIES_KEY, "item")?;
        let props_props = get_object_mut(props, PROPERTIES_KEY, "properties")?;

        item_props.shift_remove(GROUP_KEY);
        props_props.shift_remove(GROUP_KEY);
        Ok(())
    }

    /// Clone this object; item-backed clones get a fresh guid
    pub fn copy(&self) -> Self {
        let mut copied = self.clone();
        if let Some(item) = copied.item.as_mut() {
            item.insert(GUID_KEY.to_string(), Value::from(Guid::new().into_string()));
        }
        copied
    }

    pub fn position(&self) -> Result<Option<Vec3>> {
        self.read_spatial(POSITION_KEY)
    }

    pub fn set_position(&mut self, position: Vec3) -> Result<()> {
        self.write_spatial(POSITION_KEY, &position)
    }

    pub fn rotation(&self) -> Result<Option<Quat>> {
        self.read_spatial(ROTATION_KEY)
    }

    pub fn set_rotation(&mut self, rotation: Quat) -> Result<()> {
        self.write_spatial(ROTATION_KEY, &rotation)
    }

    pub fn scale(&self) -> Result<Option<Vec3>> {
        self.read_spatial(SCALE_KEY)
    }

    pub fn set_scale(&mut self, scale: Vec3) -> Result<()> {
        self.write_spatial(SCALE_KEY, &scale)
    }

    pub fn connections(&self) -> Result<Vec<ItemConnection>> {
        let item = self.item.as_ref().ok_or_else(|| self.missing(DocumentKind::Item))?;
        connection_values(item, "item")?
            .iter()
            .map(ItemConnection::from_value)
            .collect()
    }

    pub fn add_connection(&mut self, connection: &ItemConnection) -> Result<()> {
        let record = connection.to_value();
        let (item, props) = self.both_documents_mut()?;
        connection_values_mut(item, "item")?.push(record);
        mirror_connections(item, props)
    }

    pub fn set_connections(&mut self, connections: &[ItemConnection]) -> Result<()> {
        let records = connections.iter().map(ItemConnection::to_value).collect();
        let (item, props) = self.both_documents_mut()?;
        *connection_values_mut(item, "item")? = records;
        mirror_connections(item, props)
    }

    /// Stable output order for writing objects back into a save.
    ///
    /// Properties-only objects come first, led by the weather, settings
    /// manager and sky objects in that order; everything else sorts by name.
    pub fn output_order(&self, other: &Self) -> Ordering {
        self.order_key().cmp(&other.order_key())
    }

    fn order_key(&self) -> (u8, u8, &str) {
        let name = self.name().unwrap_or("");
        if self.is_item() {
            return (1, 0, name);
        }

        let pinned = if name.starts_with(WEATHER_PREFIX) {
            0
        } else if name.starts_with(SETTINGS_PREFIX) {
            1
        } else if name.starts_with(SKY_PREFIX) {
            2
        } else {
            3
        };
        (0, pinned, name)
    }

    fn read_spatial<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(item) = &self.item else {
            return Ok(None);
        };
        let value = get(item, key, "item")?;
        let parsed = serde_json::from_value::<T>(value.clone())
            .map_err(|_| TowerError::wrong_type(format!("item.{}", key), "spatial object", value))?;
        Ok(Some(parsed))
    }

    fn write_spatial<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()> {
        let label = self.label();
        let Some(item) = self.item.as_mut() else {
            warn!("Attempted to set {} on properties-only object '{}'", key, label);
            return Ok(());
        };

        let target = get_object_mut(item, key, "item")?;
        if let Value::Object(fields) = serde_json::to_value(value)? {
            for (field, v) in fields {
                target.insert(field, v);
            }
        }
        Ok(())
    }

    fn both_documents_mut(&mut self) -> Result<(&mut Document, &mut Document)> {
        let label = self.label();
        match (self.item.as_mut(), self.properties.as_mut()) {
            (Some(item), Some(props)) => Ok((item, props)),
            (None, _) => Err(TowerError::MissingDocument {
                object: label,
                document: DocumentKind::Item,
            }),
            (_, None) => Err(TowerError::MissingDocument {
                object: label,
                document: DocumentKind::Properties,
            }),
        }
    }

    fn missing(&self, document: DocumentKind) -> TowerError {
        TowerError::MissingDocument {
            object: self.label(),
            document,
        }
    }

    fn label(&self) -> String {
        self.name().unwrap_or("<unnamed>").to_string()
    }
}

fn into_document(value: Value, path: &str) -> Result<Document> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(TowerError::wrong_type(path, "object", &other)),
    }
}

fn read_group(doc: &Document, path: &str) -> Result<Option<GroupId>> {
    let props = get_object(doc, PROPERTIES_KEY, path)?;
    if !props.contains_key(GROUP_KEY) {
        return Ok(None);
    }
    let group = get_object(props, GROUP_KEY, &format!("{}.properties", path))?;
    let id = get_i64(group, INT_PROPERTY, &format!("{}.properties.GroupID", path))?;
    Ok((id >= 0).then_some(id))
}

fn mirror_connections(item: &Document, props: &mut Document) -> Result<()> {
    let connections = get(item, CONNECTIONS_KEY, "item")?.clone();
    props.insert(CONNECTIONS_KEY.to_string(), connections);
    Ok(())
}
