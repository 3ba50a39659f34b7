//! In-memory save state

use crate::groups::ActiveSave;
use crate::object::TowerObject;
use crate::selection::Selection;
use std::collections::BTreeMap;
use tower_core::{GroupId, Result};

/// The object list of a loaded save, with group bookkeeping.
///
/// Reading and writing the save container happens elsewhere; this only
/// tracks objects already in memory. Group counts are a snapshot and are
/// refreshed by [`ActiveSave::update_groups_meta`].
#[derive(Debug, Clone, Default)]
pub struct MemorySave {
    objects: Vec<TowerObject>,
    /// group tag -> number of member objects
    groups: BTreeMap<GroupId, usize>,
}

impl MemorySave {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a save from objects and index their groups
    pub fn from_objects(objects: impl IntoIterator<Item = TowerObject>) -> Result<Self> {
        let mut save = Self {
            objects: objects.into_iter().collect(),
            groups: BTreeMap::new(),
        };
        save.update_groups_meta()?;
        Ok(save)
    }

    pub fn objects(&self) -> &[TowerObject] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Append objects, e.g. the result of a duplication
    pub fn add_objects(&mut self, selection: Selection) {
        self.objects.extend(selection);
    }

    pub fn find_by_guid(&self, guid: &str) -> Option<&TowerObject> {
        self.objects
            .iter()
            .find(|o| matches!(o.guid(), Ok(Some(g)) if g == guid))
    }

    /// All objects whose name or custom name matches, case-insensitively
    pub fn find_by_name(&self, name: &str) -> Selection {
        self.objects
            .iter()
            .filter(|o| matches!(o.matches_name(name), Ok(true)))
            .cloned()
            .collect()
    }

    /// Number of objects in `group` as of the last refresh
    pub fn group_members(&self, group: GroupId) -> usize {
        self.groups.get(&group).copied().unwrap_or(0)
    }

    pub fn group_ids(&self) -> impl Iterator<Item = GroupId> + '_ {
        self.groups.keys().copied()
    }

    /// Sort objects into the order they are written back out
    pub fn sort(&mut self) {
        self.objects.sort_by(|a, b| a.output_order(b));
    }

    pub fn into_objects(self) -> Vec<TowerObject> {
        self.objects
    }
}

impl ActiveSave for MemorySave {
    fn update_groups_meta(&mut self) -> Result<()> {
        let mut groups = BTreeMap::new();
        for obj in &self.objects {
            if let Some(group) = obj.group_id()? {
                *groups.entry(group).or_insert(0) += 1;
            }
        }
        self.groups = groups;
        Ok(())
    }

    fn max_group_id(&self) -> Result<Option<GroupId>> {
        Ok(self.groups.keys().next_back().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::copy::copy_selection;
    use serde_json::json;

    fn item(guid: &str, name: &str, group: Option<GroupId>) -> TowerObject {
        let mut props = json!({});
        if let Some(group) = group {
            props["GroupID"] = json!({"IntProperty": group});
        }
        TowerObject::from_values(
            Some(json!({"name": name, "guid": guid, "properties": props.clone()})),
            Some(json!({"name": name, "properties": props})),
        )
        .unwrap()
    }

    #[test]
    fn test_groups_indexed_on_load() {
        let save = MemorySave::from_objects(vec![
            item("G1", "A", Some(3)),
            item("G2", "B", Some(3)),
            item("G3", "C", Some(1)),
            item("G4", "D", None),
        ])
        .unwrap();

        assert_eq!(save.max_group_id().unwrap(), Some(3));
        assert_eq!(save.group_members(3), 2);
        assert_eq!(save.group_ids().collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn test_empty_save_has_no_max() {
        let save = MemorySave::new();
        assert!(save.is_empty());
        assert_eq!(save.max_group_id().unwrap(), None);
    }

    #[test]
    fn test_meta_is_a_snapshot_until_refreshed() {
        let mut save = MemorySave::from_objects(vec![item("G1", "A", Some(1))]).unwrap();
        save.add_objects(Selection::from(vec![item("G2", "B", Some(8))]));
        assert_eq!(save.max_group_id().unwrap(), Some(1));

        save.update_groups_meta().unwrap();
        assert_eq!(save.max_group_id().unwrap(), Some(8));
    }

    #[test]
    fn test_lookup() {
        let save = MemorySave::from_objects(vec![item("G1", "Door", None), item("G2", "Lamp", None)])
            .unwrap();
        assert_eq!(save.find_by_guid("G2").unwrap().name().unwrap(), "Lamp");
        assert!(save.find_by_guid("G9").is_none());
        assert_eq!(save.find_by_name("DOOR").len(), 1);
    }

    #[test]
    fn test_repeated_copies_never_reuse_groups() {
        let mut save = MemorySave::from_objects(vec![item("G1", "A", Some(0))]).unwrap();
        let selection = Selection::from(vec![save.objects()[0].clone()]);

        let first = copy_selection(&selection, &mut save).unwrap();
        save.add_objects(first);
        let second = copy_selection(&selection, &mut save).unwrap();

        assert_eq!(second.get(0).unwrap().group_id().unwrap(), Some(2));
        save.add_objects(second);
        save.update_groups_meta().unwrap();
        assert_eq!(save.group_ids().collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(save.len(), 3);
    }
}
