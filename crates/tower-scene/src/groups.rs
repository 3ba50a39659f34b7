//! Group tag allocation against the active save

use log::debug;
use std::collections::HashMap;
use tower_core::{GroupId, Result, TowerError, NO_GROUP};

/// The save that newly allocated group tags must not collide with.
///
/// Implementations own the bookkeeping of which tags are in use. Callers hold
/// it by `&mut` for the whole duplication, so two duplications can never
/// allocate against the same save at once.
pub trait ActiveSave {
    /// Recompute which group tags are in use from the save's objects
    fn update_groups_meta(&mut self) -> Result<()>;

    /// The highest group tag in use, `None` when nothing is grouped
    fn max_group_id(&self) -> Result<Option<GroupId>>;
}

impl<S: ActiveSave + ?Sized> ActiveSave for &mut S {
    fn update_groups_meta(&mut self) -> Result<()> {
        (**self).update_groups_meta()
    }

    fn max_group_id(&self) -> Result<Option<GroupId>> {
        (**self).max_group_id()
    }
}

/// Maps source group tags to fresh ones for a single duplication.
///
/// Every distinct source tag gets one new tag, strictly above both the save's
/// current maximum and everything allocated earlier in the same pass.
pub struct GroupRemapper<'a, S: ActiveSave + ?Sized> {
    save: &'a mut S,
    assigned: HashMap<GroupId, GroupId>,
    highest: GroupId,
}

impl<'a, S: ActiveSave + ?Sized> GroupRemapper<'a, S> {
    pub fn new(save: &'a mut S) -> Self {
        Self {
            save,
            assigned: HashMap::new(),
            highest: NO_GROUP,
        }
    }

    /// The new tag for `old`, allocating one the first time `old` is seen
    pub fn remap(&mut self, old: GroupId) -> Result<GroupId> {
        if let Some(&new) = self.assigned.get(&old) {
            return Ok(new);
        }

        self.save.update_groups_meta()?;
        let save_max = self.save.max_group_id()?.unwrap_or(NO_GROUP);
        let new = save_max
            .max(self.highest)
            .checked_add(1)
            .ok_or_else(|| {
                TowerError::GroupAllocation(format!("no group tag left above {}", save_max))
            })?;

        debug!("Allocated group {} for source group {}", new, old);
        self.assigned.insert(old, new);
        self.highest = new;
        Ok(new)
    }

    /// Number of distinct tags allocated so far
    pub fn allocated(&self) -> usize {
        self.assigned.len()
    }

    pub fn get(&self, old: GroupId) -> Option<GroupId> {
        self.assigned.get(&old).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A save whose maximum never changes and that counts refreshes
    struct FixedSave {
        max: Option<GroupId>,
        refreshes: usize,
    }

    impl ActiveSave for FixedSave {
        fn update_groups_meta(&mut self) -> Result<()> {
            self.refreshes += 1;
            Ok(())
        }

        fn max_group_id(&self) -> Result<Option<GroupId>> {
            Ok(self.max)
        }
    }

    struct BrokenSave;

    impl ActiveSave for BrokenSave {
        fn update_groups_meta(&mut self) -> Result<()> {
            Ok(())
        }

        fn max_group_id(&self) -> Result<Option<GroupId>> {
            Err(TowerError::GroupAllocation("save is not loaded".to_string()))
        }
    }

    #[test]
    fn test_allocates_above_save_max() {
        let mut save = FixedSave {
            max: Some(5),
            refreshes: 0,
        };
        let mut groups = GroupRemapper::new(&mut save);
        assert_eq!(groups.remap(2).unwrap(), 6);
    }

    #[test]
    fn test_distinct_sources_do_not_collide() {
        let mut save = FixedSave {
            max: Some(5),
            refreshes: 0,
        };
        let mut groups = GroupRemapper::new(&mut save);

        assert_eq!(groups.remap(2).unwrap(), 6);
        assert_eq!(groups.remap(9).unwrap(), 7);
        assert_eq!(groups.remap(2).unwrap(), 6);
        assert_eq!(groups.remap(0).unwrap(), 8);
        assert_eq!(groups.allocated(), 3);
        assert_eq!(groups.get(9), Some(7));
    }

    #[test]
    fn test_refreshes_once_per_distinct_group() {
        let mut save = FixedSave {
            max: None,
            refreshes: 0,
        };
        {
            let mut groups = GroupRemapper::new(&mut save);
            assert_eq!(groups.remap(4).unwrap(), 0);
            assert_eq!(groups.remap(4).unwrap(), 0);
            assert_eq!(groups.remap(1).unwrap(), 1);
        }
        assert_eq!(save.refreshes, 2);
    }

    #[test]
    fn test_save_errors_propagate() {
        let mut save = BrokenSave;
        let mut groups = GroupRemapper::new(&mut save);
        assert!(matches!(groups.remap(1), Err(TowerError::GroupAllocation(_))));
        assert_eq!(groups.allocated(), 0);
    }

    #[test]
    fn test_overflow_is_an_error() {
        let mut save = FixedSave {
            max: Some(GroupId::MAX),
            refreshes: 0,
        };
        let mut groups = GroupRemapper::new(&mut save);
        assert!(matches!(groups.remap(1), Err(TowerError::GroupAllocation(_))));
    }
}
