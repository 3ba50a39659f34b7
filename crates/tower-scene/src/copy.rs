//! Selection duplication
//!
//! Copies a selection so the copies reference each other instead of the
//! originals. Runs in two passes:
//! 1. Clone every object, give item-backed clones a fresh guid, move grouped
//!    clones onto newly allocated group tags, and record old guid -> new guid.
//! 2. Rewrite guid references inside every clone using that table, which
//!    repoints connections between members of the selection.
//!
//! References to objects outside the selection are left as they are.

use crate::groups::{ActiveSave, GroupRemapper};
use crate::options::CopyOptions;
use crate::rewrite::{rewrite_references, ReplacementTable};
use crate::selection::Selection;
use log::debug;
use tower_core::Result;

/// Duplicate `selection`, allocating new group tags against `save`
pub fn copy_selection<S: ActiveSave + ?Sized>(
    selection: &Selection,
    save: &mut S,
) -> Result<Selection> {
    copy_selection_with(selection, save, &CopyOptions::default())
}

/// Duplicate `selection` with explicit options
pub fn copy_selection_with<S: ActiveSave + ?Sized>(
    selection: &Selection,
    save: &mut S,
    options: &CopyOptions,
) -> Result<Selection> {
    let mut replacements = ReplacementTable::new();
    let mut groups = GroupRemapper::new(save);
    let mut copies = Vec::with_capacity(selection.len());

    // First pass: new guids, new groups, replacement table
    for obj in selection {
        let mut copied = obj.copy();

        if let Some(old_group) = obj.group_id()? {
            let new_group = groups.remap(old_group)?;
            copied.set_group_id(new_group)?;
        }

        if let (Some(old_guid), Some(new_guid)) = (obj.guid()?, copied.guid()?) {
            replacements.insert(old_guid, new_guid);
        }

        copies.push(copied);
    }

    // Second pass: repoint references at the copies
    for copied in &mut copies {
        rewrite_references(copied, &replacements, options.rewrite)?;
    }

    debug!(
        "Copied {} objects ({} guids, {} groups, {:?} rewrite)",
        copies.len(),
        replacements.len(),
        groups.allocated(),
        options.rewrite
    );

    Ok(Selection::from(copies))
}
