//! Working sets of objects passed between edits

use crate::object::TowerObject;

/// An ordered set of objects for one edit.
///
/// Selections are never written to a save; they only live for the duration
/// of a single transformation. Holding the same object twice is not
/// prevented, but nothing downstream expects it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    objects: Vec<TowerObject>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn push(&mut self, object: TowerObject) {
        self.objects.push(object);
    }

    pub fn get(&self, index: usize) -> Option<&TowerObject> {
        self.objects.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TowerObject> {
        self.objects.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, TowerObject> {
        self.objects.iter_mut()
    }

    pub fn as_slice(&self) -> &[TowerObject] {
        &self.objects
    }

    /// Sort into save output order (see [`TowerObject::output_order`])
    pub fn sort(&mut self) {
        self.objects.sort_by(|a, b| a.output_order(b));
    }

    pub fn into_vec(self) -> Vec<TowerObject> {
        self.objects
    }
}

impl From<Vec<TowerObject>> for Selection {
    fn from(objects: Vec<TowerObject>) -> Self {
        Self { objects }
    }
}

impl FromIterator<TowerObject> for Selection {
    fn from_iter<I: IntoIterator<Item = TowerObject>>(iter: I) -> Self {
        Self {
            objects: iter.into_iter().collect(),
        }
    }
}

impl Extend<TowerObject> for Selection {
    fn extend<I: IntoIterator<Item = TowerObject>>(&mut self, iter: I) {
        self.objects.extend(iter);
    }
}

impl IntoIterator for Selection {
    type Item = TowerObject;
    type IntoIter = std::vec::IntoIter<TowerObject>;

    fn into_iter(self) -> Self::IntoIter {
        self.objects.into_iter()
    }
}

impl<'a> IntoIterator for &'a Selection {
    type Item = &'a TowerObject;
    type IntoIter = std::slice::Iter<'a, TowerObject>;

    fn into_iter(self) -> Self::IntoIter {
        self.objects.iter()
    }
}
