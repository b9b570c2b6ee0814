use alloc::vec::Vec;

use listwindow::{ItemKey, KeySet};

/// A change to the caller-owned selection set proposed by a click.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectionIntent<K> {
    /// Flip membership of one item.
    Toggle(K),
    /// Replace the selection with these items (display order, inclusive of both ends).
    Range(Vec<K>),
}

impl<K: ItemKey> SelectionIntent<K> {
    pub fn apply_to(&self, selected: &mut KeySet<K>) {
        match self {
            SelectionIntent::Toggle(key) => {
                if !selected.remove(key) {
                    selected.insert(key.clone());
                }
            }
            SelectionIntent::Range(keys) => {
                selected.clear();
                selected.extend(keys.iter().cloned());
            }
        }
    }
}

/// Turns selection clicks into [`SelectionIntent`]s.
///
/// The range anchor is the item of the most recent plain (non-shift) click. Shift-clicks select
/// from the anchor to the clicked item in the current display order and leave the anchor where
/// it is, so successive shift-clicks pivot around the same item. A shift-click with no usable
/// anchor behaves like a plain click.
#[derive(Clone, Debug)]
pub struct SelectionController<K> {
    anchor: Option<K>,
}

impl<K> Default for SelectionController<K> {
    fn default() -> Self {
        Self { anchor: None }
    }
}

impl<K: ItemKey> SelectionController<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn anchor(&self) -> Option<&K> {
        self.anchor.as_ref()
    }

    pub fn clear_anchor(&mut self) {
        self.anchor = None;
    }

    /// Handles a click on `key`, where `order` is the list's display order.
    pub fn click(&mut self, key: &K, shift: bool, order: &[K]) -> SelectionIntent<K> {
        if shift {
            if let Some(range) = self.range_to(key, order) {
                atrace!(len = range.len(), "SelectionController: range");
                return SelectionIntent::Range(range);
            }
        }
        self.anchor = Some(key.clone());
        SelectionIntent::Toggle(key.clone())
    }

    fn range_to(&self, key: &K, order: &[K]) -> Option<Vec<K>> {
        let anchor = self.anchor.as_ref()?;
        let from = order.iter().position(|k| k == anchor)?;
        let to = order.iter().position(|k| k == key)?;
        let (lo, hi) = if from <= to { (from, to) } else { (to, from) };
        Some(order[lo..=hi].to_vec())
    }
}
