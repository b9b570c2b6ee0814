use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use crate::key::{ItemKey, KeyMap};
use crate::{ContentMetrics, ListItem};

/// A height cache shared between lists, measurers, and resize observers.
///
/// All users live on the UI thread, so sharing is `Rc<RefCell<_>>` rather than a lock.
pub type SharedHeightCache<K> = Rc<RefCell<HeightCache<K>>>;

/// How a cached height was obtained, in increasing order of precision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Precision {
    Estimated,
    Measured,
    Observed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct HeightEntry {
    height: u32,
    precision: Precision,
}

/// Content-based height heuristic used before a row has ever been measured.
///
/// `base + extra title lines + description lines + tags bonus + padding`, where the first
/// title line is part of `base`. It only has to be close enough to keep the layout from
/// collapsing until real measurements arrive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeightEstimator {
    pub base: u32,
    pub line_height: u32,
    pub title_chars_per_line: u32,
    pub description_chars_per_line: u32,
    pub tags_bonus: u32,
    pub padding: u32,
}

impl Default for HeightEstimator {
    fn default() -> Self {
        Self {
            base: 56,
            line_height: 20,
            title_chars_per_line: 20,
            description_chars_per_line: 50,
            tags_bonus: 24,
            padding: 16,
        }
    }
}

impl HeightEstimator {
    pub fn estimate(&self, metrics: ContentMetrics) -> u32 {
        let title_lines = lines_for(metrics.title_chars, self.title_chars_per_line);
        let description_lines =
            lines_for(metrics.description_chars, self.description_chars_per_line);
        let extra_lines = title_lines.saturating_sub(1).saturating_add(description_lines);

        let mut height = self
            .base
            .saturating_add(extra_lines.saturating_mul(self.line_height))
            .saturating_add(self.padding);
        if metrics.has_tags {
            height = height.saturating_add(self.tags_bonus);
        }
        height
    }
}

fn lines_for(chars: usize, per_line: u32) -> u32 {
    if chars == 0 {
        return 0;
    }
    let per_line = per_line.max(1) as usize;
    u32::try_from(chars.div_ceil(per_line)).unwrap_or(u32::MAX)
}

/// Item id → last known rendered height.
///
/// Heights get more precise over time: estimate, then the off-screen measurement, then resize
/// observations of the mounted row. Every write overwrites; nothing is evicted except through
/// [`HeightCache::clear_height`] and [`HeightCache::clear_all`].
#[derive(Clone, Debug)]
pub struct HeightCache<K> {
    entries: KeyMap<K, HeightEntry>,
    default_height: u32,
    estimator: HeightEstimator,
}

impl<K: ItemKey> HeightCache<K> {
    pub fn new(default_height: u32) -> Self {
        Self {
            entries: KeyMap::new(),
            default_height,
            estimator: HeightEstimator::default(),
        }
    }

    pub fn with_estimator(mut self, estimator: HeightEstimator) -> Self {
        self.estimator = estimator;
        self
    }

    /// Wraps the cache for sharing.
    pub fn shared(self) -> SharedHeightCache<K> {
        Rc::new(RefCell::new(self))
    }

    pub fn default_height(&self) -> u32 {
        self.default_height
    }

    pub fn estimator(&self) -> &HeightEstimator {
        &self.estimator
    }

    /// Returns the cached height for `id`.
    ///
    /// On a miss, supplied `content` is estimated and the estimate is stored; without content
    /// the configured default is returned and nothing is stored.
    pub fn get_height(&mut self, id: K, content: Option<ContentMetrics>) -> u32 {
        if let Some(entry) = self.entries.get(&id) {
            return entry.height;
        }
        let Some(content) = content else {
            return self.default_height;
        };
        let height = self.estimator.estimate(content);
        vtrace!(height, "HeightCache: stored estimate");
        self.entries.insert(
            id,
            HeightEntry {
                height,
                precision: Precision::Estimated,
            },
        );
        height
    }

    /// [`Self::get_height`] for an item payload.
    pub fn get_item_height<T: ListItem<Id = K> + ?Sized>(&mut self, item: &T) -> u32 {
        self.get_height(item.id(), Some(item.content_metrics()))
    }

    /// Side-effect free lookup.
    pub fn cached_height(&self, id: &K) -> Option<u32> {
        self.entries.get(id).map(|e| e.height)
    }

    /// Same as [`Self::cached_height`], falling back to the default height.
    pub fn height_or_default(&self, id: &K) -> u32 {
        self.cached_height(id).unwrap_or(self.default_height)
    }

    pub fn precision(&self, id: &K) -> Option<Precision> {
        self.entries.get(id).map(|e| e.precision)
    }

    /// Stores a measured height, replacing whatever was cached.
    pub fn set_height(&mut self, id: K, height: u32) {
        self.insert(id, height, Precision::Measured);
    }

    /// Stores a height reported by a resize observation of a mounted row.
    pub fn set_observed_height(&mut self, id: K, height: u32) {
        self.insert(id, height, Precision::Observed);
    }

    fn insert(&mut self, id: K, height: u32, precision: Precision) {
        self.entries.insert(id, HeightEntry { height, precision });
    }

    pub fn clear_height(&mut self, id: &K) -> Option<u32> {
        self.entries.remove(id).map(|e| e.height)
    }

    pub fn clear_all(&mut self) {
        vdebug!(entries = self.entries.len(), "HeightCache::clear_all");
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns a copy of every cached height.
    pub fn all_heights(&self) -> KeyMap<K, u32> {
        self.entries
            .iter()
            .map(|(k, e)| (k.clone(), e.height))
            .collect()
    }

    /// Exports cached heights with their precision (useful for persistence).
    pub fn export(&self) -> Vec<(K, u32, Precision)> {
        self.entries
            .iter()
            .map(|(k, e)| (k.clone(), e.height, e.precision))
            .collect()
    }

    /// Replaces the cache contents with previously exported entries.
    pub fn import(&mut self, entries: impl IntoIterator<Item = (K, u32, Precision)>) {
        self.entries.clear();
        for (id, height, precision) in entries {
            self.insert(id, height, precision);
        }
        vdebug!(entries = self.entries.len(), "HeightCache::import");
    }
}

#[cfg(feature = "std")]
std::thread_local! {
    static DEFAULT_HEIGHTS: SharedHeightCache<crate::ItemId> =
        HeightCache::new(crate::ListOptions::DEFAULT_ITEM_SIZE).shared();
}

/// The application-wide height cache for [`crate::ItemId`] keys.
///
/// Lists, measurers, and observers that should see each other's heights share this instance.
/// Lists that must stay independent should construct their own [`HeightCache`].
#[cfg(feature = "std")]
pub fn default_height_cache() -> SharedHeightCache<crate::ItemId> {
    DEFAULT_HEIGHTS.with(Rc::clone)
}
