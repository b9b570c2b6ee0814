use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use alloc::string::String;
use core::cell::RefCell;

pub type SharedScrollPositions = Rc<RefCell<ScrollPositionStore>>;

/// Last scroll offset per logical list, for the lifetime of the session.
///
/// With `feature = "serde"` the store can be serialized if the caller wants it to outlive the
/// session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ScrollPositionStore {
    offsets: BTreeMap<String, u64>,
}

impl ScrollPositionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared(self) -> SharedScrollPositions {
        Rc::new(RefCell::new(self))
    }

    /// Last write wins.
    pub fn save_scroll_position(&mut self, key: &str, offset: u64) {
        if let Some(cur) = self.offsets.get_mut(key) {
            *cur = offset;
            return;
        }
        self.offsets.insert(String::from(key), offset);
    }

    /// Returns the saved offset for `key`, or 0 if none was saved.
    pub fn scroll_position(&self, key: &str) -> u64 {
        self.offsets.get(key).copied().unwrap_or(0)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.offsets.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<u64> {
        self.offsets.remove(key)
    }

    pub fn clear(&mut self) {
        self.offsets.clear();
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}

#[cfg(feature = "std")]
std::thread_local! {
    static DEFAULT_POSITIONS: SharedScrollPositions = ScrollPositionStore::new().shared();
}

/// The session-wide scroll position store.
#[cfg(feature = "std")]
pub fn default_scroll_positions() -> SharedScrollPositions {
    DEFAULT_POSITIONS.with(Rc::clone)
}
