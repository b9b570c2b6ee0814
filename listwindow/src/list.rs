use alloc::vec::Vec;
use core::cell::RefCell;
use core::cmp;

use crate::fenwick::Fenwick;
use crate::key::{ItemKey, KeyMap};
use crate::{
    Align, ConfigError, FocusRequest, ItemId, ListItem, ListMode, ListOptions, NavKey,
    ScrollDirection, ScrollState, ScrollTracker, SharedHeightCache, SharedScrollPositions,
    VirtualItem, VisibleRange,
};

/// Per-index heights and their prefix sums (variable mode only).
///
/// Only the first `sizes.len()` entries are valid. Anything past that was invalidated by
/// `reset_after_index` and is re-read from the height cache on the next layout query.
#[derive(Clone, Debug)]
struct Layout {
    sizes: Vec<u32>,
    sums: Fenwick,
}

impl Layout {
    fn new() -> Self {
        Self {
            sizes: Vec::new(),
            sums: Fenwick::new(),
        }
    }

    fn valid_len(&self) -> usize {
        self.sizes.len()
    }

    fn truncate(&mut self, len: usize) {
        self.sizes.truncate(len);
        self.sums.truncate(len);
    }
}

/// A headless windowing engine.
///
/// The list does not hold any UI objects or item payloads, only item ids in display order.
/// The adapter drives it with viewport heights, scroll events, and keyboard navigation, and
/// mounts the rows returned by [`VirtualList::for_each_virtual_item`].
///
/// In variable mode row heights are read from a shared [`crate::HeightCache`]. Whenever a height
/// changes outside the list, call [`VirtualList::reset_after_index`] (or
/// [`VirtualList::apply_resize`]) before the next layout query; the prefix sums for the
/// invalidated suffix are rebuilt lazily.
///
/// Layout queries briefly borrow the height cache, so they must not be called while the caller
/// holds a mutable borrow of it.
#[derive(Clone, Debug)]
pub struct VirtualList<K = ItemId> {
    options: ListOptions,
    viewport_height: u32,
    scroll: ScrollTracker,

    keys: Vec<K>,
    index_of: KeyMap<K, usize>,
    heights: SharedHeightCache<K>,
    layout: RefCell<Layout>,

    positions: Option<SharedScrollPositions>,
    focused: Option<usize>,
}

impl<K: ItemKey> VirtualList<K> {
    /// Creates a list. The windowing mode is taken from `options` and cannot change later.
    pub fn new(options: ListOptions, heights: SharedHeightCache<K>) -> Result<Self, ConfigError> {
        options.validate()?;
        vdebug!(
            mode = ?options.mode(),
            height = options.height,
            overscan = options.overscan_count,
            "VirtualList::new"
        );
        Ok(Self {
            viewport_height: options.height,
            scroll: ScrollTracker::new(options.intensity_step, options.is_scrolling_reset_delay_ms),
            keys: Vec::new(),
            index_of: KeyMap::new(),
            heights,
            layout: RefCell::new(Layout::new()),
            positions: None,
            focused: None,
            options,
        })
    }

    /// Attaches a scroll position store; offsets are saved under `options.list_key`.
    pub fn with_scroll_positions(mut self, positions: SharedScrollPositions) -> Self {
        self.positions = Some(positions);
        self
    }

    pub fn options(&self) -> &ListOptions {
        &self.options
    }

    pub fn mode(&self) -> ListMode {
        self.options.mode()
    }

    pub fn heights(&self) -> &SharedHeightCache<K> {
        &self.heights
    }

    /// Replaces the options. Switching between fixed and variable mode is rejected.
    pub fn set_options(&mut self, options: ListOptions) -> Result<(), ConfigError> {
        options.validate()?;
        if options.use_variable_heights != self.options.use_variable_heights {
            vwarn!("VirtualList::set_options: windowing mode cannot change at runtime");
            return Err(ConfigError::ModeSwitch);
        }
        if options.height != self.options.height {
            self.viewport_height = options.height;
        }
        self.scroll.set_step(options.intensity_step);
        self.scroll
            .set_reset_delay_ms(options.is_scrolling_reset_delay_ms);
        self.options = options;
        vtrace!(
            height = self.options.height,
            overscan = self.options.overscan_count,
            "VirtualList::set_options"
        );
        Ok(())
    }

    /// Clones the current options, applies `f`, then delegates to `set_options`.
    pub fn update_options(
        &mut self,
        f: impl FnOnce(&mut ListOptions),
    ) -> Result<(), ConfigError> {
        let mut next = self.options.clone();
        f(&mut next);
        self.set_options(next)
    }

    pub fn count(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Item ids in display order.
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    pub fn key_for(&self, index: usize) -> Option<&K> {
        self.keys.get(index)
    }

    pub fn index_of(&self, key: &K) -> Option<usize> {
        self.index_of.get(key).copied()
    }

    /// Replaces the displayed items.
    ///
    /// In variable mode every item without a cached height gets a content estimate, so the
    /// layout is usable before the measurement pass has run.
    pub fn set_items<T: ListItem<Id = K>>(&mut self, items: &[T]) {
        if self.options.use_variable_heights {
            let mut heights = self.heights.borrow_mut();
            for item in items {
                heights.get_item_height(item);
            }
        }
        self.set_item_keys(items.iter().map(|item| item.id()));
    }

    /// Replaces the displayed item ids (display order).
    ///
    /// Layout is invalidated from the first index whose id changed.
    pub fn set_item_keys(&mut self, keys: impl IntoIterator<Item = K>) {
        let next: Vec<K> = keys.into_iter().collect();
        let first_changed = self
            .keys
            .iter()
            .zip(next.iter())
            .position(|(a, b)| a != b)
            .unwrap_or_else(|| cmp::min(self.keys.len(), next.len()));

        self.index_of.clear();
        for (i, key) in next.iter().enumerate() {
            if self.index_of.insert(key.clone(), i).is_some() {
                vwarn!(index = i, "VirtualList: duplicate item id, heights will be shared");
            }
        }
        self.keys = next;
        self.reset_after_index(first_changed);

        if self.focused.is_some_and(|f| f >= self.keys.len()) {
            self.focused = None;
        }
        vdebug!(
            count = self.keys.len(),
            first_changed,
            "VirtualList::set_item_keys"
        );
    }

    /// Invalidates cumulative offsets at and after `index`.
    ///
    /// Must be called whenever a height at or after `index` changes outside the list. The
    /// suffix is re-read from the height cache on the next layout query.
    pub fn reset_after_index(&mut self, index: usize) {
        let layout = self.layout.get_mut();
        if index < layout.valid_len() {
            vtrace!(index, valid = layout.valid_len(), "reset_after_index");
            layout.truncate(index);
        }
    }

    /// [`Self::reset_after_index`] for the index currently holding `key`.
    pub fn reset_after_key(&mut self, key: &K) {
        if let Some(index) = self.index_of(key) {
            self.reset_after_index(index);
        }
    }

    /// Invalidates the whole layout (e.g. after a batch measurement pass).
    pub fn invalidate_layout(&mut self) {
        self.reset_after_index(0);
    }

    /// Records an observed height for `key` and updates the layout in place.
    ///
    /// Returns `false` if `key` is not displayed by this list (the cache is still updated).
    pub fn apply_resize(&mut self, key: &K, height: u32) -> bool {
        self.heights
            .borrow_mut()
            .set_observed_height(key.clone(), height);
        let Some(index) = self.index_of(key) else {
            return false;
        };
        vtrace!(index, height, "apply_resize");
        let layout = self.layout.get_mut();
        if let Some(size) = layout.sizes.get_mut(index) {
            // Point update; the suffix stays valid.
            let delta = height as i64 - *size as i64;
            *size = height;
            layout.sums.add(index, delta);
        }
        true
    }

    pub fn viewport_height(&self) -> u32 {
        self.viewport_height
    }

    pub fn set_viewport_height(&mut self, height: u32) {
        self.viewport_height = height;
    }

    pub fn scroll_offset(&self) -> u64 {
        self.scroll.offset()
    }

    pub fn scroll_state(&self) -> ScrollState {
        self.scroll.state()
    }

    pub fn scroll_tracker(&self) -> &ScrollTracker {
        &self.scroll
    }

    pub fn is_scrolling(&self) -> bool {
        self.scroll.is_scrolling()
    }

    /// Handles a user scroll event and returns the rows to mount.
    pub fn on_scroll(&mut self, offset: u64, now_ms: u64) -> VisibleRange {
        self.scroll.on_scroll(offset, now_ms);
        self.persist_offset();
        self.virtual_range()
    }

    /// Advances the scroll intensity decay.
    pub fn tick(&mut self, now_ms: u64) {
        self.scroll.tick(now_ms);
    }

    /// Stops scroll tracking (list unmounted).
    pub fn cancel_scrolling(&mut self) {
        self.scroll.cancel();
    }

    /// Programmatically scrolls to `offset` (clamped). Does not count as user scrolling.
    pub fn scroll_to_offset(&mut self, offset: u64) -> u64 {
        let offset = self.clamp_scroll_offset(offset);
        self.scroll.set_offset(offset);
        self.persist_offset();
        offset
    }

    /// Programmatically scrolls so that `index` is aligned in the viewport.
    ///
    /// Returns the applied (clamped) offset.
    pub fn scroll_to_item(&mut self, index: usize, align: Align) -> u64 {
        let offset = self.scroll_to_item_offset(index, align);
        self.scroll_to_offset(offset)
    }

    pub fn scroll_to_item_offset(&self, index: usize, align: Align) -> u64 {
        let count = self.count();
        if count == 0 {
            return 0;
        }
        let item = self.item(index.min(count - 1));
        let view = self.viewport_height as u64;

        let target = match align {
            Align::Start => item.start,
            Align::End => item.end().saturating_sub(view),
            Align::Center => {
                let center = item.start.saturating_add(item.size as u64 / 2);
                center.saturating_sub(view / 2)
            }
            Align::Auto => {
                let cur = self.scroll.offset();
                let cur_end = cur.saturating_add(view);
                if item.start >= cur && item.end() <= cur_end {
                    cur
                } else if item.start < cur {
                    item.start
                } else {
                    item.end().saturating_sub(view)
                }
            }
        };
        self.clamp_scroll_offset(target)
    }

    /// Returns the offset saved for this list's key, if a store and a key are configured.
    pub fn saved_scroll_position(&self) -> Option<u64> {
        let key = self.options.list_key.as_deref()?;
        let positions = self.positions.as_ref()?;
        Some(positions.borrow().scroll_position(key))
    }

    fn persist_offset(&self) {
        let (Some(key), Some(positions)) = (self.options.list_key.as_deref(), &self.positions)
        else {
            return;
        };
        positions
            .borrow_mut()
            .save_scroll_position(key, self.scroll.offset());
    }

    pub fn focused_index(&self) -> Option<usize> {
        self.focused
    }

    pub fn set_focused_index(&mut self, index: Option<usize>) {
        self.focused = index.filter(|&i| i < self.count());
    }

    /// Moves keyboard focus and scrolls the target row into view when needed.
    ///
    /// Without a focused row, arrow keys start from the first visible row. Returns `None` for an
    /// empty list.
    pub fn handle_key(&mut self, key: NavKey) -> Option<FocusRequest> {
        let count = self.count();
        if count == 0 {
            self.focused = None;
            return None;
        }
        let last = count - 1;
        let current = self.focused.filter(|&i| i <= last);
        let target = match (key, current) {
            (NavKey::Home, _) => 0,
            (NavKey::End, _) => last,
            (NavKey::ArrowDown, Some(i)) => cmp::min(i + 1, last),
            (NavKey::ArrowUp, Some(i)) => i.saturating_sub(1),
            (NavKey::ArrowDown | NavKey::ArrowUp, None) => {
                let visible = self.visible_range();
                if visible.is_empty() {
                    0
                } else {
                    visible.start_index
                }
            }
        };
        self.focused = Some(target);

        let offset = self.scroll_to_item_offset(target, Align::Auto);
        let scroll_offset = if offset != self.scroll.offset() {
            Some(self.scroll_to_offset(offset))
        } else {
            None
        };
        vtrace!(?key, target, ?scroll_offset, "handle_key");
        Some(FocusRequest {
            index: target,
            scroll_offset,
        })
    }

    pub fn total_size(&self) -> u64 {
        match self.mode() {
            ListMode::Fixed { item_size } => (self.count() as u64).saturating_mul(item_size as u64),
            ListMode::Variable => {
                self.ensure_layout();
                self.layout.borrow().sums.total()
            }
        }
    }

    pub fn max_scroll_offset(&self) -> u64 {
        self.total_size()
            .saturating_sub(self.viewport_height as u64)
    }

    pub fn clamp_scroll_offset(&self, offset: u64) -> u64 {
        offset.min(self.max_scroll_offset())
    }

    pub fn item_start(&self, index: usize) -> Option<u64> {
        (index < self.count()).then(|| self.start_of(index))
    }

    pub fn item_size(&self, index: usize) -> Option<u32> {
        (index < self.count()).then(|| self.size_of(index))
    }

    pub fn item_end(&self, index: usize) -> Option<u64> {
        let start = self.item_start(index)?;
        let size = self.item_size(index)? as u64;
        Some(start.saturating_add(size))
    }

    pub fn virtual_item(&self, index: usize) -> Option<VirtualItem> {
        (index < self.count()).then(|| self.item(index))
    }

    pub fn index_at_offset(&self, offset: u64) -> Option<usize> {
        let count = self.count();
        if count == 0 {
            return None;
        }
        let index = match self.mode() {
            ListMode::Fixed { item_size } => {
                usize::try_from(offset / item_size.max(1) as u64).unwrap_or(usize::MAX)
            }
            ListMode::Variable => {
                self.ensure_layout();
                self.layout.borrow().sums.lower_bound(offset)
            }
        };
        Some(index.min(count - 1))
    }

    /// Rows to mount at the current offset (visible window + overscan + preload).
    pub fn virtual_range(&self) -> VisibleRange {
        self.compute_visible_range(self.scroll.offset(), self.viewport_height)
    }

    /// Rows intersecting the viewport at the current offset, without overscan.
    pub fn visible_range(&self) -> VisibleRange {
        self.visible_range_for(self.scroll.offset(), self.viewport_height)
    }

    /// Rows to mount for an arbitrary offset and viewport height.
    ///
    /// The window is expanded by `overscan_count` on both sides and, while scrolling with
    /// preloading enabled, by `preload_buffer` in the scroll direction. With windowing
    /// optimization disabled every row is returned.
    pub fn compute_visible_range(&self, scroll_offset: u64, viewport_height: u32) -> VisibleRange {
        let count = self.count();
        if !self.options.enable_windowing_optimization {
            return VisibleRange {
                start_index: 0,
                end_index: count,
            };
        }

        let visible = self.visible_range_for(scroll_offset, viewport_height);
        if visible.is_empty() {
            return visible;
        }

        let overscan = self.options.overscan_count;
        let mut start = visible.start_index.saturating_sub(overscan);
        let mut end = cmp::min(count, visible.end_index.saturating_add(overscan));

        if self.options.enable_intelligent_preloading && self.scroll.is_scrolling() {
            let preload = self.options.preload_buffer;
            match self.scroll.direction() {
                Some(ScrollDirection::Down) => end = cmp::min(count, end.saturating_add(preload)),
                Some(ScrollDirection::Up) => start = start.saturating_sub(preload),
                None => {}
            }
        }

        VisibleRange {
            start_index: start,
            end_index: end,
        }
    }

    /// Rows intersecting `[scroll_offset, scroll_offset + viewport_height)`.
    ///
    /// `scroll_offset` is clamped to the scrollable range first.
    pub fn visible_range_for(&self, scroll_offset: u64, viewport_height: u32) -> VisibleRange {
        let count = self.count();
        if count == 0 || viewport_height == 0 {
            return VisibleRange::EMPTY;
        }

        let view = viewport_height as u64;
        let total = self.total_size();
        if total == 0 {
            return VisibleRange::EMPTY;
        }
        let visible_start = scroll_offset.min(total.saturating_sub(view));
        let visible_end_inclusive = visible_start.saturating_add(view).saturating_sub(1);

        let start = self.index_at_offset(visible_start).unwrap_or(count);
        let end = self
            .index_at_offset(cmp::max(visible_end_inclusive, visible_start))
            .map(|i| i + 1)
            .unwrap_or(count);

        VisibleRange {
            start_index: start.min(count),
            end_index: end.min(count),
        }
    }

    /// Calls `f` for every row to mount at the current offset, in index order.
    pub fn for_each_virtual_item(&self, f: impl FnMut(VirtualItem)) {
        self.for_each_virtual_item_for(self.scroll.offset(), self.viewport_height, f);
    }

    pub fn for_each_virtual_item_for(
        &self,
        scroll_offset: u64,
        viewport_height: u32,
        mut f: impl FnMut(VirtualItem),
    ) {
        let range = self.compute_visible_range(scroll_offset, viewport_height);
        if range.is_empty() {
            return;
        }
        let mut start = self.start_of(range.start_index);
        for index in range.start_index..range.end_index {
            let size = self.size_of(index);
            f(VirtualItem { index, start, size });
            start = start.saturating_add(size as u64);
        }
    }

    /// Collects the rows to mount into `out` (clears `out` first).
    ///
    /// For maximum performance, prefer `for_each_virtual_item` and reuse a scratch buffer.
    pub fn collect_virtual_items(&self, out: &mut Vec<VirtualItem>) {
        out.clear();
        self.for_each_virtual_item(|it| out.push(it));
    }

    fn item(&self, index: usize) -> VirtualItem {
        VirtualItem {
            index,
            start: self.start_of(index),
            size: self.size_of(index),
        }
    }

    fn start_of(&self, index: usize) -> u64 {
        match self.mode() {
            ListMode::Fixed { item_size } => (index as u64).saturating_mul(item_size as u64),
            ListMode::Variable => {
                self.ensure_layout();
                self.layout.borrow().sums.prefix_sum(index)
            }
        }
    }

    fn size_of(&self, index: usize) -> u32 {
        match self.mode() {
            ListMode::Fixed { item_size } => item_size,
            ListMode::Variable => {
                self.ensure_layout();
                self.layout.borrow().sizes.get(index).copied().unwrap_or(0)
            }
        }
    }

    /// Re-reads invalidated heights from the cache and appends them to the prefix sums.
    fn ensure_layout(&self) {
        let count = self.count();
        let mut layout = self.layout.borrow_mut();
        if layout.valid_len() > count {
            layout.truncate(count);
        }
        if layout.valid_len() == count {
            return;
        }

        let heights = self.heights.borrow();
        let from = layout.valid_len();
        if from == 0 {
            let sizes: Vec<u32> = self.keys.iter().map(|k| heights.height_or_default(k)).collect();
            layout.sums = Fenwick::from_sizes(&sizes);
            layout.sizes = sizes;
            vtrace!(count, "ensure_layout: rebuilt");
            return;
        }
        for key in &self.keys[from..] {
            let height = heights.height_or_default(key);
            layout.sizes.push(height);
            layout.sums.push(height);
        }
        vtrace!(from, count, "ensure_layout: rebuilt suffix");
    }
}

#[cfg(feature = "std")]
impl VirtualList<ItemId> {
    /// Creates a list backed by the application-wide height cache and scroll position store.
    pub fn with_defaults(options: ListOptions) -> Result<Self, ConfigError> {
        Ok(Self::new(options, crate::default_height_cache())?
            .with_scroll_positions(crate::default_scroll_positions()))
    }
}
