use alloc::rc::Rc;
use alloc::vec::Vec;
use core::fmt;

use listwindow::{
    Align, ConfigError, FocusRequest, ItemId, ItemKey, KeyMap, ListItem, ListMode, ListOptions,
    NavKey, VirtualList, VisibleRange,
};

use crate::{
    ItemRenderer, LabelResolver, NoopSizeObserver, OffscreenMeasurer, PlaceholderConfig,
    PlaceholderGate, ResizeObserverWrapper, RowAction, RowEvent, RowScroll, ScrollRestore,
    SelectionController, SizeObserver,
};

/// A mounted row as the UI layer should draw it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowSlot<K> {
    pub index: usize,
    pub key: K,
    pub start: u64,
    pub size: u32,
    pub show_placeholder: bool,
}

/// A framework-neutral controller that wraps a [`VirtualList`] and the per-row state around it.
///
/// This type does not hold any UI objects. Adapters drive it by calling:
/// - `on_viewport_height` / `on_scroll` when UI events occur
/// - `tick(now_ms)` each frame/timer tick (scroll decay, placeholder delays, scroll restoration)
/// - `rows(now_ms)` to get the rows to mount
///
/// `tick` returns an offset when the controller wants the real scroll container moved (scroll
/// restoration after a remount). The scroll event the container reports back at exactly that
/// offset is treated as programmatic.
pub struct Controller<K = ItemId> {
    list: VirtualList<K>,
    gates: KeyMap<K, PlaceholderGate>,
    observers: KeyMap<K, ResizeObserverWrapper<K>>,
    size_observer: Rc<dyn SizeObserver<K>>,
    selection: SelectionController<K>,
    selection_mode: bool,
    restore: Option<ScrollRestore>,
    /// Offset last handed out by `tick`, until its scroll event comes back.
    applied_offset: Option<u64>,
    layout_ready: bool,
}

impl<K: ItemKey> Controller<K> {
    /// Wraps `list`. If the list has a saved scroll offset, restoring it starts once layout is
    /// ready (immediately in fixed mode, after [`Self::mark_layout_ready`] or
    /// [`Self::measure_all`] in variable mode).
    pub fn new(list: VirtualList<K>) -> Self {
        let restore = list
            .saved_scroll_position()
            .map(ScrollRestore::new)
            .filter(|r| !r.is_done());
        let layout_ready = matches!(list.mode(), ListMode::Fixed { .. });
        Self {
            list,
            gates: KeyMap::new(),
            observers: KeyMap::new(),
            size_observer: Rc::new(NoopSizeObserver),
            selection: SelectionController::new(),
            selection_mode: false,
            restore,
            applied_offset: None,
            layout_ready,
        }
    }

    /// Replaces the size observer. Rows already mounted unobserve themselves in the old one.
    pub fn with_size_observer(mut self, observer: Rc<dyn SizeObserver<K>>) -> Self {
        self.observers.clear();
        self.size_observer = observer;
        self
    }

    pub fn with_corrective_delay_ms(mut self, delay_ms: u64) -> Self {
        self.restore = self
            .restore
            .take()
            .map(|r| r.with_corrective_delay_ms(delay_ms));
        self
    }

    pub fn list(&self) -> &VirtualList<K> {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut VirtualList<K> {
        &mut self.list
    }

    pub fn selection(&self) -> &SelectionController<K> {
        &self.selection
    }

    pub fn selection_mode(&self) -> bool {
        self.selection_mode
    }

    /// Leaving selection mode also forgets the range anchor.
    pub fn set_selection_mode(&mut self, enabled: bool) {
        if !enabled {
            self.selection.clear_anchor();
        }
        self.selection_mode = enabled;
    }

    pub fn is_layout_ready(&self) -> bool {
        self.layout_ready
    }

    pub fn is_restoring(&self) -> bool {
        self.restore.is_some()
    }

    pub fn set_options(&mut self, options: ListOptions) -> Result<(), ConfigError> {
        self.list.set_options(options)?;
        // Gates pick up the new placeholder settings when rows are next collected.
        self.gates.clear();
        Ok(())
    }

    pub fn set_items<T: ListItem<Id = K>>(&mut self, items: &[T]) {
        self.list.set_items(items);
    }

    pub fn on_viewport_height(&mut self, height: u32) {
        self.list.set_viewport_height(height);
    }

    /// Call this when the UI reports a scroll.
    ///
    /// An event at the offset last returned by [`Self::tick`] is the container catching up with
    /// the restore and is applied without counting as user scrolling. Any other offset is a user
    /// scroll and cancels a pending scroll restore.
    pub fn on_scroll(&mut self, offset: u64, now_ms: u64) -> VisibleRange {
        if self.applied_offset.take() == Some(offset) {
            atrace!(offset, "Controller: restore scroll echoed");
            self.list.scroll_to_offset(offset);
            return self.list.virtual_range();
        }
        if let Some(mut restore) = self.restore.take() {
            restore.cancel();
            adebug!(offset, "Controller: user scroll cancels restore");
        }
        let range = self.list.on_scroll(offset, now_ms);
        self.update_gates(now_ms);
        range
    }

    /// Advances timers. Returns an offset to apply to the real scroll container, if any.
    pub fn tick(&mut self, now_ms: u64) -> Option<u64> {
        self.list.tick(now_ms);
        self.update_gates(now_ms);

        let restore = self.restore.as_mut()?;
        let out = restore
            .poll(now_ms, self.layout_ready)
            .map(|offset| self.list.scroll_to_offset(offset));
        if out.is_some() {
            self.applied_offset = out;
        }
        if restore.is_done() {
            self.restore = None;
        }
        out
    }

    /// Declares that rows now have real sizes (e.g. the caller ran its own measurement pass).
    pub fn mark_layout_ready(&mut self) {
        self.list.invalidate_layout();
        self.layout_ready = true;
    }

    /// Runs the off-screen measurement pass for `items` and marks layout ready.
    ///
    /// Skipped in fixed mode; returns whether a pass ran.
    pub fn measure_all<T, R, L>(&mut self, items: &[T], renderer: &mut R, labels: &L) -> bool
    where
        T: ListItem<Id = K>,
        R: ItemRenderer<T>,
        L: LabelResolver + ?Sized,
    {
        let Some(mut measurer) = OffscreenMeasurer::for_list(&self.list) else {
            self.layout_ready = true;
            return false;
        };
        measurer.measure_all(items, renderer, labels);
        self.mark_layout_ready();
        true
    }

    /// Programmatic scroll. Returns the applied (clamped) offset.
    pub fn scroll_to_item(&mut self, index: usize, align: Align) -> u64 {
        self.list.scroll_to_item(index, align)
    }

    pub fn scroll_to_offset(&mut self, offset: u64) -> u64 {
        self.list.scroll_to_offset(offset)
    }

    pub fn handle_key(&mut self, key: NavKey) -> Option<FocusRequest> {
        self.list.handle_key(key)
    }

    /// Resolves input on the row at `index`. The caller applies the returned action.
    pub fn row_event(&mut self, index: usize, event: RowEvent) -> RowAction<K> {
        let Some(key) = self.list.key_for(index).cloned() else {
            return RowAction::None;
        };
        event.resolve(
            &key,
            self.selection_mode,
            &mut self.selection,
            self.list.keys(),
        )
    }

    /// A size observation for a mounted row.
    ///
    /// Returns `true` when the height changed and the layout was updated.
    pub fn on_row_resize(&mut self, key: &K, height: u32) -> bool {
        let Some(observer) = self.observers.get_mut(key) else {
            return false;
        };
        match observer.report(height) {
            Some(height) => self.list.apply_resize(key, height),
            None => false,
        }
    }

    /// Rows to mount now, in index order.
    ///
    /// Rows entering the window get a placeholder gate (and, in variable mode, a resize
    /// observer); rows leaving it drop theirs.
    pub fn rows(&mut self, now_ms: u64) -> Vec<RowSlot<K>> {
        let range = self.list.virtual_range();
        let list = &self.list;
        self.gates
            .retain(|k, _| list.index_of(k).is_some_and(|i| range.contains(i)));
        self.observers
            .retain(|k, _| list.index_of(k).is_some_and(|i| range.contains(i)));

        let observe = list.mode() == ListMode::Variable;
        let config = PlaceholderConfig::from_options(list.options());
        let scroll = RowScroll::from(list.scroll_state());

        let mut out = Vec::with_capacity(range.len());
        list.for_each_virtual_item(|item| {
            let Some(key) = list.key_for(item.index) else {
                return;
            };
            let gate = self
                .gates
                .entry(key.clone())
                .or_insert_with(|| PlaceholderGate::new(config));
            gate.update(scroll, now_ms);
            if observe && !self.observers.contains_key(key) {
                let wrapper = ResizeObserverWrapper::mount(
                    key.clone(),
                    Rc::clone(&self.size_observer),
                    Rc::clone(list.heights()),
                );
                self.observers.insert(key.clone(), wrapper);
            }
            out.push(RowSlot {
                index: item.index,
                key: key.clone(),
                start: item.start,
                size: item.size,
                show_placeholder: gate.shows_placeholder(),
            });
        });
        atrace!(
            start = range.start_index,
            end = range.end_index,
            "Controller::rows"
        );
        out
    }

    /// Stops everything timed and releases row state (list unmounted).
    pub fn unmount(&mut self) {
        self.list.cancel_scrolling();
        self.gates.clear();
        self.observers.clear();
        self.restore = None;
        self.applied_offset = None;
    }

    fn update_gates(&mut self, now_ms: u64) {
        let scroll = RowScroll::from(self.list.scroll_state());
        for gate in self.gates.values_mut() {
            gate.update(scroll, now_ms);
        }
    }
}

impl<K: fmt::Debug> fmt::Debug for Controller<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Controller")
            .field("list", &self.list)
            .field("gates", &self.gates.len())
            .field("observers", &self.observers.len())
            .field("selection_mode", &self.selection_mode)
            .field("restore", &self.restore)
            .field("applied_offset", &self.applied_offset)
            .field("layout_ready", &self.layout_ready)
            .finish_non_exhaustive()
    }
}
