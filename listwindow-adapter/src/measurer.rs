use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use listwindow::{
    ContentMetrics, ItemKey, KeyMap, ListItem, ListMode, SharedHeightCache, VirtualList,
};

use crate::render::resolve_label;
use crate::{ItemRenderer, LabelResolver, RenderContext};

/// What to store when a measurement comes back as 0.
///
/// A zero height usually means the view was not laid out (hidden container, render error)
/// rather than an empty item.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ZeroHeightPolicy {
    /// Store the content estimate instead. The row is corrected by the first resize observation
    /// once it is mounted for real.
    #[default]
    FallbackToEstimate,
    /// Store 0 as measured.
    Accept,
}

/// A view rendered for the measurement pass, waiting for its height.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MountedItem<K, V> {
    pub id: K,
    pub view: V,
}

/// One-shot batch measurement of every item before variable-height layout is trusted.
///
/// All items are mounted first ([`OffscreenMeasurer::mount_all`]); heights may then be reported
/// in any order ([`OffscreenMeasurer::report`]). Each distinct id writes exactly one measured
/// height to the cache, and the completion callback fires once all of them have reported.
pub struct OffscreenMeasurer<K> {
    heights: SharedHeightCache<K>,
    zero_policy: ZeroHeightPolicy,
    pending: KeyMap<K, ContentMetrics>,
    expected: usize,
    complete: bool,
    on_complete: Option<Box<dyn FnMut()>>,
}

impl<K: ItemKey> OffscreenMeasurer<K> {
    pub fn new(heights: SharedHeightCache<K>, zero_policy: ZeroHeightPolicy) -> Self {
        Self {
            heights,
            zero_policy,
            pending: KeyMap::new(),
            expected: 0,
            complete: false,
            on_complete: None,
        }
    }

    /// A measurer writing into `list`'s height cache, or `None` in fixed mode where the pass is
    /// skipped.
    pub fn for_list(list: &VirtualList<K>) -> Option<Self> {
        match list.mode() {
            ListMode::Fixed { .. } => None,
            ListMode::Variable => Some(Self::new(
                list.heights().clone(),
                ZeroHeightPolicy::default(),
            )),
        }
    }

    /// Called once per pass, after the last pending item has reported.
    pub fn on_all_measurements_complete(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_complete = Some(Box::new(f));
        self
    }

    pub fn zero_policy(&self) -> ZeroHeightPolicy {
        self.zero_policy
    }

    pub fn expected_count(&self) -> usize {
        self.expected
    }

    pub fn measured_count(&self) -> usize {
        self.expected - self.pending.len()
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn is_pending(&self, id: &K) -> bool {
        self.pending.contains_key(id)
    }

    /// Starts a pass: renders every item off-screen and returns the views to lay out.
    ///
    /// Any pass still in flight is abandoned. An empty item list completes immediately.
    pub fn mount_all<T, R, L>(
        &mut self,
        items: &[T],
        renderer: &mut R,
        labels: &L,
    ) -> Vec<MountedItem<K, R::View>>
    where
        T: ListItem<Id = K>,
        R: ItemRenderer<T>,
        L: LabelResolver + ?Sized,
    {
        self.pending.clear();
        self.complete = false;

        let mut mounted = Vec::with_capacity(items.len());
        for item in items {
            let id = item.id();
            let label = resolve_label(item, labels);
            let cx = RenderContext {
                selection_mode: false,
                selected: false,
                label: label.as_deref(),
            };
            let view = renderer.render(item, &cx);
            self.pending.insert(id.clone(), item.content_metrics());
            mounted.push(MountedItem { id, view });
        }
        self.expected = self.pending.len();
        adebug!(
            items = items.len(),
            distinct = self.expected,
            "OffscreenMeasurer::mount_all"
        );

        if self.expected == 0 {
            self.finish();
        }
        mounted
    }

    /// Records the measured height of a mounted item.
    ///
    /// Returns `false` for ids that are not part of the pass or have already reported; those
    /// reports do not touch the cache.
    pub fn report(&mut self, id: &K, height: u32) -> bool {
        let Some(metrics) = self.pending.remove(id) else {
            atrace!(height, "OffscreenMeasurer: ignoring report");
            return false;
        };

        {
            let mut heights = self.heights.borrow_mut();
            let stored = match (height, self.zero_policy) {
                (0, ZeroHeightPolicy::FallbackToEstimate) => {
                    let estimate = heights.estimator().estimate(metrics);
                    awarn!(estimate, "OffscreenMeasurer: zero height, storing estimate");
                    estimate
                }
                _ => height,
            };
            heights.set_height(id.clone(), stored);
        }

        if self.pending.is_empty() {
            self.finish();
        }
        true
    }

    /// [`Self::mount_all`] followed by a report for every view, measured with `renderer`.
    ///
    /// Returns whether the pass completed.
    pub fn measure_all<T, R, L>(&mut self, items: &[T], renderer: &mut R, labels: &L) -> bool
    where
        T: ListItem<Id = K>,
        R: ItemRenderer<T>,
        L: LabelResolver + ?Sized,
    {
        let mounted = self.mount_all(items, renderer, labels);
        for m in &mounted {
            let height = renderer.measure_natural_height(&m.view);
            self.report(&m.id, height);
        }
        self.complete
    }

    fn finish(&mut self) {
        if self.complete {
            return;
        }
        self.complete = true;
        adebug!(measured = self.expected, "OffscreenMeasurer: pass complete");
        if let Some(f) = self.on_complete.as_mut() {
            f();
        }
    }
}

impl<K> fmt::Debug for OffscreenMeasurer<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OffscreenMeasurer")
            .field("zero_policy", &self.zero_policy)
            .field("expected", &self.expected)
            .field("pending", &self.pending.len())
            .field("complete", &self.complete)
            .finish_non_exhaustive()
    }
}
