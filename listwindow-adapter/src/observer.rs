use alloc::boxed::Box;
use alloc::rc::Rc;
use core::fmt;

use listwindow::{ItemKey, SharedHeightCache};

/// Platform size observation, injected so layout logic runs without a rendering surface.
pub trait SizeObserver<K> {
    fn observe(&self, id: &K);
    fn unobserve(&self, id: &K);
}

/// Used where the platform cannot observe sizes: heights are simply never corrected after mount.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSizeObserver;

impl<K> SizeObserver<K> for NoopSizeObserver {
    fn observe(&self, _id: &K) {}
    fn unobserve(&self, _id: &K) {}
}

pub type ResizeCallback<K> = Box<dyn FnMut(&K, u32)>;

/// Watches one mounted row and feeds genuine size changes back into the height cache.
///
/// Observation starts on [`ResizeObserverWrapper::mount`] and stops on
/// [`ResizeObserverWrapper::unmount`] or drop, whichever comes first.
pub struct ResizeObserverWrapper<K> {
    id: K,
    observer: Rc<dyn SizeObserver<K>>,
    heights: SharedHeightCache<K>,
    last_height: Option<u32>,
    on_resize: Option<ResizeCallback<K>>,
    observing: bool,
}

impl<K: ItemKey> ResizeObserverWrapper<K> {
    pub fn mount(id: K, observer: Rc<dyn SizeObserver<K>>, heights: SharedHeightCache<K>) -> Self {
        observer.observe(&id);
        let last_height = heights.borrow().cached_height(&id);
        Self {
            id,
            observer,
            heights,
            last_height,
            on_resize: None,
            observing: true,
        }
    }

    pub fn with_on_resize(mut self, f: impl FnMut(&K, u32) + 'static) -> Self {
        self.on_resize = Some(Box::new(f));
        self
    }

    pub fn id(&self) -> &K {
        &self.id
    }

    /// The height from the most recent report, or the cached height at mount.
    pub fn last_height(&self) -> Option<u32> {
        self.last_height
    }

    pub fn is_observing(&self) -> bool {
        self.observing
    }

    /// Handles a size observation.
    ///
    /// Returns the new height if it differs from the height currently cached for this row; in
    /// that case the cache has been updated and `on_resize` was called. A report equal to the
    /// cached height (typically the first layout pass, even when the row was mounted before its
    /// measurement landed) does nothing.
    pub fn report(&mut self, height: u32) -> Option<u32> {
        if !self.observing {
            return None;
        }
        let cached = self.heights.borrow().cached_height(&self.id);
        self.last_height = Some(height);
        if cached == Some(height) {
            return None;
        }
        atrace!(cached = ?cached, height, "ResizeObserverWrapper: size changed");
        self.heights
            .borrow_mut()
            .set_observed_height(self.id.clone(), height);
        if let Some(f) = self.on_resize.as_mut() {
            f(&self.id, height);
        }
        Some(height)
    }
}

impl<K> ResizeObserverWrapper<K> {
    pub fn unmount(&mut self) {
        if !self.observing {
            return;
        }
        self.observing = false;
        self.observer.unobserve(&self.id);
    }
}

impl<K> Drop for ResizeObserverWrapper<K> {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl<K: fmt::Debug> fmt::Debug for ResizeObserverWrapper<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResizeObserverWrapper")
            .field("id", &self.id)
            .field("last_height", &self.last_height)
            .field("observing", &self.observing)
            .finish_non_exhaustive()
    }
}
