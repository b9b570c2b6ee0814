use listwindow::{ItemKey, ListOptions, ScrollState};

use crate::{ItemRenderer, RenderContext, SelectionController, SelectionIntent};

/// Placeholder settings for one list, taken from [`ListOptions`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlaceholderConfig {
    pub enabled: bool,
    pub delay_ms: u64,
    /// Intensity must be strictly above this for the placeholder to be allowed.
    pub intensity_threshold: u8,
}

impl PlaceholderConfig {
    pub fn from_options(options: &ListOptions) -> Self {
        Self {
            enabled: options.use_scrolling_placeholder,
            delay_ms: options.scrolling_placeholder_delay_ms,
            intensity_threshold: options.intensity_threshold,
        }
    }
}

impl Default for PlaceholderConfig {
    fn default() -> Self {
        Self::from_options(&ListOptions::default())
    }
}

/// The part of the list's scroll state a row reacts to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RowScroll {
    pub is_scrolling: bool,
    pub intensity: u8,
}

impl From<ScrollState> for RowScroll {
    fn from(state: ScrollState) -> Self {
        Self {
            is_scrolling: state.is_scrolling(),
            intensity: state.intensity,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RowPhase {
    #[default]
    Content,
    Placeholder,
}

/// Decides whether a row shows its content or a lightweight placeholder.
///
/// `Content → Placeholder` only after intense scrolling has held for `delay_ms` without a break;
/// `Placeholder → Content` as soon as it stops. The pending delay is a timestamp, so cancelling
/// it is just clearing that timestamp.
#[derive(Clone, Debug)]
pub struct PlaceholderGate {
    config: PlaceholderConfig,
    phase: RowPhase,
    pending_since: Option<u64>,
}

impl PlaceholderGate {
    pub fn new(config: PlaceholderConfig) -> Self {
        Self {
            config,
            phase: RowPhase::Content,
            pending_since: None,
        }
    }

    pub fn config(&self) -> PlaceholderConfig {
        self.config
    }

    pub fn phase(&self) -> RowPhase {
        self.phase
    }

    pub fn shows_placeholder(&self) -> bool {
        self.phase == RowPhase::Placeholder
    }

    pub fn is_pending(&self) -> bool {
        self.pending_since.is_some()
    }

    fn allows_placeholder(&self, scroll: RowScroll) -> bool {
        self.config.enabled
            && scroll.is_scrolling
            && scroll.intensity > self.config.intensity_threshold
    }

    /// Feeds the current scroll state.
    pub fn update(&mut self, scroll: RowScroll, now_ms: u64) -> RowPhase {
        if !self.allows_placeholder(scroll) {
            self.cancel();
            return self.phase;
        }
        if self.phase == RowPhase::Content {
            let since = *self.pending_since.get_or_insert(now_ms);
            self.fire_if_due(since, now_ms);
        }
        self.phase
    }

    /// Advances the pending delay, assuming the last state passed to `update` still holds.
    pub fn tick(&mut self, now_ms: u64) -> RowPhase {
        if let Some(since) = self.pending_since {
            self.fire_if_due(since, now_ms);
        }
        self.phase
    }

    /// Back to `Content` with no pending delay (scrolling stopped, or the row unmounted).
    pub fn cancel(&mut self) {
        self.pending_since = None;
        self.phase = RowPhase::Content;
    }

    fn fire_if_due(&mut self, since: u64, now_ms: u64) {
        if now_ms.saturating_sub(since) >= self.config.delay_ms {
            self.pending_since = None;
            self.phase = RowPhase::Placeholder;
        }
    }
}

/// Selection affordance drawn in selection mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Checkbox {
    pub checked: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RowBody<V> {
    Content(V),
    /// Fills the slot without rendering the item.
    Placeholder { height: u32 },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowOutput<V> {
    pub checkbox: Option<Checkbox>,
    pub body: RowBody<V>,
}

impl<V> RowOutput<V> {
    pub fn is_placeholder(&self) -> bool {
        matches!(self.body, RowBody::Placeholder { .. })
    }
}

/// Renders one mounted row: selection affordance plus content or placeholder.
#[derive(Clone, Debug)]
pub struct RowRenderer {
    gate: PlaceholderGate,
}

impl RowRenderer {
    pub fn new(config: PlaceholderConfig) -> Self {
        Self {
            gate: PlaceholderGate::new(config),
        }
    }

    pub fn from_gate(gate: PlaceholderGate) -> Self {
        Self { gate }
    }

    pub fn gate(&self) -> &PlaceholderGate {
        &self.gate
    }

    pub fn gate_mut(&mut self) -> &mut PlaceholderGate {
        &mut self.gate
    }

    pub fn update_scroll(&mut self, scroll: RowScroll, now_ms: u64) -> RowPhase {
        self.gate.update(scroll, now_ms)
    }

    pub fn tick(&mut self, now_ms: u64) -> RowPhase {
        self.gate.tick(now_ms)
    }

    /// Renders the row into a slot of `height` pixels.
    ///
    /// The item renderer is not called while the placeholder is showing.
    pub fn render<T, R>(
        &self,
        item: &T,
        renderer: &mut R,
        cx: &RenderContext<'_>,
        height: u32,
    ) -> RowOutput<R::View>
    where
        T: ?Sized,
        R: ItemRenderer<T>,
    {
        let checkbox = cx.selection_mode.then_some(Checkbox {
            checked: cx.selected,
        });
        let body = if self.gate.shows_placeholder() {
            RowBody::Placeholder { height }
        } else {
            RowBody::Content(renderer.render(item, cx))
        };
        RowOutput { checkbox, body }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowKey {
    Enter,
    Space,
}

/// Pointer and keyboard input on a row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowEvent {
    AffordanceClick { shift: bool },
    ContentClick { shift: bool },
    /// Enter/Space on the focused row act like a plain content click.
    Key(RowKey),
}

/// What the caller should do in response to a [`RowEvent`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RowAction<K> {
    Select(SelectionIntent<K>),
    /// Invoke the item's content click callback.
    Activate(K),
    None,
}

impl RowEvent {
    /// Resolves the event for the row holding `key`.
    ///
    /// In selection mode the whole row acts as the selection affordance.
    pub fn resolve<K: ItemKey>(
        self,
        key: &K,
        selection_mode: bool,
        selection: &mut SelectionController<K>,
        order: &[K],
    ) -> RowAction<K> {
        let (affordance, shift) = match self {
            RowEvent::AffordanceClick { shift } => (true, shift),
            RowEvent::ContentClick { shift } => (false, shift),
            RowEvent::Key(_) => (false, false),
        };
        if affordance && !selection_mode {
            // No affordance is drawn outside selection mode.
            return RowAction::None;
        }
        if selection_mode {
            RowAction::Select(selection.click(key, shift, order))
        } else {
            RowAction::Activate(key.clone())
        }
    }
}
