use core::cmp;

use crate::ScrollDirection;

/// Phase of the scroll intensity state machine.
///
/// `Idle → Intense` on a scroll event, `Intense → Decaying` on the first tick that sees no new
/// event, and back to `Idle` once the quiet period has elapsed. A scroll event in any phase
/// returns to `Intense`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollPhase {
    #[default]
    Idle,
    Intense,
    Decaying,
}

/// A lightweight, serializable snapshot of the scroll state.
///
/// `intensity` and `phase` only gate cosmetic behaviour (row placeholders). Layout never reads
/// them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollState {
    pub offset: u64,
    pub direction: Option<ScrollDirection>,
    /// 0..=100.
    pub intensity: u8,
    pub phase: ScrollPhase,
}

impl ScrollState {
    pub fn is_scrolling(&self) -> bool {
        self.phase != ScrollPhase::Idle
    }
}

/// Tracks scroll offset, direction, and a synthetic 0..=100 intensity score.
///
/// Driven entirely by the caller: [`ScrollTracker::on_scroll`] for every scroll event and
/// [`ScrollTracker::tick`] on a timer or once per frame.
#[derive(Clone, Debug)]
pub struct ScrollTracker {
    state: ScrollState,
    last_event_ms: Option<u64>,
    step: u8,
    reset_delay_ms: u64,
}

impl ScrollTracker {
    pub const MAX_INTENSITY: u8 = 100;

    pub fn new(step: u8, reset_delay_ms: u64) -> Self {
        Self {
            state: ScrollState::default(),
            last_event_ms: None,
            step,
            reset_delay_ms,
        }
    }

    pub fn state(&self) -> ScrollState {
        self.state
    }

    pub fn offset(&self) -> u64 {
        self.state.offset
    }

    pub fn intensity(&self) -> u8 {
        self.state.intensity
    }

    pub fn direction(&self) -> Option<ScrollDirection> {
        self.state.direction
    }

    pub fn phase(&self) -> ScrollPhase {
        self.state.phase
    }

    pub fn is_scrolling(&self) -> bool {
        self.state.is_scrolling()
    }

    pub fn set_step(&mut self, step: u8) {
        self.step = step;
    }

    pub fn set_reset_delay_ms(&mut self, delay_ms: u64) {
        self.reset_delay_ms = delay_ms;
    }

    /// Records a user scroll event.
    ///
    /// The direction is the sign of the offset change; an event at the previous offset has none.
    pub fn on_scroll(&mut self, offset: u64, now_ms: u64) {
        let prev = self.state.offset;
        self.state.direction = match offset.cmp(&prev) {
            cmp::Ordering::Greater => Some(ScrollDirection::Down),
            cmp::Ordering::Less => Some(ScrollDirection::Up),
            cmp::Ordering::Equal => None,
        };
        self.state.offset = offset;
        self.state.intensity = self
            .state
            .intensity
            .saturating_add(self.step)
            .min(Self::MAX_INTENSITY);
        self.state.phase = ScrollPhase::Intense;
        self.last_event_ms = Some(now_ms);
        vtrace!(
            offset,
            intensity = self.state.intensity,
            now_ms,
            "ScrollTracker::on_scroll"
        );
    }

    /// Moves the offset without counting as user scrolling (programmatic scroll, restore).
    pub fn set_offset(&mut self, offset: u64) {
        self.state.offset = offset;
    }

    /// Advances the decay timer.
    pub fn tick(&mut self, now_ms: u64) {
        let Some(last) = self.last_event_ms else {
            return;
        };
        if now_ms.saturating_sub(last) >= self.reset_delay_ms {
            self.cancel();
            return;
        }
        if self.state.phase == ScrollPhase::Intense && now_ms > last {
            self.state.phase = ScrollPhase::Decaying;
        }
    }

    /// Returns to `Idle` immediately. Used when the list goes away.
    pub fn cancel(&mut self) {
        if self.state.phase != ScrollPhase::Idle {
            vtrace!(offset = self.state.offset, "ScrollTracker: idle");
        }
        self.state.phase = ScrollPhase::Idle;
        self.state.intensity = 0;
        self.state.direction = None;
        self.last_event_ms = None;
    }
}
