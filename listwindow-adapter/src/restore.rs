/// Where a [`ScrollRestore`] is in its protocol.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RestorePhase {
    /// Waiting for the list to be laid out with real (measured) sizes.
    WaitingForLayout,
    /// First scroll applied; a corrective one is due at `due_ms`.
    Corrective { due_ms: u64 },
    Done,
}

/// Re-applies a saved scroll offset after a list remounts.
///
/// The first scroll happens once layout is ready; a second one follows `corrective_delay_ms`
/// later to absorb late layout shifts (e.g. a measurement pass finishing). A saved offset of 0
/// needs no restoring.
#[derive(Clone, Debug)]
pub struct ScrollRestore {
    target: u64,
    corrective_delay_ms: u64,
    phase: RestorePhase,
}

impl ScrollRestore {
    pub const DEFAULT_CORRECTIVE_DELAY_MS: u64 = 100;

    pub fn new(saved_offset: u64) -> Self {
        Self {
            target: saved_offset,
            corrective_delay_ms: Self::DEFAULT_CORRECTIVE_DELAY_MS,
            phase: if saved_offset == 0 {
                RestorePhase::Done
            } else {
                RestorePhase::WaitingForLayout
            },
        }
    }

    pub fn with_corrective_delay_ms(mut self, delay_ms: u64) -> Self {
        self.corrective_delay_ms = delay_ms;
        self
    }

    pub fn target(&self) -> u64 {
        self.target
    }

    pub fn phase(&self) -> RestorePhase {
        self.phase
    }

    pub fn is_done(&self) -> bool {
        self.phase == RestorePhase::Done
    }

    /// Returns an offset to scroll to, if one is due now.
    pub fn poll(&mut self, now_ms: u64, layout_ready: bool) -> Option<u64> {
        match self.phase {
            RestorePhase::WaitingForLayout if layout_ready => {
                self.phase = RestorePhase::Corrective {
                    due_ms: now_ms.saturating_add(self.corrective_delay_ms),
                };
                adebug!(offset = self.target, now_ms, "ScrollRestore: initial scroll");
                Some(self.target)
            }
            RestorePhase::Corrective { due_ms } if now_ms >= due_ms => {
                self.phase = RestorePhase::Done;
                adebug!(offset = self.target, now_ms, "ScrollRestore: corrective scroll");
                Some(self.target)
            }
            _ => None,
        }
    }

    /// Abandons the restore (e.g. the user started scrolling).
    pub fn cancel(&mut self) {
        self.phase = RestorePhase::Done;
    }
}
