//! A headless windowing engine for long, variable-height item lists.
//!
//! The crate owns the math and the state needed to draw only the rows of a list that intersect
//! the viewport: a per-item height cache with a content-based estimator, prefix sums over row
//! heights, overscanned visible ranges, scroll intensity tracking, and a keyed store that
//! remembers scroll offsets across remounts.
//!
//! It is UI-agnostic. A TUI/GUI/DOM layer is expected to provide:
//! - viewport height
//! - scroll offsets and the time (`now_ms`) at which they happened
//! - measured row heights, once rows have been laid out
//!
//! For the measurement pass, row rendering, and selection, see the `listwindow-adapter` crate.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod error;
mod fenwick;
mod height;
mod item;
mod key;
mod list;
mod options;
mod position;
mod scroll;
mod types;


pub use error::ConfigError;
pub use height::{HeightCache, HeightEstimator, Precision, SharedHeightCache};
pub use item::{ContentMetrics, ItemId, ListItem};
pub use key::{ItemKey, KeyMap, KeySet};
pub use list::VirtualList;
pub use options::ListOptions;
pub use position::{ScrollPositionStore, SharedScrollPositions};
pub use scroll::{ScrollPhase, ScrollState, ScrollTracker};
pub use types::{Align, FocusRequest, ListMode, NavKey, ScrollDirection, VirtualItem, VisibleRange};

#[cfg(feature = "std")]
pub use height::default_height_cache;
#[cfg(feature = "std")]
pub use position::default_scroll_positions;
