//! Adapter pieces for the `listwindow` crate.
//!
//! The `listwindow` crate is UI-agnostic and owns the windowing math and state. This crate
//! provides the framework-neutral parts every adapter needs around it:
//!
//! - Capabilities the UI layer implements ([`ItemRenderer`], [`LabelResolver`], [`SizeObserver`])
//! - The off-screen batch measurement pass ([`OffscreenMeasurer`])
//! - Post-mount height correction for a single row ([`ResizeObserverWrapper`])
//! - Row rendering with a scroll placeholder and selection ([`RowRenderer`],
//!   [`SelectionController`])
//! - Scroll restoration after a remount ([`ScrollRestore`])
//! - A [`Controller`] that wires all of the above to a [`listwindow::VirtualList`]
//!
//! Timers are never started here. Everything that waits receives `now_ms` from the caller.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod controller;
mod measurer;
mod observer;
mod render;
mod restore;
mod row;
mod selection;

#[cfg(test)]
mod tests;

pub use controller::{Controller, RowSlot};
pub use measurer::{MountedItem, OffscreenMeasurer, ZeroHeightPolicy};
pub use observer::{NoopSizeObserver, ResizeCallback, ResizeObserverWrapper, SizeObserver};
pub use render::{ItemRenderer, LabelResolver, NoLabels, RenderContext};
pub use restore::{RestorePhase, ScrollRestore};
pub use row::{
    Checkbox, PlaceholderConfig, PlaceholderGate, RowAction, RowBody, RowEvent, RowKey,
    RowOutput, RowPhase, RowRenderer, RowScroll,
};
pub use selection::{SelectionController, SelectionIntent};
