use alloc::string::String;

use crate::{ConfigError, ListMode};

/// Configuration for [`crate::VirtualList`].
///
/// Plain data: cheap to clone, and serializable with `feature = "serde"`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ListOptions {
    /// Viewport height in pixels (the adapter may replace it with the measured container height).
    pub height: u32,
    /// Row height in fixed mode. Ignored in variable mode.
    pub item_size: u32,
    /// Selects variable-height windowing. Cannot change after construction.
    pub use_variable_heights: bool,
    /// Extra rows mounted on each side of the visible window.
    pub overscan_count: usize,

    pub use_scrolling_placeholder: bool,
    /// How long intense scrolling must last before a row swaps to its placeholder.
    pub scrolling_placeholder_delay_ms: u64,
    /// Minimum intensity (0..=100, exclusive) for the placeholder to be allowed.
    pub intensity_threshold: u8,

    /// When disabled, every row is mounted regardless of the viewport.
    pub enable_windowing_optimization: bool,
    /// Mounts `preload_buffer` extra rows ahead of the scroll direction while scrolling.
    pub enable_intelligent_preloading: bool,
    pub preload_buffer: usize,

    /// Key under which the scroll offset is remembered across remounts.
    pub list_key: Option<String>,

    /// Intensity added per scroll event.
    pub intensity_step: u8,
    /// Quiet period after which intensity resets to 0.
    pub is_scrolling_reset_delay_ms: u64,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            height: 500,
            item_size: Self::DEFAULT_ITEM_SIZE,
            use_variable_heights: false,
            overscan_count: 5,
            use_scrolling_placeholder: true,
            scrolling_placeholder_delay_ms: 200,
            intensity_threshold: 60,
            enable_windowing_optimization: true,
            enable_intelligent_preloading: false,
            preload_buffer: 3,
            list_key: None,
            intensity_step: 10,
            is_scrolling_reset_delay_ms: 150,
        }
    }
}

impl ListOptions {
    pub const DEFAULT_ITEM_SIZE: u32 = 85;

    /// Fixed-height options.
    pub fn fixed(item_size: u32) -> Self {
        Self {
            item_size,
            ..Self::default()
        }
    }

    /// Variable-height options; `item_size` stays as the fallback for unknown rows.
    pub fn variable() -> Self {
        Self {
            use_variable_heights: true,
            ..Self::default()
        }
    }

    pub fn mode(&self) -> ListMode {
        if self.use_variable_heights {
            ListMode::Variable
        } else {
            ListMode::Fixed {
                item_size: self.item_size,
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.use_variable_heights && self.item_size == 0 {
            return Err(ConfigError::ZeroItemSize);
        }
        if self.intensity_threshold > 100 {
            return Err(ConfigError::IntensityThresholdOutOfRange(
                self.intensity_threshold,
            ));
        }
        if self.intensity_step == 0 {
            return Err(ConfigError::ZeroIntensityStep);
        }
        Ok(())
    }

    pub fn with_height(mut self, height: u32) -> Self {
        self.height = height;
        self
    }

    pub fn with_item_size(mut self, item_size: u32) -> Self {
        self.item_size = item_size;
        self
    }

    pub fn with_overscan_count(mut self, overscan_count: usize) -> Self {
        self.overscan_count = overscan_count;
        self
    }

    pub fn with_scrolling_placeholder(mut self, enabled: bool) -> Self {
        self.use_scrolling_placeholder = enabled;
        self
    }

    pub fn with_scrolling_placeholder_delay_ms(mut self, delay_ms: u64) -> Self {
        self.scrolling_placeholder_delay_ms = delay_ms;
        self
    }

    pub fn with_intensity_threshold(mut self, threshold: u8) -> Self {
        self.intensity_threshold = threshold;
        self
    }

    pub fn with_windowing_optimization(mut self, enabled: bool) -> Self {
        self.enable_windowing_optimization = enabled;
        self
    }

    pub fn with_intelligent_preloading(mut self, enabled: bool, preload_buffer: usize) -> Self {
        self.enable_intelligent_preloading = enabled;
        self.preload_buffer = preload_buffer;
        self
    }

    pub fn with_list_key(mut self, list_key: impl Into<String>) -> Self {
        self.list_key = Some(list_key.into());
        self
    }

    pub fn with_intensity_step(mut self, step: u8) -> Self {
        self.intensity_step = step;
        self
    }

    pub fn with_is_scrolling_reset_delay_ms(mut self, delay_ms: u64) -> Self {
        self.is_scrolling_reset_delay_ms = delay_ms;
        self
    }
}
