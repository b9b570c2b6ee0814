use thiserror::Error;

/// Rejected list configuration.
///
/// This is the only error type in the crate. Runtime paths (scrolling, measuring, resizing)
/// never fail; they degrade to a momentarily imprecise layout instead.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("fixed-height mode requires a non-zero item_size")]
    ZeroItemSize,
    #[error("intensity_threshold must be within 0..=100 (got {0})")]
    IntensityThresholdOutOfRange(u8),
    #[error("intensity_step must be non-zero")]
    ZeroIntensityStep,
    #[error("use_variable_heights cannot change after the list is constructed")]
    ModeSwitch,
}
