/// Default item identity.
///
/// Heights are cached by identity rather than by index, so a reordered list keeps its
/// measurements. Ids must be unique across every list that shares a [`crate::HeightCache`].
pub type ItemId = u64;

/// The parts of an item's content that drive the height estimate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContentMetrics {
    /// Title length in characters.
    pub title_chars: usize,
    /// Description length in characters (0 when absent).
    pub description_chars: usize,
    pub has_tags: bool,
}

impl ContentMetrics {
    pub fn new(title_chars: usize, description_chars: usize, has_tags: bool) -> Self {
        Self {
            title_chars,
            description_chars,
            has_tags,
        }
    }

    /// Builds metrics from text fields, counting `char`s rather than bytes.
    pub fn from_text(title: &str, description: Option<&str>, tag_count: usize) -> Self {
        Self {
            title_chars: title.chars().count(),
            description_chars: description.map_or(0, |d| d.chars().count()),
            has_tags: tag_count > 0,
        }
    }
}

/// An item record as seen by the windowing engine.
///
/// Items stay owned by the caller. The engine only reads the identity, and the content metrics
/// when it needs a height estimate for an item that has never been measured.
pub trait ListItem {
    type Id;

    fn id(&self) -> Self::Id;

    fn content_metrics(&self) -> ContentMetrics {
        ContentMetrics::default()
    }

    /// Foreign key whose display text the row wants resolved (e.g. a parent goal).
    fn label_key(&self) -> Option<&str> {
        None
    }
}
