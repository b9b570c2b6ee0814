use alloc::string::String;

use listwindow::ListItem;

/// What a row knows about itself when it is rendered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderContext<'a> {
    pub selection_mode: bool,
    pub selected: bool,
    /// Display text resolved for the item's `label_key`, if any.
    pub label: Option<&'a str>,
}

/// Renders one item's content.
///
/// The same renderer draws mounted rows and the off-screen measurement pass, so both agree on
/// an item's natural height.
pub trait ItemRenderer<T: ?Sized> {
    type View;

    fn render(&mut self, item: &T, cx: &RenderContext<'_>) -> Self::View;

    /// Height of a rendered view laid out at full width with no height constraint.
    fn measure_natural_height(&self, view: &Self::View) -> u32;
}

/// Looks up display text for a foreign key (e.g. the goal a task belongs to).
///
/// Used for display only; layout never depends on it except through the rendered height.
pub trait LabelResolver {
    fn resolve(&self, key: &str) -> Option<String>;
}

impl<F> LabelResolver for F
where
    F: Fn(&str) -> Option<String>,
{
    fn resolve(&self, key: &str) -> Option<String> {
        self(key)
    }
}

/// A resolver that never finds anything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoLabels;

impl LabelResolver for NoLabels {
    fn resolve(&self, _key: &str) -> Option<String> {
        None
    }
}

pub(crate) fn resolve_label<T, L>(item: &T, labels: &L) -> Option<String>
where
    T: ListItem + ?Sized,
    L: LabelResolver + ?Sized,
{
    item.label_key().and_then(|key| labels.resolve(key))
}
