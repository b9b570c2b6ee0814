use crate::*;

use listwindow::{
    ContentMetrics, HeightCache, KeySet, ListItem, ListOptions, Precision, ScrollPositionStore,
    VirtualList,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::string::{String, ToString};
use std::vec::Vec;

struct Task {
    id: u64,
    title: &'static str,
    goal: Option<&'static str>,
}

impl ListItem for Task {
    type Id = u64;

    fn id(&self) -> u64 {
        self.id
    }

    fn content_metrics(&self) -> ContentMetrics {
        ContentMetrics::from_text(self.title, None, 0)
    }

    fn label_key(&self) -> Option<&str> {
        self.goal
    }
}

fn tasks(n: u64) -> Vec<Task> {
    (0..n)
        .map(|id| Task {
            id,
            title: "task",
            goal: None,
        })
        .collect()
}

#[derive(Debug, PartialEq, Eq)]
struct View {
    id: u64,
    label: Option<String>,
    height: u32,
}

/// Renders every item at `height`, except ids listed in `overrides`.
#[derive(Default)]
struct StubRenderer {
    height: u32,
    overrides: Vec<(u64, u32)>,
    renders: usize,
}

impl StubRenderer {
    fn new(height: u32) -> Self {
        Self {
            height,
            ..Self::default()
        }
    }
}

impl ItemRenderer<Task> for StubRenderer {
    type View = View;

    fn render(&mut self, item: &Task, cx: &RenderContext<'_>) -> View {
        self.renders += 1;
        let height = self
            .overrides
            .iter()
            .find(|(id, _)| *id == item.id)
            .map_or(self.height, |(_, h)| *h);
        View {
            id: item.id,
            label: cx.label.map(ToString::to_string),
            height,
        }
    }

    fn measure_natural_height(&self, view: &View) -> u32 {
        view.height
    }
}

#[derive(Default)]
struct RecordingObserver {
    log: RefCell<Vec<(&'static str, u64)>>,
}

impl RecordingObserver {
    fn count(&self, what: &str, id: u64) -> usize {
        self.log
            .borrow()
            .iter()
            .filter(|(w, i)| *w == what && *i == id)
            .count()
    }
}

impl SizeObserver<u64> for RecordingObserver {
    fn observe(&self, id: &u64) {
        self.log.borrow_mut().push(("observe", *id));
    }

    fn unobserve(&self, id: &u64) {
        self.log.borrow_mut().push(("unobserve", *id));
    }
}

fn variable_list(viewport: u32) -> VirtualList<u64> {
    let options = ListOptions::variable()
        .with_height(viewport)
        .with_overscan_count(0);
    VirtualList::new(options, HeightCache::new(40).shared()).unwrap()
}

#[test]
fn measurement_completes_once_after_every_item_reports() {
    let heights = HeightCache::new(40).shared();
    let fired = Rc::new(Cell::new(0));
    let counter = Rc::clone(&fired);
    let mut m = OffscreenMeasurer::new(heights.clone(), ZeroHeightPolicy::Accept)
        .on_all_measurements_complete(move || counter.set(counter.get() + 1));

    let items = tasks(4);
    let mut renderer = StubRenderer::new(30);
    let mounted = m.mount_all(&items, &mut renderer, &NoLabels);
    assert_eq!(mounted.len(), 4);
    assert_eq!(renderer.renders, 4);
    assert_eq!(m.expected_count(), 4);
    // Mounting alone writes nothing.
    assert!(heights.borrow().is_empty());

    for (n, id) in [3u64, 1, 0].into_iter().enumerate() {
        assert!(m.report(&id, 30 + id as u32));
        assert_eq!(m.measured_count(), n + 1);
        assert_eq!(fired.get(), 0);
    }
    // Duplicate reports do not count.
    assert!(!m.report(&1, 99));
    assert_eq!(heights.borrow().cached_height(&1), Some(31));
    assert!(!m.is_complete());

    assert!(m.report(&2, 32));
    assert!(m.is_complete());
    assert_eq!(fired.get(), 1);
    assert_eq!(heights.borrow().len(), 4);
    assert_eq!(heights.borrow().precision(&2), Some(Precision::Measured));

    assert!(!m.report(&2, 50));
    assert_eq!(fired.get(), 1);
}

#[test]
fn measure_all_uses_renderer_heights_and_labels() {
    let heights = HeightCache::new(40).shared();
    let mut m = OffscreenMeasurer::new(heights.clone(), ZeroHeightPolicy::default());
    let items = [
        Task {
            id: 1,
            title: "write report",
            goal: Some("q3"),
        },
        Task {
            id: 2,
            title: "book flights",
            goal: Some("unknown"),
        },
    ];
    let labels = |key: &str| (key == "q3").then(|| String::from("Quarterly goals"));

    let mut renderer = StubRenderer::new(48);
    renderer.overrides.push((2, 96));
    let mounted = m.mount_all(&items, &mut renderer, &labels);
    assert_eq!(mounted[0].view.label.as_deref(), Some("Quarterly goals"));
    assert_eq!(mounted[1].view.label, None);

    let mut m = OffscreenMeasurer::new(heights.clone(), ZeroHeightPolicy::default());
    assert!(m.measure_all(&items, &mut renderer, &labels));
    assert_eq!(heights.borrow().cached_height(&1), Some(48));
    assert_eq!(heights.borrow().cached_height(&2), Some(96));
}

#[test]
fn zero_height_falls_back_to_estimate_by_default() {
    let items = [Task {
        id: 7,
        title: "short",
        goal: None,
    }];

    let heights = HeightCache::new(40).shared();
    let mut m = OffscreenMeasurer::new(heights.clone(), ZeroHeightPolicy::default());
    assert!(m.measure_all(&items, &mut StubRenderer::new(0), &NoLabels));
    // base 56 + padding 16
    assert_eq!(heights.borrow().cached_height(&7), Some(72));
    assert_eq!(heights.borrow().precision(&7), Some(Precision::Measured));

    let heights = HeightCache::new(40).shared();
    let mut m = OffscreenMeasurer::new(heights.clone(), ZeroHeightPolicy::Accept);
    assert!(m.measure_all(&items, &mut StubRenderer::new(0), &NoLabels));
    assert_eq!(heights.borrow().cached_height(&7), Some(0));
}

#[test]
fn empty_pass_completes_immediately() {
    let fired = Rc::new(Cell::new(false));
    let flag = Rc::clone(&fired);
    let mut m = OffscreenMeasurer::<u64>::new(HeightCache::new(40).shared(), ZeroHeightPolicy::Accept)
        .on_all_measurements_complete(move || flag.set(true));
    let mounted = m.mount_all(&tasks(0), &mut StubRenderer::new(10), &NoLabels);
    assert!(mounted.is_empty());
    assert!(m.is_complete());
    assert!(fired.get());
}

#[test]
fn measurement_is_skipped_in_fixed_mode() {
    let fixed = VirtualList::<u64>::new(ListOptions::fixed(20), HeightCache::new(20).shared()).unwrap();
    assert!(OffscreenMeasurer::for_list(&fixed).is_none());
    assert!(OffscreenMeasurer::for_list(&variable_list(100)).is_some());

    let mut c = Controller::new(fixed);
    assert!(!c.measure_all(&tasks(3), &mut StubRenderer::new(10), &NoLabels));
    assert!(c.is_layout_ready());
    assert!(c.list().heights().borrow().is_empty());
}

#[test]
fn resize_observer_only_reports_real_changes() {
    let heights = HeightCache::new(40).shared();
    heights.borrow_mut().set_height(5u64, 80);
    let observer = Rc::new(RecordingObserver::default());
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);

    let mut w = ResizeObserverWrapper::mount(5, observer.clone(), heights.clone())
        .with_on_resize(move |id, h| sink.borrow_mut().push((*id, h)));
    assert_eq!(observer.count("observe", 5), 1);
    assert_eq!(w.last_height(), Some(80));

    // First layout pass matches the cache.
    assert_eq!(w.report(80), None);
    assert!(seen.borrow().is_empty());
    assert_eq!(heights.borrow().precision(&5), Some(Precision::Measured));

    assert_eq!(w.report(120), Some(120));
    assert_eq!(heights.borrow().cached_height(&5), Some(120));
    assert_eq!(heights.borrow().precision(&5), Some(Precision::Observed));
    assert_eq!(*seen.borrow(), [(5, 120)]);

    assert_eq!(w.report(120), None);
    assert_eq!(seen.borrow().len(), 1);

    w.unmount();
    assert!(!w.is_observing());
    assert_eq!(w.report(10), None);
    drop(w);
    assert_eq!(observer.count("unobserve", 5), 1);
}

#[test]
fn dropping_a_mounted_observer_unobserves() {
    let observer = Rc::new(RecordingObserver::default());
    let heights = HeightCache::new(40).shared();
    {
        let w = ResizeObserverWrapper::mount(9u64, observer.clone(), heights.clone());
        // Nothing cached yet: the first report is a change.
        assert_eq!(w.last_height(), None);
    }
    assert_eq!(observer.count("observe", 9), 1);
    assert_eq!(observer.count("unobserve", 9), 1);

    let mut noop = ResizeObserverWrapper::mount(9u64, Rc::new(NoopSizeObserver), heights.clone());
    assert_eq!(noop.report(33), Some(33));
    assert_eq!(heights.borrow().cached_height(&9), Some(33));
}

fn hot() -> RowScroll {
    RowScroll {
        is_scrolling: true,
        intensity: 80,
    }
}

fn gate() -> PlaceholderGate {
    PlaceholderGate::new(PlaceholderConfig {
        enabled: true,
        delay_ms: 200,
        intensity_threshold: 60,
    })
}

#[test]
fn placeholder_needs_sustained_intense_scrolling() {
    let mut g = gate();
    assert_eq!(g.update(hot(), 0), RowPhase::Content);
    assert!(g.is_pending());
    assert_eq!(g.update(hot(), 150), RowPhase::Content);

    // Scrolling stops before the delay elapses: the pending swap is cancelled.
    assert_eq!(g.update(RowScroll::default(), 180), RowPhase::Content);
    assert!(!g.is_pending());
    assert_eq!(g.tick(250), RowPhase::Content);

    // The delay restarts from the next intense period.
    assert_eq!(g.update(hot(), 190), RowPhase::Content);
    assert_eq!(g.tick(389), RowPhase::Content);
    assert_eq!(g.tick(390), RowPhase::Placeholder);
    assert!(g.shows_placeholder());

    // Back to content immediately once intensity is at the threshold.
    let gentle = RowScroll {
        is_scrolling: true,
        intensity: 60,
    };
    assert_eq!(g.update(gentle, 391), RowPhase::Content);
}

#[test]
fn placeholder_disabled_never_shows() {
    let mut g = PlaceholderGate::new(PlaceholderConfig {
        enabled: false,
        delay_ms: 0,
        intensity_threshold: 0,
    });
    assert_eq!(g.update(hot(), 0), RowPhase::Content);
    assert_eq!(g.tick(10_000), RowPhase::Content);

    let mut immediate = PlaceholderGate::new(PlaceholderConfig {
        enabled: true,
        delay_ms: 0,
        intensity_threshold: 60,
    });
    assert_eq!(immediate.update(hot(), 5), RowPhase::Placeholder);
}

#[test]
fn row_renderer_skips_content_while_placeholder_shows() {
    let item = Task {
        id: 3,
        title: "call the bank",
        goal: None,
    };
    let mut renderer = StubRenderer::new(40);
    let mut row = RowRenderer::from_gate(gate());
    let cx = RenderContext {
        selection_mode: true,
        selected: true,
        label: None,
    };

    let out = row.render(&item, &mut renderer, &cx, 85);
    assert_eq!(out.checkbox, Some(Checkbox { checked: true }));
    assert!(matches!(out.body, RowBody::Content(View { id: 3, .. })));
    assert_eq!(renderer.renders, 1);

    row.update_scroll(hot(), 0);
    row.tick(200);
    let out = row.render(&item, &mut renderer, &RenderContext::default(), 85);
    assert!(out.is_placeholder());
    assert_eq!(out.body, RowBody::Placeholder { height: 85 });
    assert_eq!(out.checkbox, None);
    assert_eq!(renderer.renders, 1);
}

#[test]
fn shift_click_selects_from_last_plain_click() {
    let order = ['A', 'B', 'C', 'D'];
    let mut selection = SelectionController::new();
    let mut selected = KeySet::new();

    selection.click(&'A', false, &order).apply_to(&mut selected);
    assert_eq!(selected.len(), 1);
    assert!(selected.contains(&'A'));

    selection.click(&'D', true, &order).apply_to(&mut selected);
    let mut got: Vec<char> = selected.iter().copied().collect();
    got.sort();
    assert_eq!(got, ['A', 'B', 'C', 'D']);

    let intent = selection.click(&'B', true, &order);
    assert_eq!(intent, SelectionIntent::Range(std::vec!['A', 'B']));
    intent.apply_to(&mut selected);
    let mut got: Vec<char> = selected.iter().copied().collect();
    got.sort();
    assert_eq!(got, ['A', 'B']);
    assert_eq!(selection.anchor(), Some(&'A'));

    // A plain click moves the anchor and toggles.
    selection.click(&'C', false, &order).apply_to(&mut selected);
    assert_eq!(selected.len(), 3);
    assert_eq!(
        selection.click(&'A', true, &order),
        SelectionIntent::Range(std::vec!['A', 'B', 'C'])
    );
}

#[test]
fn shift_click_without_anchor_toggles() {
    let order = [1u64, 2, 3];
    let mut selection = SelectionController::new();
    assert_eq!(selection.click(&2, true, &order), SelectionIntent::Toggle(2));
    assert_eq!(selection.anchor(), Some(&2));

    // An anchor that is no longer displayed is not usable.
    assert_eq!(
        selection.click(&3, true, &[3u64, 1]),
        SelectionIntent::Toggle(3)
    );
}

#[test]
fn row_events_map_to_actions() {
    let order = [10u64, 11, 12];
    let mut selection = SelectionController::new();

    let click = RowEvent::ContentClick { shift: false };
    assert_eq!(
        click.resolve(&11, false, &mut selection, &order),
        RowAction::Activate(11)
    );
    assert_eq!(
        RowEvent::Key(RowKey::Enter).resolve(&11, false, &mut selection, &order),
        RowAction::Activate(11)
    );
    assert_eq!(
        RowEvent::AffordanceClick { shift: false }.resolve(&11, false, &mut selection, &order),
        RowAction::None
    );
    assert_eq!(selection.anchor(), None);

    assert_eq!(
        click.resolve(&10, true, &mut selection, &order),
        RowAction::Select(SelectionIntent::Toggle(10))
    );
    assert_eq!(
        RowEvent::Key(RowKey::Space).resolve(&12, true, &mut selection, &order),
        RowAction::Select(SelectionIntent::Toggle(12))
    );
    assert_eq!(
        RowEvent::AffordanceClick { shift: true }.resolve(&10, true, &mut selection, &order),
        RowAction::Select(SelectionIntent::Range(std::vec![10, 11, 12]))
    );
}

#[test]
fn scroll_restore_waits_for_layout_then_corrects() {
    assert!(ScrollRestore::new(0).is_done());

    let mut r = ScrollRestore::new(900);
    assert_eq!(r.poll(0, false), None);
    assert_eq!(r.poll(40, false), None);
    assert_eq!(r.poll(50, true), Some(900));
    assert_eq!(r.phase(), RestorePhase::Corrective { due_ms: 150 });
    assert_eq!(r.poll(149, true), None);
    assert_eq!(r.poll(150, true), Some(900));
    assert!(r.is_done());
    assert_eq!(r.poll(1_000, true), None);

    let mut r = ScrollRestore::new(10).with_corrective_delay_ms(0);
    assert_eq!(r.poll(5, true), Some(10));
    assert_eq!(r.poll(5, true), Some(10));
    r.cancel();
    assert_eq!(r.poll(6, true), None);
}

#[test]
fn controller_restores_saved_offset_after_remount() {
    let positions = ScrollPositionStore::new().shared();
    positions.borrow_mut().save_scroll_position("inbox", 500);

    let options = ListOptions::fixed(10).with_height(50).with_list_key("inbox");
    let mut list = VirtualList::new(options, HeightCache::new(10).shared())
        .unwrap()
        .with_scroll_positions(positions.clone());
    list.set_item_keys(0..100u64);

    let mut c = Controller::new(list);
    assert!(c.is_restoring());
    assert_eq!(c.tick(0), Some(500));
    assert_eq!(c.list().scroll_offset(), 500);
    assert!(!c.list().is_scrolling());
    assert_eq!(c.tick(50), None);
    assert_eq!(c.tick(100), Some(500));
    assert!(!c.is_restoring());
    assert_eq!(c.tick(200), None);
    assert_eq!(positions.borrow().scroll_position("inbox"), 500);
}

#[test]
fn controller_variable_restore_waits_for_measurement() {
    let positions = ScrollPositionStore::new().shared();
    positions.borrow_mut().save_scroll_position("today", 120);

    let options = ListOptions::variable()
        .with_height(100)
        .with_overscan_count(0)
        .with_list_key("today");
    let list = VirtualList::new(options, HeightCache::new(40).shared())
        .unwrap()
        .with_scroll_positions(positions);
    let mut c = Controller::new(list);
    let items = tasks(20);
    c.set_items(&items);

    assert_eq!(c.tick(0), None);
    assert!(c.measure_all(&items, &mut StubRenderer::new(30), &NoLabels));
    assert_eq!(c.list().total_size(), 600);
    assert_eq!(c.tick(10), Some(120));
    // The user takes over before the corrective scroll.
    c.on_scroll(200, 20);
    assert!(!c.is_restoring());
    assert_eq!(c.tick(200), None);
}

#[test]
fn controller_restore_survives_its_own_scroll_events() {
    let positions = ScrollPositionStore::new().shared();
    positions.borrow_mut().save_scroll_position("inbox", 500);

    let options = ListOptions::fixed(10).with_height(50).with_list_key("inbox");
    let mut list = VirtualList::new(options, HeightCache::new(10).shared())
        .unwrap()
        .with_scroll_positions(positions);
    list.set_item_keys(0..100u64);
    let mut c = Controller::new(list);

    assert_eq!(c.tick(0), Some(500));
    // The container reports the offset we just applied.
    let range = c.on_scroll(500, 1);
    assert_eq!(range.start_index, 45);
    assert!(c.is_restoring());
    assert!(!c.list().is_scrolling());

    assert_eq!(c.tick(100), Some(500));
    c.on_scroll(500, 101);
    assert!(!c.is_restoring());
    assert!(!c.list().is_scrolling());

    // Only the first matching event is absorbed.
    c.on_scroll(500, 120);
    assert!(c.list().is_scrolling());
}

#[test]
fn rows_mounted_before_measurement_ignore_the_measured_height() {
    let observer = Rc::new(RecordingObserver::default());
    let mut c = Controller::new(variable_list(100)).with_size_observer(observer.clone());
    let items = tasks(20);
    c.set_items(&items);

    // Mounted on estimates.
    let keys: Vec<u64> = c.rows(0).iter().map(|r| r.key).collect();
    assert_eq!(keys, [0, 1]);
    assert_eq!(observer.count("observe", 1), 1);

    c.measure_all(&items, &mut StubRenderer::new(30), &NoLabels);
    assert!(!c.on_row_resize(&1, 30));
    assert_eq!(
        c.list().heights().borrow().precision(&1),
        Some(Precision::Measured)
    );

    assert!(c.on_row_resize(&1, 45));
    assert_eq!(
        c.list().heights().borrow().precision(&1),
        Some(Precision::Observed)
    );
    assert_eq!(c.list().item_start(2), Some(75));
}

#[test]
fn controller_mounts_and_releases_row_observers() {
    let observer = Rc::new(RecordingObserver::default());
    let mut c = Controller::new(variable_list(100)).with_size_observer(observer.clone());
    let items = tasks(20);
    c.set_items(&items);
    c.measure_all(&items, &mut StubRenderer::new(30), &NoLabels);

    let rows = c.rows(0);
    let keys: Vec<u64> = rows.iter().map(|r| r.key).collect();
    assert_eq!(keys, [0, 1, 2, 3]);
    assert_eq!(rows[2].start, 60);
    assert!(rows.iter().all(|r| !r.show_placeholder));
    for id in 0..4 {
        assert_eq!(observer.count("observe", id), 1);
    }

    // First observation equals the measured height.
    assert!(!c.on_row_resize(&1, 30));
    assert!(c.on_row_resize(&1, 60));
    assert_eq!(c.list().item_start(2), Some(90));
    assert_eq!(c.list().total_size(), 630);

    c.on_scroll(300, 10);
    let keys: Vec<u64> = c.rows(10).iter().map(|r| r.key).collect();
    assert_eq!(keys, [9, 10, 11, 12]);
    for id in 0..4 {
        assert_eq!(observer.count("unobserve", id), 1);
    }
    assert!(!c.on_row_resize(&1, 10));

    // Rows that stay mounted keep their single observer.
    c.rows(20);
    assert_eq!(observer.count("observe", 9), 1);

    c.unmount();
    assert_eq!(observer.count("unobserve", 9), 1);
    assert!(!c.list().is_scrolling());
}

#[test]
fn controller_rows_swap_to_placeholders_during_fast_scroll() {
    let options = ListOptions::fixed(10).with_height(50);
    let mut list = VirtualList::new(options, HeightCache::new(10).shared()).unwrap();
    list.set_item_keys(0..100u64);
    let mut c = Controller::new(list);

    c.on_scroll(100, 0);
    let rows = c.rows(0);
    assert_eq!(rows.first().map(|r| r.index), Some(5));
    assert_eq!(rows.last().map(|r| r.index), Some(19));

    // Intensity passes 60 with the 7th event (t = 60); the delay runs from there.
    for t in (10..=250).step_by(10) {
        c.on_scroll(100, t);
    }
    assert!(c.rows(250).iter().all(|r| !r.show_placeholder));
    c.on_scroll(100, 260);
    assert!(c.rows(260).iter().all(|r| r.show_placeholder));

    // Still decaying: placeholders stay.
    c.tick(300);
    assert!(c.rows(300).iter().all(|r| r.show_placeholder));

    // Quiet for the reset delay: content comes back at once.
    c.tick(410);
    assert!(c.rows(410).iter().all(|r| !r.show_placeholder));
}

#[test]
fn controller_row_events_follow_display_order() {
    let mut c = Controller::new(variable_list(100));
    c.set_items(&tasks(6));

    assert_eq!(
        c.row_event(2, RowEvent::ContentClick { shift: false }),
        RowAction::Activate(2)
    );
    assert_eq!(c.row_event(99, RowEvent::Key(RowKey::Enter)), RowAction::None);

    c.set_selection_mode(true);
    let mut selected = KeySet::new();
    let RowAction::Select(first) = c.row_event(1, RowEvent::AffordanceClick { shift: false }) else {
        panic!("expected a selection");
    };
    first.apply_to(&mut selected);
    let RowAction::Select(range) = c.row_event(4, RowEvent::ContentClick { shift: true }) else {
        panic!("expected a selection");
    };
    range.apply_to(&mut selected);
    assert_eq!(selected.len(), 4);

    c.set_selection_mode(false);
    assert_eq!(c.selection().anchor(), None);
}
