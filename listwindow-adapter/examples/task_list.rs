// Example: a simulated task list driven through the adapter controller.
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use listwindow::{ContentMetrics, HeightCache, ListItem, ListOptions, NavKey, VirtualList};
use listwindow_adapter::{
    Controller, ItemRenderer, RenderContext, RowAction, RowEvent, RowRenderer, PlaceholderConfig,
    SizeObserver,
};

struct Task {
    id: u64,
    title: String,
    goal: Option<String>,
}

impl ListItem for Task {
    type Id = u64;

    fn id(&self) -> u64 {
        self.id
    }

    fn content_metrics(&self) -> ContentMetrics {
        ContentMetrics::from_text(&self.title, None, 0)
    }

    fn label_key(&self) -> Option<&str> {
        self.goal.as_deref()
    }
}

/// Pretends to lay text out at 24 characters per 20px line.
struct TextRenderer;

impl ItemRenderer<Task> for TextRenderer {
    type View = String;

    fn render(&mut self, item: &Task, cx: &RenderContext<'_>) -> String {
        match cx.label {
            Some(goal) => format!("{} [{goal}]", item.title),
            None => item.title.clone(),
        }
    }

    fn measure_natural_height(&self, view: &String) -> u32 {
        24 + 20 * view.chars().count().div_ceil(24) as u32
    }
}

#[derive(Default)]
struct CountingObserver {
    observed: RefCell<HashSet<u64>>,
}

impl SizeObserver<u64> for CountingObserver {
    fn observe(&self, id: &u64) {
        self.observed.borrow_mut().insert(*id);
    }

    fn unobserve(&self, id: &u64) {
        self.observed.borrow_mut().remove(id);
    }
}

fn main() {
    let tasks: Vec<Task> = (0..300u64)
        .map(|id| Task {
            id,
            title: format!("Task {id}: {}", "follow up ".repeat((id % 6) as usize)),
            goal: (id % 5 == 0).then(|| "launch".to_string()),
        })
        .collect();
    let goals = |key: &str| (key == "launch").then(|| "Ship v2".to_string());

    let options = ListOptions::variable().with_height(300).with_overscan_count(2);
    let list = VirtualList::new(options, HeightCache::new(85).shared()).unwrap();
    let observer = Rc::new(CountingObserver::default());
    let mut c = Controller::new(list).with_size_observer(observer.clone());

    c.set_items(&tasks);
    c.measure_all(&tasks, &mut TextRenderer, &goals);
    println!("measured: total={}", c.list().total_size());

    let rows = c.rows(0);
    println!("mounted {} rows, observing {}", rows.len(), observer.observed.borrow().len());

    // A fling: scroll events every 8ms.
    for step in 1..=40u64 {
        c.on_scroll(step * 150, step * 8);
    }
    let mut now = 320;
    let placeholders = c.rows(now).iter().filter(|r| r.show_placeholder).count();
    println!("during fling: state={:?} placeholders={placeholders}", c.list().scroll_state());

    now += 200;
    c.tick(now);
    let rows = c.rows(now);
    let mut renderer = TextRenderer;
    let row = RowRenderer::new(PlaceholderConfig::from_options(c.list().options()));
    if let Some(slot) = rows.first() {
        let out = row.render(&tasks[slot.index], &mut renderer, &RenderContext::default(), slot.size);
        println!("settled: first row {} -> {:?}", slot.index, out.body);
    }

    c.set_selection_mode(true);
    let mut selected = HashSet::new();
    for (index, shift) in [(3, false), (7, true)] {
        if let RowAction::Select(intent) = c.row_event(index, RowEvent::ContentClick { shift }) {
            intent.apply_to(&mut selected);
        }
    }
    println!("selected {} tasks", selected.len());

    println!("End: {:?}", c.handle_key(NavKey::End));
}
