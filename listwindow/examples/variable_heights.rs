// Example: variable heights, estimates, resize corrections and keyboard navigation.
use listwindow::{
    ContentMetrics, HeightCache, ListItem, ListOptions, NavKey, Precision, VirtualList,
};

struct Task {
    id: u64,
    title: String,
    description: Option<String>,
    tags: Vec<String>,
}

impl ListItem for Task {
    type Id = u64;

    fn id(&self) -> u64 {
        self.id
    }

    fn content_metrics(&self) -> ContentMetrics {
        ContentMetrics::from_text(&self.title, self.description.as_deref(), self.tags.len())
    }
}

fn main() {
    let tasks: Vec<Task> = (0..200u64)
        .map(|id| Task {
            id,
            title: "x".repeat(10 + (id as usize * 7) % 50),
            description: (id % 3 == 0).then(|| "d".repeat((id as usize * 13) % 140)),
            tags: if id % 4 == 0 { vec!["home".into()] } else { Vec::new() },
        })
        .collect();

    let heights = HeightCache::new(85).shared();
    let options = ListOptions::variable()
        .with_height(400)
        .with_overscan_count(2);
    let mut list = VirtualList::new(options, heights.clone()).unwrap();

    // Unmeasured rows are laid out with content estimates.
    list.set_items(&tasks);
    println!(
        "estimated: total={} range={:?} row0={:?} ({:?})",
        list.total_size(),
        list.virtual_range(),
        list.item_size(0),
        heights.borrow().precision(&0),
    );

    // A measurement pass writes real heights; the layout is rebuilt lazily.
    for t in &tasks {
        heights.borrow_mut().set_height(t.id, 60 + (t.id as u32 % 5) * 10);
    }
    list.invalidate_layout();
    println!("measured: total={} range={:?}", list.total_size(), list.virtual_range());

    // A mounted row grows after an image loads.
    list.apply_resize(&1, 240);
    assert_eq!(heights.borrow().precision(&1), Some(Precision::Observed));
    println!("after resize: row2 starts at {:?}", list.item_start(2));

    for key in [NavKey::ArrowDown, NavKey::End, NavKey::ArrowUp, NavKey::Home] {
        let req = list.handle_key(key);
        println!("{key:?}: {req:?}");
    }
}
