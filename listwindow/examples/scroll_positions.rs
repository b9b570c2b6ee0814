// Example: remembering a list's scroll offset across remounts.
use listwindow::{ListOptions, VirtualList, default_scroll_positions};

fn mount() -> VirtualList {
    let options = ListOptions::fixed(85).with_list_key("today");
    let mut list = VirtualList::with_defaults(options).unwrap();
    list.set_item_keys(0..500u64);
    list
}

fn main() {
    let mut list = mount();
    println!("first mount: saved={:?}", list.saved_scroll_position());
    list.on_scroll(2_450, 0);
    drop(list);

    let list = mount();
    println!(
        "second mount: saved={:?} store={:?}",
        list.saved_scroll_position(),
        default_scroll_positions().borrow()
    );
}
