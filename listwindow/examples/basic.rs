// Example: fixed-height windowing and scroll-to helpers.
use listwindow::{Align, HeightCache, ListOptions, VirtualList};

fn main() {
    let options = ListOptions::fixed(85).with_height(500).with_overscan_count(5);
    let mut list = VirtualList::new(options, HeightCache::new(85).shared()).unwrap();
    list.set_item_keys(0..1000u64);

    println!("total_size={}", list.total_size());
    println!("virtual_range={:?}", list.virtual_range());
    println!("visible_range={:?}", list.visible_range());

    let range = list.on_scroll(8500, 0);
    let mut items = Vec::new();
    list.collect_virtual_items(&mut items);
    println!("after on_scroll(8500): range={range:?} first={:?}", items.first());

    let off = list.scroll_to_item(999, Align::End);
    println!("after scroll_to_item(999, End): offset={off} range={:?}", list.virtual_range());
}
