//! Property-based invariant tests for windowed layout.
//!
//! 1. Every row in the visible range intersects the viewport, and the rows just outside it don't.
//! 2. Overscan only widens the visible range and stays inside `0..count`.
//! 3. Row starts equal the running sum of cached heights.
//! 4. Any sequence of resizes leaves the layout equal to a freshly built one.
//! 5. Fixed and variable mode agree when every row has the same height.

use listwindow::{HeightCache, ListOptions, VirtualList};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn row_heights(max_len: usize) -> impl Strategy<Value = Vec<u32>> {
    proptest::collection::vec(1u32..=200, 1..=max_len)
}

fn variable_list(heights: &[u32], overscan: usize) -> VirtualList<u64> {
    let cache = HeightCache::new(50).shared();
    for (i, &h) in heights.iter().enumerate() {
        cache.borrow_mut().set_height(i as u64, h);
    }
    let options = ListOptions::variable().with_overscan_count(overscan);
    let mut list = VirtualList::new(options, cache).unwrap();
    list.set_item_keys(0..heights.len() as u64);
    list
}

fn naive_starts(heights: &[u32]) -> Vec<u64> {
    heights
        .iter()
        .scan(0u64, |acc, &h| {
            let start = *acc;
            *acc += h as u64;
            Some(start)
        })
        .collect()
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Visible rows intersect the viewport
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn visible_rows_intersect_viewport(
        heights in row_heights(150),
        offset_frac in 0.0f64..=1.2,
        viewport in 1u32..=800,
    ) {
        let list = variable_list(&heights, 0);
        let total = list.total_size();
        let offset = (total as f64 * offset_frac) as u64;
        let clamped = offset.min(total.saturating_sub(viewport as u64));
        let view_end = clamped + viewport as u64;

        let range = list.visible_range_for(offset, viewport);
        prop_assert!(!range.is_empty());
        prop_assert!(range.end_index <= heights.len());

        for i in range.start_index..range.end_index {
            let start = list.item_start(i).unwrap();
            let end = list.item_end(i).unwrap();
            prop_assert!(start < view_end && end > clamped, "row {} outside viewport", i);
        }
        if range.start_index > 0 {
            prop_assert!(list.item_end(range.start_index - 1).unwrap() <= clamped);
        }
        if range.end_index < heights.len() {
            prop_assert!(list.item_start(range.end_index).unwrap() >= view_end);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Overscan widens the range
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn overscan_widens_within_bounds(
        heights in row_heights(150),
        overscan in 0usize..=10,
        offset in 0u64..=20_000,
        viewport in 1u32..=800,
    ) {
        let list = variable_list(&heights, overscan);
        let visible = list.visible_range_for(offset, viewport);
        let mounted = list.compute_visible_range(offset, viewport);

        prop_assert!(mounted.start_index <= visible.start_index);
        prop_assert!(mounted.end_index >= visible.end_index);
        prop_assert!(mounted.end_index <= heights.len());
        prop_assert_eq!(visible.start_index - mounted.start_index, overscan.min(visible.start_index));
        prop_assert_eq!(
            mounted.end_index - visible.end_index,
            overscan.min(heights.len() - visible.end_index)
        );
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Starts are running sums
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn starts_are_running_sums(heights in row_heights(200)) {
        let list = variable_list(&heights, 0);
        let starts = naive_starts(&heights);
        for (i, &expected) in starts.iter().enumerate() {
            prop_assert_eq!(list.item_start(i), Some(expected));
        }
        prop_assert_eq!(list.total_size(), heights.iter().map(|&h| h as u64).sum::<u64>());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Resizes match a fresh layout
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn resizes_match_fresh_layout(
        heights in row_heights(100),
        resizes in proptest::collection::vec((0usize..100, 0u32..=300), 0..40),
    ) {
        let mut list = variable_list(&heights, 0);
        let mut model = heights.clone();
        // Interleave queries so some resizes hit a built layout and some an invalidated one.
        for (n, &(i, h)) in resizes.iter().enumerate() {
            let i = i % model.len();
            model[i] = h;
            list.apply_resize(&(i as u64), h);
            if n % 3 == 0 {
                let _ = list.total_size();
            }
        }

        let fresh = variable_list(&model, 0);
        prop_assert_eq!(list.total_size(), fresh.total_size());
        for i in 0..model.len() {
            prop_assert_eq!(list.item_start(i), fresh.item_start(i));
            prop_assert_eq!(list.item_size(i), Some(model[i]));
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Fixed and variable mode agree on uniform rows
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn fixed_matches_uniform_variable(
        count in 1usize..=500,
        item_size in 1u32..=120,
        offset in 0u64..=60_000,
        viewport in 1u32..=900,
    ) {
        let mut fixed = VirtualList::new(
            ListOptions::fixed(item_size).with_overscan_count(3),
            HeightCache::new(item_size).shared(),
        )
        .unwrap();
        fixed.set_item_keys(0..count as u64);

        let mut variable = variable_list(&vec![item_size; count], 3);
        variable.set_viewport_height(viewport);
        fixed.set_viewport_height(viewport);

        prop_assert_eq!(fixed.total_size(), variable.total_size());
        prop_assert_eq!(
            fixed.compute_visible_range(offset, viewport),
            variable.compute_visible_range(offset, viewport)
        );
        let probe = (offset as usize) % count;
        prop_assert_eq!(fixed.item_start(probe), variable.item_start(probe));
    }
}
