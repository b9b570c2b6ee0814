use alloc::vec::Vec;
use core::cmp;

/// Prefix sums over row heights.
///
/// Variable-height layout keeps one of these per list. Point updates are `O(log n)`; a suffix
/// can be dropped with [`Fenwick::truncate`] and re-appended with [`Fenwick::push`], which is how
/// "reset after index" invalidation is applied lazily.
#[derive(Clone, Debug)]
pub(crate) struct Fenwick {
    tree: Vec<u64>, // 1-indexed
    total: u64,
    max_bit: usize,
}

impl Fenwick {
    pub(crate) fn new() -> Self {
        Self {
            tree: alloc::vec![0],
            total: 0,
            max_bit: 0,
        }
    }

    pub(crate) fn from_sizes(sizes: &[u32]) -> Self {
        let n = sizes.len();
        let mut tree = alloc::vec![0u64; n + 1];
        let mut total = 0u64;
        for i in 1..=n {
            let v = sizes[i - 1] as u64;
            total = total.saturating_add(v);
            tree[i] = tree[i].saturating_add(v);
            let j = i + lsb(i);
            if j <= n {
                tree[j] = tree[j].saturating_add(tree[i]);
            }
        }
        Self {
            tree,
            total,
            max_bit: highest_power_of_two_leq(n),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.tree.len().saturating_sub(1)
    }

    /// Drops every value at index `new_len` and after.
    pub(crate) fn truncate(&mut self, new_len: usize) {
        if new_len >= self.len() {
            return;
        }
        self.total = self.prefix_sum(new_len);
        self.tree.truncate(new_len + 1);
        self.max_bit = highest_power_of_two_leq(new_len);
    }

    /// Appends a value in `O(log n)`.
    pub(crate) fn push(&mut self, value: u32) {
        let value = value as u64;
        let new_len = self.len() + 1;
        // tree[i] holds the sum of the lsb(i) values ending at i; the part of that window that
        // is already stored can be read back from existing prefix sums.
        let start_exclusive = new_len - lsb(new_len);
        let before = self
            .prefix_sum(new_len - 1)
            .saturating_sub(self.prefix_sum(start_exclusive));
        self.tree.push(before.saturating_add(value));
        self.total = self.total.saturating_add(value);
        self.max_bit = highest_power_of_two_leq(new_len);
    }

    pub(crate) fn add(&mut self, index: usize, delta: i64) {
        let n = self.len();
        if index >= n {
            return;
        }
        if delta >= 0 {
            self.total = self.total.saturating_add(delta as u64);
        } else {
            self.total = self.total.saturating_sub(delta.unsigned_abs());
        }
        let mut i = index + 1;
        while i <= n {
            let next = self.tree[i] as i128 + delta as i128;
            debug_assert!(next >= 0, "Fenwick underflow (idx={i}, delta={delta})");
            self.tree[i] = next.clamp(0, u64::MAX as i128) as u64;
            i += lsb(i);
        }
    }

    /// Sum of the first `count` values.
    pub(crate) fn prefix_sum(&self, count: usize) -> u64 {
        let mut i = cmp::min(count, self.len());
        let mut sum = 0u64;
        while i > 0 {
            sum = sum.saturating_add(self.tree[i]);
            i &= i - 1;
        }
        sum
    }

    pub(crate) fn total(&self) -> u64 {
        self.total
    }

    /// Returns the number of leading values whose running sum is `<= target`.
    ///
    /// For an offset inside the list this is the index of the row covering that offset.
    pub(crate) fn lower_bound(&self, mut target: u64) -> usize {
        let n = self.len();
        let mut idx = 0usize;
        let mut bit = self.max_bit;
        while bit != 0 {
            let next = idx + bit;
            if next <= n && self.tree[next] <= target {
                target -= self.tree[next];
                idx = next;
            }
            bit >>= 1;
        }
        idx
    }
}

fn lsb(i: usize) -> usize {
    i & i.wrapping_neg()
}

fn highest_power_of_two_leq(n: usize) -> usize {
    if n == 0 {
        return 0;
    }
    let mut p = 1usize;
    while p <= n / 2 {
        p <<= 1;
    }
    p
}
