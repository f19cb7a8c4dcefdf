//! Sortedness check.

use std::cmp::Ordering;

use super::{Direction, OrderedItem};

/// Returns true if `items` already satisfies `direction`.
///
/// Equal neighbours never count as a violation, which is exactly the set of
/// inputs a stable sort leaves untouched. Empty and single-entry tables are
/// always sorted.
pub fn is_sorted<I>(items: &[OrderedItem<I>], direction: Direction) -> bool {
    items
        .windows(2)
        .all(|pair| direction.compare(&pair[0].key, &pair[1].key) != Ordering::Greater)
}
