// model = "claude-opus-4-5"
// created = "2026-10-18"
// modified = "2026-10-18"
// driver = "Isaac Clayton"

//! Ordering of values and of whole subtrees.
//!
//! Two subtrees are *ordered* when every value of the first sorts at or
//! before every value of the second, *reversed* when the opposite holds, and
//! *overlapping* when neither does. Overlap is reported as
//! [`Kleenean::Unknown`]: such subtrees cannot be placed side by side and
//! must be merged.

use std::cmp::Ordering;

use crate::kleenean::Kleenean;
use crate::node::Node;
use crate::node::Traversal;

/// A total order over values.
pub trait OrderPolicy<V> {
    fn compare(&self, a: &V, b: &V) -> Ordering;
}

/// The value type's own `Ord`.
#[derive(Clone, Copy, Debug, Default)]
pub struct NaturalOrder;

impl<V: Ord> OrderPolicy<V> for NaturalOrder {
    fn compare(&self, a: &V, b: &V) -> Ordering {
        return a.cmp(b);
    }
}

/// The value type's `Ord`, backwards.
#[derive(Clone, Copy, Debug, Default)]
pub struct ReverseOrder;

impl<V: Ord> OrderPolicy<V> for ReverseOrder {
    fn compare(&self, a: &V, b: &V) -> Ordering {
        return b.cmp(a);
    }
}

/// Any comparison function.
#[derive(Clone, Copy, Debug)]
pub struct CompareWith<F>(pub F);

impl<V, F: Fn(&V, &V) -> Ordering> OrderPolicy<V> for CompareWith<F> {
    fn compare(&self, a: &V, b: &V) -> Ordering {
        return (self.0)(a, b);
    }
}

/// Smallest and largest value under `order`, if there are any.
fn extremes<'a, V, O: OrderPolicy<V>>(
    order: &O,
    values: impl IntoIterator<Item = &'a V>,
) -> Option<(&'a V, &'a V)>
where
    V: 'a,
{
    let mut values = values.into_iter();
    let first = values.next()?;
    let (mut min, mut max) = (first, first);
    for v in values {
        if order.compare(v, min) == Ordering::Less {
            min = v;
        }
        if order.compare(v, max) == Ordering::Greater {
            max = v;
        }
    }
    return Some((min, max));
}

/// Relation between two collections of values.
///
/// Over a total order, "some pair has `a < b`" is exactly `min(a) < max(b)`
/// and "some pair has `a > b`" is exactly `max(a) > min(b)`, so this is the
/// all-pairs comparison without the quadratic cost. Ties count as ordered.
pub fn relation<'a, V, O: OrderPolicy<V>>(
    order: &O,
    first: impl IntoIterator<Item = &'a V>,
    second: impl IntoIterator<Item = &'a V>,
) -> Kleenean
where
    V: 'a,
{
    let (Some((min1, max1)), Some((min2, max2))) =
        (extremes(order, first), extremes(order, second))
    else {
        // Nothing to compare against, nothing to contradict.
        return Kleenean::True;
    };
    let some_before = order.compare(min1, max2) == Ordering::Less;
    let some_after = order.compare(max1, min2) == Ordering::Greater;
    return match (some_before, some_after) {
        (true, true) => Kleenean::Unknown,
        (false, true) => Kleenean::False,
        _ => Kleenean::True,
    };
}

/// True when `first` sorts entirely at or before `second`, False when
/// entirely after, Unknown when they overlap.
pub fn is_ordered<V, O: OrderPolicy<V>>(order: &O, first: &Node<V>, second: &Node<V>) -> Kleenean {
    return relation(
        order,
        first.values(Traversal::PreOrder),
        second.values(Traversal::PreOrder),
    );
}

pub fn is_overlap<V, O: OrderPolicy<V>>(order: &O, first: &Node<V>, second: &Node<V>) -> bool {
    return is_ordered(order, first, second).is_unknown();
}
