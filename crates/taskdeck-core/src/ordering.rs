//! Helpers for caller-controlled ordering of tasks, groups and sub-tasks.

use std::collections::HashSet;
use std::hash::Hash;

use crate::model::{Group, GroupTask, SubTask, Task};

/// Entities that carry an identity key used for ordering checks.
pub trait Keyed {
    /// Identity key type.
    type Key: Eq + Hash;

    /// Identity key of this entity.
    fn key(&self) -> &Self::Key;
}

impl Keyed for Task {
    type Key = crate::id::TaskId;

    fn key(&self) -> &Self::Key {
        &self.id
    }
}

impl Keyed for GroupTask {
    type Key = crate::id::TaskId;

    fn key(&self) -> &Self::Key {
        &self.id
    }
}

impl Keyed for Group {
    type Key = crate::id::GroupId;

    fn key(&self) -> &Self::Key {
        &self.id
    }
}

impl Keyed for SubTask {
    type Key = crate::id::SubTaskId;

    fn key(&self) -> &Self::Key {
        &self.id
    }
}

/// Returns true when `candidate` holds exactly the same keys as `current`,
/// each once, in any order.
#[must_use]
pub fn is_permutation<T: Keyed>(current: &[T], candidate: &[T]) -> bool {
    if current.len() != candidate.len() {
        return false;
    }
    let existing: HashSet<&T::Key> = current.iter().map(Keyed::key).collect();
    let mut seen = HashSet::with_capacity(candidate.len());
    candidate
        .iter()
        .all(|item| existing.contains(item.key()) && seen.insert(item.key()))
}

/// Returns true when no two entries share a key.
#[must_use]
pub fn has_unique_keys<T: Keyed>(items: &[T]) -> bool {
    let mut seen = HashSet::with_capacity(items.len());
    items.iter().all(|item| seen.insert(item.key()))
}

/// Rearrange `items` to follow the key order of `order`, keeping the stored
/// entries themselves. Keys missing from `order` are dropped, so callers check
/// [`is_permutation`] first.
pub fn resequence<T: Keyed>(items: &mut Vec<T>, order: &[T]) {
    let mut pool: Vec<Option<T>> = items.drain(..).map(Some).collect();
    for wanted in order {
        let taken = pool.iter_mut().find_map(|slot| {
            if slot.as_ref().is_some_and(|item| item.key() == wanted.key()) {
                slot.take()
            } else {
                None
            }
        });
        items.extend(taken);
    }
}

/// Move the element at `from` so that it ends up at index `to`, shifting the
/// elements in between. Out-of-range indices leave the slice untouched and
/// return false.
pub fn array_move<T>(items: &mut [T], from: usize, to: usize) -> bool {
    if from >= items.len() || to >= items.len() {
        return false;
    }
    if from < to {
        items[from..=to].rotate_left(1);
    } else {
        items[to..=from].rotate_right(1);
    }
    true
}

/// Position of the entity with `key`, if present.
pub fn position_of<T, Q>(items: &[T], key: &Q) -> Option<usize>
where
    T: Keyed,
    T::Key: PartialEq<Q>,
    Q: ?Sized,
{
    items.iter().position(|item| item.key() == key)
}
