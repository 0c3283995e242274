//! A list that reports its own mutations
//!
//! [`ObservableVec`] is the list counterpart of [`ObservableObject`]: bound
//! list views subscribe to [`CollectionChanged`] for structural changes, and
//! to property changes for `"Count"` and `"Item[]"`.
//!
//! Every mutation raises, in order: `"Count"` (only when the length changed),
//! `"Item[]"`, then the matching [`CollectionChange`].

use serde::Serialize;
use std::ops::Deref;

use crate::notifier::{Notifier, SourceId, SubscriptionId};
use crate::observable::{NotifyPropertyChanged, ObservableObject, PropertyName};

/// Property name raised when the length changes
pub const COUNT_PROPERTY: PropertyName = PropertyName::new("Count");
/// Property name raised when any element changes
pub const INDEXER_PROPERTY: PropertyName = PropertyName::new("Item[]");

/// What happened to the list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CollectionChange {
    /// `count` items were inserted starting at `index`
    Add { index: usize, count: usize },
    /// The item at `index` was removed
    Remove { index: usize },
    /// The item at `index` was replaced
    Replace { index: usize },
    /// An item moved from `from` to `to`
    Move { from: usize, to: usize },
    /// The contents changed wholesale
    Reset,
}

/// Payload delivered to collection-changed subscribers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CollectionChanged {
    pub source: SourceId,
    pub change: CollectionChange,
}

/// A `Vec<T>` that notifies subscribers about every mutation
///
/// Reads go through `Deref<Target = [T]>`; writes go through the methods
/// below. Index arguments panic when out of bounds, like the `Vec` methods
/// they wrap.
///
/// # Example
///
/// ```
/// use mvvm_kit_core::{CollectionChange, ObservableVec};
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// let mut items = ObservableVec::new();
/// let changes = Rc::new(RefCell::new(Vec::new()));
/// let sink = changes.clone();
/// items.subscribe_collection_changed(move |e| sink.borrow_mut().push(e.change));
///
/// items.push("a");
/// items.remove(0);
///
/// assert_eq!(
///     *changes.borrow(),
///     vec![
///         CollectionChange::Add { index: 0, count: 1 },
///         CollectionChange::Remove { index: 0 },
///     ]
/// );
/// ```
#[derive(Debug)]
pub struct ObservableVec<T> {
    items: Vec<T>,
    observable: ObservableObject,
    collection_changed: Notifier<CollectionChanged>,
}

impl<T> Default for ObservableVec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ObservableVec<T> {
    pub fn new() -> Self {
        Self::from_vec(Vec::new())
    }

    /// Wrap an existing vector without raising notifications
    pub fn from_vec(items: Vec<T>) -> Self {
        Self {
            items,
            observable: ObservableObject::new(),
            collection_changed: Notifier::new(),
        }
    }

    /// Register a listener for structural changes
    pub fn subscribe_collection_changed<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&CollectionChanged) + 'static,
    {
        self.collection_changed.subscribe(listener)
    }

    /// Stop delivering structural changes to a listener
    pub fn unsubscribe_collection_changed(&self, id: SubscriptionId) -> bool {
        self.collection_changed.unsubscribe(id)
    }

    /// Append an item
    pub fn push(&mut self, item: T) {
        let index = self.items.len();
        self.items.push(item);
        self.raise(true, CollectionChange::Add { index, count: 1 });
    }

    /// Insert an item at `index`
    pub fn insert(&mut self, index: usize, item: T) {
        self.items.insert(index, item);
        self.raise(true, CollectionChange::Add { index, count: 1 });
    }

    /// Remove and return the item at `index`
    pub fn remove(&mut self, index: usize) -> T {
        let item = self.items.remove(index);
        self.raise(true, CollectionChange::Remove { index });
        item
    }

    /// Remove and return the last item, if any
    pub fn pop(&mut self) -> Option<T> {
        let item = self.items.pop()?;
        let index = self.items.len();
        self.raise(true, CollectionChange::Remove { index });
        Some(item)
    }

    /// Replace the item at `index`, returning the old one
    ///
    /// Always notifies; use [`set`](Self::set) to skip equal values.
    pub fn replace(&mut self, index: usize, item: T) -> T {
        let old = std::mem::replace(&mut self.items[index], item);
        self.raise(false, CollectionChange::Replace { index });
        old
    }

    /// Move the item at `from` so that it ends up at `to`
    pub fn move_item(&mut self, from: usize, to: usize) {
        let item = self.items.remove(from);
        self.items.insert(to, item);
        self.raise(false, CollectionChange::Move { from, to });
    }

    /// Remove every item
    pub fn clear(&mut self) {
        let had_items = !self.items.is_empty();
        self.items.clear();
        self.raise(had_items, CollectionChange::Reset);
    }

    /// Swap the contents for `items`, raising a single reset
    pub fn reset(&mut self, items: Vec<T>) {
        let count_changed = items.len() != self.items.len();
        self.items = items;
        self.raise(count_changed, CollectionChange::Reset);
    }

    /// Underlying slice
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Unwrap into the plain vector
    pub fn into_vec(self) -> Vec<T> {
        self.items
    }

    fn raise(&self, count_changed: bool, change: CollectionChange) {
        if count_changed {
            self.observable.notify_changed(COUNT_PROPERTY);
        }
        self.observable.notify_changed(INDEXER_PROPERTY);
        let event = CollectionChanged {
            source: self.observable.id(),
            change,
        };
        tracing::trace!(source = %event.source, change = ?event.change, "Collection changed");
        self.collection_changed.emit(&event);
    }
}

impl<T: PartialEq> ObservableVec<T> {
    /// Replace the item at `index` unless it equals `item`
    ///
    /// Returns whether a change was raised.
    pub fn set(&mut self, index: usize, item: T) -> bool {
        if self.items[index] == item {
            self.items[index] = item;
            return false;
        }
        self.replace(index, item);
        true
    }
}

impl<T> Extend<T> for ObservableVec<T> {
    /// Appends all items, raising one `Add` for the batch
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let index = self.items.len();
        self.items.extend(iter);
        let count = self.items.len() - index;
        if count > 0 {
            self.raise(true, CollectionChange::Add { index, count });
        }
    }
}

impl<T> Deref for ObservableVec<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.items
    }
}

impl<T> From<Vec<T>> for ObservableVec<T> {
    fn from(items: Vec<T>) -> Self {
        Self::from_vec(items)
    }
}

impl<T> FromIterator<T> for ObservableVec<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

impl<T> NotifyPropertyChanged for ObservableVec<T> {
    fn observable(&self) -> &ObservableObject {
        &self.observable
    }
}

/// Collect any iterable into an [`ObservableVec`]
pub trait ToObservableVec: IntoIterator + Sized {
    fn to_observable_vec(self) -> ObservableVec<Self::Item> {
        self.into_iter().collect()
    }
}

impl<I: IntoIterator> ToObservableVec for I {}
