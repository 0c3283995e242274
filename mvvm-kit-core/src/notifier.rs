//! Ordered subscriber lists for synchronous notifications
//!
//! [`Notifier`] is the building block behind every notification surface in
//! this crate: property changes on [`ObservableObject`](crate::ObservableObject),
//! gate re-evaluation on commands, and collection changes on
//! [`ObservableVec`](crate::ObservableVec).
//!
//! Dispatch is synchronous, on the calling thread, in subscription order.

use serde::Serialize;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-unique identity of a notification source
///
/// Every observable object and command gets one at construction. Listeners
/// receive it with each notification in place of a sender reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct SourceId(u64);

impl SourceId {
    /// Allocate a fresh id
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle returned by [`Notifier::subscribe`], used to unsubscribe later
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

type Handler<E> = Rc<dyn Fn(&E)>;

/// An explicit, ordered collection of subscriber callbacks
///
/// All methods take `&self` so a notifier can live inside a view-model that
/// the host only borrows immutably.
///
/// The handler list is snapshotted before each dispatch. A callback may
/// subscribe or unsubscribe during dispatch; the change applies from the
/// next [`emit`](Self::emit).
///
/// # Example
///
/// ```
/// use mvvm_kit_core::Notifier;
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// let notifier = Notifier::<u32>::new();
/// let seen = Rc::new(RefCell::new(Vec::new()));
///
/// let sink = seen.clone();
/// let id = notifier.subscribe(move |v| sink.borrow_mut().push(*v));
///
/// notifier.emit(&1);
/// notifier.unsubscribe(id);
/// notifier.emit(&2);
///
/// assert_eq!(*seen.borrow(), vec![1]);
/// ```
pub struct Notifier<E> {
    handlers: RefCell<Vec<(SubscriptionId, Handler<E>)>>,
    next_id: Cell<u64>,
}

impl<E> fmt::Debug for Notifier<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("subscribers", &self.handlers.borrow().len())
            .finish()
    }
}

impl<E> Default for Notifier<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Notifier<E> {
    /// Create a notifier with no subscribers
    pub fn new() -> Self {
        Self {
            handlers: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        }
    }

    /// Append a subscriber; it is called after all earlier subscribers
    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&E) + 'static,
    {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.handlers.borrow_mut().push((id, Rc::new(handler)));
        tracing::debug!(subscription = %id, "Subscriber added");
        id
    }

    /// Remove a subscriber
    ///
    /// Returns `false` if the id was not subscribed (already removed, or
    /// issued by another notifier).
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut handlers = self.handlers.borrow_mut();
        let before = handlers.len();
        handlers.retain(|(existing, _)| *existing != id);
        let removed = handlers.len() != before;
        if removed {
            tracing::debug!(subscription = %id, "Subscriber removed");
        }
        removed
    }

    /// Deliver `event` to every current subscriber, in subscription order
    pub fn emit(&self, event: &E) {
        let snapshot: Vec<Handler<E>> = {
            let handlers = self.handlers.borrow();
            if handlers.is_empty() {
                return;
            }
            handlers.iter().map(|(_, h)| Rc::clone(h)).collect()
        };

        tracing::trace!(subscribers = snapshot.len(), "Dispatching notification");
        for handler in snapshot {
            handler(event);
        }
    }

    /// Number of current subscribers
    pub fn len(&self) -> usize {
        self.handlers.borrow().len()
    }

    /// Whether there are no subscribers
    pub fn is_empty(&self) -> bool {
        self.handlers.borrow().is_empty()
    }

    /// Drop every subscriber
    pub fn clear(&self) {
        self.handlers.borrow_mut().clear();
    }
}
