//! Test utilities for view-models and commands
//!
//! - [`NotificationRecorder`]: subscribes to notification surfaces and
//!   collects what they raise, in order
//! - Assertion macros for verifying recorded notifications
//!
//! # Example
//!
//! ```
//! use mvvm_kit_core::testing::{Notification, NotificationRecorder};
//! use mvvm_kit_core::{assert_notified, ObservableObject};
//!
//! let vm = ObservableObject::new();
//! let mut recorder = NotificationRecorder::new();
//! recorder.record(&vm);
//!
//! let mut title = String::new();
//! vm.set_and_notify_if_changed(&mut title, "Hello".to_string(), "Title");
//!
//! let recorded = recorder.drain();
//! assert_notified!(recorded, Notification::PropertyChanged { property, .. } if property == "Title");
//! ```

use tokio::sync::mpsc;

use crate::collection::{CollectionChange, CollectionChanged, ObservableVec};
use crate::command::{CanExecuteChanged, Command};
use crate::notifier::{SourceId, SubscriptionId};
use crate::observable::{NotifyPropertyChanged, PropertyChanged, PropertyName};

/// A notification captured by [`NotificationRecorder`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    PropertyChanged {
        source: SourceId,
        property: PropertyName,
    },
    CanExecuteChanged {
        source: SourceId,
    },
    CollectionChanged {
        source: SourceId,
        change: CollectionChange,
    },
}

impl Notification {
    /// The object or command that raised it
    pub fn source(&self) -> SourceId {
        match self {
            Notification::PropertyChanged { source, .. }
            | Notification::CanExecuteChanged { source }
            | Notification::CollectionChanged { source, .. } => *source,
        }
    }

    /// The property name, for property changes
    pub fn property(&self) -> Option<&PropertyName> {
        match self {
            Notification::PropertyChanged { property, .. } => Some(property),
            _ => None,
        }
    }
}

/// Collects notifications from any number of sources
///
/// Each `record*` call subscribes a forwarding listener that sends into an
/// unbounded channel; [`drain`](Self::drain) empties it.
///
/// # Example
///
/// ```
/// use mvvm_kit_core::testing::NotificationRecorder;
/// use mvvm_kit_core::RelayCommand;
///
/// let command = RelayCommand::new(|| {});
/// let mut recorder = NotificationRecorder::new();
/// recorder.record_command(&command);
///
/// command.notify_can_execute_changed();
/// command.notify_can_execute_changed();
///
/// assert_eq!(recorder.drain().len(), 2);
/// assert!(!recorder.has_recorded());
/// ```
#[derive(Debug)]
pub struct NotificationRecorder {
    tx: mpsc::UnboundedSender<Notification>,
    rx: mpsc::UnboundedReceiver<Notification>,
}

impl Default for NotificationRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationRecorder {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }

    /// Record property changes raised by `target`
    pub fn record<V: NotifyPropertyChanged + ?Sized>(&self, target: &V) -> SubscriptionId {
        let tx = self.tx.clone();
        target
            .observable()
            .subscribe(move |event: &PropertyChanged| {
                let _ = tx.send(Notification::PropertyChanged {
                    source: event.source,
                    property: event.property.clone(),
                });
            })
    }

    /// Record gate re-evaluation requests raised by `command`
    pub fn record_command(&self, command: &dyn Command) -> SubscriptionId {
        let tx = self.tx.clone();
        command.subscribe_can_execute_changed(Box::new(move |event: &CanExecuteChanged| {
            let _ = tx.send(Notification::CanExecuteChanged {
                source: event.source,
            });
        }))
    }

    /// Record structural changes raised by `list`
    pub fn record_collection<T>(&self, list: &ObservableVec<T>) -> SubscriptionId {
        let tx = self.tx.clone();
        list.subscribe_collection_changed(move |event: &CollectionChanged| {
            let _ = tx.send(Notification::CollectionChanged {
                source: event.source,
                change: event.change,
            });
        })
    }

    /// Drain everything recorded so far, oldest first
    pub fn drain(&mut self) -> Vec<Notification> {
        let mut recorded = Vec::new();
        while let Ok(notification) = self.rx.try_recv() {
            recorded.push(notification);
        }
        recorded
    }

    /// Drain and keep only the names of changed properties
    pub fn drain_properties(&mut self) -> Vec<PropertyName> {
        self.drain()
            .into_iter()
            .filter_map(|n| match n {
                Notification::PropertyChanged { property, .. } => Some(property),
                _ => None,
            })
            .collect()
    }

    /// Whether anything was recorded (drains the channel)
    pub fn has_recorded(&mut self) -> bool {
        !self.drain().is_empty()
    }
}

/// Assert that a notification matching a pattern was recorded.
///
/// # Example
///
/// ```ignore
/// let recorded = recorder.drain();
/// assert_notified!(recorded, Notification::CanExecuteChanged { .. });
/// assert_notified!(recorded, Notification::PropertyChanged { property, .. } if property == "Name");
/// ```
#[macro_export]
macro_rules! assert_notified {
    ($recorded:expr, $pattern:pat $(if $guard:expr)?) => {
        assert!(
            $recorded.iter().any(|n| matches!(n, $pattern $(if $guard)?)),
            "Expected notification matching `{}`, but got: {:?}",
            stringify!($pattern),
            $recorded
        );
    };
}

/// Assert that NO notification matching a pattern was recorded.
///
/// # Example
///
/// ```ignore
/// let recorded = recorder.drain();
/// assert_not_notified!(recorded, Notification::PropertyChanged { .. });
/// ```
#[macro_export]
macro_rules! assert_not_notified {
    ($recorded:expr, $pattern:pat $(if $guard:expr)?) => {
        assert!(
            !$recorded.iter().any(|n| matches!(n, $pattern $(if $guard)?)),
            "Expected NO notification matching `{}`, but it was recorded: {:?}",
            stringify!($pattern),
            $recorded
        );
    };
}

/// Count how many recorded notifications match a pattern.
///
/// # Example
///
/// ```ignore
/// let recorded = recorder.drain();
/// assert_eq!(count_notified!(recorded, Notification::CanExecuteChanged { .. }), 2);
/// ```
#[macro_export]
macro_rules! count_notified {
    ($recorded:expr, $pattern:pat $(if $guard:expr)?) => {
        $recorded
            .iter()
            .filter(|n| matches!(n, $pattern $(if $guard)?))
            .count()
    };
}
