//! Core traits and types for mvvm-kit
//!
//! This crate provides the two primitives that make view-models reactive and
//! actionable for a host UI framework's binding layer:
//!
//! # Core Concepts
//!
//! - **ObservableObject**: change notification with equality-gated setters
//! - **RelayCommand / TypedRelayCommand**: commands relaying to closures, with
//!   an optional gate and re-evaluation signaling
//! - **Notifier**: the ordered subscriber list both are built on
//! - **ObservableVec**: a list that reports its own mutations
//!
//! # Basic Example
//!
//! ```
//! use mvvm_kit_core::prelude::*;
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! struct CounterViewModel {
//!     observable: ObservableObject,
//!     count: Rc<Cell<i32>>,
//!     increment: RelayCommand,
//! }
//!
//! impl CounterViewModel {
//!     fn new() -> Self {
//!         let count = Rc::new(Cell::new(0));
//!         let (c, g) = (count.clone(), count.clone());
//!         let increment = RelayCommand::with_can_execute(
//!             move || c.set(c.get() + 1),
//!             move || g.get() < 3,
//!         );
//!         Self { observable: ObservableObject::new(), count, increment }
//!     }
//! }
//!
//! let vm = CounterViewModel::new();
//! while vm.increment.can_execute() {
//!     vm.increment.execute();
//!     vm.observable.notify_changed("Count");
//!     vm.increment.notify_can_execute_changed();
//! }
//! assert_eq!(vm.count.get(), 3);
//! ```
//!
//! # Threading
//!
//! Everything here is single-threaded and UI-thread-affine: notifications are
//! dispatched synchronously on the calling thread, and the types are `!Send`.

pub mod collection;
pub mod command;
pub mod convert;
pub mod debug;
pub mod error;
pub mod notifier;
pub mod observable;
pub mod parameter;
pub mod testing;
pub mod typed_command;

// Notification exports
pub use notifier::{Notifier, SourceId, SubscriptionId};
pub use observable::{
    NotifyPropertyChanged, ObservableObject, PropertyChanged, PropertyKey, PropertyName,
};

// Command exports
pub use command::{
    execute_if_allowed, CanExecuteChanged, Command, RelayCommand, RelayCommandBuilder,
};
pub use parameter::{CommandParameter, Parameter};
pub use typed_command::{TypedRelayCommand, TypedRelayCommandBuilder};

// Collection exports
pub use collection::{
    CollectionChange, CollectionChanged, ObservableVec, ToObservableVec, COUNT_PROPERTY,
    INDEXER_PROPERTY,
};

// Converter exports
pub use convert::{BoolToResizeMode, InverseBool, IsOfType, ResizeMode, ValueConverter};

// Error exports
pub use error::{CommandError, ConvertError};

// Testing exports
pub use testing::{Notification, NotificationRecorder};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::collection::{CollectionChange, ObservableVec, ToObservableVec};
    pub use crate::command::{execute_if_allowed, CanExecuteChanged, Command, RelayCommand};
    pub use crate::convert::ValueConverter;
    pub use crate::error::CommandError;
    pub use crate::notifier::{SourceId, SubscriptionId};
    pub use crate::observable::{
        NotifyPropertyChanged, ObservableObject, PropertyChanged, PropertyKey, PropertyName,
    };
    pub use crate::parameter::CommandParameter;
    pub use crate::typed_command::TypedRelayCommand;
}
