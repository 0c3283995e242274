//! mvvm-kit: Observable view-models and relay commands for MVVM binding layers
//!
//! View-models embed an [`ObservableObject`] and announce property changes
//! through equality-gated setters. Commands relay `execute` / `can_execute` to
//! closures and tell bound controls when to re-query their gate.
//!
//! # Example
//! ```ignore
//! use mvvm_kit::prelude::*;
//!
//! #[derive(PropertyKey, Clone, Copy, PartialEq, Debug)]
//! enum PersonProperty {
//!     Name,
//! }
//!
//! #[derive(NotifyPropertyChanged, Default)]
//! struct PersonViewModel {
//!     observable: ObservableObject,
//!     name: String,
//! }
//!
//! impl PersonViewModel {
//!     fn set_name(&mut self, value: String) {
//!         self.observable
//!             .set_and_notify_if_changed(&mut self.name, value, PersonProperty::Name);
//!     }
//! }
//! ```

// Re-export everything from core
pub use mvvm_kit_core::*;

// Re-export derive macros
pub use mvvm_kit_macros::{CommandParameter, NotifyPropertyChanged, PropertyKey};

/// Prelude for convenient imports
pub mod prelude {
    // Observable state
    pub use mvvm_kit_core::{
        NotifyPropertyChanged, ObservableObject, PropertyChanged, PropertyKey, PropertyName,
        SourceId, SubscriptionId,
    };

    // Commands
    pub use mvvm_kit_core::{
        execute_if_allowed, CanExecuteChanged, Command, CommandError, CommandParameter,
        RelayCommand, TypedRelayCommand,
    };

    // Collections and converters
    pub use mvvm_kit_core::{CollectionChange, ObservableVec, ToObservableVec, ValueConverter};

    // Debug
    pub use mvvm_kit_core::debug::{NotificationLogConfig, NotificationLogger};

    // Derive macros
    pub use mvvm_kit_macros::{CommandParameter, NotifyPropertyChanged, PropertyKey};
}
