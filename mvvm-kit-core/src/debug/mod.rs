//! Debug and inspection utilities
//!
//! - **Notification logging**: glob-filtered tracing output and an in-memory
//!   ring buffer of recent property changes and gate re-evaluation requests
//!
//! # Quick Start
//!
//! ```
//! use mvvm_kit_core::debug::NotificationLogger;
//! use mvvm_kit_core::{ObservableObject, RelayCommand};
//!
//! let logger = NotificationLogger::with_default_log();
//!
//! let vm = ObservableObject::new();
//! let save = RelayCommand::new(|| {});
//! logger.attach(&vm);
//! logger.attach_command(&save);
//!
//! vm.notify_changed("IsDirty");
//! save.notify_can_execute_changed();
//!
//! for entry in logger.log().unwrap().recent(10) {
//!     println!("{} {} {}", entry.elapsed_display(), entry.source, entry.name());
//! }
//! ```

mod notification_log;

pub use notification_log::{
    glob_match, NotificationFilter, NotificationKind, NotificationLog, NotificationLogConfig,
    NotificationLogEntry, NotificationLogger, CAN_EXECUTE_CHANGED,
};
