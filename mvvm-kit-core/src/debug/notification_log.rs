//! Notification logging with pattern-based filtering and in-memory storage
//!
//! Attach a [`NotificationLogger`] to view-models and commands to trace every
//! property change and gate re-evaluation request. Glob patterns select which
//! notifications are logged; an optional ring buffer keeps the most recent
//! ones for inspection or JSON export.
//!
//! # Example
//!
//! ```
//! use mvvm_kit_core::debug::{NotificationLogConfig, NotificationLogger};
//! use mvvm_kit_core::ObservableObject;
//!
//! let logger = NotificationLogger::with_log(NotificationLogConfig::with_capacity(16));
//! let vm = ObservableObject::new();
//! logger.attach(&vm);
//!
//! vm.notify_changed("Title");
//!
//! let log = logger.log().unwrap();
//! assert_eq!(log.len(), 1);
//! assert_eq!(log.recent(1).next().unwrap().name(), "Title");
//! ```

use serde::{Deserialize, Serialize};
use std::cell::{Ref, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Instant;

use crate::command::{CanExecuteChanged, Command};
use crate::notifier::{SourceId, SubscriptionId};
use crate::observable::{NotifyPropertyChanged, PropertyChanged, PropertyName};

/// Name under which gate re-evaluation requests are filtered and logged
pub const CAN_EXECUTE_CHANGED: &str = "CanExecuteChanged";

/// Include/exclude filter over notification names, with glob patterns
///
/// Property changes are matched by property name (`<unspecified>` when none
/// was given); gate re-evaluation requests by [`CAN_EXECUTE_CHANGED`].
///
/// Patterns support:
/// - `*` matches any sequence of characters
/// - `?` matches any single character
/// - Literal text matches exactly
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationFilter {
    /// If non-empty, only log notifications matching these patterns
    pub include_patterns: Vec<String>,
    /// Exclude notifications matching these patterns (applied after include)
    pub exclude_patterns: Vec<String>,
}

impl Default for NotificationFilter {
    fn default() -> Self {
        Self {
            include_patterns: Vec::new(),
            // List indexer changes accompany every collection mutation
            exclude_patterns: vec!["Item[]".to_string()],
        }
    }
}

impl NotificationFilter {
    /// Create a filter from comma-separated pattern strings
    ///
    /// # Example
    /// ```
    /// use mvvm_kit_core::debug::NotificationFilter;
    ///
    /// let filter = NotificationFilter::new(Some("Is*,Title"), Some("IsBusy"));
    /// assert!(filter.should_log("IsSelected"));
    /// assert!(filter.should_log("Title"));
    /// assert!(!filter.should_log("IsBusy"));
    /// assert!(!filter.should_log("Count"));
    /// ```
    pub fn new(include: Option<&str>, exclude: Option<&str>) -> Self {
        let include_patterns = include.map(split_patterns).unwrap_or_default();
        let exclude_patterns = exclude
            .map(split_patterns)
            .unwrap_or_else(|| Self::default().exclude_patterns);

        Self {
            include_patterns,
            exclude_patterns,
        }
    }

    /// Create a filter with specific pattern vectors
    pub fn with_patterns(include: Vec<String>, exclude: Vec<String>) -> Self {
        Self {
            include_patterns: include,
            exclude_patterns: exclude,
        }
    }

    /// Check whether a notification name passes the filter
    pub fn should_log(&self, name: &str) -> bool {
        if !self.include_patterns.is_empty()
            && !self.include_patterns.iter().any(|p| glob_match(p, name))
        {
            return false;
        }

        !self.exclude_patterns.iter().any(|p| glob_match(p, name))
    }
}

fn split_patterns(s: &str) -> Vec<String> {
    s.split(',')
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}

// ============================================================================
// In-Memory Notification Log
// ============================================================================

/// Which surface raised a logged notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    PropertyChanged,
    CanExecuteChanged,
}

/// An entry in the notification log
#[derive(Debug, Clone, Serialize)]
pub struct NotificationLogEntry {
    /// Sequence number for ordering
    pub sequence: u64,
    /// The object or command that raised the notification
    pub source: SourceId,
    pub kind: NotificationKind,
    /// Changed property; unspecified for gate re-evaluation requests
    pub property: PropertyName,
    /// When the notification was logged
    #[serde(skip)]
    pub timestamp: Instant,
}

impl NotificationLogEntry {
    /// Name used for filtering and display
    pub fn name(&self) -> &str {
        match self.kind {
            NotificationKind::PropertyChanged => {
                self.property.as_str().unwrap_or("<unspecified>")
            }
            NotificationKind::CanExecuteChanged => CAN_EXECUTE_CHANGED,
        }
    }

    /// Time since this notification was logged
    pub fn elapsed(&self) -> std::time::Duration {
        self.timestamp.elapsed()
    }

    /// Format the elapsed time for display (e.g., "2.3s", "150ms")
    pub fn elapsed_display(&self) -> String {
        let elapsed = self.elapsed();
        if elapsed.as_secs() >= 1 {
            format!("{:.1}s", elapsed.as_secs_f64())
        } else {
            format!("{}ms", elapsed.as_millis())
        }
    }
}

/// Configuration for the notification log ring buffer
///
/// Deserializable, so it can live in an application's settings file:
///
/// ```
/// use mvvm_kit_core::debug::NotificationLogConfig;
///
/// let config = NotificationLogConfig::from_json(
///     r#"{ "capacity": 10, "filter": { "include_patterns": ["Is*"] } }"#,
/// ).unwrap();
/// assert_eq!(config.capacity, 10);
/// assert!(config.filter.should_log("IsBusy"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationLogConfig {
    /// Maximum number of entries to keep
    pub capacity: usize,
    pub filter: NotificationFilter,
}

impl Default for NotificationLogConfig {
    fn default() -> Self {
        Self {
            capacity: 100,
            filter: NotificationFilter::default(),
        }
    }
}

impl NotificationLogConfig {
    /// Create with custom capacity and filter
    pub fn new(capacity: usize, filter: NotificationFilter) -> Self {
        Self { capacity, filter }
    }

    /// Create with custom capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            ..Default::default()
        }
    }

    /// Parse from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// In-memory ring buffer of recent notifications
///
/// Older entries are discarded when capacity is reached.
#[derive(Debug, Clone)]
pub struct NotificationLog {
    entries: VecDeque<NotificationLogEntry>,
    config: NotificationLogConfig,
    next_sequence: u64,
}

impl Default for NotificationLog {
    fn default() -> Self {
        Self::new(NotificationLogConfig::default())
    }
}

impl NotificationLog {
    pub fn new(config: NotificationLogConfig) -> Self {
        Self {
            entries: VecDeque::with_capacity(config.capacity),
            config,
            next_sequence: 0,
        }
    }

    /// Log a property change (if it passes the filter)
    pub fn log_property_changed(&mut self, event: &PropertyChanged) -> Option<&NotificationLogEntry> {
        self.push(
            event.source,
            NotificationKind::PropertyChanged,
            event.property.clone(),
        )
    }

    /// Log a gate re-evaluation request (if it passes the filter)
    pub fn log_can_execute_changed(
        &mut self,
        event: &CanExecuteChanged,
    ) -> Option<&NotificationLogEntry> {
        self.push(
            event.source,
            NotificationKind::CanExecuteChanged,
            PropertyName::unspecified(),
        )
    }

    fn push(
        &mut self,
        source: SourceId,
        kind: NotificationKind,
        property: PropertyName,
    ) -> Option<&NotificationLogEntry> {
        let entry = NotificationLogEntry {
            sequence: self.next_sequence,
            source,
            kind,
            property,
            timestamp: Instant::now(),
        };

        if !self.config.filter.should_log(entry.name()) || self.config.capacity == 0 {
            return None;
        }
        self.next_sequence += 1;

        if self.entries.len() >= self.config.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
        self.entries.back()
    }

    /// Get all entries (oldest first)
    pub fn entries(&self) -> impl Iterator<Item = &NotificationLogEntry> {
        self.entries.iter()
    }

    /// Get entries in reverse order (newest first)
    pub fn entries_rev(&self) -> impl Iterator<Item = &NotificationLogEntry> {
        self.entries.iter().rev()
    }

    /// Get the most recent N entries (newest first)
    pub fn recent(&self, count: usize) -> impl Iterator<Item = &NotificationLogEntry> {
        self.entries.iter().rev().take(count)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn config(&self) -> &NotificationLogConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut NotificationLogConfig {
        &mut self.config
    }

    /// Export the stored entries (oldest first) as a JSON array
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.entries)
    }
}

// ============================================================================
// Logger
// ============================================================================

/// Subscribes to notification surfaces and logs what they raise
///
/// Supports two modes:
/// - **Tracing only** (default): logs via `tracing::debug!()`
/// - **With storage**: also stores entries in a [`NotificationLog`]
///
/// Clones share the same log.
#[derive(Debug, Clone)]
pub struct NotificationLogger {
    filter: NotificationFilter,
    log: Option<Rc<RefCell<NotificationLog>>>,
    active: bool,
}

impl Default for NotificationLogger {
    fn default() -> Self {
        Self::new(NotificationFilter::default())
    }
}

impl NotificationLogger {
    /// Create a logger with tracing only (no in-memory storage)
    pub fn new(filter: NotificationFilter) -> Self {
        Self {
            filter,
            log: None,
            active: true,
        }
    }

    /// Create a logger with in-memory storage
    pub fn with_log(config: NotificationLogConfig) -> Self {
        Self {
            filter: config.filter.clone(),
            log: Some(Rc::new(RefCell::new(NotificationLog::new(config)))),
            active: true,
        }
    }

    /// Create with default config and in-memory storage
    pub fn with_default_log() -> Self {
        Self::with_log(NotificationLogConfig::default())
    }

    /// Create with no filtering, tracing only
    pub fn log_all() -> Self {
        Self::new(NotificationFilter::with_patterns(vec![], vec![]))
    }

    /// Set whether the logger is active
    ///
    /// An inactive logger does not subscribe to anything.
    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// The stored log, if storage is enabled
    ///
    /// Notifications raised while the returned guard is held are traced but
    /// not stored.
    pub fn log(&self) -> Option<Ref<'_, NotificationLog>> {
        self.log.as_ref().map(|log| log.borrow())
    }

    /// Clear the stored log, if any
    pub fn clear(&self) {
        if let Some(log) = &self.log {
            log.borrow_mut().clear();
        }
    }

    pub fn filter(&self) -> &NotificationFilter {
        &self.filter
    }

    /// Log property changes raised by `target`
    ///
    /// Returns the subscription, or `None` when the logger is inactive.
    pub fn attach<V: NotifyPropertyChanged + ?Sized>(&self, target: &V) -> Option<SubscriptionId> {
        if !self.active {
            return None;
        }
        let filter = self.filter.clone();
        let log = self.log.clone();
        let id = target.observable().subscribe(move |event: &PropertyChanged| {
            let name = event.property.as_str().unwrap_or("<unspecified>");
            if filter.should_log(name) {
                tracing::debug!(source = %event.source, property = %name, "property changed");
            }
            match log.as_ref().map(|log| log.try_borrow_mut()) {
                Some(Ok(mut log)) => {
                    log.log_property_changed(event);
                }
                Some(Err(_)) => tracing::trace!("notification log is borrowed, entry dropped"),
                None => {}
            }
        });
        Some(id)
    }

    /// Log gate re-evaluation requests raised by `command`
    ///
    /// Returns the subscription, or `None` when the logger is inactive.
    pub fn attach_command(&self, command: &dyn Command) -> Option<SubscriptionId> {
        if !self.active {
            return None;
        }
        let filter = self.filter.clone();
        let log = self.log.clone();
        let id = command.subscribe_can_execute_changed(Box::new(
            move |event: &CanExecuteChanged| {
                if filter.should_log(CAN_EXECUTE_CHANGED) {
                    tracing::debug!(source = %event.source, "can execute changed");
                }
                match log.as_ref().map(|log| log.try_borrow_mut()) {
                    Some(Ok(mut log)) => {
                        log.log_can_execute_changed(event);
                    }
                    Some(Err(_)) => tracing::trace!("notification log is borrowed, entry dropped"),
                    None => {}
                }
            },
        ));
        Some(id)
    }
}

/// Simple glob pattern matching supporting `*` and `?`.
///
/// - `*` matches zero or more characters
/// - `?` matches exactly one character
pub fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();
    glob_match_impl(&pattern, &text)
}

fn glob_match_impl(pattern: &[char], text: &[char]) -> bool {
    let mut pi = 0;
    let mut ti = 0;
    let mut star_pi = None;
    let mut star_ti = 0;

    while ti < text.len() {
        if pi < pattern.len() && pattern[pi] == '*' {
            star_pi = Some(pi);
            star_ti = ti;
            pi += 1;
        } else if pi < pattern.len() && (pattern[pi] == '?' || pattern[pi] == text[ti]) {
            pi += 1;
            ti += 1;
        } else if let Some(spi) = star_pi {
            pi = spi + 1;
            star_ti += 1;
            ti = star_ti;
        } else {
            return false;
        }
    }

    while pi < pattern.len() && pattern[pi] == '*' {
        pi += 1;
    }

    pi == pattern.len()
}
