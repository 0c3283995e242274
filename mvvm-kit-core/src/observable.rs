//! Change notification for view-model state
//!
//! A view-model embeds an [`ObservableObject`] and routes every property
//! setter through [`ObservableObject::set_and_notify_if_changed`]. Bound UI
//! elements subscribe and re-read the property named in each
//! [`PropertyChanged`].
//!
//! # Example
//!
//! ```
//! use mvvm_kit_core::{NotifyPropertyChanged, ObservableObject};
//!
//! #[derive(Default)]
//! struct PersonViewModel {
//!     observable: ObservableObject,
//!     name: String,
//! }
//!
//! impl PersonViewModel {
//!     fn set_name(&mut self, value: impl Into<String>) -> bool {
//!         self.observable
//!             .set_and_notify_if_changed(&mut self.name, value.into(), "Name")
//!     }
//! }
//!
//! impl NotifyPropertyChanged for PersonViewModel {
//!     fn observable(&self) -> &ObservableObject {
//!         &self.observable
//!     }
//! }
//!
//! let mut vm = PersonViewModel::default();
//! vm.subscribe_property_changed(|e| println!("{} changed", e.property));
//! assert!(vm.set_name("Ada"));
//! assert!(!vm.set_name("Ada"));
//! ```

use serde::Serialize;
use std::borrow::Cow;
use std::fmt;

use crate::notifier::{Notifier, SourceId, SubscriptionId};

/// Identifier of an observable attribute
///
/// May be unspecified, which listeners treat as "some or all properties
/// changed". Build one from a string, an `Option`, or an enum with
/// `#[derive(PropertyKey)]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PropertyName(Option<Cow<'static, str>>);

impl PropertyName {
    /// A name that refers to no particular property
    pub const fn unspecified() -> Self {
        Self(None)
    }

    /// Name from a static string
    pub const fn new(name: &'static str) -> Self {
        Self(Some(Cow::Borrowed(name)))
    }

    /// The name, if one was given
    pub fn as_str(&self) -> Option<&str> {
        self.0.as_deref()
    }

    /// Whether no name was given
    pub fn is_unspecified(&self) -> bool {
        self.0.is_none()
    }

    /// Whether this refers to `name`
    pub fn is(&self, name: &str) -> bool {
        self.as_str() == Some(name)
    }
}

impl fmt::Display for PropertyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(name) => f.write_str(name),
            None => f.write_str("<unspecified>"),
        }
    }
}

impl From<&'static str> for PropertyName {
    fn from(name: &'static str) -> Self {
        Self::new(name)
    }
}

impl From<String> for PropertyName {
    fn from(name: String) -> Self {
        Self(Some(Cow::Owned(name)))
    }
}

impl<N: Into<PropertyName>> From<Option<N>> for PropertyName {
    fn from(name: Option<N>) -> Self {
        name.map(Into::into).unwrap_or_default()
    }
}

impl PartialEq<str> for PropertyName {
    fn eq(&self, other: &str) -> bool {
        self.is(other)
    }
}

impl PartialEq<&str> for PropertyName {
    fn eq(&self, other: &&str) -> bool {
        self.is(other)
    }
}

/// A closed set of property names, usually an enum
///
/// Derive it with `#[derive(PropertyKey)]`, which also provides
/// `From<Self> for PropertyName`.
pub trait PropertyKey: Copy + 'static {
    /// The property name raised in notifications
    fn name(&self) -> &'static str;

    /// Every key in declaration order
    fn all() -> &'static [Self];

    /// Look up a key by its property name
    fn from_name(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|key| key.name() == name)
    }
}

/// Payload delivered to property-changed subscribers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyChanged {
    /// The object that raised the notification
    pub source: SourceId,
    /// The property that changed
    pub property: PropertyName,
}

impl PropertyChanged {
    /// The changed property as a typed key, if it names one
    pub fn key<K: PropertyKey>(&self) -> Option<K> {
        self.property.as_str().and_then(K::from_name)
    }
}

/// Change-notification state embedded in a view-model
///
/// Holds the subscriber list and the object's [`SourceId`]. It does not own
/// the property values: setters pass `&mut` references to the view-model's
/// own fields.
#[derive(Debug)]
pub struct ObservableObject {
    id: SourceId,
    property_changed: Notifier<PropertyChanged>,
}

impl Default for ObservableObject {
    fn default() -> Self {
        Self::new()
    }
}

impl ObservableObject {
    pub fn new() -> Self {
        Self {
            id: SourceId::next(),
            property_changed: Notifier::new(),
        }
    }

    /// Identity reported in every [`PropertyChanged`]
    pub fn id(&self) -> SourceId {
        self.id
    }

    /// The underlying subscriber list
    pub fn property_changed(&self) -> &Notifier<PropertyChanged> {
        &self.property_changed
    }

    /// Register a listener for property changes
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&PropertyChanged) + 'static,
    {
        self.property_changed.subscribe(listener)
    }

    /// Stop delivering notifications to a listener
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.property_changed.unsubscribe(id)
    }

    /// Tell subscribers that `property` changed
    pub fn notify_changed(&self, property: impl Into<PropertyName>) {
        let event = PropertyChanged {
            source: self.id,
            property: property.into(),
        };
        tracing::trace!(source = %event.source, property = %event.property, "Property changed");
        self.property_changed.emit(&event);
    }

    /// Store `value` in `field`, notifying only if it differs from the old value
    ///
    /// The field is always overwritten. Returns `true` if the value changed.
    pub fn set_and_notify_if_changed<T: PartialEq>(
        &self,
        field: &mut T,
        value: T,
        property: impl Into<PropertyName>,
    ) -> bool {
        let changed = *field != value;
        *field = value;
        if changed {
            self.notify_changed(property);
        }
        changed
    }

    /// Like [`set_and_notify_if_changed`](Self::set_and_notify_if_changed),
    /// then runs `on_changed` after the notification when the value changed
    pub fn set_and_notify_if_changed_then<T, F>(
        &self,
        field: &mut T,
        value: T,
        property: impl Into<PropertyName>,
        on_changed: F,
    ) -> bool
    where
        T: PartialEq,
        F: FnOnce(),
    {
        let changed = self.set_and_notify_if_changed(field, value, property);
        if changed {
            on_changed();
        }
        changed
    }

    /// Like [`set_and_notify_if_changed_then`](Self::set_and_notify_if_changed_then),
    /// but the callback receives the new value
    pub fn set_and_notify_if_changed_with<T, F>(
        &self,
        field: &mut T,
        value: T,
        property: impl Into<PropertyName>,
        on_changed: F,
    ) -> bool
    where
        T: PartialEq,
        F: FnOnce(&T),
    {
        let changed = self.set_and_notify_if_changed(field, value, property);
        if changed {
            on_changed(field);
        }
        changed
    }
}

/// Capability of a view-model that raises property-changed notifications
///
/// Implement [`observable`](Self::observable) (or use
/// `#[derive(NotifyPropertyChanged)]`) and the subscription surface comes for
/// free.
pub trait NotifyPropertyChanged {
    /// The embedded change-notification state
    fn observable(&self) -> &ObservableObject;

    /// Identity reported in this view-model's notifications
    fn source_id(&self) -> SourceId {
        self.observable().id()
    }

    /// Register a listener for property changes
    fn subscribe_property_changed<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&PropertyChanged) + 'static,
        Self: Sized,
    {
        self.observable().subscribe(listener)
    }

    /// Stop delivering notifications to a listener
    fn unsubscribe_property_changed(&self, id: SubscriptionId) -> bool {
        self.observable().unsubscribe(id)
    }
}

impl NotifyPropertyChanged for ObservableObject {
    fn observable(&self) -> &ObservableObject {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn collect(obj: &ObservableObject) -> Rc<RefCell<Vec<PropertyChanged>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        obj.subscribe(move |e| sink.borrow_mut().push(e.clone()));
        seen
    }

    #[test]
    fn test_notify_without_subscribers() {
        let obj = ObservableObject::new();
        obj.notify_changed("Anything");
    }

    #[test]
    fn test_notify_carries_source_and_name() {
        let obj = ObservableObject::new();
        let seen = collect(&obj);

        obj.notify_changed("Title");

        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].source, obj.id());
        assert_eq!(seen[0].property, "Title");
    }

    #[test]
    fn test_unspecified_name_is_accepted() {
        let obj = ObservableObject::new();
        let seen = collect(&obj);

        obj.notify_changed(PropertyName::unspecified());
        obj.notify_changed(None::<&'static str>);

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert!(seen.iter().all(|e| e.property.is_unspecified()));
    }

    #[test]
    fn test_set_same_value_twice_notifies_once() {
        let obj = ObservableObject::new();
        let seen = collect(&obj);
        let mut field = 0;

        assert!(obj.set_and_notify_if_changed(&mut field, 5, "Value"));
        assert!(!obj.set_and_notify_if_changed(&mut field, 5, "Value"));

        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(field, 5);
    }

    #[test]
    fn test_set_equal_value_still_overwrites() {
        // Equal by PartialEq but distinguishable by the tag
        #[derive(Debug)]
        struct Tagged {
            key: u8,
            tag: &'static str,
        }
        impl PartialEq for Tagged {
            fn eq(&self, other: &Self) -> bool {
                self.key == other.key
            }
        }

        let obj = ObservableObject::new();
        let seen = collect(&obj);
        let mut field = Tagged { key: 1, tag: "old" };

        let changed = obj.set_and_notify_if_changed(&mut field, Tagged { key: 1, tag: "new" }, "T");

        assert!(!changed);
        assert_eq!(field.tag, "new");
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_set_distinct_value() {
        let obj = ObservableObject::new();
        let seen = collect(&obj);
        let mut name = String::from("A");

        assert!(!obj.set_and_notify_if_changed(&mut name, "A".to_string(), "Name"));
        assert!(seen.borrow().is_empty());

        assert!(obj.set_and_notify_if_changed(&mut name, "B".to_string(), "Name"));
        assert_eq!(name, "B");
        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].property.is("Name"));
    }

    #[test]
    fn test_then_callback_runs_after_notification_only_on_change() {
        let obj = ObservableObject::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        let sink = order.clone();
        obj.subscribe(move |_| sink.borrow_mut().push("notified"));

        let mut field = 1;
        let sink = order.clone();
        obj.set_and_notify_if_changed_then(&mut field, 2, "F", move || {
            sink.borrow_mut().push("callback")
        });
        assert_eq!(*order.borrow(), vec!["notified", "callback"]);

        let called = Cell::new(false);
        obj.set_and_notify_if_changed_then(&mut field, 2, "F", || called.set(true));
        assert!(!called.get());
    }

    #[test]
    fn test_with_callback_receives_new_value() {
        let obj = ObservableObject::new();
        let mut field = 1;
        let received = Cell::new(0);

        assert!(obj.set_and_notify_if_changed_with(&mut field, 9, "F", |v| received.set(*v)));
        assert_eq!(received.get(), 9);

        received.set(0);
        assert!(!obj.set_and_notify_if_changed_with(&mut field, 9, "F", |v| received.set(*v)));
        assert_eq!(received.get(), 0);
    }

    #[test]
    fn test_unsubscribe_stops_only_that_listener() {
        let obj = ObservableObject::new();
        let first = Rc::new(Cell::new(0));
        let second = Rc::new(Cell::new(0));

        let f = first.clone();
        let id = obj.subscribe(move |_| f.set(f.get() + 1));
        let s = second.clone();
        obj.subscribe(move |_| s.set(s.get() + 1));

        obj.notify_changed("X");
        assert!(obj.unsubscribe(id));
        obj.notify_changed("X");

        assert_eq!(first.get(), 1);
        assert_eq!(second.get(), 2);
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Field {
        First,
        Last,
    }

    impl PropertyKey for Field {
        fn name(&self) -> &'static str {
            match self {
                Field::First => "First",
                Field::Last => "Last",
            }
        }

        fn all() -> &'static [Self] {
            &[Field::First, Field::Last]
        }
    }

    #[test]
    fn test_property_key_lookup() {
        let obj = ObservableObject::new();
        let seen = collect(&obj);

        obj.notify_changed(Field::Last.name());
        obj.notify_changed("Middle");

        let seen = seen.borrow();
        assert_eq!(seen[0].key::<Field>(), Some(Field::Last));
        assert_eq!(seen[1].key::<Field>(), None);
        assert_eq!(Field::from_name("First"), Some(Field::First));
    }

    #[test]
    fn test_property_name_conversions() {
        assert_eq!(PropertyName::from("A").as_str(), Some("A"));
        assert_eq!(PropertyName::from(String::from("B")).as_str(), Some("B"));
        assert_eq!(PropertyName::from(Some("C")), PropertyName::new("C"));
        assert!(PropertyName::from(None::<String>).is_unspecified());
        assert_eq!(PropertyName::unspecified().to_string(), "<unspecified>");
    }
}
