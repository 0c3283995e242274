//! Tests for #[derive(PropertyKey)] macro

use mvvm_kit::{ObservableObject, PropertyChanged, PropertyKey, PropertyName};
use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn test_basic_derive() {
    #[derive(PropertyKey, Clone, Copy, PartialEq, Debug)]
    enum PersonProperty {
        FirstName,
        Age,
    }

    assert_eq!(PersonProperty::FirstName.name(), "FirstName");
    assert_eq!(PersonProperty::Age.name(), "Age");
    assert_eq!(
        PersonProperty::all(),
        &[PersonProperty::FirstName, PersonProperty::Age]
    );
}

#[test]
fn test_rename_variant() {
    #[derive(PropertyKey, Clone, Copy, PartialEq, Debug)]
    enum ListProperty {
        Count,
        #[property(rename = "Item[]")]
        Items,
    }

    assert_eq!(ListProperty::Items.name(), "Item[]");
    assert_eq!(ListProperty::from_name("Item[]"), Some(ListProperty::Items));
    assert_eq!(ListProperty::from_name("Items"), None);
}

#[test]
fn test_rename_all() {
    #[derive(PropertyKey, Clone, Copy, PartialEq, Debug)]
    #[property(rename_all = "snake_case")]
    enum Snake {
        IsBusy,
        SelectedIndex,
    }

    #[derive(PropertyKey, Clone, Copy, PartialEq, Debug)]
    #[property(rename_all = "camelCase")]
    enum Camel {
        IsBusy,
        #[property(rename = "title")]
        WindowTitle,
    }

    assert_eq!(Snake::IsBusy.name(), "is_busy");
    assert_eq!(Snake::SelectedIndex.name(), "selected_index");
    assert_eq!(Camel::IsBusy.name(), "isBusy");
    assert_eq!(Camel::WindowTitle.name(), "title");
}

#[test]
fn test_into_property_name() {
    #[derive(PropertyKey, Clone, Copy, PartialEq, Debug)]
    enum Prop {
        Title,
    }

    let name: PropertyName = Prop::Title.into();
    assert_eq!(name, PropertyName::new("Title"));
    assert!(!name.is_unspecified());
}

#[test]
fn test_notify_with_key_and_match_back() {
    #[derive(PropertyKey, Clone, Copy, PartialEq, Debug)]
    enum Prop {
        Title,
        Subtitle,
    }

    let vm = ObservableObject::new();
    let seen: Rc<RefCell<Vec<Option<Prop>>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    vm.subscribe(move |event: &PropertyChanged| {
        sink.borrow_mut().push(event.key::<Prop>());
    });

    vm.notify_changed(Prop::Subtitle);
    vm.notify_changed("Unrelated");
    vm.notify_changed(PropertyName::unspecified());

    assert_eq!(*seen.borrow(), vec![Some(Prop::Subtitle), None, None]);
}
