//! End-to-end view-model behavior through the public facade

use mvvm_kit::prelude::*;
use mvvm_kit::testing::{Notification, NotificationRecorder};
use mvvm_kit::{assert_not_notified, assert_notified, count_notified};
use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(PropertyKey, Clone, Copy, PartialEq, Debug)]
enum PersonProperty {
    Name,
    Age,
}

#[derive(NotifyPropertyChanged)]
struct PersonViewModel {
    observable: ObservableObject,
    name: String,
    age: u32,
    renames: u32,
}

impl PersonViewModel {
    fn new(name: &str) -> Self {
        Self {
            observable: ObservableObject::new(),
            name: name.to_string(),
            age: 0,
            renames: 0,
        }
    }

    fn set_name(&mut self, value: &str) -> bool {
        let renames = &mut self.renames;
        self.observable.set_and_notify_if_changed_then(
            &mut self.name,
            value.to_string(),
            PersonProperty::Name,
            || *renames += 1,
        )
    }

    fn set_age(&mut self, value: u32) -> bool {
        self.observable
            .set_and_notify_if_changed(&mut self.age, value, PersonProperty::Age)
    }
}

#[test]
fn test_set_same_then_different_name() {
    let mut vm = PersonViewModel::new("A");
    let mut recorder = NotificationRecorder::new();
    recorder.record(&vm);

    assert!(!vm.set_name("A"));
    assert!(!recorder.has_recorded());

    assert!(vm.set_name("B"));
    assert_eq!(vm.name, "B");
    assert_eq!(vm.renames, 1);

    let recorded = recorder.drain();
    assert_eq!(recorded.len(), 1);
    assert_notified!(recorded, Notification::PropertyChanged { property, source } if property == "Name" && *source == vm.source_id());
}

#[test]
fn test_repeated_equal_value_notifies_once() {
    let mut vm = PersonViewModel::new("");
    let mut recorder = NotificationRecorder::new();
    recorder.record(&vm);

    for _ in 0..2 {
        vm.set_age(41);
    }
    vm.set_age(42);

    let recorded = recorder.drain();
    assert_eq!(
        count_notified!(recorded, Notification::PropertyChanged { property, .. } if property == "Age"),
        2
    );
    assert_not_notified!(recorded, Notification::PropertyChanged { property, .. } if property == "Name");
    assert_eq!(vm.age, 42);
}

#[test]
fn test_unsubscribe_keeps_other_listeners() {
    let mut vm = PersonViewModel::new("A");
    let first = Rc::new(Cell::new(0));
    let second = Rc::new(Cell::new(0));

    let f = first.clone();
    let first_id = vm.subscribe_property_changed(move |_: &PropertyChanged| f.set(f.get() + 1));
    let s = second.clone();
    vm.subscribe_property_changed(move |_: &PropertyChanged| s.set(s.get() + 1));

    vm.set_name("B");
    assert!(vm.unsubscribe_property_changed(first_id));
    assert!(!vm.unsubscribe_property_changed(first_id));
    vm.set_name("C");

    assert_eq!(first.get(), 1);
    assert_eq!(second.get(), 2);
}

#[test]
fn test_counter_gate_flips_at_ten() {
    let counter = Rc::new(Cell::new(9));
    let (c, g) = (counter.clone(), counter.clone());
    let increment = RelayCommand::with_can_execute(move || c.set(c.get() + 1), move || g.get() < 10);

    assert!(increment.can_execute());
    increment.execute();
    assert_eq!(counter.get(), 10);
    assert!(!increment.can_execute());
}

#[test]
fn test_gate_is_never_cached() {
    let open = Rc::new(Cell::new(false));
    let gate = open.clone();
    let command = RelayCommand::with_can_execute(|| {}, move || gate.get());

    for expected in [false, true, true, false] {
        open.set(expected);
        assert_eq!(command.can_execute(), expected);
    }
}

#[test]
fn test_ungated_command_always_executable() {
    let runs = Rc::new(Cell::new(0));
    let r = runs.clone();
    let command = RelayCommand::new(move || r.set(r.get() + 1));

    for _ in 0..3 {
        assert!(command.can_execute());
        command.execute();
    }
    assert_eq!(runs.get(), 3);
}

#[test]
fn test_execute_ignores_closed_gate() {
    let runs = Rc::new(Cell::new(0));
    let r = runs.clone();
    let command = RelayCommand::with_can_execute(move || r.set(r.get() + 1), || false);

    assert!(!command.can_execute());
    command.execute();
    assert_eq!(runs.get(), 1);

    // Hosts that want the gate honored go through execute_if_allowed
    assert!(!execute_if_allowed(&command, None));
    assert_eq!(runs.get(), 1);
}

#[test]
fn test_typed_absent_parameter_skips_gate() {
    let command = TypedRelayCommand::<i32>::with_can_execute(
        |_| {},
        |_: &i32| panic!("gate must not run for an absent parameter"),
    );

    let untyped: &dyn Command = &command;
    assert!(!untyped.can_execute(None));
}

#[test]
fn test_typed_nullable_parameter_accepts_absence() {
    let received: Rc<RefCell<Vec<Option<String>>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = received.clone();
    let open = TypedRelayCommand::with_can_execute(
        move |path: Option<String>| sink.borrow_mut().push(path),
        |path: &Option<String>| path.as_deref() != Some(""),
    );

    let untyped: &dyn Command = &open;
    assert!(untyped.can_execute(None));
    untyped.execute(None);
    untyped.execute(Some(&"notes.txt".to_string() as &dyn Any));

    assert_eq!(
        *received.borrow(),
        vec![None, Some("notes.txt".to_string())]
    );
}

#[test]
fn test_view_model_commands_raise_can_execute_changed() {
    let items = Rc::new(RefCell::new(ObservableVec::<String>::new()));
    let (add_items, remove_items) = (items.clone(), items.clone());
    let gate_items = items.clone();

    let add = TypedRelayCommand::new(move |item: String| add_items.borrow_mut().push(item));
    let remove_last = RelayCommand::with_can_execute(
        move || {
            remove_items.borrow_mut().pop();
        },
        move || !gate_items.borrow().is_empty(),
    );

    let mut recorder = NotificationRecorder::new();
    recorder.record_command(&remove_last);
    recorder.record_collection(&items.borrow());

    assert!(!remove_last.can_execute());
    add.execute_with("first".to_string());
    remove_last.notify_can_execute_changed();
    assert!(remove_last.can_execute());

    let recorded = recorder.drain();
    assert_eq!(
        recorded,
        vec![
            Notification::CollectionChanged {
                source: items.borrow().source_id(),
                change: CollectionChange::Add { index: 0, count: 1 },
            },
            Notification::CanExecuteChanged {
                source: remove_last.id(),
            },
        ]
    );
}

#[test]
fn test_builder_requires_execute() {
    let err = RelayCommand::builder()
        .can_execute(|| true)
        .build()
        .err();
    assert!(matches!(err, Some(CommandError::MissingExecute)));

    let command = TypedRelayCommand::<u8>::builder()
        .execute(|_| {})
        .build();
    assert!(command.is_ok());
}
