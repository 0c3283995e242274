//! Commands that relay to caller-supplied closures
//!
//! A host UI element drives a command through the [`Command`] trait:
//!
//! 1. query [`Command::can_execute`] to set its enabled state,
//! 2. call [`Command::execute`] on user action,
//! 3. re-query `can_execute` whenever a [`CanExecuteChanged`] arrives.
//!
//! Application code raises `CanExecuteChanged` with
//! [`RelayCommand::notify_can_execute_changed`] after changing the state its
//! gate reads.
//!
//! `execute` never consults the gate. Disabling the control is the host's job;
//! calling `execute` directly on a command whose gate is closed still runs it.

use serde::Serialize;
use std::any::Any;
use std::fmt;

use crate::error::CommandError;
use crate::notifier::{Notifier, SourceId, SubscriptionId};
use crate::parameter::Parameter;

/// Payload delivered when a command's gate may have changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CanExecuteChanged {
    /// The command whose gate should be re-queried
    pub source: SourceId,
}

/// The untyped command surface consumed by host UI frameworks
///
/// Object safe: hosts usually hold `Rc<dyn Command>`.
pub trait Command {
    /// Whether the command may run with `parameter`
    fn can_execute(&self, parameter: Option<&dyn Any>) -> bool;

    /// Run the command with `parameter`
    ///
    /// Does not check [`can_execute`](Self::can_execute) first.
    fn execute(&self, parameter: Option<&dyn Any>);

    /// Subscriber list for gate re-evaluation requests
    fn can_execute_changed(&self) -> &Notifier<CanExecuteChanged>;

    /// Identity reported in [`CanExecuteChanged`]
    fn source_id(&self) -> SourceId;

    /// Register a listener for gate re-evaluation requests
    fn subscribe_can_execute_changed(
        &self,
        listener: Box<dyn Fn(&CanExecuteChanged)>,
    ) -> SubscriptionId {
        self.can_execute_changed().subscribe(listener)
    }

    /// Stop delivering gate re-evaluation requests to a listener
    fn unsubscribe_can_execute_changed(&self, id: SubscriptionId) -> bool {
        self.can_execute_changed().unsubscribe(id)
    }
}

pub(crate) fn raise_can_execute_changed(
    source: SourceId,
    notifier: &Notifier<CanExecuteChanged>,
) {
    tracing::trace!(source = %source, "Can-execute changed");
    notifier.emit(&CanExecuteChanged { source });
}

type Execute = Box<dyn Fn()>;
type Gate = Box<dyn Fn() -> bool>;

/// A parameterless command relaying to an execute closure and an optional gate
///
/// # Example
///
/// ```
/// use mvvm_kit_core::RelayCommand;
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let counter = Rc::new(Cell::new(9));
///
/// let inc = counter.clone();
/// let gate = counter.clone();
/// let command = RelayCommand::with_can_execute(
///     move || inc.set(inc.get() + 1),
///     move || gate.get() < 10,
/// );
///
/// assert!(command.can_execute());
/// command.execute();
/// assert_eq!(counter.get(), 10);
/// assert!(!command.can_execute());
/// ```
pub struct RelayCommand {
    id: SourceId,
    execute: Execute,
    can_execute: Option<Gate>,
    can_execute_changed: Notifier<CanExecuteChanged>,
}

impl fmt::Debug for RelayCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelayCommand")
            .field("id", &self.id)
            .field("has_can_execute", &self.can_execute.is_some())
            .field("can_execute_changed", &self.can_execute_changed)
            .finish()
    }
}

impl RelayCommand {
    /// Create a command that is always executable
    pub fn new<F>(execute: F) -> Self
    where
        F: Fn() + 'static,
    {
        Self::from_parts(Box::new(execute), None)
    }

    /// Create a command gated by `can_execute`
    pub fn with_can_execute<F, G>(execute: F, can_execute: G) -> Self
    where
        F: Fn() + 'static,
        G: Fn() -> bool + 'static,
    {
        Self::from_parts(Box::new(execute), Some(Box::new(can_execute)))
    }

    /// Start building a command whose parts are supplied separately
    pub fn builder() -> RelayCommandBuilder {
        RelayCommandBuilder::default()
    }

    fn from_parts(execute: Execute, can_execute: Option<Gate>) -> Self {
        Self {
            id: SourceId::next(),
            execute,
            can_execute,
            can_execute_changed: Notifier::new(),
        }
    }

    /// Identity reported in [`CanExecuteChanged`]
    pub fn id(&self) -> SourceId {
        self.id
    }

    /// Evaluate the gate; `true` when there is none
    pub fn can_execute(&self) -> bool {
        self.can_execute.as_ref().is_none_or(|gate| gate())
    }

    /// Run the execute closure unconditionally
    pub fn execute(&self) {
        (self.execute)();
    }

    /// Ask subscribers to re-query [`can_execute`](Self::can_execute)
    pub fn notify_can_execute_changed(&self) {
        raise_can_execute_changed(self.id, &self.can_execute_changed);
    }
}

impl Command for RelayCommand {
    fn can_execute(&self, _parameter: Option<&dyn Any>) -> bool {
        RelayCommand::can_execute(self)
    }

    fn execute(&self, _parameter: Option<&dyn Any>) {
        RelayCommand::execute(self)
    }

    fn can_execute_changed(&self) -> &Notifier<CanExecuteChanged> {
        &self.can_execute_changed
    }

    fn source_id(&self) -> SourceId {
        self.id
    }
}

/// Builder for [`RelayCommand`]
///
/// Useful when the execute operation is chosen at runtime and may be missing.
#[derive(Default)]
pub struct RelayCommandBuilder {
    execute: Option<Execute>,
    can_execute: Option<Gate>,
}

impl fmt::Debug for RelayCommandBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelayCommandBuilder")
            .field("has_execute", &self.execute.is_some())
            .field("has_can_execute", &self.can_execute.is_some())
            .finish()
    }
}

impl RelayCommandBuilder {
    /// Set the execute operation
    pub fn execute<F>(mut self, execute: F) -> Self
    where
        F: Fn() + 'static,
    {
        self.execute = Some(Box::new(execute));
        self
    }

    /// Set the gate
    pub fn can_execute<G>(mut self, can_execute: G) -> Self
    where
        G: Fn() -> bool + 'static,
    {
        self.can_execute = Some(Box::new(can_execute));
        self
    }

    /// Finish the command
    ///
    /// Fails with [`CommandError::MissingExecute`] if no execute operation was set.
    pub fn build(self) -> Result<RelayCommand, CommandError> {
        let execute = self.execute.ok_or(CommandError::MissingExecute)?;
        Ok(RelayCommand::from_parts(execute, self.can_execute))
    }
}

/// Run [`Command::execute`] only if [`Command::can_execute`] allows it
///
/// This is what a host does on user action. Returns whether the command ran.
pub fn execute_if_allowed(command: &dyn Command, parameter: Parameter<'_>) -> bool {
    if command.can_execute(parameter) {
        command.execute(parameter);
        true
    } else {
        tracing::debug!(source = %command.source_id(), "Command not executable, skipped");
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_no_gate_is_always_executable() {
        let runs = Rc::new(Cell::new(0));
        let r = runs.clone();
        let command = RelayCommand::new(move || r.set(r.get() + 1));

        for _ in 0..3 {
            assert!(command.can_execute());
            command.execute();
        }
        assert!(command.can_execute());
        assert_eq!(runs.get(), 3);
    }

    #[test]
    fn test_gate_is_evaluated_on_every_query() {
        let open = Rc::new(Cell::new(true));
        let gate = open.clone();
        let command = RelayCommand::with_can_execute(|| {}, move || gate.get());

        assert!(command.can_execute());
        open.set(false);
        assert!(!command.can_execute());
        open.set(true);
        assert!(command.can_execute());
    }

    #[test]
    fn test_execute_ignores_closed_gate() {
        let ran = Rc::new(Cell::new(false));
        let r = ran.clone();
        let command = RelayCommand::with_can_execute(move || r.set(true), || false);

        assert!(!command.can_execute());
        command.execute();
        assert!(ran.get());
    }

    #[test]
    fn test_counter_scenario() {
        let counter = Rc::new(Cell::new(9));
        let inc = counter.clone();
        let gate = counter.clone();
        let command =
            RelayCommand::with_can_execute(move || inc.set(inc.get() + 1), move || gate.get() < 10);

        assert!(command.can_execute());
        command.execute();
        assert_eq!(counter.get(), 10);
        assert!(!command.can_execute());
    }

    #[test]
    fn test_notify_can_execute_changed() {
        let command = RelayCommand::new(|| {});
        let seen = Rc::new(Cell::new(None));
        let s = seen.clone();
        command.subscribe_can_execute_changed(Box::new(move |e: &CanExecuteChanged| {
            s.set(Some(e.source))
        }));

        command.notify_can_execute_changed();

        assert_eq!(seen.get(), Some(command.id()));
    }

    #[test]
    fn test_unsubscribe_can_execute_changed() {
        let command = RelayCommand::new(|| {});
        let first = Rc::new(Cell::new(0));
        let second = Rc::new(Cell::new(0));

        let f = first.clone();
        let id = command.subscribe_can_execute_changed(Box::new(move |_: &CanExecuteChanged| {
            f.set(f.get() + 1)
        }));
        let s = second.clone();
        command.subscribe_can_execute_changed(Box::new(move |_: &CanExecuteChanged| {
            s.set(s.get() + 1)
        }));

        command.notify_can_execute_changed();
        assert!(command.unsubscribe_can_execute_changed(id));
        command.notify_can_execute_changed();

        assert_eq!(first.get(), 1);
        assert_eq!(second.get(), 2);
    }

    #[test]
    fn test_untyped_surface_ignores_parameter() {
        let ran = Rc::new(Cell::new(false));
        let r = ran.clone();
        let command = RelayCommand::new(move || r.set(true));
        let host: &dyn Command = &command;

        let junk = 17_u64;
        assert!(host.can_execute(Some(&junk)));
        host.execute(None);
        assert!(ran.get());
        assert_eq!(host.source_id(), command.id());
    }

    #[test]
    fn test_builder_requires_execute() {
        let result = RelayCommand::builder().can_execute(|| true).build();
        assert_eq!(result.unwrap_err(), CommandError::MissingExecute);
    }

    #[test]
    fn test_builder_with_parts() {
        let command = RelayCommand::builder()
            .execute(|| {})
            .can_execute(|| false)
            .build()
            .unwrap();
        assert!(!command.can_execute());
    }

    #[test]
    fn test_execute_if_allowed() {
        let runs = Rc::new(Cell::new(0));
        let open = Rc::new(Cell::new(false));
        let r = runs.clone();
        let g = open.clone();
        let command = RelayCommand::with_can_execute(move || r.set(r.get() + 1), move || g.get());

        assert!(!execute_if_allowed(&command, None));
        open.set(true);
        assert!(execute_if_allowed(&command, None));
        assert_eq!(runs.get(), 1);
    }
}
