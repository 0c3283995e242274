//! Commands that take a typed parameter

use std::any::Any;
use std::fmt;

use crate::command::{raise_can_execute_changed, CanExecuteChanged, Command};
use crate::error::CommandError;
use crate::notifier::{Notifier, SourceId};
use crate::parameter::{CommandParameter, Parameter};

type Execute<T> = Box<dyn Fn(T)>;
type Gate<T> = Box<dyn Fn(&T) -> bool>;

/// A command relaying to an execute closure over `T` and an optional gate over `&T`
///
/// The typed entry points ([`execute_with`](Self::execute_with),
/// [`can_execute_with`](Self::can_execute_with)) are for application code.
/// Hosts go through [`Command`], whose untyped parameter is narrowed to `T`:
///
/// - An absent parameter for a non-nullable `T` makes `can_execute` return
///   `false` without calling the gate. Hosts query the gate before any value
///   is bound, and that must not count as "permitted".
/// - A parameter that does not narrow to `T` is a programming error in the
///   host integration and panics. So does executing a non-nullable command
///   with an absent parameter.
///
/// Use `Option<U>` as `T` when absence is a meaningful value.
///
/// # Example
///
/// ```
/// use mvvm_kit_core::{Command, TypedRelayCommand};
///
/// let delete = TypedRelayCommand::<u32>::with_can_execute(
///     |row| println!("deleting row {row}"),
///     |row| *row != 0,
/// );
///
/// let host: &dyn Command = &delete;
/// assert!(!host.can_execute(None));
/// assert!(host.can_execute(Some(&3_u32)));
/// assert!(!host.can_execute(Some(&0_u32)));
/// ```
pub struct TypedRelayCommand<T: CommandParameter> {
    id: SourceId,
    execute: Execute<T>,
    can_execute: Option<Gate<T>>,
    can_execute_changed: Notifier<CanExecuteChanged>,
}

impl<T: CommandParameter> fmt::Debug for TypedRelayCommand<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedRelayCommand")
            .field("id", &self.id)
            .field("parameter", &std::any::type_name::<T>())
            .field("has_can_execute", &self.can_execute.is_some())
            .field("can_execute_changed", &self.can_execute_changed)
            .finish()
    }
}

impl<T: CommandParameter> TypedRelayCommand<T> {
    /// Create a command that is always executable
    pub fn new<F>(execute: F) -> Self
    where
        F: Fn(T) + 'static,
    {
        Self::from_parts(Box::new(execute), None)
    }

    /// Create a command gated by `can_execute`
    pub fn with_can_execute<F, G>(execute: F, can_execute: G) -> Self
    where
        F: Fn(T) + 'static,
        G: Fn(&T) -> bool + 'static,
    {
        Self::from_parts(Box::new(execute), Some(Box::new(can_execute)))
    }

    /// Start building a command whose parts are supplied separately
    pub fn builder() -> TypedRelayCommandBuilder<T> {
        TypedRelayCommandBuilder::default()
    }

    fn from_parts(execute: Execute<T>, can_execute: Option<Gate<T>>) -> Self {
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

    /// Evaluate the gate for `parameter`; `true` when there is none
    pub fn can_execute_with(&self, parameter: &T) -> bool {
        self.can_execute.as_ref().is_none_or(|gate| gate(parameter))
    }

    /// Run the execute closure unconditionally
    pub fn execute_with(&self, parameter: T) {
        (self.execute)(parameter);
    }

    /// Ask subscribers to re-query the gate
    pub fn notify_can_execute_changed(&self) {
        raise_can_execute_changed(self.id, &self.can_execute_changed);
    }
}

#[track_caller]
fn narrow_or_panic<T: CommandParameter>(parameter: Parameter<'_>) -> T {
    match T::narrow(parameter) {
        Ok(value) => value,
        Err(err) => panic!("command parameter contract violated: {err}"),
    }
}

impl<T: CommandParameter> Command for TypedRelayCommand<T> {
    /// # Panics
    ///
    /// If `parameter` is present but does not narrow to `T`.
    fn can_execute(&self, parameter: Option<&dyn Any>) -> bool {
        if parameter.is_none() && !T::is_nullable() {
            tracing::trace!(
                source = %self.id,
                parameter = std::any::type_name::<T>(),
                "Absent parameter for non-nullable type, not executable"
            );
            return false;
        }
        if self.can_execute.is_none() {
            return true;
        }
        let value = narrow_or_panic::<T>(parameter);
        self.can_execute_with(&value)
    }

    /// # Panics
    ///
    /// If `parameter` does not narrow to `T`, including an absent parameter
    /// for a non-nullable `T`.
    fn execute(&self, parameter: Option<&dyn Any>) {
        let value = narrow_or_panic::<T>(parameter);
        self.execute_with(value);
    }

    fn can_execute_changed(&self) -> &Notifier<CanExecuteChanged> {
        &self.can_execute_changed
    }

    fn source_id(&self) -> SourceId {
        self.id
    }
}

/// Builder for [`TypedRelayCommand`]
pub struct TypedRelayCommandBuilder<T: CommandParameter> {
    execute: Option<Execute<T>>,
    can_execute: Option<Gate<T>>,
}

impl<T: CommandParameter> Default for TypedRelayCommandBuilder<T> {
    fn default() -> Self {
        Self {
            execute: None,
            can_execute: None,
        }
    }
}

impl<T: CommandParameter> fmt::Debug for TypedRelayCommandBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedRelayCommandBuilder")
            .field("has_execute", &self.execute.is_some())
            .field("has_can_execute", &self.can_execute.is_some())
            .finish()
    }
}

impl<T: CommandParameter> TypedRelayCommandBuilder<T> {
    /// Set the execute operation
    pub fn execute<F>(mut self, execute: F) -> Self
    where
        F: Fn(T) + 'static,
    {
        self.execute = Some(Box::new(execute));
        self
    }

    /// Set the gate
    pub fn can_execute<G>(mut self, can_execute: G) -> Self
    where
        G: Fn(&T) -> bool + 'static,
    {
        self.can_execute = Some(Box::new(can_execute));
        self
    }

    /// Finish the command
    ///
    /// Fails with [`CommandError::MissingExecute`] if no execute operation was set.
    pub fn build(self) -> Result<TypedRelayCommand<T>, CommandError> {
        let execute = self.execute.ok_or(CommandError::MissingExecute)?;
        Ok(TypedRelayCommand::from_parts(execute, self.can_execute))
    }
}
