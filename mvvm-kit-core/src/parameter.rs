//! Narrowing untyped command parameters to concrete types
//!
//! Hosts invoke commands through [`Command`](crate::Command), which passes the
//! parameter as `Option<&dyn Any>`. A [`TypedRelayCommand<T>`](crate::TypedRelayCommand)
//! narrows that value to `T` with [`CommandParameter::narrow`].
//!
//! `Option<U>` is the only nullable parameter shape: an absent parameter
//! narrows to `None`. Every other implementor is non-nullable and narrowing
//! an absent parameter fails.
//!
//! Implement the trait for your own types with an empty impl block or
//! `#[derive(CommandParameter)]`:
//!
//! ```
//! use mvvm_kit_core::CommandParameter;
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct RowId(u32);
//!
//! impl CommandParameter for RowId {}
//!
//! let value = RowId(4);
//! assert_eq!(RowId::narrow(Some(&value)), Ok(RowId(4)));
//! assert!(RowId::narrow(None).is_err());
//! assert!(!RowId::is_nullable());
//! ```

use std::any::{type_name, Any};

use crate::error::CommandError;

/// Untyped parameter as passed by a host UI framework
pub type Parameter<'a> = Option<&'a dyn Any>;

/// A type a command can accept as its parameter
pub trait CommandParameter: Clone + 'static {
    /// The value an absent parameter narrows to, or `None` if this type
    /// cannot represent absence
    fn absent() -> Option<Self> {
        None
    }

    /// Whether an absent parameter is a valid value of this type
    fn is_nullable() -> bool {
        Self::absent().is_some()
    }

    /// Narrow an untyped parameter to this type
    fn narrow(parameter: Parameter<'_>) -> Result<Self, CommandError> {
        match parameter {
            None => Self::absent().ok_or(CommandError::MissingParameter {
                expected: type_name::<Self>(),
            }),
            Some(value) => value
                .downcast_ref::<Self>()
                .cloned()
                .ok_or(CommandError::ParameterType {
                    expected: type_name::<Self>(),
                }),
        }
    }
}

impl<T: Clone + 'static> CommandParameter for Option<T> {
    fn absent() -> Option<Self> {
        Some(None)
    }

    fn is_nullable() -> bool {
        true
    }

    /// Accepts either an `Option<T>` or a bare `T`
    fn narrow(parameter: Parameter<'_>) -> Result<Self, CommandError> {
        let Some(value) = parameter else {
            return Ok(None);
        };
        if let Some(option) = value.downcast_ref::<Option<T>>() {
            return Ok(option.clone());
        }
        value
            .downcast_ref::<T>()
            .cloned()
            .map(Some)
            .ok_or(CommandError::ParameterType {
                expected: type_name::<Self>(),
            })
    }
}

macro_rules! impl_command_parameter {
    ($($ty:ty),* $(,)?) => {
        $(impl CommandParameter for $ty {})*
    };
}

impl_command_parameter!(
    bool,
    char,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    f32,
    f64,
    (),
    String,
    &'static str,
    std::path::PathBuf,
    std::time::Duration,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_nullable_narrow() {
        let value: i32 = 42;
        assert_eq!(i32::narrow(Some(&value)), Ok(42));
        assert!(!i32::is_nullable());
    }

    #[test]
    fn test_non_nullable_absent_fails() {
        assert_eq!(
            i32::narrow(None),
            Err(CommandError::MissingParameter { expected: "i32" })
        );
    }

    #[test]
    fn test_wrong_type_fails() {
        let value = String::from("nope");
        assert_eq!(
            u8::narrow(Some(&value)),
            Err(CommandError::ParameterType { expected: "u8" })
        );
    }

    #[test]
    fn test_nullable_absent_is_none() {
        assert!(Option::<i32>::is_nullable());
        assert_eq!(Option::<i32>::narrow(None), Ok(None));
    }

    #[test]
    fn test_nullable_accepts_bare_and_wrapped_values() {
        let bare: i32 = 3;
        let wrapped: Option<i32> = Some(4);
        let empty: Option<i32> = None;

        assert_eq!(Option::<i32>::narrow(Some(&bare)), Ok(Some(3)));
        assert_eq!(Option::<i32>::narrow(Some(&wrapped)), Ok(Some(4)));
        assert_eq!(Option::<i32>::narrow(Some(&empty)), Ok(None));
    }

    #[test]
    fn test_nullable_wrong_type_fails() {
        let value = 1.5_f64;
        assert!(matches!(
            Option::<i32>::narrow(Some(&value)),
            Err(CommandError::ParameterType { .. })
        ));
    }

    #[test]
    fn test_string_parameter() {
        let value = String::from("hello");
        assert_eq!(String::narrow(Some(&value)).as_deref(), Ok("hello"));
    }
}
