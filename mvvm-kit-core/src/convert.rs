//! Value converters for binding layers
//!
//! A binding layer runs a converter between a view-model property and the
//! value a control displays. [`ValueConverter::convert`] goes from the source
//! (view-model) side to the target (control) side;
//! [`ValueConverter::convert_back`] goes the other way and may be unsupported.

use serde::{Deserialize, Serialize};
use std::any::{Any, TypeId};

use crate::error::ConvertError;

/// Two-way value conversion between a source and a target type
pub trait ValueConverter {
    type Source;
    type Target;

    fn convert(&self, value: &Self::Source) -> Self::Target;

    fn convert_back(&self, value: &Self::Target) -> Result<Self::Source, ConvertError>;
}

/// Negates a boolean in both directions
///
/// Binds "enabled" controls to "busy"-style flags.
#[derive(Debug, Clone, Copy, Default)]
pub struct InverseBool;

impl ValueConverter for InverseBool {
    type Source = bool;
    type Target = bool;

    fn convert(&self, value: &bool) -> bool {
        !*value
    }

    fn convert_back(&self, value: &bool) -> Result<bool, ConvertError> {
        Ok(!*value)
    }
}

/// How a window may be resized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeMode {
    /// Fixed size, no minimize
    NoResize,
    /// Fixed size, can be minimized
    CanMinimize,
    /// Resizable
    CanResize,
    /// Resizable, with a grip in the corner
    CanResizeWithGrip,
}

/// Maps a "resizable" flag to a [`ResizeMode`]
///
/// `true` becomes [`ResizeMode::CanResize`], `false` becomes
/// [`ResizeMode::CanMinimize`]. One-way.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoolToResizeMode;

impl ValueConverter for BoolToResizeMode {
    type Source = bool;
    type Target = ResizeMode;

    fn convert(&self, value: &bool) -> ResizeMode {
        if *value {
            ResizeMode::CanResize
        } else {
            ResizeMode::CanMinimize
        }
    }

    fn convert_back(&self, _value: &ResizeMode) -> Result<bool, ConvertError> {
        Err(ConvertError::Unsupported {
            converter: "BoolToResizeMode",
        })
    }
}

/// Tests whether a value has exactly a given type
///
/// Used to switch templates on the concrete type of a bound item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IsOfType {
    expected: TypeId,
    name: &'static str,
}

impl IsOfType {
    /// Converter matching values of type `T`
    pub fn of<T: Any>() -> Self {
        Self {
            expected: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Name of the expected type, for diagnostics
    pub fn type_name(&self) -> &'static str {
        self.name
    }

    /// Whether `value` is exactly the expected type
    pub fn matches(&self, value: &dyn Any) -> bool {
        value.type_id() == self.expected
    }
}

impl ValueConverter for IsOfType {
    type Source = Box<dyn Any>;
    type Target = bool;

    fn convert(&self, value: &Box<dyn Any>) -> bool {
        self.matches(value.as_ref())
    }

    fn convert_back(&self, _value: &bool) -> Result<Box<dyn Any>, ConvertError> {
        Err(ConvertError::Unsupported {
            converter: "IsOfType",
        })
    }
}
