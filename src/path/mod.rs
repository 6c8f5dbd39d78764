//! Dot-path addressed state setters.
//!
//! A [`StatePath`] names a location inside a form's state (always rooted at
//! the `data` slot, e.g. `data.billing.zip`). Assigning through a path never
//! mutates the previous mapping: a new top-level mapping is produced so that
//! consumers comparing `Arc` pointers observe every write.
//!
//! [`PathBinder`] pairs a path with a [`FormHandle`] and is what change
//! handlers call into.

mod error;

pub use error::PathError;

use crate::error::FormResult;
use crate::state::{FormData, FormHandle};
use log::*;
use serde_json::Value;
use std::fmt;

/// Name of the only state slot setters may write into.
///
pub const DATA_SLOT: &str = "data";

/// Kind of control a change event originated from.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControlKind {
    #[default]
    Text,
    Checkbox,
    Radio,
    Select,
}

impl ControlKind {
    /// Whether the control reports its state through `checked`.
    ///
    pub fn is_toggle(self) -> bool {
        matches!(self, ControlKind::Checkbox | ControlKind::Radio)
    }
}

/// A native change/input event carrying the control's live state.
///
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeEvent {
    pub kind: ControlKind,
    pub value: Value,
    pub checked: bool,
}

impl ChangeEvent {
    /// Event from a text-like control.
    ///
    pub fn input(value: impl Into<Value>) -> Self {
        ChangeEvent {
            kind: ControlKind::Text,
            value: value.into(),
            checked: false,
        }
    }

    /// Event from a checkbox.
    ///
    pub fn checkbox(checked: bool) -> Self {
        ChangeEvent {
            kind: ControlKind::Checkbox,
            value: Value::String("on".to_string()),
            checked,
        }
    }

    /// The value this event stores: checked state for toggles, the value
    /// otherwise.
    ///
    pub fn resolve(&self) -> Value {
        if self.kind.is_toggle() {
            Value::Bool(self.checked)
        } else {
            self.value.clone()
        }
    }
}

/// Argument accepted by setters and change handlers.
///
pub enum ChangeInput {
    /// Store the value as-is
    Value(Value),
    /// Extract the value (or checked state) carried by the event
    Event(ChangeEvent),
    /// Compute the new value from the previous one at the same path
    Transform(Box<dyn FnOnce(&Value) -> Value + Send>),
}

impl ChangeInput {
    /// Wrap a transform applied to the previous value.
    ///
    pub fn transform<F>(f: F) -> Self
    where
        F: FnOnce(&Value) -> Value + Send + 'static,
    {
        ChangeInput::Transform(Box::new(f))
    }

    /// Resolve to the value to store, given the previous value at the path.
    ///
    pub fn resolve(self, previous: &Value) -> Value {
        match self {
            ChangeInput::Value(value) => value,
            ChangeInput::Event(event) => event.resolve(),
            ChangeInput::Transform(f) => f(previous),
        }
    }
}

impl fmt::Debug for ChangeInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeInput::Value(value) => f.debug_tuple("Value").field(value).finish(),
            ChangeInput::Event(event) => f.debug_tuple("Event").field(event).finish(),
            ChangeInput::Transform(_) => f.write_str("Transform(..)"),
        }
    }
}

impl From<Value> for ChangeInput {
    fn from(value: Value) -> Self {
        ChangeInput::Value(value)
    }
}

impl From<ChangeEvent> for ChangeInput {
    fn from(event: ChangeEvent) -> Self {
        ChangeInput::Event(event)
    }
}

impl From<&str> for ChangeInput {
    fn from(value: &str) -> Self {
        ChangeInput::Value(Value::String(value.to_string()))
    }
}

impl From<String> for ChangeInput {
    fn from(value: String) -> Self {
        ChangeInput::Value(Value::String(value))
    }
}

impl From<bool> for ChangeInput {
    fn from(value: bool) -> Self {
        ChangeInput::Value(Value::Bool(value))
    }
}

/// A parsed, validated location in form state.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatePath {
    raw: String,
    keys: Vec<String>,
}

impl StatePath {
    /// Parse a dotted path. The first segment must be the `data` slot.
    ///
    pub fn parse(path: &str) -> Result<StatePath, PathError> {
        let segments: Vec<&str> = path.split('.').collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(PathError::EmptySegment(path.to_string()));
        }
        if segments[0] != DATA_SLOT {
            return Err(PathError::UnknownSlot {
                slot: segments[0].to_string(),
                path: path.to_string(),
            });
        }
        Ok(StatePath {
            raw: path.to_string(),
            keys: segments[1..].iter().map(|s| s.to_string()).collect(),
        })
    }

    /// Path of a named field, i.e. `data.<name>`.
    ///
    pub fn for_field(name: &str) -> Result<StatePath, PathError> {
        StatePath::parse(&format!("{}.{}", DATA_SLOT, name))
    }

    /// Path replacing the whole data mapping.
    ///
    pub fn root() -> StatePath {
        StatePath {
            raw: DATA_SLOT.to_string(),
            keys: vec![],
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Keys below the `data` slot.
    ///
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Read the value at this path, if every level exists.
    ///
    pub fn read<'a>(&self, data: &'a FormData) -> Option<&'a Value> {
        let (first, rest) = self.keys.split_first()?;
        let mut current = data.get(first)?;
        for key in rest {
            current = current.as_object()?.get(key)?;
        }
        Some(current)
    }

    /// Produce a new mapping with the input assigned at this path.
    ///
    /// Missing or null intermediate levels are created as empty mappings.
    /// Traversing any other non-mapping value is an error and `data` is left
    /// untouched.
    ///
    pub fn assign(&self, data: &FormData, input: ChangeInput) -> Result<FormData, PathError> {
        let Some((leaf, parents)) = self.keys.split_last() else {
            return match input.resolve(&Value::Object(data.clone())) {
                Value::Object(map) => Ok(map),
                _ => Err(PathError::NotAMapping {
                    segment: DATA_SLOT.to_string(),
                    path: self.raw.clone(),
                }),
            };
        };

        let mut root = data.clone();
        let mut cursor = &mut root;
        for segment in parents {
            let slot = cursor.entry(segment.clone()).or_insert(Value::Null);
            if slot.is_null() {
                *slot = Value::Object(FormData::new());
            }
            cursor = match slot {
                Value::Object(map) => map,
                _ => {
                    return Err(PathError::NotAMapping {
                        segment: segment.clone(),
                        path: self.raw.clone(),
                    })
                }
            };
        }

        let previous = cursor.get(leaf).cloned().unwrap_or(Value::Null);
        cursor.insert(leaf.clone(), input.resolve(&previous));
        Ok(root)
    }
}

impl fmt::Display for StatePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Setter bound to a form and a path.
///
#[derive(Clone)]
pub struct PathBinder {
    form: FormHandle,
    path: StatePath,
}

impl PathBinder {
    /// Return a setter writing `path` on `form`.
    ///
    pub fn new(form: &FormHandle, path: &str) -> Result<PathBinder, PathError> {
        Ok(PathBinder {
            form: form.clone(),
            path: StatePath::parse(path)?,
        })
    }

    pub fn path(&self) -> &StatePath {
        &self.path
    }

    /// Resolve the input and write it through the form's update mechanism.
    ///
    pub async fn set(&self, input: impl Into<ChangeInput>) -> FormResult<()> {
        let input = input.into();
        trace!("Setting '{}' from {:?}", self.path, input);
        self.form.apply(&self.path, input).await
    }
}
