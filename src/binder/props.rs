//! Props handed into and out of bound components.

use super::ChangeHandler;
use crate::state::FormData;
use crate::validity::{validator, Validator};
use serde_json::Value;
use std::fmt;

/// A props mapping.
///
pub type Props = FormData;

/// Explicit props of a bound component instance.
///
#[derive(Clone, Default)]
pub struct FieldProps {
    pub name: Option<String>,
    pub validate: Option<Validator>,
    pub on_change: Option<ChangeHandler>,
    pub extra: Props,
}

impl FieldProps {
    pub fn new() -> Self {
        FieldProps::default()
    }

    /// Props for a field bound to `data.<name>`.
    ///
    pub fn named(name: &str) -> Self {
        FieldProps {
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    pub fn validate<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value, &FormData, &str) -> bool + Send + Sync + 'static,
    {
        self.validate = Some(validator(f));
        self
    }

    pub fn with_validator(mut self, validate: Option<Validator>) -> Self {
        self.validate = validate;
        self
    }

    /// Replace the derived change handler.
    ///
    pub fn on_change(mut self, handler: ChangeHandler) -> Self {
        self.on_change = Some(handler);
        self
    }

    /// Add a pass-through prop.
    ///
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.extra.insert(key.to_string(), value.into());
        self
    }

    /// Explicit props as a mapping, including the name.
    ///
    pub fn own_props(&self) -> Props {
        let mut props = self.extra.clone();
        if let Some(name) = &self.name {
            props
                .entry("name")
                .or_insert_with(|| Value::String(name.clone()));
        }
        props
    }
}

impl fmt::Debug for FieldProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldProps")
            .field("name", &self.name)
            .field("validate", &self.validate.is_some())
            .field("on_change", &self.on_change)
            .field("extra", &self.extra)
            .finish()
    }
}

/// Props a bound component renders from: derived props overlaid with the
/// explicit ones, plus the change handler.
///
#[derive(Clone)]
pub struct BoundProps {
    pub props: Props,
    pub on_change: ChangeHandler,
}

impl BoundProps {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.props.get(key)
    }

    pub fn str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn name(&self) -> Option<&str> {
        self.str("name")
    }

    pub fn value(&self) -> &Value {
        self.get("value").unwrap_or(&Value::Null)
    }

    /// The value as display text.
    ///
    pub fn value_text(&self) -> String {
        match self.value() {
            Value::Null => String::new(),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    pub fn invalid(&self) -> bool {
        self.get("invalid").and_then(Value::as_bool).unwrap_or(false)
    }

    pub fn status(&self) -> Option<&Value> {
        self.get("status")
    }

    pub fn submitting(&self) -> bool {
        self.status()
            .and_then(|status| status.get("submitting"))
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// The form's submission error, if any.
    ///
    pub fn error(&self) -> Option<&Value> {
        self.status()
            .and_then(|status| status.get("error"))
            .filter(|error| !error.is_null())
    }
}

impl fmt::Debug for BoundProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundProps")
            .field("props", &self.props)
            .finish_non_exhaustive()
    }
}
