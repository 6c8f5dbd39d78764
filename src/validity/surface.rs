//! Headless validation surface.
//!
//! [`MemorySurface`] keeps an ordered list of named controls and evaluates
//! native-style constraints (`required`, length bounds, `pattern`, typed
//! inputs) against their live values. Controls sharing a name form a group.

use super::{ValidationAdapter, Validity};
use log::*;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::OnceLock;

const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$";

fn email_regex() -> Option<&'static Regex> {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL
        .get_or_init(|| match Regex::new(EMAIL_PATTERN) {
            Ok(re) => Some(re),
            Err(e) => {
                warn!("Failed to compile email pattern: {}", e);
                None
            }
        })
        .as_ref()
}

/// Input type of a control.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    #[default]
    Text,
    Email,
    Password,
    Number,
    Checkbox,
}

/// Declared constraints of a control.
///
#[derive(Debug, Clone, Default)]
pub struct Constraints {
    pub kind: InputKind,
    pub required: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<Regex>,
}

impl Constraints {
    pub fn new(kind: InputKind) -> Self {
        Constraints {
            kind,
            ..Default::default()
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn min_length(mut self, len: usize) -> Self {
        self.min_length = Some(len);
        self
    }

    pub fn max_length(mut self, len: usize) -> Self {
        self.max_length = Some(len);
        self
    }

    /// Anchor and compile a pattern the way `pattern` attributes are
    /// matched: against the whole value.
    ///
    pub fn pattern(mut self, pattern: &str) -> Result<Self, regex::Error> {
        self.pattern = Some(Regex::new(&format!("^(?:{})$", pattern))?);
        Ok(self)
    }
}

/// A single named control.
///
#[derive(Debug, Clone)]
pub struct Control {
    pub name: String,
    pub value: Value,
    pub constraints: Constraints,
    pub custom_validity: String,
}

impl Control {
    pub fn new(name: &str, constraints: Constraints) -> Self {
        let value = match constraints.kind {
            InputKind::Checkbox => Value::Bool(false),
            _ => Value::String(String::new()),
        };
        Control {
            name: name.to_string(),
            value,
            constraints,
            custom_validity: String::new(),
        }
    }

    /// Text form of the live value.
    ///
    pub fn text(&self) -> String {
        match &self.value {
            Value::Null => String::new(),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    /// Whether the live value satisfies every constraint and no custom
    /// validity marker is set.
    ///
    pub fn is_valid(&self) -> bool {
        if !self.custom_validity.is_empty() {
            return false;
        }
        let c = &self.constraints;

        if c.kind == InputKind::Checkbox {
            let checked = self.value.as_bool().unwrap_or(false);
            return !c.required || checked;
        }

        let text = self.text();
        if text.is_empty() {
            return !c.required;
        }

        let len = text.chars().count();
        if c.min_length.map_or(false, |min| len < min) {
            return false;
        }
        if c.max_length.map_or(false, |max| len > max) {
            return false;
        }
        if let Some(pattern) = &c.pattern {
            if !pattern.is_match(&text) {
                return false;
            }
        }
        match c.kind {
            InputKind::Email => email_regex().map_or(true, |re| re.is_match(&text)),
            InputKind::Number => text.trim().parse::<f64>().is_ok(),
            _ => true,
        }
    }
}

/// In-memory form element.
///
#[derive(Debug, Clone, Default)]
pub struct MemorySurface {
    controls: Vec<Control>,
    focused: Option<String>,
}

impl MemorySurface {
    pub fn new() -> Self {
        MemorySurface::default()
    }

    /// Append a control in document order.
    ///
    pub fn with_control(mut self, name: &str, constraints: Constraints) -> Self {
        self.add_control(Control::new(name, constraints));
        self
    }

    pub fn add_control(&mut self, control: Control) {
        self.controls.push(control);
    }

    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    /// Name of the currently focused control.
    ///
    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    /// Move focus to a named control.
    ///
    pub fn focus(&mut self, name: &str) -> bool {
        if self.contains(name) {
            self.focused = Some(name.to_string());
            true
        } else {
            false
        }
    }

    fn members(&self, name: &str) -> impl Iterator<Item = &Control> {
        let name = name.to_string();
        self.controls.iter().filter(move |c| c.name == name)
    }

    fn members_mut(&mut self, name: &str) -> impl Iterator<Item = &mut Control> {
        let name = name.to_string();
        self.controls.iter_mut().filter(move |c| c.name == name)
    }
}

impl ValidationAdapter for MemorySurface {
    fn check_validity(&self) -> bool {
        self.controls.iter().all(Control::is_valid)
    }

    fn focus_first_invalid(&mut self) -> Option<String> {
        let name = self
            .controls
            .iter()
            .find(|c| !c.is_valid())
            .map(|c| c.name.clone())?;
        debug!("Focusing first invalid control '{}'", name);
        self.focused = Some(name.clone());
        Some(name)
    }

    fn contains(&self, name: &str) -> bool {
        self.members(name).next().is_some()
    }

    fn read_value(&self, name: &str) -> Option<Value> {
        self.members(name).next().map(|c| c.value.clone())
    }

    fn write_value(&mut self, name: &str, value: &Value) {
        for control in self.members_mut(name) {
            control.value = value.clone();
        }
    }

    fn set_custom_validity(&mut self, name: &str, message: &str) {
        for control in self.members_mut(name) {
            control.custom_validity = message.to_string();
        }
    }

    fn read_validity(&self, name: &str) -> Option<Validity> {
        let members: Vec<bool> = self.members(name).map(Control::is_valid).collect();
        match members.len() {
            0 => None,
            1 => Some(Validity::Control { valid: members[0] }),
            _ => Some(Validity::Group(members)),
        }
    }
}
