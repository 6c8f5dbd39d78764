//! Validity resolution against a host validation surface.
//!
//! The host surface (a DOM form in a browser, [`MemorySurface`] headless) is
//! abstracted by [`ValidationAdapter`]. [`is_invalid`] reads a field's
//! validity and, as a side effect, keeps the surface's live values and
//! custom-validity markers in step with the form's data.

pub mod surface;

pub use surface::{Constraints, Control, InputKind, MemorySurface};

use crate::state::FormData;
use log::*;
use serde_json::Value;
use std::sync::Arc;

/// Custom-validity marker set on controls failing a user predicate.
///
pub const CUSTOM_INVALID_MARKER: &str = "invalid";

/// User predicate: `(value, data, name) -> valid`.
///
pub type Validator = Arc<dyn Fn(&Value, &FormData, &str) -> bool + Send + Sync>;

/// Validity reported by the surface for a name.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validity {
    /// A single control and its `valid` flag
    Control { valid: bool },
    /// Several controls sharing the name
    Group(Vec<bool>),
}

impl Validity {
    /// True if the control, or any member of the group, is invalid.
    ///
    pub fn is_invalid(&self) -> bool {
        match self {
            Validity::Control { valid } => !valid,
            Validity::Group(members) => members.iter().any(|valid| !valid),
        }
    }
}

/// Host validation surface.
///
pub trait ValidationAdapter: Send {
    /// Whole-form validity check.
    fn check_validity(&self) -> bool;

    /// Focus the first invalid control, returning its name.
    fn focus_first_invalid(&mut self) -> Option<String>;

    /// Whether a control (or group) with this name exists.
    fn contains(&self, name: &str) -> bool;

    /// Live value of the named control.
    fn read_value(&self, name: &str) -> Option<Value>;

    /// Assign the live value without emitting a change notification.
    fn write_value(&mut self, name: &str, value: &Value);

    /// Set the custom-validity marker; empty means valid.
    fn set_custom_validity(&mut self, name: &str, message: &str);

    /// Validity of the named control or group.
    fn read_validity(&self, name: &str) -> Option<Validity>;
}

/// Wrap a closure as a [`Validator`].
///
pub fn validator<F>(f: F) -> Validator
where
    F: Fn(&Value, &FormData, &str) -> bool + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Push `data[name]` into the surface if it differs from the live value.
///
pub fn sync_value(surface: &mut dyn ValidationAdapter, data: &FormData, name: &str) {
    if let Some(value) = data.get(name) {
        if surface.read_value(name).as_ref() != Some(value) {
            trace!("Syncing live value of '{}' to {}", name, value);
            surface.write_value(name, value);
        }
    }
}

/// Whether the named field is currently invalid.
///
/// Absent surfaces (before mount) and fields never written to `data` are
/// optimistically valid.
///
pub fn is_invalid(
    surface: Option<&mut (dyn ValidationAdapter + 'static)>,
    data: &FormData,
    name: &str,
    validate: Option<&Validator>,
) -> bool {
    let Some(surface) = surface else {
        return false;
    };
    let Some(value) = data.get(name) else {
        return false;
    };
    if !surface.contains(name) {
        return false;
    }

    sync_value(surface, data, name);

    if let Some(validate) = validate {
        let marker = if validate(value, data, name) {
            ""
        } else {
            CUSTOM_INVALID_MARKER
        };
        surface.set_custom_validity(name, marker);
    }

    surface
        .read_validity(name)
        .map(|validity| validity.is_invalid())
        .unwrap_or(false)
}
