//! The form container state machine.
//!
//! `Idle → Validating → {Invalid → Idle | Submitting → {Settled → Idle}}`
//!
//! Every mutator ends by running [`FormState::transition`], which mirrors
//! data into the mounted surface and clears `invalid` once the surface
//! reports the form valid.

use super::error::StateError;
use super::submit::{
    Completion, SubmitEvent, SubmitFn, SubmitFuture, SubmitOutcome, Submission, SubmittedFn,
};
use crate::path::{ChangeInput, PathError, StatePath};
use crate::utils::class_list;
use crate::validity::{self, ValidationAdapter, Validator};
use log::*;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Canonical form data: field name to value.
///
pub type FormData = Map<String, Value>;

/// Configuration supplied when creating a form.
///
#[derive(Clone, Default)]
pub struct FormOptions {
    pub on_submit: Option<SubmitFn>,
    pub on_submitted: Option<SubmittedFn>,
    pub initial_state: Option<FormData>,
    pub class_name: Option<String>,
}

impl FormOptions {
    pub fn new() -> Self {
        FormOptions::default()
    }

    /// Callback receiving a snapshot of the data and the mounted surface.
    ///
    /// It runs under the form lock. A panic is not caught: it unwinds through
    /// `submit`, releases the lock and leaves the form `submitting`, so later
    /// submits are ignored.
    ///
    pub fn on_submit<F>(mut self, f: F) -> Self
    where
        F: Fn(Value, &dyn ValidationAdapter) -> Submission + Send + Sync + 'static,
    {
        self.on_submit = Some(Arc::new(f));
        self
    }

    pub fn on_submitted<F>(mut self, f: F) -> Self
    where
        F: Fn(Value) + Send + Sync + 'static,
    {
        self.on_submitted = Some(Arc::new(f));
        self
    }

    pub fn initial_state(mut self, data: FormData) -> Self {
        self.initial_state = Some(data);
        self
    }

    pub fn class_name(mut self, class_name: &str) -> Self {
        self.class_name = Some(class_name.to_string());
        self
    }
}

impl fmt::Debug for FormOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormOptions")
            .field("on_submit", &self.on_submit.is_some())
            .field("on_submitted", &self.on_submitted.is_some())
            .field("initial_state", &self.initial_state)
            .field("class_name", &self.class_name)
            .finish()
    }
}

/// Snapshot handed to bound components as `status`.
///
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormStatus {
    pub data: Arc<FormData>,
    pub invalid: bool,
    pub submitting: bool,
    pub error: Option<Value>,
}

/// Attributes of the rendered form element.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormAttributes {
    pub class_name: Option<String>,
    pub invalid: bool,
    pub submitting: bool,
    pub error: bool,
}

impl FormAttributes {
    /// Class name followed by the markers currently set.
    ///
    pub fn class_list(&self) -> String {
        class_list(&[
            self.class_name.as_deref(),
            self.invalid.then_some("invalid"),
            self.submitting.then_some("submitting"),
            self.error.then_some("error"),
        ])
    }
}

/// Result of the transition function.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Whole-form validity as reported by the surface (true when unmounted)
    pub valid: bool,
}

pub(crate) enum SubmitStep {
    Done(SubmitOutcome, Option<Completion>),
    Pending(SubmitFuture),
}

/// Data, validity and submission state of one form.
///
pub struct FormState {
    data: Arc<FormData>,
    invalid: bool,
    submitting: bool,
    error: Option<Value>,
    initial_state: Option<FormData>,
    surface: Option<Box<dyn ValidationAdapter>>,
    options: FormOptions,
    last_transition: Transition,
}

impl FormState {
    pub fn new(options: FormOptions) -> Self {
        let data = options.initial_state.clone().unwrap_or_default();
        FormState {
            data: Arc::new(data),
            invalid: false,
            submitting: false,
            error: None,
            initial_state: options.initial_state.clone(),
            surface: None,
            options,
            last_transition: Transition { valid: true },
        }
    }

    pub fn data(&self) -> &Arc<FormData> {
        &self.data
    }

    pub fn is_invalid(&self) -> bool {
        self.invalid
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn error(&self) -> Option<&Value> {
        self.error.as_ref()
    }

    pub fn last_transition(&self) -> Transition {
        self.last_transition
    }

    pub fn status(&self) -> FormStatus {
        FormStatus {
            data: Arc::clone(&self.data),
            invalid: self.invalid,
            submitting: self.submitting,
            error: self.error.clone(),
        }
    }

    pub fn attributes(&self) -> FormAttributes {
        FormAttributes {
            class_name: self.options.class_name.clone(),
            invalid: self.invalid,
            submitting: self.submitting,
            error: self.error.is_some(),
        }
    }

    pub fn surface(&self) -> Option<&dyn ValidationAdapter> {
        self.surface.as_deref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut (dyn ValidationAdapter + 'static)> {
        self.surface.as_deref_mut()
    }

    /// Attach the validation surface.
    ///
    pub fn mount(&mut self, surface: Box<dyn ValidationAdapter>) -> Transition {
        debug!("Mounting validation surface");
        self.surface = Some(surface);
        self.transition()
    }

    /// Detach and return the validation surface.
    ///
    pub fn unmount(&mut self) -> Option<Box<dyn ValidationAdapter>> {
        self.surface.take()
    }

    /// Replace the data mapping.
    ///
    pub fn replace_data(&mut self, data: FormData) -> Transition {
        self.data = Arc::new(data);
        self.transition()
    }

    /// Write through a path, producing a new data mapping.
    ///
    pub fn apply(&mut self, path: &StatePath, input: ChangeInput) -> Result<Transition, PathError> {
        let next = path.assign(&self.data, input)?;
        Ok(self.replace_data(next))
    }

    /// Supply a new initial state.
    ///
    /// Data is reset only when the previous initial state was absent or empty
    /// and the new one is not, so late-loaded defaults never clobber edits.
    ///
    pub fn set_initial_state(&mut self, next: Option<FormData>) -> Transition {
        let was_empty = self.initial_state.as_ref().map_or(true, |m| m.is_empty());
        if was_empty {
            if let Some(loaded) = next.as_ref().filter(|m| !m.is_empty()) {
                info!("Initial state loaded; resetting form data");
                self.data = Arc::new(loaded.clone());
            }
        }
        self.initial_state = next;
        self.transition()
    }

    /// Whether the named field is invalid on the mounted surface.
    ///
    pub fn field_invalid(&mut self, name: &str, validate: Option<&Validator>) -> bool {
        let data = Arc::clone(&self.data);
        validity::is_invalid(self.surface.as_deref_mut(), &data, name, validate)
    }

    /// Run after every state change.
    ///
    pub fn transition(&mut self) -> Transition {
        let valid = self.sync_surface();
        if self.invalid && valid {
            debug!("Form is valid again; clearing invalid flag");
            self.invalid = false;
        }
        self.last_transition = Transition { valid };
        self.last_transition
    }

    /// Mirror data into the surface and report whole-form validity.
    ///
    fn sync_surface(&mut self) -> bool {
        let Some(surface) = self.surface.as_deref_mut() else {
            return true;
        };
        for name in self.data.keys() {
            if surface.contains(name) {
                validity::sync_value(surface, &self.data, name);
            }
        }
        surface.check_validity()
    }

    pub(crate) fn begin_submit(&mut self, event: &mut SubmitEvent) -> Result<SubmitStep, StateError> {
        event.prevent_default();

        if self.submitting {
            warn!("Submission already in progress; ignoring submit");
            return Ok(SubmitStep::Done(SubmitOutcome::Ignored, None));
        }
        if self.surface.is_none() {
            return Err(StateError::NotMounted);
        }

        if !self.sync_surface() {
            let focused = self
                .surface
                .as_deref_mut()
                .and_then(|surface| surface.focus_first_invalid());
            info!("Submission blocked by invalid field {:?}", focused);
            self.invalid = true;
            self.transition();
            return Ok(SubmitStep::Done(SubmitOutcome::Invalid { focused }, None));
        }

        let snapshot = Value::Object(FormData::clone(&self.data));
        self.submitting = true;
        self.invalid = false;
        self.error = None;
        self.transition();

        let Some(on_submit) = self.options.on_submit.clone() else {
            let completion = self.finalize(Value::Null);
            return Ok(SubmitStep::Done(
                SubmitOutcome::Submitted(Value::Null),
                completion,
            ));
        };
        let surface = self.surface.as_deref().ok_or(StateError::NotMounted)?;

        debug!("Submitting form data...");
        match on_submit(snapshot, surface) {
            Submission::Settled(Ok(value)) => {
                let completion = self.finalize(value.clone());
                Ok(SubmitStep::Done(SubmitOutcome::Submitted(value), completion))
            }
            Submission::Settled(Err(reason)) => {
                self.reject(reason.clone());
                Ok(SubmitStep::Done(SubmitOutcome::Failed(reason), None))
            }
            Submission::Pending(future) => Ok(SubmitStep::Pending(future)),
        }
    }

    /// End a submission with a rejection reason. Ignored unless a
    /// submission is in flight.
    ///
    pub(crate) fn reject(&mut self, reason: Value) -> Transition {
        if !self.submitting {
            warn!("No submission in flight; dropping rejection {}", reason);
            return self.last_transition;
        }
        warn!("Submission rejected: {}", reason);
        self.submitting = false;
        self.error = Some(reason);
        self.transition()
    }

    /// End a submission successfully. The returned completion invokes
    /// `on_submitted` and should run once the state is no longer borrowed.
    ///
    pub(crate) fn finalize(&mut self, result: Value) -> Option<Completion> {
        info!("Submission settled");
        self.submitting = false;
        self.transition();
        self.options
            .on_submitted
            .clone()
            .map(|callback| Completion::new(callback, result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validity::{validator, Constraints, InputKind, MemorySurface};
    use serde_json::json;
    use std::sync::Mutex;

    fn data(value: Value) -> FormData {
        value.as_object().cloned().unwrap()
    }

    fn signup_surface() -> Box<MemorySurface> {
        Box::new(
            MemorySurface::new()
                .with_control("email", Constraints::new(InputKind::Email).required())
                .with_control("password", Constraints::new(InputKind::Password).min_length(8)),
        )
    }

    #[test]
    fn test_new_uses_initial_state() {
        let state = FormState::new(FormOptions::new().initial_state(data(json!({ "a": 1 }))));
        assert_eq!(state.data()["a"], json!(1));
        assert!(!state.is_invalid());
        assert!(!state.is_submitting());
        assert!(state.error().is_none());
    }

    #[test]
    fn test_replace_data_changes_reference() {
        let mut state = FormState::new(FormOptions::new());
        let before = Arc::clone(state.data());
        state.replace_data(data(json!({ "a": 1 })));
        assert!(!Arc::ptr_eq(&before, state.data()));
    }

    #[test]
    fn test_initial_state_resets_only_from_empty() {
        let mut state = FormState::new(FormOptions::new());
        state.replace_data(data(json!({ "typed": "x" })));

        state.set_initial_state(Some(FormData::new()));
        assert_eq!(state.data()["typed"], json!("x"));

        state.set_initial_state(Some(data(json!({ "email": "loaded@b.com" }))));
        assert_eq!(
            Value::Object((**state.data()).clone()),
            json!({ "email": "loaded@b.com" })
        );

        state.replace_data(data(json!({ "email": "edited@b.com" })));
        state.set_initial_state(Some(data(json!({ "email": "other@b.com" }))));
        assert_eq!(state.data()["email"], json!("edited@b.com"));
    }

    #[test]
    fn test_submit_unmounted_fails() {
        let mut state = FormState::new(FormOptions::new());
        let mut event = SubmitEvent::new();
        assert!(matches!(
            state.begin_submit(&mut event),
            Err(StateError::NotMounted)
        ));
        assert!(event.default_prevented());
    }

    #[test]
    fn test_invalid_submit_focuses_and_skips_callback() {
        let calls = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&calls);
        let mut state = FormState::new(FormOptions::new().on_submit(move |_, _| {
            *counter.lock().unwrap() += 1;
            Submission::ready(Value::Null)
        }));
        state.mount(signup_surface());

        let mut event = SubmitEvent::new();
        let step = state.begin_submit(&mut event).unwrap();
        assert!(matches!(
            step,
            SubmitStep::Done(SubmitOutcome::Invalid { focused: Some(ref name) }, None) if name == "email"
        ));
        assert!(state.is_invalid());
        assert!(!state.is_submitting());
        assert_eq!(*calls.lock().unwrap(), 0);
    }

    #[test]
    fn test_invalid_clears_once_fields_fixed() {
        let mut state = FormState::new(FormOptions::new());
        state.mount(signup_surface());
        let _ = state.begin_submit(&mut SubmitEvent::new()).unwrap();
        assert!(state.is_invalid());

        state.replace_data(data(json!({ "email": "a@b.com" })));
        assert!(!state.is_invalid());
        assert!(state.last_transition().valid);
    }

    #[test]
    fn test_sync_submit_finalizes_immediately() {
        let seen = Arc::new(Mutex::new(vec![]));
        let sink = Arc::clone(&seen);
        let mut state = FormState::new(
            FormOptions::new()
                .initial_state(data(json!({ "email": "a@b.com" })))
                .on_submit(|data, _| Submission::ready(json!({ "echo": data })))
                .on_submitted(move |value| sink.lock().unwrap().push(value)),
        );
        state.mount(signup_surface());

        let step = state.begin_submit(&mut SubmitEvent::new()).unwrap();
        let SubmitStep::Done(outcome, completion) = step else {
            panic!("expected settled submission");
        };
        assert_eq!(
            outcome,
            SubmitOutcome::Submitted(json!({ "echo": { "email": "a@b.com" } }))
        );
        assert!(!state.is_submitting());
        completion.unwrap().run();
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_sync_rejection_routes_to_error() {
        let seen = Arc::new(Mutex::new(0));
        let sink = Arc::clone(&seen);
        let mut state = FormState::new(
            FormOptions::new()
                .on_submit(|_, _| Submission::rejected("nope"))
                .on_submitted(move |_| *sink.lock().unwrap() += 1),
        );
        state.mount(Box::new(MemorySurface::new()));

        let step = state.begin_submit(&mut SubmitEvent::new()).unwrap();
        assert!(matches!(step, SubmitStep::Done(SubmitOutcome::Failed(_), None)));
        assert_eq!(state.error(), Some(&json!("nope")));
        assert!(!state.is_submitting());
        assert_eq!(*seen.lock().unwrap(), 0);
    }

    #[test]
    fn test_submit_without_callback_settles_with_null() {
        let mut state = FormState::new(FormOptions::new());
        state.mount(Box::new(MemorySurface::new()));
        let step = state.begin_submit(&mut SubmitEvent::new()).unwrap();
        assert!(matches!(
            step,
            SubmitStep::Done(SubmitOutcome::Submitted(Value::Null), None)
        ));
        assert!(!state.is_submitting());
    }

    #[test]
    fn test_field_invalid_uses_validator() {
        let mut state = FormState::new(
            FormOptions::new().initial_state(data(json!({ "password": "x", "password2": "y" }))),
        );
        state.mount(Box::new(
            MemorySurface::new()
                .with_control("password", Constraints::default())
                .with_control("password2", Constraints::default()),
        ));
        let same = validator(|value, form, _| form.get("password") == Some(value));
        assert!(state.field_invalid("password2", Some(&same)));
        assert!(!state.field_invalid("password", None));
    }

    #[test]
    fn test_attributes_class_list() {
        let mut state = FormState::new(
            FormOptions::new()
                .class_name("signup")
                .on_submit(|_, _| Submission::rejected("boom")),
        );
        assert_eq!(state.attributes().class_list(), "signup");
        state.mount(Box::new(MemorySurface::new()));
        assert!(state.begin_submit(&mut SubmitEvent::new()).is_ok());
        let attributes = state.attributes();
        assert!(attributes.error);
        assert_eq!(attributes.class_list(), "signup error");
    }

    #[test]
    fn test_reject_outside_submission_is_ignored() {
        let mut state = FormState::new(FormOptions::new());
        state.reject(json!("late"));
        assert!(state.error().is_none());
        assert!(!state.is_submitting());
    }

    #[test]
    fn test_status_serializes() {
        let state = FormState::new(FormOptions::new().initial_state(data(json!({ "a": "b" }))));
        let status = serde_json::to_value(state.status()).unwrap();
        assert_eq!(
            status,
            json!({ "data": { "a": "b" }, "invalid": false, "submitting": false, "error": null })
        );
    }
}
