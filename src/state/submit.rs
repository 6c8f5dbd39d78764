//! Submission types: the triggering event, callback signatures and results.

use crate::validity::ValidationAdapter;
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Future returned by an asynchronous submit callback.
///
pub type SubmitFuture = Pin<Box<dyn Future<Output = Result<Value, Value>> + Send>>;

/// `on_submit(snapshot, surface)`.
///
pub type SubmitFn = Arc<dyn Fn(Value, &dyn ValidationAdapter) -> Submission + Send + Sync>;

/// `on_submitted(result)`.
///
pub type SubmittedFn = Arc<dyn Fn(Value) + Send + Sync>;

/// The event triggering a submission.
///
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmitEvent {
    default_prevented: bool,
}

impl SubmitEvent {
    pub fn new() -> Self {
        SubmitEvent::default()
    }

    /// Suppress the host's default submit action.
    ///
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// What a submit callback returns.
///
pub enum Submission {
    /// Result known immediately
    Settled(Result<Value, Value>),
    /// Result delivered once the future resolves
    Pending(SubmitFuture),
}

impl Submission {
    pub fn ready(value: impl Into<Value>) -> Self {
        Submission::Settled(Ok(value.into()))
    }

    pub fn rejected(reason: impl Into<Value>) -> Self {
        Submission::Settled(Err(reason.into()))
    }

    pub fn pending<F>(future: F) -> Self
    where
        F: Future<Output = Result<Value, Value>> + Send + 'static,
    {
        Submission::Pending(Box::pin(future))
    }
}

impl From<Value> for Submission {
    fn from(value: Value) -> Self {
        Submission::ready(value)
    }
}

impl fmt::Debug for Submission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Submission::Settled(result) => f.debug_tuple("Settled").field(result).finish(),
            Submission::Pending(_) => f.write_str("Pending(..)"),
        }
    }
}

/// How a submit call ended.
///
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Native validation failed; the named control received focus
    Invalid { focused: Option<String> },
    /// A previous submission is still in flight
    Ignored,
    /// Submission completed with this result
    Submitted(Value),
    /// Submission was rejected with this reason
    Failed(Value),
}

/// Deferred `on_submitted` call, run once the form is no longer borrowed.
///
pub struct Completion {
    callback: SubmittedFn,
    value: Value,
}

impl Completion {
    pub(crate) fn new(callback: SubmittedFn, value: Value) -> Self {
        Completion { callback, value }
    }

    pub fn run(self) {
        (self.callback)(self.value)
    }
}
