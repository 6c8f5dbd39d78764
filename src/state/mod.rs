//! Form state management module.
//!
//! This module contains the form container and everything around it:
//! - `FormState`, the data/validity/submission state machine
//! - `FormHandle`, the shared handle injected into bound fields and setters
//! - Submission types (events, callbacks, outcomes)
//! - State error handling

mod error;
mod form;
mod handle;
mod submit;

pub use error::StateError;
pub use form::{FormAttributes, FormData, FormOptions, FormState, FormStatus, Transition};
pub use handle::FormHandle;
pub use submit::{
    Completion, SubmitEvent, SubmitFn, SubmitFuture, SubmitOutcome, Submission, SubmittedFn,
};
