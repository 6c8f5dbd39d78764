//! View-agnostic form state.
//!
//! A form owns a JSON object of field values, tracks whether it is invalid,
//! whether a submission is in flight and the last submission error. Around it:
//!
//! - [`path`]: dotted state paths and the setter that writes through them
//! - [`binder`]: wraps presentation components so each field derives its
//!   value, validity and change handler from the form
//! - [`validity`]: reconciles native-style constraints of a mounted surface
//!   with custom cross-field predicates
//! - [`config`]: YAML form definitions
//! - [`logger`]: log capture for display
//!
//! # Example
//!
//! ```ignore
//! let form = FormHandle::new(FormOptions::new().on_submit(|data, _| Submission::ready(data)));
//! form.mount(FormDefinition::registration().surface()?).await?;
//! PathBinder::new(&form, "data.email")?.set("a@b.com").await?;
//! let outcome = form.submit(&mut SubmitEvent::new()).await?;
//! ```

pub mod binder;
pub mod config;
pub mod error;
pub mod logger;
pub mod path;
pub mod state;
pub mod utils;
pub mod validity;

pub use binder::{
    bind, bind_with, BoundField, BoundProps, ChangeHandler, Component, Connector, FieldProps,
};
pub use config::{Config, FieldSpec, FormDefinition};
pub use error::{FormError, FormResult};
pub use path::{ChangeEvent, ChangeInput, PathBinder, StatePath};
pub use state::{
    FormData, FormHandle, FormOptions, FormState, FormStatus, SubmitEvent, SubmitOutcome,
    Submission,
};
pub use validity::{is_invalid, MemorySurface, ValidationAdapter, Validator};
