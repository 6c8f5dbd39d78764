//! Shared handle to a form.
//!
//! Bound fields and setters receive a [`FormHandle`] explicitly instead of
//! discovering their form through the component tree. A handle created with
//! [`FormHandle::nested`] pushes its data into the parent form under its
//! name after every update that leaves it valid.

use super::form::{FormAttributes, FormData, FormOptions, FormState, FormStatus, SubmitStep, Transition};
use super::submit::{SubmitEvent, SubmitOutcome};
use crate::error::{FormError, FormResult};
use crate::path::{ChangeInput, PathError, StatePath};
use crate::validity::ValidationAdapter;
use log::*;
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

type Propagation<'a> = Pin<Box<dyn Future<Output = FormResult<()>> + Send + 'a>>;

struct ParentLink {
    form: FormHandle,
    name: String,
    path: StatePath,
}

/// Cloneable handle to a [`FormState`].
///
#[derive(Clone)]
pub struct FormHandle {
    state: Arc<Mutex<FormState>>,
    parent: Option<Arc<ParentLink>>,
}

impl FormHandle {
    pub fn new(options: FormOptions) -> Self {
        FormHandle {
            state: Arc::new(Mutex::new(FormState::new(options))),
            parent: None,
        }
    }

    /// Create a form registered under `name` inside this one.
    ///
    pub fn nested(&self, name: &str, options: FormOptions) -> Result<FormHandle, PathError> {
        let path = StatePath::for_field(name)?;
        Ok(FormHandle {
            state: Arc::new(Mutex::new(FormState::new(options))),
            parent: Some(Arc::new(ParentLink {
                form: self.clone(),
                name: name.to_string(),
                path,
            })),
        })
    }

    /// Name under which this form is registered in its parent.
    ///
    pub fn name(&self) -> Option<&str> {
        self.parent.as_ref().map(|link| link.name.as_str())
    }

    /// Lock the underlying state for direct reads.
    ///
    pub async fn lock(&self) -> MutexGuard<'_, FormState> {
        self.state.lock().await
    }

    pub async fn status(&self) -> FormStatus {
        self.state.lock().await.status()
    }

    pub async fn attributes(&self) -> FormAttributes {
        self.state.lock().await.attributes()
    }

    pub async fn mount(&self, surface: impl ValidationAdapter + 'static) -> FormResult<()> {
        self.update(|state| Ok::<_, FormError>(state.mount(Box::new(surface))))
            .await
            .map(|_| ())
    }

    pub async fn replace_data(&self, data: FormData) -> FormResult<()> {
        self.update(|state| Ok::<_, FormError>(state.replace_data(data)))
            .await
            .map(|_| ())
    }

    pub async fn set_initial_state(&self, next: Option<FormData>) -> FormResult<()> {
        self.update(|state| Ok::<_, FormError>(state.set_initial_state(next)))
            .await
            .map(|_| ())
    }

    /// Write through a path.
    ///
    pub async fn apply(&self, path: &StatePath, input: ChangeInput) -> FormResult<()> {
        self.update(|state| state.apply(path, input)).await.map(|_| ())
    }

    /// Validate and submit the form.
    ///
    /// The lock is released while an asynchronous submission is pending, so
    /// edits keep flowing; a second submit in that window is ignored.
    ///
    pub async fn submit(&self, event: &mut SubmitEvent) -> FormResult<SubmitOutcome> {
        let step = self.update(|state| state.begin_submit(event)).await?;

        let (outcome, completion) = match step {
            SubmitStep::Done(outcome, completion) => (outcome, completion),
            SubmitStep::Pending(future) => {
                debug!("Awaiting asynchronous submission...");
                let result = future.await;
                self.update(|state| {
                    Ok::<_, FormError>(match result {
                        Ok(value) => {
                            let completion = state.finalize(value.clone());
                            (SubmitOutcome::Submitted(value), completion)
                        }
                        Err(reason) => {
                            state.reject(reason.clone());
                            (SubmitOutcome::Failed(reason), None)
                        }
                    })
                })
                .await?
            }
        };

        if let Some(completion) = completion {
            completion.run();
        }
        Ok(outcome)
    }

    /// Run a mutation under the lock, then propagate to the parent form.
    ///
    async fn update<R, E>(&self, f: impl FnOnce(&mut FormState) -> Result<R, E>) -> FormResult<R>
    where
        FormError: From<E>,
    {
        let (result, transition, data) = {
            let mut state = self.state.lock().await;
            let result = f(&mut *state)?;
            (result, state.last_transition(), Arc::clone(state.data()))
        };
        self.propagate(transition, data).await?;
        Ok(result)
    }

    fn propagate(&self, transition: Transition, data: Arc<FormData>) -> Propagation<'_> {
        Box::pin(async move {
            let Some(link) = self.parent.as_ref() else {
                return Ok(());
            };
            if !transition.valid {
                return Ok(());
            }
            trace!("Propagating nested form '{}' into parent", link.name);
            let value = Value::Object(FormData::clone(&data));
            link.form.apply(&link.path, ChangeInput::Value(value)).await
        })
    }
}
