//! Field binding.
//!
//! [`bind`] wraps a presentation component so each instance renders from
//! props derived from its form: the field's `value`, whether it is
//! `invalid`, the whole form `status`, and an `on_change` handler writing
//! back to `data.<name>`. Explicit props always win over derived ones.
//!
//! # Example
//!
//! ```ignore
//! let input = bind(|props: &BoundProps| props.value_text());
//! let email = input.instantiate(&form, FieldProps::named("email").with("type", "email"))?;
//! email.on_change().call(ChangeEvent::input("a@b.com")).await?;
//! let text = email.render().await;
//! ```

mod props;

pub use props::{BoundProps, FieldProps, Props};

use crate::error::FormResult;
use crate::path::{ChangeInput, PathBinder, PathError, StatePath};
use crate::state::{FormHandle, StateError};
use log::*;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Maps whatever a component passes to `on_change` into setter input.
///
pub type EventMapper = Arc<dyn Fn(ChangeInput, &Props) -> ChangeInput + Send + Sync>;

/// Caller-supplied change callback.
///
pub type ChangeCallback = Arc<dyn Fn(ChangeInput) + Send + Sync>;

/// A presentation component.
///
pub trait Component {
    type Output;

    fn render(&self, props: &BoundProps) -> Self::Output;
}

impl<F, O> Component for F
where
    F: Fn(&BoundProps) -> O,
{
    type Output = O;

    fn render(&self, props: &BoundProps) -> O {
        self(props)
    }
}

/// Wrap a component without an event mapper.
///
pub fn bind<C: Component>(component: C) -> Connector<C> {
    Connector {
        component: Arc::new(component),
        mapper: None,
    }
}

/// Wrap a component whose change events go through `mapper`.
///
pub fn bind_with<C, M>(component: C, mapper: M) -> Connector<C>
where
    C: Component,
    M: Fn(ChangeInput, &Props) -> ChangeInput + Send + Sync + 'static,
{
    Connector {
        component: Arc::new(component),
        mapper: Some(Arc::new(mapper)),
    }
}

/// A bound component type; instantiate once per rendered field.
///
pub struct Connector<C> {
    component: Arc<C>,
    mapper: Option<EventMapper>,
}

impl<C> Clone for Connector<C> {
    fn clone(&self) -> Self {
        Connector {
            component: Arc::clone(&self.component),
            mapper: self.mapper.clone(),
        }
    }
}

impl<C: Component> Connector<C> {
    /// Create an instance reading from and writing to `form`.
    ///
    pub fn instantiate(&self, form: &FormHandle, props: FieldProps) -> Result<BoundField<C>, PathError> {
        let setter = match props.name.as_deref() {
            Some(name) => Some(PathBinder::new(form, StatePath::for_field(name)?.as_str())?),
            None => None,
        };
        let on_change = match props.on_change.clone() {
            Some(explicit) => explicit,
            None => ChangeHandler {
                setter,
                mapper: self.mapper.clone(),
                callback: None,
                own_props: Arc::new(props.own_props()),
            },
        };
        Ok(BoundField {
            component: Arc::clone(&self.component),
            form: form.clone(),
            props,
            on_change,
        })
    }
}

/// Change handler handed to bound components.
///
#[derive(Clone)]
pub struct ChangeHandler {
    setter: Option<PathBinder>,
    mapper: Option<EventMapper>,
    callback: Option<ChangeCallback>,
    own_props: Arc<Props>,
}

impl ChangeHandler {
    /// Handler writing through an arbitrary setter.
    ///
    pub fn from_setter(setter: PathBinder) -> Self {
        ChangeHandler {
            setter: Some(setter),
            mapper: None,
            callback: None,
            own_props: Arc::new(Props::new()),
        }
    }

    /// Handler forwarding every change to `f` instead of the form.
    ///
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(ChangeInput) + Send + Sync + 'static,
    {
        ChangeHandler {
            setter: None,
            mapper: None,
            callback: Some(Arc::new(f)),
            own_props: Arc::new(Props::new()),
        }
    }

    /// Whether changes have somewhere to go.
    ///
    pub fn is_bound(&self) -> bool {
        self.setter.is_some() || self.callback.is_some()
    }

    /// Store a value, change event or transform into the field.
    ///
    pub async fn call(&self, input: impl Into<ChangeInput>) -> FormResult<()> {
        if let Some(callback) = &self.callback {
            callback(input.into());
            return Ok(());
        }
        let setter = self.setter.as_ref().ok_or(StateError::UnnamedField)?;
        let input = match &self.mapper {
            Some(mapper) => mapper(input.into(), &self.own_props),
            None => input.into(),
        };
        setter.set(input).await
    }
}

impl fmt::Debug for ChangeHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeHandler")
            .field("path", &self.setter.as_ref().map(|s| s.path().as_str()))
            .field("mapped", &self.mapper.is_some())
            .field("callback", &self.callback.is_some())
            .finish()
    }
}

/// A component instance bound to a form.
///
pub struct BoundField<C> {
    component: Arc<C>,
    form: FormHandle,
    props: FieldProps,
    on_change: ChangeHandler,
}

impl<C: Component> BoundField<C> {
    pub fn name(&self) -> Option<&str> {
        self.props.name.as_deref()
    }

    pub fn field_props(&self) -> &FieldProps {
        &self.props
    }

    pub fn on_change(&self) -> &ChangeHandler {
        &self.on_change
    }

    /// Derive this render's props.
    ///
    pub async fn props(&self) -> BoundProps {
        let mut props = Props::new();
        let status = {
            let mut state = self.form.lock().await;
            if let Some(name) = self.props.name.as_deref() {
                let invalid = state.field_invalid(name, self.props.validate.as_ref());
                let value = state
                    .data()
                    .get(name)
                    .filter(|value| !value.is_null())
                    .cloned()
                    .unwrap_or_else(|| Value::String(String::new()));
                props.insert("name".to_string(), Value::String(name.to_string()));
                props.insert("value".to_string(), value);
                props.insert("invalid".to_string(), Value::Bool(invalid));
            }
            state.status()
        };

        let status = match serde_json::to_value(&status) {
            Ok(status) => status,
            Err(e) => {
                warn!("Failed to serialize form status: {}", e);
                Value::Null
            }
        };
        props.insert("status".to_string(), status);

        for (key, value) in &self.props.extra {
            props.insert(key.clone(), value.clone());
        }

        BoundProps {
            props,
            on_change: self.on_change.clone(),
        }
    }

    /// Render the wrapped component with freshly derived props.
    ///
    pub async fn render(&self) -> C::Output {
        let props = self.props().await;
        self.component.render(&props)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::ChangeEvent;
    use crate::state::{FormData, FormOptions};
    use crate::validity::{Constraints, InputKind, MemorySurface};
    use serde_json::json;

    fn data(value: Value) -> FormData {
        value.as_object().cloned().unwrap()
    }

    fn echo() -> Connector<fn(&BoundProps) -> BoundProps> {
        bind(Clone::clone as fn(&BoundProps) -> BoundProps)
    }

    #[tokio::test]
    async fn test_named_field_derives_value_invalid_status() {
        let form = FormHandle::new(
            FormOptions::new().initial_state(data(json!({ "email": "not-an-email" }))),
        );
        form.mount(MemorySurface::new().with_control("email", Constraints::new(InputKind::Email)))
            .await
            .unwrap();

        let field = echo().instantiate(&form, FieldProps::named("email")).unwrap();
        let props = field.render().await;
        assert_eq!(props.name(), Some("email"));
        assert_eq!(props.value(), &json!("not-an-email"));
        assert!(props.invalid());
        assert_eq!(props.status().unwrap()["data"]["email"], json!("not-an-email"));
        assert!(props.on_change.is_bound());
    }

    #[tokio::test]
    async fn test_missing_value_defaults_to_empty_string() {
        let form = FormHandle::new(FormOptions::new());
        let field = echo().instantiate(&form, FieldProps::named("nick")).unwrap();
        let props = field.props().await;
        assert_eq!(props.value(), &json!(""));
        assert!(!props.invalid());
    }

    #[tokio::test]
    async fn test_explicit_props_win() {
        let form = FormHandle::new(FormOptions::new().initial_state(data(json!({ "email": "x" }))));
        let field = echo()
            .instantiate(
                &form,
                FieldProps::named("email")
                    .with("value", "override")
                    .with("invalid", true)
                    .with("label", "Email"),
            )
            .unwrap();
        let props = field.props().await;
        assert_eq!(props.value(), &json!("override"));
        assert!(props.invalid());
        assert_eq!(props.str("label"), Some("Email"));
    }

    #[tokio::test]
    async fn test_explicit_on_change_wins() {
        let form = FormHandle::new(FormOptions::new());
        let seen = Arc::new(std::sync::Mutex::new(vec![]));
        let sink = Arc::clone(&seen);
        let field = echo()
            .instantiate(
                &form,
                FieldProps::named("email").on_change(ChangeHandler::from_fn(move |input| {
                    sink.lock().unwrap().push(input.resolve(&Value::Null));
                })),
            )
            .unwrap();

        let props = field.props().await;
        assert!(props.on_change.is_bound());
        props.on_change.call("a@b.com").await.unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![json!("a@b.com")]);
        assert!(form.status().await.data.get("email").is_none());

        let redirected = echo()
            .instantiate(
                &form,
                FieldProps::named("email").on_change(ChangeHandler::from_setter(
                    PathBinder::new(&form, "data.contact.email").unwrap(),
                )),
            )
            .unwrap();
        redirected.on_change().call("c@d.com").await.unwrap();
        let data = form.status().await.data;
        assert_eq!(data["contact"], json!({ "email": "c@d.com" }));
        assert!(data.get("email").is_none());
    }

    #[tokio::test]
    async fn test_unnamed_field_gets_status_only() {
        let form = FormHandle::new(FormOptions::new());
        let status = bind(|props: &BoundProps| props.status().cloned())
            .instantiate(&form, FieldProps::new())
            .unwrap();
        assert!(status.render().await.is_some());

        let props = status.props().await;
        assert!(props.get("value").is_none());
        assert!(!props.on_change.is_bound());
        let error = props.on_change.call("x").await.unwrap_err();
        assert!(error.to_string().contains("no name"));
    }

    #[tokio::test]
    async fn test_on_change_writes_field() {
        let form = FormHandle::new(FormOptions::new());
        let field = echo().instantiate(&form, FieldProps::named("terms")).unwrap();
        field
            .on_change()
            .call(ChangeEvent::checkbox(true))
            .await
            .unwrap();
        assert_eq!(field.props().await.value(), &json!(true));

        field.on_change().call(json!("plain")).await.unwrap();
        assert_eq!(form.status().await.data["terms"], json!("plain"));
    }

    #[tokio::test]
    async fn test_event_mapper_receives_own_props() {
        let form = FormHandle::new(FormOptions::new());
        let connector = bind_with(
            |props: &BoundProps| props.value_text(),
            |input: ChangeInput, own: &Props| {
                let suffix = own.get("suffix").and_then(Value::as_str).unwrap_or("").to_string();
                let value = input.resolve(&Value::Null);
                ChangeInput::Value(json!(format!("{}{}", value.as_str().unwrap_or(""), suffix)))
            },
        );
        let field = connector
            .instantiate(&form, FieldProps::named("handle").with("suffix", "!"))
            .unwrap();
        field.on_change().call("hey").await.unwrap();
        assert_eq!(field.render().await, "hey!");
    }

    #[tokio::test]
    async fn test_validate_prop_checks_other_fields() {
        let form = FormHandle::new(
            FormOptions::new().initial_state(data(json!({ "password": "x", "password2": "y" }))),
        );
        form.mount(
            MemorySurface::new()
                .with_control("password", Constraints::new(InputKind::Password))
                .with_control("password2", Constraints::new(InputKind::Password)),
        )
        .await
        .unwrap();

        let confirm = echo()
            .instantiate(
                &form,
                FieldProps::named("password2")
                    .validate(|value, data, _| data.get("password") == Some(value)),
            )
            .unwrap();
        assert!(confirm.props().await.invalid());

        confirm.on_change().call("x").await.unwrap();
        assert!(!confirm.props().await.invalid());
    }

    #[tokio::test]
    async fn test_submission_error_visible_to_fields() {
        let form = FormHandle::new(
            FormOptions::new().on_submit(|_, _| crate::state::Submission::rejected("boom")),
        );
        form.mount(MemorySurface::new()).await.unwrap();
        let errors = bind(|props: &BoundProps| props.error().cloned())
            .instantiate(&form, FieldProps::new())
            .unwrap();
        assert_eq!(errors.render().await, None);

        form.submit(&mut crate::state::SubmitEvent::new()).await.unwrap();
        assert_eq!(errors.render().await, Some(json!("boom")));
    }

    #[test]
    fn test_instantiate_rejects_malformed_name() {
        let form = FormHandle::new(FormOptions::new());
        assert!(echo().instantiate(&form, FieldProps::named("a..b")).is_err());
    }
}
