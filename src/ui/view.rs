//! Presentation components and the view model they produce.
//!
//! Components only see [`BoundProps`]; everything the renderer needs about a
//! field comes from the form through them.

use form_state::validity::InputKind;
use form_state::BoundProps;
use serde_json::Value;

/// Render-ready state of one field.
///
#[derive(Debug, Clone, PartialEq)]
pub struct FieldView {
    pub name: String,
    pub label: String,
    pub kind: InputKind,
    pub text: String,
    pub checked: bool,
    pub invalid: bool,
    pub invalid_text: Option<String>,
}

impl FieldView {
    /// Text as displayed, masked for passwords.
    ///
    pub fn display_text(&self) -> String {
        match self.kind {
            InputKind::Password => "*".repeat(self.text.chars().count()),
            InputKind::Checkbox if self.checked => "[x]".to_string(),
            InputKind::Checkbox => "[ ]".to_string(),
            _ => self.text.clone(),
        }
    }
}

/// Render-ready form status.
///
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusView {
    pub submitting: bool,
    pub error: Option<String>,
    pub data: String,
}

/// Everything drawn in one frame.
///
#[derive(Debug, Clone, Default)]
pub struct FormView {
    pub title: String,
    pub class_list: String,
    pub fields: Vec<FieldView>,
    pub focus: usize,
    pub status: StatusView,
    pub logs: Vec<String>,
    pub spinner: usize,
}

/// Field component.
///
pub fn field_view(props: &BoundProps) -> FieldView {
    let kind = props
        .get("kind")
        .cloned()
        .and_then(|kind| serde_json::from_value(kind).ok())
        .unwrap_or_default();
    FieldView {
        name: props.name().unwrap_or_default().to_string(),
        label: props
            .str("label")
            .or_else(|| props.name())
            .unwrap_or_default()
            .to_string(),
        kind,
        text: props.value_text(),
        checked: props.value().as_bool().unwrap_or(false),
        invalid: props.invalid(),
        invalid_text: props.str("invalid_text").map(str::to_string),
    }
}

/// Status component.
///
pub fn status_view(props: &BoundProps) -> StatusView {
    let error = props.error().map(|error| match error {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    });
    let data = props
        .status()
        .and_then(|status| status.get("data"))
        .and_then(|data| serde_json::to_string_pretty(data).ok())
        .unwrap_or_default();
    StatusView {
        submitting: props.submitting(),
        error,
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use form_state::{bind, FieldProps, FormHandle, FormOptions, Submission, SubmitEvent};
    use serde_json::json;

    #[tokio::test]
    async fn test_field_view_from_props() {
        let form = FormHandle::new(FormOptions::new());
        let field = bind(field_view as fn(&BoundProps) -> FieldView)
            .instantiate(
                &form,
                FieldProps::named("password")
                    .with("label", "Password")
                    .with("kind", "password"),
            )
            .unwrap();
        field.on_change().call("secret").await.unwrap();

        let view = field.render().await;
        assert_eq!(view.label, "Password");
        assert_eq!(view.kind, InputKind::Password);
        assert_eq!(view.text, "secret");
        assert_eq!(view.display_text(), "******");
        assert!(!view.invalid);
    }

    #[tokio::test]
    async fn test_checkbox_display() {
        let form = FormHandle::new(FormOptions::new());
        let field = bind(field_view as fn(&BoundProps) -> FieldView)
            .instantiate(&form, FieldProps::named("terms").with("kind", "checkbox"))
            .unwrap();
        assert_eq!(field.render().await.display_text(), "[ ]");
        field.on_change().call(true).await.unwrap();
        assert_eq!(field.render().await.display_text(), "[x]");
        assert_eq!(field.render().await.label, "terms");
    }

    #[tokio::test]
    async fn test_status_view_shows_error() {
        let form = FormHandle::new(
            FormOptions::new().on_submit(|_, _| Submission::rejected("Oops")),
        );
        form.mount(form_state::MemorySurface::new()).await.unwrap();
        let status = bind(status_view as fn(&BoundProps) -> StatusView)
            .instantiate(&form, FieldProps::new())
            .unwrap();
        assert_eq!(status.render().await.error, None);

        form.submit(&mut SubmitEvent::new()).await.unwrap();
        let view = status.render().await;
        assert_eq!(view.error.as_deref(), Some("Oops"));
        assert!(!view.submitting);
        assert_eq!(view.data, serde_json::to_string_pretty(&json!({})).unwrap());
    }
}
