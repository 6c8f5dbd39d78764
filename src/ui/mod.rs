//! User interface module.
//!
//! This module handles all UI rendering using the `ratatui` library, including:
//! - Presentation components bound to the form (`view`)
//! - Widget components (spinner, styling)
//! - Frame rendering and layout

type Frame<'a> = ratatui::Frame<'a>;

mod render;
pub mod view;
mod widgets;

pub const SPINNER_FRAME_COUNT: usize = widgets::spinner::FRAMES.len();

pub use render::render;
pub use view::{field_view, status_view, FieldView, FormView, StatusView};
