use super::Frame;
use crate::ui::widgets::styling;
use ratatui::{layout::Rect, widgets::Paragraph};

const HELP: &str =
    " Tab/Shift-Tab: navigate fields, type to edit, Space: toggle checkbox, Enter: submit, Esc: quit";

/// Render the key help line.
///
pub fn footer(frame: &mut Frame, size: Rect) {
    frame.render_widget(Paragraph::new(HELP).style(styling::muted_text_style()), size);
}
