use super::Frame;
use crate::ui::view::{FieldView, FormView};
use crate::ui::widgets::styling;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{
        block::{Position, Title},
        Block, Borders, Paragraph,
    },
};

/// Render every field, one bordered box each.
///
pub fn fields(frame: &mut Frame, size: Rect, view: &FormView) {
    if view.fields.is_empty() {
        return;
    }
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            view.fields
                .iter()
                .map(|_| Constraint::Length(super::FIELD_HEIGHT))
                .collect::<Vec<_>>(),
        )
        .split(size);

    for (index, field) in view.fields.iter().enumerate() {
        render_field(frame, chunks[index], field, index == view.focus);
    }
}

fn render_field(frame: &mut Frame, size: Rect, field: &FieldView, focused: bool) {
    let border_style = if field.invalid {
        styling::invalid_block_border_style()
    } else if focused {
        styling::active_block_border_style()
    } else {
        styling::normal_block_border_style()
    };

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(field.label.as_str());
    if focused {
        block = block.title_style(styling::active_block_title_style());
    }
    if field.invalid {
        if let Some(text) = &field.invalid_text {
            block = block.title(
                Title::from(Span::styled(
                    format!(" {} ", text),
                    styling::error_text_style(),
                ))
                .position(Position::Bottom),
            );
        }
    }

    let mut spans = vec![Span::styled(field.display_text(), styling::normal_text_style())];
    if focused {
        spans.push(Span::styled("_", styling::muted_text_style()));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), size);
}
