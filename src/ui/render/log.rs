use super::Frame;
use crate::ui::view::FormView;
use crate::ui::widgets::styling;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};

/// Render the most recent log entries that fit.
///
pub fn log(frame: &mut Frame, size: Rect, view: &FormView) {
    let block = Block::default().title("Log").borders(Borders::ALL);
    let visible = size.height.saturating_sub(2) as usize;
    let skip = view.logs.len().saturating_sub(visible);
    let items: Vec<ListItem> = view
        .logs
        .iter()
        .skip(skip)
        .map(|entry| {
            ListItem::new(Line::from(vec![Span::styled(
                entry.clone(),
                styling::normal_text_style(),
            )]))
        })
        .collect();

    let list = List::new(items)
        .style(styling::normal_text_style())
        .block(block);
    frame.render_widget(list, size);
}
