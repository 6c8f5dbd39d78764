mod fields;
mod footer;
mod log;
mod status;

use super::view::FormView;
use super::widgets::styling;
use super::Frame;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    widgets::{Block, Borders, Paragraph},
};

/// Height of one rendered field.
///
const FIELD_HEIGHT: u16 = 3;

/// Height of the log pane.
///
const LOG_HEIGHT: u16 = 8;

/// Render the whole form view.
///
pub fn render(frame: &mut Frame, view: &FormView) {
    let fields_height = FIELD_HEIGHT * view.fields.len() as u16;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),             // Title
            Constraint::Length(fields_height), // Fields
            Constraint::Length(3),             // Submission state
            Constraint::Min(4),                // Data
            Constraint::Length(LOG_HEIGHT),    // Log
            Constraint::Length(1),             // Footer
        ])
        .split(frame.size());

    title(frame, chunks[0], view);
    fields::fields(frame, chunks[1], view);
    status::submission(frame, chunks[2], view);
    status::data(frame, chunks[3], view);
    log::log(frame, chunks[4], view);
    footer::footer(frame, chunks[5]);
}

/// Render the title with the form's current class list.
///
fn title(frame: &mut Frame, size: Rect, view: &FormView) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" class=\"{}\" ", view.class_list))
        .title_style(styling::muted_text_style());
    let title = Paragraph::new(view.title.as_str())
        .style(styling::banner_style())
        .block(block)
        .alignment(Alignment::Center);
    frame.render_widget(title, size);
}
