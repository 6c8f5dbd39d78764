use super::Frame;
use crate::ui::view::FormView;
use crate::ui::widgets::{spinner, styling};
use ratatui::{
    layout::Rect,
    widgets::{Block, Borders, Paragraph, Wrap},
};

/// Render the submission state: spinner while submitting, otherwise the last
/// error if there is one.
///
pub fn submission(frame: &mut Frame, size: Rect, view: &FormView) {
    let block = Block::default().borders(Borders::ALL).title("Submission");
    let status = &view.status;
    let widget = if status.submitting {
        spinner::widget(view.spinner, "Submitting...").style(styling::normal_text_style())
    } else if let Some(error) = &status.error {
        Paragraph::new(error.clone()).style(styling::error_text_style())
    } else {
        Paragraph::new("Press Enter to submit").style(styling::muted_text_style())
    };
    frame.render_widget(widget.block(block), size);
}

/// Render the current form data.
///
pub fn data(frame: &mut Frame, size: Rect, view: &FormView) {
    let block = Block::default().borders(Borders::ALL).title("Data");
    let data = Paragraph::new(view.status.data.clone())
        .style(styling::normal_text_style())
        .wrap(Wrap { trim: false })
        .block(block);
    frame.render_widget(data, size);
}
