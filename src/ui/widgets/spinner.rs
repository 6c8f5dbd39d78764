use ratatui::widgets::Paragraph;

pub const FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Return the spinner frame for the given tick.
///
pub fn frame(index: usize) -> &'static str {
    FRAMES[index % FRAMES.len()]
}

/// Return a spinner paragraph with a trailing label.
///
pub fn widget(index: usize, label: &str) -> Paragraph<'static> {
    Paragraph::new(format!("{} {}", frame(index), label))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_wraps() {
        assert_eq!(frame(0), FRAMES[0]);
        assert_eq!(frame(FRAMES.len() + 2), FRAMES[2]);
    }
}
