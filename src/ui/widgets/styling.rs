use ratatui::style::{Color, Modifier, Style};

/// Return the border style for the focused field.
///
pub fn active_block_border_style() -> Style {
    Style::default().fg(Color::Cyan)
}

/// Return the border style for normal blocks.
///
pub fn normal_block_border_style() -> Style {
    Style::default().fg(Color::Gray)
}

/// Return the border style for fields failing validation.
///
pub fn invalid_block_border_style() -> Style {
    Style::default().fg(Color::Red)
}

/// Return the title style for active blocks.
///
pub fn active_block_title_style() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

/// Return the style for normal text.
///
pub fn normal_text_style() -> Style {
    Style::default().fg(Color::White)
}

/// Return the style for secondary text.
///
pub fn muted_text_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Return the style for submission errors.
///
pub fn error_text_style() -> Style {
    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
}

/// Return the style for the banner.
///
pub fn banner_style() -> Style {
    Style::default()
        .fg(Color::Magenta)
        .add_modifier(Modifier::BOLD)
}
