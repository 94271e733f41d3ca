//! UI layout helpers

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Layout regions used by every dialog screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLayout {
    /// Background title
    pub header: Rect,
    /// Area the dialog is centered in
    pub body: Rect,
    /// Key hints
    pub footer: Rect,
}

/// Build the standard screen layout
pub fn build_layout(area: Rect) -> ScreenLayout {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    ScreenLayout {
        header: vertical[0],
        body: vertical[1],
        footer: vertical[2],
    }
}

/// Return a centered rectangle within `area` at the given percentage size.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let vertical = popup_layout[1];
    let horizontal_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical);

    horizontal_layout[1]
}
