//! Frame rendering for modal dialogs

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Paragraph, Widget};
use ratatui::Frame;

use crate::ui::layout::{build_layout, centered_rect};
use crate::ui::widgets::{Modal, TextBox};

/// Draw the background title, the dialog and its key hints
pub fn render_modal<M: Modal + ?Sized>(frame: &mut Frame, background_title: &str, modal: &M) {
    let layout = build_layout(frame.area());

    render_header(frame, background_title, layout.header);

    let (width, height) = modal.size();
    let area = centered_rect(width, height, layout.body);
    modal.render(area, frame.buffer_mut());

    let footer = Paragraph::new(modal.hints()).style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(footer, layout.footer);
}

fn render_header(frame: &mut Frame, background_title: &str, area: Rect) {
    let header = Paragraph::new(background_title)
        .style(Style::default().add_modifier(Modifier::BOLD));
    frame.render_widget(header, area);
}

/// Draw a notice that does not wait for input
pub fn render_notice(frame: &mut Frame, background_title: &str, text: &str) {
    let layout = build_layout(frame.area());
    render_header(frame, background_title, layout.header);

    let notice = TextBox::message(text);
    Widget::render(&notice, centered_rect(50, 20, layout.body), frame.buffer_mut());
}
