use crate::app::state::*;
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

pub fn render(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let mut parts: Vec<Span> = Vec::new();

    parts.push(Span::styled(
        format!(" [{}] ", state.nav.location()),
        theme.status_bar().add_modifier(Modifier::BOLD),
    ));
    parts.push(Span::styled(format!(" {} ", state.status_line()), theme.status_bar()));

    let hint = match state.page {
        Page::AddData(_) => "^S submit  ^R clear  ^T theme  ^Q quit",
        Page::ViewData(_) => "f columns  o options  ^T theme  ^Q quit",
        Page::Settings(_) => "Space toggle  ^T theme  ^Q quit",
    };

    // Pad to fill remaining space
    let used: usize = parts.iter().map(|s| s.content.width()).sum();
    let remaining = (area.width as usize).saturating_sub(used + hint.width() + 2);
    parts.push(Span::styled(" ".repeat(remaining), theme.status_bar()));
    parts.push(Span::styled(format!(" {} ", hint), theme.status_bar()));

    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}
