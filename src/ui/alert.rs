use crate::app::state::Alert;
use crate::ui::layout::centered;
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

pub fn render(frame: &mut Frame, area: Rect, alert: &Alert, theme: &Theme) {
    let width = (alert.message.chars().count().min(66) as u16 + 4).max(30);
    let popup = centered(area, width, 7);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .title(" Alert ")
        .title_style(theme.error())
        .borders(Borders::ALL)
        .border_style(theme.error())
        .style(theme.base());

    let text = vec![
        Line::from(Span::styled(alert.message.as_str(), theme.label())),
        Line::from(""),
        Line::from(Span::styled("[ OK ]  Enter / Esc", theme.button())),
    ];
    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, popup);
}
