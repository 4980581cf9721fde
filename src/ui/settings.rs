use crate::app::state::{SettingsField, SettingsPage};
use crate::prefs::theme::ThemeMode;
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

pub fn render(frame: &mut Frame, area: Rect, settings: &SettingsPage, mode: ThemeMode, theme: &Theme) {
    let block = Block::default()
        .title(" Settings ")
        .title_style(theme.title())
        .borders(Borders::ALL)
        .border_style(theme.border());

    let lines: Vec<Line> = SettingsField::ALL
        .iter()
        .map(|field| {
            let focused = *field == settings.focus;
            let value = match field {
                SettingsField::DarkTheme => {
                    let mark = if mode == ThemeMode::Dark { "[x]" } else { "[ ]" };
                    mark.to_string()
                }
                SettingsField::TeamNumber => settings.team_number.clone(),
                SettingsField::EventKey => settings.event_key.clone(),
            };
            let value = if focused && *field != SettingsField::DarkTheme {
                format!("{}▏", value)
            } else {
                value
            };
            let style = if focused { theme.focused() } else { theme.value() };
            Line::from(vec![
                Span::styled(format!(" {:<14}", field.label()), theme.label()),
                Span::styled(value, style),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
