use crate::app::state::AppState;
use crate::nav::Route;
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Tabs};

pub fn render(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let titles: Vec<Line> = Route::ALL
        .iter()
        .enumerate()
        .map(|(i, route)| Line::from(format!(" F{} {} ", i + 1, route.label())))
        .collect();

    // Highlight whichever route the location matches, legacy paths included.
    // An unknown location highlights nothing.
    let selected = state
        .nav
        .current_route()
        .and_then(|current| Route::ALL.iter().position(|r| *r == current));

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(theme.border()),
        )
        .style(theme.dock_inactive())
        .highlight_style(theme.dock_active())
        .select(selected.unwrap_or(usize::MAX))
        .divider("|");
    frame.render_widget(tabs, area);
}
