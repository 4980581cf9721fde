mod alert;
mod dock;
mod form_page;
mod layout;
mod settings;
mod status_bar;
mod theme;
mod view_data;

use crate::app::state::{AppState, Page};
use ratatui::prelude::*;
use ratatui::widgets::Block;
use std::time::Instant;
use theme::{Theme, Visibility};

pub fn render(frame: &mut Frame, state: &AppState) {
    let area = frame.area();
    let mode = state.document_root.mode();
    let theme = Theme::new(mode);
    let app_layout = layout::compute_layout(area);

    frame.render_widget(Block::default().style(theme.base()), area);

    match Visibility::from_opacity(state.nav.opacity(Instant::now())) {
        Visibility::Hidden => {}
        visibility => {
            let page_area = app_layout.page;
            match &state.page {
                Page::AddData(form) => form_page::render(frame, page_area, form, state.tick_count, &theme),
                Page::ViewData(view) => view_data::render(frame, page_area, view, &theme),
                Page::Settings(settings) => settings::render(frame, page_area, settings, mode, &theme),
            }
            if visibility == Visibility::Dim {
                frame
                    .buffer_mut()
                    .set_style(page_area, Style::default().add_modifier(Modifier::DIM));
            }
        }
    }

    dock::render(frame, app_layout.dock, state, &theme);
    status_bar::render(frame, app_layout.status_bar, state, &theme);

    if let Some(alert) = &state.alert {
        alert::render(frame, area, alert, &theme);
    }
}
