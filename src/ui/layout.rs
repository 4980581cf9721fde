use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub struct AppLayout {
    pub page: Rect,
    pub dock: Rect,
    pub status_bar: Rect,
}

pub fn compute_layout(area: Rect) -> AppLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(5),    // Page content
            Constraint::Length(3), // Dock
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    AppLayout {
        page: chunks[0],
        dock: chunks[1],
        status_bar: chunks[2],
    }
}

/// A `width` x `height` rectangle centered in `area`, clipped to it.
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
