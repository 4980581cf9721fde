use crate::app::state::ViewDataPage;
use crate::table_filter::{ColumnSet, FilterType};
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap};

pub fn render(frame: &mut Frame, area: Rect, view: &ViewDataPage, theme: &Theme) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(3)])
        .split(area);

    let team = view.team_number.as_deref().unwrap_or("-");
    let event = view.current_event.as_deref().unwrap_or("-");
    let set = match view.column_set {
        ColumnSet::Full => "full",
        ColumnSet::Reduced => "reduced",
    };
    let header = Line::from(vec![
        Span::styled(" Team ", theme.muted()),
        Span::styled(team, theme.value()),
        Span::styled("  Event ", theme.muted()),
        Span::styled(event, theme.value()),
        Span::styled("  Columns ", theme.muted()),
        Span::styled(set, theme.value()),
    ]);
    frame.render_widget(Paragraph::new(header), chunks[0]);

    let body = chunks[1];
    if view.show_options {
        render_options(frame, body, view, theme);
    } else {
        render_columns(frame, body, view, theme);
    }
}

fn render_columns(frame: &mut Frame, area: Rect, view: &ViewDataPage, theme: &Theme) {
    let rows: Vec<Row> = view
        .column_set
        .columns()
        .iter()
        .enumerate()
        .map(|(i, column)| {
            let filter_style = match column.filter {
                FilterType::Normal => theme.muted(),
                FilterType::None => theme.error(),
                _ => theme.value(),
            };
            Row::new(vec![
                Cell::from(format!("{}", i)).style(theme.muted()),
                Cell::from(column.name).style(theme.label()),
                Cell::from(column.filter.to_string()).style(filter_style),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [Constraint::Length(4), Constraint::Min(18), Constraint::Length(10)],
    )
    .header(Row::new(vec!["#", "Column", "Filter"]).style(theme.title()))
    .block(
        Block::default()
            .title(" View Data ")
            .title_style(theme.title())
            .borders(Borders::ALL)
            .border_style(theme.border()),
    );
    frame.render_widget(table, area);
}

fn render_options(frame: &mut Frame, area: Rect, view: &ViewDataPage, theme: &Theme) {
    let json = serde_json::to_string_pretty(&view.filter_options().to_json())
        .unwrap_or_else(|e| format!("<{}>", e));
    let paragraph = Paragraph::new(json)
        .style(theme.label())
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title(" Filter Options ")
                .title_style(theme.title())
                .borders(Borders::ALL)
                .border_style(theme.border()),
        );
    frame.render_widget(paragraph, area);
}
