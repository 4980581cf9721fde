use crate::app::state::{FormFocus, FormPage};
use crate::form::document::Element;
use crate::form::ElementKind;
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

const SPINNER: [&str; 8] = ["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];
const LABEL_WIDTH: usize = 18;

pub fn render(frame: &mut Frame, area: Rect, form: &FormPage, tick: u64, theme: &Theme) {
    let block = Block::default()
        .title(" Add Data ")
        .title_style(theme.title())
        .borders(Borders::ALL)
        .border_style(theme.border());
    let inner_height = block.inner(area).height as usize;

    let focused = form.focused();
    let mut lines: Vec<Line> = Vec::with_capacity(form.focus_order().len());
    let mut focused_line = 0;

    for item in form.focus_order() {
        let is_focused = *item == focused;
        if is_focused {
            focused_line = lines.len();
        }
        let line = match item {
            FormFocus::Field(index) => match form.document.element(*index) {
                Some(el) => field_line(el, form.counters.counter_at(*index).is_some(), is_focused, theme),
                None => continue,
            },
            FormFocus::Submit => {
                let label = if form.submit.is_disabled() {
                    let spinner = SPINNER[(tick % SPINNER.len() as u64) as usize];
                    format!("[ {} {} ]", form.submit.label(), spinner)
                } else {
                    format!("[ {} ]", form.submit.label())
                };
                let style = match (form.submit.is_disabled(), is_focused) {
                    (true, _) => theme.button_disabled(),
                    (false, true) => theme.focused(),
                    (false, false) => theme.button(),
                };
                Line::from(vec![Span::raw(" ".repeat(LABEL_WIDTH + 2)), Span::styled(label, style)])
            }
            FormFocus::Reset => {
                let style = if is_focused { theme.focused() } else { theme.muted() };
                Line::from(vec![Span::raw(" ".repeat(LABEL_WIDTH + 2)), Span::styled("[ Reset ]", style)])
            }
        };
        lines.push(line);
    }

    let scroll = focused_line.saturating_sub(inner_height.saturating_sub(1));
    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((scroll as u16, 0));
    frame.render_widget(paragraph, area);
}

fn field_line<'a>(el: &'a Element, is_counter: bool, focused: bool, theme: &Theme) -> Line<'a> {
    let marker = if el.required { "*" } else { " " };
    let mut spans = vec![
        Span::styled(format!(" {:<width$}", el.label, width = LABEL_WIDTH), theme.label()),
        Span::styled(marker, theme.error()),
        Span::raw(" "),
    ];
    let value_style = if focused { theme.focused() } else { theme.value() };

    match &el.kind {
        ElementKind::Checkbox { checked } => {
            let mark = if *checked { "[x]" } else { "[ ]" };
            spans.push(Span::styled(mark, value_style));
        }
        ElementKind::Radio { options, selected } => {
            for (i, option) in options.iter().enumerate() {
                let mark = if *selected == Some(i) { "(•)" } else { "( )" };
                let style = if *selected == Some(i) { value_style } else { theme.muted() };
                spans.push(Span::styled(format!("{} {}  ", mark, option), style));
            }
        }
        _ if is_counter => {
            spans.push(Span::styled("◀ ", theme.muted()));
            spans.push(Span::styled(format!("{:>3}", el.value), value_style));
            spans.push(Span::styled(" ▶", theme.muted()));
        }
        _ => {
            let text = if focused {
                format!("{}▏", el.value)
            } else if el.value.is_empty() {
                "·".to_string()
            } else {
                el.value.clone()
            };
            spans.push(Span::styled(text, value_style));
        }
    }
    Line::from(spans)
}
