//! Create/Edit form and delete confirmation modals

use crate::app::{App, Field, Screen};
use crate::ui::colors::RosePine;
use crate::ui::components::centered_rect;
use crate::ui::input::TextField;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, Clear, Padding, Paragraph, Widget},
};

const LABEL_WIDTH: u16 = 12;
const FORM_WIDTH: u16 = 72;
const FORM_HEIGHT: u16 = 24;

fn modal_block(app: &App, title: &str) -> Block<'static> {
    Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(app.theme.border())
        .title(Span::styled(
            format!(" {} ", title),
            Style::default().fg(app.theme.accent()).bold(),
        ))
        .title_alignment(Alignment::Center)
        .padding(Padding::symmetric(2, 1))
}

fn value_span(field: &TextField, placeholder: &str, app: &App) -> Span<'static> {
    if field.value().is_empty() {
        Span::styled(placeholder.to_string(), app.theme.muted().italic())
    } else {
        Span::styled(field.value().to_string(), app.theme.text())
    }
}

fn label_style(app: &App, focused: bool) -> Style {
    if focused {
        Style::default().fg(app.theme.accent()).bold()
    } else {
        Style::default().fg(RosePine::SUBTLE)
    }
}

fn error_line(message: Option<&'static str>) -> Line<'static> {
    match message {
        Some(message) => Line::from(Span::styled(message, Style::default().fg(RosePine::LOVE))),
        None => Line::default(),
    }
}

pub fn render_form(frame: &mut Frame, app: &App) {
    let area = centered_rect(FORM_WIDTH, FORM_HEIGHT, frame.area());
    frame.render_widget(Clear, area);

    let title = if app.screen == Screen::Edit {
        "Edit Snippet"
    } else {
        "New Snippet"
    };
    let block = modal_block(app, title);
    let inner = block.inner(area);
    block.render(area, frame.buffer_mut());

    let rows = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(2),
        Constraint::Length(2),
        Constraint::Length(2),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .split(inner);

    let form = &app.form;
    for (row, field) in Field::ALL[..4].iter().copied().enumerate() {
        let focused = form.focus == field;
        let lines = vec![
            Line::from(vec![
                Span::styled(
                    format!("{:<width$}", field.label(), width = LABEL_WIDTH as usize),
                    label_style(app, focused),
                ),
                value_span(form.field(field), field.placeholder(), app),
            ]),
            error_line(form.error(field)),
        ];
        Paragraph::new(lines).render(rows[row], frame.buffer_mut());

        if focused {
            let input = form.field(field);
            let x = rows[row].x + LABEL_WIDTH + input.cursor_display_col() as u16;
            frame.set_cursor_position((x.min(rows[row].right().saturating_sub(1)), rows[row].y));
        }
    }

    render_content(frame, rows[4], app);

    Paragraph::new("ctrl+s: save, esc: cancel (enter in content adds newline)")
        .style(Style::default().fg(RosePine::MUTED))
        .alignment(Alignment::Center)
        .render(rows[5], frame.buffer_mut());
}

fn render_content(frame: &mut Frame, area: Rect, app: &App) {
    let field = Field::Content;
    let focused = app.form.focus == field;
    let input = app.form.field(field);

    let mut title = vec![Span::styled(format!(" {} ", field.label()), label_style(app, focused))];
    if let Some(message) = app.form.error(field) {
        title.push(Span::styled(format!("{} ", message), Style::default().fg(RosePine::LOVE)));
    }

    let border = if focused {
        app.theme.border()
    } else {
        app.theme.dim_border()
    };
    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(border)
        .title(Line::from(title))
        .padding(Padding::horizontal(1));
    let inner = block.inner(area);

    let (line, _) = input.cursor_line_col();
    let scroll = (line as u16).saturating_sub(inner.height.saturating_sub(1));

    let text: Vec<Line> = if input.value().is_empty() {
        vec![Line::from(value_span(input, field.placeholder(), app))]
    } else {
        input
            .value()
            .split('\n')
            .map(|l| Line::from(Span::styled(l.to_string(), app.theme.text())))
            .collect()
    };
    frame.render_widget(Paragraph::new(text).scroll((scroll, 0)).block(block), area);

    if focused && inner.height > 0 {
        let x = inner.x + input.cursor_display_col() as u16;
        let y = inner.y + line as u16 - scroll;
        frame.set_cursor_position((x.min(inner.right().saturating_sub(1)), y));
    }
}

pub fn render_confirm_delete(frame: &mut Frame, app: &App) {
    let area = centered_rect(50, 9, frame.area());
    frame.render_widget(Clear, area);

    let block = modal_block(app, "Delete Snippet?");
    let title = app
        .target
        .as_ref()
        .map_or_else(String::new, |snippet| snippet.title.clone());

    let lines = vec![
        Line::from(Span::styled(title, Style::default().fg(RosePine::GOLD).bold())),
        Line::default(),
        Line::from("This removes the snippet file from disk."),
        Line::default(),
        Line::from(Span::styled("y: yes, n/esc: cancel", Style::default().fg(RosePine::MUTED))),
    ];

    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center).block(block),
        area,
    );
}
