//! Shared UI pieces
//!
//! Header and footer bars, the frame around the browser, and conversion of
//! highlight markup into styled spans.

use crate::app::{App, Screen};
use crate::highlight::Markup;
use crate::ui::colors::RosePine;
use crate::ui::layout;
use crate::ui::theme::Theme;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, Padding, Paragraph, Widget},
};

/// Turns markup into spans, layering match and keyword styles over `base`
pub fn markup_spans(markup: &Markup, base: Style, theme: &Theme) -> Vec<Span<'static>> {
    markup
        .segments()
        .iter()
        .map(|segment| Span::styled(segment.text.clone(), theme.marked(base, segment.marks)))
        .collect()
}

/// Rectangle of the given size centred in `area`, clipped to it
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

/// Outer rounded frame with the accent border. Returns the padded inner area.
pub fn render_frame(frame: &mut Frame, area: Rect, app: &App) -> Rect {
    let (pad_x, pad_y) = layout::frame_padding();
    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(app.theme.border())
        .padding(Padding::symmetric(pad_x, pad_y));

    let inner = block.inner(area);
    block.render(area, frame.buffer_mut());
    inner
}

/// Title, breadcrumb, search field and status summary
pub fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(app.theme.dim_border());
    let inner = block.inner(area);
    block.render(area, frame.buffer_mut());

    let searching = app.search_active || !app.query().is_empty();
    let search_width = if searching {
        app.geometry.search_width
    } else {
        11
    };

    let columns = Layout::horizontal([
        Constraint::Length(10),
        Constraint::Length(app.breadcrumb().chars().count() as u16 + 2),
        Constraint::Length(search_width + 2),
        Constraint::Fill(1),
    ])
    .split(inner);

    Paragraph::new("Snipster")
        .style(Style::default().fg(app.theme.accent()).bold())
        .render(columns[0], frame.buffer_mut());
    Paragraph::new(app.breadcrumb())
        .style(app.theme.muted())
        .render(columns[1], frame.buffer_mut());

    if searching {
        let prompt = Line::from(vec![
            Span::styled("/ ", Style::default().fg(app.theme.accent())),
            Span::styled(app.search.value().to_string(), app.theme.text()),
        ]);
        Paragraph::new(prompt).render(columns[2], frame.buffer_mut());

        if app.search_active && app.screen == Screen::Home {
            let x = columns[2].x + 2 + app.search.cursor_display_col() as u16;
            let max_x = columns[2].right().saturating_sub(1);
            frame.set_cursor_position((x.min(max_x), columns[2].y));
        }
    } else {
        Paragraph::new("/ to search")
            .style(app.theme.muted())
            .render(columns[2], frame.buffer_mut());
    }

    let status_style = if app.error_message.is_some() {
        app.theme.error()
    } else if app.success_message.is_some() {
        app.theme.success()
    } else {
        app.theme.muted()
    };
    Paragraph::new(app.header_status())
        .style(status_style)
        .render(columns[3], frame.buffer_mut());
}

fn footer_help(app: &App) -> &'static str {
    match app.screen {
        Screen::Welcome => "any key continue  / search  ctrl+c quit",
        Screen::Home if app.search_active => "type to filter  ↑/↓ navigate  esc clear",
        Screen::Home => {
            "/ focus  j/k,↑/↓ navigate  h/l folders  enter copy  E editor  n new  e edit  d delete  f fuzzy  t color  q quit"
        }
        Screen::Create | Screen::Edit => "tab/shift+tab move  ctrl+s save  esc cancel",
        Screen::ConfirmDelete => "y delete  n/esc cancel",
    }
}

pub fn render_footer(frame: &mut Frame, area: Rect, app: &App) {
    Paragraph::new(footer_help(app))
        .style(Style::default().fg(RosePine::MUTED))
        .render(area, frame.buffer_mut());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::highlight_substring;

    #[test]
    fn centered_rect_is_clipped() {
        let area = Rect::new(0, 0, 40, 10);
        assert_eq!(centered_rect(20, 4, area), Rect::new(10, 3, 20, 4));
        assert_eq!(centered_rect(80, 40, area), area);
    }

    #[test]
    fn spans_follow_segments() {
        let theme = Theme::default();
        let spans = markup_spans(&highlight_substring("a React b", "react"), theme.text(), &theme);
        let texts: Vec<&str> = spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(texts, vec!["a ", "React", " b"]);
        assert_ne!(spans[0].style, spans[1].style);
    }
}
