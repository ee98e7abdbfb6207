//! Home screen: header, folder sidebar, preview pane and footer

use crate::app::App;
use crate::highlight::{contains_folded, highlight_line};
use crate::models::{SidebarItem, Snippet};
use crate::ui::colors::RosePine;
use crate::ui::components::{markup_spans, render_footer, render_frame, render_header};
use crate::ui::layout::{FOOTER_HEIGHT, HEADER_HEIGHT, PANE_GAP};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, List, ListItem, ListState, Padding, Paragraph},
};

pub fn render(frame: &mut Frame, app: &App) {
    let inner = render_frame(frame, frame.area(), app);

    let rows = Layout::vertical([
        Constraint::Length(HEADER_HEIGHT),
        Constraint::Fill(1),
        Constraint::Length(FOOTER_HEIGHT),
    ])
    .split(inner);

    render_header(frame, rows[0], app);

    let body = Layout::horizontal([
        Constraint::Length(app.geometry.sidebar_outer()),
        Constraint::Length(PANE_GAP),
        Constraint::Length(app.geometry.preview_outer()),
    ])
    .split(rows[1]);

    render_sidebar(frame, body[0], app);
    render_preview(frame, body[2], app);
    render_footer(frame, rows[2], app);
}

fn pane_block(app: &App, title: &str) -> Block<'static> {
    Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(app.theme.border())
        .title(Span::styled(
            format!(" {} ", title),
            Style::default().fg(app.theme.accent()).bold(),
        ))
        .padding(Padding::horizontal(1))
}

fn sidebar_row(item: &SidebarItem, app: &App) -> ListItem<'static> {
    let indent = "  ".repeat(item.depth());
    match item {
        SidebarItem::Folder { name, .. } => ListItem::new(Line::from(vec![
            Span::raw(indent),
            Span::styled(format!("▸ {}/", name), Style::default().fg(RosePine::IRIS)),
        ])),
        SidebarItem::Snippet { title, .. } => {
            let mut spans = vec![Span::raw(format!("{}  ", indent))];
            spans.extend(markup_spans(title, app.theme.text(), &app.theme));
            ListItem::new(Line::from(spans))
        }
    }
}

fn render_sidebar(frame: &mut Frame, area: Rect, app: &App) {
    let block = pane_block(app, "Snippets");

    if app.visible_items.is_empty() {
        let message = if app.query().is_empty() {
            "Empty folder"
        } else {
            "No matches"
        };
        frame.render_widget(
            Paragraph::new(message).style(app.theme.muted()).block(block),
            area,
        );
        return;
    }

    let items: Vec<ListItem> = app
        .visible_items
        .iter()
        .map(|item| sidebar_row(item, app))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(app.theme.selected());

    let mut state = ListState::default();
    state.select(Some(app.selected));
    frame.render_stateful_widget(list, area, &mut state);
}

/// Title, metadata line, a blank line, then numbered content lines
fn preview_lines(snippet: &Snippet, app: &App) -> Vec<Line<'static>> {
    let query = app.query();
    let mut lines = vec![
        Line::from(Span::styled(
            snippet.title.clone(),
            Style::default().fg(app.theme.accent()).bold(),
        )),
        Line::from(Span::styled(
            format!(
                "{} | {} | {}",
                snippet.category_or_default(),
                snippet.language,
                snippet.tags_display()
            ),
            app.theme.muted(),
        )),
        Line::default(),
    ];

    for (number, line) in snippet.content.lines().enumerate() {
        let hit = !query.is_empty() && contains_folded(line, query);
        let marker = if hit { "▶" } else { "│" };
        let gutter_style = if hit {
            Style::default().fg(RosePine::GOLD)
        } else {
            Style::default().fg(RosePine::MUTED)
        };

        let mut spans = vec![Span::styled(format!("{:>3} {} ", number + 1, marker), gutter_style)];
        spans.extend(markup_spans(
            &highlight_line(line, query, &snippet.language),
            app.theme.text(),
            &app.theme,
        ));
        lines.push(Line::from(spans));
    }
    lines
}

fn render_preview(frame: &mut Frame, area: Rect, app: &App) {
    let block = pane_block(app, "Preview");

    let paragraph = match app.selected_snippet() {
        Some(snippet) => Paragraph::new(preview_lines(snippet, app)).scroll((app.preview_scroll, 0)),
        None => Paragraph::new("No snippet selected").style(app.theme.muted()),
    };
    frame.render_widget(paragraph.block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Screen;
    use ratatui::{Terminal, backend::TestBackend};

    fn app() -> App {
        let mut react = Snippet::new(
            "useFetch hook".into(),
            "frontend/react".into(),
            "const data = fetch(url);\nreturn data;".into(),
        );
        react.language = "js".into();
        react.tags = vec!["hooks".into()];
        let mut app = App::new(vec![react]);
        app.screen = Screen::Home;
        app.resize(100, 30);
        app
    }

    fn lines_text(lines: &[Line]) -> Vec<String> {
        lines
            .iter()
            .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn preview_has_header_and_gutter() {
        let app = app();
        let lines = preview_lines(&app.snippets[0], &app);
        let text = lines_text(&lines);
        assert_eq!(text[0], "useFetch hook");
        assert_eq!(text[1], "frontend/react | js | hooks");
        assert_eq!(text[2], "");
        assert_eq!(text[3], "  1 │ const data = fetch(url);");
        assert_eq!(text[4], "  2 │ return data;");
    }

    #[test]
    fn preview_marks_lines_containing_query() {
        let mut app = app();
        app.search.set_value("FETCH");
        app.apply_filter();
        let text = lines_text(&preview_lines(&app.snippets[0], &app));
        assert!(text[3].starts_with("  1 ▶ "));
        assert!(text[4].starts_with("  2 │ "));
    }

    #[test]
    fn renders_without_panicking() {
        let app = app();
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| render(frame, &app)).unwrap();

        let buffer = terminal.backend().buffer();
        let screen: String = buffer.content().iter().map(|cell| cell.symbol()).collect();
        assert!(screen.contains("Snipster"));
        assert!(screen.contains("frontend/"));
    }
}
