//! Welcome screen shown once at startup

use crate::app::App;
use crate::ui::colors::RosePine;
use crate::ui::components::{render_footer, render_frame};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout},
    style::{Style, Stylize},
    text::Line,
    widgets::{Paragraph, Widget},
};

const LETTER_ROWS: usize = 6;

const S: [&str; LETTER_ROWS] = [
    "███████╗",
    "██╔════╝",
    "███████╗",
    "╚════██║",
    "███████║",
    "╚══════╝",
];
const N: [&str; LETTER_ROWS] = [
    "███╗   ██╗",
    "████╗  ██║",
    "██╔██╗ ██║",
    "██║╚██╗██║",
    "██║ ╚████║",
    "╚═╝  ╚═══╝",
];
const I: [&str; LETTER_ROWS] = ["██╗", "██║", "██║", "██║", "██║", "╚═╝"];
const P: [&str; LETTER_ROWS] = [
    "██████╗ ",
    "██╔══██╗",
    "██████╔╝",
    "██╔═══╝ ",
    "██║     ",
    "╚═╝     ",
];
const T: [&str; LETTER_ROWS] = [
    "████████╗",
    "╚══██╔══╝",
    "   ██║   ",
    "   ██║   ",
    "   ██║   ",
    "   ╚═╝   ",
];
const E: [&str; LETTER_ROWS] = [
    "███████╗",
    "██╔════╝",
    "█████╗  ",
    "██╔══╝  ",
    "███████╗",
    "╚══════╝",
];
const R: [&str; LETTER_ROWS] = [
    "██████╗ ",
    "██╔══██╗",
    "██████╔╝",
    "██╔══██╗",
    "██║  ██║",
    "╚═╝  ╚═╝",
];

fn banner() -> Vec<String> {
    let word = [S, N, I, P, S, T, E, R];
    (0..LETTER_ROWS)
        .map(|row| word.iter().map(|letter| letter[row]).collect())
        .collect()
}

fn banner_width() -> u16 {
    banner()
        .first()
        .map_or(0, |row| row.chars().count() as u16)
}

pub fn render(frame: &mut Frame, app: &App) {
    let inner = render_frame(frame, frame.area(), app);

    let rows = Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).split(inner);

    let content = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(LETTER_ROWS as u16 + 1),
        Constraint::Length(2),
        Constraint::Length(2),
        Constraint::Fill(1),
    ])
    .split(rows[0]);

    let title: Vec<Line> = if content[1].width >= banner_width() {
        banner().into_iter().map(Line::from).collect()
    } else {
        vec![Line::from("Snipster")]
    };
    Paragraph::new(title)
        .alignment(Alignment::Center)
        .style(Style::default().fg(app.theme.accent()).bold())
        .render(content[1], frame.buffer_mut());

    Paragraph::new("Your personal snippet manager")
        .alignment(Alignment::Center)
        .style(Style::default().fg(RosePine::SUBTLE).italic())
        .render(content[2], frame.buffer_mut());

    let count = format!(
        "{} snippets  ·  press any key to start, / to search",
        app.snippets.len()
    );
    Paragraph::new(count)
        .alignment(Alignment::Center)
        .style(Style::default().fg(RosePine::MUTED))
        .render(content[3], frame.buffer_mut());

    render_footer(frame, rows[1], app);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_rows_are_aligned() {
        let rows = banner();
        assert_eq!(rows.len(), LETTER_ROWS);
        let width = rows[0].chars().count();
        assert!(rows.iter().all(|row| row.chars().count() == width));
    }
}
