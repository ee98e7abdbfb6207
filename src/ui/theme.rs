use crate::highlight::Marks;
use crate::ui::colors::{ACCENTS, RosePine};
use ratatui::style::{Color, Modifier, Style};

/// Style configuration handed to every render call.
///
/// The only mutable part is the border accent, changed through
/// [`Theme::set_accent`] by the application state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Theme {
    accent: usize,
}

impl Theme {
    /// Selects an accent, wrapping out-of-range indices
    pub fn set_accent(&mut self, index: usize) {
        self.accent = index % ACCENTS.len();
    }

    pub fn accent_index(&self) -> usize {
        self.accent
    }

    pub fn next_accent(&self) -> usize {
        (self.accent + 1) % ACCENTS.len()
    }

    pub fn accent(&self) -> Color {
        ACCENTS[self.accent]
    }

    pub fn border(&self) -> Style {
        Style::default().fg(self.accent())
    }

    pub fn dim_border(&self) -> Style {
        Style::default().fg(RosePine::HIGHLIGHT_HIGH)
    }

    pub fn text(&self) -> Style {
        Style::default().fg(RosePine::TEXT)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(RosePine::MUTED)
    }

    pub fn error(&self) -> Style {
        Style::default().fg(RosePine::LOVE)
    }

    pub fn success(&self) -> Style {
        Style::default().fg(RosePine::FOAM)
    }

    pub fn selected(&self) -> Style {
        Style::default()
            .fg(self.accent())
            .bg(RosePine::HIGHLIGHT_LOW)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for a highlighted segment layered over `base`
    ///
    /// A keyword inside a query match keeps its keyword colour and gains the
    /// match underline.
    pub fn marked(&self, base: Style, marks: Marks) -> Style {
        let mut style = base;
        if marks.matched {
            style = style
                .fg(RosePine::GOLD)
                .add_modifier(Modifier::UNDERLINED | Modifier::BOLD);
        }
        if marks.keyword {
            style = style.fg(RosePine::IRIS).add_modifier(Modifier::BOLD);
        }
        style
    }
}
