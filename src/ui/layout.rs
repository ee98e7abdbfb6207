//! Pane geometry
//!
//! All sizes are content sizes, i.e. what is left inside borders and
//! padding. Recomputed on every resize so the frame never overflows the
//! terminal.

const BORDER: u16 = 1;
const PAD_X: u16 = 2;
const PAD_Y: u16 = 1;
const MIN_CONTENT_WIDTH: u16 = 20;
const MIN_CONTENT_HEIGHT: u16 = 10;

pub const HEADER_HEIGHT: u16 = 3;
pub const FOOTER_HEIGHT: u16 = 1;
const MIN_BODY_HEIGHT: u16 = 3;

pub const PANE_GAP: u16 = 1;
/// Rounded border plus one column of padding on each side
pub const PANE_EXTRA_X: u16 = 4;
/// Top and bottom border
pub const PANE_EXTRA_Y: u16 = 2;
const MIN_PANE_WIDTH: u16 = 10;
const MIN_SEARCH_WIDTH: u16 = 20;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Geometry {
    pub content_width: u16,
    pub content_height: u16,
    pub body_height: u16,
    pub sidebar_width: u16,
    pub preview_width: u16,
    pub pane_height: u16,
    pub search_width: u16,
}

impl Geometry {
    /// Outer width of the sidebar pane including its border and padding
    pub fn sidebar_outer(&self) -> u16 {
        self.sidebar_width + PANE_EXTRA_X
    }

    pub fn preview_outer(&self) -> u16 {
        self.preview_width + PANE_EXTRA_X
    }
}

pub fn frame_padding() -> (u16, u16) {
    (PAD_X, PAD_Y)
}

pub fn compute(width: u16, height: u16) -> Geometry {
    let content_width = width
        .saturating_sub(2 * (BORDER + PAD_X))
        .max(MIN_CONTENT_WIDTH);
    let content_height = height
        .saturating_sub(2 * (BORDER + PAD_Y))
        .max(MIN_CONTENT_HEIGHT);

    let body_height = content_height
        .saturating_sub(HEADER_HEIGHT + FOOTER_HEIGHT)
        .max(MIN_BODY_HEIGHT);

    let available = content_width
        .saturating_sub(PANE_GAP + 2 * PANE_EXTRA_X)
        .max(MIN_PANE_WIDTH);
    let sidebar_width = (available / 3).max(MIN_PANE_WIDTH);
    let preview_width = available.saturating_sub(sidebar_width).max(MIN_PANE_WIDTH);

    Geometry {
        content_width,
        content_height,
        body_height,
        sidebar_width,
        preview_width,
        pane_height: body_height.saturating_sub(PANE_EXTRA_Y).max(1),
        search_width: (content_width / 3).max(MIN_SEARCH_WIDTH),
    }
}
