//! Palette
//!
//! Base colours follow Rose Pine. Border accents are the fixed rotation the
//! `t` key cycles through.

use ratatui::style::Color;

pub struct RosePine;

impl RosePine {
    pub const TEXT: Color = Color::Rgb(224, 222, 244);
    pub const SUBTLE: Color = Color::Rgb(144, 140, 170);
    pub const MUTED: Color = Color::Rgb(110, 106, 134);
    pub const LOVE: Color = Color::Rgb(235, 111, 146);
    pub const GOLD: Color = Color::Rgb(246, 193, 119);
    pub const FOAM: Color = Color::Rgb(156, 207, 216);
    pub const IRIS: Color = Color::Rgb(196, 167, 231);
    pub const HIGHLIGHT_HIGH: Color = Color::Rgb(82, 79, 103);
    pub const HIGHLIGHT_LOW: Color = Color::Rgb(33, 32, 46);
}

/// Border accents: sky, pink, lime, amber
pub const ACCENTS: [Color; 4] = [
    Color::Rgb(0x5B, 0xCE, 0xFA),
    Color::Rgb(0xF5, 0xA9, 0xB8),
    Color::Rgb(0xB5, 0xE8, 0x53),
    Color::Rgb(0xFF, 0xCC, 0x66),
];
