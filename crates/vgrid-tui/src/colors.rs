//! Dark theme colors for the grid

use ratatui::style::Color;

pub const BG: Color = Color::Rgb(0x14, 0x13, 0x13);
pub const SURFACE: Color = Color::Rgb(0x20, 0x1f, 0x20);
pub const CELL_FOCUSED: Color = Color::Rgb(0x2b, 0x2a, 0x2a);

pub const TEXT: Color = Color::Rgb(0xe6, 0xe1, 0xe1);
pub const SUBTEXT: Color = Color::Rgb(0xcb, 0xc5, 0xca);
pub const BORDER: Color = Color::Rgb(0x94, 0x8f, 0x94);

/// Focus ring and key hints
pub const ACCENT: Color = Color::Rgb(0xcb, 0xc4, 0xcb);

/// Section labels and favorite markers
pub const FAVORITE: Color = Color::Rgb(0xff, 0xd9, 0x66);
