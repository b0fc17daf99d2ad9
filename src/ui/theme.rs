use ratatui::style::Color;

use crate::hal::Rgb;

pub struct Theme {
    pub fg: Color,
    pub primary: Color,   // Blue
    pub comment: Color,   // Grey
    pub success: Color,   // Green
    pub error: Color,     // Red
    pub border_focused: Color,
    pub border_normal: Color,
    pub cursor_bg: Color, // Highlight for the execution cursor
}

pub const DEFAULT_THEME: Theme = Theme {
    fg: Color::Rgb(205, 214, 244),
    primary: Color::Rgb(137, 180, 250),
    comment: Color::Rgb(108, 112, 134),
    success: Color::Rgb(166, 227, 161),
    error: Color::Rgb(243, 139, 168),
    border_focused: Color::Rgb(249, 226, 175),
    border_normal: Color::Rgb(108, 112, 134),
    cursor_bg: Color::Rgb(80, 80, 110),
};

/// Map a cell's channel levels onto a terminal color. LED levels top out
/// around 0x60, far below full scale, so stretch them for the screen.
pub fn led_to_color(led: Rgb) -> Color {
    if led == Rgb::OFF {
        // an unlit cell still shows as a dim grey block
        return Color::Rgb(45, 45, 60);
    }
    Color::Rgb(stretch(led.r), stretch(led.g), stretch(led.b))
}

fn stretch(channel: u8) -> u8 {
    ((channel as u16 * 255) / 0x60).min(255) as u8
}
