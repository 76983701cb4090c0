//! Gruvbox Material theme
//! https://github.com/sainnhe/gruvbox-material

use ratatui::style::Color;
use crate::theme::Theme;

pub fn dark() -> Theme {
    Theme::default()
}

pub fn light() -> Theme {
    Theme {
        bg0: Color::Rgb(0xfb, 0xf1, 0xc7),
        bg1: Color::Rgb(0xf4, 0xe8, 0xbe),
        bg2: Color::Rgb(0xeb, 0xdb, 0xb2),
        fg0: Color::Rgb(0x65, 0x47, 0x35),
        grey1: Color::Rgb(0x92, 0x83, 0x74),
        grey2: Color::Rgb(0x7c, 0x6f, 0x64),
        idle: Color::Rgb(0x7c, 0x6f, 0x64),
        pulling: Color::Rgb(0xb4, 0x71, 0x09),
        refreshing: Color::Rgb(0x4c, 0x7a, 0x5d),
        accent: Color::Rgb(0x4c, 0x7a, 0x5d),
    }
}
