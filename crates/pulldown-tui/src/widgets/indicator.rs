use image::{imageops, imageops::FilterType, Rgba, RgbaImage};
use pulldown_core::IndicatorPhase;
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::theme::Theme;

/// Indicator strip: the current sprite frame on the left, the label beside it
pub struct IndicatorWidget;

impl IndicatorWidget {
    /// Build the `rows` lines of the strip for a view `width` cells wide
    pub fn lines(
        sprite: &RgbaImage,
        label: &str,
        phase: IndicatorPhase,
        width: u16,
        rows: u16,
        theme: &Theme,
    ) -> Vec<Line<'static>> {
        let bg = Theme::rgb(theme.bg1);
        let sprite_rows = Self::halfblocks(sprite, rows, bg);
        let sprite_width = rows as usize * 2;

        // left margin + sprite + gap
        let label_width = (width as usize).saturating_sub(sprite_width + 3);
        let label = truncate_with_ellipsis(label, label_width);
        let label_row = rows.saturating_sub(1) / 2;
        let label_style = Style::default()
            .fg(Self::phase_color(phase, theme))
            .add_modifier(Modifier::BOLD);

        sprite_rows
            .into_iter()
            .enumerate()
            .map(|(row, mut spans)| {
                spans.insert(0, Span::raw(" "));
                spans.push(Span::raw("  "));
                if row as u16 == label_row {
                    spans.push(Span::styled(label.clone(), label_style));
                }
                Line::from(spans).style(Style::default().bg(theme.bg1))
            })
            .collect()
    }

    fn phase_color(phase: IndicatorPhase, theme: &Theme) -> Color {
        match phase {
            IndicatorPhase::Default => theme.idle,
            IndicatorPhase::Pulling => theme.pulling,
            IndicatorPhase::Refreshing => theme.refreshing,
        }
    }

    /// Render the sprite as `rows` lines of halfblocks, two pixels per cell
    fn halfblocks(sprite: &RgbaImage, rows: u16, bg: (u8, u8, u8)) -> Vec<Vec<Span<'static>>> {
        let size = (rows as u32 * 2).max(2);
        let scaled = imageops::resize(sprite, size, size, FilterType::Nearest);

        (0..rows as u32)
            .map(|row| {
                let y = row * 2;
                (0..size)
                    .map(|x| {
                        let top = blend(*scaled.get_pixel(x, y), bg);
                        let bottom = blend(*scaled.get_pixel(x, y + 1), bg);
                        Span::styled("▀", Style::default().fg(top).bg(bottom))
                    })
                    .collect()
            })
            .collect()
    }
}

/// Composite a sprite pixel over the strip background
fn blend(pixel: Rgba<u8>, bg: (u8, u8, u8)) -> Color {
    let alpha = pixel[3] as u16;
    let mix = |fg: u8, bg: u8| ((fg as u16 * alpha + bg as u16 * (255 - alpha)) / 255) as u8;
    Color::Rgb(mix(pixel[0], bg.0), mix(pixel[1], bg.1), mix(pixel[2], bg.2))
}

/// Cut `text` to `max_width` display cells, ending with "..." when shortened
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width <= 3 {
        return ".".repeat(max_width);
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max_width - 3 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_keeps_short_text() {
        assert_eq!(truncate_with_ellipsis("Refreshing...", 20), "Refreshing...");
    }

    #[test]
    fn test_truncate_adds_ellipsis() {
        assert_eq!(truncate_with_ellipsis("Pull down to refresh", 10), "Pull do...");
        assert_eq!(truncate_with_ellipsis("Pull down", 2), "..");
    }

    #[test]
    fn test_blend_transparent_and_opaque() {
        assert_eq!(blend(Rgba([255, 0, 0, 0]), (1, 2, 3)), Color::Rgb(1, 2, 3));
        assert_eq!(blend(Rgba([255, 0, 0, 255]), (1, 2, 3)), Color::Rgb(255, 0, 0));
    }

    #[test]
    fn test_strip_has_one_line_per_row() {
        let sprite = RgbaImage::from_pixel(16, 16, Rgba([255, 255, 255, 255]));
        let lines = IndicatorWidget::lines(
            &sprite,
            "Pull down to refresh",
            IndicatorPhase::Default,
            40,
            3,
            &Theme::default(),
        );
        assert_eq!(lines.len(), 3);

        let text: String = lines[1].spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(text.ends_with("Pull down to refresh"));
        assert_eq!(text.chars().filter(|c| *c == '▀').count(), 6);
    }
}
