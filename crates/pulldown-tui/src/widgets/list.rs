use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};

use super::indicator::{truncate_with_ellipsis, IndicatorWidget};
use crate::app::App;

pub struct ListWidget;

impl ListWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let view = &app.view;

        frame.render_widget(
            Block::default().style(Style::default().bg(theme.bg0)),
            area,
        );

        let strip_rows = view.strip_height();
        let strip = IndicatorWidget::lines(
            app.refresher.current_frame(),
            app.refresher.label(),
            app.refresher.phase(),
            area.width,
            strip_rows,
            theme,
        );

        for (i, line) in strip.into_iter().enumerate() {
            if let Some(y) = view.screen_row(i as i32) {
                frame.render_widget(Paragraph::new(line), Self::row(area, y));
            }
        }

        let item_style = Style::default().fg(theme.fg0);
        let marker_style = Style::default().fg(theme.grey1);
        let text_width = (area.width as usize).saturating_sub(3);

        for (i, item) in view.items().iter().enumerate() {
            let Some(y) = view.screen_row(strip_rows as i32 + i as i32) else {
                continue;
            };
            let line = Line::from(vec![
                Span::styled(" • ", marker_style),
                Span::styled(truncate_with_ellipsis(item, text_width), item_style),
            ]);
            frame.render_widget(Paragraph::new(line), Self::row(area, y));
        }
    }

    fn row(area: Rect, y: u16) -> Rect {
        Rect::new(area.x, y, area.width, 1)
    }
}
