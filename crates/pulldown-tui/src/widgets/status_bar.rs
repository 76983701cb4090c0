use pulldown_core::GestureState;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use unicode_width::UnicodeWidthStr;

use crate::app::App;

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;

        let state_str = match app.refresher.state() {
            GestureState::Idle => "IDLE",
            GestureState::Pulling => "PULLING",
            GestureState::Refreshing => "REFRESHING",
        };

        let status_text = if let Some(msg) = &app.status_message {
            format!(" {}", msg)
        } else {
            format!(
                " {} | Items: {} | Refreshes: {}",
                state_str,
                app.view.items().len(),
                app.refresh_count
            )
        };

        let help_hint = " q:quit j/k:scroll r:refresh e:end drag:pull ";
        let padding_len = area
            .width
            .saturating_sub((status_text.width() + help_hint.width()) as u16)
            as usize;

        let line = Line::from(vec![
            Span::styled(status_text, Style::default().fg(theme.fg0).bg(theme.bg2)),
            Span::styled(" ".repeat(padding_len), Style::default().bg(theme.bg2)),
            Span::styled(help_hint, Style::default().fg(theme.grey2).bg(theme.bg2)),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulldown_core::AppConfig;
    use ratatui::{backend::TestBackend, Terminal};

    use crate::theme::Theme;

    #[test]
    fn test_hints_stay_right_aligned_after_wide_message() {
        let mut app = App::new(AppConfig::default(), Theme::default()).unwrap();
        app.set_status("更新完了 ✓");

        let mut terminal = Terminal::new(TestBackend::new(70, 1)).unwrap();
        terminal
            .draw(|frame| StatusBarWidget::render(frame, frame.area(), &app))
            .unwrap();

        // hint ends with "pull " in the last five columns
        let buffer = terminal.backend().buffer();
        let tail: String = (65..70).map(|x| buffer[(x, 0)].symbol().to_string()).collect();
        assert_eq!(tail, "pull ");
    }
}
