use std::io::{self, Stdout};
use std::panic;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use tokio::sync::mpsc;

use pulldown_core::AppConfig;
use pulldown_tui::{
    event::{AppEvent, EventHandler, RefreshResult},
    input::handle_key_event,
    load_theme,
    widgets::{main_layout, ListWidget, StatusBarWidget},
    App,
};

type Tui = Terminal<CrosstermBackend<Stdout>>;

pub async fn run(config: AppConfig) -> Result<()> {
    let theme = load_theme(&config.ui.theme);
    let mut app = App::new(config, theme)?;

    // Panic output would land on the alternate screen
    let _panic_hook = PanicHookGuard::install();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, SetTitle("pulldown"))?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = main_loop(&mut terminal, &mut app).await;
    app.shutdown();

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn main_loop(terminal: &mut Tui, app: &mut App) -> Result<()> {
    let event_handler =
        EventHandler::with_animation_tick(app.config.ui.tick_rate_ms, app.config.ui.animation_tick());
    let delay = Duration::from_millis(app.config.demo.simulated_delay_ms);

    // Gesture-triggered refreshes arrive through the listener
    let (request_tx, mut request_rx) = mpsc::unbounded_channel::<()>();
    app.refresher.add_refresh_listener(move |_| {
        if request_tx.send(()).is_err() {
            tracing::warn!("refresh request dropped, main loop is gone");
        }
    });

    // Channel for async refresh results
    let (refresh_tx, mut refresh_rx) = mpsc::unbounded_channel::<RefreshResult>();
    let mut next_batch = 1u32;

    loop {
        while request_rx.try_recv().is_ok() {
            spawn_refresh(delay, next_batch, refresh_tx.clone());
            next_batch += 1;
        }

        // Process any completed refresh operations (non-blocking)
        while let Ok(result) = refresh_rx.try_recv() {
            app.handle_refresh_result(result);
        }

        let size = terminal.size()?;
        let (list_area, status_area) = main_layout(Rect::new(0, 0, size.width, size.height));
        app.layout(list_area)?;

        terminal.draw(|frame| {
            ListWidget::render(frame, list_area, app);
            StatusBarWidget::render(frame, status_area, app);
        })?;

        // After drawing, so the first frame of a new sequence is presented
        app.tick(Instant::now());

        // Poll at the animation frame rate while the indicator moves
        let event = if app.needs_fast_update() {
            event_handler.next_animation()?
        } else {
            event_handler.next()?
        };

        if let Some(event) = event {
            match event {
                AppEvent::Key(key) => {
                    app.clear_status();
                    if app.handle_action(handle_key_event(key)) {
                        spawn_refresh(delay, next_batch, refresh_tx.clone());
                        next_batch += 1;
                    }
                }
                AppEvent::Pointer(pointer) => app.handle_pointer(pointer),
                AppEvent::Resize(width, height) => {
                    tracing::debug!(width, height, "terminal resized");
                }
                AppEvent::Tick => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Simulate a network fetch that completes after `delay`
fn spawn_refresh(delay: Duration, batch: u32, tx: mpsc::UnboundedSender<RefreshResult>) {
    tracing::info!(batch, delay_ms = delay.as_millis() as u64, "starting simulated fetch");

    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let result = RefreshResult {
            new_items: vec![format!("Update #{}", batch)],
        };
        if tx.send(result).is_err() {
            tracing::warn!(batch, "refresh result dropped, main loop is gone");
        }
    });
}

/// Routes panic messages to the log file while the TUI owns the terminal.
/// Dropping it puts the default hook back.
struct PanicHookGuard;

impl PanicHookGuard {
    fn install() -> Self {
        panic::set_hook(Box::new(|info| {
            tracing::error!("{}", info);
        }));
        Self
    }
}

impl Drop for PanicHookGuard {
    fn drop(&mut self) {
        drop(panic::take_hook());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panics_are_still_catchable_under_guard() {
        let guard = PanicHookGuard::install();
        let caught = panic::catch_unwind(|| panic!("listener blew up"));
        assert!(caught.is_err());
        drop(guard);

        let caught = panic::catch_unwind(|| 7);
        assert_eq!(caught.ok(), Some(7));
    }

    #[tokio::test]
    async fn test_simulated_fetch_reports_batch() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        spawn_refresh(Duration::from_millis(1), 4, tx);

        let result = rx.recv().await.unwrap();
        assert_eq!(result.new_items, vec!["Update #4".to_string()]);
    }
}
