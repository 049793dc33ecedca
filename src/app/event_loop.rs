use std::io::stdout;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use ratatui::DefaultTerminal;

use crate::app::{App, Message, Model, update};

/// Longest the loop sleeps waiting for input when no timer is pending.
const IDLE_POLL: Duration = Duration::from_millis(250);

/// How long to wait for input before the next timer check.
///
/// Never longer than [`IDLE_POLL`], and zero once `deadline` has passed.
pub fn poll_timeout(deadline: Option<Instant>, now: Instant) -> Duration {
    deadline.map_or(IDLE_POLL, |deadline| {
        deadline.saturating_duration_since(now).min(IDLE_POLL)
    })
}

impl App {
    /// Run the main event loop.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal initialization or the event loop
    /// encounters an I/O failure.
    pub fn run(&mut self) -> Result<()> {
        let mut terminal = ratatui::try_init()
            .context("Failed to initialize terminal: tallyterm requires an interactive terminal")?;
        let size = terminal.size()?;
        let mut model = self.initial_model((size.width, size.height));
        tracing::info!(
            width = size.width,
            height = size.height,
            options = ?model.buffer.options(),
            "starting"
        );

        let result = self.event_loop(&mut terminal, &mut model);

        // Restore terminal
        let _ = execute!(stdout(), DisableMouseCapture);
        ratatui::restore();

        result
    }

    fn event_loop(&mut self, terminal: &mut DefaultTerminal, model: &mut Model) -> Result<()> {
        execute!(stdout(), EnableMouseCapture)?;
        let mut needs_render = true;

        loop {
            let now = Instant::now();
            if model.expire_error(now) {
                needs_render = true;
            }
            if model.expire_toast(now) {
                needs_render = true;
            }

            // Handle events
            let timeout = if needs_render {
                Duration::ZERO
            } else {
                poll_timeout(model.next_deadline(), now)
            };
            if event::poll(timeout)? {
                if let Some(msg) = self.handle_event(event::read()?, model) {
                    self.dispatch(model, msg);
                    needs_render = true;
                }

                // Coalesce key repeat bursts into a single render.
                while event::poll(Duration::ZERO)? {
                    if let Some(msg) = self.handle_event(event::read()?, model) {
                        self.dispatch(model, msg);
                        needs_render = true;
                    }
                }
            }

            if needs_render {
                terminal.draw(|frame| crate::ui::render(model, frame))?;
                needs_render = false;
            }

            if model.should_quit {
                break;
            }
        }
        Ok(())
    }

    fn dispatch(&mut self, model: &mut Model, msg: Message) {
        tracing::debug!(?msg, "message");
        let side_msg = msg.clone();
        *model = update(std::mem::take(model), msg);
        self.handle_message_side_effects(model, &side_msg);
    }
}
