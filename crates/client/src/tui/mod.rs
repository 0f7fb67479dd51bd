mod court;
mod screens;

use std::io;
use std::time::Instant;

use crossterm::event::{
    self, Event, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
    PushKeyboardEnhancementFlags,
};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute};
use dingdong::SystemClock;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::app::App;
use crate::config::ClientConfig;
use crate::events::{AppEvent, MatchSetup};

pub use court::CourtPainter;

pub struct Tui {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    painter: CourtPainter,
    key_releases: bool,
}

impl Tui {
    pub fn new() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, cursor::Hide)?;

        // Without release events held keys fall back to a hold timeout.
        let key_releases = terminal::supports_keyboard_enhancement().unwrap_or(false);
        if key_releases {
            execute!(
                stdout,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
        }

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self {
            terminal,
            painter: CourtPainter::default(),
            key_releases,
        })
    }

    pub fn run(&mut self, app: &mut App, config: &ClientConfig) -> anyhow::Result<()> {
        let frame_time = config.frame_duration();

        while !app.should_exit() {
            let frame_start = Instant::now();
            self.draw(app)?;

            if app.is_connecting() {
                // The connecting frame is on screen; this blocks until the
                // handshake succeeds or times out.
                app.connect(&SystemClock);
                self.discard_pending_input()?;
                app.process_events();
                continue;
            }

            let deadline = frame_start + frame_time;
            while let Some(timeout) = deadline.checked_duration_since(Instant::now()) {
                if !event::poll(timeout)? {
                    break;
                }
                if let Event::Key(key) = event::read()? {
                    app.handle_key(key, Instant::now());
                }
            }

            app.update(Instant::now());
            app.process_events();
        }

        Ok(())
    }

    fn draw(&mut self, app: &App) -> io::Result<()> {
        let painter = &self.painter;
        self.terminal.draw(|frame| {
            screens::render(frame, app, painter, Instant::now());
        })?;
        Ok(())
    }

    // Keys pressed while the handshake blocked are stale.
    fn discard_pending_input(&mut self) -> io::Result<()> {
        while event::poll(std::time::Duration::ZERO)? {
            event::read()?;
        }
        Ok(())
    }

    pub fn restore_terminal(&mut self) -> io::Result<()> {
        if self.key_releases {
            execute!(self.terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
            self.key_releases = false;
        }
        terminal::disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            cursor::Show
        )?;
        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        let _ = self.restore_terminal();
    }
}

/// Runs the menus, or goes straight to `start` when given.
pub fn run(config: &ClientConfig, start: Option<MatchSetup>) -> anyhow::Result<()> {
    let mut app = App::new(config.clone());
    if let Some(setup) = start {
        app.push(AppEvent::StartGame(setup));
        app.process_events();
    }
    let mut tui = Tui::new()?;
    let result = tui.run(&mut app, config);
    tui.restore_terminal()?;
    result
}
