use std::collections::VecDeque;
use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use dingdong::{Clock, OnlineSession};

use crate::config::ClientConfig;
use crate::events::{AppEvent, MatchSetup, MenuScreen};
use crate::game::{Input, Match};
use crate::menu::MenuState;

pub enum AppState {
    Menu,
    /// Drawn once, then the blocking handshake runs.
    Connecting(MatchSetup),
    Playing(Box<Match>),
    Exit,
}

pub struct App {
    config: ClientConfig,
    state: AppState,
    menu: MenuState,
    events: VecDeque<AppEvent>,
    sound_on: bool,
}

impl App {
    pub fn new(config: ClientConfig) -> Self {
        let menu = MenuState::new(config.end_score, config.default_address.clone());
        Self {
            sound_on: config.sound_on,
            config,
            state: AppState::Menu,
            menu,
            events: VecDeque::new(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn menu(&self) -> &MenuState {
        &self.menu
    }

    pub fn sound_on(&self) -> bool {
        self.sound_on
    }

    pub fn should_exit(&self) -> bool {
        matches!(self.state, AppState::Exit)
    }

    pub fn is_connecting(&self) -> bool {
        matches!(self.state, AppState::Connecting(_))
    }

    pub fn push(&mut self, event: AppEvent) {
        self.events.push_back(event);
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.push(AppEvent::Exit);
            return;
        }

        let event = match &mut self.state {
            AppState::Menu if key.kind == KeyEventKind::Press => self.menu.handle_key(key.code),
            AppState::Playing(game) => handle_game_key(game, key, now),
            _ => None,
        };

        if let Some(event) = event {
            self.push(event);
        }
    }

    /// Runs the handshake for a pending online match. Blocks for at most the
    /// handshake timeout.
    pub fn connect(&mut self, clock: &dyn Clock) {
        let AppState::Connecting(setup) = &self.state else {
            return;
        };
        let setup = setup.clone();

        let Some(role) = setup.mode.role() else {
            self.start_match(&setup, None);
            return;
        };

        match OnlineSession::begin_session(
            role,
            setup.address.as_deref(),
            &self.config.session,
            clock,
        ) {
            Ok(session) => self.start_match(&setup, Some(session)),
            Err(err) => {
                log::warn!("Could not start online match: {}", err);
                self.push(AppEvent::MenuError(err.to_string()));
                self.state = AppState::Menu;
            }
        }
    }

    pub fn update(&mut self, now: Instant) {
        if let AppState::Playing(game) = &mut self.state {
            if let Some(event) = game.update(now) {
                self.push(event);
            }
        }
    }

    pub fn process_events(&mut self) {
        while let Some(event) = self.events.pop_front() {
            log::debug!("App event: {:?}", event);
            match event {
                AppEvent::StartGame(setup) => {
                    if setup.mode.role().is_some() {
                        self.state = AppState::Connecting(setup);
                    } else {
                        self.start_match(&setup, None);
                    }
                }
                AppEvent::ShowMenu(screen) => {
                    self.leave_match();
                    self.menu.show(screen);
                }
                AppEvent::MenuError(message) => {
                    self.leave_match();
                    self.menu.show_error(message);
                }
                AppEvent::ToggleSound => {
                    self.sound_on = !self.sound_on;
                    log::info!("Sound {}", if self.sound_on { "on" } else { "off" });
                }
                AppEvent::Exit => {
                    self.leave_match();
                    self.state = AppState::Exit;
                    self.events.clear();
                    return;
                }
            }
        }
    }

    fn start_match(&mut self, setup: &MatchSetup, session: Option<OnlineSession>) {
        let game = Match::new(
            setup,
            session,
            Input::new(self.config.key_hold()),
            self.config.session.countdown(),
            Instant::now(),
        );
        self.state = AppState::Playing(Box::new(game));
    }

    fn leave_match(&mut self) {
        if let AppState::Playing(game) = &mut self.state {
            game.close();
        }
        if !matches!(self.state, AppState::Exit) {
            self.state = AppState::Menu;
        }
    }
}

fn handle_game_key(game: &mut Match, key: KeyEvent, now: Instant) -> Option<AppEvent> {
    match key.kind {
        KeyEventKind::Release => {
            game.input.release(key.code);
            None
        }
        KeyEventKind::Press | KeyEventKind::Repeat => match key.code {
            KeyCode::Esc => Some(AppEvent::ShowMenu(MenuScreen::Main)),
            KeyCode::Enter if game.is_over() => Some(AppEvent::ShowMenu(MenuScreen::Main)),
            code => {
                game.input.press(code, now);
                None
            }
        },
    }
}
