use crossterm::event::KeyCode;
use dingdong::{GameMode, PeerRole};

use crate::config::MAX_END_SCORE;
use crate::events::{AppEvent, MatchSetup, MenuScreen};

pub const MAIN_ITEMS: [&str; 4] = ["Start", "Sound", "Credits", "Quit"];
pub const MODE_ITEMS: [&str; 5] = [
    "Single Player",
    "Practice",
    "Local Multiplayer",
    "Online Multiplayer",
    "Back",
];
pub const MULTIPLAYER_ITEMS: [&str; 3] = ["Host", "Join", "Back"];

const MODES: [Option<GameMode>; 5] = [
    Some(GameMode::SinglePlayer),
    Some(GameMode::Practice),
    Some(GameMode::LocalMultiplayer),
    None,
    None,
];

/// Menu navigation. Key handling only produces events; the app applies them.
#[derive(Debug)]
pub struct MenuState {
    pub screen: MenuScreen,
    pub selected: usize,
    pub input: String,
    pub error: Option<String>,
    /// None while the online role is still to be chosen.
    pending_mode: Option<GameMode>,
    online: bool,
    end_score: i32,
    default_end_score: i32,
    default_address: String,
}

impl MenuState {
    pub fn new(default_end_score: i32, default_address: String) -> Self {
        Self {
            screen: MenuScreen::Main,
            selected: 0,
            input: String::new(),
            error: None,
            pending_mode: None,
            online: false,
            end_score: default_end_score,
            default_end_score,
            default_address,
        }
    }

    pub fn show(&mut self, screen: MenuScreen) {
        self.screen = screen;
        self.selected = 0;
        self.input = match screen {
            MenuScreen::EndScore => self.default_end_score.to_string(),
            MenuScreen::Address => self.default_address.clone(),
            _ => String::new(),
        };
        if screen != MenuScreen::Main {
            self.error = None;
        }
    }

    pub fn show_error(&mut self, message: String) {
        self.show(MenuScreen::Main);
        self.error = Some(message);
    }

    pub fn item_count(&self) -> usize {
        match self.screen {
            MenuScreen::Main => MAIN_ITEMS.len(),
            MenuScreen::GameModes => MODE_ITEMS.len(),
            MenuScreen::MultiplayerOptions => MULTIPLAYER_ITEMS.len(),
            MenuScreen::Credits | MenuScreen::EndScore | MenuScreen::Address => 0,
        }
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Option<AppEvent> {
        match self.screen {
            MenuScreen::EndScore | MenuScreen::Address => self.handle_text_key(code),
            MenuScreen::Credits => match code {
                KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => {
                    Some(AppEvent::ShowMenu(MenuScreen::Main))
                }
                _ => None,
            },
            _ => self.handle_list_key(code),
        }
    }

    fn handle_list_key(&mut self, code: KeyCode) -> Option<AppEvent> {
        match code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected = (self.selected + 1).min(self.item_count().saturating_sub(1));
                None
            }
            KeyCode::Enter => self.select(),
            KeyCode::Esc | KeyCode::Char('q') => Some(match self.screen {
                MenuScreen::Main => AppEvent::Exit,
                MenuScreen::MultiplayerOptions => AppEvent::ShowMenu(MenuScreen::GameModes),
                _ => AppEvent::ShowMenu(MenuScreen::Main),
            }),
            _ => None,
        }
    }

    fn select(&mut self) -> Option<AppEvent> {
        match (self.screen, self.selected) {
            (MenuScreen::Main, 0) => Some(AppEvent::ShowMenu(MenuScreen::GameModes)),
            (MenuScreen::Main, 1) => Some(AppEvent::ToggleSound),
            (MenuScreen::Main, 2) => Some(AppEvent::ShowMenu(MenuScreen::Credits)),
            (MenuScreen::Main, _) => Some(AppEvent::Exit),
            (MenuScreen::GameModes, index) if index < 4 => {
                self.pending_mode = MODES[index];
                self.online = index == 3;
                Some(AppEvent::ShowMenu(MenuScreen::EndScore))
            }
            (MenuScreen::GameModes, _) => Some(AppEvent::ShowMenu(MenuScreen::Main)),
            (MenuScreen::MultiplayerOptions, 0) => {
                self.pending_mode = Some(GameMode::Online(PeerRole::Host));
                Some(self.start(None))
            }
            (MenuScreen::MultiplayerOptions, 1) => {
                self.pending_mode = Some(GameMode::Online(PeerRole::Join));
                Some(AppEvent::ShowMenu(MenuScreen::Address))
            }
            (MenuScreen::MultiplayerOptions, _) => Some(AppEvent::ShowMenu(MenuScreen::GameModes)),
            _ => None,
        }
    }

    fn handle_text_key(&mut self, code: KeyCode) -> Option<AppEvent> {
        match code {
            KeyCode::Esc => Some(AppEvent::ShowMenu(MenuScreen::GameModes)),
            KeyCode::Backspace => {
                self.input.pop();
                None
            }
            KeyCode::Char(c) if self.accepts(c) => {
                self.input.push(c);
                None
            }
            KeyCode::Enter => self.submit(),
            _ => None,
        }
    }

    fn accepts(&self, c: char) -> bool {
        match self.screen {
            MenuScreen::EndScore => c.is_ascii_digit() && self.input.len() < 2,
            _ => c.is_ascii_alphanumeric() || matches!(c, '.' | ':' | '-' | '[' | ']'),
        }
    }

    fn submit(&mut self) -> Option<AppEvent> {
        match self.screen {
            MenuScreen::EndScore => match self.input.parse::<i32>() {
                Ok(score) if (1..=MAX_END_SCORE).contains(&score) => {
                    self.end_score = score;
                    if self.online {
                        Some(AppEvent::ShowMenu(MenuScreen::MultiplayerOptions))
                    } else {
                        Some(self.start(None))
                    }
                }
                _ => {
                    self.error = Some(format!("End score must be between 1 and {}", MAX_END_SCORE));
                    None
                }
            },
            MenuScreen::Address => {
                let address = self.input.trim().to_string();
                if address.is_empty() {
                    self.error = Some("Enter the host's address".to_string());
                    return None;
                }
                Some(self.start(Some(address)))
            }
            _ => None,
        }
    }

    fn start(&self, address: Option<String>) -> AppEvent {
        match self.pending_mode {
            Some(mode) => AppEvent::StartGame(MatchSetup {
                mode,
                end_score: self.end_score,
                address,
            }),
            None => AppEvent::ShowMenu(MenuScreen::GameModes),
        }
    }
}
