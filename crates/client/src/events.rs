use dingdong::GameMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuScreen {
    Main,
    GameModes,
    Credits,
    MultiplayerOptions,
    EndScore,
    Address,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSetup {
    pub mode: GameMode,
    pub end_score: i32,
    /// Only set when joining.
    pub address: Option<String>,
}

/// Everything that changes what the app shows goes through one queue of
/// these, consumed once per frame by the main loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    StartGame(MatchSetup),
    ShowMenu(MenuScreen),
    /// Back to the main menu with a message, e.g. a failed handshake.
    MenuError(String),
    ToggleSound,
    Exit,
}
