/// Lobby configuration constants.
/// Number of sessions a lobby holds. A lobby at this size is "ready"
/// (the game can start); a lobby below it is still matchmaking.
pub const MAX_LOBBY_PLAYERS: usize = 2;
