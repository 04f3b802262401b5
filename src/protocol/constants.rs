/// Protocol constants: commands, reply statuses, and lobby roles.
///
/// Every enum carries its wire tag as an explicit `u8` discriminant.
/// Tags start at 1 so that 0 never decodes to a valid value.

/// Commands a client may issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Command {
    Get = 1,
    Post = 2,
    Exchange = 3,

    JoinLobby = 4,
    IsLobbyReady = 5,
    GetLobbyPlayers = 6,
    LeaveLobby = 7,

    Disconnect = 8,
}

impl Command {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            1 => Some(Self::Get),
            2 => Some(Self::Post),
            3 => Some(Self::Exchange),
            4 => Some(Self::JoinLobby),
            5 => Some(Self::IsLobbyReady),
            6 => Some(Self::GetLobbyPlayers),
            7 => Some(Self::LeaveLobby),
            8 => Some(Self::Disconnect),
            _ => None,
        }
    }
}

/// Statuses a reply may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Status {
    ConnectionSuccess = 1,
    InLobbyWaiting = 2,

    GameStart = 3,
    LobbyPlayerDisconnected = 4,

    CommandSuccess = 5,
    CommandFail = 6,

    BadCommand = 7,
}

impl Status {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            1 => Some(Self::ConnectionSuccess),
            2 => Some(Self::InLobbyWaiting),
            3 => Some(Self::GameStart),
            4 => Some(Self::LobbyPlayerDisconnected),
            5 => Some(Self::CommandSuccess),
            6 => Some(Self::CommandFail),
            7 => Some(Self::BadCommand),
            _ => None,
        }
    }
}

/// A session's position within its lobby. `Host` created the lobby,
/// `NonHost` joined an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Role {
    Host = 1,
    NonHost = 2,
    #[default]
    Unassigned = 3,
}

impl Role {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            1 => Some(Self::Host),
            2 => Some(Self::NonHost),
            3 => Some(Self::Unassigned),
            _ => None,
        }
    }
}
