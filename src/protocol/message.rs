use bytes::Bytes;

use super::constants::{Command, Role, Status};

/// Side-channel value carried next to the payload(s) of an envelope.
///
/// Replies use it for the assigned session id (connection greeting), the
/// assigned role (lobby join), or the member list (lobby roster). Requests
/// may carry one too; the server currently ignores it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AdditionalInfo {
    #[default]
    None,
    SessionId(u64),
    Role(Role),
    Sessions(Vec<u64>),
}

/// Client → server envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub command: Command,
    pub additional_info: AdditionalInfo,
    pub payload: Option<Bytes>,
}

impl Request {
    pub fn new(command: Command) -> Self {
        Request {
            command,
            additional_info: AdditionalInfo::None,
            payload: None,
        }
    }

    pub fn with_payload(command: Command, payload: Bytes) -> Self {
        Request {
            command,
            additional_info: AdditionalInfo::None,
            payload: Some(payload),
        }
    }
}

/// Server → client envelope. Carries zero or more payloads so a single
/// `Get`/`Exchange` round trip can drain every peer queue at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: Status,
    pub additional_info: AdditionalInfo,
    pub payload_list: Vec<Bytes>,
}

impl Reply {
    /// Bare reply: a status with no info and no payloads.
    pub fn status(status: Status) -> Self {
        Reply {
            status,
            additional_info: AdditionalInfo::None,
            payload_list: Vec::new(),
        }
    }

    /// Greeting sent once per connection, carrying the assigned session id.
    pub fn connection_success(session_id: u64) -> Self {
        Reply {
            status: Status::ConnectionSuccess,
            additional_info: AdditionalInfo::SessionId(session_id),
            payload_list: Vec::new(),
        }
    }

    /// Join outcome: waiting or game-start, plus the assigned role.
    pub fn joined(status: Status, role: Role) -> Self {
        Reply {
            status,
            additional_info: AdditionalInfo::Role(role),
            payload_list: Vec::new(),
        }
    }

    /// Successful drain carrying the payloads popped from peer queues.
    pub fn with_payloads(payload_list: Vec<Bytes>) -> Self {
        Reply {
            status: Status::CommandSuccess,
            additional_info: AdditionalInfo::None,
            payload_list,
        }
    }

    /// Current lobby roster, in join order.
    pub fn lobby_members(sessions: Vec<u64>) -> Self {
        Reply {
            status: Status::CommandSuccess,
            additional_info: AdditionalInfo::Sessions(sessions),
            payload_list: Vec::new(),
        }
    }

    pub fn bad_command() -> Self {
        Self::status(Status::BadCommand)
    }
}
