/// Per-connection session actor.
///
/// Owns one side of the framed TCP stream and the session's data queue,
/// and drives the receive/dispatch/reply loop: every decoded request is
/// handled synchronously and answered with exactly one reply before the
/// next frame is processed. Lobby membership and peer queues are reached
/// through the injected `AppState`.
use std::net::SocketAddr;
use std::sync::Arc;

use actix::io::{FramedWrite, WriteHandler};
use actix::prelude::*;
use bytes::Bytes;
use log::{debug, info, warn};
use tokio::io::{WriteHalf, split};
use tokio::net::TcpStream;
use tokio_util::codec::FramedRead;

use super::queue::DataQueue;
use super::state::AppState;
use crate::config::lobby::MAX_LOBBY_PLAYERS;
use crate::config::session::MAX_DATA_QUEUE_SIZE;
use crate::protocol::codec::RelayCodec;
use crate::protocol::{Command, ProtocolError, Reply, Request, Role, Status};

/// Connection lifecycle. `Active` is the only state that processes
/// commands; teardown moves through `Closing` to `Closed` exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnState {
    Connecting,
    Active,
    Closing,
    Closed,
}

pub struct ClientSession {
    id: u64,
    peer_addr: SocketAddr,
    conn_state: ConnState,
    role: Role,
    lobby_id: Option<u64>,
    queue: Arc<DataQueue>,
    app: Arc<AppState>,
    framed: FramedWrite<Reply, WriteHalf<TcpStream>, RelayCodec>,
}

impl ClientSession {
    /// Wrap an accepted connection in a new session actor.
    pub fn spawn(stream: TcpStream, peer_addr: SocketAddr, app: Arc<AppState>) {
        ClientSession::create(move |ctx| {
            let (read_half, write_half) = split(stream);
            ClientSession::add_stream(FramedRead::new(read_half, RelayCodec), ctx);
            ClientSession::new(
                peer_addr,
                app,
                FramedWrite::new(write_half, RelayCodec, ctx),
            )
        });
    }

    fn new(
        peer_addr: SocketAddr,
        app: Arc<AppState>,
        framed: FramedWrite<Reply, WriteHalf<TcpStream>, RelayCodec>,
    ) -> Self {
        let id = app.ids.generate();
        info!("[Session {id}] new connection from {peer_addr}");
        ClientSession {
            id,
            peer_addr,
            conn_state: ConnState::Connecting,
            role: Role::Unassigned,
            lobby_id: None,
            queue: Arc::new(DataQueue::new(MAX_DATA_QUEUE_SIZE)),
            app,
            framed,
        }
    }

    /// Runs exactly once per session, whichever path stopped the actor:
    /// leaves the lobby if still a member (possibly destroying it) and
    /// deregisters the data queue. The transport closes when the framed
    /// halves drop with the actor.
    fn teardown(&mut self) {
        if self.conn_state == ConnState::Closed {
            return;
        }
        self.conn_state = ConnState::Closing;
        info!("[Session {}] client stopping {}", self.id, self.peer_addr);
        if let Some(lobby_id) = self.lobby_id.take() {
            self.app.lobbies.leave(lobby_id, self.id);
        }
        self.app.sessions.deregister(self.id);
        self.conn_state = ConnState::Closed;
    }

    fn join_lobby(&mut self) -> Reply {
        info!("[Session {}] request to join lobby", self.id);
        if self.lobby_id.is_some() {
            return Reply::bad_command();
        }
        self.queue.clear();
        let assignment = self.app.lobbies.join(self.id, MAX_LOBBY_PLAYERS);
        self.lobby_id = Some(assignment.lobby_id);
        self.role = assignment.role;
        let status = if assignment.filled {
            Status::GameStart
        } else {
            Status::InLobbyWaiting
        };
        Reply::joined(status, self.role)
    }

    /// Polling check used by clients while matchmaking: waiting while the
    /// lobby has space, game start once it is full.
    fn poll_lobby_ready(&self) -> Reply {
        let Some(lobby_id) = self.lobby_id else {
            return Reply::bad_command();
        };
        if self.app.lobbies.has_space(lobby_id) {
            Reply::status(Status::InLobbyWaiting)
        } else {
            Reply::status(Status::GameStart)
        }
    }

    /// Post: stage a payload on the own queue for peers to collect.
    fn enqueue_data(&mut self, payload: Option<Bytes>) -> Reply {
        let Some(lobby_id) = self.lobby_id else {
            return Reply::bad_command();
        };
        let Some(payload) = payload else {
            return Reply::bad_command();
        };
        if self.evicted_on_vacancy(lobby_id) {
            return Reply::status(Status::LobbyPlayerDisconnected);
        }
        match self.queue.push(payload) {
            Ok(()) => Reply::status(Status::CommandSuccess),
            Err(_) => Reply::status(Status::CommandFail),
        }
    }

    /// Get: drain one payload from each lobby peer with a non-empty queue.
    fn dequeue_data(&mut self) -> Reply {
        let Some(lobby_id) = self.lobby_id else {
            return Reply::bad_command();
        };
        if self.evicted_on_vacancy(lobby_id) {
            return Reply::status(Status::LobbyPlayerDisconnected);
        }
        Reply::with_payloads(self.pop_from_lobby_peers(lobby_id))
    }

    /// Exchange: post the own payload and drain the peers in one round
    /// trip. A full own queue fails the command before any peer is popped.
    fn exchange_data(&mut self, payload: Option<Bytes>) -> Reply {
        let Some(lobby_id) = self.lobby_id else {
            return Reply::bad_command();
        };
        let Some(payload) = payload else {
            return Reply::bad_command();
        };
        if self.evicted_on_vacancy(lobby_id) {
            return Reply::status(Status::LobbyPlayerDisconnected);
        }
        if self.queue.push(payload).is_err() {
            return Reply::status(Status::CommandFail);
        }
        Reply::with_payloads(self.pop_from_lobby_peers(lobby_id))
    }

    fn leave_lobby(&mut self) -> Reply {
        info!("[Session {}] request to leave lobby", self.id);
        match self.lobby_id.take() {
            Some(lobby_id) => {
                self.app.lobbies.leave(lobby_id, self.id);
                Reply::status(Status::CommandSuccess)
            }
            None => Reply::bad_command(),
        }
    }

    fn lobby_players(&self) -> Reply {
        let Some(lobby_id) = self.lobby_id else {
            return Reply::bad_command();
        };
        Reply::lobby_members(self.app.lobbies.members(lobby_id))
    }

    /// Vacancy check shared by Post/Get/Exchange. A lobby with a free slot
    /// means a peer departed since the last command, so the caller is
    /// evicted instead of exchanging data with nobody.
    fn evicted_on_vacancy(&mut self, lobby_id: u64) -> bool {
        if self.app.lobbies.evict_if_vacant(lobby_id, self.id) {
            self.lobby_id = None;
            true
        } else {
            false
        }
    }

    /// One pop per peer with a non-empty queue, in lobby join order.
    fn pop_from_lobby_peers(&self, lobby_id: u64) -> Vec<Bytes> {
        let mut payloads = Vec::new();
        for peer_id in self.app.lobbies.peers_of(lobby_id, self.id) {
            if let Some(queue) = self.app.sessions.queue_of(peer_id) {
                if let Some(payload) = queue.pop() {
                    payloads.push(payload);
                }
            }
        }
        payloads
    }
}

impl Actor for ClientSession {
    type Context = Context<Self>;

    /// Register the session and greet the client with its assigned id. A
    /// greeting that fails to send surfaces through the write handler and
    /// stops the actor.
    fn started(&mut self, _ctx: &mut Self::Context) {
        self.app.sessions.register(self.id, self.queue.clone());
        self.framed.write(Reply::connection_success(self.id));
        self.conn_state = ConnState::Active;
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        self.teardown();
    }
}

impl StreamHandler<Result<Request, ProtocolError>> for ClientSession {
    fn handle(&mut self, msg: Result<Request, ProtocolError>, ctx: &mut Self::Context) {
        let request = match msg {
            Ok(request) => request,
            Err(e) => {
                // Malformed input is terminal for this connection only.
                warn!("[Session {}] protocol violation: {e}", self.id);
                ctx.stop();
                return;
            }
        };
        debug!("[Session {}] received {:?}", self.id, request.command);

        let reply = match request.command {
            Command::Disconnect => {
                info!("[Session {}] request to disconnect", self.id);
                ctx.stop();
                return;
            }
            Command::JoinLobby => self.join_lobby(),
            Command::IsLobbyReady => self.poll_lobby_ready(),
            Command::Post => self.enqueue_data(request.payload),
            Command::Get => self.dequeue_data(),
            Command::Exchange => self.exchange_data(request.payload),
            Command::LeaveLobby => self.leave_lobby(),
            Command::GetLobbyPlayers => self.lobby_players(),
        };
        debug!("[Session {}] sending {:?}", self.id, reply.status);
        self.framed.write(reply);
    }

    /// The read side ended: the peer closed the stream or the transport
    /// failed underneath it.
    fn finished(&mut self, ctx: &mut Self::Context) {
        warn!(
            "[Session {}] lost client connection: {}",
            self.id, self.peer_addr
        );
        ctx.stop();
    }
}

impl WriteHandler<ProtocolError> for ClientSession {
    fn error(&mut self, err: ProtocolError, _ctx: &mut Self::Context) -> Running {
        warn!("[Session {}] unable to send data: {err}", self.id);
        Running::Stop
    }
}
