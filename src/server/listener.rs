/// TCP listener: binds the configured address and turns every accepted
/// connection into one `ClientSession` actor.
///
/// Admission control is the socket backlog and nothing else; there is no
/// cap on the number of concurrent sessions.
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use log::{debug, info, warn};
use tokio::net::{TcpListener, TcpSocket};

use super::session::ClientSession;
use super::state::AppState;

pub struct Listener {
    listener: TcpListener,
    app: Arc<AppState>,
}

impl Listener {
    /// Bind `addr` with the given backlog. Port 0 binds an ephemeral port;
    /// `local_addr` reports the one actually chosen.
    pub fn bind(addr: SocketAddr, backlog: u32, app: Arc<AppState>) -> io::Result<Self> {
        let socket = match addr {
            SocketAddr::V4(_) => TcpSocket::new_v4()?,
            SocketAddr::V6(_) => TcpSocket::new_v6()?,
        };
        socket.set_reuseaddr(true)?;
        socket.bind(addr)?;
        let listener = socket.listen(backlog)?;
        Ok(Listener { listener, app })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept loop. Runs for the life of the process; a failed accept is
    /// logged and the loop keeps serving.
    pub async fn run(self) {
        if let Ok(addr) = self.local_addr() {
            info!("[Listener] server started at {addr}");
        }
        debug!("[Listener] waiting for connection...");
        loop {
            match self.listener.accept().await {
                Ok((stream, peer_addr)) => {
                    ClientSession::spawn(stream, peer_addr, self.app.clone());
                }
                Err(e) => warn!("[Listener] accept failed: {e}"),
            }
        }
    }
}
