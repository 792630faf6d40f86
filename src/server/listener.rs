use std::net::SocketAddr;
use std::rc::{Rc, Weak};
use std::sync::Arc;

use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Notify;
use tracing::{Instrument, error, info, info_span, warn};

use crate::http::connection::Connection;
use crate::server::ServerContext;
use crate::server::registry::ClientId;

/// Releases the registry slot of a connection when its task ends or is dropped.
struct ClientGuard {
    server: Weak<ServerContext>,
    id: ClientId,
}

impl Drop for ClientGuard {
    fn drop(&mut self) {
        if let Some(server) = self.server.upgrade() {
            server.release(self.id);
        }
    }
}

/// Remembers whether the current stretch at the connection cap was logged.
#[derive(Debug, Default)]
struct CapWarning {
    warned: bool,
}

impl CapWarning {
    /// Returns `true` only the first time it is called since the last reset.
    fn first_hit(&mut self) -> bool {
        !std::mem::replace(&mut self.warned, true)
    }

    fn reset(&mut self) {
        self.warned = false;
    }
}

/// Accepts connections until `shutdown` fires, then releases every live one.
pub(crate) async fn run(server: Rc<ServerContext>, listener: TcpListener, shutdown: Arc<Notify>) {
    let mut cap_warning = CapWarning::default();
    loop {
        if server.client_count() >= server.config.max_clients {
            // a stale slot permit can wake us while still at the cap
            if cap_warning.first_hit() {
                warn!(
                    max_clients = server.config.max_clients,
                    "Max clients reached, not accepting connections"
                );
            }
            tokio::select! {
                _ = server.slot_freed.notified() => continue,
                _ = shutdown.notified() => break,
            }
        }

        tokio::select! {
            _ = shutdown.notified() => break,
            accepted = listener.accept() => match accepted {
                Ok((socket, peer)) => {
                    cap_warning.reset();
                    spawn_client(&server, socket, peer);
                }
                Err(e) => error!("Error accepting client connection: {}", e),
            },
        }
    }

    let released = server.release_all();
    info!(released, "Server stopped");
}

fn spawn_client(server: &Rc<ServerContext>, socket: TcpStream, peer: SocketAddr) {
    let id = server.clients.borrow_mut().next_id();
    let guard = ClientGuard {
        server: Rc::downgrade(server),
        id,
    };
    let mut conn = Connection::new(socket, peer, Rc::downgrade(server));
    let span = info_span!("client", id, peer = %conn.peer());

    let handle = tokio::task::spawn_local(
        async move {
            let _guard = guard;
            if let Err(e) = conn.run().await {
                error!("Connection error: {:#}", e);
            }
        }
        .instrument(span),
    );

    server
        .clients
        .borrow_mut()
        .register(id, peer, Some(handle.abort_handle()));
}
