use std::collections::BTreeMap;
use std::net::SocketAddr;

use tokio::task::AbortHandle;

/// Identifies one accepted connection. Ids grow monotonically, so ordering
/// by id is accept order.
pub type ClientId = u64;

#[derive(Debug)]
pub struct ClientEntry {
    pub peer: SocketAddr,
    abort: Option<AbortHandle>,
}

impl ClientEntry {
    /// Stops the connection task, closing its socket.
    pub fn abort(&self) {
        if let Some(handle) = &self.abort {
            handle.abort();
        }
    }
}

/// Live connections of one server, in accept order.
#[derive(Debug, Default)]
pub struct ClientRegistry {
    next_id: ClientId,
    clients: BTreeMap<ClientId, ClientEntry>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> ClientId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn register(&mut self, id: ClientId, peer: SocketAddr, abort: Option<AbortHandle>) {
        self.clients.insert(id, ClientEntry { peer, abort });
    }

    /// Removes `id`. Returns `None` when it was already gone, so calling this
    /// from more than one teardown path is harmless.
    pub fn remove(&mut self, id: ClientId) -> Option<ClientEntry> {
        self.clients.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    pub fn peers(&self) -> impl Iterator<Item = SocketAddr> + '_ {
        self.clients.values().map(|c| c.peer)
    }

    /// Empties the registry, oldest connection first.
    pub fn drain(&mut self) -> Vec<ClientEntry> {
        std::mem::take(&mut self.clients).into_values().collect()
    }
}
