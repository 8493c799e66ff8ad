//! Connected clients and answer fan-out.

use tracing::trace;

use crate::view_info::ViewInfo;

/// Receiving end of broadcasts, one per bound client.
///
/// Equality must be identity: two sinks are equal iff they are the same connection.
pub trait InfoSink: PartialEq {
    fn send_view_info(&self, info: &ViewInfo);

    fn send_done(&self);
}

/// Live set of bound clients, in bind order.
#[derive(Debug)]
pub struct ClientRegistry<S> {
    clients: Vec<S>,
}

impl<S: InfoSink> ClientRegistry<S> {
    pub fn new() -> Self {
        Self {
            clients: Vec::new(),
        }
    }

    pub fn register(&mut self, client: S) {
        self.clients.push(client);
    }

    /// Removes `client` by identity. Removing a client twice is a no-op.
    pub fn unregister(&mut self, client: &S) {
        self.clients.retain(|c| c != client);
    }

    pub fn clear(&mut self) {
        self.clients.clear();
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    pub fn broadcast_info(&self, info: &ViewInfo) {
        trace!(
            "broadcasting view {} to {} clients",
            info.view_id,
            self.clients.len()
        );
        for client in &self.clients {
            client.send_view_info(info);
        }
    }

    pub fn broadcast_done(&self) {
        for client in &self.clients {
            client.send_done();
        }
    }
}

impl<S: InfoSink> Default for ClientRegistry<S> {
    fn default() -> Self {
        Self::new()
    }
}
