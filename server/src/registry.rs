use std::{
    fmt,
    net::SocketAddr,
    sync::{Arc, Mutex, PoisonError},
};

use log::debug;
use shared::{
    models::jobs::job::Job,
    networking::{result::NetworkingResult, write_job},
};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use uuid::Uuid;

pub type ConnectionId = Uuid;
pub type BoxedWriter = Box<dyn AsyncWrite + Send + Unpin>;

/// Sending half of a worker connection. The receive loop owns the other half.
#[derive(Clone)]
pub struct Connection {
    pub id: ConnectionId,
    pub peer: SocketAddr,
    writer: Arc<tokio::sync::Mutex<BoxedWriter>>,
}

impl Connection {
    pub fn new(peer: SocketAddr, writer: BoxedWriter) -> Self {
        Self {
            id: Uuid::new_v4(),
            peer,
            writer: Arc::new(tokio::sync::Mutex::new(writer)),
        }
    }

    pub async fn send_job(&self, job: &Job) -> NetworkingResult<()> {
        let mut writer = self.writer.lock().await;
        write_job(&mut *writer, job).await
    }

    /// Shuts the write side down, which the worker reads as end of work.
    pub async fn close(&self) {
        let mut writer = self.writer.lock().await;
        if let Err(e) = writer.shutdown().await {
            debug!("Closing connection {} failed: {}", self.peer, e);
        }
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.id)
            .field("peer", &self.peer)
            .finish()
    }
}

/// Live worker connections. Every operation holds the lock only for its own
/// duration, never across an await.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: Mutex<Vec<Connection>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, connection: Connection) -> usize {
        let mut connections = self.lock();
        connections.push(connection);
        connections.len()
    }

    pub fn remove(&self, id: ConnectionId) -> Option<Connection> {
        let mut connections = self.lock();
        let index = connections.iter().position(|c| c.id == id)?;
        Some(connections.remove(index))
    }

    /// Connections in registration order at this instant.
    pub fn snapshot(&self) -> Vec<Connection> {
        self.lock().clone()
    }

    pub fn drain(&self) -> Vec<Connection> {
        std::mem::take(&mut *self.lock())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Connection>> {
        self.connections.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connection(port: u16) -> (Connection, tokio::io::DuplexStream) {
        let (near, far) = tokio::io::duplex(1024);
        let peer = SocketAddr::from(([127, 0, 0, 1], port));
        (Connection::new(peer, Box::new(near)), far)
    }

    #[test]
    fn remove_takes_out_only_the_matching_connection() {
        let registry = ConnectionRegistry::new();
        let (first, _a) = connection(1);
        let (second, _b) = connection(2);
        registry.add(first.clone());
        registry.add(second.clone());

        let removed = registry.remove(first.id).unwrap();
        assert_eq!(removed.peer, first.peer);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.snapshot()[0].id, second.id);
        assert!(registry.remove(first.id).is_none());
    }

    #[test]
    fn snapshot_does_not_follow_later_changes() {
        let registry = ConnectionRegistry::new();
        let (first, _a) = connection(1);
        registry.add(first);
        let snapshot = registry.snapshot();

        let (second, _b) = connection(2);
        registry.add(second);
        assert_eq!(snapshot.len(), 1);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn drain_empties_the_registry() {
        let registry = ConnectionRegistry::new();
        let (first, _a) = connection(1);
        registry.add(first);
        assert_eq!(registry.drain().len(), 1);
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn close_signals_end_of_stream_to_the_peer() {
        use tokio::io::AsyncReadExt;

        let (conn, mut far) = connection(1);
        conn.close().await;
        let mut buf = [0u8; 1];
        assert_eq!(far.read(&mut buf).await.unwrap(), 0);
    }
}
