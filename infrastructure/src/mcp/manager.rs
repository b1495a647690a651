//! Connection lifecycle manager.
//!
//! Owns the keyed cache of live connections to tool-provider servers.
//! Before a cached connection is reused it is probed with a `ping`
//! round-trip. Any non-success, an error or a timeout alike, means the
//! connection is unhealthy: the entry is silently discarded and
//! recreated. Probe failures never surface to callers.
//!
//! Construction and handshake failures do propagate: retrying is a
//! caller policy, not a lifecycle one.

use std::collections::HashMap;
use std::sync::Arc;

use conduit_domain::ServerDescriptor;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::mcp::client::McpClient;
use crate::mcp::error::{McpError, Result};
use crate::mcp::transport::Transport;

/// Sole owner and sole mutator of the connection cache.
pub struct ConnectionManager {
    connections: Mutex<HashMap<String, Arc<McpClient>>>,
}

impl ConnectionManager {
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(HashMap::new()),
        }
    }

    /// Return a live connection for the descriptor, reusing the cached
    /// one when its probe succeeds and (re)creating it otherwise.
    pub async fn acquire(&self, server: &ServerDescriptor) -> Result<Arc<McpClient>> {
        let key = server.cache_key();
        let mut connections = self.connections.lock().await;

        if let Some(client) = connections.get(&key).cloned() {
            match client.ping().await {
                Ok(()) => {
                    debug!(server = %server.name, "Reusing cached connection");
                    return Ok(client);
                }
                Err(e) => {
                    warn!(server = %server.name, error = %e, "Liveness probe failed, reconnecting");
                    connections.remove(&key);
                }
            }
        }

        let transport = open_transport(server).await?;
        let client = Arc::new(McpClient::initialize(transport, &server.name).await?);
        connections.insert(key, Arc::clone(&client));
        info!(server = %server.name, "Connected to tool server");
        Ok(client)
    }

    /// Explicit teardown. Idempotent: a miss is only a warning.
    ///
    /// Dropping the cache entry closes the transport (and kills a
    /// spawned server) once in-flight users of the handle finish.
    pub async fn release(&self, key: &str) {
        let mut connections = self.connections.lock().await;
        match connections.remove(key) {
            Some(client) => {
                info!(server = %client.server_name(), "Closed connection");
            }
            None => {
                warn!("No connection found for key: {}", key);
            }
        }
    }

    /// Tear down and re-establish a descriptor's connection.
    pub async fn restart(&self, server: &ServerDescriptor) -> Result<Arc<McpClient>> {
        info!(server = %server.name, "Restarting tool server connection");
        self.release(&server.cache_key()).await;
        self.acquire(server).await
    }

    /// Number of cached connections.
    pub async fn active_connections(&self) -> usize {
        self.connections.lock().await.len()
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Select and open a transport from the descriptor's fields.
async fn open_transport(server: &ServerDescriptor) -> Result<Transport> {
    if let Some(base_url) = &server.base_url {
        Transport::connect(base_url).await
    } else if let Some(command) = &server.command {
        Transport::spawn(command, &server.args, &server.env).await
    } else {
        Err(McpError::NoTransport(server.name.clone()))
    }
}
