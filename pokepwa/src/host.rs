//! Host capabilities the worker relies on during its lifecycle.
//!
//! The host owns activation and client control. The worker only asks it to
//! skip the waiting phase after install and to claim open clients after
//! activation.
use async_trait::async_trait;
use indexmap::IndexMap;
use std::fmt;
use std::sync::Mutex;
use thiserror::Error;
use tracing::info;
use url::Url;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientId(Uuid);

impl ClientId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ClientId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Error, Debug)]
pub enum HostError {
    #[error("Host state lock poisoned: {0}")]
    Lock(String),
    #[error("Client not found: {0}")]
    ClientNotFound(ClientId),
}

#[async_trait]
pub trait Host: Send + Sync {
    /// Activate the installed version now instead of waiting for the pages
    /// controlled by the previous version to close.
    async fn skip_waiting(&self) -> Result<(), HostError>;

    /// Put every open client under the control of `version`. Returns how many
    /// clients were claimed.
    async fn claim_clients(&self, version: &str) -> Result<usize, HostError>;
}

#[derive(Debug)]
struct ClientState {
    url: Url,
    controller: Option<String>,
}

#[derive(Debug, Default)]
struct HostState {
    skip_waiting: bool,
    clients: IndexMap<ClientId, ClientState>,
}

/// In-process host: a skip-waiting flag plus a table of open clients and the
/// worker version controlling each of them.
#[derive(Debug, Default)]
pub struct LocalHost {
    state: Mutex<HostState>,
}

impl LocalHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an open page. New clients start uncontrolled.
    pub fn open_client(&self, url: Url) -> Result<ClientId, HostError> {
        let mut state = self
            .state
            .lock()
            .map_err(|e| HostError::Lock(e.to_string()))?;
        let id = ClientId::new();
        state.clients.insert(
            id,
            ClientState {
                url,
                controller: None,
            },
        );
        Ok(id)
    }

    pub fn close_client(&self, id: ClientId) -> Result<(), HostError> {
        let mut state = self
            .state
            .lock()
            .map_err(|e| HostError::Lock(e.to_string()))?;
        state
            .clients
            .shift_remove(&id)
            .map(|_| ())
            .ok_or(HostError::ClientNotFound(id))
    }

    /// Version controlling the client, if any.
    pub fn controller(&self, id: ClientId) -> Result<Option<String>, HostError> {
        let state = self
            .state
            .lock()
            .map_err(|e| HostError::Lock(e.to_string()))?;
        state
            .clients
            .get(&id)
            .map(|c| c.controller.clone())
            .ok_or(HostError::ClientNotFound(id))
    }

    pub fn client_url(&self, id: ClientId) -> Result<Url, HostError> {
        let state = self
            .state
            .lock()
            .map_err(|e| HostError::Lock(e.to_string()))?;
        state
            .clients
            .get(&id)
            .map(|c| c.url.clone())
            .ok_or(HostError::ClientNotFound(id))
    }

    pub fn skip_waiting_requested(&self) -> Result<bool, HostError> {
        let state = self
            .state
            .lock()
            .map_err(|e| HostError::Lock(e.to_string()))?;
        Ok(state.skip_waiting)
    }
}

#[async_trait]
impl Host for LocalHost {
    async fn skip_waiting(&self) -> Result<(), HostError> {
        let mut state = self
            .state
            .lock()
            .map_err(|e| HostError::Lock(e.to_string()))?;
        state.skip_waiting = true;
        Ok(())
    }

    async fn claim_clients(&self, version: &str) -> Result<usize, HostError> {
        let mut state = self
            .state
            .lock()
            .map_err(|e| HostError::Lock(e.to_string()))?;
        for client in state.clients.values_mut() {
            client.controller = Some(version.to_string());
        }
        let claimed = state.clients.len();
        info!("Claimed {} clients for {}", claimed, version);
        Ok(claimed)
    }
}
