#![allow(dead_code)]

pub mod strategies;

use async_trait::async_trait;
use parking_lot::Mutex;
use quest_core::config::{CoreConfig, RetryConfig};
use quest_core::database::{ClientError, DatabaseClient};
use quest_core::resilience::ResilientDataAccess;
use quest_core::{ConfigManager, SystemContext};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// In-memory client whose ping results can be scripted.
///
/// Unscripted pings succeed while connected and fail with kind `Closed` otherwise.
#[derive(Default)]
pub struct ScriptedClient {
    ping_script: Mutex<VecDeque<Result<(), ClientError>>>,
    connected: AtomicBool,
    pub connects: AtomicUsize,
    pub disconnects: AtomicUsize,
    pub pings: AtomicUsize,
}

impl ScriptedClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn script_pings(&self, results: impl IntoIterator<Item = Result<(), ClientError>>) {
        self.ping_script.lock().extend(results);
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn disconnects(&self) -> usize {
        self.disconnects.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DatabaseClient for ScriptedClient {
    async fn connect(&self) -> Result<(), ClientError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), ClientError> {
        self.disconnects.fetch_add(1, Ordering::SeqCst);
        self.connected.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn ping(&self) -> Result<(), ClientError> {
        self.pings.fetch_add(1, Ordering::SeqCst);
        if let Some(result) = self.ping_script.lock().pop_front() {
            return result;
        }
        if self.is_connected() {
            Ok(())
        } else {
            Err(ClientError::closed("Connection is closed"))
        }
    }
}

/// Operation returning scripted results in order, counting invocations.
pub struct ScriptedOperation<T> {
    results: Mutex<VecDeque<Result<T, ClientError>>>,
    calls: AtomicUsize,
}

impl<T> ScriptedOperation<T> {
    pub fn new(results: Vec<Result<T, ClientError>>) -> Self {
        Self {
            results: Mutex::new(results.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub async fn run(&self) -> Result<T, ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.results
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::new("operation script exhausted")))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

pub fn closed() -> ClientError {
    ClientError::closed("Connection is closed")
}

pub fn data_access(client: Arc<ScriptedClient>) -> ResilientDataAccess {
    ResilientDataAccess::new(client, RetryConfig::default())
}

pub async fn system_context(client: Arc<ScriptedClient>) -> SystemContext {
    let manager = ConfigManager::from_config(CoreConfig::default(), "test")
        .expect("default configuration is valid");
    SystemContext::with_client(manager, client)
        .await
        .expect("system context builds")
}
