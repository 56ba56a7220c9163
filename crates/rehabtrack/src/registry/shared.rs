//! A registry handle that can be shared between tasks.
//!
//! Each call takes the lock for its whole read-modify-save span, so two
//! concurrent registrations in one process cannot overwrite each other.
//! Calls that touch the store run on tokio's blocking pool.

use std::sync::Arc;

use tokio::sync::Mutex;

use super::{Registry, RegistryStats, Store};
use crate::account::{Account, NewAccount};
use crate::error::{Error, Result};

/// Cloneable, lock-guarded handle to a [`Registry`].
#[derive(Debug)]
pub struct SharedRegistry<S: Store> {
    inner: Arc<Mutex<Registry<S>>>,
}

impl<S: Store> Clone for SharedRegistry<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: Store + 'static> SharedRegistry<S> {
    /// Wrap a loaded registry.
    #[must_use]
    pub fn new(registry: Registry<S>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(registry)),
        }
    }

    /// Check a username and password.
    ///
    /// # Errors
    ///
    /// See [`Registry::authenticate`].
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<Account> {
        let registry = self.inner.lock().await;
        registry.authenticate(username, password).cloned()
    }

    /// Register a new account and persist the registry.
    ///
    /// # Errors
    ///
    /// See [`Registry::register`].
    pub async fn register(&self, request: NewAccount) -> Result<Account> {
        let mut registry = Arc::clone(&self.inner).lock_owned().await;
        tokio::task::spawn_blocking(move || registry.register(request).cloned())
            .await
            .map_err(|e| Error::internal(format!("registration task failed: {e}")))?
    }

    /// Resolve a doctor's roster into `(username, account)` pairs.
    ///
    /// # Errors
    ///
    /// See [`Registry::patients_of`].
    pub async fn patients_of(&self, doctor_username: &str) -> Result<Vec<(String, Account)>> {
        let registry = self.inner.lock().await;
        let roster = registry
            .patients_of(doctor_username)?
            .into_iter()
            .map(|entry| (entry.username.to_string(), entry.account.clone()))
            .collect();
        Ok(roster)
    }

    /// Look up an account by username.
    pub async fn get(&self, username: &str) -> Option<Account> {
        self.inner.lock().await.get(username).cloned()
    }

    /// Compute summary counts.
    pub async fn stats(&self) -> RegistryStats {
        self.inner.lock().await.stats()
    }

    /// Re-read the registry from its store.
    ///
    /// # Errors
    ///
    /// Returns an error if the reload task cannot complete.
    pub async fn reload(&self) -> Result<()> {
        let mut registry = Arc::clone(&self.inner).lock_owned().await;
        tokio::task::spawn_blocking(move || registry.reload())
            .await
            .map_err(|e| Error::internal(format!("reload task failed: {e}")))
    }
}
