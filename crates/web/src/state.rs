//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::WakalniConfig;
use crate::db::{FixtureError, Store};
use crate::services::{UserApiClient, UserApiError};

/// Error creating the application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("fixture error: {0}")]
    Fixture(#[from] FixtureError),
    #[error("user API client error: {0}")]
    UserApi(#[from] UserApiError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the in-memory store, the optional user backend and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: WakalniConfig,
    store: Store,
    user_api: Option<UserApiClient>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// Loads the fixtures (honouring `data_dir`) and builds the user backend
    /// client when one is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if a fixture is invalid or the user API client
    /// cannot be built.
    pub fn new(config: WakalniConfig) -> Result<Self, StateError> {
        let store = Store::load(config.data_dir.as_deref())?;
        let user_api = config.user_api.as_ref().map(UserApiClient::new).transpose()?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                user_api,
            }),
        })
    }

    /// Get a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &WakalniConfig {
        &self.inner.config
    }

    /// Get a reference to the in-memory store.
    #[must_use]
    pub fn store(&self) -> &Store {
        &self.inner.store
    }

    /// Get the user backend client, if one is configured.
    #[must_use]
    pub fn user_api(&self) -> Option<&UserApiClient> {
        self.inner.user_api.as_ref()
    }

    /// Wait out the configured latency of a simulated network call.
    pub async fn simulate_latency(&self) {
        let delay = self.inner.config.simulated_latency;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}
