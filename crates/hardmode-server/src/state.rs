use std::sync::{Arc, Mutex, PoisonError};

use hardmode_core::Store;

use crate::error::{AppError, AppResult};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// The store holds one SQLite connection; requests take turns on it and
/// SQLite's own locking handles anything beyond that.
#[derive(Clone)]
pub struct AppState {
    store: Arc<Mutex<Store>>,
}

impl AppState {
    pub fn new(store: Store) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
        }
    }

    /// Run one core operation on the blocking pool.
    ///
    /// A lock poisoned by a panicked operation is recovered; unfinished
    /// transactions roll back when they are dropped during unwinding.
    pub async fn with_store<T, F>(&self, op: F) -> AppResult<T>
    where
        F: FnOnce(&Store) -> hardmode_core::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || {
            let guard = store.lock().unwrap_or_else(|poisoned| {
                tracing::warn!("recovering store after a panicked request");
                PoisonError::into_inner(poisoned)
            });
            op(&guard).map_err(AppError::from)
        })
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn store_stays_usable_after_a_panicked_operation() {
        let state = AppState::new(Store::open_memory().unwrap());

        let store = Arc::clone(&state.store);
        let crashed = std::thread::spawn(move || {
            let _guard = store.lock().unwrap();
            panic!("request handler panicked");
        })
        .join();
        assert!(crashed.is_err());
        assert!(state.store.is_poisoned());

        let tasks = state.with_store(|store| store.tasks().list()).await.unwrap();
        assert!(tasks.is_empty());
    }
}
