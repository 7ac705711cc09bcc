use crate::application_port::DirectoryError;
use crate::domain_model::{User, UserId};
use crate::domain_port::{StorageTx, TxBackend, TxManager};
use anyhow::anyhow;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{Mutex, MutexGuard, OwnedMutexGuard};

#[derive(Debug, Clone, Default)]
pub struct MemoryState {
    /// Insertion order is the listing order.
    pub users: Vec<User>,
    pub equivalences: HashMap<String, UserId>,
}

impl MemoryState {
    pub fn user(&self, user_id: &UserId) -> Option<&User> {
        self.users.iter().find(|u| &u.id == user_id)
    }
}

/// Shared handle to one in-memory database. Clones see the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
    closed: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub async fn read(&self) -> Result<MutexGuard<'_, MemoryState>, DirectoryError> {
        if self.is_closed() {
            return Err(DirectoryError::StorageUnavailable(
                "memory store is closed".to_string(),
            ));
        }
        Ok(self.state.lock().await)
    }
}

pub struct MemoryTxManager {
    store: MemoryStore,
}

impl MemoryTxManager {
    pub fn new(store: MemoryStore) -> Self {
        MemoryTxManager { store }
    }
}

#[async_trait::async_trait]
impl TxManager for MemoryTxManager {
    async fn begin<'t>(&'t self) -> anyhow::Result<Box<dyn StorageTx<'t> + 't>> {
        if self.store.is_closed() {
            return Err(anyhow!("memory store is closed"));
        }
        let guard = self.store.state.clone().lock_owned().await;
        let staged = guard.clone();
        Ok(Box::new(MemoryTx { guard, staged }))
    }

    async fn close(&self) {
        self.store.closed.store(true, Ordering::SeqCst);
    }
}

/// Holds the store lock for its whole life, so transactions are serialized.
/// Writes go to a private copy that replaces the shared state on commit.
pub struct MemoryTx {
    guard: OwnedMutexGuard<MemoryState>,
    staged: MemoryState,
}

impl MemoryTx {
    pub fn state(&mut self) -> &mut MemoryState {
        &mut self.staged
    }
}

#[async_trait::async_trait]
impl<'t> StorageTx<'t> for MemoryTx {
    fn backend(&self) -> TxBackend {
        TxBackend::Memory
    }

    async fn commit(self: Box<Self>) -> anyhow::Result<()> {
        let MemoryTx { mut guard, staged } = *self;
        *guard = staged;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> anyhow::Result<()> {
        Ok(())
    }
}

pub(super) fn downcast<'a, 't>(
    tx: &'a mut dyn StorageTx<'t>,
) -> Result<&'a mut MemoryTx, DirectoryError> {
    if tx.backend() != TxBackend::Memory {
        return Err(DirectoryError::StorageUnavailable(format!(
            "expected a memory transaction, got {:?}",
            tx.backend()
        )));
    }
    // SAFETY: `MemoryTx` is the only `StorageTx` reporting `TxBackend::Memory`.
    unsafe {
        let p = tx as *mut dyn StorageTx<'t>;
        let p = p as *mut MemoryTx;
        Ok(&mut *p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn commit_publishes_staged_writes() {
        let store = MemoryStore::new();
        let tx_manager = MemoryTxManager::new(store.clone());

        let mut tx = tx_manager.begin().await.unwrap();
        downcast(&mut *tx)
            .unwrap()
            .state()
            .equivalences
            .insert("k".to_string(), "U0001".parse().unwrap());
        tx.commit().await.unwrap();
        assert_eq!(store.read().await.unwrap().equivalences.len(), 1);
    }

    #[tokio::test]
    async fn dropped_or_rolled_back_transactions_leave_no_trace() {
        let store = MemoryStore::new();
        let tx_manager = MemoryTxManager::new(store.clone());

        {
            let mut tx = tx_manager.begin().await.unwrap();
            downcast(&mut *tx)
                .unwrap()
                .state()
                .equivalences
                .insert("dropped".to_string(), "U0001".parse().unwrap());
        }

        let mut tx = tx_manager.begin().await.unwrap();
        downcast(&mut *tx)
            .unwrap()
            .state()
            .equivalences
            .insert("rolled-back".to_string(), "U0001".parse().unwrap());
        tx.rollback().await.unwrap();

        assert!(store.read().await.unwrap().equivalences.is_empty());
    }

    #[tokio::test]
    async fn closed_store_refuses_work() {
        let store = MemoryStore::new();
        let tx_manager = MemoryTxManager::new(store.clone());
        tx_manager.close().await;

        assert!(tx_manager.begin().await.is_err());
        assert!(matches!(
            store.read().await,
            Err(DirectoryError::StorageUnavailable(_))
        ));
    }
}
