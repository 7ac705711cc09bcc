use super::store::{MemoryStore, downcast};
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;

pub struct MemoryEquivalenceRepo {
    store: MemoryStore,
}

impl MemoryEquivalenceRepo {
    pub fn new(store: MemoryStore) -> Self {
        MemoryEquivalenceRepo { store }
    }
}

#[async_trait::async_trait]
impl EquivalenceRepo for MemoryEquivalenceRepo {
    async fn insert_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        key: &str,
        user_id: &UserId,
    ) -> Result<(), DirectoryError> {
        let state = downcast(tx)?.state();
        if state.equivalences.contains_key(key) {
            return Err(DirectoryError::DuplicateUser(key.to_string()));
        }
        state.equivalences.insert(key.to_string(), user_id.clone());
        Ok(())
    }

    async fn delete_key_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        key: &str,
    ) -> Result<u64, DirectoryError> {
        let state = downcast(tx)?.state();
        Ok(state.equivalences.remove(key).map_or(0, |_| 1))
    }

    async fn delete_for_user_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        user_id: &UserId,
    ) -> Result<u64, DirectoryError> {
        let state = downcast(tx)?.state();
        let before = state.equivalences.len();
        state.equivalences.retain(|_, id| id != user_id);
        Ok((before - state.equivalences.len()) as u64)
    }

    async fn resolve(&self, key: &str) -> Result<Option<UserId>, DirectoryError> {
        let state = self.store.read().await?;
        Ok(state.equivalences.get(key).cloned())
    }
}
