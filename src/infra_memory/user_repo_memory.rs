use super::store::{MemoryState, MemoryStore, downcast};
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;

pub struct MemoryUserRepo {
    store: MemoryStore,
}

impl MemoryUserRepo {
    pub fn new(store: MemoryStore) -> Self {
        MemoryUserRepo { store }
    }

    /// Same uniqueness rules as the primary and unique keys of the SQL schema.
    fn check_unique(
        state: &MemoryState,
        user: &User,
        skip: Option<&UserId>,
    ) -> Result<(), DirectoryError> {
        for other in state.users.iter().filter(|u| Some(&u.id) != skip) {
            if other.id == user.id {
                return Err(DirectoryError::DuplicateUser(user.id.to_string()));
            }
            if other.national_id == user.national_id {
                return Err(DirectoryError::DuplicateUser(user.national_id.to_string()));
            }
            if other.email == user.email {
                return Err(DirectoryError::DuplicateUser(user.email.to_string()));
            }
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl UserRepo for MemoryUserRepo {
    async fn insert_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        user: &User,
    ) -> Result<(), DirectoryError> {
        let state = downcast(tx)?.state();
        Self::check_unique(state, user, None)?;
        state.users.push(user.clone());
        Ok(())
    }

    async fn get_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        user_id: &UserId,
    ) -> Result<Option<User>, DirectoryError> {
        let state = downcast(tx)?.state();
        Ok(state.user(user_id).cloned())
    }

    async fn update_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        user: &User,
    ) -> Result<u64, DirectoryError> {
        let state = downcast(tx)?.state();
        Self::check_unique(state, user, Some(&user.id))?;
        match state.users.iter_mut().find(|u| u.id == user.id) {
            Some(stored) => {
                *stored = user.clone();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        user_id: &UserId,
    ) -> Result<u64, DirectoryError> {
        let state = downcast(tx)?.state();
        let before = state.users.len();
        state.users.retain(|u| &u.id != user_id);
        Ok((before - state.users.len()) as u64)
    }

    async fn get(&self, user_id: &UserId) -> Result<Option<User>, DirectoryError> {
        let state = self.store.read().await?;
        Ok(state.user(user_id).cloned())
    }

    async fn list(&self) -> Result<Vec<User>, DirectoryError> {
        let state = self.store.read().await?;
        Ok(state.users.clone())
    }
}
