use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::repo_tx::StorageTx;

#[async_trait::async_trait]
pub trait UserRepo: Send + Sync {
    /// Fails with `DuplicateUser` when the id, NIF or email is already taken.
    async fn insert_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        user: &User,
    ) -> Result<(), DirectoryError>;

    async fn get_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        user_id: &UserId,
    ) -> Result<Option<User>, DirectoryError>;

    /// Rewrites every column except the id. Returns the number of rows matched.
    async fn update_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        user: &User,
    ) -> Result<u64, DirectoryError>;

    async fn delete_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        user_id: &UserId,
    ) -> Result<u64, DirectoryError>;

    async fn get(&self, user_id: &UserId) -> Result<Option<User>, DirectoryError>;

    async fn list(&self) -> Result<Vec<User>, DirectoryError>;
}
