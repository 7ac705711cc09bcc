use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::repo_tx::StorageTx;

#[async_trait::async_trait]
pub trait EquivalenceRepo: Send + Sync {
    /// Fails with `DuplicateUser` when the key already maps to a user.
    async fn insert_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        key: &str,
        user_id: &UserId,
    ) -> Result<(), DirectoryError>;

    async fn delete_key_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        key: &str,
    ) -> Result<u64, DirectoryError>;

    async fn delete_for_user_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        user_id: &UserId,
    ) -> Result<u64, DirectoryError>;

    async fn resolve(&self, key: &str) -> Result<Option<UserId>, DirectoryError>;
}
