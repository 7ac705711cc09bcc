use crate::application_port::{DefaultAccounts, DirectoryError, UserDirectory};
use crate::domain_model::*;
use crate::domain_port::{EquivalenceRepo, StorageTx, TxManager, UserRepo};
use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub const ADMIN_ID: &str = "AAA0A";
pub const GUEST_ID: &str = "III0I";

const DEFAULT_ADDRESS: &str = "Iglesia, 0, 30012, Murcia, España";

pub struct RealUserDirectory {
    user_repo: Arc<dyn UserRepo>,
    equivalence_repo: Arc<dyn EquivalenceRepo>,
    tx_manager: Arc<dyn TxManager>,
}

impl RealUserDirectory {
    pub fn new(
        user_repo: Arc<dyn UserRepo>,
        equivalence_repo: Arc<dyn EquivalenceRepo>,
        tx_manager: Arc<dyn TxManager>,
    ) -> RealUserDirectory {
        RealUserDirectory {
            user_repo,
            equivalence_repo,
            tx_manager,
        }
    }

    /// Builds a directory and makes sure the default accounts exist.
    ///
    /// Any failure here is reported as `Initialization`: the directory is not
    /// usable.
    pub async fn init(
        user_repo: Arc<dyn UserRepo>,
        equivalence_repo: Arc<dyn EquivalenceRepo>,
        tx_manager: Arc<dyn TxManager>,
        defaults: &DefaultAccounts,
    ) -> Result<RealUserDirectory, DirectoryError> {
        let directory = Self::new(user_repo, equivalence_repo, tx_manager);
        directory.seed_defaults(defaults).await.map_err(|e| {
            error!(error = %e, "user directory initialization failed");
            DirectoryError::Initialization(e.to_string())
        })?;
        Ok(directory)
    }

    /// Writes the admin and guest accounts in one transaction unless either
    /// default id is already present. Returns whether anything was written.
    pub async fn seed_defaults(&self, defaults: &DefaultAccounts) -> Result<bool, DirectoryError> {
        let admin_id: UserId = ADMIN_ID.parse()?;
        let guest_id: UserId = GUEST_ID.parse()?;

        if self.user_repo.get(&admin_id).await?.is_some()
            || self.user_repo.get(&guest_id).await?.is_some()
        {
            debug!("default accounts already present");
            return Ok(false);
        }

        let credential = Credential::from_plain(&defaults.default_password)?;
        let today = Utc::now().date_naive();
        let accounts = default_accounts(
            defaults,
            admin_id.clone(),
            guest_id.clone(),
            credential,
            today,
        )?;

        match self.insert_defaults(&accounts).await {
            Ok(()) => {}
            Err(DirectoryError::DuplicateUser(key)) => {
                // Only a seeder that got there first may hold the default keys.
                if self.user_repo.get(&admin_id).await?.is_some()
                    && self.user_repo.get(&guest_id).await?.is_some()
                {
                    warn!(%key, "default accounts seeded concurrently");
                    return Ok(false);
                }
                error!(%key, "default account key already belongs to another user");
                return Err(DirectoryError::DuplicateUser(key));
            }
            Err(e) => return Err(e),
        }

        info!(admin = ADMIN_ID, guest = GUEST_ID, "default accounts seeded");
        Ok(true)
    }

    async fn insert_defaults(&self, accounts: &[User]) -> Result<(), DirectoryError> {
        for user in accounts {
            user.validate()?;
        }
        let mut tx = self.begin().await?;
        for user in accounts {
            self.insert_in_tx(&mut *tx, user).await?;
        }
        commit(tx).await
    }

    async fn begin(&self) -> Result<Box<dyn StorageTx<'_> + '_>, DirectoryError> {
        self.tx_manager
            .begin()
            .await
            .map_err(|e| DirectoryError::StorageUnavailable(e.to_string()))
    }

    /// User row first, then its three equivalence entries.
    async fn insert_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        user: &User,
    ) -> Result<(), DirectoryError> {
        self.user_repo.insert_in_tx(tx, user).await?;
        for key in user.equivalence_keys() {
            self.equivalence_repo.insert_in_tx(tx, key, &user.id).await?;
        }
        Ok(())
    }

    async fn replace_key_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        old_key: &str,
        new_key: &str,
        user_id: &UserId,
    ) -> Result<(), DirectoryError> {
        if old_key == new_key {
            return Ok(());
        }
        self.equivalence_repo.delete_key_in_tx(tx, old_key).await?;
        self.equivalence_repo.insert_in_tx(tx, new_key, user_id).await
    }

    async fn create_inner(&self, user: User) -> Result<(), DirectoryError> {
        user.validate()?;

        let mut tx = self.begin().await?;
        if self.user_repo.get_in_tx(&mut *tx, &user.id).await?.is_some() {
            return Err(DirectoryError::DuplicateUser(user.id.to_string()));
        }
        self.insert_in_tx(&mut *tx, &user).await?;
        commit(tx).await?;

        info!(user_id = %user.id, role = %user.role, "user created");
        Ok(())
    }

    async fn delete_inner(&self, user_id: &UserId) -> Result<User, DirectoryError> {
        let mut tx = self.begin().await?;
        let user = self
            .user_repo
            .get_in_tx(&mut *tx, user_id)
            .await?
            .ok_or_else(|| DirectoryError::NotFound(user_id.to_string()))?;

        let keys = self
            .equivalence_repo
            .delete_for_user_in_tx(&mut *tx, user_id)
            .await?;
        self.user_repo.delete_in_tx(&mut *tx, user_id).await?;
        commit(tx).await?;

        info!(%user_id, keys, "user deleted");
        Ok(user)
    }

    async fn update_inner(&self, user: User) -> Result<(), DirectoryError> {
        user.validate()?;

        let mut tx = self.begin().await?;
        let stored = self
            .user_repo
            .get_in_tx(&mut *tx, &user.id)
            .await?
            .ok_or_else(|| DirectoryError::NotFound(user.id.to_string()))?;

        let updated = User {
            registration_date: stored.registration_date,
            ..user
        };
        self.user_repo.update_in_tx(&mut *tx, &updated).await?;
        self.replace_key_in_tx(
            &mut *tx,
            stored.national_id.as_str(),
            updated.national_id.as_str(),
            &updated.id,
        )
        .await?;
        self.replace_key_in_tx(
            &mut *tx,
            stored.email.as_str(),
            updated.email.as_str(),
            &updated.id,
        )
        .await?;
        commit(tx).await?;

        info!(user_id = %updated.id, "user updated");
        Ok(())
    }
}

#[async_trait::async_trait]
impl UserDirectory for RealUserDirectory {
    async fn create(&self, user: User) -> Result<(), DirectoryError> {
        let user_id = user.id.clone();
        self.create_inner(user)
            .await
            .inspect_err(|e| warn!(%user_id, error = %e, "create failed"))
    }

    async fn fetch_by_id(&self, user_id: &UserId) -> Result<Option<User>, DirectoryError> {
        debug!(%user_id, "fetch user");
        self.user_repo
            .get(user_id)
            .await
            .inspect_err(|e| warn!(%user_id, error = %e, "fetch failed"))
    }

    async fn fetch_all(&self) -> Result<Vec<User>, DirectoryError> {
        let users = self
            .user_repo
            .list()
            .await
            .inspect_err(|e| warn!(error = %e, "fetch all failed"))?;
        debug!(count = users.len(), "fetched all users");
        Ok(users)
    }

    async fn resolve_equivalent(&self, key: &str) -> Result<Option<UserId>, DirectoryError> {
        let key = normalize_key(key);
        debug!(%key, "resolve equivalent");
        self.equivalence_repo
            .resolve(&key)
            .await
            .inspect_err(|e| warn!(%key, error = %e, "resolve failed"))
    }

    async fn delete(&self, user_id: &UserId) -> Result<User, DirectoryError> {
        self.delete_inner(user_id)
            .await
            .inspect_err(|e| warn!(%user_id, error = %e, "delete failed"))
    }

    async fn update(&self, user: User) -> Result<(), DirectoryError> {
        let user_id = user.id.clone();
        self.update_inner(user)
            .await
            .inspect_err(|e| warn!(%user_id, error = %e, "update failed"))
    }

    async fn close(&self) {
        self.tx_manager.close().await;
        info!("user directory closed");
    }
}

async fn commit(tx: Box<dyn StorageTx<'_> + '_>) -> Result<(), DirectoryError> {
    tx.commit()
        .await
        .map_err(|e| DirectoryError::StorageUnavailable(e.to_string()))
}

/// Ids and NIFs are stored upper-cased, emails lower-cased.
fn normalize_key(key: &str) -> String {
    if let Ok(id) = key.parse::<UserId>() {
        return id.to_string();
    }
    if let Ok(nif) = key.parse::<Nif>() {
        return nif.to_string();
    }
    if let Ok(email) = key.parse::<Email>() {
        return email.to_string();
    }
    key.trim().to_string()
}

fn default_accounts(
    defaults: &DefaultAccounts,
    admin_id: UserId,
    guest_id: UserId,
    credential: Credential,
    today: NaiveDate,
) -> Result<[User; 2], DirectoryError> {
    let admin = User {
        id: admin_id,
        national_id: "76543210A".parse()?,
        first_name: defaults.admin_name.clone(),
        last_name: "Admin Admin".to_string(),
        address: DEFAULT_ADDRESS.to_string(),
        email: "jv.admin@gmail.com".parse()?,
        birth_date: today,
        registration_date: today,
        credential: credential.clone(),
        role: UserRole::Admin,
    };
    let guest = User {
        id: guest_id,
        national_id: "06543210I".parse()?,
        first_name: defaults.guest_name.clone(),
        last_name: "Invitado Invitado".to_string(),
        address: DEFAULT_ADDRESS.to_string(),
        email: "jv.invitado@gmail.com".parse()?,
        birth_date: today,
        registration_date: today,
        credential,
        role: UserRole::Guest,
    };
    Ok([admin, guest])
}
