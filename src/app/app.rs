use crate::application_impl::*;
use crate::application_port::*;
use crate::infra_memory::*;
use crate::infra_mysql::*;
use crate::logger::*;
use crate::settings::{Accounts, Settings};
use sqlx::mysql::MySqlPoolOptions;
use std::sync::Arc;

impl From<&Accounts> for DefaultAccounts {
    fn from(accounts: &Accounts) -> Self {
        DefaultAccounts {
            admin_name: accounts.admin_name.clone(),
            guest_name: accounts.guest_name.clone(),
            default_password: accounts.default_password.clone(),
        }
    }
}

/// Owns the process's single directory handle. Callers share it through
/// `user_directory` and release storage with `shutdown`.
pub struct App {
    pub user_directory: Arc<dyn UserDirectory>,
}

impl App {
    pub async fn try_new(settings: &Settings) -> Result<Self, DirectoryError> {
        let defaults = DefaultAccounts::from(&settings.user);

        let directory = match settings.storage.backend.as_str() {
            "mysql" => {
                let pool = MySqlPoolOptions::new()
                    .max_connections(settings.storage.max_connections)
                    .connect(&settings.storage.url)
                    .await
                    .map_err(|e| {
                        error!(error = %e, "cannot connect to MySQL");
                        DirectoryError::Initialization(format!("connect: {e}"))
                    })?;
                ensure_schema(&pool)
                    .await
                    .map_err(|e| DirectoryError::Initialization(e.to_string()))?;
                RealUserDirectory::init(
                    Arc::new(MySqlUserRepo::new(pool.clone())),
                    Arc::new(MySqlEquivalenceRepo::new(pool.clone())),
                    Arc::new(MySqlTxManager::new(pool)),
                    &defaults,
                )
                .await?
            }
            "memory" => {
                let store = MemoryStore::new();
                RealUserDirectory::init(
                    Arc::new(MemoryUserRepo::new(store.clone())),
                    Arc::new(MemoryEquivalenceRepo::new(store.clone())),
                    Arc::new(MemoryTxManager::new(store)),
                    &defaults,
                )
                .await?
            }
            other => {
                return Err(DirectoryError::Initialization(format!(
                    "unknown storage backend: {other}"
                )));
            }
        };

        info!(backend = %settings.storage.backend, "user directory ready");

        Ok(App {
            user_directory: Arc::new(directory),
        })
    }

    pub async fn shutdown(&self) {
        self.user_directory.close().await;
    }
}
