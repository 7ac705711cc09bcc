use super::util::{downcast, parse_column, store_err, write_err};
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use sqlx::MySqlPool;

pub struct MySqlEquivalenceRepo {
    pool: MySqlPool,
}

impl MySqlEquivalenceRepo {
    pub fn new(pool: MySqlPool) -> Self {
        MySqlEquivalenceRepo { pool }
    }
}

#[async_trait::async_trait]
impl EquivalenceRepo for MySqlEquivalenceRepo {
    async fn insert_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        key: &str,
        user_id: &UserId,
    ) -> Result<(), DirectoryError> {
        let tx = downcast(tx)?;

        sqlx::query("INSERT INTO equivalence (equivalent_key, user_id) VALUES (?, ?)")
            .bind(key)
            .bind(user_id.as_str())
            .execute(tx.conn())
            .await
            .map_err(|e| write_err("insert equivalence", key, e))?;

        Ok(())
    }

    async fn delete_key_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        key: &str,
    ) -> Result<u64, DirectoryError> {
        let tx = downcast(tx)?;

        let result = sqlx::query("DELETE FROM equivalence WHERE equivalent_key = ?")
            .bind(key)
            .execute(tx.conn())
            .await
            .map_err(|e| store_err("delete equivalence", e))?;

        Ok(result.rows_affected())
    }

    async fn delete_for_user_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        user_id: &UserId,
    ) -> Result<u64, DirectoryError> {
        let tx = downcast(tx)?;

        let result = sqlx::query("DELETE FROM equivalence WHERE user_id = ?")
            .bind(user_id.as_str())
            .execute(tx.conn())
            .await
            .map_err(|e| store_err("delete equivalences", e))?;

        Ok(result.rows_affected())
    }

    async fn resolve(&self, key: &str) -> Result<Option<UserId>, DirectoryError> {
        let user_id = sqlx::query_scalar::<_, String>(
            "SELECT user_id FROM equivalence WHERE equivalent_key = ?",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| store_err("resolve equivalence", e))?;

        user_id.map(|raw| parse_column("user_id", raw)).transpose()
    }
}
