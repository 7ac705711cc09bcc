use super::util::{downcast, parse_column, store_err, write_err};
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use chrono::NaiveDate;
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlPool, Row};

const USER_COLUMNS: &str = "id, national_id, first_name, last_name, address, email, \
birth_date, registration_date, credential, role";

pub struct MySqlUserRepo {
    pool: MySqlPool,
}

impl MySqlUserRepo {
    pub fn new(pool: MySqlPool) -> Self {
        MySqlUserRepo { pool }
    }

    fn row_to_user(row: MySqlRow) -> Result<User, DirectoryError> {
        let get_err = |e: sqlx::Error| store_err("decode user row", e);

        let column = |name: &str| -> Result<String, DirectoryError> {
            row.try_get(name).map_err(get_err)
        };

        let id = parse_column("id", column("id")?)?;
        let national_id = parse_column("national_id", column("national_id")?)?;
        let email = parse_column("email", column("email")?)?;
        let role = parse_column("role", column("role")?)?;
        let credential = column("credential")?;
        let birth_date: NaiveDate = row.try_get("birth_date").map_err(get_err)?;
        let registration_date: NaiveDate = row.try_get("registration_date").map_err(get_err)?;

        Ok(User {
            id,
            national_id,
            first_name: column("first_name")?,
            last_name: column("last_name")?,
            address: column("address")?,
            email,
            birth_date,
            registration_date,
            credential: Credential::from_encoded(credential),
            role,
        })
    }
}

#[async_trait::async_trait]
impl UserRepo for MySqlUserRepo {
    async fn insert_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        user: &User,
    ) -> Result<(), DirectoryError> {
        let tx = downcast(tx)?;

        sqlx::query(
            r#"
INSERT INTO users (id, national_id, first_name, last_name, address, email,
                   birth_date, registration_date, credential, role)
VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
"#,
        )
        .bind(user.id.as_str())
        .bind(user.national_id.as_str())
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.address)
        .bind(user.email.as_str())
        .bind(user.birth_date)
        .bind(user.registration_date)
        .bind(user.credential.encoded())
        .bind(user.role.as_str())
        .execute(tx.conn())
        .await
        .map_err(|e| write_err("insert user", user.id.as_str(), e))?;

        Ok(())
    }

    async fn get_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        user_id: &UserId,
    ) -> Result<Option<User>, DirectoryError> {
        let tx = downcast(tx)?;

        let row_opt = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ? FOR UPDATE"
        ))
        .bind(user_id.as_str())
        .fetch_optional(tx.conn())
        .await
        .map_err(|e| store_err("query user", e))?;

        row_opt.map(Self::row_to_user).transpose()
    }

    async fn update_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        user: &User,
    ) -> Result<u64, DirectoryError> {
        let tx = downcast(tx)?;

        let result = sqlx::query(
            r#"
UPDATE users
SET national_id = ?, first_name = ?, last_name = ?, address = ?, email = ?,
    birth_date = ?, registration_date = ?, credential = ?, role = ?
WHERE id = ?
"#,
        )
        .bind(user.national_id.as_str())
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.address)
        .bind(user.email.as_str())
        .bind(user.birth_date)
        .bind(user.registration_date)
        .bind(user.credential.encoded())
        .bind(user.role.as_str())
        .bind(user.id.as_str())
        .execute(tx.conn())
        .await
        .map_err(|e| write_err("update user", user.id.as_str(), e))?;

        Ok(result.rows_affected())
    }

    async fn delete_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        user_id: &UserId,
    ) -> Result<u64, DirectoryError> {
        let tx = downcast(tx)?;

        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(user_id.as_str())
            .execute(tx.conn())
            .await
            .map_err(|e| store_err("delete user", e))?;

        Ok(result.rows_affected())
    }

    async fn get(&self, user_id: &UserId) -> Result<Option<User>, DirectoryError> {
        let row_opt = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
            .bind(user_id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| store_err("query user", e))?;

        row_opt.map(Self::row_to_user).transpose()
    }

    async fn list(&self) -> Result<Vec<User>, DirectoryError> {
        let rows = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users"))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| store_err("list users", e))?;

        rows.into_iter().map(Self::row_to_user).collect()
    }
}
