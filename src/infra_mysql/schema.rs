use super::util::store_err;
use crate::application_port::DirectoryError;
use sqlx::MySqlPool;
use tracing::info;

const CREATE_USERS: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id VARCHAR(5) NOT NULL,
    national_id VARCHAR(9) NOT NULL,
    first_name VARCHAR(45) NOT NULL,
    last_name VARCHAR(45) NOT NULL,
    address VARCHAR(45) NOT NULL,
    email VARCHAR(45) NOT NULL,
    birth_date DATE NOT NULL,
    registration_date DATE NOT NULL,
    credential VARCHAR(255) NOT NULL,
    role VARCHAR(20) NOT NULL,
    PRIMARY KEY (id),
    UNIQUE KEY uk_users_national_id (national_id),
    UNIQUE KEY uk_users_email (email)
)
"#;

const CREATE_EQUIVALENCE: &str = r#"
CREATE TABLE IF NOT EXISTS equivalence (
    equivalent_key VARCHAR(45) NOT NULL,
    user_id VARCHAR(5) NOT NULL,
    PRIMARY KEY (equivalent_key),
    KEY idx_equivalence_user_id (user_id),
    CONSTRAINT fk_equivalence_user FOREIGN KEY (user_id) REFERENCES users (id)
)
"#;

/// Creates the `users` and `equivalence` tables when they are missing.
pub async fn ensure_schema(pool: &MySqlPool) -> Result<(), DirectoryError> {
    sqlx::query(CREATE_USERS)
        .execute(pool)
        .await
        .map_err(|e| store_err("create users table", e))?;
    sqlx::query(CREATE_EQUIVALENCE)
        .execute(pool)
        .await
        .map_err(|e| store_err("create equivalence table", e))?;

    info!("user directory schema ready");
    Ok(())
}
