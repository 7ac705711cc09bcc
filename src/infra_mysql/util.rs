use super::repo_tx_mysql::MySqlTx;
use crate::application_port::DirectoryError;
use crate::domain_port::*;
use sqlx::mysql::MySqlDatabaseError;
use std::fmt::Display;
use std::str::FromStr;

pub(super) fn downcast<'a, 't>(
    tx: &'a mut dyn StorageTx<'t>,
) -> Result<&'a mut MySqlTx<'t>, DirectoryError> {
    if tx.backend() != TxBackend::MySql {
        return Err(DirectoryError::StorageUnavailable(format!(
            "expected a MySQL transaction, got {:?}",
            tx.backend()
        )));
    }
    // SAFETY: `MySqlTx` is the only `StorageTx` reporting `TxBackend::MySql`.
    unsafe {
        let p = tx as *mut dyn StorageTx<'t>;
        let p = p as *mut MySqlTx<'t>;
        Ok(&mut *p)
    }
}

pub(super) fn is_dup_key(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db) = err {
        if let Some(mysql_err) = db.try_downcast_ref::<MySqlDatabaseError>() {
            return mysql_err.number() == 1062; // ER_DUP_ENTRY
        }
    }

    false
}

pub(super) fn store_err(context: &str, err: sqlx::Error) -> DirectoryError {
    DirectoryError::StorageUnavailable(format!("{context}: {err}"))
}

/// Unique-key violations become `DuplicateUser`, everything else is a storage failure.
pub(super) fn write_err(context: &str, key: &str, err: sqlx::Error) -> DirectoryError {
    if is_dup_key(&err) {
        DirectoryError::DuplicateUser(key.to_string())
    } else {
        store_err(context, err)
    }
}

/// Stored values go through the same checks as user input.
pub(super) fn parse_column<T>(column: &str, raw: String) -> Result<T, DirectoryError>
where
    T: FromStr,
    T::Err: Display,
{
    raw.parse().map_err(|e| {
        DirectoryError::StorageUnavailable(format!("decode column {column} ({raw:?}): {e}"))
    })
}
