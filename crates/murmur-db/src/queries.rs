use crate::Database;
use crate::models::{AccountRow, MessageRow};
use anyhow::Result;
use rusqlite::{Connection, ErrorCode, Row, ffi};
use tracing::debug;

impl Database {
    // -- Accounts --

    /// Insert an account unless the username is taken.
    /// Returns `None` when it is; the lookup and insert share one transaction.
    pub fn create_account(&self, username: &str, password: &str) -> Result<Option<AccountRow>> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            if query_account_by_username(&tx, username)?.is_some() {
                return Ok(None);
            }

            let row = insert_account(&tx, username, password)?;
            if row.is_some() {
                tx.commit()?;
            }
            Ok(row)
        })
    }

    pub fn get_account_by_username(&self, username: &str) -> Result<Option<AccountRow>> {
        self.with_conn(|conn| query_account_by_username(conn, username))
    }

    pub fn get_account_by_id(&self, account_id: i64) -> Result<Option<AccountRow>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT account_id, username, password FROM account WHERE account_id = ?1",
                [account_id],
                account_from_row,
            )
            .optional()
        })
    }

    // -- Messages --

    /// Returns `None` if `posted_by` names no account (foreign key violation).
    pub fn insert_message(
        &self,
        posted_by: i64,
        message_text: &str,
        time_posted_epoch: i64,
    ) -> Result<Option<MessageRow>> {
        self.with_conn_mut(|conn| {
            let inserted = conn.execute(
                "INSERT INTO message (posted_by, message_text, time_posted_epoch) VALUES (?1, ?2, ?3)",
                rusqlite::params![posted_by, message_text, time_posted_epoch],
            );
            match inserted {
                Ok(_) => {}
                Err(e) if is_constraint(&e, ffi::SQLITE_CONSTRAINT_FOREIGNKEY) => return Ok(None),
                Err(e) => return Err(e.into()),
            }

            Ok(Some(MessageRow {
                message_id: conn.last_insert_rowid(),
                posted_by,
                message_text: message_text.to_string(),
                time_posted_epoch,
            }))
        })
    }

    pub fn get_messages(&self) -> Result<Vec<MessageRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT message_id, posted_by, message_text, time_posted_epoch
                 FROM message
                 ORDER BY message_id",
            )?;

            let rows = stmt
                .query_map([], message_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    pub fn get_message_by_id(&self, message_id: i64) -> Result<Option<MessageRow>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT message_id, posted_by, message_text, time_posted_epoch
                 FROM message WHERE message_id = ?1",
                [message_id],
                message_from_row,
            )
            .optional()
        })
    }

    pub fn get_messages_by_author(&self, posted_by: i64) -> Result<Vec<MessageRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT message_id, posted_by, message_text, time_posted_epoch
                 FROM message
                 WHERE posted_by = ?1
                 ORDER BY message_id",
            )?;

            let rows = stmt
                .query_map([posted_by], message_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    /// Returns whether a row was updated.
    pub fn update_message_text(&self, message_id: i64, message_text: &str) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let changed = conn.execute(
                "UPDATE message SET message_text = ?1 WHERE message_id = ?2",
                rusqlite::params![message_text, message_id],
            )?;
            Ok(changed > 0)
        })
    }

    /// Returns whether a row was deleted.
    pub fn delete_message(&self, message_id: i64) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let changed = conn.execute("DELETE FROM message WHERE message_id = ?1", [message_id])?;
            Ok(changed > 0)
        })
    }
}

/// Insert without the username pre-check; a `UNIQUE` violation is `None`.
fn insert_account(conn: &Connection, username: &str, password: &str) -> Result<Option<AccountRow>> {
    let inserted = conn.execute(
        "INSERT INTO account (username, password) VALUES (?1, ?2)",
        (username, password),
    );
    match inserted {
        Ok(_) => {}
        Err(e) if is_constraint(&e, ffi::SQLITE_CONSTRAINT_UNIQUE) => return Ok(None),
        Err(e) => return Err(e.into()),
    }

    let account_id = conn.last_insert_rowid();
    debug!("Inserted account {} ({})", account_id, username);
    Ok(Some(AccountRow {
        account_id,
        username: username.to_string(),
        password: password.to_string(),
    }))
}

fn query_account_by_username(conn: &Connection, username: &str) -> Result<Option<AccountRow>> {
    conn.query_row(
        "SELECT account_id, username, password FROM account WHERE username = ?1",
        [username],
        account_from_row,
    )
    .optional()
}

fn account_from_row(row: &Row<'_>) -> rusqlite::Result<AccountRow> {
    Ok(AccountRow {
        account_id: row.get(0)?,
        username: row.get(1)?,
        password: row.get(2)?,
    })
}

fn message_from_row(row: &Row<'_>) -> rusqlite::Result<MessageRow> {
    Ok(MessageRow {
        message_id: row.get(0)?,
        posted_by: row.get(1)?,
        message_text: row.get(2)?,
        time_posted_epoch: row.get(3)?,
    })
}

fn is_constraint(err: &rusqlite::Error, extended_code: std::ffi::c_int) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == ErrorCode::ConstraintViolation && e.extended_code == extended_code
    )
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
