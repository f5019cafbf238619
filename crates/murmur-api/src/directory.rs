use std::sync::Arc;

use tracing::{debug, info};

use murmur_db::Database;
use murmur_db::models::AccountRow;
use murmur_types::models::Account;

use crate::error::RegisterError;

pub const MIN_PASSWORD_CHARS: usize = 4;

/// Resolve an account by id.
///
/// This is the only thing the message board needs from the directory, so
/// the board can be exercised against a stand-in.
pub trait AccountLookup: Send + Sync {
    fn account_by_id(&self, account_id: i64) -> anyhow::Result<Option<Account>>;
}

/// Registration, login and lookup of accounts.
#[derive(Clone)]
pub struct AccountDirectory {
    db: Arc<Database>,
}

impl AccountDirectory {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Validate and persist a new account. Any id on `candidate` is ignored.
    pub fn register(&self, candidate: Account) -> Result<Account, RegisterError> {
        if candidate.username.trim().is_empty()
            || candidate.password.chars().count() < MIN_PASSWORD_CHARS
        {
            debug!("Rejected registration for '{}': invalid account", candidate.username);
            return Err(RegisterError::InvalidAccount);
        }

        let row = self
            .db
            .create_account(&candidate.username, &candidate.password)?
            .ok_or_else(|| {
                debug!("Rejected registration for '{}': username taken", candidate.username);
                RegisterError::DuplicateUsername
            })?;

        info!("Registered account {} ({})", row.account_id, row.username);
        Ok(account_from_row(row))
    }

    /// Passwords are compared as plain strings. Unknown usernames and wrong
    /// passwords both yield `None`.
    pub fn login(&self, username: &str, password: &str) -> anyhow::Result<Option<Account>> {
        let account = self
            .db
            .get_account_by_username(username)?
            .filter(|row| row.password == password)
            .map(account_from_row);

        if account.is_none() {
            debug!("Failed login for '{}'", username);
        }
        Ok(account)
    }

    pub fn get_by_id(&self, account_id: i64) -> anyhow::Result<Option<Account>> {
        Ok(self.db.get_account_by_id(account_id)?.map(account_from_row))
    }
}

impl AccountLookup for AccountDirectory {
    fn account_by_id(&self, account_id: i64) -> anyhow::Result<Option<Account>> {
        self.get_by_id(account_id)
    }
}

fn account_from_row(row: AccountRow) -> Account {
    Account {
        id: Some(row.account_id),
        username: row.username,
        password: row.password,
    }
}
