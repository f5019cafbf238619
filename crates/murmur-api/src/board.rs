use std::sync::Arc;

use tracing::{debug, info};

use murmur_db::Database;
use murmur_db::models::MessageRow;
use murmur_types::models::Message;

use crate::directory::AccountLookup;
use crate::error::{CreateError, UpdateError};

pub const MAX_MESSAGE_CHARS: usize = 255;

/// Message storage with authorship checked against an [`AccountLookup`].
pub struct MessageBoard<L> {
    db: Arc<Database>,
    accounts: L,
}

impl<L: AccountLookup> MessageBoard<L> {
    pub fn new(db: Arc<Database>, accounts: L) -> Self {
        Self { db, accounts }
    }

    /// Validate and persist a new message. Text is checked before the
    /// author; a missing author is `InvalidAuthor`. `posted_at` defaults to now.
    pub fn create(
        &self,
        text: &str,
        posted_by: Option<i64>,
        posted_at: Option<i64>,
    ) -> Result<Message, CreateError> {
        if !is_valid_text(text) {
            return Err(CreateError::InvalidText);
        }

        let Some(posted_by) = posted_by else {
            return Err(CreateError::InvalidAuthor);
        };
        if self.accounts.account_by_id(posted_by)?.is_none() {
            debug!("Rejected message from unknown account {}", posted_by);
            return Err(CreateError::InvalidAuthor);
        }

        let posted_at = posted_at.unwrap_or_else(|| chrono::Utc::now().timestamp());

        // The foreign key on posted_by backs up the lookup above.
        let row = self
            .db
            .insert_message(posted_by, text, posted_at)?
            .ok_or(CreateError::InvalidAuthor)?;

        info!("Account {} posted message {}", row.posted_by, row.message_id);
        Ok(message_from_row(row))
    }

    /// All messages in insertion order.
    pub fn get_all(&self) -> anyhow::Result<Vec<Message>> {
        Ok(self.db.get_messages()?.into_iter().map(message_from_row).collect())
    }

    pub fn get_by_id(&self, message_id: i64) -> anyhow::Result<Option<Message>> {
        Ok(self.db.get_message_by_id(message_id)?.map(message_from_row))
    }

    /// Returns whether a message was removed.
    pub fn delete(&self, message_id: i64) -> anyhow::Result<bool> {
        let deleted = self.db.delete_message(message_id)?;
        if deleted {
            info!("Deleted message {}", message_id);
        }
        Ok(deleted)
    }

    /// Replace a message's text, leaving author and timestamp untouched.
    pub fn update_text(&self, message_id: i64, new_text: &str) -> Result<(), UpdateError> {
        if !is_valid_text(new_text) {
            return Err(UpdateError::InvalidText);
        }

        if !self.db.update_message_text(message_id, new_text)? {
            return Err(UpdateError::NotFound);
        }

        info!("Updated text of message {}", message_id);
        Ok(())
    }

    /// Empty when the account does not exist.
    pub fn get_by_author(&self, account_id: i64) -> anyhow::Result<Vec<Message>> {
        if self.accounts.account_by_id(account_id)?.is_none() {
            return Ok(Vec::new());
        }

        Ok(self
            .db
            .get_messages_by_author(account_id)?
            .into_iter()
            .map(message_from_row)
            .collect())
    }
}

fn is_valid_text(text: &str) -> bool {
    !text.trim().is_empty() && text.chars().count() <= MAX_MESSAGE_CHARS
}

fn message_from_row(row: MessageRow) -> Message {
    Message {
        id: Some(row.message_id),
        posted_by: row.posted_by,
        text: row.message_text,
        posted_at: row.time_posted_epoch,
    }
}
