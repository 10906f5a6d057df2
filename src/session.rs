// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::User;
use crate::storage::{Storage, StorageError, AUTH_TOKEN_KEY, USER_KEY};

/// The authenticated session: bearer token plus the cached user record.
///
/// The token is read once from storage when the session is opened and kept in
/// memory afterwards; writes go to both.
pub struct Session {
    storage: Box<dyn Storage>,
    token: Option<String>,
}

impl Session {
    pub fn open(storage: Box<dyn Storage>) -> Result<Self, StorageError> {
        let token = storage.get(AUTH_TOKEN_KEY)?;
        Ok(Self { storage, token })
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Presence check only; expiry is the server's business.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn store(&mut self, token: &str, user_json: &str) -> Result<(), StorageError> {
        self.token = Some(token.to_string());
        self.storage.set(AUTH_TOKEN_KEY, token)?;
        self.storage.set(USER_KEY, user_json)?;
        Ok(())
    }

    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.token = None;
        self.storage.remove(AUTH_TOKEN_KEY)?;
        self.storage.remove(USER_KEY)?;
        Ok(())
    }

    /// The user cached at login. A record that no longer parses reads as absent.
    pub fn cached_user(&self) -> Result<Option<User>, StorageError> {
        let raw = self.storage.get(USER_KEY)?;
        Ok(raw.and_then(|s| serde_json::from_str(&s).ok()))
    }

    pub fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    pub fn storage_mut(&mut self) -> &mut dyn Storage {
        self.storage.as_mut()
    }
}
