//! Registry aggregate: the set of admitted sessions.
//!
//! The aggregate itself is synchronous and lock-free; callers wrap it in a
//! single mutex so membership changes and routing decisions are serialized.
//! Entries are kept in admission order, which is also the order of every
//! user-list snapshot.

use std::sync::Arc;

use lanchat_shared::protocol::Message;

use super::{
    error::RegistryError,
    pusher::MessagePusher,
    value_object::{SessionId, Username},
};

/// One admitted session as seen by routing
#[derive(Clone)]
pub struct RegistryEntry {
    pub id: SessionId,
    pub username: Username,
    pub pusher: Arc<dyn MessagePusher>,
}

impl std::fmt::Debug for RegistryEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryEntry")
            .field("id", &self.id)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Admitted sessions, in admission order
#[derive(Debug, Default)]
pub struct Registry {
    entries: Vec<RegistryEntry>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Make a session visible to routing
    pub fn admit(
        &mut self,
        id: SessionId,
        username: Username,
        pusher: Arc<dyn MessagePusher>,
    ) -> Result<(), RegistryError> {
        if self.contains(&id) {
            return Err(RegistryError::AlreadyAdmitted(id));
        }
        self.entries.push(RegistryEntry {
            id,
            username,
            pusher,
        });
        Ok(())
    }

    /// Remove a session, returning its entry if it was admitted
    pub fn remove(&mut self, id: &SessionId) -> Option<RegistryEntry> {
        let index = self.entries.iter().position(|entry| &entry.id == id)?;
        Some(self.entries.remove(index))
    }

    pub fn get(&self, id: &SessionId) -> Option<&RegistryEntry> {
        self.entries.iter().find(|entry| &entry.id == id)
    }

    pub fn contains(&self, id: &SessionId) -> bool {
        self.get(id).is_some()
    }

    /// All admitted sessions, in admission order
    pub fn entries(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.entries.iter()
    }

    /// Usernames of every admitted session, in admission order
    pub fn usernames(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|entry| entry.username.as_str().to_string())
            .collect()
    }

    /// Every admitted session except `exclude`
    pub fn broadcast_targets(&self, exclude: &SessionId) -> Vec<&RegistryEntry> {
        self.entries
            .iter()
            .filter(|entry| &entry.id != exclude)
            .collect()
    }

    /// Find the unicast recipient for `username` (exact, case-sensitive).
    ///
    /// When several sessions share the name, the most recently admitted one
    /// is chosen.
    pub fn find_by_username(&self, username: &str) -> Option<&RegistryEntry> {
        self.entries
            .iter()
            .rev()
            .find(|entry| entry.username.as_str() == username)
    }

    /// Build a user-list message for the current membership
    pub fn snapshot(&self) -> Message {
        Message::user_list(self.usernames())
    }
}
