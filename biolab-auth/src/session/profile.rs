//! Profile Store seam — per-user role assignments
//!
//! One hosted table keyed by user id with a `role` attribute. Zero rows means
//! no role; the caller treats that the same as unauthenticated.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::Result;

use super::types::Role;

/// Role lookups against the hosted `profiles` table
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Project the `role` attribute of the row whose key equals `user_id`.
    /// Exactly one matching row is expected; zero rows yields `Ok(None)`.
    async fn role_for_user(&self, user_id: &str) -> Result<Option<Role>>;
}

/// In-memory profile table for tests and offline development
pub struct MemoryProfileStore {
    rows: RwLock<HashMap<String, Role>>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
        }
    }

    pub fn upsert(&self, user_id: &str, role: Role) {
        self.rows.write().insert(user_id.to_string(), role);
    }

    pub fn remove(&self, user_id: &str) {
        self.rows.write().remove(user_id);
    }
}

impl Default for MemoryProfileStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn role_for_user(&self, user_id: &str) -> Result<Option<Role>> {
        Ok(self.rows.read().get(user_id).copied())
    }
}
