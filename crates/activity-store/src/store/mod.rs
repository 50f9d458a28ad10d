//! Registration store over the configured persistence backend.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::error::{StoreError, StoreResult};
use crate::types::{check_email, Activity, ActivityListing, Membership, Transition};
use std::collections::HashSet;
use tracing::{info, warn};

/// Storage backend holding the activity documents.
pub enum Store {
    /// Process memory (no persistence)
    Memory(MemoryStore),
    /// SQLite database
    Sqlite(SqliteStore),
}

impl Store {
    /// Empty in-memory store.
    pub fn memory() -> Self {
        Store::Memory(MemoryStore::new())
    }

    /// In-memory store seeded with `catalog`.
    pub async fn memory_with(catalog: Vec<Activity>) -> StoreResult<Self> {
        let store = Self::memory();
        store.seed(catalog).await?;
        Ok(store)
    }

    /// Connect to a SQLite database.
    pub async fn sqlite(url: &str, max_connections: u32) -> StoreResult<Self> {
        Ok(Store::Sqlite(SqliteStore::connect(url, max_connections).await?))
    }

    /// Every activity keyed by name.
    pub async fn list_activities(&self) -> StoreResult<ActivityListing> {
        match self {
            Store::Memory(s) => s.list().await,
            Store::Sqlite(s) => s.list().await,
        }
    }

    /// Register `email` for `activity`, returning the confirmation message.
    pub async fn signup(&self, activity: &str, email: &str) -> StoreResult<String> {
        self.transition(activity, email, Transition::Signup).await
    }

    /// Remove `email` from `activity`, returning the confirmation message.
    pub async fn unregister(&self, activity: &str, email: &str) -> StoreResult<String> {
        self.transition(activity, email, Transition::Unregister)
            .await
    }

    /// Current registration state of `email` for `activity`.
    pub async fn membership(&self, activity: &str, email: &str) -> StoreResult<Membership> {
        match self {
            Store::Memory(s) => s.membership(activity, email).await,
            Store::Sqlite(s) => s.membership(activity, email).await,
        }
    }

    /// Clear the collection and insert `catalog`.
    pub async fn seed(&self, catalog: Vec<Activity>) -> StoreResult<()> {
        let mut names = HashSet::with_capacity(catalog.len());
        for activity in &catalog {
            activity.validate()?;
            if !names.insert(activity.name.as_str()) {
                return Err(StoreError::InvalidRecord(format!(
                    "duplicate activity {}",
                    activity.name
                )));
            }
        }

        let count = catalog.len();
        match self {
            Store::Memory(s) => s.seed(catalog).await?,
            Store::Sqlite(s) => s.seed(catalog).await?,
        }

        info!("Seeded {} activities", count);
        Ok(())
    }

    /// Number of stored activities.
    pub async fn count(&self) -> StoreResult<usize> {
        match self {
            Store::Memory(s) => s.count().await,
            Store::Sqlite(s) => s.count().await,
        }
    }

    /// Release backend resources.
    pub async fn close(&self) {
        if let Store::Sqlite(s) = self {
            s.close().await;
        }
    }

    async fn transition(
        &self,
        activity: &str,
        email: &str,
        transition: Transition,
    ) -> StoreResult<String> {
        check_email(email)?;

        let result = match self {
            Store::Memory(s) => s.transition(activity, email, transition).await,
            Store::Sqlite(s) => s.transition(activity, email, transition).await,
        };

        match result {
            Ok(()) => {
                info!(%activity, %email, ?transition, "Membership changed");
                Ok(transition.confirmation(activity, email))
            }
            Err(e) => {
                warn!(%activity, %email, ?transition, "Transition rejected: {}", e);
                Err(e)
            }
        }
    }
}
