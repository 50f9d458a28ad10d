//! In-process activity store.

use crate::error::{StoreError, StoreResult};
use crate::types::{Activity, ActivityListing, Membership, Transition};
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

/// Activity documents held in memory.
///
/// Every mutation checks and updates membership under one write lock, so
/// concurrent transitions on the same pair serialize.
#[derive(Debug, Default)]
pub struct MemoryStore {
    activities: RwLock<BTreeMap<String, Activity>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn list(&self) -> StoreResult<ActivityListing> {
        let activities = self.activities.read().await;
        Ok(activities
            .values()
            .cloned()
            .map(Activity::into_entry)
            .collect())
    }

    pub async fn membership(&self, activity: &str, email: &str) -> StoreResult<Membership> {
        let activities = self.activities.read().await;
        activities
            .get(activity)
            .map(|a| a.membership(email))
            .ok_or_else(|| StoreError::NotFound(activity.to_string()))
    }

    #[instrument(skip(self))]
    pub async fn transition(
        &self,
        activity: &str,
        email: &str,
        transition: Transition,
    ) -> StoreResult<()> {
        let mut activities = self.activities.write().await;
        let record = activities
            .get_mut(activity)
            .ok_or_else(|| StoreError::NotFound(activity.to_string()))?;

        record.apply(transition, email)?;

        debug!(
            "Applied {:?} (participants: {})",
            transition,
            record.participants.len()
        );
        Ok(())
    }

    /// Replace every document with `catalog`.
    pub async fn seed(&self, catalog: Vec<Activity>) -> StoreResult<()> {
        let mut activities = self.activities.write().await;
        activities.clear();
        for activity in catalog {
            activities.insert(activity.name.clone(), activity);
        }
        Ok(())
    }

    pub async fn count(&self) -> StoreResult<usize> {
        Ok(self.activities.read().await.len())
    }
}
