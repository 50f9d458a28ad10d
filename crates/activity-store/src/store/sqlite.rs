//! SQLite-backed activity store.
//!
//! Each activity is one row holding its participants as a JSON array. Signup
//! and unregister are single conditional `UPDATE` statements whose `WHERE`
//! clause carries the membership check, so the check and the write cannot be
//! interleaved with another request.

use crate::error::{StoreError, StoreResult};
use crate::types::{Activity, ActivityListing, Membership, Transition};
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteRow,
};
use sqlx::Row;
use std::str::FromStr;
use tracing::{debug, info, instrument};

const SQL_CREATE_ACTIVITIES: &str = r#"
CREATE TABLE IF NOT EXISTS activities (
  name TEXT PRIMARY KEY NOT NULL,
  description TEXT NOT NULL,
  schedule TEXT NOT NULL,
  max_participants INTEGER NOT NULL CHECK (max_participants > 0),
  participants TEXT NOT NULL DEFAULT '[]'
)
"#;

const SQL_LIST_ACTIVITIES: &str = r#"
SELECT name, description, schedule, max_participants, participants
FROM activities
ORDER BY name
"#;

const SQL_SELECT_PARTICIPANTS: &str = "SELECT participants FROM activities WHERE name = ?";

const SQL_ACTIVITY_EXISTS: &str = "SELECT 1 FROM activities WHERE name = ?";

// Appends only while the email is absent.
const SQL_SIGNUP: &str = r#"
UPDATE activities
SET participants = json_insert(participants, '$[#]', ?)
WHERE name = ?
  AND NOT EXISTS (
    SELECT 1 FROM json_each(activities.participants) WHERE value = ?
  )
"#;

// Removes only while the email is present.
const SQL_UNREGISTER: &str = r#"
UPDATE activities
SET participants = (
  SELECT json_group_array(value)
  FROM json_each(activities.participants)
  WHERE value <> ?
)
WHERE name = ?
  AND EXISTS (
    SELECT 1 FROM json_each(activities.participants) WHERE value = ?
  )
"#;

const SQL_DELETE_ACTIVITIES: &str = "DELETE FROM activities";

const SQL_INSERT_ACTIVITY: &str = r#"
INSERT INTO activities (name, description, schedule, max_participants, participants)
VALUES (?, ?, ?, ?, ?)
"#;

const SQL_COUNT_ACTIVITIES: &str = "SELECT COUNT(*) FROM activities";

/// Activity documents in a SQLite database.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if missing) the database at `url` and ensure the schema.
    pub async fn connect(url: &str, max_connections: u32) -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);

        let pool = pool_options(url, max_connections)
            .connect_with(options)
            .await?;

        info!("Connected to SQLite store at {}", url);
        Self::from_pool(pool).await
    }

    /// Wrap an existing pool and ensure the schema.
    pub async fn from_pool(pool: SqlitePool) -> StoreResult<Self> {
        sqlx::query(SQL_CREATE_ACTIVITIES).execute(&pool).await?;
        Ok(Self { pool })
    }

    pub async fn list(&self) -> StoreResult<ActivityListing> {
        let rows = sqlx::query(SQL_LIST_ACTIVITIES)
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| activity_from_row(row).map(Activity::into_entry))
            .collect()
    }

    pub async fn membership(&self, activity: &str, email: &str) -> StoreResult<Membership> {
        let row = sqlx::query(SQL_SELECT_PARTICIPANTS)
            .bind(activity)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound(activity.to_string()))?;

        let participants: Vec<String> = serde_json::from_str(row.try_get("participants")?)?;
        if participants.iter().any(|p| p == email) {
            Ok(Membership::Registered)
        } else {
            Ok(Membership::Unregistered)
        }
    }

    #[instrument(skip(self))]
    pub async fn transition(
        &self,
        activity: &str,
        email: &str,
        transition: Transition,
    ) -> StoreResult<()> {
        let sql = match transition {
            Transition::Signup => SQL_SIGNUP,
            Transition::Unregister => SQL_UNREGISTER,
        };

        let affected = sqlx::query(sql)
            .bind(email)
            .bind(activity)
            .bind(email)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if affected == 1 {
            debug!("Applied {:?}", transition);
            return Ok(());
        }

        // Activities are never created or deleted by requests, so this probe
        // cannot race with the update above.
        if self.exists(activity).await? {
            Err(transition.rejection(activity, email))
        } else {
            Err(StoreError::NotFound(activity.to_string()))
        }
    }

    /// Replace every document with `catalog` in one transaction.
    pub async fn seed(&self, catalog: Vec<Activity>) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(SQL_DELETE_ACTIVITIES).execute(&mut *tx).await?;

        for activity in &catalog {
            sqlx::query(SQL_INSERT_ACTIVITY)
                .bind(&activity.name)
                .bind(&activity.description)
                .bind(&activity.schedule)
                .bind(i64::from(activity.max_participants))
                .bind(serde_json::to_string(&activity.participants)?)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    pub async fn count(&self) -> StoreResult<usize> {
        let count: i64 = sqlx::query_scalar(SQL_COUNT_ACTIVITIES)
            .fetch_one(&self.pool)
            .await?;
        Ok(count as usize)
    }

    /// Close the connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    async fn exists(&self, activity: &str) -> StoreResult<bool> {
        let row = sqlx::query(SQL_ACTIVITY_EXISTS)
            .bind(activity)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }
}

/// Pool settings for `url`.
///
/// An in-memory database is freed when its last connection closes, so its
/// pool holds exactly one connection that never idles out or expires.
fn pool_options(url: &str, max_connections: u32) -> SqlitePoolOptions {
    if url.contains(":memory:") {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(max_connections.max(1))
    }
}

fn activity_from_row(row: &SqliteRow) -> StoreResult<Activity> {
    let name: String = row.try_get("name")?;
    let max_participants: i64 = row.try_get("max_participants")?;
    let participants: &str = row.try_get("participants")?;

    let activity = Activity {
        max_participants: u32::try_from(max_participants).map_err(|_| {
            StoreError::InvalidRecord(format!(
                "{}: max_participants out of range: {}",
                name, max_participants
            ))
        })?,
        description: row.try_get("description")?,
        schedule: row.try_get("schedule")?,
        participants: serde_json::from_str(participants)?,
        name,
    };

    activity.validate()?;
    Ok(activity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::initial_activities;

    #[test]
    fn test_in_memory_pool_keeps_its_connection() {
        let options = pool_options("sqlite::memory:", 8);
        assert_eq!(options.get_max_connections(), 1);
        assert_eq!(options.get_min_connections(), 1);
        assert!(options.get_idle_timeout().is_none());
        assert!(options.get_max_lifetime().is_none());
    }

    #[test]
    fn test_file_pool_uses_configured_size() {
        let options = pool_options("sqlite://activities.db", 8);
        assert_eq!(options.get_max_connections(), 8);
        assert!(options.get_idle_timeout().is_some());

        assert_eq!(pool_options("sqlite://activities.db", 0).get_max_connections(), 1);
    }

    #[tokio::test]
    async fn test_in_memory_store_survives_idle_connections() {
        let store = SqliteStore::connect("sqlite::memory:", 8).await.unwrap();
        store.seed(initial_activities()).await.unwrap();

        assert_eq!(store.pool.size(), 1);

        store
            .transition("Chess Club", "mem@mergington.edu", Transition::Signup)
            .await
            .unwrap();
        assert_eq!(store.list().await.unwrap()["Chess Club"].participants.len(), 4);
    }

    #[tokio::test]
    async fn test_undecodable_row_is_invalid_record() {
        let store = SqliteStore::connect("sqlite::memory:", 1).await.unwrap();
        sqlx::query(SQL_INSERT_ACTIVITY)
            .bind("Broken Club")
            .bind("Never decodes")
            .bind("Mondays")
            .bind("twelve")
            .bind("[]")
            .execute(&store.pool)
            .await
            .unwrap();

        let err = store.list().await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidRecord(_)), "{:?}", err);
    }

    #[tokio::test]
    async fn test_closed_pool_is_unavailable() {
        let store = SqliteStore::connect("sqlite::memory:", 1).await.unwrap();
        store.seed(initial_activities()).await.unwrap();
        store.close().await;

        let err = store
            .transition("Chess Club", "late@mergington.edu", Transition::Signup)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)), "{:?}", err);
    }
}
