//! The seed catalog of school activities.

use crate::error::{StoreError, StoreResult};
use crate::types::{Activity, ActivityListing};
use std::path::Path;
use tracing::info;

/// The built-in Mergington High School activity catalog.
pub fn initial_activities() -> Vec<Activity> {
    vec![
        Activity::new(
            "Chess Club",
            "Learn strategies and compete in chess tournaments",
            "Fridays, 3:30 PM - 5:00 PM",
            12,
            &[
                "michael@mergington.edu",
                "daniel@mergington.edu",
                "olivia@mergington.edu",
            ],
        ),
        Activity::new(
            "Gym Class",
            "Physical education and sports activities",
            "Mondays, Wednesdays, Fridays, 2:00 PM - 3:00 PM",
            30,
            &["john@mergington.edu", "olivia@mergington.edu"],
        ),
        Activity::new(
            "Soccer Team",
            "Join the school soccer team and compete in matches",
            "Tuesdays, Thursdays, 4:00 PM - 5:30 PM",
            22,
            &["alex@mergington.edu", "lucas@mergington.edu"],
        ),
        Activity::new(
            "Basketball Club",
            "Practice basketball skills and play friendly games",
            "Wednesdays, 3:30 PM - 5:00 PM",
            15,
            &["mia@mergington.edu", "noah@mergington.edu"],
        ),
        Activity::new(
            "Swimming Team",
            "Train and compete in swimming events",
            "Mondays, 4:00 PM - 5:30 PM",
            20,
            &["ava@mergington.edu", "liam@mergington.edu"],
        ),
        Activity::new(
            "Programming Class",
            "Learn programming fundamentals and build software projects",
            "Tuesdays and Thursdays, 3:30 PM - 4:30 PM",
            20,
            &["emma@mergington.edu", "sophia@mergington.edu"],
        ),
        Activity::new(
            "Art Club",
            "Explore painting, drawing, and other visual arts",
            "Fridays, 2:00 PM - 3:30 PM",
            18,
            &["isabella@mergington.edu", "ethan@mergington.edu"],
        ),
        Activity::new(
            "Drama Society",
            "Act, direct, and produce school plays and performances",
            "Thursdays, 3:30 PM - 5:00 PM",
            25,
            &["charlotte@mergington.edu", "jack@mergington.edu"],
        ),
        Activity::new(
            "Music Ensemble",
            "Perform in a group with various musical instruments",
            "Wednesdays, 4:00 PM - 5:30 PM",
            20,
            &["amelia@mergington.edu", "benjamin@mergington.edu"],
        ),
        Activity::new(
            "Science Club",
            "Conduct experiments and explore scientific concepts",
            "Mondays, 3:30 PM - 5:00 PM",
            16,
            &["elijah@mergington.edu", "zoe@mergington.edu"],
        ),
        Activity::new(
            "Mathletes",
            "Solve challenging math problems and compete in contests",
            "Tuesdays, 2:00 PM - 3:30 PM",
            12,
            &["logan@mergington.edu", "grace@mergington.edu"],
        ),
        Activity::new(
            "Debate Team",
            "Develop public speaking and argumentation skills",
            "Fridays, 4:00 PM - 5:30 PM",
            14,
            &["henry@mergington.edu", "ella@mergington.edu"],
        ),
    ]
}

/// Parse a catalog from JSON shaped like the activity listing.
pub fn parse_catalog(json: &str) -> StoreResult<Vec<Activity>> {
    let listing: ActivityListing = serde_json::from_str(json)?;

    let activities: Vec<Activity> = listing
        .into_iter()
        .map(|(name, details)| Activity::from_details(name, details))
        .collect();

    for activity in &activities {
        activity.validate()?;
    }

    Ok(activities)
}

/// Load a catalog file.
pub async fn load_catalog(path: &Path) -> StoreResult<Vec<Activity>> {
    let json = tokio::fs::read_to_string(path).await.map_err(|e| {
        StoreError::InvalidRecord(format!("cannot read catalog {:?}: {}", path, e))
    })?;

    let activities = parse_catalog(&json)?;
    info!("Loaded {} activities from {:?}", activities.len(), path);
    Ok(activities)
}
