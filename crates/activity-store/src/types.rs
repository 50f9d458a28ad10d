//! Activity records and the per-student membership state machine.

use crate::error::{StoreError, StoreResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// An activity document, keyed by its name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    /// Unique, immutable activity name
    pub name: String,

    /// What the activity is about
    pub description: String,

    /// When the activity meets
    pub schedule: String,

    /// Advisory capacity. Stored, never enforced.
    pub max_participants: u32,

    /// Participant emails in signup order
    pub participants: Vec<String>,
}

/// Activity attributes as listed to clients (the name is the map key).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityDetails {
    pub description: String,
    pub schedule: String,
    pub max_participants: u32,
    pub participants: Vec<String>,
}

/// Listing of every activity, ordered by name.
pub type ActivityListing = BTreeMap<String, ActivityDetails>;

impl Activity {
    /// Create an activity with an initial participant list.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        schedule: impl Into<String>,
        max_participants: u32,
        participants: &[&str],
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            schedule: schedule.into(),
            max_participants,
            participants: participants.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// Rebuild an activity from a listing entry.
    pub fn from_details(name: impl Into<String>, details: ActivityDetails) -> Self {
        Self {
            name: name.into(),
            description: details.description,
            schedule: details.schedule,
            max_participants: details.max_participants,
            participants: details.participants,
        }
    }

    /// Split off the name for listing.
    pub fn into_entry(self) -> (String, ActivityDetails) {
        (
            self.name,
            ActivityDetails {
                description: self.description,
                schedule: self.schedule,
                max_participants: self.max_participants,
                participants: self.participants,
            },
        )
    }

    /// Check the record invariants.
    pub fn validate(&self) -> StoreResult<()> {
        if self.name.is_empty() {
            return Err(StoreError::InvalidRecord("activity name is empty".into()));
        }

        if self.max_participants == 0 {
            return Err(StoreError::InvalidRecord(format!(
                "{}: max_participants must be positive",
                self.name
            )));
        }

        let mut seen = HashSet::with_capacity(self.participants.len());
        for email in &self.participants {
            if email.is_empty() {
                return Err(StoreError::InvalidRecord(format!(
                    "{}: empty participant email",
                    self.name
                )));
            }
            if !seen.insert(email.as_str()) {
                return Err(StoreError::InvalidRecord(format!(
                    "{}: duplicate participant {}",
                    self.name, email
                )));
            }
        }

        Ok(())
    }

    /// Current membership of an email in this activity.
    pub fn membership(&self, email: &str) -> Membership {
        if self.participants.iter().any(|p| p == email) {
            Membership::Registered
        } else {
            Membership::Unregistered
        }
    }

    /// Apply a transition to the participant list in place.
    ///
    /// The list is left untouched when the transition is rejected.
    pub fn apply(&mut self, transition: Transition, email: &str) -> StoreResult<()> {
        let next = self
            .membership(email)
            .apply(transition)
            .map_err(|_| transition.rejection(&self.name, email))?;

        match next {
            Membership::Registered => self.participants.push(email.to_string()),
            Membership::Unregistered => self.participants.retain(|p| p != email),
        }

        Ok(())
    }
}

/// Registration state of one (activity, email) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Membership {
    /// Email absent from the participant list
    Unregistered,
    /// Email present in the participant list
    Registered,
}

/// A requested membership change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Signup,
    Unregister,
}

/// A transition that is not legal from the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IllegalTransition {
    pub from: Membership,
    pub transition: Transition,
}

impl Membership {
    /// The state reached by `transition`, if it is legal from `self`.
    pub fn apply(self, transition: Transition) -> Result<Membership, IllegalTransition> {
        match (self, transition) {
            (Membership::Unregistered, Transition::Signup) => Ok(Membership::Registered),
            (Membership::Registered, Transition::Unregister) => Ok(Membership::Unregistered),
            (from, transition) => Err(IllegalTransition { from, transition }),
        }
    }
}

impl Transition {
    /// Error reported when this transition is rejected.
    pub fn rejection(self, activity: &str, email: &str) -> StoreError {
        let activity = activity.to_string();
        let email = email.to_string();
        match self {
            Transition::Signup => StoreError::AlreadySignedUp { activity, email },
            Transition::Unregister => StoreError::NotRegistered { activity, email },
        }
    }

    /// Confirmation message for a successful transition.
    pub fn confirmation(self, activity: &str, email: &str) -> String {
        match self {
            Transition::Signup => format!("Signed up {} for {}", email, activity),
            Transition::Unregister => format!("Unregistered {} from {}", email, activity),
        }
    }
}

/// Reject emails that would break the non-empty participant invariant.
pub fn check_email(email: &str) -> StoreResult<()> {
    if email.is_empty() {
        return Err(StoreError::InvalidEmail);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chess() -> Activity {
        Activity::new(
            "Chess Club",
            "Learn strategies",
            "Fridays",
            12,
            &["michael@mergington.edu", "daniel@mergington.edu"],
        )
    }

    #[test]
    fn test_membership_transitions() {
        assert_eq!(
            Membership::Unregistered.apply(Transition::Signup),
            Ok(Membership::Registered)
        );
        assert_eq!(
            Membership::Registered.apply(Transition::Unregister),
            Ok(Membership::Unregistered)
        );
        assert!(Membership::Registered.apply(Transition::Signup).is_err());
        assert!(Membership::Unregistered.apply(Transition::Unregister).is_err());
    }

    #[test]
    fn test_apply_signup_appends() {
        let mut activity = chess();
        activity.apply(Transition::Signup, "new@mergington.edu").unwrap();

        assert_eq!(activity.participants.len(), 3);
        assert_eq!(activity.participants[2], "new@mergington.edu");
        assert_eq!(activity.membership("new@mergington.edu"), Membership::Registered);
    }

    #[test]
    fn test_apply_duplicate_signup_rejected() {
        let mut activity = chess();
        let err = activity
            .apply(Transition::Signup, "michael@mergington.edu")
            .unwrap_err();

        assert!(matches!(err, StoreError::AlreadySignedUp { .. }));
        assert_eq!(activity, chess());
    }

    #[test]
    fn test_apply_unregister_absent_rejected() {
        let mut activity = chess();
        let err = activity
            .apply(Transition::Unregister, "nobody@mergington.edu")
            .unwrap_err();

        assert!(matches!(err, StoreError::NotRegistered { .. }));
        assert!(err.is_conflict());
        assert_eq!(activity, chess());
    }

    #[test]
    fn test_signup_then_unregister_restores_participants() {
        let mut activity = chess();
        activity.apply(Transition::Signup, "new@mergington.edu").unwrap();
        activity.apply(Transition::Unregister, "new@mergington.edu").unwrap();

        assert_eq!(activity, chess());
    }

    #[test]
    fn test_validate_rejects_duplicates_and_empty_emails() {
        assert!(chess().validate().is_ok());

        let mut duplicated = chess();
        duplicated.participants.push("michael@mergington.edu".into());
        assert!(matches!(
            duplicated.validate(),
            Err(StoreError::InvalidRecord(_))
        ));

        let mut empty = chess();
        empty.participants.push(String::new());
        assert!(empty.validate().is_err());

        let mut no_capacity = chess();
        no_capacity.max_participants = 0;
        assert!(no_capacity.validate().is_err());
    }

    #[test]
    fn test_confirmation_messages() {
        assert_eq!(
            Transition::Signup.confirmation("Chess Club", "a@b.edu"),
            "Signed up a@b.edu for Chess Club"
        );
        assert_eq!(
            Transition::Unregister.confirmation("Chess Club", "a@b.edu"),
            "Unregistered a@b.edu from Chess Club"
        );
    }

    #[test]
    fn test_details_serialization_shape() {
        let (name, details) = chess().into_entry();
        let json = serde_json::to_value(&details).unwrap();

        assert_eq!(name, "Chess Club");
        assert_eq!(json["max_participants"], 12);
        assert_eq!(json["participants"][0], "michael@mergington.edu");
        assert!(json.get("name").is_none());
    }

    #[test]
    fn test_check_email() {
        assert!(check_email("a@b.edu").is_ok());
        assert!(matches!(check_email(""), Err(StoreError::InvalidEmail)));
    }
}
