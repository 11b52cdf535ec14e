// User domain types
//
// `CurrentUser` is whatever identity the fronting auth collaborator vouches
// for. `UserProfile` is the stored profile holding favorites.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::event::EventType;

/// Identity of the caller, independent of any identity-provider SDK.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl CurrentUser {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: None,
            display_name: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct SocialLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
}

/// Stored user profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    /// Unique across profiles.
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub college: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub major: Option<String>,
    #[serde(default)]
    pub interests: Vec<EventType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default)]
    pub social_links: SocialLinks,
    /// Favorite event ids. Set semantics.
    #[serde(default)]
    pub favorite_events: Vec<String>,
    #[serde(default)]
    pub registered_events: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn from_new(id: String, input: NewUserProfile, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: input.name,
            email: input.email,
            college: input.college,
            year: input.year,
            major: input.major,
            interests: input.interests,
            bio: input.bio,
            social_links: input.social_links,
            favorite_events: Vec::new(),
            registered_events: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_patch(&mut self, patch: UserProfilePatch, now: DateTime<Utc>) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(college) = patch.college {
            self.college = Some(college);
        }
        if let Some(year) = patch.year {
            self.year = Some(year);
        }
        if let Some(major) = patch.major {
            self.major = Some(major);
        }
        if let Some(interests) = patch.interests {
            self.interests = interests;
        }
        if let Some(bio) = patch.bio {
            self.bio = Some(bio);
        }
        if let Some(social_links) = patch.social_links {
            self.social_links = social_links;
        }
        self.updated_at = now;
    }

    /// Flip membership of `event_id` in the favorites set; returns the new state.
    pub fn toggle_favorite(&mut self, event_id: &str) -> bool {
        if let Some(pos) = self.favorite_events.iter().position(|id| id == event_id) {
            self.favorite_events.remove(pos);
            false
        } else {
            self.favorite_events.push(event_id.to_string());
            true
        }
    }
}

/// Input for creating a profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct NewUserProfile {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub college: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub major: Option<String>,
    #[serde(default)]
    pub interests: Vec<EventType>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub social_links: SocialLinks,
}

/// Partial update for a profile. Email and favorites are not patchable.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct UserProfilePatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub college: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub major: Option<String>,
    #[serde(default)]
    pub interests: Option<Vec<EventType>>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub social_links: Option<SocialLinks>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_favorite_flips_membership() {
        let mut profile = UserProfile::from_new(
            "u1".to_string(),
            NewUserProfile {
                name: "Ada".to_string(),
                email: "ada@example.edu".to_string(),
                ..Default::default()
            },
            Utc::now(),
        );

        assert!(profile.toggle_favorite("e1"));
        assert_eq!(profile.favorite_events, vec!["e1"]);
        assert!(!profile.toggle_favorite("e1"));
        assert!(profile.favorite_events.is_empty());
    }
}
