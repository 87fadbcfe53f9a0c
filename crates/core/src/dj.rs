// DJ domain types
//
// A DJ profile is created when an admin approves a DJ request. The request
// keeps its own lifecycle (PENDING -> APPROVED | REJECTED) so a decision is
// never applied twice.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::review::ReviewStatus;

/// Public DJ profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Dj {
    pub id: Uuid,
    /// Account that owns this profile.
    pub user_id: Uuid,
    pub artist_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update of a DJ profile. Only present fields are applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct DjPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genres: Option<Vec<String>>,
}

impl DjPatch {
    pub fn is_empty(&self) -> bool {
        self.artist_name.is_none()
            && self.bio.is_none()
            && self.avatar_url.is_none()
            && self.genres.is_none()
    }

    pub fn apply(self, dj: &mut Dj) {
        if let Some(artist_name) = self.artist_name {
            dj.artist_name = artist_name;
        }
        if let Some(bio) = self.bio {
            dj.bio = Some(bio);
        }
        if let Some(avatar_url) = self.avatar_url {
            dj.avatar_url = Some(avatar_url);
        }
        if let Some(genres) = self.genres {
            dj.genres = genres;
        }
    }
}

/// A listener's application to become a DJ.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct DjRequest {
    pub id: Uuid,
    pub user_id: Uuid,
    pub artist_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub status: ReviewStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewed_by: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}
