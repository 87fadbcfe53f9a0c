// Mix domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::review::ReviewStatus;

/// A recorded DJ set. Only APPROVED mixes are listed publicly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Mix {
    pub id: Uuid,
    pub dj_id: Uuid,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub audio_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<i32>,
    pub status: ReviewStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update of a mix. Status changes go through the admin review routes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct MixPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<i32>,
}

impl MixPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.audio_url.is_none()
            && self.cover_url.is_none()
            && self.genre.is_none()
            && self.duration_seconds.is_none()
    }

    pub fn apply(self, mix: &mut Mix) {
        if let Some(title) = self.title {
            mix.title = title;
        }
        if let Some(description) = self.description {
            mix.description = Some(description);
        }
        if let Some(audio_url) = self.audio_url {
            mix.audio_url = audio_url;
        }
        if let Some(cover_url) = self.cover_url {
            mix.cover_url = Some(cover_url);
        }
        if let Some(genre) = self.genre {
            mix.genre = Some(genre);
        }
        if let Some(duration_seconds) = self.duration_seconds {
            mix.duration_seconds = Some(duration_seconds);
        }
    }
}
