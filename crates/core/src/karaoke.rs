// Karaoke track domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// An instrumental track with synchronized lyrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct KaraokeTrack {
    pub id: Uuid,
    pub title: String,
    pub artist: String,
    pub audio_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lyrics_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl KaraokeTrack {
    /// Case-insensitive match on title or artist
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.title.to_lowercase().contains(&query) || self.artist.to_lowercase().contains(&query)
    }
}

/// Partial update of a karaoke track. Only present fields are applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct KaraokePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lyrics_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<i32>,
}

impl KaraokePatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.artist.is_none()
            && self.audio_url.is_none()
            && self.lyrics_url.is_none()
            && self.cover_url.is_none()
            && self.duration_seconds.is_none()
    }

    pub fn apply(self, track: &mut KaraokeTrack) {
        if let Some(title) = self.title {
            track.title = title;
        }
        if let Some(artist) = self.artist {
            track.artist = artist;
        }
        if let Some(audio_url) = self.audio_url {
            track.audio_url = audio_url;
        }
        if let Some(lyrics_url) = self.lyrics_url {
            track.lyrics_url = Some(lyrics_url);
        }
        if let Some(cover_url) = self.cover_url {
            track.cover_url = Some(cover_url);
        }
        if let Some(duration_seconds) = self.duration_seconds {
            track.duration_seconds = Some(duration_seconds);
        }
    }
}
