// Radio station domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// A live radio stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct RadioStation {
    pub id: Uuid,
    pub name: String,
    pub stream_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update of a station. Only present fields are applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct StationPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl StationPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.stream_url.is_none()
            && self.description.is_none()
            && self.logo_url.is_none()
            && self.genre.is_none()
            && self.is_active.is_none()
    }

    pub fn apply(self, station: &mut RadioStation) {
        if let Some(name) = self.name {
            station.name = name;
        }
        if let Some(stream_url) = self.stream_url {
            station.stream_url = stream_url;
        }
        if let Some(description) = self.description {
            station.description = Some(description);
        }
        if let Some(logo_url) = self.logo_url {
            station.logo_url = Some(logo_url);
        }
        if let Some(genre) = self.genre {
            station.genre = Some(genre);
        }
        if let Some(is_active) = self.is_active {
            station.is_active = is_active;
        }
    }
}
