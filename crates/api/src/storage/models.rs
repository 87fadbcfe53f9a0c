// Database models (internal, may differ from public DTOs)
//
// Roles and review statuses are stored as TEXT; conversion to the domain
// enums happens here so the rest of the crate only sees ondas-core types.

use chrono::{DateTime, Utc};
use ondas_core::{
    Dj, DjRequest, KaraokeTrack, Mix, PromoCode, RadioStation, ReviewStatus, Role, User,
};
use sqlx::FromRow;
use uuid::Uuid;

// ============================================
// Users and sessions
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: String,
    pub password_hash: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRow {
    pub fn role(&self) -> Role {
        Role::parse(&self.role).unwrap_or_else(|| {
            tracing::warn!(user_id = %self.id, role = %self.role, "Unknown stored role, treating as LISTENER");
            Role::Listener
        })
    }
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        let role = row.role();
        User {
            id: row.id,
            email: row.email,
            name: row.name,
            role,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateUserRow {
    pub email: String,
    pub name: String,
    pub role: Role,
    pub password_hash: Option<String>,
}

/// Server-side cookie session. The role is captured at sign-in.
#[derive(Debug, Clone, FromRow)]
pub struct AuthSessionRow {
    pub id: Uuid,
    pub token: String,
    pub user_id: Uuid,
    pub role: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl AuthSessionRow {
    pub fn role(&self) -> Option<Role> {
        Role::parse(&self.role)
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

#[derive(Debug, Clone)]
pub struct CreateAuthSessionRow {
    pub token: String,
    pub user_id: Uuid,
    pub role: Role,
    pub expires_at: DateTime<Utc>,
}

// ============================================
// DJs and DJ requests
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct DjRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub artist_name: String,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub genres: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DjRow> for Dj {
    fn from(row: DjRow) -> Self {
        Dj {
            id: row.id,
            user_id: row.user_id,
            artist_name: row.artist_name,
            bio: row.bio,
            avatar_url: row.avatar_url,
            genres: row.genres,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<Dj> for DjRow {
    fn from(dj: Dj) -> Self {
        DjRow {
            id: dj.id,
            user_id: dj.user_id,
            artist_name: dj.artist_name,
            bio: dj.bio,
            avatar_url: dj.avatar_url,
            genres: dj.genres,
            created_at: dj.created_at,
            updated_at: dj.updated_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct DjRequestRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub artist_name: String,
    pub message: Option<String>,
    pub status: String,
    pub reviewed_by: Option<Uuid>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl DjRequestRow {
    pub fn status(&self) -> ReviewStatus {
        ReviewStatus::from(self.status.as_str())
    }
}

impl From<DjRequestRow> for DjRequest {
    fn from(row: DjRequestRow) -> Self {
        let status = row.status();
        DjRequest {
            id: row.id,
            user_id: row.user_id,
            artist_name: row.artist_name,
            message: row.message,
            status,
            reviewed_by: row.reviewed_by,
            reviewed_at: row.reviewed_at,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateDjRequestRow {
    pub user_id: Uuid,
    pub artist_name: String,
    pub message: Option<String>,
}

// ============================================
// Mixes
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct MixRow {
    pub id: Uuid,
    pub dj_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub audio_url: String,
    pub cover_url: Option<String>,
    pub genre: Option<String>,
    pub duration_seconds: Option<i32>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MixRow {
    pub fn status(&self) -> ReviewStatus {
        ReviewStatus::from(self.status.as_str())
    }
}

impl From<MixRow> for Mix {
    fn from(row: MixRow) -> Self {
        let status = row.status();
        Mix {
            id: row.id,
            dj_id: row.dj_id,
            title: row.title,
            description: row.description,
            audio_url: row.audio_url,
            cover_url: row.cover_url,
            genre: row.genre,
            duration_seconds: row.duration_seconds,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<Mix> for MixRow {
    fn from(mix: Mix) -> Self {
        MixRow {
            id: mix.id,
            dj_id: mix.dj_id,
            title: mix.title,
            description: mix.description,
            audio_url: mix.audio_url,
            cover_url: mix.cover_url,
            genre: mix.genre,
            duration_seconds: mix.duration_seconds,
            status: mix.status.as_str().to_string(),
            created_at: mix.created_at,
            updated_at: mix.updated_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateMixRow {
    pub dj_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub audio_url: String,
    pub cover_url: Option<String>,
    pub genre: Option<String>,
    pub duration_seconds: Option<i32>,
}

/// Filters for mix listing
#[derive(Debug, Clone, Default)]
pub struct MixFilter {
    pub status: Option<ReviewStatus>,
    pub dj_id: Option<Uuid>,
}

// ============================================
// Radio stations
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct StationRow {
    pub id: Uuid,
    pub name: String,
    pub stream_url: String,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub genre: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<StationRow> for RadioStation {
    fn from(row: StationRow) -> Self {
        RadioStation {
            id: row.id,
            name: row.name,
            stream_url: row.stream_url,
            description: row.description,
            logo_url: row.logo_url,
            genre: row.genre,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<RadioStation> for StationRow {
    fn from(station: RadioStation) -> Self {
        StationRow {
            id: station.id,
            name: station.name,
            stream_url: station.stream_url,
            description: station.description,
            logo_url: station.logo_url,
            genre: station.genre,
            is_active: station.is_active,
            created_at: station.created_at,
            updated_at: station.updated_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateStationRow {
    pub name: String,
    pub stream_url: String,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub genre: Option<String>,
    pub is_active: bool,
}

// ============================================
// Karaoke tracks
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct KaraokeRow {
    pub id: Uuid,
    pub title: String,
    pub artist: String,
    pub audio_url: String,
    pub lyrics_url: Option<String>,
    pub cover_url: Option<String>,
    pub duration_seconds: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<KaraokeRow> for KaraokeTrack {
    fn from(row: KaraokeRow) -> Self {
        KaraokeTrack {
            id: row.id,
            title: row.title,
            artist: row.artist,
            audio_url: row.audio_url,
            lyrics_url: row.lyrics_url,
            cover_url: row.cover_url,
            duration_seconds: row.duration_seconds,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<KaraokeTrack> for KaraokeRow {
    fn from(track: KaraokeTrack) -> Self {
        KaraokeRow {
            id: track.id,
            title: track.title,
            artist: track.artist,
            audio_url: track.audio_url,
            lyrics_url: track.lyrics_url,
            cover_url: track.cover_url,
            duration_seconds: track.duration_seconds,
            created_at: track.created_at,
            updated_at: track.updated_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateKaraokeRow {
    pub title: String,
    pub artist: String,
    pub audio_url: String,
    pub lyrics_url: Option<String>,
    pub cover_url: Option<String>,
    pub duration_seconds: Option<i32>,
}

// ============================================
// Promo codes
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct PromoCodeRow {
    pub id: Uuid,
    pub code: String,
    pub description: Option<String>,
    pub active: bool,
    pub activated_by: Option<Uuid>,
    pub activated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<PromoCodeRow> for PromoCode {
    fn from(row: PromoCodeRow) -> Self {
        PromoCode {
            id: row.id,
            code: row.code,
            description: row.description,
            active: row.active,
            activated_by: row.activated_by,
            activated_at: row.activated_at,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreatePromoCodeRow {
    pub code: String,
    pub description: Option<String>,
}

// ============================================
// Mutation outcomes
// ============================================

/// Result of deciding a moderated item
#[derive(Debug, Clone)]
pub enum ReviewOutcome<T> {
    NotFound,
    /// The item was already decided; nothing changed
    AlreadyProcessed(T),
    Processed(T),
}

/// Result of activating a promo code
#[derive(Debug, Clone)]
pub enum PromoActivation {
    NotFound,
    AlreadyActive(PromoCodeRow),
    Activated(PromoCodeRow),
}
