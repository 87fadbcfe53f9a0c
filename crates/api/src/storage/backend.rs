// Storage backend abstraction
// Decision: Enum dispatch over trait objects; both variants expose the same inherent API
//
// PostgreSQL when DATABASE_URL is set, otherwise the in-memory database
// (dev mode and tests).

use anyhow::Result;
use ondas_core::{
    DjPatch, KaraokePatch, MixPatch, Page, PageRequest, ReviewAction, ReviewStatus, Role,
    StationPatch,
};
use std::sync::Arc;
use uuid::Uuid;

use super::memory::InMemoryDatabase;
use super::models::*;
use super::repositories::Database;

/// Storage backend that can be either PostgreSQL or in-memory
#[derive(Clone)]
pub enum StorageBackend {
    /// PostgreSQL database (production)
    Postgres(Database),
    /// In-memory database (dev mode)
    InMemory(Arc<InMemoryDatabase>),
}

impl StorageBackend {
    /// Connect to PostgreSQL and run migrations
    pub async fn postgres(database_url: &str) -> Result<Self> {
        Ok(Self::Postgres(Database::from_url(database_url).await?))
    }

    /// Create an empty in-memory backend
    pub fn in_memory() -> Self {
        Self::InMemory(Arc::new(InMemoryDatabase::new()))
    }

    pub fn is_dev_mode(&self) -> bool {
        matches!(self, Self::InMemory(_))
    }

    /// The in-memory database, when that is the active backend
    pub fn memory(&self) -> Option<&Arc<InMemoryDatabase>> {
        match self {
            Self::InMemory(db) => Some(db),
            Self::Postgres(_) => None,
        }
    }

    pub async fn ping(&self) -> Result<()> {
        match self {
            Self::Postgres(db) => db.ping().await,
            Self::InMemory(db) => db.ping().await,
        }
    }

    // ============================================
    // Users
    // ============================================

    pub async fn create_user(&self, input: CreateUserRow) -> Result<UserRow> {
        match self {
            Self::Postgres(db) => db.create_user(input).await,
            Self::InMemory(db) => db.create_user(input).await,
        }
    }

    pub async fn get_user(&self, id: Uuid) -> Result<Option<UserRow>> {
        match self {
            Self::Postgres(db) => db.get_user(id).await,
            Self::InMemory(db) => db.get_user(id).await,
        }
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        match self {
            Self::Postgres(db) => db.get_user_by_email(email).await,
            Self::InMemory(db) => db.get_user_by_email(email).await,
        }
    }

    pub async fn list_users(&self, search: Option<&str>) -> Result<Vec<UserRow>> {
        match self {
            Self::Postgres(db) => db.list_users(search).await,
            Self::InMemory(db) => db.list_users(search).await,
        }
    }

    pub async fn update_user_role(&self, id: Uuid, role: Role) -> Result<Option<UserRow>> {
        match self {
            Self::Postgres(db) => db.update_user_role(id, role).await,
            Self::InMemory(db) => db.update_user_role(id, role).await,
        }
    }

    pub async fn delete_user(&self, id: Uuid) -> Result<bool> {
        match self {
            Self::Postgres(db) => db.delete_user(id).await,
            Self::InMemory(db) => db.delete_user(id).await,
        }
    }

    // ============================================
    // Cookie sessions
    // ============================================

    pub async fn create_auth_session(&self, input: CreateAuthSessionRow) -> Result<AuthSessionRow> {
        match self {
            Self::Postgres(db) => db.create_auth_session(input).await,
            Self::InMemory(db) => db.create_auth_session(input).await,
        }
    }

    pub async fn get_auth_session(&self, token: &str) -> Result<Option<AuthSessionRow>> {
        match self {
            Self::Postgres(db) => db.get_auth_session(token).await,
            Self::InMemory(db) => db.get_auth_session(token).await,
        }
    }

    pub async fn delete_auth_session(&self, token: &str) -> Result<bool> {
        match self {
            Self::Postgres(db) => db.delete_auth_session(token).await,
            Self::InMemory(db) => db.delete_auth_session(token).await,
        }
    }

    // ============================================
    // DJs
    // ============================================

    pub async fn list_djs(&self, request: PageRequest) -> Result<Page<DjRow>> {
        match self {
            Self::Postgres(db) => db.list_djs(request).await,
            Self::InMemory(db) => db.list_djs(request).await,
        }
    }

    pub async fn get_dj(&self, id: Uuid) -> Result<Option<DjRow>> {
        match self {
            Self::Postgres(db) => db.get_dj(id).await,
            Self::InMemory(db) => db.get_dj(id).await,
        }
    }

    pub async fn get_dj_by_user(&self, user_id: Uuid) -> Result<Option<DjRow>> {
        match self {
            Self::Postgres(db) => db.get_dj_by_user(user_id).await,
            Self::InMemory(db) => db.get_dj_by_user(user_id).await,
        }
    }

    pub async fn update_dj(&self, id: Uuid, patch: DjPatch) -> Result<Option<DjRow>> {
        match self {
            Self::Postgres(db) => db.update_dj(id, patch).await,
            Self::InMemory(db) => db.update_dj(id, patch).await,
        }
    }

    pub async fn delete_dj(&self, id: Uuid) -> Result<bool> {
        match self {
            Self::Postgres(db) => db.delete_dj(id).await,
            Self::InMemory(db) => db.delete_dj(id).await,
        }
    }

    // ============================================
    // DJ requests
    // ============================================

    pub async fn create_dj_request(&self, input: CreateDjRequestRow) -> Result<Option<DjRequestRow>> {
        match self {
            Self::Postgres(db) => db.create_dj_request(input).await,
            Self::InMemory(db) => db.create_dj_request(input).await,
        }
    }

    pub async fn list_dj_requests(&self, status: Option<ReviewStatus>) -> Result<Vec<DjRequestRow>> {
        match self {
            Self::Postgres(db) => db.list_dj_requests(status).await,
            Self::InMemory(db) => db.list_dj_requests(status).await,
        }
    }

    pub async fn review_dj_request(&self, id: Uuid, action: ReviewAction, reviewer: Uuid) -> Result<ReviewOutcome<DjRequestRow>> {
        match self {
            Self::Postgres(db) => db.review_dj_request(id, action, reviewer).await,
            Self::InMemory(db) => db.review_dj_request(id, action, reviewer).await,
        }
    }

    // ============================================
    // Mixes
    // ============================================

    pub async fn list_mixes(&self, filter: MixFilter, request: PageRequest) -> Result<Page<MixRow>> {
        match self {
            Self::Postgres(db) => db.list_mixes(filter, request).await,
            Self::InMemory(db) => db.list_mixes(filter, request).await,
        }
    }

    pub async fn get_mix(&self, id: Uuid) -> Result<Option<MixRow>> {
        match self {
            Self::Postgres(db) => db.get_mix(id).await,
            Self::InMemory(db) => db.get_mix(id).await,
        }
    }

    pub async fn create_mix(&self, input: CreateMixRow) -> Result<MixRow> {
        match self {
            Self::Postgres(db) => db.create_mix(input).await,
            Self::InMemory(db) => db.create_mix(input).await,
        }
    }

    pub async fn update_mix(&self, id: Uuid, patch: MixPatch) -> Result<Option<MixRow>> {
        match self {
            Self::Postgres(db) => db.update_mix(id, patch).await,
            Self::InMemory(db) => db.update_mix(id, patch).await,
        }
    }

    pub async fn review_mix(&self, id: Uuid, action: ReviewAction) -> Result<ReviewOutcome<MixRow>> {
        match self {
            Self::Postgres(db) => db.review_mix(id, action).await,
            Self::InMemory(db) => db.review_mix(id, action).await,
        }
    }

    pub async fn delete_mix(&self, id: Uuid) -> Result<bool> {
        match self {
            Self::Postgres(db) => db.delete_mix(id).await,
            Self::InMemory(db) => db.delete_mix(id).await,
        }
    }

    // ============================================
    // Radio stations
    // ============================================

    pub async fn list_stations(&self, active_only: bool) -> Result<Vec<StationRow>> {
        match self {
            Self::Postgres(db) => db.list_stations(active_only).await,
            Self::InMemory(db) => db.list_stations(active_only).await,
        }
    }

    pub async fn get_station(&self, id: Uuid) -> Result<Option<StationRow>> {
        match self {
            Self::Postgres(db) => db.get_station(id).await,
            Self::InMemory(db) => db.get_station(id).await,
        }
    }

    pub async fn create_station(&self, input: CreateStationRow) -> Result<StationRow> {
        match self {
            Self::Postgres(db) => db.create_station(input).await,
            Self::InMemory(db) => db.create_station(input).await,
        }
    }

    pub async fn update_station(&self, id: Uuid, patch: StationPatch) -> Result<Option<StationRow>> {
        match self {
            Self::Postgres(db) => db.update_station(id, patch).await,
            Self::InMemory(db) => db.update_station(id, patch).await,
        }
    }

    pub async fn delete_station(&self, id: Uuid) -> Result<bool> {
        match self {
            Self::Postgres(db) => db.delete_station(id).await,
            Self::InMemory(db) => db.delete_station(id).await,
        }
    }

    // ============================================
    // Karaoke tracks
    // ============================================

    pub async fn list_karaoke(&self, search: Option<&str>, request: PageRequest) -> Result<Page<KaraokeRow>> {
        match self {
            Self::Postgres(db) => db.list_karaoke(search, request).await,
            Self::InMemory(db) => db.list_karaoke(search, request).await,
        }
    }

    pub async fn get_karaoke(&self, id: Uuid) -> Result<Option<KaraokeRow>> {
        match self {
            Self::Postgres(db) => db.get_karaoke(id).await,
            Self::InMemory(db) => db.get_karaoke(id).await,
        }
    }

    pub async fn create_karaoke(&self, input: CreateKaraokeRow) -> Result<KaraokeRow> {
        match self {
            Self::Postgres(db) => db.create_karaoke(input).await,
            Self::InMemory(db) => db.create_karaoke(input).await,
        }
    }

    pub async fn update_karaoke(&self, id: Uuid, patch: KaraokePatch) -> Result<Option<KaraokeRow>> {
        match self {
            Self::Postgres(db) => db.update_karaoke(id, patch).await,
            Self::InMemory(db) => db.update_karaoke(id, patch).await,
        }
    }

    pub async fn delete_karaoke(&self, id: Uuid) -> Result<bool> {
        match self {
            Self::Postgres(db) => db.delete_karaoke(id).await,
            Self::InMemory(db) => db.delete_karaoke(id).await,
        }
    }

    // ============================================
    // Promo codes
    // ============================================

    pub async fn create_promo_code(&self, input: CreatePromoCodeRow) -> Result<Option<PromoCodeRow>> {
        match self {
            Self::Postgres(db) => db.create_promo_code(input).await,
            Self::InMemory(db) => db.create_promo_code(input).await,
        }
    }

    pub async fn get_promo_code(&self, code: &str) -> Result<Option<PromoCodeRow>> {
        match self {
            Self::Postgres(db) => db.get_promo_code(code).await,
            Self::InMemory(db) => db.get_promo_code(code).await,
        }
    }

    pub async fn activate_promo_code(&self, code: &str, admin_id: Uuid) -> Result<PromoActivation> {
        match self {
            Self::Postgres(db) => db.activate_promo_code(code, admin_id).await,
            Self::InMemory(db) => db.activate_promo_code(code, admin_id).await,
        }
    }
}
