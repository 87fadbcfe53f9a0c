// PostgreSQL repository
// Decision: Runtime-checked queries (query_as::<_, Row>) so the crate builds without a live database
// Decision: Ids are generated in Rust (UUID v7) and bound explicitly
// Decision: Partial updates use COALESCE so absent fields keep their stored value

use anyhow::Result;
use chrono::Utc;
use ondas_core::{
    DjPatch, KaraokePatch, MixPatch, Page, PageRequest, ReviewAction, ReviewStatus, Role,
    StationPatch,
};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use super::models::*;

const USER_COLUMNS: &str = "id, email, name, role, password_hash, created_at, updated_at";
const DJ_COLUMNS: &str = "id, user_id, artist_name, bio, avatar_url, genres, created_at, updated_at";
const DJ_REQUEST_COLUMNS: &str =
    "id, user_id, artist_name, message, status, reviewed_by, reviewed_at, created_at";
const MIX_COLUMNS: &str = "id, dj_id, title, description, audio_url, cover_url, genre, duration_seconds, status, created_at, updated_at";
const STATION_COLUMNS: &str =
    "id, name, stream_url, description, logo_url, genre, is_active, created_at, updated_at";
const KARAOKE_COLUMNS: &str =
    "id, title, artist, audio_url, lyrics_url, cover_url, duration_seconds, created_at, updated_at";
const PROMO_COLUMNS: &str = "id, code, description, active, activated_by, activated_at, created_at";

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect and apply pending migrations
    pub async fn from_url(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    // ============================================
    // Users
    // ============================================

    pub async fn create_user(&self, input: CreateUserRow) -> Result<UserRow> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (id, email, name, role, password_hash)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(Uuid::now_v7())
        .bind(&input.email)
        .bind(&input.name)
        .bind(input.role.as_str())
        .bind(&input.password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_user(&self, id: Uuid) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn list_users(&self, search: Option<&str>) -> Result<Vec<UserRow>> {
        let pattern = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{s}%"));

        let rows = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE $1::text IS NULL OR name ILIKE $1 OR email ILIKE $1
            ORDER BY created_at DESC, id DESC
            "#
        ))
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Change a user's role and revoke their cookie sessions, which carry the
    /// role captured at sign-in.
    pub async fn update_user_role(&self, id: Uuid, role: Role) -> Result<Option<UserRow>> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            UPDATE users SET role = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(role.as_str())
        .fetch_optional(&mut *tx)
        .await?;

        if row.is_some() {
            sqlx::query("DELETE FROM auth_sessions WHERE user_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(row)
    }

    pub async fn delete_user(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // ============================================
    // Cookie sessions
    // ============================================

    pub async fn create_auth_session(&self, input: CreateAuthSessionRow) -> Result<AuthSessionRow> {
        let row = sqlx::query_as::<_, AuthSessionRow>(
            r#"
            INSERT INTO auth_sessions (id, token, user_id, role, expires_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, token, user_id, role, expires_at, created_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(&input.token)
        .bind(input.user_id)
        .bind(input.role.as_str())
        .bind(input.expires_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_auth_session(&self, token: &str) -> Result<Option<AuthSessionRow>> {
        let row = sqlx::query_as::<_, AuthSessionRow>(
            r#"
            SELECT id, token, user_id, role, expires_at, created_at
            FROM auth_sessions
            WHERE token = $1 AND expires_at > NOW()
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn delete_auth_session(&self, token: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM auth_sessions WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // ============================================
    // DJs
    // ============================================

    pub async fn list_djs(&self, request: PageRequest) -> Result<Page<DjRow>> {
        let rows = sqlx::query_as::<_, DjRow>(&format!(
            r#"
            SELECT {DJ_COLUMNS}
            FROM djs
            WHERE $1::uuid IS NULL
               OR (created_at, id) < (SELECT created_at, id FROM djs WHERE id = $1)
            ORDER BY created_at DESC, id DESC
            LIMIT $2
            "#
        ))
        .bind(request.cursor)
        .bind(request.fetch_limit())
        .fetch_all(&self.pool)
        .await?;

        Ok(Page::from_overfetch(rows, request, |r| r.id))
    }

    pub async fn get_dj(&self, id: Uuid) -> Result<Option<DjRow>> {
        let row = sqlx::query_as::<_, DjRow>(&format!("SELECT {DJ_COLUMNS} FROM djs WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    pub async fn get_dj_by_user(&self, user_id: Uuid) -> Result<Option<DjRow>> {
        let row = sqlx::query_as::<_, DjRow>(&format!(
            "SELECT {DJ_COLUMNS} FROM djs WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn update_dj(&self, id: Uuid, patch: DjPatch) -> Result<Option<DjRow>> {
        let row = sqlx::query_as::<_, DjRow>(&format!(
            r#"
            UPDATE djs
            SET
                artist_name = COALESCE($2, artist_name),
                bio = COALESCE($3, bio),
                avatar_url = COALESCE($4, avatar_url),
                genres = COALESCE($5, genres),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {DJ_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(patch.artist_name)
        .bind(patch.bio)
        .bind(patch.avatar_url)
        .bind(patch.genres)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn delete_dj(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM djs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // ============================================
    // DJ requests
    // ============================================

    /// Returns `None` when the user already has a PENDING request.
    pub async fn create_dj_request(&self, input: CreateDjRequestRow) -> Result<Option<DjRequestRow>> {
        let row = sqlx::query_as::<_, DjRequestRow>(&format!(
            r#"
            INSERT INTO dj_requests (id, user_id, artist_name, message, status)
            VALUES ($1, $2, $3, $4, 'PENDING')
            ON CONFLICT (user_id) WHERE status = 'PENDING' DO NOTHING
            RETURNING {DJ_REQUEST_COLUMNS}
            "#
        ))
        .bind(Uuid::now_v7())
        .bind(input.user_id)
        .bind(&input.artist_name)
        .bind(&input.message)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn list_dj_requests(&self, status: Option<ReviewStatus>) -> Result<Vec<DjRequestRow>> {
        let rows = sqlx::query_as::<_, DjRequestRow>(&format!(
            r#"
            SELECT {DJ_REQUEST_COLUMNS}
            FROM dj_requests
            WHERE $1::text IS NULL OR status = $1
            ORDER BY created_at DESC, id DESC
            "#
        ))
        .bind(status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Decide a DJ request in one transaction. The request row is locked so
    /// concurrent reviewers cannot both see it as PENDING.
    pub async fn review_dj_request(
        &self,
        id: Uuid,
        action: ReviewAction,
        reviewer: Uuid,
    ) -> Result<ReviewOutcome<DjRequestRow>> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, DjRequestRow>(&format!(
            "SELECT {DJ_REQUEST_COLUMNS} FROM dj_requests WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(current) = current else {
            return Ok(ReviewOutcome::NotFound);
        };
        if !current.status().is_pending() {
            return Ok(ReviewOutcome::AlreadyProcessed(current));
        }

        let updated = sqlx::query_as::<_, DjRequestRow>(&format!(
            r#"
            UPDATE dj_requests
            SET status = $2, reviewed_by = $3, reviewed_at = $4
            WHERE id = $1
            RETURNING {DJ_REQUEST_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(ReviewStatus::from(action).as_str())
        .bind(reviewer)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        if action == ReviewAction::Approve {
            sqlx::query(
                "UPDATE users SET role = 'DJ', updated_at = NOW() WHERE id = $1 AND role <> 'ADMIN'",
            )
            .bind(updated.user_id)
            .execute(&mut *tx)
            .await?;

            sqlx::query(
                r#"
                INSERT INTO djs (id, user_id, artist_name)
                VALUES ($1, $2, $3)
                ON CONFLICT (user_id) DO NOTHING
                "#,
            )
            .bind(Uuid::now_v7())
            .bind(updated.user_id)
            .bind(&updated.artist_name)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(ReviewOutcome::Processed(updated))
    }

    // ============================================
    // Mixes
    // ============================================

    pub async fn list_mixes(&self, filter: MixFilter, request: PageRequest) -> Result<Page<MixRow>> {
        let rows = sqlx::query_as::<_, MixRow>(&format!(
            r#"
            SELECT {MIX_COLUMNS}
            FROM mixes
            WHERE ($1::text IS NULL OR status = $1)
              AND ($2::uuid IS NULL OR dj_id = $2)
              AND ($3::uuid IS NULL
                   OR (created_at, id) < (SELECT created_at, id FROM mixes WHERE id = $3))
            ORDER BY created_at DESC, id DESC
            LIMIT $4
            "#
        ))
        .bind(filter.status.map(|s| s.as_str()))
        .bind(filter.dj_id)
        .bind(request.cursor)
        .bind(request.fetch_limit())
        .fetch_all(&self.pool)
        .await?;

        Ok(Page::from_overfetch(rows, request, |r| r.id))
    }

    pub async fn get_mix(&self, id: Uuid) -> Result<Option<MixRow>> {
        let row = sqlx::query_as::<_, MixRow>(&format!("SELECT {MIX_COLUMNS} FROM mixes WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    pub async fn create_mix(&self, input: CreateMixRow) -> Result<MixRow> {
        let row = sqlx::query_as::<_, MixRow>(&format!(
            r#"
            INSERT INTO mixes (id, dj_id, title, description, audio_url, cover_url, genre, duration_seconds, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'PENDING')
            RETURNING {MIX_COLUMNS}
            "#
        ))
        .bind(Uuid::now_v7())
        .bind(input.dj_id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.audio_url)
        .bind(&input.cover_url)
        .bind(&input.genre)
        .bind(input.duration_seconds)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn update_mix(&self, id: Uuid, patch: MixPatch) -> Result<Option<MixRow>> {
        let row = sqlx::query_as::<_, MixRow>(&format!(
            r#"
            UPDATE mixes
            SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                audio_url = COALESCE($4, audio_url),
                cover_url = COALESCE($5, cover_url),
                genre = COALESCE($6, genre),
                duration_seconds = COALESCE($7, duration_seconds),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {MIX_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(patch.title)
        .bind(patch.description)
        .bind(patch.audio_url)
        .bind(patch.cover_url)
        .bind(patch.genre)
        .bind(patch.duration_seconds)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Decide a PENDING mix. The status guard in the UPDATE makes the
    /// decision single-shot without an explicit lock.
    pub async fn review_mix(&self, id: Uuid, action: ReviewAction) -> Result<ReviewOutcome<MixRow>> {
        let updated = sqlx::query_as::<_, MixRow>(&format!(
            r#"
            UPDATE mixes SET status = $2, updated_at = NOW()
            WHERE id = $1 AND status = 'PENDING'
            RETURNING {MIX_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(ReviewStatus::from(action).as_str())
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = updated {
            return Ok(ReviewOutcome::Processed(row));
        }
        Ok(match self.get_mix(id).await? {
            Some(row) => ReviewOutcome::AlreadyProcessed(row),
            None => ReviewOutcome::NotFound,
        })
    }

    pub async fn delete_mix(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM mixes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // ============================================
    // Radio stations
    // ============================================

    pub async fn list_stations(&self, active_only: bool) -> Result<Vec<StationRow>> {
        let rows = sqlx::query_as::<_, StationRow>(&format!(
            r#"
            SELECT {STATION_COLUMNS}
            FROM radio_stations
            WHERE NOT $1 OR is_active
            ORDER BY name ASC, id ASC
            "#
        ))
        .bind(active_only)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn get_station(&self, id: Uuid) -> Result<Option<StationRow>> {
        let row = sqlx::query_as::<_, StationRow>(&format!(
            "SELECT {STATION_COLUMNS} FROM radio_stations WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn create_station(&self, input: CreateStationRow) -> Result<StationRow> {
        let row = sqlx::query_as::<_, StationRow>(&format!(
            r#"
            INSERT INTO radio_stations (id, name, stream_url, description, logo_url, genre, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {STATION_COLUMNS}
            "#
        ))
        .bind(Uuid::now_v7())
        .bind(&input.name)
        .bind(&input.stream_url)
        .bind(&input.description)
        .bind(&input.logo_url)
        .bind(&input.genre)
        .bind(input.is_active)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn update_station(&self, id: Uuid, patch: StationPatch) -> Result<Option<StationRow>> {
        let row = sqlx::query_as::<_, StationRow>(&format!(
            r#"
            UPDATE radio_stations
            SET
                name = COALESCE($2, name),
                stream_url = COALESCE($3, stream_url),
                description = COALESCE($4, description),
                logo_url = COALESCE($5, logo_url),
                genre = COALESCE($6, genre),
                is_active = COALESCE($7, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {STATION_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(patch.name)
        .bind(patch.stream_url)
        .bind(patch.description)
        .bind(patch.logo_url)
        .bind(patch.genre)
        .bind(patch.is_active)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn delete_station(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM radio_stations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // ============================================
    // Karaoke tracks
    // ============================================

    pub async fn list_karaoke(
        &self,
        search: Option<&str>,
        request: PageRequest,
    ) -> Result<Page<KaraokeRow>> {
        let pattern = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{s}%"));

        let rows = sqlx::query_as::<_, KaraokeRow>(&format!(
            r#"
            SELECT {KARAOKE_COLUMNS}
            FROM karaoke_tracks
            WHERE ($1::text IS NULL OR title ILIKE $1 OR artist ILIKE $1)
              AND ($2::uuid IS NULL
                   OR (created_at, id) < (SELECT created_at, id FROM karaoke_tracks WHERE id = $2))
            ORDER BY created_at DESC, id DESC
            LIMIT $3
            "#
        ))
        .bind(pattern)
        .bind(request.cursor)
        .bind(request.fetch_limit())
        .fetch_all(&self.pool)
        .await?;

        Ok(Page::from_overfetch(rows, request, |r| r.id))
    }

    pub async fn get_karaoke(&self, id: Uuid) -> Result<Option<KaraokeRow>> {
        let row = sqlx::query_as::<_, KaraokeRow>(&format!(
            "SELECT {KARAOKE_COLUMNS} FROM karaoke_tracks WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn create_karaoke(&self, input: CreateKaraokeRow) -> Result<KaraokeRow> {
        let row = sqlx::query_as::<_, KaraokeRow>(&format!(
            r#"
            INSERT INTO karaoke_tracks (id, title, artist, audio_url, lyrics_url, cover_url, duration_seconds)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {KARAOKE_COLUMNS}
            "#
        ))
        .bind(Uuid::now_v7())
        .bind(&input.title)
        .bind(&input.artist)
        .bind(&input.audio_url)
        .bind(&input.lyrics_url)
        .bind(&input.cover_url)
        .bind(input.duration_seconds)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn update_karaoke(&self, id: Uuid, patch: KaraokePatch) -> Result<Option<KaraokeRow>> {
        let row = sqlx::query_as::<_, KaraokeRow>(&format!(
            r#"
            UPDATE karaoke_tracks
            SET
                title = COALESCE($2, title),
                artist = COALESCE($3, artist),
                audio_url = COALESCE($4, audio_url),
                lyrics_url = COALESCE($5, lyrics_url),
                cover_url = COALESCE($6, cover_url),
                duration_seconds = COALESCE($7, duration_seconds),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {KARAOKE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(patch.title)
        .bind(patch.artist)
        .bind(patch.audio_url)
        .bind(patch.lyrics_url)
        .bind(patch.cover_url)
        .bind(patch.duration_seconds)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn delete_karaoke(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM karaoke_tracks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // ============================================
    // Promo codes
    // ============================================

    /// Returns `None` when the code already exists.
    pub async fn create_promo_code(&self, input: CreatePromoCodeRow) -> Result<Option<PromoCodeRow>> {
        let row = sqlx::query_as::<_, PromoCodeRow>(&format!(
            r#"
            INSERT INTO promo_codes (id, code, description)
            VALUES ($1, $2, $3)
            ON CONFLICT (code) DO NOTHING
            RETURNING {PROMO_COLUMNS}
            "#
        ))
        .bind(Uuid::now_v7())
        .bind(&input.code)
        .bind(&input.description)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_promo_code(&self, code: &str) -> Result<Option<PromoCodeRow>> {
        let row = sqlx::query_as::<_, PromoCodeRow>(&format!(
            "SELECT {PROMO_COLUMNS} FROM promo_codes WHERE code = $1"
        ))
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn activate_promo_code(&self, code: &str, admin_id: Uuid) -> Result<PromoActivation> {
        let activated = sqlx::query_as::<_, PromoCodeRow>(&format!(
            r#"
            UPDATE promo_codes
            SET active = TRUE, activated_by = $2, activated_at = NOW()
            WHERE code = $1 AND NOT active
            RETURNING {PROMO_COLUMNS}
            "#
        ))
        .bind(code)
        .bind(admin_id)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = activated {
            return Ok(PromoActivation::Activated(row));
        }
        Ok(match self.get_promo_code(code).await? {
            Some(row) => PromoActivation::AlreadyActive(row),
            None => PromoActivation::NotFound,
        })
    }
}
