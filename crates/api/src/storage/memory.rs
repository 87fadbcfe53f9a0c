// In-memory storage implementation for dev mode and tests
// Decision: Use parking_lot for thread-safe access; never hold a lock across .await
// Decision: UUIDs generated via uuid v7 (time-ordered)
//
// Mirrors the PostgreSQL repository API on top of HashMaps. The backend can be
// switched offline so the degraded-read paths can be exercised without a
// real database outage.

use anyhow::{anyhow, bail, Result};
use chrono::{DateTime, Utc};
use ondas_core::{
    Dj, DjPatch, KaraokePatch, KaraokeTrack, Mix, MixPatch, Page, PageRequest, RadioStation,
    ReviewAction, ReviewStatus, Role, StationPatch,
};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use uuid::Uuid;

use super::models::*;

/// In-memory database. All data is lost on restart.
pub struct InMemoryDatabase {
    available: AtomicBool,
    users: RwLock<HashMap<Uuid, UserRow>>,
    sessions: RwLock<HashMap<String, AuthSessionRow>>,
    djs: RwLock<HashMap<Uuid, DjRow>>,
    dj_requests: RwLock<HashMap<Uuid, DjRequestRow>>,
    mixes: RwLock<HashMap<Uuid, MixRow>>,
    stations: RwLock<HashMap<Uuid, StationRow>>,
    karaoke: RwLock<HashMap<Uuid, KaraokeRow>>,
    promo_codes: RwLock<HashMap<Uuid, PromoCodeRow>>,
}

impl Default for InMemoryDatabase {
    fn default() -> Self {
        Self {
            available: AtomicBool::new(true),
            users: RwLock::default(),
            sessions: RwLock::default(),
            djs: RwLock::default(),
            dj_requests: RwLock::default(),
            mixes: RwLock::default(),
            stations: RwLock::default(),
            karaoke: RwLock::default(),
            promo_codes: RwLock::default(),
        }
    }
}

/// Sort newest first and cut one page after `request.cursor`.
/// An unknown cursor yields an empty page, as the SQL version does.
fn paginate<T>(
    mut items: Vec<T>,
    request: PageRequest,
    key: impl Fn(&T) -> (DateTime<Utc>, Uuid),
) -> Page<T> {
    items.sort_by(|a, b| key(b).cmp(&key(a)));

    let start = match request.cursor {
        None => 0,
        Some(cursor) => match items.iter().position(|item| key(item).1 == cursor) {
            Some(pos) => pos + 1,
            None => {
                return Page {
                    items: Vec::new(),
                    next_cursor: None,
                }
            }
        },
    };

    let rows: Vec<T> = items
        .into_iter()
        .skip(start)
        .take(request.fetch_limit() as usize)
        .collect();
    Page::from_overfetch(rows, request, |item| key(item).1)
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    /// Simulate the database going away (or coming back)
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn check(&self) -> Result<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(anyhow!("in-memory database is offline"))
        }
    }

    pub async fn ping(&self) -> Result<()> {
        self.check()
    }

    // ============================================
    // Users
    // ============================================

    pub async fn create_user(&self, input: CreateUserRow) -> Result<UserRow> {
        self.check()?;
        let mut users = self.users.write();
        if users.values().any(|u| u.email == input.email) {
            bail!("duplicate email: {}", input.email);
        }
        let now = Self::now();
        let row = UserRow {
            id: Uuid::now_v7(),
            email: input.email,
            name: input.name,
            role: input.role.as_str().to_string(),
            password_hash: input.password_hash,
            created_at: now,
            updated_at: now,
        };
        users.insert(row.id, row.clone());
        Ok(row)
    }

    pub async fn get_user(&self, id: Uuid) -> Result<Option<UserRow>> {
        self.check()?;
        Ok(self.users.read().get(&id).cloned())
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        self.check()?;
        Ok(self
            .users
            .read()
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    pub async fn list_users(&self, search: Option<&str>) -> Result<Vec<UserRow>> {
        self.check()?;
        let users = self.users.read();
        let mut result: Vec<_> = match search {
            Some(query) if !query.trim().is_empty() => {
                let pattern = query.trim().to_lowercase();
                users
                    .values()
                    .filter(|u| {
                        u.name.to_lowercase().contains(&pattern)
                            || u.email.to_lowercase().contains(&pattern)
                    })
                    .cloned()
                    .collect()
            }
            _ => users.values().cloned().collect(),
        };
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(result)
    }

    /// Change a user's role and revoke their cookie sessions, which carry the
    /// role captured at sign-in.
    pub async fn update_user_role(&self, id: Uuid, role: Role) -> Result<Option<UserRow>> {
        self.check()?;
        let mut users = self.users.write();
        let Some(user) = users.get_mut(&id) else {
            return Ok(None);
        };
        user.role = role.as_str().to_string();
        user.updated_at = Self::now();
        self.sessions.write().retain(|_, s| s.user_id != id);
        Ok(Some(user.clone()))
    }

    /// Delete a user with the same cascade as the SQL schema: sessions,
    /// DJ requests, the DJ profile and its mixes.
    ///
    /// Lock order matches `review_dj_request`: requests, users, then DJs.
    pub async fn delete_user(&self, id: Uuid) -> Result<bool> {
        self.check()?;
        let mut requests = self.dj_requests.write();
        let mut users = self.users.write();
        if users.remove(&id).is_none() {
            return Ok(false);
        }

        self.sessions.write().retain(|_, s| s.user_id != id);

        requests.retain(|_, r| r.user_id != id);
        for request in requests.values_mut() {
            if request.reviewed_by == Some(id) {
                request.reviewed_by = None;
            }
        }

        let mut djs = self.djs.write();
        let dj_ids: Vec<Uuid> = djs
            .values()
            .filter(|d| d.user_id == id)
            .map(|d| d.id)
            .collect();
        djs.retain(|_, d| d.user_id != id);
        self.mixes.write().retain(|_, m| !dj_ids.contains(&m.dj_id));

        for promo in self.promo_codes.write().values_mut() {
            if promo.activated_by == Some(id) {
                promo.activated_by = None;
            }
        }
        Ok(true)
    }

    // ============================================
    // Cookie sessions
    // ============================================

    pub async fn create_auth_session(&self, input: CreateAuthSessionRow) -> Result<AuthSessionRow> {
        self.check()?;
        let row = AuthSessionRow {
            id: Uuid::now_v7(),
            token: input.token,
            user_id: input.user_id,
            role: input.role.as_str().to_string(),
            expires_at: input.expires_at,
            created_at: Self::now(),
        };
        self.sessions.write().insert(row.token.clone(), row.clone());
        Ok(row)
    }

    pub async fn get_auth_session(&self, token: &str) -> Result<Option<AuthSessionRow>> {
        self.check()?;
        Ok(self
            .sessions
            .read()
            .get(token)
            .filter(|s| !s.is_expired())
            .cloned())
    }

    pub async fn delete_auth_session(&self, token: &str) -> Result<bool> {
        self.check()?;
        Ok(self.sessions.write().remove(token).is_some())
    }

    // ============================================
    // DJs
    // ============================================

    pub async fn list_djs(&self, request: PageRequest) -> Result<Page<DjRow>> {
        self.check()?;
        let rows: Vec<DjRow> = self.djs.read().values().cloned().collect();
        Ok(paginate(rows, request, |r| (r.created_at, r.id)))
    }

    pub async fn get_dj(&self, id: Uuid) -> Result<Option<DjRow>> {
        self.check()?;
        Ok(self.djs.read().get(&id).cloned())
    }

    pub async fn get_dj_by_user(&self, user_id: Uuid) -> Result<Option<DjRow>> {
        self.check()?;
        Ok(self
            .djs
            .read()
            .values()
            .find(|d| d.user_id == user_id)
            .cloned())
    }

    pub async fn update_dj(&self, id: Uuid, patch: DjPatch) -> Result<Option<DjRow>> {
        self.check()?;
        let mut djs = self.djs.write();
        Ok(djs.get_mut(&id).map(|row| {
            let mut dj = Dj::from(row.clone());
            patch.apply(&mut dj);
            dj.updated_at = Self::now();
            *row = DjRow::from(dj);
            row.clone()
        }))
    }

    pub async fn delete_dj(&self, id: Uuid) -> Result<bool> {
        self.check()?;
        let removed = self.djs.write().remove(&id).is_some();
        if removed {
            self.mixes.write().retain(|_, m| m.dj_id != id);
        }
        Ok(removed)
    }

    // ============================================
    // DJ requests
    // ============================================

    /// Returns `None` when the user already has a PENDING request.
    pub async fn create_dj_request(&self, input: CreateDjRequestRow) -> Result<Option<DjRequestRow>> {
        self.check()?;
        let mut requests = self.dj_requests.write();
        if requests
            .values()
            .any(|r| r.user_id == input.user_id && r.status().is_pending())
        {
            return Ok(None);
        }
        let row = DjRequestRow {
            id: Uuid::now_v7(),
            user_id: input.user_id,
            artist_name: input.artist_name,
            message: input.message,
            status: ReviewStatus::Pending.as_str().to_string(),
            reviewed_by: None,
            reviewed_at: None,
            created_at: Self::now(),
        };
        requests.insert(row.id, row.clone());
        Ok(Some(row))
    }

    pub async fn list_dj_requests(&self, status: Option<ReviewStatus>) -> Result<Vec<DjRequestRow>> {
        self.check()?;
        let mut rows: Vec<DjRequestRow> = self
            .dj_requests
            .read()
            .values()
            .filter(|r| status.map_or(true, |s| r.status() == s))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    /// Decide a DJ request. Approval also promotes the user to DJ and creates
    /// the DJ profile; all three writes happen under the request lock.
    pub async fn review_dj_request(
        &self,
        id: Uuid,
        action: ReviewAction,
        reviewer: Uuid,
    ) -> Result<ReviewOutcome<DjRequestRow>> {
        self.check()?;
        let mut requests = self.dj_requests.write();
        let Some(request) = requests.get_mut(&id) else {
            return Ok(ReviewOutcome::NotFound);
        };
        if !request.status().is_pending() {
            return Ok(ReviewOutcome::AlreadyProcessed(request.clone()));
        }

        let now = Self::now();
        request.status = ReviewStatus::from(action).as_str().to_string();
        request.reviewed_by = Some(reviewer);
        request.reviewed_at = Some(now);

        if action == ReviewAction::Approve {
            if let Some(user) = self.users.write().get_mut(&request.user_id) {
                if user.role() != Role::Admin {
                    user.role = Role::Dj.as_str().to_string();
                    user.updated_at = now;
                }
            }
            let mut djs = self.djs.write();
            if !djs.values().any(|d| d.user_id == request.user_id) {
                let dj = DjRow {
                    id: Uuid::now_v7(),
                    user_id: request.user_id,
                    artist_name: request.artist_name.clone(),
                    bio: None,
                    avatar_url: None,
                    genres: Vec::new(),
                    created_at: now,
                    updated_at: now,
                };
                djs.insert(dj.id, dj);
            }
        }

        Ok(ReviewOutcome::Processed(request.clone()))
    }

    // ============================================
    // Mixes
    // ============================================

    pub async fn list_mixes(&self, filter: MixFilter, request: PageRequest) -> Result<Page<MixRow>> {
        self.check()?;
        let rows: Vec<MixRow> = self
            .mixes
            .read()
            .values()
            .filter(|m| filter.status.map_or(true, |s| m.status() == s))
            .filter(|m| filter.dj_id.map_or(true, |dj| m.dj_id == dj))
            .cloned()
            .collect();
        Ok(paginate(rows, request, |r| (r.created_at, r.id)))
    }

    pub async fn get_mix(&self, id: Uuid) -> Result<Option<MixRow>> {
        self.check()?;
        Ok(self.mixes.read().get(&id).cloned())
    }

    pub async fn create_mix(&self, input: CreateMixRow) -> Result<MixRow> {
        self.check()?;
        let now = Self::now();
        let row = MixRow {
            id: Uuid::now_v7(),
            dj_id: input.dj_id,
            title: input.title,
            description: input.description,
            audio_url: input.audio_url,
            cover_url: input.cover_url,
            genre: input.genre,
            duration_seconds: input.duration_seconds,
            status: ReviewStatus::Pending.as_str().to_string(),
            created_at: now,
            updated_at: now,
        };
        self.mixes.write().insert(row.id, row.clone());
        Ok(row)
    }

    pub async fn update_mix(&self, id: Uuid, patch: MixPatch) -> Result<Option<MixRow>> {
        self.check()?;
        let mut mixes = self.mixes.write();
        Ok(mixes.get_mut(&id).map(|row| {
            let mut mix = Mix::from(row.clone());
            patch.apply(&mut mix);
            mix.updated_at = Self::now();
            *row = MixRow::from(mix);
            row.clone()
        }))
    }

    pub async fn review_mix(&self, id: Uuid, action: ReviewAction) -> Result<ReviewOutcome<MixRow>> {
        self.check()?;
        let mut mixes = self.mixes.write();
        let Some(mix) = mixes.get_mut(&id) else {
            return Ok(ReviewOutcome::NotFound);
        };
        if !mix.status().is_pending() {
            return Ok(ReviewOutcome::AlreadyProcessed(mix.clone()));
        }
        mix.status = ReviewStatus::from(action).as_str().to_string();
        mix.updated_at = Self::now();
        Ok(ReviewOutcome::Processed(mix.clone()))
    }

    pub async fn delete_mix(&self, id: Uuid) -> Result<bool> {
        self.check()?;
        Ok(self.mixes.write().remove(&id).is_some())
    }

    // ============================================
    // Radio stations
    // ============================================

    pub async fn list_stations(&self, active_only: bool) -> Result<Vec<StationRow>> {
        self.check()?;
        let mut rows: Vec<StationRow> = self
            .stations
            .read()
            .values()
            .filter(|s| !active_only || s.is_active)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(rows)
    }

    pub async fn get_station(&self, id: Uuid) -> Result<Option<StationRow>> {
        self.check()?;
        Ok(self.stations.read().get(&id).cloned())
    }

    pub async fn create_station(&self, input: CreateStationRow) -> Result<StationRow> {
        self.check()?;
        let now = Self::now();
        let row = StationRow {
            id: Uuid::now_v7(),
            name: input.name,
            stream_url: input.stream_url,
            description: input.description,
            logo_url: input.logo_url,
            genre: input.genre,
            is_active: input.is_active,
            created_at: now,
            updated_at: now,
        };
        self.stations.write().insert(row.id, row.clone());
        Ok(row)
    }

    pub async fn update_station(&self, id: Uuid, patch: StationPatch) -> Result<Option<StationRow>> {
        self.check()?;
        let mut stations = self.stations.write();
        Ok(stations.get_mut(&id).map(|row| {
            let mut station = RadioStation::from(row.clone());
            patch.apply(&mut station);
            station.updated_at = Self::now();
            *row = StationRow::from(station);
            row.clone()
        }))
    }

    pub async fn delete_station(&self, id: Uuid) -> Result<bool> {
        self.check()?;
        Ok(self.stations.write().remove(&id).is_some())
    }

    // ============================================
    // Karaoke tracks
    // ============================================

    pub async fn list_karaoke(
        &self,
        search: Option<&str>,
        request: PageRequest,
    ) -> Result<Page<KaraokeRow>> {
        self.check()?;
        let query = search.map(str::trim).filter(|q| !q.is_empty());
        let rows: Vec<KaraokeRow> = self
            .karaoke
            .read()
            .values()
            .filter(|row| {
                query.map_or(true, |q| KaraokeTrack::from((*row).clone()).matches(q))
            })
            .cloned()
            .collect();
        Ok(paginate(rows, request, |r| (r.created_at, r.id)))
    }

    pub async fn get_karaoke(&self, id: Uuid) -> Result<Option<KaraokeRow>> {
        self.check()?;
        Ok(self.karaoke.read().get(&id).cloned())
    }

    pub async fn create_karaoke(&self, input: CreateKaraokeRow) -> Result<KaraokeRow> {
        self.check()?;
        let now = Self::now();
        let row = KaraokeRow {
            id: Uuid::now_v7(),
            title: input.title,
            artist: input.artist,
            audio_url: input.audio_url,
            lyrics_url: input.lyrics_url,
            cover_url: input.cover_url,
            duration_seconds: input.duration_seconds,
            created_at: now,
            updated_at: now,
        };
        self.karaoke.write().insert(row.id, row.clone());
        Ok(row)
    }

    pub async fn update_karaoke(&self, id: Uuid, patch: KaraokePatch) -> Result<Option<KaraokeRow>> {
        self.check()?;
        let mut tracks = self.karaoke.write();
        Ok(tracks.get_mut(&id).map(|row| {
            let mut track = KaraokeTrack::from(row.clone());
            patch.apply(&mut track);
            track.updated_at = Self::now();
            *row = KaraokeRow::from(track);
            row.clone()
        }))
    }

    pub async fn delete_karaoke(&self, id: Uuid) -> Result<bool> {
        self.check()?;
        Ok(self.karaoke.write().remove(&id).is_some())
    }

    // ============================================
    // Promo codes
    // ============================================

    /// Returns `None` when the code already exists.
    pub async fn create_promo_code(&self, input: CreatePromoCodeRow) -> Result<Option<PromoCodeRow>> {
        self.check()?;
        let mut codes = self.promo_codes.write();
        if codes.values().any(|c| c.code == input.code) {
            return Ok(None);
        }
        let row = PromoCodeRow {
            id: Uuid::now_v7(),
            code: input.code,
            description: input.description,
            active: false,
            activated_by: None,
            activated_at: None,
            created_at: Self::now(),
        };
        codes.insert(row.id, row.clone());
        Ok(Some(row))
    }

    pub async fn get_promo_code(&self, code: &str) -> Result<Option<PromoCodeRow>> {
        self.check()?;
        Ok(self
            .promo_codes
            .read()
            .values()
            .find(|c| c.code == code)
            .cloned())
    }

    pub async fn activate_promo_code(&self, code: &str, admin_id: Uuid) -> Result<PromoActivation> {
        self.check()?;
        let mut codes = self.promo_codes.write();
        let Some(promo) = codes.values_mut().find(|c| c.code == code) else {
            return Ok(PromoActivation::NotFound);
        };
        if promo.active {
            return Ok(PromoActivation::AlreadyActive(promo.clone()));
        }
        promo.active = true;
        promo.activated_by = Some(admin_id);
        promo.activated_at = Some(Self::now());
        Ok(PromoActivation::Activated(promo.clone()))
    }
}
