// OpenAPI specification generation
//
// Served by the API server through Swagger UI at /swagger-ui.

use crate::api;
use crate::auth;
use crate::uploads::{CloudinarySignature, PresignedUpload};
use ondas_core::{
    Dj, DjPatch, DjRequest, KaraokePatch, KaraokeTrack, Mix, MixPatch, PromoCode, RadioStation,
    ReviewAction, ReviewStatus, Role, StationPatch, User,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Registers the `bearer_auth` scheme referenced by protected routes
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation for the Ondas API
#[derive(OpenApi)]
#[openapi(
    paths(
        auth::routes::signup,
        auth::routes::login,
        auth::routes::refresh,
        auth::routes::logout,
        auth::routes::me,
        api::djs::list_djs,
        api::djs::get_dj,
        api::djs::update_dj,
        api::dj_requests::create_dj_request,
        api::mixes::list_mixes,
        api::mixes::get_mix,
        api::mixes::create_mix,
        api::mixes::update_mix,
        api::mixes::delete_mix,
        api::stations::list_stations,
        api::stations::get_station,
        api::stations::list_radio_legacy,
        api::karaoke::list_karaoke,
        api::karaoke::get_karaoke_legacy,
        api::admin::delete_dj,
        api::admin::list_dj_requests,
        api::admin::review_dj_request,
        api::admin::list_mixes,
        api::admin::review_mix,
        api::admin::approve_mix_legacy,
        api::admin::list_stations,
        api::admin::create_station,
        api::admin::update_station,
        api::admin::delete_station,
        api::admin::create_karaoke,
        api::admin::update_karaoke,
        api::admin::delete_karaoke,
        api::admin::list_users,
        api::admin::update_user_role,
        api::admin::delete_user,
        api::admin::create_promo_code,
        api::admin::activate_promo_code,
        api::uploads::sign_cloudinary,
        api::uploads::presign_s3,
    ),
    components(
        schemas(
            Role, User, Dj, DjPatch, DjRequest,
            Mix, MixPatch, ReviewAction, ReviewStatus,
            RadioStation, StationPatch, KaraokeTrack, KaraokePatch, PromoCode,
            api::common::ErrorBody, api::common::ErrorResponse,
            auth::routes::SignupRequest, auth::routes::LoginRequest,
            auth::routes::RefreshRequest, auth::routes::AuthPayload,
            auth::jwt::TokenPair,
            api::dj_requests::CreateDjRequestRequest,
            api::mixes::CreateMixRequest,
            api::admin::ReviewRequest, api::admin::CreateStationRequest,
            api::admin::CreateKaraokeRequest, api::admin::UpdateRoleRequest,
            api::admin::CreatePromoCodeRequest, api::admin::ActivatePromoRequest,
            api::admin::LegacyApproval,
            api::uploads::CloudinarySignRequest, api::uploads::S3PresignRequest,
            CloudinarySignature, PresignedUpload,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "auth", description = "Signup, login, token refresh and logout"),
        (name = "djs", description = "DJ profiles"),
        (name = "dj-requests", description = "Applications to become a DJ"),
        (name = "mixes", description = "DJ mixes"),
        (name = "stations", description = "Radio stations"),
        (name = "karaoke", description = "Karaoke catalog"),
        (name = "admin", description = "Moderation and catalog management (admin only)"),
        (name = "uploads", description = "Direct-upload signing")
    ),
    info(
        title = "Ondas API",
        version = "0.3.0",
        description = "API for the Ondas radio, DJ mix and karaoke platform",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    )
)]
pub struct ApiDoc;

impl ApiDoc {
    /// Generate the OpenAPI spec as a pretty-printed JSON string
    pub fn to_json() -> Result<String, serde_json::Error> {
        Self::openapi().to_pretty_json()
    }
}
