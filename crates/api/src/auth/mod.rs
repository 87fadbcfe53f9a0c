// Authentication module
// Decision: Bearer JWTs for every route; the cookie session is an admin-only fallback
// Decision: One gate decides, extractors translate decisions into HTTP rejections

pub mod config;
pub mod credentials;
pub mod gate;
pub mod jwt;
pub mod middleware;
pub mod routes;

pub use config::AuthConfig;
pub use gate::AuthGate;
pub use jwt::JwtService;
pub use middleware::{AdminUser, AuthState, AuthUser, DjUser, OptionalAuthUser};
pub use routes::routes;
