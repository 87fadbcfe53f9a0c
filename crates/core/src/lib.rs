// Ondas domain types
//
// DB-agnostic entity types shared by the API server and its storage layer.
// Key design decisions:
// - Role is a closed enum; `Role::satisfies` is the single authorization rule
// - Partial updates are explicit `*Patch` structs (only present fields apply)
// - Moderated items (DJ requests, mixes) share one review lifecycle
// - Listing uses cursor pagination (id of the last item seen)

pub mod dj;
pub mod karaoke;
pub mod mix;
pub mod pagination;
pub mod promo;
pub mod review;
pub mod role;
pub mod station;
pub mod user;

pub use dj::{Dj, DjPatch, DjRequest};
pub use karaoke::{KaraokePatch, KaraokeTrack};
pub use mix::{Mix, MixPatch};
pub use pagination::{Page, PageQuery, PageRequest, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
pub use promo::PromoCode;
pub use review::{ReviewAction, ReviewStatus};
pub use role::Role;
pub use station::{RadioStation, StationPatch};
pub use user::User;
