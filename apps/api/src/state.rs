use examina_application::{AccessService, ProfileService};
use sqlx::PgPool;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub access_service: AccessService,
    pub profile_service: ProfileService,
    pub postgres_pool: PgPool,
}
