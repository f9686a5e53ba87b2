use serde::{Deserialize, Serialize};
use ts_rs::TS;

use examina_application::ProfileRecord;

/// API representation of a profile.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/profile-response.ts"
)]
pub struct ProfileResponse {
    pub profile_id: String,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<ProfileRecord> for ProfileResponse {
    fn from(value: ProfileRecord) -> Self {
        Self {
            profile_id: value.profile_id,
            name: value.name,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

/// Incoming payload for profile creation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/create-profile-request.ts"
)]
pub struct CreateProfileRequest {
    pub name: String,
}

/// Incoming payload for a profile rename.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/rename-profile-request.ts"
)]
pub struct RenameProfileRequest {
    pub name: String,
}
