use async_trait::async_trait;

use examina_core::AppResult;

/// Profile projection returned to callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileRecord {
    /// Stable profile identifier (`PF` prefix).
    pub profile_id: String,
    /// Unique profile name.
    pub name: String,
    /// Creation timestamp in RFC3339.
    pub created_at: String,
    /// Last-update timestamp in RFC3339.
    pub updated_at: String,
}

/// Repository port for profile administration.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Lists all profiles ordered by identifier.
    async fn list_profiles(&self) -> AppResult<Vec<ProfileRecord>>;

    /// Finds one profile by identifier.
    async fn find_profile(&self, profile_id: &str) -> AppResult<Option<ProfileRecord>>;

    /// Returns whether a profile name is already taken, case-insensitively,
    /// optionally excluding one profile from the check.
    async fn profile_name_exists(
        &self,
        name: &str,
        exclude_profile_id: Option<&str>,
    ) -> AppResult<bool>;

    /// Creates a profile, allocating the next sequential identifier from
    /// the highest stored code inside one transaction.
    async fn create_profile(&self, name: &str) -> AppResult<ProfileRecord>;

    /// Renames an existing profile.
    async fn rename_profile(&self, profile_id: &str, name: &str) -> AppResult<()>;

    /// Deletes a profile row.
    async fn delete_profile(&self, profile_id: &str) -> AppResult<()>;

    /// Returns whether the profile still has menu overrides assigned.
    async fn has_access_assignments(&self, profile_id: &str) -> AppResult<bool>;
}
