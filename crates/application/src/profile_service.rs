use std::sync::Arc;

use examina_core::{AppError, AppResult, NonEmptyString};
use examina_domain::is_admin_profile;

use crate::profile_ports::{ProfileRecord, ProfileRepository};

/// Application service for profile administration.
#[derive(Clone)]
pub struct ProfileService {
    repository: Arc<dyn ProfileRepository>,
}

impl ProfileService {
    /// Creates a new service from its repository.
    #[must_use]
    pub fn new(repository: Arc<dyn ProfileRepository>) -> Self {
        Self { repository }
    }

    /// Lists all profiles.
    pub async fn list_profiles(&self) -> AppResult<Vec<ProfileRecord>> {
        self.repository.list_profiles().await
    }

    /// Creates a profile with a unique name and the next sequential id.
    pub async fn create_profile(&self, name: &str) -> AppResult<ProfileRecord> {
        let name = NonEmptyString::new(name)?;

        if self
            .repository
            .profile_name_exists(name.as_str(), None)
            .await?
        {
            return Err(AppError::Conflict(format!(
                "profile name '{}' is already in use",
                name.as_str()
            )));
        }

        self.repository.create_profile(name.as_str()).await
    }

    /// Renames an existing profile.
    ///
    /// The Administrator profile is immutable; duplicate names are rejected
    /// case-insensitively.
    pub async fn rename_profile(&self, profile_id: &str, name: &str) -> AppResult<()> {
        if is_admin_profile(profile_id) {
            return Err(AppError::Forbidden(
                "the administrator profile cannot be edited".to_owned(),
            ));
        }

        let name = NonEmptyString::new(name)?;

        if self.repository.find_profile(profile_id).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "profile '{profile_id}' was not found"
            )));
        }

        if self
            .repository
            .profile_name_exists(name.as_str(), Some(profile_id))
            .await?
        {
            return Err(AppError::Conflict(format!(
                "profile name '{}' is already in use",
                name.as_str()
            )));
        }

        self.repository.rename_profile(profile_id, name.as_str()).await
    }

    /// Deletes a profile that has no access overrides assigned.
    pub async fn delete_profile(&self, profile_id: &str) -> AppResult<()> {
        if self.repository.find_profile(profile_id).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "profile '{profile_id}' was not found"
            )));
        }

        if is_admin_profile(profile_id) {
            return Err(AppError::Forbidden(
                "the administrator profile cannot be deleted".to_owned(),
            ));
        }

        if self.repository.has_access_assignments(profile_id).await? {
            return Err(AppError::Conflict(format!(
                "profile '{profile_id}' still has accesses assigned"
            )));
        }

        self.repository.delete_profile(profile_id).await
    }
}
