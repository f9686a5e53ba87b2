use std::collections::HashSet;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use examina_application::{ProfileRecord, ProfileRepository};
use examina_core::AppResult;
use examina_domain::next_code;

#[derive(Debug, Default)]
struct Store {
    profiles: Vec<ProfileRecord>,
    assigned: HashSet<String>,
}

/// In-memory profile repository used by handler tests.
#[derive(Debug, Default)]
pub struct InMemoryProfileRepository {
    store: RwLock<Store>,
}

impl InMemoryProfileRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: RwLock::new(Store::default()),
        }
    }

    /// Adds a profile row directly, bypassing id allocation.
    pub async fn seed_profile(&self, profile_id: &str, name: &str) {
        let now = timestamp();
        self.store.write().await.profiles.push(ProfileRecord {
            profile_id: profile_id.to_owned(),
            name: name.to_owned(),
            created_at: now.clone(),
            updated_at: now,
        });
    }

    /// Marks a profile as having menu overrides assigned.
    pub async fn seed_assignment(&self, profile_id: &str) {
        self.store.write().await.assigned.insert(profile_id.to_owned());
    }
}

fn timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

#[async_trait]
impl ProfileRepository for InMemoryProfileRepository {
    async fn list_profiles(&self) -> AppResult<Vec<ProfileRecord>> {
        let mut profiles = self.store.read().await.profiles.clone();
        profiles.sort_by(|left, right| left.profile_id.cmp(&right.profile_id));
        Ok(profiles)
    }

    async fn find_profile(&self, profile_id: &str) -> AppResult<Option<ProfileRecord>> {
        Ok(self
            .store
            .read()
            .await
            .profiles
            .iter()
            .find(|profile| profile.profile_id == profile_id)
            .cloned())
    }

    async fn profile_name_exists(
        &self,
        name: &str,
        exclude_profile_id: Option<&str>,
    ) -> AppResult<bool> {
        Ok(self.store.read().await.profiles.iter().any(|profile| {
            profile.name.eq_ignore_ascii_case(name)
                && exclude_profile_id != Some(profile.profile_id.as_str())
        }))
    }

    async fn create_profile(&self, name: &str) -> AppResult<ProfileRecord> {
        let mut store = self.store.write().await;

        let last = store
            .profiles
            .iter()
            .map(|profile| profile.profile_id.as_str())
            .max()
            .unwrap_or("PF0000");
        let now = timestamp();
        let record = ProfileRecord {
            profile_id: next_code(last),
            name: name.to_owned(),
            created_at: now.clone(),
            updated_at: now,
        };

        store.profiles.push(record.clone());
        Ok(record)
    }

    async fn rename_profile(&self, profile_id: &str, name: &str) -> AppResult<()> {
        let mut store = self.store.write().await;
        for profile in store.profiles.iter_mut() {
            if profile.profile_id == profile_id {
                profile.name = name.to_owned();
                profile.updated_at = timestamp();
            }
        }
        Ok(())
    }

    async fn delete_profile(&self, profile_id: &str) -> AppResult<()> {
        self.store
            .write()
            .await
            .profiles
            .retain(|profile| profile.profile_id != profile_id);
        Ok(())
    }

    async fn has_access_assignments(&self, profile_id: &str) -> AppResult<bool> {
        Ok(self.store.read().await.assigned.contains(profile_id))
    }
}
