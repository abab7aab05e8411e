//! Teacher profile collaborator.
//!
//! Profiles are owned elsewhere; the reservation engine only reads them to decorate
//! rosters. [`MemoryProfiles`] is a process-local directory for demos and tests.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::ProfileError;
use crate::model::TeacherId;

/// Display fields for a teacher.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeacherProfile {
    pub teacher_id: TeacherId,
    pub email: String,
    pub name: String,
    pub school: String,
    pub subject: String,
    pub phone: String,
}

/// Lookup of teacher profiles by id.
#[async_trait]
pub trait ProfileDirectory: Debug + Send + Sync {
    /// `Ok(None)` when the teacher has no profile.
    async fn profile(
        &self,
        teacher_id: &TeacherId,
    ) -> Result<Option<TeacherProfile>, ProfileError>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryProfiles {
    profiles: Arc<RwLock<HashMap<TeacherId, TeacherProfile>>>,
}

impl MemoryProfiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the profile keyed by `profile.teacher_id`.
    pub async fn upsert(&self, profile: TeacherProfile) {
        self.profiles
            .write()
            .await
            .insert(profile.teacher_id.clone(), profile);
    }

    pub async fn remove(&self, teacher_id: &TeacherId) -> Option<TeacherProfile> {
        self.profiles.write().await.remove(teacher_id)
    }
}

#[async_trait]
impl ProfileDirectory for MemoryProfiles {
    async fn profile(
        &self,
        teacher_id: &TeacherId,
    ) -> Result<Option<TeacherProfile>, ProfileError> {
        Ok(self.profiles.read().await.get(teacher_id).cloned())
    }
}
