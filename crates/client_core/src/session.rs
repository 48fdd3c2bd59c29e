use shared::domain::SchoolId;
use tracing::{error, info};

use crate::api::ResourceRequestApi;

/// Identity of the school the dashboard acts for, resolved once when the
/// dashboard mounts and handed to the components that need it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchoolSession {
    school_id: Option<SchoolId>,
    school_name: Option<String>,
}

impl SchoolSession {
    pub fn new(school_id: SchoolId, school_name: impl Into<String>) -> Self {
        Self {
            school_id: Some(school_id),
            school_name: Some(school_name.into()),
        }
    }

    pub fn unresolved(school_id: Option<SchoolId>) -> Self {
        Self {
            school_id,
            school_name: None,
        }
    }

    /// Looks up the display name for `school_id`.
    ///
    /// Failures are logged and leave the name unset; the session is still
    /// usable for read-only views but blocks submission.
    pub async fn resolve(api: &dyn ResourceRequestApi, school_id: Option<SchoolId>) -> Self {
        let Some(school_id) = school_id else {
            error!("no school id configured for this session");
            return Self::default();
        };

        match api.school_name(&school_id).await {
            Ok(school_name) => {
                info!(%school_id, %school_name, "resolved school name");
                Self::new(school_id, school_name)
            }
            Err(err) => {
                error!(%school_id, error = %err, "failed to fetch school name");
                Self::unresolved(Some(school_id))
            }
        }
    }

    pub fn school_id(&self) -> Option<&SchoolId> {
        self.school_id.as_ref()
    }

    pub fn school_name(&self) -> Option<&str> {
        self.school_name.as_deref()
    }

    /// Both halves of the identity, present only when submission is allowed.
    pub fn identity(&self) -> Option<(&SchoolId, &str)> {
        Some((self.school_id.as_ref()?, self.school_name.as_deref()?))
    }
}
