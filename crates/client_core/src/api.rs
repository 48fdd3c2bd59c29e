use anyhow::{anyhow, Result};
use async_trait::async_trait;
use shared::{
    domain::SchoolId,
    protocol::{CreateRequestPayload, ResourceRequest},
};

/// Backend collaborator the dashboard talks to.
#[async_trait]
pub trait ResourceRequestApi: Send + Sync {
    /// All requests filed by `school_id`, most recent first.
    async fn list_requests(&self, school_id: &SchoolId) -> Result<Vec<ResourceRequest>>;
    async fn school_name(&self, school_id: &SchoolId) -> Result<String>;
    /// Creates a request and returns the canonical stored record.
    async fn create_request(&self, payload: &CreateRequestPayload) -> Result<ResourceRequest>;
}

pub struct MissingResourceRequestApi;

#[async_trait]
impl ResourceRequestApi for MissingResourceRequestApi {
    async fn list_requests(&self, school_id: &SchoolId) -> Result<Vec<ResourceRequest>> {
        Err(anyhow!(
            "resource request api unavailable for school {school_id}"
        ))
    }

    async fn school_name(&self, school_id: &SchoolId) -> Result<String> {
        Err(anyhow!(
            "resource request api unavailable for school {school_id}"
        ))
    }

    async fn create_request(&self, payload: &CreateRequestPayload) -> Result<ResourceRequest> {
        Err(anyhow!(
            "resource request api unavailable for school {}",
            payload.school_id
        ))
    }
}
