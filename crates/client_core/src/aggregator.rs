use serde::Serialize;
use shared::{
    domain::{RequestId, RequestStatus, SchoolId},
    protocol::ResourceRequest,
};
use tracing::{debug, error, warn};

use crate::{api::ResourceRequestApi, DashboardEvent};

/// Number of requests per known status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub pending: usize,
    pub moved: usize,
    pub allocated: usize,
}

impl StatusCounts {
    pub fn total(&self) -> usize {
        self.pending + self.moved + self.allocated
    }
}

/// Request list of the current dashboard session, most recent first.
#[derive(Debug, Default)]
pub struct DashboardAggregator {
    requests: Vec<ResourceRequest>,
    loaded: bool,
}

impl DashboardAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> &[ResourceRequest] {
        &self.requests
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Fetches the school's requests. Runs once; later calls are ignored.
    ///
    /// A failed fetch leaves the list as it was. Records merged in before the
    /// fetch completed stay on top unless the server already returned them.
    pub async fn load_initial(
        &mut self,
        api: &dyn ResourceRequestApi,
        school_id: Option<&SchoolId>,
    ) -> usize {
        if self.loaded {
            debug!("request list already loaded");
            return self.requests.len();
        }
        self.loaded = true;

        let Some(school_id) = school_id else {
            error!("no school id available; showing an empty request list");
            return self.requests.len();
        };

        match api.list_requests(school_id).await {
            Ok(fetched) => {
                let mut merged: Vec<ResourceRequest> = self
                    .requests
                    .drain(..)
                    .filter(|local| fetched.iter().all(|remote| remote.id != local.id))
                    .collect();
                merged.extend(fetched);
                self.requests = merged;
                debug!(%school_id, count = self.requests.len(), "loaded resource requests");
            }
            Err(err) => {
                error!(%school_id, error = %err, "failed to fetch resource requests");
            }
        }
        self.requests.len()
    }

    pub fn on_request_created(&mut self, record: ResourceRequest) {
        self.requests.insert(0, record);
    }

    /// Replaces the entry with the same id in place. Returns `false` when no
    /// entry matches.
    pub fn on_request_updated(&mut self, record: ResourceRequest) -> bool {
        match self.requests.iter_mut().find(|entry| entry.id == record.id) {
            Some(entry) => {
                *entry = record;
                true
            }
            None => {
                warn!(request_id = %record.id, "update for unknown resource request ignored");
                false
            }
        }
    }

    pub fn attach_proof(&mut self, id: &RequestId, proof: impl Into<String>) -> bool {
        match self.requests.iter_mut().find(|entry| &entry.id == id) {
            Some(entry) => {
                entry.proof = Some(proof.into());
                true
            }
            None => {
                warn!(request_id = %id, "proof for unknown resource request ignored");
                false
            }
        }
    }

    pub fn apply(&mut self, event: DashboardEvent) {
        match event {
            DashboardEvent::RequestCreated(record) => self.on_request_created(record),
            DashboardEvent::RequestUpdated(record) => {
                self.on_request_updated(record);
            }
            DashboardEvent::Error(_) => {}
        }
    }

    pub fn status_counts(&self) -> StatusCounts {
        self.requests
            .iter()
            .fold(StatusCounts::default(), |mut counts, request| {
                match request.status {
                    RequestStatus::Pending => counts.pending += 1,
                    RequestStatus::Moved => counts.moved += 1,
                    RequestStatus::Allocated => counts.allocated += 1,
                    RequestStatus::Other(_) => {}
                }
                counts
            })
    }
}

#[cfg(test)]
#[path = "tests/aggregator_tests.rs"]
mod tests;
