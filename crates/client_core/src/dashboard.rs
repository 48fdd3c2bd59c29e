use std::sync::Arc;

use shared::{
    domain::{RequestId, SchoolId},
    protocol::ResourceRequest,
};
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::warn;

use crate::{
    aggregator::{DashboardAggregator, StatusCounts},
    api::ResourceRequestApi,
    form::{FormSettings, RequestFormController},
    session::SchoolSession,
    DashboardEvent,
};

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Composition root of the principal's dashboard page: resolves the school
/// session, owns the request list and wires the form's events into it.
pub struct PrincipalDashboard {
    aggregator: DashboardAggregator,
    form: RequestFormController,
    events: broadcast::Receiver<DashboardEvent>,
    last_error: Option<String>,
}

impl PrincipalDashboard {
    pub async fn mount(
        api: Arc<dyn ResourceRequestApi>,
        school_id: Option<SchoolId>,
        settings: FormSettings,
    ) -> Self {
        let mut aggregator = DashboardAggregator::new();
        let (session, _) = tokio::join!(
            SchoolSession::resolve(api.as_ref(), school_id.clone()),
            aggregator.load_initial(api.as_ref(), school_id.as_ref()),
        );

        let (events_tx, events) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let form = RequestFormController::new(api, session, settings, events_tx);
        Self {
            aggregator,
            form,
            events,
            last_error: None,
        }
    }

    pub fn form(&self) -> &RequestFormController {
        &self.form
    }

    pub fn session(&self) -> &SchoolSession {
        self.form.session()
    }

    pub fn requests(&self) -> &[ResourceRequest] {
        self.aggregator.requests()
    }

    pub fn status_counts(&self) -> StatusCounts {
        self.aggregator.status_counts()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Callback for the request list when a record changed elsewhere.
    pub fn on_request_updated(&mut self, record: ResourceRequest) -> bool {
        self.aggregator.on_request_updated(record)
    }

    pub fn on_proof_uploaded(&mut self, id: &RequestId, proof: impl Into<String>) -> bool {
        self.aggregator.attach_proof(id, proof)
    }

    /// Applies every event published since the last call. Returns how many
    /// were applied.
    pub fn drain_events(&mut self) -> usize {
        let mut applied = 0;
        loop {
            match self.events.try_recv() {
                Ok(event) => {
                    if let DashboardEvent::Error(message) = &event {
                        self.last_error = Some(message.clone());
                    }
                    self.aggregator.apply(event);
                    applied += 1;
                }
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "dashboard fell behind on form events");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
        applied
    }
}

#[cfg(test)]
#[path = "tests/dashboard_tests.rs"]
mod tests;
