//! Client-side logic of the principal's dashboard: the new-request form, the
//! request list aggregator and the HTTP collaborator they talk to.

use shared::protocol::ResourceRequest;

pub mod aggregator;
pub mod api;
pub mod dashboard;
pub mod debounce;
pub mod form;
pub mod http;
pub mod session;
pub mod validation;

pub use aggregator::{DashboardAggregator, StatusCounts};
pub use api::{MissingResourceRequestApi, ResourceRequestApi};
pub use dashboard::PrincipalDashboard;
pub use form::{FormDraft, FormSettings, RequestFormController, SubmitError};
pub use http::HttpResourceRequestApi;
pub use session::SchoolSession;
pub use validation::{CatalogValidator, QuantityValidator};

#[derive(Debug, Clone)]
pub enum DashboardEvent {
    RequestCreated(ResourceRequest),
    RequestUpdated(ResourceRequest),
    Error(String),
}

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
