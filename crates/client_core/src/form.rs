//! New-request form: draft state, debounced quantity validation and the
//! submit state machine.

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use shared::{
    catalog,
    error::QuantityError,
    protocol::{CreateRequestPayload, ResourceRequest},
};
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, error, info};

use crate::{
    api::ResourceRequestApi,
    debounce::Debouncer,
    session::SchoolSession,
    validation::{CatalogValidator, QuantityValidator},
    DashboardEvent,
};

pub const DEFAULT_VALIDATION_DEBOUNCE: Duration = Duration::from_millis(300);
pub const DEFAULT_REQUESTER_ROLE: &str = "admin_1";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSettings {
    pub validation_debounce: Duration,
    pub requester_role: String,
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            validation_debounce: DEFAULT_VALIDATION_DEBOUNCE,
            requester_role: DEFAULT_REQUESTER_ROLE.to_string(),
        }
    }
}

/// Unsaved contents of the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormDraft {
    pub resource_type: Option<String>,
    pub quantity: String,
    pub description: String,
    pub quantity_error: Option<String>,
    pub is_submitting: bool,
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("missing school id or school name")]
    MissingSchoolIdentity,
    #[error("no resource type selected")]
    NoResourceType,
    #[error("quantity is invalid: {0}")]
    OutstandingValidationError(String),
    #[error("description is required")]
    MissingDescription,
    #[error("a submission is already in progress")]
    AlreadySubmitting,
    #[error(transparent)]
    InvalidQuantity(#[from] QuantityError),
    #[error("failed to create resource request: {0}")]
    Create(#[source] anyhow::Error),
}

struct FormState {
    draft: Mutex<FormDraft>,
    validator: Arc<dyn QuantityValidator>,
}

impl FormState {
    fn lock_draft(&self) -> MutexGuard<'_, FormDraft> {
        self.draft.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check(&self, draft: &FormDraft) -> Result<u32, QuantityError> {
        let resource_type = draft.resource_type.as_deref().unwrap_or_default();
        self.validator.validate(resource_type, &draft.quantity)
    }

    fn revalidate(&self, draft: &mut FormDraft) {
        draft.quantity_error = self.check(draft).err().map(|err| err.to_string());
    }
}

/// Clears `is_submitting` however the submit future ends, including when it
/// is dropped mid-request.
struct SubmittingGuard<'a> {
    state: &'a FormState,
}

impl Drop for SubmittingGuard<'_> {
    fn drop(&mut self) {
        self.state.lock_draft().is_submitting = false;
    }
}

pub struct RequestFormController {
    api: Arc<dyn ResourceRequestApi>,
    session: SchoolSession,
    requester_role: String,
    state: Arc<FormState>,
    debouncer: Debouncer,
    events: broadcast::Sender<DashboardEvent>,
}

impl RequestFormController {
    pub fn new(
        api: Arc<dyn ResourceRequestApi>,
        session: SchoolSession,
        settings: FormSettings,
        events: broadcast::Sender<DashboardEvent>,
    ) -> Self {
        Self::with_validator(api, session, settings, events, Arc::new(CatalogValidator))
    }

    pub fn with_validator(
        api: Arc<dyn ResourceRequestApi>,
        session: SchoolSession,
        settings: FormSettings,
        events: broadcast::Sender<DashboardEvent>,
        validator: Arc<dyn QuantityValidator>,
    ) -> Self {
        Self {
            api,
            session,
            requester_role: settings.requester_role,
            state: Arc::new(FormState {
                draft: Mutex::new(FormDraft::default()),
                validator,
            }),
            debouncer: Debouncer::new(settings.validation_debounce),
            events,
        }
    }

    pub fn session(&self) -> &SchoolSession {
        &self.session
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<DashboardEvent> {
        self.events.subscribe()
    }

    pub fn draft(&self) -> FormDraft {
        self.state.lock_draft().clone()
    }

    pub fn quantity_error(&self) -> Option<String> {
        self.state.lock_draft().quantity_error.clone()
    }

    pub fn is_submitting(&self) -> bool {
        self.state.lock_draft().is_submitting
    }

    /// Whether the submit action is enabled.
    pub fn can_submit(&self) -> bool {
        let draft = self.state.lock_draft();
        !draft.is_submitting && draft.quantity_error.is_none()
    }

    pub fn has_pending_validation(&self) -> bool {
        self.debouncer.is_pending()
    }

    pub fn quantity_placeholder(&self) -> String {
        match self.state.lock_draft().resource_type.as_deref() {
            Some(resource_type) => {
                format!("Enter quantity in {}", catalog::unit_for(resource_type))
            }
            None => "Select a resource type first".to_string(),
        }
    }

    /// Selects a resource type. An entered quantity is re-checked against
    /// the new type's rule right away; a pending debounced check is dropped.
    ///
    /// Like the other setters, this ignores input while a submission is in
    /// flight.
    pub fn set_type(&self, resource_type: impl Into<String>) {
        let resource_type = resource_type.into();
        let mut draft = self.state.lock_draft();
        if draft.is_submitting {
            debug!(%resource_type, "form locked while submitting; ignoring type change");
            return;
        }
        self.debouncer.cancel();
        draft.resource_type = (!resource_type.is_empty()).then_some(resource_type);
        if !draft.quantity.is_empty() {
            self.state.revalidate(&mut draft);
        }
    }

    /// Stores the text as typed and, with a type selected, arms the
    /// debounced check of the latest text.
    pub fn set_quantity(&self, quantity: impl Into<String>) {
        let mut draft = self.state.lock_draft();
        if draft.is_submitting {
            debug!("form locked while submitting; ignoring quantity edit");
            return;
        }
        draft.quantity = quantity.into();
        if draft.resource_type.is_none() {
            return;
        }

        let state = Arc::clone(&self.state);
        let armed = self.debouncer.schedule(move |ticket| {
            let mut draft = state.lock_draft();
            if ticket.is_current() {
                state.revalidate(&mut draft);
            }
        });
        if !armed {
            debug!("no async runtime for debounced validation; validating inline");
            self.state.revalidate(&mut draft);
        }
    }

    pub fn set_description(&self, description: impl Into<String>) {
        let mut draft = self.state.lock_draft();
        if draft.is_submitting {
            debug!("form locked while submitting; ignoring description edit");
            return;
        }
        draft.description = description.into();
    }

    /// Submits the draft once.
    ///
    /// On success the created record, as returned by the service, is
    /// published as [`DashboardEvent::RequestCreated`] and the draft is
    /// cleared. On failure the draft is left as it was so the user can retry.
    pub async fn submit(&self) -> Result<ResourceRequest, SubmitError> {
        let Some((school_id, school_name)) = self.session.identity() else {
            error!("missing school id or school name; submission blocked");
            return Err(SubmitError::MissingSchoolIdentity);
        };

        let (payload, _guard) = {
            let mut draft = self.state.lock_draft();
            let Some(resource_type) = draft.resource_type.clone() else {
                return Err(SubmitError::NoResourceType);
            };
            if let Some(message) = &draft.quantity_error {
                return Err(SubmitError::OutstandingValidationError(message.clone()));
            }
            if draft.is_submitting {
                return Err(SubmitError::AlreadySubmitting);
            }

            // The last keystroke may still be inside the debounce window.
            self.debouncer.cancel();
            let quantity = match self.state.check(&draft) {
                Ok(quantity) => quantity,
                Err(err) => {
                    draft.quantity_error = Some(err.to_string());
                    return Err(err.into());
                }
            };
            if draft.description.trim().is_empty() {
                return Err(SubmitError::MissingDescription);
            }

            draft.is_submitting = true;
            let payload = CreateRequestPayload {
                school_id: school_id.clone(),
                school_name: school_name.to_string(),
                resource_type,
                quantity,
                description: draft.description.clone(),
                requester_role: self.requester_role.clone(),
            };
            (payload, SubmittingGuard { state: self.state.as_ref() })
        };

        match self.api.create_request(&payload).await {
            Ok(record) => {
                info!(
                    request_id = %record.id,
                    resource_type = %record.resource_type,
                    quantity = record.quantity,
                    "created resource request"
                );
                self.reset();
                let _ = self
                    .events
                    .send(DashboardEvent::RequestCreated(record.clone()));
                Ok(record)
            }
            Err(err) => {
                error!(
                    %school_id,
                    resource_type = %payload.resource_type,
                    error = %err,
                    "failed to create resource request"
                );
                let _ = self.events.send(DashboardEvent::Error(format!(
                    "Failed to create request: {err}"
                )));
                Err(SubmitError::Create(err))
            }
        }
    }

    fn reset(&self) {
        let mut draft = self.state.lock_draft();
        self.debouncer.cancel();
        *draft = FormDraft {
            is_submitting: draft.is_submitting,
            ..FormDraft::default()
        };
    }
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;
