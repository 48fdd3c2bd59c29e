//! Fakes shared by the unit tests of this crate.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use shared::{
    domain::{RequestId, RequestStatus, SchoolId},
    error::QuantityError,
    protocol::{CreateRequestPayload, ResourceRequest},
};
use tokio::sync::Notify;

use crate::{
    api::ResourceRequestApi,
    session::SchoolSession,
    validation::{CatalogValidator, QuantityValidator},
};

pub const SCHOOL_ID: &str = "09270100101";
pub const SCHOOL_NAME: &str = "GPS Rampur";

pub fn school_session() -> SchoolSession {
    SchoolSession::new(SchoolId::new(SCHOOL_ID), SCHOOL_NAME)
}

pub fn request_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 15).expect("date")
}

pub fn sample_request(id: &str, status: &str) -> ResourceRequest {
    ResourceRequest {
        id: RequestId::new(id),
        school_id: SchoolId::new(SCHOOL_ID),
        school_name: SCHOOL_NAME.to_string(),
        resource_type: "Chairs".to_string(),
        quantity: 10,
        description: format!("request {id}"),
        status: RequestStatus::from(status),
        request_date: request_date(),
        proof: None,
    }
}

#[derive(Default)]
pub struct FakeApi {
    requests: Vec<ResourceRequest>,
    list_error: Option<String>,
    school_name: Option<String>,
    create_error: Option<String>,
    create_gate: Option<Arc<Notify>>,
    pub create_entered: Arc<Notify>,
    created: Mutex<Vec<CreateRequestPayload>>,
    list_calls: AtomicUsize,
}

impl FakeApi {
    pub fn new() -> Self {
        Self {
            school_name: Some(SCHOOL_NAME.to_string()),
            ..Self::default()
        }
    }

    pub fn with_requests(mut self, requests: Vec<ResourceRequest>) -> Self {
        self.requests = requests;
        self
    }

    pub fn failing_list(mut self, err: impl Into<String>) -> Self {
        self.list_error = Some(err.into());
        self
    }

    pub fn without_school_name(mut self) -> Self {
        self.school_name = None;
        self
    }

    pub fn failing_create(mut self, err: impl Into<String>) -> Self {
        self.create_error = Some(err.into());
        self
    }

    /// Makes `create_request` wait for `gate` after recording the payload.
    pub fn gated_create(mut self, gate: Arc<Notify>) -> Self {
        self.create_gate = Some(gate);
        self
    }

    pub fn created(&self) -> Vec<CreateRequestPayload> {
        self.created.lock().expect("created").clone()
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ResourceRequestApi for FakeApi {
    async fn list_requests(&self, _school_id: &SchoolId) -> Result<Vec<ResourceRequest>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = &self.list_error {
            return Err(anyhow!(err.clone()));
        }
        Ok(self.requests.clone())
    }

    async fn school_name(&self, school_id: &SchoolId) -> Result<String> {
        self.school_name
            .clone()
            .ok_or_else(|| anyhow!("school name not found in response for {school_id}"))
    }

    async fn create_request(&self, payload: &CreateRequestPayload) -> Result<ResourceRequest> {
        self.created.lock().expect("created").push(payload.clone());
        self.create_entered.notify_one();
        if let Some(gate) = &self.create_gate {
            gate.notified().await;
        }
        if let Some(err) = &self.create_error {
            return Err(anyhow!(err.clone()));
        }

        Ok(ResourceRequest {
            id: RequestId::new(uuid::Uuid::new_v4().to_string()),
            school_id: payload.school_id.clone(),
            school_name: payload.school_name.clone(),
            resource_type: payload.resource_type.clone(),
            quantity: payload.quantity,
            description: payload.description.clone(),
            status: RequestStatus::Pending,
            request_date: request_date(),
            proof: None,
        })
    }
}

/// Catalog rule that records every evaluation.
#[derive(Default)]
pub struct CountingValidator {
    calls: Mutex<Vec<(String, String)>>,
}

impl CountingValidator {
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().expect("calls").clone()
    }
}

impl QuantityValidator for CountingValidator {
    fn validate(&self, resource_type: &str, quantity: &str) -> Result<u32, QuantityError> {
        self.calls
            .lock()
            .expect("calls")
            .push((resource_type.to_string(), quantity.to_string()));
        CatalogValidator.validate(resource_type, quantity)
    }
}
