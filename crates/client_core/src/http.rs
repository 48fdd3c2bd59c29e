use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::SchoolId,
    error::ApiError,
    protocol::{CreateRequestPayload, ResourceRequest, SchoolNameResponse},
};
use tracing::debug;
use url::Url;

use crate::api::ResourceRequestApi;

const LIST_PATH: &str = "api/resource-request/principal/list";
const SCHOOL_NAME_PATH: &str = "api/resource-request/principal/get-name";
const CREATE_PATH: &str = "api/resource-request/principal/create";

/// [`ResourceRequestApi`] over the principal endpoints of the web API.
pub struct HttpResourceRequestApi {
    http: Client,
    base_url: Url,
}

impl HttpResourceRequestApi {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build http client")?;
        Self::with_client(http, base_url)
    }

    pub fn with_client(http: Client, base_url: &str) -> Result<Self> {
        let mut base_url = Url::parse(base_url.trim())
            .with_context(|| format!("invalid api base url '{base_url}'"))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .with_context(|| format!("failed to build url for '{path}'"))
    }
}

async fn decode_json<T: DeserializeOwned>(response: Response, operation: &str) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(match serde_json::from_str::<ApiError>(&body) {
            Ok(api_error) => anyhow!(
                "{operation} failed with {status}: {:?}: {}",
                api_error.code,
                api_error.message
            ),
            Err(_) => anyhow!("{operation} failed with {status}"),
        });
    }
    response
        .json::<T>()
        .await
        .with_context(|| format!("invalid {operation} response body"))
}

#[async_trait]
impl ResourceRequestApi for HttpResourceRequestApi {
    async fn list_requests(&self, school_id: &SchoolId) -> Result<Vec<ResourceRequest>> {
        let response = self
            .http
            .get(self.endpoint(LIST_PATH)?)
            .query(&[("udise_code", school_id.as_str())])
            .send()
            .await
            .context("failed to fetch resource requests")?;
        let requests: Vec<ResourceRequest> = decode_json(response, "list requests").await?;
        debug!(%school_id, count = requests.len(), "fetched resource requests");
        Ok(requests)
    }

    async fn school_name(&self, school_id: &SchoolId) -> Result<String> {
        let response = self
            .http
            .get(self.endpoint(SCHOOL_NAME_PATH)?)
            .query(&[("udise_code", school_id.as_str())])
            .send()
            .await
            .context("failed to fetch school name")?;
        let body: SchoolNameResponse = decode_json(response, "school name lookup").await?;
        body.school_name
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| anyhow!("school name not found in response for {school_id}"))
    }

    async fn create_request(&self, payload: &CreateRequestPayload) -> Result<ResourceRequest> {
        let response = self
            .http
            .post(self.endpoint(CREATE_PATH)?)
            .json(payload)
            .send()
            .await
            .context("failed to send create request")?;
        decode_json(response, "create request").await
    }
}

#[cfg(test)]
#[path = "tests/http_tests.rs"]
mod tests;
