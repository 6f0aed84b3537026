// Requests against a remote collection resource.
// List with query parameters, delete by id, and form-encoded updates.

use std::sync::Arc;

use crate::config::Config;
use crate::error::{Result, TableError};
use crate::query::QueryParams;
use crate::session::Session;

use super::transport::{
    CONTENT_TYPE_FORM, CONTENT_TYPE_JSON, HttpMethod, HttpRequest, HttpResponse, Transport,
};
use super::types::PageResponse;

/// Client for one table's collection resource.
#[derive(Clone)]
pub struct ResourceClient {
    transport: Arc<dyn Transport>,
    session: Arc<dyn Session>,
    resource_url: String,
    collection_url: String,
}

impl ResourceClient {
    pub fn new(
        config: &Config,
        transport: Arc<dyn Transport>,
        session: Arc<dyn Session>,
    ) -> Self {
        Self {
            transport,
            session,
            resource_url: config.resource_url(),
            collection_url: config.collection_url(),
        }
    }

    pub fn resource_url(&self) -> &str {
        &self.resource_url
    }

    pub fn session(&self) -> &Arc<dyn Session> {
        &self.session
    }

    /// URL of the list endpoint for the given parameters.
    pub fn list_url(&self, params: &QueryParams) -> String {
        with_query(&self.resource_url, params)
    }

    pub fn delete_url(&self, id: i64) -> String {
        format!("{}/{}", self.collection_url, id)
    }

    pub fn update_url(&self, id: i64, params: &QueryParams) -> String {
        with_query(&format!("{}/{}", self.resource_url, id), params)
    }

    /// Fetch one page. Any non-2xx status is an error.
    pub async fn fetch_page(&self, params: &QueryParams) -> Result<PageResponse> {
        let request = self.request(HttpMethod::Get, self.list_url(params), CONTENT_TYPE_JSON);
        let response = self.send(request).await?;

        if !response.ok() {
            return Err(TableError::Status {
                status: response.status,
            });
        }
        response.json()
    }

    /// Delete one item. The caller inspects the status.
    pub async fn delete(&self, id: i64) -> Result<HttpResponse> {
        let request = self.request(HttpMethod::Delete, self.delete_url(id), CONTENT_TYPE_JSON);
        self.send(request).await
    }

    /// Update one item. The fields travel both in the query string and the body.
    pub async fn update(&self, id: i64, fields: &QueryParams) -> Result<HttpResponse> {
        let request = self
            .request(HttpMethod::Put, self.update_url(id, fields), CONTENT_TYPE_FORM)
            .body(fields.to_query_string());
        self.send(request).await
    }

    fn request(&self, method: HttpMethod, url: String, content_type: &str) -> HttpRequest {
        let mut request = HttpRequest::new(method, url);
        if let Some(token) = self.session.current_token() {
            request = request.header("Authorization", format!("Bearer {}", token));
        }
        request.header("Content-Type", content_type)
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        log::debug!("{} {}", request.method.as_str(), request.url);
        let response = self.transport.send(request).await?;
        log::debug!("-> {}", response.status);
        Ok(response)
    }
}

fn with_query(base: &str, params: &QueryParams) -> String {
    if params.is_empty() {
        base.to_string()
    } else {
        format!("{}?{}", base, params)
    }
}
