// Async HTTP client for the customers collection.
//
// GET   <endpoint>        list
// POST  <endpoint>        create
// PUT   <endpoint>        full-record replace
// DELETE <endpoint>/<id>  remove

use reqwest::header::HeaderMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::auth::BearerToken;
use crate::error::{Error, FieldError};
use crate::transport::TransportConfig;
use crate::types::CustomerRecord;

/// Async client for one customers collection endpoint.
///
/// Every call is sent exactly once. Retries are the caller's business.
pub struct CustomersClient {
    http: reqwest::Client,
    endpoint: Url,
    token: BearerToken,
}

impl CustomersClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from the collection URL, a bearer credential and transport settings.
    pub fn new(
        endpoint: &str,
        token: BearerToken,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::from_reqwest(endpoint, http, token)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn from_reqwest(
        endpoint: &str,
        http: reqwest::Client,
        token: BearerToken,
    ) -> Result<Self, Error> {
        let endpoint = Self::normalize_endpoint(endpoint)?;
        if !token.is_configured() {
            warn!(%endpoint, "no bearer token configured; mutating requests will send an empty token");
        }
        Ok(Self {
            http,
            endpoint,
            token,
        })
    }

    /// Strip trailing slashes so `<endpoint>/<id>` joins cleanly.
    fn normalize_endpoint(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        if url.cannot_be_a_base() {
            return Err(Error::InvalidUrl(
                url::ParseError::RelativeUrlWithCannotBeABaseBase,
            ));
        }
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&path);
        Ok(url)
    }

    /// The collection URL requests are sent to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// `<endpoint>/<id>` with `id` encoded as a single path segment.
    fn item_url(&self, id: &str) -> Url {
        let mut url = self.endpoint.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(id);
        }
        url
    }

    fn mutation_headers(&self) -> Result<HeaderMap, Error> {
        self.token.mutation_headers()
    }

    // ── Public API ───────────────────────────────────────────────────

    /// Fetch the full customer list. No filtering, no pagination.
    pub async fn list(&self) -> Result<Vec<CustomerRecord>, Error> {
        let url = self.endpoint.clone();
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        handle_response(resp).await
    }

    /// Insert a customer; returns the record as stored by the server.
    pub async fn create(&self, record: &CustomerRecord) -> Result<CustomerRecord, Error> {
        self.send_json(reqwest::Method::POST, record).await
    }

    /// Replace a customer. The identifier travels in the body.
    pub async fn update(&self, record: &CustomerRecord) -> Result<CustomerRecord, Error> {
        self.send_json(reqwest::Method::PUT, record).await
    }

    /// Remove a customer by identifier. Any response body is ignored.
    pub async fn delete(&self, id: &str) -> Result<(), Error> {
        let url = self.item_url(id);
        debug!("DELETE {url}");

        let resp = self
            .http
            .delete(url)
            .headers(self.mutation_headers()?)
            .send()
            .await?;
        handle_empty(resp).await
    }

    async fn send_json<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        method: reqwest::Method,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.endpoint.clone();
        debug!("{method} {url}");

        let resp = self
            .http
            .request(method, url)
            .headers(self.mutation_headers()?)
            .json(body)
            .send()
            .await?;
        handle_response(resp).await
    }
}

// ── Response handling ────────────────────────────────────────────────

async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
    let status = resp.status();
    if status.is_success() {
        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body,
            }
        })
    } else {
        Err(parse_error(status, resp).await)
    }
}

async fn handle_empty(resp: reqwest::Response) -> Result<(), Error> {
    let status = resp.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(parse_error(status, resp).await)
    }
}

async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
    let raw = resp.text().await.unwrap_or_default();
    let parsed = serde_json::from_str::<Value>(&raw).ok();

    let field_errors = parsed.as_ref().map(extract_field_errors).unwrap_or_default();

    let message = match &parsed {
        Some(Value::Object(object)) => object
            .get("title")
            .or_else(|| object.get("message"))
            .and_then(Value::as_str)
            .map(str::to_owned),
        Some(Value::String(text)) => Some(text.clone()),
        Some(_) => None,
        None => Some(raw.trim().to_owned()),
    }
    .filter(|m| !m.is_empty())
    .unwrap_or_else(|| status.to_string());

    Error::Api {
        status: status.as_u16(),
        message,
        field_errors,
    }
}

/// Pull field-level messages out of an error body.
///
/// Problem-details bodies (`{"errors": {...}}`) contribute their `errors`
/// map; any other object contributes its string values. Order follows the
/// body.
pub fn extract_field_errors(body: &Value) -> Vec<FieldError> {
    let Some(object) = body.as_object() else {
        return Vec::new();
    };

    let source = object
        .get("errors")
        .and_then(Value::as_object)
        .unwrap_or(object);

    let mut out = Vec::new();
    for (field, value) in source {
        match value {
            Value::String(msg) => out.push(FieldError::new(field, msg)),
            Value::Array(items) => out.extend(
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(|msg| FieldError::new(field, msg)),
            ),
            _ => {}
        }
    }
    out
}
