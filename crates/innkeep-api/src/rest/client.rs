// REST client
//
// Wraps `reqwest::Client` with base-URL joining, bearer authentication and
// `{ success, data, message }` envelope unwrapping. Endpoint families live in
// sibling modules as inherent methods so this file stays focused on
// transport mechanics.

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::models::EntityId;
use crate::transport::TransportConfig;

/// Application envelope wrapped around every JSON response.
#[derive(Debug, serde::Deserialize)]
struct Envelope {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    errors: Vec<Value>,
}

impl Envelope {
    fn message(&self) -> Option<String> {
        self.message.clone().or_else(|| self.error.clone())
    }

    /// Flatten the `errors` array into readable lines.
    fn details(&self) -> Vec<String> {
        self.errors
            .iter()
            .map(|e| match e {
                Value::String(s) => s.clone(),
                Value::Object(map) => {
                    let text = map
                        .get("msg")
                        .or_else(|| map.get("message"))
                        .and_then(Value::as_str)
                        .unwrap_or("invalid value");
                    match map
                        .get("path")
                        .or_else(|| map.get("param"))
                        .or_else(|| map.get("field"))
                        .and_then(Value::as_str)
                    {
                        Some(field) => format!("{field}: {text}"),
                        None => text.to_owned(),
                    }
                }
                other => other.to_string(),
            })
            .collect()
    }

    fn into_rejection(self) -> Error {
        let details = self.details();
        for detail in &details {
            debug!(detail = %detail, "validation error");
        }
        let message = self
            .message()
            .or_else(|| (!details.is_empty()).then(|| details.join("; ")))
            .unwrap_or_else(|| "Request rejected by server".into());
        Error::Rejected { message, details }
    }
}

/// Raw HTTP client for the Innkeep backend.
///
/// Cheap to clone. A client without a token can only reach the login
/// endpoint; [`ApiClient::with_token`] produces an authenticated copy.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    token: Option<SecretString>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("authenticated", &self.token.is_some())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client from a `TransportConfig`. `base_url` is the backend
    /// root, e.g. `https://api.innkeep.app`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url))
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, mut base_url: Url) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self {
            http,
            base_url,
            token: None,
        }
    }

    /// Authenticated copy of this client.
    pub fn with_token(&self, token: SecretString) -> Self {
        Self {
            token: Some(token),
            ..self.clone()
        }
    }

    /// Copy of this client with the bearer token dropped.
    pub fn without_token(&self) -> Self {
        Self {
            token: None,
            ..self.clone()
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn token(&self) -> Option<&SecretString> {
        self.token.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Join a backend path such as `api/guests/4` onto the base URL.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// `?property_id=...` for list endpoints, or nothing.
    pub(crate) fn scope(property_id: Option<&EntityId>) -> Vec<(&'static str, String)> {
        property_id
            .map(|id| vec![("property_id", id.to_string())])
            .unwrap_or_default()
    }

    // ── Request helpers ──────────────────────────────────────────────

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        self.get_query(path, &[] as &[(&str, String)]).await
    }

    pub(crate) async fn get_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &(impl Serialize + ?Sized + Sync),
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");
        let data = self.execute(path, self.http.get(url).query(query)).await?;
        decode(path, data)
    }

    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");
        let data = self.execute(path, self.http.post(url).json(body)).await?;
        decode(path, data)
    }

    /// POST whose response payload, if any, is not needed.
    pub(crate) async fn post_unit(
        &self,
        path: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("POST {url}");
        self.execute(path, self.http.post(url).json(body)).await?;
        Ok(())
    }

    /// POST returning the server's echo when it sends one.
    pub(crate) async fn post_echo<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<Option<T>, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");
        let data = self.execute(path, self.http.post(url).json(body)).await?;
        decode_optional(path, data)
    }

    pub(crate) async fn put<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("PUT {url}");
        let data = self.execute(path, self.http.put(url).json(body)).await?;
        decode(path, data)
    }

    pub(crate) async fn put_unit(
        &self,
        path: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("PUT {url}");
        self.execute(path, self.http.put(url).json(body)).await?;
        Ok(())
    }

    /// PATCH returning the server's echo of the entity when it sends one.
    pub(crate) async fn patch<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<Option<T>, Error> {
        let url = self.url(path)?;
        debug!("PATCH {url}");
        let data = self.execute(path, self.http.patch(url).json(body)).await?;
        decode_optional(path, data)
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("DELETE {url}");
        self.execute(path, self.http.delete(url)).await?;
        Ok(())
    }

    pub(crate) async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST (multipart) {url}");
        let data = self.execute(path, self.http.post(url).multipart(form)).await?;
        decode(path, data)
    }

    /// GET a non-enveloped binary body. Returns the content type and bytes.
    pub(crate) async fn get_bytes(
        &self,
        path: &str,
        query: &(impl Serialize + ?Sized + Sync),
    ) -> Result<(Option<String>, bytes::Bytes), Error> {
        let url = self.url(path)?;
        debug!("GET {url}");
        let resp = self.authorize(self.http.get(url).query(query)).send().await?;
        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(Error::Unauthorized {
                message: "session expired or invalid token".into(),
            });
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(error_for_status(status, &body));
        }
        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        Ok((content_type, resp.bytes().await?))
    }

    /// Send a request and unwrap the envelope, returning `data` if present.
    async fn execute(
        &self,
        path: &str,
        builder: reqwest::RequestBuilder,
    ) -> Result<Option<Value>, Error> {
        let resp = self.authorize(builder).send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        trace!(path, %status, len = body.len(), "response");

        if status == reqwest::StatusCode::UNAUTHORIZED {
            let message = serde_json::from_str::<Envelope>(&body)
                .ok()
                .and_then(|e| e.message())
                .unwrap_or_else(|| "session expired or invalid token".into());
            return Err(Error::Unauthorized { message });
        }

        if !status.is_success() {
            return Err(error_for_status(status, &body));
        }

        if body.trim().is_empty() {
            return Ok(None);
        }

        let value: Value = serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: format!("{e} (body preview: {:?})", preview(&body)),
            body: body.clone(),
        })?;

        // Bare payloads without an envelope are taken as the data itself.
        let is_envelope = value.as_object().is_some_and(|o| o.contains_key("success"));
        if !is_envelope {
            return Ok(Some(value));
        }

        let envelope: Envelope =
            serde_json::from_value(value).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body: body.clone(),
            })?;

        if envelope.success == Some(false) {
            return Err(envelope.into_rejection());
        }

        Ok(envelope.data.filter(|d| !d.is_null()))
    }
}

/// Map a non-2xx response to an error. Client errors that carry an
/// envelope are application rejections; everything else is a bare HTTP
/// failure.
fn error_for_status(status: reqwest::StatusCode, body: &str) -> Error {
    let envelope = serde_json::from_str::<Envelope>(body).ok();
    let code = status.as_u16();

    if let Some(envelope) = envelope {
        let has_content = envelope.message().is_some() || !envelope.errors.is_empty();
        if status.is_client_error() && code != 403 && code != 404 && has_content {
            return envelope.into_rejection();
        }
        if let Some(message) = envelope.message() {
            return Error::Http {
                status: code,
                message,
            };
        }
    }

    Error::Http {
        status: code,
        message: status
            .canonical_reason()
            .map_or_else(|| preview(body).to_owned(), String::from),
    }
}

fn decode<T: DeserializeOwned>(path: &str, data: Option<Value>) -> Result<T, Error> {
    let data = data.ok_or_else(|| Error::MissingData {
        path: path.to_owned(),
    })?;
    T::deserialize(&data).map_err(|e| Error::Deserialization {
        message: format!("{path}: {e}"),
        body: data.to_string(),
    })
}

fn decode_optional<T: DeserializeOwned>(
    path: &str,
    data: Option<Value>,
) -> Result<Option<T>, Error> {
    match data {
        None => Ok(None),
        // Some endpoints answer with an acknowledgement object instead of
        // the entity; treat anything that does not parse as "no echo".
        Some(value) => Ok(T::deserialize(&value)
            .inspect_err(|e| trace!(path, error = %e, "response is not an entity echo"))
            .ok()),
    }
}

fn preview(body: &str) -> &str {
    let mut end = body.len().min(200);
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}
