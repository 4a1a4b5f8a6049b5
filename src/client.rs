use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use tracing::{debug, warn};

use crate::errors::{DocparserError, Result};
use crate::models::{Parser, PingResponse, ResultsQuery, UploadResponse};

const DEFAULT_BASE_URL: &str = "https://api.docparser.com/v1";

/// Builder for constructing a [`Client`] with custom configuration.
///
/// # Example
///
/// ```no_run
/// use docparser::ClientBuilder;
/// use std::time::Duration;
///
/// # fn example() -> docparser::Result<()> {
/// let client = ClientBuilder::new()
///     .api_key("your_api_key")
///     .base_url("https://custom.example.com/v1")
///     .timeout(Duration::from_secs(30))
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    api_key: Option<String>,
    base_url: String,
    timeout: Option<Duration>,
}

impl ClientBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }

    /// Set the API key for authentication.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Override the base URL (defaults to `https://api.docparser.com/v1`).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set a request timeout on the underlying HTTP client.
    ///
    /// The client itself imposes no deadline; without this, connection-level
    /// behavior is whatever reqwest defaults to.
    pub fn timeout(mut self, d: Duration) -> Self {
        self.timeout = Some(d);
        self
    }

    /// Build the [`Client`].
    ///
    /// If no API key was set via [`api_key`](Self::api_key), the builder will
    /// attempt to read the `DOCPARSER_API_KEY` environment variable.
    ///
    /// Returns [`DocparserError::Authentication`] if no key is available.
    pub fn build(self) -> Result<Client> {
        let api_key = self
            .api_key
            .or_else(|| std::env::var("DOCPARSER_API_KEY").ok())
            .ok_or_else(|| DocparserError::Authentication {
                message: "API key is required. Pass it to ClientBuilder::api_key() \
                          or set the DOCPARSER_API_KEY environment variable."
                    .into(),
            })?;

        let mut http = reqwest::Client::builder();
        if let Some(d) = self.timeout {
            http = http.timeout(d);
        }
        let http = http.build().map_err(DocparserError::Http)?;

        Ok(Client {
            base_url: self.base_url.trim_end_matches('/').to_string(),
            api_key,
            http,
            parser_ids: Mutex::new(HashMap::new()),
        })
    }

    /// Build the [`Client`] and verify the credentials with a ping.
    ///
    /// Like [`Client::login`], but with the builder's configuration applied.
    pub async fn login(self) -> Result<Client> {
        let client = self.build()?;
        client.ping().await?;
        Ok(client)
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The Docparser API client.
///
/// Every method issues a single authenticated request against the service and
/// maps the response to a value or a [`DocparserError`]. Credentials are
/// instance state: set once at construction, sent as HTTP Basic auth
/// (key as username, empty password) on every call.
///
/// Methods that take a parser label resolve it to a parser id through an
/// in-memory lookup table, populated from [`list_parsers`](Self::list_parsers)
/// on the first miss. The table is never refreshed implicitly; use
/// [`refresh_parsers`](Self::refresh_parsers) or
/// [`clear_parser_cache`](Self::clear_parser_cache) after renaming or creating
/// parsers. Sharing one instance across threads is unsupported.
///
/// # Example
///
/// ```no_run
/// use docparser::Client;
///
/// # async fn example() -> docparser::Result<()> {
/// let client = Client::login("your_api_key").await?;
///
/// let document_id = client
///     .upload_by_path("~/invoices/march.pdf", "invoice-parser", None)
///     .await?;
/// println!("uploaded as {document_id}");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Client {
    base_url: String,
    api_key: String,
    http: reqwest::Client,
    parser_ids: Mutex<HashMap<String, String>>,
}

impl Client {
    /// Create a new client with the given API key and default settings.
    ///
    /// No request is issued; use [`ping`](Self::ping) or [`login`](Self::login)
    /// to verify the key. For customization, use [`ClientBuilder`] instead.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            http: reqwest::Client::new(),
            parser_ids: Mutex::new(HashMap::new()),
        }
    }

    /// Store credentials and verify them against the service.
    ///
    /// Constructs a client with default settings and invokes
    /// [`ping`](Self::ping); the client is returned only when the service
    /// acknowledges the key.
    ///
    /// # Errors
    ///
    /// - [`DocparserError::Authentication`] if the key is rejected.
    /// - [`DocparserError::Api`] if the ping does not answer with the literal
    ///   acknowledgment payload.
    pub async fn login(api_key: impl Into<String>) -> Result<Self> {
        ClientBuilder::new().api_key(api_key).login().await
    }

    /// Check connectivity and credentials (`GET /ping`).
    ///
    /// Succeeds only on HTTP 200 with the body `{"msg": "pong"}`; any other
    /// 200 body is surfaced as [`DocparserError::Api`] carrying the raw text.
    pub async fn ping(&self) -> Result<()> {
        let text = self.execute(self.http.get(self.url("/ping")), "/ping").await?;
        match serde_json::from_str::<PingResponse>(&text) {
            Ok(ack) if ack.msg == "pong" => Ok(()),
            _ => Err(shape_error("/ping", text)),
        }
    }

    // -----------------------------------------------------------------------
    // Parsers
    // -----------------------------------------------------------------------

    /// List all document parsers attached to the account (`GET /parsers`).
    ///
    /// Does not touch the label lookup table; see
    /// [`refresh_parsers`](Self::refresh_parsers) for that.
    ///
    /// # Errors
    ///
    /// [`DocparserError::Api`] carrying the raw body if the response is not a
    /// JSON array.
    pub async fn list_parsers(&self) -> Result<Vec<Parser>> {
        let text = self
            .execute(self.http.get(self.url("/parsers")), "/parsers")
            .await?;
        match serde_json::from_str(&text) {
            Ok(parsers) => Ok(parsers),
            Err(_) => Err(shape_error("/parsers", text)),
        }
    }

    /// List parsers and rebuild the label lookup table from the response.
    pub async fn refresh_parsers(&self) -> Result<Vec<Parser>> {
        let parsers = self.list_parsers().await?;
        let mut ids = self.parser_ids.lock().expect("parser cache lock poisoned");
        ids.clear();
        for parser in &parsers {
            ids.insert(parser.label.clone(), parser.id.clone());
        }
        drop(ids);
        Ok(parsers)
    }

    /// Drop all cached label→id entries.
    ///
    /// The next label resolution will fetch the parser list again.
    pub fn clear_parser_cache(&self) {
        self.parser_ids
            .lock()
            .expect("parser cache lock poisoned")
            .clear();
    }

    /// List the Model Layouts of a parser (`GET /parser/models/{parser_id}`).
    ///
    /// # Errors
    ///
    /// [`DocparserError::NotFound`] if the label does not match any parser on
    /// the account.
    pub async fn list_parser_model_layouts(
        &self,
        parser_label: &str,
    ) -> Result<Vec<serde_json::Value>> {
        let parser_id = self.resolve_parser_id(parser_label).await?;
        let endpoint = format!("/parser/models/{parser_id}");
        let text = self.execute(self.http.get(self.url(&endpoint)), &endpoint).await?;
        match serde_json::from_str(&text) {
            Ok(layouts) => Ok(layouts),
            Err(_) => Err(shape_error(&endpoint, text)),
        }
    }

    // -----------------------------------------------------------------------
    // Documents
    // -----------------------------------------------------------------------

    /// Upload a local file to a parser (`POST /document/upload/{parser_id}`).
    ///
    /// A leading `~` in `path` is expanded to the home directory. The file is
    /// read fully into memory before anything else happens, so a missing file
    /// fails with [`DocparserError::Io`] without any network traffic, and no
    /// handle outlives the call on any exit path.
    ///
    /// Returns the id of the newly created document.
    pub async fn upload_by_path(
        &self,
        path: impl AsRef<Path>,
        parser_label: &str,
        remote_id: Option<&str>,
    ) -> Result<String> {
        let path = expand_home(path.as_ref());
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());

        let file_bytes = tokio::fs::read(&path).await.map_err(DocparserError::Io)?;

        let parser_id = self.resolve_parser_id(parser_label).await?;

        let mut form = Form::new().part("file", Part::bytes(file_bytes).file_name(file_name));
        if let Some(remote_id) = remote_id {
            form = form.text("remote_id", remote_id.to_string());
        }

        let endpoint = format!("/document/upload/{parser_id}");
        let text = self
            .execute(self.http.post(self.url(&endpoint)).multipart(form), &endpoint)
            .await?;
        decode_document_id(&endpoint, text)
    }

    /// Upload base64-encoded file content to a parser
    /// (`POST /document/upload/{parser_id}`).
    ///
    /// `content` must already be base64-encoded; it is forwarded verbatim as
    /// the `file_content` form field together with `file_name`.
    pub async fn upload_by_base64(
        &self,
        content: &str,
        filename: &str,
        parser_label: &str,
        remote_id: Option<&str>,
    ) -> Result<String> {
        let parser_id = self.resolve_parser_id(parser_label).await?;

        let mut fields = vec![
            ("file_content", content.to_string()),
            ("file_name", filename.to_string()),
        ];
        if let Some(remote_id) = remote_id {
            fields.push(("remote_id", remote_id.to_string()));
        }

        let endpoint = format!("/document/upload/{parser_id}");
        let text = self
            .execute(self.http.post(self.url(&endpoint)).form(&fields), &endpoint)
            .await?;
        decode_document_id(&endpoint, text)
    }

    /// Have the service fetch a file from a public URL
    /// (`POST /document/fetch/{parser_id}`).
    ///
    /// There is no local upload step; the backend downloads `url` itself.
    /// Returns the id of the newly created document.
    pub async fn upload_by_url(
        &self,
        url: &str,
        parser_label: &str,
        remote_id: Option<&str>,
    ) -> Result<String> {
        let parser_id = self.resolve_parser_id(parser_label).await?;

        let mut fields = vec![("url", url.to_string())];
        if let Some(remote_id) = remote_id {
            fields.push(("remote_id", remote_id.to_string()));
        }

        let endpoint = format!("/document/fetch/{parser_id}");
        let text = self
            .execute(self.http.post(self.url(&endpoint)).form(&fields), &endpoint)
            .await?;
        decode_document_id(&endpoint, text)
    }

    // -----------------------------------------------------------------------
    // Results
    // -----------------------------------------------------------------------

    /// Fetch the parsed result of a single document
    /// (`POST /results/{parser_id}/{document_id}`).
    ///
    /// With `include_children` set, derivative documents (e.g. pages produced
    /// by document splitting) are included in the payload.
    ///
    /// The per-parser field schema is not modeled; the payload is returned as
    /// raw JSON.
    pub async fn get_one_result(
        &self,
        parser_label: &str,
        document_id: &str,
        include_children: bool,
    ) -> Result<serde_json::Value> {
        let parser_id = self.resolve_parser_id(parser_label).await?;

        let fields = [("include_children", include_children.to_string())];
        let endpoint = format!("/results/{parser_id}/{document_id}");
        let text = self
            .execute(self.http.post(self.url(&endpoint)).form(&fields), &endpoint)
            .await?;
        match serde_json::from_str(&text) {
            Ok(result) => Ok(result),
            Err(_) => Err(shape_error(&endpoint, text)),
        }
    }

    /// Fetch a batch of parsed results (`POST /results/{parser_id}`).
    ///
    /// Filtering, ordering, and queue inclusion are controlled by `query`;
    /// see [`ResultsQuery`] for the defaults.
    ///
    /// # Errors
    ///
    /// [`DocparserError::Validation`] — before any request is issued — when
    /// the list mode is date-based and `query.date` is `None`.
    pub async fn get_multiple_results(
        &self,
        parser_label: &str,
        query: ResultsQuery,
    ) -> Result<serde_json::Value> {
        if query.list.is_date_based() && query.date.is_none() {
            return Err(DocparserError::Validation(format!(
                "date is required when the list mode is \"{}\"",
                query.list.as_str()
            )));
        }

        let parser_id = self.resolve_parser_id(parser_label).await?;

        let mut fields = vec![
            ("list", query.list.as_str().to_string()),
            ("limit", query.limit.to_string()),
            ("include_processing_queue", query.include_processing_queue.to_string()),
            ("sort_by", query.sort_by.as_str().to_string()),
            ("sort_order", query.sort_order.as_str().to_string()),
        ];
        if let Some(ref date) = query.date {
            fields.push(("date", date.clone()));
        }
        if let Some(ref remote_id) = query.remote_id {
            fields.push(("remote_id", remote_id.clone()));
        }

        let endpoint = format!("/results/{parser_id}");
        let text = self
            .execute(self.http.post(self.url(&endpoint)).form(&fields), &endpoint)
            .await?;
        match serde_json::from_str(&text) {
            Ok(results) => Ok(results),
            Err(_) => Err(shape_error(&endpoint, text)),
        }
    }

    // -----------------------------------------------------------------------
    // Private helpers
    // -----------------------------------------------------------------------

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Resolve a parser label to its id through the lookup table.
    ///
    /// A miss triggers exactly one [`refresh_parsers`](Self::refresh_parsers)
    /// and a re-check; a hit issues no request at all.
    async fn resolve_parser_id(&self, parser_label: &str) -> Result<String> {
        if let Some(id) = self.cached_parser_id(parser_label) {
            return Ok(id);
        }

        self.refresh_parsers().await?;

        self.cached_parser_id(parser_label)
            .ok_or_else(|| DocparserError::NotFound {
                message: format!("parser label \"{parser_label}\" not found"),
            })
    }

    fn cached_parser_id(&self, parser_label: &str) -> Option<String> {
        self.parser_ids
            .lock()
            .expect("parser cache lock poisoned")
            .get(parser_label)
            .cloned()
    }

    /// Send one authenticated request and return the response body on 2xx.
    ///
    /// Exactly one attempt: transport errors and failing statuses are mapped
    /// and surfaced immediately, never retried.
    async fn execute(&self, req: reqwest::RequestBuilder, endpoint: &str) -> Result<String> {
        debug!(endpoint, "sending request");

        let response = req
            .basic_auth(&self.api_key, Some(""))
            .send()
            .await
            .map_err(DocparserError::Http)?;

        let status = response.status();
        if status.is_success() {
            return response.text().await.map_err(DocparserError::Http);
        }

        let status_code = status.as_u16();
        let text = response.text().await.unwrap_or_default();
        warn!(endpoint, status = status_code, "request failed");
        Err(error_from_status(status_code, text))
    }
}

/// Map a failing HTTP status to the matching error kind.
fn error_from_status(status_code: u16, text: String) -> DocparserError {
    let body: Option<serde_json::Value> = serde_json::from_str(&text).ok();

    let message = body
        .as_ref()
        .and_then(|b| b.get("error"))
        .and_then(|e| e.as_str())
        .unwrap_or(&text)
        .to_string();

    match status_code {
        403 => DocparserError::Authentication { message },
        400 => DocparserError::BadRequest { message, body },
        404 => DocparserError::NotFound { message },
        _ => DocparserError::Api {
            status_code,
            message,
            body,
        },
    }
}

/// Error for a 2xx response whose body did not have the expected shape.
fn shape_error(endpoint: &str, text: String) -> DocparserError {
    let body = serde_json::from_str(&text).ok();
    DocparserError::Api {
        status_code: 200,
        message: format!("unexpected response from {endpoint}: {text}"),
        body,
    }
}

fn decode_document_id(endpoint: &str, text: String) -> Result<String> {
    match serde_json::from_str::<UploadResponse>(&text) {
        Ok(resp) => Ok(resp.id),
        Err(_) => Err(shape_error(endpoint, text)),
    }
}

/// Expand a leading `~` to the user's home directory.
fn expand_home(path: &Path) -> PathBuf {
    if let Ok(stripped) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    path.to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_home_leaves_plain_paths_alone() {
        assert_eq!(expand_home(Path::new("/tmp/a.pdf")), PathBuf::from("/tmp/a.pdf"));
        assert_eq!(expand_home(Path::new("relative.pdf")), PathBuf::from("relative.pdf"));
    }

    #[test]
    fn expand_home_resolves_tilde_prefix() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home(Path::new("~/docs/a.pdf")), home.join("docs/a.pdf"));
            assert!(!expand_home(Path::new("~/docs"))
                .to_string_lossy()
                .contains('~'));
        }
    }

    #[test]
    fn status_codes_map_to_error_kinds() {
        assert!(matches!(
            error_from_status(403, "denied".into()),
            DocparserError::Authentication { .. }
        ));
        assert!(matches!(
            error_from_status(400, r#"{"error": "missing field"}"#.into()),
            DocparserError::BadRequest { .. }
        ));
        assert!(matches!(
            error_from_status(404, "no such parser".into()),
            DocparserError::NotFound { .. }
        ));
        assert!(matches!(
            error_from_status(500, "boom".into()),
            DocparserError::Api { status_code: 500, .. }
        ));
    }
}
