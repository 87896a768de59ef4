//! Identifier lookup: DOI / ISBN / free text → canonical metadata
//!
//! Input is classified first. DOIs resolve through Crossref, ISBNs through
//! Open Library, and anything else becomes a Crossref bibliographic search
//! whose results are returned as a ranked candidate list for the caller to
//! choose from. Every request is bounded by the configured timeout, can be
//! cancelled, and is retried at most once after a transient failure. A 404
//! is final.

pub mod crossref;
pub mod openlibrary;
pub mod ranking;

use std::time::Duration;

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

use bibcite_domain::LookupResult;
use bibcite_identifiers::Identifier;

use crate::config::LookupConfig;
use crate::http::{HttpResponse, Transport};

pub use ranking::{rank_candidates, Candidate};

/// Pause before the single retry
const RETRY_DELAY: Duration = Duration::from_millis(250);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("no record found for {0}")]
    NotFound(String),
    #[error("lookup service unavailable: {0}")]
    ServiceUnavailable(String),
    #[error("lookup cancelled")]
    Cancelled,
}

/// What a lookup produced
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    /// A DOI or ISBN resolved to exactly one record
    Record(LookupResult),
    /// A free-text query; best candidate first
    Candidates(Vec<Candidate>),
}

/// Resolves identifiers against the configured providers
pub struct LookupService<T: Transport> {
    transport: T,
    config: LookupConfig,
}

impl<T: Transport> LookupService<T> {
    pub fn new(transport: T, config: LookupConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &LookupConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Classify `input` and resolve it
    pub async fn lookup(
        &self,
        input: &str,
        cancel: &CancellationToken,
    ) -> Result<LookupOutcome, LookupError> {
        let identifier = Identifier::classify(input);
        info!(kind = identifier.kind(), value = identifier.value(), "Lookup");

        match identifier {
            Identifier::Doi(doi) => self
                .lookup_doi(&doi, cancel)
                .await
                .map(LookupOutcome::Record),
            Identifier::Isbn(isbn) => self
                .lookup_isbn(&isbn, cancel)
                .await
                .map(LookupOutcome::Record),
            Identifier::Query(query) => self
                .search(&query, cancel)
                .await
                .map(LookupOutcome::Candidates),
        }
    }

    /// Fetch Crossref metadata for a normalized DOI
    pub async fn lookup_doi(
        &self,
        doi: &str,
        cancel: &CancellationToken,
    ) -> Result<LookupResult, LookupError> {
        let url = format!(
            "{}/works/{}",
            self.config.crossref_base_url.trim_end_matches('/'),
            urlencoding::encode(doi)
        );
        let url = self.with_mailto(&url)?;
        let response = self.fetch(&url, &format!("DOI {}", doi), cancel).await?;
        crossref::parse_work_response(&response.body)
    }

    /// Fetch Open Library metadata for a normalized ISBN
    pub async fn lookup_isbn(
        &self,
        isbn: &str,
        cancel: &CancellationToken,
    ) -> Result<LookupResult, LookupError> {
        let base = format!(
            "{}/api/books",
            self.config.openlibrary_base_url.trim_end_matches('/')
        );
        let bibkeys = format!("ISBN:{}", isbn);
        let params = [
            ("bibkeys", bibkeys.as_str()),
            ("format", "json"),
            ("jscmd", "data"),
        ];
        let url = Url::parse_with_params(&base, params).map_err(|e| {
            LookupError::ServiceUnavailable(format!("invalid Open Library URL: {}", e))
        })?;
        let response = self.fetch(url.as_str(), &format!("ISBN {}", isbn), cancel).await?;
        openlibrary::parse_books_response(&response.body, isbn)
    }

    /// Search Crossref and rank the results; an empty result is `NotFound`
    pub async fn search(
        &self,
        query: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<Candidate>, LookupError> {
        if query.trim().is_empty() {
            return Err(LookupError::NotFound("an empty query".to_string()));
        }

        let base = format!("{}/works", self.config.crossref_base_url.trim_end_matches('/'));
        let rows = self.config.max_candidates.to_string();
        let params = [("query.bibliographic", query), ("rows", rows.as_str())];
        let url = Url::parse_with_params(&base, params).map_err(|e| {
            LookupError::ServiceUnavailable(format!("invalid Crossref URL: {}", e))
        })?;
        let url = self.with_mailto(url.as_str())?;

        let response = self.fetch(&url, &format!("query `{}`", query), cancel).await?;
        let results = crossref::parse_search_response(&response.body)?;
        if results.is_empty() {
            return Err(LookupError::NotFound(format!("query `{}`", query)));
        }

        let candidates = rank_candidates(query, results, self.config.max_candidates);
        debug!(query, candidates = candidates.len(), "Ranked search results");
        Ok(candidates)
    }

    fn with_mailto(&self, url: &str) -> Result<String, LookupError> {
        let mut url = Url::parse(url).map_err(|e| {
            LookupError::ServiceUnavailable(format!("invalid URL `{}`: {}", url, e))
        })?;
        if let Some(mailto) = &self.config.mailto {
            url.query_pairs_mut().append_pair("mailto", mailto);
        }
        Ok(url.into())
    }

    /// GET with timeout, cancellation and at most one retry
    async fn fetch(
        &self,
        url: &str,
        what: &str,
        cancel: &CancellationToken,
    ) -> Result<HttpResponse, LookupError> {
        let attempts = 1 + self.config.max_retries.min(1);
        let mut attempt = 1;

        loop {
            debug!(url, attempt, "Lookup request");

            let request = tokio::time::timeout(self.config.timeout(), self.transport.get(url));
            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(LookupError::Cancelled),
                outcome = request => outcome,
            };

            let failure = match outcome {
                Err(_) => "request timed out".to_string(),
                Ok(Err(error)) if error.is_transient() => error.to_string(),
                Ok(Err(error)) => return Err(LookupError::ServiceUnavailable(error.to_string())),
                Ok(Ok(response)) if response.status == 404 => {
                    return Err(LookupError::NotFound(what.to_string()));
                }
                Ok(Ok(response)) if response.is_success() => return Ok(response),
                Ok(Ok(response)) if response.status >= 500 => format!("HTTP {}", response.status),
                Ok(Ok(response)) => {
                    let status = format!("HTTP {}", response.status);
                    return Err(LookupError::ServiceUnavailable(status));
                }
            };

            if attempt >= attempts {
                warn!(url, attempts, "Lookup failed: {}", failure);
                return Err(LookupError::ServiceUnavailable(failure));
            }

            warn!(url, "Lookup attempt failed ({}), retrying", failure);
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(LookupError::Cancelled),
                _ = tokio::time::sleep(RETRY_DELAY) => {}
            }
            attempt += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Replays canned responses and records requested URLs
    struct ScriptedTransport {
        responses: Mutex<Vec<Result<HttpResponse, HttpError>>>,
        urls: Mutex<Vec<String>>,
        calls: AtomicUsize,
    }

    impl ScriptedTransport {
        fn new(mut responses: Vec<Result<HttpResponse, HttpError>>) -> Self {
            responses.reverse();
            Self {
                responses: Mutex::new(responses),
                urls: Mutex::new(Vec::new()),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn get(&self, url: &str) -> Result<HttpResponse, HttpError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.urls.lock().unwrap().push(url.to_string());
            self.responses
                .lock()
                .unwrap()
                .pop()
                .unwrap_or(Err(HttpError::RequestFailed { message: "script exhausted".into() }))
        }
    }

    fn service(
        responses: Vec<Result<HttpResponse, HttpError>>,
    ) -> LookupService<ScriptedTransport> {
        LookupService::new(ScriptedTransport::new(responses), LookupConfig::default())
    }

    const WORK: &str =
        r#"{"message": {"DOI": "10.1000/xyz", "title": ["A Title"], "type": "journal-article"}}"#;

    #[tokio::test]
    async fn test_doi_lookup_builds_crossref_url() {
        let service = service(vec![Ok(HttpResponse::new(200, WORK))]);
        let outcome = service
            .lookup("https://doi.org/10.1000/xyz", &CancellationToken::new())
            .await
            .unwrap();

        match outcome {
            LookupOutcome::Record(result) => assert_eq!(result.title, "A Title"),
            other => panic!("unexpected outcome: {:?}", other),
        }
        let urls = service.transport.urls.lock().unwrap();
        assert_eq!(urls[0], "https://api.crossref.org/works/10.1000%2Fxyz");
    }

    #[tokio::test]
    async fn test_not_found_is_never_retried() {
        let service = service(vec![Ok(HttpResponse::new(404, "Resource not found."))]);
        let error = service
            .lookup_doi("10.1000/missing", &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(error, LookupError::NotFound(_)));
        assert_eq!(service.transport.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_transient_failure_is_retried_once() {
        let service = service(vec![
            Err(HttpError::RequestFailed { message: "connection reset".into() }),
            Ok(HttpResponse::new(200, WORK)),
        ]);
        let result = service.lookup_doi("10.1000/xyz", &CancellationToken::new()).await.unwrap();
        assert_eq!(result.title, "A Title");
        assert_eq!(service.transport.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_second_failure_is_service_unavailable() {
        let service = service(vec![Ok(HttpResponse::new(503, "")), Ok(HttpResponse::new(502, ""))]);
        let error = service.lookup_doi("10.1000/xyz", &CancellationToken::new()).await.unwrap_err();
        assert_eq!(error, LookupError::ServiceUnavailable("HTTP 502".into()));
        assert_eq!(service.transport.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_client_error_is_not_retried() {
        let service = service(vec![Ok(HttpResponse::new(400, ""))]);
        let error = service.lookup_doi("10.1000/xyz", &CancellationToken::new()).await.unwrap_err();
        assert!(matches!(error, LookupError::ServiceUnavailable(_)));
        assert_eq!(service.transport.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cancelled_before_request() {
        let service = service(vec![Ok(HttpResponse::new(200, WORK))]);
        let cancel = CancellationToken::new();
        cancel.cancel();
        let error = service.lookup_doi("10.1000/xyz", &cancel).await.unwrap_err();
        assert_eq!(error, LookupError::Cancelled);
    }

    /// Never answers
    struct SilentTransport;

    #[async_trait]
    impl Transport for SilentTransport {
        async fn get(&self, _url: &str) -> Result<HttpResponse, HttpError> {
            std::future::pending().await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_retried_then_reported() {
        let service = LookupService::new(SilentTransport, LookupConfig::default());
        let error = service.lookup_doi("10.1000/xyz", &CancellationToken::new()).await.unwrap_err();
        assert_eq!(error, LookupError::ServiceUnavailable("request timed out".into()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_request() {
        let service = LookupService::new(SilentTransport, LookupConfig::default());
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            trigger.cancel();
        });
        let error = service.lookup_doi("10.1000/xyz", &cancel).await.unwrap_err();
        assert_eq!(error, LookupError::Cancelled);
    }

    #[tokio::test]
    async fn test_empty_search_is_not_found() {
        let service = service(vec![Ok(HttpResponse::new(200, r#"{"message": {"items": []}}"#))]);
        let error = service.search("nothing matches", &CancellationToken::new()).await.unwrap_err();
        assert!(matches!(error, LookupError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_isbn_lookup_uses_open_library() {
        let body = r#"{"ISBN:9780134685991": {"title": "Effective Java"}}"#;
        let service = service(vec![Ok(HttpResponse::new(200, body))]);
        let outcome = service.lookup("978-0-13-468599-1", &CancellationToken::new()).await.unwrap();
        assert!(matches!(outcome, LookupOutcome::Record(ref r) if r.title == "Effective Java"));

        let urls = service.transport.urls.lock().unwrap();
        assert_eq!(
            urls[0],
            "https://openlibrary.org/api/books?bibkeys=ISBN%3A9780134685991&format=json&jscmd=data"
        );
    }
}
