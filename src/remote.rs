//! Remote Mutator: pick and keyword-save round trips
//!
//! Each mutation bumps the busy counter, performs one GET against its
//! endpoint, replaces the matching record fields with the decoded response
//! and re-renders. Nothing is retried and no timeout is applied.

use futures::future::LocalBoxFuture;
use serde::de::DeserializeOwned;
use std::rc::Rc;
use url::Url;

use crate::config::PickOrdering;
use crate::console;
use crate::controller::Annotator;
use crate::event_loop::EventLoop;
use crate::record::{KeywordsResponse, PickResponse};
use crate::view::{render_busy, render_candidate_labels, render_keywords, Page};

/// Query parameter carrying the picked candidate
pub const CHOICE_PARAM: &str = "choice";
/// Query parameter carrying the raw keyword text
pub const KEYWORDS_PARAM: &str = "keywords";

// =============================================================================
// Errors
// =============================================================================

/// Failure of a remote mutation
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteError {
    InvalidUrl(String),
    Network(String),
    Status(u16),
    Decode(String),
}

impl std::fmt::Display for RemoteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RemoteError::InvalidUrl(msg) => write!(f, "Invalid URL: {}", msg),
            RemoteError::Network(msg) => write!(f, "Network error: {}", msg),
            RemoteError::Status(code) => write!(f, "Unexpected HTTP status: {}", code),
            RemoteError::Decode(msg) => write!(f, "Decode error: {}", msg),
        }
    }
}

impl std::error::Error for RemoteError {}

impl From<RemoteError> for wasm_bindgen::JsValue {
    fn from(err: RemoteError) -> Self {
        wasm_bindgen::JsValue::from_str(&err.to_string())
    }
}

// =============================================================================
// Transport
// =============================================================================

/// Pending JSON body of one GET
pub type JsonFuture = LocalBoxFuture<'static, Result<serde_json::Value, RemoteError>>;

/// GET a URL and decode its JSON body
pub trait Transport {
    fn get_json(&self, url: Url) -> JsonFuture;
}

impl<T: Transport + ?Sized> Transport for Rc<T> {
    fn get_json(&self, url: Url) -> JsonFuture {
        (**self).get_json(url)
    }
}

// =============================================================================
// URL Construction
// =============================================================================

/// True if `target` starts with a scheme (`^[a-z]+://`, case-insensitive)
pub fn is_absolute(target: &str) -> bool {
    match target.find("://") {
        Some(end) if end > 0 => target[..end].bytes().all(|b| b.is_ascii_alphabetic()),
        _ => false,
    }
}

/// Build an endpoint URL with `params` appended to its query string.
///
/// Relative targets resolve against `origin`. Existing query parameters are
/// kept.
pub fn make_url(
    origin: &str,
    target: &str,
    params: &[(&str, &str)],
) -> Result<Url, RemoteError> {
    let parsed = if is_absolute(target) {
        Url::parse(target)
    } else {
        Url::parse(origin).and_then(|base| base.join(target))
    };
    let mut url = parsed.map_err(|e| RemoteError::InvalidUrl(format!("{} ({})", target, e)))?;

    if !params.is_empty() {
        let mut query = url.query_pairs_mut();
        for (name, value) in params {
            query.append_pair(name, value);
        }
    }

    Ok(url)
}

// =============================================================================
// Busy Guard
// =============================================================================

/// Holds one busy-counter increment; releases it on every exit path
pub(crate) struct BusyGuard<'a, P: Page, T, E> {
    annotator: &'a Annotator<P, T, E>,
}

impl<'a, P: Page, T, E> BusyGuard<'a, P, T, E> {
    pub(crate) fn acquire(annotator: &'a Annotator<P, T, E>) -> Self {
        let busy = {
            let mut session = annotator.session_mut();
            session.busy.increment();
            session.busy
        };
        render_busy(annotator.page(), &busy);
        Self { annotator }
    }
}

impl<P: Page, T, E> Drop for BusyGuard<'_, P, T, E> {
    fn drop(&mut self) {
        let busy = {
            let mut session = self.annotator.session_mut();
            session.busy.decrement();
            session.busy
        };
        render_busy(self.annotator.page(), &busy);
    }
}

// =============================================================================
// Mutations
// =============================================================================

impl<P: Page, T: Transport, E: EventLoop> Annotator<P, T, E> {
    /// Pick a candidate and apply the server's accepted/rejected sets.
    ///
    /// Concurrent picks are not serialized. With
    /// [`PickOrdering::LastResponseWins`] the response that arrives last is
    /// what the record ends up holding.
    pub async fn select_candidate(&self, candidate_id: &str) -> Result<PickResponse, RemoteError> {
        let _busy = BusyGuard::acquire(self);
        let ticket = self.session_mut().issue_pick();

        let target = self.config().pick_url.clone();
        let response: PickResponse = self
            .request("pick", &target, &[(CHOICE_PARAM, candidate_id)])
            .await?;

        let ordering: PickOrdering = self.config().pick_ordering;
        let record = {
            let mut session = self.session_mut();
            if !session.accept_pick(ticket, ordering) {
                console::log(&format!(
                    "[Annotator] Discarding stale pick response #{} (\"{}\")",
                    ticket, candidate_id
                ));
                return Ok(response);
            }
            session.record.apply_pick(&response);
            session.record.clone()
        };

        let all_labeled = render_candidate_labels(self.page(), &record);
        self.session_mut().all_labeled = all_labeled;

        Ok(response)
    }

    /// Save the raw keyword text and display the server's canonical form
    pub async fn save_keywords(&self, text: &str) -> Result<KeywordsResponse, RemoteError> {
        let _busy = BusyGuard::acquire(self);

        let target = self.config().save_keywords_url.clone();
        let response: KeywordsResponse = self
            .request("keywords", &target, &[(KEYWORDS_PARAM, text)])
            .await?;

        let record = {
            let mut session = self.session_mut();
            session.record.apply_keywords(&response);
            session.record.clone()
        };
        render_keywords(self.page(), &record);

        Ok(response)
    }

    async fn request<R: DeserializeOwned>(
        &self,
        endpoint: &str,
        target: &str,
        params: &[(&str, &str)],
    ) -> Result<R, RemoteError> {
        let result = self.fetch_decoded(target, params).await;
        if let Err(e) = &result {
            console::error(&format!("[Annotator] {} request failed: {}", endpoint, e));
        }
        result
    }

    async fn fetch_decoded<R: DeserializeOwned>(
        &self,
        target: &str,
        params: &[(&str, &str)],
    ) -> Result<R, RemoteError> {
        let url = make_url(&self.page().origin(), target, params)?;
        let body = self.transport().get_json(url).await?;
        serde_json::from_value(body).map_err(|e| RemoteError::Decode(e.to_string()))
    }
}
