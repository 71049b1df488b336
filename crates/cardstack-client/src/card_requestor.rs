//! Card service requestor.

use crate::{HttpTransport, ReqwestTransport, RequestContext, TransportRequest, TransportResponse};
use cardstack_config::ClientConfig;
use cardstack_core::{Card, CardstackError, CardstackResult};
use cardstack_resilience::{with_deadline, RetryPolicy};
use reqwest::header::{HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Path of the card resource below the service host.
pub const CARD_PATH: &str = "/service/card";

/// CRUD client for the remote card service.
///
/// `create` and `read` are retried per the [`RetryPolicy`] on transport
/// failures, non-success statuses and undecodable bodies. `update` and
/// `delete` are sent once.
pub struct CardRequestor {
    transport: Arc<dyn HttpTransport>,
    card_url: String,
    retry: RetryPolicy,
}

impl CardRequestor {
    /// Creates a requestor for the service at `service_host`.
    pub fn new(transport: Arc<dyn HttpTransport>, service_host: &str, retry: RetryPolicy) -> Self {
        Self {
            transport,
            card_url: format!("{}{}", service_host.trim_end_matches('/'), CARD_PATH),
            retry,
        }
    }

    /// Creates a requestor over reqwest from client configuration.
    pub fn from_config(config: &ClientConfig) -> CardstackResult<Self> {
        let transport = ReqwestTransport::new(config.request_timeout())?;
        let retry = RetryPolicy::new(config.retry_max_attempts, config.retry_backoff_delay())?;
        Ok(Self::new(Arc::new(transport), &config.service_host, retry))
    }

    /// Base URL of the card resource.
    #[must_use]
    pub fn card_url(&self) -> &str {
        &self.card_url
    }

    #[must_use]
    pub const fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    fn item_url(&self, id: i64) -> String {
        format!("{}/{}", self.card_url, id)
    }

    /// POSTs `card` and returns the created card, retrying per policy.
    pub async fn create(&self, ctx: &RequestContext, card: &Card) -> CardstackResult<Card> {
        let body = serde_json::to_vec(card)?;
        self.retry
            .execute_until(ctx.deadline, || {
                self.exchange(ctx, Method::POST, self.card_url.clone(), Some(body.clone()))
            })
            .await
    }

    /// GETs the card with `id`, retrying per policy.
    pub async fn read(&self, ctx: &RequestContext, id: i64) -> CardstackResult<Card> {
        self.retry
            .execute_until(ctx.deadline, || {
                self.exchange(ctx, Method::GET, self.item_url(id), None)
            })
            .await
    }

    /// PUTs `card` once and returns the service's copy.
    pub async fn update(&self, ctx: &RequestContext, card: &Card) -> CardstackResult<Card> {
        let body = serde_json::to_vec(card)?;
        with_deadline(ctx.deadline, || {
            self.exchange(ctx, Method::PUT, self.card_url.clone(), Some(body))
        })
        .await
    }

    /// DELETEs the card with `id` once and returns the raw response status.
    pub async fn delete(&self, ctx: &RequestContext, id: i64) -> CardstackResult<StatusCode> {
        with_deadline(ctx.deadline, || async {
            let response = self.send(ctx, Method::DELETE, self.item_url(id), None).await?;
            Ok::<_, CardstackError>(response.status)
        })
        .await
    }

    async fn exchange(
        &self,
        ctx: &RequestContext,
        method: Method,
        url: String,
        body: Option<Vec<u8>>,
    ) -> CardstackResult<Card> {
        let response = self.send(ctx, method.clone(), url.clone(), body).await?;

        if !response.status.is_success() {
            let body = String::from_utf8_lossy(&response.body).into_owned();
            warn!("{} {} returned status {}", method, url, response.status);
            return Err(CardstackError::UnexpectedStatus {
                status: response.status.as_u16(),
                body,
            });
        }

        serde_json::from_slice(&response.body).map_err(|e| {
            warn!(
                "{} {} returned status {} with an undecodable body: {}",
                method, url, response.status, e
            );
            CardstackError::Decode(format!("Invalid card body: {}", e))
        })
    }

    async fn send(
        &self,
        ctx: &RequestContext,
        method: Method,
        url: String,
        body: Option<Vec<u8>>,
    ) -> CardstackResult<TransportResponse> {
        debug!("{} {}", method, url);

        let mut headers = ctx.headers.clone();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if body.is_some() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        let request = TransportRequest {
            method: method.clone(),
            url: url.clone(),
            headers,
            body,
        };

        self.transport.send(request).await.map_err(|e| {
            error!("{} {} failed: {}", method, url, e);
            e
        })
    }
}
