//! Async decision service client
//!
//! Externally driven actors get their orders over HTTP. Every call for a
//! tick is issued at once and bounded by the same timeout, so a tick waits
//! for the slowest call, never the sum. A call that fails or runs out of time
//! leaves its actor resting.

use crate::core::config::DecisionConfig;
use crate::core::error::{BrainsError, Result};
use crate::decision::protocol::{Decision, DecisionRequest, RemoteDecisions};
use reqwest::Client;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;

/// Something that can answer a decision request
pub trait DecisionService: Send + Sync + 'static {
    fn decide(&self, request: DecisionRequest) -> impl Future<Output = Result<Decision>> + Send;
}

/// HTTP client for a decision service endpoint
pub struct HttpDecisionClient {
    client: Client,
    endpoint: String,
}

impl HttpDecisionClient {
    /// Create a client with a transport-level timeout
    pub fn new(endpoint: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BrainsError::Decision(e.to_string()))?;
        Ok(Self { client, endpoint })
    }

    pub fn from_config(config: &DecisionConfig) -> Result<Self> {
        Self::new(config.endpoint.clone(), config.timeout())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl DecisionService for HttpDecisionClient {
    fn decide(&self, request: DecisionRequest) -> impl Future<Output = Result<Decision>> + Send {
        let client = self.client.clone();
        let endpoint = self.endpoint.clone();

        async move {
            let response = client
                .post(&endpoint)
                .json(&request)
                .send()
                .await
                .map_err(|e| BrainsError::Decision(e.to_string()))?;

            if !response.status().is_success() {
                let status = response.status();
                let error_text = response.text().await.unwrap_or_default();
                return Err(BrainsError::Decision(format!("API error {}: {}", status, error_text)));
            }

            response
                .json::<Decision>()
                .await
                .map_err(|e| BrainsError::Decision(e.to_string()))
        }
    }
}

/// Ask the service about every request concurrently and join the answers
///
/// Never fails: timeouts, transport errors and invalid answers are logged
/// and recorded as a rest for that actor.
pub async fn gather_decisions<S: DecisionService>(
    service: &Arc<S>,
    requests: Vec<DecisionRequest>,
    timeout: Duration,
) -> RemoteDecisions {
    let mut calls = JoinSet::new();

    for request in requests {
        let service = Arc::clone(service);
        let actor = request.actor.id;
        calls.spawn(async move {
            let outcome = match tokio::time::timeout(timeout, service.decide(request)).await {
                Ok(Ok(decision)) => decision.into_request(),
                Ok(Err(e)) => Err(e),
                Err(_) => Err(BrainsError::DecisionTimeout(actor)),
            };
            (actor, outcome)
        });
    }

    let mut decisions = RemoteDecisions::new();
    while let Some(joined) = calls.join_next().await {
        match joined {
            Ok((actor, Ok(request))) => decisions.insert(actor, request),
            Ok((actor, Err(e))) => {
                tracing::warn!("No decision for {}, resting this tick: {}", actor, e);
                decisions.record_failure(actor);
            }
            Err(e) => tracing::warn!("Decision task failed: {}", e),
        }
    }

    decisions
}
