//! Checker clients.

use crate::config::CheckerConfig;
use crate::protocol::{self, VerificationRequest, FORM_CONTENT_TYPE};
use async_trait::async_trait;
use fitch_proof::{CheckReply, CheckStatus, CheckTicket, ProofSession};
use reqwest::Client;
use tracing::{debug, warn};

// ============================================================================
// Checker Interface
// ============================================================================

/// Anything that can judge a proof.
#[async_trait]
pub trait ProofChecker: Send + Sync {
    async fn check(&self, request: &VerificationRequest) -> Result<CheckReply, VerifyError>;

    /// Sent as `predicateSettings` with every request built for this checker.
    fn predicate_settings(&self) -> &str {
        ""
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VerifyError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Checker returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Could not encode request: {0}")]
    Encode(String),
}

// ============================================================================
// HTTP Checker
// ============================================================================

/// Posts the proof form to a remote endpoint.
#[derive(Debug, Clone)]
pub struct HttpChecker {
    client: Client,
    config: CheckerConfig,
}

impl HttpChecker {
    pub fn new(config: CheckerConfig) -> Result<Self, VerifyError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| VerifyError::Network(e.to_string()))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }
}

#[async_trait]
impl ProofChecker for HttpChecker {
    async fn check(&self, request: &VerificationRequest) -> Result<CheckReply, VerifyError> {
        let response = self
            .client
            .post(&self.config.endpoint)
            .header(reqwest::header::CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(request.to_form_body())
            .send()
            .await
            .map_err(|e| VerifyError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VerifyError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| VerifyError::Network(e.to_string()))?;
        debug!(bytes = body.len(), "checker replied");
        protocol::parse_reply(&body)
    }

    fn predicate_settings(&self) -> &str {
        &self.config.predicate_settings
    }
}

// ============================================================================
// Session Driver
// ============================================================================

/// Send the request for `ticket` and return the reply.
///
/// Borrows nothing from the session, so the session stays free for other
/// commands while the request is in flight. Hand the reply to
/// [`ProofSession::finish_check`] with `ticket.token`.
pub async fn send_check(
    checker: &dyn ProofChecker,
    ticket: &CheckTicket,
) -> Result<CheckReply, VerifyError> {
    let request = VerificationRequest::from_ticket(ticket, checker.predicate_settings())?;
    checker.check(&request).await
}

/// Run one check of `session` against `checker`, start to finish.
///
/// Returns the status the session ends up in. A failed request leaves the
/// session [`CheckStatus::Unavailable`] with the error as its reason.
pub async fn run_check(session: &mut ProofSession, checker: &dyn ProofChecker) -> CheckStatus {
    let ticket = session.begin_check();
    match send_check(checker, &ticket).await {
        Ok(reply) => {
            session.finish_check(ticket.token, reply);
        }
        Err(err) => {
            warn!(error = %err, "proof check request failed");
            session.fail_check(ticket.token, err.to_string());
        }
    }
    session.status().clone()
}
