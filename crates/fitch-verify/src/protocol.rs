//! Request and reply encoding for the checker endpoint.

use crate::client::VerifyError;
use fitch_proof::{CheckReply, CheckTicket};

pub const PREDICATE_SETTINGS: &str = "predicateSettings";
pub const PROOF_DATA: &str = "proofData";
pub const WANTED_CONCLUSION: &str = "wantedConc";
pub const PREMISE_COUNT: &str = "numPrems";

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// The four form fields the checker accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationRequest {
    pub predicate_settings: String,
    /// JSON encoding of the canonical document.
    pub proof_data: String,
    pub wanted_conc: String,
    pub num_prems: usize,
}

impl VerificationRequest {
    pub fn from_ticket(ticket: &CheckTicket, predicate_settings: &str) -> Result<Self, VerifyError> {
        let proof_data = ticket
            .payload
            .proof_data
            .to_json()
            .map_err(|e| VerifyError::Encode(e.to_string()))?;
        Ok(Self {
            predicate_settings: predicate_settings.to_string(),
            proof_data,
            wanted_conc: ticket.payload.wanted_conc.clone(),
            num_prems: ticket.payload.num_prems,
        })
    }

    pub fn to_form_body(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .append_pair(PREDICATE_SETTINGS, &self.predicate_settings)
            .append_pair(PROOF_DATA, &self.proof_data)
            .append_pair(WANTED_CONCLUSION, &self.wanted_conc)
            .append_pair(PREMISE_COUNT, &self.num_prems.to_string())
            .finish()
    }
}

/// Parse a checker reply body: `{"issues": [...], "concReached": bool}`.
pub fn parse_reply(body: &str) -> Result<CheckReply, VerifyError> {
    serde_json::from_str(body).map_err(|e| VerifyError::InvalidResponse(e.to_string()))
}
