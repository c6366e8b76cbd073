//! Signing request record and the submission exchanged with its store

use crate::{EncodedArtifact, RequestId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a signing request as reported by the external store.
///
/// `Signed` and `Expired` are terminal. The engine never computes a
/// transition itself; it only observes the value it was given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Signed,
    Expired,
}

impl RequestStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RequestStatus::Signed | RequestStatus::Expired)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Signed => "signed",
            RequestStatus::Expired => "expired",
        };
        f.write_str(name)
    }
}

/// A signing request, as supplied by the request-fetch collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SigningRequest {
    pub id: RequestId,
    pub status: RequestStatus,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Self-contained document resource carrying placeholder markers
    pub document_template: String,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    /// Present only when `status` is `Signed`
    #[serde(default)]
    pub signed_at: Option<DateTime<Utc>>,
}

impl SigningRequest {
    /// A fresh pending request.
    pub fn pending(id: impl Into<RequestId>, document_template: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: RequestStatus::Pending,
            title: String::new(),
            description: String::new(),
            document_template: document_template.into(),
            expires_at: None,
            signed_at: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == RequestStatus::Pending
    }
}

/// Payload handed to the external signing-request store.
///
/// Carries the two raw encoded artifacts, never the merged preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    pub signature_data: String,
    pub initials_data: String,
    pub legal_consent: bool,
}

impl SubmissionPayload {
    pub fn new(signature: &EncodedArtifact, initials: &EncodedArtifact) -> Self {
        Self {
            signature_data: signature.data_uri().to_string(),
            initials_data: initials.data_uri().to_string(),
            legal_consent: true,
        }
    }
}

/// Acknowledgment relayed from the store after an accepted submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    pub request_id: RequestId,
    pub status: RequestStatus,
    #[serde(default)]
    pub signed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub message: Option<String>,
}
