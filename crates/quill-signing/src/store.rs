use async_trait::async_trait;
use chrono::Utc;
use quill_types::{
    RequestId, RequestStatus, SigningRequest, SubmissionPayload, SubmissionReceipt,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::SigningResult;

/// Structured rejection from the signing-request store.
///
/// `message` is human-readable and is shown to the user verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct StoreRejection {
    pub message: String,
}

impl StoreRejection {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Supplies signing requests keyed by id.
#[async_trait]
pub trait RequestSource: Send + Sync {
    async fn fetch_request(&self, id: &RequestId) -> SigningResult<SigningRequest>;
}

/// Accepts completed submissions. The only component allowed to move a
/// request out of `pending`.
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    async fn submit(
        &self,
        id: &RequestId,
        payload: &SubmissionPayload,
    ) -> Result<SubmissionReceipt, StoreRejection>;
}

/// Store-side acceptance rule shared by the bundled stores.
///
/// Only a pending request with consent and both artifacts is accepted. On
/// acceptance the request is marked signed in place.
pub fn accept_submission(
    request: &mut SigningRequest,
    payload: &SubmissionPayload,
) -> Result<SubmissionReceipt, StoreRejection> {
    match request.status {
        RequestStatus::Pending => {}
        RequestStatus::Signed => {
            return Err(StoreRejection::new("This document has already been signed"))
        }
        RequestStatus::Expired => {
            return Err(StoreRejection::new("This signing request has expired"))
        }
    }
    if !payload.legal_consent {
        return Err(StoreRejection::new("Legal consent is required"));
    }
    if payload.signature_data.is_empty() || payload.initials_data.is_empty() {
        return Err(StoreRejection::new("Signature and initials are required"));
    }

    let signed_at = Utc::now();
    request.status = RequestStatus::Signed;
    request.signed_at = Some(signed_at);

    Ok(SubmissionReceipt {
        request_id: request.id.clone(),
        status: RequestStatus::Signed,
        signed_at: Some(signed_at),
        message: Some("Document signed".to_string()),
    })
}
