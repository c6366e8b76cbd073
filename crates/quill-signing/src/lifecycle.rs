//! Submission of a signed request to the external store.
//!
//! Preconditions are checked locally, in a fixed order, before any store
//! call. The lifecycle never marks a request signed on its own; it returns
//! whatever the store answered.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use quill_ink::is_sufficient;
use quill_types::{
    ArtifactRole, EncodedArtifact, RequestId, SigningRequest, SubmissionPayload, SubmissionReceipt,
};
use tracing::{info, warn};

use crate::error::{SigningError, SigningResult};
use crate::store::SubmissionStore;

/// Validates and forwards signing submissions.
pub struct SigningLifecycle {
    store: Arc<dyn SubmissionStore>,
    in_flight: Mutex<HashSet<RequestId>>,
}

impl SigningLifecycle {
    pub fn new(store: Arc<dyn SubmissionStore>) -> Self {
        Self {
            store,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// Check submission preconditions and build the payload.
    ///
    /// Order: request pending, signature ink, initials ink, consent. The
    /// first failure wins.
    pub fn validate(
        request: &SigningRequest,
        signature: Option<&EncodedArtifact>,
        initials: Option<&EncodedArtifact>,
        consent_given: bool,
    ) -> SigningResult<SubmissionPayload> {
        if !request.is_pending() {
            return Err(SigningError::RequestNotPending {
                id: request.id.clone(),
                status: request.status,
            });
        }

        let signature = sufficient(ArtifactRole::Signature, signature)?;
        let initials = sufficient(ArtifactRole::Initials, initials)?;

        if !consent_given {
            return Err(SigningError::ConsentMissing);
        }

        Ok(SubmissionPayload::new(signature, initials))
    }

    /// Validate, then hand the raw artifacts to the store.
    ///
    /// A second call for the same request while the first is outstanding is
    /// rejected with [`SigningError::SubmissionInFlight`]. Store rejections
    /// are relayed verbatim and never retried here.
    pub async fn submit(
        &self,
        request: &SigningRequest,
        signature: Option<&EncodedArtifact>,
        initials: Option<&EncodedArtifact>,
        consent_given: bool,
    ) -> SigningResult<SubmissionReceipt> {
        let payload = Self::validate(request, signature, initials, consent_given).map_err(|err| {
            warn!(request_id = %request.id, error = %err, "Submission failed validation");
            err
        })?;

        let _guard = self.acquire(&request.id)?;

        info!(request_id = %request.id, "Submitting signature");
        match self.store.submit(&request.id, &payload).await {
            Ok(receipt) => {
                info!(
                    request_id = %request.id,
                    status = %receipt.status,
                    "Submission acknowledged"
                );
                Ok(receipt)
            }
            Err(rejection) => {
                warn!(
                    request_id = %request.id,
                    message = %rejection.message,
                    "Submission rejected by store"
                );
                Err(SigningError::SubmissionRejected {
                    message: rejection.message,
                })
            }
        }
    }

    /// Whether a submission for `id` is currently outstanding.
    pub fn is_in_flight(&self, id: &RequestId) -> bool {
        self.in_flight
            .lock()
            .map(|set| set.contains(id))
            .unwrap_or(false)
    }

    fn acquire(&self, id: &RequestId) -> SigningResult<InFlight<'_>> {
        let mut set = self
            .in_flight
            .lock()
            .map_err(|_| SigningError::Store("in-flight registry lock poisoned".to_string()))?;

        if !set.insert(id.clone()) {
            warn!(request_id = %id, "Duplicate submission while one is in flight");
            return Err(SigningError::SubmissionInFlight(id.clone()));
        }

        Ok(InFlight {
            registry: &self.in_flight,
            id: id.clone(),
        })
    }
}

fn sufficient(
    role: ArtifactRole,
    artifact: Option<&EncodedArtifact>,
) -> SigningResult<&EncodedArtifact> {
    match artifact {
        Some(artifact) if is_sufficient(Some(artifact)) => Ok(artifact),
        _ => Err(SigningError::InsufficientInk(role)),
    }
}

/// Releases the in-flight slot when the submission settles.
struct InFlight<'a> {
    registry: &'a Mutex<HashSet<RequestId>>,
    id: RequestId,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if let Ok(mut set) = self.registry.lock() {
            set.remove(&self.id);
        }
    }
}
