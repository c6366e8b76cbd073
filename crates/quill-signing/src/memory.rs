//! In-memory reference implementation of the store collaborators.
//!
//! Applies the same rules a remote signing-request store would: only a
//! pending request accepts a submission, and acceptance is the one place a
//! request becomes `signed`. Deterministic and test-friendly.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use quill_types::{RequestId, SigningRequest, SubmissionPayload, SubmissionReceipt};
use tracing::debug;

use crate::error::{SigningError, SigningResult};
use crate::store::{accept_submission, RequestSource, StoreRejection, SubmissionStore};

/// In-memory signing-request store.
#[derive(Default)]
pub struct InMemorySigningStore {
    requests: RwLock<HashMap<RequestId, SigningRequest>>,
    submissions: RwLock<Vec<(RequestId, SubmissionPayload)>>,
    forced_rejection: RwLock<Option<String>>,
    submit_calls: AtomicUsize,
}

impl InMemorySigningStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with requests.
    pub fn with_requests(requests: impl IntoIterator<Item = SigningRequest>) -> Self {
        let store = Self::new();
        for request in requests {
            store.insert(request);
        }
        store
    }

    pub fn insert(&self, request: SigningRequest) {
        if let Ok(mut guard) = self.requests.write() {
            guard.insert(request.id.clone(), request);
        }
    }

    pub fn get(&self, id: &RequestId) -> Option<SigningRequest> {
        self.requests
            .read()
            .ok()
            .and_then(|guard| guard.get(id).cloned())
    }

    /// Reject every submission with `message` until cleared with `None`.
    pub fn force_rejection(&self, message: Option<&str>) {
        if let Ok(mut guard) = self.forced_rejection.write() {
            *guard = message.map(str::to_string);
        }
    }

    /// Number of submission calls received, accepted or not.
    pub fn submit_calls(&self) -> usize {
        self.submit_calls.load(Ordering::SeqCst)
    }

    /// Accepted submissions, oldest first.
    pub fn submissions(&self) -> Vec<(RequestId, SubmissionPayload)> {
        self.submissions
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl RequestSource for InMemorySigningStore {
    async fn fetch_request(&self, id: &RequestId) -> SigningResult<SigningRequest> {
        let guard = self
            .requests
            .read()
            .map_err(|_| SigningError::Store("requests lock poisoned".to_string()))?;
        guard
            .get(id)
            .cloned()
            .ok_or_else(|| SigningError::RequestNotFound(id.clone()))
    }
}

#[async_trait]
impl SubmissionStore for InMemorySigningStore {
    async fn submit(
        &self,
        id: &RequestId,
        payload: &SubmissionPayload,
    ) -> Result<SubmissionReceipt, StoreRejection> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = self
            .forced_rejection
            .read()
            .map_err(|_| StoreRejection::new("store lock poisoned"))?
            .clone()
        {
            return Err(StoreRejection::new(message));
        }

        let receipt = {
            let mut requests = self
                .requests
                .write()
                .map_err(|_| StoreRejection::new("store lock poisoned"))?;
            let request = requests
                .get_mut(id)
                .ok_or_else(|| StoreRejection::new("Signing request not found"))?;
            accept_submission(request, payload)?
        };

        self.submissions
            .write()
            .map_err(|_| StoreRejection::new("store lock poisoned"))?
            .push((id.clone(), payload.clone()));

        debug!(request_id = %id, "Submission stored");
        Ok(receipt)
    }
}
