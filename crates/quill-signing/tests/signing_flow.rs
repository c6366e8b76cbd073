//! End-to-end signing scenarios: capture, preview, validation, submission.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use quill_ink::{encode, CaptureConfig, StrokeCapture, SurfacePoint};
use quill_signing::{
    InMemorySigningStore, RequestSource, SigningError, SigningLifecycle, SigningSession,
    StoreRejection, SubmissionStore,
};
use quill_template::{codec, find_markers};
use quill_types::{
    ArtifactRole, EncodedArtifact, RequestId, RequestStatus, SigningRequest, SubmissionPayload,
    SubmissionReceipt,
};
use tokio::sync::Notify;

const TEMPLATE: &str = "Please sign: Signature line and initial here: Initial:";

fn pending_request(id: &str) -> SigningRequest {
    SigningRequest::pending(id, codec::encode(TEMPLATE))
}

fn two_point_stroke(session: &mut SigningSession, role: ArtifactRole) {
    let capture = session.capture_mut(role);
    capture.begin(SurfacePoint::new(12.0, 30.0));
    capture.extend(SurfacePoint::new(80.0, 45.0));
    capture.end().unwrap();
}

fn signed_session(request: SigningRequest) -> SigningSession {
    let mut session = SigningSession::with_defaults(request).unwrap();
    two_point_stroke(&mut session, ArtifactRole::Signature);
    two_point_stroke(&mut session, ArtifactRole::Initials);
    session.set_consent(true);
    session
}

#[tokio::test]
async fn pending_request_is_signed_end_to_end() {
    let store = Arc::new(InMemorySigningStore::with_requests([pending_request("req-1")]));
    let lifecycle = SigningLifecycle::new(store.clone());

    let request = store.fetch_request(&RequestId::new("req-1")).await.unwrap();
    let session = signed_session(request);

    let preview = session.preview();
    assert_eq!(preview.signature_replacements, 1);
    assert_eq!(preview.initials_replacements, 1);
    assert!(find_markers(&codec::decode(&preview.resource).unwrap()).is_empty());

    let receipt = session.submit(&lifecycle).await.unwrap();
    assert_eq!(receipt.request_id, RequestId::new("req-1"));
    assert_eq!(receipt.status, RequestStatus::Signed);

    let submissions = store.submissions();
    assert_eq!(submissions.len(), 1);
    let (_, payload) = &submissions[0];
    assert!(payload.legal_consent);
    assert!(!payload.signature_data.is_empty());
    assert!(!payload.initials_data.is_empty());
    assert!(payload.signature_data.starts_with("data:image/png;base64,"));
    // raw artifacts, not the merged preview
    assert_eq!(
        Some(payload.signature_data.as_str()),
        session
            .capture(ArtifactRole::Signature)
            .encoded()
            .map(|a| a.data_uri())
    );
    assert_ne!(payload.signature_data, preview.resource);
}

#[tokio::test]
async fn terminal_requests_never_reach_the_store() {
    let store = Arc::new(InMemorySigningStore::new());
    let lifecycle = SigningLifecycle::new(store.clone());

    let live = signed_session(pending_request("req-1"));
    let signature = live.capture(ArtifactRole::Signature).encoded().cloned();
    let initials = live.capture(ArtifactRole::Initials).encoded().cloned();

    for status in [RequestStatus::Signed, RequestStatus::Expired] {
        let mut request = pending_request("req-1");
        request.status = status;

        let err = lifecycle
            .submit(&request, signature.as_ref(), initials.as_ref(), true)
            .await
            .unwrap_err();
        assert!(err.is_terminal());
        assert!(matches!(err, SigningError::RequestNotPending { status: s, .. } if s == status));
    }
    assert_eq!(store.submit_calls(), 0);
}

#[tokio::test]
async fn validation_failures_make_no_store_calls() {
    let store = Arc::new(InMemorySigningStore::with_requests([pending_request("req-1")]));
    let lifecycle = SigningLifecycle::new(store.clone());
    let mut session = SigningSession::with_defaults(pending_request("req-1")).unwrap();

    let err = session.submit(&lifecycle).await.unwrap_err();
    assert!(matches!(err, SigningError::InsufficientInk(ArtifactRole::Signature)));

    two_point_stroke(&mut session, ArtifactRole::Signature);
    let err = session.submit(&lifecycle).await.unwrap_err();
    assert!(matches!(err, SigningError::InsufficientInk(ArtifactRole::Initials)));

    two_point_stroke(&mut session, ArtifactRole::Initials);
    let err = session.submit(&lifecycle).await.unwrap_err();
    assert!(matches!(err, SigningError::ConsentMissing));

    assert_eq!(store.submit_calls(), 0);
}

#[tokio::test]
async fn blank_surface_artifact_is_rejected() {
    let store = Arc::new(InMemorySigningStore::with_requests([pending_request("req-1")]));
    let lifecycle = SigningLifecycle::new(store.clone());

    let blank = StrokeCapture::new(ArtifactRole::Signature, CaptureConfig::signature()).unwrap();
    let blank_artifact = encode(blank.surface()).unwrap();
    let session = signed_session(pending_request("req-1"));

    let err = lifecycle
        .submit(
            session.request(),
            Some(&blank_artifact),
            session.capture(ArtifactRole::Initials).encoded(),
            true,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, SigningError::InsufficientInk(ArtifactRole::Signature)));
    assert_eq!(store.submit_calls(), 0);
}

#[tokio::test]
async fn artifact_claiming_an_oversized_surface_is_rejected() {
    let store = Arc::new(InMemorySigningStore::with_requests([pending_request("req-1")]));
    let lifecycle = SigningLifecycle::new(store.clone());
    let session = signed_session(pending_request("req-1"));

    let forged = EncodedArtifact::new("data:image/png;base64,AAAA", u32::MAX, u32::MAX);

    let err = lifecycle
        .submit(
            session.request(),
            Some(&forged),
            session.capture(ArtifactRole::Initials).encoded(),
            true,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, SigningError::InsufficientInk(ArtifactRole::Signature)));
    assert_eq!(store.submit_calls(), 0);
}

#[tokio::test]
async fn rejection_is_relayed_and_session_can_retry() {
    let store = Arc::new(InMemorySigningStore::with_requests([pending_request("req-1")]));
    store.force_rejection(Some("Network error: connection reset"));
    let lifecycle = SigningLifecycle::new(store.clone());
    let session = signed_session(pending_request("req-1"));

    let err = session.submit(&lifecycle).await.unwrap_err();
    assert!(err.is_retryable());
    assert_eq!(err.user_message(), "Network error: connection reset");
    assert!(session.capture(ArtifactRole::Signature).has_content());
    assert!(!lifecycle.is_in_flight(&RequestId::new("req-1")));

    store.force_rejection(None);
    let receipt = session.submit(&lifecycle).await.unwrap();
    assert_eq!(receipt.status, RequestStatus::Signed);
    assert_eq!(store.submit_calls(), 2);
}

/// Store that holds every submission until released.
struct GatedStore {
    entered: Notify,
    release: Notify,
    calls: AtomicUsize,
}

#[async_trait]
impl SubmissionStore for GatedStore {
    async fn submit(
        &self,
        id: &RequestId,
        _payload: &SubmissionPayload,
    ) -> Result<SubmissionReceipt, StoreRejection> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.entered.notify_one();
        self.release.notified().await;
        Ok(SubmissionReceipt {
            request_id: id.clone(),
            status: RequestStatus::Signed,
            signed_at: None,
            message: None,
        })
    }
}

#[tokio::test]
async fn duplicate_submit_is_rejected_while_in_flight() {
    let store = Arc::new(GatedStore {
        entered: Notify::new(),
        release: Notify::new(),
        calls: AtomicUsize::new(0),
    });
    let lifecycle = Arc::new(SigningLifecycle::new(store.clone()));
    let session = Arc::new(signed_session(pending_request("req-1")));

    let first = {
        let lifecycle = lifecycle.clone();
        let session = session.clone();
        tokio::spawn(async move { session.submit(&lifecycle).await })
    };
    store.entered.notified().await;
    assert!(lifecycle.is_in_flight(&RequestId::new("req-1")));

    let err = session.submit(&lifecycle).await.unwrap_err();
    assert!(matches!(err, SigningError::SubmissionInFlight(_)));

    store.release.notify_one();
    let receipt = first.await.unwrap().unwrap();
    assert_eq!(receipt.status, RequestStatus::Signed);
    assert_eq!(store.calls.load(Ordering::SeqCst), 1);
    assert!(!lifecycle.is_in_flight(&RequestId::new("req-1")));
}
