//! A signing session for one pending request.
//!
//! The session owns the two ink surfaces and the consent flag. Dropping it
//! discards all local state; nothing reaches the store before `submit`.

use quill_ink::{CaptureConfig, Stroke, StrokeCapture};
use quill_template::{substitute, SubstitutionResult};
use quill_types::{ArtifactRole, SigningRequest, SubmissionPayload, SubmissionReceipt};
use tracing::debug;

use crate::error::{SigningError, SigningResult};
use crate::lifecycle::SigningLifecycle;

pub struct SigningSession {
    request: SigningRequest,
    signature: StrokeCapture,
    initials: StrokeCapture,
    consent_given: bool,
}

impl SigningSession {
    /// Open a session with explicit surface settings.
    ///
    /// Fails with [`SigningError::RequestNotPending`] for a signed or expired
    /// request, so no ink can be captured for it.
    pub fn open(
        request: SigningRequest,
        signature_config: CaptureConfig,
        initials_config: CaptureConfig,
    ) -> SigningResult<Self> {
        if !request.is_pending() {
            return Err(SigningError::RequestNotPending {
                id: request.id.clone(),
                status: request.status,
            });
        }

        debug!(request_id = %request.id, "Signing session opened");
        Ok(Self {
            signature: StrokeCapture::new(ArtifactRole::Signature, signature_config)?,
            initials: StrokeCapture::new(ArtifactRole::Initials, initials_config)?,
            request,
            consent_given: false,
        })
    }

    /// Open a session with the default surface for each role.
    pub fn with_defaults(request: SigningRequest) -> SigningResult<Self> {
        Self::open(
            request,
            CaptureConfig::for_role(ArtifactRole::Signature),
            CaptureConfig::for_role(ArtifactRole::Initials),
        )
    }

    pub fn request(&self) -> &SigningRequest {
        &self.request
    }

    pub fn capture(&self, role: ArtifactRole) -> &StrokeCapture {
        match role {
            ArtifactRole::Signature => &self.signature,
            ArtifactRole::Initials => &self.initials,
        }
    }

    pub fn capture_mut(&mut self, role: ArtifactRole) -> &mut StrokeCapture {
        match role {
            ArtifactRole::Signature => &mut self.signature,
            ArtifactRole::Initials => &mut self.initials,
        }
    }

    pub fn clear(&mut self, role: ArtifactRole) {
        self.capture_mut(role).clear();
    }

    /// Replace the ink for `role` with previously recorded strokes.
    pub fn replay(&mut self, role: ArtifactRole, strokes: &[Stroke]) -> SigningResult<()> {
        let config = self.capture(role).config().clone();
        *self.capture_mut(role) = StrokeCapture::replay(role, config, strokes)?;
        Ok(())
    }

    pub fn set_consent(&mut self, given: bool) {
        self.consent_given = given;
    }

    pub fn consent_given(&self) -> bool {
        self.consent_given
    }

    /// Live preview of the request document with the ink drawn so far.
    pub fn preview(&self) -> SubstitutionResult {
        substitute(
            &self.request.document_template,
            self.signature.encoded(),
            self.initials.encoded(),
        )
    }

    /// The payload a submit would send, or the first failing precondition.
    pub fn payload(&self) -> SigningResult<SubmissionPayload> {
        SigningLifecycle::validate(
            &self.request,
            self.signature.encoded(),
            self.initials.encoded(),
            self.consent_given,
        )
    }

    /// Submit the raw artifacts through `lifecycle`.
    ///
    /// Local ink and consent are kept on failure, so a rejected submission
    /// can be retried without redrawing.
    pub async fn submit(&self, lifecycle: &SigningLifecycle) -> SigningResult<SubmissionReceipt> {
        lifecycle
            .submit(
                &self.request,
                self.signature.encoded(),
                self.initials.encoded(),
                self.consent_given,
            )
            .await
    }
}
