//! Signing a pending request with recorded ink

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Result};
use clap::Args;
use quill_ink::Stroke;
use quill_signing::{RequestSource, SigningLifecycle, SigningResult, SigningSession};
use quill_types::{ArtifactRole, RequestId, SubmissionReceipt};
use tracing::info;

use super::load_strokes;
use crate::config::QuillConfig;
use crate::store::FileSigningStore;

/// Arguments for `quill sign`
#[derive(Args, Debug)]
pub struct SignArgs {
    /// Request id
    #[arg(short, long)]
    pub request: String,

    /// Recorded signature strokes (JSON)
    #[arg(short, long)]
    pub signature: PathBuf,

    /// Recorded initials strokes (JSON)
    #[arg(short, long)]
    pub initials: PathBuf,

    /// Agree that the drawn signature is legally binding
    #[arg(long)]
    pub consent: bool,
}

/// Execute `quill sign`
pub async fn execute(
    args: SignArgs,
    config: &QuillConfig,
    store: Arc<FileSigningStore>,
) -> Result<()> {
    let receipt = sign(args, config, store).await?;
    println!("{}", serde_json::to_string_pretty(&receipt)?);
    Ok(())
}

async fn sign(
    args: SignArgs,
    config: &QuillConfig,
    store: Arc<FileSigningStore>,
) -> Result<SubmissionReceipt> {
    let signature = load_strokes(&args.signature)?;
    let initials = load_strokes(&args.initials)?;

    let outcome = submit_with_ink(
        RequestId::new(args.request),
        &signature,
        &initials,
        args.consent,
        config,
        store,
    )
    .await;

    match outcome {
        Ok(receipt) => {
            info!(request_id = %receipt.request_id, "Document signed");
            Ok(receipt)
        }
        Err(err) => bail!("{}", err.user_message()),
    }
}

async fn submit_with_ink(
    id: RequestId,
    signature: &[Stroke],
    initials: &[Stroke],
    consent: bool,
    config: &QuillConfig,
    store: Arc<FileSigningStore>,
) -> SigningResult<SubmissionReceipt> {
    let request = store.fetch_request(&id).await?;
    let mut session = SigningSession::open(
        request,
        config.capture.signature.clone(),
        config.capture.initials.clone(),
    )?;
    session.replay(ArtifactRole::Signature, signature)?;
    session.replay(ArtifactRole::Initials, initials)?;
    session.set_consent(consent);

    let lifecycle = SigningLifecycle::new(store);
    session.submit(&lifecycle).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_ink::SurfacePoint;
    use quill_template::codec;
    use quill_types::{RequestStatus, SigningRequest};

    struct Fixture {
        _dir: tempfile::TempDir,
        store: Arc<FileSigningStore>,
        signature: PathBuf,
        initials: PathBuf,
    }

    async fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(
            FileSigningStore::open(dir.path().join("store.json"))
                .await
                .unwrap(),
        );
        store
            .put_request(SigningRequest::pending(
                "req-1",
                codec::encode("Signature line / Initial:"),
            ))
            .await
            .unwrap();

        let strokes = vec![Stroke::new(vec![
            SurfacePoint::new(8.0, 8.0),
            SurfacePoint::new(60.0, 30.0),
        ])];
        let json = serde_json::to_string(&strokes).unwrap();
        let signature = dir.path().join("sig.json");
        let initials = dir.path().join("ini.json");
        std::fs::write(&signature, &json).unwrap();
        std::fs::write(&initials, &json).unwrap();

        Fixture {
            _dir: dir,
            store,
            signature,
            initials,
        }
    }

    fn args(fixture: &Fixture, consent: bool) -> SignArgs {
        SignArgs {
            request: "req-1".to_string(),
            signature: fixture.signature.clone(),
            initials: fixture.initials.clone(),
            consent,
        }
    }

    #[tokio::test]
    async fn test_sign_marks_request_signed() {
        let fixture = fixture().await;
        let receipt = sign(args(&fixture, true), &QuillConfig::default(), fixture.store.clone())
            .await
            .unwrap();

        assert_eq!(receipt.status, RequestStatus::Signed);
        let submissions = fixture.store.submissions().await.unwrap();
        assert_eq!(submissions.len(), 1);
        assert!(submissions[0].payload.legal_consent);
    }

    #[tokio::test]
    async fn test_failures_surface_user_messages() {
        let fixture = fixture().await;

        let err = sign(args(&fixture, false), &QuillConfig::default(), fixture.store.clone())
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Please agree to sign this document electronically."
        );

        sign(args(&fixture, true), &QuillConfig::default(), fixture.store.clone())
            .await
            .unwrap();
        let err = sign(args(&fixture, true), &QuillConfig::default(), fixture.store.clone())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "This document has already been signed.");
    }
}
