//! JSON-file signing-request store used by the CLI.
//!
//! The whole file is read, modified and rewritten under one async mutex, so
//! two submissions through the same handle cannot interleave.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quill_signing::{
    accept_submission, RequestSource, SigningError, SigningResult, StoreRejection, SubmissionStore,
};
use quill_types::{RequestId, SigningRequest, SubmissionPayload, SubmissionReceipt};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

/// On-disk layout of the store file
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreFile {
    #[serde(default)]
    pub requests: Vec<SigningRequest>,

    #[serde(default)]
    pub submissions: Vec<SubmissionRecord>,
}

/// An accepted submission as persisted
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    pub id: Uuid,
    pub request_id: RequestId,
    pub received_at: DateTime<Utc>,
    pub payload: SubmissionPayload,
}

/// Signing-request store persisted as a single JSON document
pub struct FileSigningStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileSigningStore {
    /// Open the store at `path`, creating parent directories if needed.
    /// The file itself is created on first write.
    pub async fn open(path: impl Into<PathBuf>) -> std::io::Result<Self> {
        let path = path.into();
        if !path.exists() {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        Ok(Self {
            path,
            lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Insert or replace a request.
    pub async fn put_request(&self, request: SigningRequest) -> SigningResult<()> {
        let _guard = self.lock.lock().await;
        let mut file = self.read().await?;

        match file.requests.iter_mut().find(|r| r.id == request.id) {
            Some(existing) => *existing = request,
            None => file.requests.push(request),
        }

        self.write(&file).await
    }

    pub async fn list_requests(&self) -> SigningResult<Vec<SigningRequest>> {
        let _guard = self.lock.lock().await;
        Ok(self.read().await?.requests)
    }

    pub async fn submissions(&self) -> SigningResult<Vec<SubmissionRecord>> {
        let _guard = self.lock.lock().await;
        Ok(self.read().await?.submissions)
    }

    async fn read(&self) -> SigningResult<StoreFile> {
        if !self.path.exists() {
            return Ok(StoreFile::default());
        }

        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| SigningError::Store(format!("{}: {}", self.path.display(), e)))?;
        if raw.trim().is_empty() {
            return Ok(StoreFile::default());
        }

        serde_json::from_str(&raw)
            .map_err(|e| SigningError::Store(format!("{}: {}", self.path.display(), e)))
    }

    async fn write(&self, file: &StoreFile) -> SigningResult<()> {
        let json = serde_json::to_string_pretty(file)
            .map_err(|e| SigningError::Store(e.to_string()))?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| SigningError::Store(format!("{}: {}", self.path.display(), e)))?;

        debug!(path = %self.path.display(), "Store file written");
        Ok(())
    }
}

#[async_trait]
impl RequestSource for FileSigningStore {
    async fn fetch_request(&self, id: &RequestId) -> SigningResult<SigningRequest> {
        let _guard = self.lock.lock().await;
        self.read()
            .await?
            .requests
            .into_iter()
            .find(|r| &r.id == id)
            .ok_or_else(|| SigningError::RequestNotFound(id.clone()))
    }
}

#[async_trait]
impl SubmissionStore for FileSigningStore {
    async fn submit(
        &self,
        id: &RequestId,
        payload: &SubmissionPayload,
    ) -> Result<SubmissionReceipt, StoreRejection> {
        let _guard = self.lock.lock().await;
        let mut file = self
            .read()
            .await
            .map_err(|e| StoreRejection::new(e.to_string()))?;

        let request = file
            .requests
            .iter_mut()
            .find(|r| &r.id == id)
            .ok_or_else(|| StoreRejection::new("Signing request not found"))?;
        let receipt = accept_submission(request, payload)?;

        let record = SubmissionRecord {
            id: Uuid::new_v4(),
            request_id: id.clone(),
            received_at: receipt.signed_at.unwrap_or_else(Utc::now),
            payload: payload.clone(),
        };
        info!(request_id = %id, submission_id = %record.id, "Submission recorded");
        file.submissions.push(record);

        self.write(&file)
            .await
            .map_err(|e| StoreRejection::new(e.to_string()))?;
        Ok(receipt)
    }
}
