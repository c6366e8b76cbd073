//! Quill Types - shared data model for the signing engine
//!
//! ## Key Concepts
//!
//! - **SigningRequest**: externally owned record tracking one document's
//!   signature lifecycle (`pending`, `signed`, `expired`)
//! - **ArtifactRole**: which ink a surface captures (signature or initials)
//! - **EncodedArtifact**: portable image representation of captured ink,
//!   embeddable directly in an HTML `img` source attribute
//! - **SubmissionPayload**: what the engine hands to the external store

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod artifact;
pub mod ids;
pub mod request;

pub use artifact::{ArtifactRole, EncodedArtifact};
pub use ids::RequestId;
pub use request::{RequestStatus, SigningRequest, SubmissionPayload, SubmissionReceipt};
