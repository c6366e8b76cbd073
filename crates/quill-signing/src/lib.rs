//! # quill-signing
//!
//! Signing request lifecycle for the Quill engine.
//!
//! ## States
//!
//! `pending -> signed` and `pending -> expired`, both terminal. The engine
//! only observes the status reported by the external store; the store alone
//! performs transitions.
//!
//! ## Components
//!
//! - **SigningLifecycle**: validates a submission (status, signature ink,
//!   initials ink, consent; in that order), guards against duplicate
//!   in-flight submissions and relays the store's verdict
//! - **SigningSession**: one pending request plus its two ink surfaces and
//!   the consent flag; renders the live preview
//! - **RequestSource / SubmissionStore**: collaborator seams for fetching
//!   requests and accepting submissions
//! - **InMemorySigningStore**: reference store applying the server-side
//!   rules, used by tests and local tooling

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]
#![warn(rust_2018_idioms)]

mod error;
pub mod lifecycle;
pub mod memory;
pub mod session;
mod store;

pub use error::{SigningError, SigningResult};
pub use lifecycle::SigningLifecycle;
pub use memory::InMemorySigningStore;
pub use session::SigningSession;
pub use store::{accept_submission, RequestSource, StoreRejection, SubmissionStore};
