//! # quill-template
//!
//! Document template handling for the signing engine.
//!
//! A template is a self-contained HTML resource in one of two `data:` forms:
//!
//! - `data:text/html;charset=utf-8,<percent-encoded HTML>`
//! - `data:text/html;base64,<base64 HTML>`
//!
//! [`codec`] decodes either form and always re-emits the percent form.
//! [`substitute`] replaces signature and initials placeholder markers with
//! embedded image fragments. Substitution is pure: the same inputs always
//! produce the same canonical resource, which keeps live preview re-renders
//! cheap to compare.

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]
#![warn(rust_2018_idioms)]

pub mod codec;
mod error;
pub mod markers;
pub mod substitute;

pub use codec::{decode, encode, ResourceScheme};
pub use error::{CodecError, CodecResult};
pub use markers::{find_markers, markers, Marker, MarkerMatch};
pub use substitute::{
    fragment, max_width_px, substitute, substitute_text, SubstitutionResult, TextSubstitution,
};
