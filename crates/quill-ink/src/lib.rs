//! # quill-ink
//!
//! Freehand ink capture and artifact encoding.
//!
//! ## Components
//!
//! - **StrokeCapture**: turns pointer and touch input into ordered strokes
//!   and renders them onto an owned raster surface, one instance per role
//! - **encoder**: packs a surface into a PNG data URI and decides whether
//!   an encoded artifact carries enough ink to count as drawn
//!
//! Both are synchronous. Encoding runs eagerly when a stroke ends, so the
//! encoded artifact always reflects the last completed stroke.

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]
#![warn(rust_2018_idioms)]

pub mod capture;
pub mod config;
pub mod encoder;
mod error;

pub use capture::{
    DevicePoint, PointerEvent, PointerKind, Stroke, StrokeCapture, SurfaceOrigin, SurfacePoint,
};
pub use config::{CaptureConfig, MAX_SURFACE_DIM};
pub use encoder::{baseline_len, encode, is_sufficient, min_sufficient_len, MIN_INK_MARGIN};
pub use error::{InkError, InkResult};
