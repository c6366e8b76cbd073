//! Portable encoding of an ink surface.
//!
//! Surfaces are encoded as lossless PNG inside a base64 `data:` URI, so the
//! result can be embedded in an `img` source attribute with no external
//! fetch. Compression and filter settings are fixed, which makes the output
//! a pure function of the raster state.
//!
//! A blank surface still encodes to a non-trivial PNG. Whether an artifact
//! carries ink is therefore decided by length alone: it must exceed the
//! blank baseline for its surface size by at least [`MIN_INK_MARGIN`].

use std::collections::HashMap;
use std::sync::Mutex;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ColorType, ImageEncoder, RgbaImage};
use once_cell::sync::Lazy;
use quill_types::EncodedArtifact;
use tracing::{debug, warn};

use crate::config::surface_in_range;
use crate::error::{InkError, InkResult};

/// Scheme prefix of every encoded artifact.
pub const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// Minimum number of encoded characters an artifact must carry above the
/// blank-surface baseline of the same dimensions. One base64 quantum, i.e.
/// at least three more bytes of compressed PNG than an untouched surface.
pub const MIN_INK_MARGIN: usize = 4;

/// Distinct surface sizes whose baseline is remembered.
const BASELINE_CACHE_CAPACITY: usize = 32;

static BASELINES: Lazy<Mutex<HashMap<(u32, u32), usize>>> = Lazy::new(Default::default);

/// Encode a raster surface as a PNG data URI.
pub fn encode(surface: &RgbaImage) -> InkResult<EncodedArtifact> {
    let (width, height) = surface.dimensions();
    if width == 0 || height == 0 {
        return Err(InkError::InvalidSurface { width, height });
    }

    let mut png = Vec::new();
    PngEncoder::new_with_quality(&mut png, CompressionType::Best, FilterType::NoFilter)
        .write_image(surface.as_raw(), width, height, ColorType::Rgba8)?;

    let mut data_uri = String::with_capacity(PNG_DATA_URI_PREFIX.len() + png.len() * 4 / 3 + 4);
    data_uri.push_str(PNG_DATA_URI_PREFIX);
    STANDARD.encode_string(&png, &mut data_uri);

    debug!(width, height, encoded_len = data_uri.len(), "Encoded ink surface");
    Ok(EncodedArtifact::new(data_uri, width, height))
}

/// Encoded length of an untouched surface of the given size.
pub fn baseline_len(width: u32, height: u32) -> InkResult<usize> {
    if !surface_in_range(width, height) {
        return Err(InkError::InvalidSurface { width, height });
    }

    if let Ok(cache) = BASELINES.lock() {
        if let Some(len) = cache.get(&(width, height)) {
            return Ok(*len);
        }
    }

    let len = encode(&RgbaImage::new(width, height))?.len();

    if let Ok(mut cache) = BASELINES.lock() {
        if cache.len() < BASELINE_CACHE_CAPACITY {
            cache.insert((width, height), len);
        }
    }
    Ok(len)
}

/// Shortest encoded length accepted as "has ink" for a surface size.
pub fn min_sufficient_len(width: u32, height: u32) -> InkResult<usize> {
    Ok(baseline_len(width, height)? + MIN_INK_MARGIN)
}

/// Whether an artifact carries enough ink to satisfy validation.
///
/// Absent artifacts, and artifacts whose surface size is empty or larger
/// than [`MAX_SURFACE_DIM`](crate::config::MAX_SURFACE_DIM), are never
/// sufficient.
pub fn is_sufficient(artifact: Option<&EncodedArtifact>) -> bool {
    let Some(artifact) = artifact else {
        return false;
    };

    let (width, height) = artifact.dimensions();
    if !surface_in_range(width, height) {
        debug!(width, height, "Artifact surface out of range");
        return false;
    }
    match min_sufficient_len(width, height) {
        Ok(min_len) => artifact.len() >= min_len,
        Err(err) => {
            warn!(width, height, error = %err, "Cannot measure ink baseline");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MAX_SURFACE_DIM;
    use image::Rgba;

    #[test]
    fn encodes_png_data_uri() {
        let artifact = encode(&RgbaImage::new(40, 20)).unwrap();
        assert!(artifact.data_uri().starts_with(PNG_DATA_URI_PREFIX));
        assert_eq!(artifact.dimensions(), (40, 20));

        let payload = &artifact.data_uri()[PNG_DATA_URI_PREFIX.len()..];
        let png = STANDARD.decode(payload).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn encoding_is_deterministic() {
        let mut surface = RgbaImage::new(30, 30);
        surface.put_pixel(3, 4, Rgba([0, 0, 0, 255]));
        assert_eq!(encode(&surface).unwrap(), encode(&surface).unwrap());
    }

    #[test]
    fn blank_surface_is_insufficient() {
        let blank = encode(&RgbaImage::new(400, 150)).unwrap();
        assert_eq!(blank.len(), baseline_len(400, 150).unwrap());
        assert!(!is_sufficient(Some(&blank)));
        assert!(!is_sufficient(None));
    }

    #[test]
    fn threshold_sits_exactly_at_margin() {
        let min_len = min_sufficient_len(200, 100).unwrap();
        assert_eq!(min_len, baseline_len(200, 100).unwrap() + MIN_INK_MARGIN);

        let short = EncodedArtifact::new("x".repeat(min_len - 1), 200, 100);
        let exact = EncodedArtifact::new("x".repeat(min_len), 200, 100);
        assert!(!is_sufficient(Some(&short)));
        assert!(is_sufficient(Some(&exact)));
    }

    #[test]
    fn inked_surface_is_sufficient() {
        let mut surface = RgbaImage::new(200, 100);
        for x in 20..120 {
            for y in 40..43 {
                surface.put_pixel(x, y, Rgba([0, 0, 0, 255]));
            }
        }
        assert!(is_sufficient(Some(&encode(&surface).unwrap())));
    }

    #[test]
    fn zero_sized_surface_is_rejected() {
        assert!(matches!(
            encode(&RgbaImage::new(0, 10)),
            Err(InkError::InvalidSurface { width: 0, .. })
        ));
        let bogus = EncodedArtifact::new("data:image/png;base64,AAAA", 0, 0);
        assert!(!is_sufficient(Some(&bogus)));
    }

    #[test]
    fn oversized_artifact_is_insufficient_without_measuring() {
        let huge = EncodedArtifact::new("data:image/png;base64,AAAA", u32::MAX, u32::MAX);
        assert!(!is_sufficient(Some(&huge)));

        let wide = EncodedArtifact::new("x".repeat(10_000), MAX_SURFACE_DIM + 1, 1);
        assert!(!is_sufficient(Some(&wide)));

        assert!(matches!(
            baseline_len(60_000, 60_000),
            Err(InkError::InvalidSurface { width: 60_000, .. })
        ));
    }
}
