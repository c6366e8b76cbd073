//! Surface configuration for ink capture

use quill_types::ArtifactRole;
use serde::{Deserialize, Serialize};

use crate::error::{InkError, InkResult};

/// Largest accepted surface edge, in pixels.
pub const MAX_SURFACE_DIM: u32 = 2048;

/// Whether a surface of this size can be allocated and encoded.
pub fn surface_in_range(width: u32, height: u32) -> bool {
    (1..=MAX_SURFACE_DIM).contains(&width) && (1..=MAX_SURFACE_DIM).contains(&height)
}

/// Size and pen settings of one ink surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Surface width in pixels
    pub width: u32,

    /// Surface height in pixels
    pub height: u32,

    /// Pen width in pixels
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f32,

    /// Ink colour as RGBA
    #[serde(default = "default_ink")]
    pub ink: [u8; 4],
}

impl CaptureConfig {
    /// Full signature surface (400x150).
    pub fn signature() -> Self {
        Self {
            width: 400,
            height: 150,
            stroke_width: default_stroke_width(),
            ink: default_ink(),
        }
    }

    /// Initials surface (200x100).
    pub fn initials() -> Self {
        Self {
            width: 200,
            height: 100,
            stroke_width: default_stroke_width(),
            ink: default_ink(),
        }
    }

    pub fn for_role(role: ArtifactRole) -> Self {
        match role {
            ArtifactRole::Signature => Self::signature(),
            ArtifactRole::Initials => Self::initials(),
        }
    }

    pub fn validate(&self) -> InkResult<()> {
        if !surface_in_range(self.width, self.height) {
            return Err(InkError::InvalidSurface {
                width: self.width,
                height: self.height,
            });
        }
        if !self.stroke_width.is_finite() || self.stroke_width <= 0.0 {
            return Err(InkError::InvalidStrokeWidth(self.stroke_width));
        }
        if self.ink[3] == 0 {
            return Err(InkError::InvisibleInk);
        }
        Ok(())
    }

    /// Radius of the round pen tip, in whole pixels.
    pub(crate) fn pen_radius(&self) -> i32 {
        (self.stroke_width / 2.0).round() as i32
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self::signature()
    }
}

fn default_stroke_width() -> f32 {
    2.5
}

fn default_ink() -> [u8; 4] {
    [0, 0, 0, 255]
}
