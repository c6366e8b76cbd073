//! Stroke capture onto an owned raster surface.
//!
//! A [`StrokeCapture`] is created per artifact role and never shared. It
//! records pointer paths in surface-local coordinates, draws them with a
//! round pen as they arrive, and re-encodes the surface whenever a stroke
//! ends.

use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_filled_circle_mut;
use quill_types::{ArtifactRole, EncodedArtifact};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::CaptureConfig;
use crate::encoder;
use crate::error::InkResult;

/// A point in surface-local coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfacePoint {
    pub x: f32,
    pub y: f32,
}

impl SurfacePoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    fn pixel(&self) -> (i32, i32) {
        (self.x.round() as i32, self.y.round() as i32)
    }
}

/// A raw device coordinate, as reported by a mouse or touch event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DevicePoint {
    pub x: f32,
    pub y: f32,
}

impl DevicePoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// On-screen position of the surface's top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SurfaceOrigin {
    pub left: f32,
    pub top: f32,
}

impl SurfaceOrigin {
    pub fn new(left: f32, top: f32) -> Self {
        Self { left, top }
    }

    /// Map a device coordinate into the surface. Mouse and touch input go
    /// through this same mapping.
    pub fn to_local(&self, point: DevicePoint) -> SurfacePoint {
        SurfacePoint::new(point.x - self.left, point.y - self.top)
    }
}

/// Input device that produced an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Touch,
}

/// Pointer or touch input delivered to a surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Mouse button pressed, or first touch point placed
    Down { kind: PointerKind, at: DevicePoint },
    /// Pointer moved, or touch point dragged
    Move { kind: PointerKind, at: DevicePoint },
    /// Mouse button released, or touch lifted
    Up { kind: PointerKind },
    /// Pointer left the surface
    Leave,
}

/// One continuous pointer-down to pointer-up path
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Stroke {
    points: Vec<SurfacePoint>,
}

impl Stroke {
    pub fn new(points: Vec<SurfacePoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[SurfacePoint] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Captures ink for a single artifact role.
pub struct StrokeCapture {
    role: ArtifactRole,
    config: CaptureConfig,
    surface: RgbaImage,
    strokes: Vec<Stroke>,
    active: Option<Stroke>,
    encoded: Option<EncodedArtifact>,
}

impl StrokeCapture {
    /// Create an empty surface for `role`.
    pub fn new(role: ArtifactRole, config: CaptureConfig) -> InkResult<Self> {
        config.validate()?;
        Ok(Self {
            role,
            surface: RgbaImage::new(config.width, config.height),
            config,
            strokes: Vec::new(),
            active: None,
            encoded: None,
        })
    }

    /// Rebuild a capture by drawing previously recorded strokes.
    ///
    /// Strokes without points are skipped.
    pub fn replay(
        role: ArtifactRole,
        config: CaptureConfig,
        strokes: &[Stroke],
    ) -> InkResult<Self> {
        let mut capture = Self::new(role, config)?;
        for stroke in strokes {
            let Some((first, rest)) = stroke.points().split_first() else {
                continue;
            };
            capture.begin(*first);
            for point in rest {
                capture.extend(*point);
            }
            capture.end()?;
        }
        Ok(capture)
    }

    /// Start a new stroke at `point`.
    ///
    /// The pen tip is stamped immediately, so a tap without a drag leaves a
    /// dot. A stroke still open from a missed pointer-up is kept as drawn.
    /// Points off the surface are pinned to its nearest edge.
    pub fn begin(&mut self, point: SurfacePoint) {
        let point = self.pin(point);
        if let Some(open) = self.active.take() {
            self.strokes.push(open);
        }

        trace!(role = %self.role, x = point.x, y = point.y, "Stroke begin");
        stamp(&mut self.surface, &self.config, point);
        self.active = Some(Stroke::new(vec![point]));
    }

    /// Extend the active stroke to `point`. No-op when no stroke is active.
    pub fn extend(&mut self, point: SurfacePoint) {
        let point = self.pin(point);
        let Some(stroke) = self.active.as_mut() else {
            return;
        };

        if let Some(last) = stroke.points.last().copied() {
            draw_segment(&mut self.surface, &self.config, last, point);
        }
        stroke.points.push(point);
    }

    /// Close the active stroke and re-encode the surface.
    ///
    /// Safe to call when no stroke is active, e.g. when the pointer leaves
    /// the surface after a pointer-up.
    pub fn end(&mut self) -> InkResult<()> {
        let Some(stroke) = self.active.take() else {
            return Ok(());
        };

        debug!(role = %self.role, points = stroke.points.len(), "Stroke end");
        self.strokes.push(stroke);
        self.encoded = Some(encoder::encode(&self.surface)?);
        Ok(())
    }

    /// Erase the surface and drop every stroke.
    pub fn clear(&mut self) {
        debug!(role = %self.role, strokes = self.strokes.len(), "Surface cleared");
        self.surface = RgbaImage::new(self.config.width, self.config.height);
        self.strokes.clear();
        self.active = None;
        self.encoded = None;
    }

    /// Route a pointer event, normalised against `origin`.
    pub fn handle(&mut self, event: PointerEvent, origin: SurfaceOrigin) -> InkResult<()> {
        match event {
            PointerEvent::Down { at, .. } => {
                self.begin(origin.to_local(at));
                Ok(())
            }
            PointerEvent::Move { at, .. } => {
                self.extend(origin.to_local(at));
                Ok(())
            }
            PointerEvent::Up { .. } | PointerEvent::Leave => self.end(),
        }
    }

    pub fn role(&self) -> ArtifactRole {
        self.role
    }

    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    /// Completed strokes, oldest first.
    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn is_drawing(&self) -> bool {
        self.active.is_some()
    }

    /// True once at least one stroke with a point has been completed.
    pub fn has_content(&self) -> bool {
        self.strokes.iter().any(|stroke| !stroke.is_empty())
    }

    /// Encoded snapshot as of the last completed stroke.
    pub fn encoded(&self) -> Option<&EncodedArtifact> {
        self.encoded.as_ref()
    }

    pub fn surface(&self) -> &RgbaImage {
        &self.surface
    }

    /// Every recorded point lands on a pixel, so each stroke leaves ink.
    fn pin(&self, point: SurfacePoint) -> SurfacePoint {
        let max_x = (self.config.width - 1) as f32;
        let max_y = (self.config.height - 1) as f32;
        SurfacePoint::new(point.x.max(0.0).min(max_x), point.y.max(0.0).min(max_y))
    }
}

fn stamp(surface: &mut RgbaImage, config: &CaptureConfig, at: SurfacePoint) {
    draw_filled_circle_mut(surface, at.pixel(), config.pen_radius(), Rgba(config.ink));
}

/// Round caps and joins fall out of stamping the pen tip at every pixel step.
fn draw_segment(
    surface: &mut RgbaImage,
    config: &CaptureConfig,
    from: SurfacePoint,
    to: SurfacePoint,
) {
    let (dx, dy) = (to.x - from.x, to.y - from.y);
    let steps = dx.hypot(dy).ceil().max(1.0) as u32;
    for step in 1..=steps {
        let t = step as f32 / steps as f32;
        stamp(
            surface,
            config,
            SurfacePoint::new(from.x + dx * t, from.y + dy * t),
        );
    }
}
