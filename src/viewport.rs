//! Stage/viewport coordinate mapping with pan and zoom.
//!
//! The stage is the image pixel space. The transform maps a stage point `s`
//! to the viewport point `s * scale + translate`.

use crate::model::{Point, Rect};

/// Pan/zoom state. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageTransform {
    pub scale: f32,
    pub translate_x: f32,
    pub translate_y: f32,
}

impl StageTransform {
    pub fn new(scale: f32, translate_x: f32, translate_y: f32) -> Self {
        Self {
            scale,
            translate_x,
            translate_y,
        }
    }

    /// Identity transform (scale 1, no translation).
    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0)
    }
}

impl Default for StageTransform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Coordinate mapper owned by the session.
///
/// All inputs are clamped or ignored rather than rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    transform: StageTransform,
    viewport_w: f32,
    viewport_h: f32,
    stage_w: f32,
    stage_h: f32,
    min_zoom: f32,
    max_zoom: f32,
    zoom_step: f32,
}

impl Viewport {
    pub fn new(min_zoom: f32, max_zoom: f32, zoom_step: f32) -> Self {
        let min_zoom = if min_zoom.is_finite() && min_zoom > 0.0 { min_zoom } else { 0.1 };
        let max_zoom = if max_zoom.is_finite() { max_zoom.max(min_zoom) } else { min_zoom };
        Self {
            transform: StageTransform::identity(),
            viewport_w: 1.0,
            viewport_h: 1.0,
            stage_w: 1.0,
            stage_h: 1.0,
            min_zoom,
            max_zoom,
            zoom_step: if zoom_step.is_finite() && zoom_step > 1.0 { zoom_step } else { 1.2 },
        }
    }

    pub fn transform(&self) -> StageTransform {
        self.transform
    }

    pub fn scale(&self) -> f32 {
        self.transform.scale
    }

    pub fn stage_size(&self) -> (f32, f32) {
        (self.stage_w, self.stage_h)
    }

    pub fn viewport_size(&self) -> (f32, f32) {
        (self.viewport_w, self.viewport_h)
    }

    pub fn zoom_range(&self) -> (f32, f32) {
        (self.min_zoom, self.max_zoom)
    }

    /// Set the on-screen area available to the stage.
    pub fn set_viewport_size(&mut self, width: f32, height: f32) {
        self.viewport_w = at_least_one(width);
        self.viewport_h = at_least_one(height);
    }

    /// Set the image size (after load, rotate, crop).
    pub fn set_stage_size(&mut self, width: f32, height: f32) {
        self.stage_w = at_least_one(width);
        self.stage_h = at_least_one(height);
    }

    /// Map a viewport point to stage space, clamped to the stage.
    pub fn to_stage(&self, viewport_x: f32, viewport_y: f32) -> Point {
        let t = &self.transform;
        let x = (viewport_x - t.translate_x) / t.scale;
        let y = (viewport_y - t.translate_y) / t.scale;
        Point::new(clamp_finite(x, self.stage_w), clamp_finite(y, self.stage_h))
    }

    /// Map a stage point to viewport space.
    pub fn to_viewport(&self, stage: Point) -> Point {
        let t = &self.transform;
        Point::new(
            stage.x * t.scale + t.translate_x,
            stage.y * t.scale + t.translate_y,
        )
    }

    /// Map a stage rectangle to viewport space.
    pub fn rect_to_viewport(&self, rect: &Rect) -> Rect {
        let top_left = self.to_viewport(Point::new(rect.x, rect.y));
        Rect::new(
            top_left.x,
            top_left.y,
            rect.width * self.transform.scale,
            rect.height * self.transform.scale,
        )
    }

    /// Fit the whole stage inside the viewport and center it.
    pub fn fit_to_viewport(&mut self) {
        let scale = (self.viewport_w / self.stage_w)
            .min(self.viewport_h / self.stage_h)
            .clamp(self.min_zoom, self.max_zoom);
        self.transform = StageTransform::new(
            scale,
            (self.viewport_w - self.stage_w * scale) / 2.0,
            (self.viewport_h - self.stage_h * scale) / 2.0,
        );
        log::debug!(
            "Fit {:.0}x{:.0} stage into {:.0}x{:.0} viewport at {:.3}x",
            self.stage_w,
            self.stage_h,
            self.viewport_w,
            self.viewport_h,
            scale
        );
    }

    /// Rescale by `factor` keeping the stage point under `anchor` fixed.
    ///
    /// The resulting scale is clamped to the zoom range; non-finite or
    /// non-positive factors are ignored.
    pub fn zoom(&mut self, factor: f32, anchor: Point) {
        if !factor.is_finite() || factor <= 0.0 || !anchor.x.is_finite() || !anchor.y.is_finite() {
            return;
        }
        let t = self.transform;
        let new_scale = (t.scale * factor).clamp(self.min_zoom, self.max_zoom);
        if (new_scale - t.scale).abs() <= f32::EPSILON {
            return;
        }

        // Stage-space point under the anchor (unclamped), kept in place
        let stage_x = (anchor.x - t.translate_x) / t.scale;
        let stage_y = (anchor.y - t.translate_y) / t.scale;
        self.transform = StageTransform::new(
            new_scale,
            anchor.x - stage_x * new_scale,
            anchor.y - stage_y * new_scale,
        );
        log::trace!("Zoom {:.3}x at ({:.1}, {:.1})", new_scale, anchor.x, anchor.y);
    }

    /// Zoom in one step around `anchor`.
    pub fn zoom_in(&mut self, anchor: Point) {
        self.zoom(self.zoom_step, anchor);
    }

    /// Zoom out one step around `anchor`.
    pub fn zoom_out(&mut self, anchor: Point) {
        self.zoom(1.0 / self.zoom_step, anchor);
    }

    /// Translate by a viewport delta.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        if !dx.is_finite() || !dy.is_finite() {
            return;
        }
        self.transform.translate_x += dx;
        self.transform.translate_y += dy;
    }
}

fn at_least_one(v: f32) -> f32 {
    if v.is_finite() { v.max(1.0) } else { 1.0 }
}

fn clamp_finite(v: f32, max: f32) -> f32 {
    if v.is_finite() { v.clamp(0.0, max) } else { 0.0 }
}
