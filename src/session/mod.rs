//! The editing session: owns the image, annotations, history and gesture.
//!
//! Everything that swaps the image goes through a pending decode. The
//! requesting call stages the new bytes together with the model change to
//! apply, [`EditorSession::finish_decode`] decodes them and applies the change
//! in one step. While a decode is pending the session rejects further
//! image-changing requests with [`EditorError::Busy`] and ignores pointer
//! input.

mod edit;
mod host;
mod pointer;

#[cfg(test)]
mod tests;

pub use host::{EventHost, ListenerChannel, ListenerId};

use std::sync::Arc;

use ab_glyph::FontArc;
use image::DynamicImage;
use web_time::Instant;

use crate::compose::{compose_text, load_font};
use crate::config::EditorConfig;
use crate::error::{EditorError, Result};
use crate::history::{History, HistoryConfig, Snapshot};
use crate::image_source::{EncodedImage, PNG_MIME, SourceImage, encode_png};
use crate::interaction::{Gesture, Tool};
use crate::model::{AnnotationId, AnnotationModel, Mask, TextBox};
use crate::overlay::{Overlay, OverlayInput, project};
use crate::records::{MaskRecord, RevealMode, SaveOutput, masks_from_records, records_from_masks};
use crate::viewport::Viewport;

/// Direction of a deferred history move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HistoryStep {
    Undo,
    Redo,
}

/// Model change applied once the staged image has decoded.
#[derive(Debug, Clone)]
enum AfterDecode {
    /// Fresh image: history cleared, these masks become the baseline
    Open { masks: Vec<Mask> },
    /// Rotate or crop: annotations already remapped, commits history
    Transform {
        masks: Vec<Mask>,
        text_boxes: Vec<TextBox>,
    },
    /// Undo/redo onto an entry with a different image
    Restore { snapshot: Snapshot, step: HistoryStep },
}

/// Image bytes waiting to be decoded.
#[derive(Debug, Clone)]
struct PendingDecode {
    encoded: EncodedImage,
    then: AfterDecode,
}

/// One open annotation editor.
pub struct EditorSession {
    config: EditorConfig,
    model: AnnotationModel,
    history: History,
    /// Load-time state, committed as entry 0 by the first edit
    baseline: Option<Snapshot>,
    viewport: Viewport,
    tool: Tool,
    gesture: Gesture,
    image: Option<SourceImage>,
    pending: Option<PendingDecode>,
    /// Resolved on first use; inner `None` means no font was found
    font: Option<Option<FontArc>>,
    listeners: Vec<ListenerId>,
}

impl EditorSession {
    /// Open a session and subscribe its listeners.
    pub fn open(config: EditorConfig, host: &mut impl EventHost) -> Self {
        let config = config.sanitized();
        let listeners = ListenerChannel::ALL
            .iter()
            .map(|channel| host.subscribe(*channel))
            .collect();
        log::info!("Editor session opened");
        Self {
            history: History::with_config(HistoryConfig {
                capacity: config.history_capacity,
            }),
            viewport: Viewport::new(config.min_zoom, config.max_zoom, config.zoom_step),
            model: AnnotationModel::new(),
            baseline: None,
            tool: Tool::default(),
            gesture: Gesture::Idle,
            image: None,
            pending: None,
            font: None,
            listeners,
            config,
        }
    }

    /// Release every listener and drop the session.
    pub fn close(self, host: &mut impl EventHost) {
        for id in &self.listeners {
            host.unsubscribe(*id);
        }
        if self.pending.is_some() {
            log::debug!("Closing with a decode still pending, discarding it");
        }
        log::info!("Editor session closed ({} listeners released)", self.listeners.len());
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Get the active configuration.
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Get the annotation model.
    pub fn model(&self) -> &AnnotationModel {
        &self.model
    }

    /// All masks in draw order.
    pub fn masks(&self) -> &[Mask] {
        self.model.masks()
    }

    /// All text boxes in draw order.
    pub fn text_boxes(&self) -> &[TextBox] {
        self.model.text_boxes()
    }

    /// Get the selected annotation ID.
    pub fn selected(&self) -> Option<AnnotationId> {
        self.model.selected()
    }

    /// Get the undo history.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Get the current viewport.
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// View-only access for zoom and pan controls.
    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    /// Get the active tool.
    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Get the pointer gesture in progress.
    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    /// Get the loaded image, if any.
    pub fn image(&self) -> Option<&SourceImage> {
        self.image.as_ref()
    }

    /// Pixel size of the current image.
    pub fn image_size(&self) -> Option<(u32, u32)> {
        self.image.as_ref().map(|i| (i.width(), i.height()))
    }

    /// Whether a decode is waiting for [`finish_decode`](Self::finish_decode).
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Resize the viewport and refit the image into it.
    pub fn set_viewport_size(&mut self, width: f32, height: f32) {
        self.viewport.set_viewport_size(width, height);
        if self.image.is_some() {
            self.viewport.fit_to_viewport();
        }
    }

    /// Current overlay for rendering and hit-testing.
    pub fn overlay(&self) -> Overlay {
        project(&OverlayInput {
            model: &self.model,
            viewport: &self.viewport,
            tool: self.tool,
            gesture: &self.gesture,
            loading: self.is_loading(),
            handle_radius: self.config.handle_hit_radius,
        })
    }

    // ------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------

    /// Stage an image for editing, with masks from a previous save.
    ///
    /// Records are clamped into the image and zero-size ones skipped. The
    /// image becomes current on [`finish_decode`](Self::finish_decode).
    pub fn load_image(&mut self, bytes: impl Into<Arc<[u8]>>, mime: &str, existing: &[MaskRecord]) -> Result<()> {
        self.ensure_not_busy("load")?;
        let encoded = EncodedImage::new(bytes, mime);
        let mut masks = masks_from_records(existing);
        // Stored ids may come from anywhere; renumber so they cannot collide
        for (index, mask) in masks.iter_mut().enumerate() {
            mask.id = index as AnnotationId + 1;
        }
        log::info!(
            "Loading {} image ({} bytes, {} of {} masks usable)",
            mime,
            encoded.len(),
            masks.len(),
            existing.len()
        );
        self.pending = Some(PendingDecode {
            encoded,
            then: AfterDecode::Open { masks },
        });
        Ok(())
    }

    /// Stage a pasted image, replacing the current one.
    ///
    /// Annotations and history are discarded once the paste has decoded.
    pub fn paste_image(&mut self, bytes: impl Into<Arc<[u8]>>, mime: &str) -> Result<()> {
        self.ensure_not_busy("paste")?;
        let encoded = EncodedImage::new(bytes, mime);
        log::info!("Pasting {} image ({} bytes)", mime, encoded.len());
        self.pending = Some(PendingDecode {
            encoded,
            then: AfterDecode::Open { masks: Vec::new() },
        });
        Ok(())
    }

    /// Decode the staged image and apply the change waiting on it.
    ///
    /// On a decode error nothing changes apart from the pending state being
    /// cleared, and the error is returned.
    pub fn finish_decode(&mut self) -> Result<()> {
        let pending = self.pending.take().ok_or(EditorError::NothingPending)?;
        let started = Instant::now();
        let decoded = match SourceImage::decode(pending.encoded) {
            Ok(decoded) => decoded,
            Err(e) => {
                log::warn!("Decode failed, keeping current state: {}", e);
                return Err(e);
            }
        };
        self.gesture = Gesture::Idle;

        match pending.then {
            AfterDecode::Open { masks } => {
                self.model = AnnotationModel::new();
                self.model.replace(masks.clone(), Vec::new());
                self.history.clear();
                self.baseline = Some(Snapshot::new(masks, Vec::new(), Some(decoded.encoded().clone())));
                log::info!(
                    "Opened {}x{} image with {} masks",
                    decoded.width(),
                    decoded.height(),
                    self.model.masks().len()
                );
                self.set_image(decoded);
            }
            AfterDecode::Transform { masks, text_boxes } => {
                log::info!("Image is now {}x{}", decoded.width(), decoded.height());
                self.set_image(decoded);
                self.model.replace(masks, text_boxes);
                self.commit_history();
            }
            AfterDecode::Restore { snapshot, step } => {
                self.set_image(decoded);
                self.step_history(step);
                self.model.replace(snapshot.masks, snapshot.text_boxes);
            }
        }
        log::debug!("Applied decoded image in {:.1?}", started.elapsed());
        Ok(())
    }

    fn set_image(&mut self, image: SourceImage) {
        let (width, height) = image.size();
        self.viewport.set_stage_size(width, height);
        self.viewport.fit_to_viewport();
        self.image = Some(image);
    }

    // ------------------------------------------------------------------
    // History plumbing
    // ------------------------------------------------------------------

    fn snapshot(&self) -> Snapshot {
        Snapshot::new(
            self.model.masks().to_vec(),
            self.model.text_boxes().to_vec(),
            self.image.as_ref().map(|i| i.encoded().clone()),
        )
    }

    /// Record the live state as a new history entry.
    fn commit_history(&mut self) {
        if self.history.is_empty()
            && let Some(baseline) = self.baseline.take()
        {
            self.history.commit(baseline);
        }
        let snapshot = self.snapshot();
        self.history.commit(snapshot);
    }

    fn step_history(&mut self, step: HistoryStep) {
        match step {
            HistoryStep::Undo => {
                self.history.undo();
            }
            HistoryStep::Redo => {
                self.history.redo();
            }
        }
    }

    /// Move through history, deferring through a decode if the image differs.
    fn restore(&mut self, snapshot: Snapshot, step: HistoryStep) {
        let current = self.image.as_ref().map(|i| i.encoded());
        if snapshot.image_differs(current)
            && let Some(encoded) = snapshot.image.clone()
        {
            log::debug!("{:?} needs the image swapped, decoding first", step);
            self.pending = Some(PendingDecode {
                encoded,
                then: AfterDecode::Restore { snapshot, step },
            });
            return;
        }
        self.step_history(step);
        self.model.replace(snapshot.masks, snapshot.text_boxes);
    }

    fn ensure_not_busy(&self, action: &str) -> Result<()> {
        if self.pending.is_some() {
            log::warn!("Rejected {} while an image is loading", action);
            return Err(EditorError::Busy);
        }
        Ok(())
    }

    fn require_image(&self) -> Result<&SourceImage> {
        self.image.as_ref().ok_or(EditorError::NoImage)
    }

    /// Stage size as floats, or `None` without an image.
    fn stage_size(&self) -> Option<(f32, f32)> {
        self.image.as_ref().map(SourceImage::size)
    }

    // ------------------------------------------------------------------
    // Saving
    // ------------------------------------------------------------------

    /// Produce the final image and mask records.
    ///
    /// Text boxes are burned into a copy of the image; the session itself is
    /// not modified, so the caller may discard the result and keep editing.
    pub fn save(&mut self, mode: RevealMode) -> Result<SaveOutput> {
        self.ensure_not_busy("save")?;
        self.require_image()?;
        let started = Instant::now();

        let has_text = self.model.text_boxes().iter().any(TextBox::has_text);
        let font = if has_text { self.font()? } else { None };
        let image = self.require_image()?;
        let (width, height) = (image.width(), image.height());

        // Rotated or cropped images are already PNG, so only burn-in re-encodes
        let (bytes, mime) = if has_text {
            let composed = compose_text(image.pixels(), self.model.text_boxes(), font.as_ref());
            (encode_png(&DynamicImage::ImageRgba8(composed))?, PNG_MIME.to_string())
        } else {
            log::debug!("No text to burn in, passing image bytes through");
            (image.encoded().bytes().to_vec(), image.encoded().mime().to_string())
        };

        let output = SaveOutput {
            image: bytes,
            mime,
            width,
            height,
            masks: records_from_masks(self.model.masks()),
            mode,
        };
        log::info!(
            "Saved {}x{} image with {} masks ({:?}) in {:.1?}",
            width,
            height,
            output.masks.len(),
            mode,
            started.elapsed()
        );
        Ok(output)
    }

    fn font(&mut self) -> Result<Option<FontArc>> {
        if self.font.is_none() {
            let font = load_font(self.config.font_path.as_deref())?;
            if font.is_none() {
                log::warn!("No usable font found, text will not be drawn");
            }
            self.font = Some(font);
        }
        Ok(self.font.clone().flatten())
    }
}
