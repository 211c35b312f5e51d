//! Keyboard, text and annotation edits, history navigation and transforms.

use super::{AfterDecode, EditorSession, HistoryStep, PendingDecode};
use crate::constants::NUDGE_FAST_MULTIPLIER;
use crate::error::{EditorError, Result};
use crate::image_source::{EncodedImage, PNG_MIME, encode_png};
use crate::interaction::{Gesture, translate_rect};
use crate::keybindings::{Key, Modifiers, Shortcut};
use crate::model::{AnnotationId, MaskShape, Rect, TextStyle};
use crate::transform::{
    RotateDirection, crop_annotations, crop_pixels, pixel_crop_region, rotate_annotations, rotate_pixels,
};

impl EditorSession {
    // ------------------------------------------------------------------
    // Keyboard
    // ------------------------------------------------------------------

    /// Handle a key press. Returns whether the session consumed it.
    ///
    /// While a text box is open only Escape is handled; everything else
    /// belongs to the host's text input.
    pub fn handle_key(&mut self, key: Key, mods: Modifiers) -> Result<bool> {
        if self.image.is_none() || self.is_loading() {
            return Ok(false);
        }
        if matches!(self.gesture, Gesture::EditingText { .. }) {
            if key == Key::Escape {
                self.finish_text_editing()?;
                return Ok(true);
            }
            return Ok(false);
        }

        let shortcut = self.config.keybindings.resolve(
            key,
            mods,
            self.config.platform,
            self.config.nudge_step,
            NUDGE_FAST_MULTIPLIER,
        );
        let Some(shortcut) = shortcut else {
            return Ok(false);
        };
        log::trace!("Key {:?} -> {:?}", key, shortcut);

        match shortcut {
            Shortcut::Undo => self.undo().map(|_| true),
            Shortcut::Redo => self.redo().map(|_| true),
            Shortcut::DeleteSelection => self.delete_selected(),
            Shortcut::Cancel => {
                if self.gesture.is_pointer_gesture() {
                    self.cancel_pointer_gesture();
                } else {
                    self.model.select(None);
                }
                Ok(true)
            }
            Shortcut::SelectTool(tool) => self.set_tool(tool).map(|_| true),
            Shortcut::Nudge { dx, dy } => self.nudge(dx, dy),
        }
    }

    // ------------------------------------------------------------------
    // Selection and text
    // ------------------------------------------------------------------

    /// Select an annotation, or clear the selection with `None`.
    pub fn select(&mut self, id: Option<AnnotationId>) {
        self.model.select(id);
    }

    /// Re-open an existing text box for typing.
    pub fn open_text_editor(&mut self, id: AnnotationId) -> Result<()> {
        self.ensure_not_busy("text edit")?;
        self.require_image()?;
        if matches!(self.gesture, Gesture::EditingText { id: open, .. } if open == id) {
            return Ok(());
        }
        let original_text = self
            .model
            .text_box(id)
            .map(|t| t.text.clone())
            .ok_or(EditorError::UnknownAnnotation(id))?;

        if matches!(self.gesture, Gesture::EditingText { .. }) {
            self.finish_text_editing()?;
        }
        self.cancel_pointer_gesture();
        self.model.select(Some(id));
        self.gesture = Gesture::EditingText {
            id,
            is_new: false,
            original_text,
        };
        log::debug!("Gesture -> editing-text on {}", id);
        Ok(())
    }

    /// Live text update from the host editor. Does not touch history.
    pub fn update_text(&mut self, text: &str) -> Result<()> {
        let Gesture::EditingText { id, .. } = self.gesture else {
            return Ok(());
        };
        let tb = self
            .model
            .text_box_mut(id)
            .ok_or(EditorError::UnknownAnnotation(id))?;
        tb.text = text.to_string();
        Ok(())
    }

    /// Close the open text box with its final text.
    ///
    /// Empty text deletes the box. A box that was just drawn and never held
    /// text disappears without a history entry.
    pub fn commit_text(&mut self, text: &str) -> Result<()> {
        let Gesture::EditingText {
            id,
            is_new,
            original_text,
        } = std::mem::take(&mut self.gesture)
        else {
            return Ok(());
        };

        if text.trim().is_empty() {
            self.model.remove(id);
            if is_new {
                log::debug!("Discarding new text box {} without text", id);
            } else {
                log::debug!("Text box {} emptied, removing it", id);
                self.commit_history();
            }
            return Ok(());
        }

        let tb = self
            .model
            .text_box_mut(id)
            .ok_or(EditorError::UnknownAnnotation(id))?;
        tb.text = text.to_string();
        if is_new || text != original_text {
            self.commit_history();
        }
        Ok(())
    }

    /// Commit whatever text the open box currently holds.
    pub(super) fn finish_text_editing(&mut self) -> Result<()> {
        let Gesture::EditingText { id, .. } = self.gesture else {
            return Ok(());
        };
        let text = self.model.text_box(id).map(|t| t.text.clone()).unwrap_or_default();
        self.commit_text(&text)
    }

    // ------------------------------------------------------------------
    // Annotation edits
    // ------------------------------------------------------------------

    /// Remove the selected annotation. Returns false without a selection.
    ///
    /// Deleting a text box that was just drawn and is still being typed into
    /// discards it without a history entry.
    pub fn delete_selected(&mut self) -> Result<bool> {
        self.ensure_not_busy("delete")?;
        if let Some(selected) = self.model.selected()
            && let Gesture::EditingText { id, is_new: true, .. } = self.gesture
            && id == selected
        {
            self.gesture = Gesture::Idle;
            self.model.remove(id);
            log::debug!("Discarding new text box {} on delete", id);
            return Ok(true);
        }
        self.settle_gesture()?;
        let Some(id) = self.model.selected() else {
            return Ok(false);
        };
        if self.model.remove(id).is_none() {
            return Ok(false);
        }
        log::debug!("Deleted annotation {}", id);
        self.commit_history();
        Ok(true)
    }

    /// Move the selected annotation by a stage pixel delta.
    pub fn nudge(&mut self, dx: f32, dy: f32) -> Result<bool> {
        self.ensure_not_busy("nudge")?;
        if self.gesture.is_pointer_gesture() {
            return Ok(false);
        }
        let Some(id) = self.model.selected() else {
            return Ok(false);
        };
        let (Some(original), Some((stage_w, stage_h))) = (self.stage_rect(id), self.stage_size()) else {
            return Ok(false);
        };
        let moved = translate_rect(&original, dx, dy, stage_w, stage_h);
        if moved == original {
            return Ok(false);
        }
        self.apply_stage_rect(id, &moved);
        self.commit_history();
        Ok(true)
    }

    /// Rename the reveal group of a mask.
    pub fn set_group_key(&mut self, id: AnnotationId, key: &str) -> Result<()> {
        self.ensure_not_busy("group change")?;
        let mask = self.model.mask_mut(id).ok_or(EditorError::UnknownAnnotation(id))?;
        if mask.group_key == key {
            return Ok(());
        }
        mask.group_key = key.to_string();
        self.commit_history();
        Ok(())
    }

    /// Switch a mask between rectangle and ellipse.
    pub fn set_mask_shape(&mut self, id: AnnotationId, shape: MaskShape) -> Result<()> {
        self.ensure_not_busy("shape change")?;
        let mask = self.model.mask_mut(id).ok_or(EditorError::UnknownAnnotation(id))?;
        if mask.shape == shape {
            return Ok(());
        }
        mask.shape = shape;
        self.commit_history();
        Ok(())
    }

    /// Restyle a text box. Out-of-range values are clamped first.
    pub fn set_text_style(&mut self, id: AnnotationId, style: TextStyle) -> Result<()> {
        self.ensure_not_busy("style change")?;
        let style = style.sanitized();
        let tb = self
            .model
            .text_box_mut(id)
            .ok_or(EditorError::UnknownAnnotation(id))?;
        if tb.style == style {
            return Ok(());
        }
        tb.style = style;
        self.commit_history();
        Ok(())
    }

    /// Remove every mask and text box.
    pub fn clear_annotations(&mut self) -> Result<()> {
        self.ensure_not_busy("clear")?;
        self.cancel_pointer_gesture();
        self.gesture = Gesture::Idle;
        if self.model.is_empty() {
            return Ok(());
        }
        log::debug!("Clearing {} annotations", self.model.len());
        self.model.clear();
        self.commit_history();
        Ok(())
    }

    // ------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------

    /// Step back one entry. Returns false when there is nothing to undo.
    ///
    /// If the entry holds a different image the restore completes on the
    /// next [`finish_decode`](Self::finish_decode).
    pub fn undo(&mut self) -> Result<bool> {
        self.ensure_not_busy("undo")?;
        self.settle_gesture()?;
        let Some(snapshot) = self.history.peek_undo().cloned() else {
            return Ok(false);
        };
        self.restore(snapshot, HistoryStep::Undo);
        Ok(true)
    }

    /// Step forward one entry. Returns false when there is nothing to redo.
    pub fn redo(&mut self) -> Result<bool> {
        self.ensure_not_busy("redo")?;
        self.settle_gesture()?;
        let Some(snapshot) = self.history.peek_redo().cloned() else {
            return Ok(false);
        };
        self.restore(snapshot, HistoryStep::Redo);
        Ok(true)
    }

    /// End any gesture before the model is replaced underneath it.
    fn settle_gesture(&mut self) -> Result<()> {
        if matches!(self.gesture, Gesture::EditingText { .. }) {
            self.finish_text_editing()
        } else {
            self.cancel_pointer_gesture();
            Ok(())
        }
    }

    // ------------------------------------------------------------------
    // Transforms
    // ------------------------------------------------------------------

    /// Rotate the image and every annotation a quarter turn.
    ///
    /// Completes on the next [`finish_decode`](Self::finish_decode), which
    /// also commits history.
    pub fn rotate(&mut self, direction: RotateDirection) -> Result<()> {
        self.ensure_not_busy("rotate")?;
        self.require_image()?;
        self.settle_gesture()?;

        let image = self.require_image()?;
        let rotated = rotate_pixels(image.pixels(), direction);
        let encoded = EncodedImage::new(encode_png(&rotated)?, PNG_MIME);
        let (masks, text_boxes) = rotate_annotations(self.model.masks(), self.model.text_boxes(), direction);
        log::info!(
            "Rotating {:?}: {}x{} -> {}x{}",
            direction,
            image.width(),
            image.height(),
            rotated.width(),
            rotated.height()
        );
        self.pending = Some(PendingDecode {
            encoded,
            then: AfterDecode::Transform { masks, text_boxes },
        });
        Ok(())
    }

    /// Crop the image to a stage-pixel rectangle.
    ///
    /// The rect is clamped to the image. Returns false, changing nothing,
    /// when what is left is below the minimum crop size or covers the whole
    /// image. Otherwise completes on the next
    /// [`finish_decode`](Self::finish_decode).
    pub fn crop_to_rect(&mut self, rect: Rect) -> Result<bool> {
        self.ensure_not_busy("crop")?;
        let image = self.require_image()?;
        let (image_w, image_h) = (image.width(), image.height());

        let clamped = rect.clamp_to(image_w as f32, image_h as f32);
        if !clamped.meets_min_size(self.config.min_crop_size) {
            log::debug!("Ignoring {:.0}x{:.0} crop below minimum size", clamped.width, clamped.height);
            return Ok(false);
        }
        let Some(region) = pixel_crop_region(&clamped, image_w, image_h) else {
            return Ok(false);
        };
        if region == (0, 0, image_w, image_h) {
            log::debug!("Crop covers the whole image, nothing to do");
            return Ok(false);
        }

        self.settle_gesture()?;
        let image = self.require_image()?;
        let cropped = crop_pixels(image.pixels(), region);
        let encoded = EncodedImage::new(encode_png(&cropped)?, PNG_MIME);
        let (masks, text_boxes) = crop_annotations(
            self.model.masks(),
            self.model.text_boxes(),
            image_w as f32,
            image_h as f32,
            region,
        );
        log::info!(
            "Cropping {}x{} to {:?}, keeping {} of {} annotations",
            image_w,
            image_h,
            region,
            masks.len() + text_boxes.len(),
            self.model.len()
        );
        self.pending = Some(PendingDecode {
            encoded,
            then: AfterDecode::Transform { masks, text_boxes },
        });
        Ok(true)
    }
}
