//! Pointer, wheel and tool handling.

use super::EditorSession;
use crate::error::Result;
use crate::interaction::{Gesture, PointerEvent, PointerEventKind, Tool, resize_rect, translate_rect};
use crate::model::{AnnotationId, AnnotationKind, NormRect, Point, Rect};
use crate::overlay::OverlayHit;

impl EditorSession {
    /// Feed one pointer event in viewport coordinates.
    ///
    /// Ignored while no image is loaded or a decode is pending.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Result<()> {
        if self.image.is_none() || self.is_loading() {
            log::trace!("Ignoring {:?} while no image is ready", event.kind);
            return Ok(());
        }
        let view = Point::new(event.x, event.y);
        let stage = self.viewport.to_stage(event.x, event.y);

        match event.kind {
            PointerEventKind::Down => self.pointer_down(view, stage),
            PointerEventKind::Move => {
                self.pointer_move(view, stage);
                Ok(())
            }
            PointerEventKind::Up => self.pointer_up(stage),
            PointerEventKind::Leave => {
                self.cancel_pointer_gesture();
                Ok(())
            }
            PointerEventKind::DoubleClick => self.double_click(view),
        }
    }

    fn pointer_down(&mut self, view: Point, stage: Point) -> Result<()> {
        if matches!(self.gesture, Gesture::EditingText { .. }) {
            self.finish_text_editing()?;
        }
        // A down without the matching up; drop whatever was in flight
        self.cancel_pointer_gesture();

        if self.tool == Tool::Pan {
            self.gesture = Gesture::Panning { last: view };
            log::trace!("Gesture -> {}", self.gesture.name());
            return Ok(());
        }

        if self.tool.grabs_annotations()
            && let Some(hit) = self.overlay().hit_test(view)
            && let Some(original) = self.stage_rect(hit.id())
        {
            self.model.select(Some(hit.id()));
            self.gesture = match hit {
                OverlayHit::Handle { id, handle } => Gesture::ResizingAnnotation {
                    id,
                    handle,
                    origin: stage,
                    original,
                },
                OverlayHit::Body { id } => Gesture::DraggingAnnotation {
                    id,
                    origin: stage,
                    original,
                },
            };
            log::debug!("Gesture -> {} on {}", self.gesture.name(), hit.id());
            return Ok(());
        }

        self.model.select(None);
        self.gesture = match self.tool {
            Tool::MaskRect | Tool::MaskEllipse => Gesture::DrawingMask {
                shape: self.tool.mask_shape().unwrap_or_default(),
                start: stage,
                current: stage,
            },
            Tool::Text => Gesture::DrawingText {
                start: stage,
                current: stage,
            },
            Tool::Crop => Gesture::Cropping {
                start: stage,
                current: stage,
            },
            Tool::Pan => Gesture::Idle,
        };
        log::trace!("Gesture -> {}", self.gesture.name());
        Ok(())
    }

    fn pointer_move(&mut self, view: Point, stage: Point) {
        let Some((stage_w, stage_h)) = self.stage_size() else {
            return;
        };
        match &mut self.gesture {
            Gesture::DrawingMask { current, .. }
            | Gesture::DrawingText { current, .. }
            | Gesture::Cropping { current, .. } => *current = stage,
            Gesture::Panning { last } => {
                let (dx, dy) = (view.x - last.x, view.y - last.y);
                *last = view;
                self.viewport.pan(dx, dy);
            }
            Gesture::DraggingAnnotation { id, origin, original } => {
                let moved = translate_rect(original, stage.x - origin.x, stage.y - origin.y, stage_w, stage_h);
                let id = *id;
                self.apply_stage_rect(id, &moved);
            }
            Gesture::ResizingAnnotation {
                id,
                handle,
                origin,
                original,
            } => {
                let id = *id;
                let min_size = match self.model.kind_of(id) {
                    Some(AnnotationKind::TextBox) => self.config.min_text_size,
                    _ => self.config.min_mask_size,
                };
                let resized = resize_rect(
                    original,
                    *handle,
                    stage.x - origin.x,
                    stage.y - origin.y,
                    min_size,
                    stage_w,
                    stage_h,
                );
                self.apply_stage_rect(id, &resized);
            }
            Gesture::Idle | Gesture::EditingText { .. } => {}
        }
    }

    fn pointer_up(&mut self, stage: Point) -> Result<()> {
        let Some((stage_w, stage_h)) = self.stage_size() else {
            return Ok(());
        };
        match std::mem::take(&mut self.gesture) {
            Gesture::DrawingMask { shape, start, .. } => {
                let rect = Rect::from_corners(start, stage);
                if !rect.meets_min_size(self.config.min_mask_size) {
                    log::debug!("Discarding {:.0}x{:.0} mask below minimum size", rect.width, rect.height);
                    return Ok(());
                }
                let id = self.model.add_mask(NormRect::from_stage(&rect, stage_w, stage_h), shape);
                self.model.select(Some(id));
                self.commit_history();
            }
            Gesture::DrawingText { start, .. } => {
                let rect = Rect::from_corners(start, stage);
                if !rect.meets_min_size(self.config.min_text_size) {
                    log::debug!("Discarding {:.0}x{:.0} text box below minimum size", rect.width, rect.height);
                    return Ok(());
                }
                let id = self
                    .model
                    .add_text_box(NormRect::from_stage(&rect, stage_w, stage_h), self.config.text_style);
                self.model.select(Some(id));
                self.gesture = Gesture::EditingText {
                    id,
                    is_new: true,
                    original_text: String::new(),
                };
                log::debug!("Gesture -> {} on {}", self.gesture.name(), id);
            }
            Gesture::Cropping { start, .. } => {
                self.crop_to_rect(Rect::from_corners(start, stage))?;
            }
            Gesture::DraggingAnnotation { id, original, .. }
            | Gesture::ResizingAnnotation { id, original, .. } => {
                let before = NormRect::from_stage(&original, stage_w, stage_h);
                match self.model.rect(id) {
                    Some(after) if !after.approx_eq(&before) => self.commit_history(),
                    _ => log::trace!("Annotation {} unchanged, nothing to commit", id),
                }
            }
            editing @ Gesture::EditingText { .. } => self.gesture = editing,
            Gesture::Idle | Gesture::Panning { .. } => {}
        }
        Ok(())
    }

    fn double_click(&mut self, view: Point) -> Result<()> {
        let hit = self.overlay().hit_test(view).map(|hit| hit.id());
        match hit {
            Some(id) if self.model.kind_of(id) == Some(AnnotationKind::TextBox) => self.open_text_editor(id),
            _ => Ok(()),
        }
    }

    /// Zoom around the pointer; negative deltas zoom in.
    pub fn wheel(&mut self, delta: f32, anchor: Point) {
        if self.image.is_none() || !delta.is_finite() || delta == 0.0 {
            return;
        }
        if delta < 0.0 {
            self.viewport.zoom_in(anchor);
        } else {
            self.viewport.zoom_out(anchor);
        }
    }

    /// Switch tools, cancelling a pointer gesture or committing open text.
    pub fn set_tool(&mut self, tool: Tool) -> Result<()> {
        if matches!(self.gesture, Gesture::EditingText { .. }) {
            self.finish_text_editing()?;
        } else {
            self.cancel_pointer_gesture();
        }
        if self.tool != tool {
            log::debug!("Tool: {} -> {}", self.tool.name(), tool.name());
            self.tool = tool;
        }
        Ok(())
    }

    /// Abort the pointer gesture, restoring a dragged or resized annotation.
    pub(super) fn cancel_pointer_gesture(&mut self) {
        if !self.gesture.is_pointer_gesture() {
            return;
        }
        match std::mem::take(&mut self.gesture) {
            Gesture::DraggingAnnotation { id, original, .. }
            | Gesture::ResizingAnnotation { id, original, .. } => {
                self.apply_stage_rect(id, &original);
                log::debug!("Gesture cancelled, annotation {} restored", id);
            }
            other => log::trace!("Gesture {} cancelled", other.name()),
        }
    }

    /// Stage-pixel rect of an annotation.
    pub(super) fn stage_rect(&self, id: AnnotationId) -> Option<Rect> {
        let (stage_w, stage_h) = self.stage_size()?;
        self.model.rect(id).map(|r| r.to_stage(stage_w, stage_h))
    }

    /// Write a stage-pixel rect back to an annotation.
    pub(super) fn apply_stage_rect(&mut self, id: AnnotationId, rect: &Rect) -> bool {
        let Some((stage_w, stage_h)) = self.stage_size() else {
            return false;
        };
        self.model.set_rect(id, NormRect::from_stage(rect, stage_w, stage_h))
    }
}
