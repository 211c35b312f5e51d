//! In-memory annotation storage for the open image.

use super::{AnnotationId, Mask, MaskShape, NormRect, TextBox, TextStyle};

/// Which list an annotation lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationKind {
    Mask,
    TextBox,
}

/// Masks and text boxes of the current image.
///
/// Ids are unique across both lists. Masks come before text boxes in
/// hit-testing and render order; within a list later entries are on top.
#[derive(Debug, Clone, Default)]
pub struct AnnotationModel {
    masks: Vec<Mask>,
    text_boxes: Vec<TextBox>,
    /// Counter for generating unique annotation IDs.
    next_id: AnnotationId,
    /// Currently selected annotation ID.
    selected_id: Option<AnnotationId>,
}

impl AnnotationModel {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Default::default()
        }
    }

    pub fn masks(&self) -> &[Mask] {
        &self.masks
    }

    pub fn text_boxes(&self) -> &[TextBox] {
        &self.text_boxes
    }

    /// Total number of masks and text boxes.
    pub fn len(&self) -> usize {
        self.masks.len() + self.text_boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masks.is_empty() && self.text_boxes.is_empty()
    }

    fn allocate_id(&mut self) -> AnnotationId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Group key for the next new mask: one past the largest numeric key.
    pub fn next_group_key(&self) -> String {
        let max = self.masks.iter().filter_map(Mask::group_number).max().unwrap_or(0);
        (max + 1).to_string()
    }

    /// Add a mask with an auto-assigned group key and return its ID.
    pub fn add_mask(&mut self, rect: NormRect, shape: MaskShape) -> AnnotationId {
        let id = self.allocate_id();
        let group_key = self.next_group_key();
        log::debug!("Added mask {} (group {}, {:?})", id, group_key, shape);
        self.masks.push(Mask::new(id, rect, group_key, shape));
        id
    }

    /// Add an empty text box and return its ID.
    pub fn add_text_box(&mut self, rect: NormRect, style: TextStyle) -> AnnotationId {
        let id = self.allocate_id();
        log::debug!("Added text box {}", id);
        self.text_boxes.push(TextBox::new(id, rect, style));
        id
    }

    /// Find which list holds an id.
    pub fn kind_of(&self, id: AnnotationId) -> Option<AnnotationKind> {
        if self.masks.iter().any(|m| m.id == id) {
            Some(AnnotationKind::Mask)
        } else if self.text_boxes.iter().any(|t| t.id == id) {
            Some(AnnotationKind::TextBox)
        } else {
            None
        }
    }

    pub fn mask(&self, id: AnnotationId) -> Option<&Mask> {
        self.masks.iter().find(|m| m.id == id)
    }

    pub fn mask_mut(&mut self, id: AnnotationId) -> Option<&mut Mask> {
        self.masks.iter_mut().find(|m| m.id == id)
    }

    pub fn text_box(&self, id: AnnotationId) -> Option<&TextBox> {
        self.text_boxes.iter().find(|t| t.id == id)
    }

    pub fn text_box_mut(&mut self, id: AnnotationId) -> Option<&mut TextBox> {
        self.text_boxes.iter_mut().find(|t| t.id == id)
    }

    /// Current rectangle of any annotation.
    pub fn rect(&self, id: AnnotationId) -> Option<NormRect> {
        self.mask(id)
            .map(|m| m.rect)
            .or_else(|| self.text_box(id).map(|t| t.rect))
    }

    /// Replace the rectangle of any annotation, clamping it.
    ///
    /// Returns false if the id is unknown.
    pub fn set_rect(&mut self, id: AnnotationId, rect: NormRect) -> bool {
        let rect = rect.clamped();
        if let Some(mask) = self.mask_mut(id) {
            mask.rect = rect;
            return true;
        }
        if let Some(tb) = self.text_box_mut(id) {
            tb.rect = rect;
            return true;
        }
        false
    }

    /// Remove an annotation by ID. Returns the kind that was removed.
    pub fn remove(&mut self, id: AnnotationId) -> Option<AnnotationKind> {
        let removed = if let Some(pos) = self.masks.iter().position(|m| m.id == id) {
            self.masks.remove(pos);
            Some(AnnotationKind::Mask)
        } else if let Some(pos) = self.text_boxes.iter().position(|t| t.id == id) {
            self.text_boxes.remove(pos);
            Some(AnnotationKind::TextBox)
        } else {
            None
        };
        if self.selected_id == Some(id) {
            self.selected_id = None;
        }
        removed
    }

    /// Clear all annotations.
    pub fn clear(&mut self) {
        self.masks.clear();
        self.text_boxes.clear();
        self.selected_id = None;
    }

    /// Replace both lists wholesale (history restore, transforms).
    ///
    /// The id counter never moves backwards so restored and new ids cannot
    /// collide. A selection that no longer exists is dropped.
    pub fn replace(&mut self, masks: Vec<Mask>, text_boxes: Vec<TextBox>) {
        let max_id = masks
            .iter()
            .map(|m| m.id)
            .chain(text_boxes.iter().map(|t| t.id))
            .max()
            .unwrap_or(0);
        self.next_id = self.next_id.max(max_id + 1);
        self.masks = masks;
        self.text_boxes = text_boxes;
        if let Some(id) = self.selected_id
            && self.kind_of(id).is_none()
        {
            self.selected_id = None;
        }
    }

    /// Select an annotation, or clear the selection with `None`.
    pub fn select(&mut self, id: Option<AnnotationId>) {
        self.selected_id = id.filter(|id| self.kind_of(*id).is_some());
    }

    /// Get the selected annotation ID.
    pub fn selected(&self) -> Option<AnnotationId> {
        self.selected_id
    }
}
