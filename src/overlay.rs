//! Overlay projection: annotations to viewport-space drawables.
//!
//! `project` is a pure function of its input, so the host can call it on
//! every frame. It only hands out ids; the session resolves them against the
//! live model on each pointer event.

use crate::interaction::{Gesture, Handle, Tool};
use crate::model::{AnnotationId, AnnotationModel, MaskShape, Point, Rect, TextStyle};
use crate::viewport::Viewport;

/// Everything the projection reads.
#[derive(Debug, Clone, Copy)]
pub struct OverlayInput<'a> {
    pub model: &'a AnnotationModel,
    pub viewport: &'a Viewport,
    pub tool: Tool,
    pub gesture: &'a Gesture,
    pub loading: bool,
    /// Handle hit radius in viewport pixels
    pub handle_radius: f32,
}

/// Drawable content of an item.
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayContent {
    Mask { shape: MaskShape, group_key: String },
    Text { text: String, style: TextStyle, editing: bool },
}

/// One annotation projected into viewport space.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayItem {
    pub id: AnnotationId,
    pub rect: Rect,
    pub content: OverlayContent,
    pub selected: bool,
    /// Resize handle centers (selected item only)
    pub handles: Vec<(Handle, Point)>,
}

/// What a rubber-band preview will become on release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftKind {
    Mask(MaskShape),
    Text,
    Crop,
}

/// In-progress draw or crop rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Draft {
    pub kind: DraftKind,
    pub rect: Rect,
}

/// Result of hit-testing the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayHit {
    Handle { id: AnnotationId, handle: Handle },
    Body { id: AnnotationId },
}

impl OverlayHit {
    pub fn id(&self) -> AnnotationId {
        match self {
            OverlayHit::Handle { id, .. } | OverlayHit::Body { id } => *id,
        }
    }
}

/// The visible overlay for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    /// Render order: masks, then text boxes
    pub items: Vec<OverlayItem>,
    pub draft: Option<Draft>,
    pub tool: Tool,
    pub loading: bool,
    handle_radius: f32,
}

impl Overlay {
    /// Topmost item under a viewport point.
    ///
    /// Handles of the selected item take priority over any body.
    pub fn hit_test(&self, point: Point) -> Option<OverlayHit> {
        if let Some(selected) = self.items.iter().find(|i| i.selected)
            && let Some(handle) = Handle::hit_test(&selected.rect, &point, self.handle_radius)
        {
            return Some(OverlayHit::Handle {
                id: selected.id,
                handle,
            });
        }
        self.items
            .iter()
            .rev()
            .find(|i| i.rect.contains(&point))
            .map(|i| OverlayHit::Body { id: i.id })
    }

    pub fn item(&self, id: AnnotationId) -> Option<&OverlayItem> {
        self.items.iter().find(|i| i.id == id)
    }
}

/// Project the current state into an overlay.
pub fn project(input: &OverlayInput<'_>) -> Overlay {
    let (stage_w, stage_h) = input.viewport.stage_size();
    let selected = input.model.selected();
    let editing = match input.gesture {
        Gesture::EditingText { id, .. } => Some(*id),
        _ => None,
    };

    let mut items = Vec::with_capacity(input.model.len());
    let mut push = |id: AnnotationId, stage: Rect, content: OverlayContent| {
        let rect = input.viewport.rect_to_viewport(&stage);
        let is_selected = selected == Some(id);
        let handles = if is_selected {
            Handle::ALL.iter().map(|h| (*h, h.position(&rect))).collect()
        } else {
            Vec::new()
        };
        items.push(OverlayItem {
            id,
            rect,
            content,
            selected: is_selected,
            handles,
        });
    };

    for mask in input.model.masks() {
        push(
            mask.id,
            mask.rect.to_stage(stage_w, stage_h),
            OverlayContent::Mask {
                shape: mask.shape,
                group_key: mask.group_key.clone(),
            },
        );
    }
    for tb in input.model.text_boxes() {
        push(
            tb.id,
            tb.rect.to_stage(stage_w, stage_h),
            OverlayContent::Text {
                text: tb.text.clone(),
                style: tb.style,
                editing: editing == Some(tb.id),
            },
        );
    }

    let draft = input.gesture.draft_rect().map(|stage| {
        let kind = match input.gesture {
            Gesture::DrawingMask { shape, .. } => DraftKind::Mask(*shape),
            Gesture::DrawingText { .. } => DraftKind::Text,
            _ => DraftKind::Crop,
        };
        Draft {
            kind,
            rect: input.viewport.rect_to_viewport(&stage),
        }
    });

    Overlay {
        items,
        draft,
        tool: input.tool,
        loading: input.loading,
        handle_radius: input.handle_radius,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NormRect;

    fn setup() -> (AnnotationModel, Viewport) {
        let mut model = AnnotationModel::new();
        let a = model.add_mask(NormRect::new(0.125, 0.1666667, 0.25, 0.3333333), MaskShape::Rect);
        model.add_text_box(NormRect::new(0.5, 0.5, 0.25, 0.25), TextStyle::default());
        model.select(Some(a));

        let mut viewport = Viewport::new(0.1, 8.0, 1.2);
        viewport.set_stage_size(400.0, 300.0);
        viewport.set_viewport_size(800.0, 600.0);
        viewport.zoom(2.0, Point::default());
        (model, viewport)
    }

    fn input<'a>(model: &'a AnnotationModel, viewport: &'a Viewport, gesture: &'a Gesture) -> OverlayInput<'a> {
        OverlayInput {
            model,
            viewport,
            tool: Tool::MaskRect,
            gesture,
            loading: false,
            handle_radius: 8.0,
        }
    }

    #[test]
    fn test_projection_positions() {
        let (model, viewport) = setup();
        let overlay = project(&input(&model, &viewport, &Gesture::Idle));

        assert_eq!(overlay.items.len(), 2);
        let mask = &overlay.items[0];
        assert!(mask.selected);
        assert_eq!(mask.handles.len(), 8);
        assert!((mask.rect.x - 100.0).abs() < 0.01);
        assert!((mask.rect.width - 200.0).abs() < 0.01);

        let text = &overlay.items[1];
        assert!(!text.selected);
        assert!(text.handles.is_empty());
    }

    #[test]
    fn test_projection_is_idempotent() {
        let (model, viewport) = setup();
        let gesture = Gesture::Idle;
        let first = project(&input(&model, &viewport, &gesture));
        let second = project(&input(&model, &viewport, &gesture));
        assert_eq!(first, second);
    }

    #[test]
    fn test_hit_test_handles_before_bodies() {
        let (model, viewport) = setup();
        let overlay = project(&input(&model, &viewport, &Gesture::Idle));
        let mask = &overlay.items[0];

        let corner = Handle::BottomRight.position(&mask.rect);
        assert_eq!(
            overlay.hit_test(corner),
            Some(OverlayHit::Handle {
                id: mask.id,
                handle: Handle::BottomRight
            })
        );
        assert_eq!(overlay.hit_test(mask.rect.center()), Some(OverlayHit::Body { id: mask.id }));
        assert_eq!(overlay.hit_test(Point::new(790.0, 10.0)), None);
    }

    #[test]
    fn test_draft_projection() {
        let (model, viewport) = setup();
        let gesture = Gesture::DrawingMask {
            shape: MaskShape::Ellipse,
            start: Point::new(10.0, 10.0),
            current: Point::new(20.0, 30.0),
        };
        let overlay = project(&input(&model, &viewport, &gesture));
        let draft = overlay.draft.expect("draft");
        assert_eq!(draft.kind, DraftKind::Mask(MaskShape::Ellipse));
        assert_eq!(draft.rect, Rect::new(20.0, 20.0, 20.0, 40.0));
    }

    #[test]
    fn test_editing_flag() {
        let (model, viewport) = setup();
        let text_id = model.text_boxes()[0].id;
        let gesture = Gesture::EditingText {
            id: text_id,
            is_new: false,
            original_text: String::new(),
        };
        let overlay = project(&input(&model, &viewport, &gesture));
        match &overlay.item(text_id).unwrap().content {
            OverlayContent::Text { editing, .. } => assert!(editing),
            other => panic!("expected text, got {other:?}"),
        }
    }
}
