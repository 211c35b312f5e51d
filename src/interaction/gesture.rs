//! Tools and the pointer gesture state.

use serde::{Deserialize, Serialize};

use super::Handle;
use crate::model::{AnnotationId, MaskShape, Point, Rect};

/// Tools available in the editor toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tool {
    /// Draw rectangular masks
    #[default]
    MaskRect,
    /// Draw elliptical masks
    MaskEllipse,
    /// Pan the view
    Pan,
    /// Draw text boxes
    Text,
    /// Crop the image
    Crop,
}

impl Tool {
    /// Get the display name for this tool.
    pub fn name(&self) -> &'static str {
        match self {
            Tool::MaskRect => "Rectangle",
            Tool::MaskEllipse => "Ellipse",
            Tool::Pan => "Pan",
            Tool::Text => "Text",
            Tool::Crop => "Crop",
        }
    }

    /// Get all available tools.
    pub fn all() -> &'static [Tool] {
        &[Tool::MaskRect, Tool::MaskEllipse, Tool::Pan, Tool::Text, Tool::Crop]
    }

    /// Mask shape drawn by this tool, if it is a mask tool.
    pub fn mask_shape(&self) -> Option<MaskShape> {
        match self {
            Tool::MaskRect => Some(MaskShape::Rect),
            Tool::MaskEllipse => Some(MaskShape::Ellipse),
            _ => None,
        }
    }

    /// Whether pointer-down on an existing annotation grabs it.
    pub fn grabs_annotations(&self) -> bool {
        matches!(self, Tool::MaskRect | Tool::MaskEllipse | Tool::Text)
    }
}

/// What the pointer is currently doing.
///
/// Points are in stage space except for `Panning`, which tracks the last
/// viewport position since panning moves the stage itself.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    DrawingMask {
        shape: MaskShape,
        start: Point,
        current: Point,
    },
    Panning {
        last: Point,
    },
    DrawingText {
        start: Point,
        current: Point,
    },
    Cropping {
        start: Point,
        current: Point,
    },
    DraggingAnnotation {
        id: AnnotationId,
        origin: Point,
        /// Stage rect at pointer-down, restored on abort
        original: Rect,
    },
    ResizingAnnotation {
        id: AnnotationId,
        handle: Handle,
        origin: Point,
        original: Rect,
    },
    /// Text box open for typing; pointer gestures are not in progress.
    EditingText {
        id: AnnotationId,
        /// Created by the draw gesture that opened the editor
        is_new: bool,
        original_text: String,
    },
}

impl Gesture {
    /// Get a short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Gesture::Idle => "idle",
            Gesture::DrawingMask { .. } => "drawing-mask",
            Gesture::Panning { .. } => "panning",
            Gesture::DrawingText { .. } => "drawing-text",
            Gesture::Cropping { .. } => "cropping",
            Gesture::DraggingAnnotation { .. } => "dragging-annotation",
            Gesture::ResizingAnnotation { .. } => "resizing-annotation",
            Gesture::EditingText { .. } => "editing-text",
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Gesture::Idle)
    }

    /// Whether a pointer button is held in this state.
    pub fn is_pointer_gesture(&self) -> bool {
        !matches!(self, Gesture::Idle | Gesture::EditingText { .. })
    }

    /// Rubber-band rectangle of a draw or crop gesture in stage space.
    pub fn draft_rect(&self) -> Option<Rect> {
        match self {
            Gesture::DrawingMask { start, current, .. }
            | Gesture::DrawingText { start, current }
            | Gesture::Cropping { start, current } => Some(Rect::from_corners(*start, *current)),
            _ => None,
        }
    }

    /// Annotation being edited in this state, if any.
    pub fn target(&self) -> Option<AnnotationId> {
        match self {
            Gesture::DraggingAnnotation { id, .. }
            | Gesture::ResizingAnnotation { id, .. }
            | Gesture::EditingText { id, .. } => Some(*id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_mask_shape() {
        assert_eq!(Tool::MaskRect.mask_shape(), Some(MaskShape::Rect));
        assert_eq!(Tool::MaskEllipse.mask_shape(), Some(MaskShape::Ellipse));
        assert_eq!(Tool::Crop.mask_shape(), None);
        assert!(!Tool::Pan.grabs_annotations());
        assert!(!Tool::Crop.grabs_annotations());
    }

    #[test]
    fn test_draft_rect() {
        let g = Gesture::Cropping {
            start: Point::new(50.0, 40.0),
            current: Point::new(10.0, 80.0),
        };
        assert_eq!(g.draft_rect(), Some(Rect::new(10.0, 40.0, 40.0, 40.0)));
        assert_eq!(Gesture::Idle.draft_rect(), None);
    }

    #[test]
    fn test_pointer_gesture_flags() {
        assert!(!Gesture::Idle.is_pointer_gesture());
        let editing = Gesture::EditingText {
            id: 1,
            is_new: true,
            original_text: String::new(),
        };
        assert!(!editing.is_pointer_gesture());
        assert_eq!(editing.target(), Some(1));
        assert!(Gesture::Panning { last: Point::default() }.is_pointer_gesture());
    }

    #[test]
    fn test_tool_serde_names() {
        let json = serde_json::to_string(&Tool::MaskEllipse).unwrap();
        assert_eq!(json, "\"mask-ellipse\"");
    }
}
