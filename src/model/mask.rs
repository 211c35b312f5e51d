//! Occlusion masks.

use serde::{Deserialize, Serialize};

use super::{AnnotationId, NormRect};

/// Outline of a mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaskShape {
    #[default]
    Rect,
    Ellipse,
}

impl MaskShape {
    /// Get the display name for this shape.
    pub fn name(&self) -> &'static str {
        match self {
            MaskShape::Rect => "Rectangle",
            MaskShape::Ellipse => "Ellipse",
        }
    }
}

/// A region of the image hidden until revealed.
///
/// Masks sharing a `group_key` are revealed together by the study side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mask {
    pub id: AnnotationId,
    pub rect: NormRect,
    pub group_key: String,
    pub shape: MaskShape,
}

impl Mask {
    pub fn new(id: AnnotationId, rect: NormRect, group_key: impl Into<String>, shape: MaskShape) -> Self {
        Self {
            id,
            rect: rect.clamped(),
            group_key: group_key.into(),
            shape,
        }
    }

    /// Numeric value of the group key, if it is an integer label.
    pub fn group_number(&self) -> Option<u64> {
        self.group_key.trim().parse().ok()
    }
}
