//! Text labels that get burned into the image on save.

use serde::{Deserialize, Serialize};

use super::{AnnotationId, NormRect};
use crate::constants::text;

/// Visual style of a text box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Font size in stage pixels
    pub font_size: f32,
    /// Text color (RGBA)
    pub color: [u8; 4],
    /// Background fill color, `None` for transparent
    pub background_color: Option<[u8; 3]>,
    /// Background opacity in `0.0..=1.0`
    pub background_opacity: f32,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: text::FONT_SIZE,
            color: text::COLOR,
            background_color: Some(text::BACKGROUND),
            background_opacity: text::BACKGROUND_OPACITY,
        }
    }
}

impl TextStyle {
    /// Return a copy with out-of-range values pulled back into range.
    pub fn sanitized(mut self) -> Self {
        self.font_size = if self.font_size.is_finite() {
            self.font_size.clamp(text::MIN_FONT_SIZE, text::MAX_FONT_SIZE)
        } else {
            text::FONT_SIZE
        };
        self.background_opacity = if self.background_opacity.is_finite() {
            self.background_opacity.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self
    }

    /// Background as RGBA with the opacity folded into alpha.
    pub fn background_rgba(&self) -> Option<[u8; 4]> {
        let [r, g, b] = self.background_color?;
        let alpha = (self.background_opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
        (alpha > 0).then_some([r, g, b, alpha])
    }
}

/// A text label positioned in normalized coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBox {
    pub id: AnnotationId,
    pub rect: NormRect,
    pub text: String,
    pub style: TextStyle,
}

impl TextBox {
    pub fn new(id: AnnotationId, rect: NormRect, style: TextStyle) -> Self {
        Self {
            id,
            rect: rect.clamped(),
            text: String::new(),
            style: style.sanitized(),
        }
    }

    /// Whether there is anything to draw besides whitespace.
    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }
}
