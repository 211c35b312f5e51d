//! Pointer interaction: tools, gesture states and drag/resize math.
//!
//! The session drives these types; nothing here touches the model directly.

mod gesture;
mod handles;

pub use gesture::{Gesture, Tool};
pub use handles::{Handle, resize_rect, translate_rect};

/// Kind of pointer event delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEventKind {
    Down,
    Move,
    Up,
    /// Pointer left the viewport
    Leave,
    /// Double click / double tap
    DoubleClick,
}

/// A pointer event in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub x: f32,
    pub y: f32,
}

impl PointerEvent {
    pub fn new(kind: PointerEventKind, x: f32, y: f32) -> Self {
        Self { kind, x, y }
    }

    pub fn down(x: f32, y: f32) -> Self {
        Self::new(PointerEventKind::Down, x, y)
    }

    pub fn moved(x: f32, y: f32) -> Self {
        Self::new(PointerEventKind::Move, x, y)
    }

    pub fn up(x: f32, y: f32) -> Self {
        Self::new(PointerEventKind::Up, x, y)
    }

    pub fn leave() -> Self {
        Self::new(PointerEventKind::Leave, 0.0, 0.0)
    }

    pub fn double_click(x: f32, y: f32) -> Self {
        Self::new(PointerEventKind::DoubleClick, x, y)
    }
}
