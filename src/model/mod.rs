//! Annotation data model.
//!
//! All annotation geometry is stored normalized to the image size so it
//! survives zooming; rotate and crop remap it explicitly.

mod geometry;
mod mask;
mod store;
mod text_box;

/// Unique identifier for an annotation (mask or text box).
pub type AnnotationId = u32;

pub use geometry::{NormRect, Point, Rect};
pub use mask::{Mask, MaskShape};
pub use store::{AnnotationKind, AnnotationModel};
pub use text_box::{TextBox, TextStyle};
