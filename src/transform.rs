//! Rotate and crop, for pixels and annotations alike.
//!
//! Pixel operations produce a new image; annotation remaps are pure
//! functions over normalized rectangles so they can be applied once the new
//! image has finished decoding.

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::model::{Mask, NormRect, Rect, TextBox};

/// Direction of a quarter turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RotateDirection {
    #[serde(rename = "cw")]
    Clockwise,
    #[serde(rename = "ccw")]
    CounterClockwise,
}

impl RotateDirection {
    pub fn inverse(self) -> Self {
        match self {
            RotateDirection::Clockwise => RotateDirection::CounterClockwise,
            RotateDirection::CounterClockwise => RotateDirection::Clockwise,
        }
    }
}

/// Rotate pixels a quarter turn.
pub fn rotate_pixels(image: &DynamicImage, direction: RotateDirection) -> DynamicImage {
    match direction {
        RotateDirection::Clockwise => image.rotate90(),
        RotateDirection::CounterClockwise => image.rotate270(),
    }
}

/// Remap a normalized rectangle through a quarter turn of its image.
///
/// Clockwise, the old bottom-left corner becomes the new top-left:
/// `(x, y, w, h) -> (1 - y - h, x, h, w)`.
pub fn rotate_rect(rect: &NormRect, direction: RotateDirection) -> NormRect {
    match direction {
        RotateDirection::Clockwise => {
            NormRect::new(1.0 - rect.y - rect.height, rect.x, rect.height, rect.width)
        }
        RotateDirection::CounterClockwise => {
            NormRect::new(rect.y, 1.0 - rect.x - rect.width, rect.height, rect.width)
        }
    }
}

/// Rotate every annotation along with the image.
pub fn rotate_annotations(
    masks: &[Mask],
    text_boxes: &[TextBox],
    direction: RotateDirection,
) -> (Vec<Mask>, Vec<TextBox>) {
    let masks = masks
        .iter()
        .map(|m| Mask {
            rect: rotate_rect(&m.rect, direction),
            ..m.clone()
        })
        .collect();
    let text_boxes = text_boxes
        .iter()
        .map(|t| TextBox {
            rect: rotate_rect(&t.rect, direction),
            ..t.clone()
        })
        .collect();
    (masks, text_boxes)
}

/// Crop region in whole pixels, clamped to the image.
///
/// Returns `None` when nothing of the requested rect lies on the image.
pub fn pixel_crop_region(crop: &Rect, image_w: u32, image_h: u32) -> Option<(u32, u32, u32, u32)> {
    let clamped = crop.clamp_to(image_w as f32, image_h as f32);
    let left = clamped.x.round() as u32;
    let top = clamped.y.round() as u32;
    let right = (clamped.right().round() as u32).min(image_w);
    let bottom = (clamped.bottom().round() as u32).min(image_h);
    if right <= left || bottom <= top {
        return None;
    }
    Some((left, top, right - left, bottom - top))
}

/// Cut the pixels of a crop region out of an image.
pub fn crop_pixels(image: &DynamicImage, region: (u32, u32, u32, u32)) -> DynamicImage {
    let (x, y, w, h) = region;
    image.crop_imm(x, y, w, h)
}

/// Clip a normalized rect to a pixel crop region and re-normalize it.
///
/// `None` when the rect does not overlap the region with positive area.
pub fn crop_rect(
    rect: &NormRect,
    image_w: f32,
    image_h: f32,
    region: (u32, u32, u32, u32),
) -> Option<NormRect> {
    let (rx, ry, rw, rh) = region;
    let crop = Rect::new(rx as f32, ry as f32, rw as f32, rh as f32);
    let clipped = rect.to_stage(image_w, image_h).intersection(&crop)?;
    let local = Rect::new(clipped.x - crop.x, clipped.y - crop.y, clipped.width, clipped.height);
    Some(NormRect::from_stage(&local, crop.width, crop.height))
}

/// Crop every annotation; ones fully outside the region are dropped.
pub fn crop_annotations(
    masks: &[Mask],
    text_boxes: &[TextBox],
    image_w: f32,
    image_h: f32,
    region: (u32, u32, u32, u32),
) -> (Vec<Mask>, Vec<TextBox>) {
    let masks = masks
        .iter()
        .filter_map(|m| {
            let rect = crop_rect(&m.rect, image_w, image_h, region);
            if rect.is_none() {
                log::debug!("Crop drops mask {}", m.id);
            }
            rect.map(|rect| Mask { rect, ..m.clone() })
        })
        .collect();
    let text_boxes = text_boxes
        .iter()
        .filter_map(|t| {
            let rect = crop_rect(&t.rect, image_w, image_h, region);
            if rect.is_none() {
                log::debug!("Crop drops text box {}", t.id);
            }
            rect.map(|rect| TextBox { rect, ..t.clone() })
        })
        .collect();
    (masks, text_boxes)
}
