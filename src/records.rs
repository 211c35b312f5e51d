//! Mask records exchanged with the card store.
//!
//! Records use the camelCase JSON shape the study side reads; coordinates are
//! fractions of the image size.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{AnnotationId, Mask, MaskShape, NormRect};

/// One mask as stored alongside a card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaskRecord {
    pub id: AnnotationId,
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    #[serde(rename = "groupKey")]
    pub group_key: String,
    #[serde(default)]
    pub shape: MaskShape,
}

impl From<&Mask> for MaskRecord {
    fn from(mask: &Mask) -> Self {
        Self {
            id: mask.id,
            x: mask.rect.x,
            y: mask.rect.y,
            w: mask.rect.width,
            h: mask.rect.height,
            group_key: mask.group_key.clone(),
            shape: mask.shape,
        }
    }
}

impl MaskRecord {
    /// Convert into a mask, clamping into the image.
    ///
    /// Returns `None` for records with no area left after clamping.
    pub fn to_mask(&self) -> Option<Mask> {
        let rect = NormRect::new(self.x, self.y, self.w, self.h);
        if rect.is_empty() {
            log::warn!("Skipping mask record {} with zero size", self.id);
            return None;
        }
        Some(Mask::new(self.id, rect, self.group_key.clone(), self.shape))
    }
}

/// How the study side reveals masks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RevealMode {
    /// Hide every mask, reveal all at once
    #[default]
    RevealAll,
    /// Hide every mask, reveal one group at a time
    RevealOne,
}

/// Everything handed back to the caller on save.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveOutput {
    /// Encoded image with text burned in
    pub image: Vec<u8>,
    pub mime: String,
    pub width: u32,
    pub height: u32,
    pub masks: Vec<MaskRecord>,
    pub mode: RevealMode,
}

/// Convert masks into records, preserving order.
pub fn records_from_masks(masks: &[Mask]) -> Vec<MaskRecord> {
    masks.iter().map(MaskRecord::from).collect()
}

/// Convert records into masks, dropping ones with no area.
pub fn masks_from_records(records: &[MaskRecord]) -> Vec<Mask> {
    records.iter().filter_map(MaskRecord::to_mask).collect()
}

/// Serialize records to the stored JSON form.
pub fn masks_to_json(records: &[MaskRecord]) -> Result<String> {
    Ok(serde_json::to_string(records)?)
}

/// Parse stored JSON into records.
pub fn masks_from_json(json: &str) -> Result<Vec<MaskRecord>> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EditorError;

    #[test]
    fn test_json_shape() {
        let mask = Mask::new(3, NormRect::new(0.25, 0.5, 0.25, 0.25), "2", MaskShape::Ellipse);
        let json = masks_to_json(&records_from_masks(&[mask])).unwrap();
        assert_eq!(
            json,
            r#"[{"id":3,"x":0.25,"y":0.5,"w":0.25,"h":0.25,"groupKey":"2","shape":"ellipse"}]"#
        );
    }

    #[test]
    fn test_shape_defaults_to_rect() {
        let records = masks_from_json(r#"[{"id":1,"x":0.1,"y":0.1,"w":0.2,"h":0.2,"groupKey":"1"}]"#).unwrap();
        assert_eq!(records[0].shape, MaskShape::Rect);
    }

    #[test]
    fn test_records_are_clamped_and_empty_skipped() {
        let records = vec![
            MaskRecord {
                id: 1,
                x: 0.9,
                y: -0.2,
                w: 0.5,
                h: 0.5,
                group_key: "1".into(),
                shape: MaskShape::Rect,
            },
            MaskRecord {
                id: 2,
                x: 0.1,
                y: 0.1,
                w: 0.0,
                h: 0.3,
                group_key: "2".into(),
                shape: MaskShape::Rect,
            },
        ];
        let masks = masks_from_records(&records);
        assert_eq!(masks.len(), 1);
        let r = masks[0].rect;
        assert!(r.x >= 0.0 && r.y >= 0.0);
        assert!(r.right() <= 1.0 + 1e-6 && r.bottom() <= 1.0 + 1e-6);
    }

    #[test]
    fn test_reveal_mode_names() {
        assert_eq!(serde_json::to_string(&RevealMode::RevealOne).unwrap(), "\"reveal-one\"");
        assert_eq!(serde_json::to_string(&RevealMode::RevealAll).unwrap(), "\"reveal-all\"");
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(masks_from_json("nope"), Err(EditorError::Json(_))));
    }
}
