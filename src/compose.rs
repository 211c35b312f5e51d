//! Burn text boxes into image pixels.
//!
//! Runs once at save time on borrowed data; the session's text boxes are
//! left untouched so a cancelled save loses nothing.

use std::path::Path;

use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::drawing::{Blend, draw_filled_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect as PixelRect;
use web_time::Instant;

use crate::constants::{FONT_CANDIDATES, TEXT_PADDING};
use crate::error::{EditorError, Result};
use crate::model::TextBox;

/// Load the font used for burn-in.
///
/// An explicit path must load; without one the usual system locations are
/// tried and `Ok(None)` means none was found.
pub fn load_font(path: Option<&Path>) -> Result<Option<FontArc>> {
    if let Some(path) = path {
        let bytes = std::fs::read(path)?;
        let font = FontArc::try_from_vec(bytes)
            .map_err(|e| EditorError::Font(format!("{}: {}", path.display(), e)))?;
        log::info!("Loaded font {}", path.display());
        return Ok(Some(font));
    }

    for candidate in FONT_CANDIDATES {
        if let Ok(bytes) = std::fs::read(candidate)
            && let Ok(font) = FontArc::try_from_vec(bytes)
        {
            log::debug!("Using system font {}", candidate);
            return Ok(Some(font));
        }
    }
    Ok(None)
}

/// Draw every non-empty text box onto a copy of `image`.
///
/// Backgrounds are alpha blended; text is word-wrapped to the box width and
/// lines that would overflow the box height are dropped. Without a font only
/// the backgrounds are drawn.
pub fn compose_text(image: &DynamicImage, text_boxes: &[TextBox], font: Option<&FontArc>) -> RgbaImage {
    let started = Instant::now();
    let mut output = image.to_rgba8();
    let (width, height) = output.dimensions();

    let drawable: Vec<&TextBox> = text_boxes.iter().filter(|t| t.has_text()).collect();
    if drawable.is_empty() {
        return output;
    }
    if font.is_none() {
        log::warn!(
            "No font available, burning in {} text box backgrounds without text",
            drawable.len()
        );
    }

    for tb in drawable {
        let rect = tb.rect.to_stage(width as f32, height as f32);
        let left = rect.x.round() as i32;
        let top = rect.y.round() as i32;
        let box_w = rect.width.round().max(1.0) as u32;
        let box_h = rect.height.round().max(1.0) as u32;

        if let Some(background) = tb.style.background_rgba() {
            let mut canvas = Blend(output);
            draw_filled_rect_mut(
                &mut canvas,
                PixelRect::at(left, top).of_size(box_w, box_h),
                Rgba(background),
            );
            output = canvas.0;
        }

        if let Some(font) = font {
            draw_wrapped(&mut output, tb, font, left, top, box_w, box_h);
        }
    }

    log::debug!(
        "Composed {} text boxes into {}x{} image in {:.1?}",
        text_boxes.len(),
        width,
        height,
        started.elapsed()
    );
    output
}

fn draw_wrapped(
    output: &mut RgbaImage,
    tb: &TextBox,
    font: &FontArc,
    left: i32,
    top: i32,
    box_w: u32,
    box_h: u32,
) {
    // Glyphs never get taller than the box they are drawn into
    let size = tb.style.font_size.clamp(1.0, (box_h as f32).max(1.0));
    let scale = PxScale::from(size);
    let scaled = font.as_scaled(scale);
    let line_height = (scaled.height() + scaled.line_gap()).ceil().max(1.0);
    let padding = TEXT_PADDING.round() as i32;
    let max_width = (box_w as f32 - 2.0 * TEXT_PADDING).max(1.0) as u32;
    let bottom = top + box_h as i32 - padding;

    let mut y = top + padding;
    for (index, line) in wrap_lines(&tb.text, font, scale, max_width).iter().enumerate() {
        // Always draw the first line so tiny boxes still show something
        if index > 0 && y + line_height as i32 > bottom {
            log::debug!("Text box {} truncated after {} lines", tb.id, index);
            break;
        }
        draw_text_mut(output, Rgba(tb.style.color), left + padding, y, scale, font, line);
        y += line_height as i32;
    }
}

/// Greedy word wrap; explicit newlines always break.
fn wrap_lines(text: &str, font: &FontArc, scale: PxScale, max_width: u32) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };
            if current.is_empty() || text_size(scale, font, &candidate).0 <= max_width {
                current = candidate;
            } else {
                lines.push(std::mem::replace(&mut current, word.to_string()));
            }
        }
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NormRect, TextStyle};

    fn white(w: u32, h: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(w, h, Rgba([255, 255, 255, 255])))
    }

    fn text_box(text: &str, style: TextStyle) -> TextBox {
        let mut tb = TextBox::new(1, NormRect::new(0.25, 0.25, 0.5, 0.5), style);
        tb.text = text.to_string();
        tb
    }

    #[test]
    fn test_background_is_blended_inside_box_only() {
        let style = TextStyle {
            background_color: Some([0, 0, 0]),
            background_opacity: 0.5,
            ..TextStyle::default()
        };
        let out = compose_text(&white(100, 100), &[text_box("label", style)], None);

        let inside = out.get_pixel(50, 50);
        assert!(inside[0] > 100 && inside[0] < 160, "got {inside:?}");
        assert_eq!(out.get_pixel(5, 5), &Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_empty_text_is_skipped() {
        let style = TextStyle {
            background_color: Some([0, 0, 0]),
            background_opacity: 1.0,
            ..TextStyle::default()
        };
        let out = compose_text(&white(100, 100), &[text_box("   ", style)], None);
        assert_eq!(out.get_pixel(50, 50), &Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_input_is_not_mutated() {
        let image = white(60, 40);
        let boxes = vec![text_box("keep me", TextStyle::default())];
        let before = boxes.clone();
        let out = compose_text(&image, &boxes, None);
        assert_eq!(boxes, before);
        assert_eq!(out.dimensions(), (60, 40));
        assert_eq!(image.to_rgba8().get_pixel(30, 20), &Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_text_pixels_with_system_font() {
        let Ok(Some(font)) = load_font(None) else {
            // No system font on this machine; background path is covered above
            return;
        };
        let style = TextStyle {
            font_size: 20.0,
            color: [0, 0, 0, 255],
            background_color: None,
            background_opacity: 0.0,
        };
        let out = compose_text(&white(200, 200), &[text_box("Hello world", style)], Some(&font));
        let dark = out.pixels().filter(|p| p[0] < 128).count();
        assert!(dark > 0);
    }

    #[test]
    fn test_oversized_font_is_capped_at_box_height() {
        let Ok(Some(font)) = load_font(None) else {
            return;
        };
        let mut tb = text_box("Big", TextStyle::default());
        tb.style.font_size = 200_000.0;
        let out = compose_text(&white(80, 80), &[tb], Some(&font));
        assert_eq!(out.dimensions(), (80, 80));
    }

    #[test]
    fn test_wrap_lines_breaks_long_text() {
        let Ok(Some(font)) = load_font(None) else {
            return;
        };
        let scale = PxScale::from(20.0);
        let lines = wrap_lines("one two three four five six", &font, scale, 60);
        assert!(lines.len() > 1);
        let explicit = wrap_lines("a\nb", &font, scale, 1000);
        assert_eq!(explicit, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_missing_font_path_is_an_error() {
        let result = load_font(Some(Path::new("/nonexistent/font.ttf")));
        assert!(matches!(result, Err(EditorError::Io(_))));
    }
}
