use super::*;
use crate::error::EditorError;
use crate::image_source::PNG_MIME;
use crate::image_source::test_support::marked_png;
use crate::model::Rect;
use crate::transform::RotateDirection;

#[test]
fn test_end_to_end_rotate_and_undo() {
    let (mut session, _host) = session_with_image(400, 300);
    drag(&mut session, (50.0, 50.0), (150.0, 150.0));
    assert_rect_near(&session.masks()[0].rect, (0.125, 0.167, 0.25, 0.333), 0.01);
    let before_rotate = session.masks().to_vec();

    session.rotate(RotateDirection::Clockwise).unwrap();
    assert!(session.is_loading());
    // Nothing changes until the decode resolves
    assert_eq!(session.image_size(), Some((400, 300)));
    session.finish_decode().unwrap();

    assert_eq!(session.image_size(), Some((300, 400)));
    let rotated = session.masks()[0].rect;
    // Old stage rect (50, 50, 100, 100) lands at (150, 50, 100, 100) in 300x400
    assert_rect_near(&rotated, (0.5, 0.125, 1.0 / 3.0, 0.25), 0.01);

    assert!(session.undo().unwrap());
    assert!(session.is_loading());
    session.finish_decode().unwrap();

    assert_eq!(session.image_size(), Some((400, 300)));
    assert_eq!(session.masks(), &before_rotate[..]);
}

#[test]
fn test_rotate_moves_pixels() {
    let mut host = RecordingHost::default();
    let mut session = EditorSession::open(test_config(), &mut host);
    let image = marked_png(4, 2);
    session.load_image(image.bytes().to_vec(), PNG_MIME, &[]).unwrap();
    session.finish_decode().unwrap();

    session.rotate(RotateDirection::Clockwise).unwrap();
    session.finish_decode().unwrap();
    let pixels = session.image().unwrap().pixels().to_rgba8();
    assert_eq!(pixels.dimensions(), (2, 4));
    assert_eq!(pixels.get_pixel(1, 0)[1], 0);
}

#[test]
fn test_four_rotations_round_trip_annotations() {
    let (mut session, _host) = session_with_image(400, 300);
    drag(&mut session, (37.0, 21.0), (181.0, 97.0));
    let original = session.masks()[0].rect;

    for _ in 0..4 {
        session.rotate(RotateDirection::Clockwise).unwrap();
        session.finish_decode().unwrap();
    }
    assert_eq!(session.image_size(), Some((400, 300)));
    assert_rect_near(&session.masks()[0].rect, (original.x, original.y, original.width, original.height), 1e-6);
}

#[test]
fn test_redo_across_image_change() {
    let (mut session, _host) = session_with_image(400, 300);
    drag(&mut session, (50.0, 50.0), (150.0, 150.0));
    session.rotate(RotateDirection::CounterClockwise).unwrap();
    session.finish_decode().unwrap();
    let rotated = session.masks().to_vec();

    session.undo().unwrap();
    session.finish_decode().unwrap();
    session.redo().unwrap();
    assert!(session.is_loading());
    session.finish_decode().unwrap();

    assert_eq!(session.image_size(), Some((300, 400)));
    assert_eq!(session.masks(), &rotated[..]);
}

#[test]
fn test_busy_guard_rejects_overlapping_requests() {
    let (mut session, _host) = session_with_image(400, 300);
    drag(&mut session, (50.0, 50.0), (150.0, 150.0));
    session.rotate(RotateDirection::Clockwise).unwrap();

    assert!(matches!(session.rotate(RotateDirection::Clockwise), Err(EditorError::Busy)));
    assert!(matches!(session.crop_to_rect(Rect::new(0.0, 0.0, 50.0, 50.0)), Err(EditorError::Busy)));
    assert!(matches!(session.undo(), Err(EditorError::Busy)));
    assert!(matches!(session.redo(), Err(EditorError::Busy)));
    let image = png(10, 10);
    assert!(matches!(
        session.load_image(image.bytes().to_vec(), PNG_MIME, &[]),
        Err(EditorError::Busy)
    ));
    assert!(matches!(session.paste_image(image.bytes().to_vec(), PNG_MIME), Err(EditorError::Busy)));

    // Pointer input is ignored while loading
    let masks = session.masks().to_vec();
    drag(&mut session, (200.0, 200.0), (300.0, 280.0));
    assert_eq!(session.masks(), &masks[..]);
    assert!(session.overlay().loading);

    // Only the first rotation applies
    session.finish_decode().unwrap();
    assert_eq!(session.image_size(), Some((300, 400)));
    assert!(matches!(session.finish_decode(), Err(EditorError::NothingPending)));
}

#[test]
fn test_crop_clips_and_drops() {
    let (mut session, _host) = session_with_image(400, 300);
    drag(&mut session, (20.0, 20.0), (60.0, 60.0));
    drag(&mut session, (150.0, 100.0), (250.0, 200.0));
    drag(&mut session, (260.0, 210.0), (340.0, 290.0));

    assert!(session.crop_to_rect(Rect::new(100.0, 50.0, 200.0, 200.0)).unwrap());
    session.finish_decode().unwrap();

    assert_eq!(session.image_size(), Some((200, 200)));
    let masks = session.masks();
    // First mask lies left of the crop, third straddles its bottom-right corner
    assert_eq!(masks.len(), 2);
    assert_rect_near(&masks[0].rect, (0.25, 0.25, 0.5, 0.5), 1e-4);
    assert_rect_near(&masks[1].rect, (0.8, 0.8, 0.2, 0.2), 1e-4);
}

#[test]
fn test_crop_below_minimum_is_ignored() {
    let (mut session, _host) = session_with_image(400, 300);
    assert!(!session.crop_to_rect(Rect::new(10.0, 10.0, 4.0, 100.0)).unwrap());
    assert!(!session.is_loading());
    // Clamping to the image can shrink a crop below the minimum too
    assert!(!session.crop_to_rect(Rect::new(397.0, 10.0, 100.0, 100.0)).unwrap());
    assert!(!session.is_loading());
}

#[test]
fn test_crop_is_undoable() {
    let (mut session, _host) = session_with_image(400, 300);
    drag(&mut session, (20.0, 20.0), (60.0, 60.0));
    let before = session.masks().to_vec();

    session.crop_to_rect(Rect::new(200.0, 0.0, 200.0, 300.0)).unwrap();
    session.finish_decode().unwrap();
    assert!(session.masks().is_empty());

    session.undo().unwrap();
    session.finish_decode().unwrap();
    assert_eq!(session.image_size(), Some((400, 300)));
    assert_eq!(session.masks(), &before[..]);
}

#[test]
fn test_transforms_need_an_image() {
    let mut host = RecordingHost::default();
    let mut session = EditorSession::open(test_config(), &mut host);
    assert!(matches!(session.rotate(RotateDirection::Clockwise), Err(EditorError::NoImage)));
    assert!(matches!(
        session.crop_to_rect(Rect::new(0.0, 0.0, 10.0, 10.0)),
        Err(EditorError::NoImage)
    ));
}

#[test]
fn test_decode_failure_leaves_state_intact() {
    let (mut session, _host) = session_with_image(400, 300);
    drag(&mut session, (50.0, 50.0), (150.0, 150.0));
    let masks = session.masks().to_vec();
    let entries = session.history().len();

    session.load_image(vec![0u8, 1, 2, 3], "image/png", &[]).unwrap();
    let err = session.finish_decode().unwrap_err();
    assert!(matches!(err, EditorError::Decode { .. }));

    assert!(!session.is_loading());
    assert_eq!(session.image_size(), Some((400, 300)));
    assert_eq!(session.masks(), &masks[..]);
    assert_eq!(session.history().len(), entries);
}

#[test]
fn test_paste_replaces_image_and_clears() {
    let (mut session, _host) = session_with_image(400, 300);
    drag(&mut session, (50.0, 50.0), (150.0, 150.0));

    let pasted = png(64, 48);
    session.paste_image(pasted.bytes().to_vec(), PNG_MIME).unwrap();
    session.finish_decode().unwrap();

    assert_eq!(session.image_size(), Some((64, 48)));
    assert!(session.masks().is_empty());
    assert!(session.history().is_empty());
    assert!(!session.can_undo());
}

#[test]
fn test_drawing_after_rotate_maps_through_new_fit() {
    let (mut session, _host) = session_with_image(400, 300);
    session.rotate(RotateDirection::Clockwise).unwrap();
    session.finish_decode().unwrap();

    let from = view_of(&session, 30.0, 40.0);
    let to = view_of(&session, 130.0, 240.0);
    drag(&mut session, from, to);
    assert_rect_near(&session.masks()[0].rect, (0.1, 0.1, 1.0 / 3.0, 0.5), 1e-3);
}
