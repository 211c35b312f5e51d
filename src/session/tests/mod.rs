//! Session scenario tests.
//!
//! Sessions are opened with the viewport sized to the image so stage and
//! viewport coordinates coincide at load time.

mod transforms;

use super::{EditorSession, EventHost, ListenerChannel, ListenerId};
use crate::config::{EditorConfig, Platform};
use crate::image_source::test_support::png;
use crate::interaction::PointerEvent;
use crate::model::{NormRect, Point};

/// Host that records live subscriptions.
#[derive(Debug, Default)]
pub(super) struct RecordingHost {
    next_id: u64,
    pub active: Vec<(ListenerId, ListenerChannel)>,
}

impl EventHost for RecordingHost {
    fn subscribe(&mut self, channel: ListenerChannel) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.active.push((id, channel));
        id
    }

    fn unsubscribe(&mut self, id: ListenerId) {
        self.active.retain(|(active, _)| *active != id);
    }
}

pub(super) fn test_config() -> EditorConfig {
    EditorConfig {
        platform: Platform::Other,
        ..EditorConfig::default()
    }
}

/// Open a session with a loaded white image of the given size.
pub(super) fn session_with_image(width: u32, height: u32) -> (EditorSession, RecordingHost) {
    session_with_config(width, height, test_config())
}

pub(super) fn session_with_config(width: u32, height: u32, config: EditorConfig) -> (EditorSession, RecordingHost) {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut host = RecordingHost::default();
    let mut session = EditorSession::open(config, &mut host);
    session.set_viewport_size(width as f32, height as f32);
    let image = png(width, height);
    session
        .load_image(image.bytes().to_vec(), image.mime(), &[])
        .expect("load");
    session.finish_decode().expect("decode");
    (session, host)
}

/// Press, move and release in viewport coordinates.
pub(super) fn drag(session: &mut EditorSession, from: (f32, f32), to: (f32, f32)) {
    session.handle_pointer(PointerEvent::down(from.0, from.1)).expect("down");
    session.handle_pointer(PointerEvent::moved(to.0, to.1)).expect("move");
    session.handle_pointer(PointerEvent::up(to.0, to.1)).expect("up");
}

/// Viewport position of a stage point under the current transform.
pub(super) fn view_of(session: &EditorSession, x: f32, y: f32) -> (f32, f32) {
    let p = session.viewport().to_viewport(Point::new(x, y));
    (p.x, p.y)
}

pub(super) fn assert_rect_near(actual: &NormRect, expected: (f32, f32, f32, f32), tolerance: f32) {
    let (x, y, w, h) = expected;
    assert!(
        (actual.x - x).abs() <= tolerance
            && (actual.y - y).abs() <= tolerance
            && (actual.width - w).abs() <= tolerance
            && (actual.height - h).abs() <= tolerance,
        "{actual:?} is not within {tolerance} of {expected:?}"
    );
}
