//! Resize handles and the drag/resize delta math.
//!
//! Moving and resizing share one code path: a handle is a set of edges that
//! follow the pointer delta, and a body drag is the case where all four edges
//! follow it together.

use crate::model::{Point, Rect};

/// One of the eight resize affordances around a selected annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handle {
    TopLeft,
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
}

/// Which edge of an axis a handle drags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Min,
    Max,
}

impl Handle {
    pub const ALL: [Handle; 8] = [
        Handle::TopLeft,
        Handle::Top,
        Handle::TopRight,
        Handle::Right,
        Handle::BottomRight,
        Handle::Bottom,
        Handle::BottomLeft,
        Handle::Left,
    ];

    /// Horizontal and vertical edge constraints.
    fn edges(self) -> (Option<Edge>, Option<Edge>) {
        match self {
            Handle::TopLeft => (Some(Edge::Min), Some(Edge::Min)),
            Handle::Top => (None, Some(Edge::Min)),
            Handle::TopRight => (Some(Edge::Max), Some(Edge::Min)),
            Handle::Right => (Some(Edge::Max), None),
            Handle::BottomRight => (Some(Edge::Max), Some(Edge::Max)),
            Handle::Bottom => (None, Some(Edge::Max)),
            Handle::BottomLeft => (Some(Edge::Min), Some(Edge::Max)),
            Handle::Left => (Some(Edge::Min), None),
        }
    }

    /// Position of this handle on a rectangle.
    pub fn position(self, rect: &Rect) -> Point {
        let (h, v) = self.edges();
        let x = match h {
            Some(Edge::Min) => rect.x,
            Some(Edge::Max) => rect.right(),
            None => rect.x + rect.width / 2.0,
        };
        let y = match v {
            Some(Edge::Min) => rect.y,
            Some(Edge::Max) => rect.bottom(),
            None => rect.y + rect.height / 2.0,
        };
        Point::new(x, y)
    }

    /// Closest handle of `rect` within `radius` of `point`.
    pub fn hit_test(rect: &Rect, point: &Point, radius: f32) -> Option<Handle> {
        Handle::ALL
            .iter()
            .map(|h| (*h, h.position(rect).distance_to(point)))
            .filter(|(_, d)| *d <= radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(h, _)| h)
    }
}

/// Non-panicking clamp; `hi` wins if the bounds cross.
fn clamp_between(v: f32, lo: f32, hi: f32) -> f32 {
    v.max(lo).min(hi)
}

/// Move a rectangle by a stage delta, keeping its size and staying on stage.
pub fn translate_rect(original: &Rect, dx: f32, dy: f32, stage_w: f32, stage_h: f32) -> Rect {
    let x = clamp_between(original.x + dx, 0.0, (stage_w - original.width).max(0.0));
    let y = clamp_between(original.y + dy, 0.0, (stage_h - original.height).max(0.0));
    Rect::new(x, y, original.width, original.height)
}

/// Drag the edges a handle controls by a stage delta.
///
/// Dragged edges stay on stage and never come closer than `min_size` to the
/// opposite edge, so a resize cannot flip or collapse the rectangle.
pub fn resize_rect(
    original: &Rect,
    handle: Handle,
    dx: f32,
    dy: f32,
    min_size: f32,
    stage_w: f32,
    stage_h: f32,
) -> Rect {
    let (h, v) = handle.edges();
    let (left, right) = resize_axis(original.x, original.right(), h, dx, min_size, stage_w);
    let (top, bottom) = resize_axis(original.y, original.bottom(), v, dy, min_size, stage_h);
    Rect::new(left, top, right - left, bottom - top)
}

fn resize_axis(
    min: f32,
    max: f32,
    edge: Option<Edge>,
    delta: f32,
    min_size: f32,
    limit: f32,
) -> (f32, f32) {
    match edge {
        None => (min, max),
        // An edge already closer than min_size may only move outwards
        Some(Edge::Min) => {
            let upper = (max - min_size).max(min);
            (clamp_between(min + delta, 0.0, upper), max)
        }
        Some(Edge::Max) => {
            let lower = (min + min_size).min(max);
            (min, clamp_between(max + delta, lower, limit))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect() -> Rect {
        Rect::new(100.0, 100.0, 50.0, 40.0)
    }

    #[test]
    fn test_handle_positions() {
        let r = rect();
        assert_eq!(Handle::TopLeft.position(&r), Point::new(100.0, 100.0));
        assert_eq!(Handle::Right.position(&r), Point::new(150.0, 120.0));
        assert_eq!(Handle::Bottom.position(&r), Point::new(125.0, 140.0));
    }

    #[test]
    fn test_handle_hit_test() {
        let r = rect();
        assert_eq!(Handle::hit_test(&r, &Point::new(151.0, 141.0), 4.0), Some(Handle::BottomRight));
        assert_eq!(Handle::hit_test(&r, &Point::new(125.0, 120.0), 4.0), None);
    }

    #[test]
    fn test_translate_clamps_to_stage() {
        let moved = translate_rect(&rect(), 500.0, -500.0, 400.0, 300.0);
        assert_eq!(moved, Rect::new(350.0, 0.0, 50.0, 40.0));
    }

    #[test]
    fn test_resize_bottom_right() {
        let r = resize_rect(&rect(), Handle::BottomRight, 20.0, 10.0, 5.0, 400.0, 300.0);
        assert_eq!(r, Rect::new(100.0, 100.0, 70.0, 50.0));
    }

    #[test]
    fn test_resize_axis_constraint() {
        // Top handle ignores horizontal movement
        let r = resize_rect(&rect(), Handle::Top, 30.0, -20.0, 5.0, 400.0, 300.0);
        assert_eq!(r, Rect::new(100.0, 80.0, 50.0, 60.0));
    }

    #[test]
    fn test_resize_keeps_min_size() {
        let r = resize_rect(&rect(), Handle::Left, 200.0, 0.0, 5.0, 400.0, 300.0);
        assert_eq!(r.width, 5.0);
        assert_eq!(r.right(), 150.0);

        let r = resize_rect(&rect(), Handle::Bottom, 0.0, -100.0, 5.0, 400.0, 300.0);
        assert_eq!(r.height, 5.0);
        assert_eq!(r.y, 100.0);
    }

    #[test]
    fn test_resize_clamps_to_stage() {
        let r = resize_rect(&rect(), Handle::TopLeft, -500.0, -500.0, 5.0, 400.0, 300.0);
        assert_eq!(r, Rect::new(0.0, 0.0, 150.0, 140.0));

        let r = resize_rect(&rect(), Handle::Right, 1000.0, 0.0, 5.0, 400.0, 300.0);
        assert_eq!(r.right(), 400.0);
    }

    #[test]
    fn test_resize_smaller_than_min_does_not_grow_backwards() {
        // An annotation already below the minimum keeps its far edge
        let small = Rect::new(10.0, 10.0, 2.0, 2.0);
        let r = resize_rect(&small, Handle::BottomRight, -10.0, -10.0, 5.0, 400.0, 300.0);
        assert_eq!(r.x, 10.0);
        assert!(r.width >= 2.0);
    }
}
