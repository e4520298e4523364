//! Axis-aligned rectangle geometry for the ship, walls and bullets
//!
//! Screen space: origin at the top-left, x grows right, y grows down.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle (top-left corner + size)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.min.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.min.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.min.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.min.y + self.size.y
    }

    /// Strict horizontal overlap with the span `[left, right]`
    /// (touching edges do not count)
    #[inline]
    pub fn overlaps_span_x(&self, left: f32, right: f32) -> bool {
        self.right() > left && self.left() < right
    }

    /// Strict point containment (points on the border are outside)
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x > self.left()
            && point.x < self.right()
            && point.y > self.top()
            && point.y < self.bottom()
    }
}

/// Vertical opening between an obstacle's walls, in screen y
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gap {
    /// Bottom edge of the top wall
    pub top: f32,
    /// Top edge of the bottom wall
    pub bottom: f32,
}

impl Gap {
    pub fn new(top: f32, bottom: f32) -> Self {
        Self { top, bottom }
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Whether a y coordinate lies in wall material (outside the opening)
    #[inline]
    pub fn is_outside(&self, y: f32) -> bool {
        y < self.top || y > self.bottom
    }

    /// Whether a vertical span `[top, bottom]` reaches into either wall
    #[inline]
    pub fn clips_span(&self, top: f32, bottom: f32) -> bool {
        top < self.top || bottom > self.bottom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges() {
        let r = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(r.left(), 10.0);
        assert_eq!(r.right(), 40.0);
        assert_eq!(r.top(), 20.0);
        assert_eq!(r.bottom(), 60.0);
    }

    #[test]
    fn touching_edges_do_not_overlap() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(!r.overlaps_span_x(10.0, 20.0));
        assert!(r.overlaps_span_x(9.9, 20.0));
        assert!(!r.contains_point(Vec2::new(10.0, 5.0)));
        assert!(r.contains_point(Vec2::new(5.0, 5.0)));
    }

    #[test]
    fn gap_outside() {
        let gap = Gap::new(100.0, 300.0);
        assert_eq!(gap.height(), 200.0);
        assert!(gap.is_outside(99.0));
        assert!(gap.is_outside(301.0));
        assert!(!gap.is_outside(100.0));
        assert!(!gap.is_outside(200.0));
        assert!(gap.clips_span(90.0, 150.0));
        assert!(gap.clips_span(250.0, 310.0));
        assert!(!gap.clips_span(150.0, 250.0));
    }
}
