//! Axis-aligned rectangle geometry for entities and platforms
//!
//! Screen coordinates: x grows right, y grows down. A rectangle covers
//! `[x, x + w) x [y, y + h)`, so rectangles that only share an edge do not
//! intersect.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Build a rectangle of the given size centered on `center`
    pub fn from_center(center: Vec2, w: f32, h: f32) -> Self {
        Self::new(center.x - w / 2.0, center.y - h / 2.0, w, h)
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    pub fn set_right(&mut self, right: f32) {
        self.x = right - self.w;
    }

    pub fn set_bottom(&mut self, bottom: f32) {
        self.y = bottom - self.h;
    }

    /// Copy of this rectangle shifted by (dx, dy)
    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.w, self.h)
    }

    /// Strict overlap test (positive overlap area on both axes)
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Overlap depth on each axis (zero when the rectangles do not intersect)
    pub fn overlap(&self, other: &Rect) -> Vec2 {
        if !self.intersects(other) {
            return Vec2::ZERO;
        }
        let ox = self.right().min(other.right()) - self.x.max(other.x);
        let oy = self.bottom().min(other.bottom()) - self.y.max(other.y);
        Vec2::new(ox, oy)
    }

    /// Check whether a point lies inside the rectangle (edges inclusive)
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Check whether the segment `a -> b` touches the rectangle
    ///
    /// Liang-Barsky clipping against the closed rectangle. Used for
    /// line-of-sight tests between entity centers.
    pub fn clips_segment(&self, a: Vec2, b: Vec2) -> bool {
        let d = b - a;
        let mut t0 = 0.0_f32;
        let mut t1 = 1.0_f32;

        let checks = [
            (-d.x, a.x - self.x),
            (d.x, self.right() - a.x),
            (-d.y, a.y - self.y),
            (d.y, self.bottom() - a.y),
        ];

        for (p, q) in checks {
            if p == 0.0 {
                // Parallel to this edge: reject if outside it
                if q < 0.0 {
                    return false;
                }
            } else {
                let t = q / p;
                if p < 0.0 {
                    if t > t1 {
                        return false;
                    }
                    t0 = t0.max(t);
                } else {
                    if t < t0 {
                        return false;
                    }
                    t1 = t1.min(t);
                }
            }
        }

        t0 <= t1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersects_strict_edges() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let touching = Rect::new(10.0, 0.0, 10.0, 10.0);
        let overlapping = Rect::new(9.0, 9.0, 10.0, 10.0);
        assert!(!a.intersects(&touching));
        assert!(a.intersects(&overlapping));
        assert!(overlapping.intersects(&a));
    }

    #[test]
    fn test_overlap_depth() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(7.0, 8.0, 10.0, 10.0);
        let o = a.overlap(&b);
        assert!((o.x - 3.0).abs() < 1e-5);
        assert!((o.y - 2.0).abs() < 1e-5);
        assert_eq!(a.overlap(&Rect::new(50.0, 50.0, 1.0, 1.0)), Vec2::ZERO);
    }

    #[test]
    fn test_clips_segment_through() {
        let platform = Rect::new(40.0, 40.0, 20.0, 20.0);
        assert!(platform.clips_segment(Vec2::new(0.0, 50.0), Vec2::new(100.0, 50.0)));
        assert!(platform.clips_segment(Vec2::new(0.0, 0.0), Vec2::new(100.0, 100.0)));
    }

    #[test]
    fn test_clips_segment_miss() {
        let platform = Rect::new(40.0, 40.0, 20.0, 20.0);
        // Passes above
        assert!(!platform.clips_segment(Vec2::new(0.0, 10.0), Vec2::new(100.0, 10.0)));
        // Stops short
        assert!(!platform.clips_segment(Vec2::new(0.0, 50.0), Vec2::new(30.0, 50.0)));
        // Vertical segment beside the box
        assert!(!platform.clips_segment(Vec2::new(70.0, 0.0), Vec2::new(70.0, 100.0)));
    }

    #[test]
    fn test_clips_segment_endpoint_inside() {
        let platform = Rect::new(40.0, 40.0, 20.0, 20.0);
        assert!(platform.clips_segment(Vec2::new(50.0, 50.0), Vec2::new(200.0, 200.0)));
    }

    #[test]
    fn test_center_and_setters() {
        let mut r = Rect::from_center(Vec2::new(50.0, 50.0), 20.0, 10.0);
        assert_eq!(r.x, 40.0);
        assert_eq!(r.y, 45.0);
        r.set_right(100.0);
        r.set_bottom(200.0);
        assert_eq!(r.right(), 100.0);
        assert_eq!(r.bottom(), 200.0);
        assert_eq!(r.center(), Vec2::new(90.0, 195.0));
    }
}
