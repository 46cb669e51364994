//! Rectangle physics against static platform colliders
//!
//! Movement is resolved one axis at a time: horizontal displacement first,
//! clamped to the edge of any platform it ran into, then vertical
//! displacement the same way. Resolving the axes separately keeps corners
//! from tunneling without any broad phase; platform counts per stage are
//! small enough that a linear scan is fine.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::consts::GRAVITY;

/// Physical state shared by every moving entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub rect: Rect,
    pub vel: Vec2,
    pub hp: i32,
    pub max_hp: i32,
    /// +1 facing right, -1 facing left
    pub facing: f32,
    /// Recomputed on every vertical movement pass
    pub on_ground: bool,
}

impl Body {
    pub fn new(x: f32, y: f32, w: f32, h: f32, hp: i32) -> Self {
        Self {
            rect: Rect::new(x, y, w, h),
            vel: Vec2::ZERO,
            hp,
            max_hp: hp,
            facing: 1.0,
            on_ground: false,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.rect.center()
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Subtract damage; hp may go negative, death checks use `hp <= 0`
    pub fn take_damage(&mut self, amount: i32) {
        self.hp -= amount;
    }

    /// Restore to full health
    pub fn heal_full(&mut self) {
        self.hp = self.max_hp;
    }

    /// Integrate gravity into vertical velocity (once per tick)
    #[inline]
    pub fn apply_gravity(&mut self) {
        self.vel.y += GRAVITY;
    }

    /// Point facing along the sign of horizontal velocity (unchanged at rest)
    pub fn face_velocity(&mut self) {
        if self.vel.x > 0.0 {
            self.facing = 1.0;
        } else if self.vel.x < 0.0 {
            self.facing = -1.0;
        }
    }

    /// Move by (dx, dy) and resolve collisions against platforms
    pub fn move_and_collide(&mut self, dx: f32, dy: f32, platforms: &[Rect]) {
        self.push_horizontal(dx, platforms);

        // Vertical pass
        self.rect.y += dy;
        self.on_ground = false;
        for p in platforms {
            if p.intersects(&self.rect) {
                if dy > 0.0 {
                    self.rect.set_bottom(p.top());
                    self.on_ground = true;
                    self.vel.y = 0.0;
                } else if dy < 0.0 {
                    self.rect.y = p.bottom();
                    self.vel.y = 0.0;
                }
            }
        }
    }

    /// Horizontal-only displacement (knockback); leaves grounded state alone
    pub fn push_horizontal(&mut self, dx: f32, platforms: &[Rect]) {
        self.rect.x += dx;
        for p in platforms {
            if p.intersects(&self.rect) {
                if dx > 0.0 {
                    self.rect.set_right(p.left());
                } else if dx < 0.0 {
                    self.rect.x = p.right();
                }
            }
        }
    }

    /// Move by the body's own velocity
    pub fn step(&mut self, platforms: &[Rect]) {
        let Vec2 { x, y } = self.vel;
        self.move_and_collide(x, y, platforms);
    }

    /// Keep the body inside the world rectangle
    pub fn clamp_to(&mut self, width: f32, height: f32) {
        if self.rect.left() < 0.0 {
            self.rect.x = 0.0;
        }
        if self.rect.right() > width {
            self.rect.set_right(width);
        }
        if self.rect.top() < 0.0 {
            self.rect.y = 0.0;
        }
        if self.rect.bottom() > height {
            self.rect.set_bottom(height);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ground() -> Rect {
        Rect::new(0.0, 500.0, 1000.0, 100.0)
    }

    #[test]
    fn test_falls_and_lands() {
        let platforms = [ground()];
        let mut body = Body::new(100.0, 400.0, 40.0, 50.0, 10);
        for _ in 0..120 {
            body.apply_gravity();
            body.step(&platforms);
        }
        assert!(body.on_ground);
        assert_eq!(body.vel.y, 0.0);
        assert!((body.rect.bottom() - 500.0).abs() < 1e-3);
    }

    #[test]
    fn test_horizontal_stops_at_wall() {
        let wall = Rect::new(200.0, 0.0, 20.0, 500.0);
        let mut body = Body::new(150.0, 300.0, 40.0, 50.0, 10);
        body.move_and_collide(30.0, 0.0, &[wall]);
        assert!((body.rect.right() - 200.0).abs() < 1e-3);

        let mut body = Body::new(230.0, 300.0, 40.0, 50.0, 10);
        body.move_and_collide(-30.0, 0.0, &[wall]);
        assert!((body.rect.left() - 220.0).abs() < 1e-3);
    }

    #[test]
    fn test_head_bump_zeroes_velocity() {
        let ceiling = Rect::new(0.0, 100.0, 500.0, 20.0);
        let mut body = Body::new(50.0, 125.0, 40.0, 50.0, 10);
        body.vel.y = -10.0;
        body.step(&[ceiling]);
        assert!((body.rect.top() - 120.0).abs() < 1e-3);
        assert_eq!(body.vel.y, 0.0);
        assert!(!body.on_ground);
    }

    #[test]
    fn test_on_ground_cleared_when_airborne() {
        let platforms = [ground()];
        let mut body = Body::new(100.0, 450.0, 40.0, 50.0, 10);
        body.on_ground = true;
        body.move_and_collide(0.0, -5.0, &platforms);
        assert!(!body.on_ground);
    }

    #[test]
    fn test_walks_off_ledge_edge_case() {
        // Standing exactly on the edge: sharing an edge is not an overlap
        let ledge = Rect::new(0.0, 300.0, 100.0, 20.0);
        let mut body = Body::new(100.0, 250.0, 40.0, 50.0, 10);
        body.apply_gravity();
        body.step(&[ledge]);
        assert!(!body.on_ground);
    }

    #[test]
    fn test_clamp_to_world() {
        let mut body = Body::new(-10.0, -5.0, 40.0, 50.0, 10);
        body.clamp_to(800.0, 600.0);
        assert_eq!(body.rect.x, 0.0);
        assert_eq!(body.rect.y, 0.0);
        body.rect.x = 790.0;
        body.rect.y = 590.0;
        body.clamp_to(800.0, 600.0);
        assert_eq!(body.rect.right(), 800.0);
        assert_eq!(body.rect.bottom(), 600.0);
    }

    proptest! {
        #[test]
        fn prop_move_never_leaves_overlap(
            x in 0.0f32..900.0,
            y in 0.0f32..430.0,
            dx in -20.0f32..20.0,
            dy in -20.0f32..20.0,
        ) {
            let platforms = [
                ground(),
                Rect::new(300.0, 250.0, 200.0, 20.0),
                Rect::new(650.0, 150.0, 150.0, 20.0),
            ];
            let mut body = Body::new(x, y, 40.0, 50.0, 10);
            prop_assume!(platforms.iter().all(|p| !p.intersects(&body.rect)));

            body.move_and_collide(dx, dy, &platforms);

            for p in &platforms {
                let o = body.rect.overlap(p);
                prop_assert!(o.x.min(o.y) <= 1e-3, "overlap {:?} with {:?}", o, p);
            }
        }
    }
}
