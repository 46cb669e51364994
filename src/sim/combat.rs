//! Melee resolution, backstabs and the thrown rapier
//!
//! A melee swing is a proximity check around the attacker's center. The aim
//! angle only matters for the dagger backstab test, not for hit inclusion.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ai::Enemy;
use super::item::{Item, WeaponKind};
use super::rect::Rect;
use crate::consts::*;
use crate::{angle_deg, wrap_degrees};

/// Reach, damage and cooldown of the current attack
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackProfile {
    /// Hit radius measured from attacker center to target center, minus
    /// half the target's width
    pub reach: f32,
    pub damage: i32,
    pub cooldown_ms: u64,
    /// Weapon type, `None` for the unarmed fallback
    pub weapon: Option<WeaponKind>,
}

impl AttackProfile {
    /// Profile for an equipped weapon or the unarmed fallback
    pub fn for_weapon(weapon: Option<&Item>) -> Self {
        match weapon.and_then(|item| item.weapon_kind().map(|kind| (item, kind))) {
            Some((item, kind)) => Self {
                reach: kind.range() + MELEE_EXTRA_RADIUS,
                damage: item.damage(),
                cooldown_ms: item.attack_interval_ms(),
                weapon: Some(kind),
            },
            None => Self {
                reach: FIST_RANGE,
                damage: FIST_DAMAGE,
                cooldown_ms: FIST_COOLDOWN_MS,
                weapon: None,
            },
        }
    }
}

/// One enemy struck by a swing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeleeHit {
    pub enemy_id: u32,
    pub damage: i32,
    pub backstab: bool,
}

/// True when the attack comes from outside the target's forward arc
///
/// Compares the aim direction with the direction from the target back to
/// the attacker. The bonus applies strictly beyond half the arc; a
/// difference of exactly half the arc is not a backstab.
pub fn is_backstab(aim_deg: f32, attacker: Vec2, target: Vec2) -> bool {
    let to_attacker = angle_deg(target, attacker);
    wrap_degrees(aim_deg - to_attacker).abs() > BACKSTAB_ARC_DEG / 2.0
}

/// Backstab bonus: a fraction of the target's current hp plus any set bonus
pub fn backstab_bonus(target_hp: i32, set_bonus: i32) -> i32 {
    (target_hp.max(0) as f32 * BACKSTAB_HP_FRACTION) as i32 + set_bonus
}

/// Apply one swing to every live enemy in reach
///
/// Every hit enemy is marked as struck, which maxes its awareness.
pub fn resolve_melee(
    attacker: Vec2,
    aim_point: Vec2,
    profile: &AttackProfile,
    dagger_set_bonus: i32,
    enemies: &mut [Enemy],
    now_ms: u64,
) -> Vec<MeleeHit> {
    let aim = angle_deg(attacker, aim_point);
    let mut hits = Vec::new();

    for enemy in enemies.iter_mut().filter(|e| e.body.is_alive()) {
        let target = enemy.body.center();
        if attacker.distance(target) >= profile.reach + enemy.body.rect.w / 2.0 {
            continue;
        }

        let backstab =
            profile.weapon == Some(WeaponKind::Dagger) && is_backstab(aim, attacker, target);
        let damage = if backstab {
            profile.damage + backstab_bonus(enemy.body.hp, dagger_set_bonus)
        } else {
            profile.damage
        };

        enemy.body.take_damage(damage);
        enemy.mark_struck(now_ms);
        hits.push(MeleeHit {
            enemy_id: enemy.id,
            damage,
            backstab,
        });
    }

    hits
}

/// A rapier in flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThrownRapier {
    pub pos: Vec2,
    /// Travel direction in degrees
    pub angle_deg: f32,
    pub damage: i32,
    /// Ticks left before the projectile expires
    pub ttl: u32,
}

impl ThrownRapier {
    /// Throw from `origin` toward `aim_point` with double the weapon damage
    pub fn new(origin: Vec2, aim_point: Vec2, weapon_damage: i32) -> Self {
        Self {
            pos: origin,
            angle_deg: angle_deg(origin, aim_point),
            damage: weapon_damage * 2,
            ttl: THROWN_RAPIER_TTL,
        }
    }

    pub fn direction(&self) -> Vec2 {
        let rad = self.angle_deg.to_radians();
        Vec2::new(rad.cos(), rad.sin())
    }

    /// Advance one tick. Returns false once the projectile has expired.
    pub fn advance(&mut self) -> bool {
        self.pos += self.direction() * THROWN_RAPIER_SPEED;
        self.ttl = self.ttl.saturating_sub(1);
        self.ttl > 0
    }

    /// Hitbox centered on the projectile position
    pub fn rect(&self) -> Rect {
        Rect::from_center(self.pos, THROWN_RAPIER_SIZE, THROWN_RAPIER_SIZE)
    }

    /// Damage the first live enemy overlapping the projectile
    ///
    /// Returns the struck enemy's id; the caller removes the projectile.
    pub fn strike(&self, enemies: &mut [Enemy], now_ms: u64) -> Option<u32> {
        let hitbox = self.rect();
        let enemy = enemies
            .iter_mut()
            .find(|e| e.body.is_alive() && e.body.rect.intersects(&hitbox))?;
        enemy.body.take_damage(self.damage);
        enemy.mark_struck(now_ms);
        Some(enemy.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::item::Rarity;

    fn enemy_centered_at(id: u32, center: Vec2, hp: i32) -> Enemy {
        let mut e = Enemy::grunt(id, 0.0, 0.0, 1);
        e.body.rect = Rect::from_center(center, ENEMY_WIDTH, ENEMY_HEIGHT);
        e.body.hp = hp;
        e.body.max_hp = hp;
        e
    }

    #[test]
    fn test_unarmed_profile() {
        let p = AttackProfile::for_weapon(None);
        assert_eq!(p.reach, FIST_RANGE);
        assert_eq!(p.damage, FIST_DAMAGE);
        assert_eq!(p.cooldown_ms, FIST_COOLDOWN_MS);
        assert_eq!(p.weapon, None);
    }

    #[test]
    fn test_weapon_profile_adds_extra_radius() {
        let sword = Item::weapon(WeaponKind::Sword, Rarity::Common);
        let p = AttackProfile::for_weapon(Some(&sword));
        assert_eq!(p.reach, SWORD_RANGE + MELEE_EXTRA_RADIUS);
        assert_eq!(p.damage, 10);
        assert_eq!(p.cooldown_ms, 400);
    }

    #[test]
    fn test_dagger_backstab_scenario() {
        // Player at origin, enemy to the right. Aiming away from the enemy
        // puts the attack outside the enemy's forward arc.
        let dagger = Item::weapon(WeaponKind::Dagger, Rarity::Common);
        let profile = AttackProfile::for_weapon(Some(&dagger));
        let mut enemies = vec![enemy_centered_at(1, Vec2::new(60.0, 0.0), 20)];

        let hits = resolve_melee(
            Vec2::ZERO,
            Vec2::new(100.0, 0.0),
            &profile,
            0,
            &mut enemies,
            500,
        );

        assert_eq!(hits.len(), 1);
        assert!(hits[0].backstab);
        // 12 base + 25% of 20 current hp
        assert_eq!(hits[0].damage, 17);
        assert_eq!(enemies[0].body.hp, 3);
        assert_eq!(enemies[0].awareness, AWARENESS_MAX);
        assert!(enemies[0].aware);
    }

    #[test]
    fn test_backstab_uses_current_hp() {
        assert_eq!(backstab_bonus(100, 0), 25);
        assert_eq!(backstab_bonus(8, 0), 2);
        assert_eq!(backstab_bonus(8, 5), 7);
        assert_eq!(backstab_bonus(-3, 0), 0);
    }

    #[test]
    fn test_backstab_boundary_is_exclusive() {
        let attacker = Vec2::ZERO;
        let target = Vec2::new(100.0, 0.0);
        // Direction from target back to attacker is 180 degrees.
        // Aim of 120 degrees differs by exactly 60 = half the arc.
        assert!(!is_backstab(120.0, attacker, target));
        assert!(is_backstab(119.0, attacker, target));
        assert!(!is_backstab(121.0, attacker, target));
        assert!(!is_backstab(-120.0, attacker, target));
        assert!(is_backstab(-119.0, attacker, target));
    }

    #[test]
    fn test_sword_never_backstabs() {
        let sword = Item::weapon(WeaponKind::Sword, Rarity::Common);
        let profile = AttackProfile::for_weapon(Some(&sword));
        let mut enemies = vec![enemy_centered_at(1, Vec2::new(60.0, 0.0), 50)];
        let hits = resolve_melee(
            Vec2::ZERO,
            Vec2::new(100.0, 0.0),
            &profile,
            5,
            &mut enemies,
            0,
        );
        assert!(!hits[0].backstab);
        assert_eq!(enemies[0].body.hp, 40);
    }

    #[test]
    fn test_melee_reach_includes_half_width() {
        let profile = AttackProfile::for_weapon(None);
        // reach 90 + half width 20 = 110, strict
        let mut enemies = vec![
            enemy_centered_at(1, Vec2::new(109.0, 0.0), 10),
            enemy_centered_at(2, Vec2::new(110.0, 0.0), 10),
            enemy_centered_at(3, Vec2::new(-50.0, 0.0), 10),
        ];
        let hits = resolve_melee(
            Vec2::ZERO,
            Vec2::new(1.0, 0.0),
            &profile,
            0,
            &mut enemies,
            0,
        );
        let ids: Vec<u32> = hits.iter().map(|h| h.enemy_id).collect();
        assert_eq!(ids, vec![1, 3], "hit inclusion ignores aim direction");
        assert_eq!(enemies[1].body.hp, 10);
        assert!(!enemies[1].aware);
    }

    #[test]
    fn test_dead_enemies_are_skipped() {
        let profile = AttackProfile::for_weapon(None);
        let mut enemies = vec![enemy_centered_at(1, Vec2::new(10.0, 0.0), 0)];
        let hits = resolve_melee(Vec2::ZERO, Vec2::X, &profile, 0, &mut enemies, 0);
        assert!(hits.is_empty());
    }

    #[test]
    fn test_thrown_rapier_flight_and_expiry() {
        let mut rapier = ThrownRapier::new(Vec2::ZERO, Vec2::new(10.0, 0.0), 14);
        assert_eq!(rapier.damage, 28);
        assert!(rapier.advance());
        assert!((rapier.pos.x - THROWN_RAPIER_SPEED).abs() < 1e-4);
        assert!(rapier.pos.y.abs() < 1e-4);

        let mut ticks = 1;
        while rapier.advance() {
            ticks += 1;
        }
        assert_eq!(ticks + 1, THROWN_RAPIER_TTL);
        assert_eq!(rapier.ttl, 0);
    }

    #[test]
    fn test_thrown_rapier_strikes_once() {
        let rapier = ThrownRapier::new(Vec2::new(100.0, 0.0), Vec2::new(200.0, 0.0), 14);
        let mut enemies = vec![
            enemy_centered_at(1, Vec2::new(500.0, 0.0), 50),
            enemy_centered_at(2, Vec2::new(110.0, 5.0), 50),
        ];
        assert_eq!(rapier.strike(&mut enemies, 0), Some(2));
        assert_eq!(enemies[1].body.hp, 22);
        assert!(enemies[1].aware);
        assert_eq!(enemies[0].body.hp, 50);
    }
}
