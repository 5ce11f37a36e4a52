//! Police units: pursuit and shooting AI

use std::collections::BTreeMap;

use rand::Rng;

use super::combat::DamageOutcome;
use super::constants::{
    MUZZLE_OFFSET, POLICE_AGGRO_RADIUS, POLICE_DAMAGE, POLICE_MAX_HEALTH, POLICE_RADIUS,
    POLICE_SHOOT_COOLDOWN_MS, POLICE_SHOOT_RADIUS, POLICE_SPAWN_MAX_DISTANCE,
    POLICE_SPAWN_MIN_DISTANCE, POLICE_SPEED, POLICE_STOP_DISTANCE, SPAWN_MARGIN, WORLD_HEIGHT,
    WORLD_WIDTH,
};
use super::ids::{EntityId, PlayerId};
use super::physics::PhysicsSystem;
use super::player::Player;

/// A police unit chasing one wanted player
#[derive(Debug, Clone)]
pub struct PoliceUnit {
    pub id: EntityId,
    pub target: PlayerId,

    pub x: f64,
    pub y: f64,
    pub angle: f64,
    pub speed: f64,
    pub radius: f64,

    pub health: f64,
    pub alive: bool,

    pub last_shot_at: Option<u64>,
    pub shoot_cooldown_ms: u64,
    pub aggro_radius: f64,
    pub shoot_radius: f64,
}

/// A bullet the unit wants fired this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shot {
    pub x: f64,
    pub y: f64,
    pub angle: f64,
    pub damage: f64,
}

/// What a unit did during its tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PoliceAction {
    /// Target gone, dead or no longer wanted; the unit should be removed
    Deactivated,
    /// Out of range or on cooldown
    Hold,
    Fire(Shot),
}

impl PoliceUnit {
    pub fn new(id: EntityId, target: PlayerId, x: f64, y: f64) -> Self {
        Self {
            id,
            target,
            x,
            y,
            angle: 0.0,
            speed: POLICE_SPEED,
            radius: POLICE_RADIUS,
            health: POLICE_MAX_HEALTH,
            alive: true,
            last_shot_at: None,
            shoot_cooldown_ms: POLICE_SHOOT_COOLDOWN_MS,
            aggro_radius: POLICE_AGGRO_RADIUS,
            shoot_radius: POLICE_SHOOT_RADIUS,
        }
    }

    /// Random point on the dispatch annulus around a player, kept inside the
    /// spawn inset.
    ///
    /// Near an edge the clamp can pull a point inside the inner radius, so the
    /// draw is repeated; if every draw lands too close the unit is sent toward
    /// the farthest inset corner instead.
    pub fn dispatch_point<R: Rng>(rng: &mut R, around_x: f64, around_y: f64) -> (f64, f64) {
        for _ in 0..DISPATCH_ATTEMPTS {
            let angle = rng.gen_range(0.0..std::f64::consts::TAU);
            let distance = rng.gen_range(POLICE_SPAWN_MIN_DISTANCE..=POLICE_SPAWN_MAX_DISTANCE);
            let (x, y) = clamp_to_inset(
                around_x + angle.cos() * distance,
                around_y + angle.sin() * distance,
            );
            if on_annulus(PhysicsSystem::distance(around_x, around_y, x, y)) {
                return (x, y);
            }
        }

        let (corner_x, corner_y) = farthest_inset_corner(around_x, around_y);
        let reach = PhysicsSystem::distance(around_x, around_y, corner_x, corner_y);
        let distance = rng
            .gen_range(POLICE_SPAWN_MIN_DISTANCE..=POLICE_SPAWN_MAX_DISTANCE)
            .min(reach);
        let angle = (corner_y - around_y).atan2(corner_x - around_x);
        clamp_to_inset(
            around_x + angle.cos() * distance,
            around_y + angle.sin() * distance,
        )
    }

    /// Run one tick of pursuit
    pub fn advance(&mut self, players: &BTreeMap<PlayerId, Player>, now: u64) -> PoliceAction {
        if !self.alive {
            return PoliceAction::Deactivated;
        }

        let target = match players.get(&self.target) {
            Some(p) if p.alive && p.wanted.is_wanted() => p,
            _ => {
                self.alive = false;
                return PoliceAction::Deactivated;
            }
        };

        let dx = target.x - self.x;
        let dy = target.y - self.y;
        let distance = (dx * dx + dy * dy).sqrt();

        if distance <= self.aggro_radius {
            self.angle = dy.atan2(dx);
            if distance > POLICE_STOP_DISTANCE {
                self.x += self.angle.cos() * self.speed;
                self.y += self.angle.sin() * self.speed;
            }
        }
        (self.x, self.y) = PhysicsSystem::clamp_to_world(self.x, self.y, self.radius);

        if distance <= self.shoot_radius && self.cooldown_elapsed(now) {
            self.last_shot_at = Some(now);
            return PoliceAction::Fire(Shot {
                x: self.x + self.angle.cos() * MUZZLE_OFFSET,
                y: self.y + self.angle.sin() * MUZZLE_OFFSET,
                angle: self.angle,
                damage: POLICE_DAMAGE,
            });
        }

        PoliceAction::Hold
    }

    fn cooldown_elapsed(&self, now: u64) -> bool {
        self.last_shot_at
            .map_or(true, |at| now.saturating_sub(at) >= self.shoot_cooldown_ms)
    }

    pub fn take_damage(&mut self, amount: f64) -> DamageOutcome {
        if !self.alive {
            return DamageOutcome::Ignored;
        }

        self.health = (self.health - amount).max(0.0);
        if self.health <= 0.0 {
            self.alive = false;
            DamageOutcome::Died
        } else {
            DamageOutcome::Survived
        }
    }
}

const DISPATCH_ATTEMPTS: usize = 32;

fn clamp_to_inset(x: f64, y: f64) -> (f64, f64) {
    (
        x.clamp(SPAWN_MARGIN, WORLD_WIDTH - SPAWN_MARGIN),
        y.clamp(SPAWN_MARGIN, WORLD_HEIGHT - SPAWN_MARGIN),
    )
}

fn on_annulus(distance: f64) -> bool {
    (POLICE_SPAWN_MIN_DISTANCE..=POLICE_SPAWN_MAX_DISTANCE).contains(&distance)
}

fn farthest_inset_corner(x: f64, y: f64) -> (f64, f64) {
    let (min_x, max_x) = (SPAWN_MARGIN, WORLD_WIDTH - SPAWN_MARGIN);
    let (min_y, max_y) = (SPAWN_MARGIN, WORLD_HEIGHT - SPAWN_MARGIN);
    (
        if x - min_x > max_x - x { min_x } else { max_x },
        if y - min_y > max_y - y { min_y } else { max_y },
    )
}
