//! Mobs walking the distance field toward the sink while collecting fear.

use std::time::Duration;

use glam::Vec2;
use screamporium_core::Facing;

use crate::{
    animation::FrameAnimation,
    grid::{Grid, SINK_DISTANCE},
    pool::Pooled,
};

/// Pooled unit walking from a source toward the sink.
#[derive(Clone, Debug, PartialEq)]
pub struct Mob {
    position: Vec2,
    speed: f32,
    fear: f64,
    death_fear: f64,
    facing: Facing,
    walking: bool,
    enabled: bool,
    pending_disable: bool,
    animation: FrameAnimation,
    walk_right: Vec<u32>,
    walk_left: Vec<u32>,
}

impl Mob {
    pub(crate) fn dormant(interval: Duration, walk_right: &[u32], walk_left: &[u32]) -> Self {
        Self {
            position: Vec2::ZERO,
            speed: 0.0,
            fear: 0.0,
            death_fear: f64::INFINITY,
            facing: Facing::Right,
            walking: false,
            enabled: false,
            pending_disable: false,
            animation: FrameAnimation::new(interval, walk_right.to_vec()),
            walk_right: walk_right.to_vec(),
            walk_left: walk_left.to_vec(),
        }
    }

    /// Overwrites the slot with a fresh mob.
    pub(crate) fn activate(&mut self, position: Vec2, speed: f32, fear: f64, death_fear: f64) {
        self.position = position;
        self.speed = speed;
        self.fear = fear;
        self.death_fear = death_fear;
        self.enabled = true;
        self.pending_disable = false;
        self.walking = true;
        self.facing = Facing::Right;
        self.animation.set_sequence(&self.walk_right);
    }

    /// World-space position.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Accumulated fear.
    #[must_use]
    pub fn fear(&self) -> f64 {
        self.fear
    }

    /// Direction the sprite faces.
    #[must_use]
    pub fn facing(&self) -> Facing {
        self.facing
    }

    /// Whether the mob moved during its last update.
    #[must_use]
    pub fn is_walking(&self) -> bool {
        self.walking
    }

    /// Whether the slot holds a live mob.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether the mob reached the sink and leaves on the next pass.
    #[must_use]
    pub fn is_pending_disable(&self) -> bool {
        self.pending_disable
    }

    /// Index of the current walking animation frame.
    #[must_use]
    pub fn animation_frame(&self) -> u32 {
        self.animation.current()
    }

    /// Adds fear, clamped at zero, and reports whether the mob survives.
    pub(crate) fn increase_fear(&mut self, amount: f64) -> bool {
        self.fear = (self.fear + amount).max(0.0);
        self.fear < self.death_fear
    }

    /// Advances the animation and walks one tick toward the sink.
    pub(crate) fn update(&mut self, elapsed: Duration, grid: &Grid) {
        self.animation.update(elapsed);

        if grid.distance(grid.world_to_grid(self.position)) == SINK_DISTANCE {
            self.pending_disable = true;
            return;
        }

        let Some(step) = grid.next_step_toward_sink(self.position) else {
            self.walking = false;
            return;
        };
        self.walking = true;

        let travel = self.speed * elapsed.as_secs_f32();
        let delta = step.target - self.position;
        if step.distance == SINK_DISTANCE && delta.length() <= travel + 0.5 * grid.cell_size() {
            self.pending_disable = true;
            return;
        }

        if delta.x > 0.0 {
            self.face(Facing::Right);
        } else if delta.x < 0.0 {
            self.face(Facing::Left);
        }
        self.position += delta.normalize_or_zero() * travel;
    }

    fn face(&mut self, facing: Facing) {
        if facing == self.facing {
            return;
        }
        self.facing = facing;
        let sequence = match facing {
            Facing::Right => &self.walk_right,
            Facing::Left => &self.walk_left,
        };
        self.animation.set_sequence(sequence);
    }
}

impl Pooled for Mob {
    fn deactivate(&mut self) {
        self.enabled = false;
        self.pending_disable = false;
        self.walking = false;
    }
}
