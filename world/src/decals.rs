//! Rising markers left behind by departing mobs.

use std::time::Duration;

use glam::Vec2;

use crate::{animation::EaseOut, pool::Pooled};

/// Short-lived marker drifting upward from where something happened.
#[derive(Clone, Debug, PartialEq)]
pub struct Decal {
    position: Vec2,
    frame: String,
    rise: EaseOut,
    enabled: bool,
    pending_disable: bool,
}

impl Default for Decal {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            frame: String::new(),
            rise: EaseOut::new(0.0, 0.0, Duration::ZERO),
            enabled: false,
            pending_disable: false,
        }
    }
}

impl Decal {
    pub(crate) fn activate(&mut self, position: Vec2, frame: &str, rise: f32, duration: Duration) {
        self.position = position;
        self.frame.clear();
        self.frame.push_str(frame);
        self.rise = EaseOut::new(0.0, rise, duration);
        self.enabled = true;
        self.pending_disable = false;
    }

    /// Anchor position before the drift is applied.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Vertical drift accumulated so far.
    #[must_use]
    pub fn offset(&self) -> f32 {
        self.rise.value()
    }

    /// Sprite frame of the decal.
    #[must_use]
    pub fn frame(&self) -> &str {
        &self.frame
    }

    /// Whether the slot holds a live decal.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub(crate) fn is_pending_disable(&self) -> bool {
        self.pending_disable
    }

    /// Advances the drift; a finished drift marks the decal for removal.
    pub(crate) fn update(&mut self, elapsed: Duration) {
        if self.rise.update(elapsed) {
            self.pending_disable = true;
        }
    }
}

impl Pooled for Decal {
    fn deactivate(&mut self) {
        self.enabled = false;
        self.pending_disable = false;
    }
}
