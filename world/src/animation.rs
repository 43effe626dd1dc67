//! Time-driven animation helpers shared by grid cells, mobs and decals.

use std::time::Duration;

/// Steps through a sequence of frame indices at a fixed interval.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct FrameAnimation {
    interval: Duration,
    sequence: Vec<u32>,
    position: usize,
    elapsed: Duration,
}

impl FrameAnimation {
    pub(crate) fn new(interval: Duration, sequence: Vec<u32>) -> Self {
        Self {
            interval,
            sequence,
            position: 0,
            elapsed: Duration::ZERO,
        }
    }

    /// Advances the animation, wrapping around the end of the sequence.
    pub(crate) fn update(&mut self, elapsed: Duration) {
        if self.sequence.is_empty() || self.interval.is_zero() {
            return;
        }

        self.elapsed += elapsed;
        while self.elapsed >= self.interval {
            self.elapsed -= self.interval;
            self.position = (self.position + 1) % self.sequence.len();
        }
    }

    /// Frame index currently displayed, `0` when the sequence is empty.
    pub(crate) fn current(&self) -> u32 {
        self.sequence.get(self.position).copied().unwrap_or(0)
    }

    /// Swaps the active sequence and restarts it from the first frame.
    pub(crate) fn set_sequence(&mut self, sequence: &[u32]) {
        self.sequence.clear();
        self.sequence.extend_from_slice(sequence);
        self.position = 0;
        self.elapsed = Duration::ZERO;
    }
}

/// Quadratic ease-out tween from one value to another.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct EaseOut {
    from: f32,
    to: f32,
    duration: Duration,
    elapsed: Duration,
}

impl EaseOut {
    pub(crate) fn new(from: f32, to: f32, duration: Duration) -> Self {
        Self {
            from,
            to,
            duration,
            elapsed: Duration::ZERO,
        }
    }

    /// Advances the tween and reports whether it has completed.
    pub(crate) fn update(&mut self, elapsed: Duration) -> bool {
        self.elapsed = (self.elapsed + elapsed).min(self.duration);
        self.is_finished()
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    pub(crate) fn value(&self) -> f32 {
        if self.duration.is_zero() {
            return self.to;
        }
        let t = self.elapsed.as_secs_f32() / self.duration.as_secs_f32();
        let eased = 1.0 - (1.0 - t) * (1.0 - t);
        self.from + (self.to - self.from) * eased
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_animation_wraps_after_last_frame() {
        let mut animation = FrameAnimation::new(Duration::from_millis(100), vec![3, 4, 5]);
        assert_eq!(animation.current(), 3);

        animation.update(Duration::from_millis(250));
        assert_eq!(animation.current(), 5);

        animation.update(Duration::from_millis(100));
        assert_eq!(animation.current(), 3);
    }

    #[test]
    fn set_sequence_restarts_from_first_frame() {
        let mut animation = FrameAnimation::new(Duration::from_millis(100), vec![0, 1]);
        animation.update(Duration::from_millis(100));
        animation.set_sequence(&[7, 8]);
        assert_eq!(animation.current(), 7);
    }

    #[test]
    fn ease_out_reaches_target_and_decelerates() {
        let mut tween = EaseOut::new(0.0, 2.0, Duration::from_secs(2));
        assert!(!tween.update(Duration::from_secs(1)));
        let halfway = tween.value();
        assert!(halfway > 1.0, "ease-out covers more than half the distance early");
        assert!(tween.update(Duration::from_secs(5)));
        assert!((tween.value() - 2.0).abs() < f32::EPSILON);
    }
}
