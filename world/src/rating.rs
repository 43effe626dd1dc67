//! Fixed-capacity running average used to derive the fear rating.

/// Ring of recent samples with an O(1) running mean.
///
/// New entries overwrite the oldest slot once the buffer is full. The mean is
/// taken over the filled slots only, so a partially filled buffer reports the
/// average of exactly the entries it has seen.
#[derive(Clone, Debug, PartialEq)]
pub struct CircularBuffer {
    values: Vec<f64>,
    next: usize,
    filled: usize,
    sum: f64,
}

impl CircularBuffer {
    /// Creates an empty buffer holding at most `capacity` samples.
    ///
    /// A zero capacity is promoted to one so the buffer can always record.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            values: vec![0.0; capacity.max(1)],
            next: 0,
            filled: 0,
            sum: 0.0,
        }
    }

    /// Creates a full buffer where every slot holds `value`.
    #[must_use]
    pub fn seeded(capacity: usize, value: f64) -> Self {
        let mut buffer = Self::new(capacity);
        for _ in 0..buffer.capacity() {
            buffer.add_entry(value);
        }
        buffer
    }

    /// Records a sample, evicting the oldest one when full.
    pub fn add_entry(&mut self, value: f64) {
        if self.filled == self.values.len() {
            self.sum -= self.values[self.next];
        } else {
            self.filled += 1;
        }
        self.values[self.next] = value;
        self.sum += value;
        self.next = (self.next + 1) % self.values.len();
    }

    /// Mean of the recorded samples, `0.0` when nothing was recorded.
    #[must_use]
    pub fn sample(&self) -> f64 {
        if self.filled == 0 {
            return 0.0;
        }
        self.sum / self.filled as f64
    }

    /// Shifts every recorded sample by `delta`, clamping at `floor`.
    ///
    /// The running sum is recomputed from scratch to shed accumulated error.
    pub fn adjust_all(&mut self, delta: f64, floor: f64) {
        let filled = self.filled;
        for value in &mut self.values[..filled] {
            *value = (*value + delta).max(floor);
        }
        self.sum = self.values[..filled].iter().sum();
    }

    /// Number of samples currently recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.filled
    }

    /// Reports whether no sample has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filled == 0
    }

    /// Maximum number of samples retained.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.values.len()
    }

    /// Sample rounded half-up to the player-facing integer rating.
    #[must_use]
    pub fn rating(&self) -> i32 {
        (self.sample() + 0.5).floor() as i32
    }
}
