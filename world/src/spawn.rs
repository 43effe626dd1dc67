//! Spawn zones that accumulate charge and release mobs.

use screamporium_core::GridPos;

/// Tolerance absorbing float drift when charge adds up to a whole unit.
const CHARGE_EPSILON: f64 = 1e-9;

/// Cell that releases a mob for every whole unit of accumulated charge.
#[derive(Clone, Debug, PartialEq)]
pub struct SpawnZone {
    position: GridPos,
    charge: f64,
}

impl SpawnZone {
    /// Creates an uncharged zone.
    #[must_use]
    pub fn new(position: GridPos) -> Self {
        Self {
            position,
            charge: 0.0,
        }
    }

    /// Cell mobs appear in.
    #[must_use]
    pub fn position(&self) -> GridPos {
        self.position
    }

    /// Charge accumulated toward the next release.
    #[must_use]
    pub fn charge(&self) -> f64 {
        self.charge
    }

    /// Adds charge.
    pub fn add_charge(&mut self, amount: f64) {
        self.charge += amount;
    }

    /// Consumes one unit of charge if available and reports whether a mob
    /// should be released.
    pub fn try_release(&mut self) -> bool {
        if self.charge < 1.0 - CHARGE_EPSILON {
            return false;
        }
        self.charge = (self.charge - 1.0).max(0.0);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn releases_once_per_whole_unit() {
        let mut zone = SpawnZone::new(GridPos::new(4, 9));
        zone.add_charge(2.5);
        assert!(zone.try_release());
        assert!(zone.try_release());
        assert!(!zone.try_release());
        assert!((zone.charge() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn fifty_small_increments_release_exactly_once() {
        let mut zone = SpawnZone::new(GridPos::new(4, 9));
        let mut releases = Vec::new();
        for tick in 1..=50 {
            zone.add_charge(0.004 * 5.0);
            if zone.try_release() {
                releases.push(tick);
            }
        }
        assert_eq!(releases, vec![50]);
    }
}
