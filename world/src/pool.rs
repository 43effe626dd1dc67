//! Fixed-capacity arena with a contiguous live prefix.

/// Entities stored in a [`Pool`].
pub(crate) trait Pooled {
    /// Resets the entity to its dormant state.
    fn deactivate(&mut self);
}

/// Pre-allocated slots where live entities occupy `[0, active)`.
///
/// Activation hands out the first dormant slot; disabling swaps the slot
/// with the last live one so the prefix stays contiguous.
#[derive(Clone, Debug)]
pub(crate) struct Pool<T> {
    slots: Vec<T>,
    active: usize,
}

impl<T: Pooled> Pool<T> {
    pub(crate) fn new(capacity: usize, mut make: impl FnMut() -> T) -> Self {
        Self {
            slots: (0..capacity).map(|_| make()).collect(),
            active: 0,
        }
    }

    /// Claims the next dormant slot, or `None` when every slot is live.
    pub(crate) fn activate(&mut self) -> Option<&mut T> {
        let slot = self.slots.get_mut(self.active)?;
        self.active += 1;
        Some(slot)
    }

    /// Returns the live slot at `index` to the dormant partition.
    pub(crate) fn disable(&mut self, index: usize) -> bool {
        if index >= self.active {
            return false;
        }
        self.active -= 1;
        self.slots.swap(index, self.active);
        self.slots[self.active].deactivate();
        true
    }

    pub(crate) fn live(&self) -> &[T] {
        &self.slots[..self.active]
    }

    pub(crate) fn live_mut(&mut self) -> &mut [T] {
        &mut self.slots[..self.active]
    }

    pub(crate) fn active(&self) -> usize {
        self.active
    }
}
