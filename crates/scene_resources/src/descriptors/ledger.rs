//! Reservation ledger
//!
//! Accumulates advance-notice demand between pool provisioning events. The
//! ledger is `Idle` right after a pool has been sized from it and
//! `Accumulating` once any reservation has been recorded since.

use ash::vk;

use super::DescriptorPoolSizes;

/// Whether the ledger holds unresolved reservations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerState {
    /// Nothing recorded since the last provisioning event
    Idle,
    /// At least one reservation recorded since the last provisioning event
    Accumulating,
}

/// Sum of all reservations since the last provisioning event
#[derive(Debug, Clone, Default)]
pub struct ReservationLedger {
    count: u32,
    max_sets: u32,
    sizes: DescriptorPoolSizes,
}

impl ReservationLedger {
    /// Create an idle ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state
    pub const fn state(&self) -> LedgerState {
        if self.count > 0 {
            LedgerState::Accumulating
        } else {
            LedgerState::Idle
        }
    }

    /// Number of reservations recorded
    pub const fn count(&self) -> u32 {
        self.count
    }

    /// Accumulated set count
    pub const fn max_sets(&self) -> u32 {
        self.max_sets
    }

    /// Accumulated per-type counts
    pub const fn sizes(&self) -> &DescriptorPoolSizes {
        &self.sizes
    }

    /// Record one reservation
    pub fn record(&mut self, max_sets: u32, sizes: &DescriptorPoolSizes) {
        self.count = self.count.saturating_add(1);
        self.max_sets = self.max_sets.saturating_add(max_sets);
        self.sizes.sum_all(sizes);
    }

    /// Average sets per reservation, `None` while idle
    pub fn average_max_sets(&self) -> Option<f64> {
        (self.count > 0).then(|| f64::from(self.max_sets) / f64::from(self.count))
    }

    /// Average count of `ty` per reservation, `None` while idle
    pub fn average_count(&self, ty: vk::DescriptorType) -> Option<f64> {
        (self.count > 0).then(|| f64::from(self.sizes.get(ty)) / f64::from(self.count))
    }

    /// Grow the accumulated set count to `target`, scaling each per-type count
    /// by the same ratio (rounded up). Does nothing unless `target` exceeds
    /// the current total. Returns whether scaling happened.
    pub fn scale_to(&mut self, target: u32) -> bool {
        if target <= self.max_sets {
            return false;
        }
        // a zero total has no ratio to preserve
        self.sizes.scale_ceil(target, self.max_sets);
        self.max_sets = target;
        true
    }

    /// Return to `Idle`
    pub fn reset(&mut self) {
        self.count = 0;
        self.max_sets = 0;
        self.sizes.clear();
    }
}
