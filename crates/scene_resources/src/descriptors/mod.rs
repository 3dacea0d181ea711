//! Descriptor pool management
//!
//! Contains the per-type count utility, usage estimates, individual pools,
//! the reservation ledger and the pool set allocator that ties them together.

/// Per-type descriptor counts
pub mod pool_sizes;

/// Descriptor usage estimates
pub mod requirements;

/// Fixed-capacity descriptor pools
pub mod pool;

/// Reservation ledger
pub mod ledger;

/// Pool set allocator
pub mod allocator;

/// Capacity reports
pub mod report;

#[cfg(test)]
pub(crate) mod test_support;

pub use pool_sizes::DescriptorPoolSizes;
pub use requirements::{DescriptorDemand, ResourceRequirements};
pub use pool::{DescriptorPool, DescriptorSetAllocation};
pub use ledger::{LedgerState, ReservationLedger};
pub use allocator::PoolSetAllocator;
pub use report::Indentation;
