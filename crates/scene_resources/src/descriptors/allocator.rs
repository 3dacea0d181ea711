//! Descriptor pool set allocator
//!
//! Owns an ordered collection of [`DescriptorPool`]s and decides when to reuse
//! existing capacity and when to grow. Growth is driven two ways:
//!
//! - [`PoolSetAllocator::reserve`] records advance demand in a
//!   [`ReservationLedger`] and provisions a pool only when existing
//!   availability cannot cover the request.
//! - [`PoolSetAllocator::allocate_descriptor_set`] scans pools newest first
//!   and creates a pool sized for the request when none has room.
//!
//! Every new pool is sized by `descriptor_pool_sizes_to_use`, which folds in
//! the ledger history and the construction-time minimum, then resets the
//! ledger. If the pool then fails to come into being the ledger is restored,
//! so a native error never discards reservation history.
//!
//! The newest-first scan is linear in the pool count. An index keyed by
//! remaining capacity would avoid it, but pool counts stay small in practice.

use std::io::{self, Write};
use std::sync::Arc;

use super::report::{write_capacity, write_sizes};
use super::{
    DescriptorDemand, DescriptorPool, DescriptorPoolSizes, DescriptorSetAllocation, Indentation,
    ReservationLedger,
};
use crate::config::PoolAllocatorConfig;
use crate::foundation::logging::sizing_level;
use crate::vulkan::{DescriptorDevice, DescriptorSetLayout};
use crate::{ResourceError, ResourceResult};

/// Grows and reuses descriptor pools for one device
///
/// Not internally synchronized; use one allocator per thread.
pub struct PoolSetAllocator<D: DescriptorDevice = ash::Device> {
    device: Arc<D>,
    config: PoolAllocatorConfig,
    minimum_max_sets: u32,
    minimum_descriptor_pool_sizes: DescriptorPoolSizes,
    pools: Vec<DescriptorPool<D>>,
    ledger: ReservationLedger,
}

impl<D: DescriptorDevice> PoolSetAllocator<D> {
    /// Create an allocator whose pools are never smaller than `requirements`
    pub fn new(device: Arc<D>, requirements: &impl DescriptorDemand) -> Self {
        Self::with_config(device, requirements, PoolAllocatorConfig::default())
    }

    /// Create an allocator with explicit tuning
    pub fn with_config(device: Arc<D>, requirements: &impl DescriptorDemand, config: PoolAllocatorConfig) -> Self {
        let minimum_max_sets = requirements
            .compute_num_descriptor_sets()
            .max(config.minimum_max_sets)
            .max(1);
        let minimum_descriptor_pool_sizes = requirements.compute_descriptor_pool_sizes();

        log::debug!(
            "Creating PoolSetAllocator: minimum max sets {}, minimum sizes {:?}",
            minimum_max_sets,
            minimum_descriptor_pool_sizes
        );

        Self {
            device,
            config,
            minimum_max_sets,
            minimum_descriptor_pool_sizes,
            pools: Vec::new(),
            ledger: ReservationLedger::new(),
        }
    }

    /// Set-count floor applied to every new pool
    pub const fn minimum_max_sets(&self) -> u32 {
        self.minimum_max_sets
    }

    /// Per-type floor applied to every new pool
    pub const fn minimum_descriptor_pool_sizes(&self) -> &DescriptorPoolSizes {
        &self.minimum_descriptor_pool_sizes
    }

    /// Reservations recorded since the last pool was provisioned
    pub const fn ledger(&self) -> &ReservationLedger {
        &self.ledger
    }

    /// Tuning in effect
    pub const fn config(&self) -> &PoolAllocatorConfig {
        &self.config
    }

    /// Number of pools created so far
    pub fn pool_count(&self) -> usize {
        self.pools.len()
    }

    /// Pools in creation order
    pub fn pools(&self) -> &[DescriptorPool<D>] {
        &self.pools
    }

    /// Adjust a pool about to be created using reservation history and the
    /// minimum floor, then reset the ledger.
    pub(crate) fn descriptor_pool_sizes_to_use(&mut self, max_sets: &mut u32, sizes: &mut DescriptorPoolSizes) {
        let level = sizing_level(self.config.log_sizing_decisions);
        let target_max_sets = (*max_sets).max(self.config.target_max_sets);

        if let Some(average) = self.ledger.average_max_sets() {
            log::log!(
                level,
                "PoolSetAllocator sizing: pools {}, reserved max sets {}, average {:.2}",
                self.pools.len(),
                self.ledger.max_sets(),
                average
            );
            for dps in self.ledger.sizes() {
                log::log!(
                    level,
                    "    {:?} reserved {}, average {:.2}",
                    dps.ty,
                    dps.descriptor_count,
                    self.ledger.average_count(dps.ty).unwrap_or_default()
                );
            }

            if self.ledger.scale_to(target_max_sets) {
                log::log!(level, "    scaled reservation to {} sets: {:?}", target_max_sets, self.ledger.sizes());
            }

            *max_sets = (*max_sets).max(self.ledger.max_sets()).max(target_max_sets);
            sizes.max_all(self.ledger.sizes());
        }

        *max_sets = (*max_sets).max(self.minimum_max_sets);
        sizes.max_all(&self.minimum_descriptor_pool_sizes);

        self.ledger.reset();
    }

    /// Advise the allocator of upcoming demand.
    ///
    /// Creates one pool when existing availability cannot cover `requirements`.
    pub fn reserve(&mut self, requirements: &impl DescriptorDemand) -> ResourceResult<()> {
        let max_sets = requirements.compute_num_descriptor_sets();
        let sizes = requirements.compute_descriptor_pool_sizes();

        self.ledger.record(max_sets, &sizes);

        let mut available_max_sets = 0;
        let mut available_sizes = DescriptorPoolSizes::new();
        self.available(&mut available_max_sets, &mut available_sizes);

        let mut required_max_sets = max_sets.saturating_sub(available_max_sets);
        let mut required_sizes = sizes.saturating_sub(&available_sizes);

        if required_max_sets == 0 && required_sizes.is_empty() {
            log::debug!("PoolSetAllocator::reserve: existing pools have enough capacity");
            return Ok(());
        }

        let history = self.ledger.clone();
        self.descriptor_pool_sizes_to_use(&mut required_max_sets, &mut required_sizes);
        match DescriptorPool::create(Arc::clone(&self.device), required_max_sets, required_sizes) {
            Ok(pool) => {
                self.pools.push(pool);
                Ok(())
            }
            Err(e) => {
                self.ledger = history;
                Err(e)
            }
        }
    }

    /// Allocate a descriptor set for `layout`, growing the pool set if needed
    pub fn allocate_descriptor_set(&mut self, layout: &DescriptorSetLayout<D>) -> ResourceResult<DescriptorSetAllocation> {
        let layout_handle = layout.handle();
        let required = layout.descriptor_pool_sizes();

        for pool in self.pools.iter_mut().rev() {
            if let Some(allocation) = pool.allocate_with_sizes(layout_handle, &required)? {
                return Ok(allocation);
            }
        }

        let history = self.ledger.clone();
        let mut max_sets = 1;
        let mut sizes = required.clone();
        self.descriptor_pool_sizes_to_use(&mut max_sets, &mut sizes);

        let provisioned = DescriptorPool::create(Arc::clone(&self.device), max_sets, sizes).and_then(|mut pool| {
            let allocation = pool.allocate_with_sizes(layout_handle, &required)?;
            Ok((pool, allocation))
        });
        let (pool, allocation) = match provisioned {
            Ok(provisioned) => provisioned,
            Err(e) => {
                self.ledger = history;
                return Err(e);
            }
        };
        self.pools.push(pool);

        allocation.ok_or(ResourceError::PoolExhausted { max_sets })
    }

    /// Return `allocation` to its pool for reuse by later allocations.
    ///
    /// Returns false if no pool owns the set.
    pub fn free_descriptor_set(&mut self, allocation: &DescriptorSetAllocation) -> bool {
        self.pools
            .iter_mut()
            .find(|pool| pool.handle() == allocation.pool())
            .is_some_and(|pool| pool.free(allocation))
    }

    /// Sum remaining capacity over all pools.
    ///
    /// Returns whether any pool can still hand out a set.
    pub fn available(&self, num_sets: &mut u32, sizes: &mut DescriptorPoolSizes) -> bool {
        let mut result = false;
        for pool in &self.pools {
            result |= pool.available(num_sets, sizes);
        }
        result
    }

    /// Sum consumed capacity over all pools.
    ///
    /// Returns whether any set is in use.
    pub fn used(&self, num_sets: &mut u32, sizes: &mut DescriptorPoolSizes) -> bool {
        let mut result = false;
        for pool in &self.pools {
            result |= pool.used(num_sets, sizes);
        }
        result
    }

    /// Sum full capacity over all pools.
    ///
    /// Returns false when no pool exists.
    pub fn allocated(&self, num_sets: &mut u32, sizes: &mut DescriptorPoolSizes) -> bool {
        if self.pools.is_empty() {
            return false;
        }
        for pool in &self.pools {
            pool.allocated(num_sets, sizes);
        }
        true
    }

    /// Write a human-readable summary of the floor and capacity totals
    pub fn report(&self, out: &mut impl Write, indent: Indentation) -> io::Result<()> {
        writeln!(out, "{indent}PoolSetAllocator::report(..) {:p} {{", self)?;
        let inner = indent.nested();

        writeln!(out, "{inner}minimum_max_sets = {}", self.minimum_max_sets)?;
        write_sizes(out, inner, "minimum_descriptor_pool_sizes", &self.minimum_descriptor_pool_sizes)?;
        writeln!(out, "{inner}descriptor_pools {}", self.pools.len())?;

        let mut num_sets = 0;
        let mut sizes = DescriptorPoolSizes::new();
        self.allocated(&mut num_sets, &mut sizes);
        write_capacity(out, inner, "allocated", num_sets, &sizes)?;

        num_sets = 0;
        sizes.clear();
        self.used(&mut num_sets, &mut sizes);
        write_capacity(out, inner, "used", num_sets, &sizes)?;

        num_sets = 0;
        sizes.clear();
        self.available(&mut num_sets, &mut sizes);
        write_capacity(out, inner, "available", num_sets, &sizes)?;

        writeln!(out, "{indent}}}")
    }
}
