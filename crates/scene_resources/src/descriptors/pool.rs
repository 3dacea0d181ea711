//! Fixed-capacity descriptor pool with consumption tracking
//!
//! A pool's set and per-type capacities are fixed at creation. The pool tracks
//! what remains so callers can ask whether a set of a given shape still fits
//! before touching the driver. Freed sets are kept on a recycle list and
//! handed back out to later requests for the same layout. A freed set's
//! capacity counts as available; when a different layout needs it, recycled
//! sets are released to the driver before the new set is carved.

use std::collections::HashMap;
use std::sync::Arc;

use ash::vk;

use super::DescriptorPoolSizes;
use crate::vulkan::{DescriptorDevice, DescriptorSetLayout};
use crate::{ResourceError, ResourceResult};

/// A descriptor set carved from a [`DescriptorPool`]
///
/// Only valid while the pool it came from is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DescriptorSetAllocation {
    set: vk::DescriptorSet,
    layout: vk::DescriptorSetLayout,
    pool: vk::DescriptorPool,
}

impl DescriptorSetAllocation {
    /// Vulkan descriptor set handle
    pub const fn handle(&self) -> vk::DescriptorSet {
        self.set
    }

    /// Layout the set was allocated with
    pub const fn layout(&self) -> vk::DescriptorSetLayout {
        self.layout
    }

    /// Pool the set was carved from
    pub const fn pool(&self) -> vk::DescriptorPool {
        self.pool
    }
}

struct RecycledSet {
    set: vk::DescriptorSet,
    layout: vk::DescriptorSetLayout,
    sizes: DescriptorPoolSizes,
}

/// Descriptor pool with automatic cleanup
pub struct DescriptorPool<D: DescriptorDevice = ash::Device> {
    device: Arc<D>,
    pool: vk::DescriptorPool,
    max_sets: u32,
    descriptor_pool_sizes: DescriptorPoolSizes,
    available_sets: u32,
    available_sizes: DescriptorPoolSizes,
    // capacity not held by any native set, live or recycled
    native_available_sets: u32,
    native_available_sizes: DescriptorPoolSizes,
    live: HashMap<vk::DescriptorSet, DescriptorPoolSizes>,
    recycled: Vec<RecycledSet>,
}

impl<D: DescriptorDevice> DescriptorPool<D> {
    /// Create a new descriptor pool
    pub fn create(device: Arc<D>, max_sets: u32, descriptor_pool_sizes: DescriptorPoolSizes) -> ResourceResult<Self> {
        let pool = device.create_descriptor_pool(max_sets, descriptor_pool_sizes.as_slice())?;
        log::debug!(
            "Created descriptor pool {:?}: max sets {}, sizes {:?}",
            pool,
            max_sets,
            descriptor_pool_sizes
        );

        Ok(Self {
            device,
            pool,
            max_sets,
            available_sets: max_sets,
            available_sizes: descriptor_pool_sizes.clone(),
            native_available_sets: max_sets,
            native_available_sizes: descriptor_pool_sizes.clone(),
            descriptor_pool_sizes,
            live: HashMap::new(),
            recycled: Vec::new(),
        })
    }

    /// Get the pool handle
    pub const fn handle(&self) -> vk::DescriptorPool {
        self.pool
    }

    /// Set capacity the pool was created with
    pub const fn max_sets(&self) -> u32 {
        self.max_sets
    }

    /// Per-type capacity the pool was created with
    pub const fn descriptor_pool_sizes(&self) -> &DescriptorPoolSizes {
        &self.descriptor_pool_sizes
    }

    /// Sets that can still be handed out
    pub const fn available_sets(&self) -> u32 {
        self.available_sets
    }

    /// Number of freed sets waiting for reuse
    pub fn recycled_count(&self) -> usize {
        self.recycled.len()
    }

    /// Allocate a descriptor set for `layout`.
    ///
    /// Returns `Ok(None)` when the pool lacks room for the set.
    pub fn allocate(&mut self, layout: &DescriptorSetLayout<D>) -> ResourceResult<Option<DescriptorSetAllocation>> {
        self.allocate_with_sizes(layout.handle(), &layout.descriptor_pool_sizes())
    }

    /// Allocate a set for `layout`, whose per-set counts are `required`
    pub(crate) fn allocate_with_sizes(
        &mut self,
        layout: vk::DescriptorSetLayout,
        required: &DescriptorPoolSizes,
    ) -> ResourceResult<Option<DescriptorSetAllocation>> {
        if self.available_sets == 0 {
            return Ok(None);
        }

        if let Some(index) = self.recycled.iter().position(|recycled| recycled.layout == layout) {
            let recycled = self.recycled.swap_remove(index);
            log::trace!("Reusing recycled descriptor set {:?} from pool {:?}", recycled.set, self.pool);
            return Ok(Some(self.commit(recycled.set, layout, recycled.sizes)));
        }

        if !self.available_sizes.covers(required) {
            return Ok(None);
        }

        self.release_recycled_for(required)?;

        match self.device.allocate_descriptor_set(self.pool, layout) {
            Ok(set) => {
                self.native_available_sets -= 1;
                self.native_available_sizes.consume(required);
                Ok(Some(self.commit(set, layout, required.clone())))
            }
            Err(e) if e == vk::Result::ERROR_OUT_OF_POOL_MEMORY || e == vk::Result::ERROR_FRAGMENTED_POOL => {
                log::debug!("Descriptor pool {:?} exhausted by driver: {:?}", self.pool, e);
                Ok(None)
            }
            Err(e) => {
                log::error!("Failed to allocate descriptor set from pool {:?}: {:?}", self.pool, e);
                Err(ResourceError::Api(e))
            }
        }
    }

    /// Free recycled sets natively until the driver has room for `required`
    fn release_recycled_for(&mut self, required: &DescriptorPoolSizes) -> ResourceResult<()> {
        while self.native_available_sets == 0 || !self.native_available_sizes.covers(required) {
            let Some(recycled) = self.recycled.pop() else {
                break;
            };
            self.device.free_descriptor_set(self.pool, recycled.set)?;
            log::trace!("Released recycled descriptor set {:?} in pool {:?}", recycled.set, self.pool);
            self.native_available_sets += 1;
            self.native_available_sizes.sum_all(&recycled.sizes);
        }
        Ok(())
    }

    fn commit(
        &mut self,
        set: vk::DescriptorSet,
        layout: vk::DescriptorSetLayout,
        sizes: DescriptorPoolSizes,
    ) -> DescriptorSetAllocation {
        self.available_sets -= 1;
        self.available_sizes.consume(&sizes);
        self.live.insert(set, sizes);
        DescriptorSetAllocation {
            set,
            layout,
            pool: self.pool,
        }
    }

    /// Return `allocation` to this pool for reuse.
    ///
    /// Returns false if the set was not live in this pool.
    pub fn free(&mut self, allocation: &DescriptorSetAllocation) -> bool {
        if allocation.pool != self.pool {
            return false;
        }
        let Some(sizes) = self.live.remove(&allocation.set) else {
            log::warn!("Descriptor set {:?} freed twice or not owned by pool {:?}", allocation.set, self.pool);
            return false;
        };

        self.available_sets += 1;
        self.available_sizes.sum_all(&sizes);
        self.recycled.push(RecycledSet {
            set: allocation.set,
            layout: allocation.layout,
            sizes,
        });
        true
    }

    /// Add remaining capacity into `num_sets` and `sizes`.
    ///
    /// Returns whether any set can still be allocated.
    pub fn available(&self, num_sets: &mut u32, sizes: &mut DescriptorPoolSizes) -> bool {
        *num_sets += self.available_sets;
        for dps in &self.available_sizes {
            if dps.descriptor_count > 0 {
                sizes.merge_sum(dps.ty, dps.descriptor_count);
            }
        }
        self.available_sets > 0
    }

    /// Add consumed capacity into `num_sets` and `sizes`.
    ///
    /// Returns whether any set is in use.
    pub fn used(&self, num_sets: &mut u32, sizes: &mut DescriptorPoolSizes) -> bool {
        let used_sets = self.max_sets - self.available_sets;
        *num_sets += used_sets;
        for dps in &self.descriptor_pool_sizes {
            let used = dps.descriptor_count.saturating_sub(self.available_sizes.get(dps.ty));
            if used > 0 {
                sizes.merge_sum(dps.ty, used);
            }
        }
        used_sets > 0
    }

    /// Add full capacity into `num_sets` and `sizes`
    pub fn allocated(&self, num_sets: &mut u32, sizes: &mut DescriptorPoolSizes) {
        *num_sets += self.max_sets;
        sizes.sum_all(&self.descriptor_pool_sizes);
    }
}

impl<D: DescriptorDevice> Drop for DescriptorPool<D> {
    fn drop(&mut self) {
        log::debug!("Destroying descriptor pool {:?}", self.pool);
        self.device.destroy_descriptor_pool(self.pool);
    }
}
