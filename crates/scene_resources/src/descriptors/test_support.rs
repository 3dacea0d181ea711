//! In-memory descriptor device for tests

use std::collections::HashMap;
use std::sync::Mutex;

use ash::prelude::VkResult;
use ash::vk::{self, Handle};

use crate::descriptors::DescriptorPoolSizes;
use crate::vulkan::DescriptorDevice;
use crate::{ResourceError, ResourceResult};

/// What the driver still has room for in one pool
struct NativePool {
    free_sets: u32,
    free_sizes: DescriptorPoolSizes,
}

#[derive(Default)]
struct MockState {
    next_handle: u64,
    created_pools: Vec<(vk::DescriptorPool, u32, DescriptorPoolSizes)>,
    destroyed_pools: Vec<vk::DescriptorPool>,
    allocation_attempts: Vec<vk::DescriptorPool>,
    native_pools: HashMap<vk::DescriptorPool, NativePool>,
    native_sets: HashMap<vk::DescriptorSet, (vk::DescriptorPool, DescriptorPoolSizes)>,
    freed_sets: Vec<vk::DescriptorSet>,
    layout_sizes: HashMap<vk::DescriptorSetLayout, DescriptorPoolSizes>,
    live_layouts: usize,
    pool_creation_error: Option<vk::Result>,
    allocation_error: Option<vk::Result>,
}

impl MockState {
    fn next(&mut self) -> u64 {
        self.next_handle += 1;
        self.next_handle
    }
}

/// Records every native call and hands out sequential handles
///
/// Pools enforce their creation-time capacity the way a driver does, failing
/// with `ERROR_OUT_OF_POOL_MEMORY` once full.
#[derive(Default)]
pub(crate) struct MockDevice {
    state: Mutex<MockState>,
}

impl MockDevice {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Make subsequent pool creations fail with `error`
    pub(crate) fn fail_pool_creation(&self, error: Option<vk::Result>) {
        self.state.lock().unwrap().pool_creation_error = error;
    }

    /// Make subsequent set allocations fail with `error`
    pub(crate) fn fail_allocation(&self, error: Option<vk::Result>) {
        self.state.lock().unwrap().allocation_error = error;
    }

    /// `(handle, max_sets, sizes)` of every pool created, in creation order
    pub(crate) fn created_pools(&self) -> Vec<(vk::DescriptorPool, u32, DescriptorPoolSizes)> {
        self.state.lock().unwrap().created_pools.clone()
    }

    pub(crate) fn destroyed_pools(&self) -> Vec<vk::DescriptorPool> {
        self.state.lock().unwrap().destroyed_pools.clone()
    }

    /// Pools native allocation was attempted against, in call order
    pub(crate) fn allocation_attempts(&self) -> Vec<vk::DescriptorPool> {
        self.state.lock().unwrap().allocation_attempts.clone()
    }

    /// Sets the driver currently holds in `pool`
    pub(crate) fn native_sets_in(&self, pool: vk::DescriptorPool) -> usize {
        let state = self.state.lock().unwrap();
        state.native_sets.values().filter(|(owner, _)| *owner == pool).count()
    }

    /// Sets released through `free_descriptor_set`, in call order
    pub(crate) fn freed_sets(&self) -> Vec<vk::DescriptorSet> {
        self.state.lock().unwrap().freed_sets.clone()
    }

    pub(crate) fn live_layouts(&self) -> usize {
        self.state.lock().unwrap().live_layouts
    }
}

impl DescriptorDevice for MockDevice {
    fn create_descriptor_pool(
        &self,
        max_sets: u32,
        pool_sizes: &[vk::DescriptorPoolSize],
    ) -> ResourceResult<vk::DescriptorPool> {
        let mut state = self.state.lock().unwrap();
        if let Some(error) = state.pool_creation_error {
            return Err(ResourceError::Api(error));
        }
        let pool = vk::DescriptorPool::from_raw(state.next());
        let sizes: DescriptorPoolSizes = pool_sizes.iter().map(|dps| (dps.ty, dps.descriptor_count)).collect();
        state.native_pools.insert(
            pool,
            NativePool {
                free_sets: max_sets,
                free_sizes: sizes.clone(),
            },
        );
        state.created_pools.push((pool, max_sets, sizes));
        Ok(pool)
    }

    fn free_descriptor_set(&self, pool: vk::DescriptorPool, set: vk::DescriptorSet) -> ResourceResult<()> {
        let mut state = self.state.lock().unwrap();
        match state.native_sets.remove(&set) {
            Some((owner, sizes)) if owner == pool => {
                let native = state.native_pools.get_mut(&pool).unwrap();
                native.free_sets += 1;
                native.free_sizes.sum_all(&sizes);
                state.freed_sets.push(set);
                Ok(())
            }
            _ => Err(ResourceError::Api(vk::Result::ERROR_UNKNOWN)),
        }
    }

    fn destroy_descriptor_pool(&self, pool: vk::DescriptorPool) {
        let mut state = self.state.lock().unwrap();
        state.native_pools.remove(&pool);
        state.native_sets.retain(|_, (owner, _)| *owner != pool);
        state.destroyed_pools.push(pool);
    }

    fn allocate_descriptor_set(
        &self,
        pool: vk::DescriptorPool,
        layout: vk::DescriptorSetLayout,
    ) -> VkResult<vk::DescriptorSet> {
        let mut state = self.state.lock().unwrap();
        state.allocation_attempts.push(pool);
        if let Some(error) = state.allocation_error {
            return Err(error);
        }

        let sizes = state.layout_sizes.get(&layout).cloned().unwrap_or_default();
        let native = state
            .native_pools
            .get_mut(&pool)
            .ok_or(vk::Result::ERROR_OUT_OF_POOL_MEMORY)?;
        if native.free_sets == 0 || !native.free_sizes.covers(&sizes) {
            return Err(vk::Result::ERROR_OUT_OF_POOL_MEMORY);
        }
        native.free_sets -= 1;
        native.free_sizes.consume(&sizes);

        let set = vk::DescriptorSet::from_raw(state.next());
        state.native_sets.insert(set, (pool, sizes));
        Ok(set)
    }

    fn create_descriptor_set_layout(
        &self,
        bindings: &[vk::DescriptorSetLayoutBinding],
    ) -> ResourceResult<vk::DescriptorSetLayout> {
        let mut state = self.state.lock().unwrap();
        state.live_layouts += 1;
        let layout = vk::DescriptorSetLayout::from_raw(state.next());
        let sizes = bindings
            .iter()
            .filter(|binding| binding.descriptor_count > 0)
            .map(|binding| (binding.descriptor_type, binding.descriptor_count))
            .collect();
        state.layout_sizes.insert(layout, sizes);
        Ok(layout)
    }

    fn destroy_descriptor_set_layout(&self, layout: vk::DescriptorSetLayout) {
        let mut state = self.state.lock().unwrap();
        state.layout_sizes.remove(&layout);
        state.live_layouts -= 1;
    }
}
