//! Native descriptor operations
//!
//! The allocator never talks to Vulkan directly; it goes through
//! [`DescriptorDevice`], which `ash::Device` implements. Keeping the seam a
//! trait lets pool bookkeeping run against an in-memory device.

use ash::prelude::VkResult;
use ash::vk;

use crate::{ResourceError, ResourceResult};

/// Device-level descriptor operations consumed by the pool allocator
pub trait DescriptorDevice {
    /// Create a descriptor pool with the given set capacity and per-type capacities
    fn create_descriptor_pool(
        &self,
        max_sets: u32,
        pool_sizes: &[vk::DescriptorPoolSize],
    ) -> ResourceResult<vk::DescriptorPool>;

    /// Return a single descriptor set to `pool`
    ///
    /// Pools are created with `FREE_DESCRIPTOR_SET` so individual sets can be
    /// released when a different layout needs their capacity.
    fn free_descriptor_set(&self, pool: vk::DescriptorPool, set: vk::DescriptorSet) -> ResourceResult<()>;

    /// Destroy a descriptor pool, implicitly freeing every set carved from it
    fn destroy_descriptor_pool(&self, pool: vk::DescriptorPool);

    /// Allocate a single descriptor set from `pool`
    ///
    /// The raw Vulkan result is returned so callers can tell pool exhaustion
    /// apart from device failure.
    fn allocate_descriptor_set(
        &self,
        pool: vk::DescriptorPool,
        layout: vk::DescriptorSetLayout,
    ) -> VkResult<vk::DescriptorSet>;

    /// Create a descriptor set layout from its bindings
    fn create_descriptor_set_layout(
        &self,
        bindings: &[vk::DescriptorSetLayoutBinding],
    ) -> ResourceResult<vk::DescriptorSetLayout>;

    /// Destroy a descriptor set layout
    fn destroy_descriptor_set_layout(&self, layout: vk::DescriptorSetLayout);
}

#[allow(unsafe_code)]
impl DescriptorDevice for ash::Device {
    fn create_descriptor_pool(
        &self,
        max_sets: u32,
        pool_sizes: &[vk::DescriptorPoolSize],
    ) -> ResourceResult<vk::DescriptorPool> {
        let pool_info = vk::DescriptorPoolCreateInfo::builder()
            .flags(vk::DescriptorPoolCreateFlags::FREE_DESCRIPTOR_SET)
            .max_sets(max_sets)
            .pool_sizes(pool_sizes);

        unsafe { ash::Device::create_descriptor_pool(self, &pool_info, None) }
            .map_err(|e| {
                log::error!("Failed to create descriptor pool (max sets {}): {:?}", max_sets, e);
                ResourceError::Api(e)
            })
    }

    fn free_descriptor_set(&self, pool: vk::DescriptorPool, set: vk::DescriptorSet) -> ResourceResult<()> {
        unsafe { ash::Device::free_descriptor_sets(self, pool, &[set]) }
            .map_err(|e| {
                log::error!("Failed to free descriptor set {:?} in pool {:?}: {:?}", set, pool, e);
                ResourceError::Api(e)
            })
    }

    fn destroy_descriptor_pool(&self, pool: vk::DescriptorPool) {
        unsafe {
            ash::Device::destroy_descriptor_pool(self, pool, None);
        }
    }

    fn allocate_descriptor_set(
        &self,
        pool: vk::DescriptorPool,
        layout: vk::DescriptorSetLayout,
    ) -> VkResult<vk::DescriptorSet> {
        let layouts = [layout];
        let alloc_info = vk::DescriptorSetAllocateInfo::builder()
            .descriptor_pool(pool)
            .set_layouts(&layouts);

        let sets = unsafe { self.allocate_descriptor_sets(&alloc_info) }?;
        sets.first().copied().ok_or(vk::Result::ERROR_UNKNOWN)
    }

    fn create_descriptor_set_layout(
        &self,
        bindings: &[vk::DescriptorSetLayoutBinding],
    ) -> ResourceResult<vk::DescriptorSetLayout> {
        let layout_info = vk::DescriptorSetLayoutCreateInfo::builder()
            .bindings(bindings);

        unsafe { ash::Device::create_descriptor_set_layout(self, &layout_info, None) }
            .map_err(ResourceError::Api)
    }

    fn destroy_descriptor_set_layout(&self, layout: vk::DescriptorSetLayout) {
        unsafe {
            ash::Device::destroy_descriptor_set_layout(self, layout, None);
        }
    }
}
