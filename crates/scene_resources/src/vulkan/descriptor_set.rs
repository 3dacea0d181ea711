//! Vulkan descriptor set layouts
//!
//! Layouts describe the bindings of one descriptor set. The pool allocator
//! reads a layout's per-type descriptor counts to decide whether a pool has
//! room for a set of that shape.

use std::sync::Arc;

use ash::vk;

use crate::descriptors::DescriptorPoolSizes;
use crate::vulkan::DescriptorDevice;
use crate::ResourceResult;

/// Descriptor set layout builder for creating reusable layouts
pub struct DescriptorSetLayoutBuilder {
    bindings: Vec<vk::DescriptorSetLayoutBinding>,
}

impl DescriptorSetLayoutBuilder {
    /// Create a new descriptor set layout builder
    pub fn new() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    /// Add a binding of any descriptor type
    pub fn add_binding(
        mut self,
        binding: u32,
        descriptor_type: vk::DescriptorType,
        descriptor_count: u32,
        stage_flags: vk::ShaderStageFlags,
    ) -> Self {
        self.bindings.push(
            vk::DescriptorSetLayoutBinding::builder()
                .binding(binding)
                .descriptor_type(descriptor_type)
                .descriptor_count(descriptor_count)
                .stage_flags(stage_flags)
                .build()
        );
        self
    }

    /// Add a uniform buffer binding
    pub fn add_uniform_buffer(self, binding: u32, stage_flags: vk::ShaderStageFlags) -> Self {
        self.add_binding(binding, vk::DescriptorType::UNIFORM_BUFFER, 1, stage_flags)
    }

    /// Add a combined image sampler binding
    pub fn add_combined_image_sampler(self, binding: u32, stage_flags: vk::ShaderStageFlags) -> Self {
        self.add_binding(binding, vk::DescriptorType::COMBINED_IMAGE_SAMPLER, 1, stage_flags)
    }

    /// Add a storage buffer binding
    pub fn add_storage_buffer(self, binding: u32, stage_flags: vk::ShaderStageFlags) -> Self {
        self.add_binding(binding, vk::DescriptorType::STORAGE_BUFFER, 1, stage_flags)
    }

    /// Build the descriptor set layout
    pub fn build<D: DescriptorDevice>(self, device: &Arc<D>) -> ResourceResult<DescriptorSetLayout<D>> {
        let layout = device.create_descriptor_set_layout(&self.bindings)?;

        Ok(DescriptorSetLayout {
            layout,
            device: Arc::clone(device),
            bindings: self.bindings,
        })
    }
}

impl Default for DescriptorSetLayoutBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Descriptor set layout wrapper with automatic cleanup
pub struct DescriptorSetLayout<D: DescriptorDevice = ash::Device> {
    layout: vk::DescriptorSetLayout,
    device: Arc<D>,
    bindings: Vec<vk::DescriptorSetLayoutBinding>,
}

impl<D: DescriptorDevice> DescriptorSetLayout<D> {
    /// Get the Vulkan descriptor set layout handle
    pub fn handle(&self) -> vk::DescriptorSetLayout {
        self.layout
    }

    /// Get the bindings used in this layout
    pub fn bindings(&self) -> &[vk::DescriptorSetLayoutBinding] {
        &self.bindings
    }

    /// Add the descriptor counts one set of this layout consumes into `sizes`
    pub fn get_descriptor_pool_sizes(&self, sizes: &mut DescriptorPoolSizes) {
        for binding in &self.bindings {
            if binding.descriptor_count > 0 {
                sizes.merge_sum(binding.descriptor_type, binding.descriptor_count);
            }
        }
    }

    /// Descriptor counts one set of this layout consumes
    pub fn descriptor_pool_sizes(&self) -> DescriptorPoolSizes {
        let mut sizes = DescriptorPoolSizes::new();
        self.get_descriptor_pool_sizes(&mut sizes);
        sizes
    }
}

impl<D: DescriptorDevice> Drop for DescriptorSetLayout<D> {
    fn drop(&mut self) {
        self.device.destroy_descriptor_set_layout(self.layout);
    }
}
