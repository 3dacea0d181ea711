//! Vulkan backend
//!
//! Device-level descriptor operations and descriptor set layouts.

/// Native descriptor operations used by the pool allocator
pub mod device;

/// Descriptor set layout management
pub mod descriptor_set;

pub use device::DescriptorDevice;
pub use descriptor_set::{DescriptorSetLayout, DescriptorSetLayoutBuilder};
