//! # Scene Resources
//!
//! Descriptor pool allocation and resource tracking for a retained-mode
//! Vulkan scene graph.
//!
//! ## Features
//!
//! - **Pool Reservation**: Advance-notice demand sizes pools for typical load
//! - **Pool Reuse**: Descriptor sets are carved newest-pool-first from fixed-capacity pools
//! - **Recycling**: Freed descriptor sets are handed back out for matching layouts
//! - **Diagnostics**: Allocated / used / available capacity reports
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use ash::vk;
//! use scene_resources::prelude::*;
//!
//! fn compile(device: Arc<ash::Device>) -> ResourceResult<()> {
//!     let layout = DescriptorSetLayoutBuilder::new()
//!         .add_uniform_buffer(0, vk::ShaderStageFlags::VERTEX)
//!         .add_combined_image_sampler(1, vk::ShaderStageFlags::FRAGMENT)
//!         .build(&device)?;
//!
//!     let mut requirements = ResourceRequirements::new();
//!     requirements.add_descriptor_set(1, &layout.descriptor_pool_sizes());
//!
//!     let mut pools = PoolSetAllocator::new(device, &requirements);
//!     pools.reserve(&requirements)?;
//!     let allocation = pools.allocate_descriptor_set(&layout)?;
//!     pools.free_descriptor_set(&allocation);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod descriptors;
pub mod error;
pub mod foundation;
pub mod vulkan;

pub use error::{ResourceError, ResourceResult};

/// Common imports for crate users
pub mod prelude {
    pub use crate::{
        ResourceError, ResourceResult,
        config::{Config, ConfigError, PoolAllocatorConfig},
        descriptors::{
            DescriptorDemand, DescriptorPool, DescriptorPoolSizes, DescriptorSetAllocation,
            Indentation, LedgerState, PoolSetAllocator, ReservationLedger, ResourceRequirements,
        },
        vulkan::{DescriptorDevice, DescriptorSetLayout, DescriptorSetLayoutBuilder},
    };
}
