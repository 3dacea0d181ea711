//! Descriptor usage estimates
//!
//! A compile pass walks a subgraph and records every descriptor set it will
//! need into a [`ResourceRequirements`]. The pool allocator only reads the two
//! derived values exposed through [`DescriptorDemand`].

use std::collections::HashSet;

use ash::vk;

use super::DescriptorPoolSizes;

/// Source of descriptor demand for sizing pools
pub trait DescriptorDemand {
    /// Total number of descriptor sets required
    fn compute_num_descriptor_sets(&self) -> u32;

    /// Descriptor counts required per type, zero-count types omitted
    fn compute_descriptor_pool_sizes(&self) -> DescriptorPoolSizes;
}

/// Accumulated descriptor requirements of a unit of work
#[derive(Debug, Clone, Default)]
pub struct ResourceRequirements {
    /// Sets required by work outside the recorded descriptor sets
    pub external_num_descriptor_sets: u32,
    descriptor_sets: HashSet<u64>,
    descriptor_counts: DescriptorPoolSizes,
}

impl ResourceRequirements {
    /// Create empty requirements
    pub fn new() -> Self {
        Self::default()
    }

    /// Requirements with a fixed set count and per-type counts
    pub fn from_counts(num_descriptor_sets: u32, counts: DescriptorPoolSizes) -> Self {
        Self {
            external_num_descriptor_sets: num_descriptor_sets,
            descriptor_sets: HashSet::new(),
            descriptor_counts: counts,
        }
    }

    /// Record a descriptor set identified by `id` with its layout's per-type counts.
    ///
    /// Each id is counted once; returns false if it was already recorded.
    pub fn add_descriptor_set(&mut self, id: u64, layout_sizes: &DescriptorPoolSizes) -> bool {
        if !self.descriptor_sets.insert(id) {
            return false;
        }
        self.descriptor_counts.sum_all(layout_sizes);
        true
    }

    /// Add raw descriptor counts not tied to a recorded set
    pub fn add_descriptor_counts(&mut self, ty: vk::DescriptorType, count: u32) {
        self.descriptor_counts.merge_sum(ty, count);
    }

    /// Number of distinct descriptor sets recorded
    pub fn num_recorded_sets(&self) -> usize {
        self.descriptor_sets.len()
    }

    /// Forget everything recorded
    pub fn clear(&mut self) {
        self.external_num_descriptor_sets = 0;
        self.descriptor_sets.clear();
        self.descriptor_counts.clear();
    }
}

impl DescriptorDemand for ResourceRequirements {
    fn compute_num_descriptor_sets(&self) -> u32 {
        let recorded = u32::try_from(self.descriptor_sets.len()).unwrap_or(u32::MAX);
        self.external_num_descriptor_sets.saturating_add(recorded)
    }

    fn compute_descriptor_pool_sizes(&self) -> DescriptorPoolSizes {
        self.descriptor_counts
            .iter()
            .filter(|dps| dps.descriptor_count > 0)
            .map(|dps| (dps.ty, dps.descriptor_count))
            .collect()
    }
}
