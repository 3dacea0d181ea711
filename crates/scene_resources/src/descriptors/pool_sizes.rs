//! Per-type descriptor counts
//!
//! [`DescriptorPoolSizes`] is an insertion-ordered list of
//! `vk::DescriptorPoolSize` in which each descriptor type appears at most once.
//! Summing and max-merging both go through [`DescriptorPoolSizes::merge_with`],
//! so the "type not present yet, append it" case lives in one place.

use std::fmt;

use ash::vk;

/// Insertion-ordered per-type descriptor counts with unique types
#[derive(Clone, Default)]
pub struct DescriptorPoolSizes {
    sizes: Vec<vk::DescriptorPoolSize>,
}

impl DescriptorPoolSizes {
    /// Create an empty list
    pub const fn new() -> Self {
        Self { sizes: Vec::new() }
    }

    /// Number of descriptor types present
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    /// Whether no descriptor type is present
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// Remove every entry
    pub fn clear(&mut self) {
        self.sizes.clear();
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &vk::DescriptorPoolSize> {
        self.sizes.iter()
    }

    /// Entries as a slice suitable for `vk::DescriptorPoolCreateInfo`
    pub fn as_slice(&self) -> &[vk::DescriptorPoolSize] {
        &self.sizes
    }

    /// Count recorded for `ty`, zero when absent
    pub fn get(&self, ty: vk::DescriptorType) -> u32 {
        self.sizes
            .iter()
            .find(|dps| dps.ty == ty)
            .map_or(0, |dps| dps.descriptor_count)
    }

    /// Sum of counts across all types
    pub fn total(&self) -> u64 {
        self.sizes.iter().map(|dps| u64::from(dps.descriptor_count)).sum()
    }

    /// Combine `count` into the entry for `ty` with `combine(existing, count)`,
    /// appending `count` unchanged when `ty` is absent
    pub fn merge_with(
        &mut self,
        ty: vk::DescriptorType,
        count: u32,
        combine: impl FnOnce(u32, u32) -> u32,
    ) {
        match self.sizes.iter_mut().find(|dps| dps.ty == ty) {
            Some(existing) => existing.descriptor_count = combine(existing.descriptor_count, count),
            None => self.sizes.push(vk::DescriptorPoolSize {
                ty,
                descriptor_count: count,
            }),
        }
    }

    /// Add `count` to the entry for `ty`
    pub fn merge_sum(&mut self, ty: vk::DescriptorType, count: u32) {
        self.merge_with(ty, count, u32::saturating_add);
    }

    /// Raise the entry for `ty` to at least `count`
    pub fn merge_max(&mut self, ty: vk::DescriptorType, count: u32) {
        self.merge_with(ty, count, u32::max);
    }

    /// Add every entry of `other` into this list
    pub fn sum_all(&mut self, other: &Self) {
        for dps in &other.sizes {
            self.merge_sum(dps.ty, dps.descriptor_count);
        }
    }

    /// Raise every entry to at least the matching entry of `other`
    pub fn max_all(&mut self, other: &Self) {
        for dps in &other.sizes {
            self.merge_max(dps.ty, dps.descriptor_count);
        }
    }

    /// Per-type `self - available`, clamped at zero, with zero entries dropped.
    /// Types `available` lacks pass through unchanged.
    pub fn saturating_sub(&self, available: &Self) -> Self {
        let sizes = self
            .sizes
            .iter()
            .map(|dps| vk::DescriptorPoolSize {
                ty: dps.ty,
                descriptor_count: dps.descriptor_count.saturating_sub(available.get(dps.ty)),
            })
            .filter(|dps| dps.descriptor_count > 0)
            .collect();
        Self { sizes }
    }

    /// Whether every entry of `required` fits within this list
    pub fn covers(&self, required: &Self) -> bool {
        required.sizes.iter().all(|dps| self.get(dps.ty) >= dps.descriptor_count)
    }

    /// Subtract `required` from the matching entries, clamped at zero
    pub fn consume(&mut self, required: &Self) {
        for dps in &required.sizes {
            if let Some(existing) = self.sizes.iter_mut().find(|existing| existing.ty == dps.ty) {
                existing.descriptor_count = existing.descriptor_count.saturating_sub(dps.descriptor_count);
            }
        }
    }

    /// Scale each count by `numerator / denominator`, rounding up
    pub fn scale_ceil(&mut self, numerator: u32, denominator: u32) {
        if denominator == 0 {
            return;
        }
        for dps in &mut self.sizes {
            let scaled = (u64::from(dps.descriptor_count) * u64::from(numerator))
                .div_ceil(u64::from(denominator));
            dps.descriptor_count = u32::try_from(scaled).unwrap_or(u32::MAX);
        }
    }
}

impl PartialEq for DescriptorPoolSizes {
    /// Order-sensitive comparison of `(type, count)` entries
    fn eq(&self, other: &Self) -> bool {
        self.sizes.len() == other.sizes.len()
            && self
                .sizes
                .iter()
                .zip(&other.sizes)
                .all(|(a, b)| a.ty == b.ty && a.descriptor_count == b.descriptor_count)
    }
}

impl Eq for DescriptorPoolSizes {}

impl fmt::Debug for DescriptorPoolSizes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.sizes.iter().map(|dps| (dps.ty, dps.descriptor_count)))
            .finish()
    }
}

impl FromIterator<(vk::DescriptorType, u32)> for DescriptorPoolSizes {
    /// Collect pairs, summing repeated types
    fn from_iter<I: IntoIterator<Item = (vk::DescriptorType, u32)>>(iter: I) -> Self {
        let mut sizes = Self::new();
        for (ty, count) in iter {
            sizes.merge_sum(ty, count);
        }
        sizes
    }
}

impl<'a> IntoIterator for &'a DescriptorPoolSizes {
    type Item = &'a vk::DescriptorPoolSize;
    type IntoIter = std::slice::Iter<'a, vk::DescriptorPoolSize>;

    fn into_iter(self) -> Self::IntoIter {
        self.sizes.iter()
    }
}
